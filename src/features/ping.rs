//! Ping feature - liveness check command

use crate::application::errors::BotError;
use crate::domain::entities::command::{Command, CommandContext};
use crate::domain::entities::CommandRegistry;

use super::{Feature, FeatureConfig, FeatureDescriptor};

struct Ping {
    descriptor: FeatureDescriptor,
}

pub fn feature() -> Box<dyn Feature> {
    Box::new(Ping {
        descriptor: FeatureDescriptor {
            slug: "ping".to_string(),
            name: "Ping".to_string(),
            description: "Responds to ping commands".to_string(),
            version: "1.0.0".to_string(),
            author: "wren".to_string(),
            requires_config: false,
            permissions: vec!["send-messages".to_string()],
        },
    })
}

impl Feature for Ping {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn register(
        &self,
        registry: &mut CommandRegistry,
        _config: &FeatureConfig,
    ) -> Result<(), BotError> {
        registry.add_command(
            Command::new("ping")
                .with_description("Responds with Pong!")
                .with_handler(|_ctx: CommandContext<'_>| Ok("Pong!".to_string())),
        );
        Ok(())
    }
}
