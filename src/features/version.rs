//! Version feature - reports the running bot version

use crate::application::errors::BotError;
use crate::domain::entities::command::{Command, CommandContext};
use crate::domain::entities::CommandRegistry;

use super::{Feature, FeatureConfig, FeatureDescriptor};

struct Version {
    descriptor: FeatureDescriptor,
}

pub fn feature() -> Box<dyn Feature> {
    Box::new(Version {
        descriptor: FeatureDescriptor {
            slug: "version".to_string(),
            name: "Version".to_string(),
            description: "Reports the bot's version".to_string(),
            version: "1.0.0".to_string(),
            author: "wren".to_string(),
            requires_config: false,
            permissions: vec!["send-messages".to_string()],
        },
    })
}

impl Feature for Version {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn register(
        &self,
        registry: &mut CommandRegistry,
        _config: &FeatureConfig,
    ) -> Result<(), BotError> {
        registry.add_command(
            Command::new("version")
                .with_description("Show bot version")
                .with_aliases(vec!["v".to_string()])
                .with_handler(|_ctx: CommandContext<'_>| {
                    Ok(format!(
                        "{} v{}",
                        env!("CARGO_PKG_NAME"),
                        env!("CARGO_PKG_VERSION")
                    ))
                }),
        );
        Ok(())
    }
}
