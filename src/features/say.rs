//! Say feature - makes the bot repeat a message

use crate::application::errors::{BotError, CommandError};
use crate::domain::entities::command::{Command, CommandContext};
use crate::domain::entities::CommandRegistry;

use super::{Feature, FeatureConfig, FeatureDescriptor};

struct Say {
    descriptor: FeatureDescriptor,
}

pub fn feature() -> Box<dyn Feature> {
    Box::new(Say {
        descriptor: FeatureDescriptor {
            slug: "say".to_string(),
            name: "Say".to_string(),
            description: "Lets the bot say messages".to_string(),
            version: "1.0.0".to_string(),
            author: "wren".to_string(),
            requires_config: true,
            permissions: vec!["send-messages".to_string()],
        },
    })
}

impl Feature for Say {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn register(
        &self,
        registry: &mut CommandRegistry,
        config: &FeatureConfig,
    ) -> Result<(), BotError> {
        // Settings are read once here; the handler captures the values.
        let max_length = config
            .get("max-length")
            .and_then(serde_yaml::Value::as_u64)
            .map(|v| v as usize);

        registry.add_command(
            Command::new("say")
                .with_description("Make the bot repeat a message")
                .with_usage("/say <message>")
                .with_handler(move |ctx: CommandContext<'_>| {
                    if ctx.args.is_empty() {
                        return Err(CommandError::InvalidArgs(
                            "nothing to say".to_string(),
                        ));
                    }
                    let mut text = ctx.args.join(" ");
                    if let Some(max) = max_length {
                        if text.chars().count() > max {
                            text = text.chars().take(max).collect();
                        }
                    }
                    Ok(text)
                }),
        );
        Ok(())
    }
}
