//! Utils feature - command listing helpers

use crate::application::errors::BotError;
use crate::domain::entities::command::{Command, CommandContext, CommandGroup};
use crate::domain::entities::{CommandRegistry, RegistryEntry};

use super::{Feature, FeatureConfig, FeatureDescriptor};

struct Utils {
    descriptor: FeatureDescriptor,
}

pub fn feature() -> Box<dyn Feature> {
    Box::new(Utils {
        descriptor: FeatureDescriptor {
            slug: "utils".to_string(),
            name: "Utils".to_string(),
            description: "Help commands".to_string(),
            version: "1.0.0".to_string(),
            author: "wren".to_string(),
            requires_config: false,
            permissions: vec!["send-messages".to_string()],
        },
    })
}

impl Feature for Utils {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn register(
        &self,
        registry: &mut CommandRegistry,
        _config: &FeatureConfig,
    ) -> Result<(), BotError> {
        let group = CommandGroup::new("utils")
            .with_description("Help commands")
            .with_subcommand(
                Command::new("commands")
                    .with_description("List all available commands")
                    .with_handler(|ctx: CommandContext<'_>| {
                        // Enumerates the live registry, so commands loaded
                        // after this feature still show up.
                        let mut lines: Vec<String> = Vec::new();
                        for entry in ctx.registry.all() {
                            match entry.as_ref() {
                                RegistryEntry::Command(cmd) => lines.push(format!(
                                    "/{} - {}",
                                    cmd.name,
                                    cmd.description.as_deref().unwrap_or("")
                                )),
                                RegistryEntry::Group(group) => {
                                    for sub in group.subcommands() {
                                        lines.push(format!(
                                            "/{} {} - {}",
                                            group.name,
                                            sub.name,
                                            sub.description.as_deref().unwrap_or("")
                                        ));
                                    }
                                }
                            }
                        }
                        lines.sort();
                        Ok(format!("Available commands:\n{}", lines.join("\n")))
                    }),
            );
        registry.add_group(group);
        Ok(())
    }
}
