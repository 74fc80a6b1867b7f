//! Modtools feature - permission-gated moderation commands
//!
//! Staff roles come from this feature's own configuration, so the feature
//! refuses to load without one.

use crate::application::checks;
use crate::application::errors::BotError;
use crate::domain::entities::command::{Command, CommandContext, CommandGroup};
use crate::domain::entities::CommandRegistry;

use super::{Feature, FeatureConfig, FeatureDescriptor};

struct Modtools {
    descriptor: FeatureDescriptor,
}

pub fn feature() -> Box<dyn Feature> {
    Box::new(Modtools {
        descriptor: FeatureDescriptor {
            slug: "modtools".to_string(),
            name: "Modtools".to_string(),
            description: "Moderation helpers gated by permission checks".to_string(),
            version: "1.0.0".to_string(),
            author: "thom".to_string(),
            requires_config: true,
            permissions: vec!["send-messages".to_string()],
        },
    })
}

fn staff_roles(config: &FeatureConfig) -> Vec<String> {
    config
        .get("staff-roles")
        .and_then(serde_yaml::Value::as_sequence)
        .map(|seq| {
            seq.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

impl Feature for Modtools {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn register(
        &self,
        registry: &mut CommandRegistry,
        config: &FeatureConfig,
    ) -> Result<(), BotError> {
        let staff_roles = staff_roles(config);
        if staff_roles.is_empty() {
            return Err(BotError::Config(
                "modtools needs a non-empty staff-roles list".to_string(),
            ));
        }

        let group = CommandGroup::new("mod")
            .with_description("Moderation helpers")
            .with_subcommand(
                Command::new("staff")
                    .with_description("Staff only")
                    .with_check(checks::is_staff(staff_roles))
                    .with_handler(|_ctx: CommandContext<'_>| Ok("You are staff.".to_string())),
            )
            .with_subcommand(
                Command::new("admin")
                    .with_description("Admins only")
                    .with_check(checks::is_admin())
                    .with_handler(|_ctx: CommandContext<'_>| Ok("You are an admin.".to_string())),
            )
            .with_subcommand(
                Command::new("owner")
                    .with_description("Owner only")
                    .with_check(checks::is_server_owner())
                    .with_handler(|_ctx: CommandContext<'_>| Ok("You are the owner.".to_string())),
            )
            .with_subcommand(
                Command::new("whoami")
                    .with_description("Show your permission info")
                    .with_handler(|ctx: CommandContext<'_>| {
                        Ok(match &ctx.message.sender {
                            Some(user) => format!(
                                "{}: roles [{}], admin: {}, owner: {}",
                                user.display_name(),
                                user.roles.join(", "),
                                user.is_admin,
                                user.is_owner
                            ),
                            None => "No sender information.".to_string(),
                        })
                    }),
            );
        registry.add_group(group);
        Ok(())
    }
}
