use crate::application::errors::CommandError;
use crate::domain::entities::command::{Command, CommandContext, CommandGroup};
use crate::domain::entities::{CommandRegistry, Content, Message, RegistryEntry};

/// Service for dispatching messages to registered commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>, registry: CommandRegistry) -> Self {
        Self {
            registry,
            prefix: prefix.into(),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Handle a message. Returns `Ok(None)` for non-command content.
    pub fn handle(&self, message: &Message) -> Result<Option<String>, CommandError> {
        let Content::Command { name, args } = &message.content else {
            return Ok(None);
        };

        let entry = self
            .registry
            .find(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        match entry.as_ref() {
            RegistryEntry::Command(cmd) => self.invoke(cmd, message, args),
            RegistryEntry::Group(group) => {
                let Some(sub_name) = args.first() else {
                    return Ok(Some(self.group_usage(group)));
                };
                let sub = group
                    .subcommand(sub_name)
                    .ok_or_else(|| CommandError::NotFound(format!("{} {}", group.name, sub_name)))?;
                self.invoke(sub, message, &args[1..])
            }
        }
    }

    fn invoke(
        &self,
        cmd: &Command,
        message: &Message,
        args: &[String],
    ) -> Result<Option<String>, CommandError> {
        if let Some(check) = &cmd.check {
            if !check(message) {
                return Err(CommandError::PermissionDenied);
            }
        }

        let ctx = CommandContext {
            message,
            registry: &self.registry,
            args,
        };
        match &cmd.handler {
            Some(handler) => handler(ctx).map(Some),
            None => Ok(Some(format!("Command {} not implemented", cmd.name))),
        }
    }

    fn group_usage(&self, group: &CommandGroup) -> String {
        let mut usage = format!(
            "{} - {}\nSubcommands:\n",
            group.name,
            group.description.as_deref().unwrap_or("No description")
        );
        for sub in group.subcommands() {
            usage.push_str(&format!(
                "  {}{} {} - {}\n",
                self.prefix,
                group.name,
                sub.name,
                sub.description.as_deref().unwrap_or("")
            ));
        }
        usage
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        if let Some(name) = command {
            return match self.registry.find(name).map(|e| e.as_ref()) {
                Some(RegistryEntry::Command(cmd)) => {
                    let mut help = format!(
                        "{}{} - {}",
                        self.prefix,
                        cmd.name,
                        cmd.description.as_deref().unwrap_or("No description")
                    );
                    if let Some(usage) = &cmd.usage {
                        help.push_str(&format!("\nUsage: {}", usage));
                    }
                    help
                }
                Some(RegistryEntry::Group(group)) => self.group_usage(group),
                None => format!("Command {}{} not found", self.prefix, name),
            };
        }

        let mut lines: Vec<String> = Vec::new();
        for entry in self.registry.all() {
            lines.push(format!(
                "  {}{} - {}",
                self.prefix,
                entry.name(),
                entry.description().unwrap_or("")
            ));
        }
        lines.sort();
        format!("Available commands:\n{}", lines.join("\n"))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::checks;
    use crate::domain::entities::User;

    fn service_with(registry: CommandRegistry) -> CommandService {
        CommandService::new("/", registry)
    }

    #[test]
    fn dispatches_top_level_command() {
        let mut registry = CommandRegistry::new();
        registry.add_command(
            Command::new("ping").with_handler(|_ctx: CommandContext<'_>| Ok("Pong!".to_string())),
        );
        let service = service_with(registry);

        let msg = Message::from_command("chat", "ping", vec![]);
        assert_eq!(service.handle(&msg).unwrap(), Some("Pong!".to_string()));
    }

    #[test]
    fn dispatches_group_subcommand_with_remaining_args() {
        let mut registry = CommandRegistry::new();
        registry.add_group(
            CommandGroup::new("utils").with_subcommand(
                Command::new("echo")
                    .with_handler(|ctx: CommandContext<'_>| Ok(ctx.args.join(" "))),
            ),
        );
        let service = service_with(registry);

        let msg = Message::from_command(
            "chat",
            "utils",
            vec!["echo".to_string(), "a".to_string(), "b".to_string()],
        );
        assert_eq!(service.handle(&msg).unwrap(), Some("a b".to_string()));
    }

    #[test]
    fn unknown_command_is_not_found() {
        let service = service_with(CommandRegistry::new());
        let msg = Message::from_command("chat", "nope", vec![]);

        assert!(matches!(
            service.handle(&msg),
            Err(CommandError::NotFound(_))
        ));
    }

    #[test]
    fn check_gates_the_handler() {
        let mut registry = CommandRegistry::new();
        registry.add_command(
            Command::new("staff-only")
                .with_check(checks::is_staff(vec!["staff".to_string()]))
                .with_handler(|_ctx: CommandContext<'_>| Ok("welcome".to_string())),
        );
        let service = service_with(registry);

        let denied = Message::from_command("chat", "staff-only", vec![])
            .with_sender(User::new("1").with_role("member"));
        assert!(matches!(
            service.handle(&denied),
            Err(CommandError::PermissionDenied)
        ));

        let allowed = Message::from_command("chat", "staff-only", vec![])
            .with_sender(User::new("2").with_role("staff"));
        assert_eq!(service.handle(&allowed).unwrap(), Some("welcome".to_string()));
    }

    #[test]
    fn plain_text_is_ignored() {
        let service = service_with(CommandRegistry::new());
        let msg = Message::from_text("chat", "hello");

        assert_eq!(service.handle(&msg).unwrap(), None);
    }

    #[test]
    fn bare_group_name_prints_usage() {
        let mut registry = CommandRegistry::new();
        registry.add_group(
            CommandGroup::new("utils")
                .with_description("Helper commands")
                .with_subcommand(Command::new("commands").with_description("List commands")),
        );
        let service = service_with(registry);

        let msg = Message::from_command("chat", "utils", vec![]);
        let usage = service.handle(&msg).unwrap().unwrap();
        assert!(usage.contains("/utils commands"));
    }
}
