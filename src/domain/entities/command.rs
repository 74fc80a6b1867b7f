use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::domain::entities::Message;

/// Context handed to a command handler at dispatch time.
///
/// Carries a read-only view of the registry so handlers like the command
/// listing can enumerate live state without holding global references.
pub struct CommandContext<'a> {
    pub message: &'a Message,
    pub registry: &'a CommandRegistry,
    pub args: &'a [String],
}

/// Command handler function type
pub type CommandHandler =
    Box<dyn Fn(CommandContext<'_>) -> Result<String, CommandError> + Send + Sync>;

/// Permission predicate attached to a command
pub type CommandCheck = Box<dyn Fn(&Message) -> bool + Send + Sync>;

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    pub handler: Option<CommandHandler>,
    pub check: Option<CommandCheck>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            handler: None,
            check: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(CommandContext<'_>) -> Result<String, CommandError> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn with_check<C>(mut self, check: C) -> Self
    where
        C: Fn(&Message) -> bool + Send + Sync + 'static,
    {
        self.check = Some(Box::new(check));
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        self.name.to_lowercase() == input_lower
            || self.aliases.iter().any(|a| a.to_lowercase() == input_lower)
    }
}

/// A named group of subcommands
pub struct CommandGroup {
    pub name: String,
    pub description: Option<String>,
    subcommands: Vec<Command>,
}

impl CommandGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            subcommands: Vec::new(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_subcommand(mut self, command: Command) -> Self {
        self.subcommands.push(command);
        self
    }

    pub fn subcommand(&self, input: &str) -> Option<&Command> {
        self.subcommands.iter().find(|c| c.matches(input))
    }

    pub fn subcommands(&self) -> impl Iterator<Item = &Command> {
        self.subcommands.iter()
    }
}

/// A single named entry in the registry: a command or a group
pub enum RegistryEntry {
    Command(Command),
    Group(CommandGroup),
}

impl RegistryEntry {
    pub fn name(&self) -> &str {
        match self {
            RegistryEntry::Command(cmd) => &cmd.name,
            RegistryEntry::Group(group) => &group.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            RegistryEntry::Command(cmd) => cmd.description.as_deref(),
            RegistryEntry::Group(group) => group.description.as_deref(),
        }
    }
}

/// Point-in-time view of the registry, keyed by name.
///
/// Entries are shared `Arc`s, so two snapshots can be compared for *identity*
/// with `Arc::ptr_eq`, not just for name equality.
pub type RegistrySnapshot = HashMap<String, Arc<RegistryEntry>>;

/// Command registry for managing available commands and groups.
///
/// Names are unique at any point in time. Adding under an existing name
/// replaces the binding; callers that care about the previous owner must
/// snapshot first.
#[derive(Default)]
pub struct CommandRegistry {
    entries: HashMap<String, Arc<RegistryEntry>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: Command) {
        self.insert(Arc::new(RegistryEntry::Command(command)));
    }

    pub fn add_group(&mut self, group: CommandGroup) {
        self.insert(Arc::new(RegistryEntry::Group(group)));
    }

    /// Insert a shared entry as-is, preserving its identity.
    pub fn insert(&mut self, entry: Arc<RegistryEntry>) {
        self.entries.insert(entry.name().to_string(), entry);
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<RegistryEntry>> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<RegistryEntry>> {
        self.entries.get(name)
    }

    /// Find a top-level entry by name, or by alias for plain commands.
    pub fn find(&self, input: &str) -> Option<&Arc<RegistryEntry>> {
        self.entries.get(input).or_else(|| {
            self.entries.values().find(|e| match e.as_ref() {
                RegistryEntry::Command(cmd) => cmd.matches(input),
                RegistryEntry::Group(group) => group.name.eq_ignore_ascii_case(input),
            })
        })
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.entries.clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn all(&self) -> impl Iterator<Item = &Arc<RegistryEntry>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
