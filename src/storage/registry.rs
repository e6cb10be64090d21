//! Command registry
//!
//! Maps command names to descriptors. Built-in commands are registered
//! first; user configuration layers may add commands or replace existing
//! ones by name.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::cli::BuiltinCommand;
use crate::plugin::ExternalCommand;

/// Where a command definition came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSource {
    BuiltIn,
    User(PathBuf),
}

impl fmt::Display for CommandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSource::BuiltIn => f.write_str("built-in"),
            CommandSource::User(path) => write!(f, "user: {}", path.display()),
        }
    }
}

/// What runs when a command is invoked
#[derive(Debug, Clone, PartialEq)]
pub enum Handler {
    Builtin(BuiltinCommand),
    External(ExternalCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandDescriptor {
    pub name: String,
    pub description: String,
    pub help: Option<String>,
    /// Number of required positional arguments
    pub arity: usize,
    pub source: CommandSource,
    pub handler: Handler,
}

impl CommandDescriptor {
    /// Help text shown for `--help` and on missing arguments
    pub fn help_text(&self) -> String {
        match (&self.handler, &self.help) {
            (_, Some(help)) => help.clone(),
            (Handler::Builtin(cmd), None) => cmd.help().to_string(),
            (Handler::External(ext), None) => format!(
                "{}: {}\n\nUsage:\n\n    {} {}{}\n\nRuns {}",
                self.name.to_uppercase(),
                self.description,
                crate::cli::BIN_NAME,
                self.name,
                " {arg}".repeat(self.arity),
                ext.program().display()
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: BTreeMap<String, CommandDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in command
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for cmd in BuiltinCommand::ALL {
            registry.register(cmd.descriptor());
        }
        registry
    }

    /// Inserts a descriptor, returning the one it replaced
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Option<CommandDescriptor> {
        self.commands.insert(descriptor.name.clone(), descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    /// Command names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.values()
    }
}
