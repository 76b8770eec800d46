//! Command table the shell dispatches through.

use std::collections::hash_map::{Entry, HashMap};

use once_cell::sync::Lazy;

use super::context::ShellContext;
use super::error::CommandResult;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// One shell command with its help text and the words that invoke it.
pub struct CommandEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            description,
            usage,
            handler,
        }
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// The name followed by every alias.
    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

/// Commands in help order, indexed by every word that invokes them.
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    lookup: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    /// Builds the table. A word claimed by an earlier entry stays with it; an
    /// entry left with no words of its own is dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = CommandEntry>) -> Self {
        let mut registry = Self {
            entries: Vec::new(),
            lookup: HashMap::new(),
        };
        for entry in entries {
            let index = registry.entries.len();
            let words: Vec<&'static str> = entry.words().collect();
            let mut claimed = false;
            for word in words {
                match registry.lookup.entry(word) {
                    Entry::Vacant(slot) => {
                        slot.insert(index);
                        claimed = true;
                    }
                    Entry::Occupied(_) => {
                        tracing::warn!(command = word, "command word already registered")
                    }
                }
            }
            if claimed {
                registry.entries.push(entry);
            }
        }
        registry
    }

    /// Finds the command for `word`, ignoring case.
    pub fn resolve(&self, word: &str) -> Option<&CommandEntry> {
        self.lookup
            .get(word.to_lowercase().as_str())
            .map(|&index| &self.entries[index])
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Every invocable word; feeds completion and typo suggestions.
    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().flat_map(|entry| entry.words())
    }
}

pub(crate) static REGISTRY: Lazy<CommandRegistry> =
    Lazy::new(|| CommandRegistry::from_entries(super::commands::definitions()));
