//! Slash-command definitions.
//!
//! Agent commands are data: a template, options and a presentation, all
//! run by one generic implementation. Utility commands (knowledge, help,
//! status, image generation) have their own handlers in the router.

pub mod catalog;
pub mod template;

use crate::prompts::AgentKind;
use brandbot_core::error::CommandError;
use std::collections::BTreeMap;

pub use catalog::{AGENT_COMMANDS, Command, UTILITY_COMMANDS, UtilityKind, all_specs, find};

/// The value type Discord should collect for an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Integer,
    Attachment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OptionKind,
    pub required: bool,
    pub default: Option<&'static str>,
}

impl OptionSpec {
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: OptionKind::String,
            required: true,
            default: None,
        }
    }

    pub const fn optional(
        name: &'static str,
        description: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            kind: OptionKind::String,
            required: false,
            default: Some(default),
        }
    }

    pub const fn integer(mut self) -> Self {
        self.kind = OptionKind::Integer;
        self
    }

    pub const fn attachment(mut self) -> Self {
        self.kind = OptionKind::Attachment;
        self
    }
}

/// How an agent command lays out the model's text.
#[derive(Debug, Clone, Copy)]
pub enum Presentation {
    /// One field, cut to fit, plus an optional hint field.
    Single {
        label: &'static str,
        next_steps: Option<&'static str>,
    },
    /// Continuation fields up to the configured maximum, then a file.
    Chunked {
        label: &'static str,
        next_steps: Option<&'static str>,
        /// Shows an option's value in its own field when it was given.
        echo: Option<(&'static str, &'static str)>,
        footer: Option<&'static str>,
    },
    /// The full text as a file plus a preview field.
    File {
        label: &'static str,
        preview_chars: usize,
        filename: &'static str,
        heading: &'static str,
    },
}

/// An LLM-backed command.
#[derive(Debug, Clone, Copy)]
pub struct AgentCommand {
    pub name: &'static str,
    pub description: &'static str,
    pub agent: AgentKind,
    pub options: &'static [OptionSpec],
    pub example: &'static str,
    pub title: &'static str,
    /// Embed description; `{option}` placeholders are filled.
    pub summary: &'static str,
    /// The user request sent to the model.
    pub template: &'static str,
    pub presentation: Presentation,
}

/// Catalog metadata for any command, used for registration and help.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: &'static [OptionSpec],
    pub example: &'static str,
}

impl From<&AgentCommand> for CommandSpec {
    fn from(cmd: &AgentCommand) -> Self {
        Self {
            name: cmd.name,
            description: cmd.description,
            options: cmd.options,
            example: cmd.example,
        }
    }
}

/// Option values as text, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    values: BTreeMap<String, String>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// A non-blank value or `MissingArgument`.
    pub fn require(&self, name: &str) -> Result<&str, CommandError> {
        self.get(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))
    }

    /// Check required options and fill in defaults for the rest.
    pub fn resolve(&self, options: &[OptionSpec]) -> Result<Args, CommandError> {
        let mut resolved = self.clone();
        for option in options.iter().filter(|o| o.kind != OptionKind::Attachment) {
            let given = self.get(option.name).filter(|v| !v.trim().is_empty());
            match (given, option.required, option.default) {
                (Some(_), _, _) => {}
                (None, true, _) => return Err(CommandError::MissingArgument(option.name.into())),
                (None, false, Some(default)) => resolved.insert(option.name, default),
                (None, false, None) => resolved.insert(option.name, ""),
            }
        }
        Ok(resolved)
    }
}

/// A file uploaded with the command.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// One command call, independent of the chat surface.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: String,
    pub args: Args,
    pub upload: Option<Upload>,
}

impl Invocation {
    pub fn new(command: impl Into<String>, args: Args) -> Self {
        Self {
            command: command.into(),
            args,
            upload: None,
        }
    }

    pub fn with_upload(mut self, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.upload = Some(Upload {
            filename: filename.into(),
            bytes,
        });
        self
    }
}
