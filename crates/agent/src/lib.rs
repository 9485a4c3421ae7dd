//! Command handling for brandbot.
//!
//! A command goes through the same steps whatever surface it came from:
//!
//! 1. **Resolve** options against the command's declared defaults
//! 2. **Fill** the command template with option values and brand variables
//! 3. **Assemble** the prompt: brand context, agent role, knowledge snippets
//! 4. **Resolve** a completion through the provider fallback chain
//! 5. **Lay out** the text as a [`Reply`] that respects embed limits
//!
//! Utility commands (knowledge management, help, health) skip 2-4.

pub mod assembler;
pub mod commands;
pub mod prompts;
pub mod response;
pub mod router;

pub use assembler::{AssembledPrompt, PromptAssembler};
pub use commands::{AgentCommand, Args, CommandSpec, Invocation, OptionKind, OptionSpec, Upload};
pub use prompts::{AgentKind, AgentPromptSet};
pub use response::{Attachment, Reply, ReplyField};
pub use router::{BotContext, CommandRouter};
