//! Chat surfaces for brandbot.
//!
//! Only Discord is supported. The adapter owns everything Discord-specific
//! (command registration, option decoding, embeds, attachments) and hands
//! surface-neutral [`Invocation`](brandbot_agent::Invocation)s to the router.

pub mod discord;

pub use discord::{DiscordBot, create_commands, embed_for, error_reply, run};
