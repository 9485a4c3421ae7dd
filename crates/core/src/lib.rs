//! # brandbot Core
//!
//! Domain types, traits, and error definitions for the brandbot assistant.
//! This crate has **no framework dependencies**: it defines the model that
//! the provider, knowledge, agent and channel crates implement against.
//!
//! ## Layout
//!
//! - [`provider`]: the `Provider` trait every LLM backend implements
//! - [`brand`]: the immutable brand record injected into every prompt
//! - [`knowledge`]: knowledge-base entries and company facts
//! - [`error`]: one error enum per bounded context, plus [`ErrorKind`]

pub mod brand;
pub mod error;
pub mod knowledge;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use brand::BrandConfig;
pub use error::{
    CommandError, ErrorKind, KnowledgeError, ProviderAttempt, ProviderError, ResolveError,
};
pub use knowledge::{CompanyInfo, KnowledgeEntry, SourceKind, SourceRecord};
pub use message::{Message, Role};
pub use provider::{ImageGenerator, Provider, ProviderKind, ProviderRequest, ProviderResponse, Usage};
