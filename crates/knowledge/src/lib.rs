//! Knowledge base for brandbot.
//!
//! A small title-keyed store of snippets that gets merged into prompts,
//! plus the two ways of feeding it besides typing: scraping a URL and
//! extracting an uploaded document.

pub mod document;
pub mod scrape;
pub mod store;

pub use document::{DocumentType, ExtractedDocument};
pub use scrape::{ScrapedPage, Scraper};
pub use store::{KnowledgeBase, KnowledgeSummary, Snippet};
