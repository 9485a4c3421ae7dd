//! Knowledge-base domain types.
//!
//! Entries are short text snippets keyed by title. They come from three
//! places: typed in by an operator, scraped from a URL, or extracted from an
//! uploaded document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a knowledge entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Manual,
    Url,
    Document,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Manual => "manual",
            SourceKind::Url => "url",
            SourceKind::Document => "document",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single searchable snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Unique key; re-adding a title replaces the previous entry
    pub title: String,

    /// The searchable text
    pub content: String,

    /// Origin of the entry
    pub source: SourceKind,

    /// Source-specific details (URL, filename, stats)
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// When the entry was (last) added
    pub added_at: DateTime<Utc>,
}

impl KnowledgeEntry {
    pub fn new(title: impl Into<String>, content: impl Into<String>, source: SourceKind) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source,
            metadata: serde_json::Map::new(),
            added_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// One line in the "sources" history shown by `knowledge_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    pub kind: SourceKind,
    pub title: String,
    /// URL or filename, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Static company facts searched alongside the stored entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub contact: String,
}

impl CompanyInfo {
    /// Non-empty fields as `(label, text)` pairs.
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        let label = |field: &str| {
            if self.name.is_empty() {
                format!("Company {field}")
            } else {
                format!("{} {field}", self.name)
            }
        };

        if !self.description.is_empty() {
            fields.push((label("overview"), self.description.clone()));
        }
        if !self.services.is_empty() {
            fields.push((label("services"), self.services.join(", ")));
        }
        if !self.values.is_empty() {
            fields.push((label("values"), self.values.join(", ")));
        }
        if !self.contact.is_empty() {
            fields.push((label("contact"), self.contact.clone()));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_source_lowercase() {
        let entry = KnowledgeEntry::new("About", "We build things", SourceKind::Url)
            .with_metadata("url", serde_json::json!("https://example.com"));
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"source\":\"url\""));
        assert!(json.contains("https://example.com"));
    }

    #[test]
    fn company_fields_skip_empty() {
        let info = CompanyInfo {
            name: "Acme".into(),
            services: vec!["Design".into(), "Staffing".into()],
            ..CompanyInfo::default()
        };
        let fields = info.fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "Acme services");
        assert_eq!(fields[0].1, "Design, Staffing");
    }
}
