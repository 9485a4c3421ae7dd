//! The knowledge base: a title-keyed set of snippets persisted as one JSON file.
//!
//! Entries are loaded into memory on creation and the whole file is
//! rewritten after every mutation, while the write lock is still held.
//! Storage location defaults to `~/.brandbot/knowledge.json`.

use brandbot_config::KnowledgeConfig;
use brandbot_core::error::KnowledgeError;
use brandbot_core::knowledge::{CompanyInfo, KnowledgeEntry, SourceKind, SourceRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Shortest word treated as a search keyword.
const MIN_KEYWORD_CHARS: usize = 4;

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct KnowledgeData {
    #[serde(default)]
    sources: Vec<SourceRecord>,
    #[serde(default)]
    entries: BTreeMap<String, KnowledgeEntry>,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
}

/// A search hit: a stored entry or one of the company facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub title: String,
    pub content: String,
}

impl Snippet {
    fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.content.to_lowercase().contains(needle_lower)
    }
}

/// Counts shown by `knowledge_status`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeSummary {
    pub urls: usize,
    pub documents: usize,
    pub manual: usize,
    pub total: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

pub struct KnowledgeBase {
    path: Option<PathBuf>,
    company: CompanyInfo,
    max_results: usize,
    snippet_chars: usize,
    data: Arc<RwLock<KnowledgeData>>,
}

impl KnowledgeBase {
    /// Open a file-backed knowledge base. A missing or unreadable file
    /// starts empty; the file is created on first write.
    pub fn open(path: PathBuf, company: CompanyInfo) -> Self {
        let data = Self::load_from_disk(&path);
        debug!(path = %path.display(), count = data.entries.len(), "Knowledge base loaded");
        Self {
            path: Some(path),
            company,
            max_results: 3,
            snippet_chars: 200,
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// A knowledge base that never touches disk.
    pub fn in_memory(company: CompanyInfo) -> Self {
        Self {
            path: None,
            company,
            max_results: 3,
            snippet_chars: 200,
            data: Arc::new(RwLock::new(KnowledgeData::default())),
        }
    }

    pub fn from_config(config: &KnowledgeConfig, company: CompanyInfo) -> Self {
        let kb = if config.persist {
            Self::open(config.resolved_path(), company)
        } else {
            Self::in_memory(company)
        };
        kb.with_limits(config.max_results, config.snippet_chars)
    }

    pub fn with_limits(mut self, max_results: usize, snippet_chars: usize) -> Self {
        self.max_results = max_results.max(1);
        self.snippet_chars = snippet_chars;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn load_from_disk(path: &Path) -> KnowledgeData {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return KnowledgeData::default(), // not written yet
        };

        match serde_json::from_str(&content) {
            Ok(data) => data,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt knowledge file, starting empty");
                KnowledgeData::default()
            }
        }
    }

    /// Rewrite the whole file. Called with the write guard held.
    fn flush(&self, data: &KnowledgeData) -> Result<(), KnowledgeError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                KnowledgeError::Storage(format!("Failed to create knowledge directory: {e}"))
            })?;
        }

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| KnowledgeError::Storage(format!("Failed to serialize knowledge base: {e}")))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .and_then(|()| std::fs::rename(&tmp, path))
            .map_err(|e| KnowledgeError::Storage(format!("Failed to write knowledge file: {e}")))
    }

    /// Add an entry, replacing any entry with the same title. Returns
    /// whether an entry was replaced.
    pub async fn add_entry(
        &self,
        entry: KnowledgeEntry,
        location: Option<String>,
    ) -> Result<bool, KnowledgeError> {
        let mut data = self.data.write().await;
        let now = Utc::now();

        data.sources.retain(|s| s.title != entry.title);
        data.sources.push(SourceRecord {
            kind: entry.source,
            title: entry.title.clone(),
            location,
            added_at: now,
        });
        let replaced = data.entries.insert(entry.title.clone(), entry).is_some();
        data.last_updated = Some(now);

        self.flush(&data)?;
        info!(count = data.entries.len(), replaced, "Knowledge entry stored");
        Ok(replaced)
    }

    pub async fn get(&self, title: &str) -> Option<KnowledgeEntry> {
        self.data.read().await.entries.get(title).cloned()
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.entries.is_empty()
    }

    /// Case-insensitive substring search over titles, content and company facts.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<Snippet> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        self.candidates()
            .await
            .into_iter()
            .filter(|s| s.matches(&needle))
            .take(limit)
            .collect()
    }

    /// Search the whole request first, then each keyword in turn.
    pub async fn search_request(&self, request: &str, limit: usize) -> Vec<Snippet> {
        let hits = self.search(request, limit).await;
        if !hits.is_empty() {
            return hits;
        }

        let candidates = self.candidates().await;
        let mut hits: Vec<Snippet> = Vec::new();
        for keyword in keywords(request) {
            for snippet in candidates.iter().filter(|s| s.matches(&keyword)) {
                if hits.len() >= limit {
                    return hits;
                }
                if !hits.iter().any(|h| h.title == snippet.title) {
                    hits.push(snippet.clone());
                }
            }
        }
        hits
    }

    /// The "Relevant Knowledge Base Information" block for a request, if
    /// anything matches.
    pub async fn context_for(&self, request: &str) -> Option<String> {
        let hits = self.search_request(request, self.max_results).await;
        if hits.is_empty() {
            return None;
        }

        let mut block = String::from("Relevant Knowledge Base Information:\n");
        for hit in hits {
            block.push_str(&format!(
                "- {}: {}\n",
                hit.title,
                truncate_chars(&hit.content, self.snippet_chars)
            ));
        }
        Some(block)
    }

    pub async fn summary(&self) -> KnowledgeSummary {
        let data = self.data.read().await;
        let count = |kind: SourceKind| data.entries.values().filter(|e| e.source == kind).count();
        KnowledgeSummary {
            urls: count(SourceKind::Url),
            documents: count(SourceKind::Document),
            manual: count(SourceKind::Manual),
            total: data.entries.len(),
            last_updated: data.last_updated,
        }
    }

    /// The oldest `limit` sources, in insertion order.
    pub async fn sources(&self, limit: usize) -> Vec<SourceRecord> {
        self.data.read().await.sources.iter().take(limit).cloned().collect()
    }

    async fn candidates(&self) -> Vec<Snippet> {
        let data = self.data.read().await;
        data.entries
            .values()
            .map(|e| Snippet {
                title: e.title.clone(),
                content: e.content.clone(),
            })
            .chain(
                self.company
                    .fields()
                    .into_iter()
                    .map(|(title, content)| Snippet { title, content }),
            )
            .collect()
    }
}

/// Lowercase words of at least four characters, de-duplicated, in order.
pub fn keywords(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS)
        .map(str::to_lowercase)
    {
        if !out.contains(&word) {
            out.push(word);
        }
    }
    out
}

/// Keep at most `max` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn manual(title: &str, content: &str) -> KnowledgeEntry {
        KnowledgeEntry::new(title, content, SourceKind::Manual)
    }

    #[tokio::test]
    async fn add_and_reload_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb").join("knowledge.json");

        let kb = KnowledgeBase::open(path.clone(), CompanyInfo::default());
        kb.add_entry(manual("Pricing", "Plans start at $10"), None).await.unwrap();
        kb.add_entry(
            KnowledgeEntry::new("About", "We staff teams", SourceKind::Url),
            Some("https://example.com".into()),
        )
        .await
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Plans start at $10"));

        let reloaded = KnowledgeBase::open(path, CompanyInfo::default());
        assert_eq!(reloaded.len().await, 2);
        let sources = reloaded.sources(10).await;
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].location.as_deref(), Some("https://example.com"));
        assert!(reloaded.summary().await.last_updated.is_some());
    }

    #[tokio::test]
    async fn same_title_replaces() {
        let kb = KnowledgeBase::in_memory(CompanyInfo::default());
        assert!(!kb.add_entry(manual("Hours", "9 to 5"), None).await.unwrap());
        assert!(kb.add_entry(manual("Hours", "24/7"), None).await.unwrap());

        assert_eq!(kb.len().await, 1);
        assert_eq!(kb.get("Hours").await.unwrap().content, "24/7");
        assert_eq!(kb.sources(10).await.len(), 1);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_capped() {
        let kb = KnowledgeBase::in_memory(CompanyInfo::default());
        for i in 0..5 {
            kb.add_entry(manual(&format!("Rust note {i}"), "systems"), None).await.unwrap();
        }
        kb.add_entry(manual("Python", "scripting"), None).await.unwrap();

        let hits = kb.search("RUST", 3).await;
        assert_eq!(hits.len(), 3);
        for hit in &hits {
            assert!(hit.title.to_lowercase().contains("rust"));
        }
    }

    #[tokio::test]
    async fn search_includes_company_fields() {
        let company = CompanyInfo {
            name: "Acme".into(),
            services: vec!["Virtual assistants".into()],
            ..CompanyInfo::default()
        };
        let kb = KnowledgeBase::in_memory(company);
        let hits = kb.search("virtual", 3).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Acme services");
    }

    #[tokio::test]
    async fn keyword_fallback_when_phrase_misses() {
        let kb = KnowledgeBase::in_memory(CompanyInfo::default());
        kb.add_entry(manual("Pricing", "Plans start at $10"), None).await.unwrap();
        kb.add_entry(manual("Team", "Our team is remote"), None).await.unwrap();

        assert!(kb.search("what are your pricing plans", 3).await.is_empty());
        let hits = kb.search_request("what are your pricing plans", 3).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Pricing");
    }

    #[tokio::test]
    async fn context_block_truncates_snippets() {
        let kb = KnowledgeBase::in_memory(CompanyInfo::default()).with_limits(3, 10);
        kb.add_entry(manual("Mission", "Empower every small business online"), None)
            .await
            .unwrap();

        let block = kb.context_for("mission").await.unwrap();
        assert!(block.starts_with("Relevant Knowledge Base Information:"));
        assert!(block.contains("- Mission: Empower ev..."));
        assert!(kb.context_for("unrelated").await.is_none());
    }

    #[tokio::test]
    async fn summary_counts_by_source() {
        let kb = KnowledgeBase::in_memory(CompanyInfo::default());
        kb.add_entry(manual("a", "x"), None).await.unwrap();
        kb.add_entry(KnowledgeEntry::new("b", "y", SourceKind::Url), None).await.unwrap();
        kb.add_entry(KnowledgeEntry::new("c", "z", SourceKind::Document), None).await.unwrap();
        kb.add_entry(KnowledgeEntry::new("d", "w", SourceKind::Url), None).await.unwrap();

        let summary = kb.summary().await;
        assert_eq!(summary.urls, 2);
        assert_eq!(summary.documents, 1);
        assert_eq!(summary.manual, 1);
        assert_eq!(summary.total, 4);
    }

    #[tokio::test]
    async fn handles_missing_file_gracefully() {
        let dir = tempfile::tempdir().unwrap();
        let kb = KnowledgeBase::open(dir.path().join("absent.json"), CompanyInfo::default());
        assert!(kb.is_empty().await);
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "this is not json").unwrap();
        let kb = KnowledgeBase::open(tmp.path().to_path_buf(), CompanyInfo::default());
        assert!(kb.is_empty().await);
    }

    #[test]
    fn keyword_extraction() {
        assert_eq!(
            keywords("Tell me about the Pricing, pricing and team"),
            vec!["tell", "about", "pricing", "team"]
        );
    }

    #[test]
    fn truncation_counts_chars() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_chars("short", 10), "short");
    }
}
