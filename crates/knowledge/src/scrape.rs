//! Fetch a web page and pull out the text worth remembering.
//!
//! Deliberately shallow: regex extraction of title, meta description,
//! headings, paragraphs and links. No JavaScript, no readability scoring.

use brandbot_core::error::KnowledgeError;
use brandbot_core::knowledge::{KnowledgeEntry, SourceKind};
use regex_lite::Regex;
use std::time::Duration;
use tracing::{debug, info};

/// Stored content is capped so one page cannot dominate the file.
const MAX_STORED_CHARS: usize = 20_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedPage {
    pub url: String,
    pub title: String,
    pub meta_description: Option<String>,
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    pub links: Vec<String>,
}

impl ScrapedPage {
    /// Searchable text: title, description, headings, then paragraphs.
    pub fn text(&self) -> String {
        let mut parts = vec![self.title.clone()];
        parts.extend(self.meta_description.clone());
        parts.extend(self.headings.iter().cloned());
        parts.extend(self.paragraphs.iter().cloned());
        let text = parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        text.chars().take(MAX_STORED_CHARS).collect()
    }

    pub fn to_entry(&self) -> KnowledgeEntry {
        let title = if self.title.is_empty() {
            self.url.clone()
        } else {
            self.title.clone()
        };
        KnowledgeEntry::new(title, self.text(), SourceKind::Url)
            .with_metadata("url", serde_json::json!(self.url))
            .with_metadata("headings", serde_json::json!(self.headings.len()))
            .with_metadata("paragraphs", serde_json::json!(self.paragraphs.len()))
            .with_metadata("links", serde_json::json!(self.links.len()))
    }
}

pub struct Scraper {
    client: reqwest::Client,
}

impl Scraper {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("brandbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> Result<ScrapedPage, KnowledgeError> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(KnowledgeError::Unsupported(format!(
                "'{url}' is not an http(s) URL"
            )));
        }

        debug!(url, "Fetching page");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| KnowledgeError::Fetch {
                url: url.into(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(KnowledgeError::Fetch {
                url: url.into(),
                reason: format!("HTTP {status}"),
            });
        }

        let html = response.text().await.map_err(|e| KnowledgeError::Fetch {
            url: url.into(),
            reason: e.to_string(),
        })?;

        let page = parse_html(url, &html);
        if page.title.is_empty() && page.paragraphs.is_empty() && page.headings.is_empty() {
            return Err(KnowledgeError::Extract {
                source_name: url.into(),
                reason: "no readable text found".into(),
            });
        }

        info!(
            url,
            headings = page.headings.len(),
            paragraphs = page.paragraphs.len(),
            links = page.links.len(),
            "Page scraped"
        );
        Ok(page)
    }
}

/// Extract the interesting parts of an HTML document.
pub fn parse_html(url: &str, html: &str) -> ScrapedPage {
    let html = remove_blocks(html);

    let title = first_capture(r"(?is)<title[^>]*>(.*?)</title>", &html)
        .map(|t| clean_text(&t))
        .unwrap_or_default();

    let meta_description = all_captures(r#"(?is)<meta\s[^>]*>"#, &html, 0)
        .into_iter()
        .find(|tag| {
            Regex::new(r#"(?i)name\s*=\s*["']description["']"#).is_ok_and(|re| re.is_match(tag))
        })
        .and_then(|tag| first_capture(r#"(?is)content\s*=\s*["']([^"']*)["']"#, &tag))
        .map(|d| clean_text(&d))
        .filter(|d| !d.is_empty());

    let headings = non_empty(all_captures(r"(?is)<h[1-6][^>]*>(.*?)</h[1-6]>", &html, 1));
    let paragraphs = non_empty(all_captures(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>", &html, 1));
    let links = all_captures(r#"(?is)<a\s[^>]*href\s*=\s*["']([^"']+)["']"#, &html, 1)
        .into_iter()
        .filter(|href| !href.starts_with('#') && !href.starts_with("javascript:"))
        .collect();

    ScrapedPage {
        url: url.to_string(),
        title,
        meta_description,
        headings,
        paragraphs,
        links,
    }
}

fn remove_blocks(html: &str) -> String {
    let mut out = html.to_string();
    for pattern in [
        r"(?is)<script[^>]*>.*?</script>",
        r"(?is)<style[^>]*>.*?</style>",
        r"(?s)<!--.*?-->",
    ] {
        if let Ok(re) = Regex::new(pattern) {
            out = re.replace_all(&out, " ").into_owned();
        }
    }
    out
}

fn first_capture(pattern: &str, text: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn all_captures(pattern: &str, text: &str, group: usize) -> Vec<String> {
    let Ok(re) = Regex::new(pattern) else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|c| c.get(group).map(|m| m.as_str().to_string()))
        .collect()
}

fn non_empty(raw: Vec<String>) -> Vec<String> {
    raw.iter()
        .map(|s| clean_text(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Strip tags, decode the common entities and collapse whitespace.
pub fn clean_text(fragment: &str) -> String {
    let stripped = match Regex::new(r"(?s)<[^>]*>") {
        Ok(re) => re.replace_all(fragment, " ").into_owned(),
        Err(_) => fragment.to_string(),
    };
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
