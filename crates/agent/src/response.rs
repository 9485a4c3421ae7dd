//! Channel-neutral reply model and the text layout rules for it.
//!
//! A [`Reply`] maps one-to-one onto a Discord embed plus an optional file,
//! but nothing here depends on Discord.

use serde::Serialize;

/// Discord limits, applied to every reply.
pub const TITLE_LIMIT: usize = 256;
pub const DESCRIPTION_LIMIT: usize = 4096;
pub const FIELD_NAME_LIMIT: usize = 256;
pub const FOOTER_LIMIT: usize = 2048;
/// Title, description, field names and values, and footer combined.
pub const EMBED_TOTAL_LIMIT: usize = 6000;

/// Description length kept when a reply has to shrink to fit.
pub const SUMMARY_BUDGET: usize = 1024;

const OVERFLOW_FIELD: &str = "📎 Full Response";

/// Placeholder for an empty model response.
pub const EMPTY_CONTENT: &str = "_No content returned._";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A text file sent alongside the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub title: String,
    pub description: Option<String>,
    pub color: u32,
    pub fields: Vec<ReplyField>,
    pub footer: Option<String>,
    pub attachment: Option<Attachment>,
    pub image_url: Option<String>,
}

impl Reply {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: fit(&title.into(), TITLE_LIMIT),
            description: None,
            color,
            fields: Vec::new(),
            footer: None,
            attachment: None,
            image_url: None,
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(fit(&text.into(), DESCRIPTION_LIMIT));
        self
    }

    /// Add a field; empty values get the placeholder, long ones are cut.
    pub fn field(mut self, name: impl Into<String>, value: impl AsRef<str>, limit: usize) -> Self {
        let value = value.as_ref();
        let value = if value.trim().is_empty() {
            EMPTY_CONTENT.to_string()
        } else {
            fit(value, limit)
        };
        self.fields.push(ReplyField {
            name: fit(&name.into(), FIELD_NAME_LIMIT),
            value,
            inline: false,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(fit(&text.into(), FOOTER_LIMIT));
        self
    }

    pub fn attach(mut self, filename: impl Into<String>, content: impl Into<String>) -> Self {
        self.attachment = Some(Attachment {
            filename: filename.into(),
            content: content.into(),
        });
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Lay `text` out as `label`, `label (Continued 2)`, ... fields.
    ///
    /// Text that needs more than `max_fields` fields is attached in full as
    /// `overflow_file`, and a final field says so.
    pub fn chunked_fields(
        mut self,
        label: &str,
        text: &str,
        limit: usize,
        max_fields: usize,
        overflow_file: &str,
    ) -> Self {
        if text.trim().is_empty() {
            return self.field(label, EMPTY_CONTENT, limit);
        }

        let chunks = chunk_text(text, limit);
        let overflow = chunks.len() > max_fields;

        for (i, chunk) in chunks.into_iter().take(max_fields.max(1)).enumerate() {
            let name = if i == 0 {
                label.to_string()
            } else {
                format!("{label} (Continued {})", i + 1)
            };
            self = self.field(name, chunk, limit);
        }

        if overflow {
            self = self
                .field(
                    OVERFLOW_FIELD,
                    format!("The response was too long to show here. The full text is attached as `{overflow_file}`."),
                    limit,
                )
                .attach(overflow_file, text);
        }
        self
    }

    /// Characters Discord counts against [`EMBED_TOTAL_LIMIT`].
    pub fn embed_chars(&self) -> usize {
        let count = |s: &str| s.chars().count();
        count(&self.title)
            + self.description.as_deref().map_or(0, count)
            + self.footer.as_deref().map_or(0, count)
            + self
                .fields
                .iter()
                .map(|f| count(&f.name) + count(&f.value))
                .sum::<usize>()
    }

    /// Shrink the reply until the whole embed fits.
    ///
    /// The description is cut to [`SUMMARY_BUDGET`] first. If that is not
    /// enough, trailing fields are dropped and a note points at the
    /// attachment. A reply without one gets its full text attached as
    /// `overflow_file`.
    pub fn within_embed_limit(mut self, overflow_file: &str) -> Self {
        if self.embed_chars() <= EMBED_TOTAL_LIMIT {
            return self;
        }
        let full_text = self.to_plain_text();

        if let Some(description) = self.description.take() {
            self.description = Some(fit(&description, SUMMARY_BUDGET));
        }
        if self.embed_chars() <= EMBED_TOTAL_LIMIT {
            return self;
        }

        let filename = match self.attachment.as_ref().map(|f| f.filename.clone()) {
            Some(filename) => filename,
            None => {
                self = self.attach(overflow_file, full_text);
                overflow_file.to_string()
            }
        };
        let note = ReplyField {
            name: OVERFLOW_FIELD.to_string(),
            value: format!("Part of this reply did not fit. The full text is attached as `{filename}`."),
            inline: false,
        };
        let note_chars = note.name.chars().count() + note.value.chars().count();

        self.fields.retain(|f| f.name != OVERFLOW_FIELD);
        while !self.fields.is_empty() && self.embed_chars() + note_chars > EMBED_TOTAL_LIMIT {
            self.fields.pop();
        }
        self.fields.push(note);
        self
    }

    /// Plain-text rendering for terminals and logs.
    pub fn to_plain_text(&self) -> String {
        let mut out = format!("{}\n", self.title);
        if let Some(description) = &self.description {
            out.push_str(&format!("{description}\n"));
        }
        for field in &self.fields {
            out.push_str(&format!("\n## {}\n{}\n", field.name, field.value));
        }
        if let Some(url) = &self.image_url {
            out.push_str(&format!("\nImage: {url}\n"));
        }
        if let Some(file) = &self.attachment {
            out.push_str(&format!("\nAttachment: {} ({} chars)\n", file.filename, file.content.chars().count()));
        }
        if let Some(footer) = &self.footer {
            out.push_str(&format!("\n{footer}\n"));
        }
        out
    }
}

/// Split `text` into slices of at most `limit` characters (not bytes).
pub fn chunk_text(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// `text` if it fits in `limit` characters, else its head plus `...`
/// (the result never exceeds `limit`).
pub fn fit(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let head: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{head}...")
}

/// The first `chars` characters plus `...` when the text is longer.
pub fn preview(text: &str, chars: usize) -> String {
    let mut iter = text.chars();
    let head: String = iter.by_ref().take(chars).collect();
    if iter.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Make a value safe to use inside a filename.
pub fn file_slug(value: &str) -> String {
    let slug: String = value
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    let slug = slug.trim_matches(|c| c == '_' || c == '.').to_string();
    if slug.is_empty() {
        "untitled".into()
    } else {
        slug.chars().take(60).collect()
    }
}

/// `case_study` → `Case Study`.
pub fn display_name(command: &str) -> String {
    command
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_boundaries() {
        assert_eq!(chunk_text(&"a".repeat(1024), 1024).len(), 1);
        let chunks = chunk_text(&"a".repeat(1025), 1024);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], "a");
    }

    #[test]
    fn chunks_split_on_chars_not_bytes() {
        let text = "é".repeat(1500);
        let chunks = chunk_text(&text, 1024);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 1024);
        assert_eq!(chunks[1].chars().count(), 476);
    }

    #[test]
    fn chunked_fields_name_continuations() {
        let reply = Reply::new("t", 0).chunked_fields("📋 Brand Guidance", &"x".repeat(2100), 1024, 3, "brand.md");
        let names: Vec<&str> = reply.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["📋 Brand Guidance", "📋 Brand Guidance (Continued 2)", "📋 Brand Guidance (Continued 3)"]
        );
        assert!(reply.attachment.is_none());
    }

    #[test]
    fn overflow_is_attached_not_dropped() {
        let text = "y".repeat(1024 * 4 + 10);
        let reply = Reply::new("t", 0).chunked_fields("Answer", &text, 1024, 3, "ask_response.md");

        assert_eq!(reply.fields.len(), 4);
        assert!(reply.fields[3].value.contains("ask_response.md"));
        let file = reply.attachment.unwrap();
        assert_eq!(file.filename, "ask_response.md");
        assert_eq!(file.content, text);
    }

    #[test]
    fn small_reply_is_untouched() {
        let reply = Reply::new("t", 0).description("d").field("A", "a", 1024);
        assert_eq!(reply.clone().within_embed_limit("x.md"), reply);
    }

    #[test]
    fn long_description_is_cut_before_fields() {
        let answer = "r".repeat(3000);
        let reply = Reply::new("🛡️ Brand Guardian Review", 0)
            .description("p".repeat(3000))
            .chunked_fields("Review", &answer, 1024, 3, "brand_guardian_response.md")
            .field("💡 Next Steps", "Apply the suggested edits", 1024)
            .footer("Brand Assistant")
            .within_embed_limit("brand_guardian_response.md");

        assert!(reply.embed_chars() <= EMBED_TOTAL_LIMIT);
        assert_eq!(reply.description.as_ref().unwrap().chars().count(), SUMMARY_BUDGET);
        let shown: String = reply.fields[..3].iter().map(|f| f.value.as_str()).collect();
        assert_eq!(shown, answer);
        assert!(reply.attachment.is_none());
    }

    #[test]
    fn many_fields_fall_back_to_attachment() {
        let answer = "y".repeat(1024 * 8);
        let reply = Reply::new("t", 0)
            .description("d".repeat(4000))
            .chunked_fields("Answer", &answer, 1024, 6, "ask_response.md")
            .field("🏷️ Echo", "e".repeat(1024), 1024)
            .footer("f".repeat(500))
            .within_embed_limit("ask_response.md");

        assert!(reply.embed_chars() <= EMBED_TOTAL_LIMIT);
        assert_eq!(reply.attachment.as_ref().unwrap().content, answer);
        let last = reply.fields.last().unwrap();
        assert_eq!(last.name, "📎 Full Response");
        assert!(last.value.contains("ask_response.md"));
        assert_eq!(reply.fields.iter().filter(|f| f.name == "📎 Full Response").count(), 1);
    }

    #[test]
    fn unattached_overflow_gets_a_file() {
        let reply = Reply::new("Title", 0)
            .description("d".repeat(1000))
            .field("A", "a".repeat(1024), 1024)
            .field("B", "b".repeat(1024), 1024)
            .field("C", "c".repeat(1024), 1024)
            .field("D", "d".repeat(1024), 1024)
            .field("E", "e".repeat(1024), 1024)
            .within_embed_limit("status_response.md");

        assert!(reply.embed_chars() <= EMBED_TOTAL_LIMIT);
        let file = reply.attachment.unwrap();
        assert_eq!(file.filename, "status_response.md");
        assert!(file.content.contains(&"e".repeat(1024)));
    }

    #[test]
    fn empty_text_gets_placeholder() {
        let reply = Reply::new("t", 0).chunked_fields("Answer", "  \n", 1024, 3, "x.md");
        assert_eq!(reply.fields.len(), 1);
        assert_eq!(reply.fields[0].value, EMPTY_CONTENT);
    }

    #[test]
    fn fit_never_exceeds_limit() {
        let long = "z".repeat(2000);
        let fitted = fit(&long, 1024);
        assert_eq!(fitted.chars().count(), 1024);
        assert!(fitted.ends_with("..."));
        assert_eq!(fit("short", 1024), "short");
    }

    #[test]
    fn preview_marks_truncation() {
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
    }

    #[test]
    fn slugs_and_names() {
        assert_eq!(file_slug("AI in business"), "AI_in_business");
        assert_eq!(file_slug("../etc/passwd"), "etc_passwd");
        assert_eq!(file_slug("   "), "untitled");
        assert_eq!(display_name("case_study"), "Case Study");
        assert_eq!(display_name("brand"), "Brand");
    }

    #[test]
    fn plain_text_rendering() {
        let reply = Reply::new("Title", 0)
            .description("desc")
            .field("F", "value", 1024)
            .footer("foot");
        let text = reply.to_plain_text();
        assert!(text.starts_with("Title\ndesc\n"));
        assert!(text.contains("## F\nvalue"));
        assert!(text.ends_with("foot\n"));
    }
}
