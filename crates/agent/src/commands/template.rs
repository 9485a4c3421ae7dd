//! `{name}` placeholder filling for command templates.
//!
//! Placeholders resolve against option values first, then the brand
//! variables (`brand`, `company`, `style_guidelines`, `voice_tone`).
//! Unknown placeholders are left untouched.

use super::Args;
use brandbot_core::brand::BrandConfig;

pub struct TemplateVars<'a> {
    pub brand: &'a BrandConfig,
    pub company: &'a str,
    pub args: &'a Args,
}

impl TemplateVars<'_> {
    fn lookup(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.args.get(name) {
            return Some(value);
        }
        match name {
            "brand" => Some(&self.brand.name),
            "company" => Some(self.company),
            "style_guidelines" => Some(&self.brand.style_guidelines),
            "voice_tone" => Some(&self.brand.voice_tone),
            _ => None,
        }
    }

    pub fn fill(&self, template: &str) -> String {
        self.fill_with(template, str::to_string)
    }

    /// Fill, passing each substituted value through `transform`.
    pub fn fill_with(&self, template: &str, transform: impl Fn(&str) -> String) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if is_name(&after[..close]) => {
                    let name = &after[..close];
                    match self.lookup(name) {
                        Some(value) => out.push_str(&transform(value)),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
