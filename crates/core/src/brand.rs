//! Brand identity shared by every prompt and every embed.

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_BRAND_NAME: &str = "SV Brand";
pub const DEFAULT_PRIMARY_COLOR: u32 = 0x1a1a1a;
pub const DEFAULT_SECONDARY_COLOR: u32 = 0xffffff;
pub const DEFAULT_ACCENT_COLOR: u32 = 0xff6b6b;
pub const DEFAULT_STYLE_GUIDELINES: &str =
    "Modern, clean, professional aesthetic with emphasis on clarity and impact";
pub const DEFAULT_VOICE_TONE: &str = "Professional yet approachable, confident, and creative";

/// Color used for failure embeds.
pub const ERROR_COLOR: u32 = 0xff0000;

/// Immutable brand record, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandConfig {
    pub name: String,
    pub primary_color: u32,
    pub secondary_color: u32,
    pub accent_color: u32,
    pub style_guidelines: String,
    pub voice_tone: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_BRAND_NAME.into(),
            primary_color: DEFAULT_PRIMARY_COLOR,
            secondary_color: DEFAULT_SECONDARY_COLOR,
            accent_color: DEFAULT_ACCENT_COLOR,
            style_guidelines: DEFAULT_STYLE_GUIDELINES.into(),
            voice_tone: DEFAULT_VOICE_TONE.into(),
        }
    }
}

impl BrandConfig {
    /// The preamble injected ahead of every role prompt.
    pub fn context(&self) -> String {
        format!(
            "You are an AI assistant for {name}, a creative brand.\n\
             \n\
             Brand Guidelines:\n\
             - Style: {style}\n\
             - Voice & Tone: {voice}\n\
             - Always maintain brand consistency in all outputs\n\
             - Focus on high-quality, professional results\n",
            name = self.name,
            style = self.style_guidelines,
            voice = self.voice_tone,
        )
    }
}

/// Parse a `#rrggbb` / `rrggbb` / `0xrrggbb` color, falling back to `default`.
pub fn parse_hex_color(raw: &str, default: u32) -> u32 {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        if let Ok(value) = u32::from_str_radix(digits, 16) {
            return value;
        }
    }

    warn!(value = %raw, fallback = %format!("#{default:06x}"), "Invalid brand color, using default");
    default
}
