use once_cell::sync::Lazy;
use regex::Regex;

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://|www\.)[^\s]+").expect("valid url regex")
});

/// Per-script character counts used as classification evidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptCounts {
    pub hangul: usize,
    pub hiragana: usize,
    pub katakana: usize,
    pub han: usize,
    pub latin: usize,
}

impl ScriptCounts {
    pub fn of(text: &str) -> Self {
        let mut counts = Self::default();
        for ch in text.chars() {
            match ch as u32 {
                0xAC00..=0xD7A3
                | 0x1100..=0x11FF
                | 0x3130..=0x318F
                | 0xA960..=0xA97F
                | 0xD7B0..=0xD7FF => counts.hangul += 1,
                0x3040..=0x309F => counts.hiragana += 1,
                0x30A0..=0x30FF | 0x31F0..=0x31FF | 0xFF66..=0xFF9F => counts.katakana += 1,
                0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF => counts.han += 1,
                _ if is_latin_letter(ch) => counts.latin += 1,
                _ => {}
            }
        }
        counts
    }

    pub fn kana(&self) -> usize {
        self.hiragana + self.katakana
    }

    pub fn cjk(&self) -> usize {
        self.hangul + self.kana() + self.han
    }

    pub fn total(&self) -> usize {
        self.cjk() + self.latin
    }
}

fn is_latin_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
        || matches!(ch as u32, 0x00C0..=0x00D6 | 0x00D8..=0x00F6 | 0x00F8..=0x024F)
}

/// Removes URL-like substrings and surrounding whitespace.
pub fn normalize(text: &str) -> String {
    URL_REGEX.replace_all(text, " ").trim().to_string()
}

/// Prefix of at most `max_chars` characters, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
