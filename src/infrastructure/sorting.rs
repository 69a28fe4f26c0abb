//! Human-friendly ordering of names such as `day_2` and `day_10`

use std::cmp::Ordering;

/// One run of a natural sort key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Chunk {
    /// Digit run; sorts before text at the same position
    Number(Digits),
    /// Lowercased non-digit run
    Text(String),
}

/// Decimal digits without leading zeros, compared by numeric value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digits(String);

impl Digits {
    fn new(raw: &str) -> Self {
        let trimmed = raw.trim_start_matches('0');
        Self(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split `text` into alternating digit and text runs
pub fn natural_key(text: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for ch in text.chars() {
        let is_digit = ch.is_ascii_digit();
        if !current.is_empty() && is_digit != in_digits {
            chunks.push(make_chunk(&current, in_digits));
            current.clear();
        }
        in_digits = is_digit;
        current.push(ch);
    }
    if !current.is_empty() {
        chunks.push(make_chunk(&current, in_digits));
    }
    chunks
}

fn make_chunk(run: &str, digits: bool) -> Chunk {
    if digits {
        Chunk::Number(Digits::new(run))
    } else {
        Chunk::Text(run.to_lowercase())
    }
}

/// Compare two strings in natural order
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}
