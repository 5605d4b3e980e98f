use std::ops::Range;

/// Upper-cases a raw serial. Nothing else is stripped or rewritten.
pub fn normalize(raw: &str) -> String {
    raw.to_uppercase()
}

/// Positional access over a normalized serial, by character.
pub struct SerialReader {
    chars: Vec<char>,
}

impl SerialReader {
    pub fn new(normalized: &str) -> Self {
        Self {
            chars: normalized.chars().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    pub fn read_code(&self, offset: usize) -> Option<String> {
        self.char_at(offset).map(String::from)
    }

    pub fn read_range(&self, range: Range<usize>) -> Option<String> {
        self.chars.get(range).map(|chars| chars.iter().collect())
    }

    /// Last `len` characters.
    pub fn read_tail(&self, len: usize) -> Option<String> {
        let start = self.chars.len().checked_sub(len)?;
        self.read_range(start..self.chars.len())
    }

    /// Two-digit year code as a number, when both characters are digits.
    pub fn read_year_code(&self, range: Range<usize>) -> Option<u8> {
        let digits = self.chars.get(range)?;
        digits.iter().try_fold(0u8, |acc, ch| {
            let digit = ch.to_digit(10)? as u8;
            acc.checked_mul(10)?.checked_add(digit)
        })
    }
}
