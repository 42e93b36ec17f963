use serde::{Deserialize, Serialize};

use crate::accent::Rgb;

/// Recently used custom accent colors, most recent first.
///
/// Values are stored normalized (`#rrggbb`, lower case) so equal colors
/// written differently are recognized as duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorHistory(Vec<String>);

impl ColorHistory {
    pub const CAPACITY: usize = kestrel_config::COLOR_HISTORY_CAPACITY;

    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from arbitrary stored values, dropping invalid and
    /// duplicate entries and anything beyond capacity.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::with_capacity(Self::CAPACITY);
        for value in values {
            let Some(rgb) = Rgb::parse_hex(value.as_ref()) else {
                continue;
            };
            let hex = rgb.to_hex();
            if !out.contains(&hex) {
                out.push(hex);
            }
            if out.len() == Self::CAPACITY {
                break;
            }
        }
        Self(out)
    }

    /// Moves `hex` to the front, inserting it if new and evicting the oldest
    /// entry when full. Returns `false` if `hex` is not a valid color.
    pub fn push(&mut self, hex: &str) -> bool {
        let Some(rgb) = Rgb::parse_hex(hex) else {
            return false;
        };
        let hex = rgb.to_hex();
        self.0.retain(|existing| existing != &hex);
        self.0.insert(0, hex);
        self.0.truncate(Self::CAPACITY);
        true
    }

    pub fn remove(&mut self, hex: &str) {
        if let Some(rgb) = Rgb::parse_hex(hex) {
            let hex = rgb.to_hex();
            self.0.retain(|existing| existing != &hex);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushing_existing_value_moves_it_to_front() {
        let mut history = ColorHistory::new();
        history.push("#111111");
        history.push("#222222");
        history.push("#111111");

        assert_eq!(history.as_slice(), ["#111111", "#222222"]);
    }

    #[test]
    fn duplicates_are_matched_case_insensitively() {
        let mut history = ColorHistory::new();
        history.push("#ABCDEF");
        history.push("abcdef");
        assert_eq!(history.len(), 1);
        assert_eq!(history.first(), Some("#abcdef"));
    }

    #[test]
    fn eleventh_value_evicts_the_oldest() {
        let mut history = ColorHistory::new();
        for i in 0..11u8 {
            history.push(&format!("#0000{i:02x}"));
        }
        assert_eq!(history.len(), ColorHistory::CAPACITY);
        assert_eq!(history.first(), Some("#00000a"));
        assert!(!history.as_slice().contains(&"#000000".to_string()));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut history = ColorHistory::new();
        assert!(!history.push("blue"));
        assert!(history.is_empty());
    }

    #[test]
    fn from_values_normalizes_stored_lists() {
        let stored = ["#FFF", "#ffffff", "nope", "#000000"];
        let history = ColorHistory::from_values(stored);
        assert_eq!(history.as_slice(), ["#ffffff", "#000000"]);
    }
}
