// Box colors - named palette entries or free hex values
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::view::EditError;

/// Swatches shown by the box editor.
pub const PALETTE: [(&str, &str); 10] = [
    ("white", "#ffffff"),
    ("black", "#000000"),
    ("slate", "#334155"),
    ("gray", "#9ca3af"),
    ("red", "#ef4444"),
    ("orange", "#f97316"),
    ("yellow", "#facc15"),
    ("green", "#22c55e"),
    ("blue", "#3b82f6"),
    ("purple", "#a855f7"),
];

/// Normalized lowercase `#rrggbb` color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn white() -> Self {
        Color("#ffffff".to_string())
    }

    pub fn black() -> Self {
        Color("#000000".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Palette name for this color, if it is one of the swatches.
    pub fn swatch_name(&self) -> Option<&'static str> {
        PALETTE
            .iter()
            .find(|(_, hex)| *hex == self.0)
            .map(|(name, _)| *name)
    }

    fn parse_hex(digits: &str) -> Option<String> {
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => Some(format!("#{}", digits.to_ascii_lowercase())),
            3 => {
                let expanded: String = digits
                    .chars()
                    .flat_map(|c| [c, c])
                    .collect::<String>()
                    .to_ascii_lowercase();
                Some(format!("#{}", expanded))
            }
            _ => None,
        }
    }
}

impl FromStr for Color {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || EditError::InvalidColor(s.to_string());

        if let Some(digits) = trimmed.strip_prefix('#') {
            return Self::parse_hex(digits).map(Color).ok_or_else(invalid);
        }

        PALETTE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
            .map(|(_, hex)| Color((*hex).to_string()))
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for Color {
    type Error = EditError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.swatch_name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => f.write_str(&self.0),
        }
    }
}
