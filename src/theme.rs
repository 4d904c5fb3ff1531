//! Machine color themes
//!
//! Only the selection is modelled here; palettes belong to the renderer.
//! The persisted form is a 1-based index.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Pink,
    Lavender,
    Blue,
}

impl Theme {
    pub const COUNT: u8 = 3;

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Pink => "theme-pink",
            Theme::Lavender => "theme-lavender",
            Theme::Blue => "theme-blue",
        }
    }

    /// 1-based index as stored in the collection record
    pub fn index(&self) -> u8 {
        match self {
            Theme::Pink => 1,
            Theme::Lavender => 2,
            Theme::Blue => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Theme::Pink),
            2 => Some(Theme::Lavender),
            3 => Some(Theme::Blue),
            _ => None,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim_start_matches("theme-") {
            "pink" => Some(Theme::Pink),
            "lavender" | "purple" => Some(Theme::Lavender),
            "blue" => Some(Theme::Blue),
            _ => None,
        }
    }

    /// Pink -> Lavender -> Blue -> Pink
    pub fn next(&self) -> Self {
        match self {
            Theme::Pink => Theme::Lavender,
            Theme::Lavender => Theme::Blue,
            Theme::Blue => Theme::Pink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        let mut theme = Theme::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(theme.index());
            theme = theme.next();
        }
        assert_eq!(seen, vec![1, 2, 3, 1]);
    }

    #[test]
    fn test_index_roundtrip_and_names() {
        for i in 1..=Theme::COUNT {
            assert_eq!(Theme::from_index(i).map(|t| t.index()), Some(i));
        }
        assert_eq!(Theme::from_index(0), None);
        assert_eq!(Theme::from_index(4), None);
        assert_eq!(Theme::from_str("theme-blue"), Some(Theme::Blue));
        assert_eq!(Theme::from_str("Lavender"), Some(Theme::Lavender));
        assert_eq!(Theme::from_str("green"), None);
    }
}
