//! Regulation judge-panel sizes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configured number of judges for a match.
///
/// Regulation panels are 3, 5, or 7 judges; panels of 5 and 7 drop the one
/// highest and one lowest total once five actual scores have arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelSize {
    Three,
    Five,
    Seven,
}

impl PanelSize {
    /// Expected judge count for this panel.
    pub fn count(self) -> usize {
        match self {
            Self::Three => 3,
            Self::Five => 5,
            Self::Seven => 7,
        }
    }

    /// Whether this panel uses the trimmed-mean rule at all.
    ///
    /// Trimming additionally requires five received scores; see
    /// [`aggregate`](crate::aggregate::aggregate).
    pub fn trims(self) -> bool {
        self.count() >= 5
    }
}

impl Default for PanelSize {
    // Hosts start on the smallest regulation panel.
    fn default() -> Self {
        Self::Three
    }
}

impl fmt::Display for PanelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// Error for panel sizes outside the regulation set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid panel size '{0}': expected 3, 5, or 7")]
pub struct ParsePanelSizeError(pub String);

impl FromStr for PanelSize {
    type Err = ParsePanelSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "3" => Ok(Self::Three),
            "5" => Ok(Self::Five),
            "7" => Ok(Self::Seven),
            other => Err(ParsePanelSizeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        assert_eq!(PanelSize::Three.count(), 3);
        assert_eq!(PanelSize::Five.count(), 5);
        assert_eq!(PanelSize::Seven.count(), 7);
    }

    #[test]
    fn only_large_panels_trim() {
        assert!(!PanelSize::Three.trims());
        assert!(PanelSize::Five.trims());
        assert!(PanelSize::Seven.trims());
    }

    #[test]
    fn parses_regulation_sizes() {
        assert_eq!("3".parse::<PanelSize>().unwrap(), PanelSize::Three);
        assert_eq!(" 5 ".parse::<PanelSize>().unwrap(), PanelSize::Five);
        assert_eq!("7".parse::<PanelSize>().unwrap(), PanelSize::Seven);
    }

    #[test]
    fn rejects_other_sizes() {
        assert!("4".parse::<PanelSize>().is_err());
        assert!("".parse::<PanelSize>().is_err());
        assert!("five".parse::<PanelSize>().is_err());
    }

    #[test]
    fn displays_as_count() {
        assert_eq!(PanelSize::Seven.to_string(), "7");
    }
}
