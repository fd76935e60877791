//! Score percentage and result bands.

use serde::{Deserialize, Serialize};

/// Percentage of correct answers, `0.0..=100.0`.
///
/// An empty quiz scores 0%.
#[must_use]
pub fn percentage(score: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(score) / f64::from(total) * 100.0
}

/// Tier a final score falls into.
///
/// Boundaries belong to the higher tier: exactly 80% is `Great`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultBand {
    /// 100%.
    Perfect,
    /// 80% and above.
    Great,
    /// 60% and above.
    Good,
    /// 40% and above.
    Learning,
    /// Below 40%.
    KeepTrying,
}

impl ResultBand {
    /// Picks the band for a percentage.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Self::Perfect
        } else if percentage >= 80.0 {
            Self::Great
        } else if percentage >= 60.0 {
            Self::Good
        } else if percentage >= 40.0 {
            Self::Learning
        } else {
            Self::KeepTrying
        }
    }

    /// Picks the band for `score` out of `total`.
    #[must_use]
    pub fn from_score(score: u32, total: u32) -> Self {
        Self::from_percentage(percentage(score, total))
    }

    /// Result message for this band about `topic`.
    #[must_use]
    pub fn message(self, topic: &str) -> String {
        match self {
            Self::Perfect => format!("Perfect Score! You're a {topic} expert!"),
            Self::Great => format!("Great job! You're very knowledgeable about {topic}!"),
            Self::Good => format!("Good effort! You know the basics of {topic}."),
            Self::Learning => format!("You're learning! Keep exploring {topic}."),
            Self::KeepTrying => format!("Time to learn more about {topic}! Try again?"),
        }
    }
}

impl std::fmt::Display for ResultBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Perfect => write!(f, "perfect"),
            Self::Great => write!(f, "great"),
            Self::Good => write!(f, "good"),
            Self::Learning => write!(f, "learning"),
            Self::KeepTrying => write!(f, "keep_trying"),
        }
    }
}
