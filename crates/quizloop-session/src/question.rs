//! Question model shared by the controller, the client and the practice server.

use serde::{Deserialize, Serialize};

/// Label of one of the four answer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLabel {
    /// Option `A`.
    A,
    /// Option `B`.
    B,
    /// Option `C`.
    C,
    /// Option `D`.
    D,
}

impl OptionLabel {
    /// All labels in their fixed order.
    pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Returns the label as a single character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl std::fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The four option texts of a question, keyed by label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOptions {
    /// Text of option `A`.
    #[serde(rename = "A")]
    pub a: String,
    /// Text of option `B`.
    #[serde(rename = "B")]
    pub b: String,
    /// Text of option `C`.
    #[serde(rename = "C")]
    pub c: String,
    /// Text of option `D`.
    #[serde(rename = "D")]
    pub d: String,
}

impl QuestionOptions {
    /// Returns the text for the given label.
    #[must_use]
    pub fn text(&self, label: OptionLabel) -> &str {
        match label {
            OptionLabel::A => &self.a,
            OptionLabel::B => &self.b,
            OptionLabel::C => &self.c,
            OptionLabel::D => &self.d,
        }
    }
}

/// A multiple-choice question as served by the question endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Server-side identifier, when the backend provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Prompt text.
    pub question: String,

    /// The four labelled options.
    pub options: QuestionOptions,

    /// Label of the correct option.
    pub correct_answer: OptionLabel,

    /// Explanation shown after answering.
    pub explanation: String,
}

impl Question {
    /// Returns `true` if `label` is the correct answer.
    #[must_use]
    pub fn is_correct(&self, label: OptionLabel) -> bool {
        self.correct_answer == label
    }
}
