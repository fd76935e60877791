//! Question bank loading for the practice server.
//!
//! A bank is a UTF-8 JSON file holding an array of questions in the same
//! shape the question endpoint serves.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{QuizError, Result};
use crate::question::Question;

/// Maximum allowed question bank file size in bytes (256KB).
pub const MAX_BANK_SIZE: u64 = 256 * 1024;

/// A set of questions the practice server draws quizzes from.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    /// Path the bank was loaded from, if any.
    pub path: Option<PathBuf>,

    /// All questions in file order.
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Wraps questions that are already in memory.
    #[must_use]
    pub const fn from_questions(questions: Vec<Question>) -> Self {
        Self {
            path: None,
            questions,
        }
    }

    /// Loads a question bank from the given file path.
    ///
    /// Validates that:
    /// - The file exists
    /// - The file size is within the 256KB limit
    /// - The content is valid UTF-8
    /// - The content is a JSON array of questions
    /// - The array is not empty
    ///
    /// # Errors
    ///
    /// Returns `QuizError::QuestionBankNotFound` if the file doesn't exist.
    /// Returns `QuizError::QuestionBankTooLarge` if the file exceeds 256KB.
    /// Returns `QuizError::QuestionBankEncoding` if the file is not valid UTF-8.
    /// Returns `QuizError::QuestionBankInvalid` if the JSON does not decode.
    /// Returns `QuizError::EmptyQuestionBank` if the array is empty.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                QuizError::bank_not_found(path)
            } else {
                QuizError::Io(e)
            }
        })?;

        let file_size = metadata.len();
        if file_size > MAX_BANK_SIZE {
            return Err(QuizError::bank_too_large(path, file_size / 1024));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                QuizError::bank_encoding(path)
            } else {
                QuizError::Io(e)
            }
        })?;

        let questions: Vec<Question> = serde_json::from_str(&content)
            .map_err(|e| QuizError::bank_invalid(path, e.to_string()))?;
        if questions.is_empty() {
            return Err(QuizError::empty_bank(path));
        }

        tracing::debug!(path = %path.display(), questions = questions.len(), "Question bank loaded");

        Ok(Self {
            path: Some(path.to_path_buf()),
            questions,
        })
    }

    /// Number of questions in the bank.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Returns `true` if the bank holds no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Draws `min(count, len)` distinct questions in random order.
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Question> {
        self.questions
            .choose_multiple(rng, count.min(self.questions.len()))
            .cloned()
            .collect()
    }
}
