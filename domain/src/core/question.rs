//! Question value object

use serde::{Deserialize, Serialize};

/// The question one ensemble run answers (Value Object).
///
/// Guaranteed non-empty; surrounding whitespace is trimmed at
/// construction so every invocation sees the same canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question(String);

impl Question {
    /// Create a question, rejecting empty or whitespace-only content
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let trimmed = content.into().trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed))
        }
    }

    /// Create a question
    ///
    /// # Panics
    /// Panics on empty or whitespace-only content; use [`Question::try_new`]
    /// for fallible construction.
    pub fn new(content: impl Into<String>) -> Self {
        Self::try_new(content).expect("question cannot be empty")
    }

    /// The question text
    pub fn content(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Question {
    fn from(s: &str) -> Self {
        Question::new(s)
    }
}

impl From<String> for Question {
    fn from(s: String) -> Self {
        Question::new(s)
    }
}
