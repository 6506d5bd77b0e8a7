//! Quiz error types.
//!
//! Every fallible operation in the core and store crates returns a
//! [`QuizError`]. Front ends branch on [`QuizError::kind`] to decide whether
//! to report and carry on, or to surface a storage fault.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A login that is already registered.
    #[error("login '{0}' is already taken")]
    DuplicateLogin(String),

    /// A category that already holds a quiz.
    #[error("category '{0}' already exists")]
    DuplicateCategory(String),

    /// A category name that cannot be used for a new quiz.
    #[error("category name '{0}' is reserved")]
    ReservedCategory(String),

    /// A date or timestamp that does not match the expected format.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A field containing a character the flat-file format uses as a delimiter.
    #[error("{field} must not contain {delimiter:?}")]
    ReservedDelimiter { field: &'static str, delimiter: char },

    /// An option number outside the question's option list.
    #[error("option {index} is out of range (1-{available})")]
    AnswerOutOfRange { index: usize, available: usize },

    /// Any other rejected operator input.
    #[error("{0}")]
    Validation(String),

    /// A login with no registered user.
    #[error("user '{0}' not found")]
    UnknownUser(String),

    /// A category with no quiz.
    #[error("category '{0}' does not exist")]
    UnknownCategory(String),

    /// A quiz selection that cannot produce any questions.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// Reading or writing a backing file failed.
    #[error("storage fault on {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification of a [`QuizError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected input; nothing was mutated.
    Validation,
    /// The referenced entity is absent.
    NotFound,
    /// A backing file could not be read or written.
    Storage,
}

impl QuizError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuizError::UnknownUser(_) | QuizError::UnknownCategory(_) => ErrorKind::NotFound,
            QuizError::Storage { .. } => ErrorKind::Storage,
            _ => ErrorKind::Validation,
        }
    }

    /// Wrap an I/O error with the path it happened on.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        QuizError::Storage {
            path: path.into(),
            source,
        }
    }
}
