//! Core data model types for quizdesk.
//!
//! Users, questions, results, and the selector used to start a quiz.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Category label recorded for mixed-category attempts.
pub const MIXED_CATEGORY: &str = "mixed";

/// Number of questions authored per quiz and drawn for a mixed attempt.
pub const DEFAULT_QUIZ_LENGTH: usize = 20;

/// Format of a date of birth on disk and at the prompt.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of a result timestamp on disk.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A registered user.
///
/// Note: Custom Debug impl masks the password so it never reaches the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    /// Unique, immutable login.
    pub login: String,
    /// Plaintext password.
    pub password: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
}

impl User {
    pub fn new(login: impl Into<String>, password: impl Into<String>, date_of_birth: NaiveDate) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            date_of_birth,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("login", &self.login)
            .field("password", &"***")
            .field("date_of_birth", &self.date_of_birth)
            .finish()
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question prompt.
    pub text: String,
    /// Choices, shown to the user numbered from 1.
    pub options: Vec<String>,
    /// Option texts that make up the correct answer.
    pub correct_answers: Vec<String>,
}

impl Question {
    pub fn new<S: Into<String>>(
        text: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        correct_answers: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_answers: correct_answers.into_iter().map(Into::into).collect(),
        }
    }

    /// Correct answers that do not match any option.
    pub fn unmatched_answers(&self) -> Vec<&str> {
        self.correct_answers
            .iter()
            .filter(|a| !self.options.contains(a))
            .map(String::as_str)
            .collect()
    }
}

/// One completed quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Login of the user who took the quiz.
    pub user_login: String,
    /// Number of fully correct answers.
    pub score: u32,
    /// When the attempt finished (local time).
    pub date: NaiveDateTime,
    /// Category name, or [`MIXED_CATEGORY`].
    pub category: String,
}

/// Which questions a quiz attempt draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelector {
    /// A random sample across every category.
    Mixed,
    /// One category's questions, in stored order.
    Named(String),
}

impl CategorySelector {
    /// The category label recorded on the result.
    pub fn label(&self) -> &str {
        match self {
            CategorySelector::Mixed => MIXED_CATEGORY,
            CategorySelector::Named(name) => name,
        }
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for CategorySelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            Err("empty category name".to_string())
        } else if name.eq_ignore_ascii_case(MIXED_CATEGORY) {
            Ok(CategorySelector::Mixed)
        } else {
            Ok(CategorySelector::Named(name.to_string()))
        }
    }
}

/// Parse a date of birth as typed at the prompt or stored on disk.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_display_and_parse() {
        assert_eq!(CategorySelector::Mixed.to_string(), "mixed");
        assert_eq!(
            CategorySelector::Named("History".into()).to_string(),
            "History"
        );
        assert_eq!(
            "MIXED".parse::<CategorySelector>().unwrap(),
            CategorySelector::Mixed
        );
        assert_eq!(
            " Geography ".parse::<CategorySelector>().unwrap(),
            CategorySelector::Named("Geography".into())
        );
        assert!("  ".parse::<CategorySelector>().is_err());
    }

    #[test]
    fn user_debug_masks_password() {
        let user = User::new("alice", "hunter2", NaiveDate::from_ymd_opt(1990, 1, 2).unwrap());
        let debug = format!("{user:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn unmatched_answers() {
        let q = Question::new("Capital of France?", ["Paris", "London"], ["Paris", "Rome"]);
        assert_eq!(q.unmatched_answers(), vec!["Rome"]);
    }

    #[test]
    fn parse_date_accepts_iso_only() {
        assert_eq!(
            parse_date("2001-09-11"),
            NaiveDate::from_ymd_opt(2001, 9, 11)
        );
        assert_eq!(parse_date(" 2001-09-11\t"), NaiveDate::from_ymd_opt(2001, 9, 11));
        assert!(parse_date("11/09/2001").is_none());
        assert!(parse_date("2001-02-30").is_none());
    }

    #[test]
    fn quiz_result_serde_roundtrip() {
        let result = QuizResult {
            user_login: "alice".into(),
            score: 17,
            date: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(12, 30, 0)
                .unwrap(),
            category: MIXED_CATEGORY.into(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: QuizResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
