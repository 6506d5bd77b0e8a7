//! Line-oriented text codec for users, quizzes, and results.
//!
//! Formats (one record per line, no escaping):
//!
//! - users: `login,password,YYYY-MM-DD`
//! - quizzes: a `Category:<name>` header followed by `text|opt1;opt2|ans1;ans2` lines
//! - results: `login,score,YYYY-MM-DD HH:MM:SS,category`
//!
//! Decoding is best effort: a malformed line is skipped and recorded in
//! [`Decoded::skipped`], it never aborts the whole file. Because fields are
//! not escaped, a delimiter inside a field would corrupt the record; the
//! `check_*` functions reject such values before they reach the store.

use chrono::NaiveDateTime;

use crate::error::QuizError;
use crate::model::{parse_date, Question, QuizResult, User, DATE_FORMAT, TIMESTAMP_FORMAT};

/// Prefix of a quiz category header line.
pub const CATEGORY_PREFIX: &str = "Category:";

const FIELD_SEPARATOR: char = ',';
const QUESTION_SEPARATOR: char = '|';
const LIST_SEPARATOR: char = ';';

/// The outcome of decoding a whole file.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    /// Records that decoded cleanly, in file order.
    pub items: Vec<T>,
    /// Non-blank lines that were dropped.
    pub skipped: Vec<SkippedLine>,
}

impl<T> Default for Decoded<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// A line dropped during decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line_no: usize,
    /// Why the line was dropped.
    pub reason: &'static str,
}

impl<T> Decoded<T> {
    fn skip(&mut self, line_no: usize, line: &str, reason: &'static str) {
        if line.trim().is_empty() {
            return;
        }
        tracing::debug!("skipping line {line_no}: {reason}");
        self.skipped.push(SkippedLine { line_no, reason });
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub fn encode_user(user: &User) -> String {
    format!(
        "{},{},{}",
        user.login,
        user.password,
        user.date_of_birth.format(DATE_FORMAT)
    )
}

pub fn decode_user(line: &str) -> Result<User, &'static str> {
    let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if parts.len() != 3 {
        return Err("expected 3 comma-separated fields");
    }
    let date_of_birth = parse_date(parts[2]).ok_or("unparseable date of birth")?;
    Ok(User::new(parts[0], parts[1], date_of_birth))
}

pub fn encode_users<'a>(users: impl IntoIterator<Item = &'a User>) -> String {
    users
        .into_iter()
        .map(|u| encode_user(u) + "\n")
        .collect()
}

pub fn decode_users(text: &str) -> Decoded<User> {
    let mut decoded = Decoded::default();
    for (idx, line) in text.lines().enumerate() {
        match decode_user(line) {
            Ok(user) => decoded.items.push(user),
            Err(reason) => decoded.skip(idx + 1, line, reason),
        }
    }
    decoded
}

// ---------------------------------------------------------------------------
// Quizzes
// ---------------------------------------------------------------------------

pub fn encode_question(question: &Question) -> String {
    format!(
        "{}|{}|{}",
        question.text,
        question.options.join(";"),
        question.correct_answers.join(";")
    )
}

pub fn decode_question(line: &str) -> Result<Question, &'static str> {
    let parts: Vec<&str> = line.split(QUESTION_SEPARATOR).collect();
    if parts.len() < 3 {
        return Err("expected text|options|answers");
    }
    Ok(Question::new(
        parts[0],
        parts[1].split(LIST_SEPARATOR),
        parts[2].split(LIST_SEPARATOR),
    ))
}

/// Encode categories and their questions, each block led by a header line.
pub fn encode_quizzes<'a>(
    quizzes: impl IntoIterator<Item = (&'a str, &'a [Question])>,
) -> String {
    let mut out = String::new();
    for (category, questions) in quizzes {
        out.push_str(CATEGORY_PREFIX);
        out.push_str(category);
        out.push('\n');
        for question in questions {
            out.push_str(&encode_question(question));
            out.push('\n');
        }
    }
    out
}

/// Decode quiz blocks in file order. A repeated header yields a second entry;
/// the caller decides which one wins.
pub fn decode_quizzes(text: &str) -> Decoded<(String, Vec<Question>)> {
    let mut decoded: Decoded<(String, Vec<Question>)> = Decoded::default();
    let mut current: Option<(String, Vec<Question>)> = None;

    for (idx, line) in text.lines().enumerate() {
        if let Some(name) = line.strip_prefix(CATEGORY_PREFIX) {
            if let Some(block) = current.take() {
                decoded.items.push(block);
            }
            current = Some((name.trim().to_string(), Vec::new()));
            continue;
        }

        let Some((_, questions)) = current.as_mut() else {
            decoded.skip(idx + 1, line, "line before the first category header");
            continue;
        };

        match decode_question(line) {
            Ok(question) => questions.push(question),
            Err(reason) => decoded.skip(idx + 1, line, reason),
        }
    }

    if let Some(block) = current {
        decoded.items.push(block);
    }
    decoded
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

pub fn encode_result(result: &QuizResult) -> String {
    format!(
        "{},{},{},{}",
        result.user_login,
        result.score,
        result.date.format(TIMESTAMP_FORMAT),
        result.category
    )
}

pub fn decode_result(line: &str) -> Result<QuizResult, &'static str> {
    let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if parts.len() != 4 {
        return Err("expected 4 comma-separated fields");
    }
    let score = parts[1]
        .trim()
        .parse::<u32>()
        .map_err(|_| "score is not a non-negative integer")?;
    let date = NaiveDateTime::parse_from_str(parts[2].trim(), TIMESTAMP_FORMAT)
        .map_err(|_| "unparseable timestamp")?;
    Ok(QuizResult {
        user_login: parts[0].to_string(),
        score,
        date,
        category: parts[3].to_string(),
    })
}

pub fn encode_results<'a>(results: impl IntoIterator<Item = &'a QuizResult>) -> String {
    results
        .into_iter()
        .map(|r| encode_result(r) + "\n")
        .collect()
}

pub fn decode_results(text: &str) -> Decoded<QuizResult> {
    let mut decoded = Decoded::default();
    for (idx, line) in text.lines().enumerate() {
        match decode_result(line) {
            Ok(result) => decoded.items.push(result),
            Err(reason) => decoded.skip(idx + 1, line, reason),
        }
    }
    decoded
}

// ---------------------------------------------------------------------------
// Reserved characters
// ---------------------------------------------------------------------------

fn check_field(field: &'static str, value: &str, reserved: &[char]) -> Result<(), QuizError> {
    match reserved.iter().find(|c| value.contains(**c)) {
        Some(&delimiter) => Err(QuizError::ReservedDelimiter { field, delimiter }),
        None => Ok(()),
    }
}

/// Reject user fields that would not survive a round trip through `users.txt`.
pub fn check_user(user: &User) -> Result<(), QuizError> {
    check_field("login", &user.login, &[',', '\n', '\r'])?;
    check_field("password", &user.password, &[',', '\n', '\r'])
}

/// Category names end up in both `quizzes.txt` headers and `results.txt` fields.
pub fn check_category(name: &str) -> Result<(), QuizError> {
    check_field("category", name, &[',', '\n', '\r'])
}

/// Reject question fields that would not survive a round trip through `quizzes.txt`.
pub fn check_question(question: &Question) -> Result<(), QuizError> {
    check_field("question text", &question.text, &['|', '\n', '\r'])?;
    if question.text.starts_with(CATEGORY_PREFIX) {
        return Err(QuizError::Validation(format!(
            "question text must not start with '{CATEGORY_PREFIX}'"
        )));
    }
    for option in &question.options {
        check_field("option", option, &['|', ';', '\n', '\r'])?;
    }
    for answer in &question.correct_answers {
        check_field("correct answer", answer, &['|', ';', '\n', '\r'])?;
    }
    Ok(())
}
