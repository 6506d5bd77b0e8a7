//! Per-question record of the most recent quiz attempt.
//!
//! The session engine writes through the [`TranscriptSink`] trait; the store
//! crate implements it over `last_quiz_details.txt`, and [`MemoryTranscript`]
//! keeps everything in memory for tests.

use std::fmt::Write as _;

use crate::error::QuizError;
use crate::model::Question;

const RULE_WIDTH: usize = 50;

/// What happened on one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// 1-based position within the attempt.
    pub number: usize,
    pub question: Question,
    /// Option texts the user picked, as submitted.
    pub submitted: Vec<String>,
    pub correct: bool,
}

/// Destination for transcript output.
pub trait TranscriptSink {
    /// Discard any previous transcript and start a new one.
    fn begin(&mut self, category: &str) -> Result<(), QuizError>;

    /// Append one answered question.
    fn record(&mut self, entry: &TranscriptEntry) -> Result<(), QuizError>;
}

impl<T: TranscriptSink + ?Sized> TranscriptSink for &mut T {
    fn begin(&mut self, category: &str) -> Result<(), QuizError> {
        (**self).begin(category)
    }

    fn record(&mut self, entry: &TranscriptEntry) -> Result<(), QuizError> {
        (**self).record(entry)
    }
}

/// Header written when an attempt starts.
pub fn render_header(category: &str) -> String {
    format!(
        "Last Quiz Details (Category: {category})\n{}\n",
        "-".repeat(RULE_WIDTH)
    )
}

/// Block written after each answered question.
pub fn render_entry(entry: &TranscriptEntry) -> String {
    let mut out = String::new();
    let q = &entry.question;
    let _ = writeln!(out, "Question {}: {}", entry.number, q.text);
    let _ = writeln!(out, "Options:");
    for (idx, option) in q.options.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", idx + 1, option);
    }
    let _ = writeln!(out, "Your Answers: {}", entry.submitted.join(", "));
    let _ = writeln!(out, "Correct Answers: {}", q.correct_answers.join(", "));
    let _ = writeln!(
        out,
        "Result: {}",
        if entry.correct { "Correct" } else { "Incorrect" }
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    out
}

/// In-memory sink that renders exactly what the file sink would write.
#[derive(Debug, Default)]
pub struct MemoryTranscript {
    pub text: String,
    pub entries: Vec<TranscriptEntry>,
    /// Number of times `begin` was called.
    pub begun: usize,
}

impl MemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TranscriptSink for MemoryTranscript {
    fn begin(&mut self, category: &str) -> Result<(), QuizError> {
        self.text = render_header(category);
        self.entries.clear();
        self.begun += 1;
        Ok(())
    }

    fn record(&mut self, entry: &TranscriptEntry) -> Result<(), QuizError> {
        self.text.push_str(&render_entry(entry));
        self.entries.push(entry.clone());
        Ok(())
    }
}
