//! Quiz session engine.
//!
//! A [`QuizSession`] picks the questions for one attempt, scores each
//! submission, writes the transcript as it goes, and emits a single
//! [`QuizResult`] into the ledger when the last question is answered.

use chrono::NaiveDateTime;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::QuizCatalog;
use crate::error::QuizError;
use crate::ledger::ResultLedger;
use crate::model::{CategorySelector, Question, QuizResult};
use crate::scoring::{is_correct, resolve_answers};
use crate::transcript::{TranscriptEntry, TranscriptSink};

/// Pick the questions for an attempt.
///
/// A named category yields its questions in stored order. `Mixed` pools
/// every category and draws a uniform sample of `sample_size` without
/// replacement, or the whole pool if it is smaller.
pub fn select_questions<R: Rng + ?Sized>(
    catalog: &QuizCatalog,
    selector: &CategorySelector,
    sample_size: usize,
    rng: &mut R,
) -> Result<Vec<Question>, QuizError> {
    let questions = match selector {
        CategorySelector::Named(name) => catalog
            .questions(name)
            .ok_or_else(|| QuizError::InvalidSelection(format!("no quiz named '{name}'")))?
            .to_vec(),
        CategorySelector::Mixed => {
            let mut pool: Vec<Question> = catalog.all_questions().cloned().collect();
            let amount = sample_size.min(pool.len());
            // Partial Fisher-Yates: the first `amount` slots end up a uniform sample.
            let (picked, _) = pool.partial_shuffle(rng, amount);
            picked.to_vec()
        }
    };

    if questions.is_empty() {
        return Err(QuizError::InvalidSelection(format!(
            "no questions available for '{selector}'"
        )));
    }
    Ok(questions)
}

/// Result of answering one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// 1-based position of the question just answered.
    pub number: usize,
    pub correct: bool,
}

/// One quiz attempt in progress.
pub struct QuizSession<S: TranscriptSink> {
    login: String,
    selector: CategorySelector,
    questions: Vec<Question>,
    answered: usize,
    score: u32,
    transcript: S,
}

impl<S: TranscriptSink> QuizSession<S> {
    /// Start an attempt. An invalid selection is refused before the
    /// transcript is touched.
    pub fn start<R: Rng + ?Sized>(
        catalog: &QuizCatalog,
        login: &str,
        selector: CategorySelector,
        sample_size: usize,
        rng: &mut R,
        mut transcript: S,
    ) -> Result<Self, QuizError> {
        let questions = select_questions(catalog, &selector, sample_size, rng)?;
        transcript.begin(selector.label())?;
        tracing::debug!(
            "quiz started for '{login}' on '{selector}' with {} questions",
            questions.len()
        );

        Ok(Self {
            login: login.to_string(),
            selector,
            questions,
            answered: 0,
            score: 0,
            transcript,
        })
    }

    /// Category label recorded on the result.
    pub fn category(&self) -> &str {
        self.selector.label()
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_complete(&self) -> bool {
        self.answered == self.questions.len()
    }

    /// The pending question and its 1-based number.
    pub fn current(&self) -> Option<(usize, &Question)> {
        self.questions
            .get(self.answered)
            .map(|q| (self.answered + 1, q))
    }

    /// Answer the pending question with raw input such as `"1;3"`.
    ///
    /// An out-of-range option number is rejected and the question stays
    /// pending.
    pub fn answer(&mut self, input: &str) -> Result<AnswerOutcome, QuizError> {
        let (_, question) = self.pending()?;
        let submitted = resolve_answers(question, input)?;
        self.submit(submitted)
    }

    /// Answer the pending question with option texts.
    pub fn submit(&mut self, submitted: Vec<String>) -> Result<AnswerOutcome, QuizError> {
        let (number, question) = self.pending()?;
        let correct = is_correct(question, &submitted);

        let entry = TranscriptEntry {
            number,
            question: question.clone(),
            submitted,
            correct,
        };
        self.transcript.record(&entry)?;

        self.answered += 1;
        if correct {
            self.score += 1;
        }
        Ok(AnswerOutcome { number, correct })
    }

    /// Close the attempt and append its result to `ledger`.
    pub fn finish(
        self,
        completed_at: NaiveDateTime,
        ledger: &mut ResultLedger,
    ) -> Result<QuizResult, QuizError> {
        if !self.is_complete() {
            return Err(QuizError::Validation(format!(
                "{} of {} questions are still unanswered",
                self.questions.len() - self.answered,
                self.questions.len()
            )));
        }

        let result = QuizResult {
            user_login: self.login,
            score: self.score,
            date: completed_at,
            category: self.selector.label().to_string(),
        };
        tracing::info!(
            "quiz finished: {} scored {}/{} on '{}'",
            result.user_login,
            result.score,
            self.questions.len(),
            result.category
        );
        ledger.append(result.clone());
        Ok(result)
    }

    fn pending(&self) -> Result<(usize, &Question), QuizError> {
        self.current()
            .ok_or_else(|| QuizError::Validation("every question has been answered".into()))
    }
}
