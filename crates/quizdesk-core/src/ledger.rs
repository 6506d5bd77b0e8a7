//! Append-only history of quiz results.

use crate::model::QuizResult;

/// Every recorded quiz result, oldest first. Results are never updated or
/// removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultLedger {
    results: Vec<QuizResult>,
}

impl ResultLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_results(results: impl IntoIterator<Item = QuizResult>) -> Self {
        Self {
            results: results.into_iter().collect(),
        }
    }

    pub fn append(&mut self, result: QuizResult) {
        self.results.push(result);
    }

    /// One user's results in insertion order.
    pub fn results_for_user<'a>(&'a self, login: &'a str) -> impl Iterator<Item = &'a QuizResult> {
        self.results.iter().filter(move |r| r.user_login == login)
    }

    /// The `n` best results, highest score first. Equal scores keep their
    /// insertion order.
    pub fn top(&self, n: usize) -> Vec<&QuizResult> {
        let mut ranked: Vec<&QuizResult> = self.results.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(n);
        ranked
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuizResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
