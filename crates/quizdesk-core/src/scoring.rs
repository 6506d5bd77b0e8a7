//! Answer resolution and scoring.
//!
//! A submission is correct iff, once both sides are sorted, it equals the
//! question's correct answers. Order does not matter; duplicates are kept,
//! so choosing the same option twice never matches a single correct answer.

use crate::error::QuizError;
use crate::model::Question;

/// Sorted copy of a list of option texts.
pub fn canonical<S: AsRef<str>>(answers: &[S]) -> Vec<&str> {
    let mut sorted: Vec<&str> = answers.iter().map(|a| a.as_ref()).collect();
    sorted.sort_unstable();
    sorted
}

/// Whether a submission matches the question's correct answers.
pub fn is_correct<S: AsRef<str>>(question: &Question, submitted: &[S]) -> bool {
    canonical(submitted) == canonical(&question.correct_answers)
}

/// Turn raw input like `"1; 3"` into the option texts it names.
///
/// Tokens that are not numbers are ignored. A number outside the option
/// list rejects the whole submission.
pub fn resolve_answers(question: &Question, input: &str) -> Result<Vec<String>, QuizError> {
    input
        .split(';')
        .map(str::trim)
        .filter_map(|token| token.parse::<usize>().ok())
        .map(|index| {
            index
                .checked_sub(1)
                .and_then(|i| question.options.get(i))
                .cloned()
                .ok_or(QuizError::AnswerOutOfRange {
                    index,
                    available: question.options.len(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capital() -> Question {
        Question::new("Capital of France?", ["Paris", "London"], ["Paris"])
    }

    fn score(question: &Question, input: &str) -> bool {
        let answers = resolve_answers(question, input).unwrap();
        is_correct(question, &answers)
    }

    #[test]
    fn single_answer() {
        let q = capital();
        assert!(score(&q, "1"));
        assert!(!score(&q, "2"));
        assert!(!score(&q, "1;2"));
    }

    #[test]
    fn order_independent() {
        let q = Question::new("Pick A and B", ["A", "B", "C"], ["A", "B"]);
        assert!(score(&q, "2;1"));
        assert!(score(&q, "1;2"));
        assert!(!score(&q, "1"));
        assert!(!score(&q, "1;2;3"));
    }

    #[test]
    fn repeated_index_is_not_deduplicated() {
        let q = capital();
        assert_eq!(
            resolve_answers(&q, "1;1").unwrap(),
            vec!["Paris", "Paris"]
        );
        assert!(!score(&q, "1;1"));
    }

    #[test]
    fn non_numeric_tokens_are_ignored() {
        let q = capital();
        assert_eq!(resolve_answers(&q, " x; 1 ;").unwrap(), vec!["Paris"]);
        assert!(resolve_answers(&q, "").unwrap().is_empty());
        assert!(!score(&q, "Paris"));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let q = capital();
        assert!(matches!(
            resolve_answers(&q, "3"),
            Err(QuizError::AnswerOutOfRange {
                index: 3,
                available: 2
            })
        ));
        assert!(resolve_answers(&q, "0").is_err());
    }

    #[test]
    fn empty_submission_matches_empty_answer_key() {
        let q = Question::new("Nothing applies", ["A", "B"], Vec::<&str>::new());
        assert!(score(&q, ""));
    }
}
