//! Quizzes keyed by category.

use std::collections::BTreeMap;

use crate::codec;
use crate::error::QuizError;
use crate::model::{Question, MIXED_CATEGORY};

/// All quizzes, keyed by category name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizCatalog {
    quizzes: BTreeMap<String, Vec<Question>>,
}

impl QuizCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from decoded blocks. A later block with the same
    /// category replaces the earlier one.
    pub fn from_blocks(blocks: impl IntoIterator<Item = (String, Vec<Question>)>) -> Self {
        let mut quizzes = BTreeMap::new();
        for (category, questions) in blocks {
            if quizzes.insert(category.clone(), questions).is_some() {
                tracing::warn!("category '{category}' appears more than once, keeping the last");
            }
        }
        Self { quizzes }
    }

    pub fn category_exists(&self, name: &str) -> bool {
        self.quizzes.contains_key(name)
    }

    /// Category names in display order.
    pub fn categories(&self) -> Vec<&str> {
        self.quizzes.keys().map(String::as_str).collect()
    }

    pub fn questions(&self, name: &str) -> Option<&[Question]> {
        self.quizzes.get(name).map(Vec::as_slice)
    }

    /// Every question of every category.
    pub fn all_questions(&self) -> impl Iterator<Item = &Question> {
        self.quizzes.values().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Question])> {
        self.quizzes
            .iter()
            .map(|(name, questions)| (name.as_str(), questions.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    /// Check a name before asking the author for any questions.
    pub fn check_new_category(&self, name: &str) -> Result<String, QuizError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QuizError::Validation("category name is empty".into()));
        }
        if name.eq_ignore_ascii_case(MIXED_CATEGORY) {
            return Err(QuizError::ReservedCategory(name.to_string()));
        }
        codec::check_category(name)?;
        if self.category_exists(name) {
            return Err(QuizError::DuplicateCategory(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// Add a new quiz. Nothing is inserted if any check fails.
    pub fn create_quiz(&mut self, name: &str, questions: Vec<Question>) -> Result<(), QuizError> {
        let name = self.check_new_category(name)?;
        for question in &questions {
            codec::check_question(question)?;
        }
        tracing::debug!("created quiz '{name}' with {} questions", questions.len());
        self.quizzes.insert(name, questions);
        Ok(())
    }

    /// Apply `edit` to a copy of the quiz's questions and keep the result
    /// only if every edited question is still storable. The closure sees a
    /// slice, so the question count cannot change.
    pub fn edit_quiz<F>(&mut self, name: &str, edit: F) -> Result<(), QuizError>
    where
        F: FnOnce(&mut [Question]),
    {
        let questions = self
            .quizzes
            .get_mut(name)
            .ok_or_else(|| QuizError::UnknownCategory(name.to_string()))?;

        let mut edited = questions.clone();
        edit(edited.as_mut_slice());
        for question in &edited {
            codec::check_question(question)?;
        }
        *questions = edited;
        Ok(())
    }
}

/// A non-fatal problem with an authored question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoringWarning {
    pub category: String,
    /// 1-based question number within the category.
    pub question_no: usize,
    pub message: String,
}

/// Report questions that load fine but cannot be answered as intended.
pub fn lint_catalog(catalog: &QuizCatalog) -> Vec<AuthoringWarning> {
    let mut warnings = Vec::new();

    for (category, questions) in catalog.iter() {
        let mut warn = |question_no: usize, message: String| {
            warnings.push(AuthoringWarning {
                category: category.to_string(),
                question_no,
                message,
            })
        };

        // Results store the category in a comma-separated field.
        if category.contains(',') {
            warn(0, "category name contains ',' and will corrupt results.txt".into());
        }
        if questions.is_empty() {
            warn(0, "quiz has no questions".into());
        }

        for (idx, question) in questions.iter().enumerate() {
            if question.text.trim().is_empty() {
                warn(idx + 1, "question text is empty".into());
            }
            if question.text.starts_with(codec::CATEGORY_PREFIX) {
                warn(
                    idx + 1,
                    format!(
                        "question text starts with '{}' and will be read back as a category header",
                        codec::CATEGORY_PREFIX
                    ),
                );
            }
            for answer in question.unmatched_answers() {
                warn(
                    idx + 1,
                    format!("correct answer '{answer}' is not one of the options"),
                );
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geography() -> Vec<Question> {
        vec![
            Question::new("Capital of France?", ["Paris", "London"], ["Paris"]),
            Question::new("Longest river?", ["Nile", "Thames"], ["Nile"]),
        ]
    }

    #[test]
    fn create_and_lookup() {
        let mut catalog = QuizCatalog::new();
        catalog.create_quiz(" Geography ", geography()).unwrap();
        assert!(catalog.category_exists("Geography"));
        assert_eq!(catalog.questions("Geography").unwrap().len(), 2);
        assert_eq!(catalog.categories(), vec!["Geography"]);
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let mut catalog = QuizCatalog::new();
        catalog.create_quiz("Geography", geography()).unwrap();
        let err = catalog.create_quiz("Geography", vec![]).unwrap_err();
        assert!(matches!(err, QuizError::DuplicateCategory(_)));
        assert_eq!(catalog.questions("Geography").unwrap().len(), 2);
    }

    #[test]
    fn mixed_is_reserved() {
        let mut catalog = QuizCatalog::new();
        assert!(matches!(
            catalog.create_quiz("Mixed", geography()),
            Err(QuizError::ReservedCategory(_))
        ));
        assert!(catalog.create_quiz("", geography()).is_err());
        assert!(catalog.create_quiz("a,b", geography()).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn create_rejects_unstorable_question() {
        let mut catalog = QuizCatalog::new();
        let bad = vec![Question::new("a|b", ["x"], ["x"])];
        assert!(catalog.create_quiz("Bad", bad).is_err());
        assert!(!catalog.category_exists("Bad"));
    }

    #[test]
    fn edit_keeps_count_and_applies_changes() {
        let mut catalog = QuizCatalog::new();
        catalog.create_quiz("Geography", geography()).unwrap();
        catalog
            .edit_quiz("Geography", |questions| {
                questions[1].text = "Longest river in Africa?".into();
            })
            .unwrap();
        let questions = catalog.questions("Geography").unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].text, "Longest river in Africa?");
    }

    #[test]
    fn rejected_edit_leaves_quiz_untouched() {
        let mut catalog = QuizCatalog::new();
        catalog.create_quiz("Geography", geography()).unwrap();
        let err = catalog
            .edit_quiz("Geography", |questions| {
                questions[0].options = vec!["Paris|Lyon".into()];
            })
            .unwrap_err();
        assert!(matches!(err, QuizError::ReservedDelimiter { .. }));
        assert_eq!(catalog.questions("Geography").unwrap(), geography().as_slice());

        let err = catalog.edit_quiz("History", |_| {}).unwrap_err();
        assert!(matches!(err, QuizError::UnknownCategory(_)));
    }

    #[test]
    fn later_duplicate_block_wins() {
        let catalog = QuizCatalog::from_blocks(vec![
            ("Geography".to_string(), geography()),
            ("Geography".to_string(), vec![]),
        ]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.questions("Geography").unwrap().is_empty());
    }

    #[test]
    fn header_like_question_text_is_refused_and_linted() {
        let mut catalog = QuizCatalog::new();
        let questions = vec![
            Question::new("Category:Bonus round?", ["a", "b"], ["a"]),
            Question::new("Second?", ["x", "y"], ["y"]),
        ];
        assert!(matches!(
            catalog.create_quiz("Trivia", questions.clone()),
            Err(QuizError::Validation(_))
        ));
        assert!(!catalog.category_exists("Trivia"));

        let catalog = QuizCatalog::from_blocks(vec![("Trivia".to_string(), questions)]);
        let warnings = lint_catalog(&catalog);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].question_no, 1);
        assert!(warnings[0].message.contains("category header"));
    }

    #[test]
    fn lint_reports_unmatched_answers() {
        let catalog = QuizCatalog::from_blocks(vec![(
            "Geography".to_string(),
            vec![Question::new("Capital of Italy?", ["Paris", "London"], ["Rome"])],
        )]);
        let warnings = lint_catalog(&catalog);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].question_no, 1);
        assert!(warnings[0].message.contains("Rome"));
    }
}
