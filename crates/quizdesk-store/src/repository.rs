//! File-backed repository holding every user, quiz, and result.
//!
//! The repository is the single owner of application state. It is built
//! once at startup with [`Repository::load_all`] and passed to whatever
//! needs it. Mutations only touch memory; the caller decides when to flush
//! with one of the `save_*` methods, each of which rewrites its whole file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use quizdesk_core::catalog::QuizCatalog;
use quizdesk_core::codec::{self, Decoded};
use quizdesk_core::ledger::ResultLedger;
use quizdesk_core::model::{Question, QuizResult, User};
use quizdesk_core::users::UserDirectory;
use quizdesk_core::QuizError;

use crate::config::DataFiles;
use crate::transcript::FileTranscript;

/// Lines dropped while loading, per file.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub users: Decoded<User>,
    pub quizzes: Decoded<(String, Vec<Question>)>,
    pub results: Decoded<QuizResult>,
}

#[derive(Debug, Clone)]
pub struct Repository {
    files: DataFiles,
    pub users: UserDirectory,
    pub catalog: QuizCatalog,
    pub ledger: ResultLedger,
}

impl Repository {
    /// An empty repository that will save to `files`.
    pub fn empty(files: DataFiles) -> Self {
        Self {
            files,
            users: UserDirectory::new(),
            catalog: QuizCatalog::new(),
            ledger: ResultLedger::new(),
        }
    }

    /// Load every data file. A missing file is an empty collection.
    pub fn load_all(files: DataFiles) -> Result<Self, QuizError> {
        let (repo, report) = Self::load_with_report(files)?;
        let skipped =
            report.users.skipped.len() + report.quizzes.skipped.len() + report.results.skipped.len();
        if skipped > 0 {
            tracing::debug!("dropped {skipped} malformed line(s) while loading");
        }
        Ok(repo)
    }

    /// Load every data file and also return what was decoded and dropped.
    pub fn load_with_report(files: DataFiles) -> Result<(Self, LoadReport), QuizError> {
        let report = LoadReport {
            users: read_optional(&files.users)?.map_or_else(Decoded::default, |t| {
                codec::decode_users(&t)
            }),
            quizzes: read_optional(&files.quizzes)?.map_or_else(Decoded::default, |t| {
                codec::decode_quizzes(&t)
            }),
            results: read_optional(&files.results)?.map_or_else(Decoded::default, |t| {
                codec::decode_results(&t)
            }),
        };

        let repo = Self {
            users: UserDirectory::from_users(report.users.items.iter().cloned()),
            catalog: QuizCatalog::from_blocks(report.quizzes.items.iter().cloned()),
            ledger: ResultLedger::from_results(report.results.items.iter().cloned()),
            files,
        };
        tracing::debug!(
            "loaded {} users, {} quizzes, {} results",
            repo.users.len(),
            repo.catalog.len(),
            repo.ledger.len()
        );
        Ok((repo, report))
    }

    pub fn files(&self) -> &DataFiles {
        &self.files
    }

    pub fn save_users(&self) -> Result<(), QuizError> {
        write_file(&self.files.users, codec::encode_users(self.users.iter()))
    }

    pub fn save_quizzes(&self) -> Result<(), QuizError> {
        write_file(&self.files.quizzes, codec::encode_quizzes(self.catalog.iter()))
    }

    pub fn save_results(&self) -> Result<(), QuizError> {
        write_file(&self.files.results, codec::encode_results(self.ledger.iter()))
    }

    /// Save every file. A failure on one file does not stop the others;
    /// the first error is returned.
    pub fn save_all(&self) -> Result<(), QuizError> {
        let users = self.save_users();
        let quizzes = self.save_quizzes();
        let results = self.save_results();
        users.and(quizzes).and(results)
    }

    pub fn find_user(&self, login: &str) -> Option<&User> {
        self.users.find_user(login)
    }

    pub fn upsert_user(&mut self, user: User) -> Result<(), QuizError> {
        self.users.upsert_user(user)
    }

    pub fn category_exists(&self, name: &str) -> bool {
        self.catalog.category_exists(name)
    }

    pub fn create_quiz(&mut self, name: &str, questions: Vec<Question>) -> Result<(), QuizError> {
        self.catalog.create_quiz(name, questions)
    }

    pub fn edit_quiz<F>(&mut self, name: &str, edit: F) -> Result<(), QuizError>
    where
        F: FnOnce(&mut [Question]),
    {
        self.catalog.edit_quiz(name, edit)
    }

    /// Sink for the next attempt's transcript.
    pub fn transcript(&self) -> FileTranscript {
        FileTranscript::new(&self.files.transcript)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, QuizError> {
    match fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!("read {}", path.display());
            Ok(Some(text))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(QuizError::storage(path, e)),
    }
}

fn write_file(path: &Path, contents: String) -> Result<(), QuizError> {
    fs::write(path, contents).map_err(|e| QuizError::storage(path, e))?;
    tracing::info!("saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quizdesk_core::model::CategorySelector;
    use quizdesk_core::session::QuizSession;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_repo(files: DataFiles) -> Repository {
        let mut repo = Repository::empty(files);
        repo.users
            .register(User::new(
                "alice",
                "pw",
                NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            ))
            .unwrap();
        repo.create_quiz(
            "Geography",
            vec![
                Question::new("Capital of France?", ["Paris", "London"], ["Paris"]),
                Question::new("Pick rivers", ["Nile", "Alps", "Danube"], ["Nile", "Danube"]),
            ],
        )
        .unwrap();
        repo.ledger.append(QuizResult {
            user_login: "alice".into(),
            score: 2,
            date: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(14, 15, 16)
                .unwrap(),
            category: "Geography".into(),
        });
        repo
    }

    #[test]
    fn missing_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::load_all(DataFiles::in_dir(dir.path())).unwrap();
        assert!(repo.users.is_empty());
        assert!(repo.catalog.is_empty());
        assert!(repo.ledger.is_empty());
    }

    #[test]
    fn save_then_load_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let files = DataFiles::in_dir(dir.path());
        let repo = sample_repo(files.clone());
        repo.save_all().unwrap();

        let loaded = Repository::load_all(files).unwrap();
        assert_eq!(loaded.users, repo.users);
        assert_eq!(loaded.catalog, repo.catalog);
        assert_eq!(loaded.ledger, repo.ledger);

        let users_text = std::fs::read_to_string(dir.path().join("users.txt")).unwrap();
        assert_eq!(users_text, "alice,pw,1990-05-17\n");
        let results_text = std::fs::read_to_string(dir.path().join("results.txt")).unwrap();
        assert_eq!(results_text, "alice,2,2024-03-01 14:15:16,Geography\n");
    }

    #[test]
    fn malformed_lines_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let files = DataFiles::in_dir(dir.path());
        std::fs::write(&files.users, "alice,pw,1990-05-17\nbob,pw\n").unwrap();
        std::fs::write(&files.results, "alice,x,2024-01-01 00:00:00,Art\n").unwrap();

        let (repo, report) = Repository::load_with_report(files).unwrap();
        assert_eq!(repo.users.len(), 1);
        assert!(repo.find_user("alice").is_some());
        assert_eq!(report.users.skipped.len(), 1);
        assert!(repo.ledger.is_empty());
        assert_eq!(report.results.skipped[0].line_no, 1);
    }

    #[test]
    fn saves_overwrite_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let files = DataFiles::in_dir(dir.path());
        std::fs::write(&files.users, "stale,line,2000-01-01\n").unwrap();

        let repo = sample_repo(files.clone());
        repo.save_users().unwrap();
        let text = std::fs::read_to_string(&files.users).unwrap();
        assert!(!text.contains("stale"));
    }

    #[test]
    fn mutations_do_not_touch_disk_until_saved() {
        let dir = tempfile::tempdir().unwrap();
        let files = DataFiles::in_dir(dir.path());
        let mut repo = sample_repo(files.clone());
        repo.edit_quiz("Geography", |qs| qs[0].text = "Capital of Spain?".into())
            .unwrap();
        assert!(!files.quizzes.exists());

        repo.save_quizzes().unwrap();
        let loaded = Repository::load_all(files).unwrap();
        assert_eq!(
            loaded.catalog.questions("Geography").unwrap()[0].text,
            "Capital of Spain?"
        );
        assert!(loaded.category_exists("Geography"));
    }

    #[test]
    fn unreadable_data_dir_is_a_storage_fault() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where a file is expected cannot be read as text.
        let files = DataFiles::in_dir(dir.path());
        std::fs::create_dir(&files.users).unwrap();
        let err = Repository::load_all(files).unwrap_err();
        assert_eq!(err.kind(), quizdesk_core::ErrorKind::Storage);
    }

    #[test]
    fn save_all_keeps_going_after_a_failed_file() {
        let dir = tempfile::tempdir().unwrap();
        let files = DataFiles::in_dir(dir.path());
        std::fs::create_dir(&files.users).unwrap();

        let repo = sample_repo(files.clone());
        let err = repo.save_all().unwrap_err();
        assert_eq!(err.kind(), quizdesk_core::ErrorKind::Storage);
        assert!(matches!(err, QuizError::Storage { ref path, .. } if *path == files.users));

        assert!(files.quizzes.is_file());
        assert!(files.results.is_file());
    }

    #[test]
    fn header_like_question_never_reaches_disk() {
        let dir = tempfile::tempdir().unwrap();
        let files = DataFiles::in_dir(dir.path());
        let mut repo = sample_repo(files.clone());

        let err = repo
            .create_quiz(
                "Trivia",
                vec![
                    Question::new("Category:Bonus round?", ["a", "b"], ["a"]),
                    Question::new("Second?", ["x", "y"], ["y"]),
                ],
            )
            .unwrap_err();
        assert_eq!(err.kind(), quizdesk_core::ErrorKind::Validation);

        let err = repo
            .edit_quiz("Geography", |qs| qs[1].text = "Category:Rivers".into())
            .unwrap_err();
        assert_eq!(err.kind(), quizdesk_core::ErrorKind::Validation);

        repo.save_quizzes().unwrap();
        let loaded = Repository::load_all(files).unwrap();
        assert_eq!(loaded.catalog, repo.catalog);
        assert_eq!(loaded.catalog.categories(), vec!["Geography"]);
        assert_eq!(loaded.catalog.questions("Geography").unwrap().len(), 2);
    }

    #[test]
    fn quiz_attempt_writes_transcript_and_result() {
        let dir = tempfile::tempdir().unwrap();
        let files = DataFiles::in_dir(dir.path());
        let mut repo = sample_repo(files.clone());
        let mut rng = StdRng::seed_from_u64(1);

        let mut session = QuizSession::start(
            &repo.catalog,
            "alice",
            CategorySelector::Named("Geography".into()),
            20,
            &mut rng,
            repo.transcript(),
        )
        .unwrap();
        session.answer("1").unwrap();
        session.answer("3;1").unwrap();
        let finished_at = NaiveDate::from_ymd_opt(2024, 4, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let result = session.finish(finished_at, &mut repo.ledger).unwrap();
        assert_eq!(result.score, 2);
        repo.save_results().unwrap();

        let transcript = repo.transcript().read().unwrap().unwrap();
        assert!(transcript.contains("Your Answers: Danube, Nile"));
        assert_eq!(transcript.matches("Result: Correct").count(), 2);

        let loaded = Repository::load_all(files).unwrap();
        assert_eq!(loaded.ledger.len(), 2);
        assert_eq!(loaded.ledger.iter().last().unwrap().date, finished_at);
    }
}
