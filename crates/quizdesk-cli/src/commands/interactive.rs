//! The interactive menus (`quizdesk` / `quizdesk interactive`).

use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::{Local, NaiveDateTime, Timelike};

use quizdesk_core::model::{
    parse_date, CategorySelector, Question, User, DATE_FORMAT, TIMESTAMP_FORMAT,
};
use quizdesk_core::session::QuizSession;
use quizdesk_core::{codec, ErrorKind, QuizError};
use quizdesk_store::{QuizdeskConfig, Repository};

use crate::console::{Console, InputClosed};

const RULE_WIDTH: usize = 50;

pub fn execute(config: QuizdeskConfig) -> Result<()> {
    let repo = Repository::load_all(config.data_files())?;
    let stdin = io::stdin();
    let mut app = App::new(repo, config, Console::new(stdin.lock(), io::stdout()));
    app.run()
}

/// Menu state for one interactive run.
pub struct App<R, W> {
    repo: Repository,
    config: QuizdeskConfig,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(repo: Repository, config: QuizdeskConfig, console: Console<R, W>) -> Self {
        Self {
            repo,
            config,
            console,
        }
    }

    /// Run the top-level menu. Choosing Exit, or closing stdin, saves every
    /// file before returning.
    pub fn run(&mut self) -> Result<()> {
        self.console.line("Welcome to quizdesk!")?;

        match self.main_menu() {
            Err(e) if e.is::<InputClosed>() => {}
            other => other?,
        }

        self.repo.save_all()?;
        Ok(())
    }

    fn main_menu(&mut self) -> Result<()> {
        loop {
            self.console.line("")?;
            self.console
                .line("1. Login\n2. Register\n3. Manage Quizzes\n4. Exit")?;
            match self.console.prompt("Select an option: ")?.trim() {
                "1" => self.login()?,
                "2" => self.register()?,
                "3" => self.manage_quizzes()?,
                "4" => return Ok(()),
                _ => self.console.line("Invalid option. Try again.")?,
            }
        }
    }

    // -----------------------------------------------------------------------
    // Accounts
    // -----------------------------------------------------------------------

    fn login(&mut self) -> Result<()> {
        let login = self.console.prompt("Enter login: ")?;
        let password = self.console.prompt("Enter password: ")?;

        if self.repo.users.authenticate(&login, &password).is_none() {
            return self.console.line("Invalid login or password.");
        }
        self.console.line("Login successful!")?;
        self.user_menu(&login)
    }

    fn register(&mut self) -> Result<()> {
        let login = self.console.prompt("Enter login: ")?;
        if self.repo.users.is_taken(&login) {
            return self.console.line("This login is already taken.");
        }

        let password = self.console.prompt("Enter password: ")?;
        let dob_input = self
            .console
            .prompt("Enter your date of birth (YYYY-MM-DD): ")?;
        let Some(date_of_birth) = parse_date(&dob_input) else {
            return self.console.line("Invalid date format.");
        };

        match self
            .repo
            .users
            .register(User::new(login, password, date_of_birth))
        {
            Ok(()) => {
                self.console
                    .line("Registration successful! You can now log in.")?;
                self.persist(Repository::save_users)
            }
            Err(e) => self.report(&e),
        }
    }

    fn user_menu(&mut self, login: &str) -> Result<()> {
        loop {
            self.console.line("")?;
            self.console.line(format!(
                "1. Start a new quiz\n2. View past results\n3. View Top-{} quiz results\n\
                 4. View Profile\n5. Change settings\n6. View last quiz details\n7. Logout",
                self.config.leaderboard_size
            ))?;
            match self.console.prompt("Select an option: ")?.trim() {
                "1" => self.start_quiz(login)?,
                "2" => self.past_results(login)?,
                "3" => self.top_results()?,
                "4" => self.profile(login)?,
                "5" => self.settings(login)?,
                "6" => self.last_quiz_details()?,
                "7" => return Ok(()),
                _ => self.console.line("Invalid option. Try again.")?,
            }
        }
    }

    fn profile(&mut self, login: &str) -> Result<()> {
        let Some(user) = self.repo.find_user(login) else {
            return self.report(&QuizError::UnknownUser(login.to_string()));
        };
        let text = format!(
            "Your Profile:\nLogin: {}\nDate of Birth: {}",
            user.login,
            user.date_of_birth.format(DATE_FORMAT)
        );
        self.console.line(text)
    }

    fn settings(&mut self, login: &str) -> Result<()> {
        self.console
            .line("1. Change password\n2. Change date of birth")?;
        let outcome = match self.console.prompt("Select an option: ")?.trim() {
            "1" => {
                let password = self.console.prompt("Enter new password: ")?;
                self.repo
                    .users
                    .change_password(login, &password)
                    .map(|()| "Password updated successfully!")
            }
            "2" => {
                let input = self
                    .console
                    .prompt("Enter new date of birth (YYYY-MM-DD): ")?;
                self.repo
                    .users
                    .change_date_of_birth(login, &input)
                    .map(|()| "Date of birth updated successfully!")
            }
            _ => return self.console.line("Invalid option."),
        };

        match outcome {
            Ok(message) => {
                self.persist(Repository::save_users)?;
                self.console.line(message)
            }
            Err(e) => self.report(&e),
        }
    }

    // -----------------------------------------------------------------------
    // Taking quizzes
    // -----------------------------------------------------------------------

    fn start_quiz(&mut self, login: &str) -> Result<()> {
        let categories: Vec<String> = self
            .repo
            .catalog
            .categories()
            .into_iter()
            .map(String::from)
            .collect();

        self.console.line("Available categories:")?;
        for (idx, category) in categories.iter().enumerate() {
            self.console.line(format!("{}. {}", idx + 1, category))?;
        }

        let input = self
            .console
            .prompt("Enter the number of the category or type '0' for mixed: ")?;
        let selector = match input.trim().parse::<usize>() {
            Ok(0) => CategorySelector::Mixed,
            Ok(n) if n <= categories.len() => CategorySelector::Named(categories[n - 1].clone()),
            _ => return self.console.line("Invalid selection."),
        };

        let mut rng = rand::thread_rng();
        let started = QuizSession::start(
            &self.repo.catalog,
            login,
            selector,
            self.config.mixed_sample_size,
            &mut rng,
            self.repo.transcript(),
        );
        let mut session = match started {
            Ok(session) => session,
            Err(e) => return self.report(&e),
        };

        while let Some((number, question)) = session.current() {
            let block = render_question(number, question);
            self.console.line(block)?;

            loop {
                let input = self
                    .console
                    .prompt("Enter your answers as numbers separated by semicolon (;): ")?;
                match session.answer(&input) {
                    Ok(_) => break,
                    Err(e) if e.kind() == ErrorKind::Validation => self.report(&e)?,
                    Err(e) => {
                        self.report(&e)?;
                        return self.console.line("Quiz aborted.");
                    }
                }
            }
        }

        let total = session.total();
        match session.finish(now(), &mut self.repo.ledger) {
            Ok(result) => {
                self.console.line(format!(
                    "You answered {} out of {} correctly.",
                    result.score, total
                ))?;
                self.persist(Repository::save_results)
            }
            Err(e) => self.report(&e),
        }
    }

    fn past_results(&mut self, login: &str) -> Result<()> {
        let lines: Vec<String> = self
            .repo
            .ledger
            .results_for_user(login)
            .map(|r| {
                format!(
                    "Category: {}, Date: {}, Score: {}",
                    r.category,
                    r.date.format(TIMESTAMP_FORMAT),
                    r.score
                )
            })
            .collect();

        if lines.is_empty() {
            return self.console.line("No quiz results found.");
        }
        self.console.line("Your past results:")?;
        for line in lines {
            self.console.line(line)?;
        }
        Ok(())
    }

    fn top_results(&mut self) -> Result<()> {
        let size = self.config.leaderboard_size;
        let lines: Vec<String> = self
            .repo
            .ledger
            .top(size)
            .into_iter()
            .map(|r| {
                format!(
                    "User: {}, Score: {}, Date: {}, Category: {}",
                    r.user_login,
                    r.score,
                    r.date.format(TIMESTAMP_FORMAT),
                    r.category
                )
            })
            .collect();

        if lines.is_empty() {
            return self.console.line("No results available.");
        }
        self.console.line(format!("Top-{size} results:"))?;
        for line in lines {
            self.console.line(line)?;
        }
        Ok(())
    }

    fn last_quiz_details(&mut self) -> Result<()> {
        match self.repo.transcript().read() {
            Ok(Some(text)) => {
                self.console.line("Details of the Last Quiz:")?;
                self.console.line("=".repeat(RULE_WIDTH))?;
                self.console.line(text)
            }
            Ok(None) => self
                .console
                .line("No details available for the last quiz."),
            Err(e) => self.report(&e),
        }
    }

    // -----------------------------------------------------------------------
    // Authoring
    // -----------------------------------------------------------------------

    fn manage_quizzes(&mut self) -> Result<()> {
        loop {
            self.console.line("")?;
            self.console
                .line("1. Create a new quiz\n2. Edit an existing quiz\n3. Back")?;
            match self.console.prompt("Select an option: ")?.trim() {
                "1" => self.create_quiz()?,
                "2" => self.edit_quiz()?,
                "3" => return Ok(()),
                _ => self.console.line("Invalid option. Try again.")?,
            }
        }
    }

    fn create_quiz(&mut self) -> Result<()> {
        let input = self.console.prompt("Enter quiz category: ")?;
        let category = match self.repo.catalog.check_new_category(&input) {
            Ok(category) => category,
            Err(e) => return self.report(&e),
        };

        let count = self.config.questions_per_quiz;
        let mut questions = Vec::with_capacity(count);
        while questions.len() < count {
            self.console
                .line(format!("\nQuestion {}:", questions.len() + 1))?;
            let text = self.console.prompt("Enter question text: ")?;
            let options = self
                .console
                .prompt("Enter options separated by semicolon (;): ")?;
            let answers = self
                .console
                .prompt("Enter correct answers separated by semicolon (;): ")?;

            let question = Question::new(text, split_list(&options), split_list(&answers));
            if let Err(e) = codec::check_question(&question) {
                self.report(&e)?;
                continue;
            }
            self.warn_unmatched(&question)?;
            questions.push(question);
        }

        match self.repo.create_quiz(&category, questions) {
            Ok(()) => {
                self.console.line("Quiz created successfully!")?;
                self.persist(Repository::save_quizzes)
            }
            Err(e) => self.report(&e),
        }
    }

    fn edit_quiz(&mut self) -> Result<()> {
        let category = self.console.prompt("Enter quiz category to edit: ")?;
        let Some(existing) = self.repo.catalog.questions(category.trim()) else {
            return self.console.line("This category does not exist.");
        };
        let category = category.trim().to_string();
        let mut edited = existing.to_vec();

        for (idx, question) in edited.iter_mut().enumerate() {
            self.console
                .line(format!("\nQuestion {}: {}", idx + 1, question.text))?;

            let text = self
                .console
                .prompt("Edit question text (leave blank to keep unchanged): ")?;
            if !text.trim().is_empty() {
                question.text = text;
            }

            let options = self
                .console
                .prompt("Edit options separated by semicolon (leave blank to keep unchanged): ")?;
            if !options.trim().is_empty() {
                question.options = split_list(&options);
            }

            let answers = self.console.prompt(
                "Edit correct answers separated by semicolon (leave blank to keep unchanged): ",
            )?;
            if !answers.trim().is_empty() {
                question.correct_answers = split_list(&answers);
            }
        }

        for question in &edited {
            self.warn_unmatched(question)?;
        }

        match self
            .repo
            .edit_quiz(&category, |questions| questions.clone_from_slice(&edited))
        {
            Ok(()) => {
                self.console.line("Quiz updated successfully!")?;
                self.persist(Repository::save_quizzes)
            }
            Err(e) => {
                self.report(&e)?;
                self.console.line("No changes were saved.")
            }
        }
    }

    fn warn_unmatched(&mut self, question: &Question) -> Result<()> {
        for answer in question.unmatched_answers() {
            self.console.line(format!(
                "Warning: correct answer '{answer}' is not one of the options."
            ))?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Print a domain error. Only console failures propagate.
    fn report(&mut self, err: &QuizError) -> Result<()> {
        match err.kind() {
            ErrorKind::Storage => {
                tracing::error!("{err}");
                self.console.line(format!("Storage error: {err}"))
            }
            ErrorKind::Validation | ErrorKind::NotFound => {
                self.console.line(format!("Error: {err}"))
            }
        }
    }

    /// Flush one file; a storage fault is reported and the menu carries on.
    fn persist(&mut self, save: fn(&Repository) -> Result<(), QuizError>) -> Result<()> {
        if let Err(e) = save(&self.repo) {
            self.report(&e)?;
        }
        Ok(())
    }
}

fn render_question(number: usize, question: &Question) -> String {
    let mut block = format!("\nQuestion {number}: {}", question.text);
    for (idx, option) in question.options.iter().enumerate() {
        block.push_str(&format!("\n{}. {}", idx + 1, option));
    }
    block
}

/// Split a `;`-separated list typed by an author, trimming each item.
fn split_list(input: &str) -> Vec<String> {
    input.split(';').map(|s| s.trim().to_string()).collect()
}

/// Current local time at the precision stored in `results.txt`.
fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizdesk_store::DataFiles;

    fn run_script(repo: Repository, config: QuizdeskConfig, script: &str) -> (Repository, String) {
        let mut out = Vec::new();
        let repo = {
            let mut app = App::new(repo, config, Console::new(script.as_bytes(), &mut out));
            app.run().unwrap();
            app.repo
        };
        (repo, String::from_utf8(out).unwrap())
    }

    fn config_in(dir: &std::path::Path) -> QuizdeskConfig {
        QuizdeskConfig {
            data_dir: dir.to_path_buf(),
            questions_per_quiz: 1,
            ..QuizdeskConfig::default()
        }
    }

    #[test]
    fn register_and_exit_saves_user() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let repo = Repository::empty(DataFiles::in_dir(dir.path()));

        let (repo, out) = run_script(repo, config, "2\nalice\npw\n1990-01-02\n4\n");
        assert!(out.contains("Registration successful!"));
        assert!(repo.find_user("alice").is_some());
        let users = std::fs::read_to_string(dir.path().join("users.txt")).unwrap();
        assert_eq!(users, "alice,pw,1990-01-02\n");
    }

    #[test]
    fn create_take_and_review_quiz() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let repo = Repository::empty(DataFiles::in_dir(dir.path()));

        let script = "2\nalice\npw\n1990-01-02\n\
                      3\n1\nMath\n2+2?\n3; 4 ;5\n4\n3\n\
                      1\nalice\npw\n1\n1\n9\n2\n2\n6\n7\n4\n";
        let (repo, out) = run_script(repo, config, script);

        assert!(out.contains("Quiz created successfully!"));
        assert!(out.contains("option 9 is out of range (1-3)"));
        assert!(out.contains("You answered 1 out of 1 correctly."));
        assert!(out.contains("Category: Math"));
        assert!(out.contains("Your Answers: 4"));
        assert_eq!(repo.ledger.len(), 1);
        assert_eq!(repo.catalog.questions("Math").unwrap()[0].options, vec!["3", "4", "5"]);
    }

    #[test]
    fn closing_input_still_saves() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut repo = Repository::empty(DataFiles::in_dir(dir.path()));
        repo.create_quiz("Art", vec![Question::new("q", ["a"], ["a"])])
            .unwrap();

        let (_, out) = run_script(repo, config, "3\n");
        assert!(out.contains("Create a new quiz"));
        let quizzes = std::fs::read_to_string(dir.path().join("quizzes.txt")).unwrap();
        assert_eq!(quizzes, "Category:Art\nq|a|a\n");
    }

    #[test]
    fn split_list_trims_items() {
        assert_eq!(split_list(" a ;b; c"), vec!["a", "b", "c"]);
        assert_eq!(split_list(""), vec![""]);
    }
}
