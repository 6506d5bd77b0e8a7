//! The `quizdesk history` command.

use anyhow::Result;

use quizdesk_core::model::QuizResult;
use quizdesk_store::{QuizdeskConfig, Repository};

use super::leaderboard::results_table;

pub fn execute(config: &QuizdeskConfig, user: &str, format: &str) -> Result<()> {
    let repo = Repository::load_all(config.data_files())?;
    if repo.find_user(user).is_none() {
        anyhow::bail!("user '{user}' not found");
    }

    let results: Vec<&QuizResult> = repo.ledger.results_for_user(user).collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&results)?),
        _ => {
            if results.is_empty() {
                println!("No quiz results found.");
            } else {
                println!("{}", results_table(&results, false));
            }
        }
    }

    Ok(())
}
