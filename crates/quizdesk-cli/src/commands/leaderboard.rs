//! The `quizdesk leaderboard` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizdesk_core::model::{QuizResult, TIMESTAMP_FORMAT};
use quizdesk_store::{QuizdeskConfig, Repository};

pub fn execute(config: &QuizdeskConfig, top: Option<usize>, format: &str) -> Result<()> {
    let n = top.unwrap_or(config.leaderboard_size);
    anyhow::ensure!(n >= 1, "--top must be at least 1");

    let repo = Repository::load_all(config.data_files())?;
    let results = repo.ledger.top(n);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&results)?),
        _ => {
            if results.is_empty() {
                println!("No results available.");
            } else {
                println!("{}", results_table(&results, true));
            }
        }
    }

    Ok(())
}

/// Ranked table of results; `with_user` adds the login column.
pub fn results_table(results: &[&QuizResult], with_user: bool) -> Table {
    let mut table = Table::new();
    let mut header = vec!["#"];
    if with_user {
        header.push("User");
    }
    header.extend(["Score", "Date", "Category"]);
    table.set_header(header);

    for (idx, result) in results.iter().enumerate() {
        let mut row = vec![Cell::new(idx + 1)];
        if with_user {
            row.push(Cell::new(&result.user_login));
        }
        row.push(Cell::new(result.score));
        row.push(Cell::new(result.date.format(TIMESTAMP_FORMAT)));
        row.push(Cell::new(&result.category));
        table.add_row(row);
    }

    table
}
