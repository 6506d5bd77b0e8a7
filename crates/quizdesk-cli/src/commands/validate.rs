//! The `quizdesk validate` command.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use quizdesk_core::catalog::lint_catalog;
use quizdesk_core::codec::SkippedLine;
use quizdesk_store::{QuizdeskConfig, Repository};

pub fn execute(config: &QuizdeskConfig) -> Result<()> {
    let files = config.data_files();
    let (repo, report) = Repository::load_with_report(files.clone())?;

    let mut total_warnings = 0;

    total_warnings += print_file(&files.users, report.users.items.len(), &report.users.skipped);
    total_warnings += print_file(
        &files.quizzes,
        report.quizzes.items.len(),
        &report.quizzes.skipped,
    );
    total_warnings += print_file(
        &files.results,
        report.results.items.len(),
        &report.results.skipped,
    );

    // Repeated headers: only the last block of each category survives a load.
    let mut seen = HashSet::new();
    for (category, _) in &report.quizzes.items {
        if !seen.insert(category.as_str()) {
            println!("  [{category}] WARNING: category appears more than once, earlier block ignored");
            total_warnings += 1;
        }
    }

    for w in lint_catalog(&repo.catalog) {
        let prefix = if w.question_no == 0 {
            format!("  [{}]", w.category)
        } else {
            format!("  [{} #{}]", w.category, w.question_no)
        };
        println!("{prefix} WARNING: {}", w.message);
        total_warnings += 1;
    }

    for result in repo.ledger.iter() {
        if repo.find_user(&result.user_login).is_none() {
            println!(
                "  WARNING: result for unknown user '{}' ({})",
                result.user_login, result.category
            );
            total_warnings += 1;
        }
    }

    if total_warnings == 0 {
        println!("All data files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn print_file(path: &Path, records: usize, skipped: &[SkippedLine]) -> usize {
    let status = if path.exists() { "" } else { " (missing)" };
    println!("{}: {records} record(s){status}", path.display());
    for line in skipped {
        println!("  line {}: WARNING: {}", line.line_no, line.reason);
    }
    skipped.len()
}
