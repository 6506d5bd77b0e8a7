//! The `quizdesk init` command.

use std::path::Path;

use anyhow::{Context, Result};

use quizdesk_store::QuizdeskConfig;

pub fn execute(config: &QuizdeskConfig) -> Result<()> {
    // Create quizdesk.toml
    if Path::new("quizdesk.toml").exists() {
        println!("quizdesk.toml already exists, skipping.");
    } else {
        std::fs::write("quizdesk.toml", SAMPLE_CONFIG)?;
        println!("Created quizdesk.toml");
    }

    // Create a sample quiz file
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("failed to create data directory: {}", config.data_dir.display())
    })?;
    let quizzes_path = config.data_files().quizzes;
    if quizzes_path.exists() {
        println!("{} already exists, skipping.", quizzes_path.display());
    } else {
        std::fs::write(&quizzes_path, SAMPLE_QUIZZES)?;
        println!("Created {}", quizzes_path.display());
    }

    println!("\nNext steps:");
    println!("  1. Run: quizdesk validate");
    println!("  2. Run: quizdesk and register a user");
    println!("  3. Start the 'Geography' quiz or pick 0 for a mixed one");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizdesk configuration

data_dir = "."
users_file = "users.txt"
quizzes_file = "quizzes.txt"
results_file = "results.txt"
transcript_file = "last_quiz_details.txt"

questions_per_quiz = 20
mixed_sample_size = 20
leaderboard_size = 20
"#;

const SAMPLE_QUIZZES: &str = "Category:Geography
What is the capital of France?|Paris;London;Berlin;Madrid|Paris
Which of these rivers flow through Africa?|Nile;Danube;Congo;Volga|Nile;Congo
Which is the largest ocean?|Atlantic;Indian;Pacific;Arctic|Pacific
Category:Science
What is the chemical symbol for gold?|Ag;Au;Gd;Go|Au
Which of these are noble gases?|Helium;Nitrogen;Neon;Oxygen|Helium;Neon
How many planets are in the solar system?|7;8;9;10|8
";
