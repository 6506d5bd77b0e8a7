//! quizdesk configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizdesk_core::model::DEFAULT_QUIZ_LENGTH;

/// Top-level quizdesk configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizdeskConfig {
    /// Directory holding the data files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_quizzes_file")]
    pub quizzes_file: String,
    #[serde(default = "default_results_file")]
    pub results_file: String,
    #[serde(default = "default_transcript_file")]
    pub transcript_file: String,
    /// Questions asked when authoring a new quiz.
    #[serde(default = "default_quiz_length")]
    pub questions_per_quiz: usize,
    /// Questions drawn for a mixed attempt.
    #[serde(default = "default_quiz_length")]
    pub mixed_sample_size: usize,
    /// Entries shown on the leaderboard.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_users_file() -> String {
    "users.txt".to_string()
}
fn default_quizzes_file() -> String {
    "quizzes.txt".to_string()
}
fn default_results_file() -> String {
    "results.txt".to_string()
}
fn default_transcript_file() -> String {
    "last_quiz_details.txt".to_string()
}
fn default_quiz_length() -> usize {
    DEFAULT_QUIZ_LENGTH
}
fn default_leaderboard_size() -> usize {
    20
}

impl Default for QuizdeskConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            users_file: default_users_file(),
            quizzes_file: default_quizzes_file(),
            results_file: default_results_file(),
            transcript_file: default_transcript_file(),
            questions_per_quiz: default_quiz_length(),
            mixed_sample_size: default_quiz_length(),
            leaderboard_size: default_leaderboard_size(),
        }
    }
}

impl QuizdeskConfig {
    /// Paths of the four data files.
    pub fn data_files(&self) -> DataFiles {
        DataFiles {
            users: self.data_dir.join(&self.users_file),
            quizzes: self.data_dir.join(&self.quizzes_file),
            results: self.data_dir.join(&self.results_file),
            transcript: self.data_dir.join(&self.transcript_file),
        }
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.questions_per_quiz >= 1,
            "questions_per_quiz must be at least 1"
        );
        anyhow::ensure!(
            self.mixed_sample_size >= 1,
            "mixed_sample_size must be at least 1"
        );
        anyhow::ensure!(
            self.leaderboard_size >= 1,
            "leaderboard_size must be at least 1"
        );
        Ok(())
    }
}

/// Resolved locations of the data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub users: PathBuf,
    pub quizzes: PathBuf,
    pub results: PathBuf,
    pub transcript: PathBuf,
}

impl DataFiles {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        QuizdeskConfig {
            data_dir: dir.into(),
            ..QuizdeskConfig::default()
        }
        .data_files()
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizdesk.toml` in the current directory
/// 2. `~/.config/quizdesk/config.toml`
///
/// Environment variable override: `QUIZDESK_DATA_DIR`.
pub fn load_config() -> Result<QuizdeskConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizdeskConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizdesk.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<QuizdeskConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizdeskConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZDESK_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }

    let resolved = resolve_env_vars(&config.data_dir.to_string_lossy());
    config.data_dir = PathBuf::from(resolved);

    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizdesk"))
}
