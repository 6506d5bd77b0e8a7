//! quizdesk-store: Flat-file persistence and configuration.
//!
//! Owns the on-disk side of quizdesk: where the data files live, loading
//! them into a [`Repository`], flushing it back, and the transcript file.

pub mod config;
pub mod repository;
pub mod transcript;

pub use config::{load_config, load_config_from, DataFiles, QuizdeskConfig};
pub use repository::Repository;
pub use transcript::FileTranscript;
