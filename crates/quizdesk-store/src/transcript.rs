//! Transcript sink backed by `last_quiz_details.txt`.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use quizdesk_core::transcript::{render_entry, render_header, TranscriptEntry, TranscriptSink};
use quizdesk_core::QuizError;

/// Writes the transcript to a file: truncated on `begin`, appended to on
/// every `record`.
#[derive(Debug, Clone)]
pub struct FileTranscript {
    path: PathBuf,
}

impl FileTranscript {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last transcript written, or `None` if no quiz has been taken.
    pub fn read(&self) -> Result<Option<String>, QuizError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuizError::storage(&self.path, e)),
        }
    }
}

impl TranscriptSink for FileTranscript {
    fn begin(&mut self, category: &str) -> Result<(), QuizError> {
        fs::write(&self.path, render_header(category))
            .map_err(|e| QuizError::storage(&self.path, e))
    }

    fn record(&mut self, entry: &TranscriptEntry) -> Result<(), QuizError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| QuizError::storage(&self.path, e))?;
        file.write_all(render_entry(entry).as_bytes())
            .map_err(|e| QuizError::storage(&self.path, e))
    }
}
