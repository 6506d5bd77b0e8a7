//! quizdesk-core: Quiz model, flat-file codec, scoring, and session engine.
//!
//! This crate holds everything about quizzes that does not touch the
//! filesystem: the data model, the line-oriented text codec, the user and
//! quiz collections, the result ledger, and the quiz session engine.

pub mod catalog;
pub mod codec;
pub mod error;
pub mod ledger;
pub mod model;
pub mod scoring;
pub mod session;
pub mod transcript;
pub mod users;

pub use error::{ErrorKind, QuizError};
