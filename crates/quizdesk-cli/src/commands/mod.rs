pub mod history;
pub mod init;
pub mod interactive;
pub mod leaderboard;
pub mod validate;
