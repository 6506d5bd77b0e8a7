//! Registered users, keyed by login.

use std::collections::BTreeMap;

use crate::codec;
use crate::error::QuizError;
use crate::model::{parse_date, User};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: BTreeMap<String, User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from decoded users. A later record with the same
    /// login replaces the earlier one.
    pub fn from_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.login.clone(), u)).collect(),
        }
    }

    pub fn find_user(&self, login: &str) -> Option<&User> {
        self.users.get(login)
    }

    pub fn is_taken(&self, login: &str) -> bool {
        self.users.contains_key(login)
    }

    /// Add a new user; an existing login is never overwritten.
    pub fn register(&mut self, user: User) -> Result<(), QuizError> {
        if user.login.trim().is_empty() {
            return Err(QuizError::Validation("login is empty".into()));
        }
        codec::check_user(&user)?;
        if self.is_taken(&user.login) {
            return Err(QuizError::DuplicateLogin(user.login));
        }
        tracing::debug!("registered user '{}'", user.login);
        self.users.insert(user.login.clone(), user);
        Ok(())
    }

    /// Insert or replace the record for `user.login`.
    pub fn upsert_user(&mut self, user: User) -> Result<(), QuizError> {
        codec::check_user(&user)?;
        self.users.insert(user.login.clone(), user);
        Ok(())
    }

    /// The user whose login and password both match.
    pub fn authenticate(&self, login: &str, password: &str) -> Option<&User> {
        self.find_user(login).filter(|u| u.password == password)
    }

    pub fn change_password(&mut self, login: &str, password: &str) -> Result<(), QuizError> {
        let mut user = self
            .find_user(login)
            .cloned()
            .ok_or_else(|| QuizError::UnknownUser(login.to_string()))?;
        user.password = password.to_string();
        self.upsert_user(user)
    }

    /// Parse `input` as YYYY-MM-DD and store it as the user's date of birth.
    pub fn change_date_of_birth(&mut self, login: &str, input: &str) -> Result<(), QuizError> {
        let date = parse_date(input).ok_or_else(|| QuizError::InvalidDate(input.trim().to_string()))?;
        let user = self
            .users
            .get_mut(login)
            .ok_or_else(|| QuizError::UnknownUser(login.to_string()))?;
        user.date_of_birth = date;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
