//! User validation utilities

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username is required")]
    MissingUsername,

    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Password is required")]
    MissingPassword,

    #[error("Password cannot be empty")]
    EmptyPassword,
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        DomainError::invalid_input(err.to_string())
    }
}

/// Validate a username supplied for registration
///
/// Only presence is checked; the directory places no rules on the
/// character set or length of a username.
pub fn validate_username(username: Option<&str>) -> Result<&str, UserValidationError> {
    match username {
        None => Err(UserValidationError::MissingUsername),
        Some("") => Err(UserValidationError::EmptyUsername),
        Some(username) => Ok(username),
    }
}

/// Validate a password supplied for registration
pub fn validate_password(password: Option<&str>) -> Result<&str, UserValidationError> {
    match password {
        None => Err(UserValidationError::MissingPassword),
        Some("") => Err(UserValidationError::EmptyPassword),
        Some(password) => Ok(password),
    }
}
