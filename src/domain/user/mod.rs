//! User domain
//!
//! This module provides domain types and traits for the user directory,
//! including user entities, registration validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserId, UserStatus};
pub use repository::UserRepository;
pub use validation::{validate_password, validate_username, UserValidationError};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
