//! Domain layer - Core business logic and entities

pub mod error;
pub mod user;

pub use error::{DomainError, ErrorKind};
pub use user::{
    validate_password, validate_username, NewUser, User, UserId, UserRepository, UserStatus,
    UserValidationError,
};
