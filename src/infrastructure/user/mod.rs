//! User infrastructure module
//!
//! This module provides the user directory service together with its
//! collaborators: token generation and the in-memory and PostgreSQL stores.

mod postgres_repository;
mod repository;
mod service;
mod token;

pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, LoginRequest, UpdateUserRequest, UserDirectory};
pub use token::{constant_time_compare, RandomTokenGenerator, TokenGenerator};
