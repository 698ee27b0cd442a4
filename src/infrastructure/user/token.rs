//! Session token generation
//!
//! Tokens are opaque random strings issued once per user at registration.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use std::fmt::Debug;

/// Number of random bytes behind a token (256 bits)
const TOKEN_BYTES: usize = 32;

/// Trait for issuing user tokens
pub trait TokenGenerator: Send + Sync + Debug {
    /// Generate a fresh, unguessable token
    fn generate(&self) -> String;
}

/// Token generator backed by the thread-local CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenGenerator;

impl RandomTokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        let mut random_bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        URL_SAFE_NO_PAD.encode(&random_bytes)
    }
}

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
