//! Opaque session token generation.
//!
//! Tokens are 32 bytes from the operating system CSPRNG rendered as 64
//! lowercase hex characters. Uniqueness is probabilistic; nothing checks the
//! store for collisions.

use rand::{rngs::OsRng, RngCore};

use crate::errors::Result;

/// Raw entropy per token (256 bits)
pub const TOKEN_BYTES: usize = 32;

/// Length of the rendered token
pub const TOKEN_HEX_LEN: usize = TOKEN_BYTES * 2;

/// Source of fresh session tokens
pub trait TokenGenerator: Send + Sync {
    /// Produce a new token. A failing entropy source is an error, never a
    /// reason to fall back to a weaker generator.
    fn generate(&self) -> Result<String>;
}

/// Token generator reading from [`OsRng`]
#[derive(Debug, Clone, Copy, Default)]
pub struct OsTokenGenerator;

impl TokenGenerator for OsTokenGenerator {
    fn generate(&self) -> Result<String> {
        generate_token()
    }
}

/// Generate a token from the operating system random source
pub fn generate_token() -> Result<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(hex::encode(bytes))
}

/// Whether `token` has the exact shape of a generated token
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_HEX_LEN && token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
