//! Cryptographic utilities for session tokens and OAuth state.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in a session token (hex-encoded to 64 chars).
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Number of random bytes in an OAuth CSRF state value.
pub const OAUTH_STATE_BYTES: usize = 24;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a random hex-encoded token of `byte_len` random bytes.
pub fn generate_token(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generates a new opaque session token.
pub fn generate_session_token() -> String {
    generate_token(SESSION_TOKEN_BYTES)
}

/// Generates a new OAuth CSRF state value.
pub fn generate_oauth_state() -> String {
    generate_token(OAUTH_STATE_BYTES)
}

/// Compares two strings without short-circuiting on the first mismatch.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty_string() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_session_token_format() {
        let token = generate_session_token();
        assert_eq!(token.len(), SESSION_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_oauth_state_format() {
        let state = generate_oauth_state();
        assert_eq!(state.len(), OAUTH_STATE_BYTES * 2);
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_session_token(), generate_session_token());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc123", "abc123"));
        assert!(!constant_time_eq("abc123", "abc124"));
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(constant_time_eq("", ""));
    }
}
