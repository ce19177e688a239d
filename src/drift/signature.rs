//! Whitespace-insensitive content signatures
//!
//! Normalization strips every whitespace run, so reformatting produces the
//! same signature while any other edit produces a different one.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 of normalized content, 64 lowercase hex chars
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentSignature(String);

impl ContentSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remove all whitespace, including newlines
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect()
}

/// Signature of `text` after normalization
pub fn sign(text: &str) -> ContentSignature {
    let mut hasher = Sha256::new();
    hasher.update(normalize(text).as_bytes());
    ContentSignature(hex::encode(hasher.finalize()))
}
