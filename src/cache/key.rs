//! Content-addressed document keys.

use std::fmt;

use sha2::{Digest, Sha256};

/// Identity of a document snapshot: the SHA-256 of its text.
///
/// Equal keys imply equal text, so a cached span set can be shared by every
/// buffer that happens to hold the same content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey([u8; 32]);

impl DocumentKey {
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self(Sha256::digest(text.as_bytes()).into())
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentKey({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stability() {
        let a = DocumentKey::from_text("<!-- ko if: x -->");
        let b = DocumentKey::from_text("<!-- ko if: x -->");
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_differs_with_content() {
        let a = DocumentKey::from_text("<!-- ko if: x -->");
        let b = DocumentKey::from_text("<!-- ko if: y -->");
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_format() {
        let key = DocumentKey::from_text("");
        let hex = key.to_string();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(
            hex,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
