//! Session identifiers.

use std::fmt::{Display, Formatter, Result as FmtResult};

use uuid::Uuid;

const MAX_SESSION_ID_LEN: usize = 128;

/// Opaque, client-scoped identifier correlating cart requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    /// Accept a caller-supplied session id.
    ///
    /// Blank or oversized values are treated as absent.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.len() > MAX_SESSION_ID_LEN {
            return None;
        }

        Some(Self(trimmed.to_string()))
    }

    /// Mint a new session id for a caller that did not send one.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let session = SessionId::parse("  abc-123 ").expect("non-blank id");

        assert_eq!(session.as_str(), "abc-123");
    }

    #[test]
    fn parse_rejects_blank_and_oversized_values() {
        assert!(SessionId::parse("").is_none());
        assert!(SessionId::parse("   ").is_none());
        assert!(SessionId::parse(&"x".repeat(MAX_SESSION_ID_LEN + 1)).is_none());
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }
}
