//! Source identity.
//!
//! A `SourceKey` names one externally-mutable tabular source (one sheet/tab)
//! and therefore one snapshot table and one coordinator lock slot.

use serde::{Deserialize, Serialize};

/// Identifier for a reconcilable source.
///
/// Keys are opaque to the core; the store derives a physical table name from
/// the sanitized form, and the coordinator uses the raw form as its lock key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceKey(String);

impl SourceKey {
    /// Create a key from its raw string form.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the raw string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sanitized form safe for embedding in a SQL identifier: lowercase
    /// alphanumerics preserved, every other character mapped to `_`.
    pub fn sanitized(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl std::fmt::Display for SourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SourceKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_preserves_alphanumerics() {
        let key = SourceKey::new("Roster2024");
        assert_eq!(key.sanitized(), "roster2024");
    }

    #[test]
    fn test_sanitized_maps_punctuation() {
        let key = SourceKey::new("team roster/2024!");
        assert_eq!(key.sanitized(), "team_roster_2024_");
    }

    #[test]
    fn test_display_is_raw() {
        let key = SourceKey::new("Team Roster");
        assert_eq!(key.to_string(), "Team Roster");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key = SourceKey::new("roster");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"roster\"");
        let back: SourceKey = serde_json::from_str("\"roster\"").unwrap();
        assert_eq!(back, key);
    }
}
