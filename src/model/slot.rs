use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static SLOT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").unwrap());

/// Error type for slot names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("invalid slot name '{0}': expected lowercase letters, digits, '-' or '_'")]
    InvalidName(String),
}

/// A stable logical name for a UI region whose displayed value can be
/// snapshotted and restored (e.g. `account-name`, `transaction-amount`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotId(String);

impl SlotId {
    pub fn new(name: impl Into<String>) -> Result<Self, SlotError> {
        let name = name.into();
        if SLOT_NAME_RE.is_match(&name) {
            Ok(SlotId(name))
        } else {
            Err(SlotError::InvalidName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SlotId {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlotId::new(s)
    }
}

impl TryFrom<String> for SlotId {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SlotId::new(value)
    }
}

impl From<SlotId> for String {
    fn from(id: SlotId) -> Self {
        id.0
    }
}

/// Version marker issued for every optimistic edit of a slot.
///
/// Completion callbacks carry the token back; only the token matching the
/// slot's latest generation may confirm or revert it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditToken {
    pub slot: SlotId,
    pub generation: u64,
}

/// Visual state applied to a slot's element while an edit is unresolved
/// or has just failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotMarker {
    /// Reduced opacity while the request is in flight
    Tentative,
    /// Transient failure highlight after a revert
    Error,
}

impl SlotMarker {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotMarker::Tentative => "tentative",
            SlotMarker::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_kebab_and_snake_names() {
        assert!(SlotId::new("account-name").is_ok());
        assert!(SlotId::new("transaction_amount").is_ok());
        assert!(SlotId::new("budget2").is_ok());
    }

    #[test]
    fn rejects_selector_like_names() {
        for bad in ["", "#account-name", "Account", "2fast", "form content", ".x"] {
            assert_eq!(
                SlotId::new(bad),
                Err(SlotError::InvalidName(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<SlotId, _> = serde_json::from_str(r#""account-name""#);
        assert_eq!(ok.unwrap().as_str(), "account-name");
        let bad: Result<SlotId, _> = serde_json::from_str(r#""Not Valid""#);
        assert!(bad.is_err());
    }
}
