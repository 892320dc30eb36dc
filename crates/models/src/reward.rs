use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// On-disk shape of the pending-rewards ledger: one JSON object mapping each
/// user id to the amount still owed. `BTreeMap` keeps the serialized key
/// order stable across rewrites.
pub type RewardBook = BTreeMap<String, u32>;

/// A single pending entitlement (business view of one ledger entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEntry {
    pub user_id: String,
    pub amount: u32,
}

/// Reject identifiers the external identity system could never have issued.
pub fn validate_user_id(user_id: &str) -> Result<(), ModelError> {
    if user_id.trim().is_empty() {
        return Err(ModelError::Validation("user id required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_serializes_as_flat_object() {
        let mut book = RewardBook::new();
        book.insert("76561198000000001".to_string(), 50);
        book.insert("76561198000000002".to_string(), 7);
        let json = serde_json::to_value(&book).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "76561198000000001": 50,
                "76561198000000002": 7,
            })
        );
    }

    #[test]
    fn blank_user_id_is_rejected() {
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("   ").is_err());
        assert!(validate_user_id("76561198000000001").is_ok());
    }
}
