use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ModelError;

/// One finalized claim. Field names are the wire format of the claim-log
/// file and must not change: every record ever written has to stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub steamid: String,
    pub timestamp: String,
    pub amount_claimed: u32,
}

impl ClaimRecord {
    /// Build a record for `user_id` stamped with the current UTC instant.
    pub fn new(user_id: &str, amount_claimed: u32) -> Self {
        Self {
            steamid: user_id.to_string(),
            timestamp: current_timestamp(),
            amount_claimed,
        }
    }

    /// Parse the stored timestamp back to the instant it encodes.
    pub fn timestamp_utc(&self) -> Result<DateTime<Utc>, ModelError> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| ModelError::Timestamp(format!("{}: {e}", self.timestamp)))
    }
}

/// On-disk shape of the claim log: a single object whose `claims` field
/// holds the append-only record sequence. An absent or explicit-null field
/// reads as an empty history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBook {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub claims: Vec<ClaimRecord>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ClaimRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Current UTC instant in the fixed sortable form claim records use:
/// RFC 3339 with microsecond precision and a `Z` suffix. Fixed width keeps
/// lexicographic order equal to chronological order.
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
