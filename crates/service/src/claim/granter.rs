use async_trait::async_trait;
use tracing::info;

use crate::errors::ServiceError;

/// Collaborator that physically delivers a reward to a user. How delivery
/// happens is host-specific; the claim flow only cares that it was invoked
/// before any bookkeeping.
#[async_trait]
pub trait RewardGranter: Send + Sync {
    async fn grant(
        &self,
        user_id: &str,
        item: &str,
        amount: u32,
        skin_id: u64,
    ) -> Result<(), ServiceError>;
}

/// Granter for hosts without an item pipeline: records delivery in the log
/// stream only.
pub struct LoggingGranter;

#[async_trait]
impl RewardGranter for LoggingGranter {
    async fn grant(
        &self,
        user_id: &str,
        item: &str,
        amount: u32,
        skin_id: u64,
    ) -> Result<(), ServiceError> {
        info!(%user_id, %item, amount, skin_id, "reward_delivered");
        Ok(())
    }
}

/// Simple recording granter for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// One observed delivery.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct GrantCall {
        pub user_id: String,
        pub item: String,
        pub amount: u32,
        pub skin_id: u64,
    }

    /// Records every grant; optionally fails each one to exercise the
    /// grant-before-bookkeeping ordering.
    #[derive(Default)]
    pub struct RecordingGranter {
        calls: Mutex<Vec<GrantCall>>,
        fail: bool,
    }

    impl RecordingGranter {
        pub fn new() -> Self {
            Self::default()
        }

        /// A granter whose every delivery fails.
        pub fn failing() -> Self {
            Self { calls: Mutex::new(Vec::new()), fail: true }
        }

        pub fn calls(&self) -> Vec<GrantCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RewardGranter for RecordingGranter {
        async fn grant(
            &self,
            user_id: &str,
            item: &str,
            amount: u32,
            skin_id: u64,
        ) -> Result<(), ServiceError> {
            self.calls.lock().unwrap().push(GrantCall {
                user_id: user_id.to_string(),
                item: item.to_string(),
                amount,
                skin_id,
            });
            if self.fail {
                return Err(ServiceError::Grant("delivery refused".into()));
            }
            Ok(())
        }
    }
}
