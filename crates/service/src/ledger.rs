use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use models::reward::{validate_user_id, RewardBook, RewardEntry};

use crate::errors::ServiceError;
use crate::storage::json_doc_store::{JsonDocStore, LoadOutcome};

/// Durable mapping of `user id -> pending reward amount`.
///
/// Keeps at most one entry per user. The whole mapping is persisted as one
/// pretty-printed JSON object; `BTreeMap` keys keep the file diff-friendly
/// across rewrites.
#[derive(Clone)]
pub struct RewardLedger {
    store: Arc<JsonDocStore<RewardBook>>,
}

impl RewardLedger {
    /// Open the ledger at `path`. Creates an empty well-formed file if
    /// missing; recovers to an empty in-memory mapping on corrupt content.
    pub async fn open<P: Into<PathBuf>>(
        path: P,
    ) -> Result<(Arc<Self>, LoadOutcome), ServiceError> {
        let (store, outcome) = JsonDocStore::<RewardBook>::open(path).await?;
        Ok((Arc::new(Self { store }), outcome))
    }

    /// Whether `user_id` currently has a pending reward. No side effect.
    pub async fn has_reward(&self, user_id: &str) -> bool {
        self.store.read(|book| book.contains_key(user_id)).await
    }

    /// Pending amount for `user_id`, `0` when absent. Absence is not an
    /// error for this accessor.
    pub async fn reward_amount(&self, user_id: &str) -> u32 {
        self.store
            .read(|book| book.get(user_id).copied().unwrap_or(0))
            .await
    }

    /// Upsert the pending amount for `user_id` and persist. This is the
    /// external grant authority's write path.
    pub async fn set_reward(&self, user_id: &str, amount: u32) -> Result<(), ServiceError> {
        validate_user_id(user_id)?;
        let user_id = user_id.to_string();
        self.store
            .update(move |book| {
                book.insert(user_id, amount);
            })
            .await?;
        Ok(())
    }

    /// Delete the entry for `user_id`, persisting iff something was
    /// actually removed. An absent key is a no-op with no file write.
    pub async fn remove_reward(&self, user_id: &str) -> Result<bool, ServiceError> {
        let removed = self
            .store
            .update_if(|book| book.remove(user_id).is_some())
            .await?;
        if removed {
            info!(%user_id, "reward entry removed");
        }
        Ok(removed)
    }

    /// All pending entitlements, for operator listing.
    pub async fn entries(&self) -> Vec<RewardEntry> {
        self.store
            .read(|book| {
                book.iter()
                    .map(|(user_id, amount)| RewardEntry {
                        user_id: user_id.clone(),
                        amount: *amount,
                    })
                    .collect()
            })
            .await
    }

    /// Rewrite the full mapping to the backing file.
    pub async fn save(&self) -> Result<(), ServiceError> {
        self.store.save().await
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }
}
