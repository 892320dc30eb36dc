use std::path::{Path, PathBuf};
use std::sync::Arc;

use models::claim::{ClaimBook, ClaimRecord};

use crate::errors::ServiceError;
use crate::storage::json_doc_store::{JsonDocStore, LoadOutcome};

/// Durable, append-only history of completed claims.
///
/// Records are immutable once written; this type exposes no update or
/// delete path. The sequence is persisted inside the `claims` container of
/// one pretty-printed JSON document.
#[derive(Clone)]
pub struct ClaimLog {
    store: Arc<JsonDocStore<ClaimBook>>,
}

impl ClaimLog {
    /// Open the claim log at `path`. A missing file is bootstrapped to
    /// `{"claims": []}`; corrupt content recovers to an empty in-memory
    /// history (history loss on corruption is accepted over blocking
    /// operation).
    pub async fn open<P: Into<PathBuf>>(
        path: P,
    ) -> Result<(Arc<Self>, LoadOutcome), ServiceError> {
        let (store, outcome) = JsonDocStore::<ClaimBook>::open(path).await?;
        Ok((Arc::new(Self { store }), outcome))
    }

    /// Append a record for `user_id` stamped with the current UTC instant
    /// and persist immediately. Only a persistence failure makes this fail.
    pub async fn log_claim(
        &self,
        user_id: &str,
        amount_claimed: u32,
    ) -> Result<ClaimRecord, ServiceError> {
        let record = ClaimRecord::new(user_id, amount_claimed);
        let appended = record.clone();
        self.store
            .update(move |book| book.claims.push(record))
            .await?;
        Ok(appended)
    }

    /// Full history, oldest first.
    pub async fn records(&self) -> Vec<ClaimRecord> {
        self.store.read(|book| book.claims.clone()).await
    }

    pub async fn len(&self) -> usize {
        self.store.read(|book| book.claims.len()).await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Rewrite the full container to the backing file.
    pub async fn save(&self) -> Result<(), ServiceError> {
        self.store.save().await
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }
}
