use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::{error, warn};

use crate::errors::ServiceError;

/// How the in-memory working set was obtained when a store was opened.
///
/// Callers that care about the recovery path can branch or assert on this
/// instead of scraping log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The backing file existed and parsed cleanly.
    Loaded,
    /// The backing file was missing; an empty document was persisted in its
    /// place so a fresh deployment always starts from a well-formed file.
    Bootstrapped,
    /// The backing file was unreadable or malformed; an empty document was
    /// substituted in memory. The file itself is left alone until the next
    /// mutation rewrites it.
    Recovered(String),
}

/// Generic JSON file-backed document store.
///
/// Holds the whole document in memory as the authoritative working set and
/// mirrors it to disk by rewriting the file in full, pretty-printed, on
/// every mutation. Intended for small host-owned state where a database is
/// overkill and the file doubles as the operator interface.
pub struct JsonDocStore<T> {
    inner: Arc<RwLock<T>>,
    file_path: PathBuf,
}

impl<T> JsonDocStore<T>
where
    T: Default + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Open the store at `path`, classifying how the document was obtained.
    ///
    /// A missing file is created with `T::default()`. Unreadable or
    /// malformed content falls back to `T::default()` in memory and is
    /// reported as [`LoadOutcome::Recovered`]. A permission failure is not
    /// treated as ordinary corruption and is returned as an error.
    pub async fn open<P: Into<PathBuf>>(
        path: P,
    ) -> Result<(Arc<Self>, LoadOutcome), ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.ok();
            }
        }

        let (doc, outcome) = match fs::read(&file_path).await {
            Ok(bytes) => match serde_json::from_slice::<T>(&bytes) {
                Ok(doc) => (doc, LoadOutcome::Loaded),
                Err(e) => {
                    warn!(
                        path = %file_path.display(),
                        error = %e,
                        "malformed document; continuing with an empty one"
                    );
                    (T::default(), LoadOutcome::Recovered(format!("parse: {e}")))
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                (T::default(), LoadOutcome::Bootstrapped)
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                error!(path = %file_path.display(), error = %e, "cannot open document");
                return Err(ServiceError::Storage(format!(
                    "open {}: {e}",
                    file_path.display()
                )));
            }
            Err(e) => {
                warn!(
                    path = %file_path.display(),
                    error = %e,
                    "unreadable document; continuing with an empty one"
                );
                (T::default(), LoadOutcome::Recovered(format!("read: {e}")))
            }
        };

        let store = Arc::new(Self {
            inner: Arc::new(RwLock::new(doc)),
            file_path,
        });
        if outcome == LoadOutcome::Bootstrapped {
            store.save().await?;
        }
        Ok((store, outcome))
    }

    /// Serialize the full document and overwrite the backing file.
    ///
    /// Failure here is fatal to the caller: an unpersisted mutation would
    /// desynchronize the durability mirror from the working set.
    pub async fn save(&self) -> Result<(), ServiceError> {
        let doc = self.inner.read().await;
        let data = serde_json::to_vec_pretty(&*doc).map_err(|e| {
            error!(path = %self.file_path.display(), error = %e, "cannot serialize document");
            ServiceError::Storage(format!("serialize {}: {e}", self.file_path.display()))
        })?;
        drop(doc);
        fs::write(&self.file_path, data).await.map_err(|e| {
            error!(path = %self.file_path.display(), error = %e, "cannot write document");
            ServiceError::Storage(format!("write {}: {e}", self.file_path.display()))
        })?;
        Ok(())
    }

    /// Read access to the document.
    pub async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let doc = self.inner.read().await;
        f(&doc)
    }

    /// Apply a mutation and persist unconditionally.
    pub async fn update<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut doc = self.inner.write().await;
        let out = f(&mut doc);
        drop(doc);
        self.save().await?;
        Ok(out)
    }

    /// Apply a mutation and persist only if it reports an actual change.
    ///
    /// Returns whether the document changed. A `false` from the closure
    /// must mean the document is byte-for-byte what it was.
    pub async fn update_if<F>(&self, f: F) -> Result<bool, ServiceError>
    where
        F: FnOnce(&mut T) -> bool,
    {
        let mut doc = self.inner.write().await;
        let changed = f(&mut doc);
        drop(doc);
        if changed {
            self.save().await?;
        }
        Ok(changed)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_json_path;
    use std::collections::BTreeMap;

    type Doc = BTreeMap<String, u32>;

    #[tokio::test]
    async fn missing_file_bootstraps_a_well_formed_document() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("doc_store_bootstrap");
        let (store, outcome) = JsonDocStore::<Doc>::open(&tmp).await?;
        assert_eq!(outcome, LoadOutcome::Bootstrapped);
        assert_eq!(store.read(|d| d.len()).await, 0);

        // the file was written immediately and parses as an empty document
        let on_disk: Doc = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        assert!(on_disk.is_empty());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn mutations_persist_and_reload() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("doc_store_roundtrip");
        let (store, _) = JsonDocStore::<Doc>::open(&tmp).await?;
        store
            .update(|d| {
                d.insert("a".into(), 1);
                d.insert("b".into(), 2);
            })
            .await?;

        let (reloaded, outcome) = JsonDocStore::<Doc>::open(&tmp).await?;
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(reloaded.read(|d| d.get("a").copied()).await, Some(1));
        assert_eq!(reloaded.read(|d| d.get("b").copied()).await, Some(2));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_content_recovers_to_empty_without_rewriting() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("doc_store_corrupt");
        tokio::fs::write(&tmp, b"{not json at all").await?;

        let (store, outcome) = JsonDocStore::<Doc>::open(&tmp).await?;
        assert!(matches!(outcome, LoadOutcome::Recovered(_)));
        assert_eq!(store.read(|d| d.len()).await, 0);

        // corrupt bytes stay on disk until the next mutation self-heals them
        assert_eq!(tokio::fs::read(&tmp).await?, b"{not json at all".to_vec());
        store.update(|d| { d.insert("x".into(), 9); }).await?;
        let healed: Doc = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        assert_eq!(healed.get("x").copied(), Some(9));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn empty_file_recovers_to_empty() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("doc_store_empty");
        tokio::fs::write(&tmp, b"").await?;
        let (_, outcome) = JsonDocStore::<Doc>::open(&tmp).await?;
        assert!(matches!(outcome, LoadOutcome::Recovered(_)));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_if_skips_the_write_when_nothing_changed() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("doc_store_nochange");
        let (store, _) = JsonDocStore::<Doc>::open(&tmp).await?;
        store.update(|d| { d.insert("a".into(), 1); }).await?;

        // scribble on the mirror; an unchanged document must not repair it
        tokio::fs::write(&tmp, b"sentinel").await?;
        let changed = store.update_if(|d| d.remove("zzz").is_some()).await?;
        assert!(!changed);
        assert_eq!(tokio::fs::read(&tmp).await?, b"sentinel".to_vec());

        let changed = store.update_if(|d| d.remove("a").is_some()).await?;
        assert!(changed);
        let healed: Doc = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        assert!(healed.is_empty());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn documents_are_pretty_printed() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("doc_store_pretty");
        let (store, _) = JsonDocStore::<Doc>::open(&tmp).await?;
        store.update(|d| { d.insert("a".into(), 1); }).await?;
        let text = tokio::fs::read_to_string(&tmp).await?;
        assert!(text.contains('\n'), "expected indented output, got {text:?}");
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
