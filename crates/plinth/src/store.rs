//! Persistent storage for the cached model blob.
//!
//! This module provides a `BlobStore` trait and implementations for keeping
//! the downloaded model payload between sessions.
//!
//! # Implementations
//!
//! - [`DiskStore`]: Disk-backed store holding the blob under a fixed key
//! - [`MemoryStore`]: In-memory store for tests and single-session use
//! - [`NoStore`]: Passthrough implementation that stores nothing

use crate::error::{Error, Result};
use std::{
    future::Future,
    path::PathBuf,
    pin::Pin,
    sync::{Arc, RwLock},
};

/// Name of the collection directory inside the store root.
const COLLECTION: &str = "models";
/// Fixed key the blob is stored under.
const BLOB_KEY: &str = "model.bin";
/// Name of the schema version marker file.
const VERSION_FILE: &str = "version";
/// Schema version this implementation reads and writes.
const SCHEMA_VERSION: u32 = 1;

/// Future type for store open and put operations.
pub type StoreFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Future type for store get operations.
pub type GetFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<Vec<u8>>>> + Send + 'a>>;

/// A persistent store holding at most one binary blob under a fixed key.
///
/// A successful `put` always replaces the previous blob. Storage is
/// all-or-nothing per call; there are no partial-blob semantics.
pub trait BlobStore: Send + Sync {
    /// Open the store, creating it on first use.
    ///
    /// Fails with [`Error::StorageUnavailable`] if the platform denies
    /// access or the store was written by an unsupported schema version.
    fn open(&self) -> StoreFuture<'_>;

    /// Return the stored blob, or `None` if nothing has been stored yet.
    fn get(&self) -> GetFuture<'_>;

    /// Persist `blob` under the fixed key, replacing any prior value.
    fn put(&self, blob: Vec<u8>) -> StoreFuture<'_>;
}

/// A store that keeps nothing (passthrough).
///
/// This is useful when persistence is not desired or for testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStore;

impl NoStore {
    /// Create a new no-op store.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BlobStore for NoStore {
    fn open(&self) -> StoreFuture<'_> {
        Box::pin(async { Ok(()) })
    }

    fn get(&self) -> GetFuture<'_> {
        Box::pin(async { Ok(None) })
    }

    fn put(&self, _blob: Vec<u8>) -> StoreFuture<'_> {
        Box::pin(async { Ok(()) })
    }
}

/// An in-memory store.
///
/// Holds the blob in an `Option` behind an `RwLock`. Clones share the same
/// slot. Suitable for tests and for sessions where nothing should outlive
/// the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<RwLock<Option<Vec<u8>>>>,
}

impl MemoryStore {
    /// Create an empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a blob is currently stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.read().unwrap().is_none()
    }
}

impl BlobStore for MemoryStore {
    fn open(&self) -> StoreFuture<'_> {
        Box::pin(async { Ok(()) })
    }

    fn get(&self) -> GetFuture<'_> {
        let blob = self.slot.read().unwrap().clone();
        Box::pin(async move { Ok(blob) })
    }

    fn put(&self, blob: Vec<u8>) -> StoreFuture<'_> {
        *self.slot.write().unwrap() = Some(blob);
        Box::pin(async { Ok(()) })
    }
}

/// A disk-backed store.
///
/// The store is a directory containing a schema version marker and one
/// collection with the single cached payload:
///
/// ```text
/// <root>/version            schema version marker
/// <root>/models/model.bin   the cached payload
/// ```
///
/// `open` creates this layout on first use and refuses roots written by an
/// unknown schema version. Puts write to a temporary file that is renamed
/// over the key, so the key either holds a complete blob or the previous
/// one.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Create a store rooted at `root`. No I/O happens until [`BlobStore::open`].
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn blob_path(&self) -> PathBuf {
        self.root.join(COLLECTION).join(BLOB_KEY)
    }

    fn version_path(&self) -> PathBuf {
        self.root.join(VERSION_FILE)
    }

    async fn open_inner(&self) -> Result<()> {
        let unavailable = |e: std::io::Error| Error::StorageUnavailable {
            message: e.to_string(),
        };

        tokio::fs::create_dir_all(self.root.join(COLLECTION))
            .await
            .map_err(unavailable)?;

        let version_path = self.version_path();
        match tokio::fs::read_to_string(&version_path).await {
            Ok(contents) => {
                let version: u32 =
                    contents
                        .trim()
                        .parse()
                        .map_err(|_| Error::StorageUnavailable {
                            message: format!(
                                "unreadable schema version marker in {}",
                                version_path.display()
                            ),
                        })?;
                if version != SCHEMA_VERSION {
                    return Err(Error::StorageUnavailable {
                        message: format!(
                            "unsupported schema version {version} (supported: {SCHEMA_VERSION})"
                        ),
                    });
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // First-ever open: record the schema version.
                tokio::fs::write(&version_path, SCHEMA_VERSION.to_string())
                    .await
                    .map_err(unavailable)?;
            }
            Err(e) => return Err(unavailable(e)),
        }

        tracing::debug!(root = %self.root.display(), "store opened");
        Ok(())
    }

    async fn get_inner(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.blob_path()).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::StorageRead {
                message: e.to_string(),
            }),
        }
    }

    async fn put_inner(&self, blob: Vec<u8>) -> Result<()> {
        let write_failed = |e: std::io::Error| Error::StorageWrite {
            message: e.to_string(),
        };

        let path = self.blob_path();
        let tmp = path.with_file_name(format!("{BLOB_KEY}.tmp"));

        tokio::fs::write(&tmp, &blob).await.map_err(write_failed)?;
        tokio::fs::rename(&tmp, &path).await.map_err(write_failed)?;

        tracing::debug!(bytes = blob.len(), "stored model blob");
        Ok(())
    }
}

impl BlobStore for DiskStore {
    fn open(&self) -> StoreFuture<'_> {
        Box::pin(self.open_inner())
    }

    fn get(&self) -> GetFuture<'_> {
        Box::pin(self.get_inner())
    }

    fn put(&self, blob: Vec<u8>) -> StoreFuture<'_> {
        Box::pin(self.put_inner(blob))
    }
}
