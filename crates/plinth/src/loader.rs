//! The cache-or-fetch load sequence.
//!
//! [`LoadOrchestrator`] drives a single load of the model:
//!
//! ```text
//! CheckingCache -> CacheHit  -> Ready
//!               -> CacheMiss -> Ready
//!                  on failure -> FallbackFetch -> Ready | Failed
//! ```
//!
//! The cached payload is preferred; a missing payload is fetched and written
//! back best-effort. Any failure of those paths is recovered once by a
//! direct uncached fetch. Only a fallback failure is terminal.

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::store::BlobStore;
use crate::types::{LoadPhase, LoadSource, LoadStatus};

/// Consumes a fetched payload and displays it.
///
/// A successful call replaces the currently displayed model. A payload the
/// renderer cannot parse is reported as [`Error::ModelParse`].
pub trait ModelRenderer {
    /// Display the model contained in `payload`.
    fn render_model(&mut self, payload: &[u8]) -> Result<()>;
}

/// Receives the advisory status emitted on each phase transition.
pub trait StatusSink {
    /// Observe a status update.
    fn status(&mut self, status: LoadStatus);
}

/// A sink that discards all status updates.
impl StatusSink for () {
    fn status(&mut self, _status: LoadStatus) {}
}

/// Drives one cache-or-fetch load of the model.
///
/// Exactly one load sequence is expected per session; the orchestrator
/// performs no retries beyond the single fallback fetch and supports no
/// cancellation.
pub struct LoadOrchestrator<S, F> {
    store: S,
    fetcher: F,
    url: String,
}

impl<S: BlobStore, F: Fetch> LoadOrchestrator<S, F> {
    /// Create an orchestrator for the asset at `url`.
    #[must_use]
    pub fn new(store: S, fetcher: F, url: impl Into<String>) -> Self {
        Self {
            store,
            fetcher,
            url: url.into(),
        }
    }

    /// Run the load sequence once.
    ///
    /// Returns where the displayed payload came from, or
    /// [`Error::AllMethodsFailed`] once every path has been exhausted.
    pub async fn load<R, K>(&self, renderer: &mut R, sink: &mut K) -> Result<LoadSource>
    where
        R: ModelRenderer,
        K: StatusSink,
    {
        sink.status(LoadStatus::new(LoadPhase::CheckingCache));

        let source = match self.try_cached(renderer, sink).await {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("load failed, trying uncached fetch: {e}");
                sink.status(LoadStatus::with_detail(
                    LoadPhase::FallbackFetch,
                    &e.to_string(),
                ));

                match self.try_fallback(renderer).await {
                    Ok(()) => LoadSource::Fallback,
                    Err(e) => {
                        let e = Error::AllMethodsFailed { last: Box::new(e) };
                        tracing::error!("{e}");
                        sink.status(LoadStatus::with_detail(LoadPhase::Failed, &e.to_string()));
                        return Err(e);
                    }
                }
            }
        };

        sink.status(LoadStatus::new(LoadPhase::Ready));
        Ok(source)
    }

    /// The cache-preferred path: display the cached payload if present,
    /// otherwise fetch and write back.
    async fn try_cached<R, K>(&self, renderer: &mut R, sink: &mut K) -> Result<LoadSource>
    where
        R: ModelRenderer,
        K: StatusSink,
    {
        self.store.open().await?;

        if let Some(blob) = self.store.get().await? {
            tracing::debug!(bytes = blob.len(), "cache hit");
            sink.status(LoadStatus::new(LoadPhase::CacheHit));
            renderer.render_model(&blob)?;
            return Ok(LoadSource::Cache);
        }

        tracing::debug!("cache miss");
        sink.status(LoadStatus::new(LoadPhase::CacheMiss));

        let blob = self.fetcher.fetch(&self.url).await?;

        // Best-effort write-back: a store failure must not block rendering.
        if let Err(e) = self.store.put(blob.clone()).await {
            tracing::warn!("failed to cache fetched model: {e}");
        }

        renderer.render_model(&blob)?;
        Ok(LoadSource::Network)
    }

    /// The single uncached fallback attempt. Never writes to the store.
    async fn try_fallback<R: ModelRenderer>(&self, renderer: &mut R) -> Result<()> {
        let blob = self.fetcher.fetch(&self.url).await?;
        renderer.render_model(&blob)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchFuture;
    use crate::store::{GetFuture, MemoryStore, StoreFuture};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const URL: &str = "https://example.com/model.glb";

    /// Fetcher that replays a scripted sequence of results and panics on
    /// any fetch beyond the script.
    struct ScriptedFetcher {
        script: Mutex<VecDeque<Result<Vec<u8>>>>,
    }

    impl ScriptedFetcher {
        fn new(script: Vec<Result<Vec<u8>>>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
            }
        }

        fn none() -> Self {
            Self::new(Vec::new())
        }
    }

    impl Fetch for ScriptedFetcher {
        fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a> {
            let result = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected fetch of {url}"));
            Box::pin(async move { result })
        }
    }

    /// Store wrapper whose operations can be made to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_open: bool,
        fail_get: bool,
        fail_put: bool,
    }

    impl BlobStore for FlakyStore {
        fn open(&self) -> StoreFuture<'_> {
            if self.fail_open {
                Box::pin(async {
                    Err(Error::StorageUnavailable {
                        message: "access denied".to_string(),
                    })
                })
            } else {
                self.inner.open()
            }
        }

        fn get(&self) -> GetFuture<'_> {
            if self.fail_get {
                Box::pin(async {
                    Err(Error::StorageRead {
                        message: "transaction aborted".to_string(),
                    })
                })
            } else {
                self.inner.get()
            }
        }

        fn put(&self, blob: Vec<u8>) -> StoreFuture<'_> {
            if self.fail_put {
                Box::pin(async {
                    Err(Error::StorageWrite {
                        message: "transaction aborted".to_string(),
                    })
                })
            } else {
                self.inner.put(blob)
            }
        }
    }

    /// Renderer that records payloads, optionally rejecting the first few.
    #[derive(Default)]
    struct RecordingRenderer {
        rendered: Vec<Vec<u8>>,
        reject_next: u32,
    }

    impl RecordingRenderer {
        fn rejecting(count: u32) -> Self {
            Self {
                rendered: Vec::new(),
                reject_next: count,
            }
        }
    }

    impl ModelRenderer for RecordingRenderer {
        fn render_model(&mut self, payload: &[u8]) -> Result<()> {
            if self.reject_next > 0 {
                self.reject_next -= 1;
                return Err(Error::ModelParse {
                    message: "unreadable payload".to_string(),
                });
            }
            self.rendered.push(payload.to_vec());
            Ok(())
        }
    }

    /// Sink recording every emitted phase.
    #[derive(Default)]
    struct RecordingSink {
        phases: Vec<LoadPhase>,
    }

    impl StatusSink for RecordingSink {
        fn status(&mut self, status: LoadStatus) {
            self.phases.push(status.phase);
        }
    }

    fn http_status(status: u16) -> Error {
        Error::HttpStatus {
            url: URL.to_string(),
            status,
        }
    }

    fn network_down() -> Error {
        Error::Http {
            url: URL.to_string(),
            message: "connection refused".to_string(),
        }
    }

    #[tokio::test]
    async fn cache_hit_serves_stored_blob_without_fetching() {
        let store = MemoryStore::new();
        store.put(b"cached".to_vec()).await.unwrap();

        let orchestrator = LoadOrchestrator::new(store, ScriptedFetcher::none(), URL);
        let mut renderer = RecordingRenderer::default();
        let mut sink = RecordingSink::default();

        let source = orchestrator.load(&mut renderer, &mut sink).await.unwrap();

        assert_eq!(source, LoadSource::Cache);
        assert_eq!(renderer.rendered, vec![b"cached".to_vec()]);
        assert_eq!(
            sink.phases,
            vec![LoadPhase::CheckingCache, LoadPhase::CacheHit, LoadPhase::Ready]
        );
    }

    #[tokio::test]
    async fn cache_miss_fetches_and_writes_back() {
        let store = MemoryStore::new();
        let fetcher = ScriptedFetcher::new(vec![Ok(b"payload".to_vec())]);

        let orchestrator = LoadOrchestrator::new(store.clone(), fetcher, URL);
        let mut renderer = RecordingRenderer::default();
        let mut sink = RecordingSink::default();

        let source = orchestrator.load(&mut renderer, &mut sink).await.unwrap();

        assert_eq!(source, LoadSource::Network);
        assert_eq!(renderer.rendered, vec![b"payload".to_vec()]);
        // The fetched payload must now be cached.
        assert_eq!(store.get().await.unwrap(), Some(b"payload".to_vec()));
        assert_eq!(
            sink.phases,
            vec![LoadPhase::CheckingCache, LoadPhase::CacheMiss, LoadPhase::Ready]
        );
    }

    #[tokio::test]
    async fn write_failure_does_not_block_rendering() {
        let store = FlakyStore {
            fail_put: true,
            ..FlakyStore::default()
        };
        let fetcher = ScriptedFetcher::new(vec![Ok(b"payload".to_vec())]);

        let orchestrator = LoadOrchestrator::new(store, fetcher, URL);
        let mut renderer = RecordingRenderer::default();
        let mut sink = RecordingSink::default();

        let source = orchestrator.load(&mut renderer, &mut sink).await.unwrap();

        // Still served from the network path, not the fallback.
        assert_eq!(source, LoadSource::Network);
        assert_eq!(renderer.rendered, vec![b"payload".to_vec()]);
    }

    #[tokio::test]
    async fn read_failure_recovers_via_fallback_without_writing() {
        let store = FlakyStore {
            fail_get: true,
            ..FlakyStore::default()
        };
        store.inner.put(b"previous".to_vec()).await.unwrap();
        let prior = store.inner.clone();

        let fetcher = ScriptedFetcher::new(vec![Ok(b"fresh".to_vec())]);
        let orchestrator = LoadOrchestrator::new(store, fetcher, URL);
        let mut renderer = RecordingRenderer::default();
        let mut sink = RecordingSink::default();

        let source = orchestrator.load(&mut renderer, &mut sink).await.unwrap();

        assert_eq!(source, LoadSource::Fallback);
        assert_eq!(renderer.rendered, vec![b"fresh".to_vec()]);
        // The fallback never writes to the store.
        assert_eq!(prior.get().await.unwrap(), Some(b"previous".to_vec()));
        assert_eq!(
            sink.phases,
            vec![
                LoadPhase::CheckingCache,
                LoadPhase::FallbackFetch,
                LoadPhase::Ready
            ]
        );
    }

    #[tokio::test]
    async fn unavailable_store_recovers_via_fallback() {
        let store = FlakyStore {
            fail_open: true,
            ..FlakyStore::default()
        };
        let fetcher = ScriptedFetcher::new(vec![Ok(b"payload".to_vec())]);

        let orchestrator = LoadOrchestrator::new(store, fetcher, URL);
        let mut renderer = RecordingRenderer::default();
        let mut sink = RecordingSink::default();

        let source = orchestrator.load(&mut renderer, &mut sink).await.unwrap();

        assert_eq!(source, LoadSource::Fallback);
        assert_eq!(renderer.rendered, vec![b"payload".to_vec()]);
    }

    #[tokio::test]
    async fn failed_primary_and_fallback_fetches_are_terminal() {
        let store = MemoryStore::new();
        let fetcher = ScriptedFetcher::new(vec![Err(http_status(404)), Err(network_down())]);

        let orchestrator = LoadOrchestrator::new(store, fetcher, URL);
        let mut renderer = RecordingRenderer::default();
        let mut sink = RecordingSink::default();

        let err = orchestrator
            .load(&mut renderer, &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AllMethodsFailed { .. }));
        assert!(renderer.rendered.is_empty());
        // The failure banner is raised exactly once.
        assert_eq!(
            sink.phases
                .iter()
                .filter(|p| **p == LoadPhase::Failed)
                .count(),
            1
        );
        assert_eq!(
            sink.phases,
            vec![
                LoadPhase::CheckingCache,
                LoadPhase::CacheMiss,
                LoadPhase::FallbackFetch,
                LoadPhase::Failed
            ]
        );
    }

    #[tokio::test]
    async fn unparseable_cached_blob_recovers_via_fallback() {
        let store = MemoryStore::new();
        store.put(b"garbage".to_vec()).await.unwrap();

        let fetcher = ScriptedFetcher::new(vec![Ok(b"fresh".to_vec())]);
        let orchestrator = LoadOrchestrator::new(store.clone(), fetcher, URL);
        let mut renderer = RecordingRenderer::rejecting(1);
        let mut sink = RecordingSink::default();

        let source = orchestrator.load(&mut renderer, &mut sink).await.unwrap();

        assert_eq!(source, LoadSource::Fallback);
        assert_eq!(renderer.rendered, vec![b"fresh".to_vec()]);
        // The fallback result is displayed but never cached.
        assert_eq!(store.get().await.unwrap(), Some(b"garbage".to_vec()));
    }

    #[tokio::test]
    async fn unparseable_fallback_payload_is_terminal() {
        let store = MemoryStore::new();
        let fetcher = ScriptedFetcher::new(vec![Ok(b"junk".to_vec()), Ok(b"junk".to_vec())]);

        let orchestrator = LoadOrchestrator::new(store, fetcher, URL);
        let mut renderer = RecordingRenderer::rejecting(2);
        let mut sink = RecordingSink::default();

        let err = orchestrator
            .load(&mut renderer, &mut sink)
            .await
            .unwrap_err();

        let Error::AllMethodsFailed { last } = err else {
            panic!("expected AllMethodsFailed, got {err}");
        };
        assert!(matches!(*last, Error::ModelParse { .. }));
    }
}
