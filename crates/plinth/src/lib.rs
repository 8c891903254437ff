//! Cache-or-fetch loading for a single remote 3D model.
//!
//! This crate implements the load sequence of a small model viewer: a
//! persistent store keeps the last downloaded copy of the model, an HTTP
//! fetcher retrieves it from a fixed URL, and an orchestrator decides which
//! of the two serves the payload, falling back to one uncached fetch when
//! either path fails.
//!
//! # Design principles
//!
//! - **Explicit results**: store and fetch operations resolve to plain
//!   `Result` values so the load sequence stays linear and testable
//! - **Caller-supplied collaborators**: the renderer and status sink are
//!   traits; the crate never touches a window or a UI
//! - **Best-effort caching**: a store failure never blocks an already
//!   fetched payload from being displayed
//!
//! # Example
//!
//! ```ignore
//! use plinth::{DiskStore, HttpFetcher, LoadOrchestrator};
//!
//! let orchestrator = LoadOrchestrator::new(
//!     DiskStore::new("model-cache"),
//!     HttpFetcher::new(),
//!     "https://example.com/model.glb",
//! );
//!
//! // `renderer` displays payloads, `sink` receives status updates.
//! let source = orchestrator.load(&mut renderer, &mut sink).await?;
//! ```

mod error;
pub mod fetch;
mod loader;
pub mod store;
mod types;

pub use error::{Error, Result};
pub use fetch::{Fetch, HttpFetcher};
pub use loader::{LoadOrchestrator, ModelRenderer, StatusSink};
pub use store::{BlobStore, DiskStore, MemoryStore, NoStore};
pub use types::{LoadPhase, LoadSource, LoadStatus};
