//! Status types for the load sequence.
//!
//! Each phase transition of the orchestrator produces a [`LoadStatus`] with
//! a short advisory string suitable for a status banner.

use std::fmt;

/// Phases of the cache-or-fetch load sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Opening the store and looking for a cached payload.
    CheckingCache,
    /// A cached payload was found and is being displayed.
    CacheHit,
    /// Nothing cached; downloading from the remote endpoint.
    CacheMiss,
    /// The cache or primary path failed; one uncached download attempt.
    FallbackFetch,
    /// The model is displayed.
    Ready,
    /// Every path failed; no further attempts are made.
    Failed,
}

impl LoadPhase {
    /// User-visible advisory message for this phase.
    #[must_use]
    pub fn advisory(self) -> &'static str {
        match self {
            LoadPhase::CheckingCache => "Looking for a cached model",
            LoadPhase::CacheHit => "Loading model from cache",
            LoadPhase::CacheMiss => "No cached model, downloading",
            LoadPhase::FallbackFetch => "Cache unusable, downloading directly",
            LoadPhase::Ready => "Model loaded",
            LoadPhase::Failed => "Model could not be loaded",
        }
    }
}

/// A user-visible status update emitted on each phase transition.
#[derive(Debug, Clone)]
pub struct LoadStatus {
    /// The phase just entered.
    pub phase: LoadPhase,
    /// Advisory text, including error detail where relevant.
    pub message: String,
}

impl LoadStatus {
    /// Status carrying the phase's standard advisory text.
    #[must_use]
    pub fn new(phase: LoadPhase) -> Self {
        Self {
            phase,
            message: phase.advisory().to_string(),
        }
    }

    /// Status with extra detail appended to the advisory text.
    #[must_use]
    pub fn with_detail(phase: LoadPhase, detail: &str) -> Self {
        Self {
            phase,
            message: format!("{}: {detail}", phase.advisory()),
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Where a successfully displayed payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Served from the persistent store.
    Cache,
    /// Downloaded and written back to the store.
    Network,
    /// Downloaded by the uncached fallback attempt.
    Fallback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_uses_phase_advisory() {
        let status = LoadStatus::new(LoadPhase::CacheHit);
        assert_eq!(status.message, LoadPhase::CacheHit.advisory());
    }

    #[test]
    fn test_status_with_detail_appends() {
        let status = LoadStatus::with_detail(LoadPhase::Failed, "connection refused");
        assert!(status.message.starts_with(LoadPhase::Failed.advisory()));
        assert!(status.message.ends_with("connection refused"));
    }
}
