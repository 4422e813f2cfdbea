//! Reference option loading for the bug form.
//!
//! Every time the form opens it asks for the seven reference lists again.
//! Each request is stamped with a generation number so a response that
//! arrives after the form was closed or reopened is recognized and dropped.

use tracing::{debug, warn};

use crate::api::{fetch_reference_options, ApiError, BugRepository, ReferenceOptions};

/// A generation number identifying one option load.
pub type Generation = u64;

/// Tracks the current option request generation.
#[derive(Debug, Clone, Default)]
pub struct OptionLoader {
    generation: Generation,
    in_flight: bool,
}

impl OptionLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load and return its generation.
    ///
    /// Any earlier in-flight load becomes stale.
    pub fn begin(&mut self) -> Generation {
        self.generation += 1;
        self.in_flight = true;
        debug!(generation = self.generation, "Starting option load");
        self.generation
    }

    /// Invalidate any in-flight load without starting a new one.
    pub fn cancel(&mut self) {
        if self.in_flight {
            debug!(generation = self.generation, "Cancelling option load");
        }
        self.generation += 1;
        self.in_flight = false;
    }

    /// Get the current generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Check whether the latest load has not resolved yet.
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Accept a resolved load.
    ///
    /// Returns the options to apply, or `None` if the response is stale or
    /// failed. Failures are logged and leave the current options untouched.
    pub fn resolve(
        &mut self,
        generation: Generation,
        result: Result<ReferenceOptions, String>,
    ) -> Option<ReferenceOptions> {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "Discarding stale option response"
            );
            return None;
        }
        self.in_flight = false;

        match result {
            Ok(options) => Some(options),
            Err(e) => {
                warn!(error = %e, "Error fetching options");
                None
            }
        }
    }
}

/// Fetch all reference lists for the given generation.
pub async fn load_options(
    repo: &dyn BugRepository,
    generation: Generation,
) -> (Generation, Result<ReferenceOptions, ApiError>) {
    (generation, fetch_reference_options(repo).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{seed_options, InMemoryRepository, Latency, OptionKind};

    #[test]
    fn test_begin_increments_generation() {
        let mut loader = OptionLoader::new();
        let first = loader.begin();
        let second = loader.begin();
        assert!(second > first);
        assert!(loader.is_loading());
        assert_eq!(loader.generation(), second);
    }

    #[test]
    fn test_resolve_current_generation() {
        let mut loader = OptionLoader::new();
        let generation = loader.begin();
        let options = loader.resolve(generation, Ok(seed_options()));
        assert_eq!(options, Some(seed_options()));
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_resolve_stale_generation_discarded() {
        let mut loader = OptionLoader::new();
        let stale = loader.begin();
        let current = loader.begin();

        assert!(loader.resolve(stale, Ok(seed_options())).is_none());
        assert!(loader.is_loading());
        assert!(loader.resolve(current, Ok(seed_options())).is_some());
    }

    #[test]
    fn test_resolve_after_cancel_discarded() {
        let mut loader = OptionLoader::new();
        let generation = loader.begin();
        loader.cancel();
        assert!(!loader.is_loading());
        assert!(loader.resolve(generation, Ok(seed_options())).is_none());
    }

    #[test]
    fn test_resolve_failure_returns_none() {
        let mut loader = OptionLoader::new();
        let generation = loader.begin();
        assert!(loader
            .resolve(generation, Err("Failed to load users".to_string()))
            .is_none());
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_load_options_tags_generation() {
        let repo = InMemoryRepository::seeded().with_latency(Latency::NONE);
        let (generation, result) = load_options(&repo, 7).await;
        assert_eq!(generation, 7);
        assert_eq!(result.unwrap(), seed_options());
    }

    #[tokio::test]
    async fn test_load_options_propagates_failure() {
        let repo = InMemoryRepository::seeded().with_latency(Latency::NONE);
        repo.set_option_failure(OptionKind::NotFixReasons, true);
        let (_, result) = load_options(&repo, 1).await;
        assert_eq!(
            result.unwrap_err(),
            ApiError::OptionsUnavailable(OptionKind::NotFixReasons)
        );
    }
}
