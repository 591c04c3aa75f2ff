//! Last-run memoization for display-only settings changes
//!
//! Toggling nominal/monthly/show-sources must not trigger a re-simulation:
//! the cache keys the previous run on the financial subset of its settings
//! (display flags excluded) plus the seed, and invalidates on any financial
//! change.

use crate::settings::SimulationSettings;
use crate::simulation::SimulationResult;

/// Single-entry result cache. The engine holds no state between runs, so
/// callers that want re-render-without-re-simulate semantics own one of these.
#[derive(Debug, Default)]
pub struct ResultCache {
    entry: Option<CacheEntry>,

    /// Statistics
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
struct CacheEntry {
    settings: SimulationSettings,
    seed: u64,
    result: SimulationResult,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached result, or run the closure and cache its output.
    /// A hit requires the same seed and financially identical settings;
    /// display flags are ignored for the comparison.
    pub fn get_or_run(
        &mut self,
        settings: &SimulationSettings,
        seed: u64,
        run: impl FnOnce() -> SimulationResult,
    ) -> &SimulationResult {
        if self.is_hit(settings, seed) {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.entry = Some(CacheEntry {
                settings: settings.clone(),
                seed,
                result: run(),
            });
        }

        let entry = self.entry.as_ref().expect("cache entry populated above");
        &entry.result
    }

    fn is_hit(&self, settings: &SimulationSettings, seed: u64) -> bool {
        match &self.entry {
            Some(entry) => entry.seed == seed && entry.settings.same_financials(settings),
            None => false,
        }
    }

    /// Drop the cached run.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
