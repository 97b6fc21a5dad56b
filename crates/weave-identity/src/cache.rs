use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::identifier::ConcreteMixinTypeIdentifier;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from an existing entry.
    pub hits: u64,
    /// Successful generator invocations.
    pub generations: u64,
    /// Generator invocations that returned an error.
    pub failures: u64,
}

/// Generated types keyed by structural identity.
///
/// Each identifier owns a once-cell: concurrent requests for the same
/// identifier run the generator at most once, the others block until the
/// handle is ready, and nobody sees a partially generated type. The map
/// lock is never held while a generator runs, so requests for different
/// identifiers proceed in parallel.
///
/// The cache is an ordinary value. Construct one at startup and share it
/// with an `Arc`; tests take a fresh one.
pub struct ConcreteTypeCache<H> {
    entries: DashMap<ConcreteMixinTypeIdentifier, Arc<OnceCell<Arc<H>>>>,
    stats: Mutex<CacheStats>,
}

impl<H> Default for ConcreteTypeCache<H> {
    fn default() -> Self {
        ConcreteTypeCache { entries: DashMap::new(), stats: Mutex::new(CacheStats::default()) }
    }
}

impl<H> ConcreteTypeCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_generate<F>(&self, identifier: &ConcreteMixinTypeIdentifier, generate: F) -> Arc<H>
    where
        F: FnOnce(&ConcreteMixinTypeIdentifier) -> H,
    {
        let cell = self.cell(identifier);
        let mut generated = false;
        let handle = cell
            .get_or_init(|| {
                generated = true;
                log::info!("generating concrete type for {identifier}");
                Arc::new(generate(identifier))
            })
            .clone();
        self.count(generated);
        handle
    }

    /// Like [`get_or_generate`](Self::get_or_generate) for a fallible
    /// generator. A failure leaves the entry empty; a later request retries.
    pub fn try_get_or_generate<F, E>(&self, identifier: &ConcreteMixinTypeIdentifier, generate: F) -> Result<Arc<H>, E>
    where
        F: FnOnce(&ConcreteMixinTypeIdentifier) -> Result<H, E>,
    {
        let cell = self.cell(identifier);
        let mut generated = false;
        let result = cell.get_or_try_init(|| {
            generated = true;
            log::info!("generating concrete type for {identifier}");
            generate(identifier).map(Arc::new)
        });
        match result {
            Ok(handle) => {
                let handle = handle.clone();
                self.count(generated);
                Ok(handle)
            }
            Err(err) => {
                log::warn!("generation failed for {identifier}");
                self.stats.lock().failures += 1;
                Err(err)
            }
        }
    }

    /// The handle for `identifier` if it has been generated.
    pub fn get(&self, identifier: &ConcreteMixinTypeIdentifier) -> Option<Arc<H>> {
        self.entries.get(identifier).and_then(|entry| entry.value().get().cloned())
    }

    pub fn contains(&self, identifier: &ConcreteMixinTypeIdentifier) -> bool {
        self.get(identifier).is_some()
    }

    /// Number of generated entries.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.value().get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }

    /// Drops every entry and resets the statistics. Generations already in
    /// flight complete against their detached entry.
    pub fn clear(&self) {
        self.entries.clear();
        *self.stats.lock() = CacheStats::default();
        log::debug!("concrete type cache cleared");
    }

    fn cell(&self, identifier: &ConcreteMixinTypeIdentifier) -> Arc<OnceCell<Arc<H>>> {
        if let Some(entry) = self.entries.get(identifier) {
            return entry.value().clone();
        }
        self.entries
            .entry(identifier.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .value()
            .clone()
    }

    fn count(&self, generated: bool) {
        let mut stats = self.stats.lock();
        if generated {
            stats.generations += 1;
        } else {
            stats.hits += 1;
        }
    }
}
