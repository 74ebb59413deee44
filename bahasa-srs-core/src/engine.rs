use crate::{apply_grade, summarize, CardProgress, Clock, Grade, KeyValueStore, SrsStats};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_STORAGE_KEY: &str = "bahasa-srs-progress";

type ProgressMap = HashMap<String, CardProgress>;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Key the whole progress mapping is stored under.
    pub storage_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Spaced-repetition engine over an injected store and clock.
///
/// The whole mapping is read on every call and written back in full on every
/// mutation. Storage and decode failures never reach the caller: a mapping
/// that cannot be read is treated as empty.
///
/// `grade` does not check `item_id` against any catalog and creates a record
/// for whatever id it is given.
pub struct SrsEngine {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    write_lock: Mutex<()>,
}

impl SrsEngine {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(store, clock, EngineConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grade(&self, item_id: &str, grade: Grade) -> CardProgress {
        let _guard = self.write_lock.lock();
        let today = self.clock.today();
        let mut all = self.load();

        let current = all
            .remove(item_id)
            .unwrap_or_else(|| CardProgress::new(item_id, today));
        let updated = apply_grade(current, grade, today);
        debug!(
            item_id,
            %grade,
            interval = updated.interval,
            ease = updated.ease,
            repetitions = updated.repetitions,
            next_review = %updated.next_review,
            "graded item"
        );

        all.insert(item_id.to_string(), updated.clone());
        self.save(&all);
        updated
    }

    pub fn progress(&self, item_id: &str) -> Option<CardProgress> {
        self.load().remove(item_id)
    }

    /// Candidates that have a record and are due today, in candidate order.
    pub fn due_item_ids<S: AsRef<str>>(&self, candidates: &[S]) -> Vec<String> {
        let all = self.load();
        let today = self.clock.today();
        as_strs(candidates)
            .filter(|id| all.get(*id).is_some_and(|p| p.is_due(today)))
            .map(str::to_string)
            .collect()
    }

    /// Candidates with no record at all, in candidate order.
    pub fn new_item_ids<S: AsRef<str>>(&self, candidates: &[S]) -> Vec<String> {
        let all = self.load();
        as_strs(candidates)
            .filter(|id| !all.contains_key(*id))
            .map(str::to_string)
            .collect()
    }

    pub fn stats<S: AsRef<str>>(&self, candidates: &[S]) -> SrsStats {
        summarize(&self.load(), candidates, self.clock.today())
    }

    /// Read-only copy of every stored record, ordered by item id.
    pub fn snapshot(&self) -> BTreeMap<String, CardProgress> {
        self.load().into_iter().collect()
    }

    /// Drop every record. Irreversible.
    pub fn reset_all(&self) {
        let _guard = self.write_lock.lock();
        match self.store.remove(&self.config.storage_key) {
            Ok(()) => info!(key = %self.config.storage_key, "progress reset"),
            Err(e) => warn!(error = %e, "failed to clear progress"),
        }
    }

    fn load(&self) -> ProgressMap {
        let raw = match self.store.get(&self.config.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ProgressMap::new(),
            Err(e) => {
                warn!(error = %e, "progress store unavailable, treating as empty");
                return ProgressMap::new();
            }
        };
        match serde_json::from_str::<ProgressMap>(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "stored progress is malformed, treating as empty");
                ProgressMap::new()
            }
        }
    }

    fn save(&self, all: &ProgressMap) {
        let json = match serde_json::to_string(all) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to encode progress");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.config.storage_key, &json) {
            warn!(error = %e, "failed to persist progress");
        }
    }
}

pub(crate) fn as_strs<S: AsRef<str>>(candidates: &[S]) -> impl Iterator<Item = &str> {
    candidates.iter().map(AsRef::as_ref)
}

impl std::fmt::Debug for SrsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SrsEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
