//! Bounded, persisted log of past benchmark and stress runs.
//!
//! The log is kept oldest-first. Every mutation rewrites the whole persisted slot, so two
//! stores sharing one slot must not be mutated concurrently: the last writer wins. Mutating
//! methods take `&mut self`, which serializes callers that share a single store.
use crate::storage::KeyValueStore;
use indexmap::IndexMap;
use serde::Serialize;
use tenderbench_core::{
    ConsoleConfig, Error, HistoryEntry, PersistenceError, TestKind, TestRecord,
    EXPORT_FILE_PREFIX, RECENT_TESTS_COUNT,
};
use time::{Date, OffsetDateTime};
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

pub struct HistoryStore<S> {
    entries: Vec<HistoryEntry>,
    capacity: usize,
    key: String,
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Read the persisted log from `key`. Never fails: a missing, unreadable or malformed slot
    /// yields an empty log. A capacity of zero is raised to one.
    pub fn load(store: S, key: &str, capacity: usize) -> Self {
        if capacity == 0 {
            warn!("History capacity must be at least 1, using 1");
        }
        let capacity = capacity.max(1);

        let entries = match store.get(key) {
            Ok(Some(document)) => match parse(&document) {
                Ok(entries) => entries,
                Err(err) => {
                    error!("Error loading test history, starting empty: {err}");
                    vec![]
                }
            },
            Ok(None) => vec![],
            Err(err) => {
                error!("Unable to read test history, starting empty: {err}");
                vec![]
            }
        };

        let mut history = Self {
            entries,
            capacity,
            key: key.to_string(),
            store,
        };
        history.evict();
        debug!("Loaded {} history entries", history.entries.len());
        history
    }

    pub fn from_config(store: S, config: &ConsoleConfig) -> Self {
        Self::load(store, &config.history_key, config.history_capacity)
    }

    /// Append a finished test stamped with the current time, evicting the oldest entries past
    /// capacity, and persist the log.
    pub fn append(&mut self, record: impl Into<TestRecord>) -> &HistoryEntry {
        self.append_at(record, OffsetDateTime::now_utc())
    }

    pub fn append_at(
        &mut self,
        record: impl Into<TestRecord>,
        timestamp: OffsetDateTime,
    ) -> &HistoryEntry {
        self.entries.push(HistoryEntry::new(record.into(), timestamp));
        self.evict();
        self.persist();

        let idx = self.entries.len() - 1;
        &self.entries[idx]
    }

    /// Replace the log with a previously exported document.
    pub fn import(&mut self, document: &str) -> Result<usize, PersistenceError> {
        self.entries = parse(document)?;
        self.evict();
        self.persist();
        Ok(self.entries.len())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(err) = self.store.remove(&self.key) {
            error!("Unable to remove persisted test history: {err}");
        }
        info!("Test history cleared");
    }

    /// Pretty-printed JSON of the full log, oldest first.
    pub fn export(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// The last `count` entries, most recent first.
    pub fn recent(&self, count: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(count).collect()
    }

    pub fn summary(&self) -> Result<HistorySummary, Error> {
        if self.entries.is_empty() {
            return Err(Error::NoData);
        }

        let mut test_types = IndexMap::new();
        let mut platforms = IndexMap::new();
        for entry in &self.entries {
            *test_types.entry(entry.kind()).or_insert(0) += 1;
            *platforms.entry(entry.platform().to_string()).or_insert(0) += 1;
        }

        Ok(HistorySummary {
            total_tests: self.entries.len(),
            test_types,
            platforms,
            recent_tests: self
                .recent(RECENT_TESTS_COUNT)
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict(&mut self) {
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
            trace!("Evicted {excess} history entries");
        }
    }

    fn persist(&self) {
        let res = serde_json::to_string(&self.entries)
            .map_err(PersistenceError::from)
            .and_then(|document| self.store.set(&self.key, &document));

        if let Err(err) = res {
            error!("Unable to persist test history: {err}");
        }
    }
}

/// Parse an exported (or persisted) history document.
pub fn parse(document: &str) -> Result<Vec<HistoryEntry>, PersistenceError> {
    Ok(serde_json::from_str(document)?)
}

/// `tender-api-test-history-YYYY-MM-DD.json`
pub fn export_file_name(date: Date) -> String {
    format!("{EXPORT_FILE_PREFIX}-{date}.json")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub total_tests: usize,
    pub test_types: IndexMap<TestKind, usize>,
    pub platforms: IndexMap<String, usize>,
    pub recent_tests: Vec<HistoryEntry>,
}
