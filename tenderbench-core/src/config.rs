use crate::{DEFAULT_BASE_URL, DEFAULT_HISTORY_CAPACITY, DEFAULT_PROBE_LIMIT, HISTORY_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use std::time::Duration;

/// Settings shared by the console front end and the probe layer.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub base_url: String,
    #[serde_as(as = "Option<DurationSeconds>")]
    pub request_timeout: Option<Duration>,
    pub history_capacity: usize,
    pub history_key: String,
    pub probe_limit: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            history_key: HISTORY_STORAGE_KEY.to_string(),
            probe_limit: DEFAULT_PROBE_LIMIT,
        }
    }
}

impl ConsoleConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
