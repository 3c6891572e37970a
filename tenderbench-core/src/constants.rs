/// Maximum number of entries the history log retains.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Key of the persisted history slot.
pub const HISTORY_STORAGE_KEY: &str = "tenderApiTestHistory";

/// Number of entries shown by the history summary.
pub const RECENT_TESTS_COUNT: usize = 10;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// The `limit` sent with every probe request.
pub const DEFAULT_PROBE_LIMIT: u32 = 1;

/// Days of posting window required by platforms that reject open-ended searches.
pub const POSTED_WINDOW_DAYS: i64 = 30;

pub const EXPORT_FILE_PREFIX: &str = "tender-api-test-history";

/// Upper bound the console front end puts on benchmark iterations.
pub const MAX_BENCHMARK_ITERATIONS: u32 = 20;

/// Upper bound the console front end puts on stress concurrency.
pub const MAX_STRESS_CONCURRENCY: u32 = 50;
