#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../../README.md")]

pub mod analytics;
pub mod benchmark;
pub mod console;
pub mod history;
pub mod platforms;
pub mod probe;
pub mod storage;
pub mod stress;

pub use console::Console;

pub mod prelude {
    pub use crate::analytics::{generate_analytics, AnalyticsKind, AnalyticsReport};
    pub use crate::benchmark::run_benchmark;
    pub use crate::console::{Console, HistoryExport};
    pub use crate::history::{HistoryStore, HistorySummary};
    pub use crate::platforms::{PlatformDirectory, PlatformSweep};
    pub use crate::probe::{HttpProber, ProbeError, Prober};
    pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};
    pub use crate::stress::run_stress_test;

    pub use tenderbench_core::{
        calculate_median, BenchmarkReport, ConsoleConfig, Error, HistoryEntry, PlatformInfo,
        ProbeResult, SearchPayload, StressOutcome, StressReport, TestKind, TestRecord,
    };
}
