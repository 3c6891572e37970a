use crate::stats::{mean, percentage};
use crate::POSTED_WINDOW_DAYS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use time::{Date, OffsetDateTime};

/// Raw outcome of a single probe, as observed at the transport boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// The server answered. The status may still be a non-2xx failure.
    Response { latency: Duration, status: u16 },
    /// The request never produced a response (connect error, timeout, bad body...).
    Failure { latency: Duration, message: String },
}

impl ProbeOutcome {
    pub fn latency(&self) -> Duration {
        match self {
            ProbeOutcome::Response { latency, .. } | ProbeOutcome::Failure { latency, .. } => {
                *latency
            }
        }
    }
}

/// One timed HTTP attempt against a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub iteration: u32,
    pub success: bool,
    pub response_time_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ProbeResult {
    pub fn from_outcome(iteration: u32, outcome: ProbeOutcome) -> Self {
        let response_time_ms = duration_ms(outcome.latency());
        match outcome {
            ProbeOutcome::Response { status, .. } => Self {
                iteration,
                success: (200..300).contains(&status),
                response_time_ms,
                status_code: Some(status),
                error_message: None,
            },
            ProbeOutcome::Failure { message, .. } => Self {
                iteration,
                success: false,
                response_time_ms,
                status_code: None,
                error_message: Some(message),
            },
        }
    }
}

/// Result of a sequential benchmark against one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub platform: String,
    pub iterations: u32,
    pub results: Vec<ProbeResult>,
    pub average_response_time_ms: f64,
    pub success_rate_percent: f64,
}

impl BenchmarkReport {
    pub fn new(platform: impl Into<String>, results: Vec<ProbeResult>) -> Self {
        let times: Vec<f64> = results.iter().map(|r| r.response_time_ms).collect();
        let successes = results.iter().filter(|r| r.success).count();

        Self {
            platform: platform.into(),
            iterations: results.len() as u32,
            average_response_time_ms: mean(&times).unwrap_or(0.),
            success_rate_percent: percentage(successes, results.len()).unwrap_or(0.),
            results,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter_map(|r| r.error_message.as_deref())
    }
}

/// Per-request outcome inside a stress batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum StressOutcome {
    Completed(ProbeResult),
    /// The request task did not run to completion.
    Rejected { iteration: u32, reason: String },
}

impl StressOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StressOutcome::Completed(result) if result.success)
    }

    pub fn iteration(&self) -> u32 {
        match self {
            StressOutcome::Completed(result) => result.iteration,
            StressOutcome::Rejected { iteration, .. } => *iteration,
        }
    }
}

/// Result of a concurrent burst against one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressReport {
    pub platform: String,
    pub concurrent_requests: u32,
    pub total_time_ms: f64,
    pub successful: u32,
    pub failed: u32,
    pub results: Vec<StressOutcome>,
}

impl StressReport {
    pub fn new(platform: impl Into<String>, total_time: Duration, results: Vec<StressOutcome>) -> Self {
        let successful = results.iter().filter(|r| r.is_success()).count() as u32;
        let concurrent_requests = results.len() as u32;

        Self {
            platform: platform.into(),
            concurrent_requests,
            total_time_ms: duration_ms(total_time),
            successful,
            failed: concurrent_requests - successful,
            results,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    Benchmark,
    Stress,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestKind::Benchmark => write!(f, "benchmark"),
            TestKind::Stress => write!(f, "stress"),
        }
    }
}

/// A finished test, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum TestRecord {
    Benchmark(BenchmarkReport),
    Stress(StressReport),
}

impl TestRecord {
    pub fn kind(&self) -> TestKind {
        match self {
            TestRecord::Benchmark(_) => TestKind::Benchmark,
            TestRecord::Stress(_) => TestKind::Stress,
        }
    }

    pub fn platform(&self) -> &str {
        match self {
            TestRecord::Benchmark(report) => &report.platform,
            TestRecord::Stress(report) => &report.platform,
        }
    }
}

impl From<BenchmarkReport> for TestRecord {
    fn from(report: BenchmarkReport) -> Self {
        TestRecord::Benchmark(report)
    }
}

impl From<StressReport> for TestRecord {
    fn from(report: StressReport) -> Self {
        TestRecord::Stress(report)
    }
}

/// One entry of the history log. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: TestRecord,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl HistoryEntry {
    pub fn new(record: TestRecord, timestamp: OffsetDateTime) -> Self {
        Self { record, timestamp }
    }

    pub fn kind(&self) -> TestKind {
        self.record.kind()
    }

    pub fn platform(&self) -> &str {
        self.record.platform()
    }
}

/// JSON body sent to `POST /search/{platform}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_to: Option<String>,
}

impl SearchPayload {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Payload accepted by the given platform. SAM.gov rejects searches without a posting
    /// window, so it gets the last 30 days ending `today`.
    pub fn for_platform(platform: &str, limit: u32, today: Date) -> Self {
        let mut payload = Self::with_limit(limit);
        if platform == "sam" {
            let from = today - time::Duration::days(POSTED_WINDOW_DAYS);
            payload.posted_from = Some(from.to_string());
            payload.posted_to = Some(today.to_string());
        }
        payload
    }
}

/// A platform as advertised by `GET /platforms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PlatformInfo {
    pub fn new(name: &str, display_name: &str, status: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: Some(display_name.to_string()),
            base_url: None,
            status: Some(status.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Platforms assumed to exist when the API cannot be asked.
    pub fn defaults() -> Vec<PlatformInfo> {
        vec![
            PlatformInfo::new("ted", "TED Europe", "unknown"),
            PlatformInfo::new("sam", "SAM.gov", "unknown"),
            PlatformInfo::new("bonfire", "Bonfire", "unknown"),
        ]
    }
}

pub fn duration_ms(dur: Duration) -> f64 {
    dur.as_secs_f64() * 1_000.
}
