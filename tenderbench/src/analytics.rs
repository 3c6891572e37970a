//! Reports derived from a snapshot of the history log.
//!
//! Platforms and error strings are reported in first-seen order (oldest entry first). Every
//! "pick one" summary field (fastest platform, slowest platform, most common error) breaks ties
//! in favour of whichever candidate was seen first.
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tenderbench_core::{calculate_median, percentage, Error, HistoryEntry, TestRecord};
use time::OffsetDateTime;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnalyticsKind {
    ResponseTimes,
    SuccessRates,
    ErrorPatterns,
}

impl AnalyticsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsKind::ResponseTimes => "response_times",
            AnalyticsKind::SuccessRates => "success_rates",
            AnalyticsKind::ErrorPatterns => "error_patterns",
        }
    }
}

impl fmt::Display for AnalyticsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalyticsKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "response_times" => Ok(AnalyticsKind::ResponseTimes),
            "success_rates" => Ok(AnalyticsKind::SuccessRates),
            "error_patterns" => Ok(AnalyticsKind::ErrorPatterns),
            other => Err(Error::InvalidArgument(format!(
                "unknown analysis type `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AnalyticsReport {
    #[serde(rename = "Response Time Analysis")]
    ResponseTimes(ResponseTimeReport),
    #[serde(rename = "Success Rate Analysis")]
    SuccessRates(SuccessRateReport),
    #[serde(rename = "Error Pattern Analysis")]
    ErrorPatterns(ErrorPatternReport),
}

/// Produce the requested report over `entries`. An empty history is [`Error::NoData`].
#[instrument(skip(entries), fields(entries = entries.len()))]
pub fn generate_analytics(
    entries: &[HistoryEntry],
    kind: AnalyticsKind,
) -> Result<AnalyticsReport, Error> {
    if entries.is_empty() {
        return Err(Error::NoData);
    }

    let report = match kind {
        AnalyticsKind::ResponseTimes => AnalyticsReport::ResponseTimes(analyze_response_times(entries)),
        AnalyticsKind::SuccessRates => AnalyticsReport::SuccessRates(analyze_success_rates(entries)),
        AnalyticsKind::ErrorPatterns => AnalyticsReport::ErrorPatterns(analyze_error_patterns(entries)),
    };
    debug!("Generated {kind} report");
    Ok(report)
}

/* Response times */

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeReport {
    pub platforms: IndexMap<String, PlatformResponseTimes>,
    pub summary: ResponseTimeSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformResponseTimes {
    pub tests: usize,
    pub total_response_time_ms: f64,
    pub min_response_time_ms: f64,
    pub max_response_time_ms: f64,
    /// The per-benchmark averages, in history order.
    pub response_times: Vec<f64>,
    pub average_response_time_ms: f64,
    pub median_response_time_ms: f64,
}

impl PlatformResponseTimes {
    fn new() -> Self {
        Self {
            tests: 0,
            total_response_time_ms: 0.,
            min_response_time_ms: f64::INFINITY,
            max_response_time_ms: f64::NEG_INFINITY,
            response_times: vec![],
            average_response_time_ms: 0.,
            median_response_time_ms: 0.,
        }
    }

    fn push(&mut self, avg: f64) {
        self.tests += 1;
        self.total_response_time_ms += avg;
        self.min_response_time_ms = self.min_response_time_ms.min(avg);
        self.max_response_time_ms = self.max_response_time_ms.max(avg);
        self.response_times.push(avg);
    }

    fn finish(&mut self) {
        self.average_response_time_ms = self.total_response_time_ms / self.tests as f64;
        self.median_response_time_ms =
            calculate_median(&self.response_times).unwrap_or(self.average_response_time_ms);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeSummary {
    pub total_tests: usize,
    pub fastest_platform: Option<String>,
    pub slowest_platform: Option<String>,
}

pub fn analyze_response_times(entries: &[HistoryEntry]) -> ResponseTimeReport {
    let mut platforms: IndexMap<String, PlatformResponseTimes> = IndexMap::new();
    let mut total_tests = 0;

    for entry in entries {
        if let TestRecord::Benchmark(report) = &entry.record {
            total_tests += 1;
            platforms
                .entry(report.platform.clone())
                .or_insert_with(PlatformResponseTimes::new)
                .push(report.average_response_time_ms);
        }
    }
    platforms.values_mut().for_each(PlatformResponseTimes::finish);

    let summary = ResponseTimeSummary {
        total_tests,
        fastest_platform: pick_first(&platforms, |candidate, best| candidate < best),
        slowest_platform: pick_first(&platforms, |candidate, best| candidate > best),
    };

    ResponseTimeReport { platforms, summary }
}

/// The platform whose average beats every earlier one under `better`. Strict comparison keeps
/// the earliest platform on ties.
fn pick_first(
    platforms: &IndexMap<String, PlatformResponseTimes>,
    better: impl Fn(f64, f64) -> bool,
) -> Option<String> {
    let mut best: Option<(&String, f64)> = None;
    for (platform, data) in platforms {
        let avg = data.average_response_time_ms;
        match best {
            Some((_, best_avg)) if !better(avg, best_avg) => {}
            _ => best = Some((platform, avg)),
        }
    }
    best.map(|(platform, _)| platform.clone())
}

/* Success rates */

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessRateReport {
    pub platforms: IndexMap<String, PlatformSuccessRate>,
    pub summary: SuccessRateSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSuccessRate {
    pub total_tests: usize,
    pub successful_tests: usize,
    pub failed_tests: usize,
    pub success_rate_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessRateSummary {
    pub total_tests: usize,
    pub overall_success_rate_percent: f64,
}

/// A benchmark counts as successful only when every probe succeeded; a stress run when strictly
/// more requests succeeded than failed.
pub fn run_succeeded(record: &TestRecord) -> bool {
    match record {
        TestRecord::Benchmark(report) => report.success_rate_percent == 100.,
        TestRecord::Stress(report) => report.successful > report.failed,
    }
}

pub fn analyze_success_rates(entries: &[HistoryEntry]) -> SuccessRateReport {
    let mut platforms: IndexMap<String, PlatformSuccessRate> = IndexMap::new();

    for entry in entries {
        let data = platforms.entry(entry.platform().to_string()).or_default();
        data.total_tests += 1;
        if run_succeeded(&entry.record) {
            data.successful_tests += 1;
        } else {
            data.failed_tests += 1;
        }
    }

    let (mut total, mut successful) = (0, 0);
    for data in platforms.values_mut() {
        data.success_rate_percent =
            percentage(data.successful_tests, data.total_tests).unwrap_or(0.);
        total += data.total_tests;
        successful += data.successful_tests;
    }

    SuccessRateReport {
        platforms,
        summary: SuccessRateSummary {
            total_tests: entries.len(),
            overall_success_rate_percent: percentage(successful, total).unwrap_or(0.),
        },
    }
}

/* Error patterns */

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPatternReport {
    pub errors: IndexMap<String, ErrorPattern>,
    pub summary: ErrorPatternSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPattern {
    pub count: usize,
    pub platforms: IndexSet<String>,
    /// Timestamp of the first history entry that produced this error.
    #[serde(with = "time::serde::rfc3339")]
    pub first_seen: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_seen: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPatternSummary {
    pub total_unique_errors: usize,
    pub most_common_error: Option<String>,
    pub total_error_occurrences: usize,
}

pub fn analyze_error_patterns(entries: &[HistoryEntry]) -> ErrorPatternReport {
    let mut errors: IndexMap<String, ErrorPattern> = IndexMap::new();

    for entry in entries {
        let TestRecord::Benchmark(report) = &entry.record else {
            continue;
        };

        for message in report.errors() {
            let pattern = errors
                .entry(message.to_string())
                .or_insert_with(|| ErrorPattern {
                    count: 0,
                    platforms: IndexSet::new(),
                    first_seen: entry.timestamp,
                    last_seen: entry.timestamp,
                });
            pattern.count += 1;
            pattern.platforms.insert(report.platform.clone());
            pattern.last_seen = entry.timestamp;
        }
    }

    let mut most_common: Option<(&String, usize)> = None;
    for (message, pattern) in &errors {
        match most_common {
            Some((_, count)) if pattern.count <= count => {}
            _ => most_common = Some((message, pattern.count)),
        }
    }

    let summary = ErrorPatternSummary {
        total_unique_errors: errors.len(),
        most_common_error: most_common.map(|(message, _)| message.clone()),
        total_error_occurrences: errors.values().map(|pattern| pattern.count).sum(),
    };

    ErrorPatternReport { errors, summary }
}
