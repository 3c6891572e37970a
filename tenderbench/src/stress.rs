//! Concurrent stress runner
use crate::benchmark::validate;
use crate::probe::Prober;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tenderbench_core::{Error, StressOutcome, StressReport};
use tokio::task::JoinSet;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Fire `concurrency` probes at `platform` at once and wait for every one of them to settle.
///
/// No failure short-circuits the batch and nothing is cancelled. A probe whose task does not
/// run to completion is reported as [`StressOutcome::Rejected`] and counted as failed, so
/// `successful + failed == concurrency` always holds. Results are in completion order.
#[instrument(name = "stress", skip_all, fields(platform = platform, concurrency = concurrency))]
pub async fn run_stress_test<P>(
    prober: Arc<P>,
    platform: &str,
    concurrency: u32,
) -> Result<StressReport, Error>
where
    P: Prober + Sync + 'static,
{
    validate(platform, concurrency, "concurrency")?;
    info!("Running stress test on {platform} ({concurrency} concurrent requests)");

    let start = Instant::now();

    let mut tasks = JoinSet::new();
    let mut iterations = HashMap::with_capacity(concurrency as usize);
    for iteration in 1..=concurrency {
        let prober = prober.clone();
        let platform = platform.to_string();
        let handle = tasks.spawn(async move { prober.probe(&platform, iteration).await });
        iterations.insert(handle.id(), iteration);
    }

    let mut results = Vec::with_capacity(concurrency as usize);
    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((_, result)) => results.push(StressOutcome::Completed(result)),
            Err(err) => {
                let iteration = iterations.get(&err.id()).copied().unwrap_or_default();
                warn!("Stress request #{iteration} did not complete: {err}");
                results.push(StressOutcome::Rejected {
                    iteration,
                    reason: err.to_string(),
                });
            }
        }
    }
    let total_time = start.elapsed();

    let report = StressReport::new(platform, total_time, results);
    info!(
        "Stress test complete: {} successful, {} failed in {:.1}ms",
        report.successful, report.failed, report.total_time_ms
    );
    Ok(report)
}
