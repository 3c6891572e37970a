//! Sequential benchmark runner
use crate::probe::Prober;
use tenderbench_core::{BenchmarkReport, Error};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Probe `platform` exactly `iterations` times, one after another.
///
/// Each probe is awaited before the next is issued so that latency reflects a single serial
/// caller rather than contention between in-flight requests. Failed probes still count towards
/// the average response time and the success rate.
#[instrument(name = "benchmark", skip_all, fields(platform = platform, iterations = iterations))]
pub async fn run_benchmark<P: Prober + Sync>(
    prober: &P,
    platform: &str,
    iterations: u32,
) -> Result<BenchmarkReport, Error> {
    validate(platform, iterations, "iterations")?;
    info!("Running benchmark on {platform} ({iterations} iterations)");

    let mut results = Vec::with_capacity(iterations as usize);
    for iteration in 1..=iterations {
        results.push(prober.probe(platform, iteration).await);
    }

    let report = BenchmarkReport::new(platform, results);
    info!(
        "Benchmark complete: avg={:.1}ms, success={:.1}%",
        report.average_response_time_ms, report.success_rate_percent
    );
    Ok(report)
}

pub(crate) fn validate(platform: &str, count: u32, what: &str) -> Result<(), Error> {
    if platform.trim().is_empty() {
        return Err(Error::InvalidArgument("a platform is required".to_string()));
    }
    if count == 0 {
        return Err(Error::InvalidArgument(format!("{what} must be at least 1")));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::probe::Prober;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tenderbench_core::{ProbeOutcome, ProbeResult};

    /// Fails every `fail_every`-th probe and tracks how many probes overlap.
    pub(crate) struct MockProber {
        pub fail_every: u32,
        pub delay: Duration,
        pub in_flight: AtomicU32,
        pub max_in_flight: AtomicU32,
        rng: Mutex<SmallRng>,
    }

    impl MockProber {
        pub fn new(fail_every: u32, delay: Duration) -> Self {
            Self {
                fail_every,
                delay,
                in_flight: AtomicU32::new(0),
                max_in_flight: AtomicU32::new(0),
                rng: Mutex::new(SmallRng::seed_from_u64(7)),
            }
        }
    }

    impl Prober for MockProber {
        async fn probe(&self, _platform: &str, iteration: u32) -> ProbeResult {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(self.delay).await;
            let jitter = self.rng.lock().unwrap().gen_range(0..50);
            let latency = self.delay + Duration::from_millis(jitter);

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let outcome = if self.fail_every > 0 && iteration % self.fail_every == 0 {
                ProbeOutcome::Failure {
                    latency,
                    message: "connection reset".to_string(),
                }
            } else {
                ProbeOutcome::Response {
                    latency,
                    status: 200,
                }
            };
            ProbeResult::from_outcome(iteration, outcome)
        }
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn runs_exactly_n_probes_in_order() {
        let prober = MockProber::new(0, Duration::from_millis(1));
        for n in [1, 3, 12] {
            let report = run_benchmark(&prober, "ted", n).await.unwrap();
            assert_eq!(report.results.len(), n as usize);
            assert_eq!(report.iterations, n);

            let iterations: Vec<u32> = report.results.iter().map(|r| r.iteration).collect();
            assert_eq!(iterations, (1..=n).collect::<Vec<_>>());

            let mean = report.results.iter().map(|r| r.response_time_ms).sum::<f64>() / n as f64;
            assert!((report.average_response_time_ms - mean).abs() < 1e-9);
            assert_eq!(report.success_rate_percent, 100.);
        }
    }

    #[tokio::test]
    async fn probes_never_overlap() {
        let prober = MockProber::new(0, Duration::from_millis(2));
        run_benchmark(&prober, "ted", 8).await.unwrap();
        assert_eq!(prober.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_lower_the_success_rate() {
        let prober = MockProber::new(2, Duration::from_millis(1));
        let report = run_benchmark(&prober, "sam", 4).await.unwrap();

        assert_eq!(report.success_rate_percent, 50.);
        assert_eq!(report.errors().count(), 2);
        assert!(report.errors().all(|e| e == "connection reset"));
    }

    #[tokio::test]
    async fn rejects_bad_arguments() {
        let prober = MockProber::new(0, Duration::ZERO);
        assert!(matches!(
            run_benchmark(&prober, "ted", 0).await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            run_benchmark(&prober, " ", 3).await,
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(prober.max_in_flight.load(Ordering::SeqCst), 0);
    }
}
