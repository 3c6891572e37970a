mod utils;
#[allow(unused)]
use utils::*;

mod tests {
    use super::*;

    use mock_service::{LIMITED_QUOTA, SLOW_DELAY};
    use ntest::timeout;
    use std::sync::Arc;
    use tenderbench::prelude::*;

    #[tokio::test]
    #[timeout(10_000)]
    async fn benchmark_healthy_platform() {
        let config = init().await;

        let report = run_benchmark(&prober(&config), "ted", 3).await.unwrap();

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.success_rate_percent, 100.);
        let iterations: Vec<u32> = report.results.iter().map(|r| r.iteration).collect();
        assert_eq!(iterations, [1, 2, 3]);
        assert!(report
            .results
            .iter()
            .all(|r| r.status_code == Some(200) && r.error_message.is_none()));
    }

    #[tokio::test]
    #[timeout(10_000)]
    async fn http_errors_are_unsuccessful_probes() {
        let config = init().await;
        let prober = prober(&config);

        // Benchmark probes carry only a limit, which sam rejects.
        let sam = run_benchmark(&prober, "sam", 2).await.unwrap();
        assert_eq!(sam.success_rate_percent, 0.);
        assert!(sam
            .results
            .iter()
            .all(|r| r.status_code == Some(422) && r.error_message.is_none()));

        let broken = run_benchmark(&prober, "broken", 1).await.unwrap();
        assert_eq!(broken.results[0].status_code, Some(500));

        let unknown = run_benchmark(&prober, "atlantis", 1).await.unwrap();
        assert_eq!(unknown.results[0].status_code, Some(404));
    }

    #[tokio::test]
    #[timeout(10_000)]
    async fn transport_failures_carry_a_message() {
        init().await;
        let config = ConsoleConfig::new("http://127.0.0.1:9");

        let report = run_benchmark(&prober(&config), "ted", 2).await.unwrap();

        assert_eq!(report.success_rate_percent, 0.);
        for result in &report.results {
            assert_eq!(result.status_code, None);
            assert!(result.error_message.is_some());
        }
    }

    #[tokio::test]
    #[timeout(10_000)]
    async fn stress_requests_overlap() {
        let config = init().await;

        let report = run_stress_test(Arc::new(prober(&config)), "slow", 5)
            .await
            .unwrap();

        assert_eq!(report.concurrent_requests, 5);
        assert_eq!(report.successful, 5);
        assert_eq!(report.failed, 0);
        assert!(report.total_time_ms >= SLOW_DELAY.as_millis() as f64);
        assert!(report.total_time_ms < 4. * SLOW_DELAY.as_millis() as f64);
    }

    #[tokio::test]
    #[timeout(10_000)]
    async fn stress_counts_rate_limited_requests() {
        let config = init().await;
        let concurrency = LIMITED_QUOTA * 2;

        let report = run_stress_test(Arc::new(prober(&config)), "limited", concurrency)
            .await
            .unwrap();

        assert_eq!(report.successful, LIMITED_QUOTA);
        assert_eq!(report.failed, concurrency - LIMITED_QUOTA);
        assert_eq!(report.successful + report.failed, report.concurrent_requests);

        let mut iterations: Vec<u32> = report.results.iter().map(|r| r.iteration()).collect();
        iterations.sort_unstable();
        assert_eq!(iterations, (1..=concurrency).collect::<Vec<_>>());
    }
}
