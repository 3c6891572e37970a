mod utils;
#[allow(unused)]
use utils::*;

mod tests {
    use super::*;

    use ntest::timeout;
    use tenderbench::prelude::*;
    use time::macros::date;

    fn open(config: &ConsoleConfig, store: FileStore) -> Console<HttpProber, FileStore> {
        Console::new(prober(config), HistoryStore::from_config(store, config))
    }

    #[tokio::test]
    #[timeout(15_000)]
    async fn history_survives_restarts() {
        let config = init().await;
        let store = FileStore::new(scratch_dir("restart"));

        {
            let mut console = open(&config, store.clone());
            console.run_benchmark("ted", 2).await.unwrap();
            console.run_stress_test("broken", 3).await.unwrap();
        }

        let console = open(&config, store);
        let summary = console.show_history().unwrap();
        assert_eq!(summary.total_tests, 2);
        assert_eq!(summary.test_types[&TestKind::Benchmark], 1);
        assert_eq!(summary.test_types[&TestKind::Stress], 1);
        assert_eq!(summary.recent_tests[0].platform(), "broken");

        match console.generate_analytics(AnalyticsKind::SuccessRates).unwrap() {
            AnalyticsReport::SuccessRates(report) => {
                assert_eq!(report.summary.total_tests, 2);
                assert_eq!(report.summary.overall_success_rate_percent, 50.);
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[tokio::test]
    #[timeout(15_000)]
    async fn export_then_import_elsewhere() {
        let config = init().await;

        let mut source = open(&config, FileStore::new(scratch_dir("export")));
        source.run_benchmark("bonfire", 3).await.unwrap();
        source.run_benchmark("sam", 1).await.unwrap();
        let export = source.export_history(date!(2026 - 10 - 19)).unwrap();
        assert_eq!(export.file_name, "tender-api-test-history-2026-10-19.json");

        let mut target = open(&config, FileStore::new(scratch_dir("import")));
        assert_eq!(target.import_history(&export.document).unwrap(), 2);
        assert_eq!(target.history().entries(), source.history().entries());

        match target.generate_analytics(AnalyticsKind::ResponseTimes).unwrap() {
            AnalyticsReport::ResponseTimes(report) => {
                let platforms: Vec<&str> = report.platforms.keys().map(String::as_str).collect();
                assert_eq!(platforms, ["bonfire", "sam"]);
            }
            other => panic!("unexpected report {other:?}"),
        }

        target.clear_history();
        assert!(target.history().is_empty());
        assert!(matches!(
            target.export_history(date!(2026 - 10 - 19)),
            Err(Error::NoData)
        ));
    }
}
