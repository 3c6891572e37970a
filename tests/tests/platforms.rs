mod utils;
#[allow(unused)]
use utils::*;

mod tests {
    use super::*;

    use ntest::timeout;
    use tenderbench::prelude::*;
    use time::macros::date;

    #[tokio::test]
    #[timeout(10_000)]
    async fn discovery_and_health() {
        let config = init().await;
        let directory = PlatformDirectory::new(prober(&config));

        let platforms = directory.list_platforms().await;
        let names: Vec<&str> = platforms.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["ted", "sam", "bonfire"]);
        assert_eq!(platforms[0].status.as_deref(), Some("active"));

        let health = directory.check_health().await.unwrap();
        assert_eq!(health["status"], "healthy");
    }

    #[tokio::test]
    #[timeout(10_000)]
    async fn sweep_sends_platform_specific_payloads() {
        let config = init().await;
        let directory = PlatformDirectory::new(prober(&config));

        let mut platforms = PlatformInfo::defaults();
        platforms.push(PlatformInfo::new("broken", "Broken", "unknown"));

        let sweep = directory
            .test_all_platforms(&platforms, date!(2026 - 10 - 19))
            .await;

        assert_eq!(sweep.total, 4);
        assert_eq!(sweep.working, 3);
        assert!(!sweep.all_working());
        assert!(sweep.results["sam"].success);
        assert_eq!(sweep.results["broken"].status_code, Some(500));

        let order: Vec<&str> = sweep.results.keys().map(String::as_str).collect();
        assert_eq!(order, ["ted", "sam", "bonfire", "broken"]);
    }

    #[tokio::test]
    #[timeout(10_000)]
    async fn search_returns_the_response_document() {
        let config = init().await;
        let directory = PlatformDirectory::new(prober(&config));

        let payload = SearchPayload {
            keywords: Some("bridge".to_string()),
            limit: Some(4),
            ..Default::default()
        };
        let document = directory.search("bonfire", &payload).await.unwrap();
        assert_eq!(document["total"], 4);
        assert_eq!(document["results"][0]["keywords"], "bridge");

        assert!(matches!(
            directory.search("broken", &payload).await,
            Err(ProbeError::Status(500))
        ));
    }
}
