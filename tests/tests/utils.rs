use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tenderbench::prelude::*;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

/// Install logging once per test binary and start a mock API on the current runtime.
#[allow(unused)]
pub async fn init() -> ConsoleConfig {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        FmtSubscriber::builder()
            .with_env_filter("tenderbench=trace,mock_service=debug,axum::rejection=trace")
            .with_test_writer()
            .init();
    });

    let addr = mock_service::spawn().await.unwrap();
    ConsoleConfig::new(&format!("http://{addr}")).request_timeout(Duration::from_secs(5))
}

#[allow(unused)]
pub fn prober(config: &ConsoleConfig) -> HttpProber {
    HttpProber::new(config.clone()).unwrap()
}

#[allow(unused)]
pub fn scratch_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("tenderbench-it-{name}-{}-{nanos}", std::process::id()))
}
