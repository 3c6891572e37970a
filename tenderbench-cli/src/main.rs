use anyhow::Context;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tenderbench::prelude::*;
use time::{Date, OffsetDateTime};
#[allow(unused_imports)]
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;

use cli::{Command, HistoryCommand, TenderbenchCli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = TenderbenchCli::parse();

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tenderbench=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(addr) = args.prometheus {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("failed to start the Prometheus exporter")?;
        info!("Serving metrics on {addr}");
    }

    let config = args.config();
    let prober = HttpProber::new(config.clone())?;
    let today = OffsetDateTime::now_utc().date();

    recover_no_data(run(args.command, prober, &args.data_dir, &config, today).await)
}

async fn run(
    command: Command,
    prober: HttpProber,
    data_dir: &Path,
    config: &ConsoleConfig,
    today: Date,
) -> anyhow::Result<()> {
    match command {
        Command::Platforms => {
            let directory = PlatformDirectory::new(prober);
            print_json(&directory.list_platforms().await)?;
        }
        Command::Health => {
            let directory = PlatformDirectory::new(prober);
            print_json(&directory.check_health().await?)?;
        }
        Command::CheckAll => {
            let directory = PlatformDirectory::new(prober);
            let platforms = directory.list_platforms().await;
            let sweep = directory.test_all_platforms(&platforms, today).await;
            if !sweep.all_working() {
                warn!(
                    "{} of {} platforms failed",
                    sweep.total - sweep.working,
                    sweep.total
                );
            }
            print_json(&sweep)?;
        }
        Command::Search {
            platform,
            organization,
            keywords,
            status,
            limit,
            posted_from,
            posted_to,
        } => {
            let payload = SearchPayload {
                organization,
                keywords,
                status,
                limit,
                posted_from,
                posted_to,
            };
            let directory = PlatformDirectory::new(prober);
            print_json(&directory.search(&platform, &payload).await?)?;
        }
        Command::Benchmark {
            platform,
            iterations,
        } => {
            let mut console = open_console(prober, data_dir, config);
            print_json(&console.run_benchmark(&platform, iterations).await?)?;
        }
        Command::Stress {
            platform,
            concurrency,
        } => {
            let mut console = open_console(prober, data_dir, config);
            print_json(&console.run_stress_test(&platform, concurrency).await?)?;
        }
        Command::Analytics { kind } => {
            let console = open_console(prober, data_dir, config);
            print_json(&console.generate_analytics(kind.into())?)?;
        }
        Command::History { action } => {
            let mut console = open_console(prober, data_dir, config);
            match action {
                HistoryCommand::Show => print_json(&console.show_history()?)?,
                HistoryCommand::Export { output } => {
                    let export = console.export_history(today)?;
                    let path = output.unwrap_or_else(|| PathBuf::from(&export.file_name));
                    tokio::fs::write(&path, export.document)
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!("History exported to {}", path.display());
                }
                HistoryCommand::Import { file } => {
                    let document = tokio::fs::read_to_string(&file)
                        .await
                        .with_context(|| format!("failed to read {}", file.display()))?;
                    let count = console.import_history(&document)?;
                    info!("Imported {count} history entries");
                }
                HistoryCommand::Clear => console.clear_history(),
            }
        }
    }

    Ok(())
}

/// An empty history is reported on stdout rather than failing the command.
fn recover_no_data(result: anyhow::Result<()>) -> anyhow::Result<()> {
    match result {
        Err(err) if matches!(err.downcast_ref::<Error>(), Some(Error::NoData)) => {
            print_json(&json!({ "message": err.to_string() }))
        }
        other => other,
    }
}

fn open_console(
    prober: HttpProber,
    data_dir: &Path,
    config: &ConsoleConfig,
) -> Console<HttpProber, FileStore> {
    let history = HistoryStore::from_config(FileStore::new(data_dir), config);
    Console::new(prober, history)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
