//! Command-line surface of the console.
use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tenderbench::prelude::*;
use tenderbench_core::{DEFAULT_BASE_URL, MAX_BENCHMARK_ITERATIONS, MAX_STRESS_CONCURRENCY};

pub const DEFAULT_DATA_DIR: &str = ".tenderbench";

#[derive(Parser, Debug)]
#[command(version, about = "Benchmark, stress-test and analyze a tender-search API")]
pub struct TenderbenchCli {
    /// Base URL of the tender-search API.
    #[arg(short, long, env = "TENDERBENCH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory holding the persisted test history.
    #[arg(short, long, env = "TENDERBENCH_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Per-request timeout, e.g. `10s` or `500ms`.
    #[arg(short, long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Serve Prometheus metrics on this address while the command runs.
    #[arg(long)]
    pub prometheus: Option<SocketAddr>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List the platforms the API advertises.
    Platforms,
    /// Query the API health endpoint.
    Health,
    /// Probe every platform once.
    CheckAll,
    /// Run a single search against a platform.
    Search {
        platform: String,
        #[arg(long)]
        organization: Option<String>,
        #[arg(long)]
        keywords: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(short, long)]
        limit: Option<u32>,
        /// Start of the posting window (YYYY-MM-DD).
        #[arg(long)]
        posted_from: Option<String>,
        /// End of the posting window (YYYY-MM-DD).
        #[arg(long)]
        posted_to: Option<String>,
    },
    /// Issue sequential probes and record the timings.
    Benchmark {
        platform: String,
        #[arg(
            short = 'n',
            long,
            default_value_t = 5,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_BENCHMARK_ITERATIONS))
        )]
        iterations: u32,
    },
    /// Issue concurrent probes and record the outcome.
    Stress {
        platform: String,
        #[arg(
            short,
            long,
            default_value_t = 10,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_STRESS_CONCURRENCY))
        )]
        concurrency: u32,
    },
    /// Analyze the recorded history.
    Analytics {
        #[arg(value_enum)]
        kind: AnalysisType,
    },
    /// Inspect or manage the recorded history.
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum HistoryCommand {
    /// Summary of the recorded tests.
    Show,
    /// Write the full history as a JSON document.
    Export {
        /// Output path. Defaults to a dated file in the working directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the history with the contents of a previous export.
    Import { file: PathBuf },
    /// Forget every recorded test.
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum AnalysisType {
    #[value(name = "response_times")]
    ResponseTimes,
    #[value(name = "success_rates")]
    SuccessRates,
    #[value(name = "error_patterns")]
    ErrorPatterns,
}

impl From<AnalysisType> for AnalyticsKind {
    fn from(value: AnalysisType) -> Self {
        match value {
            AnalysisType::ResponseTimes => AnalyticsKind::ResponseTimes,
            AnalysisType::SuccessRates => AnalyticsKind::SuccessRates,
            AnalysisType::ErrorPatterns => AnalyticsKind::ErrorPatterns,
        }
    }
}

impl TenderbenchCli {
    pub fn config(&self) -> ConsoleConfig {
        let config = ConsoleConfig::new(&self.base_url);
        match self.timeout {
            Some(timeout) => config.request_timeout(timeout),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<TenderbenchCli, clap::Error> {
        TenderbenchCli::try_parse_from(std::iter::once("tenderbench").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cli = parse(&["benchmark", "ted"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Benchmark {
                platform: "ted".to_string(),
                iterations: 5
            }
        );
        assert_eq!(cli.config().request_timeout, None);

        let cli = parse(&["stress", "sam"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Stress {
                platform: "sam".to_string(),
                concurrency: 10
            }
        );
    }

    #[test]
    fn bounds_are_enforced() {
        assert!(parse(&["benchmark", "ted", "-n", "20"]).is_ok());
        assert!(parse(&["benchmark", "ted", "-n", "21"]).is_err());
        assert!(parse(&["benchmark", "ted", "-n", "0"]).is_err());
        assert!(parse(&["stress", "ted", "-c", "50"]).is_ok());
        assert!(parse(&["stress", "ted", "-c", "51"]).is_err());
    }

    #[test]
    fn global_options() {
        let cli = parse(&[
            "--base-url",
            "http://api.local:9000/",
            "--timeout",
            "1500ms",
            "analytics",
            "error_patterns",
        ])
        .unwrap();

        let config = cli.config();
        assert_eq!(config.base_url, "http://api.local:9000");
        assert_eq!(config.request_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(
            cli.command,
            Command::Analytics {
                kind: AnalysisType::ErrorPatterns
            }
        );
        assert!(parse(&["analytics", "latency"]).is_err());
    }

    #[test]
    fn history_actions() {
        let cli = parse(&["history", "import", "backup.json"]).unwrap();
        assert_eq!(
            cli.command,
            Command::History {
                action: HistoryCommand::Import {
                    file: PathBuf::from("backup.json")
                }
            }
        );
    }
}
