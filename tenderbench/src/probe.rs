//! Single timed request against a platform's search endpoint.
use reqwest::Client;
use std::time::Instant;
use tenderbench_core::{ConsoleConfig, ProbeOutcome, ProbeResult, SearchPayload};
use thiserror::Error;
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

/// Issues one probe. Implementations never retry and never fail: every transport problem is
/// folded into the returned [`ProbeResult`].
#[trait_variant::make(Prober: Send)]
pub trait LocalProber {
    async fn probe(&self, platform: &str, iteration: u32) -> ProbeResult;
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),
}

/// [`Prober`] backed by `POST {base_url}/search/{platform}`.
#[derive(Clone, Debug)]
pub struct HttpProber {
    pub(crate) client: Client,
    pub(crate) config: ConsoleConfig,
    payload: SearchPayload,
}

impl HttpProber {
    pub fn new(config: ConsoleConfig) -> Result<Self, ProbeError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            payload: SearchPayload::with_limit(config.probe_limit),
            config,
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Probe with an explicit request body instead of the minimal `{ "limit": n }`.
    pub async fn probe_with(
        &self,
        platform: &str,
        iteration: u32,
        payload: &SearchPayload,
    ) -> ProbeResult {
        let url = self.config.endpoint(&format!("search/{platform}"));

        let start = Instant::now();
        let res = self.client.post(&url).json(payload).send().await;
        let latency = start.elapsed();

        let outcome = match res {
            Ok(response) => ProbeOutcome::Response {
                latency,
                status: response.status().as_u16(),
            },
            // The URL names the platform; messages must read the same on every platform.
            Err(err) => ProbeOutcome::Failure {
                latency,
                message: ProbeError::from(err.without_url()).to_string(),
            },
        };

        let result = ProbeResult::from_outcome(iteration, outcome);
        record(platform, &result);
        result
    }
}

impl Prober for HttpProber {
    async fn probe(&self, platform: &str, iteration: u32) -> ProbeResult {
        self.probe_with(platform, iteration, &self.payload).await
    }
}

pub(crate) fn record(platform: &str, result: &ProbeResult) {
    debug!(
        "Probe #{} against {platform}: success={}, {:.1}ms, status={:?}",
        result.iteration, result.success, result.response_time_ms, result.status_code
    );
    if let Some(message) = &result.error_message {
        debug!("Probe #{} against {platform} failed: {message}", result.iteration);
    }

    #[cfg(feature = "metrics")]
    {
        let platform = platform.to_string();
        metrics::histogram!("tenderbench_probe_latency", "platform" => platform.clone())
            .record(result.response_time_ms);

        if result.success {
            metrics::counter!("tenderbench_probe_success", "platform" => platform).increment(1);
        } else {
            metrics::counter!("tenderbench_probe_error", "platform" => platform).increment(1);
        }
    }
}
