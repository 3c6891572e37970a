//! Platform discovery, health checks and one-shot searches.
use crate::probe::{HttpProber, ProbeError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tenderbench_core::{PlatformInfo, ProbeResult, SearchPayload};
use time::Date;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

#[derive(Debug, Deserialize)]
struct PlatformsResponse {
    #[serde(default)]
    platforms: Vec<PlatformInfo>,
}

/// Outcome of probing every known platform once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSweep {
    pub results: IndexMap<String, ProbeResult>,
    pub working: usize,
    pub total: usize,
}

impl PlatformSweep {
    pub fn all_working(&self) -> bool {
        self.working == self.total
    }
}

#[derive(Clone, Debug)]
pub struct PlatformDirectory {
    prober: HttpProber,
}

impl PlatformDirectory {
    pub fn new(prober: HttpProber) -> Self {
        Self { prober }
    }

    /// Platforms advertised by the API, or the built-in defaults if it cannot be reached.
    pub async fn list_platforms(&self) -> Vec<PlatformInfo> {
        match self.fetch_platforms().await {
            Ok(platforms) => platforms,
            Err(err) => {
                error!("Failed to load platforms, using defaults: {err}");
                PlatformInfo::defaults()
            }
        }
    }

    async fn fetch_platforms(&self) -> Result<Vec<PlatformInfo>, ProbeError> {
        let body: PlatformsResponse = self.get_json("platforms").await?;
        Ok(body.platforms)
    }

    pub async fn check_health(&self) -> Result<Value, ProbeError> {
        self.get_json("health").await
    }

    /// Run a single search and return the raw response document.
    #[instrument(skip(self, payload))]
    pub async fn search(&self, platform: &str, payload: &SearchPayload) -> Result<Value, ProbeError> {
        let url = self.prober.config.endpoint(&format!("search/{platform}"));
        let response = self.prober.client.post(&url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }

    /// Probe each platform once, in order, with the payload that platform expects.
    #[instrument(skip_all, fields(platforms = platforms.len()))]
    pub async fn test_all_platforms(&self, platforms: &[PlatformInfo], today: Date) -> PlatformSweep {
        let limit = self.prober.config.probe_limit;

        let mut results = IndexMap::new();
        for platform in platforms {
            let payload = SearchPayload::for_platform(&platform.name, limit, today);
            let result = self.prober.probe_with(&platform.name, 1, &payload).await;
            results.insert(platform.name.clone(), result);
        }

        let working = results.values().filter(|r| r.success).count();
        info!("{working}/{} platforms working", results.len());

        PlatformSweep {
            total: results.len(),
            working,
            results,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ProbeError> {
        let url = self.prober.config.endpoint(path);
        let response = self.prober.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}
