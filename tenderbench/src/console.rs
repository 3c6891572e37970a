//! Entry points used by the presentation layer.
//!
//! A [`Console`] owns the history log and the prober. Running a test records it in the history
//! before handing the report back to the caller.
use crate::analytics::{generate_analytics, AnalyticsKind, AnalyticsReport};
use crate::benchmark::run_benchmark;
use crate::history::{export_file_name, HistoryStore, HistorySummary};
use crate::probe::Prober;
use crate::storage::KeyValueStore;
use crate::stress::run_stress_test;
use std::sync::Arc;
use tenderbench_core::{BenchmarkReport, Error, StressReport};
use time::Date;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// A downloadable copy of the history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryExport {
    pub file_name: String,
    pub document: String,
}

pub struct Console<P, S> {
    prober: Arc<P>,
    history: HistoryStore<S>,
}

impl<P, S> Console<P, S>
where
    P: Prober + Sync + 'static,
    S: KeyValueStore,
{
    pub fn new(prober: P, history: HistoryStore<S>) -> Self {
        Self {
            prober: Arc::new(prober),
            history,
        }
    }

    pub async fn run_benchmark(
        &mut self,
        platform: &str,
        iterations: u32,
    ) -> Result<BenchmarkReport, Error> {
        let report = run_benchmark(self.prober.as_ref(), platform, iterations).await?;
        self.history.append(report.clone());
        Ok(report)
    }

    pub async fn run_stress_test(
        &mut self,
        platform: &str,
        concurrency: u32,
    ) -> Result<StressReport, Error> {
        let report = run_stress_test(self.prober.clone(), platform, concurrency).await?;
        self.history.append(report.clone());
        Ok(report)
    }

    pub fn generate_analytics(&self, kind: AnalyticsKind) -> Result<AnalyticsReport, Error> {
        generate_analytics(self.history.entries(), kind)
    }

    pub fn show_history(&self) -> Result<HistorySummary, Error> {
        self.history.summary()
    }

    /// Export the log for download. There is nothing to export from an empty history.
    pub fn export_history(&self, today: Date) -> Result<HistoryExport, Error> {
        if self.history.is_empty() {
            return Err(Error::NoData);
        }

        Ok(HistoryExport {
            file_name: export_file_name(today),
            document: self.history.export()?,
        })
    }

    pub fn import_history(&mut self, document: &str) -> Result<usize, Error> {
        Ok(self.history.import(document)?)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }
}
