use super::ingestion::fetch_launches;
use super::processing::finalize::{finalize, FinalizeSummary};
use super::processing::{filter_launches, Enricher, FlatTable};
use crate::app::ports::HttpClientPort;
use crate::config::Config;
use crate::error::Result;
use crate::types::{EnrichedRow, LaunchRecord};
use metrics::{counter, histogram};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Launches pulled from the listing, before and after filtering
#[derive(Debug, Clone)]
pub struct Extraction {
    pub fetched: usize,
    pub launches: Vec<LaunchRecord>,
}

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub fetched: usize,
    pub filtered: usize,
    pub enriched: usize,
    pub finalize: FinalizeSummary,
    pub raw_csv: PathBuf,
    pub processed_csv: PathBuf,
}

/// Runs the stages in order against one config and HTTP client
pub struct Pipeline<'a> {
    config: &'a Config,
    http: &'a dyn HttpClientPort,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, http: &'a dyn HttpClientPort) -> Self {
        Self { config, http }
    }

    /// Fetch the listing, flatten it and filter it
    pub async fn extract(&self) -> Result<Extraction> {
        let response = fetch_launches(
            self.http,
            &self.config.paths.urls,
            self.config.api.listing_index,
        )
        .await?
        .error_for_status()?;

        let table = FlatTable::from_response(&response)?;
        info!("✅ Fetched {} launches ({} columns)", table.len(), table.columns.len());

        let launches = filter_launches(&table, self.config.filter.cutoff_date)?;
        Ok(Extraction {
            fetched: table.len(),
            launches,
        })
    }

    /// Extract, enrich, and write the raw snapshot
    pub async fn run_etl(&self) -> Result<(Extraction, Vec<EnrichedRow>)> {
        let extraction = self.extract().await?;
        let rows = Enricher::new(self.http, &self.config.api)
            .run(&extraction.launches, &self.config.paths.raw_csv)
            .await?;
        Ok((extraction, rows))
    }

    /// Every stage, raw snapshot through processed snapshot
    pub async fn run(&self) -> Result<PipelineResult> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline", run_id = %run_id);
        self.run_stages(run_id).instrument(span).await
    }

    async fn run_stages(&self, run_id: Uuid) -> Result<PipelineResult> {
        info!("🚀 Starting launch pipeline (run {})", run_id);
        counter!("falcon_pipeline_runs_total").increment(1);
        let started = Instant::now();

        let (extraction, rows) = self.run_etl().await?;

        let paths = &self.config.paths;
        let summary = finalize(
            &paths.raw_csv,
            &paths.processed_csv,
            &self.config.finalize.legacy_booster,
        )?;
        println!(
            "💾 Saved {} processed rows to {}",
            summary.rows_out,
            paths.processed_csv.display()
        );

        histogram!("falcon_pipeline_duration_seconds").record(started.elapsed().as_secs_f64());
        info!("🎉 Pipeline finished in {:.1}s", started.elapsed().as_secs_f64());

        Ok(PipelineResult {
            run_id,
            fetched: extraction.fetched,
            filtered: extraction.launches.len(),
            enriched: rows.len(),
            finalize: summary,
            raw_csv: paths.raw_csv.clone(),
            processed_csv: paths.processed_csv.clone(),
        })
    }
}
