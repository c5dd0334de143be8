use crate::core::Pipeline;
use crate::domain::model::EnrichmentSummary;
use crate::utils::error::Result;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: String,
    pub rows: usize,
    pub summary: EnrichmentSummary,
    pub elapsed: Duration,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        tracing::info!("--- 🚀 Starting category social export ---");

        let projects = self.pipeline.extract().await?;
        tracing::debug!("Extracted {} projects", projects.len());

        let table = self.pipeline.transform(projects).await?;
        let rows = table.records.len();
        let summary = table.summary.clone();

        let output_path = self.pipeline.load(table).await?;
        tracing::info!("🎉 Saved {} rows to {}", rows, output_path);

        Ok(RunReport {
            output_path,
            rows,
            summary,
            elapsed: started.elapsed(),
        })
    }
}
