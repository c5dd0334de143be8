use crate::adapters::coingecko::{ListingQuery, MarketsClient};
use crate::adapters::http::build_client;
use crate::adapters::resolvers::build_resolver;
use crate::core::export::{render_file_name, CsvExporter};
use crate::core::{ConfigProvider, HandleResolver, Pipeline, Storage};
use crate::domain::model::{EnrichmentSummary, ExportTable, ProjectRecord, SocialHandle};
use crate::utils::error::{EtlError, Result};
use std::path::Path;

/// Listing -> per-project handle lookup -> CSV.
pub struct SocialPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    markets: MarketsClient,
    resolver: Box<dyn HandleResolver>,
}

impl<S: Storage, C: ConfigProvider> SocialPipeline<S, C> {
    /// 建立管道；pro 模式缺少 API 金鑰時回傳錯誤
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = build_client(config.user_agent())?;
        let resolver = build_resolver(client.clone(), &config)?;
        let markets = MarketsClient::from_config(client, &config);

        Ok(Self {
            storage,
            config,
            markets,
            resolver,
        })
    }

    /// Builds the pipeline around a caller-supplied resolver instead of the one
    /// selected by `handle_source`, e.g. to look handles up in another source.
    pub fn with_resolver(storage: S, config: C, resolver: Box<dyn HandleResolver>) -> Result<Self> {
        let client = build_client(config.user_agent())?;
        let markets = MarketsClient::from_config(client, &config);

        Ok(Self {
            storage,
            config,
            markets,
            resolver,
        })
    }

    async fn resolve_handle(&self, record: &ProjectRecord) -> SocialHandle {
        match self.resolver.resolve(record.id()).await {
            Ok(Some(username)) => SocialHandle::from_username(&username),
            Ok(None) => SocialHandle::Absent,
            Err(e) => {
                tracing::warn!("[Error] Failed to fetch {}: {}", record.id(), e);
                self.resolver.failure_sentinel()
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SocialPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<ProjectRecord>> {
        let query = ListingQuery::from_config(&self.config);
        tracing::info!(
            "1/2: Fetching '{}' projects (paginate: {})",
            query.category,
            query.paginate
        );

        let records = self.markets.fetch_all(&query).await?;
        if records.is_empty() {
            return Err(EtlError::EmptyListing {
                category: query.category,
            });
        }

        tracing::info!("✅ Found {} projects", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<ProjectRecord>) -> Result<ExportTable> {
        let total = data.len();
        let delay = self.config.request_delay();
        let mut records = Vec::with_capacity(total);
        let mut summary = EnrichmentSummary::default();

        tracing::info!(
            "2/2: Resolving X usernames via {:?}",
            self.config.handle_source()
        );

        for (i, record) in data.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            tracing::info!(
                "[{}/{}] Resolving: {} ({})",
                i + 1,
                total,
                record.name(),
                record.symbol()
            );

            let handle = self.resolve_handle(record).await;
            tracing::debug!("{} -> {}", record.id(), handle);
            summary.record(&handle);
            records.push(record.with_handle(handle));
        }

        tracing::info!(
            "✅ Resolution complete: {} resolved, {} without handle, {} failed",
            summary.resolved,
            summary.absent,
            summary.failed
        );

        Ok(ExportTable { records, summary })
    }

    async fn load(&self, table: ExportTable) -> Result<String> {
        let exporter = CsvExporter::new(self.config.export_schema(), self.config.include_id());
        let data = exporter.to_bytes(&table.records)?;
        let file_name = render_file_name(self.config.output_file());

        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            table.records.len(),
            data.len(),
            file_name
        );
        self.storage.write_file(&file_name, &data).await?;

        Ok(Path::new(self.config.output_path())
            .join(&file_name)
            .display()
            .to_string())
    }
}
