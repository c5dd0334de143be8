use crate::domain::model::{ExportTable, ProjectRecord, SocialHandle};
use crate::domain::options::{ExportSchema, HandleSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn category(&self) -> &str;
    fn vs_currency(&self) -> &str;
    fn order(&self) -> &str;
    fn per_page(&self) -> u32;
    fn paginate(&self) -> bool;
    fn max_pages(&self) -> Option<u32>;

    fn handle_source(&self) -> HandleSource;
    fn api_base(&self) -> &str;
    fn site_base(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn user_agent(&self) -> &str;
    fn request_delay(&self) -> Duration;
    fn listing_timeout(&self) -> Duration;
    fn detail_timeout(&self) -> Duration;

    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn export_schema(&self) -> ExportSchema;
    fn include_id(&self) -> bool;
}

/// 單一專案的社群帳號解析
#[async_trait]
pub trait HandleResolver: Send + Sync {
    /// `Ok(None)` means the project has no handle; `Err` is a failed request.
    async fn resolve(&self, coin_id: &str) -> Result<Option<String>>;

    fn failure_sentinel(&self) -> SocialHandle;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ProjectRecord>>;
    async fn transform(&self, data: Vec<ProjectRecord>) -> Result<ExportTable>;
    async fn load(&self, table: ExportTable) -> Result<String>;
}
