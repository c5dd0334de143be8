use crate::core::ConfigProvider;
use crate::domain::options::{
    ExportSchema, HandleSource, BROWSER_USER_AGENT, DEFAULT_CATEGORY, DEFAULT_OUTPUT_FILE,
    MAX_PER_PAGE, SITE_BASE,
};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::fmt;
use std::time::Duration;

#[derive(Clone, Parser)]
#[command(name = "ai-social-etl")]
#[command(about = "Export the X/Twitter handles of a CoinGecko category to CSV")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_CATEGORY)]
    pub category: String,

    #[arg(long, default_value = "usd")]
    pub vs_currency: String,

    #[arg(long, default_value = "market_cap_desc")]
    pub order: String,

    #[arg(long, default_value_t = MAX_PER_PAGE)]
    pub per_page: u32,

    #[arg(long, help = "Keep requesting pages until an empty one is returned")]
    pub paginate: bool,

    #[arg(long, help = "Stop after this many pages even if more are available")]
    pub max_pages: Option<u32>,

    #[arg(long, value_enum, default_value_t = HandleSource::HtmlPage)]
    pub source: HandleSource,

    #[arg(long, value_enum, help = "CSV column naming (defaults to the source's schema)")]
    pub schema: Option<ExportSchema>,

    #[arg(long, help = "Prepend the coin id as an ID column")]
    pub include_id: bool,

    #[arg(long, help = "Override the API base URL")]
    pub api_base: Option<String>,

    #[arg(long, default_value = SITE_BASE)]
    pub site_base: String,

    #[arg(long, env = "COINGECKO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, help = "Delay between requests in milliseconds")]
    pub delay_ms: Option<u64>,

    #[arg(long, default_value = "20", help = "Listing request timeout in seconds")]
    pub listing_timeout: u64,

    #[arg(long, default_value = "10", help = "Per-project request timeout in seconds")]
    pub detail_timeout: u64,

    #[arg(long, default_value = BROWSER_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

// 金鑰不得出現在日誌
impl fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliConfig")
            .field("category", &self.category)
            .field("per_page", &self.per_page)
            .field("paginate", &self.paginate)
            .field("max_pages", &self.max_pages)
            .field("source", &self.source)
            .field("schema", &self.export_schema())
            .field("api_base", &ConfigProvider::api_base(self))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("delay", &self.request_delay())
            .field("output_path", &self.output_path)
            .field("output_file", &self.output_file)
            .finish()
    }
}

impl ConfigProvider for CliConfig {
    fn category(&self) -> &str {
        &self.category
    }

    fn vs_currency(&self) -> &str {
        &self.vs_currency
    }

    fn order(&self) -> &str {
        &self.order
    }

    fn per_page(&self) -> u32 {
        self.per_page
    }

    fn paginate(&self) -> bool {
        self.paginate
    }

    fn max_pages(&self) -> Option<u32> {
        self.max_pages
    }

    fn handle_source(&self) -> HandleSource {
        self.source
    }

    fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or_else(|| self.source.default_api_base())
    }

    fn site_base(&self) -> &str {
        &self.site_base
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(
            self.delay_ms
                .unwrap_or_else(|| self.source.default_delay_ms()),
        )
    }

    fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout)
    }

    fn detail_timeout(&self) -> Duration {
        Duration::from_secs(self.detail_timeout)
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn export_schema(&self) -> ExportSchema {
        self.schema
            .unwrap_or_else(|| self.source.default_schema())
    }

    fn include_id(&self) -> bool {
        self.include_id
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        super::validate_provider(self)
    }
}
