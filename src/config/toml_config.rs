use crate::core::ConfigProvider;
use crate::domain::options::{
    ExportSchema, HandleSource, BROWSER_USER_AGENT, DEFAULT_CATEGORY, DEFAULT_OUTPUT_FILE,
    MAX_PER_PAGE, SITE_BASE,
};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub export: ExportConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_handle_source")]
    pub handle_source: HandleSource,
    pub api_base: Option<String>,
    pub site_base: Option<String>,
    pub api_key: Option<String>,
    pub user_agent: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            handle_source: default_handle_source(),
            api_base: None,
            site_base: None,
            api_key: None,
            user_agent: None,
        }
    }
}

fn default_handle_source() -> HandleSource {
    HandleSource::HtmlPage
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingConfig {
    pub category: Option<String>,
    pub vs_currency: Option<String>,
    pub order: Option<String>,
    pub per_page: Option<u32>,
    pub paginate: Option<bool>,
    pub max_pages: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    pub delay_ms: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: Option<String>,
    pub output_file: Option<String>,
    pub schema: Option<ExportSchema>,
    pub include_id: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub verbose: Option<bool>,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COINGECKO_API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn verbose(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn category(&self) -> &str {
        self.listing.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    fn vs_currency(&self) -> &str {
        self.listing.vs_currency.as_deref().unwrap_or("usd")
    }

    fn order(&self) -> &str {
        self.listing.order.as_deref().unwrap_or("market_cap_desc")
    }

    fn per_page(&self) -> u32 {
        self.listing.per_page.unwrap_or(MAX_PER_PAGE)
    }

    fn paginate(&self) -> bool {
        self.listing.paginate.unwrap_or(false)
    }

    fn max_pages(&self) -> Option<u32> {
        self.listing.max_pages
    }

    fn handle_source(&self) -> HandleSource {
        self.source.handle_source
    }

    fn api_base(&self) -> &str {
        self.source
            .api_base
            .as_deref()
            .unwrap_or_else(|| self.source.handle_source.default_api_base())
    }

    fn site_base(&self) -> &str {
        self.source.site_base.as_deref().unwrap_or(SITE_BASE)
    }

    fn api_key(&self) -> Option<&str> {
        // 未被替換的 ${VAR} 視為沒有提供
        self.source
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty() && !key.starts_with("${"))
    }

    fn user_agent(&self) -> &str {
        self.source.user_agent.as_deref().unwrap_or(BROWSER_USER_AGENT)
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(
            self.enrichment
                .delay_ms
                .unwrap_or_else(|| self.source.handle_source.default_delay_ms()),
        )
    }

    fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing.timeout_seconds.unwrap_or(20))
    }

    fn detail_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment.timeout_seconds.unwrap_or(10))
    }

    fn output_path(&self) -> &str {
        self.export.output_path.as_deref().unwrap_or(".")
    }

    fn output_file(&self) -> &str {
        self.export.output_file.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    fn export_schema(&self) -> ExportSchema {
        self.export
            .schema
            .unwrap_or_else(|| self.source.handle_source.default_schema())
    }

    fn include_id(&self) -> bool {
        self.export.include_id.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        super::validate_provider(self)
    }
}
