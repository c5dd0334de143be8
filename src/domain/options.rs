use crate::domain::model::SocialHandle;
use serde::{Deserialize, Serialize};

pub const PUBLIC_API_BASE: &str = "https://api.coingecko.com/api/v3";
pub const PRO_API_BASE: &str = "https://pro-api.coingecko.com/api/v3";
pub const SITE_BASE: &str = "https://www.coingecko.com";
pub const DEFAULT_CATEGORY: &str = "artificial-intelligence";
pub const DEFAULT_OUTPUT_FILE: &str = "ai_crypto_social_data.csv";
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";
pub const MAX_PER_PAGE: u32 = 250;

/// 社群帳號的取得方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum HandleSource {
    /// Scrape the public coin page for a twitter/x link.
    #[cfg_attr(feature = "cli", value(name = "html"))]
    #[serde(rename = "html")]
    HtmlPage,
    /// Read `links.twitter_screen_name` from the key-authenticated detail endpoint.
    #[cfg_attr(feature = "cli", value(name = "pro"))]
    #[serde(rename = "pro")]
    ProApi,
}

impl HandleSource {
    pub fn default_api_base(self) -> &'static str {
        match self {
            HandleSource::HtmlPage => PUBLIC_API_BASE,
            HandleSource::ProApi => PRO_API_BASE,
        }
    }

    pub fn default_delay_ms(self) -> u64 {
        match self {
            HandleSource::HtmlPage => 1000,
            HandleSource::ProApi => 250,
        }
    }

    pub fn default_schema(self) -> ExportSchema {
        match self {
            HandleSource::HtmlPage => ExportSchema::Scraper,
            HandleSource::ProApi => ExportSchema::Pro,
        }
    }

    pub fn requires_api_key(self) -> bool {
        matches!(self, HandleSource::ProApi)
    }

    pub fn failure_sentinel(self) -> SocialHandle {
        match self {
            HandleSource::HtmlPage => SocialHandle::FetchError,
            HandleSource::ProApi => SocialHandle::Error,
        }
    }
}

/// CSV 欄位命名，隨版本而不同
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum ExportSchema {
    /// `Project Name, Ticker, X Username`
    Scraper,
    /// `Project, Ticker, Twitter`
    Pro,
}

impl ExportSchema {
    pub fn columns(self, include_id: bool) -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(4);
        if include_id {
            columns.push("ID");
        }
        match self {
            ExportSchema::Scraper => columns.extend(["Project Name", "Ticker", "X Username"]),
            ExportSchema::Pro => columns.extend(["Project", "Ticker", "Twitter"]),
        }
        columns
    }
}
