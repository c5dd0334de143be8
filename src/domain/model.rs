use serde::Deserialize;
use std::fmt;

pub const ABSENT_SENTINEL: &str = "N/A";
pub const FETCH_ERROR_SENTINEL: &str = "FETCH_ERROR";
pub const ERROR_SENTINEL: &str = "ERROR";

/// One item of the `/coins/markets` listing. Only the fields we export are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketCoin {
    pub id: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// 社群帳號解析結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialHandle {
    /// Bare username, rendered with a leading `@`.
    Username(String),
    Absent,
    /// The HTML page could not be fetched.
    FetchError,
    /// The pro detail endpoint failed.
    Error,
}

impl SocialHandle {
    /// Builds a handle from a raw username, falling back to `Absent` when blank.
    pub fn from_username(raw: &str) -> Self {
        let name = raw.trim().trim_start_matches('@').trim();
        if name.is_empty() {
            SocialHandle::Absent
        } else {
            SocialHandle::Username(name.to_string())
        }
    }
}

impl fmt::Display for SocialHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocialHandle::Username(name) => write!(f, "@{}", name),
            SocialHandle::Absent => f.write_str(ABSENT_SENTINEL),
            SocialHandle::FetchError => f.write_str(FETCH_ERROR_SENTINEL),
            SocialHandle::Error => f.write_str(ERROR_SENTINEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    id: String,
    name: String,
    symbol: String,
    handle: Option<SocialHandle>,
}

impl ProjectRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.trim().to_uppercase(),
            handle: None,
        }
    }

    /// Converts a listing item, skipping entries without an id or symbol.
    pub fn from_market_coin(coin: MarketCoin) -> Option<Self> {
        let id = coin.id.filter(|id| !id.trim().is_empty())?;
        let symbol = coin.symbol.filter(|s| !s.trim().is_empty())?;
        let name = coin
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| id.clone());
        Some(Self::new(id, name, &symbol))
    }

    /// 以解析好的帳號產生新紀錄，原紀錄不變
    pub fn with_handle(&self, handle: SocialHandle) -> Self {
        Self {
            handle: Some(handle),
            ..self.clone()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn handle(&self) -> Option<&SocialHandle> {
        self.handle.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnrichmentSummary {
    pub resolved: usize,
    pub absent: usize,
    pub failed: usize,
}

impl EnrichmentSummary {
    pub fn record(&mut self, handle: &SocialHandle) {
        match handle {
            SocialHandle::Username(_) => self.resolved += 1,
            SocialHandle::Absent => self.absent += 1,
            SocialHandle::FetchError | SocialHandle::Error => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.resolved + self.absent + self.failed
    }
}

#[derive(Debug, Clone)]
pub struct ExportTable {
    pub records: Vec<ProjectRecord>,
    pub summary: EnrichmentSummary,
}
