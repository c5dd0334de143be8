use crate::adapters::http::{endpoint, send_checked, with_api_key};
use crate::domain::model::{MarketCoin, ProjectRecord};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ListingQuery {
    pub category: String,
    pub vs_currency: String,
    pub order: String,
    pub per_page: u32,
    pub paginate: bool,
    pub max_pages: Option<u32>,
    pub page_delay: Duration,
}

impl ListingQuery {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            category: config.category().to_string(),
            vs_currency: config.vs_currency().to_string(),
            order: config.order().to_string(),
            per_page: config.per_page(),
            paginate: config.paginate(),
            max_pages: config.max_pages(),
            page_delay: config.request_delay(),
        }
    }

    fn is_last_page(&self, page: u32) -> bool {
        !self.paginate || self.max_pages.is_some_and(|max| page >= max)
    }
}

/// Client for the `/coins/markets` listing endpoint.
pub struct MarketsClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl MarketsClient {
    pub fn new(client: Client, api_base: &str, api_key: Option<&str>, timeout: Duration) -> Self {
        Self {
            client,
            api_base: api_base.to_string(),
            api_key: api_key.map(str::to_string),
            timeout,
        }
    }

    pub fn from_config<C: ConfigProvider>(client: Client, config: &C) -> Self {
        // 公開 API 不送金鑰
        let api_key = if config.handle_source().requires_api_key() {
            config.api_key()
        } else {
            None
        };
        Self::new(client, config.api_base(), api_key, config.listing_timeout())
    }

    pub async fn fetch_page(&self, query: &ListingQuery, page: u32) -> Result<Vec<MarketCoin>> {
        let url = endpoint(&self.api_base, "coins/markets");
        tracing::debug!("Requesting listing page {} from {}", page, url);

        let params: [(&str, String); 5] = [
            ("vs_currency", query.vs_currency.clone()),
            ("category", query.category.clone()),
            ("order", query.order.clone()),
            ("per_page", query.per_page.to_string()),
            ("page", page.to_string()),
        ];

        let request = self.client.get(&url).query(&params).timeout(self.timeout);
        let request = with_api_key(request, self.api_key.as_deref());

        Self::decode_page(request)
            .await
            .map_err(|e| EtlError::ListingError {
                page,
                source: Box::new(e),
            })
    }

    async fn decode_page(request: RequestBuilder) -> Result<Vec<MarketCoin>> {
        let body = send_checked(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// 取得整個分類；分頁模式下遇到第一個空頁即停止
    pub async fn fetch_all(&self, query: &ListingQuery) -> Result<Vec<ProjectRecord>> {
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let coins = self.fetch_page(query, page).await?;
            if coins.is_empty() {
                tracing::debug!("Listing page {} is empty, stopping", page);
                break;
            }

            let count = coins.len();
            for coin in coins {
                let label = coin.id.clone().unwrap_or_else(|| "<no id>".to_string());
                match ProjectRecord::from_market_coin(coin) {
                    Some(record) => records.push(record),
                    None => tracing::warn!("Skipping listing entry without id or symbol: {}", label),
                }
            }
            tracing::info!("📄 Page {}: {} projects", page, count);

            if query.is_last_page(page) {
                break;
            }
            page += 1;

            if !query.page_delay.is_zero() {
                tokio::time::sleep(query.page_delay).await;
            }
        }

        Ok(records)
    }
}
