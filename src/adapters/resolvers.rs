use crate::adapters::http::{endpoint, send_checked, with_api_key};
use crate::domain::model::SocialHandle;
use crate::domain::options::HandleSource;
use crate::domain::ports::{ConfigProvider, HandleResolver};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const PROFILE_HOSTS: &[&str] = &[
    "twitter.com",
    "www.twitter.com",
    "mobile.twitter.com",
    "x.com",
    "www.x.com",
];

/// Path prefixes that are share/navigation links rather than profiles.
const NON_PROFILE_PATHS: &[&str] = &["intent", "share", "home", "hashtag", "search", "i"];

/// Extracts the username from a twitter.com / x.com link. The handle is the
/// first path segment, so status and media links still resolve to their author.
pub fn username_from_profile_url(href: &str) -> Option<String> {
    let href = href.trim();
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let url = Url::parse(&absolute).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    if !PROFILE_HOSTS.contains(&host.as_str()) {
        return None;
    }

    let first = url.path_segments()?.find(|s| !s.is_empty())?;
    if NON_PROFILE_PATHS.contains(&first.to_ascii_lowercase().as_str()) {
        return None;
    }

    Some(first.to_string())
}

/// 從幣種頁面抓取 X (Twitter) 連結
pub struct HtmlPageResolver {
    client: Client,
    site_base: String,
    timeout: Duration,
    anchor_href: Regex,
}

impl HtmlPageResolver {
    pub fn new(client: Client, site_base: &str, timeout: Duration) -> Result<Self> {
        // 跳過其他屬性的引號值；href 可為雙引號、單引號或不加引號
        let anchor_href = Regex::new(
            r#"(?is)<a\b(?:[^>"']|"[^"]*"|'[^']*')*?\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#,
        )?;
        Ok(Self {
            client,
            site_base: site_base.to_string(),
            timeout,
            anchor_href,
        })
    }

    pub fn page_url(&self, coin_id: &str) -> String {
        endpoint(&self.site_base, &format!("en/coins/{}", coin_id))
    }

    /// Returns the username of the first profile link in the page, if any.
    pub fn extract_username(&self, html: &str) -> Option<String> {
        self.anchor_href
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
            .find_map(|href| username_from_profile_url(href.as_str()))
    }
}

#[async_trait]
impl HandleResolver for HtmlPageResolver {
    async fn resolve(&self, coin_id: &str) -> Result<Option<String>> {
        let url = self.page_url(coin_id);
        let response = send_checked(self.client.get(&url).timeout(self.timeout)).await?;
        let html = response.text().await?;
        Ok(self.extract_username(&html))
    }

    fn failure_sentinel(&self) -> SocialHandle {
        HandleSource::HtmlPage.failure_sentinel()
    }
}

#[derive(Debug, Deserialize)]
struct CoinDetail {
    #[serde(default)]
    links: Option<CoinLinks>,
}

#[derive(Debug, Deserialize)]
struct CoinLinks {
    #[serde(default)]
    twitter_screen_name: Option<String>,
}

/// Reads `links.twitter_screen_name` from the authenticated `/coins/{id}` endpoint.
pub struct ProApiResolver {
    client: Client,
    api_base: String,
    api_key: String,
    timeout: Duration,
}

impl ProApiResolver {
    pub fn new(client: Client, api_base: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            client,
            api_base: api_base.to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl HandleResolver for ProApiResolver {
    async fn resolve(&self, coin_id: &str) -> Result<Option<String>> {
        let url = endpoint(&self.api_base, &format!("coins/{}", coin_id));
        let request = self
            .client
            .get(&url)
            .query(&[
                ("localization", "false"),
                ("tickers", "false"),
                ("market_data", "false"),
                ("community_data", "false"),
                ("developer_data", "false"),
                ("sparkline", "false"),
            ])
            .timeout(self.timeout);
        let request = with_api_key(request, Some(&self.api_key));

        let body = send_checked(request).await?.bytes().await?;
        let detail: CoinDetail = serde_json::from_slice(&body)?;
        Ok(detail
            .links
            .and_then(|links| links.twitter_screen_name)
            .filter(|name| !name.trim().is_empty()))
    }

    fn failure_sentinel(&self) -> SocialHandle {
        HandleSource::ProApi.failure_sentinel()
    }
}

/// 依設定建立對應的解析器；pro 模式缺少金鑰時直接失敗
pub fn build_resolver<C: ConfigProvider>(
    client: Client,
    config: &C,
) -> Result<Box<dyn HandleResolver>> {
    match config.handle_source() {
        HandleSource::HtmlPage => Ok(Box::new(HtmlPageResolver::new(
            client,
            config.site_base(),
            config.detail_timeout(),
        )?)),
        HandleSource::ProApi => {
            let api_key = config
                .api_key()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| EtlError::MissingConfigError {
                    field: "api_key".to_string(),
                })?;
            Ok(Box::new(ProApiResolver::new(
                client,
                config.api_base(),
                api_key,
                config.detail_timeout(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_username_from_profile_url() {
        assert_eq!(
            username_from_profile_url("https://twitter.com/rendernetwork").as_deref(),
            Some("rendernetwork")
        );
        assert_eq!(
            username_from_profile_url("https://x.com/bittensor_/").as_deref(),
            Some("bittensor_")
        );
        assert_eq!(
            username_from_profile_url("//twitter.com/Fetch_ai?ref=cg").as_deref(),
            Some("Fetch_ai")
        );
        assert_eq!(username_from_profile_url("https://twitter.com/intent/tweet?text=hi"), None);
        assert_eq!(username_from_profile_url("https://netflix.com/foo"), None);
        assert_eq!(username_from_profile_url("https://twitter.com/"), None);
        assert_eq!(username_from_profile_url("/en/coins/render-token"), None);
    }

    #[test]
    fn test_status_link_resolves_to_author() {
        assert_eq!(
            username_from_profile_url("https://twitter.com/rendernetwork/status/1790000000000")
                .as_deref(),
            Some("rendernetwork")
        );
        assert_eq!(
            username_from_profile_url("https://x.com/opentensor/photo").as_deref(),
            Some("opentensor")
        );
    }

    fn page_resolver() -> HtmlPageResolver {
        HtmlPageResolver::new(Client::new(), "https://www.coingecko.com", Duration::from_secs(1))
            .unwrap()
    }

    #[test]
    fn test_extract_username_unquoted_href() {
        let resolver = page_resolver();
        assert_eq!(
            resolver
                .extract_username(r#"<a href=https://twitter.com/rendernetwork>X</a>"#)
                .as_deref(),
            Some("rendernetwork")
        );
        assert_eq!(
            resolver
                .extract_username(r#"<a target=_blank href=https://x.com/opentensor class=social>X</a>"#)
                .as_deref(),
            Some("opentensor")
        );
    }

    #[test]
    fn test_extract_username_angle_bracket_in_earlier_attribute() {
        let resolver = page_resolver();
        assert_eq!(
            resolver
                .extract_username(r#"<a title="X > Twitter" href="https://twitter.com/rendernetwork">X</a>"#)
                .as_deref(),
            Some("rendernetwork")
        );
        assert_eq!(
            resolver
                .extract_username(r#"<a data-label='a > b' href='https://twitter.com/fetch_ai'>X</a>"#)
                .as_deref(),
            Some("fetch_ai")
        );
    }

    #[test]
    fn test_href_text_inside_other_attribute_is_ignored() {
        let resolver = page_resolver();
        let html = r#"<a title=" href=https://twitter.com/decoy" href="https://twitter.com/realhandle">X</a>"#;
        assert_eq!(resolver.extract_username(html).as_deref(), Some("realhandle"));
    }

    #[test]
    fn test_extract_username_skips_share_links() {
        let resolver = page_resolver();
        let html = r#"
            <a class="share" href="https://twitter.com/intent/tweet?url=x">Share</a>
            <a href="/en/coins/render-token">Render</a>
            <a rel="nofollow" target="_blank" href='https://twitter.com/rendernetwork'>Twitter</a>
            <a href="https://twitter.com/someone_else">Other</a>
        "#;
        assert_eq!(resolver.extract_username(html).as_deref(), Some("rendernetwork"));
        assert_eq!(resolver.extract_username("<p>no links</p>"), None);
    }

    #[tokio::test]
    async fn test_html_resolver_fetches_coin_page() {
        let server = MockServer::start_async().await;
        let page = server
            .mock_async(|when, then| {
                when.method(GET).path("/en/coins/render-token");
                then.status(200)
                    .header("Content-Type", "text/html")
                    .body(r#"<html><a href="https://twitter.com/rendernetwork">X</a></html>"#);
            })
            .await;

        let resolver =
            HtmlPageResolver::new(Client::new(), &server.base_url(), Duration::from_secs(5)).unwrap();
        let username = resolver.resolve("render-token").await.unwrap();

        page.assert_async().await;
        assert_eq!(username.as_deref(), Some("rendernetwork"));
    }

    #[tokio::test]
    async fn test_html_resolver_reports_http_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/en/coins/missing");
                then.status(404);
            })
            .await;

        let resolver =
            HtmlPageResolver::new(Client::new(), &server.base_url(), Duration::from_secs(5)).unwrap();
        let err = resolver.resolve("missing").await.unwrap_err();

        assert!(matches!(err, EtlError::HttpStatus { status: 404, .. }));
        assert_eq!(resolver.failure_sentinel(), SocialHandle::FetchError);
    }

    #[tokio::test]
    async fn test_pro_resolver_reads_screen_name() {
        let server = MockServer::start_async().await;
        let detail = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/coins/bittensor")
                    .query_param("localization", "false")
                    .header("x-cg-pro-api-key", "pro-key");
                then.status(200).json_body(serde_json::json!({
                    "id": "bittensor",
                    "links": {"homepage": ["https://bittensor.com"], "twitter_screen_name": "opentensor"}
                }));
            })
            .await;

        let resolver =
            ProApiResolver::new(Client::new(), &server.base_url(), "pro-key", Duration::from_secs(5));
        let username = resolver.resolve("bittensor").await.unwrap();

        detail.assert_async().await;
        assert_eq!(username.as_deref(), Some("opentensor"));
    }

    #[tokio::test]
    async fn test_pro_resolver_empty_screen_name_is_absent() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/coins/quiet");
                then.status(200)
                    .json_body(serde_json::json!({"id": "quiet", "links": {"twitter_screen_name": ""}}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/coins/nolinks");
                then.status(200).json_body(serde_json::json!({"id": "nolinks"}));
            })
            .await;

        let resolver =
            ProApiResolver::new(Client::new(), &server.base_url(), "pro-key", Duration::from_secs(5));

        assert_eq!(resolver.resolve("quiet").await.unwrap(), None);
        assert_eq!(resolver.resolve("nolinks").await.unwrap(), None);
        assert_eq!(resolver.failure_sentinel(), SocialHandle::Error);
    }

    #[tokio::test]
    async fn test_pro_resolver_rejects_non_json_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/coins/broken");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let resolver =
            ProApiResolver::new(Client::new(), &server.base_url(), "pro-key", Duration::from_secs(5));
        let err = resolver.resolve("broken").await.unwrap_err();

        assert!(matches!(err, EtlError::SerializationError(_)));
    }
}
