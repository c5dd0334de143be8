use crate::utils::error::{EtlError, Result};
use reqwest::{Client, RequestBuilder, Response};

/// Header carrying the key for the pro tier.
pub const API_KEY_HEADER: &str = "x-cg-pro-api-key";

pub fn build_client(user_agent: &str) -> Result<Client> {
    let client = Client::builder().user_agent(user_agent).build()?;
    Ok(client)
}

/// 送出請求，非 2xx 狀態一律轉為錯誤
pub async fn send_checked(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;
    let status = response.status();

    tracing::debug!("{} -> {}", response.url(), status);

    if !status.is_success() {
        return Err(EtlError::HttpStatus {
            url: response.url().to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

pub fn with_api_key(request: RequestBuilder, api_key: Option<&str>) -> RequestBuilder {
    match api_key {
        Some(key) => request.header(API_KEY_HEADER, key),
        None => request,
    }
}

pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
