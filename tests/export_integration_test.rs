use ai_social_etl::core::Pipeline;
use ai_social_etl::{EtlEngine, EtlError, LocalStorage, SocialPipeline, TomlConfig};
use anyhow::Result;
use httpmock::prelude::*;
use tempfile::TempDir;

fn read_rows(path: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::Reader::from_path(path)?;
    let header = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok((header, rows))
}

fn html_config(server: &MockServer, output_path: &str) -> Result<TomlConfig> {
    // 將Windows路徑中的反斜杠轉為正斜杠以避免TOML解析問題
    let normalized_path = output_path.replace('\\', "/");
    let content = format!(
        r#"
[source]
handle_source = "html"
api_base = "{base}/api/v3"
site_base = "{base}"

[enrichment]
delay_ms = 0

[export]
output_path = "{path}"
output_file = "ai_crypto_social_data.csv"
"#,
        base = server.base_url(),
        path = normalized_path
    );
    Ok(TomlConfig::from_toml_str(&content)?)
}

fn pro_config(server: &MockServer, output_path: &str, api_key: &str) -> Result<TomlConfig> {
    let normalized_path = output_path.replace('\\', "/");
    let content = format!(
        r#"
[source]
handle_source = "pro"
api_base = "{base}"
api_key = "{key}"

[listing]
paginate = true
per_page = 2

[enrichment]
delay_ms = 0

[export]
output_path = "{path}"
output_file = "ai_projects_twitter.csv"
"#,
        base = server.base_url(),
        key = api_key,
        path = normalized_path
    );
    Ok(TomlConfig::from_toml_str(&content)?)
}

#[tokio::test]
async fn test_end_to_end_html_scrape() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let server = MockServer::start_async().await;
    let listing = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v3/coins/markets")
                .query_param("category", "artificial-intelligence")
                .query_param("per_page", "250")
                .query_param("page", "1");
            then.status(200).json_body(serde_json::json!([
                {"id": "render-token", "name": "Render", "symbol": "rndr", "current_price": 7.1},
                {"id": "fetch-ai", "name": "Fetch.ai", "symbol": "fet"},
                {"id": "delisted", "name": "Delisted", "symbol": "dls"}
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/en/coins/render-token");
            then.status(200).body(
                r#"<div class="social"><a href="https://twitter.com/rendernetwork" target="_blank">X</a></div>"#,
            );
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/en/coins/fetch-ai");
            then.status(200).body("<html><body>no socials</body></html>");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/en/coins/delisted");
            then.status(404);
        })
        .await;

    let config = html_config(&server, &output_path)?;
    let pipeline = SocialPipeline::new(LocalStorage::new(output_path.clone()), config)?;
    let report = EtlEngine::new(pipeline).run().await?;

    listing.assert_async().await;
    assert_eq!(report.rows, 3);
    assert_eq!(report.summary.resolved, 1);
    assert_eq!(report.summary.absent, 1);
    assert_eq!(report.summary.failed, 1);

    let (header, rows) = read_rows(&report.output_path)?;
    assert_eq!(header, vec!["Project Name", "Ticker", "X Username"]);
    assert_eq!(
        rows,
        vec![
            vec!["Render", "RNDR", "@rendernetwork"],
            vec!["Fetch.ai", "FET", "N/A"],
            vec!["Delisted", "DLS", "FETCH_ERROR"],
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_pro_api_paginated() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let server = MockServer::start_async().await;
    let page_one = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/coins/markets")
                .query_param("page", "1")
                .header("x-cg-pro-api-key", "pro-key");
            then.status(200).json_body(serde_json::json!([
                {"id": "bittensor", "name": "Bittensor", "symbol": "tao"},
                {"id": "render-token", "name": "Render", "symbol": "rndr"}
            ]));
        })
        .await;
    let page_two = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/coins/markets")
                .query_param("page", "2")
                .header("x-cg-pro-api-key", "pro-key");
            then.status(200).json_body(serde_json::json!([
                {"id": "fetch-ai", "name": "Fetch.ai", "symbol": "fet"}
            ]));
        })
        .await;
    let page_three = server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/markets").query_param("page", "3");
            then.status(200).json_body(serde_json::json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/coins/bittensor")
                .header("x-cg-pro-api-key", "pro-key");
            then.status(200)
                .json_body(serde_json::json!({"links": {"twitter_screen_name": "opentensor"}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/render-token");
            then.status(200)
                .json_body(serde_json::json!({"links": {"twitter_screen_name": null}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/fetch-ai");
            then.status(429);
        })
        .await;

    let config = pro_config(&server, &output_path, "pro-key")?;
    let pipeline = SocialPipeline::new(LocalStorage::new(output_path.clone()), config)?;
    let report = EtlEngine::new(pipeline).run().await?;

    page_one.assert_async().await;
    page_two.assert_async().await;
    page_three.assert_async().await;
    assert_eq!(report.rows, 3);

    let (header, rows) = read_rows(&report.output_path)?;
    assert_eq!(header, vec!["Project", "Ticker", "Twitter"]);
    assert_eq!(
        rows,
        vec![
            vec!["Bittensor", "TAO", "@opentensor"],
            vec!["Render", "RNDR", "N/A"],
            vec!["Fetch.ai", "FET", "ERROR"],
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_listing_failure_aborts_without_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let server = MockServer::start_async().await;
    let listing = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/coins/markets");
            then.status(503);
        })
        .await;

    let config = html_config(&server, &output_path)?;
    let pipeline = SocialPipeline::new(LocalStorage::new(output_path.clone()), config)?;
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    listing.assert_async().await;
    assert!(matches!(err, EtlError::ListingError { page: 1, .. }));
    assert_ne!(err.severity().exit_code(), 0);
    assert!(!temp_dir.path().join("ai_crypto_social_data.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_undecodable_listing_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/coins/markets");
            then.status(200).json_body(serde_json::json!({"error": "unexpected"}));
        })
        .await;

    let config = html_config(&server, &output_path)?;
    let pipeline = SocialPipeline::new(LocalStorage::new(output_path), config)?;
    let err = pipeline.extract().await.unwrap_err();

    match err {
        EtlError::ListingError { page, source } => {
            assert_eq!(page, 1);
            assert!(matches!(*source, EtlError::SerializationError(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_api_key_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();
    let server = MockServer::start_async().await;

    let config = pro_config(&server, &output_path, "")?;
    let result = SocialPipeline::new(LocalStorage::new(output_path), config);

    match result {
        Err(e) => {
            assert!(matches!(e, EtlError::MissingConfigError { .. }));
            assert_eq!(e.severity().exit_code(), 3);
        }
        Ok(_) => panic!("pipeline must not build without an API key"),
    }
    Ok(())
}
