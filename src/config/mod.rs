#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::core::ConfigProvider;
use crate::domain::options::MAX_PER_PAGE;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_file_name, validate_non_empty_string, validate_path, validate_range, validate_url,
};

/// 兩種設定來源共用的檢查
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_non_empty_string("category", config.category())?;
    validate_non_empty_string("vs_currency", config.vs_currency())?;
    validate_non_empty_string("order", config.order())?;
    validate_range("per_page", config.per_page(), 1, MAX_PER_PAGE)?;

    if let Some(max_pages) = config.max_pages() {
        validate_range("max_pages", max_pages, 1, u32::MAX)?;
    }

    validate_url("api_base", config.api_base())?;
    validate_url("site_base", config.site_base())?;
    validate_non_empty_string("user_agent", config.user_agent())?;
    validate_range("listing_timeout", config.listing_timeout().as_secs(), 1, 300)?;
    validate_range("detail_timeout", config.detail_timeout().as_secs(), 1, 300)?;

    validate_path("output_path", config.output_path())?;
    validate_file_name("output_file", config.output_file(), &["csv"])?;

    if config.handle_source().requires_api_key() && config.api_key().is_none() {
        return Err(EtlError::MissingConfigError {
            field: "api_key".to_string(),
        });
    }

    Ok(())
}
