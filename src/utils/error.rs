use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Pattern compilation error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Listing request for page {page} failed: {source}")]
    ListingError {
        page: u32,
        #[source]
        source: Box<EtlError>,
    },

    #[error("Listing for category '{category}' returned no projects")]
    EmptyListing { category: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 對應 CLI 的退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::HttpStatus { .. } | EtlError::ListingError { .. } => {
                ErrorCategory::Network
            }
            EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::RegexError(_) => ErrorCategory::Configuration,
            EtlError::SerializationError(_)
            | EtlError::EmptyListing { .. }
            | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::CsvError(_) | EtlError::IoError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::EmptyListing { .. } => ErrorSeverity::Low,
            EtlError::HttpStatus { status: 429, .. } => ErrorSeverity::Medium,
            EtlError::ApiError(e) if e.is_timeout() => ErrorSeverity::Medium,
            EtlError::ListingError { source, .. } => source.severity().max(ErrorSeverity::High),
            EtlError::MissingConfigError { .. } => ErrorSeverity::Critical,
            EtlError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::MissingConfigError { field } if field == "api_key" => {
                "Export COINGECKO_API_KEY or pass --api-key when using the pro source".to_string()
            }
            EtlError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            EtlError::InvalidConfigValueError { field, .. }
            | EtlError::ConfigValidationError { field, .. } => {
                format!("Check the '{}' setting", field)
            }
            EtlError::HttpStatus { status: 401, .. } | EtlError::HttpStatus { status: 403, .. } => {
                "Verify the API key and that it matches the selected API base URL".to_string()
            }
            EtlError::HttpStatus { status: 429, .. } => {
                "Rate limited: raise --delay-ms or wait before retrying".to_string()
            }
            EtlError::ListingError { source, .. } => source.recovery_suggestion(),
            EtlError::ApiError(_) | EtlError::HttpStatus { .. } => {
                "Check network connectivity and the API base URL".to_string()
            }
            EtlError::EmptyListing { .. } => {
                "Verify the category id, e.g. 'artificial-intelligence'".to_string()
            }
            EtlError::CsvError(_) | EtlError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            _ => "Re-run with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            EtlError::ListingError { page, .. } => {
                format!("Could not fetch the project list (page {})", page)
            }
            EtlError::EmptyListing { category } => {
                format!("No projects found in category '{}'", category)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
