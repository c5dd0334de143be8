pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::storage::LocalStorage;
pub use core::{etl::EtlEngine, pipeline::SocialPipeline};
pub use domain::model::{ProjectRecord, SocialHandle};
pub use domain::options::{ExportSchema, HandleSource};
pub use utils::error::{EtlError, Result};
