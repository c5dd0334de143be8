pub mod etl;
pub mod export;
pub mod pipeline;

pub use crate::domain::model::{ExportTable, ProjectRecord, SocialHandle};
pub use crate::domain::ports::{ConfigProvider, HandleResolver, Pipeline, Storage};
pub use crate::utils::error::Result;
