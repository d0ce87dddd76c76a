pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{
    catalog::FileCatalogSource, colors::RandomColors, http::HttpCatalogSource,
    storage::LocalStorage, ConfiguredSource,
};
pub use config::toml_config::TomlConfig;
pub use core::{engine::PrereqEngine, pipeline::PrereqPipeline};
pub use domain::document::VisualizationDocument;
pub use domain::model::{CourseCatalog, CourseCode, CourseRecord, PrerequisiteEdge};
pub use utils::error::{PrereqError, Result};
