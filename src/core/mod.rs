pub mod engine;
pub mod export;
pub mod graph;
pub mod layout;
pub mod pipeline;
pub mod requisite;
pub mod tokenizer;

pub use crate::domain::model::{InstitutionCatalogs, TransformResult};
pub use crate::domain::ports::{CatalogSource, ColorSource, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
