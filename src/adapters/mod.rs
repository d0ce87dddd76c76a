// Adapters layer: concrete implementations for external systems (catalog dumps, storage, http, colors).

pub mod catalog;
pub mod colors;
pub mod http;
pub mod storage;

use crate::domain::model::InstitutionCatalogs;
use crate::domain::ports::CatalogSource;
use crate::utils::error::Result;

/// 由設定檔決定的目錄來源
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    File(catalog::FileCatalogSource),
    Http(http::HttpCatalogSource),
}

impl CatalogSource for ConfiguredSource {
    async fn load(&self) -> Result<InstitutionCatalogs> {
        match self {
            ConfiguredSource::File(source) => source.load().await,
            ConfiguredSource::Http(source) => source.load().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            ConfiguredSource::File(source) => source.describe(),
            ConfiguredSource::Http(source) => source.describe(),
        }
    }
}
