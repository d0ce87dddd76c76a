use crate::adapters::catalog::parse_catalog_dump;
use crate::domain::model::InstitutionCatalogs;
use crate::domain::ports::CatalogSource;
use crate::utils::error::{PrereqError, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// 透過 HTTP 取得已爬好的目錄 JSON
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    endpoint: String,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
    client: Client,
}

impl HttpCatalogSource {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            headers: HashMap::new(),
            timeout: None,
            client: Client::new(),
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds.map(Duration::from_secs);
        self
    }
}

impl CatalogSource for HttpCatalogSource {
    async fn load(&self) -> Result<InstitutionCatalogs> {
        tracing::debug!("Making catalog request to: {}", self.endpoint);

        let mut request = self.client.get(&self.endpoint);
        // 添加自定義標頭
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        tracing::debug!("Catalog response status: {}", response.status());

        if !response.status().is_success() {
            return Err(PrereqError::ProcessingError {
                message: format!(
                    "catalog endpoint {} returned {}",
                    self.endpoint,
                    response.status()
                ),
            });
        }

        let body = response.bytes().await?;
        parse_catalog_dump(&body)
    }

    fn describe(&self) -> String {
        format!("http: {}", self.endpoint)
    }
}
