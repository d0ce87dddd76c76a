use crate::domain::model::{InstitutionCatalogs, NumberRule, RequisiteMode, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    /// 將 `source` 目錄整個複製到儲存區內的 `path`
    fn copy_dir(
        &self,
        source: &str,
        path: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 外部爬蟲資料的來源
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<InstitutionCatalogs>> + Send;
    fn describe(&self) -> String;
}

/// 科系顏色用的亂數來源，測試時可注入固定序列
pub trait ColorSource {
    fn next_channel(&mut self) -> u8;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn template_dir(&self) -> Option<&str>;
    fn institutions(&self) -> &[String];
    fn departments(&self) -> &[String];
    fn requisite_mode(&self) -> RequisiteMode;
    fn number_rule(&self) -> NumberRule;
    fn deduplicate_edges(&self) -> bool;
    fn max_iterations(&self) -> usize;
    fn phantom_semesters(&self) -> u32;
    fn write_tsv(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<InstitutionCatalogs>;
    async fn transform(&self, data: InstitutionCatalogs) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
