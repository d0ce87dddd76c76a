use crate::core::{Pipeline, TransformResult};
use crate::utils::error::Result;

pub struct PrereqEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> PrereqEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting prerequisite graph export...");

        let result = self.analyze().await?;

        tracing::info!("Writing {} department documents...", result.document_count());
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }

    /// 只做擷取與轉換，不寫任何檔案
    pub async fn analyze(&self) -> Result<TransformResult> {
        tracing::info!("Extracting catalog...");
        let catalogs = self.pipeline.extract().await?;
        let course_total: usize = catalogs.values().map(|c| c.len()).sum();
        tracing::info!(
            "Extracted {} courses across {} institutions",
            course_total,
            catalogs.len()
        );

        tracing::info!("Building prerequisite graphs...");
        let result = self.pipeline.transform(catalogs).await?;
        tracing::info!(
            "Built {} department documents",
            result.document_count()
        );

        Ok(result)
    }
}
