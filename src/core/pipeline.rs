use crate::core::export::{self, build_document, DepartmentPalette, ExportContext};
use crate::core::graph::{
    build_course_graph, department_subgraph, extract_requisites, find_unmatched_requisites,
    flatten_edges,
};
use crate::core::layout::layered_layout;
use crate::core::requisite::RequisiteExtractor;
use crate::core::{
    CatalogSource, ColorSource, ConfigProvider, InstitutionCatalogs, Pipeline, Storage,
    TransformResult,
};
use crate::domain::model::{CourseCatalog, InstitutionResult};
use crate::utils::error::{PrereqError, Result};
use std::sync::Mutex;

pub const DATA_FILE: &str = "data.json";
pub const ATTRS_FILE: &str = "courseAttrs.tsv";
pub const EDGELIST_FILE: &str = "courseEdgelist.tsv";

/// 目錄 -> 先修圖 -> 各科系 data.json
pub struct PrereqPipeline<S: Storage, C: ConfigProvider, K: CatalogSource, R: ColorSource + Send> {
    storage: S,
    config: C,
    source: K,
    colors: Mutex<R>,
}

impl<S, C, K, R> PrereqPipeline<S, C, K, R>
where
    S: Storage,
    C: ConfigProvider,
    K: CatalogSource,
    R: ColorSource + Send,
{
    pub fn new(storage: S, config: C, source: K, colors: R) -> Self {
        Self {
            storage,
            config,
            source,
            colors: Mutex::new(colors),
        }
    }

    fn wants_institution(&self, institution: &str) -> bool {
        let filter = self.config.institutions();
        filter.is_empty() || filter.iter().any(|i| i.eq_ignore_ascii_case(institution))
    }

    fn wants_department(&self, department: &str) -> bool {
        let filter = self.config.departments();
        filter.is_empty() || filter.iter().any(|d| d.eq_ignore_ascii_case(department))
    }

    fn transform_institution(
        &self,
        institution: &str,
        catalog: CourseCatalog,
    ) -> Result<InstitutionResult> {
        let extractor = RequisiteExtractor::new(self.config.requisite_mode());
        let requisites = extract_requisites(&catalog, &extractor, self.config.number_rule())?;
        let edges = flatten_edges(&requisites, self.config.deduplicate_edges());

        let unmatched = find_unmatched_requisites(&catalog, &requisites, &edges);
        for (code, line) in &unmatched {
            tracing::warn!("⚠️ [{}] {} has requisite text but no course codes: {}", institution, code, line);
        }

        let graph = build_course_graph(&catalog, &edges);
        let phantom_count = graph.node_count() - catalog.len();
        tracing::info!(
            "🕸️ [{}] {} courses, {} edges, {} phantom nodes, {} unmatched requisite lines",
            institution,
            catalog.len(),
            graph.edge_count(),
            phantom_count,
            unmatched.len()
        );

        let mut colors = self.colors.lock().map_err(|_| PrereqError::ProcessingError {
            message: "color source lock poisoned".to_string(),
        })?;
        let mut palette = DepartmentPalette::new();
        let context = ExportContext {
            catalog: &catalog,
            requisites: &requisites,
            phantom_semesters: self.config.phantom_semesters(),
        };

        let mut documents = Vec::new();
        for department in catalog.departments() {
            if !self.wants_department(&department) {
                continue;
            }
            let subgraph = department_subgraph(&department, &graph);
            let positions = layered_layout(&subgraph, self.config.max_iterations());
            let document = build_document(&subgraph, &positions, &mut palette, &mut *colors, &context)?;
            tracing::debug!(
                "[{}] {}: {} nodes, {} edges",
                institution,
                department,
                document.nodes.len(),
                document.edges.len()
            );
            documents.push((department, document));
        }
        drop(colors);

        Ok(InstitutionResult {
            institution: institution.to_string(),
            catalog,
            requisites,
            edges,
            phantom_count,
            unmatched,
            documents,
        })
    }

    /// 科系目錄不存在時先複製視覺化模板
    async fn scaffold(&self, directory: &str) -> Result<()> {
        if let Some(template) = self.config.template_dir() {
            if !self.storage.exists(directory).await {
                tracing::debug!("Copying template {} -> {}", template, directory);
                self.storage.copy_dir(template, directory).await?;
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S, C, K, R> Pipeline for PrereqPipeline<S, C, K, R>
where
    S: Storage,
    C: ConfigProvider,
    K: CatalogSource,
    R: ColorSource + Send,
{
    async fn extract(&self) -> Result<InstitutionCatalogs> {
        tracing::info!("📥 Loading catalog from {}", self.source.describe());
        let mut catalogs = self.source.load().await?;
        catalogs.retain(|institution, _| self.wants_institution(institution));

        if catalogs.is_empty() {
            tracing::warn!("No institutions left to process");
        }
        Ok(catalogs)
    }

    async fn transform(&self, data: InstitutionCatalogs) -> Result<TransformResult> {
        let mut result = TransformResult::default();
        for (institution, catalog) in data {
            let institution_result = self.transform_institution(&institution, catalog)?;
            result.institutions.push(institution_result);
        }
        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        for institution in &result.institutions {
            for (department, document) in &institution.documents {
                let directory = format!("{}/{}", institution.institution, department);
                self.scaffold(&directory).await?;
                let json = document.to_json()?;
                self.storage
                    .write_file(&format!("{}/{}", directory, DATA_FILE), json.as_bytes())
                    .await?;
            }

            if self.config.write_tsv() {
                let attrs = export::course_attrs_tsv(&institution.catalog, &institution.requisites)?;
                self.storage
                    .write_file(&format!("{}/{}", institution.institution, ATTRS_FILE), &attrs)
                    .await?;
                let edgelist = export::edgelist_tsv(&institution.edges)?;
                self.storage
                    .write_file(&format!("{}/{}", institution.institution, EDGELIST_FILE), &edgelist)
                    .await?;

                // 每個科系另存 <DEPT>courseAttrs.tsv / <DEPT>courseEdgelist.tsv
                for (department, _) in &institution.documents {
                    let attrs = export::department_attrs_tsv(
                        department,
                        &institution.catalog,
                        &institution.requisites,
                    )?;
                    self.storage
                        .write_file(
                            &format!("{}/{}{}", institution.institution, department, ATTRS_FILE),
                            &attrs,
                        )
                        .await?;
                    let edgelist = export::department_edgelist_tsv(department, &institution.edges)?;
                    self.storage
                        .write_file(
                            &format!("{}/{}{}", institution.institution, department, EDGELIST_FILE),
                            &edgelist,
                        )
                        .await?;
                }
            }

            tracing::debug!(
                "[{}] wrote {} department documents",
                institution.institution,
                institution.documents.len()
            );
        }

        Ok(self.config.output_path().to_string())
    }
}
