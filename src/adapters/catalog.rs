use crate::domain::model::InstitutionCatalogs;
use crate::domain::ports::CatalogSource;
use crate::utils::error::{PrereqError, Result};
use std::path::PathBuf;

/// 解析爬蟲輸出的 JSON：{ 學校代碼: { "DEPT-NUM": 課程資料 } }
pub fn parse_catalog_dump(data: &[u8]) -> Result<InstitutionCatalogs> {
    let catalogs: InstitutionCatalogs = serde_json::from_slice(data)?;
    for (institution, catalog) in &catalogs {
        catalog.validate_codes().map_err(|e| {
            tracing::error!("❌ Catalog for institution '{}' is malformed: {}", institution, e);
            e
        })?;
    }
    Ok(catalogs)
}

/// 將多個學期的目錄快照依學校合併，同一課程保留最新學期
pub fn merge_snapshots(snapshots: Vec<InstitutionCatalogs>) -> InstitutionCatalogs {
    let mut merged = InstitutionCatalogs::new();
    for snapshot in snapshots {
        for (institution, catalog) in snapshot {
            merged.entry(institution).or_default().merge(catalog);
        }
    }
    merged
}

/// 從本機 JSON 檔案讀取目錄，可指定多個學期的快照
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    paths: Vec<PathBuf>,
}

impl FileCatalogSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl CatalogSource for FileCatalogSource {
    async fn load(&self) -> Result<InstitutionCatalogs> {
        if self.paths.is_empty() {
            return Err(PrereqError::MissingConfigError {
                field: "source.paths".to_string(),
            });
        }

        let mut snapshots = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            tracing::debug!("Reading catalog snapshot: {}", path.display());
            let data = std::fs::read(path)?;
            snapshots.push(parse_catalog_dump(&data)?);
        }
        Ok(merge_snapshots(snapshots))
    }

    fn describe(&self) -> String {
        let paths: Vec<String> = self.paths.iter().map(|p| p.display().to_string()).collect();
        format!("file: {}", paths.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SPRING: &str = r#"{
        "A": {
            "ECON-111": {"title": "Principles", "url": "https://example.edu/econ-111",
                         "description": "", "date": "2016S", "date_checked": "2016-02-26"},
            "ECON-301": {"title": "Micro (spring)", "url": "https://example.edu/econ-301",
                         "description": "Requisite: ECON 111.", "date": "2016S", "date_checked": "2016-02-26"}
        }
    }"#;

    const FALL: &str = r#"{
        "A": {
            "ECON-301": {"title": "Micro (fall)", "url": "https://example.edu/econ-301",
                         "description": "Requisite: ECON 111.", "date": "2015F", "date_checked": "2016-02-26"}
        },
        "S": {
            "MATH-111": {"title": "Calculus", "url": "https://example.edu/math-111",
                         "date_checked": "2016-02-26"}
        }
    }"#;

    fn temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_rejects_malformed_codes() {
        let dump = r#"{"A": {"ECON111": {"title": "x", "url": "y", "date_checked": "2016-02-26"}}}"#;
        let err = parse_catalog_dump(dump.as_bytes()).unwrap_err();
        assert!(matches!(err, PrereqError::CourseCodeError { .. }));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse_catalog_dump(b"not json").unwrap_err();
        assert!(matches!(err, PrereqError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_file_source_merges_snapshots() {
        let spring = temp_json(SPRING);
        let fall = temp_json(FALL);
        let source = FileCatalogSource::new(vec![
            spring.path().to_path_buf(),
            fall.path().to_path_buf(),
        ]);

        let catalogs = source.load().await.unwrap();

        assert_eq!(catalogs.len(), 2);
        let amherst = &catalogs["A"];
        assert_eq!(amherst.len(), 2);
        assert_eq!(amherst.get("ECON-301").unwrap().title, "Micro (spring)");
        assert_eq!(catalogs["S"].get("MATH-111").unwrap().description, "");
        assert!(source.describe().starts_with("file: "));
    }

    #[tokio::test]
    async fn test_file_source_without_paths() {
        let source = FileCatalogSource::new(vec![]);
        assert!(matches!(
            source.load().await,
            Err(PrereqError::MissingConfigError { .. })
        ));
    }
}
