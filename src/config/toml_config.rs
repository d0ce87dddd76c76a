use crate::adapters::catalog::FileCatalogSource;
use crate::adapters::http::HttpCatalogSource;
use crate::adapters::ConfiguredSource;
use crate::core::export::DEFAULT_PHANTOM_SEMESTERS;
use crate::core::layout::DEFAULT_MAX_ITERATIONS;
use crate::domain::model::{NumberRule, RequisiteMode};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PrereqError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    pub export: ExportConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    pub paths: Option<Vec<String>>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default)]
    pub requisite_mode: RequisiteMode,
    #[serde(default)]
    pub number_rule: NumberRule,
    #[serde(default)]
    pub institutions: Vec<String>,
    #[serde(default)]
    pub departments: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphConfig {
    pub deduplicate_edges: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub max_iterations: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: String,
    pub template_dir: Option<String>,
    pub phantom_semesters: Option<u32>,
    pub write_tsv: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PrereqError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PrereqError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CATALOG_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PrereqError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;

        match self.source.r#type.as_str() {
            "file" => {
                let paths = validation::validate_required_field("source.paths", &self.source.paths)?;
                validation::validate_catalog_paths("source.paths", paths)?;
            }
            "http" => {
                let endpoint =
                    validation::validate_required_field("source.endpoint", &self.source.endpoint)?;
                validation::validate_url("source.endpoint", endpoint)?;
            }
            other => {
                return Err(PrereqError::InvalidConfigValueError {
                    field: "source.type".to_string(),
                    value: other.to_string(),
                    reason: "Supported source types: file, http".to_string(),
                });
            }
        }

        validation::validate_code_filter("extract.institutions", &self.extract.institutions)?;
        validation::validate_code_filter("extract.departments", &self.extract.departments)?;
        validation::validate_path("export.output_path", &self.export.output_path)?;
        if let Some(template) = &self.export.template_dir {
            validation::validate_path("export.template_dir", template)?;
        }
        validation::validate_positive_number("layout.max_iterations", self.max_iterations(), 1)?;
        validation::validate_range("export.phantom_semesters", self.phantom_semesters(), 1, 20)?;

        Ok(())
    }

    /// 依 source.type 建立目錄來源
    pub fn catalog_source(&self) -> Result<ConfiguredSource> {
        match self.source.r#type.as_str() {
            "http" => {
                let endpoint =
                    validation::validate_required_field("source.endpoint", &self.source.endpoint)?;
                Ok(ConfiguredSource::Http(
                    HttpCatalogSource::new(endpoint.clone())
                        .with_headers(self.source.headers.clone().unwrap_or_default())
                        .with_timeout(self.source.timeout_seconds),
                ))
            }
            _ => {
                let paths = validation::validate_required_field("source.paths", &self.source.paths)?;
                Ok(ConfiguredSource::File(FileCatalogSource::new(
                    paths.iter().map(PathBuf::from).collect(),
                )))
            }
        }
    }

    /// 取得 JSON 日誌設定
    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn template_dir(&self) -> Option<&str> {
        self.export.template_dir.as_deref()
    }

    fn institutions(&self) -> &[String] {
        &self.extract.institutions
    }

    fn departments(&self) -> &[String] {
        &self.extract.departments
    }

    fn requisite_mode(&self) -> RequisiteMode {
        self.extract.requisite_mode
    }

    fn number_rule(&self) -> NumberRule {
        self.extract.number_rule
    }

    fn deduplicate_edges(&self) -> bool {
        self.graph.deduplicate_edges.unwrap_or(true)
    }

    fn max_iterations(&self) -> usize {
        self.layout.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS)
    }

    fn phantom_semesters(&self) -> u32 {
        self.export.phantom_semesters.unwrap_or(DEFAULT_PHANTOM_SEMESTERS)
    }

    fn write_tsv(&self) -> bool {
        self.export.write_tsv.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::CatalogSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[pipeline]
name = "five-college"
description = "Prerequisite networks"
version = "1.0.0"

[source]
type = "file"
paths = ["catalog-2016S.json", "catalog-2015F.json"]

[extract]
requisite_mode = "every_sentence"
number_rule = "three_digit"
institutions = ["A", "U"]

[graph]
deduplicate_edges = false

[export]
output_path = "./viz"
template_dir = "./NetworkTemplateWithoutData_JSON"
write_tsv = true
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.pipeline.name, "five-college");
        assert_eq!(config.requisite_mode(), RequisiteMode::EverySentence);
        assert_eq!(config.number_rule(), NumberRule::ThreeDigit);
        assert_eq!(config.institutions(), &["A".to_string(), "U".to_string()]);
        assert!(config.departments().is_empty());
        assert!(!config.deduplicate_edges());
        assert_eq!(config.max_iterations(), 1000);
        assert_eq!(config.phantom_semesters(), 4);
        assert!(config.write_tsv());
        assert_eq!(config.template_dir(), Some("./NetworkTemplateWithoutData_JSON"));
        assert!(config.validate().is_ok());
        assert!(matches!(config.catalog_source().unwrap(), ConfiguredSource::File(_)));
    }

    #[test]
    fn test_defaults_for_missing_sections() {
        let toml_content = r#"
[pipeline]
name = "minimal"
description = "minimal"
version = "1.0"

[source]
type = "file"
paths = ["catalog.json"]

[export]
output_path = "./out"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.requisite_mode(), RequisiteMode::Substring);
        assert_eq!(config.number_rule(), NumberRule::Numeric);
        assert!(config.deduplicate_edges());
        assert!(!config.write_tsv());
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PREREQ_TEST_CATALOG_URL", "https://catalog.example.edu/dump.json");

        let toml_content = r#"
[pipeline]
name = "test"
description = "test"
version = "1.0"

[source]
type = "http"
endpoint = "${PREREQ_TEST_CATALOG_URL}"

[export]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.source.endpoint.as_deref(),
            Some("https://catalog.example.edu/dump.json")
        );
        let source = config.catalog_source().unwrap();
        assert_eq!(source.describe(), "http: https://catalog.example.edu/dump.json");

        std::env::remove_var("PREREQ_TEST_CATALOG_URL");
    }

    #[test]
    fn test_config_validation() {
        let invalid_url = r#"
[pipeline]
name = "test"
description = "test"
version = "1.0"

[source]
type = "http"
endpoint = "invalid-url"

[export]
output_path = "./output"
"#;
        let config = TomlConfig::from_toml_str(invalid_url).unwrap();
        assert!(config.validate().is_err());

        let missing_paths = invalid_url
            .replace("type = \"http\"", "type = \"file\"")
            .replace("endpoint = \"invalid-url\"", "");
        let config = TomlConfig::from_toml_str(&missing_paths).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PrereqError::MissingConfigError { .. })
        ));

        let bad_filter = BASIC.replace(
            "institutions = [\"A\", \"U\"]",
            "institutions = [\"A\", \"U\"]\ndepartments = [\"ECON-101\"]",
        );
        let config = TomlConfig::from_toml_str(&bad_filter).unwrap();
        assert!(config.validate().is_err());

        let tsv_source = BASIC.replace("catalog-2016S.json", "courseAttrs.tsv");
        let config = TomlConfig::from_toml_str(&tsv_source).unwrap();
        assert!(config.validate().is_err());

        let zero_iterations = format!("{}\n[layout]\nmax_iterations = 0\n", BASIC);
        let config = TomlConfig::from_toml_str(&zero_iterations).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_source_type_is_rejected() {
        let content = BASIC.replace("type = \"file\"", "type = \"ftp\"");
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PrereqError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_known_numbers_rule_is_selectable() {
        let content = BASIC.replace("three_digit", "known_numbers");
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.number_rule(), NumberRule::KnownNumbers);
        assert_eq!(config.requisite_mode(), RequisiteMode::EverySentence);
    }

    #[test]
    fn test_invalid_requisite_mode_fails_to_parse() {
        let content = BASIC.replace("every_sentence", "sometimes");
        assert!(TomlConfig::from_toml_str(&content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "five-college");
    }
}
