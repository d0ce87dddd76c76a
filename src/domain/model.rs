use crate::utils::error::{PrereqError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// 課程代碼中科系與編號之間的分隔符
pub const CODE_SEPARATOR: char = '-';

/// 結構化課程代碼 (DEPT-NUM)，節點身分以完整字串比對
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseCode {
    department: String,
    number: String,
}

impl CourseCode {
    pub fn new(department: &str, number: &str) -> Self {
        Self {
            department: department.to_string(),
            number: number.to_string(),
        }
    }

    /// 解析 "ECON-101" 形式的代碼，缺少分隔符或任一半為空時回傳錯誤
    pub fn parse(code: &str) -> Result<Self> {
        let (department, number) =
            code.split_once(CODE_SEPARATOR)
                .ok_or_else(|| PrereqError::CourseCodeError {
                    code: code.to_string(),
                    reason: format!("missing '{}' separator", CODE_SEPARATOR),
                })?;

        if department.trim().is_empty() || number.trim().is_empty() {
            return Err(PrereqError::CourseCodeError {
                code: code.to_string(),
                reason: "department and number must both be present".to_string(),
            });
        }

        Ok(Self::new(department, number))
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.department, CODE_SEPARATOR, self.number)
    }
}

impl FromStr for CourseCode {
    type Err = PrereqError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// 取出代碼的科系前綴；供圖層級操作使用，不要求編號存在
pub fn department_of(code: &str) -> &str {
    code.split(CODE_SEPARATOR).next().unwrap_or(code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Spring,
    Fall,
}

/// 開課學期，例如 "2016S"；同一年內春季早於秋季
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term {
    pub year: u16,
    pub season: Season,
}

impl Term {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let invalid = |reason: &str| PrereqError::ValidationError {
            message: format!("invalid term '{}': {}", raw, reason),
        };

        let season = match raw.chars().last() {
            Some('S') | Some('s') => Season::Spring,
            Some('F') | Some('f') => Season::Fall,
            _ => return Err(invalid("expected a trailing S or F")),
        };
        let year = raw[..raw.len() - 1]
            .parse::<u16>()
            .map_err(|_| invalid("expected a numeric year"))?;

        Ok(Self { year, season })
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let season = match self.season {
            Season::Spring => 'S',
            Season::Fall => 'F',
        };
        write!(f, "{}{}", self.year, season)
    }
}

impl Serialize for Term {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Term {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Term::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// 外部爬蟲提供的課程目錄資料，核心只讀取
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "date_checked")]
    pub retrieved_on: NaiveDate,
    #[serde(rename = "date", default, skip_serializing_if = "Option::is_none")]
    pub term: Option<Term>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<String>,
}

/// 單一學校的課程目錄：代碼 -> CourseRecord
///
/// 以 BTreeMap 保存，使節點順序在每次執行間穩定。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseCatalog {
    courses: BTreeMap<String, CourseRecord>,
}

impl CourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 檢查所有代碼後建立目錄
    pub fn from_records(records: BTreeMap<String, CourseRecord>) -> Result<Self> {
        let catalog = Self { courses: records };
        catalog.validate_codes()?;
        Ok(catalog)
    }

    pub fn insert(&mut self, code: CourseCode, record: CourseRecord) {
        self.courses.insert(code.to_string(), record);
    }

    pub fn get(&self, code: &str) -> Option<&CourseRecord> {
        self.courses.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.courses.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.courses.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CourseRecord)> {
        self.courses.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 每個鍵都必須是合法的 DEPT-NUM 代碼
    pub fn validate_codes(&self) -> Result<()> {
        for code in self.courses.keys() {
            CourseCode::parse(code)?;
        }
        Ok(())
    }

    /// 由目錄鍵推導出所有科系代碼 (大寫)
    pub fn departments(&self) -> BTreeSet<String> {
        self.courses
            .keys()
            .map(|code| department_of(code).to_uppercase())
            .collect()
    }

    /// 目錄中出現過的課程編號 (大寫)，只收以數字開頭者
    pub fn course_numbers(&self) -> BTreeSet<String> {
        self.courses
            .keys()
            .filter_map(|code| code.split_once(CODE_SEPARATOR).map(|(_, number)| number))
            .filter(|number| number.starts_with(|c: char| c.is_ascii_digit()))
            .map(str::to_uppercase)
            .collect()
    }

    /// 合併另一個學期的快照，同一代碼保留學期較新的紀錄
    pub fn merge(&mut self, snapshot: CourseCatalog) {
        for (code, incoming) in snapshot.courses {
            match self.courses.get(&code) {
                Some(existing) if !is_more_recent(&incoming, existing) => {}
                _ => {
                    self.courses.insert(code, incoming);
                }
            }
        }
    }
}

fn is_more_recent(incoming: &CourseRecord, existing: &CourseRecord) -> bool {
    match (incoming.term, existing.term) {
        (Some(new), Some(old)) => new > old,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// 多所學校的目錄輸入：學校代碼 -> CourseCatalog
pub type InstitutionCatalogs = BTreeMap<String, CourseCatalog>;

/// 先修邊：(被要求的課程, 提出要求的課程)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
    pub required: String,
    pub requiring: String,
}

impl PrerequisiteEdge {
    pub fn new(required: impl Into<String>, requiring: impl Into<String>) -> Self {
        Self {
            required: required.into(),
            requiring: requiring.into(),
        }
    }
}

/// 每門課程抽出的先修文字與代碼
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedRequisites {
    pub lines: HashMap<String, String>,
    pub prerequisites: BTreeMap<String, Vec<String>>,
}

impl ExtractedRequisites {
    pub fn requisite_line(&self, code: &str) -> &str {
        self.lines.get(code).map(|s| s.as_str()).unwrap_or("")
    }
}

/// 判斷句子是否為先修句的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequisiteMode {
    /// 句中含 "requisite" 或 "consent of professor/instructor"
    #[default]
    Substring,
    /// 每一句都視為候選，舊版腳本的行為
    EverySentence,
}

/// 哪些詞元算是課程編號
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberRule {
    #[default]
    Numeric,
    ThreeDigit,
    /// 只接受同校目錄中實際存在的課程編號
    KnownNumbers,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPosition {
    pub x: f64,
    pub y: f64,
}

/// 單一學校經過轉換後的結果
#[derive(Debug, Clone)]
pub struct InstitutionResult {
    pub institution: String,
    pub catalog: CourseCatalog,
    pub requisites: ExtractedRequisites,
    pub edges: Vec<PrerequisiteEdge>,
    pub phantom_count: usize,
    pub unmatched: Vec<(String, String)>,
    pub documents: Vec<(String, crate::domain::document::VisualizationDocument)>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub institutions: Vec<InstitutionResult>,
}

impl TransformResult {
    pub fn document_count(&self) -> usize {
        self.institutions.iter().map(|i| i.documents.len()).sum()
    }
}
