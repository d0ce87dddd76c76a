use crate::core::graph::CourseGraph;
use crate::domain::document::{EdgeRecord, NodeAttributes, NodeRecord, VisualizationDocument};
use crate::domain::model::{
    department_of, CourseCatalog, CourseRecord, ExtractedRequisites, LayoutPosition,
    PrerequisiteEdge,
};
use crate::domain::ports::ColorSource;
use crate::utils::error::{PrereqError, Result};
use std::collections::HashMap;

pub const NODE_SIZE: f64 = 10.0;
pub const EDGE_SIZE: f64 = 1.0;
pub const DEFAULT_PHANTOM_SEMESTERS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

/// 每個科系一個隨機顏色，同一次執行內保持不變
#[derive(Debug, Clone, Default)]
pub struct DepartmentPalette {
    colors: HashMap<String, Rgb>,
}

impl DepartmentPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, department: &str, source: &mut dyn ColorSource) -> Rgb {
        *self
            .colors
            .entry(department.to_uppercase())
            .or_insert_with(|| Rgb(source.next_channel(), source.next_channel(), source.next_channel()))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// 匯出時需要的課程資料
pub struct ExportContext<'a> {
    pub catalog: &'a CourseCatalog,
    pub requisites: &'a ExtractedRequisites,
    pub phantom_semesters: u32,
}

fn course_site_anchor(url: &str) -> String {
    format!("<a href= '{}'> Course Site </a>", url)
}

/// 組出前端模板讀取的節點與邊；邊 id = (節點數 - 1) + 2 * 邊序號
pub fn build_document(
    subgraph: &CourseGraph,
    positions: &[LayoutPosition],
    palette: &mut DepartmentPalette,
    colors: &mut dyn ColorSource,
    context: &ExportContext<'_>,
) -> Result<VisualizationDocument> {
    let codes = subgraph.nodes();
    if positions.len() != codes.len() {
        return Err(PrereqError::ProcessingError {
            message: format!(
                "layout produced {} positions for {} nodes",
                positions.len(),
                codes.len()
            ),
        });
    }

    let mut document = VisualizationDocument::default();

    for (idx, (code, position)) in codes.iter().zip(positions).enumerate() {
        let department = department_of(code);
        let color = palette.color_for(department, colors);

        let attributes = match context.catalog.get(code) {
            Some(record) => NodeAttributes {
                title: record.title.clone(),
                description: record.description.clone(),
                department_code: department.to_string(),
                course_site: course_site_anchor(&record.url),
                requisite: context.requisites.requisite_line(code).to_string(),
            },
            // 幽靈節點：被引用但最近沒有開課
            None => NodeAttributes {
                title: code.to_string(),
                description: format!(
                    "not offered in the last {} semesters",
                    context.phantom_semesters
                ),
                department_code: department.to_string(),
                course_site: String::new(),
                requisite: String::new(),
            },
        };

        document.nodes.push(NodeRecord {
            label: code.to_string(),
            x: position.x,
            y: position.y,
            id: idx.to_string(),
            attributes,
            color: color.css(),
            size: NODE_SIZE,
        });
    }

    let node_count = codes.len();
    for (edge_idx, (source, target)) in subgraph.edge_indices().into_iter().enumerate() {
        let color = palette.color_for(department_of(codes[target]), colors);
        document.edges.push(EdgeRecord {
            label: String::new(),
            source: source.to_string(),
            target: target.to_string(),
            id: (node_count - 1 + 2 * edge_idx).to_string(),
            attributes: serde_json::Map::new(),
            color: color.css(),
            size: EDGE_SIZE,
        });
    }

    Ok(document)
}

/// courseAttrs.tsv：每門已知課程一列
pub fn course_attrs_tsv(catalog: &CourseCatalog, requisites: &ExtractedRequisites) -> Result<Vec<u8>> {
    write_attrs(catalog.iter(), requisites)
}

/// `<DEPT>courseAttrs.tsv`：只含該科系自己的課程
pub fn department_attrs_tsv(
    department: &str,
    catalog: &CourseCatalog,
    requisites: &ExtractedRequisites,
) -> Result<Vec<u8>> {
    let rows = catalog
        .iter()
        .filter(|(code, _)| department_of(code).eq_ignore_ascii_case(department));
    write_attrs(rows, requisites)
}

/// courseEdgelist.tsv：Source 為被要求的課程，Target 為提出要求的課程
pub fn edgelist_tsv(edges: &[PrerequisiteEdge]) -> Result<Vec<u8>> {
    write_edges(edges.iter())
}

/// `<DEPT>courseEdgelist.tsv`：兩端都屬於該科系的邊
pub fn department_edgelist_tsv(department: &str, edges: &[PrerequisiteEdge]) -> Result<Vec<u8>> {
    let in_department = |code: &str| department_of(code).eq_ignore_ascii_case(department);
    write_edges(
        edges
            .iter()
            .filter(|e| in_department(&e.required) && in_department(&e.requiring)),
    )
}

fn tsv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(Vec::new())
}

fn write_attrs<'a>(
    rows: impl Iterator<Item = (&'a str, &'a CourseRecord)>,
    requisites: &ExtractedRequisites,
) -> Result<Vec<u8>> {
    let mut writer = tsv_writer();
    writer.write_record(["Id", "title", "url", "date", "date_checked", "requisite"])?;

    for (code, record) in rows {
        let term = record.term.map(|t| t.to_string()).unwrap_or_default();
        let checked = record.retrieved_on.to_string();
        writer.write_record([
            code,
            record.title.as_str(),
            record.url.as_str(),
            term.as_str(),
            checked.as_str(),
            requisites.requisite_line(code),
        ])?;
    }

    into_bytes(writer)
}

fn write_edges<'a>(edges: impl Iterator<Item = &'a PrerequisiteEdge>) -> Result<Vec<u8>> {
    let mut writer = tsv_writer();
    writer.write_record(["Source", "Target"])?;
    for edge in edges {
        writer.write_record([edge.required.as_str(), edge.requiring.as_str()])?;
    }
    into_bytes(writer)
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| PrereqError::ProcessingError {
        message: format!("failed to flush TSV output: {}", e),
    })
}
