use crate::core::requisite::RequisiteExtractor;
use crate::core::tokenizer::CourseCodeTokenizer;
use crate::domain::model::{
    department_of, CourseCatalog, CourseCode, ExtractedRequisites, NumberRule, PrerequisiteEdge,
};
use crate::utils::error::Result;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// 課程先修有向圖；節點只帶課程代碼，其餘資料在匯出時由目錄補上
#[derive(Debug, Clone, Default)]
pub struct CourseGraph {
    digraph: DiGraph<String, ()>,
    node_index: HashMap<String, NodeIndex>,
}

impl CourseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 節點已存在時不做任何事
    pub fn add_node(&mut self, code: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(code) {
            return idx;
        }
        let idx = self.digraph.add_node(code.to_string());
        self.node_index.insert(code.to_string(), idx);
        idx
    }

    /// 加入 required -> requiring 邊，缺少的端點會自動補上
    pub fn add_edge(&mut self, required: &str, requiring: &str) {
        let from = self.add_node(required);
        let to = self.add_node(requiring);
        self.digraph.add_edge(from, to, ());
    }

    pub fn node_count(&self) -> usize {
        self.digraph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.digraph.edge_count()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.node_index.contains_key(code)
    }

    /// 依插入順序列出節點
    pub fn nodes(&self) -> Vec<&str> {
        self.digraph
            .node_indices()
            .map(|idx| self.digraph[idx].as_str())
            .collect()
    }

    /// 依插入順序列出邊，以節點位置表示
    pub fn edge_indices(&self) -> Vec<(usize, usize)> {
        self.digraph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
            .collect()
    }

    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.digraph
            .edge_references()
            .map(|e| (self.digraph[e.source()].as_str(), self.digraph[e.target()].as_str()))
            .collect()
    }

    /// 與 `code` 距離不超過 `depth` 的節點 (不分方向，含自身)
    pub fn neighbors(&self, code: &str, depth: usize) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let Some(&start) = self.node_index.get(code) else {
            return found;
        };

        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);
        while let Some((idx, dist)) = queue.pop_front() {
            found.insert(self.digraph[idx].clone());
            if dist == depth {
                continue;
            }
            let adjacent = self
                .digraph
                .neighbors_directed(idx, Direction::Outgoing)
                .chain(self.digraph.neighbors_directed(idx, Direction::Incoming));
            for next in adjacent {
                if seen.insert(next) {
                    queue.push_back((next, dist + 1));
                }
            }
        }
        found
    }

    /// 由節點集合導出子圖；保留原本的節點與邊順序
    pub fn induced_subgraph(&self, keep: &BTreeSet<String>) -> CourseGraph {
        let mut sub = CourseGraph::new();
        for idx in self.digraph.node_indices() {
            let code = &self.digraph[idx];
            if keep.contains(code) {
                sub.add_node(code);
            }
        }
        for edge in self.digraph.edge_references() {
            let from = &self.digraph[edge.source()];
            let to = &self.digraph[edge.target()];
            if keep.contains(from) && keep.contains(to) {
                sub.add_edge(from, to);
            }
        }
        sub
    }
}

/// 對目錄中每門課抽出先修句並轉為課程代碼
pub fn extract_requisites(
    catalog: &CourseCatalog,
    extractor: &RequisiteExtractor,
    rule: NumberRule,
) -> Result<ExtractedRequisites> {
    let departments = catalog.departments();
    let numbers = catalog.course_numbers();
    let tokenizer = CourseCodeTokenizer::new(&departments, rule).with_known_numbers(&numbers);
    let mut extracted = ExtractedRequisites::default();

    for (code, record) in catalog.iter() {
        let course = CourseCode::parse(code)?;
        let line = extractor.extract(&record.description);
        if line.is_empty() {
            continue;
        }
        let prerequisites = tokenizer.tokenize(&line, course.department());
        tracing::debug!("{} -> {:?}", code, prerequisites);
        extracted.prerequisites.insert(code.to_string(), prerequisites);
        extracted.lines.insert(code.to_string(), line);
    }

    Ok(extracted)
}

/// 將每門課的先修清單攤平成邊；requiring 一定是目錄中的課程
pub fn flatten_edges(extracted: &ExtractedRequisites, deduplicate: bool) -> Vec<PrerequisiteEdge> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for (requiring, required_codes) in &extracted.prerequisites {
        for required in required_codes {
            let edge = PrerequisiteEdge::new(required.as_str(), requiring.as_str());
            if deduplicate && !seen.insert(edge.clone()) {
                continue;
            }
            edges.push(edge);
        }
    }
    edges
}

/// 建立完整課程圖：目錄中的課程在前，只被引用的幽靈節點依出現順序接在後面
pub fn build_course_graph(catalog: &CourseCatalog, edges: &[PrerequisiteEdge]) -> CourseGraph {
    let mut graph = CourseGraph::new();
    for code in catalog.codes() {
        graph.add_node(code);
    }
    for edge in edges {
        graph.add_edge(&edge.required, &edge.requiring);
    }
    graph
}

/// 有先修句卻沒有任何邊的課程，用於人工檢查斷詞漏抓
pub fn find_unmatched_requisites(
    catalog: &CourseCatalog,
    extracted: &ExtractedRequisites,
    edges: &[PrerequisiteEdge],
) -> Vec<(String, String)> {
    let endpoints: HashSet<&str> = edges
        .iter()
        .flat_map(|e| [e.required.as_str(), e.requiring.as_str()])
        .collect();

    catalog
        .codes()
        .filter(|code| !endpoints.contains(code))
        .filter_map(|code| {
            let line = extracted.requisite_line(code);
            (!line.is_empty()).then(|| (code.to_string(), line.to_string()))
        })
        .collect()
}

/// 某科系的課程加上其一階鄰居所導出的子圖
pub fn department_subgraph(department: &str, graph: &CourseGraph) -> CourseGraph {
    let mut keep = BTreeSet::new();
    for code in graph.nodes() {
        if department_of(code).eq_ignore_ascii_case(department) {
            keep.extend(graph.neighbors(code, 1));
        }
    }
    graph.induced_subgraph(&keep)
}
