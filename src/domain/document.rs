use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 網路視覺化前端 (sigma.js 模板) 讀取的 data.json 結構
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationDocument {
    pub edges: Vec<EdgeRecord>,
    pub nodes: Vec<NodeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub id: String,
    pub attributes: NodeAttributes,
    pub color: String,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Department Code")]
    pub department_code: String,
    #[serde(rename = "Course Site")]
    pub course_site: String,
    #[serde(rename = "Requisite")]
    pub requisite: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub label: String,
    pub source: String,
    pub target: String,
    pub id: String,
    pub attributes: serde_json::Map<String, serde_json::Value>,
    pub color: String,
    pub size: f64,
}

impl VisualizationDocument {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// 透過節點 id 找回每條邊兩端的課程代碼 (label)；找不到的 id 原樣保留
    pub fn edge_endpoints(&self) -> Vec<(String, String)> {
        let labels: HashMap<&str, &str> = self
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.label.as_str()))
            .collect();
        let resolve = |id: &str| labels.get(id).copied().unwrap_or(id).to_string();

        self.edges
            .iter()
            .map(|e| (resolve(&e.source), resolve(&e.target)))
            .collect()
    }
}
