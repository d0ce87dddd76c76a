//! Sugiyama 分層版面配置。
//!
//! 步驟：
//!   1. 去環 (greedy-FAS，只影響分層，不改動原圖的邊)
//!   2. 最長路徑分層，y = 層數
//!   3. 跨層邊插入虛擬節點
//!   4. 重心法上下掃描減少交叉，受 `max_iterations` 限制
//!   5. 依層內順序指定 x，每層以 0 為中心
//!
//! 全程不使用亂數，相同輸入必得相同座標。

use crate::core::graph::CourseGraph;
use crate::domain::model::LayoutPosition;
use std::cmp::Ordering;
use std::collections::HashSet;

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// 版面配置用的精簡鄰接表，節點以 0..n 編號
#[derive(Debug, Clone)]
struct AdjGraph {
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl AdjGraph {
    fn with_nodes(n: usize) -> Self {
        Self {
            successors: vec![Vec::new(); n],
            predecessors: vec![Vec::new(); n],
        }
    }

    fn len(&self) -> usize {
        self.successors.len()
    }

    fn add_node(&mut self) -> usize {
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
        self.successors.len() - 1
    }

    fn add_edge(&mut self, src: usize, tgt: usize) {
        self.successors[src].push(tgt);
        self.predecessors[tgt].push(src);
    }

    fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.successors
            .iter()
            .enumerate()
            .flat_map(|(src, succ)| succ.iter().map(move |&tgt| (src, tgt)))
    }
}

// ─── 去環 ───────────────────────────────────────────────────────────────────

/// Eades greedy-FAS 排序：先剝匯點、再剝源點，剩下的取 (出度 - 入度) 最大者
fn greedy_fas_ordering(ag: &AdjGraph) -> Vec<usize> {
    let n = ag.len();
    let mut active = vec![true; n];
    let mut remaining = n;
    let mut out_deg: Vec<i64> = ag.successors.iter().map(|s| s.len() as i64).collect();
    let mut in_deg: Vec<i64> = ag.predecessors.iter().map(|p| p.len() as i64).collect();

    let mut head: Vec<usize> = Vec::new();
    let mut tail: Vec<usize> = Vec::new();

    let remove = |node: usize, active: &mut [bool], out_deg: &mut [i64], in_deg: &mut [i64]| {
        active[node] = false;
        for &succ in &ag.successors[node] {
            if active[succ] {
                in_deg[succ] -= 1;
            }
        }
        for &pred in &ag.predecessors[node] {
            if active[pred] {
                out_deg[pred] -= 1;
            }
        }
    };

    while remaining > 0 {
        let mut changed = true;
        while changed {
            changed = false;
            for node in 0..n {
                if active[node] && out_deg[node] == 0 {
                    remove(node, &mut active, &mut out_deg, &mut in_deg);
                    tail.push(node);
                    remaining -= 1;
                    changed = true;
                }
            }
            for node in 0..n {
                if active[node] && in_deg[node] == 0 {
                    remove(node, &mut active, &mut out_deg, &mut in_deg);
                    head.push(node);
                    remaining -= 1;
                    changed = true;
                }
            }
        }

        if remaining > 0 {
            let best = (0..n)
                .filter(|&node| active[node])
                .max_by(|&a, &b| {
                    (out_deg[a] - in_deg[a])
                        .cmp(&(out_deg[b] - in_deg[b]))
                        .then(b.cmp(&a))
                });
            if let Some(best) = best {
                remove(best, &mut active, &mut out_deg, &mut in_deg);
                head.push(best);
                remaining -= 1;
            }
        }
    }

    tail.reverse();
    head.extend(tail);
    head
}

/// 回傳無環版本：與排序方向相反的邊被反轉，自迴圈與重複邊略過
fn remove_cycles(ag: &AdjGraph) -> AdjGraph {
    let ordering = greedy_fas_ordering(ag);
    let mut position = vec![0usize; ag.len()];
    for (pos, &node) in ordering.iter().enumerate() {
        position[node] = pos;
    }

    let mut seen = HashSet::new();
    let mut dag = AdjGraph::with_nodes(ag.len());
    for (src, tgt) in ag.edges() {
        if src == tgt {
            continue;
        }
        let (from, to) = if position[src] > position[tgt] {
            (tgt, src)
        } else {
            (src, tgt)
        };
        if seen.insert((from, to)) {
            dag.add_edge(from, to);
        }
    }
    dag
}

// ─── 分層 ───────────────────────────────────────────────────────────────────

/// 最長路徑分層 (Kahn 拓撲順序)
fn assign_layers(dag: &AdjGraph) -> Vec<usize> {
    let n = dag.len();
    let mut layers = vec![0usize; n];
    let mut in_deg: Vec<usize> = dag.predecessors.iter().map(|p| p.len()).collect();
    let mut queue: Vec<usize> = (0..n).filter(|&v| in_deg[v] == 0).collect();
    let mut cursor = 0;

    while cursor < queue.len() {
        let node = queue[cursor];
        cursor += 1;
        for &succ in &dag.successors[node] {
            layers[succ] = layers[succ].max(layers[node] + 1);
            in_deg[succ] -= 1;
            if in_deg[succ] == 0 {
                queue.push(succ);
            }
        }
    }

    layers
}

// ─── 虛擬節點 ─────────────────────────────────────────────────────────────────

/// 將跨越多層的邊拆成逐層相連的虛擬節點鏈
fn insert_dummy_nodes(dag: &AdjGraph, layers: &[usize]) -> (AdjGraph, Vec<usize>) {
    let mut augmented = AdjGraph::with_nodes(dag.len());
    let mut all_layers = layers.to_vec();

    for (src, tgt) in dag.edges() {
        let span = layers[tgt].saturating_sub(layers[src]);
        if span <= 1 {
            augmented.add_edge(src, tgt);
            continue;
        }

        let mut prev = src;
        for step in 1..span {
            let dummy = augmented.add_node();
            all_layers.push(layers[src] + step);
            augmented.add_edge(prev, dummy);
            prev = dummy;
        }
        augmented.add_edge(prev, tgt);
    }

    (augmented, all_layers)
}

// ─── 減少交叉 ─────────────────────────────────────────────────────────────────

fn barycenter(neighbors: &[usize], position: &[usize], fallback: usize) -> f64 {
    if neighbors.is_empty() {
        return fallback as f64;
    }
    neighbors.iter().map(|&n| position[n] as f64).sum::<f64>() / neighbors.len() as f64
}

fn count_crossings(ordering: &[Vec<usize>], ag: &AdjGraph, position: &[usize]) -> usize {
    let mut total = 0usize;
    for layer in ordering.iter().take(ordering.len().saturating_sub(1)) {
        let mut segments: Vec<(usize, usize)> = Vec::new();
        for &src in layer {
            for &tgt in &ag.successors[src] {
                segments.push((position[src], position[tgt]));
            }
        }
        for i in 0..segments.len() {
            for j in (i + 1)..segments.len() {
                let (a0, a1) = segments[i];
                let (b0, b1) = segments[j];
                if (a0 < b0 && a1 > b1) || (a0 > b0 && a1 < b1) {
                    total += 1;
                }
            }
        }
    }
    total
}

fn positions_of(ordering: &[Vec<usize>], n: usize) -> Vec<usize> {
    let mut position = vec![0usize; n];
    for layer in ordering {
        for (pos, &node) in layer.iter().enumerate() {
            position[node] = pos;
        }
    }
    position
}

fn sort_layer(layer: &mut [usize], neighbors: &[Vec<usize>], position: &[usize]) {
    let mut keyed: Vec<(f64, usize)> = layer
        .iter()
        .map(|&node| (barycenter(&neighbors[node], position, position[node]), node))
        .collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    for (slot, (_, node)) in layer.iter_mut().zip(keyed) {
        *slot = node;
    }
}

/// 重心法上下掃描，保留交叉數最少的排列；沒有改善或用完次數即停止
fn minimise_crossings(ag: &AdjGraph, layers: &[usize], max_iterations: usize) -> Vec<Vec<usize>> {
    let layer_count = layers.iter().copied().max().map_or(0, |m| m + 1);
    let mut ordering: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
    for (node, &layer) in layers.iter().enumerate() {
        ordering[layer].push(node);
    }

    let mut position = positions_of(&ordering, ag.len());
    let mut best = ordering.clone();
    let mut best_crossings = count_crossings(&ordering, ag, &position);

    for _ in 0..max_iterations {
        if best_crossings == 0 {
            break;
        }
        for layer in 1..layer_count {
            sort_layer(&mut ordering[layer], &ag.predecessors, &position);
            position = positions_of(&ordering, ag.len());
        }
        for layer in (0..layer_count.saturating_sub(1)).rev() {
            sort_layer(&mut ordering[layer], &ag.successors, &position);
            position = positions_of(&ordering, ag.len());
        }

        let crossings = count_crossings(&ordering, ag, &position);
        if crossings >= best_crossings {
            break;
        }
        best_crossings = crossings;
        best = ordering.clone();
    }

    best
}

// ─── 座標 ───────────────────────────────────────────────────────────────────

/// 對子圖做分層配置；輸出長度等於節點數，順序與節點順序一致
pub fn layered_layout(graph: &CourseGraph, max_iterations: usize) -> Vec<LayoutPosition> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let mut ag = AdjGraph::with_nodes(n);
    for (src, tgt) in graph.edge_indices() {
        ag.add_edge(src, tgt);
    }

    let dag = remove_cycles(&ag);
    let layers = assign_layers(&dag);
    let (augmented, all_layers) = insert_dummy_nodes(&dag, &layers);
    let ordering = minimise_crossings(&augmented, &all_layers, max_iterations);

    let mut positions = vec![LayoutPosition { x: 0.0, y: 0.0 }; n];
    for (layer, nodes) in ordering.iter().enumerate() {
        let centre = (nodes.len() as f64 - 1.0) / 2.0;
        for (slot, &node) in nodes.iter().enumerate() {
            if node < n {
                positions[node] = LayoutPosition {
                    x: slot as f64 - centre,
                    y: layer as f64,
                };
            }
        }
    }

    tracing::debug!(
        "Layout: {} nodes, {} layers, {} dummy nodes",
        n,
        ordering.len(),
        augmented.len() - n
    );

    positions
}
