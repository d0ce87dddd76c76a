use chrono::NaiveDate;
use prereq_graph::adapters::colors::SequenceColors;
use prereq_graph::core::export::{build_document, DepartmentPalette, ExportContext};
use prereq_graph::core::graph::{
    build_course_graph, department_subgraph, extract_requisites, flatten_edges,
};
use prereq_graph::core::layout::layered_layout;
use prereq_graph::core::requisite::RequisiteExtractor;
use prereq_graph::core::tokenizer::CourseCodeTokenizer;
use prereq_graph::domain::model::{NumberRule, RequisiteMode};
use prereq_graph::{CourseCatalog, CourseCode, CourseRecord};
use std::collections::BTreeSet;

fn record(description: &str) -> CourseRecord {
    CourseRecord {
        title: "Course".to_string(),
        url: "https://catalog.example.edu/course".to_string(),
        description: description.to_string(),
        retrieved_on: NaiveDate::from_ymd_opt(2016, 2, 26).unwrap(),
        term: None,
        times: None,
    }
}

fn catalog(entries: &[(&str, &str)]) -> CourseCatalog {
    let mut catalog = CourseCatalog::new();
    for (code, description) in entries {
        catalog.insert(CourseCode::parse(code).unwrap(), record(description));
    }
    catalog
}

fn departments(codes: &[&str]) -> BTreeSet<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

#[test]
fn test_tokenizer_keeps_own_department_cursor() {
    let departments = departments(&["ECON", "MATH"]);
    let tokenizer = CourseCodeTokenizer::new(&departments, NumberRule::Numeric);

    let codes = tokenizer.tokenize("Requisite: ECON 101 or 201, or consent of instructor.", "ECON");

    assert_eq!(codes, vec!["ECON-101", "ECON-201"]);
}

#[test]
fn test_tokenizer_switches_cursor_between_departments() {
    let departments = departments(&["ECON", "MATH"]);
    let tokenizer = CourseCodeTokenizer::new(&departments, NumberRule::Numeric);

    let codes = tokenizer.tokenize("Requisite: MATH 211 and ECON 301.", "ECON");

    assert_eq!(codes, vec!["MATH-211", "ECON-301"]);
}

#[test]
fn test_requisite_modes_differ_on_plain_sentences() {
    let description = "An overview of markets. Requisite: ECON 111.";

    let substring = RequisiteExtractor::new(RequisiteMode::Substring).extract(description);
    let every = RequisiteExtractor::new(RequisiteMode::EverySentence).extract(description);

    assert_eq!(substring, "Requisite: ECON 111");
    assert_eq!(every, "An overview of markets Requisite: ECON 111");
}

#[test]
fn test_phantom_prerequisite_is_exported_without_course_site() {
    let catalog = catalog(&[("ECON-301", "Requisite: ECON 999.")]);
    let extractor = RequisiteExtractor::default();
    let requisites = extract_requisites(&catalog, &extractor, NumberRule::Numeric).unwrap();
    let edges = flatten_edges(&requisites, true);
    let graph = build_course_graph(&catalog, &edges);

    assert!(graph.contains("ECON-999"));
    assert!(catalog.get("ECON-999").is_none());

    let subgraph = department_subgraph("ECON", &graph);
    let positions = layered_layout(&subgraph, 1000);
    let context = ExportContext {
        catalog: &catalog,
        requisites: &requisites,
        phantom_semesters: 4,
    };
    let mut palette = DepartmentPalette::new();
    let mut colors = SequenceColors::new(vec![42]);
    let document = build_document(&subgraph, &positions, &mut palette, &mut colors, &context).unwrap();

    let phantom = document.nodes.iter().find(|n| n.label == "ECON-999").unwrap();
    assert_eq!(phantom.attributes.course_site, "");
    assert_eq!(phantom.attributes.description, "not offered in the last 4 semesters");
    assert_eq!(phantom.color, "rgb(42, 42, 42)");

    // prerequisite sits one layer above the course that requires it
    let requiring = document.nodes.iter().find(|n| n.label == "ECON-301").unwrap();
    assert_eq!(phantom.y + 1.0, requiring.y);
}

#[test]
fn test_edge_ids_for_three_node_subgraph() {
    let catalog = catalog(&[
        ("ECON-111", ""),
        ("ECON-211", "Requisite: ECON 111."),
        ("ECON-311", "Requisite: ECON 211."),
    ]);
    let requisites =
        extract_requisites(&catalog, &RequisiteExtractor::default(), NumberRule::Numeric).unwrap();
    let graph = build_course_graph(&catalog, &flatten_edges(&requisites, true));
    let subgraph = department_subgraph("ECON", &graph);
    let positions = layered_layout(&subgraph, 1000);
    let context = ExportContext {
        catalog: &catalog,
        requisites: &requisites,
        phantom_semesters: 4,
    };

    let document = build_document(
        &subgraph,
        &positions,
        &mut DepartmentPalette::new(),
        &mut SequenceColors::new(vec![1, 2, 3]),
        &context,
    )
    .unwrap();

    let ids: Vec<&str> = document.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "4"]);
}

#[test]
fn test_cross_department_neighbors_are_one_hop_only() {
    let catalog = catalog(&[
        ("MATH-111", ""),
        ("MATH-211", "Requisite: MATH 111."),
        ("ECON-301", "Requisite: MATH 211."),
        ("HIST-101", ""),
    ]);
    let requisites =
        extract_requisites(&catalog, &RequisiteExtractor::default(), NumberRule::Numeric).unwrap();
    let graph = build_course_graph(&catalog, &flatten_edges(&requisites, true));

    let econ = department_subgraph("econ", &graph);
    let nodes: BTreeSet<&str> = econ.nodes().into_iter().collect();
    assert_eq!(nodes, ["ECON-301", "MATH-211"].into_iter().collect());

    let hist = department_subgraph("HIST", &graph);
    assert_eq!(hist.nodes(), vec!["HIST-101"]);
    assert_eq!(hist.edge_count(), 0);
}

#[test]
fn test_subgraph_and_layout_are_repeatable() {
    let catalog = catalog(&[
        ("CS-101", ""),
        ("CS-201", "Requisite: CS 101."),
        ("CS-202", "Requisite: CS 101."),
        ("CS-301", "Requisite: CS 201 and 202."),
        ("CS-302", "Requisite: CS 301 or 101."),
    ]);
    let requisites =
        extract_requisites(&catalog, &RequisiteExtractor::default(), NumberRule::Numeric).unwrap();
    let graph = build_course_graph(&catalog, &flatten_edges(&requisites, true));

    let first = department_subgraph("CS", &graph);
    let second = department_subgraph("CS", &graph);
    assert_eq!(first.nodes(), second.nodes());
    assert_eq!(first.edges(), second.edges());
    assert_eq!(layered_layout(&first, 1000), layered_layout(&second, 1000));
}

#[test]
fn test_duplicate_mentions_collapse_when_deduplicating() {
    let catalog = catalog(&[
        ("ECON-101", ""),
        ("ECON-201", "Requisite: ECON 101 or ECON 101."),
    ]);
    let requisites =
        extract_requisites(&catalog, &RequisiteExtractor::default(), NumberRule::Numeric).unwrap();

    assert_eq!(flatten_edges(&requisites, true).len(), 1);
    assert_eq!(flatten_edges(&requisites, false).len(), 2);
}
