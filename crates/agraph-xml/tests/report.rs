use agraph_core::{
    Analyzer, ArtifactArena, CodeRankAnalyzer, GraphNode, GraphNodes, NodeKind,
};
use agraph_error::ErrorKind;
use agraph_xml::DependenciesReport;
use pretty_assertions::assert_eq;
use textwrap::dedent;

fn expected(xml: &str) -> String {
    dedent(xml).trim_start().to_string()
}

fn graph(nodes: Vec<GraphNode>) -> GraphNodes {
    GraphNodes::from(nodes)
}

fn node(id: &str, incoming: &[&str], outgoing: &[&str]) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        incoming: incoming.iter().map(|s| s.to_string()).collect(),
        outgoing: outgoing.iter().map(|s| s.to_string()).collect(),
    }
}

struct NodeCount;

impl Analyzer for NodeCount {
    fn capability(&self) -> &str {
        "node-count"
    }
}

#[test]
fn renders_resolved_artifacts_with_namespaces() {
    let arena = ArtifactArena::new();
    let app = arena.namespace("ns:app", "app");
    let a = arena.declare(app, "c:A", "A", NodeKind::Class);
    let b = arena.declare(app, "c:B", "B", NodeKind::Class);
    b.add_dependency(a);

    let mut analyzer = CodeRankAnalyzer::new();
    analyzer.analyze([app]);

    let mut report = DependenciesReport::new();
    report.set_artifacts([app]);
    assert!(report.log(&analyzer));

    assert_eq!(
        report.render(),
        expected(
            r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <artifacts>
              <artifact name="app" type="namespace" namespace="">
                <in/>
                <out/>
              </artifact>
              <artifact name="A" type="class" namespace="app">
                <in>
                  <artifact name="B" type="class" namespace="app"/>
                </in>
                <out/>
              </artifact>
              <artifact name="B" type="class" namespace="app">
                <in/>
                <out>
                  <artifact name="A" type="class" namespace="app"/>
                </out>
              </artifact>
            </artifacts>
            "#
        )
    );
}

#[test]
fn repeated_neighbors_render_once_in_first_order() {
    let arena = ArtifactArena::new();
    let ns = arena.namespace("ns", "app");
    arena.declare(ns, "x", "X", NodeKind::Class);
    arena.declare(ns, "y", "Y", NodeKind::Interface);

    let mut report = DependenciesReport::new();
    report.set_artifacts([ns]);
    report.log(&graph(vec![node("x", &[], &["y", "y", "x", "y"])]));

    assert_eq!(
        report.render(),
        expected(
            r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <artifacts>
              <artifact name="X" type="class" namespace="app">
                <in/>
                <out>
                  <artifact name="Y" type="interface" namespace="app"/>
                  <artifact name="X" type="class" namespace="app"/>
                </out>
              </artifact>
            </artifacts>
            "#
        )
    );
}

#[test]
fn unresolved_ids_render_placeholders() {
    let mut report = DependenciesReport::new();
    report.log(&graph(vec![node("ghost", &["42"], &[])]));

    assert_eq!(
        report.render(),
        expected(
            r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <artifacts>
              <artifact name="unresolved_ghost" type="unknown" namespace="">
                <in>
                  <artifact name="unresolved_42" type="unknown" namespace=""/>
                </in>
                <out/>
              </artifact>
            </artifacts>
            "#
        )
    );
}

#[test]
fn unlisted_kinds_render_as_unknown_with_namespace() {
    let arena = ArtifactArena::new();
    let ns = arena.namespace("ns", "app");
    arena.declare(ns, "t", "Loggable", NodeKind::Trait);

    let mut report = DependenciesReport::new();
    report.set_artifacts([ns]);
    report.log(&graph(vec![node("t", &[], &[])]));

    assert!(
        report
            .render()
            .contains(r#"<artifact name="Loggable" type="unknown" namespace="app">"#)
    );
}

#[test]
fn attribute_values_are_escaped() {
    let arena = ArtifactArena::new();
    let ns = arena.namespace("ns", "a&b");
    arena.declare(ns, "c", "List<\"T\">", NodeKind::Class);

    let mut report = DependenciesReport::new();
    report.set_artifacts([ns]);
    report.log(&graph(vec![node("c", &[], &[])]));

    assert!(report.render().contains(
        r#"<artifact name="List&lt;&quot;T&quot;&gt;" type="class" namespace="a&amp;b">"#
    ));
}

#[test]
fn control_characters_in_unresolved_ids_stay_well_formed() {
    let mut report = DependenciesReport::new();
    report.log(&graph(vec![node("a\nb\u{1}", &[], &[])]));

    let document = report.render();
    assert!(document.contains("name=\"unresolved_a&#10;b\u{fffd}\""));
    assert!(!document.contains('\u{1}'));
}

#[test]
fn non_graph_analyzers_are_ignored() {
    let mut report = DependenciesReport::new();
    assert_eq!(report.accepted_analyzers(), ["graph-rank"]);
    assert!(!report.log(&NodeCount));
    assert!(report.log(&graph(vec![node("a", &[], &[])])));
    assert!(!report.log(&NodeCount));

    assert!(report.render().contains("unresolved_a"));
}

#[test]
fn no_analyzer_renders_empty_document() {
    let report = DependenciesReport::new();
    assert_eq!(
        report.render(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<artifacts/>\n"
    );
}

#[test]
fn close_writes_identical_documents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deps.xml");

    let arena = ArtifactArena::new();
    let ns = arena.namespace("ns", "app");
    let a = arena.declare(ns, "a", "A", NodeKind::Class);
    let b = arena.declare(ns, "b", "B", NodeKind::Interface);
    a.add_dependency(b);
    b.add_dependency(a);

    let mut analyzer = CodeRankAnalyzer::new();
    analyzer.analyze([ns]);

    let mut report = DependenciesReport::new();
    report.set_artifacts([ns]);
    report.log(&analyzer);
    report.set_log_file(&path);

    report.close().unwrap();
    let first = std::fs::read(&path).unwrap();
    report.close().unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(String::from_utf8(first).unwrap(), report.render());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn close_without_destination_writes_nothing() {
    let mut report = DependenciesReport::new();
    report.log(&graph(vec![node("a", &[], &[])]));

    let err = report.close().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(err.context_value("report"), Some(DependenciesReport::NAME));
}

#[test]
fn write_failure_leaves_no_files() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing").join("deps.xml");
    let mut report = DependenciesReport::new();
    report.set_log_file(&missing);
    let err = report.close().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
    assert!(err.context_value("path").is_some());
    assert!(!missing.exists());

    // Renaming a file over a directory fails after the temp file was written.
    let occupied = dir.path().join("deps.xml");
    std::fs::create_dir(&occupied).unwrap();
    report.set_log_file(&occupied);
    let err = report.close().unwrap_err();
    assert!(err.kind().is_io());
    assert!(occupied.is_dir());

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, ["deps.xml"]);
}

#[test]
fn close_leaves_unrelated_sibling_files_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deps.xml");
    let neighbor = dir.path().join("deps.xml.tmp");
    std::fs::write(&neighbor, "user data").unwrap();

    let mut report = DependenciesReport::new();
    report.log(&graph(vec![node("a", &[], &[])]));
    report.set_log_file(&path);
    report.close().unwrap();

    assert_eq!(std::fs::read_to_string(&neighbor).unwrap(), "user data");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), report.render());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn independent_reports_replace_the_destination_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deps.xml");

    let mut small = DependenciesReport::new();
    small.log(&graph(vec![node("a", &[], &[])]));
    small.set_log_file(&path);

    let mut large = DependenciesReport::new();
    large.log(&graph(
        (0..200).map(|i| node(&format!("n{i}"), &[], &["a"])).collect(),
    ));
    large.set_log_file(&path);

    large.close().unwrap();
    small.close().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), small.render());
    large.close().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), large.render());
}
