use std::path::Path;

use graphinate::config::LayoutConfig;
use graphinate::layout::{DiagramLayout, Layout, VennArrangement, compute_layout};
use graphinate::path::Jitter;
use graphinate::theme::resolve_theme;
use graphinate::{ChartSpec, RenderOptions, render_json};

fn fixture(rel: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("fixture {rel}: {err}"))
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""), "{fixture}: bad root");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg>");
    assert_eq!(svg.matches("<svg").count(), 1, "{fixture}: nested svg");
    assert_eq!(svg.matches("<style").count(), 1, "{fixture}: style blocks");
    assert_eq!(
        svg.matches("<text").count(),
        svg.matches("</text>").count(),
        "{fixture}: unbalanced text"
    );
}

fn layout_fixture(rel: &str) -> Layout {
    let spec = ChartSpec::from_json(&fixture(rel)).expect("fixture parses");
    let theme = resolve_theme(spec.theme.as_deref());
    compute_layout(&spec, &theme, &LayoutConfig::default(), &mut Jitter::seeded(1))
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new chart kinds must be added intentionally.
    let fixtures = [
        "venn_two.json",
        "venn_three.json",
        "venn_nested.json",
        "flowchart.json",
        "plot.json",
    ];
    let options = RenderOptions::default().with_seed(7);
    for rel in fixtures {
        let svg = render_json(&fixture(rel), &options).unwrap_or_else(|err| panic!("{rel}: {err}"));
        assert_valid_svg(&svg, rel);
    }
}

#[test]
fn two_set_venn_end_to_end() {
    let svg = render_json(&fixture("venn_two.json"), &RenderOptions::default()).unwrap();
    assert_eq!(svg.matches("<circle class=\"venn-circle").count(), 2);
    assert!(svg.contains(">Both</text>"));
    assert!(svg.contains(">Team skills</text>"));
    assert!(svg.contains(">Frontend</text>"));
}

#[test]
fn three_set_robotpony_venn_is_organic_and_reproducible() {
    let layout = layout_fixture("venn_three.json");
    let DiagramLayout::SetOverlap(venn) = &layout.diagram else {
        panic!("expected set overlap layout");
    };
    assert_eq!(venn.arrangement, VennArrangement::Organic);
    assert_eq!(venn.circles.len(), 3);
    assert_eq!(venn.intersections.len(), 2);
    assert!(venn.textured);

    let options = RenderOptions::default().with_seed(99);
    let input = fixture("venn_three.json");
    let a = render_json(&input, &options).unwrap();
    let b = render_json(&input, &options).unwrap();
    assert_eq!(a, b);
    assert!(a.contains("ROBOTPONY.CA"));
    assert!(a.contains("<polygon class=\"arrowhead\""));
}

#[test]
fn small_set_is_nested() {
    let layout = layout_fixture("venn_nested.json");
    let DiagramLayout::SetOverlap(venn) = &layout.diagram else {
        panic!("expected set overlap layout");
    };
    assert_eq!(venn.arrangement, VennArrangement::Nested);
    let (a, b) = (&venn.circles[0], &venn.circles[1]);
    let (outer, inner) = if a.r >= b.r { (a, b) } else { (b, a) };
    assert!(inner.r < outer.r);
    let distance = ((outer.cx - inner.cx).powi(2) + (outer.cy - inner.cy).powi(2)).sqrt();
    assert!(distance + inner.r <= outer.r + 0.01);
}

#[test]
fn flowchart_nodes_keep_explicit_positions() {
    let layout = layout_fixture("flowchart.json");
    let DiagramLayout::NodeDiagram(diagram) = &layout.diagram else {
        panic!("expected node diagram layout");
    };
    assert_eq!(diagram.nodes.len(), 4);
    assert_eq!(diagram.connections.len(), 4);
    let fix = diagram.nodes.iter().find(|node| node.id == "fix").unwrap();
    assert_eq!((fix.x, fix.y), (900.0, 220.0));
    let start = &diagram.nodes[0];
    assert_eq!((start.x, start.y), (600.0, 100.0));

    let svg = render_json(&fixture("flowchart.json"), &RenderOptions::default()).unwrap();
    assert!(svg.contains(">Every release follows this path</text>"));
    assert_eq!(svg.matches("<g class=\"node\"").count(), 4);
}

#[test]
fn plot_caption_connects_to_data_point() {
    let svg = render_json(&fixture("plot.json"), &RenderOptions::default()).unwrap();
    assert!(svg.contains("<line class=\"caption-connector\" x1=\"80.00\" y1=\"820.00\""));
    assert!(svg.contains(">Reality</text>"));
    assert!(svg.contains("stroke-dasharray=\"5,5\""));
}

#[test]
fn theme_override_wins() {
    let input = fixture("venn_three.json");
    let options = RenderOptions::default().with_theme("default").with_seed(3);
    let svg = render_json(&input, &options).unwrap();
    assert!(!svg.contains("ROBOTPONY.CA"));
    assert!(!svg.contains("paper-texture"));
}

#[test]
fn unknown_chart_kind_is_rejected() {
    let err = render_json(r#"{ "type": "sankey", "data": {} }"#, &RenderOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("sankey"));
}
