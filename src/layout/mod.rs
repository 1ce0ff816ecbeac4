mod flowchart;
pub mod label_placement;
mod plot;
pub mod text;
pub(crate) mod types;
mod venn;
pub use types::*;
use flowchart::*;
use plot::*;
use venn::*;

use crate::color::color_value;
use crate::config::LayoutConfig;
use crate::ir::{ChartData, ChartSpec};
use crate::path::{Jitter, Point};
use crate::theme::{Theme, TextRole};
use text::measure_label;

const PAPER_TEXTURE: &str = "url(#paper-texture)";

pub fn compute_layout(
    spec: &ChartSpec,
    theme: &Theme,
    config: &LayoutConfig,
    jitter: &mut Jitter,
) -> Layout {
    let title = spec
        .title
        .as_deref()
        .filter(|title| !title.trim().is_empty())
        .map(|title| {
            place_text(
                theme,
                TextRole::Title,
                "chart-title",
                title,
                config.canvas_width / 2.0,
                config.title_y,
            )
        });
    let reserved: Vec<Rect> = title.iter().map(PlacedText::bounds).collect();

    let (background, diagram) = match &spec.data {
        ChartData::SetOverlap(data) => (
            canvas_background(data.background.as_deref(), theme),
            DiagramLayout::SetOverlap(compute_venn_layout(data, theme, config, &reserved)),
        ),
        ChartData::NodeDiagram(data) => (
            canvas_background(data.background.as_deref(), theme),
            DiagramLayout::NodeDiagram(compute_flowchart_layout(data, theme, config)),
        ),
        ChartData::Plot(data) => (
            Some(color_value(
                data.background.as_deref().unwrap_or(&theme.palette.background),
            )),
            DiagramLayout::Plot(compute_plot_layout(data, theme, config, jitter)),
        ),
    };

    log::debug!(kind = spec.kind().name(), theme = theme.id.name(); "computed layout");

    Layout {
        width: config.canvas_width,
        height: config.canvas_height,
        title,
        background,
        diagram,
    }
}

/// Explicit background color, else the paper texture on decorated themes.
fn canvas_background(explicit: Option<&str>, theme: &Theme) -> Option<String> {
    match explicit {
        Some(color) => Some(color_value(color)),
        None if theme.capabilities.decorated => Some(PAPER_TEXTURE.to_string()),
        None => None,
    }
}

/// Solid color text sits on: the explicit background or the palette's.
fn backdrop_color(explicit: Option<&str>, theme: &Theme) -> String {
    color_value(explicit.unwrap_or(&theme.palette.background))
}

fn place_text(
    theme: &Theme,
    role: TextRole,
    class: &'static str,
    text: &str,
    x: f32,
    y: f32,
) -> PlacedText {
    let style = theme.text(role);
    PlacedText {
        block: measure_label(text, style),
        x,
        y,
        anchor: style.anchor,
        role,
        class,
        line_height: style.line_advance(),
        fill: None,
    }
}

fn unit_vector(from: Point, to: Point) -> Option<(f32, f32)> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-3 {
        None
    } else {
        Some((dx / len, dy / len))
    }
}

/// Triangle with its tip at `tip`, pointing away from `from`. The back
/// vertices sit at `length` along the reversed direction rotated by
/// `±angle_deg`.
fn arrowhead(tip: Point, from: Point, length: f32, angle_deg: f32) -> [Point; 3] {
    let (ux, uy) = unit_vector(tip, from).unwrap_or((0.0, -1.0));
    let angle = angle_deg.to_radians();
    let rotate = |theta: f32| {
        let (sin, cos) = theta.sin_cos();
        Point::new(
            tip.x + (ux * cos - uy * sin) * length,
            tip.y + (ux * sin + uy * cos) * length,
        )
    };
    [tip, rotate(angle), rotate(-angle)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ChartSpec, NodeDiagramData, PlotData};
    use serde_json::json;

    fn layout_for(value: serde_json::Value, theme: &Theme) -> Layout {
        let spec = ChartSpec::from_value(value).unwrap();
        compute_layout(&spec, theme, &LayoutConfig::default(), &mut Jitter::seeded(1))
    }

    #[test]
    fn title_is_centered_at_top() {
        let layout = layout_for(
            json!({ "type": "venn", "title": "Skills", "data": { "sets": ["A", "B"] } }),
            &Theme::standard(),
        );
        let title = layout.title.unwrap();
        assert_eq!(title.x, 600.0);
        assert_eq!(title.y, 30.0);
        assert_eq!(title.class, "chart-title");
        assert_eq!(title.block.lines, vec!["Skills"]);
    }

    #[test]
    fn blank_title_is_dropped() {
        let layout = layout_for(
            json!({ "type": "venn", "title": "  ", "data": { "sets": ["A", "B"] } }),
            &Theme::standard(),
        );
        assert!(layout.title.is_none());
    }

    #[test]
    fn backgrounds_follow_kind_and_theme() {
        let venn = json!({ "type": "venn", "data": { "sets": ["A", "B"] } });
        assert_eq!(layout_for(venn.clone(), &Theme::standard()).background, None);
        assert_eq!(
            layout_for(venn, &Theme::robotpony()).background.as_deref(),
            Some(PAPER_TEXTURE)
        );

        let flow = json!({ "type": "flowchart", "data": { "nodes": [], "background": "beige" } });
        assert_eq!(
            layout_for(flow, &Theme::standard()).background.as_deref(),
            Some("#d4c5a9")
        );

        let plot = json!({ "type": "plot", "data": {} });
        assert_eq!(
            layout_for(plot, &Theme::rp()).background.as_deref(),
            Some("#ffffff")
        );
    }

    #[test]
    fn dispatch_matches_chart_data() {
        let theme = Theme::standard();
        let config = LayoutConfig::default();
        let mut jitter = Jitter::seeded(0);
        let flow = ChartSpec {
            title: None,
            theme: None,
            data: ChartData::NodeDiagram(NodeDiagramData {
                nodes: Vec::new(),
                connections: Vec::new(),
                caption: None,
                subtitle: None,
                background: None,
            }),
        };
        let layout = compute_layout(&flow, &theme, &config, &mut jitter);
        assert!(matches!(layout.diagram, DiagramLayout::NodeDiagram(_)));

        let plot: PlotData = serde_json::from_value(json!({})).unwrap();
        let spec = ChartSpec {
            title: None,
            theme: None,
            data: ChartData::Plot(plot),
        };
        let layout = compute_layout(&spec, &theme, &config, &mut jitter);
        assert!(matches!(layout.diagram, DiagramLayout::Plot(_)));
    }

    #[test]
    fn arrowhead_points_back_along_line() {
        let head = arrowhead(Point::new(100.0, 0.0), Point::new(0.0, 0.0), 8.0, 30.0);
        assert_eq!(head[0], Point::new(100.0, 0.0));
        for back in &head[1..] {
            assert!(back.x < 100.0);
            let dist = ((back.x - 100.0).powi(2) + back.y.powi(2)).sqrt();
            assert!((dist - 8.0).abs() < 0.01);
        }
        assert!((head[1].y + head[2].y).abs() < 0.01);
        assert!((head[1].y.abs() - 4.0).abs() < 0.01);
    }
}
