use super::document::{Layer, SvgDocument};
use super::{escape_xml, line_element, points_attr, text_element};
use crate::ir::{LineStyle, MarkerShape};
use crate::layout::{LegendLayout, LegendSwatch, MarkerLayout, PlotLayout};
use crate::path::Point;
use crate::theme::Theme;

const CAPTION_BOX_RADIUS: f32 = 4.0;
const AXIS_MARKER_SIZE: f32 = 16.0;
const LEGEND_MARKER_SIZE: f32 = 5.0;

fn line_dash(style: LineStyle) -> Option<&'static str> {
    match style {
        LineStyle::Solid => None,
        LineStyle::Dotted => Some("4,4"),
        LineStyle::Dashed => Some("8,4"),
        LineStyle::DashDot => Some("8,4,2,4"),
    }
}

fn stroke_style(color: &str, width: Option<f32>, style: LineStyle) -> String {
    let mut css = format!("stroke: {};", escape_xml(color));
    if let Some(width) = width {
        css.push_str(&format!(" stroke-width: {width};"));
    }
    if let Some(dash) = line_dash(style) {
        css.push_str(&format!(" stroke-dasharray: {dash};"));
    }
    css
}

/// Grid, axes, lines, markers, captions, legend.
pub(super) fn render_plot(doc: &mut SvgDocument, plot: &PlotLayout, theme: &Theme) {
    let mut body = String::new();
    let area = plot.area;
    let origin = area.origin();

    if let Some(grid) = &plot.grid {
        let mut attrs = format!(" stroke=\"{}\"", escape_xml(&grid.color));
        if let Some(dash) = grid.dash {
            attrs.push_str(&format!(" stroke-dasharray=\"{dash}\""));
        }
        for &x in &grid.vertical {
            let (from, to) = (Point::new(x, area.y), Point::new(x, origin.y));
            line_element(&mut body, "grid-line", from, to, &attrs);
        }
        for &y in &grid.horizontal {
            let (from, to) = (Point::new(area.x, y), Point::new(area.x + area.width, y));
            line_element(&mut body, "grid-line", from, to, &attrs);
        }
    }

    line_element(&mut body, "axis-line", origin, Point::new(area.x + area.width, origin.y), "");
    line_element(&mut body, "axis-line", origin, Point::new(origin.x, area.y), "");
    text_element(&mut body, &plot.axes.x_label, theme, "");
    let y_label = &plot.axes.y_label;
    let rotate = format!(" transform=\"rotate(-90 {:.2} {:.2})\"", y_label.x, y_label.y);
    text_element(&mut body, y_label, theme, &rotate);
    for marker in &plot.axes.markers {
        body.push_str(&format!(
            "<text class=\"axis-marker\" x=\"{:.2}\" y=\"{:.2}\" style=\"font-size: {AXIS_MARKER_SIZE}px;\">{}</text>",
            marker.x, marker.y, marker.text
        ));
    }

    for line in &plot.lines {
        body.push_str(&format!(
            "<path class=\"plot-line {}\" d=\"{}\" style=\"{}\"/>",
            line.style.class_name(),
            line.path.to_svg(),
            stroke_style(&line.color, Some(line.width), line.style)
        ));
    }

    for marker in &plot.markers {
        marker_shape(&mut body, marker.shape, marker.center, marker.size, &marker.color);
    }
    for label in plot.markers.iter().filter_map(|marker: &MarkerLayout| marker.label.as_ref()) {
        text_element(&mut body, label, theme, "");
    }

    for caption in &plot.captions {
        let [from, to] = caption.connector();
        line_element(&mut body, "caption-connector", from, to, "");
        let rect = &caption.rect;
        body.push_str(&format!(
            "<rect class=\"caption-box\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{CAPTION_BOX_RADIUS}\" ry=\"{CAPTION_BOX_RADIUS}\"/>",
            rect.x, rect.y, rect.width, rect.height
        ));
        text_element(&mut body, &caption.text, theme, "");
    }

    if let Some(legend) = &plot.legend {
        render_legend(&mut body, legend);
    }

    doc.push(Layer::Body, body);
}

fn marker_shape(out: &mut String, shape: MarkerShape, center: Point, size: f32, color: &str) {
    let color = escape_xml(color);
    let (x, y) = (center.x, center.y);
    match shape {
        MarkerShape::Circle => {
            out.push_str(&format!(
                "<circle class=\"plot-marker\" cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{size:.2}\" style=\"fill: {color};\"/>"
            ));
        }
        MarkerShape::Square => {
            out.push_str(&format!(
                "<rect class=\"plot-marker\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" style=\"fill: {color};\"/>",
                x - size,
                y - size,
                size * 2.0,
                size * 2.0
            ));
        }
        MarkerShape::Triangle => {
            let points = [
                Point::new(x, y - size),
                Point::new(x + size, y + size),
                Point::new(x - size, y + size),
            ];
            out.push_str(&format!(
                "<polygon class=\"plot-marker\" points=\"{}\" style=\"fill: {color};\"/>",
                points_attr(&points)
            ));
        }
        MarkerShape::Diamond => {
            let points = [
                Point::new(x, y - size),
                Point::new(x + size, y),
                Point::new(x, y + size),
                Point::new(x - size, y),
            ];
            out.push_str(&format!(
                "<polygon class=\"plot-marker\" points=\"{}\" style=\"fill: {color};\"/>",
                points_attr(&points)
            ));
        }
        MarkerShape::Cross => {
            out.push_str(&format!(
                "<path class=\"plot-marker\" d=\"M {:.2} {:.2} L {:.2} {:.2} M {:.2} {:.2} L {:.2} {:.2}\" style=\"stroke: {color}; stroke-width: 2; fill: none;\"/>",
                x - size,
                y - size,
                x + size,
                y + size,
                x - size,
                y + size,
                x + size,
                y - size
            ));
        }
    }
}

fn render_legend(out: &mut String, legend: &LegendLayout) {
    let rect = &legend.rect;
    out.push_str(&format!(
        "<g class=\"legend\"><rect class=\"legend-box\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/>",
        rect.x, rect.y, rect.width, rect.height
    ));
    for entry in &legend.entries {
        match entry.swatch {
            LegendSwatch::Line(style) => {
                let attrs = format!(" style=\"{}\"", stroke_style(&entry.color, Some(2.0), style));
                line_element(
                    out,
                    "legend-swatch",
                    Point::new(legend.swatch_x, entry.y),
                    Point::new(legend.swatch_x + legend.swatch_width, entry.y),
                    &attrs,
                );
            }
            LegendSwatch::Marker(shape) => {
                let center = Point::new(legend.swatch_x + legend.swatch_width / 2.0, entry.y);
                marker_shape(out, shape, center, LEGEND_MARKER_SIZE, &entry.color);
            }
        }
        out.push_str(&format!(
            "<text class=\"legend-text\" x=\"{:.2}\" y=\"{:.2}\" dominant-baseline=\"middle\" style=\"text-anchor: start;\">{}</text>",
            legend.text_x,
            entry.y,
            escape_xml(&entry.label)
        ));
    }
    out.push_str("</g>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::ChartSpec;
    use crate::layout::compute_layout;
    use crate::path::Jitter;
    use crate::render::render_svg;
    use serde_json::json;

    fn render(value: serde_json::Value) -> String {
        let theme = Theme::standard();
        let spec = ChartSpec::from_value(value).unwrap();
        let config = LayoutConfig::default();
        let layout = compute_layout(&spec, &theme, &config, &mut Jitter::seeded(9));
        render_svg(&layout, &theme)
    }

    fn sample() -> serde_json::Value {
        json!({
            "type": "plot",
            "title": "Hype cycle",
            "data": {
                "x_axis": "Time",
                "y_axis": "Expectations",
                "grid": { "show": true },
                "lines": [{ "style": "dashed", "points": [[0, 0], [2, 9], [5, 3], [10, 6]], "label": "Hype" }],
                "markers": [{ "shape": "cross", "x": 2, "y": 9, "label": "Peak" }],
                "captions": [{ "text": "Trough", "x": 5, "y": 3 }],
                "legend": { "show": true, "position": "bottom-right" }
            }
        })
    }

    #[test]
    fn body_follows_plot_paint_order() {
        let svg = render(sample());
        let pos = |needle: &str| svg.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
        assert!(pos("<line class=\"grid-line\"") < pos("<line class=\"axis-line\""));
        assert!(pos("<line class=\"axis-line\"") < pos("<path class=\"plot-line"));
        assert!(pos("<path class=\"plot-line") < pos("class=\"plot-marker\""));
        assert!(pos("class=\"plot-marker\"") < pos("<line class=\"caption-connector\""));
        assert!(pos("<line class=\"caption-connector\"") < pos("<rect class=\"caption-box\""));
        assert!(pos("<rect class=\"caption-box\"") < pos("<rect class=\"legend-box\""));
    }

    #[test]
    fn grid_and_line_styles_are_inline() {
        let svg = render(sample());
        assert_eq!(svg.matches("<line class=\"grid-line\"").count(), 18);
        assert!(svg.contains("stroke-dasharray=\"2,2\""));
        assert!(svg.contains("<path class=\"plot-line dashed\""));
        assert!(svg.contains("stroke-dasharray: 8,4;"));
    }

    #[test]
    fn axes_have_rotated_y_label_and_end_markers() {
        let svg = render(sample());
        assert!(svg.contains("transform=\"rotate(-90 40.00 440.00)\""));
        assert_eq!(svg.matches("class=\"axis-marker\" x=").count(), 4);
        assert!(svg.contains(">Expectations</text>"));
    }

    #[test]
    fn legend_lists_labeled_series() {
        let svg = render(sample());
        assert!(svg.contains(">Hype</text>"));
        assert!(svg.contains("class=\"legend-text\""));
        assert!(svg.contains("<line class=\"legend-swatch\""));
    }
}
