pub mod document;
mod flowchart;
mod plot;
mod venn;

use crate::layout::{DiagramLayout, Layout, PlacedText};
use crate::path::Point;
use crate::theme::Theme;
use document::{Layer, SvgDocument};

const WATERMARK_TEXT: &str = "ROBOTPONY.CA";
const WATERMARK_INSET: f32 = 10.0;

const DECORATED_DEFS: &str = concat!(
    r#"<filter id="rough-edges" x="-50%" y="-50%" width="200%" height="200%">"#,
    r#"<feTurbulence baseFrequency="0.04" numOctaves="3" result="noise"/>"#,
    r#"<feDisplacementMap in="SourceGraphic" in2="noise" scale="2"/></filter>"#,
    r#"<pattern id="vintage-texture" patternUnits="userSpaceOnUse" width="4" height="4">"#,
    r#"<rect width="4" height="4" fill="rgba(255,255,255,0.05)"/>"#,
    r#"<circle cx="2" cy="2" r="0.5" fill="rgba(0,0,0,0.08)"/>"#,
    r#"<rect x="1" y="1" width="1" height="1" fill="rgba(255,255,255,0.1)"/></pattern>"#,
    r#"<pattern id="paper-texture" patternUnits="userSpaceOnUse" width="8" height="8">"#,
    r##"<rect width="8" height="8" fill="#d4c5a9"/>"##,
    r#"<circle cx="2" cy="2" r="0.3" fill="rgba(139,125,107,0.2)"/>"#,
    r#"<circle cx="6" cy="6" r="0.2" fill="rgba(139,125,107,0.3)"/>"#,
    r#"<rect x="4" y="1" width="0.5" height="0.5" fill="rgba(139,125,107,0.1)"/></pattern>"#,
    r#"<radialGradient id="circle-gradient" cx="30%" cy="30%">"#,
    r##"<stop offset="0%" stop-color="#ffffff" stop-opacity="0.4"/>"##,
    r##"<stop offset="100%" stop-color="#000000" stop-opacity="0.15"/></radialGradient>"##,
    r#"<filter id="drop-shadow" x="-20%" y="-20%" width="140%" height="140%">"#,
    r##"<feDropShadow dx="2" dy="2" stdDeviation="3" flood-color="#000000" flood-opacity="0.3"/></filter>"##,
);

/// Serializes a computed layout into a standalone SVG document.
pub fn render_svg(layout: &Layout, theme: &Theme) -> String {
    let mut doc = SvgDocument::new(layout.width, layout.height);

    doc.push(Layer::Defs, shared_defs(theme));

    if let Some(background) = &layout.background {
        doc.push(
            Layer::Background,
            format!(
                "<rect class=\"background\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                escape_xml(background)
            ),
        );
    }

    match &layout.diagram {
        DiagramLayout::SetOverlap(venn) => venn::render_venn(&mut doc, venn, theme),
        DiagramLayout::NodeDiagram(diagram) => {
            flowchart::render_flowchart(&mut doc, diagram, theme)
        }
        DiagramLayout::Plot(plot) => plot::render_plot(&mut doc, plot, theme),
    }

    if let Some(title) = &layout.title {
        let mut overlay = String::new();
        text_element(&mut overlay, title, theme, "");
        doc.push(Layer::Overlay, overlay);
    }
    if theme.capabilities.watermark {
        doc.push(Layer::Overlay, watermark(layout.width, layout.height));
    }

    doc.finish()
}

fn shared_defs(theme: &Theme) -> String {
    let mut defs = String::new();
    defs.push_str(&format!(
        "<marker id=\"arrowhead\" markerWidth=\"10\" markerHeight=\"7\" refX=\"10\" refY=\"3.5\" orient=\"auto\"><polygon points=\"0 0, 10 3.5, 0 7\" fill=\"{}\"/></marker>",
        theme.shapes.line_color
    ));
    if theme.capabilities.decorated {
        defs.push_str(DECORATED_DEFS);
    }
    defs.push_str(&theme.text_effect_defs());
    defs.push_str(&format!("<style type=\"text/css\">{}</style>", theme.style_sheet()));
    defs
}

fn watermark(width: f32, height: f32) -> String {
    format!(
        "<text class=\"watermark\" x=\"{:.2}\" y=\"{:.2}\" font-family=\"Courier New, monospace\" font-size=\"9\" font-weight=\"700\" fill=\"#999\" opacity=\"0.7\" text-anchor=\"end\" letter-spacing=\"1px\">{WATERMARK_TEXT}</text>",
        width - WATERMARK_INSET,
        height - WATERMARK_INSET
    )
}

/// Writes a `<text>` element for placed text. Lines are centered on the
/// anchor point; `extra` is appended to the attribute list.
pub(crate) fn text_element(out: &mut String, text: &PlacedText, theme: &Theme, extra: &str) {
    let style = theme.text(text.role);
    let mut inline = String::new();
    if text.anchor != style.anchor {
        inline.push_str(&format!("text-anchor: {};", text.anchor.as_str()));
    }
    if let Some(fill) = &text.fill {
        if !inline.is_empty() {
            inline.push(' ');
        }
        inline.push_str(&format!("fill: {};", escape_xml(fill)));
    }

    out.push_str(&format!(
        "<text class=\"{}\" x=\"{:.2}\" y=\"{:.2}\" dominant-baseline=\"middle\"",
        text.class, text.x, text.y
    ));
    if !inline.is_empty() {
        out.push_str(&format!(" style=\"{inline}\""));
    }
    if let Some(filter) = theme.text_filter(text.role) {
        out.push_str(&format!(" filter=\"{filter}\""));
    }
    out.push_str(extra);
    out.push('>');
    write_lines(out, &text.block.lines, text.x, text.y, text.line_height);
    out.push_str("</text>");
}

/// Single lines go inline; multi-line blocks become `<tspan>`s stacked
/// around `y`.
pub(crate) fn write_lines(out: &mut String, lines: &[String], x: f32, y: f32, line_height: f32) {
    if lines.len() <= 1 {
        if let Some(line) = lines.first() {
            out.push_str(&escape_xml(line));
        }
        return;
    }
    let first_y = y - (lines.len() - 1) as f32 * line_height / 2.0;
    for (idx, line) in lines.iter().enumerate() {
        out.push_str(&format!(
            "<tspan x=\"{x:.2}\" y=\"{:.2}\">{}</tspan>",
            first_y + idx as f32 * line_height,
            escape_xml(line)
        ));
    }
}

pub(crate) fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn line_element(out: &mut String, class: &str, from: Point, to: Point, extra: &str) {
    out.push_str(&format!(
        "<line class=\"{class}\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"{extra}/>",
        from.x, from.y, to.x, to.y
    ));
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
