use super::document::{Layer, SvgDocument};
use super::{escape_xml, line_element, points_attr, text_element, write_lines};
use crate::ir::NodeShape;
use crate::layout::{LayoutNode, NodeDiagramLayout};
use crate::path::Point;
use crate::theme::Theme;

const NODE_CORNER_RADIUS: f32 = 8.0;

/// Connections first so edges sit beneath the shapes they join.
pub(super) fn render_flowchart(doc: &mut SvgDocument, diagram: &NodeDiagramLayout, theme: &Theme) {
    let mut body = String::new();
    let arrow_style = format!(" style=\"fill: {};\"", escape_xml(&diagram.arrow_fill));

    for connection in &diagram.connections {
        line_element(&mut body, "connection-line", connection.start, connection.end, "");
        body.push_str(&format!(
            "<polygon class=\"arrowhead\" points=\"{}\"{arrow_style}/>",
            points_attr(&connection.arrowhead)
        ));
        if let Some(label) = &connection.label {
            text_element(&mut body, label, theme, "");
        }
    }

    for node in &diagram.nodes {
        render_node(&mut body, node);
    }
    doc.push(Layer::Body, body);

    let mut overlay = String::new();
    for text in diagram.caption.iter().chain(&diagram.subtitle) {
        text_element(&mut overlay, text, theme, "");
    }
    doc.push(Layer::Overlay, overlay);
}

fn render_node(out: &mut String, node: &LayoutNode) {
    let fill = format!("style=\"fill: {};\"", escape_xml(&node.color));
    out.push_str(&format!("<g class=\"node\" data-id=\"{}\">", escape_xml(&node.id)));
    match node.shape {
        NodeShape::Rectangle => {
            let bounds = node.bounds();
            out.push_str(&format!(
                "<rect class=\"flowchart-shape\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{NODE_CORNER_RADIUS}\" ry=\"{NODE_CORNER_RADIUS}\" {fill}/>",
                bounds.x, bounds.y, bounds.width, bounds.height
            ));
        }
        NodeShape::Circle => {
            out.push_str(&format!(
                "<circle class=\"flowchart-shape\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" {fill}/>",
                node.x,
                node.y,
                node.width.min(node.height) / 2.0
            ));
        }
        NodeShape::Diamond => {
            let (hw, hh) = (node.width / 2.0, node.height / 2.0);
            let points = [
                Point::new(node.x, node.y - hh),
                Point::new(node.x + hw, node.y),
                Point::new(node.x, node.y + hh),
                Point::new(node.x - hw, node.y),
            ];
            out.push_str(&format!(
                "<polygon class=\"flowchart-shape\" points=\"{}\" {fill}/>",
                points_attr(&points)
            ));
        }
    }

    let line_height = node.text.height / node.text.lines.len().max(1) as f32;
    out.push_str(&format!(
        "<text class=\"node-text\" x=\"{:.2}\" y=\"{:.2}\" dominant-baseline=\"middle\" style=\"fill: {};\">",
        node.x,
        node.y,
        escape_xml(&node.text_color)
    ));
    write_lines(out, &node.text.lines, node.x, node.y, line_height);
    out.push_str("</text></g>");
}
