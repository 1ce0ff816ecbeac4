use super::label_placement::{LabelElement, place_labels};
use super::text::split_lines;
use super::{
    ConnectionLayout, LayoutNode, NodeDiagramLayout, PlacedText, Rect, TextBlock, arrowhead,
    place_text,
};
use crate::color::{accessible_foreground, color_value};
use crate::config::{LayoutConfig, NodeConfig};
use crate::ir::{NodeDiagramData, NodeShape, NodeSpec};
use crate::path::Point;
use crate::theme::{Theme, TextRole};
use std::collections::HashMap;

pub(super) fn compute_flowchart_layout(
    data: &NodeDiagramData,
    theme: &Theme,
    config: &LayoutConfig,
) -> NodeDiagramLayout {
    let node_cfg = &config.node;
    let center_x = config.canvas_width / 2.0;

    let nodes: Vec<LayoutNode> = data
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, spec)| {
            let x = spec.x.unwrap_or(center_x);
            let y = spec
                .y
                .unwrap_or(node_cfg.start_y + idx as f32 * node_cfg.vertical_spacing);
            layout_node(spec, x, y, node_cfg)
        })
        .collect();

    let mut index: HashMap<&str, usize> = HashMap::new();
    for (idx, node) in nodes.iter().enumerate() {
        index.entry(node.id.as_str()).or_insert(idx);
    }

    let mut connections = Vec::new();
    let mut pending_labels: Vec<(usize, String, Point)> = Vec::new();
    for spec in &data.connections {
        let (Some(&from), Some(&to)) = (
            index.get(spec.from_id.as_str()),
            index.get(spec.to_id.as_str()),
        ) else {
            log::debug!(
                from = spec.from_id.as_str(),
                to = spec.to_id.as_str();
                "skipping connection to unknown node"
            );
            continue;
        };
        let (source, target) = (&nodes[from], &nodes[to]);
        let start = connection_point(source, target);
        let end = connection_point(target, source);
        if let Some(label) = spec.label.as_deref().filter(|label| !label.trim().is_empty()) {
            let mid = Point::new(
                (start.x + end.x) / 2.0,
                (start.y + end.y) / 2.0 - node_cfg.label_offset,
            );
            pending_labels.push((connections.len(), label.to_string(), mid));
        }
        connections.push(ConnectionLayout {
            from: source.id.clone(),
            to: target.id.clone(),
            start,
            end,
            arrowhead: arrowhead(end, start, node_cfg.arrow_length, node_cfg.arrow_angle),
            label: None,
        });
    }

    let label_style = theme.text(TextRole::Label);
    let elements: Vec<LabelElement> = pending_labels
        .iter()
        .map(|(_, text, mid)| LabelElement::for_text(text, label_style, mid.x, mid.y))
        .collect();
    let obstacles: Vec<Rect> = nodes.iter().map(LayoutNode::bounds).collect();
    let positions = place_labels(&obstacles, &elements, &config.text);
    for ((conn_idx, text, _), position) in pending_labels.into_iter().zip(positions) {
        connections[conn_idx].label = Some(place_text(
            theme,
            TextRole::Label,
            "connection-label",
            &text,
            position.x,
            position.y,
        ));
    }

    let caption_y = config.canvas_height - node_cfg.caption_inset;
    let caption = optional_text(data.caption.as_deref(), |text| {
        place_text(theme, TextRole::Emphasis, "flowchart-caption", text, center_x, caption_y)
    });
    let subtitle = optional_text(data.subtitle.as_deref(), |text| {
        place_text(
            theme,
            TextRole::Heading,
            "flowchart-subtitle",
            text,
            center_x,
            caption_y + node_cfg.subtitle_gap,
        )
    });

    NodeDiagramLayout {
        nodes,
        connections,
        arrow_fill: color_value(&node_cfg.arrow_fill),
        caption,
        subtitle,
    }
}

fn optional_text(text: Option<&str>, place: impl FnOnce(&str) -> PlacedText) -> Option<PlacedText> {
    text.filter(|text| !text.trim().is_empty()).map(place)
}

fn layout_node(spec: &NodeSpec, x: f32, y: f32, cfg: &NodeConfig) -> LayoutNode {
    let lines = split_lines(&spec.text);
    let longest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) as f32;
    let text = TextBlock {
        width: longest * cfg.glyph_width,
        height: lines.len() as f32 * cfg.line_height,
        lines,
    };

    let mut width = text.width + cfg.padding_x;
    let mut height = text.height + cfg.padding_y;
    match spec.shape {
        NodeShape::Diamond => {
            width = width.max(cfg.diamond_min[0]);
            height = height.max(cfg.diamond_min[1]);
        }
        NodeShape::Rectangle => {
            width = width.max(cfg.rectangle_min[0]);
            height = height.max(cfg.rectangle_min[1]);
        }
        NodeShape::Circle => {
            let side = width.max(height);
            width = side;
            height = side;
        }
    }

    let color = match (spec.color.as_deref(), spec.shape) {
        (Some(color), _) => color_value(color),
        (None, NodeShape::Diamond) => color_value(&cfg.diamond_fill),
        (None, _) => color_value(&cfg.node_fill),
    };

    LayoutNode {
        id: spec.id.clone(),
        shape: spec.shape,
        text,
        text_color: accessible_foreground(&color).to_string(),
        color,
        x,
        y,
        width,
        height,
    }
}

/// Where a connection leaves `node` toward `other`. Boxes and diamonds use
/// the side facing the dominant axis; circles use the circumference.
fn connection_point(node: &LayoutNode, other: &LayoutNode) -> Point {
    let dx = other.x - node.x;
    let dy = other.y - node.y;
    match node.shape {
        NodeShape::Circle => {
            let r = node.width / 2.0;
            let angle = dy.atan2(dx);
            Point::new(node.x + angle.cos() * r, node.y + angle.sin() * r)
        }
        NodeShape::Rectangle | NodeShape::Diamond => {
            if dx.abs() > dy.abs() {
                Point::new(node.x + dx.signum() * node.width / 2.0, node.y)
            } else {
                let sign = if dy < 0.0 { -1.0 } else { 1.0 };
                Point::new(node.x, node.y + sign * node.height / 2.0)
            }
        }
    }
}
