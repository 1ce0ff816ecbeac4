use super::document::{Layer, SvgDocument};
use super::{escape_xml, line_element, points_attr, text_element};
use crate::layout::{IntersectionConnector, VennLayout};
use crate::theme::Theme;

const BADGE_RADIUS: f32 = 4.0;

fn set_class(idx: usize) -> String {
    let letter = (b'a' + (idx % 26) as u8) as char;
    format!("set-{letter}")
}

/// Circles, texture overlays, connectors, badges, then labels.
pub(super) fn render_venn(doc: &mut SvgDocument, venn: &VennLayout, theme: &Theme) {
    let mut body = String::new();
    let shadow = if venn.textured {
        " filter=\"url(#drop-shadow)\""
    } else {
        ""
    };

    for (idx, circle) in venn.circles.iter().enumerate() {
        body.push_str(&format!(
            "<circle class=\"venn-circle {}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" style=\"fill: {}; stroke: {};\"{shadow}/>",
            set_class(idx),
            circle.cx,
            circle.cy,
            circle.r,
            escape_xml(&circle.fill),
            escape_xml(&circle.color)
        ));
    }

    if venn.textured {
        for circle in &venn.circles {
            body.push_str(&format!(
                "<circle class=\"venn-texture\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"url(#vintage-texture)\"/>",
                circle.cx, circle.cy, circle.r
            ));
        }
    }

    for intersection in &venn.intersections {
        match &intersection.connector {
            IntersectionConnector::Bracket { drop, bracket } => {
                line_element(&mut body, "connector-line", drop[0], drop[1], "");
                body.push_str(&format!(
                    "<polyline class=\"connector-line\" points=\"{}\"/>",
                    points_attr(bracket)
                ));
            }
            IntersectionConnector::Arrow { line, head } => {
                line_element(&mut body, "connector-line", line[0], line[1], "");
                body.push_str(&format!(
                    "<polygon class=\"arrowhead\" points=\"{}\"/>",
                    points_attr(head)
                ));
            }
        }
    }

    for intersection in &venn.intersections {
        let badge = &intersection.badge;
        body.push_str(&format!(
            "<rect class=\"intersection-badge\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{BADGE_RADIUS}\" ry=\"{BADGE_RADIUS}\"/>",
            badge.x, badge.y, badge.width, badge.height
        ));
    }

    for label in &venn.set_labels {
        text_element(&mut body, label, theme, "");
    }
    for intersection in &venn.intersections {
        text_element(&mut body, &intersection.label, theme, "");
    }

    doc.push(Layer::Body, body);
}
