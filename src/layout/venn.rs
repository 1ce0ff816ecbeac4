use super::label_placement::{LabelElement, place_labels};
use super::text::wrap;
use super::{
    IntersectionConnector, IntersectionLayout, PlacedText, Rect, VennArrangement, VennCircle,
    VennLayout, arrowhead, backdrop_color, place_text, unit_vector,
};
use crate::color::{accessible_foreground, blend, color_value, with_alpha};
use crate::config::{LayoutConfig, VennConfig};
use crate::ir::{IntersectionSpec, SetOverlapData};
use crate::path::Point;
use crate::theme::{ConnectorStyle, LayoutCapabilities, Theme, TextRole};
use std::f32::consts::TAU;

const CIRCLE_FILL_ALPHA: f32 = 0.4;
/// Label of the enclosing circle in a nested pair sits this far up its radius.
const NESTED_LABEL_LIFT: f32 = 0.82;
const SET_LABEL_SPREAD: f32 = 0.5;
const BADGE_TEXT_PAD_Y: f32 = 6.0;
const BRACKET_BADGE_GAP: f32 = 6.0;
const ARROWHEAD_LENGTH: f32 = 10.0;
const ARROWHEAD_ANGLE: f32 = 30.0;
const DEFAULT_ARROW_DIRECTION: (f32, f32) = (0.707, 0.707);

#[derive(Debug, Clone, Copy)]
struct Disc {
    center: Point,
    r: f32,
}

pub(super) fn compute_venn_layout(
    data: &SetOverlapData,
    theme: &Theme,
    config: &LayoutConfig,
    reserved: &[Rect],
) -> VennLayout {
    let venn = &config.venn;
    let center = Point::new(config.canvas_width / 2.0, config.canvas_height / 2.0);
    let radius = config.canvas_width.min(config.canvas_height) * venn.radius_fraction;

    let sizes: Vec<f32> = data.sets.iter().map(|set| set.size).collect();
    let (arrangement, discs) = arrange_circles(&sizes, &theme.capabilities, venn, center, radius);

    let circles: Vec<VennCircle> = data
        .sets
        .iter()
        .zip(&discs)
        .enumerate()
        .map(|(idx, (set, disc))| {
            let color = match set.color.as_deref() {
                Some(color) => color_value(color),
                None => theme.palette.series_color(idx).to_string(),
            };
            VennCircle {
                name: set.name.clone(),
                cx: disc.center.x,
                cy: disc.center.y,
                r: disc.r,
                fill: with_alpha(&color, CIRCLE_FILL_ALPHA),
                color,
            }
        })
        .collect();

    let backdrop = backdrop_color(data.background.as_deref(), theme);
    let set_labels =
        place_set_labels(&circles, &discs, arrangement, theme, config, &backdrop, reserved);

    let mut occupied: Vec<Rect> = reserved.to_vec();
    occupied.extend(set_labels.iter().map(PlacedText::bounds));
    let diagram_center = centroid(discs.iter().map(|disc| disc.center)).unwrap_or(center);

    let mut intersections = Vec::new();
    for spec in &data.intersections {
        let Some(members) = member_indices(spec, &circles) else {
            log::debug!(
                sets:? = spec.member_names;
                "skipping intersection with unknown or too few sets"
            );
            continue;
        };
        let intersection = layout_intersection(
            spec,
            &members,
            &discs,
            arrangement,
            diagram_center,
            theme,
            config,
            &mut occupied,
        );
        intersections.push(intersection);
    }

    VennLayout {
        arrangement,
        circles,
        set_labels,
        intersections,
        textured: theme.capabilities.decorated,
    }
}

fn arrange_circles(
    sizes: &[f32],
    capabilities: &LayoutCapabilities,
    venn: &VennConfig,
    center: Point,
    radius: f32,
) -> (VennArrangement, Vec<Disc>) {
    let offset = radius * venn.offset_fraction;
    match sizes.len() {
        0 => (VennArrangement::SideBySide, Vec::new()),
        1 => (VennArrangement::SideBySide, vec![Disc { center, r: radius }]),
        2 => arrange_pair(sizes[0], sizes[1], venn, center, radius),
        3 if capabilities.organic_circle_layout => {
            let discs = (0..3)
                .map(|idx| {
                    let [dx, dy] = venn.organic_offsets[idx];
                    Disc {
                        center: Point::new(center.x + dx * offset, center.y + dy * offset),
                        r: radius * venn.organic_scales[idx],
                    }
                })
                .collect();
            (VennArrangement::Organic, discs)
        }
        count => {
            // Starts at the top and walks counter-clockwise on screen.
            let discs = (0..count)
                .map(|idx| {
                    let angle = -TAU / 4.0 - idx as f32 * TAU / count as f32;
                    Disc {
                        center: Point::new(
                            center.x + angle.cos() * offset,
                            center.y + angle.sin() * offset,
                        ),
                        r: radius,
                    }
                })
                .collect();
            let arrangement = if count == 3 {
                VennArrangement::Symmetric
            } else {
                VennArrangement::Ring
            };
            (arrangement, discs)
        }
    }
}

fn arrange_pair(
    a: f32,
    b: f32,
    venn: &VennConfig,
    center: Point,
    radius: f32,
) -> (VennArrangement, Vec<Disc>) {
    let larger = a.max(b);
    let ratio = if larger > 0.0 { a.min(b) / larger } else { 1.0 };

    if ratio < venn.nested_ratio_threshold {
        let inner_r = radius * ratio.max(venn.nested_min_scale);
        let shift = (radius - inner_r) / 2.0;
        let outer = Disc { center, r: radius };
        let (first, second) = if a < b {
            let inner = Disc {
                center: Point::new(center.x - shift, center.y),
                r: inner_r,
            };
            (inner, outer)
        } else {
            let inner = Disc {
                center: Point::new(center.x + shift, center.y),
                r: inner_r,
            };
            (outer, inner)
        };
        return (VennArrangement::Nested, vec![first, second]);
    }

    let offset = radius * venn.offset_fraction;
    let discs = vec![
        Disc {
            center: Point::new(center.x - offset, center.y),
            r: radius,
        },
        Disc {
            center: Point::new(center.x + offset, center.y),
            r: radius,
        },
    ];
    (VennArrangement::SideBySide, discs)
}

fn centroid(points: impl Iterator<Item = Point>) -> Option<Point> {
    let (mut x, mut y, mut count) = (0.0, 0.0, 0usize);
    for point in points {
        x += point.x;
        y += point.y;
        count += 1;
    }
    (count > 0).then(|| Point::new(x / count as f32, y / count as f32))
}

fn place_set_labels(
    circles: &[VennCircle],
    discs: &[Disc],
    arrangement: VennArrangement,
    theme: &Theme,
    config: &LayoutConfig,
    backdrop: &str,
    reserved: &[Rect],
) -> Vec<PlacedText> {
    let style = theme.text(TextRole::Heading);
    let diagram_center = centroid(discs.iter().map(|disc| disc.center));
    let outer_idx = discs
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.r.total_cmp(&b.1.r))
        .map(|(idx, _)| idx);

    let texts: Vec<String> = circles
        .iter()
        .map(|circle| wrap(&circle.name, config.venn.label_wrap_chars))
        .collect();

    let elements: Vec<LabelElement> = discs
        .iter()
        .zip(&texts)
        .enumerate()
        .map(|(idx, (disc, text))| {
            let position = if arrangement == VennArrangement::Nested {
                if Some(idx) == outer_idx {
                    Point::new(disc.center.x, disc.center.y - disc.r * NESTED_LABEL_LIFT)
                } else {
                    disc.center
                }
            } else {
                let (dx, dy) = diagram_center
                    .and_then(|origin| unit_vector(origin, disc.center))
                    .unwrap_or((0.0, -1.0));
                Point::new(
                    disc.center.x + dx * disc.r * SET_LABEL_SPREAD,
                    disc.center.y + dy * disc.r * SET_LABEL_SPREAD,
                )
            };
            LabelElement::for_text(text, style, position.x, position.y)
        })
        .collect();

    let obstacles: Vec<Rect> = reserved
        .iter()
        .map(|rect| rect.inflate(config.venn.label_padding / 2.0))
        .collect();
    let positions = place_labels(&obstacles, &elements, &config.text);

    circles
        .iter()
        .zip(texts)
        .zip(positions)
        .map(|((circle, text), position)| {
            let surface = blend(&circle.color, backdrop, CIRCLE_FILL_ALPHA);
            let mut label = place_text(
                theme,
                TextRole::Heading,
                "set-label",
                &text,
                position.x,
                position.y,
            );
            label.fill = Some(accessible_foreground(&surface).to_string());
            label
        })
        .collect()
}

/// Member circle indices, deduplicated. `None` when a name is unknown or
/// fewer than two distinct sets remain.
fn member_indices(spec: &IntersectionSpec, circles: &[VennCircle]) -> Option<Vec<usize>> {
    let mut members = spec
        .member_names
        .iter()
        .map(|name| circles.iter().position(|circle| &circle.name == name))
        .collect::<Option<Vec<_>>>()?;
    members.sort_unstable();
    members.dedup();
    (members.len() >= 2).then_some(members)
}

/// Point inside the shared region of the member circles.
fn overlap_anchor(members: &[usize], discs: &[Disc], arrangement: VennArrangement) -> Point {
    if members.len() > 2 {
        return centroid(members.iter().map(|&idx| discs[idx].center))
            .unwrap_or(discs[members[0]].center);
    }
    let (a, b) = (discs[members[0]], discs[members[1]]);
    let dx = b.center.x - a.center.x;
    let dy = b.center.y - a.center.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance < 1e-3 {
        return a.center;
    }
    let (inner, outer) = if a.r <= b.r { (a, b) } else { (b, a) };
    if arrangement == VennArrangement::Nested || distance + inner.r <= outer.r {
        return inner.center;
    }
    // Middle of the lens along the line of centers.
    let along = (distance - b.r + a.r) / 2.0;
    Point::new(a.center.x + dx / distance * along, a.center.y + dy / distance * along)
}

#[allow(clippy::too_many_arguments)]
fn layout_intersection(
    spec: &IntersectionSpec,
    members: &[usize],
    discs: &[Disc],
    arrangement: VennArrangement,
    diagram_center: Point,
    theme: &Theme,
    config: &LayoutConfig,
    occupied: &mut Vec<Rect>,
) -> IntersectionLayout {
    let venn = &config.venn;
    let anchor = overlap_anchor(members, discs, arrangement);
    let style = match spec.has_arrow {
        Some(true) => ConnectorStyle::Arrow,
        Some(false) => ConnectorStyle::Bracket,
        None => theme.capabilities.connector_style,
    };

    let text = spec.display_text();
    let mut label = place_text(
        theme,
        TextRole::Caption,
        "intersection-label",
        &text,
        anchor.x,
        anchor.y,
    );
    let badge_w = label.block.width + venn.badge_padding_x * 2.0;
    let badge_h = venn.badge_height.max(label.block.height + BADGE_TEXT_PAD_Y);

    let desired = match style {
        ConnectorStyle::Bracket => {
            let lowest = members
                .iter()
                .map(|&idx| discs[idx].center.y + discs[idx].r)
                .fold(f32::MIN, f32::max);
            let bracket_y = lowest + venn.bracket_gap;
            Point::new(anchor.x, bracket_y + venn.bracket_depth + BRACKET_BADGE_GAP + badge_h / 2.0)
        }
        ConnectorStyle::Arrow => {
            let (dx, dy) = unit_vector(diagram_center, anchor).unwrap_or(DEFAULT_ARROW_DIRECTION);
            let extent = members
                .iter()
                .map(|&idx| distance(diagram_center, discs[idx].center) + discs[idx].r)
                .fold(0.0, f32::max);
            let reach = extent - distance(diagram_center, anchor) + venn.arrow_distance;
            Point::new(anchor.x + dx * reach, anchor.y + dy * reach)
        }
    };

    let placed = place_labels(
        occupied,
        &[LabelElement::boxed(desired.x, desired.y, badge_w, badge_h)],
        &config.text,
    )
    .first()
    .copied()
    .unwrap_or(desired);
    let badge = Rect::centered(placed.x, placed.y, badge_w, badge_h);
    occupied.push(badge);

    let connector = match style {
        ConnectorStyle::Bracket => {
            let half = venn.bracket_half_width.max(badge_w / 2.0);
            let bracket_y = badge.y - BRACKET_BADGE_GAP - venn.bracket_depth;
            let foot = bracket_y + venn.bracket_depth;
            let drop_x = anchor.x.clamp(placed.x - half, placed.x + half);
            IntersectionConnector::Bracket {
                drop: [anchor, Point::new(drop_x, bracket_y)],
                bracket: vec![
                    Point::new(placed.x - half, foot),
                    Point::new(placed.x - half, bracket_y),
                    Point::new(placed.x + half, bracket_y),
                    Point::new(placed.x + half, foot),
                ],
            }
        }
        ConnectorStyle::Arrow => IntersectionConnector::Arrow {
            line: [placed, anchor],
            head: arrowhead(anchor, placed, ARROWHEAD_LENGTH, ARROWHEAD_ANGLE),
        },
    };

    label.x = placed.x;
    label.y = placed.y;
    IntersectionLayout {
        anchor,
        connector,
        badge,
        label,
    }
}

fn distance(a: Point, b: Point) -> f32 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::SetSpec;

    fn sets(sizes: &[f32]) -> SetOverlapData {
        SetOverlapData {
            sets: sizes
                .iter()
                .enumerate()
                .map(|(idx, &size)| SetSpec::new(format!("Set {}", idx + 1), size))
                .collect(),
            intersections: Vec::new(),
            background: None,
        }
    }

    fn intersection(names: &[&str], has_arrow: Option<bool>) -> IntersectionSpec {
        IntersectionSpec {
            member_names: names.iter().map(|name| name.to_string()).collect(),
            size: 30.0,
            label: Some("Both".to_string()),
            has_arrow,
        }
    }

    fn layout(data: &SetOverlapData, theme: &Theme) -> VennLayout {
        compute_venn_layout(data, theme, &LayoutConfig::default(), &[])
    }

    #[test]
    fn similar_sizes_sit_side_by_side() {
        let venn = layout(&sets(&[100.0, 80.0]), &Theme::standard());
        assert_eq!(venn.arrangement, VennArrangement::SideBySide);
        let (a, b) = (&venn.circles[0], &venn.circles[1]);
        assert_eq!(a.r, b.r);
        assert!((a.r - 135.0).abs() < 0.01);
        // Centers are 2 * offset apart.
        assert!(((b.cx - a.cx) - 2.0 * 135.0 * 0.7).abs() < 0.01);
        assert_eq!(a.cy, b.cy);
    }

    #[test]
    fn lopsided_sizes_nest_smaller_inside_larger() {
        let venn = layout(&sets(&[100.0, 40.0]), &Theme::standard());
        assert_eq!(venn.arrangement, VennArrangement::Nested);
        let (outer, inner) = (&venn.circles[0], &venn.circles[1]);
        assert!(inner.r < outer.r);
        let gap = ((inner.cx - outer.cx).powi(2) + (inner.cy - outer.cy).powi(2)).sqrt();
        assert!(gap + inner.r <= outer.r + 0.01);
        assert!((inner.r - 135.0 * 0.4).abs() < 0.01);
    }

    #[test]
    fn nested_scale_is_clamped() {
        let venn = layout(&sets(&[1.0, 100.0]), &Theme::standard());
        assert_eq!(venn.arrangement, VennArrangement::Nested);
        assert!((venn.circles[0].r - 135.0 * 0.3).abs() < 0.01);
        assert!(venn.circles[0].cx < venn.circles[1].cx);
    }

    #[test]
    fn threshold_is_configurable() {
        let mut config = LayoutConfig::default();
        config.venn.nested_ratio_threshold = 0.3;
        let venn = compute_venn_layout(&sets(&[100.0, 40.0]), &Theme::standard(), &config, &[]);
        assert_eq!(venn.arrangement, VennArrangement::SideBySide);
    }

    #[test]
    fn three_sets_follow_theme_capability() {
        let data = sets(&[100.0, 100.0, 100.0]);
        let symmetric = layout(&data, &Theme::standard());
        assert_eq!(symmetric.arrangement, VennArrangement::Symmetric);
        assert!(symmetric.circles.iter().all(|c| (c.r - 135.0).abs() < 0.01));
        // First circle straight above the center.
        assert!((symmetric.circles[0].cx - 600.0).abs() < 0.01);
        assert!(symmetric.circles[0].cy < 450.0);

        let organic = layout(&data, &Theme::robotpony());
        assert_eq!(organic.arrangement, VennArrangement::Organic);
        assert!((organic.circles[1].r - 135.0 * 0.85).abs() < 0.01);
        assert!(organic.textured);
    }

    #[test]
    fn four_and_five_sets_use_a_ring() {
        for count in [4, 5] {
            let venn = layout(&sets(&vec![100.0; count]), &Theme::standard());
            assert_eq!(venn.arrangement, VennArrangement::Ring);
            assert_eq!(venn.circles.len(), count);
            for circle in &venn.circles {
                let d = ((circle.cx - 600.0).powi(2) + (circle.cy - 450.0).powi(2)).sqrt();
                assert!((d - 94.5).abs() < 0.01);
            }
        }
    }

    #[test]
    fn explicit_colors_resolve_and_fill_is_translucent() {
        let mut data = sets(&[100.0, 100.0]);
        data.sets[0].color = Some("olive".to_string());
        let venn = layout(&data, &Theme::standard());
        assert_eq!(venn.circles[0].color, "#9fb665");
        assert_eq!(venn.circles[0].fill, "rgba(159, 182, 101, 0.4)");
        assert_eq!(venn.circles[1].color, "#e74c3c");
    }

    #[test]
    fn set_labels_push_outward_and_get_readable_fill() {
        let venn = layout(&sets(&[100.0, 100.0]), &Theme::standard());
        let (left, right) = (&venn.set_labels[0], &venn.set_labels[1]);
        assert!(left.x < venn.circles[0].cx);
        assert!(right.x > venn.circles[1].cx);
        assert_eq!(left.class, "set-label");
        assert_eq!(left.fill.as_deref(), Some("#000000"));
    }

    #[test]
    fn long_set_names_wrap() {
        let mut data = sets(&[100.0, 100.0]);
        data.sets[0].name = "Zen and the Art Of".to_string();
        let venn = layout(&data, &Theme::standard());
        assert_eq!(venn.set_labels[0].block.lines, vec!["Zen and the", "Art Of"]);
        assert_eq!(venn.circles[0].name, "Zen and the Art Of");
    }

    #[test]
    fn unknown_members_are_skipped() {
        let mut data = sets(&[100.0, 100.0]);
        data.intersections = vec![
            intersection(&["Set 1", "Nope"], None),
            intersection(&["Set 1", "Set 1"], None),
            intersection(&["Set 1", "Set 2"], None),
        ];
        let venn = layout(&data, &Theme::standard());
        assert_eq!(venn.intersections.len(), 1);
        assert_eq!(venn.intersections[0].label.block.lines, vec!["Both"]);
    }

    #[test]
    fn bracket_hangs_below_the_lowest_member() {
        let mut data = sets(&[100.0, 100.0]);
        data.intersections = vec![intersection(&["Set 1", "Set 2"], None)];
        let venn = layout(&data, &Theme::standard());
        let item = &venn.intersections[0];
        // Lens midpoint of two equal circles is the canvas center.
        assert!((item.anchor.x - 600.0).abs() < 0.01);
        assert!((item.anchor.y - 450.0).abs() < 0.01);
        let lowest = 450.0 + 135.0;
        let IntersectionConnector::Bracket { drop, bracket } = &item.connector else {
            panic!("expected bracket connector");
        };
        assert_eq!(drop[0], item.anchor);
        assert!(drop[1].y > lowest);
        assert!(bracket.iter().all(|p| p.y > lowest));
        assert!(item.badge.y > drop[1].y);
        assert!((item.label.x - item.badge.center().x).abs() < 0.01);
    }

    #[test]
    fn arrow_connector_points_into_the_overlap() {
        let mut data = sets(&[100.0, 100.0]);
        data.intersections = vec![intersection(&["Set 1", "Set 2"], Some(true))];
        let venn = layout(&data, &Theme::standard());
        let item = &venn.intersections[0];
        let IntersectionConnector::Arrow { line, head } = &item.connector else {
            panic!("expected arrow connector");
        };
        assert_eq!(head[0], item.anchor);
        assert_eq!(line[1], item.anchor);
        // Badge sits outside both circles.
        for circle in &venn.circles {
            let c = item.badge.center();
            let d = ((c.x - circle.cx).powi(2) + (c.y - circle.cy).powi(2)).sqrt();
            assert!(d > circle.r);
        }
    }

    #[test]
    fn nested_intersection_anchors_on_inner_circle() {
        let mut data = sets(&[100.0, 40.0]);
        data.intersections = vec![intersection(&["Set 1", "Set 2"], None)];
        let venn = layout(&data, &Theme::standard());
        let inner = &venn.circles[1];
        assert_eq!(venn.intersections[0].anchor, Point::new(inner.cx, inner.cy));
    }

    #[test]
    fn unlabeled_intersection_shows_size() {
        let mut data = sets(&[100.0, 100.0]);
        let mut spec = intersection(&["Set 1", "Set 2"], None);
        spec.label = None;
        data.intersections = vec![spec];
        let venn = layout(&data, &Theme::standard());
        assert_eq!(venn.intersections[0].label.block.lines, vec!["30"]);
    }
}
