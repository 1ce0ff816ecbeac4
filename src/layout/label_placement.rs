// Label collision avoidance. Pure geometry: boxes in, positions out.

use super::text::measure_bounds;
use super::Rect;
use crate::config::TextConfig;
use crate::path::Point;
use crate::theme::{TextAnchor, TextStyle};
use std::f32::consts::TAU;

/// A label to be placed: its anchor point and the size of its box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub anchor: TextAnchor,
}

impl LabelElement {
    pub fn for_text(text: &str, style: &TextStyle, x: f32, y: f32) -> Self {
        let bounds = measure_bounds(text, style, x, y);
        Self {
            x,
            y,
            width: bounds.width,
            height: bounds.height,
            anchor: style.anchor,
        }
    }

    /// A box of the given size centered on (`x`, `y`).
    pub fn boxed(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            anchor: TextAnchor::Middle,
        }
    }

    pub fn bounds_at(&self, x: f32, y: f32) -> Rect {
        let left = match self.anchor {
            TextAnchor::Start => x,
            TextAnchor::Middle => x - self.width / 2.0,
            TextAnchor::End => x - self.width,
        };
        Rect::new(left, y - self.height / 2.0, self.width, self.height)
    }
}

/// Places elements in input order, moving each off anything already placed.
pub fn resolve_collisions(elements: &[LabelElement], config: &TextConfig) -> Vec<Point> {
    place_labels(&[], elements, config)
}

/// Same as [`resolve_collisions`] with fixed obstacles placed up front.
///
/// Each element first tries its own position, then up to
/// `collision_attempts` probes around it: probe `k` sits at angle
/// `k * 2π / 8` and distance `base + k * step`. The first free spot wins;
/// if none is free the last probe is kept.
pub fn place_labels(
    obstacles: &[Rect],
    elements: &[LabelElement],
    config: &TextConfig,
) -> Vec<Point> {
    let mut placed: Vec<Rect> = obstacles.to_vec();
    let mut positions = Vec::with_capacity(elements.len());

    for element in elements {
        let mut position = Point::new(element.x, element.y);
        let mut attempt = 0;
        loop {
            let bounds = element.bounds_at(position.x, position.y);
            if !placed.iter().any(|other| bounds.overlaps(other)) {
                break;
            }
            if attempt >= config.collision_attempts {
                break;
            }
            let angle = attempt as f32 * TAU / 8.0;
            let distance = config.collision_base_distance + attempt as f32 * config.collision_step;
            position = Point::new(
                element.x + angle.cos() * distance,
                element.y + angle.sin() * distance,
            );
            attempt += 1;
        }
        placed.push(element.bounds_at(position.x, position.y));
        positions.push(position);
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TextConfig {
        TextConfig::default()
    }

    #[test]
    fn separated_elements_keep_positions() {
        let elements = [
            LabelElement::boxed(100.0, 100.0, 40.0, 14.0),
            LabelElement::boxed(400.0, 300.0, 40.0, 14.0),
        ];
        let positions = resolve_collisions(&elements, &config());
        assert_eq!(positions, vec![Point::new(100.0, 100.0), Point::new(400.0, 300.0)]);
    }

    #[test]
    fn overlapping_element_moves_to_first_free_probe() {
        let elements = [
            LabelElement::boxed(100.0, 100.0, 20.0, 10.0),
            LabelElement::boxed(100.0, 100.0, 20.0, 10.0),
        ];
        let cfg = config();
        let positions = resolve_collisions(&elements, &cfg);
        assert_eq!(positions[0], Point::new(100.0, 100.0));
        // Probe 0 only touches the first box, so probe 1 (45 degrees out) wins.
        let distance = cfg.collision_base_distance + cfg.collision_step;
        let offset = distance * std::f32::consts::FRAC_1_SQRT_2;
        assert!((positions[1].x - (100.0 + offset)).abs() < 1e-3);
        assert!((positions[1].y - (100.0 + offset)).abs() < 1e-3);
        let a = elements[0].bounds_at(positions[0].x, positions[0].y);
        let b = elements[1].bounds_at(positions[1].x, positions[1].y);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn edge_touching_neighbor_is_moved() {
        let elements = [
            LabelElement::boxed(100.0, 100.0, 20.0, 20.0),
            LabelElement::boxed(120.0, 100.0, 20.0, 20.0),
        ];
        let positions = resolve_collisions(&elements, &config());
        assert_ne!(positions[1], Point::new(120.0, 100.0));
    }

    #[test]
    fn exhausted_probes_keep_last_candidate() {
        let wall = Rect::new(-1000.0, -1000.0, 2000.0, 2000.0);
        let elements = [LabelElement::boxed(0.0, 0.0, 10.0, 10.0)];
        let cfg = config();
        let positions = place_labels(&[wall], &elements, &cfg);
        let last = cfg.collision_attempts - 1;
        let angle = last as f32 * TAU / 8.0;
        let distance = cfg.collision_base_distance + last as f32 * cfg.collision_step;
        assert!((positions[0].x - angle.cos() * distance).abs() < 1e-3);
        assert!((positions[0].y - angle.sin() * distance).abs() < 1e-3);
    }

    #[test]
    fn obstacles_push_labels_away() {
        let node = Rect::centered(100.0, 100.0, 60.0, 30.0);
        let elements = [LabelElement::boxed(100.0, 100.0, 20.0, 10.0)];
        let positions = place_labels(&[node], &elements, &config());
        let bounds = elements[0].bounds_at(positions[0].x, positions[0].y);
        assert!(!bounds.overlaps(&node));
    }

    #[test]
    fn start_anchored_bounds_extend_right() {
        let element = LabelElement {
            x: 10.0,
            y: 10.0,
            width: 30.0,
            height: 10.0,
            anchor: TextAnchor::Start,
        };
        assert_eq!(element.bounds_at(10.0, 10.0), Rect::new(10.0, 5.0, 30.0, 10.0));
    }
}
