use crate::error::RenderError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

pub const DEFAULT_SET_SIZE: f32 = 100.0;
pub const DEFAULT_RANGE: [f32; 2] = [0.0, 10.0];
const DEFAULT_OVERLAP_SIZE: f32 = 30.0;

static SET_SHORTHAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*\(([^()]+)\)\s*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    SetOverlap,
    NodeDiagram,
    Plot,
}

impl ChartKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "venn" | "set-overlap" => Some(Self::SetOverlap),
            "flowchart" | "node-diagram" => Some(Self::NodeDiagram),
            "plot" => Some(Self::Plot),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SetOverlap => "venn",
            Self::NodeDiagram => "flowchart",
            Self::Plot => "plot",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: Option<String>,
    pub theme: Option<String>,
    pub data: ChartData,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    SetOverlap(SetOverlapData),
    NodeDiagram(NodeDiagramData),
    Plot(PlotData),
}

#[derive(Debug, Deserialize)]
struct ChartSpecFile {
    #[serde(alias = "type")]
    kind: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
    /// Front-matter style documents keep the diagram fields at the top level.
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

impl ChartSpec {
    pub fn kind(&self) -> ChartKind {
        match self.data {
            ChartData::SetOverlap(_) => ChartKind::SetOverlap,
            ChartData::NodeDiagram(_) => ChartKind::NodeDiagram,
            ChartData::Plot(_) => ChartKind::Plot,
        }
    }

    pub fn from_json(input: &str) -> Result<Self, RenderError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, RenderError> {
        let file: ChartSpecFile = serde_json::from_value(value)?;
        let kind = ChartKind::from_token(&file.kind)
            .ok_or_else(|| RenderError::UnsupportedChartKind(file.kind.clone()))?;
        let payload = file
            .data
            .unwrap_or(serde_json::Value::Object(file.rest));
        let data = match kind {
            ChartKind::SetOverlap => ChartData::SetOverlap(serde_json::from_value(payload)?),
            ChartKind::NodeDiagram => ChartData::NodeDiagram(serde_json::from_value(payload)?),
            ChartKind::Plot => ChartData::Plot(serde_json::from_value(payload)?),
        };
        Ok(Self {
            title: file.title,
            theme: file.theme,
            data,
        })
    }
}

// ---------------------------------------------------------------------------
// Set overlap

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "SetOverlapFile")]
pub struct SetOverlapData {
    pub sets: Vec<SetSpec>,
    pub intersections: Vec<IntersectionSpec>,
    pub background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetOverlapFile {
    #[serde(default)]
    sets: Vec<SetSpec>,
    #[serde(default)]
    intersections: Vec<IntersectionSpec>,
    #[serde(default)]
    background: Option<String>,
    /// Shorthand for one intersection of every set.
    #[serde(default)]
    overlap: Option<String>,
}

impl From<SetOverlapFile> for SetOverlapData {
    fn from(file: SetOverlapFile) -> Self {
        let mut intersections = file.intersections;
        if let Some(label) = file.overlap {
            intersections.push(IntersectionSpec {
                member_names: file.sets.iter().map(|set| set.name.clone()).collect(),
                size: DEFAULT_OVERLAP_SIZE,
                label: Some(label),
                has_arrow: None,
            });
        }
        Self {
            sets: file.sets,
            intersections,
            background: file.background,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "SetEntry")]
pub struct SetSpec {
    pub name: String,
    pub size: f32,
    pub color: Option<String>,
}

impl SetSpec {
    pub fn new(name: impl Into<String>, size: f32) -> Self {
        Self {
            name: name.into(),
            size,
            color: None,
        }
    }

    /// Parses `"Best Practices (olive)"` into a name and a color.
    pub fn from_shorthand(text: &str) -> Self {
        match SET_SHORTHAND_RE.captures(text) {
            Some(caps) => Self {
                name: caps[1].trim().to_string(),
                size: DEFAULT_SET_SIZE,
                color: Some(caps[2].trim().to_string()),
            },
            None => Self::new(text.trim(), DEFAULT_SET_SIZE),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SetEntry {
    Shorthand(String),
    Full {
        name: String,
        #[serde(default)]
        size: Option<f32>,
        #[serde(default)]
        color: Option<String>,
    },
}

impl From<SetEntry> for SetSpec {
    fn from(entry: SetEntry) -> Self {
        match entry {
            SetEntry::Shorthand(text) => Self::from_shorthand(&text),
            SetEntry::Full { name, size, color } => Self {
                name,
                size: size.filter(|size| *size > 0.0).unwrap_or(DEFAULT_SET_SIZE),
                color,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntersectionSpec {
    #[serde(alias = "sets")]
    pub member_names: Vec<String>,
    #[serde(default)]
    pub size: f32,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub has_arrow: Option<bool>,
}

impl IntersectionSpec {
    /// Text shown in the badge: the label, or the size when unlabeled.
    pub fn display_text(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format_number(self.size),
        }
    }
}

// ---------------------------------------------------------------------------
// Node diagram

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeShape {
    Diamond,
    #[default]
    Rectangle,
    Circle,
}

impl NodeShape {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "diamond" | "decision" => Some(Self::Diamond),
            "rectangle" | "rect" | "box" => Some(Self::Rectangle),
            "circle" | "oval" => Some(Self::Circle),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for NodeShape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::from_token(&token).unwrap_or_else(|| {
            log::debug!(shape = token.as_str(); "unknown node shape, using rectangle");
            Self::default()
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub id: String,
    #[serde(default, alias = "type")]
    pub shape: NodeShape,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSpec {
    #[serde(alias = "from")]
    pub from_id: String,
    #[serde(alias = "to")]
    pub to_id: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDiagramData {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub connections: Vec<ConnectionSpec>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

// ---------------------------------------------------------------------------
// Plot

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
    DashDot,
}

impl LineStyle {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "solid" => Some(Self::Solid),
            "dotted" => Some(Self::Dotted),
            "dashed" => Some(Self::Dashed),
            "dash-dot" | "dashdot" => Some(Self::DashDot),
            _ => None,
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dotted => "dotted",
            Self::Dashed => "dashed",
            Self::DashDot => "dash-dot",
        }
    }
}

impl<'de> Deserialize<'de> for LineStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::from_token(&token).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    Triangle,
    Diamond,
    Cross,
}

impl MarkerShape {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "circle" | "dot" => Some(Self::Circle),
            "square" => Some(Self::Square),
            "triangle" => Some(Self::Triangle),
            "diamond" => Some(Self::Diamond),
            "cross" | "x" | "plus" => Some(Self::Cross),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for MarkerShape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::from_token(&token).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

impl LegendPosition {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "top-left" | "topleft" => Some(Self::TopLeft),
            "top-right" | "topright" => Some(Self::TopRight),
            "bottom-left" | "bottomleft" => Some(Self::BottomLeft),
            "bottom-right" | "bottomright" => Some(Self::BottomRight),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for LegendPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::from_token(&token).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineSpec {
    #[serde(default)]
    pub style: LineStyle,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub points: Vec<[f32; 2]>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarkerSpec {
    #[serde(default)]
    pub shape: MarkerShape,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub size: Option<f32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaptionSpec {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GridSpec {
    #[serde(default = "default_true")]
    pub show: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub style: Option<LineStyle>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegendSpec {
    #[serde(default = "default_true")]
    pub show: bool,
    #[serde(default)]
    pub position: LegendPosition,
}

fn default_true() -> bool {
    true
}

fn default_range() -> [f32; 2] {
    DEFAULT_RANGE
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "PlotFile")]
pub struct PlotData {
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub x_range: [f32; 2],
    pub y_range: [f32; 2],
    pub lines: Vec<LineSpec>,
    pub markers: Vec<MarkerSpec>,
    pub captions: Vec<CaptionSpec>,
    pub grid: Option<GridSpec>,
    pub legend: Option<LegendSpec>,
    pub background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlotFile {
    #[serde(default, alias = "x_axis", alias = "xAxis")]
    x_axis_label: String,
    #[serde(default, alias = "y_axis", alias = "yAxis")]
    y_axis_label: String,
    #[serde(default = "default_range", alias = "x_range")]
    x_range: [f32; 2],
    #[serde(default = "default_range", alias = "y_range")]
    y_range: [f32; 2],
    #[serde(default)]
    lines: Vec<LineSpec>,
    #[serde(default)]
    line: Option<LineSpec>,
    #[serde(default)]
    markers: Vec<MarkerSpec>,
    #[serde(default)]
    captions: Vec<CaptionSpec>,
    #[serde(default)]
    grid: Option<GridSpec>,
    #[serde(default)]
    legend: Option<LegendSpec>,
    #[serde(default)]
    background: Option<String>,
}

impl From<PlotFile> for PlotData {
    fn from(file: PlotFile) -> Self {
        let mut lines = file.lines;
        lines.extend(file.line);
        Self {
            x_axis_label: file.x_axis_label,
            y_axis_label: file.y_axis_label,
            x_range: ordered_range(file.x_range, "x"),
            y_range: ordered_range(file.y_range, "y"),
            lines,
            markers: file.markers,
            captions: file.captions,
            grid: file.grid,
            legend: file.legend,
            background: file.background,
        }
    }
}

/// Ranges must satisfy `min < max`; anything else maps to the default.
fn ordered_range(range: [f32; 2], axis: &str) -> [f32; 2] {
    if range.iter().all(|v| v.is_finite()) && range[0] < range[1] {
        range
    } else {
        log::warn!(axis = axis, min = range[0], max = range[1]; "invalid axis range, using default");
        DEFAULT_RANGE
    }
}

/// Formats a number without a trailing `.0` for whole values.
pub fn format_number(value: f32) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unsupported_kind_is_reported() {
        for kind in ["bar", "line", "pie", "gantt"] {
            let err = ChartSpec::from_value(json!({ "type": kind, "data": {} })).unwrap_err();
            assert!(matches!(err, RenderError::UnsupportedChartKind(ref k) if k == kind));
        }
    }

    #[test]
    fn set_overlap_defaults_and_shorthand() {
        let spec = ChartSpec::from_value(json!({
            "kind": "venn",
            "data": {
                "sets": [
                    { "name": "A" },
                    "Best Practices (olive)"
                ],
                "intersections": [{ "sets": ["A", "Best Practices"], "size": 30 }]
            }
        }))
        .unwrap();
        let ChartData::SetOverlap(data) = spec.data else {
            panic!("expected set overlap data");
        };
        assert_eq!(data.sets[0].size, DEFAULT_SET_SIZE);
        assert_eq!(data.sets[1].name, "Best Practices");
        assert_eq!(data.sets[1].color.as_deref(), Some("olive"));
        assert_eq!(data.intersections[0].member_names.len(), 2);
        assert_eq!(data.intersections[0].display_text(), "30");
    }

    #[test]
    fn overlap_shorthand_adds_intersection_of_all_sets() {
        let spec = ChartSpec::from_value(json!({
            "type": "venn",
            "sets": ["Code", "Coffee"],
            "overlap": "Programmers"
        }))
        .unwrap();
        let ChartData::SetOverlap(data) = spec.data else {
            panic!("expected set overlap data");
        };
        assert_eq!(data.intersections.len(), 1);
        assert_eq!(data.intersections[0].member_names, vec!["Code", "Coffee"]);
        assert_eq!(data.intersections[0].display_text(), "Programmers");
    }

    #[test]
    fn node_shapes_fall_back_to_rectangle() {
        let spec = ChartSpec::from_value(json!({
            "type": "flowchart",
            "data": {
                "nodes": [
                    { "id": "a", "type": "hexagon", "text": "A" },
                    { "id": "b", "shape": "oval", "text": "B" },
                    { "id": "c", "text": "C" }
                ],
                "connections": [{ "from": "a", "to": "b" }]
            }
        }))
        .unwrap();
        let ChartData::NodeDiagram(data) = spec.data else {
            panic!("expected node diagram data");
        };
        assert_eq!(data.nodes[0].shape, NodeShape::Rectangle);
        assert_eq!(data.nodes[1].shape, NodeShape::Circle);
        assert_eq!(data.nodes[2].shape, NodeShape::Rectangle);
        assert_eq!(data.connections[0].from_id, "a");
    }

    #[test]
    fn plot_accepts_single_line_and_snake_case_fields() {
        let spec = ChartSpec::from_value(json!({
            "type": "plot",
            "data": {
                "x_axis": "Effort",
                "y_axis": "Reward",
                "line": { "style": "wavy", "points": [[0, 0], [10, 10]] },
                "markers": [{ "shape": "star", "x": 1, "y": 2 }],
                "legend": { "position": "middle" },
                "captions": []
            }
        }))
        .unwrap();
        let ChartData::Plot(data) = spec.data else {
            panic!("expected plot data");
        };
        assert_eq!(data.x_axis_label, "Effort");
        assert_eq!(data.x_range, DEFAULT_RANGE);
        assert_eq!(data.lines.len(), 1);
        assert_eq!(data.lines[0].style, LineStyle::Solid);
        assert_eq!(data.markers[0].shape, MarkerShape::Circle);
        assert_eq!(data.legend.map(|l| l.position), Some(LegendPosition::TopRight));
    }

    #[test]
    fn inverted_ranges_fall_back_to_default() {
        let spec = ChartSpec::from_value(json!({
            "type": "plot",
            "data": { "xRange": [5, 5], "yRange": [-10, 40] }
        }))
        .unwrap();
        let ChartData::Plot(data) = spec.data else {
            panic!("expected plot data");
        };
        assert_eq!(data.x_range, DEFAULT_RANGE);
        assert_eq!(data.y_range, [-10.0, 40.0]);
    }

    #[test]
    fn format_number_trims_whole_values() {
        assert_eq!(format_number(30.0), "30");
        assert_eq!(format_number(2.5), "2.5");
    }
}
