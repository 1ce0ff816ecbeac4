use crate::ir::{LineStyle, MarkerShape, NodeShape};
use crate::path::{Path, Point};
use crate::theme::{TextAnchor, TextRole};

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned box; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Open-interval intersection on both axes; touching edges do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    pub fn inflate(&self, pad: f32) -> Rect {
        Rect::new(
            self.x - pad,
            self.y - pad,
            self.width + pad * 2.0,
            self.height + pad * 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

/// Text positioned on the canvas. `x`/`y` is the anchor point; lines are
/// vertically centered on `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub block: TextBlock,
    pub x: f32,
    pub y: f32,
    pub anchor: TextAnchor,
    pub role: TextRole,
    pub class: &'static str,
    pub line_height: f32,
    pub fill: Option<String>,
}

impl PlacedText {
    pub fn bounds(&self) -> Rect {
        let left = match self.anchor {
            TextAnchor::Start => self.x,
            TextAnchor::Middle => self.x - self.block.width / 2.0,
            TextAnchor::End => self.x - self.block.width,
        };
        Rect::new(left, self.y - self.block.height / 2.0, self.block.width, self.block.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub title: Option<PlacedText>,
    pub background: Option<String>,
    pub diagram: DiagramLayout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagramLayout {
    SetOverlap(VennLayout),
    NodeDiagram(NodeDiagramLayout),
    Plot(PlotLayout),
}

// ---------------------------------------------------------------------------
// Set overlap

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VennArrangement {
    SideBySide,
    Nested,
    Symmetric,
    Organic,
    Ring,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VennCircle {
    pub name: String,
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    /// Resolved stroke color; the fill is this color at reduced alpha.
    pub color: String,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntersectionConnector {
    /// Vertical drop from the overlap to an inverted-U bracket.
    Bracket { drop: [Point; 2], bracket: Vec<Point> },
    /// Line from the badge into the overlap, arrowhead at the overlap end.
    Arrow { line: [Point; 2], head: [Point; 3] },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionLayout {
    pub anchor: Point,
    pub connector: IntersectionConnector,
    pub badge: Rect,
    pub label: PlacedText,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VennLayout {
    pub arrangement: VennArrangement,
    pub circles: Vec<VennCircle>,
    pub set_labels: Vec<PlacedText>,
    pub intersections: Vec<IntersectionLayout>,
    pub textured: bool,
}

// ---------------------------------------------------------------------------
// Node diagram

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub shape: NodeShape,
    pub text: TextBlock,
    pub color: String,
    pub text_color: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutNode {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionLayout {
    pub from: String,
    pub to: String,
    pub start: Point,
    pub end: Point,
    pub arrowhead: [Point; 3],
    pub label: Option<PlacedText>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeDiagramLayout {
    pub nodes: Vec<LayoutNode>,
    pub connections: Vec<ConnectionLayout>,
    pub arrow_fill: String,
    pub caption: Option<PlacedText>,
    pub subtitle: Option<PlacedText>,
}

// ---------------------------------------------------------------------------
// Plot

/// Plotting rectangle plus the data ranges it maps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub x_range: [f32; 2],
    pub y_range: [f32; 2],
}

impl PlotArea {
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y + self.height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn to_pixel(&self, x: f32, y: f32) -> Point {
        let origin = self.origin();
        let x_span = self.x_range[1] - self.x_range[0];
        let y_span = self.y_range[1] - self.y_range[0];
        Point::new(
            origin.x + (x - self.x_range[0]) / x_span * self.width,
            origin.y - (y - self.y_range[0]) / y_span * self.height,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub vertical: Vec<f32>,
    pub horizontal: Vec<f32>,
    pub color: String,
    pub dash: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisMarker {
    pub text: &'static str,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxesLayout {
    pub x_label: PlacedText,
    pub y_label: PlacedText,
    pub markers: Vec<AxisMarker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotLineLayout {
    pub path: Path,
    pub color: String,
    pub width: f32,
    pub style: LineStyle,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLayout {
    pub shape: MarkerShape,
    pub center: Point,
    pub size: f32,
    pub color: String,
    pub label: Option<PlacedText>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLayout {
    pub point: Point,
    pub rect: Rect,
    pub text: PlacedText,
}

impl CaptionLayout {
    /// Connector runs from the data point to the box center.
    pub fn connector(&self) -> [Point; 2] {
        [self.point, self.rect.center()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegendSwatch {
    Line(LineStyle),
    Marker(MarkerShape),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    pub swatch: LegendSwatch,
    /// Vertical center of the row.
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendLayout {
    pub rect: Rect,
    pub entries: Vec<LegendEntry>,
    pub swatch_x: f32,
    pub swatch_width: f32,
    /// Left edge of the start-anchored entry labels.
    pub text_x: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotLayout {
    pub area: PlotArea,
    pub grid: Option<GridLayout>,
    pub axes: AxesLayout,
    pub lines: Vec<PlotLineLayout>,
    pub markers: Vec<MarkerLayout>,
    pub captions: Vec<CaptionLayout>,
    pub legend: Option<LegendLayout>,
}
