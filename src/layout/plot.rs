use super::label_placement::{LabelElement, place_labels};
use super::text::GLYPH_WIDTH_RATIO;
use super::{
    AxesLayout, AxisMarker, CaptionLayout, GridLayout, LegendEntry, LegendLayout, LegendSwatch,
    MarkerLayout, PlotArea, PlotLayout, PlotLineLayout, Rect, place_text,
};
use crate::color::color_value;
use crate::config::{LayoutConfig, PlotConfig};
use crate::ir::{CaptionSpec, GridSpec, LegendPosition, LegendSpec, LineStyle, PlotData};
use crate::path::{Jitter, Point, organic_path, smooth_path};
use crate::theme::{Theme, TextRole};

const MARKER_LABEL_GAP: f32 = 10.0;
const LEGEND_TEXT_GAP: f32 = 8.0;

pub(super) fn compute_plot_layout(
    data: &PlotData,
    theme: &Theme,
    config: &LayoutConfig,
    jitter: &mut Jitter,
) -> PlotLayout {
    let plot = &config.plot;
    let area = PlotArea {
        x: plot.margin_left,
        y: plot.margin_top,
        width: config.canvas_width - plot.margin_left - plot.margin_right,
        height: config.canvas_height - plot.margin_top - plot.margin_bottom,
        x_range: data.x_range,
        y_range: data.y_range,
    };

    let grid = data
        .grid
        .as_ref()
        .filter(|grid| grid.show)
        .map(|grid| layout_grid(grid, &area, plot));
    let axes = layout_axes(data, &area, theme, plot);

    let mut lines = Vec::new();
    for (idx, line) in data.lines.iter().enumerate() {
        if line.points.len() < 2 {
            log::debug!(
                index = idx,
                points = line.points.len();
                "skipping plot line with fewer than two points"
            );
            continue;
        }
        let points: Vec<Point> = line.points.iter().map(|&[x, y]| area.to_pixel(x, y)).collect();
        let path = if theme.capabilities.organic_lines {
            organic_path(&points, jitter)
        } else {
            smooth_path(&points)
        };
        let color = match line.color.as_deref() {
            Some(color) => color_value(color),
            None if idx == 0 => theme.shapes.line_color.clone(),
            None => theme.palette.series_color(idx).to_string(),
        };
        lines.push(PlotLineLayout {
            path,
            color,
            width: line.width.unwrap_or(plot.line_width),
            style: line.style,
            label: line.label.clone(),
        });
    }

    let mut markers: Vec<MarkerLayout> = data
        .markers
        .iter()
        .enumerate()
        .map(|(idx, marker)| MarkerLayout {
            shape: marker.shape,
            center: area.to_pixel(marker.x, marker.y),
            size: marker.size.unwrap_or(plot.marker_size),
            color: match marker.color.as_deref() {
                Some(color) => color_value(color),
                None => theme.palette.series_color(idx).to_string(),
            },
            label: None,
        })
        .collect();

    let mut occupied: Vec<Rect> = markers
        .iter()
        .map(|marker| {
            let side = marker.size * 2.0;
            Rect::centered(marker.center.x, marker.center.y, side, side)
        })
        .collect();
    let label_style = theme.text(TextRole::Label);
    let pending: Vec<(usize, &str)> = data
        .markers
        .iter()
        .enumerate()
        .filter_map(|(idx, marker)| marker.label.as_deref().map(|label| (idx, label)))
        .collect();
    let elements: Vec<LabelElement> = pending
        .iter()
        .map(|&(idx, label)| {
            let marker = &markers[idx];
            LabelElement::for_text(
                label,
                label_style,
                marker.center.x,
                marker.center.y - marker.size - MARKER_LABEL_GAP,
            )
        })
        .collect();
    let positions = place_labels(&occupied, &elements, &config.text);
    for (&(idx, label), position) in pending.iter().zip(positions) {
        let text = place_text(
            theme,
            TextRole::Label,
            "marker-label",
            label,
            position.x,
            position.y,
        );
        occupied.push(text.bounds());
        markers[idx].label = Some(text);
    }

    let mut captions = Vec::new();
    for caption in &data.captions {
        let layout = layout_caption(caption, &area, theme, config, &occupied);
        occupied.push(layout.rect);
        captions.push(layout);
    }

    let legend = data
        .legend
        .as_ref()
        .filter(|legend| legend.show)
        .and_then(|legend| layout_legend(legend, &lines, &markers, &area, theme, plot));

    PlotLayout {
        area,
        grid,
        axes,
        lines,
        markers,
        captions,
        legend,
    }
}

fn grid_dash(style: LineStyle) -> Option<&'static str> {
    match style {
        LineStyle::Solid => None,
        LineStyle::Dotted => Some("2,2"),
        LineStyle::Dashed => Some("5,5"),
        LineStyle::DashDot => Some("5,3,2,3"),
    }
}

/// Interior lines only; the axes cover the outer edges.
fn layout_grid(grid: &GridSpec, area: &PlotArea, plot: &PlotConfig) -> GridLayout {
    let divisions = plot.grid_divisions.max(1);
    let step = |span: f32, idx: usize| span * idx as f32 / divisions as f32;
    GridLayout {
        vertical: (1..divisions).map(|idx| area.x + step(area.width, idx)).collect(),
        horizontal: (1..divisions).map(|idx| area.y + step(area.height, idx)).collect(),
        color: color_value(grid.color.as_deref().unwrap_or(&plot.grid_color)),
        dash: grid_dash(grid.style.unwrap_or(LineStyle::Dotted)),
    }
}

fn layout_axes(data: &PlotData, area: &PlotArea, theme: &Theme, plot: &PlotConfig) -> AxesLayout {
    let origin = area.origin();
    let right = area.x + area.width;
    let x_label = place_text(
        theme,
        TextRole::Axis,
        "axis-label",
        &data.x_axis_label,
        area.x + area.width / 2.0,
        origin.y + plot.axis_label_offset,
    );
    let y_label = place_text(
        theme,
        TextRole::Axis,
        "axis-label",
        &data.y_axis_label,
        origin.x - plot.axis_label_offset,
        area.y + area.height / 2.0,
    );
    let markers = vec![
        AxisMarker {
            text: "+",
            x: right + 10.0,
            y: origin.y + 5.0,
        },
        AxisMarker {
            text: "+",
            x: origin.x - 10.0,
            y: area.y - 5.0,
        },
        AxisMarker {
            text: "-",
            x: origin.x - 10.0,
            y: origin.y + 5.0,
        },
        AxisMarker {
            text: "-",
            x: right + 10.0,
            y: origin.y + 20.0,
        },
    ];
    AxesLayout {
        x_label,
        y_label,
        markers,
    }
}

/// Box to the right of the point, flipped left or vertically when it would
/// leave the plot rectangle, then nudged off earlier boxes.
fn layout_caption(
    caption: &CaptionSpec,
    area: &PlotArea,
    theme: &Theme,
    config: &LayoutConfig,
    occupied: &[Rect],
) -> CaptionLayout {
    let plot = &config.plot;
    let point = area.to_pixel(caption.x, caption.y);
    let chars = caption.text.chars().count() as f32;
    let width = chars * plot.caption_char_width + plot.caption_padding;
    let height = plot.caption_height;
    let gap = plot.caption_offset;

    let mut box_x = point.x + gap;
    let mut box_y = point.y - height / 2.0;
    if box_x + width > area.x + area.width {
        box_x = point.x - width - gap;
    }
    if box_y < area.y {
        box_y = point.y + gap;
    }
    if box_y + height > area.y + area.height {
        box_y = point.y - height - gap;
    }

    let preferred = Rect::new(box_x, box_y, width, height).center();
    let placed = place_labels(
        occupied,
        &[LabelElement::boxed(preferred.x, preferred.y, width, height)],
        &config.text,
    )
    .first()
    .copied()
    .unwrap_or(preferred);
    let rect = Rect::centered(placed.x, placed.y, width, height);
    let text = place_text(
        theme,
        TextRole::Caption,
        "caption-text",
        &caption.text,
        placed.x,
        placed.y,
    );
    CaptionLayout { point, rect, text }
}

fn layout_legend(
    legend: &LegendSpec,
    lines: &[PlotLineLayout],
    markers: &[MarkerLayout],
    area: &PlotArea,
    theme: &Theme,
    plot: &PlotConfig,
) -> Option<LegendLayout> {
    let mut entries: Vec<(String, String, LegendSwatch)> = lines
        .iter()
        .filter_map(|line| {
            let label = line.label.as_ref()?;
            Some((label.clone(), line.color.clone(), LegendSwatch::Line(line.style)))
        })
        .collect();
    entries.extend(markers.iter().filter_map(|marker| {
        let label = marker.label.as_ref()?.block.lines.join(" ");
        Some((label, marker.color.clone(), LegendSwatch::Marker(marker.shape)))
    }));
    if entries.is_empty() {
        return None;
    }

    let style = theme.text(TextRole::Body);
    let longest = entries
        .iter()
        .map(|(label, _, _)| label.chars().count())
        .max()
        .unwrap_or(0) as f32;
    let inset = plot.legend_inset;
    let text_width = longest * style.font_size * GLYPH_WIDTH_RATIO;
    let width = inset * 2.0 + plot.legend_swatch + LEGEND_TEXT_GAP + text_width;
    let height = inset + entries.len() as f32 * plot.legend_row_height;

    let left = match legend.position {
        LegendPosition::TopLeft | LegendPosition::BottomLeft => area.x + inset,
        LegendPosition::TopRight | LegendPosition::BottomRight => {
            area.x + area.width - inset - width
        }
    };
    let top = match legend.position {
        LegendPosition::TopLeft | LegendPosition::TopRight => area.y + inset,
        LegendPosition::BottomLeft | LegendPosition::BottomRight => {
            area.y + area.height - inset - height
        }
    };
    let rect = Rect::new(left, top, width, height);

    let entries = entries
        .into_iter()
        .enumerate()
        .map(|(row, (label, color, swatch))| LegendEntry {
            label,
            color,
            swatch,
            y: top + inset / 2.0 + plot.legend_row_height * (row as f32 + 0.5),
        })
        .collect();

    Some(LegendLayout {
        rect,
        entries,
        swatch_x: left + inset,
        swatch_width: plot.legend_swatch,
        text_x: left + inset + plot.legend_swatch + LEGEND_TEXT_GAP,
    })
}
