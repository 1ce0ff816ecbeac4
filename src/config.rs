use crate::theme::{Theme, ThemeId};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VennConfig {
    /// Circle radius as a fraction of the shorter canvas side.
    pub radius_fraction: f32,
    /// Center offset as a fraction of the radius.
    pub offset_fraction: f32,
    /// Below this smaller/larger size ratio two sets are drawn nested.
    pub nested_ratio_threshold: f32,
    pub nested_min_scale: f32,
    /// Per-index radius scales for the organic three-set layout.
    pub organic_scales: [f32; 3],
    /// Per-index center offsets (in offsets) for the organic three-set layout.
    pub organic_offsets: [[f32; 2]; 3],
    pub label_wrap_chars: usize,
    pub label_padding: f32,
    pub bracket_gap: f32,
    pub bracket_depth: f32,
    pub bracket_half_width: f32,
    pub arrow_distance: f32,
    pub badge_padding_x: f32,
    pub badge_height: f32,
}

impl Default for VennConfig {
    fn default() -> Self {
        Self {
            radius_fraction: 0.15,
            offset_fraction: 0.7,
            nested_ratio_threshold: 0.8,
            nested_min_scale: 0.3,
            organic_scales: [1.0, 0.85, 0.92],
            organic_offsets: [[-0.15, -1.05], [-0.95, 0.55], [1.0, 0.4]],
            label_wrap_chars: 12,
            label_padding: 20.0,
            bracket_gap: 30.0,
            bracket_depth: 12.0,
            bracket_half_width: 40.0,
            arrow_distance: 70.0,
            badge_padding_x: 10.0,
            badge_height: 22.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeConfig {
    pub glyph_width: f32,
    pub line_height: f32,
    pub padding_x: f32,
    pub padding_y: f32,
    pub diamond_min: [f32; 2],
    pub rectangle_min: [f32; 2],
    pub start_y: f32,
    pub vertical_spacing: f32,
    pub arrow_length: f32,
    /// Half-angle of the arrowhead in degrees.
    pub arrow_angle: f32,
    pub label_offset: f32,
    pub caption_inset: f32,
    pub subtitle_gap: f32,
    pub diamond_fill: String,
    pub node_fill: String,
    pub arrow_fill: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            glyph_width: 8.0,
            line_height: 16.0,
            padding_x: 40.0,
            padding_y: 20.0,
            diamond_min: [120.0, 80.0],
            rectangle_min: [100.0, 40.0],
            start_y: 100.0,
            vertical_spacing: 120.0,
            arrow_length: 8.0,
            arrow_angle: 30.0,
            label_offset: 5.0,
            caption_inset: 60.0,
            subtitle_gap: 20.0,
            diamond_fill: "#4a5568".to_string(),
            node_fill: "#8b4513".to_string(),
            arrow_fill: "#2c3e50".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlotConfig {
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub grid_divisions: usize,
    pub grid_color: String,
    pub caption_char_width: f32,
    pub caption_padding: f32,
    pub caption_height: f32,
    pub caption_offset: f32,
    pub legend_row_height: f32,
    pub legend_inset: f32,
    pub legend_swatch: f32,
    pub marker_size: f32,
    pub line_width: f32,
    pub axis_label_offset: f32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            margin_top: 60.0,
            margin_right: 80.0,
            margin_bottom: 80.0,
            margin_left: 80.0,
            grid_divisions: 10,
            grid_color: "#e0e0e0".to_string(),
            caption_char_width: 7.0,
            caption_padding: 16.0,
            caption_height: 18.0,
            caption_offset: 20.0,
            legend_row_height: 20.0,
            legend_inset: 10.0,
            legend_swatch: 20.0,
            marker_size: 6.0,
            line_width: 2.0,
            axis_label_offset: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextConfig {
    pub collision_attempts: usize,
    pub collision_base_distance: f32,
    pub collision_step: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            collision_attempts: 8,
            collision_base_distance: 20.0,
            collision_step: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub title_y: f32,
    pub venn: VennConfig,
    pub node: NodeConfig,
    pub plot: PlotConfig,
    pub text: TextConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            canvas_height: 900.0,
            title_y: 30.0,
            venn: VennConfig::default(),
            node: NodeConfig::default(),
            plot: PlotConfig::default(),
            text: TextConfig::default(),
        }
    }
}

/// Raster parameters for the PNG exporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub scale: f32,
    pub background: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::standard(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    #[serde(default)]
    layout: Option<LayoutConfig>,
    #[serde(default)]
    render: Option<RenderConfig>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed = parse_config(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match ThemeId::from_token(theme_name) {
            Some(id) => config.theme = Theme::for_id(id),
            None => {
                log::warn!(theme = theme_name; "config names an unknown theme, keeping default")
            }
        }
    }
    if let Some(layout) = parsed.layout {
        config.layout = layout;
    }
    if let Some(render) = parsed.render {
        config.render = render;
    }
    log::debug!(path:? = path; "loaded config");
    Ok(config)
}

fn parse_config(contents: &str) -> anyhow::Result<ConfigFile> {
    Ok(json5::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.canvas_width, 1200.0);
        assert_eq!(config.layout.canvas_height, 900.0);
        assert_eq!(config.layout.venn.nested_ratio_threshold, 0.8);
        assert_eq!(config.theme.id, ThemeId::Default);
    }

    #[test]
    fn json5_config_overrides_nested_fields() {
        let parsed = parse_config(
            r#"{
                // comments and trailing commas are fine
                theme: "rp",
                layout: {
                    canvasWidth: 800,
                    venn: { nestedRatioThreshold: 0.5, },
                },
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.theme.as_deref(), Some("rp"));
        let layout = parsed.layout.unwrap();
        assert_eq!(layout.canvas_width, 800.0);
        assert_eq!(layout.canvas_height, 900.0);
        assert_eq!(layout.venn.nested_ratio_threshold, 0.5);
        assert_eq!(layout.venn.radius_fraction, 0.15);
    }

    #[test]
    fn load_config_reads_file() {
        let dir = std::env::temp_dir().join(format!("graphinate-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json5");
        std::fs::write(&path, "{ theme: 'robotpony', render: { scale: 2 } }").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.theme.id, ThemeId::Robotpony);
        assert_eq!(config.render.scale, 2.0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
