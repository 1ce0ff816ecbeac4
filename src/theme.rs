use crate::color::with_alpha;
use crate::fuzzy::closest_match;
use once_cell::sync::Lazy;
use std::collections::HashMap;

const THEME_SUGGESTION_DISTANCE: usize = 2;

/// Font stacks shared by the built-in themes.
static FONT_STACKS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("sans", "Arial, sans-serif"),
        ("helvetica", "\"Helvetica Neue\", Arial, sans-serif"),
        (
            "pixelated",
            "\"Courier New\", Monaco, Consolas, \"Lucida Console\", monospace",
        ),
        (
            "comic-mono",
            "\"Courier Prime\", \"Courier New\", Monaco, Consolas, monospace",
        ),
        (
            "comic-title",
            "\"Blambot Casual\", \"Comic Sans MS\", \"Marker Felt\", Chalkduster, cursive",
        ),
    ])
});

pub fn font_stack(key: &str) -> &'static str {
    FONT_STACKS.get(key).copied().unwrap_or("Arial, sans-serif")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeId {
    Default,
    Rp,
    Robotpony,
}

impl ThemeId {
    pub const ALL: [ThemeId; 3] = [ThemeId::Default, ThemeId::Rp, ThemeId::Robotpony];

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "default" => Some(Self::Default),
            "rp" => Some(Self::Rp),
            "robotpony" => Some(Self::Robotpony),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Rp => "rp",
            Self::Robotpony => "robotpony",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Default => "Basic styling with standard colors",
            Self::Rp => "Clean, professional styling for technical documentation",
            Self::Robotpony => "Comic style with vintage textures and bold typography",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

impl Palette {
    /// Fill for the n-th set/line when the spec leaves the color open.
    pub fn series_color(&self, index: usize) -> &str {
        match index % 5 {
            0 => &self.primary,
            1 => &self.secondary,
            2 => &self.accent,
            3 => "#9b59b6",
            _ => "#f1c40f",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextShadow {
    pub dx: f32,
    pub dy: f32,
    pub blur: f32,
    pub color: String,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextOutline {
    pub width: f32,
    pub color: String,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: String,
    pub line_height: f32,
    pub letter_spacing: f32,
    pub anchor: TextAnchor,
    pub fill: String,
    pub shadows: Vec<TextShadow>,
    pub outline: Option<TextOutline>,
}

impl TextStyle {
    fn plain(
        font_family: &str,
        font_size: f32,
        font_weight: &str,
        anchor: TextAnchor,
        fill: &str,
    ) -> Self {
        Self {
            font_family: font_family.to_string(),
            font_size,
            font_weight: font_weight.to_string(),
            line_height: 1.2,
            letter_spacing: 0.0,
            anchor,
            fill: fill.to_string(),
            shadows: Vec::new(),
            outline: None,
        }
    }

    fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    fn letter_spacing(mut self, letter_spacing: f32) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    fn shadow(mut self, dx: f32, dy: f32, blur: f32, color: &str, opacity: f32) -> Self {
        self.shadows.push(TextShadow {
            dx,
            dy,
            blur,
            color: color.to_string(),
            opacity,
        });
        self
    }

    fn outline(mut self, width: f32, color: &str, opacity: f32) -> Self {
        self.outline = Some(TextOutline {
            width,
            color: color.to_string(),
            opacity,
        });
        self
    }

    pub fn css(&self) -> String {
        let mut out = format!(
            "font-family: {}; font-size: {}px; font-weight: {}; text-anchor: {}; fill: {};",
            self.font_family,
            self.font_size,
            self.font_weight,
            self.anchor.as_str(),
            self.fill
        );
        if self.letter_spacing > 0.0 {
            out.push_str(&format!(" letter-spacing: {}px;", self.letter_spacing));
        }
        out
    }

    pub fn line_advance(&self) -> f32 {
        self.font_size * self.line_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRole {
    Title,
    Heading,
    Body,
    Caption,
    Label,
    Axis,
    Emphasis,
}

impl TextRole {
    pub const ALL: [TextRole; 7] = [
        TextRole::Title,
        TextRole::Heading,
        TextRole::Body,
        TextRole::Caption,
        TextRole::Label,
        TextRole::Axis,
        TextRole::Emphasis,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Heading => "heading",
            Self::Body => "body",
            Self::Caption => "caption",
            Self::Label => "label",
            Self::Axis => "axis",
            Self::Emphasis => "emphasis",
        }
    }

    /// Style sheet classes that take their font from this role.
    pub fn classes(self) -> &'static [&'static str] {
        match self {
            Self::Title => &["chart-title"],
            Self::Heading => &["set-label", "flowchart-subtitle"],
            Self::Body => &["node-text", "legend-text"],
            Self::Caption => &["caption-text", "intersection-label"],
            Self::Label => &["connection-label", "marker-label"],
            Self::Axis => &["axis-label", "axis-marker"],
            Self::Emphasis => &["flowchart-caption"],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Typography {
    pub title: TextStyle,
    pub heading: TextStyle,
    pub body: TextStyle,
    pub caption: TextStyle,
    pub label: TextStyle,
    pub axis: TextStyle,
    pub emphasis: TextStyle,
}

impl Typography {
    pub fn get(&self, role: TextRole) -> &TextStyle {
        match role {
            TextRole::Title => &self.title,
            TextRole::Heading => &self.heading,
            TextRole::Body => &self.body,
            TextRole::Caption => &self.caption,
            TextRole::Label => &self.label,
            TextRole::Axis => &self.axis,
            TextRole::Emphasis => &self.emphasis,
        }
    }
}

/// How intersection annotations attach when the entry does not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorStyle {
    Bracket,
    Arrow,
}

/// Layout-relevant switches; layout code branches on these, never on names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutCapabilities {
    pub organic_circle_layout: bool,
    pub organic_lines: bool,
    /// Paper texture, gradients and drop shadows.
    pub decorated: bool,
    pub watermark: bool,
    pub connector_style: ConnectorStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyles {
    pub venn_circle: String,
    pub intersection_badge: String,
    pub connector_line: String,
    pub axis_line: String,
    pub plot_line: String,
    pub caption_box: String,
    pub caption_connector: String,
    pub line_color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub id: ThemeId,
    pub palette: Palette,
    pub typography: Typography,
    pub shapes: ShapeStyles,
    pub capabilities: LayoutCapabilities,
}

impl Theme {
    pub fn for_id(id: ThemeId) -> Self {
        match id {
            ThemeId::Default => Self::standard(),
            ThemeId::Rp => Self::rp(),
            ThemeId::Robotpony => Self::robotpony(),
        }
    }

    pub fn standard() -> Self {
        let sans = font_stack("sans");
        Self {
            id: ThemeId::Default,
            palette: Palette {
                primary: "#3498db".to_string(),
                secondary: "#e74c3c".to_string(),
                accent: "#2ecc71".to_string(),
                background: "#ffffff".to_string(),
                text: "#333333".to_string(),
            },
            typography: Typography {
                title: TextStyle::plain(sans, 20.0, "bold", TextAnchor::Middle, "#333333"),
                heading: TextStyle::plain(sans, 14.0, "normal", TextAnchor::Middle, "#333333"),
                body: TextStyle::plain(sans, 14.0, "normal", TextAnchor::Middle, "#333333"),
                caption: TextStyle::plain(sans, 11.0, "bold", TextAnchor::Middle, "#ffffff"),
                label: TextStyle::plain(sans, 12.0, "normal", TextAnchor::Middle, "#333333"),
                axis: TextStyle::plain(sans, 14.0, "normal", TextAnchor::Middle, "#333333"),
                emphasis: TextStyle::plain(sans, 16.0, "bold", TextAnchor::Middle, "#333333"),
            },
            shapes: ShapeStyles {
                venn_circle: "stroke-width: 2;".to_string(),
                intersection_badge: "fill: #666; stroke: #666; stroke-width: 1;".to_string(),
                connector_line: "stroke: #666; stroke-width: 1; fill: none;".to_string(),
                axis_line: "stroke: #333; stroke-width: 2; fill: none;".to_string(),
                plot_line: "stroke: #333; stroke-width: 2; fill: none;".to_string(),
                caption_box: "fill: #666; stroke: #666; stroke-width: 1;".to_string(),
                caption_connector: "stroke: #333; stroke-width: 1; fill: none;".to_string(),
                line_color: "#333333".to_string(),
            },
            capabilities: LayoutCapabilities {
                organic_circle_layout: false,
                organic_lines: false,
                decorated: false,
                watermark: false,
                connector_style: ConnectorStyle::Bracket,
            },
        }
    }

    pub fn rp() -> Self {
        let helvetica = font_stack("helvetica");
        Self {
            id: ThemeId::Rp,
            palette: Palette {
                primary: "#3498db".to_string(),
                secondary: "#e74c3c".to_string(),
                accent: "#2ecc71".to_string(),
                background: "#ffffff".to_string(),
                text: "#2c3e50".to_string(),
            },
            typography: Typography {
                title: TextStyle::plain(helvetica, 24.0, "300", TextAnchor::Middle, "#2c3e50"),
                heading: TextStyle::plain(helvetica, 16.0, "500", TextAnchor::Middle, "#34495e"),
                body: TextStyle::plain(helvetica, 14.0, "normal", TextAnchor::Middle, "#2c3e50"),
                caption: TextStyle::plain(helvetica, 12.0, "600", TextAnchor::Middle, "#ffffff"),
                label: TextStyle::plain(helvetica, 14.0, "600", TextAnchor::Middle, "#2c3e50"),
                axis: TextStyle::plain(helvetica, 14.0, "500", TextAnchor::Middle, "#2c3e50"),
                emphasis: TextStyle::plain(helvetica, 16.0, "bold", TextAnchor::Middle, "#2c3e50"),
            },
            shapes: ShapeStyles {
                venn_circle: "stroke-width: 3;".to_string(),
                intersection_badge: "fill: #34495e; stroke: #34495e; stroke-width: 2;".to_string(),
                connector_line: "stroke: #34495e; stroke-width: 2; fill: none;".to_string(),
                axis_line: "stroke: #2c3e50; stroke-width: 2; fill: none;".to_string(),
                plot_line: "stroke: #2c3e50; stroke-width: 3; fill: none;".to_string(),
                caption_box: "fill: #34495e; stroke: #34495e; stroke-width: 2;".to_string(),
                caption_connector: "stroke: #2c3e50; stroke-width: 2; fill: none;".to_string(),
                line_color: "#2c3e50".to_string(),
            },
            capabilities: LayoutCapabilities {
                organic_circle_layout: false,
                organic_lines: false,
                decorated: false,
                watermark: false,
                connector_style: ConnectorStyle::Bracket,
            },
        }
    }

    pub fn robotpony() -> Self {
        let pixelated = font_stack("pixelated");
        Self {
            id: ThemeId::Robotpony,
            palette: Palette {
                primary: "#9fb665".to_string(),
                secondary: "#c8986b".to_string(),
                accent: "#7ba23f".to_string(),
                background: "#d4c5a9".to_string(),
                text: "#333333".to_string(),
            },
            typography: Typography {
                title: TextStyle::plain(pixelated, 24.0, "700", TextAnchor::Middle, "#2f2f2f")
                    .letter_spacing(1.0)
                    .shadow(2.0, 2.0, 0.0, "#ffffff", 0.8)
                    .shadow(3.0, 3.0, 2.0, "#000000", 0.3)
                    .outline(1.0, "#2c3e50", 0.7),
                heading: TextStyle::plain(pixelated, 16.0, "700", TextAnchor::Middle, "#2f2f2f")
                    .line_height(1.3)
                    .letter_spacing(2.0)
                    .shadow(1.0, 1.0, 0.0, "#ffffff", 0.8),
                body: TextStyle::plain(pixelated, 14.0, "700", TextAnchor::Middle, "#2f2f2f")
                    .line_height(1.5)
                    .letter_spacing(1.0),
                caption: TextStyle::plain(
                    font_stack("comic-mono"),
                    11.0,
                    "700",
                    TextAnchor::Middle,
                    "#ffffff",
                )
                .line_height(1.3)
                .letter_spacing(1.0)
                .shadow(1.0, 1.0, 0.0, "#000000", 0.3),
                label: TextStyle::plain(pixelated, 12.0, "700", TextAnchor::Middle, "#ffffff")
                    .letter_spacing(1.0)
                    .shadow(1.0, 1.0, 0.0, "#000000", 0.8)
                    .outline(1.0, "#2c3e50", 0.9),
                axis: TextStyle::plain(pixelated, 14.0, "bold", TextAnchor::Middle, "#333333")
                    .letter_spacing(1.0),
                emphasis: TextStyle::plain(
                    font_stack("comic-title"),
                    20.0,
                    "900",
                    TextAnchor::Middle,
                    "#d4c5a9",
                )
                .line_height(1.1)
                .letter_spacing(3.0)
                .shadow(3.0, 3.0, 0.0, "#2c3e50", 1.0)
                .shadow(2.0, 2.0, 4.0, "#000000", 0.5)
                .outline(3.0, "#2c3e50", 1.0),
            },
            shapes: ShapeStyles {
                venn_circle: "stroke-width: 2; opacity: 0.8;".to_string(),
                intersection_badge: "fill: #2c3e50; stroke: #2c3e50; stroke-width: 2;".to_string(),
                connector_line: "stroke: #2c3e50; stroke-width: 2; fill: none;".to_string(),
                axis_line: "stroke: #333; stroke-width: 2; fill: none;".to_string(),
                plot_line: "stroke: #333; stroke-width: 2; fill: none;".to_string(),
                caption_box: "fill: #2c3e50; stroke: #2c3e50; stroke-width: 1;".to_string(),
                caption_connector: "stroke: #333; stroke-width: 1; fill: none;".to_string(),
                line_color: "#2c3e50".to_string(),
            },
            capabilities: LayoutCapabilities {
                organic_circle_layout: true,
                organic_lines: true,
                decorated: true,
                watermark: true,
                connector_style: ConnectorStyle::Bracket,
            },
        }
    }

    pub fn text(&self, role: TextRole) -> &TextStyle {
        self.typography.get(role)
    }

    /// `filter` attribute value for text of the given role, if the theme
    /// defines an effect for it.
    pub fn text_filter(&self, role: TextRole) -> Option<String> {
        let style = self.typography.get(role);
        if !style.shadows.is_empty() {
            Some(format!("url(#text-shadow-{})", role.key()))
        } else if style.outline.is_some() {
            Some(format!("url(#text-outline-{})", role.key()))
        } else {
            None
        }
    }

    /// CSS rules for every text role and shape class.
    pub fn style_sheet(&self) -> String {
        let mut css = String::new();
        for role in TextRole::ALL {
            let rule = self.typography.get(role).css();
            for class in role.classes() {
                css.push_str(&format!(".{class} {{ {rule} }}\n"));
            }
        }

        let shapes = &self.shapes;
        let line = &shapes.line_color;
        css.push_str(&format!(".venn-circle {{ {} }}\n", shapes.venn_circle));
        css.push_str(&format!(".intersection-badge {{ {} }}\n", shapes.intersection_badge));
        css.push_str(&format!(".connector-line {{ {} }}\n", shapes.connector_line));
        css.push_str(&format!(".axis-line {{ {} }}\n", shapes.axis_line));
        css.push_str(&format!(".plot-line {{ {} }}\n", shapes.plot_line));
        css.push_str(&format!(".caption-box {{ {} }}\n", shapes.caption_box));
        css.push_str(&format!(".caption-connector {{ {} }}\n", shapes.caption_connector));
        css.push_str(&format!(".flowchart-shape {{ stroke: {line}; stroke-width: 2; }}\n"));
        css.push_str(&format!(
            ".connection-line {{ stroke: {line}; stroke-width: 2; fill: none; }}\n"
        ));
        css.push_str(&format!(".arrowhead {{ fill: {line}; stroke: none; }}\n"));
        css.push_str(".grid-line { stroke-width: 1; fill: none; }\n");
        css.push_str(&format!(
            ".legend-box {{ fill: {}; stroke: {line}; stroke-width: 1; opacity: 0.9; }}\n",
            self.palette.background
        ));
        css.push_str(&format!(".plot-marker {{ stroke: {line}; stroke-width: 1; }}\n"));
        css.push_str(".venn-texture { pointer-events: none; }\n");

        let series = [
            ("set-a", &self.palette.primary),
            ("set-b", &self.palette.secondary),
            ("set-c", &self.palette.accent),
        ];
        for (class, color) in series {
            css.push_str(&format!(
                ".venn-circle.{class} {{ fill: {}; stroke: {color}; }}\n",
                with_alpha(color, 0.4)
            ));
        }
        css
    }

    /// Shadow and outline filters for the typography roles that declare them.
    pub fn text_effect_defs(&self) -> String {
        let mut defs = String::new();
        for role in TextRole::ALL {
            let style = self.typography.get(role);
            if !style.shadows.is_empty() {
                defs.push_str(&format!(
                    r#"<filter id="text-shadow-{}" x="-50%" y="-50%" width="200%" height="200%">"#,
                    role.key()
                ));
                for shadow in &style.shadows {
                    defs.push_str(&format!(
                        r#"<feDropShadow dx="{}" dy="{}" stdDeviation="{}" flood-color="{}" flood-opacity="{}"/>"#,
                        shadow.dx, shadow.dy, shadow.blur, shadow.color, shadow.opacity
                    ));
                }
                defs.push_str("</filter>");
            }
            if let Some(outline) = &style.outline {
                defs.push_str(&format!(
                    r#"<filter id="text-outline-{}" x="-50%" y="-50%" width="200%" height="200%"><feMorphology operator="dilate" radius="{}"/><feFlood flood-color="{}" flood-opacity="{}"/><feComposite in="SourceGraphic"/></filter>"#,
                    role.key(),
                    outline.width,
                    outline.color,
                    outline.opacity
                ));
            }
        }
        defs
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::standard()
    }
}

/// Resolves a theme name, falling back to the default theme on unknown names.
pub fn resolve_theme(name: Option<&str>) -> Theme {
    let Some(name) = name else {
        return Theme::standard();
    };
    match ThemeId::from_token(name) {
        Some(id) => Theme::for_id(id),
        None => {
            let suggestion = theme_suggestion(name);
            match suggestion {
                Some(suggestion) => log::warn!(
                    theme = name, suggestion = suggestion;
                    "unknown theme, falling back to default (did you mean '{suggestion}'?)"
                ),
                None => log::warn!(theme = name; "unknown theme, falling back to default"),
            }
            Theme::standard()
        }
    }
}

pub fn theme_suggestion(name: &str) -> Option<&'static str> {
    closest_match(
        name,
        ThemeId::ALL.iter().map(|id| id.name()),
        THEME_SUGGESTION_DISTANCE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_theme_falls_back_to_default() {
        let theme = resolve_theme(Some("neon"));
        assert_eq!(theme.id, ThemeId::Default);
        assert_eq!(resolve_theme(None).id, ThemeId::Default);
        assert_eq!(resolve_theme(Some("RobotPony")).id, ThemeId::Robotpony);
    }

    #[test]
    fn theme_suggestion_finds_near_misses() {
        assert_eq!(theme_suggestion("robotpny"), Some("robotpony"));
        assert_eq!(theme_suggestion("r"), Some("rp"));
        assert_eq!(theme_suggestion("corporate"), None);
    }

    #[test]
    fn style_sheet_covers_every_role_and_shape_class() {
        let css = Theme::standard().style_sheet();
        for class in [
            ".chart-title",
            ".set-label",
            ".venn-circle",
            ".intersection-label",
            ".intersection-badge",
            ".connector-line",
            ".axis-line",
            ".axis-label",
            ".plot-line",
            ".caption-box",
            ".caption-text",
            ".caption-connector",
            ".flowchart-shape",
            ".connection-line",
            ".arrowhead",
            ".grid-line",
            ".legend-box",
            ".plot-marker",
        ] {
            assert!(css.contains(class), "missing {class}");
        }
        assert!(css.contains(".venn-circle.set-a { fill: rgba(52, 152, 219, 0.4)"));
    }

    #[test]
    fn capabilities_drive_robotpony_variants() {
        let robotpony = Theme::robotpony();
        assert!(robotpony.capabilities.organic_circle_layout);
        assert!(robotpony.capabilities.organic_lines);
        assert!(robotpony.capabilities.watermark);
        let rp = Theme::rp();
        assert!(!rp.capabilities.organic_circle_layout);
        assert!(!rp.capabilities.decorated);
    }

    #[test]
    fn text_effects_only_for_themes_that_declare_them() {
        assert!(Theme::standard().text_effect_defs().is_empty());
        let robotpony = Theme::robotpony();
        let defs = robotpony.text_effect_defs();
        assert!(defs.contains(r#"id="text-shadow-title""#));
        assert!(defs.contains(r#"id="text-outline-emphasis""#));
        assert_eq!(
            robotpony.text_filter(TextRole::Title).as_deref(),
            Some("url(#text-shadow-title)")
        );
        assert_eq!(robotpony.text_filter(TextRole::Axis), None);
    }
}
