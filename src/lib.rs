#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod fuzzy;
pub mod ir;
pub mod layout;
pub mod path;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::Config;
pub use error::RenderError;
pub use ir::ChartSpec;
pub use theme::Theme;

use layout::compute_layout;
use path::Jitter;
use render::render_svg;

/// Per-render options. `theme` overrides both the spec's theme and the
/// configured one; `seed` makes organic rendering reproducible.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Option<String>,
    pub config: Config,
    pub seed: Option<u64>,
}

impl RenderOptions {
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn resolve_theme(&self, spec: &ChartSpec) -> Theme {
        match self.theme.as_deref().or(spec.theme.as_deref()) {
            Some(name) => theme::resolve_theme(Some(name)),
            None => self.config.theme.clone(),
        }
    }
}

pub fn render_chart(spec: &ChartSpec, options: &RenderOptions) -> Result<String, RenderError> {
    let theme = options.resolve_theme(spec);
    let mut jitter = Jitter::new(options.seed);
    let layout = compute_layout(spec, &theme, &options.config.layout, &mut jitter);
    let svg = render_svg(&layout, &theme);
    log::debug!(
        kind = spec.kind().name(),
        theme = theme.id.name(),
        seeded = options.seed.is_some(),
        bytes = svg.len();
        "rendered chart"
    );
    Ok(svg)
}

/// Parses a JSON chart spec and renders it.
pub fn render_json(input: &str, options: &RenderOptions) -> Result<String, RenderError> {
    let spec = ChartSpec::from_json(input)?;
    render_chart(&spec, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeId;

    const VENN: &str =
        r#"{ "type": "venn", "theme": "robotpony", "data": { "sets": ["A", "B"] } }"#;

    #[test]
    fn option_theme_beats_spec_theme() {
        let spec = ChartSpec::from_json(VENN).unwrap();
        let options = RenderOptions::default().with_theme("default");
        assert_eq!(options.resolve_theme(&spec).id, ThemeId::Default);
        assert_eq!(RenderOptions::default().resolve_theme(&spec).id, ThemeId::Robotpony);
    }

    #[test]
    fn config_theme_applies_when_nothing_else_names_one() {
        let spec =
            ChartSpec::from_json(r#"{ "type": "venn", "data": { "sets": ["A", "B"] } }"#).unwrap();
        let mut options = RenderOptions::default();
        options.config.theme = Theme::rp();
        assert_eq!(options.resolve_theme(&spec).id, ThemeId::Rp);
    }

    #[test]
    fn seeded_renders_are_identical() {
        let options = RenderOptions::default().with_seed(42);
        let a = render_json(VENN, &options).unwrap();
        let b = render_json(VENN, &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn odd_set_colors_render_as_given() {
        let input = r##"{ "type": "venn", "data": { "sets": [
            { "name": "A", "color": "#aéééa" },
            { "name": "B", "color": "#12" }
        ] } }"##;
        let svg = render_json(input, &RenderOptions::default().with_seed(3)).unwrap();
        assert!(svg.contains("#aéééa"));
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = render_json(r#"{ "type": "gantt" }"#, &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedChartKind(kind) if kind == "gantt"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = render_json("{ not json", &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSpec(_)));
    }
}
