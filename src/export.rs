use anyhow::Result;
use std::path::Path;

#[cfg(feature = "png")]
use crate::config::RenderConfig;

/// Output format inferred from a file extension. Anything other than `.png`
/// is written as SVG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    pub fn from_path(path: Option<&Path>) -> Self {
        let is_png = path
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png { Self::Png } else { Self::Svg }
    }
}

/// Writes the SVG to `output`, or to stdout when no path is given.
pub fn write_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
            log::info!(path:? = path, bytes = svg.len(); "wrote svg");
        }
        None => {
            print!("{svg}");
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let pixmap = rasterize(svg, render_cfg)?;
    pixmap.save_png(output)?;
    log::info!(
        path:? = output,
        width = pixmap.width(),
        height = pixmap.height();
        "wrote png"
    );
    Ok(())
}

#[cfg(feature = "png")]
fn rasterize(svg: &str, render_cfg: &RenderConfig) -> Result<resvg::tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let scale = if render_cfg.scale > 0.0 { render_cfg.scale } else { 1.0 };
    let size = tree
        .size()
        .to_int_size()
        .scale_by(scale)
        .ok_or_else(|| anyhow::anyhow!("Invalid raster size at scale {scale}"))?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    if let Some(background) = render_cfg.background.as_deref() {
        let value = crate::color::color_value(background);
        match crate::color::Rgb::parse(&value) {
            Some(rgb) => pixmap.fill(resvg::tiny_skia::Color::from_rgba8(rgb.r, rgb.g, rgb.b, 255)),
            None => {
                log::warn!(background = background; "unparseable raster background, leaving transparent")
            }
        }
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    Ok(pixmap)
}
