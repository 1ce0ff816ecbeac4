use crate::config::load_config;
use crate::export::{OutputFormat, write_svg};
use crate::ir::ChartSpec;
use crate::theme::ThemeId;
use crate::{RenderOptions, render_chart};
use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(
    name = "graphinate",
    version,
    about = "Render Venn diagrams, flowcharts and plots from JSON chart specs"
)]
pub struct Args {
    /// Input chart spec (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to SVG on stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Theme name; overrides the spec and the config file
    #[arg(short = 't', long = "theme")]
    pub theme: Option<String>,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Seed for organic themes; omit for a fresh variation each run
    #[arg(short = 's', long = "seed")]
    pub seed: Option<u64>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Raster scale for PNG output
    #[arg(long = "scale")]
    pub scale: Option<f32>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,

    /// Print the available themes and exit
    #[arg(long = "list-themes")]
    pub list_themes: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    if args.list_themes {
        for id in ThemeId::ALL {
            println!("{:<10} {}", id.name(), id.description());
        }
        return Ok(());
    }

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.layout.canvas_width = width;
    }
    if let Some(height) = args.height {
        config.layout.canvas_height = height;
    }
    if let Some(scale) = args.scale {
        config.render.scale = scale;
    }

    let input = read_input(args.input.as_deref())?;
    let spec = ChartSpec::from_json(&input)?;
    let options = RenderOptions {
        theme: args.theme.clone(),
        config,
        seed: args.seed,
    };
    let svg = render_chart(&spec, &options)?;

    match OutputFormat::from_path(args.output.as_deref()) {
        OutputFormat::Svg => write_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => write_png_output(&svg, args.output.as_deref(), &options)?,
    }
    Ok(())
}

fn init_logging(level: &str) {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .format_timestamp(None)
        .try_init();
    log::debug!(log_level:?; "logger initialized");
}

#[cfg(feature = "png")]
fn write_png_output(svg: &str, output: Option<&Path>, options: &RenderOptions) -> Result<()> {
    let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
    crate::export::write_png(svg, output, &options.config.render)
}

#[cfg(not(feature = "png"))]
fn write_png_output(_svg: &str, _output: Option<&Path>, _options: &RenderOptions) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the 'png' feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
