use graphinate::{RenderOptions, render_json};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartRenderOptions {
    theme: Option<String>,
    seed: Option<u64>,
    width: Option<f32>,
    height: Option<f32>,
}

fn build_render_options(options: ChartRenderOptions) -> RenderOptions {
    let mut render_options = RenderOptions {
        theme: options.theme,
        seed: options.seed,
        ..RenderOptions::default()
    };
    if let Some(width) = options.width {
        render_options.config.layout.canvas_width = width;
    }
    if let Some(height) = options.height {
        render_options.config.layout.canvas_height = height;
    }
    render_options
}

#[wasm_bindgen]
pub fn render_chart_svg(spec_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ChartRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ChartRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_json(spec_json, &render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}
