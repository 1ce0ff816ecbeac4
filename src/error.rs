use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The chart kind token names no diagram the engine can draw.
    #[error("unsupported chart kind '{0}' (expected one of: venn, flowchart, plot)")]
    UnsupportedChartKind(String),

    #[error("invalid chart spec: {0}")]
    InvalidSpec(#[from] serde_json::Error),
}
