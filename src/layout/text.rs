use crate::theme::{TextAnchor, TextStyle};

use super::{Rect, TextBlock};

/// Average glyph width as a fraction of the font size.
pub const GLYPH_WIDTH_RATIO: f32 = 0.6;

pub fn split_lines(text: &str) -> Vec<String> {
    let normalized = text
        .replace("<br/>", "\n")
        .replace("<br>", "\n")
        .replace("\\n", "\n");
    normalized.split('\n').map(|line| line.trim().to_string()).collect()
}

fn longest_line_chars(lines: &[String]) -> usize {
    lines.iter().map(|line| line.chars().count()).max().unwrap_or(0)
}

/// Approximate on-canvas extent of `text` anchored at (`x`, `y`).
pub fn measure_bounds(text: &str, style: &TextStyle, x: f32, y: f32) -> Rect {
    let lines = split_lines(text);
    let width = longest_line_chars(&lines) as f32 * style.font_size * GLYPH_WIDTH_RATIO;
    let height = lines.len() as f32 * style.line_advance();
    let left = match style.anchor {
        TextAnchor::Start => x,
        TextAnchor::Middle => x - width / 2.0,
        TextAnchor::End => x - width,
    };
    Rect::new(left, y - height / 2.0, width, height)
}

pub fn measure_label(text: &str, style: &TextStyle) -> TextBlock {
    let mut lines = split_lines(text);
    if lines.is_empty() {
        lines.push(String::new());
    }
    let width = longest_line_chars(&lines) as f32 * style.font_size * GLYPH_WIDTH_RATIO;
    let height = lines.len() as f32 * style.line_advance();
    TextBlock {
        lines,
        width,
        height,
    }
}

/// Greedy line breaking on whitespace and hyphens. Text that already fits,
/// or already carries explicit breaks, is returned unchanged.
pub fn wrap(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars || split_lines(text).len() > 1 {
        return text.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for token in tokenize(text) {
        let fits = current.chars().count() + token.chars().count() <= max_chars;
        if !fits && !current.trim().is_empty() {
            lines.push(current.trim().to_string());
            current.clear();
        }
        current.push_str(token);
    }
    if !current.trim().is_empty() || lines.is_empty() {
        lines.push(current.trim().to_string());
    }

    let wrapped = lines.join("\n");
    if wrapped.is_empty() {
        text.to_string()
    } else {
        wrapped
    }
}

/// Splits into words and whitespace runs, keeping every piece. A hyphen
/// stays attached to the word before it.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            tokens.push(&text[start..idx]);
            start = idx;
        }
        in_space = Some(space);
        if ch == '-' {
            tokens.push(&text[start..idx + 1]);
            start = idx + 1;
            in_space = None;
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}
