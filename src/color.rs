use crate::fuzzy::closest_match;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

pub const BLACK: &str = "#000000";
pub const WHITE: &str = "#ffffff";

/// Minimum contrast for WCAG "AA" body text.
pub const AA_CONTRAST: f32 = 4.5;
const AAA_CONTRAST: f32 = 7.0;
const A_CONTRAST: f32 = 3.0;

const SUGGESTION_MAX_DISTANCE: usize = 2;

static NAMED_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("olive", "#9fb665"),
        ("orange", "#c8986b"),
        ("beige", "#d4c5a9"),
        ("blue", "#3498db"),
        ("red", "#e74c3c"),
        ("green", "#2ecc71"),
        ("purple", "#9b59b6"),
        ("yellow", "#f1c40f"),
        ("gray", "#95a5a6"),
        ("grey", "#95a5a6"),
        ("black", "#2c3e50"),
        ("white", "#ffffff"),
    ])
});

static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap());
static FUNCTIONAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i:rgba?|hsla?|url)\(.*\)$").unwrap());
static RGB_FN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:rgba?)\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[\d.]+\s*)?\)$")
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa` (alpha ignored) and `rgb()`/`rgba()`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex_digits(hex);
        }
        let caps = RGB_FN_RE.captures(value)?;
        let channel = |idx: usize| {
            let value = caps.get(idx)?.as_str().parse::<u16>().ok()?;
            Some(value.min(255) as u8)
        };
        Some(Self {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn relative_luminance(self) -> f32 {
        fn linear(channel: u8) -> f32 {
            let c = channel as f32 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }
}

fn parse_hex_digits(hex: &str) -> Option<Rgb> {
    if !hex.is_ascii() {
        return None;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        8 => hex[..6].to_string(),
        _ => return None,
    };
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(expanded.get(range)?, 16).ok();
    Some(Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Luminance of an arbitrary color string; unparseable colors count as black.
pub fn luminance(color: &str) -> f32 {
    Rgb::parse(color).map(Rgb::relative_luminance).unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContrastLevel {
    Aaa,
    Aa,
    A,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contrast {
    pub ratio: f32,
    pub level: ContrastLevel,
}

impl Contrast {
    pub fn passes(&self) -> bool {
        matches!(self.level, ContrastLevel::Aaa | ContrastLevel::Aa)
    }
}

pub fn contrast_ratio(foreground: &str, background: &str) -> Contrast {
    let fg = luminance(foreground);
    let bg = luminance(background);
    let ratio = (fg.max(bg) + 0.05) / (fg.min(bg) + 0.05);
    let level = if ratio >= AAA_CONTRAST {
        ContrastLevel::Aaa
    } else if ratio >= AA_CONTRAST {
        ContrastLevel::Aa
    } else if ratio >= A_CONTRAST {
        ContrastLevel::A
    } else {
        ContrastLevel::Fail
    };
    Contrast { ratio, level }
}

/// Black or white, whichever reads on `background`. Black wins when both pass.
pub fn accessible_foreground(background: &str) -> &'static str {
    let dark = contrast_ratio(BLACK, background);
    let light = contrast_ratio(WHITE, background);
    if dark.passes() {
        BLACK
    } else if light.passes() {
        WHITE
    } else if dark.ratio > light.ratio {
        BLACK
    } else {
        WHITE
    }
}

/// `rgba(r, g, b, alpha)` for a hex color, or the input unchanged when it is
/// not a parseable color.
pub fn with_alpha(color: &str, alpha: f32) -> String {
    match Rgb::parse(color) {
        Some(rgb) => format!("rgba({}, {}, {}, {alpha})", rgb.r, rgb.g, rgb.b),
        None => color.to_string(),
    }
}

/// `top` painted at `alpha` over `bottom`, as hex. Falls back to `top` when
/// either color is not parseable.
pub fn blend(top: &str, bottom: &str, alpha: f32) -> String {
    let (Some(a), Some(b)) = (Rgb::parse(top), Rgb::parse(bottom)) else {
        return top.to_string();
    };
    let alpha = alpha.clamp(0.0, 1.0);
    let mix = |fg: u8, bg: u8| (fg as f32 * alpha + bg as f32 * (1.0 - alpha)).round() as u8;
    Rgb {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
    }
    .to_hex()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorResolution {
    Named { name: String, hex: &'static str },
    Literal(String),
    Unknown { input: String, suggestion: Option<&'static str> },
}

impl ColorResolution {
    /// The value to emit into markup. Unknown names pass through so the
    /// viewer can still try them as CSS keywords.
    pub fn value(&self) -> &str {
        match self {
            Self::Named { hex, .. } => hex,
            Self::Literal(value) => value,
            Self::Unknown { input, .. } => input,
        }
    }

    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Unknown {
                input,
                suggestion: Some(suggestion),
            } => Some(format!("unknown color '{input}', did you mean '{suggestion}'?")),
            Self::Unknown {
                input,
                suggestion: None,
            } => Some(format!("unknown color '{input}'")),
            _ => None,
        }
    }
}

pub fn resolve_color(input: &str) -> ColorResolution {
    let trimmed = input.trim();
    if HEX_RE.is_match(trimmed) || FUNCTIONAL_RE.is_match(trimmed) {
        return ColorResolution::Literal(trimmed.to_string());
    }
    let key = trimmed.to_ascii_lowercase();
    if let Some((name, hex)) = NAMED_COLORS.get_key_value(key.as_str()) {
        return ColorResolution::Named {
            name: (*name).to_string(),
            hex,
        };
    }
    ColorResolution::Unknown {
        input: trimmed.to_string(),
        suggestion: closest_match(&key, known_color_names(), SUGGESTION_MAX_DISTANCE),
    }
}

/// Resolves a color for layout, logging a hint for unknown names.
pub fn color_value(input: &str) -> String {
    let resolution = resolve_color(input);
    if let Some(hint) = resolution.hint() {
        log::warn!(color = input; "{hint}");
    }
    resolution.value().to_string()
}

pub fn known_color_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = NAMED_COLORS.keys().copied().collect();
    names.sort_unstable();
    names
}
