//! Color-name mapping for stored style strings.
//!
//! # Invariants
//! - Parsing never fails: unknown names fall back to `FALLBACK_COLOR`.
//! - Hex input keeps only the low 24 bits, like `0xRRGGBB`.

pub const FALLBACK_COLOR: &str = "blue";

/// Named palette accepted in style strings, in display order.
pub const PALETTE: &[&str] = &[
    "red", "orange", "yellow", "green", "mint", "teal", "cyan", "blue", "indigo", "purple",
    "pink", "brown", "gray", "black", "white",
];

/// Colors offered as app theme accents.
pub const THEME_COLOR_NAMES: &[&str] = &[
    "red", "orange", "yellow", "green", "mint", "teal", "cyan", "blue", "indigo", "purple", "pink",
];

/// Two-stop gradient offered as a background choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientTheme {
    pub name: &'static str,
    pub colors: [&'static str; 2],
}

pub const GRADIENT_THEMES: &[GradientTheme] = &[
    GradientTheme {
        name: "蓝紫渐变",
        colors: ["blue", "purple"],
    },
    GradientTheme {
        name: "橙红渐变",
        colors: ["orange", "red"],
    },
    GradientTheme {
        name: "绿蓝渐变",
        colors: ["green", "blue"],
    },
    GradientTheme {
        name: "紫粉渐变",
        colors: ["purple", "pink"],
    },
    GradientTheme {
        name: "黄橙渐变",
        colors: ["yellow", "orange"],
    },
    GradientTheme {
        name: "薄荷渐变",
        colors: ["mint", "teal"],
    },
];

/// Platform-adaptive colors that follow light/dark mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemColor {
    Background,
    Label,
}

/// Renderer-facing interpretation of a stored color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpec {
    Named(&'static str),
    System(SystemColor),
    Rgb { red: u8, green: u8, blue: u8 },
}

impl ColorSpec {
    /// Normalized string form suitable for storing back on a record.
    pub fn to_style_string(self) -> String {
        match self {
            Self::Named(name) => name.to_string(),
            Self::System(SystemColor::Background) => "system.background".to_string(),
            Self::System(SystemColor::Label) => "system.label".to_string(),
            Self::Rgb { red, green, blue } => format!("#{red:02X}{green:02X}{blue:02X}"),
        }
    }
}

/// Interprets a stored color string.
pub fn parse_color(value: &str) -> ColorSpec {
    let lowered = value.trim().to_ascii_lowercase();

    if let Some(name) = PALETTE.iter().copied().find(|name| *name == lowered) {
        return ColorSpec::Named(name);
    }

    match lowered.as_str() {
        "system.background" => ColorSpec::System(SystemColor::Background),
        "system.label" => ColorSpec::System(SystemColor::Label),
        hex if hex.starts_with('#') => parse_hex(hex),
        _ => ColorSpec::Named(FALLBACK_COLOR),
    }
}

// Reads the leading run of hex digits; no digits means black.
fn parse_hex(value: &str) -> ColorSpec {
    let digits: String = value
        .trim_start_matches('#')
        .chars()
        .take_while(char::is_ascii_hexdigit)
        .take(16)
        .collect();
    let rgb = u64::from_str_radix(&digits, 16).unwrap_or(0);

    ColorSpec::Rgb {
        red: ((rgb & 0xFF_0000) >> 16) as u8,
        green: ((rgb & 0x00_FF00) >> 8) as u8,
        blue: (rgb & 0x00_00FF) as u8,
    }
}
