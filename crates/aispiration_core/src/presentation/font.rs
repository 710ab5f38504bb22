//! Font catalog for quote cards.

/// How a catalog key is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace<'a> {
    /// Platform system font with a design variant.
    System(SystemDesign),
    /// Named font family installed on the device.
    Family(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemDesign {
    Default,
    Serif,
    Rounded,
    Monospaced,
}

/// Catalog entry: storage key, display name, face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontEntry {
    pub key: &'static str,
    pub display_name: &'static str,
    pub face: FontFace<'static>,
}

pub const FONT_CATALOG: &[FontEntry] = &[
    FontEntry {
        key: "system",
        display_name: "系统",
        face: FontFace::System(SystemDesign::Default),
    },
    FontEntry {
        key: "serif",
        display_name: "衬线",
        face: FontFace::System(SystemDesign::Serif),
    },
    FontEntry {
        key: "rounded",
        display_name: "圆角",
        face: FontFace::System(SystemDesign::Rounded),
    },
    FontEntry {
        key: "monospaced",
        display_name: "等宽",
        face: FontFace::System(SystemDesign::Monospaced),
    },
    FontEntry {
        key: "pingfang",
        display_name: "苹方",
        face: FontFace::Family("PingFang SC"),
    },
    FontEntry {
        key: "songti",
        display_name: "宋体",
        face: FontFace::Family("Songti SC"),
    },
    FontEntry {
        key: "heiti",
        display_name: "黑体",
        face: FontFace::Family("Heiti SC"),
    },
    FontEntry {
        key: "kaiti",
        display_name: "楷体",
        face: FontFace::Family("Kaiti SC"),
    },
    FontEntry {
        key: "yuanti",
        display_name: "圆体",
        face: FontFace::Family("Yuanti SC"),
    },
];

pub fn catalog_entry(key: &str) -> Option<&'static FontEntry> {
    FONT_CATALOG.iter().find(|entry| entry.key == key)
}

/// Resolves a stored font name. Unknown names are treated as raw families.
pub fn resolve_font(name: &str) -> FontFace<'_> {
    catalog_entry(name).map_or(FontFace::Family(name), |entry| entry.face)
}

/// Display label for a stored font name; raw families show as-is.
pub fn display_name(name: &str) -> &str {
    catalog_entry(name).map_or(name, |entry| entry.display_name)
}
