//! # Color themes
//!
//! A theme is a pair of background and foreground colors. Every theme
//! has an inverted twin under the upper-case name, e.g. `"BLUE"` draws
//! background-colored text on a foreground-colored page.

use image::Rgb;

/// The theme used when no (known) name is given
pub const DEFAULT_THEME: &str = "brown";

/// Background and foreground color of a cover
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ColorTheme {
    /// Page and frame fill
    pub background: Rgb<u8>,
    /// Frame stroke and text
    pub foreground: Rgb<u8>,
}

const fn theme(background: [u8; 3], foreground: [u8; 3]) -> ColorTheme {
    ColorTheme {
        background: Rgb(background),
        foreground: Rgb(foreground),
    }
}

const BROWN: ColorTheme = theme([203, 185, 148], [51, 46, 37]);
const RED: ColorTheme = theme([196, 78, 70], [250, 241, 232]);
const GREEN: ColorTheme = theme([142, 168, 128], [33, 48, 31]);
const BLUE: ColorTheme = theme([84, 116, 168], [239, 243, 250]);
const GRAY: ColorTheme = theme([176, 176, 176], [38, 38, 38]);

static CATALOG: [(&str, ColorTheme); 10] = [
    ("brown", BROWN),
    ("red", RED),
    ("green", GREEN),
    ("blue", BLUE),
    ("gray", GRAY),
    ("BROWN", BROWN.inverted()),
    ("RED", RED.inverted()),
    ("GREEN", GREEN.inverted()),
    ("BLUE", BLUE.inverted()),
    ("GRAY", GRAY.inverted()),
];

impl ColorTheme {
    /// Swap background and foreground
    pub const fn inverted(self) -> Self {
        Self {
            background: self.foreground,
            foreground: self.background,
        }
    }

    /// Find a theme by its (case-sensitive) name
    pub fn get(name: &str) -> Option<Self> {
        CATALOG
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, theme)| *theme)
    }

    /// Find a theme by name, falling back to [`DEFAULT_THEME`]
    pub fn lookup(name: &str) -> Self {
        Self::get(name).unwrap_or(BROWN)
    }

    /// The names of all themes in the catalog
    pub fn names() -> impl Iterator<Item = &'static str> {
        CATALOG.iter().map(|(key, _)| *key)
    }
}

impl Default for ColorTheme {
    fn default() -> Self {
        BROWN
    }
}
