//! # Fonts
//!
//! Covers are set in an outline font (Noto Sans CJK by default), rasterized
//! with `fontdue`. When that font is not installed, the 8×8 bitmap glyphs
//! of `font8x8` are scaled up to the same nominal size instead. These cover
//! ASCII, Latin-1 and Hiragana; anything else is drawn as an empty box.

use std::path::Path;

use font8x8::{UnicodeFonts, BASIC_FONTS, HIRAGANA_FONTS, LATIN_FONTS, MISC_FONTS};
use fontdue::{Font, FontSettings};
use log::{debug, warn};

/// Where the preferred CJK font is usually installed (Debian/Ubuntu)
pub const FONT_PATH: &str = "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc";

/// Index of the Japanese face within the Noto CJK collection
pub const FONT_COLLECTION_INDEX: u32 = 0;

/// Side length of a built-in bitmap glyph in font pixels
const BITMAP_CELL: u32 = 8;

/// A font selected for drawing
pub enum CoverFont {
    /// An outline font at a pixel size
    Outline {
        /// The parsed font
        font: Font,
        /// Pixels per em
        size: f32,
    },
    /// The built-in bitmap font, scaled by an integer factor
    Bitmap {
        /// Device pixels per font pixel
        scale: u32,
    },
}

/// Vertical metrics of a font, relative to the baseline (y up)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineMetrics {
    /// Distance from baseline to the top of the line
    pub ascent: f32,
    /// Distance from baseline to the bottom of the line (negative)
    pub descent: f32,
}

impl LineMetrics {
    /// The height of a single line without extra spacing
    pub fn height(&self) -> f32 {
        self.ascent - self.descent
    }
}

/// A rasterized glyph
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Horizontal advance in pixels
    pub advance: f32,
    /// Offset from the pen position to the left edge of the bitmap
    pub left: i32,
    /// Offset from the baseline to the top edge of the bitmap (y up)
    pub top: i32,
    /// Bitmap width
    pub width: usize,
    /// Bitmap height
    pub height: usize,
    /// Row-major coverage values (0 = none, 255 = full)
    pub coverage: Vec<u8>,
}

impl CoverFont {
    /// Load the outline font at `path`, or fall back to the bitmap font
    pub fn load(path: &Path, size: u32) -> Self {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!(
                    "Font '{}' is not available ({}), using built-in font",
                    path.display(),
                    e
                );
                return Self::bitmap(size);
            }
        };
        let settings = FontSettings {
            collection_index: FONT_COLLECTION_INDEX,
            scale: size as f32,
            ..FontSettings::default()
        };
        match Font::from_bytes(data, settings) {
            Ok(font) => {
                debug!("Loaded font '{}' at {}px", path.display(), size);
                Self::Outline {
                    font,
                    size: size as f32,
                }
            }
            Err(e) => {
                warn!(
                    "Failed to parse font '{}' ({}), using built-in font",
                    path.display(),
                    e
                );
                Self::bitmap(size)
            }
        }
    }

    /// The built-in font, scaled as close to `size` pixels as possible
    pub fn bitmap(size: u32) -> Self {
        Self::Bitmap {
            scale: (size / BITMAP_CELL).max(1),
        }
    }

    /// The nominal size of the font in pixels
    pub fn size(&self) -> f32 {
        match self {
            Self::Outline { size, .. } => *size,
            Self::Bitmap { scale } => (BITMAP_CELL * scale) as f32,
        }
    }

    /// Whether the built-in font is in use
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Bitmap { .. })
    }

    /// The vertical metrics
    pub fn line_metrics(&self) -> LineMetrics {
        match self {
            Self::Outline { font, size } => match font.horizontal_line_metrics(*size) {
                Some(m) => LineMetrics {
                    ascent: m.ascent,
                    descent: m.descent,
                },
                None => LineMetrics {
                    ascent: size * 0.88,
                    descent: -size * 0.12,
                },
            },
            Self::Bitmap { scale } => LineMetrics {
                ascent: (7 * scale) as f32,
                descent: -(*scale as f32),
            },
        }
    }

    /// Rasterize a single character
    pub fn glyph(&self, ch: char) -> Glyph {
        match self {
            Self::Outline { font, size } => {
                let (metrics, coverage) = font.rasterize(ch, *size);
                Glyph {
                    advance: metrics.advance_width,
                    left: metrics.xmin,
                    top: metrics.ymin + metrics.height as i32,
                    width: metrics.width,
                    height: metrics.height,
                    coverage,
                }
            }
            Self::Bitmap { scale } => bitmap_glyph(ch, *scale),
        }
    }
}

fn bitmap_rows(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| HIRAGANA_FONTS.get(ch))
        .or_else(|| MISC_FONTS.get(ch))
        .unwrap_or_else(|| {
            if ch.is_whitespace() {
                [0; 8]
            } else {
                [0xFF, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0xFF]
            }
        })
}

fn bitmap_glyph(ch: char, scale: u32) -> Glyph {
    let rows = bitmap_rows(ch);
    let scale = scale as usize;
    let side = BITMAP_CELL as usize * scale;
    let mut coverage = vec![0u8; side * side];
    for (y, row) in coverage.chunks_exact_mut(side).enumerate() {
        let bits = rows[y / scale];
        for (x, px) in row.iter_mut().enumerate() {
            // bit 0 is the leftmost pixel
            if bits & (1 << (x / scale)) != 0 {
                *px = 0xFF;
            }
        }
    }
    Glyph {
        advance: side as f32,
        left: 0,
        top: (7 * scale) as i32,
        width: side,
        height: side,
        coverage,
    }
}
