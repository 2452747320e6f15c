//! # Page sizes
//!
//! Cover images are sized after printed book formats. A physical size in
//! millimeters is turned into pixels at a given resolution:
//!
//! - one inch is 25.4 mm
//! - the default resolution is 300 dpi
//! - pixel counts are rounded down, then bumped to the next even number
//!
//! | Preset   | Format                 | Pixels      |
//! |----------|------------------------|-------------|
//! | `A6`     | 文庫 (105 × 148 mm)    | 1240 × 1748 |
//! | `B6`     | 単行本 (128 × 182 mm)  | 1512 × 2150 |
//! | `KINDLE` | Kindle recommended     | 1816 × 2560 |

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Millimeters in one inch
pub const MM_PER_INCH: f64 = 25.4;

/// The resolution used for all presets (300)
pub const DEFAULT_DPI: u32 = 300;

/// Pixel dimensions of a cover image
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PageSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Resolution in dots per inch
    pub dpi: u32,
}

impl PageSize {
    /// Create a page size from pixel dimensions
    pub const fn new(width: u32, height: u32, dpi: u32) -> Self {
        Self { width, height, dpi }
    }

    /// Derive a page size from a physical size in millimeters
    ///
    /// ```
    /// # use nepub_cover::size::PageSize;
    /// let a6 = PageSize::from_mm(105.0, 148.0, 300);
    /// assert_eq!((1240, 1748), (a6.width, a6.height));
    /// ```
    pub fn from_mm(width_mm: f64, height_mm: f64, dpi: u32) -> Self {
        Self {
            width: mm_to_even_px(width_mm, dpi),
            height: mm_to_even_px(height_mm, dpi),
            dpi,
        }
    }

    /// A6 (文庫)
    pub fn a6() -> Self {
        Self::from_mm(105.0, 148.0, DEFAULT_DPI)
    }

    /// B6 (単行本)
    pub fn b6() -> Self {
        Self::from_mm(128.0, 182.0, DEFAULT_DPI)
    }

    /// Kindle Direct Publishing recommended cover size
    pub const fn kindle() -> Self {
        Self::new(1816, 2560, DEFAULT_DPI)
    }
}

fn mm_to_even_px(mm: f64, dpi: u32) -> u32 {
    let px = (mm / MM_PER_INCH * f64::from(dpi)).floor() as u32;
    px + (px % 2)
}

/// The named page size presets
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SizePreset {
    /// 105 × 148 mm
    A6,
    /// 128 × 182 mm
    B6,
    /// 1816 × 2560 px
    Kindle,
}

impl SizePreset {
    /// All presets, in display order
    pub const ALL: [SizePreset; 3] = [Self::A6, Self::B6, Self::Kindle];

    /// The pixel size of this preset
    pub fn page_size(self) -> PageSize {
        match self {
            Self::A6 => PageSize::a6(),
            Self::B6 => PageSize::b6(),
            Self::Kindle => PageSize::kindle(),
        }
    }

    /// The canonical name of the preset
    pub fn name(self) -> &'static str {
        match self {
            Self::A6 => "A6",
            Self::B6 => "B6",
            Self::Kindle => "KINDLE",
        }
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<SizePreset> for PageSize {
    fn from(value: SizePreset) -> Self {
        value.page_size()
    }
}

/// Failed to parse a size preset name
#[derive(Debug, Error)]
#[error("invalid size name `{0}`, use one of `A6`, `B6` or `KINDLE`")]
pub struct SizePresetError(pub String);

impl FromStr for SizePreset {
    type Err = SizePresetError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "A6" | "a6" => Ok(Self::A6),
            "B6" | "b6" => Ok(Self::B6),
            "KINDLE" | "Kindle" | "kindle" => Ok(Self::Kindle),
            _ => Err(SizePresetError(val.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(PageSize::new(1240, 1748, 300), PageSize::a6());
        assert_eq!(PageSize::new(1512, 2150, 300), PageSize::b6());
        assert_eq!(PageSize::new(1816, 2560, 300), PageSize::kindle());
    }

    #[test]
    fn test_even_dimensions() {
        for mm in (10..400).map(|x| x as f64 * 0.7) {
            for dpi in [72, 96, 150, 300, 600] {
                let size = PageSize::from_mm(mm, mm * 1.41, dpi);
                assert_eq!(0, size.width % 2, "{} mm at {} dpi", mm, dpi);
                assert_eq!(0, size.height % 2, "{} mm at {} dpi", mm * 1.41, dpi);
            }
        }
    }

    #[test]
    fn test_odd_bumped() {
        // 128mm = 1511.8px
        assert_eq!(1512, mm_to_even_px(128.0, 300));
        // 105mm = 1240.2px
        assert_eq!(1240, mm_to_even_px(105.0, 300));
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(SizePreset::A6, "A6".parse().unwrap());
        assert_eq!(SizePreset::B6, "b6".parse().unwrap());
        assert_eq!(SizePreset::Kindle, "KINDLE".parse().unwrap());
        let err = "A5".parse::<SizePreset>().unwrap_err();
        assert!(err.to_string().contains("KINDLE"));
    }
}
