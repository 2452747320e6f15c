//! # Cover rendering
//!
//! The layout is fixed:
//!
//! ```text
//! +-----------------------------+
//! |  +-----------------------+  |  <- frame, inset by 5% of the width
//! |  |                       |  |
//! |  |        TITLE          |  |  <- centered at 25% of the height
//! |  |                       |  |
//! |  |        AUTHOR         |  |  <- centered at 75% of the height
//! |  |                       |  |
//! |  +-----------------------+  |
//! +-----------------------------+
//! ```

use image::{Rgb, RgbImage};

use crate::{
    font::{CoverFont, Glyph},
    metrics::{truncate_full, truncate_half},
    size::PageSize,
    theme::ColorTheme,
    wrap::wrap,
};

/// Frame inset relative to the page width (5%)
pub const FRAME_RATIO: f32 = 0.05;
/// Vertical anchor of the title block relative to the page height
pub const TITLE_Y_RATIO: f32 = 0.25;
/// Vertical anchor of the author block relative to the page height
pub const AUTHOR_Y_RATIO: f32 = 0.75;
/// Extra pixels between title lines
pub const TITLE_SPACING: f32 = 20.0;
/// Extra pixels between author lines
pub const AUTHOR_SPACING: f32 = 10.0;
/// Number of full-width characters that span 80% of the page width
pub const CHARS_PER_WIDTH: u32 = 12;

/// The font size for a page of the given width
///
/// ```
/// # use nepub_cover::render::font_size;
/// assert_eq!(82, font_size(1240));
/// assert_eq!(121, font_size(1816));
/// ```
pub fn font_size(width: u32) -> u32 {
    let text_width = u64::from(width) * 4 / 5;
    (text_width / u64::from(CHARS_PER_WIDTH)) as u32
}

/// The frame inset and stroke width for a page of the given width
pub fn frame_metrics(width: u32) -> (u32, u32) {
    let inset = (width as f32 * FRAME_RATIO) as u32;
    (inset, (inset / 4).max(1))
}

/// Paint a cover with title and author
pub fn render(
    title: &str,
    author: &str,
    page: PageSize,
    theme: ColorTheme,
    font: &CoverFont,
) -> RgbImage {
    let title = truncate_full(title);
    let author = truncate_half(author);

    let (w, h) = (page.width, page.height);
    let mut img = RgbImage::from_pixel(w, h, theme.background);

    let (inset, stroke) = frame_metrics(w);
    draw_frame(&mut img, inset, stroke, theme.foreground);

    let wrapped_title = wrap(&title, w as f32, font.size());
    let wrapped_author = wrap(&author, w as f32, font.size());

    let center_x = (w / 2) as f32;
    let title_y = (h as f32 * TITLE_Y_RATIO).floor();
    let author_y = (h as f32 * AUTHOR_Y_RATIO).floor();

    let title_block = TextBlock {
        text: &wrapped_title,
        center: (center_x, title_y),
        spacing: TITLE_SPACING,
    };
    title_block.draw(&mut img, font, theme.foreground);

    let author_block = TextBlock {
        text: &wrapped_author,
        center: (center_x, author_y),
        spacing: AUTHOR_SPACING,
    };
    author_block.draw(&mut img, font, theme.foreground);

    img
}

/// Stroke a hollow rectangle from `(inset, inset)` to `(w - inset, h - inset)`
///
/// The stroke grows inward from those bounds.
fn draw_frame(img: &mut RgbImage, inset: u32, stroke: u32, color: Rgb<u8>) {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || stroke == 0 {
        return;
    }
    let x0 = inset.min(w - 1);
    let y0 = inset.min(h - 1);
    let x1 = w.saturating_sub(inset).min(w - 1);
    let y1 = h.saturating_sub(inset).min(h - 1);
    if x1 < x0 || y1 < y0 {
        return;
    }

    for y in y0..=y1 {
        let dy = (y - y0).min(y1 - y);
        if dy < stroke {
            for x in x0..=x1 {
                img.put_pixel(x, y, color);
            }
        } else {
            let left_end = (x0 + stroke).min(x1 + 1);
            let right_start = (x1 + 1).saturating_sub(stroke).max(x0);
            for x in (x0..left_end).chain(right_start..=x1) {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Multi-line text, centered on a point
struct TextBlock<'a> {
    text: &'a str,
    center: (f32, f32),
    spacing: f32,
}

impl TextBlock<'_> {
    fn draw(&self, img: &mut RgbImage, font: &CoverFont, color: Rgb<u8>) {
        if self.text.is_empty() {
            return;
        }
        let metrics = font.line_metrics();
        let line_height = metrics.height();
        let advance = line_height + self.spacing;

        let lines: Vec<&str> = self.text.split('\n').collect();
        let block_height = advance * (lines.len() - 1) as f32 + line_height;
        let (cx, cy) = self.center;
        let top = cy - block_height / 2.0;

        for (index, line) in lines.iter().enumerate() {
            let glyphs: Vec<Glyph> = line.chars().map(|ch| font.glyph(ch)).collect();
            let line_width: f32 = glyphs.iter().map(|g| g.advance).sum();
            let baseline = (top + index as f32 * advance + metrics.ascent).round() as i32;

            let mut pen_x = cx - line_width / 2.0;
            for glyph in &glyphs {
                let x = pen_x.round() as i32 + glyph.left;
                let y = baseline - glyph.top;
                blend_glyph(img, glyph, x, y, color);
                pen_x += glyph.advance;
            }
        }
    }
}

fn blend_glyph(img: &mut RgbImage, glyph: &Glyph, x: i32, y: i32, color: Rgb<u8>) {
    if glyph.width == 0 {
        return;
    }
    let (w, h) = img.dimensions();
    for (row_index, row) in glyph.coverage.chunks_exact(glyph.width).enumerate() {
        let py = i64::from(y) + row_index as i64;
        if py < 0 || py >= i64::from(h) {
            continue;
        }
        for (col_index, &alpha) in row.iter().enumerate() {
            let px = i64::from(x) + col_index as i64;
            if alpha == 0 || px < 0 || px >= i64::from(w) {
                continue;
            }
            let dst = img.get_pixel_mut(px as u32, py as u32);
            let a = u16::from(alpha);
            for (d, s) in dst.0.iter_mut().zip(color.0) {
                *d = ((u16::from(*d) * (255 - a) + u16::from(s) * a) / 255) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::SizePreset;

    #[test]
    fn test_font_size() {
        assert_eq!(82, font_size(PageSize::a6().width));
        assert_eq!(100, font_size(PageSize::b6().width));
    }

    #[test]
    fn test_frame() {
        let theme = ColorTheme::default();
        let mut img = RgbImage::from_pixel(200, 300, theme.background);
        let (inset, stroke) = frame_metrics(200);
        assert_eq!((10, 2), (inset, stroke));
        draw_frame(&mut img, inset, stroke, theme.foreground);

        assert_eq!(theme.background, *img.get_pixel(9, 9));
        assert_eq!(theme.foreground, *img.get_pixel(10, 10));
        assert_eq!(theme.foreground, *img.get_pixel(11, 150));
        assert_eq!(theme.background, *img.get_pixel(12, 150));
        assert_eq!(theme.foreground, *img.get_pixel(190, 290));
        assert_eq!(theme.foreground, *img.get_pixel(189, 150));
        assert_eq!(theme.background, *img.get_pixel(188, 150));
        assert_eq!(theme.background, *img.get_pixel(191, 150));
        assert_eq!(theme.background, *img.get_pixel(100, 150));
    }

    #[test]
    fn test_frame_degenerate() {
        let mut img = RgbImage::new(2, 2);
        draw_frame(&mut img, 0, 1, Rgb([255, 0, 0]));
        assert!(img.pixels().all(|p| *p == Rgb([255, 0, 0])));
    }

    #[test]
    fn test_render_dimensions_and_ink() {
        let page = SizePreset::A6.page_size();
        let theme = ColorTheme::lookup("blue");
        let font = CoverFont::bitmap(font_size(page.width));
        let img = render("吾輩は猫である", "夏目漱石", page, theme, &font);
        assert_eq!((page.width, page.height), img.dimensions());
        assert_eq!(theme.background, *img.get_pixel(0, 0));

        // Text is drawn around the anchors, but nothing in the gap between them
        let title_y = page.height / 4;
        let ink_title = (0..page.width)
            .filter(|&x| *img.get_pixel(x, title_y) != theme.background)
            .count();
        assert!(ink_title > 0);
        let middle_y = page.height / 2;
        let inset = frame_metrics(page.width).0;
        let ink_middle = (inset + 20..page.width - inset - 20)
            .filter(|&x| *img.get_pixel(x, middle_y) != theme.background)
            .count();
        assert_eq!(0, ink_middle);
    }

    #[test]
    fn test_render_empty_text() {
        let page = PageSize::new(120, 170, 300);
        let theme = ColorTheme::default();
        let font = CoverFont::bitmap(font_size(page.width));
        let img = render("", "", page, theme, &font);
        assert_eq!(theme.background, *img.get_pixel(60, 42));
    }
}
