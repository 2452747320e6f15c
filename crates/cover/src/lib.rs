#![warn(missing_docs)]
//! # EPUB cover images
//!
//! This crate produces the `cover.jpg` of an EPUB built from a web novel.
//! If the user already has a cover image, it is normalized to RGB and
//! re-encoded. Otherwise a simple cover is painted: a colored page with
//! a frame, the title in the upper and the author in the lower half.
//!
//! ```no_run
//! use nepub_cover::{size::SizePreset, CoverGenerator};
//!
//! let generator = CoverGenerator::new(SizePreset::A6.into()).with_theme("green");
//! let cover = generator.generate("吾輩は猫である", "夏目漱石", None)?;
//! std::fs::write(cover.file_name, &cover.data)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::{Path, PathBuf};

use image::{ImageReader, RgbImage};
use log::info;

pub mod embed;
pub mod error;
pub mod font;
pub mod metrics;
pub mod render;
pub mod size;
pub mod theme;
pub mod wrap;

pub use embed::MetadataFields;
pub use error::CoverError;
pub use size::{PageSize, SizePreset, SizePresetError};
pub use theme::ColorTheme;

/// Media type of the cover in the EPUB manifest
pub const COVER_MEDIA_TYPE: &str = "image/jpg";

/// Manifest id of the cover
pub const COVER_ID: &str = "cimage";

/// File name of the cover inside the EPUB
///
/// `content.opf` and `cover.xhtml` refer to this exact name.
pub const COVER_FILE_NAME: &str = "cover.jpg";

/// Value of the `ImageDescription` written into generated covers
pub const DESCRIPTION: &str = "EPUB cover image";

/// Value of the `Software` tag written into generated covers
pub const SOFTWARE: &str = concat!("nepub-cover ", env!("CARGO_PKG_VERSION"));

/// A cover image, ready to be added to an EPUB
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArtifact {
    /// Always [`COVER_MEDIA_TYPE`]
    pub media_type: &'static str,
    /// Always [`COVER_ID`]
    pub id: &'static str,
    /// Always [`COVER_FILE_NAME`]
    pub file_name: &'static str,
    /// The JPEG file
    pub data: Vec<u8>,
}

impl CoverArtifact {
    fn new(data: Vec<u8>) -> Self {
        Self {
            media_type: COVER_MEDIA_TYPE,
            id: COVER_ID,
            file_name: COVER_FILE_NAME,
            data,
        }
    }
}

/// Creates cover images of a fixed size
#[derive(Debug, Clone)]
pub struct CoverGenerator {
    size: PageSize,
    theme: ColorTheme,
    font_path: PathBuf,
    metadata: MetadataFields,
}

impl CoverGenerator {
    /// A generator for the given page size, with the default theme and font
    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            theme: ColorTheme::default(),
            font_path: PathBuf::from(font::FONT_PATH),
            metadata: MetadataFields::default(),
        }
    }

    /// Select a theme by name (unknown names select the default theme)
    pub fn with_theme(mut self, name: &str) -> Self {
        self.theme = ColorTheme::lookup(name);
        self
    }

    /// Use a different outline font
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = path.into();
        self
    }

    /// Metadata that overrides the generated fields
    pub fn with_metadata(mut self, metadata: MetadataFields) -> Self {
        self.metadata = metadata;
        self
    }

    /// The page size
    pub fn size(&self) -> PageSize {
        self.size
    }

    /// The selected theme
    pub fn theme(&self) -> ColorTheme {
        self.theme
    }

    /// Produce the cover
    ///
    /// If `existing` names a file that exists, that image is used.
    /// A file that exists but cannot be decoded is an error.
    pub fn generate(
        &self,
        title: &str,
        author: &str,
        existing: Option<&Path>,
    ) -> Result<CoverArtifact, CoverError> {
        info!(
            "Specified cover page size: W={}, H={}, DPI={}",
            self.size.width, self.size.height, self.size.dpi
        );

        let data = match existing.filter(|path| path.exists()) {
            Some(path) => self.load_existing(path)?,
            None => self.create(title, author)?,
        };
        Ok(CoverArtifact::new(data))
    }

    /// Paint the cover without encoding it
    pub fn render(&self, title: &str, author: &str) -> RgbImage {
        let font_size = render::font_size(self.size.width);
        let font = font::CoverFont::load(&self.font_path, font_size);
        render::render(title, author, self.size, self.theme, &font)
    }

    /// The metadata written into a generated cover
    ///
    /// The comment holds title and author as they are drawn, truncated
    /// to their budgets.
    pub fn metadata_for(&self, title: &str, author: &str) -> MetadataFields {
        let generated = MetadataFields {
            description: Some(DESCRIPTION.to_owned()),
            artist: None,
            copyright: None,
            software: Some(SOFTWARE.to_owned()),
            user_comment: Some(format!(
                "{}\n{}",
                metrics::truncate_full(title),
                metrics::truncate_half(author)
            )),
        };
        generated.merge(&self.metadata)
    }

    fn create(&self, title: &str, author: &str) -> Result<Vec<u8>, CoverError> {
        let image = self.render(title, author);
        let metadata = self.metadata_for(title, author);
        embed::encode(&image, Some(&metadata), self.size.dpi)
    }

    fn load_existing(&self, path: &Path) -> Result<Vec<u8>, CoverError> {
        info!("Using cover image '{}'", path.display());
        let read_err = |source| CoverError::Read {
            path: path.to_owned(),
            source,
        };
        let image = ImageReader::open(path)
            .map_err(read_err)?
            .with_guessed_format()
            .map_err(read_err)?
            .decode()
            .map_err(|source| CoverError::Decode {
                path: path.to_owned(),
                source,
            })?;
        embed::encode(&image.into_rgb8(), None, self.size.dpi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_generator_is_shareable() {
        assert_send_sync::<CoverGenerator>();
        assert_send_sync::<CoverArtifact>();
    }

    #[test]
    fn test_metadata_override() {
        let generator = CoverGenerator::new(PageSize::a6()).with_metadata(MetadataFields {
            copyright: Some("(c) 2024".to_owned()),
            user_comment: Some("custom".to_owned()),
            ..MetadataFields::default()
        });
        let meta = generator.metadata_for("タイトル", "作者");
        assert_eq!(Some(DESCRIPTION), meta.description.as_deref());
        assert_eq!(Some("(c) 2024"), meta.copyright.as_deref());
        assert_eq!(Some("custom"), meta.user_comment.as_deref());

        let meta = CoverGenerator::new(PageSize::a6()).metadata_for("タイトル", "作者");
        assert_eq!(Some("タイトル\n作者"), meta.user_comment.as_deref());
    }

    #[test]
    fn test_comment_is_truncated() {
        let title = "あ".repeat(33_000);
        let author = "い".repeat(100);
        let meta = CoverGenerator::new(PageSize::a6()).metadata_for(&title, &author);
        let expected = format!("{}…\n{}…", "あ".repeat(71), "い".repeat(35));
        assert_eq!(Some(expected.as_str()), meta.user_comment.as_deref());
    }

    #[test]
    fn test_theme_fallback() {
        let a = CoverGenerator::new(PageSize::a6()).with_theme("nonexistent-theme");
        let b = CoverGenerator::new(PageSize::a6()).with_theme("brown");
        assert_eq!(a.theme(), b.theme());
    }
}
