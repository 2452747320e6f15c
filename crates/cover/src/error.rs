//! Errors relating to cover generation

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failed to produce a cover image
#[derive(Debug, Error)]
pub enum CoverError {
    /// The user supplied cover could not be opened
    #[error("failed to read cover image `{}`", path.display())]
    Read {
        /// The file that was requested
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The user supplied cover is not a valid image
    #[error("failed to decode cover image `{}`", path.display())]
    Decode {
        /// The file that was requested
        path: PathBuf,
        /// The decoder error
        #[source]
        source: image::ImageError,
    },
    /// JPEG encoding failed
    #[error("failed to encode JPEG")]
    Encode(#[from] image::ImageError),
    /// EXIF serialization failed
    #[error("failed to write EXIF metadata")]
    Exif(#[from] exif::Error),
    /// The EXIF block does not fit into a single APP1 segment
    #[error("EXIF block of {0} bytes exceeds the APP1 segment limit")]
    ExifTooLarge(usize),
    /// The encoder output did not start with a JPEG header
    #[error("encoder produced a malformed JPEG stream")]
    MalformedJpeg,
}
