//! # JPEG encoding with metadata
//!
//! Generated covers carry a resolution (JFIF density) and an EXIF block
//! in an `APP1` segment. Covers supplied by the user are re-encoded
//! without either.
//!
//! ## The `UserComment` marker
//!
//! EXIF 2.3 defines the character code prefix for UTF-16 comments as
//! `"UNICODE\0"`, but does not say which byte order to use. Windows
//! Explorer and most tagging libraries read it as big-endian UTF-16,
//! which is what is written here. The marker is kept byte-for-byte.

use std::io::Cursor;

use chrono::{Local, NaiveDateTime};
use exif::{experimental::Writer, Field, In, Rational, Tag, Value};
use image::{
    codecs::jpeg::{JpegEncoder, PixelDensity},
    RgbImage,
};

use crate::error::CoverError;

/// The `Artist` written into every generated cover
pub const ARTIST: &str = "nepub";

/// Prefix of an EXIF `UserComment` holding UTF-16BE text
pub const USER_COMMENT_MARKER: [u8; 8] = *b"UNICODE\0";

/// Date format of EXIF timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// JPEG quality (1-100)
pub const JPEG_QUALITY: u8 = 75;

const SOI: [u8; 2] = [0xFF, 0xD8];
const APP0: [u8; 2] = [0xFF, 0xE0];
const APP1: [u8; 2] = [0xFF, 0xE1];
const JFIF_ID: &[u8; 5] = b"JFIF\0";
const EXIF_ID: &[u8; 6] = b"Exif\0\0";
const JFIF_UNIT_DPI: u8 = 1;
const EXIF_UNIT_INCH: u16 = 2;

/// Descriptive metadata of a cover
///
/// All fields except `user_comment` should be ASCII.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MetadataFields {
    /// `ImageDescription`
    pub description: Option<String>,
    /// `Artist`; always replaced by [`ARTIST`] when written
    pub artist: Option<String>,
    /// `Copyright`
    pub copyright: Option<String>,
    /// `Software`
    pub software: Option<String>,
    /// `UserComment`, may contain any text
    pub user_comment: Option<String>,
}

impl MetadataFields {
    /// Overwrite every field that is set in `other`
    pub fn merge(mut self, other: &MetadataFields) -> Self {
        fn take(dst: &mut Option<String>, src: &Option<String>) {
            if let Some(value) = src {
                *dst = Some(value.clone());
            }
        }
        take(&mut self.description, &other.description);
        take(&mut self.artist, &other.artist);
        take(&mut self.copyright, &other.copyright);
        take(&mut self.software, &other.software);
        take(&mut self.user_comment, &other.user_comment);
        self
    }
}

/// Encode a `UserComment` value: [`USER_COMMENT_MARKER`] followed by UTF-16BE
///
/// ```
/// # use nepub_cover::embed::encode_user_comment;
/// assert_eq!(b"UNICODE\0\x30\x42", &encode_user_comment("あ")[..]);
/// ```
pub fn encode_user_comment(text: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(USER_COMMENT_MARKER.len() + text.len() * 2);
    buf.extend_from_slice(&USER_COMMENT_MARKER);
    for unit in text.encode_utf16() {
        buf.extend_from_slice(&unit.to_be_bytes());
    }
    buf
}

/// Encode an image as JPEG, stamping metadata with the current local time
///
/// Without `metadata`, neither a resolution nor an EXIF block is written.
pub fn encode(
    image: &RgbImage,
    metadata: Option<&MetadataFields>,
    dpi: u32,
) -> Result<Vec<u8>, CoverError> {
    encode_at(image, metadata, dpi, Local::now().naive_local())
}

/// Like [`encode`], with a fixed timestamp
pub fn encode_at(
    image: &RgbImage,
    metadata: Option<&MetadataFields>,
    dpi: u32,
    timestamp: NaiveDateTime,
) -> Result<Vec<u8>, CoverError> {
    let Some(metadata) = metadata else {
        return encode_jpeg(image, None);
    };
    let density = u16::try_from(dpi).unwrap_or(u16::MAX);
    let jpeg = encode_jpeg(image, Some(PixelDensity::dpi(density)))?;
    let tiff = exif_block(metadata, dpi, timestamp)?;
    insert_exif(&jpeg, &tiff)
}

fn encode_jpeg(image: &RgbImage, density: Option<PixelDensity>) -> Result<Vec<u8>, CoverError> {
    let mut jpeg = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
        if let Some(density) = density {
            encoder.set_pixel_density(density);
        }
        encoder.encode_image(image)?;
    }
    Ok(jpeg)
}

fn ascii(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

/// Serialize the metadata into a TIFF structure (big-endian)
fn exif_block(
    metadata: &MetadataFields,
    dpi: u32,
    timestamp: NaiveDateTime,
) -> Result<Vec<u8>, CoverError> {
    let stamp = timestamp.format(TIMESTAMP_FORMAT).to_string();
    let resolution = Value::Rational(vec![Rational { num: dpi, denom: 1 }]);

    let mut fields = Vec::with_capacity(12);
    if let Some(description) = &metadata.description {
        fields.push(ascii(Tag::ImageDescription, description));
    }
    fields.push(ascii(Tag::Artist, ARTIST));
    if let Some(copyright) = &metadata.copyright {
        fields.push(ascii(Tag::Copyright, copyright));
    }
    if let Some(software) = &metadata.software {
        fields.push(ascii(Tag::Software, software));
    }
    fields.push(ascii(Tag::DateTime, &stamp));
    fields.push(ascii(Tag::DateTimeOriginal, &stamp));
    fields.push(ascii(Tag::DateTimeDigitized, &stamp));
    fields.push(Field {
        tag: Tag::XResolution,
        ifd_num: In::PRIMARY,
        value: resolution.clone(),
    });
    fields.push(Field {
        tag: Tag::YResolution,
        ifd_num: In::PRIMARY,
        value: resolution,
    });
    fields.push(Field {
        tag: Tag::ResolutionUnit,
        ifd_num: In::PRIMARY,
        value: Value::Short(vec![EXIF_UNIT_INCH]),
    });
    if let Some(comment) = &metadata.user_comment {
        fields.push(Field {
            tag: Tag::UserComment,
            ifd_num: In::PRIMARY,
            value: Value::Undefined(encode_user_comment(comment), 0),
        });
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false)?;
    Ok(tiff.into_inner())
}

/// Insert an `APP1` segment with the given TIFF data after the JFIF header
fn insert_exif(jpeg: &[u8], tiff: &[u8]) -> Result<Vec<u8>, CoverError> {
    if jpeg.get(..2) != Some(&SOI[..]) {
        return Err(CoverError::MalformedJpeg);
    }
    let segment_len = 2 + EXIF_ID.len() + tiff.len();
    let segment_len = u16::try_from(segment_len).map_err(|_| CoverError::ExifTooLarge(tiff.len()))?;

    let mut pos = SOI.len();
    if jpeg.get(2..4) == Some(&APP0[..]) {
        let len = jpeg
            .get(4..6)
            .map(|b| usize::from(u16::from_be_bytes([b[0], b[1]])))
            .ok_or(CoverError::MalformedJpeg)?;
        pos += 2 + len;
        if pos > jpeg.len() {
            return Err(CoverError::MalformedJpeg);
        }
    }

    let mut out = Vec::with_capacity(jpeg.len() + 2 + usize::from(segment_len));
    out.extend_from_slice(&jpeg[..pos]);
    out.extend_from_slice(&APP1);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(EXIF_ID);
    out.extend_from_slice(tiff);
    out.extend_from_slice(&jpeg[pos..]);
    Ok(out)
}

/// Read the resolution from the JFIF header, if it is given in dots per inch
pub fn read_resolution(jpeg: &[u8]) -> Option<(u16, u16)> {
    if jpeg.get(..2)? != &SOI[..] || jpeg.get(2..4)? != &APP0[..] || jpeg.get(6..11)? != &JFIF_ID[..]
    {
        return None;
    }
    let header = jpeg.get(13..18)?;
    if header[0] != JFIF_UNIT_DPI {
        return None;
    }
    let x = u16::from_be_bytes([header[1], header[2]]);
    let y = u16::from_be_bytes([header[3], header[4]]);
    Some((x, y))
}
