//! Metadata overrides for generated covers
use std::{io, path::Path};

use clap::Args;
use nepub_cover::MetadataFields;
use serde::Deserialize;
use thiserror::Error;

mod de;
use de::deserialize_opt_text;

/// Metadata written into the EXIF block of a generated cover
///
/// The same fields can be given on the command line and in a RON file:
///
/// ```ron
/// (
///     copyright: "(c) 2024 Someone",
///     user_comment: Some("custom comment"),
/// )
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Args, Deserialize)]
pub struct Meta {
    /// Image description
    #[clap(long)]
    #[serde(default, deserialize_with = "deserialize_opt_text")]
    pub description: Option<String>,
    /// Copyright notice
    #[clap(long)]
    #[serde(default, deserialize_with = "deserialize_opt_text")]
    pub copyright: Option<String>,
    /// Name of the generating software
    #[clap(long)]
    #[serde(default, deserialize_with = "deserialize_opt_text")]
    pub software: Option<String>,
    /// User comment (title and author by default)
    #[clap(long = "comment")]
    #[serde(default, deserialize_with = "deserialize_opt_text")]
    pub user_comment: Option<String>,
}

/// Failed to load a metadata file
#[derive(Debug, Error)]
pub enum MetaError {
    /// The file could not be read
    #[error("IO Error")]
    Io(#[from] io::Error),
    /// The file is not valid RON
    #[error("Deserialize Error")]
    Ron(#[from] ron::error::Error),
}

impl Meta {
    /// Parse a RON metadata file
    pub fn from_ron(text: &str) -> Result<Self, MetaError> {
        Ok(ron::from_str(text)?)
    }

    /// Read the file at `path` (if any), then apply `self` on top
    pub fn resolve(&self, path: Option<&Path>) -> Result<Self, MetaError> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Ok(Self::from_ron(&text)?.overridden_by(self))
            }
            None => Ok(self.clone()),
        }
    }

    fn overridden_by(mut self, other: &Meta) -> Self {
        if let Some(description) = &other.description {
            self.description = Some(description.clone());
        }
        if let Some(copyright) = &other.copyright {
            self.copyright = Some(copyright.clone());
        }
        if let Some(software) = &other.software {
            self.software = Some(software.clone());
        }
        if let Some(user_comment) = &other.user_comment {
            self.user_comment = Some(user_comment.clone());
        }
        self
    }
}

impl From<Meta> for MetadataFields {
    fn from(meta: Meta) -> Self {
        MetadataFields {
            description: meta.description,
            artist: None,
            copyright: meta.copyright,
            software: meta.software,
            user_comment: meta.user_comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ron_forms() {
        let meta = Meta::from_ron(
            r#"(
                description: "A cover",
                copyright: Some("(c) 2024"),
                software: None,
                user_comment: "  ",
            )"#,
        )
        .unwrap();
        assert_eq!(Some("A cover"), meta.description.as_deref());
        assert_eq!(Some("(c) 2024"), meta.copyright.as_deref());
        assert_eq!(None, meta.software);
        assert_eq!(None, meta.user_comment);
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(Meta::default(), Meta::from_ron("()").unwrap());
        assert!(Meta::from_ron("(copyright: 12)").is_err());
    }

    #[test]
    fn test_command_line_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.ron");
        std::fs::write(&path, r#"(copyright: "file", software: "file")"#).unwrap();

        let cl = Meta {
            copyright: Some("command line".to_owned()),
            ..Meta::default()
        };
        let meta = cl.resolve(Some(&path)).unwrap();
        assert_eq!(Some("command line"), meta.copyright.as_deref());
        assert_eq!(Some("file"), meta.software.as_deref());

        assert_eq!(cl, cl.resolve(None).unwrap());
        assert!(matches!(
            cl.resolve(Some(&dir.path().join("missing.ron"))),
            Err(MetaError::Io(_))
        ));
    }
}
