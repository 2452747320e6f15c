//! The `nepub-cover` command
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use color_eyre::eyre::{self, WrapErr};
use log::info;
use nepub_cover::{
    font::FONT_PATH, theme::DEFAULT_THEME, CoverGenerator, PageSize, SizePreset, SizePresetError,
    COVER_FILE_NAME,
};
use prettytable::{format, row, Cell, Row, Table};
use thiserror::Error;

use super::meta::Meta;

#[derive(Parser, Debug)]
/// Create the cover image of an EPUB
///
/// Without any arguments, a set of sample covers is written to the
/// current folder.
#[clap(name = "nepub-cover")]
pub struct CoverOpts {
    /// Title of the novel
    pub title: Option<String>,
    /// Name of the author
    pub author: Option<String>,
    /// The JPEG file to write
    pub output: Option<PathBuf>,
    /// Page size, one of `A6`, `B6` or `KINDLE`
    pub size: Option<String>,
    /// Color theme (e.g. `brown`, `red`, `GREEN`)
    pub theme: Option<String>,
    /// Use this image instead of painting a cover, if it exists
    #[clap(long)]
    pub cover: Option<PathBuf>,
    /// The outline font for title and author
    #[clap(long, default_value = FONT_PATH)]
    pub font: PathBuf,

    /// Metadata passed as command line args
    #[clap(flatten)]
    pub cl_meta: Meta,

    /// Metadata as a RON file
    #[clap(long)]
    pub meta: Option<PathBuf>,
}

/// What the positional arguments ask for
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation<'a> {
    /// No arguments: write the sample covers
    Samples,
    /// Write a single cover
    Single {
        /// Title of the novel
        title: &'a str,
        /// Name of the author
        author: &'a str,
        /// The JPEG file to write
        output: &'a Path,
        /// Page size
        size: SizePreset,
        /// Theme name, if given
        theme: Option<&'a str>,
    },
}

/// The positional arguments can't be used
#[derive(Debug, Error)]
pub enum UsageError {
    /// Some, but not all of the required arguments
    #[error("expected title, author, output file and size")]
    Incomplete,
    /// The size is not a known preset
    #[error(transparent)]
    Size(#[from] SizePresetError),
}

/// The one-line usage of the command
pub fn usage() -> String {
    CoverOpts::command().render_usage()
}

impl CoverOpts {
    /// Check the positional arguments
    pub fn invocation(&self) -> Result<Invocation<'_>, UsageError> {
        match (&self.title, &self.author, &self.output, &self.size) {
            (None, None, None, None) => Ok(Invocation::Samples),
            (Some(title), Some(author), Some(output), Some(size)) => Ok(Invocation::Single {
                title,
                author,
                output,
                size: size.parse()?,
                theme: self.theme.as_deref(),
            }),
            _ => Err(UsageError::Incomplete),
        }
    }

    /// A generator for `size`, configured from the options
    pub fn generator(&self, size: PageSize, theme: Option<&str>) -> eyre::Result<CoverGenerator> {
        let meta = self.cl_meta.resolve(self.meta.as_deref()).wrap_err_with(|| {
            let path = self.meta.as_deref().unwrap_or_else(|| Path::new("-"));
            format!("Failed to load metadata from `{}`", path.display())
        })?;
        let mut generator = CoverGenerator::new(size)
            .with_font_path(&self.font)
            .with_metadata(meta.into());
        if let Some(theme) = theme {
            generator = generator.with_theme(theme);
        }
        Ok(generator)
    }
}

/// One of the covers written when no arguments are given
#[derive(Debug, Copy, Clone)]
pub struct Sample {
    /// Title of the sample
    pub title: &'static str,
    /// Author of the sample
    pub author: &'static str,
    /// Page size
    pub size: SizePreset,
    /// Theme name, the default theme if `None`
    pub theme: Option<&'static str>,
    /// Used in the file name
    pub label: &'static str,
}

/// Short and long texts on every page size, in plain and inverted themes
pub const SAMPLES: [Sample; 4] = [
    Sample {
        title: "小説のタイトル名（Ａ６）",
        author: "小説の作者名",
        size: SizePreset::A6,
        theme: None,
        label: "A6-short",
    },
    Sample {
        title: "これは非常に長い小説のタイトルで画像幅を超えてしまう場合のテストです。",
        author: "すごく名前が長い作者名のテスト",
        size: SizePreset::A6,
        theme: Some("red"),
        label: "A6-long",
    },
    Sample {
        title: "小説のタイトル名（Ｂ６）",
        author: "小説の作者名",
        size: SizePreset::B6,
        theme: Some("GREEN"),
        label: "B6-short",
    },
    Sample {
        title: concat!(
            "あいうえおかきくけこさＡ",
            "あいうえおかきくけこさＢ",
            "あいうえおかきくけこさＣ",
            "あいうえおかきくけこさＤ",
            "あいうえおかきくけこさＥ",
            "あいうえおかきくけこさＦあいうえお",
        ),
        author: concat!(
            "寿限無、寿限無、五劫のす",
            "りきれ、海砂利水魚の、水",
            "行末・（略）長久命の長助",
        ),
        size: SizePreset::Kindle,
        theme: Some("BLUE"),
        label: "KINDLE-very-long",
    },
];

/// `size-<label>-cover.jpg`
pub fn sample_file_name(label: &str) -> String {
    format!("size-{}-{}", label, COVER_FILE_NAME)
}

/// Write all samples into `dir` and print a summary
pub fn write_samples(opts: &CoverOpts, dir: &Path) -> eyre::Result<Vec<PathBuf>> {
    info!("No arguments given, writing sample covers");

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row![
        "label", "size", "theme", "width", "height", "dpi", "bytes", "file"
    ]);

    let mut files = Vec::with_capacity(SAMPLES.len());
    for sample in &SAMPLES {
        let page = sample.size.page_size();
        let generator = opts.generator(page, sample.theme)?;
        let cover = generator.generate(sample.title, sample.author, opts.cover.as_deref())?;

        let path = dir.join(sample_file_name(sample.label));
        std::fs::write(&path, &cover.data)
            .wrap_err_with(|| format!("Failed to write `{}`", path.display()))?;
        info!("Saved: {}", path.display());

        table.add_row(Row::new(vec![
            Cell::new(sample.label),
            Cell::new(sample.size.name()),
            Cell::new(sample.theme.unwrap_or(DEFAULT_THEME)),
            Cell::new(&format!("{:5}", page.width)),
            Cell::new(&format!("{:5}", page.height)),
            Cell::new(&format!("{:3}", page.dpi)),
            Cell::new(&format!("{:8}", cover.data.len())),
            Cell::new(&path.display().to_string()),
        ]));
        files.push(path);
    }

    table.printstd();
    Ok(files)
}

/// Run the command for a checked invocation
pub fn run(opts: &CoverOpts, invocation: Invocation) -> eyre::Result<()> {
    match invocation {
        Invocation::Samples => {
            write_samples(opts, Path::new("."))?;
        }
        Invocation::Single {
            title,
            author,
            output,
            size,
            theme,
        } => {
            let generator = opts.generator(size.page_size(), theme)?;
            let cover = generator.generate(title, author, opts.cover.as_deref())?;
            std::fs::write(output, &cover.data)
                .wrap_err_with(|| format!("Failed to write `{}`", output.display()))?;
            info!("Saved: {}", output.display());
        }
    }
    Ok(())
}
