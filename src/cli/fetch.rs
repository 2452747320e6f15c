//! The `nepub-fetch` command
//!
//! Every row of a CSV file names one novel: `id,name,options`. Narou ids
//! start with a letter (`n1234ab`), Kakuyomu ids with a digit.
//!
//! ```csv
//! # id, name, options
//! n9669bk,無職転生,-r 1-10
//! 1177354054881165840,カクヨム作品,
//! ```
use std::{
    io,
    path::{Path, PathBuf},
    process::Command,
};

use clap::Parser;
use color_eyre::eyre::{self, WrapErr};
use csv::{ReaderBuilder, StringRecord};
use log::{error, info, warn};
use nepub_util::{parse_episode_range, RangeError};
use thiserror::Error;

#[derive(Parser, Debug)]
/// Build EPUB files for the novels listed in CSV files
#[clap(name = "nepub-fetch")]
pub struct FetchOpts {
    /// CSV files with `id,name,options` rows
    #[clap(required = true)]
    pub csv_files: Vec<PathBuf>,
    /// The output folder
    #[clap(long, short = 'd', default_value = "./epub_data/")]
    pub dir: PathBuf,
    /// The program that builds a single EPUB
    #[clap(long, default_value = "nepub")]
    pub command: String,
}

/// The site a novel is published on
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Site {
    /// 小説家になろう
    Narou,
    /// カクヨム
    Kakuyomu,
}

impl Site {
    /// Narou ids start with a letter
    pub fn for_id(id: &str) -> Self {
        match id.chars().next() {
            Some(c) if c.is_alphabetic() => Self::Narou,
            _ => Self::Kakuyomu,
        }
    }

    /// The command line flag that selects the site
    pub fn flag(self) -> &'static str {
        match self {
            Self::Narou => "-i",
            Self::Kakuyomu => "-k",
        }
    }

    /// The sub-folder of the output folder
    pub fn folder(self) -> &'static str {
        match self {
            Self::Narou => "n",
            Self::Kakuyomu => "k",
        }
    }

    fn file_name(self, id: &str, name: &str) -> String {
        match self {
            Self::Narou => format!("{}_{}.epub", name, id),
            Self::Kakuyomu => format!("{}_kakuyomu.epub", name),
        }
    }
}

/// A single run of the EPUB builder
#[derive(Debug, PartialEq, Eq)]
pub struct Job {
    /// The site of the novel
    pub site: Site,
    /// Arguments for the builder
    pub args: Vec<String>,
    /// Where the EPUB ends up
    pub output: PathBuf,
}

/// A row that can't be turned into a job
#[derive(Debug, Error)]
pub enum RowError {
    /// Unbalanced quotes in the options column
    #[error("Failed to split options `{0}`")]
    Options(String),
    /// `-r` is the last option
    #[error("Missing value for option `-r`")]
    MissingRange,
    /// The episode range is invalid
    #[error(transparent)]
    Range(#[from] RangeError),
}

fn range_values(args: &[String]) -> Result<Vec<&str>, RowError> {
    let mut values = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "-r" || arg == "--range" {
            let value = iter.next().ok_or(RowError::MissingRange)?;
            values.push(value.as_str());
        } else if let Some(value) = arg.strip_prefix("--range=") {
            values.push(value);
        } else if let Some(value) = arg.strip_prefix("-r") {
            values.push(value);
        }
    }
    Ok(values)
}

/// Turn a CSV row into a job
///
/// Returns `Ok(None)` for empty rows and comments.
pub fn plan_job(record: &StringRecord, dir: &Path) -> Result<Option<Job>, RowError> {
    let raw_id = record.get(0).unwrap_or_default();
    if raw_id.is_empty() || raw_id.starts_with('#') {
        return Ok(None);
    }
    let id = raw_id.trim();
    if id.is_empty() {
        return Ok(None);
    }
    let name = record.get(1).map(str::trim).unwrap_or_default();
    let options = record.get(2).map(str::trim).unwrap_or_default();

    let site = Site::for_id(id);
    let output = dir.join(site.folder()).join(site.file_name(id, name));

    let mut args = vec![site.flag().to_owned()];
    if !options.is_empty() {
        let split = shlex::split(options).ok_or_else(|| RowError::Options(options.to_owned()))?;
        for range in range_values(&split)? {
            parse_episode_range(range)?;
        }
        args.extend(split);
    }
    if !name.is_empty() {
        args.push("-o".to_owned());
        args.push(output.display().to_string());
    }
    args.push(id.to_owned());

    Ok(Some(Job { site, args, output }))
}

#[cfg(unix)]
fn set_readable(path: &Path) -> io::Result<()> {
    use std::{fs::Permissions, os::unix::fs::PermissionsExt};
    std::fs::set_permissions(path, Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_readable(_path: &Path) -> io::Result<()> {
    Ok(())
}

fn run_job(command: &str, job: &Job) {
    info!("RUN> {} {}", command, job.args.join(" "));
    match Command::new(command).args(&job.args).status() {
        Ok(status) if status.success() => {
            if job.output.exists() {
                if let Err(e) = set_readable(&job.output) {
                    let path = job.output.display();
                    warn!("Failed to set permissions of `{}`: {}", path, e);
                }
            }
        }
        Ok(status) => error!("Command failed ({})", status),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            error!("Command `{}` not found, is it on the PATH?", command)
        }
        Err(e) => error!("Failed to run `{}`: {}", command, e),
    }
}

fn process_csv(path: &Path, opts: &FetchOpts) -> eyre::Result<()> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .wrap_err_with(|| format!("Failed to open `{}`", path.display()))?;

    for (index, record) in reader.records().enumerate() {
        let record = record.wrap_err_with(|| {
            format!("Failed to read row {} of `{}`", index + 1, path.display())
        })?;
        match plan_job(&record, &opts.dir) {
            Ok(Some(job)) => run_job(&opts.command, &job),
            Ok(None) => {}
            Err(e) => error!("Skipping row {} of `{}`: {}", index + 1, path.display(), e),
        }
    }
    Ok(())
}

/// Process all CSV files, returns the number of files that could be read
pub fn run(opts: &FetchOpts) -> eyre::Result<usize> {
    for site in [Site::Narou, Site::Kakuyomu] {
        let folder = opts.dir.join(site.folder());
        std::fs::create_dir_all(&folder)
            .wrap_err_with(|| format!("Failed to create output folder `{}`", folder.display()))?;
    }

    let mut processed = 0;
    for csv_file in &opts.csv_files {
        if !csv_file.exists() {
            error!("CSV file `{}` not found, skipping", csv_file.display());
            continue;
        }
        info!("Processing `{}`", csv_file.display());
        processed += 1;
        if let Err(e) = process_csv(csv_file, opts) {
            error!("{:?}", e);
        }
    }
    Ok(processed)
}
