use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre;
use log::{error, info, LevelFilter};

use nepub_tools::cli::fetch::{self, FetchOpts};

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .parse_env("NEPUB_LOG")
        .init();
    let opt = FetchOpts::parse();

    let processed = fetch::run(&opt)?;
    if processed == 0 {
        error!("None of the given CSV files could be processed");
        return Ok(ExitCode::FAILURE);
    }

    info!("All done, the EPUB files are in `{}`", opt.dir.display());
    Ok(ExitCode::SUCCESS)
}
