//! # EPUB cover tool
#![warn(missing_docs)]

use color_eyre::eyre;
use log::error;
use nepub_tools::cli::{
    self,
    cover::{self, CoverOpts},
};

fn main() -> eyre::Result<()> {
    let opts: CoverOpts = cli::init()?;

    let invocation = match opts.invocation() {
        Ok(invocation) => invocation,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", cover::usage());
            std::process::exit(1);
        }
    };
    cover::run(&opts, invocation)
}
