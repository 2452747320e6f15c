//! # nepub tools
//!
//! Command line front ends for the `nepub-cover` and `nepub-util` crates.
#![warn(missing_docs)]

pub mod cli;
