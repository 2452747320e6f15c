#![warn(missing_docs)]
//! # Shared helpers for the nepub tools

pub mod range;

pub use range::{parse_episode_range, RangeError, MAX_EPISODE};
