//! # Episode ranges
//!
//! Ranges select episodes of a novel, e.g. `1,5-7` for the episodes 1, 5,
//! 6 and 7. Spaces are ignored, numbers start at 1.

use std::collections::BTreeSet;

use displaydoc::Display;
use nom::{
    character::complete::{char, digit0, satisfy},
    combinator::{all_consuming, map, opt, recognize},
    multi::separated_list1,
    sequence::{pair, preceded},
    Finish, IResult,
};
use thiserror::Error;

/// The largest episode number a range may end at (10000)
pub const MAX_EPISODE: u32 = 10_000;

/// Error when parsing an episode range
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum RangeError {
    /// Unexpected range format: `{0}`
    Format(String),
    /// Range value is too large: {0}
    TooLarge(u64),
}

/// A number without leading zeros, saturating at `u64::MAX`
fn number(input: &str) -> IResult<&str, u64> {
    let digits = recognize(pair(satisfy(|c| ('1'..='9').contains(&c)), digit0));
    map(digits, |s: &str| s.parse().unwrap_or(u64::MAX))(input)
}

fn p_range(input: &str) -> IResult<&str, (u64, Option<u64>)> {
    pair(number, opt(preceded(char('-'), number)))(input)
}

fn p_range_list(input: &str) -> IResult<&str, Vec<(u64, Option<u64>)>> {
    separated_list1(char(','), p_range)(input)
}

/// Parse a list of episodes and episode ranges into the set of episodes
///
/// The end of a range may not exceed [`MAX_EPISODE`]. Single episodes
/// are only limited by `u32`.
///
/// ```
/// # use nepub_util::parse_episode_range;
/// let episodes = parse_episode_range("1, 5 - 7").unwrap();
/// assert_eq!(vec![1, 5, 6, 7], episodes.into_iter().collect::<Vec<_>>());
/// ```
pub fn parse_episode_range(input: &str) -> Result<BTreeSet<u32>, RangeError> {
    let cleaned: String = input.chars().filter(|&c| c != ' ').collect();
    let (_, ranges) = all_consuming(p_range_list)(cleaned.as_str())
        .finish()
        .map_err(|_| RangeError::Format(cleaned.clone()))?;

    let mut episodes = BTreeSet::new();
    for (start, end) in ranges {
        match end {
            Some(end) if end > u64::from(MAX_EPISODE) => {
                return Err(RangeError::TooLarge(end));
            }
            Some(end) => {
                episodes.extend((start..=end).filter_map(|n| u32::try_from(n).ok()));
            }
            None => {
                let episode = u32::try_from(start).map_err(|_| RangeError::TooLarge(start))?;
                episodes.insert(episode);
            }
        }
    }
    Ok(episodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[u32]) -> BTreeSet<u32> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_ranges() {
        assert_eq!(Ok(set(&[1, 2, 3])), parse_episode_range("1,2,3"));
        assert_eq!(Ok(set(&[1, 2, 3])), parse_episode_range("1, 2, 3"));
        assert_eq!(Ok(set(&[1, 2, 3])), parse_episode_range("1-3"));
        assert_eq!(Ok(set(&[1, 5, 6, 7])), parse_episode_range("1,5-7"));
        assert_eq!(Ok(set(&[1, 5, 6, 7])), parse_episode_range("1, 5 - 7"));
        assert_eq!(Ok(set(&[10_000])), parse_episode_range("10000-10000"));
    }

    #[test]
    fn test_reversed_range_is_empty() {
        assert_eq!(Ok(set(&[2])), parse_episode_range("7-5,2"));
    }

    #[test]
    fn test_format_errors() {
        for input in ["1,,2", "1-", "", "0", "01", "1-2-3", "a", ",1", "1,"] {
            assert!(
                matches!(parse_episode_range(input), Err(RangeError::Format(_))),
                "{:?}",
                input
            );
        }
        let err = parse_episode_range("1,,2").unwrap_err();
        assert_eq!("Unexpected range format: `1,,2`", err.to_string());
    }

    #[test]
    fn test_too_large() {
        assert_eq!(
            Err(RangeError::TooLarge(99999)),
            parse_episode_range("1-99999")
        );
        // single episodes are only limited by their type
        assert_eq!(Ok(set(&[99999])), parse_episode_range("99999"));
        assert_eq!(Ok(set(&[u32::MAX])), parse_episode_range("4294967295"));
        assert_eq!(
            Err(RangeError::TooLarge(99_999_999_999)),
            parse_episode_range("1,99999999999")
        );
        assert_eq!(
            Err(RangeError::TooLarge(u64::MAX)),
            parse_episode_range("99999999999999999999999")
        );
        // a reversed range with a huge start is still empty
        assert_eq!(Ok(set(&[])), parse_episode_range("99999999999-3"));
    }
}
