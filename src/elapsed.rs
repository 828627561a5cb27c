//! Elapsed times as `ps -o etime` prints them: `[dd-]hh:mm:ss` or `mm:ss`.

use crate::error::Error;
use nom::{
    IResult, Parser,
    character::complete::{self, char},
    combinator::{all_consuming, opt},
    multi::separated_list1,
    sequence::terminated,
};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

fn elapsed(input: &str) -> IResult<&str, (Option<u64>, Vec<u64>)> {
    all_consuming((
        opt(terminated(complete::u64, char('-'))),
        separated_list1(char(':'), complete::u64),
    ))
    .parse(input)
}

/// Convert an elapsed time such as `"2-01:23:45"`, `"01:23:45"` or `"23:45"`
/// into seconds.
///
/// Fields are not range checked, so `"90:00"` is 5400 seconds.
///
/// # Errors
///
/// Returns `Error::ParseError` for any other shape, or when the total does
/// not fit in a `u64`.
pub fn parse_elapsed(s: &str) -> Result<u64, Error> {
    let invalid = || Error::ParseError(format!("Invalid time format: '{s}'"));

    let Ok((_, (days, fields))) = elapsed(s.trim()) else {
        return Err(invalid());
    };
    let (hours, minutes, seconds) = match fields.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => (0, *m, *s),
        _ => return Err(invalid()),
    };

    [
        (days.unwrap_or(0), DAY),
        (hours, HOUR),
        (minutes, MINUTE),
        (seconds, 1),
    ]
    .into_iter()
    .try_fold(0u64, |acc, (value, unit)| {
        value.checked_mul(unit).and_then(|v| acc.checked_add(v))
    })
    .ok_or_else(invalid)
}
