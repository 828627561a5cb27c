//! Byte and duration counts as bpftrace prints them in histogram ranges:
//! plain integers, or integers with a `K`, `M` or `G` power-of-1024 suffix.

use crate::error::Error;
use nom::{
    IResult, Parser,
    character::complete::{digit1, one_of},
    combinator::{all_consuming, opt},
};

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Recognize a size token such as `4K` or `256` at the front of `input`.
///
/// Fails (rather than wrapping) when the value does not fit in a `u64`.
pub(crate) fn size_token(input: &str) -> IResult<&str, u64> {
    let (rest, (digits, suffix)) = (digit1, opt(one_of("KMGkmg"))).parse(input)?;

    let multiplier = match suffix.map(|c| c.to_ascii_uppercase()) {
        Some('K') => KIB,
        Some('M') => MIB,
        Some('G') => GIB,
        _ => 1,
    };

    let value = digits
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| {
            nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::TooLarge,
            ))
        })?;

    Ok((rest, value))
}

/// Parse a token like `"4K"`, `"256"` or `"1m"` into a count.
///
/// # Errors
///
/// Returns `Error::ParseError` if `s` is not digits followed by an optional
/// `K`/`M`/`G` suffix, or the value overflows a `u64`.
pub fn parse_size(s: &str) -> Result<u64, Error> {
    let (_, value) = all_consuming(size_token).parse(s)?;
    Ok(value)
}

/// Render a count with the largest suffix that divides it evenly.
///
/// Values that are not a whole multiple of 1024 come back as plain decimals,
/// so `1536` stays `"1536"` rather than becoming `"1.5K"`.
#[must_use]
pub fn format_size(n: u64) -> String {
    if n >= GIB && n.is_multiple_of(GIB) {
        return format!("{}G", n / GIB);
    }
    if n >= MIB && n.is_multiple_of(MIB) {
        return format!("{}M", n / MIB);
    }
    if n >= KIB && n.is_multiple_of(KIB) {
        return format!("{}K", n / KIB);
    }
    n.to_string()
}
