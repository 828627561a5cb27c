mod key;

pub use key::{key_pair, key_parts, numeric_key_pair};

use crate::histogram::Bucket;
use crate::size::size_token;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{self, multispace0, multispace1},
    combinator::{all_consuming, value},
    sequence::preceded,
};

/// The shape of one line of bpftrace output, before any histogram context
/// is taken into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// `scan <uint>`, one sample of a streamed event
    ScanEvent(u64),
    /// `@name: <uint>`
    Scalar { name: &'a str, value: u64 },
    /// `@name[<key>]: <uint>`
    Keyed {
        name: &'a str,
        key: &'a str,
        value: u64,
    },
    /// `@name:` or `@name[<key>]:` with no value; buckets follow
    Header { name: &'a str, key: &'a str },
    Blank,
    Other,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn map_name(input: &str) -> IResult<&str, &str> {
    preceded(complete::char('@'), take_while1(is_word_char)).parse(input)
}

/// `\s*<uint>` running to the end of the line
fn trailing_count(input: &str) -> IResult<&str, u64> {
    all_consuming(preceded(multispace0, complete::u64)).parse(input)
}

fn scan_event(input: &str) -> IResult<&str, u64> {
    all_consuming(preceded((tag("scan"), multispace1), complete::u64)).parse(input)
}

fn scalar(input: &str) -> IResult<&str, (&str, u64)> {
    let (input, name) = map_name(input)?;
    let (input, _) = complete::char(':').parse(input)?;
    let (input, value) = trailing_count(input)?;
    Ok((input, (name, value)))
}

/// Split `key]:rest` at the first `]:` for which `accept(rest)` holds.
fn split_key<'a, T>(
    body: &'a str,
    mut accept: impl FnMut(&'a str) -> Option<T>,
) -> Option<(&'a str, T)> {
    body.match_indices("]:").find_map(|(idx, _)| {
        let key = body.get(..idx)?;
        let rest = body.get(idx + 2..)?;
        accept(rest).map(|t| (key, t))
    })
}

fn keyed(input: &str) -> IResult<&str, (&str, &str, u64)> {
    let (body, name) = map_name(input)?;
    let (body, _) = complete::char('[').parse(body)?;

    match split_key(body, |rest| trailing_count(rest).ok().map(|(_, v)| v)) {
        Some((key, value)) => Ok(("", (name, key, value))),
        None => Err(nom::Err::Error(nom::error::Error::new(
            body,
            nom::error::ErrorKind::TakeUntil,
        ))),
    }
}

fn header(input: &str) -> IResult<&str, (&str, &str)> {
    let (body, name) = map_name(input)?;
    let (body, bracketed) = alt((
        value(false, complete::char(':')),
        value(true, complete::char('[')),
    ))
    .parse(body)?;

    if !bracketed {
        return Ok((body, (name, "")));
    }

    match split_key(body, Some) {
        Some((key, rest)) => Ok((rest, (name, key))),
        None => Err(nom::Err::Error(nom::error::Error::new(
            body,
            nom::error::ErrorKind::TakeUntil,
        ))),
    }
}

/// Classify a line by trying each shape in precedence order: scan event,
/// scalar, keyed, then histogram header.
pub(crate) fn classify(line: &str) -> Line<'_> {
    let line = line.trim_end();

    if line.is_empty() {
        return Line::Blank;
    }
    if let Ok((_, value)) = scan_event(line) {
        return Line::ScanEvent(value);
    }
    if let Ok((_, (name, value))) = scalar(line) {
        return Line::Scalar { name, value };
    }
    if let Ok((_, (name, key, value))) = keyed(line) {
        return Line::Keyed { name, key, value };
    }
    if let Ok((_, (name, key))) = header(line) {
        return Line::Header { name, key };
    }
    Line::Other
}

/// `[<start>, <end>) <count>`
fn bucket_at(input: &str) -> IResult<&str, Bucket> {
    let (input, _) = complete::char('[').parse(input)?;
    let (input, start) = size_token(input)?;
    let (input, _) = (complete::char(','), multispace0).parse(input)?;
    let (input, end) = size_token(input)?;
    let (input, _) = (complete::char(')'), multispace1).parse(input)?;
    let (input, count) = complete::u64(input)?;
    Ok((input, Bucket::new(start, end, count)))
}

/// Find the first well-formed bucket anywhere in `line`.
pub(crate) fn find_bucket(line: &str) -> Option<Bucket> {
    line.match_indices('[')
        .find_map(|(idx, _)| bucket_at(line.get(idx..)?).ok().map(|(_, b)| b))
}

/// Whether `line` reads as an attempt at a bucket row, well formed or not.
pub(crate) fn looks_like_bucket(line: &str) -> bool {
    line.trim_start().starts_with('[')
}
