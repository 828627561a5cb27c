use nom::{
    IResult, Parser,
    bytes::complete::take_till1,
    character::complete::{self, space0},
    combinator::all_consuming,
    multi::separated_list1,
    sequence::terminated,
};

fn parts(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(
        (complete::char(','), space0),
        take_till1(|c: char| c == ','),
    ))
    .parse(input)
}

/// Split a composite map key such as `"0, 1"` into its trimmed components.
///
/// Keys that cannot be split (empty, or with an empty component) come back
/// whole as a single part.
#[must_use]
pub fn key_parts(key: &str) -> Vec<&str> {
    match parts(key) {
        Ok((_, parts)) => parts.into_iter().map(str::trim).collect(),
        Err(_) => vec![key],
    }
}

/// The two halves of a two-component key, or `None` for any other arity.
#[must_use]
pub fn key_pair(key: &str) -> Option<(&str, &str)> {
    match key_parts(key).as_slice() {
        [first, second] => Some((*first, *second)),
        _ => None,
    }
}

fn numeric_pair(input: &str) -> IResult<&str, (u64, u64)> {
    all_consuming((
        terminated(complete::u64, (complete::char(','), space0)),
        complete::u64,
    ))
    .parse(input)
}

/// A `"<uint>, <uint>"` key as a pair of numbers.
#[must_use]
pub fn numeric_key_pair(key: &str) -> Option<(u64, u64)> {
    numeric_pair(key.trim()).ok().map(|(_, pair)| pair)
}
