//! A module for parsing fixture files back into operations and answers.
//!
//! Fixtures are whitespace separated token streams. Consumers are expected to
//! tolerate any run of whitespace between tokens, so these parsers do too,
//! even though the writer always emits single spaces.

extern crate nom;

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{digit1, multispace0, multispace1};
use nom::combinator::{all_consuming, map, map_res, opt, recognize};
use nom::multi::many0;
use nom::sequence::{pair, preceded, terminated, tuple};
use nom::IResult;

use crate::operation::{Key, Operation};

#[inline(always)]
fn parse_key(i: &[u8]) -> IResult<&[u8], Key> {
    map_res(
        recognize(pair(opt(alt((tag("+"), tag("-")))), digit1)),
        |digits: &[u8]| -> Result<Key, ()> {
            let s = std::str::from_utf8(digits).map_err(|_| ())?;
            s.parse::<Key>().map_err(|_| ())
        },
    )(i)
}

#[inline(always)]
fn parse_count(i: &[u8]) -> IResult<&[u8], u64> {
    map_res(digit1, |digits: &[u8]| -> Result<u64, ()> {
        let s = std::str::from_utf8(digits).map_err(|_| ())?;
        s.parse::<u64>().map_err(|_| ())
    })(i)
}

#[inline(always)]
fn parse_insert(i: &[u8]) -> IResult<&[u8], Operation> {
    map(preceded(pair(tag("k"), multispace1), parse_key), |key| {
        Operation::Insert { key }
    })(i)
}

#[inline(always)]
fn parse_query(i: &[u8]) -> IResult<&[u8], Operation> {
    map(
        tuple((tag("q"), multispace1, parse_key, multispace1, parse_key)),
        |(_, _, low, _, high)| Operation::Query { low, high },
    )(i)
}

fn parse_operation(i: &[u8]) -> IResult<&[u8], Operation> {
    alt((parse_insert, parse_query))(i)
}

fn operations(i: &[u8]) -> IResult<&[u8], Vec<Operation>> {
    all_consuming(terminated(
        many0(preceded(multispace0, parse_operation)),
        multispace0,
    ))(i)
}

fn answers(i: &[u8]) -> IResult<&[u8], Vec<u64>> {
    all_consuming(terminated(
        many0(preceded(multispace0, parse_count)),
        multispace0,
    ))(i)
}

/// Parses the contents of a `.dat` file, `i`, into its operations.
/// Returns `None` if any part of `i` is not a `k <key>` or `q <low> <high>`
/// token group. Empty input is a valid, empty fixture.
pub fn parse_operations(i: &[u8]) -> Option<Vec<Operation>> {
    operations(i).ok().map(|(_, ops)| ops)
}

/// Parses the contents of a `.ans` file into its answers. Returns `None` if
/// anything other than non-negative integers and whitespace is present.
pub fn parse_answers(i: &[u8]) -> Option<Vec<u64>> {
    answers(i).ok().map(|(_, counts)| counts)
}
