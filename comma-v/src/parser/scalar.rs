use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1, take_while, take_while1},
    combinator::{map, map_res, value},
    multi::fold_many0,
    sequence::delimited,
    IResult,
};

use super::char::*;
use crate::{types, Num};

pub(super) fn integrity_string(input: &[u8]) -> IResult<&[u8], types::IntString> {
    // TODO: thirdp support
    map(
        delimited(tag(b"@"), take_while(is_intchar), tag(b"@")),
        |bytes| types::IntString(Vec::from(bytes)),
    )(input)
}

pub(super) fn id(input: &[u8]) -> IResult<&[u8], types::Id> {
    map(take_while(|c| is_idchar(c) || c == b'.'), |bytes| {
        types::Id(Vec::from(bytes))
    })(input)
}

pub(super) fn numlike(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(|c: u8| c == b'.' || c.is_ascii_digit())(input)
}

pub(super) fn date(input: &[u8]) -> IResult<&[u8], types::Date> {
    map(numlike, |bytes| types::Date(Vec::from(bytes)))(input)
}

pub(super) fn num(input: &[u8]) -> IResult<&[u8], Num> {
    map_res(numlike, |bytes| {
        Num::from_str(std::str::from_utf8(bytes).map_err(|_| ())?).map_err(|_| ())
    })(input)
}

pub(super) fn string_literal(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_till1(|c| c == b'@')(input)
}

pub(super) fn string_escape(input: &[u8]) -> IResult<&[u8], &[u8]> {
    value(&b"@"[..], tag(b"@@"))(input)
}

pub(super) fn string(input: &[u8]) -> IResult<&[u8], types::VString> {
    map(
        delimited(
            tag(b"@"),
            fold_many0(
                alt((string_literal, string_escape)),
                Vec::new,
                |mut v, fragment| {
                    v.extend_from_slice(fragment);
                    v
                },
            ),
            tag(b"@"),
        ),
        |bytes| types::VString(bytes),
    )(input)
}

pub(super) fn sym(input: &[u8]) -> IResult<&[u8], types::Sym> {
    map(take_while(is_idchar), |bytes| types::Sym(Vec::from(bytes)))(input)
}

/// A `newphrase` value: for round-tripping purposes we don't interpret its
/// internal grammar (it may mix words, ids, numbers, and strings), so we
/// just capture every byte up to (not including) the terminating `;`.
pub(super) fn newphrase_value(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    map(nom::bytes::complete::take_till(|c| c == b';'), Vec::from)(input)
}
