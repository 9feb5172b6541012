use indexmap::IndexMap;

use nom::{
    branch::permutation,
    bytes::complete::tag,
    character::complete::{multispace0, multispace1},
    combinator::{map, opt},
    multi::many0,
    sequence::{delimited, preceded, separated_pair, terminated, tuple},
    Err as NomErr, IResult,
};

use crate::{types, Error, Num};

mod char;

mod scalar;
use self::scalar::*;

pub(crate) fn file(input: &[u8]) -> Result<crate::Rcs, Error> {
    let (rest, admin) =
        delimited(multispace0, admin, multispace0)(input).map_err(to_error(input))?;
    let (rest, delta) = delta_section(rest, input)?;
    let (rest, desc) = terminated(desc, multispace0)(rest).map_err(to_error(input))?;
    let (rest, delta_text) = delta_text_section(rest, input)?;

    if !rest.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::ParseError {
            offset: offset_of(input, rest),
            kind: nom::error::ErrorKind::Eof,
        });
    }

    crate::Rcs::from_parts(admin, delta, desc, delta_text)
}

fn offset_of(input: &[u8], rest: &[u8]) -> usize {
    input.len() - rest.len()
}

/// Running off the end of the input while looking for a closing `@` or a
/// trailing `;` almost always means an unterminated `@`-string rather than
/// a structurally different grammar violation elsewhere in the file, so
/// those two nom error kinds are reported as `LexError` when they occur at
/// true EOF.
fn to_error(input: &[u8]) -> impl Fn(NomErr<nom::error::Error<&[u8]>>) -> Error + '_ {
    move |e| match e {
        NomErr::Incomplete(_) => Error::LexError { offset: input.len() },
        NomErr::Error(e) | NomErr::Failure(e) => {
            let offset = offset_of(input, e.input);
            if e.input.is_empty()
                && matches!(
                    e.code,
                    nom::error::ErrorKind::Tag | nom::error::ErrorKind::Eof
                )
            {
                Error::LexError { offset }
            } else {
                Error::ParseError { offset, kind: e.code }
            }
        }
    }
}

/// Parses the run of delta-header records one at a time (rather than with
/// `many0` + `collect`, which would silently let a later header overwrite an
/// earlier one) so a duplicate revision can be rejected at the byte offset
/// of its second occurrence, matching `delta_text_section` below.
fn delta_section<'a>(
    mut input: &'a [u8],
    whole: &[u8],
) -> Result<(&'a [u8], IndexMap<Num, types::Delta>), Error> {
    let mut map = IndexMap::new();

    loop {
        let trimmed = match multispace0::<_, nom::error::Error<&[u8]>>(input) {
            Ok((rest, _)) => rest,
            Err(_) => input,
        };

        match delta(trimmed) {
            Ok((rest, (revision, d))) => {
                if map.contains_key(&revision) {
                    return Err(Error::ParseError {
                        offset: offset_of(whole, trimmed),
                        kind: nom::error::ErrorKind::Verify,
                    });
                }
                map.insert(revision, d);
                input = rest;
            }
            Err(NomErr::Error(_)) => {
                input = trimmed;
                break;
            }
            Err(e) => return Err(to_error(whole)(e)),
        }
    }

    Ok((input, map))
}

/// Parses the trailing run of deltatext records one at a time (rather than
/// with `many0` + `collect`, which would silently let a later record
/// overwrite an earlier one) so a duplicate key can be rejected at the byte
/// offset of its second occurrence.
fn delta_text_section<'a>(
    mut input: &'a [u8],
    whole: &[u8],
) -> Result<(&'a [u8], IndexMap<Num, types::DeltaText>), Error> {
    let mut map = IndexMap::new();

    loop {
        let trimmed = match multispace0::<_, nom::error::Error<&[u8]>>(input) {
            Ok((rest, _)) => rest,
            Err(_) => input,
        };

        match delta_text(trimmed) {
            Ok((rest, (num, dt))) => {
                if map.contains_key(&num) {
                    return Err(Error::ParseError {
                        offset: offset_of(whole, trimmed),
                        kind: nom::error::ErrorKind::Verify,
                    });
                }
                map.insert(num, dt);
                input = rest;
            }
            Err(NomErr::Error(_)) => {
                input = trimmed;
                break;
            }
            Err(e) => return Err(to_error(whole)(e)),
        }
    }

    Ok((input, map))
}

fn newphrase(input: &[u8]) -> IResult<&[u8], types::Newphrase> {
    map(
        tuple((
            id,
            preceded(multispace0, newphrase_value),
            preceded(multispace0, tag(b";")),
            multispace0,
        )),
        |(name, value, _, _)| types::Newphrase { name, value },
    )(input)
}

fn admin(input: &[u8]) -> IResult<&[u8], types::Admin> {
    map(
        tuple((
            permutation((
                delimited(
                    tuple((tag(b"head"), multispace1)),
                    opt(num),
                    tuple((multispace0, tag(b";"), multispace0)),
                ),
                map(
                    opt(delimited(
                        tuple((tag(b"branch"), multispace1)),
                        opt(num),
                        tuple((multispace0, tag(b";"), multispace0)),
                    )),
                    |branch| branch.flatten(),
                ),
                delimited(
                    tag(b"access"),
                    many0(preceded(multispace1, id)),
                    tuple((multispace0, tag(b";"), multispace0)),
                ),
                delimited(
                    tag(b"symbols"),
                    nom::multi::fold_many0(
                        separated_pair(
                            delimited(multispace0, sym, multispace0),
                            tag(b":"),
                            delimited(multispace0, num, multispace0),
                        ),
                        IndexMap::new,
                        |mut acc, (k, v)| {
                            acc.insert(k, v);
                            acc
                        },
                    ),
                    tuple((multispace0, tag(b";"), multispace0)),
                ),
                delimited(
                    tag(b"locks"),
                    nom::multi::fold_many0(
                        separated_pair(
                            delimited(multispace0, id, multispace0),
                            tag(b":"),
                            delimited(multispace0, num, multispace0),
                        ),
                        IndexMap::new,
                        |mut acc, (k, v)| {
                            acc.insert(k, v);
                            acc
                        },
                    ),
                    tuple((multispace0, tag(b";"), multispace0)),
                ),
                map(
                    opt(tuple((tag(b"strict"), multispace0, tag(b";"), multispace0))),
                    |strict| strict.is_some(),
                ),
                opt(delimited(
                    tuple((tag(b"integrity"), multispace1)),
                    integrity_string,
                    tuple((multispace0, tag(b";"), multispace0)),
                )),
                opt(delimited(
                    tuple((tag(b"comment"), multispace1)),
                    string,
                    tuple((multispace0, tag(b";"), multispace0)),
                )),
                opt(delimited(
                    tuple((tag(b"expand"), multispace1)),
                    string,
                    tuple((multispace0, tag(b";"), multispace0)),
                )),
            )),
            many0(newphrase),
        )),
        |(
            (head, branch, access, symbols, locks, strict, integrity, comment, expand),
            newphrases,
        )| types::Admin {
            head,
            branch,
            access,
            symbols,
            locks,
            strict,
            integrity,
            comment,
            expand,
            newphrases,
        },
    )(input)
}

fn delta(input: &[u8]) -> IResult<&[u8], (Num, types::Delta)> {
    map(
        tuple((
            terminated(num, multispace1),
            permutation((
                delimited(
                    tuple((tag(b"date"), multispace1)),
                    date,
                    tuple((multispace0, tag(b";"), multispace0)),
                ),
                delimited(
                    tuple((tag(b"author"), multispace1)),
                    id,
                    tuple((multispace0, tag(b";"), multispace0)),
                ),
                delimited(
                    tuple((tag(b"state"), multispace1)),
                    opt(id),
                    tuple((multispace0, tag(b";"), multispace0)),
                ),
                delimited(
                    tag(b"branches"),
                    many0(preceded(multispace1, num)),
                    tuple((multispace0, tag(b";"), multispace0)),
                ),
                delimited(
                    tuple((tag(b"next"), multispace1)),
                    opt(num),
                    tuple((multispace0, tag(b";"), multispace0)),
                ),
                opt(delimited(
                    tuple((tag(b"commitid"), multispace1)),
                    sym,
                    tuple((multispace0, tag(b";"), multispace0)),
                )),
            )),
            many0(newphrase),
        )),
        |(num, (date, author, state, branches, next, commit_id), newphrases)| {
            (
                num,
                types::Delta {
                    date,
                    author,
                    state,
                    branches,
                    next,
                    commit_id,
                    newphrases,
                },
            )
        },
    )(input)
}

fn delta_text(input: &[u8]) -> IResult<&[u8], (Num, types::DeltaText)> {
    map(
        tuple((
            num,
            preceded(multispace1, tag(b"log")),
            delimited(multispace1, string, multispace1),
            tag(b"text"),
            preceded(multispace1, string),
        )),
        |(num, _, log, _, text)| (num, types::DeltaText { log, text }),
    )(input)
}

fn desc(input: &[u8]) -> IResult<&[u8], types::Desc> {
    preceded(tuple((tag(b"desc"), multispace1)), string)(input)
}
