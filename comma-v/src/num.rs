use std::{convert::TryFrom, fmt::Display, str::FromStr};

use itertools::Itertools;

use crate::Error;

/// A dotted RCS revision number, e.g. `1.4` or `1.3.1.2`.
///
/// An RCS revision number is either a *revision* (even component count,
/// identifying a single delta) or a *branch* (odd component count,
/// identifying the point deltas on that branch hang off of). This type
/// doesn't distinguish the two at the type level, since the same bytes flow
/// through both roles depending on context (a delta's `next` is always a
/// revision; `branches` entries and `admin.branch` are branches).
///
/// The RCS grammar permits leading zero components as a magic-revision
/// convention; this implementation keeps them, since dropping them silently
/// would break byte round-tripping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Num(Vec<u64>);

impl Num {
    pub fn new(components: Vec<u64>) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }

    /// A revision number has an even number of components: it names a
    /// single delta.
    pub fn is_revision(&self) -> bool {
        !self.0.is_empty() && self.0.len() % 2 == 0
    }

    /// A branch number has an odd number of components: it names the point
    /// a branch forks from its parent, not a delta directly.
    pub fn is_branch(&self) -> bool {
        self.0.len() % 2 == 1
    }

    /// The revision this branch forked from, e.g. `1.3.1` forked from `1.3`.
    /// `None` for a root branch such as `1`.
    pub fn branch_point(&self) -> Option<Num> {
        if self.0.len() <= 1 {
            None
        } else {
            Some(Num(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Pairwise positional addition: `self + delta`, with components beyond
    /// the shorter operand (the delta) copied through unchanged.
    /// `IncrementNum("1.4", "0.1") == "1.5"`.
    pub fn increment(&self, delta: &Num) -> Result<Num, Error> {
        if delta.0.len() > self.0.len() {
            return Err(Error::InvalidNum(format!(
                "cannot increment {} by {}: delta is longer",
                self, delta
            )));
        }

        let mut result = self.0.clone();
        for (r, d) in result.iter_mut().zip(delta.0.iter()) {
            *r += d;
        }
        Ok(Num(result))
    }

    /// Positional subtraction: `self - delta`, the inverse of [`Num::increment`].
    /// Result components may be zero; the result is an offset, not
    /// necessarily a valid revision number on its own.
    pub fn decrement(&self, delta: &Num) -> Result<Num, Error> {
        if delta.0.len() > self.0.len() {
            return Err(Error::InvalidNum(format!(
                "cannot decrement {} by {}: delta is longer",
                self, delta
            )));
        }

        let mut result = self.0.clone();
        for (r, d) in result.iter_mut().zip(delta.0.iter()) {
            *r = r.checked_sub(*d).ok_or_else(|| {
                Error::InvalidNum(format!("cannot decrement {} by {}: underflow", self, delta))
            })?;
        }
        Ok(Num(result))
    }
}

impl TryFrom<&[u8]> for Num {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_str(
            std::str::from_utf8(value)
                .map_err(|_| Error::InvalidNum(String::from_utf8_lossy(value).to_string()))?,
        )
    }
}

impl FromStr for Num {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::InvalidNum(s.to_string()));
        }

        s.split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| Error::InvalidNum(s.to_string()))
            })
            .collect::<Result<Vec<u64>, Error>>()
            .map(Num)
    }
}

impl Display for Num {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .map(|part| part.to_string())
                .intersperse(String::from("."))
                .collect::<String>()
        )
    }
}

impl PartialEq<&str> for Num {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}
