use derive_more::{Deref, From, Into};
use indexmap::IndexMap;

use crate::Num;

/// An unknown admin- or delta-header phrase RCS's `newphrase` grammar rule
/// allows for forward compatibility. Captured verbatim (name plus the raw
/// bytes of its value list) so it can be re-emitted unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Newphrase {
    pub name: Id,
    pub value: Vec<u8>,
}

/// The file-level admin section: access control, symbolic names, locks, and
/// the handful of optional free-form fields.
#[derive(Debug, Clone)]
pub struct Admin {
    pub head: Option<Num>,
    pub branch: Option<Num>,
    pub access: Vec<Id>,
    pub symbols: IndexMap<Sym, Num>,
    pub locks: IndexMap<Id, Num>,
    pub strict: bool,
    pub integrity: Option<IntString>,
    pub comment: Option<VString>,
    pub expand: Option<VString>,
    pub newphrases: Vec<Newphrase>,
}

/// The grammar-level delta header, as it appears in the file's delta
/// section (date/author/state/branches/next/commitid). Doesn't carry the
/// log or text, which live in a separate deltatext record further down the
/// file; [`RcsDelta`] is the merged, caller-facing view of both.
#[derive(Debug, Clone)]
pub struct Delta {
    pub date: Date,
    pub author: Id,
    pub state: Option<Id>,
    pub branches: Vec<Num>,
    pub next: Option<Num>,
    pub commit_id: Option<Sym>,
    pub newphrases: Vec<Newphrase>,
}

pub type Desc = VString;

/// The grammar-level deltatext record: a revision's log message and its
/// stored text (full snapshot or ed diff, undistinguished at this layer).
#[derive(Debug, Clone)]
pub struct DeltaText {
    pub log: VString,
    pub text: VString,
}

/// A dotted RCS date, `YY.MM.DD.hh.mm.ss`, kept verbatim rather than parsed
/// into a calendar type: the library never needs to do date arithmetic, and
/// interpreting two- vs four-digit years is a presentation concern outside
/// this crate's scope.
#[derive(Debug, Clone, PartialEq, Eq, Deref, From, Into, Hash)]
pub struct Date(pub Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq, Deref, From, Into, Hash)]
pub struct Id(pub Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq, Deref, From, Into, Hash)]
pub struct Sym(pub Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq, Deref, From, Into, Hash)]
pub struct VString(pub Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq, Deref, From, Into, Hash)]
pub struct IntString(pub Vec<u8>);
