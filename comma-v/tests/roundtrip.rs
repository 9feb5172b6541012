//! Whole-file round-trip and chain-reconstruction coverage that needs a
//! multi-revision fixture, rather than the single-delta fixtures exercised
//! inline next to the parser and model code they test.

use std::str::FromStr;

use comma_v::{types::Id, Error, Num};

/// A three-revision trunk: `1.3` (head, full snapshot) back through `1.2`
/// to `1.1`, each delta's text a diff against the content held one step
/// closer to the head, matching how `rcsfile(5)` actually stores deltas.
const TRUNK: &[u8] = b"head\t1.3;\naccess;\nsymbols;\nlocks; strict;\ncomment\t@# @;\n\n\n1.3\ndate\t2021.09.01.12.00.00;\tauthor adam;\tstate Exp;\nbranches;\nnext\t1.2;\n\n1.2\ndate\t2021.08.20.17.34.26;\tauthor adam;\tstate Exp;\nbranches;\nnext\t1.1;\n\n1.1\ndate\t2021.08.11.19.08.27;\tauthor eve;\tstate Exp;\nbranches;\nnext\t;\n\n\ndesc\n@@\n\n\n1.3\nlog\n@third commit\n@\ntext\n@one\ntwo\nthree\n@\n1.2\nlog\n@second commit\n@\ntext\n@d3 1\n@\n1.1\nlog\n@first commit\n@\ntext\n@d2 1\n@\n";

const DUPLICATE_DELTA_TEXT: &[u8] = b"head\t1.1;\naccess;\nsymbols;\nlocks;\n\n\n1.1\ndate\t2021.08.11.19.08.27;\tauthor adam;\tstate Exp;\nbranches;\nnext\t;\n\n\ndesc\n@@\n\n\n1.1\nlog\n@a\n@\ntext\n@a\n@\n1.1\nlog\n@b\n@\ntext\n@b\n@\n";

const UNTERMINATED_STRING: &[u8] = b"head\t1.1;\naccess;\nsymbols;\nlocks;\n\n\n1.1\ndate\t2021.08.11.19.08.27;\tauthor adam;\tstate Exp;\nbranches;\nnext\t;\n\n\ndesc\n@@\n\n\n1.1\nlog\n@a\n@\ntext\n@unterminated";

/// `head` names a revision that has no corresponding delta record at all.
const HEAD_NOT_IN_DELTAS: &[u8] = b"head\t1.2;\naccess;\nsymbols;\nlocks;\n\n\n1.1\ndate\t2021.08.11.19.08.27;\tauthor adam;\tstate Exp;\nbranches;\nnext\t;\n\n\ndesc\n@@\n\n\n1.1\nlog\n@a\n@\ntext\n@a\n@\n";

const DUPLICATE_DELTA_HEADER: &[u8] = b"head\t1.1;\naccess;\nsymbols;\nlocks;\n\n\n1.1\ndate\t2021.08.11.19.08.27;\tauthor adam;\tstate Exp;\nbranches;\nnext\t;\n\n1.1\ndate\t2021.08.12.19.08.27;\tauthor eve;\tstate Exp;\nbranches;\nnext\t;\n\n\ndesc\n@@\n\n\n1.1\nlog\n@a\n@\ntext\n@a\n@\n";

fn num(s: &str) -> Num {
    Num::from_str(s).unwrap()
}

#[test]
fn property_semantic_round_trip_preserves_every_delta() {
    let rcs = comma_v::parse(TRUNK).unwrap();
    let reparsed = comma_v::parse(&comma_v::emit(&rcs)).unwrap();

    assert_eq!(reparsed.get_head(), rcs.get_head());
    assert_eq!(reparsed.delta_count(), rcs.delta_count());
    for (revision, delta) in rcs.deltas() {
        let other = reparsed.get_delta(revision).expect("revision survived the round trip");
        assert_eq!(other.get_author(), delta.get_author());
        assert_eq!(other.get_next(), delta.get_next());
        assert_eq!(other.is_diff(), delta.is_diff());
    }
    for revision in [num("1.1"), num("1.2"), num("1.3")] {
        assert_eq!(reparsed.checkout(&revision).unwrap(), rcs.checkout(&revision).unwrap());
    }
}

#[test]
fn property_emit_is_idempotent() {
    // A second parse/emit cycle over already-emitted bytes must settle on
    // exactly the same bytes: the emitter has one canonical rendition of
    // any given `Rcs` value, so there's nothing left to normalize away.
    let once = comma_v::emit(&comma_v::parse(TRUNK).unwrap());
    let twice = comma_v::emit(&comma_v::parse(&once).unwrap());
    assert_eq!(once, twice);
}

#[test]
fn s1_checkout_reconstructs_every_revision_on_the_trunk() {
    let rcs = comma_v::parse(TRUNK).unwrap();
    assert_eq!(rcs.checkout(&num("1.3")).unwrap(), b"one\ntwo\nthree\n".to_vec());
    assert_eq!(rcs.checkout(&num("1.2")).unwrap(), b"one\ntwo\n".to_vec());
    assert_eq!(rcs.checkout(&num("1.1")).unwrap(), b"one\n".to_vec());
}

#[test]
fn s3_rename_user_updates_only_matching_authors() {
    let mut rcs = comma_v::parse(TRUNK).unwrap();
    let old = Id(b"adam".to_vec());
    let new = Id(b"adam.smith".to_vec());

    rcs.map_deltas(|revision, mut delta| {
        if delta.get_author() == &old {
            delta.set_author(new.clone());
        }
        (revision.clone(), delta)
    });

    assert_eq!(rcs.get_delta(&num("1.3")).unwrap().get_author(), &new);
    assert_eq!(rcs.get_delta(&num("1.2")).unwrap().get_author(), &new);
    assert_eq!(rcs.get_delta(&num("1.1")).unwrap().get_author(), &Id(b"eve".to_vec()));
    assert!(rcs.invariants_hold());
}

#[test]
fn s5_duplicate_delta_text_is_a_parse_error() {
    assert!(matches!(
        comma_v::parse(DUPLICATE_DELTA_TEXT),
        Err(Error::ParseError { .. })
    ));
}

#[test]
fn s6_unterminated_string_is_a_lex_error() {
    assert!(matches!(
        comma_v::parse(UNTERMINATED_STRING),
        Err(Error::LexError { .. })
    ));
}

#[test]
fn property_invariants_hold_after_mutation() {
    let mut rcs = comma_v::parse(TRUNK).unwrap();
    assert!(rcs.invariants_hold());

    rcs.set_branch(Some(num("1.1")));
    assert!(rcs.invariants_hold());

    // Moving head to a revision that isn't in the delta store must be
    // rejected, not silently leave the invariant broken.
    assert!(matches!(rcs.set_head(num("9.9")), Err(Error::UnknownRevision(_))));
    assert!(rcs.invariants_hold());

    rcs.set_head(num("1.2")).unwrap();
    assert!(rcs.invariants_hold());
}

#[test]
fn unknown_revision_on_checkout_is_reported_not_panicked() {
    let rcs = comma_v::parse(TRUNK).unwrap();
    assert!(matches!(rcs.checkout(&num("9.9")), Err(Error::UnknownRevision(_))));
}

#[test]
fn head_absent_from_deltas_is_rejected_at_parse_time() {
    assert!(matches!(
        comma_v::parse(HEAD_NOT_IN_DELTAS),
        Err(Error::UnknownRevision(_))
    ));
}

#[test]
fn duplicate_delta_header_is_a_parse_error() {
    assert!(matches!(
        comma_v::parse(DUPLICATE_DELTA_HEADER),
        Err(Error::ParseError { .. })
    ));
}
