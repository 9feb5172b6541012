//! Coverage for the S2/S4 scenarios from spec.md §8 that only became
//! independently testable once `join`/`pivot_branch` moved out of their
//! binaries' `fn main()` and into `rcs_tools`'s library surface.

use std::str::FromStr;

use comma_v::Num;

fn num(s: &str) -> Num {
    Num::from_str(s).unwrap()
}

/// Two trunk-only revisions: head `1.2` (snapshot `head_content`), `1.1` a
/// diff against it (`tail_script`, reconstructing `1.1`'s content).
fn two_rev_file(head_content: &str, tail_script: &str) -> Vec<u8> {
    format!(
        "head\t1.2;\naccess;\nsymbols;\nlocks;\n\n\n1.2\ndate\t2021.08.20.17.34.26;\tauthor adam;\tstate Exp;\nbranches;\nnext\t1.1;\n\n1.1\ndate\t2021.08.11.19.08.27;\tauthor adam;\tstate Exp;\nbranches;\nnext\t;\n\n\ndesc\n@@\n\n\n1.2\nlog\n@head\n@\ntext\n@{head_content}@\n1.1\nlog\n@tail\n@\ntext\n@{tail_script}@\n"
    )
    .into_bytes()
}

#[test]
fn s2_join_drops_bs_duplicate_start_and_continues_numbering() {
    let a = comma_v::parse(&two_rev_file("line1\nline2\n", "d2 1\n")).unwrap();
    let b = comma_v::parse(&two_rev_file("line1\nline2\nline3\n", "d3 1\n")).unwrap();

    // B's trunk start (1.1, after its own "d3 1" delta is applied to its
    // head) reconstructs to "line1\nline2\n" — the same text as A's head —
    // so the two histories join.
    assert_eq!(b.checkout(&num("1.1")).unwrap(), b"line1\nline2\n".to_vec());

    let mut a = a;
    rcs_tools::join(&mut a, &b).unwrap();

    assert_eq!(a.get_head(), Some(&num("1.3")));
    assert_eq!(a.checkout(&num("1.3")).unwrap(), b"line1\nline2\nline3\n".to_vec());
    assert_eq!(a.checkout(&num("1.2")).unwrap(), b"line1\nline2\n".to_vec());
    assert_eq!(a.checkout(&num("1.1")).unwrap(), b"line1\n".to_vec());
    assert!(a.invariants_hold());
}

#[test]
fn s2_join_rejects_mismatched_histories() {
    let mut a = comma_v::parse(&two_rev_file("line1\nline2\n", "d2 1\n")).unwrap();
    let b = comma_v::parse(&two_rev_file("nothing\nin\ncommon\nhere\n", "d3 1\n")).unwrap();
    assert!(rcs_tools::join(&mut a, &b).is_err());
}

/// A single trunk delta (`1.2`, head) with a depth-two branch forking off
/// it: `1.2.1.1` appends one line to `1.2`'s content, `1.2.1.2` appends
/// another on top of that.
const BRANCHED: &[u8] = b"head\t1.2;\naccess;\nsymbols;\nlocks;\n\n\n1.2\ndate\t2021.08.20.17.34.26;\tauthor adam;\tstate Exp;\nbranches\t1.2.1.1;\nnext\t1.1;\n\n1.1\ndate\t2021.08.11.19.08.27;\tauthor adam;\tstate Exp;\nbranches;\nnext\t;\n\n1.2.1.1\ndate\t2021.08.25.09.00.00;\tauthor eve;\tstate Exp;\nbranches;\nnext\t1.2;\n\n1.2.1.2\ndate\t2021.08.26.09.00.00;\tauthor eve;\tstate Exp;\nbranches;\nnext\t1.2.1.1;\n\n\ndesc\n@@\n\n\n1.2\nlog\n@head\n@\ntext\n@line1\nline2\n@\n1.1\nlog\n@tail\n@\ntext\n@d2 1\n@\n1.2.1.1\nlog\n@branch 1\n@\ntext\n@a2 1\nbranch1\n@\n1.2.1.2\nlog\n@branch 2\n@\ntext\n@a3 1\nbranch2\n@\n";

#[test]
fn s4_pivot_branch_promotes_a_multi_delta_branch() {
    let rcs = comma_v::parse(BRANCHED).unwrap();
    // Before promotion, the branch isn't on `head`'s `next` walk at all —
    // `Rcs::checkout` can't reach it, only the `reconstruct` helper can.
    assert_eq!(
        rcs_tools::reconstruct(&rcs, &num("1.2.1.1")).unwrap(),
        b"line1\nline2\nbranch1\n".to_vec()
    );
    assert_eq!(
        rcs_tools::reconstruct(&rcs, &num("1.2.1.2")).unwrap(),
        b"line1\nline2\nbranch1\nbranch2\n".to_vec()
    );

    let mut rcs = rcs;
    rcs_tools::pivot_branch(&mut rcs, &num("1.2.1.2")).unwrap();

    assert_eq!(rcs.get_head(), Some(&num("1.2.1.2")));
    assert_eq!(
        rcs.checkout(&num("1.2.1.2")).unwrap(),
        b"line1\nline2\nbranch1\nbranch2\n".to_vec()
    );
    assert_eq!(
        rcs.checkout(&num("1.2.1.1")).unwrap(),
        b"line1\nline2\nbranch1\n".to_vec()
    );
    assert_eq!(rcs.checkout(&num("1.2")).unwrap(), b"line1\nline2\n".to_vec());
    assert_eq!(rcs.checkout(&num("1.1")).unwrap(), b"line1\n".to_vec());
    assert!(rcs.get_delta(&num("1.2")).unwrap().get_branches().is_empty());
    assert!(rcs.invariants_hold());
}

#[test]
fn s4_pivot_branch_rejects_a_tip_that_does_not_lead_back_to_head() {
    let mut rcs = comma_v::parse(BRANCHED).unwrap();
    assert!(rcs_tools::pivot_branch(&mut rcs, &num("9.9")).is_err());
}
