//! Shared helpers for the RCS client tools.
//!
//! These aren't part of `comma-v`'s public contract — the library's own
//! [`comma_v::Rcs::checkout`] only walks straight from `head` — but every
//! tool in this crate needs to reconstruct a revision that isn't on that
//! walk (a branch tip) or demote a delta from snapshot to diff against an
//! arbitrary parent, so the glue lives here instead of being copied four
//! times.

use anyhow::{anyhow, bail, Context, Result};
use comma_v::{types::VString, Num, Rcs, RcsDelta};
use indexmap::IndexMap;

/// Walks up from `target` via `next` until the unique full snapshot is
/// found, then applies diffs back down, returning every `(revision,
/// content)` pair visited along the way in root-to-tip order (index 0 is
/// the snapshot, the last entry is `target`). Works for any delta whose
/// `next` chain eventually reaches the snapshot, trunk or branch, unlike
/// `Rcs::checkout`, which only follows `next` starting at the current head.
fn reconstruction_path(rcs: &Rcs, target: &Num) -> Result<Vec<(Num, Vec<u8>)>> {
    let mut nums = vec![target.clone()];
    let mut current = rcs
        .get_delta(target)
        .ok_or_else(|| anyhow!("revision {} not found", target))?;

    while current.is_diff() {
        let next = current.get_next().ok_or_else(|| {
            anyhow!(
                "revision {} is a diff with no next to reconstruct from",
                current.get_revision()
            )
        })?;
        nums.push(next.clone());
        current = rcs
            .get_delta(next)
            .ok_or_else(|| anyhow!("revision {} not found", next))?;
    }
    nums.reverse();

    let mut text = rcs
        .get_delta(&nums[0])
        .expect("just looked this revision up")
        .get_text()
        .0
        .clone();
    let mut path = vec![(nums[0].clone(), text.clone())];

    for num in &nums[1..] {
        let delta = rcs.get_delta(num).expect("just looked this revision up");
        let from = rcs_ed::File::from_bytes(&text)?;
        let script = rcs_ed::Script::parse(delta.get_text().0.as_slice()).into_command_list()?;
        text = from.apply(&script)?.join(&b'\n');
        path.push((num.clone(), text.clone()));
    }

    Ok(path)
}

/// Reconstructs the text of `target`, trunk or branch, the same way
/// `Rcs::checkout` reconstructs the current head's trunk but without being
/// limited to revisions reachable by a straight walk from `head`.
pub fn reconstruct(rcs: &Rcs, target: &Num) -> Result<Vec<u8>> {
    Ok(reconstruction_path(rcs, target)?
        .pop()
        .expect("a reconstruction path always contains at least the target itself")
        .1)
}

/// Demotes `delta`, which currently holds literal text (typically because
/// it used to be the head), to a diff against `parent_text`.
pub fn demote_to_diff(delta: &mut RcsDelta, parent_text: Vec<u8>) {
    let mut scratch = delta.clone();
    scratch.set_text(VString(parent_text));
    delta.text_to_diff(&scratch);
}

/// Finds the trunk's start revision (the tail reached by following `next`
/// from `head`): the earliest commit, typically `1.1`.
pub fn trunk_start(rcs: &Rcs, head: &Num) -> Result<Num> {
    let mut current = head.clone();
    loop {
        let delta = rcs
            .get_delta(&current)
            .ok_or_else(|| anyhow!("revision {} not found", current))?;
        match delta.get_next() {
            Some(next) => current = next.clone(),
            None => return Ok(current),
        }
    }
}

/// Joins `b`'s trunk onto the end of `a`'s, in place, per spec.md §8 S2:
/// `a`'s head must hold the same text as `b`'s trunk start, since that's the
/// revision the join drops (it would otherwise duplicate `a`'s head).
///
/// `b`'s revisions are renumbered by `Decrement(a_head, b_start)` so that
/// `b`'s start lands exactly on `a`'s head; everything above it in `b`
/// shifts by the same offset and continues counting up from there.
pub fn join(a: &mut Rcs, b: &Rcs) -> Result<()> {
    let a_head = a.get_head().context("A has no head revision")?.clone();
    let b_head = b.get_head().context("B has no head revision")?.clone();
    let b_start = trunk_start(b, &b_head)?;

    let a_head_text = a.checkout(&a_head)?;
    let b_start_text = b.checkout(&b_start)?;
    if a_head_text != b_start_text {
        bail!(
            "A's head ({}) and B's start ({}) do not share the same text; these histories don't join",
            a_head,
            b_start
        );
    }

    let offset = a_head.decrement(&b_start)?;
    let new_head = b_head.increment(&offset)?;
    log::debug!(
        "A head {}, B start {}, offset {}, new head {}",
        a_head,
        b_start,
        offset,
        new_head
    );

    for (num, delta) in b.deltas() {
        if num == &b_start {
            continue;
        }

        let new_num = num.increment(&offset)?;
        let mut new_delta = delta.clone();

        let new_next = match delta.get_next() {
            Some(n) if n == &b_start => Some(a_head.clone()),
            Some(n) => Some(n.increment(&offset)?),
            None => None,
        };
        new_delta.set_next(new_next);

        let new_branches = delta
            .get_branches()
            .iter()
            .map(|branch| branch.increment(&offset))
            .collect::<Result<Vec<Num>, _>>()?;
        new_delta.set_branches(new_branches);

        a.add_delta(new_num, new_delta)?;
    }

    // The former A head is no longer the newest revision; the renumbered B
    // head now points `next` at it, so its text must become a diff against
    // B head's content, not against whatever it already pointed to itself
    // (that downstream pointer is unchanged and still correct as-is).
    if b_head != b_start {
        let b_head_text = b.checkout(&b_head)?;
        let head_delta = a.get_delta_mut(&a_head).expect("looked up just above");
        demote_to_diff(head_delta, b_head_text);
    }

    let mut shifted_symbols = IndexMap::new();
    for (sym, num) in b.get_symbols().clone().drain(..) {
        shifted_symbols.insert(sym, num.increment(&offset)?);
    }
    for (sym, num) in a.get_symbols() {
        shifted_symbols.entry(sym.clone()).or_insert_with(|| num.clone());
    }
    a.set_symbols(shifted_symbols);

    let mut shifted_locks = IndexMap::new();
    for (id, num) in b.get_locks().clone().drain(..) {
        shifted_locks.insert(id, num.increment(&offset)?);
    }
    for (id, num) in a.get_locks() {
        shifted_locks.entry(id.clone()).or_insert_with(|| num.clone());
    }
    a.set_locks(shifted_locks);

    a.set_head(new_head)?;
    Ok(())
}

/// Promotes the branch ending at `branch_tip` to be `rcs`'s new trunk, per
/// spec.md §8 S4. Only supports a branch forking directly off the current
/// head — see `pivot_branch`'s binary-level doc comment for why.
pub fn pivot_branch(rcs: &mut Rcs, branch_tip: &Num) -> Result<()> {
    let old_head = rcs.get_head().context("file has no head revision")?.clone();

    // `path` is the branch in root-to-tip order: `old_head`, then
    // `branch_start`, then every delta further out on the branch, ending at
    // `branch_tip`. Every entry but the last must be re-diffed against its
    // new neighbor one step closer to the tip, since after promotion it's
    // that neighbor's `next` (unchanged) that now points at it; only
    // `branch_tip` itself needs no diff, becoming the new snapshot outright.
    let path = reconstruction_path(rcs, branch_tip)?;
    if path.len() < 2 || path[0].0 != old_head {
        bail!(
            "{} does not lead back to the current head {}",
            branch_tip,
            old_head
        );
    }
    let branch_start = path[1].0.clone();

    if !rcs
        .get_delta(&old_head)
        .expect("looked up just above")
        .get_branches()
        .contains(&branch_start)
    {
        bail!(
            "{} is not listed as a branch of the current head {}",
            branch_start,
            old_head
        );
    }

    for i in 0..path.len() - 1 {
        let (num, _) = &path[i];
        let (_, neighbor_text) = &path[i + 1];
        let delta = rcs.get_delta_mut(num).expect("looked up just above");
        demote_to_diff(delta, neighbor_text.clone());
    }

    let (_, tip_text) = path.last().expect("checked non-empty above");
    rcs.get_delta_mut(branch_tip)
        .expect("looked up just above")
        .set_snapshot(VString(tip_text.clone()));

    let mut branches = rcs
        .get_delta(&old_head)
        .expect("looked up just above")
        .get_branches()
        .to_vec();
    branches.retain(|b| b != &branch_start);
    rcs.get_delta_mut(&old_head)
        .expect("looked up just above")
        .set_branches(branches);

    rcs.set_head(branch_tip.clone())?;
    Ok(())
}
