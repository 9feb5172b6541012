use indexmap::IndexMap;

use crate::{
    types::{Admin, Date, Delta, DeltaText, Desc, Id, Newphrase, Sym, VString},
    Error, Num,
};

/// A single revision, as the rest of the world sees it: header fields
/// merged with its log and text. RCS itself keeps these in two separate
/// file sections (see [`crate::types::Delta`]/[`crate::types::DeltaText`]);
/// callers of this crate never need to care.
#[derive(Debug, Clone)]
pub struct RcsDelta {
    revision: Num,
    date: Date,
    author: Id,
    state: Option<Id>,
    branches: Vec<Num>,
    next: Option<Num>,
    commit_id: Option<Sym>,
    log: VString,
    text: VString,
    is_diff: bool,
    newphrases: Vec<Newphrase>,
}

impl RcsDelta {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        revision: Num,
        date: Date,
        author: Id,
        state: Option<Id>,
        branches: Vec<Num>,
        next: Option<Num>,
        log: VString,
        text: VString,
    ) -> Self {
        Self {
            revision,
            date,
            author,
            state,
            branches,
            next,
            commit_id: None,
            log,
            text,
            is_diff: true,
            newphrases: Vec::new(),
        }
    }

    pub fn get_revision(&self) -> &Num {
        &self.revision
    }

    pub fn get_date(&self) -> &Date {
        &self.date
    }

    pub fn set_date(&mut self, date: Date) {
        self.date = date;
    }

    pub fn get_author(&self) -> &Id {
        &self.author
    }

    pub fn set_author(&mut self, author: Id) {
        self.author = author;
    }

    pub fn get_state(&self) -> Option<&Id> {
        self.state.as_ref()
    }

    pub fn set_state(&mut self, state: Option<Id>) {
        self.state = state;
    }

    pub fn get_branches(&self) -> &[Num] {
        &self.branches
    }

    pub fn set_branches(&mut self, branches: Vec<Num>) {
        self.branches = branches;
    }

    pub fn get_next(&self) -> Option<&Num> {
        self.next.as_ref()
    }

    pub fn set_next(&mut self, next: Option<Num>) {
        self.next = next;
    }

    pub fn get_commit_id(&self) -> Option<&Sym> {
        self.commit_id.as_ref()
    }

    pub fn set_commit_id(&mut self, commit_id: Option<Sym>) {
        self.commit_id = commit_id;
    }

    pub fn get_log(&self) -> &VString {
        &self.log
    }

    pub fn set_log(&mut self, log: VString) {
        self.log = log;
    }

    pub fn get_text(&self) -> &VString {
        &self.text
    }

    pub fn set_text(&mut self, text: VString) {
        self.text = text;
    }

    pub fn is_diff(&self) -> bool {
        self.is_diff
    }

    pub fn newphrases(&self) -> &[Newphrase] {
        &self.newphrases
    }

    /// Promotes this delta to carry a full snapshot, e.g. when it becomes
    /// the new trunk head. `text` must already be the reconstructed full
    /// content, not a script.
    pub fn set_snapshot(&mut self, text: VString) {
        self.text = text;
        self.is_diff = false;
    }

    /// Replaces `self.text` with the ed script that turns `other.text` back
    /// into `self.text`, marking this delta as a diff. Used to demote a
    /// former trunk head into the middle of a chain: the bytes RCS actually
    /// stores are a diff *against the successor*, so after this call
    /// `self.text` reconstructs `self`'s old content when applied starting
    /// from `other.text`.
    pub fn text_to_diff(&mut self, other: &RcsDelta) {
        // `other` is the delta a chain walk will already have reconstructed
        // by the time it reaches `self`; the script we store must turn
        // *that* text into self's own, so TextFromDiff(other.text, script)
        // reproduces self's original content.
        let from = rcs_ed::File::from_bytes(&other.text).expect("reading in-memory text");
        let to = rcs_ed::File::from_bytes(&self.text).expect("reading in-memory text");
        self.text = VString(rcs_ed::to_diff(&from, &to));
        self.is_diff = true;
    }
}

/// The parsed, in-memory form of an RCS `,v` file: admin metadata plus the
/// full set of revisions, keyed by revision number.
#[derive(Debug, Clone)]
pub struct Rcs {
    head: Option<Num>,
    branch: Option<Num>,
    access: Vec<Id>,
    symbols: IndexMap<Sym, Num>,
    locks: IndexMap<Id, Num>,
    strict: bool,
    integrity: Option<crate::types::IntString>,
    comment: Option<VString>,
    expand: Option<VString>,
    desc: Desc,
    deltas: IndexMap<Num, RcsDelta>,
    newphrase_admin: Vec<Newphrase>,
}

impl Rcs {
    pub(crate) fn from_parts(
        admin: Admin,
        delta: IndexMap<Num, Delta>,
        desc: Desc,
        delta_text: IndexMap<Num, DeltaText>,
    ) -> Result<Self, Error> {
        let mut deltas = IndexMap::with_capacity(delta.len());
        for (revision, header) in delta.into_iter() {
            let text = delta_text.get(&revision).ok_or_else(|| {
                Error::InvariantViolation {
                    field: "delta_text",
                    reason: format!("no deltatext record for revision {}", revision),
                }
            })?;
            let is_diff = admin.head.as_ref() != Some(&revision);
            deltas.insert(
                revision.clone(),
                RcsDelta {
                    revision,
                    date: header.date,
                    author: header.author,
                    state: header.state,
                    branches: header.branches,
                    next: header.next,
                    commit_id: header.commit_id,
                    log: text.log.clone(),
                    text: text.text.clone(),
                    is_diff,
                    newphrases: header.newphrases,
                },
            );
        }

        if let Some(head) = admin.head.as_ref() {
            if !deltas.contains_key(head) {
                return Err(Error::UnknownRevision(head.clone()));
            }
        }

        Ok(Self {
            head: admin.head,
            branch: admin.branch,
            access: admin.access,
            symbols: admin.symbols,
            locks: admin.locks,
            strict: admin.strict,
            integrity: admin.integrity,
            comment: admin.comment,
            expand: admin.expand,
            desc,
            deltas,
            newphrase_admin: admin.newphrases,
        })
    }

    /// Splits this value back into the grammar-level pieces the emitter
    /// writes out as separate file sections.
    pub(crate) fn to_parts(&self) -> (Admin, IndexMap<Num, Delta>, Desc, IndexMap<Num, DeltaText>) {
        let admin = Admin {
            head: self.head.clone(),
            branch: self.branch.clone(),
            access: self.access.clone(),
            symbols: self.symbols.clone(),
            locks: self.locks.clone(),
            strict: self.strict,
            integrity: self.integrity.clone(),
            comment: self.comment.clone(),
            expand: self.expand.clone(),
            newphrases: self.newphrase_admin.clone(),
        };

        let mut delta = IndexMap::with_capacity(self.deltas.len());
        let mut delta_text = IndexMap::with_capacity(self.deltas.len());
        for (revision, d) in self.deltas.iter() {
            delta.insert(
                revision.clone(),
                Delta {
                    date: d.date.clone(),
                    author: d.author.clone(),
                    state: d.state.clone(),
                    branches: d.branches.clone(),
                    next: d.next.clone(),
                    commit_id: d.commit_id.clone(),
                    newphrases: d.newphrases.clone(),
                },
            );
            delta_text.insert(
                revision.clone(),
                DeltaText {
                    log: d.log.clone(),
                    text: d.text.clone(),
                },
            );
        }

        (admin, delta, self.desc.clone(), delta_text)
    }

    pub fn get_head(&self) -> Option<&Num> {
        self.head.as_ref()
    }

    /// Sets the file's head revision. Fails if the revision doesn't already
    /// exist in the delta store: the invariant that `head` always names a
    /// present delta is load-bearing for every other operation.
    pub fn set_head(&mut self, head: Num) -> Result<(), Error> {
        if !self.deltas.contains_key(&head) {
            return Err(Error::UnknownRevision(head));
        }
        self.head = Some(head);
        Ok(())
    }

    pub fn get_branch(&self) -> Option<&Num> {
        self.branch.as_ref()
    }

    pub fn set_branch(&mut self, branch: Option<Num>) {
        self.branch = branch;
    }

    pub fn get_access(&self) -> &[Id] {
        &self.access
    }

    pub fn set_access(&mut self, access: Vec<Id>) {
        self.access = access;
    }

    pub fn get_symbols(&self) -> &IndexMap<Sym, Num> {
        &self.symbols
    }

    pub fn set_symbols(&mut self, symbols: IndexMap<Sym, Num>) {
        self.symbols = symbols;
    }

    pub fn get_locks(&self) -> &IndexMap<Id, Num> {
        &self.locks
    }

    pub fn set_locks(&mut self, locks: IndexMap<Id, Num>) {
        self.locks = locks;
    }

    pub fn get_comment(&self) -> Option<&VString> {
        self.comment.as_ref()
    }

    pub fn set_comment(&mut self, comment: Option<VString>) {
        self.comment = comment;
    }

    pub fn get_expand(&self) -> Option<&VString> {
        self.expand.as_ref()
    }

    pub fn set_expand(&mut self, expand: Option<VString>) {
        self.expand = expand;
    }

    pub fn get_desc(&self) -> &Desc {
        &self.desc
    }

    pub fn set_desc(&mut self, desc: Desc) {
        self.desc = desc;
    }

    pub fn get_delta(&self, revision: &Num) -> Option<&RcsDelta> {
        self.deltas.get(revision)
    }

    pub fn get_delta_mut(&mut self, revision: &Num) -> Option<&mut RcsDelta> {
        self.deltas.get_mut(revision)
    }

    /// Inserts a new delta. Fails if `revision` is already present: callers
    /// that want to replace a delta must `remove_delta` first.
    pub fn add_delta(&mut self, revision: Num, delta: RcsDelta) -> Result<(), Error> {
        if self.deltas.contains_key(&revision) {
            return Err(Error::DuplicateRevision(revision));
        }
        self.deltas.insert(revision, delta);
        Ok(())
    }

    pub fn remove_delta(&mut self, revision: &Num) -> Option<RcsDelta> {
        self.deltas.shift_remove(revision)
    }

    /// Applies `f` to every delta, in insertion order (the order the parser
    /// seeded from file order), collecting the results into a fresh map.
    /// Building a fresh map rather than mutating in place means `f` is free
    /// to renumber revisions, as `rcs_join`-style callers need to.
    pub fn map_deltas<F>(&mut self, mut f: F)
    where
        F: FnMut(&Num, RcsDelta) -> (Num, RcsDelta),
    {
        let old = std::mem::take(&mut self.deltas);
        let mut fresh = IndexMap::with_capacity(old.len());
        for (revision, delta) in old {
            let (new_revision, new_delta) = f(&revision, delta);
            fresh.insert(new_revision, new_delta);
        }
        self.deltas = fresh;
    }

    pub fn deltas(&self) -> impl Iterator<Item = (&Num, &RcsDelta)> {
        self.deltas.iter()
    }

    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Walks the trunk from `head`, reconstructing text at each step by
    /// applying `TextFromDiff` until `revision` is reached. Not cached: the
    /// caller pays the walk cost every time.
    pub fn checkout(&self, revision: &Num) -> Result<Vec<u8>, Error> {
        let head = self.head.as_ref().ok_or_else(|| Error::UnknownRevision(revision.clone()))?;
        let mut current = self
            .deltas
            .get(head)
            .ok_or_else(|| Error::UnknownRevision(head.clone()))?;
        let mut text = current.text.0.clone();

        if &current.revision == revision {
            return Ok(text);
        }

        loop {
            let next_num = current
                .next
                .as_ref()
                .ok_or_else(|| Error::UnknownRevision(revision.clone()))?;
            let next = self
                .deltas
                .get(next_num)
                .ok_or_else(|| Error::UnknownRevision(next_num.clone()))?;

            // `next`'s own text field stores the script that, applied to
            // the text we're currently holding, reproduces next's content.
            let from = rcs_ed::File::from_bytes(&text)?;
            let script = rcs_ed::Script::parse(next.text.0.as_slice()).into_command_list()?;
            let applied = from.apply(&script)?;
            text = applied.join(&b'\n');

            current = next;
            if &current.revision == revision {
                return Ok(text);
            }
        }
    }

    pub fn invariants_hold(&self) -> bool {
        let snapshot_count = self.deltas.values().filter(|d| !d.is_diff).count();
        if self.head.is_some() && snapshot_count != 1 {
            return false;
        }

        for delta in self.deltas.values() {
            if let Some(next) = &delta.next {
                if !self.deltas.contains_key(next) {
                    return false;
                }
            }
            for branch in &delta.branches {
                if !self.deltas.contains_key(branch) {
                    return false;
                }
            }
        }

        if let Some(head) = &self.head {
            if !self.deltas.contains_key(head) {
                return false;
            }
        }

        true
    }
}
