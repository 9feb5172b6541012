use crate::{
    types::{Admin, Delta, DeltaText, Desc, IntString, Newphrase, VString},
    Num, Rcs,
};

/// Serializes an [`Rcs`] value into the on-disk `,v` grammar: admin section,
/// delta headers (in file order), `desc`, then deltatext records. The
/// inverse of [`crate::parser::file`].
pub(crate) fn emit(rcs: &Rcs) -> Vec<u8> {
    let (admin, delta, desc, delta_text) = rcs.to_parts();

    let mut out = Vec::new();
    emit_admin(&mut out, &admin);
    out.push(b'\n');

    for (revision, header) in &delta {
        emit_delta(&mut out, revision, header);
        out.push(b'\n');
    }

    emit_desc(&mut out, &desc);
    out.push(b'\n');

    for (revision, header) in &delta {
        let text = delta_text
            .get(revision)
            .expect("to_parts keeps delta and delta_text in lockstep");
        emit_delta_text(&mut out, revision, text);
        let _ = header;
    }

    out
}

fn emit_num(out: &mut Vec<u8>, num: &Num) {
    out.extend_from_slice(num.to_string().as_bytes());
}

fn emit_string(out: &mut Vec<u8>, s: &VString) {
    emit_escaped(out, &s.0);
}

fn emit_intstring(out: &mut Vec<u8>, s: &IntString) {
    out.push(b'@');
    out.extend_from_slice(&s.0);
    out.push(b'@');
}

fn emit_escaped(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(b'@');
    for &b in bytes {
        if b == b'@' {
            out.push(b'@');
        }
        out.push(b);
    }
    out.push(b'@');
}

fn emit_newphrases(out: &mut Vec<u8>, newphrases: &[Newphrase]) {
    for phrase in newphrases {
        out.extend_from_slice(&phrase.name.0);
        out.push(b' ');
        out.extend_from_slice(&phrase.value);
        out.extend_from_slice(b";\n");
    }
}

fn emit_admin(out: &mut Vec<u8>, admin: &Admin) {
    out.extend_from_slice(b"head\t");
    if let Some(head) = &admin.head {
        emit_num(out, head);
    }
    out.extend_from_slice(b";\n");

    if let Some(branch) = &admin.branch {
        out.extend_from_slice(b"branch\t");
        emit_num(out, branch);
        out.extend_from_slice(b";\n");
    }

    out.extend_from_slice(b"access");
    for id in &admin.access {
        out.push(b'\t');
        out.extend_from_slice(&id.0);
    }
    out.extend_from_slice(b";\n");

    out.extend_from_slice(b"symbols");
    for (sym, num) in &admin.symbols {
        out.push(b'\t');
        out.extend_from_slice(&sym.0);
        out.push(b':');
        emit_num(out, num);
    }
    out.extend_from_slice(b";\n");

    out.extend_from_slice(b"locks");
    for (id, num) in &admin.locks {
        out.push(b'\t');
        out.extend_from_slice(&id.0);
        out.push(b':');
        emit_num(out, num);
    }
    out.extend_from_slice(b";");
    if admin.strict {
        out.extend_from_slice(b" strict;");
    }
    out.push(b'\n');

    if let Some(integrity) = &admin.integrity {
        out.extend_from_slice(b"integrity\t");
        emit_intstring(out, integrity);
        out.extend_from_slice(b";\n");
    }

    if let Some(comment) = &admin.comment {
        out.extend_from_slice(b"comment\t");
        emit_string(out, comment);
        out.extend_from_slice(b";\n");
    }

    if let Some(expand) = &admin.expand {
        out.extend_from_slice(b"expand\t");
        emit_string(out, expand);
        out.extend_from_slice(b";\n");
    }

    emit_newphrases(out, &admin.newphrases);
}

fn emit_delta(out: &mut Vec<u8>, revision: &Num, delta: &Delta) {
    emit_num(out, revision);
    out.push(b'\n');

    out.extend_from_slice(b"date\t");
    out.extend_from_slice(&delta.date.0);
    out.extend_from_slice(b";\tauthor ");
    out.extend_from_slice(&delta.author.0);
    out.extend_from_slice(b";\tstate ");
    if let Some(state) = &delta.state {
        out.extend_from_slice(&state.0);
    }
    out.extend_from_slice(b";\n");

    out.extend_from_slice(b"branches");
    for branch in &delta.branches {
        out.push(b'\t');
        emit_num(out, branch);
    }
    out.extend_from_slice(b";\n");

    out.extend_from_slice(b"next\t");
    if let Some(next) = &delta.next {
        emit_num(out, next);
    }
    out.extend_from_slice(b";\n");

    if let Some(commit_id) = &delta.commit_id {
        out.extend_from_slice(b"commitid\t");
        out.extend_from_slice(&commit_id.0);
        out.extend_from_slice(b";\n");
    }

    emit_newphrases(out, &delta.newphrases);
}

fn emit_desc(out: &mut Vec<u8>, desc: &Desc) {
    out.extend_from_slice(b"desc\n");
    emit_string(out, desc);
    out.push(b'\n');
}

fn emit_delta_text(out: &mut Vec<u8>, revision: &Num, text: &DeltaText) {
    emit_num(out, revision);
    out.push(b'\n');

    out.extend_from_slice(b"log\n");
    emit_string(out, &text.log);
    out.push(b'\n');

    out.extend_from_slice(b"text\n");
    emit_string(out, &text.text);
    out.push(b'\n');
}
