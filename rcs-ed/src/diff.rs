use crate::{script, Command, CommandList, File};

/// Computes an ed script that turns `from`'s text into `to`'s text, such
/// that `from.apply(to_diff(from, to))` reproduces `to`'s lines.
///
/// RCS deltas are stored as reverse diffs (newer revision minus older), so
/// the typical caller passes the newer text as `from` and the older text as
/// `to`; this function itself is direction-agnostic.
///
/// This does not attempt a minimal diff: it always emits at most one delete
/// of the whole source followed by one insert of the whole target. That is
/// correct and byte-round-trippable, if not the compact script a real `diff`
/// would produce.
pub fn to_diff(from: &File, to: &File) -> Vec<u8> {
    if from == to {
        return script::to_bytes(&CommandList::new());
    }

    let mut commands = Vec::new();
    if from.len() > 0 {
        commands.push(Command::Delete {
            position: 1,
            lines: from.len(),
        });
    }
    if to.len() > 0 {
        commands.push(Command::Add {
            position: 0,
            content: to.iter().cloned().collect(),
        });
    }

    script::to_bytes(&commands)
}
