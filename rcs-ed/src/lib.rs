//! Applies and generates RCS-style ed scripts: the line-oriented diff format
//! RCS stores inline between deltas (see `rcsfile(5)` and the
//! [diffutils documentation](https://www.gnu.org/software/diffutils/manual/html_node/RCS.html#RCS)).
//!
//! Every command in a script addresses the *original* source by line number;
//! this crate never re-numbers lines as it consumes commands, so a script's
//! commands may be applied in any order that doesn't itself mutate the
//! source buffer.

use std::io::{BufRead, BufReader, Read};

mod command;
mod error;
mod script;

pub use error::Error;
pub use script::{to_bytes as script_to_bytes, Command, CommandList, Script};

mod diff;
pub use diff::to_diff;

/// An in-memory, line-oriented view of a revision's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    lines: Vec<Vec<u8>>,
}

#[derive(Debug, Clone)]
enum Line<'a> {
    Add(Vec<&'a Vec<Vec<u8>>>),
    Delete,
    Keep,
    Replace(Vec<&'a Vec<Vec<u8>>>),
}

impl File {
    /// Reads a file into lines, preserving whether or not it ends with a
    /// trailing newline: `"a\nb"` and `"a\nb\n"` must round-trip to their
    /// original bytes, not just the same lines.
    pub fn new<R: Read>(reader: R) -> Result<Self, Error> {
        let mut r = BufReader::new(reader);
        let mut lines = Vec::new();

        loop {
            let mut line = Vec::new();
            r.read_until(b'\n', &mut line)?;

            if line.is_empty() {
                // Last line of the file, and it's empty (or the file itself
                // is empty).
                lines.push(b"".to_vec());
                break;
            }

            if line[line.len() - 1] != b'\n' {
                // Also the last line of the file, but it's not empty: no
                // trailing newline.
                lines.push(line);
                break;
            }

            line.pop();
            lines.push(line);
        }

        Ok(Self { lines })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::new(bytes)
    }

    /// The number of lines, counting a trailing empty "line" produced by a
    /// trailing newline exactly as `rcsfile(5)`'s line numbering does.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn apply(&self, commands: &CommandList) -> Result<Vec<Vec<u8>>, Error> {
        let (leading, line_commands) = calculate_line_commands(self.lines.len(), commands)?;

        let mut output = Vec::with_capacity(line_commands.len());
        output.extend(leading.iter().flat_map(|content| content.iter()).cloned());
        for (orig, line) in self.lines.iter().zip(line_commands.into_iter()) {
            match line {
                Line::Add(contents) => {
                    output.push(orig.clone());
                    output.extend(contents.iter().flat_map(|content| content.iter()).cloned());
                }
                Line::Delete => {}
                Line::Keep => {
                    output.push(orig.clone());
                }
                Line::Replace(contents) => {
                    output.extend(contents.iter().flat_map(|content| content.iter()).cloned());
                }
            }
        }

        Ok(output)
    }

    pub fn apply_in_place(&mut self, commands: &CommandList) -> Result<(), Error> {
        self.lines = self.apply(commands)?;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec<u8>> {
        self.lines.iter()
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.lines.join(&b'\n')
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.lines.join(&b'\n')
    }
}

fn calculate_line_commands<'a>(
    n: usize,
    commands: &'a CommandList,
) -> Result<(Vec<&'a Vec<Vec<u8>>>, Vec<Line<'a>>), Error> {
    let mut leading: Vec<&'a Vec<Vec<u8>>> = Vec::new();
    let mut line_commands = vec![Line::Keep; n];

    for command in commands {
        match command {
            Command::Add { position, content } if *position == 0 => {
                leading.push(content);
            }
            Command::Add { position, content } => {
                if *position > n {
                    return Err(Error::MalformedDiff {
                        position: *position,
                        available: n,
                    });
                }
                match &mut line_commands[position - 1] {
                    Line::Add(existing) => existing.push(content),
                    Line::Delete => {
                        line_commands[position - 1] = Line::Replace(vec![content]);
                    }
                    Line::Keep => {
                        line_commands[position - 1] = Line::Add(vec![content]);
                    }
                    Line::Replace(existing) => existing.push(content),
                }
            }
            Command::Delete { position, lines } => {
                if *position == 0 || *position + *lines > n + 1 {
                    return Err(Error::MalformedDiff {
                        position: *position,
                        available: n,
                    });
                }
                line_commands.splice(
                    position - 1..position + lines - 1,
                    vec![Line::Delete; *lines],
                );
            }
        }
    }

    Ok((leading, line_commands))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAO: &[u8] = b"The Way that can be told of is not the eternal Way;\nThe name that can be named is not the eternal name.\nThe Nameless is the origin of Heaven and Earth;\nThe Named is the mother of all things.\n";
    const TZU: &[u8] = b"The Nameless is the origin of Heaven and Earth;\nThe named is the mother of all things.\n\nTherefore let there always be non-being,\n";

    #[test]
    fn test_apply_delete_and_add() {
        // Turns LAO into TZU: drop the first two lines, then reword and
        // extend the remainder.
        let commands: CommandList = vec![
            Command::Delete {
                position: 1,
                lines: 2,
            },
            Command::Delete {
                position: 4,
                lines: 1,
            },
            Command::Add {
                position: 4,
                content: vec![
                    b"The named is the mother of all things.".to_vec(),
                    b"".to_vec(),
                    b"Therefore let there always be non-being,".to_vec(),
                ],
            },
        ];

        let file = File::new(LAO).unwrap();
        let result = file.apply(&commands).unwrap().join(&b'\n');
        assert_eq!(result, TZU);
    }

    #[test]
    fn test_apply_leading_insert() {
        let file = File::new(b"b\nc\n".as_ref()).unwrap();
        let commands: CommandList = vec![Command::Add {
            position: 0,
            content: vec![b"a".to_vec()],
        }];
        assert_eq!(
            file.apply(&commands).unwrap().join(&b'\n'),
            b"a\nb\nc\n".to_vec()
        );
    }

    #[test]
    fn test_apply_in_place() {
        let mut file = File::new(LAO).unwrap();
        let commands: CommandList = vec![Command::Delete {
            position: 1,
            lines: 1,
        }];
        file.apply_in_place(&commands).unwrap();
        assert_eq!(file.len(), 4);
    }

    #[test]
    fn test_delete_past_end_is_malformed() {
        let file = File::new(b"a\nb\n".as_ref()).unwrap();
        let commands: CommandList = vec![Command::Delete {
            position: 1,
            lines: 5,
        }];
        assert!(matches!(
            file.apply(&commands),
            Err(Error::MalformedDiff { .. })
        ));
    }

    #[test]
    fn test_add_past_end_is_malformed() {
        let file = File::new(b"a\nb\n".as_ref()).unwrap();
        let commands: CommandList = vec![Command::Add {
            position: 10,
            content: vec![b"x".to_vec()],
        }];
        assert!(matches!(
            file.apply(&commands),
            Err(Error::MalformedDiff { .. })
        ));
    }

    #[test]
    fn test_apply_identity() {
        let file = File::new(LAO).unwrap();
        assert_eq!(file.apply(&vec![]).unwrap().join(&b'\n'), LAO);
    }
}
