use std::{
    io::{BufRead, BufReader, Read, Split},
    iter::Enumerate,
};

use crate::{command, Error};

/// Reads an ed script line by line, handing out fully materialized
/// [`Command`]s (an `a` command's payload lines are consumed eagerly, since
/// the line count is only known once the command line itself is parsed).
pub struct Script<R: Read> {
    reader: Enumerate<Split<BufReader<R>>>,
}

/// `Command` is the external representation of an ed command, including its
/// payload, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        position: usize,
        content: Vec<Vec<u8>>,
    },
    Delete {
        position: usize,
        lines: usize,
    },
}

pub type CommandList = Vec<Command>;

/// Serializes a command list back into the textual ed-script form RCS
/// stores inline in a delta's `text`. The inverse of [`Script::parse`].
pub fn to_bytes(commands: &CommandList) -> Vec<u8> {
    let mut out = Vec::new();
    for command in commands {
        match command {
            Command::Add { position, content } => {
                out.extend_from_slice(format!("a{} {}\n", position, content.len()).as_bytes());
                for line in content {
                    out.extend_from_slice(line);
                    out.push(b'\n');
                }
            }
            Command::Delete { position, lines } => {
                out.extend_from_slice(format!("d{} {}\n", position, lines).as_bytes());
            }
        }
    }
    out
}

impl<R: Read> Script<R> {
    pub fn parse(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader).split(b'\n').enumerate(),
        }
    }

    pub fn into_command_list(self) -> Result<CommandList, Error> {
        self.into_iter().collect()
    }
}

impl<R: Read> Iterator for Script<R> {
    type Item = Result<Command, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        // We need to get the next line, which should be a command line.
        match self.reader.next() {
            Some((line, Ok(raw))) => match command::Command::parse(&raw) {
                // We got an Add command: this means that we need to read the
                // next chunk of lines to get the actual content to be added.
                Ok(command::Command::Add { position, lines }) => {
                    match (&mut self.reader)
                        .take(lines)
                        .map(|(_line, content)| content)
                        .collect::<Result<Vec<Vec<u8>>, std::io::Error>>()
                    {
                        Ok(content) if content.len() == lines => {
                            Some(Ok(Command::Add { position, content }))
                        }
                        Ok(content) => Some(Err(Error::EndOfScript {
                            line: line + 1,
                            want: lines,
                            have: content.len(),
                        })),
                        Err(e) => Some(Err(Error::Io(e))),
                    }
                }
                // We got a Delete command, which is simpler: we just need to
                // return the position and lines to be deleted.
                Ok(command::Command::Delete { position, lines }) => {
                    Some(Ok(Command::Delete { position, lines }))
                }
                // The command couldn't be parsed, so let's return the error.
                Err(e) => Some(Err(e)),
            },
            Some((_line, Err(e))) => Some(Err(e.into())),
            None => None,
        }
    }
}
