//! Textual command parsing.

use crate::core::{Firm, WallError, WallResult};

use std::fmt;

/// A parsed dispatcher command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the available commands.
    Help,
    /// Reset every subject's history (new epoch).
    Start,
    /// Attempt a read.
    Read {
        /// Requesting subject.
        subject: usize,
        /// Requested object.
        object: usize,
    },
    /// Attempt a write.
    Write {
        /// Requesting subject.
        subject: usize,
        /// Requested object.
        object: usize,
    },
    /// List objects accessed by a subject.
    ReportSubject(usize),
    /// List subjects that accessed an object.
    ReportObject(usize),
    /// List objects owned by a firm.
    Briefcase(Firm),
    /// List firms with their conflict class and portfolio size.
    Firms,
    /// List objects owned by no firm.
    Unassigned,
    /// End the session.
    Exit,
}

impl Command {
    /// Parses one input line.
    ///
    /// Returns `Ok(None)` for blank lines and unrecognised command words,
    /// which the protocol answers with an empty response. A recognised
    /// command with missing, extra or malformed arguments is an
    /// `InvalidCommandSyntax` error.
    pub fn parse(line: &str) -> WallResult<Option<Self>> {
        let mut tokens = line.split_whitespace();
        let Some(word) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = tokens.collect();

        let command = match word {
            "help" => {
                expect_arity(word, &args, 0)?;
                Self::Help
            }
            "start" => {
                expect_arity(word, &args, 0)?;
                Self::Start
            }
            "exit" => {
                expect_arity(word, &args, 0)?;
                Self::Exit
            }
            "firms" => {
                expect_arity(word, &args, 0)?;
                Self::Firms
            }
            "unassigned" => {
                expect_arity(word, &args, 0)?;
                Self::Unassigned
            }
            "read" | "write" => {
                expect_arity(word, &args, 2)?;
                let subject = parse_index("subject", args[0])?;
                let object = parse_index("object", args[1])?;
                if word == "read" {
                    Self::Read { subject, object }
                } else {
                    Self::Write { subject, object }
                }
            }
            "report" => {
                expect_arity(word, &args, 2)?;
                match args[0] {
                    "-s" | "subject" => Self::ReportSubject(parse_index("subject", args[1])?),
                    "-o" | "object" => Self::ReportObject(parse_index("object", args[1])?),
                    other => {
                        return Err(WallError::syntax(format!(
                            "unknown report selector '{other}', expected -s or -o"
                        )))
                    }
                }
            }
            "briefcase" => {
                expect_arity(word, &args, 1)?;
                Self::Briefcase(Firm::parse(args[0])?)
            }
            _ => return Ok(None),
        };
        Ok(Some(command))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Help => write!(f, "help"),
            Self::Start => write!(f, "start"),
            Self::Read { subject, object } => write!(f, "read {subject} {object}"),
            Self::Write { subject, object } => write!(f, "write {subject} {object}"),
            Self::ReportSubject(subject) => write!(f, "report -s {subject}"),
            Self::ReportObject(object) => write!(f, "report -o {object}"),
            Self::Briefcase(firm) => write!(f, "briefcase {firm}"),
            Self::Firms => write!(f, "firms"),
            Self::Unassigned => write!(f, "unassigned"),
            Self::Exit => write!(f, "exit"),
        }
    }
}

fn expect_arity(word: &str, args: &[&str], expected: usize) -> WallResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(WallError::syntax(format!(
            "'{word}' takes {expected} argument(s), got {}",
            args.len()
        )))
    }
}

fn parse_index(what: &str, token: &str) -> WallResult<usize> {
    token
        .parse()
        .map_err(|_| WallError::syntax(format!("'{token}' is not a valid {what} index")))
}
