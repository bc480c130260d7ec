//! Command execution and response rendering.

use crate::core::{AccessKind, WallResult};
use crate::dispatcher::command::Command;
use crate::policy::ChineseWallEngine;

use std::io::{BufRead, Write};

/// Help text listing the supported commands.
pub const HELP: &str = "\
Commands available:
help                 - list commands
start                - erase all subjects' histories (new epoch)
read <s> <o>         - read object o by subject s
write <s> <o>        - write object o by subject s
report -s <s>        - list objects (and firms) accessed by subject s
report -o <o>        - list subjects having access to object o
briefcase <f>        - list objects owned by firm f
firms                - list firms with their conflict class
unassigned           - list objects owned by no firm
exit                 - end session";

/// What the session should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print the text (possibly empty) and keep reading commands.
    Text(String),
    /// End the session.
    Exit,
}

impl Reply {
    fn empty() -> Self {
        Self::Text(String::new())
    }
}

/// Drives a `ChineseWallEngine` from textual commands.
///
/// The dispatcher borrows the engine for the duration of the session; the
/// engine itself never prints anything.
pub struct Dispatcher<'e> {
    engine: &'e mut ChineseWallEngine,
}

impl<'e> Dispatcher<'e> {
    /// Creates a dispatcher over `engine`.
    pub fn new(engine: &'e mut ChineseWallEngine) -> Self {
        Self { engine }
    }

    /// Returns the engine being driven.
    pub fn engine(&self) -> &ChineseWallEngine {
        &*self.engine
    }

    /// Parses and executes one input line.
    ///
    /// Invalid indices and malformed commands are rendered as
    /// `error: <message>` replies; any other error is returned.
    pub fn dispatch(&mut self, line: &str) -> WallResult<Reply> {
        let result = Command::parse(line).and_then(|command| match command {
            Some(command) => self.execute(&command),
            None => Ok(Reply::empty()),
        });

        match result {
            Err(e) if e.is_user_error() => {
                tracing::debug!(line, error = %e, "Command rejected");
                Ok(Reply::Text(format!("error: {e}")))
            }
            other => other,
        }
    }

    /// Executes a parsed command.
    pub fn execute(&mut self, command: &Command) -> WallResult<Reply> {
        tracing::trace!(command = %command, "Executing command");

        let text = match command {
            Command::Help => HELP.to_string(),
            Command::Start => {
                self.engine.start();
                format!("new epoch {}", self.engine.epoch())
            }
            Command::Read { subject, object } => self
                .engine
                .access(*subject, *object, AccessKind::Read)?
                .verdict()
                .to_string(),
            Command::Write { subject, object } => self
                .engine
                .access(*subject, *object, AccessKind::Write)?
                .verdict()
                .to_string(),
            Command::ReportSubject(subject) => self.report_subject(*subject)?,
            Command::ReportObject(object) => {
                let subjects = self.engine.accessing_subjects(*object)?;
                format!("subjects: {}", join_or_none(&subjects))
            }
            Command::Briefcase(firm) => {
                let objects = self.engine.firm_objects(firm);
                format!("objects: {}", join_or_none(&objects))
            }
            Command::Firms => self.list_firms(),
            Command::Unassigned => {
                let objects = self.engine.unassigned_objects();
                format!("objects: {}", join_or_none(&objects))
            }
            Command::Exit => return Ok(Reply::Exit),
        };
        Ok(Reply::Text(text))
    }

    fn report_subject(&self, subject: usize) -> WallResult<String> {
        let objects = self.engine.accessed_objects(subject)?;
        if objects.is_empty() {
            return Ok("no objects".to_string());
        }

        let mut lines = Vec::with_capacity(objects.len());
        for object in objects {
            let firm = self
                .engine
                .firm(object)?
                .map_or_else(|| "-".to_string(), ToString::to_string);
            lines.push(format!("object {object} firm {firm}"));
        }
        Ok(lines.join("\n"))
    }

    fn list_firms(&self) -> String {
        let firms = self.engine.firms();
        if firms.is_empty() {
            return "no firms".to_string();
        }

        firms
            .into_iter()
            .map(|firm| {
                let class = self
                    .engine
                    .firm_conflict(firm)
                    .map_or_else(|| "-".to_string(), ToString::to_string);
                format!(
                    "firm {firm} class {class} objects {}",
                    self.engine.firm_object_count(firm)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Reads commands from `input` until `exit` or end of input, writing a
    /// `> ` prompt before each command and every non-empty reply after it.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> WallResult<()> {
        loop {
            write!(output, "> ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }

            match self.dispatch(&line)? {
                Reply::Exit => break,
                Reply::Text(text) if text.is_empty() => {}
                Reply::Text(text) => writeln!(output, "{text}")?,
            }
        }

        tracing::debug!(epoch = self.engine.epoch(), "Command session ended");
        Ok(())
    }
}

fn join_or_none(items: &[usize]) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
