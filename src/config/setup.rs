//! Interactive, prompt-driven engine setup.

use crate::config::WallBuilder;
use crate::core::{AccessMatrix, ConflictClass, Firm, WallError, WallResult, MAX_CELLS};
use crate::policy::ChineseWallEngine;

use std::collections::BTreeSet;
use std::fmt::Display;
use std::io::{BufRead, Write};

/// Longest list of firms, classes or objects spelled out in a prompt.
const LISTED_ITEMS: usize = 32;

/// Collects the engine configuration by asking questions on a terminal.
///
/// The session asks for the subject, object and firm counts, then for each
/// firm its label and portfolio, then for each firm its conflict class.
/// Malformed answers are reported and the same question is asked again, so
/// an engine is only built from fully valid input.
pub struct SetupSession<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> SetupSession<R, W> {
    /// Creates a session reading answers from `input` and writing prompts to
    /// `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Returns the underlying reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Runs the whole dialogue and builds the engine.
    ///
    /// Fails with `Configuration` if the input ends before setup completes.
    pub fn run(&mut self) -> WallResult<ChineseWallEngine> {
        let subjects = self.ask("Enter the number of subjects: ", parse_count)?;
        let objects = self.ask("Enter the number of objects: ", |line| {
            let objects = parse_count(line)?;
            AccessMatrix::checked_size(subjects, objects)?;
            Ok(objects)
        })?;
        let firms = self.ask("Enter the number of firms: ", parse_count)?;

        let mut builder = WallBuilder::new(subjects, objects, firms);
        let mut declared = BTreeSet::new();
        let mut owned = BTreeSet::new();

        writeln!(self.output, "Please, set firms portfolios")?;
        for _ in 0..firms {
            let prompt = format!(
                "Enter firm's label ({} already exist): ",
                join_or(declared.iter(), "no firms")
            );
            let firm = self.ask(&prompt, Firm::parse)?;

            let available = (0..objects).filter(|object| !owned.contains(object));
            let prompt = format!(
                "Enter firm's objects, ending with -1 or end of line ({} available): ",
                join_or(available, "no objects")
            );
            let portfolio = self.ask(&prompt, |line| parse_portfolio(line, objects))?;

            owned.extend(portfolio.iter().copied());
            builder = builder.portfolio(firm.as_str(), portfolio);
            declared.insert(firm);
        }

        writeln!(self.output, "Please, set conflict classes")?;
        let mut classes = BTreeSet::new();
        for _ in 0..firms {
            let prompt = format!(
                "Enter a firm's label ({} already exist): ",
                join_or(declared.iter(), "no firms")
            );
            let firm = self.ask(&prompt, |line| {
                let firm = Firm::parse(line)?;
                if declared.contains(&firm) {
                    Ok(firm)
                } else {
                    Err(WallError::syntax(format!("firm '{firm}' was not declared")))
                }
            })?;

            let prompt = format!(
                "Set a conflict class ({} already exist): ",
                join_or(classes.iter(), "no classes")
            );
            let class = self.ask(&prompt, ConflictClass::parse)?;

            builder = builder.conflict(firm.as_str(), class.as_str());
            classes.insert(class);
        }

        let engine = builder.build()?;
        writeln!(self.output, "The system was successfully initialised!")?;
        Ok(engine)
    }

    /// Prompts until `parse` accepts the answer.
    fn ask<T>(&mut self, prompt: &str, parse: impl Fn(&str) -> WallResult<T>) -> WallResult<T> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(WallError::configuration(
                    "input ended before setup was complete",
                ));
            }

            match parse(line.trim()) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_user_error() => {
                    tracing::debug!(error = %e, "Rejected setup answer");
                    writeln!(self.output, "error: {e}")?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn parse_count(input: &str) -> WallResult<usize> {
    match input.parse::<usize>() {
        Ok(0) => Err(WallError::syntax("the number must be at least 1")),
        Ok(count) if count > MAX_CELLS => Err(WallError::syntax(format!(
            "the number must not exceed {MAX_CELLS}"
        ))),
        Ok(count) => Ok(count),
        Err(_) => Err(WallError::syntax(format!(
            "'{input}' is not a non-negative number"
        ))),
    }
}

/// Parses whitespace separated object indices, stopping at `-1`.
fn parse_portfolio(input: &str, objects: usize) -> WallResult<Vec<usize>> {
    let mut portfolio = Vec::new();
    for token in input.split_whitespace() {
        if token == "-1" {
            break;
        }
        let object: usize = token
            .parse()
            .map_err(|_| WallError::syntax(format!("'{token}' is not an object index")))?;
        if object >= objects {
            return Err(WallError::syntax(format!(
                "object {object} does not exist; objects are numbered below {objects}"
            )));
        }
        portfolio.push(object);
    }
    Ok(portfolio)
}

fn join_or<T: Display>(mut items: impl Iterator<Item = T>, empty: &str) -> String {
    let mut listed: Vec<String> = items
        .by_ref()
        .take(LISTED_ITEMS)
        .map(|item| item.to_string())
        .collect();
    if listed.is_empty() {
        return empty.to_string();
    }
    if items.next().is_some() {
        listed.push("...".to_string());
    }
    listed.join(", ")
}
