//! Program assembly: parsing many lines and attaching loop bodies.
//!
//! Each line is one statement. A loop header opens a body that collects the
//! following statements until its closing `}`; bodies nest.

use crate::ast::Node;
use crate::error::{ErrorKind, HydraError};
use crate::parser::Parser;
use crate::system::System;
use crate::token::Kind;
use crate::tokenizer::Tokenizer;

/// The statements of a program with every diagnostic found while parsing.
#[derive(Debug, Default)]
pub struct ParsedProgram {
    /// Top-level statements; loop nodes own their bodies after the header
    /// children.
    pub statements: Vec<Node>,
    pub errors: Vec<HydraError>,
}

impl ParsedProgram {
    /// Whether the program can be run.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        !self.errors.iter().any(HydraError::is_error)
    }
}

/// Parse `lines`, the first of which is line `first_line` of the source.
#[must_use]
pub fn parse_program(system: &System, lines: &[String], first_line: usize) -> ParsedProgram {
    let mut parser = Parser::new(system);
    let mut statements = Vec::new();
    let mut open_loops: Vec<Node> = Vec::new();

    for (line, text) in (first_line..).zip(lines) {
        let node = parser.parse_line(text, line);
        match node.kind {
            Kind::Empty => {}
            Kind::Loop => open_loops.push(node),
            Kind::Braces => match open_loops.pop() {
                Some(finished) => append(&mut open_loops, &mut statements, finished),
                None => parser.report(HydraError::new(
                    ErrorKind::UnbalancedLoop,
                    "Unexpected '}': there is no open loop to close.",
                )),
            },
            _ => append(&mut open_loops, &mut statements, node),
        }
    }

    if let Some(unclosed) = open_loops.last() {
        let line = unclosed.line.unwrap_or(first_line);
        let text = line
            .checked_sub(first_line)
            .and_then(|offset| lines.get(offset));
        let mut error = HydraError::new(
            ErrorKind::UnbalancedLoop,
            format!("The loop starting in line {line} is never closed. Expected '}}'."),
        )
        .with_line(line);
        if let Some(text) = text {
            error = error.with_source(text.as_str());
        }
        parser.report(error);
    }

    ParsedProgram {
        statements,
        errors: parser.take_errors(),
    }
}

/// Add `node` to the innermost open loop body, or to the top level.
fn append(open_loops: &mut [Node], statements: &mut Vec<Node>, node: Node) {
    match open_loops.last_mut() {
        Some(body) => body.children.push(node),
        None => statements.push(node),
    }
}

// ---------------------------------------------------------------------------
// Interactive grouping
// ---------------------------------------------------------------------------

/// Collects interactive input until loop headers and closing braces
/// balance.
#[derive(Debug, Default)]
pub struct LineGroup {
    lines: Vec<String>,
    depth: usize,
}

impl LineGroup {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            depth: 0,
        }
    }

    /// Add a line. Returns the complete group once every loop opened in it
    /// has been closed.
    pub fn push(&mut self, system: &System, line: &str) -> Option<Vec<String>> {
        let tokens = Tokenizer::new(system).tokenize(line).unwrap_or_default();
        let opens = tokens.first().is_some_and(|t| t.kind == Kind::Loop)
            && tokens.last().is_some_and(|t| t.is("{"));
        let closes = matches!(tokens.as_slice(), [t] if t.is("}"));
        if opens {
            self.depth += 1;
        } else if closes {
            self.depth = self.depth.saturating_sub(1);
        }
        self.lines.push(line.to_owned());
        if self.depth == 0 {
            Some(std::mem::take(&mut self.lines))
        } else {
            None
        }
    }

    /// Number of loops still waiting for their `}`.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Whether lines are waiting for the group to complete.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.lines.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
