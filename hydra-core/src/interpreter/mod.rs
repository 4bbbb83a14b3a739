//! The hydra interpreter.
//!
//! Programs are parsed line by line into statement trees (see
//! [`crate::program`]) and then evaluated by walking those trees. Variables
//! live in the scope stack of [`State`]; drawing built-ins add sampled paths
//! to the [`Canvas`], which `save` renders through the injected
//! [`FileSystem`].
//!
//! A failing statement produces exactly one error. It aborts the statement
//! and everything after it in the same run, and is recorded once in
//! [`Interpreter::diagnostics`].

mod builtins;
mod expr;
mod helpers;
mod statement;

#[cfg(test)]
mod tests;

use std::time::{SystemTime, UNIX_EPOCH};

use hydra_geometry::canvas::Canvas;
use hydra_geometry::math::seed_from;
use tracing::{debug, trace};

use crate::ast::Node;
use crate::error::{ErrorKind, HydraError, InterpResult};
use crate::filesystem::{FileSystem, NullFileSystem};
use crate::program::parse_program;
use crate::source;
use crate::state::State;
use crate::system::System;
use crate::token::Kind;
use crate::types::Value;

// ---------------------------------------------------------------------------
// Interpreter state
// ---------------------------------------------------------------------------

/// The hydra interpreter.
pub struct Interpreter {
    /// Filesystem for `save`.
    fs: Box<dyn FileSystem>,
    /// Keywords and built-in signatures.
    system: System,
    /// Variable scopes and the execution cursor.
    pub state: State,
    /// Everything drawn so far.
    pub canvas: Canvas,
    /// Every diagnostic recorded so far, in order.
    pub diagnostics: Vec<HydraError>,
    /// Text written by `print` and `show`, not yet taken by the driver.
    output: String,
    /// State of the generator behind `random`.
    pub random_seed: u64,
    /// All lines read so far; line `n` is `source[n - 1]`.
    source: Vec<String>,
}

impl Interpreter {
    /// Create a new interpreter with an empty canvas and a clock-seeded
    /// random generator.
    #[must_use]
    pub fn new() -> Self {
        let clock = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() ^ u64::from(d.subsec_nanos()));
        Self {
            fs: Box::new(NullFileSystem),
            system: System::new(),
            state: State::new(),
            canvas: Canvas::new(),
            diagnostics: Vec::new(),
            output: String::new(),
            random_seed: seed_from(clock),
            source: Vec::new(),
        }
    }

    /// Set the filesystem used by `save`.
    pub fn set_filesystem(&mut self, fs: Box<dyn FileSystem>) {
        self.fs = fs;
    }

    /// Make `random` reproducible.
    pub const fn set_random_seed(&mut self, seed: u64) {
        self.random_seed = seed_from(seed);
    }

    #[must_use]
    pub const fn system(&self) -> &System {
        &self.system
    }

    /// Drain the text written by `print` and `show`.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    // =======================================================================
    // Public interface
    // =======================================================================

    /// Run a hydra program from source text.
    ///
    /// Returns the value of every top-level statement.
    ///
    /// # Errors
    ///
    /// Returns the first parse error (nothing is evaluated then) or the
    /// runtime error that stopped evaluation. Either is also recorded in
    /// [`Self::diagnostics`].
    pub fn run(&mut self, source: &str) -> InterpResult<Vec<Value>> {
        self.run_lines(&source::lines(source))
    }

    /// Run further lines of the same program.
    ///
    /// Lines are numbered on from the previous call, so an interactive
    /// session reports positions in the whole transcript.
    ///
    /// # Errors
    ///
    /// As for [`Self::run`].
    pub fn run_lines(&mut self, lines: &[String]) -> InterpResult<Vec<Value>> {
        let first_line = self.source.len() + 1;
        self.source.extend_from_slice(lines);

        let parsed = parse_program(&self.system, lines, first_line);
        let first_error = parsed.errors.iter().find(|e| e.is_error()).cloned();
        self.diagnostics.extend(parsed.errors);
        if let Some(err) = first_error {
            return Err(err);
        }

        let mut results = Vec::with_capacity(parsed.statements.len());
        for statement in &parsed.statements {
            match self.execute(statement) {
                Ok(value) => results.push(value),
                Err(err) => {
                    self.diagnostics.push(err.clone());
                    return Err(err);
                }
            }
        }
        Ok(results)
    }

    /// Render the canvas and write it to `file`, choosing the format from
    /// the extension.
    ///
    /// # Errors
    ///
    /// Fails for an unknown extension or when the filesystem refuses the
    /// write.
    pub fn save(&mut self, file: &str) -> InterpResult<()> {
        let contents = hydra_render::render_for_file(&self.canvas, file).ok_or_else(|| {
            HydraError::new(
                ErrorKind::InvalidArgument,
                format!("Could not save to '{file}'. Unknown file format; use '.svg' or '.ipe'."),
            )
        })?;
        self.fs.write_file(file, &contents).map_err(|reason| {
            HydraError::new(
                ErrorKind::IoError,
                format!("Could not save to '{file}': {reason}"),
            )
        })
    }

    // =======================================================================
    // Evaluation
    // =======================================================================

    /// Evaluate a top-level statement.
    fn execute(&mut self, statement: &Node) -> InterpResult<Value> {
        debug!(line = ?statement.line, tree = %statement.dump(), "executing statement");
        let value = self.evaluate(statement)?;
        debug!(line = ?statement.line, %value, "statement finished");
        Ok(value)
    }

    /// Evaluate any node.
    pub(crate) fn evaluate(&mut self, node: &Node) -> InterpResult<Value> {
        self.move_cursor(node.line);
        trace!(kind = %node.kind, value = %node.value, "evaluating node");

        let result = match node.kind {
            Kind::Assignment => self.eval_assignment(node),
            Kind::Expression => self.eval_expression(node),
            Kind::Function => self.call_function(node),
            Kind::Initialization => self.eval_initialization(node),
            Kind::Loop => self.eval_loop(node),
            Kind::Number => Self::eval_number(node),
            Kind::String => self.eval_string(node),
            Kind::Variable => self.eval_variable(node),
            Kind::Empty => Ok(Value::Vacuous),
            Kind::Error => Err(HydraError::new(
                ErrorKind::InvalidSyntax,
                "Interpretation failed: An error occurred while parsing.",
            )),
            Kind::Argument
            | Kind::ArgumentList
            | Kind::Braces
            | Kind::Operator
            | Kind::Parameter
            | Kind::ParameterList
            | Kind::Property
            | Kind::Range
            | Kind::StringEscape
            | Kind::Unknown => Err(HydraError::new(
                ErrorKind::Internal,
                format!("No interpretation defined for kind '{}'.", node.kind),
            )),
        };

        result.map_err(|err| {
            // nested statements may have moved the cursor past this node
            self.move_cursor(node.line);
            let cursor = self.state.cursor();
            err.located(cursor.line, cursor.text.as_deref())
        })
    }

    /// Point the cursor at `line` and its source text.
    fn move_cursor(&mut self, line: Option<usize>) {
        if line == self.state.cursor().line {
            return;
        }
        let text = line
            .and_then(|n| self.source.get(n.checked_sub(1)?))
            .cloned();
        self.state.set_cursor(line, text);
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
