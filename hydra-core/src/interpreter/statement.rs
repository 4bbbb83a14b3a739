//! Assignments and loops.

use hydra_geometry::types::EPSILON;
use tracing::trace;

use crate::ast::Node;
use crate::error::{ErrorKind, HydraError, InterpResult};
use crate::token::Kind;
use crate::types::Value;

use super::Interpreter;

fn parse_failure() -> HydraError {
    HydraError::new(
        ErrorKind::InvalidSyntax,
        "Interpretation failed: An error occurred while parsing.",
    )
}

fn reserved(name: &str) -> Option<HydraError> {
    name.starts_with('_').then(|| {
        HydraError::new(
            ErrorKind::ReservedName,
            format!("Invalid assignment of '{name}'. Variables starting with '_' cannot be assigned to."),
        )
    })
}

fn no_value(name: &str) -> HydraError {
    HydraError::new(
        ErrorKind::NoValue,
        format!("Could not define '{name}'. Right hand side of assignment did not have a value."),
    )
}

impl Interpreter {
    // =======================================================================
    // Assignment
    // =======================================================================

    pub(super) fn eval_assignment(&mut self, node: &Node) -> InterpResult<Value> {
        if node.contains_error() {
            return Err(parse_failure());
        }
        match node.children.as_slice() {
            [keyword, variable, rhs] if keyword.kind == Kind::Assignment => {
                self.declare(&variable.value, rhs)
            }
            [variable, rhs] => self.reassign(&variable.value, rhs),
            _ => Err(HydraError::new(
                ErrorKind::InvalidSyntax,
                "Invalid assignment. Use 'var a = 5.0' instead.",
            )),
        }
    }

    /// `var name = rhs`: bind in the current scope.
    fn declare(&mut self, name: &str, rhs: &Node) -> InterpResult<Value> {
        if name.is_empty() {
            return Err(HydraError::new(
                ErrorKind::InvalidSyntax,
                "Invalid assignment: The variable name must not be empty. Use 'var a = 5.0' instead.",
            ));
        }
        if let Some(err) = reserved(name) {
            return Err(err);
        }
        let value = self.evaluate(rhs)?;
        if value.is_vacuous() {
            return Err(no_value(name));
        }
        self.state.define(name, value.clone())?;
        Ok(value)
    }

    /// `name = rhs`: overwrite the visible binding in the scope that holds it.
    fn reassign(&mut self, name: &str, rhs: &Node) -> InterpResult<Value> {
        if let Some(err) = reserved(name) {
            return Err(err);
        }
        let value = self.evaluate(rhs)?;
        if value.is_vacuous() {
            return Err(no_value(name));
        }
        let Some((_, scope)) = self.state.lookup(name) else {
            return Err(HydraError::new(
                ErrorKind::UndefinedVariable,
                format!(
                    "Trying to assign to undeclared variable '{name}'. Declare the variable first using 'var {name} = ...'."
                ),
            ));
        };
        self.state.set(name, value.clone(), scope)?;
        Ok(value)
    }

    // =======================================================================
    // Loops
    // =======================================================================

    /// `for name in [lower, step, upper] { body }`
    ///
    /// The loop variable lives in a scope of its own; each pass through the
    /// body gets a fresh scope inside it. Both are closed on every exit.
    pub(super) fn eval_loop(&mut self, node: &Node) -> InterpResult<Value> {
        if node.contains_error() {
            return Err(parse_failure());
        }
        let [variable, range, body @ ..] = node.children.as_slice() else {
            return Err(HydraError::new(
                ErrorKind::InvalidLoop,
                "Invalid number of arguments for loop.",
            ));
        };
        if variable.kind != Kind::Variable {
            return Err(HydraError::new(
                ErrorKind::InvalidLoop,
                format!(
                    "Invalid syntax in loop definition. Expected variable name but found '{}' instead.",
                    variable.kind
                ),
            ));
        }
        let [lower, step, upper] = range.children.as_slice() else {
            return Err(HydraError::new(
                ErrorKind::InvalidLoop,
                format!(
                    "Invalid number of arguments in range definition. Expected 3 arguments but found {} instead.",
                    range.children.len()
                ),
            ));
        };

        self.state.open_scope();
        let result = self.run_loop(&variable.value, [lower, step, upper], body);
        self.state.close_scope();
        result.map(|()| Value::Vacuous)
    }

    fn run_loop(&mut self, name: &str, bounds: [&Node; 3], body: &[Node]) -> InterpResult<()> {
        let [lower, step, upper] = bounds;
        let lower = self.loop_bound(lower, "lower bound")?;
        let step = self.loop_bound(step, "step size")?;
        let upper = self.loop_bound(upper, "upper bound")?;
        if !(step.is_finite() && step > 0.0) {
            return Err(HydraError::new(
                ErrorKind::InvalidLoop,
                format!("Invalid loop step {step}. The step size must be positive."),
            ));
        }

        let scope = self.state.define(name, Value::Number(lower))?;
        // tolerate rounding in the accumulated loop variable
        let limit = upper + step * EPSILON;
        loop {
            let current = self.loop_variable(name)?;
            if current > limit {
                return Ok(());
            }
            trace!(variable = name, value = current, "loop iteration");

            self.state.open_scope();
            let outcome = body.iter().try_for_each(|statement| {
                self.evaluate(statement).map(drop)
            });
            self.state.close_scope();
            outcome?;

            let current = self.loop_variable(name)?;
            self.state
                .set(name, Value::Number(current + step), scope)
                .map_err(|_| {
                    HydraError::new(
                        ErrorKind::InvalidLoop,
                        format!("Could not interpret loop. Unable to update loop variable '{name}'."),
                    )
                })?;
        }
    }

    fn loop_bound(&mut self, node: &Node, what: &str) -> InterpResult<f64> {
        match self.evaluate(node)? {
            Value::Number(n) => Ok(n),
            other => Err(HydraError::new(
                ErrorKind::TypeError,
                format!(
                    "Interpretation failed. The {what} of the range must be a number but is a {}.",
                    other.type_name()
                ),
            )),
        }
    }

    fn loop_variable(&self, name: &str) -> InterpResult<f64> {
        match self.state.lookup_in_current(name) {
            Some(Value::Number(n)) => Ok(*n),
            _ => Err(HydraError::new(
                ErrorKind::TypeError,
                format!(
                    "Could not interpret loop. Loop variable '{name}' could not be interpreted as number."
                ),
            )),
        }
    }
}
