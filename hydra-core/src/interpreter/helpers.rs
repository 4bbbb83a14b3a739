//! Argument interpretation for built-in calls.

use std::collections::HashMap;

use hydra_geometry::polar::Pol;

use crate::ast::Node;
use crate::error::{ErrorKind, HydraError, InterpResult};
use crate::token::Kind;
use crate::types::Value;

use super::Interpreter;

/// The evaluated arguments of one call, by parameter name.
pub(super) struct Arguments {
    call: String,
    values: HashMap<String, Value>,
}

impl Arguments {
    fn get(&self, parameter: &str) -> InterpResult<&Value> {
        self.values.get(parameter).ok_or_else(|| {
            HydraError::new(
                ErrorKind::InvalidArguments,
                format!(
                    "Could not interpret '{}'. Argument for parameter '{parameter}' could not be found.",
                    self.call
                ),
            )
        })
    }

    fn wrong_type(&self, parameter: &str, expected: &str) -> HydraError {
        HydraError::new(
            ErrorKind::TypeError,
            format!(
                "Could not interpret '{}'. Argument for parameter '{parameter}' could not be interpreted as {expected}.",
                self.call
            ),
        )
    }

    pub(super) fn number(&self, parameter: &str) -> InterpResult<f64> {
        match self.get(parameter)? {
            Value::Number(n) => Ok(*n),
            _ => Err(self.wrong_type(parameter, "number")),
        }
    }

    pub(super) fn point(&self, parameter: &str) -> InterpResult<Pol> {
        match self.get(parameter)? {
            Value::Point(p) => Ok(*p),
            _ => Err(self.wrong_type(parameter, "Pol")),
        }
    }

    pub(super) fn string(&self, parameter: &str) -> InterpResult<&str> {
        match self.get(parameter)? {
            Value::String(s) => Ok(s),
            _ => Err(self.wrong_type(parameter, "string")),
        }
    }

    pub(super) fn value(&self, parameter: &str) -> InterpResult<&Value> {
        self.get(parameter)
    }
}

/// The `ArgumentList` child of a call node.
fn argument_list(call: &Node) -> InterpResult<&[Node]> {
    match call.children.as_slice() {
        [list] if list.kind == Kind::ArgumentList => Ok(&list.children),
        [other] => Err(HydraError::new(
            ErrorKind::Internal,
            format!(
                "In function call '{}': Expected argument list but found '{}' instead.",
                call.value, other.kind
            ),
        )),
        _ => Err(HydraError::new(
            ErrorKind::Internal,
            format!(
                "Could not interpret function '{}': The function call contained more than the argument list.",
                call.value
            ),
        )),
    }
}

/// The single value node of an `Argument` node.
fn argument_value<'n>(call: &Node, argument: &'n Node) -> InterpResult<&'n Node> {
    match (argument.kind, argument.children.as_slice()) {
        (Kind::Argument, [value]) => Ok(value),
        _ => Err(HydraError::new(
            ErrorKind::Internal,
            format!(
                "In function call '{}': Expected argument but found '{}' instead.",
                call.value, argument.kind
            ),
        )),
    }
}

/// The unevaluated value node passed for `parameter`.
///
/// Used by built-ins that evaluate an argument repeatedly.
pub(super) fn argument_node<'n>(call: &'n Node, parameter: &str) -> InterpResult<&'n Node> {
    for argument in argument_list(call)? {
        if argument.value == parameter {
            return argument_value(call, argument);
        }
    }
    Err(HydraError::new(
        ErrorKind::InvalidArguments,
        format!(
            "Could not interpret '{}'. Argument for parameter '{parameter}' could not be found.",
            call.value
        ),
    ))
}

impl Interpreter {
    /// Evaluate the arguments of `call`; with `only`, just the named ones.
    pub(super) fn interpret_arguments(
        &mut self,
        call: &Node,
        only: Option<&[&str]>,
    ) -> InterpResult<Arguments> {
        let mut values = HashMap::new();
        for argument in argument_list(call)? {
            let value_node = argument_value(call, argument)?;
            if only.is_some_and(|names| !names.contains(&argument.value.as_str())) {
                continue;
            }
            let value = self.evaluate(value_node)?;
            values.insert(argument.value.clone(), value);
        }
        Ok(Arguments {
            call: call.value.clone(),
            values,
        })
    }

    /// Evaluate `node` as the number for `parameter` of `call`.
    pub(super) fn evaluate_number(
        &mut self,
        call: &str,
        parameter: &str,
        node: &Node,
    ) -> InterpResult<f64> {
        match self.evaluate(node)? {
            Value::Number(n) => Ok(n),
            _ => Err(HydraError::new(
                ErrorKind::TypeError,
                format!(
                    "Could not interpret '{call}'. Argument for parameter '{parameter}' could not be interpreted as number."
                ),
            )),
        }
    }
}
