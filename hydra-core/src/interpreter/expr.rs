//! Expressions, literals and variable references.
//!
//! Arithmetic is evaluated in two passes over the flat term/operator list
//! produced by the parser: the first folds `*` and `/` from left to right,
//! the second adds and subtracts what is left.

use core::f64::consts::PI;

use crate::ast::Node;
use crate::error::{ErrorKind, HydraError, InterpResult};
use crate::system::PI_CONSTANT;
use crate::token::Kind;
use crate::types::Value;

use super::Interpreter;

/// A term of an expression, either still unevaluated or already folded.
enum Term<'n> {
    Pending(&'n Node),
    Number(f64),
}

impl Interpreter {
    pub(super) fn eval_expression(&mut self, node: &Node) -> InterpResult<Value> {
        let (first, rest) = node.children.split_first().ok_or_else(|| {
            HydraError::new(
                ErrorKind::InvalidSyntax,
                "Could not evaluate empty expression.",
            )
        })?;
        if rest.is_empty() {
            return self.evaluate(first);
        }

        // pass 1: products and quotients
        let mut terms = vec![Term::Pending(first)];
        let mut operators: Vec<&str> = Vec::new();
        for pair in rest.chunks(2) {
            let [operator, operand] = pair else {
                return Err(HydraError::new(
                    ErrorKind::InvalidSyntax,
                    "Expression ends with an operator.",
                ));
            };
            if operator.kind != Kind::Operator {
                return Err(HydraError::new(
                    ErrorKind::InvalidSyntax,
                    format!("Expected operator but found '{}' instead.", operator.value),
                ));
            }
            let symbol = operator.value.as_str();
            match symbol {
                "*" | "/" => {
                    let lhs = match terms.pop() {
                        Some(term) => self.term_number(term, symbol)?,
                        None => return Err(missing_operand(symbol)),
                    };
                    let rhs = self.operand_number(operand, symbol)?;
                    let folded = if symbol == "*" {
                        lhs * rhs
                    } else if rhs == 0.0 {
                        return Err(HydraError::new(
                            ErrorKind::ArithmeticError,
                            "Division by zero.",
                        ));
                    } else {
                        lhs / rhs
                    };
                    terms.push(Term::Number(folded));
                }
                "+" | "-" => {
                    operators.push(symbol);
                    terms.push(Term::Pending(operand));
                }
                other => {
                    return Err(HydraError::new(
                        ErrorKind::InvalidSyntax,
                        format!("Unknown operator '{other}'."),
                    ));
                }
            }
        }

        // pass 2: sums and differences
        let mut terms = terms.into_iter();
        let Some(head) = terms.next() else {
            return Err(missing_operand("+"));
        };
        if operators.is_empty() {
            return match head {
                Term::Pending(node) => self.evaluate(node),
                Term::Number(n) => Ok(Value::Number(n)),
            };
        }
        let mut total = self.term_number(head, operators[0])?;
        for (term, symbol) in terms.zip(operators) {
            let value = self.term_number(term, symbol)?;
            if symbol == "+" {
                total += value;
            } else {
                total -= value;
            }
        }
        Ok(Value::Number(total))
    }

    fn term_number(&mut self, term: Term<'_>, operator: &str) -> InterpResult<f64> {
        match term {
            Term::Number(n) => Ok(n),
            Term::Pending(node) => self.operand_number(node, operator),
        }
    }

    fn operand_number(&mut self, node: &Node, operator: &str) -> InterpResult<f64> {
        match self.evaluate(node)? {
            Value::Number(n) => Ok(n),
            other => Err(HydraError::new(
                ErrorKind::TypeError,
                format!(
                    "Interpretation failed: Operand of '{operator}' near '{}' must be a number but is a {}.",
                    node.value,
                    other.type_name()
                ),
            )),
        }
    }

    pub(super) fn eval_number(node: &Node) -> InterpResult<Value> {
        if node.value == PI_CONSTANT {
            return Ok(Value::Number(PI));
        }
        node.value.parse().map(Value::Number).map_err(|_| {
            HydraError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "Interpretation failed: Invalid argument: '{}' is not a number.",
                    node.value
                ),
            )
        })
    }

    pub(super) fn eval_string(&mut self, node: &Node) -> InterpResult<Value> {
        if node.children.is_empty() {
            return Ok(Value::String(node.value.clone()));
        }
        let mut text = String::new();
        for part in &node.children {
            match part.kind {
                Kind::String => text.push_str(&part.value),
                Kind::StringEscape => {
                    let Some(inner) = part.children.first() else {
                        return Err(not_a_string(part));
                    };
                    let value = self.evaluate(inner)?;
                    let shown = value.display_string().ok_or_else(|| not_a_string(part))?;
                    text.push_str(&shown);
                }
                other => {
                    return Err(HydraError::new(
                        ErrorKind::Internal,
                        format!("Interpretation failed. Unexpectedly found '{other}' while interpreting a string."),
                    ));
                }
            }
        }
        Ok(Value::String(text))
    }

    pub(super) fn eval_variable(&self, node: &Node) -> InterpResult<Value> {
        let name = &node.value;
        self.state
            .lookup(name)
            .map(|(value, _)| value.clone())
            .ok_or_else(|| {
                HydraError::new(
                    ErrorKind::UndefinedVariable,
                    format!(
                        "Use of undeclared variable '{name}'. Declare the variable first using 'var {name} = ...'"
                    ),
                )
            })
    }
}

fn missing_operand(operator: &str) -> HydraError {
    HydraError::new(
        ErrorKind::InvalidSyntax,
        format!("Missing operand near '{operator}'."),
    )
}

fn not_a_string(escape: &Node) -> HydraError {
    HydraError::new(
        ErrorKind::TypeError,
        format!(
            "Interpretation failed. '{}' could not be interpreted as string.",
            escape.value
        ),
    )
}
