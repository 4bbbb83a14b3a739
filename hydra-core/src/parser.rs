//! Recursive-descent parser from token trees to parse trees.
//!
//! The statement kind of a token sequence is decided up front by
//! [`classify_sequence`]; each kind has its own rule. Rules never stop at
//! the first problem silently: every failure records a located diagnostic
//! and yields an `Error` node, so a statement is valid exactly when its
//! tree contains no `Error` node.

use std::slice;

use crate::ast::Node;
use crate::error::{ErrorKind, HydraError};
use crate::system::{DECLARATION_KEYWORD, FunctionSignature, System};
use crate::token::{Kind, Token};
use crate::tokenizer::Tokenizer;

/// Decide which rule parses `tokens`.
///
/// - `Empty` if there are no tokens;
/// - `Assignment` if a top-level token is `=`;
/// - `Expression` if a top-level token is an operator;
/// - the kind of the first token otherwise.
#[must_use]
pub fn classify_sequence(tokens: &[Token]) -> Kind {
    let Some(first) = tokens.first() else {
        return Kind::Empty;
    };
    if tokens.iter().any(is_equals_sign) {
        return Kind::Assignment;
    }
    if tokens.iter().any(|t| t.kind == Kind::Operator) {
        return Kind::Expression;
    }
    first.kind
}

fn is_equals_sign(token: &Token) -> bool {
    token.kind == Kind::Assignment && token.is("=")
}

/// A bare `,` or `:` (as opposed to a string containing one).
fn is_separator(token: &Token, separator: &str) -> bool {
    token.kind == Kind::Unknown && token.is(separator)
}

/// Variable names: a letter or `_`, then letters, digits or `_`.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parses lines into statement nodes, collecting diagnostics.
pub struct Parser<'a> {
    system: &'a System,
    /// Line being parsed, for error locations.
    line: Option<usize>,
    text: Option<String>,
    errors: Vec<HydraError>,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub const fn new(system: &'a System) -> Self {
        Self {
            system,
            line: None,
            text: None,
            errors: Vec::new(),
        }
    }

    /// Tokenize and parse one source line, tagging every node with `line`.
    pub fn parse_line(&mut self, text: &str, line: usize) -> Node {
        self.line = Some(line);
        self.text = Some(text.to_owned());
        let mut node = match Tokenizer::new(self.system).tokenize(text) {
            Ok(tokens) => self.parse(&tokens),
            Err(err) => {
                self.report(err.into());
                Node::error()
            }
        };
        node.set_line(line);
        node
    }

    /// Parse a token sequence as one statement.
    pub fn parse(&mut self, tokens: &[Token]) -> Node {
        match classify_sequence(tokens) {
            Kind::Empty => Node::new(Kind::Empty, ""),
            Kind::Assignment => self.parse_assignment(tokens),
            Kind::Expression => self.parse_expression(tokens),
            kind @ (Kind::Function | Kind::Initialization) => self.parse_call(tokens, kind),
            Kind::Loop => self.parse_loop(tokens),
            Kind::Range => self.parse_range(tokens),
            Kind::Number => self.parse_number(tokens),
            Kind::String => self.parse_string(tokens),
            Kind::Braces => self.parse_braces(tokens),
            Kind::Unknown => self.parse_variable(tokens),
            Kind::Error => self.fail(
                ErrorKind::InvalidSyntax,
                "Invalid syntax: the line contains an error marker.",
            ),
            _ => self.fail(
                ErrorKind::InvalidSyntax,
                "Could not parse line. Type of statement unclear.",
            ),
        }
    }

    /// Record a diagnostic at the current line.
    pub fn report(&mut self, error: HydraError) {
        self.errors
            .push(error.located(self.line, self.text.as_deref()));
    }

    /// Drain the recorded diagnostics.
    pub fn take_errors(&mut self) -> Vec<HydraError> {
        std::mem::take(&mut self.errors)
    }

    fn fail(&mut self, kind: ErrorKind, message: impl Into<String>) -> Node {
        self.report(HydraError::new(kind, message));
        Node::error()
    }

    fn note_usage(&mut self, signature: &FunctionSignature) {
        self.report(HydraError::info(format!(
            "Usage of '{}': {}",
            signature.name,
            signature.usage()
        )));
    }

    // -- assignment --

    fn parse_assignment(&mut self, tokens: &[Token]) -> Node {
        let positions: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| is_equals_sign(t))
            .map(|(i, _)| i)
            .collect();
        let &[equals] = positions.as_slice() else {
            return self.fail(
                ErrorKind::InvalidSyntax,
                "Invalid assignment. There must only be one assignment per statement.",
            );
        };
        let (lhs, rhs) = (&tokens[..equals], &tokens[equals + 1..]);

        let mut children = match lhs {
            [name] => {
                if name.kind != Kind::Unknown || !is_identifier(&name.value) {
                    return self.expected_variable_name(name);
                }
                vec![Node::new(Kind::Variable, &name.value)]
            }
            [keyword, name] if keyword.is(DECLARATION_KEYWORD) => {
                if name.kind != Kind::Unknown || !is_identifier(&name.value) {
                    return self.expected_variable_name(name);
                }
                vec![
                    Node::new(Kind::Assignment, DECLARATION_KEYWORD),
                    Node::new(Kind::Variable, &name.value),
                ]
            }
            [_, _] => {
                return self.fail(
                    ErrorKind::InvalidSyntax,
                    "Invalid assignment. Use 'var a = 10.0' to declare a variable.",
                );
            }
            _ => {
                return self.fail(
                    ErrorKind::InvalidSyntax,
                    "Invalid assignment. Use 'a = 10.0' or 'var a = 10.0' to assign a variable.",
                );
            }
        };

        if rhs.is_empty() {
            return self.fail(
                ErrorKind::InvalidSyntax,
                "Invalid assignment. The right hand side is missing.",
            );
        }
        children.push(self.parse(rhs));
        Node::with_children(Kind::Assignment, "=", children)
    }

    fn expected_variable_name(&mut self, found: &Token) -> Node {
        self.fail(
            ErrorKind::InvalidSyntax,
            format!(
                "Invalid assignment. Expected variable name but found '{}' instead. Use 'a = 10.0' or 'var a = 10.0' to assign a variable.",
                found.value
            ),
        )
    }

    // -- expressions --

    fn parse_expression(&mut self, tokens: &[Token]) -> Node {
        match tokens {
            [] => self.fail(
                ErrorKind::InvalidSyntax,
                "Unexpectedly found empty expression.",
            ),
            [single] => match single.kind {
                Kind::Number => self.parse_number(tokens),
                Kind::Expression => self.parse_group(single),
                Kind::Operator => self.fail(
                    ErrorKind::InvalidSyntax,
                    format!("Invalid syntax: Unexpectedly found operator '{}'.", single.value),
                ),
                _ => self.parse(tokens),
            },
            _ => self.parse_terms(tokens),
        }
    }

    /// A parenthesized group: its contents form a statement of their own.
    fn parse_group(&mut self, group: &Token) -> Node {
        if group.children.is_empty() {
            return self.fail(ErrorKind::InvalidSyntax, "Invalid or empty expression.");
        }
        if classify_sequence(&group.children) == Kind::Assignment {
            return self.fail(
                ErrorKind::InvalidSyntax,
                "Invalid syntax: an assignment cannot be used inside parentheses.",
            );
        }
        self.parse(&group.children)
    }

    /// `term op term op ... term`, with a leading `-` read as `0 -`.
    fn parse_terms(&mut self, tokens: &[Token]) -> Node {
        let unary_minus = tokens
            .first()
            .is_some_and(|t| t.kind == Kind::Operator && t.is("-"));
        let offset = usize::from(unary_minus);
        if (tokens.len() + offset) % 2 == 0 {
            return self.fail(
                ErrorKind::InvalidSyntax,
                "Invalid number of arguments in expression.",
            );
        }

        let mut children = Vec::with_capacity(tokens.len() + offset);
        if unary_minus {
            children.push(Node::new(Kind::Number, "0"));
        }
        for (i, token) in tokens.iter().enumerate() {
            let is_operator = token.kind == Kind::Operator;
            if (i + offset) % 2 == 0 {
                if is_operator {
                    return self.fail(
                        ErrorKind::InvalidSyntax,
                        format!("Invalid syntax: Unexpectedly found operator '{}'.", token.value),
                    );
                }
                let term = self.parse_expression(slice::from_ref(token));
                if term.contains_error() {
                    return term;
                }
                children.push(term);
            } else {
                if !is_operator {
                    return self.fail(
                        ErrorKind::InvalidSyntax,
                        format!(
                            "Invalid syntax: Expected operator but found '{}' instead.",
                            token.value
                        ),
                    );
                }
                children.push(Node::new(Kind::Operator, &token.value));
            }
        }
        Node::with_children(Kind::Expression, "", children)
    }

    // -- calls --

    fn parse_call(&mut self, tokens: &[Token], kind: Kind) -> Node {
        let [call] = tokens else {
            return self.fail(
                ErrorKind::InvalidSyntax,
                "Invalid number of statements. Use only one function call per line.",
            );
        };
        let Some(signature) = self.system.signature_for_function(&call.value) else {
            return self.fail(
                ErrorKind::UnknownFunction,
                format!("Unknown function: '{}'.", call.value),
            );
        };
        if kind == Kind::Initialization && call.children.is_empty() {
            let node = self.fail(
                ErrorKind::InvalidArguments,
                format!(
                    "Missing arguments during initialization of '{}'.",
                    call.value
                ),
            );
            self.note_usage(signature);
            return node;
        }

        let arguments = self.parse_argument_list(&call.children, signature);
        if arguments.contains_error() {
            self.note_usage(signature);
        }
        Node::with_children(kind, &call.value, vec![arguments])
    }

    /// `name: value, name: value, ...`, matched positionally against the
    /// signature.
    fn parse_argument_list(&mut self, tokens: &[Token], signature: &FunctionSignature) -> Node {
        let expected = signature.parameters;
        let mut arguments = Vec::with_capacity(expected.len());

        if !tokens.is_empty() {
            for (n, span) in tokens.split(|t| is_separator(t, ",")).enumerate() {
                let Some(&parameter) = expected.get(n) else {
                    return self.fail(
                        ErrorKind::InvalidArguments,
                        "Extraneous argument in function call.",
                    );
                };
                let argument = self.parse_argument(span, parameter);
                if argument.contains_error() {
                    return argument;
                }
                arguments.push(argument);
            }
        }

        if let Some(missing) = expected.get(arguments.len()) {
            return self.fail(
                ErrorKind::InvalidArguments,
                format!("Missing argument in function call. Expected '{missing}'."),
            );
        }
        Node::with_children(Kind::ArgumentList, "", arguments)
    }

    fn parse_argument(&mut self, span: &[Token], parameter: &str) -> Node {
        let Some((name, rest)) = span.split_first() else {
            return self.fail(
                ErrorKind::InvalidArguments,
                format!("Missing argument in function call. Expected '{parameter}'."),
            );
        };
        if !name.is(parameter) {
            return self.fail(
                ErrorKind::InvalidArguments,
                format!(
                    "Invalid argument in function call. Expected '{parameter}' but found '{}' instead.",
                    name.value
                ),
            );
        }
        let Some((colon, value)) = rest.split_first() else {
            return self.fail(
                ErrorKind::InvalidArguments,
                "Missing argument value in function call.",
            );
        };
        if !is_separator(colon, ":") {
            return self.fail(
                ErrorKind::InvalidArguments,
                format!(
                    "Invalid syntax in function call. Expected ':' but found '{}' instead.",
                    colon.value
                ),
            );
        }
        if value.is_empty() {
            return self.fail(
                ErrorKind::InvalidArguments,
                "Missing argument value in function call.",
            );
        }
        if value.iter().any(|t| is_separator(t, ":")) {
            return self.fail(
                ErrorKind::InvalidArguments,
                "Invalid syntax in function call. Expected ',' but found ':' instead.",
            );
        }
        let parsed = self.parse(value);
        Node::with_children(Kind::Argument, parameter, vec![parsed])
    }

    // -- loops --

    /// `for name in [lower, step, upper] {`
    ///
    /// A malformed header that still ends in `{` yields a `Loop` node with
    /// an `Error` child, so the body and closing brace stay balanced.
    fn parse_loop(&mut self, tokens: &[Token]) -> Node {
        let opens_body = tokens.last().is_some_and(|t| t.is("{"));
        let header = match tokens {
            [keyword, name, within, range, brace]
                if keyword.kind == Kind::Loop && within.is("in") && brace.is("{") =>
            {
                if name.kind != Kind::Unknown || !is_identifier(&name.value) {
                    self.fail(
                        ErrorKind::InvalidLoop,
                        format!(
                            "Invalid loop. Expected loop variable name but found '{}' instead.",
                            name.value
                        ),
                    )
                } else {
                    let range = self.parse_range(slice::from_ref(range));
                    Node::with_children(
                        Kind::Loop,
                        "for",
                        vec![Node::new(Kind::Variable, &name.value), range],
                    )
                }
            }
            _ if !opens_body => self.fail(
                ErrorKind::InvalidLoop,
                "Invalid loop. The opening brace '{' must be on the same line as the loop header.",
            ),
            _ => self.fail(
                ErrorKind::InvalidLoop,
                "Invalid loop. Use 'for i in [start, step, end] {'.",
            ),
        };
        if header.kind == Kind::Error && opens_body {
            return Node::with_children(Kind::Loop, "for", vec![header]);
        }
        header
    }

    /// `[lower, step, upper]`
    fn parse_range(&mut self, tokens: &[Token]) -> Node {
        let [range] = tokens else {
            return self.fail(
                ErrorKind::InvalidSyntax,
                "Invalid syntax: 'in' can only be used in a loop header.",
            );
        };
        if range.kind != Kind::Range || !range.is("[") {
            return self.fail(
                ErrorKind::InvalidSyntax,
                "Invalid syntax: 'in' can only be used in a loop header.",
            );
        }
        let spans: Vec<&[Token]> = range.children.split(|t| is_separator(t, ",")).collect();
        if spans.len() != 3 || spans.iter().any(|s| s.is_empty()) {
            return self.fail(
                ErrorKind::InvalidLoop,
                "Invalid range. Use '[start, step, end]'.",
            );
        }
        let bounds = spans.into_iter().map(|span| self.parse(span)).collect();
        Node::with_children(Kind::Range, "[", bounds)
    }

    // -- leaves --

    fn parse_number(&mut self, tokens: &[Token]) -> Node {
        match tokens {
            [number] if number.kind == Kind::Number => Node::new(Kind::Number, &number.value),
            [other] => self.fail(
                ErrorKind::InvalidSyntax,
                format!(
                    "Invalid argument: '{}' could not be read as '{}'.",
                    other.value,
                    Kind::Number
                ),
            ),
            _ => self.fail(
                ErrorKind::InvalidSyntax,
                format!(
                    "Invalid number of arguments near '{}'. Token could not be read as '{}'.",
                    tokens.first().map_or("", |t| t.value.as_str()),
                    Kind::Number
                ),
            ),
        }
    }

    fn parse_string(&mut self, tokens: &[Token]) -> Node {
        let [string] = tokens else {
            return self.fail(
                ErrorKind::InvalidSyntax,
                "Invalid syntax: unexpected tokens after string literal.",
            );
        };
        let parts = string
            .children
            .iter()
            .map(|part| match part.kind {
                Kind::StringEscape => {
                    let inner = self.parse(&part.children);
                    Node::with_children(Kind::StringEscape, &part.value, vec![inner])
                }
                _ => Node::new(Kind::String, &part.value),
            })
            .collect();
        Node::with_children(Kind::String, &string.value, parts)
    }

    fn parse_braces(&mut self, tokens: &[Token]) -> Node {
        match tokens {
            [brace] if brace.is("}") => Node::new(Kind::Braces, "}"),
            [_] => self.fail(
                ErrorKind::InvalidLoop,
                "Invalid syntax: loop braces must open on the loop header line.",
            ),
            _ => self.fail(
                ErrorKind::InvalidLoop,
                "Invalid syntax: a closing brace must stand on a line of its own.",
            ),
        }
    }

    fn parse_variable(&mut self, tokens: &[Token]) -> Node {
        match tokens {
            [name] if is_identifier(&name.value) => Node::new(Kind::Variable, &name.value),
            [name, group, ..] if group.kind == Kind::Expression && is_identifier(&name.value) => {
                self.fail(
                    ErrorKind::UnknownFunction,
                    format!("Unknown function: '{}'.", name.value),
                )
            }
            _ => self.fail(
                ErrorKind::InvalidSyntax,
                format!(
                    "Invalid syntax near '{}'.",
                    tokens.first().map_or("", |t| t.value.as_str())
                ),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;

    fn parse(line: &str) -> (Node, Vec<HydraError>) {
        let system = System::new();
        let mut parser = Parser::new(&system);
        let node = parser.parse_line(line, 1);
        (node, parser.take_errors())
    }

    fn ok(line: &str) -> Node {
        let (node, errors) = parse(line);
        assert!(errors.is_empty(), "unexpected errors for {line:?}: {errors:?}");
        assert!(!node.contains_error(), "error node for {line:?}: {}", node.dump());
        node
    }

    fn first_error(line: &str) -> HydraError {
        let (node, errors) = parse(line);
        assert!(node.contains_error(), "expected failure for {line:?}");
        errors
            .into_iter()
            .find(HydraError::is_error)
            .unwrap_or_else(|| panic!("no error recorded for {line:?}"))
    }

    #[test]
    fn reassignment() {
        assert_eq!(ok("a = 5.0").dump(), "Assignment(=)[Variable(a), Number(5.0)]");
    }

    #[test]
    fn declaration() {
        assert_eq!(
            ok("var a = b").dump(),
            "Assignment(=)[Assignment(var), Variable(a), Variable(b)]"
        );
    }

    #[test]
    fn nodes_carry_line_numbers() {
        let system = System::new();
        let mut parser = Parser::new(&system);
        let node = parser.parse_line("a = 1", 12);
        assert_eq!(node.line, Some(12));
        assert_eq!(node.children[1].line, Some(12));
    }

    #[test]
    fn assignment_errors() {
        let err = first_error("a = b = 1");
        assert!(err.message.contains("only be one"), "got: {}", err.message);
        let err = first_error("a =");
        assert!(err.message.contains("right hand side"), "got: {}", err.message);
        let err = first_error("let a = 1");
        assert!(err.message.contains("var a = 10.0"), "got: {}", err.message);
        let err = first_error("3 = 1");
        assert!(err.message.contains("Expected variable name"), "got: {}", err.message);
        assert_eq!(err.line, Some(1));
        assert_eq!(err.source.as_deref(), Some("3 = 1"));
    }

    #[test]
    fn expression_shape() {
        assert_eq!(
            ok("2.0 + 3.0 * a").dump(),
            "Expression()[Number(2.0), Operator(+), Number(3.0), Operator(*), Variable(a)]"
        );
    }

    #[test]
    fn parenthesized_group() {
        assert_eq!(
            ok("(2.0 + 3.0) * 4.0").dump(),
            "Expression()[Expression()[Number(2.0), Operator(+), Number(3.0)], Operator(*), Number(4.0)]"
        );
    }

    #[test]
    fn unary_minus_gets_implicit_zero() {
        assert_eq!(
            ok("-a * 2").dump(),
            "Expression()[Number(0), Operator(-), Variable(a), Operator(*), Number(2)]"
        );
    }

    #[test]
    fn malformed_expressions() {
        assert!(first_error("1 +").message.contains("Invalid number"));
        assert!(first_error("1 + * 2").message.contains("Invalid number"));
        assert!(first_error("* 2").message.contains("Invalid number"));
        assert!(first_error("1 + + 2 3").message.contains("operator"));
        assert!(first_error("()").message.contains("empty expression"));
    }

    #[test]
    fn function_call() {
        assert_eq!(
            ok("circle(center: Pol(r: 1.0, phi: 0.0), radius: 2)").dump(),
            "Function(circle)[ArgumentList()[\
             Argument(center)[Initialization(Pol)[ArgumentList()[\
             Argument(r)[Number(1.0)], Argument(phi)[Number(0.0)]]]], \
             Argument(radius)[Number(2)]]]"
        );
    }

    #[test]
    fn parameterless_call() {
        assert_eq!(ok("clear()").dump(), "Function(clear)[ArgumentList()]");
    }

    #[test]
    fn argument_value_may_be_an_expression() {
        let node = ok("sin(x: 2 * M_PI)");
        let value = &node.children[0].children[0].children[0];
        assert_eq!(value.kind, Kind::Expression);
    }

    #[test]
    fn argument_list_errors() {
        let cases = [
            ("circle(radius: 1, center: p)", "Expected 'center' but found 'radius'"),
            ("circle(center p, radius: 1)", "Expected ':' but found 'p'"),
            ("circle(center:, radius: 1)", "Missing argument value"),
            ("circle(center: p radius: 1)", "Expected ',' but found ':'"),
            ("circle(center: p, radius: 1, extra: 2)", "Extraneous argument"),
            ("circle(center: p)", "Expected 'radius'"),
            ("circle()", "Expected 'center'"),
        ];
        for (line, expected) in cases {
            let err = first_error(line);
            assert_eq!(err.kind, ErrorKind::InvalidArguments, "for {line:?}");
            assert!(err.message.contains(expected), "for {line:?}: {}", err.message);
        }
    }

    #[test]
    fn failed_call_adds_usage_note() {
        let (_, errors) = parse("circle(center: p)");
        let note = errors.last().expect("usage note");
        assert_eq!(note.severity, Severity::Info);
        assert!(
            note.message.contains("circle(center:radius)"),
            "got: {}",
            note.message
        );
    }

    #[test]
    fn initializer_without_arguments() {
        let err = first_error("p = Pol");
        assert!(err.message.contains("Missing arguments during initialization of 'Pol'"));
    }

    #[test]
    fn unknown_function() {
        let err = first_error("tan(x: 1)");
        assert_eq!(err.kind, ErrorKind::UnknownFunction);
    }

    #[test]
    fn loop_header() {
        assert_eq!(
            ok("for i in [0.0, 1.0, n] {").dump(),
            "Loop(for)[Variable(i), Range([)[Number(0.0), Number(1.0), Variable(n)]]"
        );
    }

    #[test]
    fn malformed_loops() {
        assert!(first_error("for i in [0, 1] {").message.contains("[start, step, end]"));
        assert!(first_error("for i in [0, 1, 2]").message.contains("same line"));
        let (node, _) = parse("for 3 in [0, 1, 2] {");
        assert_eq!(node.kind, Kind::Loop, "header errors keep the loop shape");
        assert!(node.contains_error());
    }

    #[test]
    fn braces() {
        assert_eq!(ok("}").kind, Kind::Braces);
        let err = first_error("{");
        assert!(err.message.contains("loop header line"), "got: {}", err.message);
    }

    #[test]
    fn string_literals() {
        assert_eq!(ok("\"hi\"").dump(), "String(hi)");
        assert_eq!(
            ok("\"Five is \\(a)\"").dump(),
            "String(Five is \\(a))[String(Five is ), StringEscape(a)[Variable(a)]]"
        );
    }

    #[test]
    fn single_variable_and_junk() {
        assert_eq!(ok("radius").dump(), "Variable(radius)");
        assert!(first_error("a b").message.contains("Invalid syntax near 'a'"));
        assert_eq!(first_error("foo(1)").kind, ErrorKind::UnknownFunction);
    }

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(ok("   // nothing").kind, Kind::Empty);
    }

    #[test]
    fn tokenizer_errors_are_reported() {
        let err = first_error("circle(center: Pol(r: 1.0");
        assert_eq!(err.kind, ErrorKind::UnbalancedBracket);
        assert!(err.message.contains("character index: 6"));
    }
}
