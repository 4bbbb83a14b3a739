//! Token and kind vocabulary shared by the tokenizer, parser and
//! interpreter.
//!
//! A line of hydra source becomes a *tree* of tokens: bracketed and quoted
//! text is tokenized recursively and stored in the children of the token
//! that owns it. For example `circle(center: p, radius: 1.0)` is a single
//! `Function` token whose children are the seven argument tokens.

use std::fmt;

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// The role a token or parse-tree node plays.
///
/// Tokens and nodes share one taxonomy; not every kind occurs in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `name: value` inside a call.
    Argument,
    /// All arguments of a call.
    ArgumentList,
    /// `=` and the declaration keyword `var`.
    Assignment,
    /// A line with nothing to do (blank or comment only).
    Empty,
    /// A lexical or syntax failure.
    Error,
    /// Arithmetic, or a parenthesized group.
    Expression,
    /// A call of a registered built-in.
    Function,
    /// `for` and loop nodes.
    Loop,
    /// A point constructor such as `Pol(r: 1.0, phi: 0.0)`.
    Initialization,
    /// A numeric literal.
    Number,
    /// `+`, `-`, `*` or `/`.
    Operator,
    /// `{` and `}`.
    Braces,
    /// Reserved for parameter declarations.
    Parameter,
    /// Reserved for parameter declarations.
    ParameterList,
    /// Reserved for property access.
    Property,
    /// `[lower, step, upper]` and the keyword `in`.
    Range,
    /// A string literal or one of its literal fragments.
    String,
    /// A `\(...)` interpolation inside a string.
    StringEscape,
    /// Anything unclassified; usually a variable name.
    Unknown,
    /// A variable reference or loop variable.
    Variable,
}

impl Kind {
    /// Whether a following `(` attaches its contents to this token.
    #[must_use]
    pub const fn takes_arguments(self) -> bool {
        matches!(self, Self::Function | Self::Initialization)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Argument => "Argument",
            Self::ArgumentList => "ArgumentList",
            Self::Assignment => "Assignment",
            Self::Empty => "Empty",
            Self::Error => "Error",
            Self::Expression => "Expression",
            Self::Function => "Function",
            Self::Loop => "Loop",
            Self::Initialization => "Initialization",
            Self::Number => "Number",
            Self::Operator => "Operator",
            Self::Braces => "Braces",
            Self::Parameter => "Parameter",
            Self::ParameterList => "ParameterList",
            Self::Property => "Property",
            Self::Range => "Range",
            Self::String => "String",
            Self::StringEscape => "StringEscape",
            Self::Unknown => "Unknown",
            Self::Variable => "Variable",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A lexical unit with its recursively tokenized contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The literal text (for strings and escapes: the text between the
    /// delimiters).
    pub value: String,
    pub kind: Kind,
    pub children: Vec<Token>,
}

impl Token {
    /// A token without children.
    #[must_use]
    pub fn new(value: impl Into<String>, kind: Kind) -> Self {
        Self {
            value: value.into(),
            kind,
            children: Vec::new(),
        }
    }

    /// A token that owns already-tokenized contents.
    #[must_use]
    pub fn with_children(value: impl Into<String>, kind: Kind, children: Vec<Self>) -> Self {
        Self {
            value: value.into(),
            kind,
            children,
        }
    }

    /// Whether the token's literal text is `s`.
    #[must_use]
    pub fn is(&self, s: &str) -> bool {
        self.value == s
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_calls_take_arguments() {
        assert!(Kind::Function.takes_arguments());
        assert!(Kind::Initialization.takes_arguments());
        assert!(!Kind::Unknown.takes_arguments());
        assert!(!Kind::Expression.takes_arguments());
    }
}
