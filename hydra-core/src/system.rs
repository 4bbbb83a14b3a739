//! The registry of keywords and built-in function signatures.
//!
//! The tokenizer asks the registry for the [`Kind`] of every word; the
//! parser uses the registered parameter lists to validate calls, and the
//! interpreter dispatches on the same names. The tables are static and the
//! [`System`] index over them is built once per interpreter.

use std::collections::HashMap;

use crate::token::Kind;

/// Reserved word that marks a token as an error.
pub const ERROR_SENTINEL: &str = "__ERROR__";

/// Spelling of the constant π in source code.
pub const PI_CONSTANT: &str = "M_PI";

/// Keyword that declares a new variable.
pub const DECLARATION_KEYWORD: &str = "var";

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// A reserved word or symbol with a fixed kind.
#[derive(Debug, Clone, Copy)]
pub struct Keyword {
    pub name: &'static str,
    pub kind: Kind,
}

/// A built-in function or point initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: &'static str,
    /// Parameter names, in the order they must be passed.
    pub parameters: &'static [&'static str],
    /// [`Kind::Function`] or [`Kind::Initialization`].
    pub kind: Kind,
}

impl FunctionSignature {
    /// Usage string such as `circle(center:radius)`.
    #[must_use]
    pub fn usage(&self) -> String {
        format!("{}({})", self.name, self.parameters.join(":"))
    }
}

/// Reserved words and operator symbols.
pub const KEYWORDS: &[Keyword] = &[
    Keyword {
        name: "for",
        kind: Kind::Loop,
    },
    Keyword {
        name: "in",
        kind: Kind::Range,
    },
    Keyword {
        name: DECLARATION_KEYWORD,
        kind: Kind::Assignment,
    },
    Keyword {
        name: "=",
        kind: Kind::Assignment,
    },
    Keyword {
        name: "+",
        kind: Kind::Operator,
    },
    Keyword {
        name: "-",
        kind: Kind::Operator,
    },
    Keyword {
        name: "*",
        kind: Kind::Operator,
    },
    Keyword {
        name: "/",
        kind: Kind::Operator,
    },
    Keyword {
        name: "{",
        kind: Kind::Braces,
    },
    Keyword {
        name: "}",
        kind: Kind::Braces,
    },
];

const fn function(name: &'static str, parameters: &'static [&'static str]) -> FunctionSignature {
    FunctionSignature {
        name,
        parameters,
        kind: Kind::Function,
    }
}

const fn initializer(
    name: &'static str,
    parameters: &'static [&'static str],
) -> FunctionSignature {
    FunctionSignature {
        name,
        parameters,
        kind: Kind::Initialization,
    }
}

/// All built-ins, in alphabetical order of name.
pub const FUNCTIONS: &[FunctionSignature] = &[
    function("angular", &["of"]),
    function("arc", &["center", "radius", "from", "to"]),
    function("circle", &["center", "radius"]),
    function("clear", &[]),
    function("cos", &["x"]),
    function("cosh", &["x"]),
    function("curve_angle", &["from", "to", "angle"]),
    function("curve_distance", &["from", "to", "distance"]),
    function("distance", &["from", "to"]),
    initializer("Euc", &["x", "y"]),
    function("exp", &["x"]),
    function("line", &["from", "to"]),
    function("log", &["x"]),
    function("mark", &["center", "radius"]),
    initializer("Pol", &["r", "phi"]),
    function("print", &["message"]),
    function("radial", &["of"]),
    function("random", &["from", "to"]),
    function("resolution", &["samples"]),
    function("save", &["file"]),
    function("show", &[]),
    function("sin", &["x"]),
    function("sinh", &["x"]),
    function("sqrt", &["x"]),
    function("theta", &["r1", "r2", "R"]),
];

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Name lookup over [`KEYWORDS`] and [`FUNCTIONS`].
#[derive(Debug)]
pub struct System {
    kinds: HashMap<&'static str, Kind>,
    functions: HashMap<&'static str, &'static FunctionSignature>,
}

impl System {
    /// Build the registry with every keyword and built-in.
    #[must_use]
    pub fn new() -> Self {
        let mut kinds = HashMap::with_capacity(KEYWORDS.len() + FUNCTIONS.len());
        let mut functions = HashMap::with_capacity(FUNCTIONS.len());
        for keyword in KEYWORDS {
            kinds.insert(keyword.name, keyword.kind);
        }
        for signature in FUNCTIONS {
            kinds.insert(signature.name, signature.kind);
            functions.insert(signature.name, signature);
        }
        Self { kinds, functions }
    }

    /// The registered kind of a word, or [`Kind::Unknown`].
    #[must_use]
    pub fn kind_for_keyword(&self, name: &str) -> Kind {
        self.kinds.get(name).copied().unwrap_or(Kind::Unknown)
    }

    /// The signature of a built-in function or initializer.
    #[must_use]
    pub fn signature_for_function(&self, name: &str) -> Option<&'static FunctionSignature> {
        self.functions.get(name).copied()
    }

    /// Usage string for a built-in, e.g. `Pol(r:phi)`.
    #[must_use]
    pub fn usage(&self, name: &str) -> Option<String> {
        self.signature_for_function(name).map(FunctionSignature::usage)
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let mut names = HashSet::new();
        for name in KEYWORDS
            .iter()
            .map(|k| k.name)
            .chain(FUNCTIONS.iter().map(|f| f.name))
        {
            assert!(names.insert(name), "duplicate registry name: {name:?}");
        }
    }

    #[test]
    fn signatures_are_calls() {
        for f in FUNCTIONS {
            assert!(f.kind.takes_arguments(), "{} has kind {}", f.name, f.kind);
        }
    }

    #[test]
    fn keyword_kinds() {
        let system = System::new();
        assert_eq!(system.kind_for_keyword("for"), Kind::Loop);
        assert_eq!(system.kind_for_keyword("in"), Kind::Range);
        assert_eq!(system.kind_for_keyword("var"), Kind::Assignment);
        assert_eq!(system.kind_for_keyword("="), Kind::Assignment);
        assert_eq!(system.kind_for_keyword("*"), Kind::Operator);
        assert_eq!(system.kind_for_keyword("}"), Kind::Braces);
        assert_eq!(system.kind_for_keyword("circle"), Kind::Function);
        assert_eq!(system.kind_for_keyword("Pol"), Kind::Initialization);
        assert_eq!(system.kind_for_keyword("radius"), Kind::Unknown);
    }

    #[test]
    fn signature_lookup() {
        let system = System::new();
        let arc = system.signature_for_function("arc").expect("arc is registered");
        assert_eq!(arc.parameters, &["center", "radius", "from", "to"]);
        assert!(system.signature_for_function("for").is_none());
        assert!(system.signature_for_function("tan").is_none());
    }

    #[test]
    fn usage_strings() {
        let system = System::new();
        assert_eq!(system.usage("circle").as_deref(), Some("circle(center:radius)"));
        assert_eq!(system.usage("clear").as_deref(), Some("clear()"));
        assert_eq!(system.usage("Pol").as_deref(), Some("Pol(r:phi)"));
        assert_eq!(system.usage("nope"), None);
    }
}
