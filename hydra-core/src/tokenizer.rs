//! Tokenizer for hydra source lines.
//!
//! A cleaned line is split into words and single-character delimiters.
//! Bracketed and quoted text is tokenized recursively and stored as the
//! children of the token that owns it:
//!
//! | Input                   | Token produced                               |
//! |-------------------------|----------------------------------------------|
//! | `a`, `radius`           | `Unknown("a")`                               |
//! | `1.5`, `.5`, `M_PI`     | `Number`                                     |
//! | `for`, `in`, `var`, `=` | registered keyword kind                      |
//! | `+`, `-`, `*`, `/`      | `Operator` (always one character)            |
//! | `,`, `:`                | `Unknown` (one character, read by the parser)|
//! | `circle(...)`           | `Function("circle")` with the call contents  |
//! | `(...)`                 | `Expression("(")` with the group contents    |
//! | `[...]`                 | `Range("[")` with the range contents         |
//! | `"a \(x) b"`            | `String` with fragment and escape children   |
//! | `// comment`            | removed before tokenizing                    |

use std::fmt;

use tracing::trace;

use crate::error::{ErrorKind, HydraError};
use crate::system::{ERROR_SENTINEL, PI_CONSTANT, System};
use crate::token::{Kind, Token};

/// Characters that always form a token of their own.
const SINGLE_CHARACTER_TOKENS: &[char] = &['+', '-', '*', '/', ',', ':', '='];

const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

/// Whether `c` terminates a word.
fn ends_word(c: char) -> bool {
    is_space(c) || matches!(c, '(' | ')' | '[' | ']' | '"') || SINGLE_CHARACTER_TOKENS.contains(&c)
}

// ---------------------------------------------------------------------------
// Scan error
// ---------------------------------------------------------------------------

/// A line that could not be tokenized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    /// [`ErrorKind::UnbalancedBracket`], [`ErrorKind::UnterminatedString`]
    /// or [`ErrorKind::EmptyEscape`].
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Character index in the cleaned line.
    pub index: usize,
}

impl ScanError {
    fn unmatched_bracket(bracket: char, index: usize) -> Self {
        Self {
            kind: ErrorKind::UnbalancedBracket,
            message: format!(
                "Missing parentheses: Could not find matching parentheses for '{bracket}' at character index: {index}."
            ),
            index,
        }
    }

    fn stray_bracket(bracket: char, index: usize) -> Self {
        Self {
            kind: ErrorKind::UnbalancedBracket,
            message: format!(
                "Unexpected '{bracket}' without matching opening bracket at character index: {index}."
            ),
            index,
        }
    }

    fn unterminated_string(index: usize) -> Self {
        Self {
            kind: ErrorKind::UnterminatedString,
            message: format!(
                "Missing quotation mark: Could not find the end of the string starting at character index: {index}."
            ),
            index,
        }
    }

    fn empty_escape(index: usize) -> Self {
        Self {
            kind: ErrorKind::EmptyEscape,
            message: format!("Empty string escape '\\()' at character index: {index}."),
            index,
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ScanError {}

impl From<ScanError> for HydraError {
    fn from(err: ScanError) -> Self {
        Self::new(err.kind, err.message)
    }
}

// ---------------------------------------------------------------------------
// Cleaning and matching
// ---------------------------------------------------------------------------

/// Remove the `//` comment (unless it is inside a string) and surrounding
/// whitespace.
#[must_use]
pub fn clean(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    let mut end = chars.len();
    while i < chars.len() {
        match chars[i] {
            '"' => match matching_quote(&chars, i) {
                Some(close) => {
                    i = close + 1;
                    continue;
                }
                None => break,
            },
            '/' if chars.get(i + 1) == Some(&'/') => {
                end = i;
                break;
            }
            _ => {}
        }
        i += 1;
    }
    let kept: String = chars[..end].iter().collect();
    kept.trim_matches(is_space).to_owned()
}

/// Position of the bracket closing the one at `open`.
///
/// Nested brackets of the same kind are counted; quoted spans are skipped.
fn matching_bracket(chars: &[char], open: usize) -> Option<usize> {
    let opening = chars[open];
    let closing = match opening {
        '(' => ')',
        '[' => ']',
        _ => return None,
    };
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            i = matching_quote(chars, i)?;
        } else if c == opening {
            depth += 1;
        } else if c == closing {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Position of the quote closing the one at `open`.
///
/// `\(...)` escapes are skipped as a whole, so they may contain quotes.
fn matching_quote(chars: &[char], open: usize) -> Option<usize> {
    let mut i = open + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' if chars.get(i + 1) == Some(&'(') => {
                i = matching_bracket(chars, i + 1)?;
            }
            '"' => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Turns source lines into token trees, classifying words through the
/// registry.
pub struct Tokenizer<'a> {
    system: &'a System,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub const fn new(system: &'a System) -> Self {
        Self { system }
    }

    /// Clean and tokenize one source line.
    ///
    /// # Errors
    ///
    /// Fails on unbalanced brackets, an unterminated string or an empty
    /// `\()` escape.
    pub fn tokenize(&self, line: &str) -> Result<Vec<Token>, ScanError> {
        let chars: Vec<char> = clean(line).chars().collect();
        let tokens = self.scan(&chars, 0)?;
        trace!(count = tokens.len(), "tokenized line");
        Ok(tokens)
    }

    /// The kind of a single word.
    #[must_use]
    pub fn classify(&self, word: &str) -> Kind {
        if word == ERROR_SENTINEL {
            return Kind::Error;
        }
        let kind = self.system.kind_for_keyword(word);
        if kind != Kind::Unknown {
            return kind;
        }
        if word == PI_CONSTANT || is_number(word) {
            return Kind::Number;
        }
        Kind::Unknown
    }

    /// Tokenize `chars`, which start at character `base` of the line.
    fn scan(&self, chars: &[char], base: usize) -> Result<Vec<Token>, ScanError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            match c {
                c if is_space(c) => i += 1,
                '(' | '[' => {
                    let close = matching_bracket(chars, i)
                        .ok_or_else(|| ScanError::unmatched_bracket(c, base + i))?;
                    let inner = self.scan(&chars[i + 1..close], base + i + 1)?;
                    let owns = tokens
                        .last()
                        .is_some_and(|t| t.kind.takes_arguments() && t.children.is_empty());
                    let owner = if owns { tokens.pop() } else { None };
                    let token = match owner {
                        Some(owner) => Token::with_children(owner.value, owner.kind, inner),
                        None => {
                            let kind = if c == '(' { Kind::Expression } else { Kind::Range };
                            Token::with_children(c, kind, inner)
                        }
                    };
                    tokens.push(token);
                    i = close + 1;
                }
                ')' | ']' => return Err(ScanError::stray_bracket(c, base + i)),
                '"' => {
                    let close = matching_quote(chars, i)
                        .ok_or_else(|| ScanError::unterminated_string(base + i))?;
                    tokens.push(self.scan_string(&chars[i + 1..close], base + i + 1)?);
                    i = close + 1;
                }
                c if SINGLE_CHARACTER_TOKENS.contains(&c) => {
                    let word = c.to_string();
                    let kind = self.classify(&word);
                    tokens.push(Token::new(word, kind));
                    i += 1;
                }
                _ => {
                    let start = i;
                    while i < chars.len() && !ends_word(chars[i]) {
                        i += 1;
                    }
                    let word: String = chars[start..i].iter().collect();
                    let kind = self.classify(&word);
                    tokens.push(Token::new(word, kind));
                }
            }
        }
        Ok(tokens)
    }

    /// Build the token for the text between two quotes.
    fn scan_string(&self, chars: &[char], base: usize) -> Result<Token, ScanError> {
        let raw: String = chars.iter().collect();
        let mut children = Vec::new();
        let mut fragment = String::new();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] == '\\' && chars.get(i + 1) == Some(&'(') {
                let close = matching_bracket(chars, i + 1)
                    .ok_or_else(|| ScanError::unmatched_bracket('(', base + i + 1))?;
                let body = &chars[i + 2..close];
                if body.iter().all(|&c| is_space(c)) {
                    return Err(ScanError::empty_escape(base + i));
                }
                if !fragment.is_empty() {
                    children.push(Token::new(std::mem::take(&mut fragment), Kind::String));
                }
                let text: String = body.iter().collect();
                let inner = self.scan(body, base + i + 2)?;
                children.push(Token::with_children(text, Kind::StringEscape, inner));
                i = close + 1;
            } else {
                fragment.push(chars[i]);
                i += 1;
            }
        }
        if children.is_empty() {
            return Ok(Token::new(raw, Kind::String));
        }
        if !fragment.is_empty() {
            children.push(Token::new(fragment, Kind::String));
        }
        Ok(Token::with_children(raw, Kind::String, children))
    }
}

/// Numeric literal: starts with a digit or `.` and parses as a float.
fn is_number(word: &str) -> bool {
    word.starts_with(|c: char| c.is_ascii_digit() || c == '.') && word.parse::<f64>().is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
