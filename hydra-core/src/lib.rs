//! Hydra language tokenizer, parser and interpreter.
//!
//! Hydra programs describe drawings in the hyperbolic plane. Source text is
//! split into lines, each line is tokenized and parsed into a statement
//! tree, and the [`interpreter::Interpreter`] walks those trees, drawing
//! onto a `hydra_geometry::canvas::Canvas`.

pub mod ast;
pub mod error;
pub mod filesystem;
pub mod interpreter;
pub mod parser;
pub mod program;
pub mod source;
pub mod state;
pub mod system;
pub mod token;
pub mod tokenizer;
pub mod types;
