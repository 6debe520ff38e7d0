//! jparse
//!
//! A table-driven syntactic front end for a Java-like language.
//!
//! ## Architecture
//!
//! - **parser**: scanner, LALR(1) tables, shift/reduce driver, error recovery
//!   and the `parse_*` entry points
//! - **ast**: span-carrying node model the reduce actions assemble
//! - **error**: internal failure type; bad *input* never produces an `Err`,
//!   it produces [`parser::Problem`] events and recovered structure instead
//!
//! ## Flow
//!
//! ```text
//! Source → TokenSource → Automaton (tables + reduce actions) → CompilationUnit
//!                             ↓ on syntax error
//!                        checkpoint rewind + resync → RecoveredElement
//! ```
//!
//! The same automaton serves every entry point; a goal selector pseudo-token
//! picks whether a whole unit, a class body, a statement list or a single
//! expression is parsed. See [`parser::Parser`] for the entry points and
//! [`parser::SourceLevel`] for version gating.

pub mod ast;
pub mod error;
pub mod parser;

pub use error::{Error, Result};
pub use parser::{Parsed, Parser, SourceLevel};

/// Parse a source buffer as a compilation unit with default options.
pub fn parse(source: &str) -> Result<Parsed<ast::CompilationUnit>> {
    Parser::new().parse_compilation_unit(source)
}
