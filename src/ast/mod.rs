//! Abstract syntax tree produced by the parser.
//!
//! Nodes carry byte-offset [`Span`]s into the original buffer; line/column
//! pairs are derived lazily through [`crate::parser::span::LineIndex`] when a
//! diagnostic is rendered. Nodes assembled during error recovery keep their
//! `malformed` flag set so downstream passes can tell real structure from
//! salvaged structure.

mod nodes;
mod visitor;

pub use nodes::*;
pub use visitor::*;

pub use crate::parser::span::Span;

use std::fmt;

/// Trait implemented by every AST node.
pub trait AstNode {
    /// Get the source span of this node
    fn span(&self) -> Span;

    /// Accept a visitor
    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output;
}

/// Root node for one parsed source buffer.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub package: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub types: Vec<TypeDecl>,
    /// Comment ranges seen while scanning, in source order.
    pub comments: Vec<Span>,
    /// Set when any part of this unit was rebuilt by error recovery.
    pub recovered: bool,
    pub span: Span,
}

impl AstNode for CompilationUnit {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_compilation_unit(self)
    }
}

impl fmt::Display for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref package) = self.package {
            writeln!(f, "{}", package)?;
        }
        for import in &self.imports {
            writeln!(f, "{}", import)?;
        }
        for type_decl in &self.types {
            writeln!(f, "{}", type_decl)?;
        }
        Ok(())
    }
}
