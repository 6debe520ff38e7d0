//! The parsing front end: scanner, tables, driver and entry points.
//!
//! All entry points run the same table-driven automaton; what differs is the
//! goal selector fed as the first symbol, which picks the sub-grammar for a
//! whole unit, a class body, a statement list or a single expression. A
//! [`Parser`] is a small, copyable configuration object; each `parse_*` call
//! builds a fresh automaton over the given buffer, so one parser can be
//! reused (or cloned into a decorating consumer) freely.
//!
//! Parsing never fails on bad input. Syntax errors are reported through
//! [`Problem`] events, damaged regions are skipped and recorded as
//! [`RecoveredElement`]s, and the result carries whatever structure could be
//! salvaged. Only internal invariant violations surface as `Err`.

pub mod diagnostics;
pub mod span;

mod actions;
mod engine;
mod grammar;
mod lalr;
mod lexer;
mod recovery;
mod stacks;
mod tables;

pub use diagnostics::{DiagnosticSink, Problem, ProblemCollector, ProblemKind, SourceLevel};
pub use recovery::{RecoveredElement, RecoveredKind};
pub use span::{LineCol, LineIndex, Span};

use crate::ast::{ClassMember, CompilationUnit, Expr, Stmt};
use crate::error::Result;
use engine::Automaton;
use lexer::Term;
use stacks::AstValue;

/// Result of one entry-point call: the node(s) built, plus everything the
/// parse had to say about the input.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub value: T,
    pub problems: Vec<Problem>,
    /// Source regions discarded during error recovery.
    pub skipped: Vec<RecoveredElement>,
    /// True when any recovery took place.
    pub recovered: bool,
}

impl<T> Parsed<T> {
    pub fn has_syntax_error(&self) -> bool {
        self.problems.iter().any(Problem::is_syntax_error)
    }
}

/// Parser configuration: source level and diet mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    level: SourceLevel,
    diet: bool,
}

impl Parser {
    pub fn new() -> Self {
        Parser::default()
    }

    pub fn with_level(level: SourceLevel) -> Self {
        Parser { level, diet: false }
    }

    /// Diet mode parses declarations only: method, constructor and static
    /// initializer bodies are skipped and their source ranges recorded on the
    /// declaration for a later [`reparse_body`](Self::reparse_body).
    pub fn diet(mut self, diet: bool) -> Self {
        self.diet = diet;
        self
    }

    pub fn level(&self) -> SourceLevel {
        self.level
    }

    /// Parse a whole source buffer as a compilation unit.
    pub fn parse_compilation_unit(&self, source: &str) -> Result<Parsed<CompilationUnit>> {
        let mut automaton =
            Automaton::new(source, Term::GoalCompilationUnit, self.level, self.diet);
        automaton.run()?;
        let mut unit = match automaton.unit.take() {
            Some(unit) => unit,
            // Abandoned before the unit reduce: salvage what finished.
            None => salvage_unit(&mut automaton, source),
        };
        unit.comments = std::mem::take(&mut automaton.src.comments);
        unit.recovered = automaton.recovered;
        Ok(finish(automaton, unit))
    }

    /// Parse a standalone expression, e.g. a debugger watch or an annotation
    /// member value.
    pub fn parse_expression(&self, source: &str) -> Result<Parsed<Expr>> {
        let mut automaton = Automaton::new(source, Term::GoalExpression, self.level, false);
        automaton.run()?;
        let value = automaton
            .stacks
            .exprs
            .pop_one()
            .unwrap_or(Expr::Empty(Span::new(0, source.len() as u32)));
        Ok(finish(automaton, value))
    }

    /// Parse an annotation member value. Expression forms only; annotation
    /// and array-initializer values come in through their declaration.
    pub fn parse_member_value(&self, source: &str) -> Result<Parsed<Expr>> {
        self.parse_expression(source)
    }

    /// Parse a statement sequence, as found between the braces of a method
    /// body.
    pub fn parse_block_statements(&self, source: &str) -> Result<Parsed<Vec<Stmt>>> {
        let mut automaton = Automaton::new(source, Term::GoalBlockStatements, self.level, false);
        automaton.run()?;
        let value = drain_statements(&mut automaton);
        Ok(finish(automaton, value))
    }

    /// Re-parse one body range out of a diet-parsed buffer. `range` is the
    /// `body_range` recorded on the declaration.
    pub fn reparse_body(&self, source: &str, range: Span) -> Result<Parsed<Vec<Stmt>>> {
        let mut automaton = Automaton::new(source, Term::GoalBlockStatements, self.level, false);
        automaton.rescope(range.start, range.end);
        automaton.run()?;
        let value = drain_statements(&mut automaton);
        Ok(finish(automaton, value))
    }

    /// Parse a class-body fragment (fields, methods, nested types) without
    /// its surrounding braces. In diet mode bodies are skipped here too.
    pub fn parse_class_body_declarations(&self, source: &str) -> Result<Parsed<Vec<ClassMember>>> {
        let goal = if self.diet { Term::GoalHeaders } else { Term::GoalClassBodyDeclarations };
        let mut automaton = Automaton::new(source, goal, self.level, self.diet);
        automaton.run()?;
        let mut members = Vec::new();
        for value in drain_values(&mut automaton) {
            if let AstValue::Member(member) = value {
                members.push(member);
            }
        }
        Ok(finish(automaton, members))
    }
}

fn finish<T>(mut automaton: Automaton<'_>, value: T) -> Parsed<T> {
    // A clean parse consumes everything its reduces push; leftovers mean a
    // rule action popped the wrong count.
    debug_assert!(
        automaton.recovered || automaton.stacks.is_drained(),
        "value stacks not drained after a clean parse"
    );
    for problem in automaton.src.take_problems() {
        automaton.problems.report(problem);
    }
    Parsed {
        value,
        problems: automaton.problems.into_problems(),
        skipped: std::mem::take(&mut automaton.recovery.elements),
        recovered: automaton.recovered,
    }
}

/// Pop every remaining list off the declaration stack and flatten the lot
/// back into source order.
fn drain_values(automaton: &mut Automaton<'_>) -> Vec<AstValue> {
    let mut lists = Vec::new();
    while let Some(list) = automaton.stacks.ast.pop_list() {
        lists.push(list);
    }
    lists.reverse();
    lists.into_iter().flatten().collect()
}

fn drain_statements(automaton: &mut Automaton<'_>) -> Vec<Stmt> {
    drain_values(automaton)
        .into_iter()
        .filter_map(|value| match value {
            AstValue::Stmt(stmt) => Some(stmt),
            _ => None,
        })
        .collect()
}

/// Best-effort unit when the parse was abandoned before the final reduce:
/// finished top-level nodes are still sitting on the value stack.
fn salvage_unit(automaton: &mut Automaton<'_>, source: &str) -> CompilationUnit {
    let mut package = None;
    let mut imports = Vec::new();
    let mut types = Vec::new();
    for value in drain_values(automaton) {
        match value {
            AstValue::Package(p) => package = Some(p),
            AstValue::Import(i) => imports.push(i),
            AstValue::Type(t) => types.push(t),
            _ => {}
        }
    }
    CompilationUnit {
        package,
        imports,
        types,
        comments: Vec::new(),
        recovered: true,
        span: Span::new(0, source.len() as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TypeDecl;

    #[test]
    fn test_parse_simple_unit() {
        let parsed = Parser::new()
            .parse_compilation_unit("package demo;\nclass A { int f; }\n")
            .unwrap();
        assert!(!parsed.has_syntax_error(), "{:?}", parsed.problems);
        let unit = parsed.value;
        assert_eq!(unit.package.as_ref().map(|p| p.name.as_str()), Some("demo"));
        assert_eq!(unit.types.len(), 1);
        match &unit.types[0] {
            TypeDecl::Class(c) => assert_eq!(c.name, "A"),
            other => panic!("expected a class, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_expression_entry_point() {
        let parsed = Parser::new().parse_expression("a + b * c").unwrap();
        assert!(!parsed.has_syntax_error(), "{:?}", parsed.problems);
        assert!(matches!(parsed.value, Expr::Binary(_)));
    }

    #[test]
    fn test_parse_block_statements_entry_point() {
        let parsed = Parser::new()
            .parse_block_statements("int x = 1; x++; return x;")
            .unwrap();
        assert!(!parsed.has_syntax_error(), "{:?}", parsed.problems);
        assert_eq!(parsed.value.len(), 3);
    }

    #[test]
    fn test_parse_class_body_declarations_entry_point() {
        let parsed = Parser::new()
            .parse_class_body_declarations("int f; void m() {}")
            .unwrap();
        assert!(!parsed.has_syntax_error(), "{:?}", parsed.problems);
        assert_eq!(parsed.value.len(), 2);
    }

    #[test]
    fn test_comment_ranges_recorded() {
        let parsed = Parser::new()
            .parse_compilation_unit("// header\nclass A { /* body */ }\n")
            .unwrap();
        assert_eq!(parsed.value.comments.len(), 2);
    }
}
