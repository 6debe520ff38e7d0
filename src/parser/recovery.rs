//! Error recovery support: committed-boundary checkpoints, skip records and
//! secondary diagnosis.
//!
//! A list-element reduce (import, type declaration, class member, block
//! statement, ...) marks a boundary; the driver commits the checkpoint at the
//! shift that follows it, once the whole reduce cascade for that lookahead
//! has run. Committing mid-cascade would let a rewind replay a list
//! concatenation that already happened, corrupting the segment discipline.
//!
//! On error the driver first tries a single-terminal splice (a missing `;`,
//! closer, or declaration name); only when no splice applies does it rewind
//! to the newest checkpoint, which discards the half-built construct but
//! keeps everything already committed on the enclosing list, then
//! fast-forwards the token stream to a plausible restart point. Each skipped
//! region is kept as a [`RecoveredElement`] so callers can see what was given
//! up on.
//!
//! The parse is abandoned outright once the end of input has been hit twice
//! during recovery; at that point there is nothing left to resynchronize on.

use crate::parser::diagnostics::{Problem, ProblemKind};
use crate::parser::grammar::NonTerm;
use crate::parser::lexer::{Scanned, Term, TokenSource};
use crate::parser::span::Span;
use crate::parser::stacks::{StackMark, ValueStacks};

/// How many expected terminals a diagnosis lists before truncating.
const MAX_EXPECTED: usize = 8;

/// A committed automaton configuration recovery can rewind to.
#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    pub states: Vec<u16>,
    pub spans: Vec<Span>,
    pub mark: StackMark,
}

/// A region of source the parser skipped while resynchronizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredElement {
    pub kind: RecoveredKind,
    pub span: Span,
}

/// Rough classification of a skipped region, from its first token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveredKind {
    Import,
    TypeDeclaration,
    Member,
    Statement,
    Unknown,
}

/// Recovery bookkeeping owned by the driver.
#[derive(Debug, Default)]
pub(crate) struct Recovery {
    checkpoint: Option<Checkpoint>,
    eof_hits: u32,
    pub elements: Vec<RecoveredElement>,
}

impl Recovery {
    pub fn new() -> Self {
        Recovery::default()
    }

    /// Commit the current configuration. Only the newest checkpoint is kept;
    /// rewinding further than one boundary would drop finished nodes.
    pub fn checkpoint(&mut self, states: &[u16], spans: &[Span], stacks: &ValueStacks) {
        self.checkpoint = Some(Checkpoint {
            states: states.to_vec(),
            spans: spans.to_vec(),
            mark: stacks.mark(),
        });
    }

    pub fn last_checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoint.as_ref()
    }

    pub fn eof_hit(&mut self) {
        self.eof_hits += 1;
    }

    pub fn abandoned(&self) -> bool {
        self.eof_hits >= 2
    }

    /// Remember a skipped region.
    pub fn record_skip(&mut self, first: Term, span: Span) {
        if span.is_empty() {
            return;
        }
        let element = RecoveredElement { kind: classify(first), span };
        if self.elements.last() != Some(&element) {
            self.elements.push(element);
        }
    }
}

fn classify(first: Term) -> RecoveredKind {
    match first {
        Term::Import => RecoveredKind::Import,
        Term::Class | Term::Interface | Term::Enum | Term::At => RecoveredKind::TypeDeclaration,
        Term::If
        | Term::While
        | Term::For
        | Term::Do
        | Term::Switch
        | Term::Return
        | Term::Try
        | Term::Throw
        | Term::Break
        | Term::Continue
        | Term::Assert
        | Term::Synchronized => RecoveredKind::Statement,
        Term::Public
        | Term::Protected
        | Term::Private
        | Term::Static
        | Term::Abstract
        | Term::Final
        | Term::Void
        | Term::Boolean
        | Term::Byte
        | Term::Short
        | Term::Int
        | Term::Long
        | Term::Char
        | Term::Float
        | Term::Double
        | Term::Identifier => RecoveredKind::Member,
        _ => RecoveredKind::Unknown,
    }
}

/// Productions whose reduce marks a safe recovery boundary.
pub(crate) fn is_boundary(lhs: NonTerm) -> bool {
    matches!(
        lhs,
        NonTerm::PackageDeclaration
            | NonTerm::ImportDeclaration
            | NonTerm::TypeDeclaration
            | NonTerm::ClassBodyDeclaration
            | NonTerm::BlockStatement
            | NonTerm::SwitchBlockStatementGroup
            | NonTerm::EnumConstant
    )
}

/// Build the syntax-error problem for a failure point: what was found, and
/// which terminals the tables would have accepted there.
pub(crate) fn diagnose(current: Scanned, expected: &[Term], src: &TokenSource<'_>) -> Problem {
    let mut names: Vec<String> = expected
        .iter()
        .take(MAX_EXPECTED)
        .map(|t| t.display_name().to_string())
        .collect();
    if expected.len() > MAX_EXPECTED {
        names.push("...".to_string());
    }
    let kind = if current.term == Term::Eof {
        ProblemKind::UnexpectedEof { expected: names }
    } else {
        let found = match current.term {
            Term::Identifier
            | Term::IntLiteral
            | Term::LongLiteral
            | Term::FloatLiteral
            | Term::DoubleLiteral
            | Term::CharLiteral
            | Term::StringLiteral => src.text(current.span).to_string(),
            other => other.display_name().to_string(),
        };
        ProblemKind::ParseError { expected: names, found }
    };
    Problem::new(kind, current.span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_list_elements() {
        assert!(is_boundary(NonTerm::BlockStatement));
        assert!(is_boundary(NonTerm::ClassBodyDeclaration));
        assert!(!is_boundary(NonTerm::Expression));
        assert!(!is_boundary(NonTerm::MethodHeader));
    }

    #[test]
    fn test_classify_skip_kinds() {
        assert_eq!(classify(Term::Import), RecoveredKind::Import);
        assert_eq!(classify(Term::Class), RecoveredKind::TypeDeclaration);
        assert_eq!(classify(Term::While), RecoveredKind::Statement);
        assert_eq!(classify(Term::Public), RecoveredKind::Member);
        assert_eq!(classify(Term::Comma), RecoveredKind::Unknown);
    }

    #[test]
    fn test_abandon_after_two_eof_hits() {
        let mut recovery = Recovery::new();
        assert!(!recovery.abandoned());
        recovery.eof_hit();
        assert!(!recovery.abandoned());
        recovery.eof_hit();
        assert!(recovery.abandoned());
    }

    #[test]
    fn test_duplicate_skip_records_collapse() {
        let mut recovery = Recovery::new();
        recovery.record_skip(Term::While, Span::new(4, 20));
        recovery.record_skip(Term::While, Span::new(4, 20));
        assert_eq!(recovery.elements.len(), 1);
    }
}
