//! Diagnostic events produced by the parser.
//!
//! The parser only decides *what* went wrong and *where*; severity policy and
//! final message text belong to the embedding compiler. Everything here is an
//! event stream a caller drains after parsing.

use super::span::Span;

/// The source level a construct requires, as a Java-ish version number.
/// Stored per rule in the tables; compared against [`SourceLevel`] of the parse.
pub type LevelCell = u64;

/// Language level the current parse is performed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceLevel(pub u64);

impl SourceLevel {
    pub const JAVA_1_4: SourceLevel = SourceLevel(4);
    pub const JAVA_5: SourceLevel = SourceLevel(5);
    pub const JAVA_7: SourceLevel = SourceLevel(7);
    pub const JAVA_8: SourceLevel = SourceLevel(8);

    pub fn supports(&self, required: LevelCell) -> bool {
        self.0 >= required
    }
}

impl Default for SourceLevel {
    fn default() -> Self {
        SourceLevel::JAVA_8
    }
}

/// Classification of a reported problem.
///
/// Version-gated kinds are informational to the parser: the construct is kept
/// and parsing continues (severity is the caller's call).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemKind {
    /// A grammar violation. Carries the display names of the terminals the
    /// automaton would have accepted at the failure point, re-derived from the
    /// tables by the secondary diagnosis pass.
    ParseError { expected: Vec<String>, found: String },
    /// Input ended while the automaton still expected more.
    UnexpectedEof { expected: Vec<String> },
    /// The scanner could not form a token (malformed literal, stray character,
    /// unterminated comment or string).
    InvalidToken { text: String },
    UnterminatedComment,
    UnterminatedString,

    /// Version-gated constructs, reported but accepted.
    DiamondBelowSource { required: LevelCell },
    UnderscoresInLiteralBelowSource { required: LevelCell },
    BinaryLiteralBelowSource { required: LevelCell },
    MultiCatchBelowSource { required: LevelCell },
    TryWithResourcesBelowSource { required: LevelCell },
    LambdaBelowSource { required: LevelCell },
    MethodReferenceBelowSource { required: LevelCell },
    TypeAnnotationBelowSource { required: LevelCell },
    DefaultMethodBelowSource { required: LevelCell },
    /// Catch-all for gated rules without a dedicated kind above. Carries the
    /// display name of the grammar symbol the rule produces.
    VersionGated { construct: String, required: LevelCell },
}

impl ProblemKind {
    /// True for the kinds that flag a construct without invalidating it.
    pub fn is_version_gated(&self) -> bool {
        !matches!(
            self,
            ProblemKind::ParseError { .. }
                | ProblemKind::UnexpectedEof { .. }
                | ProblemKind::InvalidToken { .. }
                | ProblemKind::UnterminatedComment
                | ProblemKind::UnterminatedString
        )
    }
}

/// One diagnostic event: a kind spanning a source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub kind: ProblemKind,
    pub span: Span,
}

impl Problem {
    pub fn new(kind: ProblemKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// True when this problem marks an actual syntax error (as opposed to a
    /// version-gated construct the parse accepted).
    pub fn is_syntax_error(&self) -> bool {
        !self.kind.is_version_gated()
    }
}

/// Where the parser hands its problems. The default collecting sink is what the
/// entry points use; an embedding compiler may substitute its own.
pub trait DiagnosticSink {
    fn report(&mut self, problem: Problem);
}

/// Ordered, deduplicating collector for problems.
///
/// Recovery can revisit a failure point when a checkpoint move replays the
/// automaton; reporting the identical (kind, span) twice would double up user
/// diagnostics, so exact duplicates are dropped.
#[derive(Debug, Default)]
pub struct ProblemCollector {
    problems: Vec<Problem>,
}

impl ProblemCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn has_syntax_error(&self) -> bool {
        self.problems.iter().any(Problem::is_syntax_error)
    }

    pub fn clear(&mut self) {
        self.problems.clear();
    }
}

impl DiagnosticSink for ProblemCollector {
    fn report(&mut self, problem: Problem) {
        if self.problems.last() == Some(&problem) {
            return;
        }
        if self.problems.contains(&problem) {
            return;
        }
        self.problems.push(problem);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_drops_duplicates() {
        let mut collector = ProblemCollector::new();
        let p = Problem::new(
            ProblemKind::UnexpectedEof { expected: vec!["}".into()] },
            Span::new(10, 10),
        );
        collector.report(p.clone());
        collector.report(p);
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_version_gated_is_not_syntax_error() {
        let p = Problem::new(ProblemKind::DiamondBelowSource { required: 7 }, Span::new(0, 2));
        assert!(!p.is_syntax_error());
        let p = Problem::new(
            ProblemKind::ParseError { expected: vec![";".into()], found: "}".into() },
            Span::new(0, 1),
        );
        assert!(p.is_syntax_error());
    }
}
