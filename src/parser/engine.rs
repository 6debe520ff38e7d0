//! The table-driven shift/reduce driver.
//!
//! One automaton serves every entry point: the goal is selected by feeding a
//! selector pseudo-token as the very first symbol. The driver owns the state
//! stack and a parallel span stack (a shift pushes the token's span, a reduce
//! replaces the popped spans with their cover), so every value a reduce action
//! builds can be positioned without consulting the scanner again.
//!
//! Single-lookahead ambiguities never reach the tables. The driver rewrites
//! the token stream on the fly:
//!
//! * `<` becomes the type-argument opener when the automaton could shift it
//!   as one and a bounded forward scan finds a type-shaped `<...>`;
//! * `>>`, `>>>`, `>=` and friends are split when a generic type argument
//!   list needs the leading `>` back;
//! * `(` grows a lambda marker in front of it when the parenthesized region
//!   is a valid parameter list followed by `->`, decided by running a
//!   states-only copy of the automaton over the region;
//! * `@` turns into the type-annotation marker where a declaration
//!   annotation cannot be shifted.

use crate::ast::CompilationUnit;
use crate::error::{Error, Result};
use crate::parser::actions::{self, ActionCtx};
use crate::parser::diagnostics::{DiagnosticSink, Problem, ProblemCollector, SourceLevel};
use crate::parser::grammar::{Grammar, NonTerm, RuleAction};
use crate::parser::lalr::Action;
use crate::parser::lexer::{Scanned, Term, TokenSource};
use crate::parser::recovery::{self, Recovery};
use crate::parser::span::Span;
use crate::parser::stacks::ValueStacks;
use crate::parser::tables::{self, ParserTables, GRAMMAR, TABLES};

/// Hard cap on tokens examined by one speculative scan.
const SCAN_LIMIT: usize = 2048;
/// Hard cap on tokens collected for one lambda-parameter probe.
const PROBE_LIMIT: usize = 512;

pub(crate) struct Automaton<'a> {
    tables: &'static ParserTables,
    grammar: &'static Grammar,
    pub src: TokenSource<'a>,
    states: Vec<u16>,
    spans: Vec<Span>,
    pub stacks: ValueStacks,
    pub problems: ProblemCollector,
    pub level: SourceLevel,
    goal: Term,
    /// Set after a header reduce; the next `{` shifted while set is skipped
    /// in diet mode.
    diet_armed: bool,
    /// Set at a boundary reduce; the checkpoint is committed at the next
    /// shift, once the whole reduce cascade for the lookahead has run and
    /// the value stacks agree with the state stack again.
    pending_checkpoint: bool,
    pending_body_range: Option<Span>,
    pub unit: Option<CompilationUnit>,
    pub recovery: Recovery,
    pub recovered: bool,
}

impl<'a> Automaton<'a> {
    pub fn new(source: &'a str, goal: Term, level: SourceLevel, diet: bool) -> Self {
        let mut src = TokenSource::new(source);
        src.diet = diet;
        Automaton {
            tables: &TABLES,
            grammar: &GRAMMAR,
            src,
            states: Vec::with_capacity(64),
            spans: Vec::with_capacity(64),
            stacks: ValueStacks::new(),
            problems: ProblemCollector::new(),
            level,
            goal,
            diet_armed: false,
            pending_checkpoint: false,
            pending_body_range: None,
            unit: None,
            recovery: Recovery::new(),
            recovered: false,
        }
    }

    /// Re-scope the token source; used for lazy body re-parses.
    pub fn rescope(&mut self, start: u32, end: u32) {
        self.src.rescope(start, end);
    }

    /// Drive the automaton from the goal selector to accept or abandonment.
    pub fn run(&mut self) -> Result<()> {
        self.states.clear();
        self.states.push(0);
        self.spans.clear();

        // The selector must shift from the start state; anything else means
        // the tables and the goal set drifted apart.
        let selector = Scanned::new(self.goal, Span::at(0));
        match self.tables.action(0, self.goal) {
            Action::Shift(target) => {
                self.states.push(target);
                self.spans.push(selector.span);
            }
            _ => return Err(Error::internal(format!("goal {:?} not shiftable", self.goal))),
        }
        self.recovery.checkpoint(&self.states, &self.spans, &self.stacks);

        let mut current = self.advance();
        loop {
            let state = self.top_state();
            match self.tables.action(state, current.term) {
                Action::Shift(target) => {
                    if self.pending_checkpoint {
                        self.recovery.checkpoint(&self.states, &self.spans, &self.stacks);
                        self.pending_checkpoint = false;
                    }
                    self.consume(current);
                    self.states.push(target);
                    self.spans.push(current.span);
                    if current.term == Term::LBrace && self.src.diet && self.diet_armed {
                        self.pending_body_range = Some(self.src.jump_over_body());
                    }
                    // `static` re-arms so static initializer bodies are
                    // skipped in diet mode too.
                    self.diet_armed = current.term == Term::Static;
                    current = self.advance();
                }
                Action::Reduce(rule) => {
                    self.reduce(rule)?;
                }
                Action::Accept => {
                    self.drain_lex_problems();
                    return Ok(());
                }
                Action::Error => {
                    self.drain_lex_problems();
                    match self.recover(current)? {
                        Some(resumed) => current = resumed,
                        None => {
                            // Abandoned: keep whatever structure was built.
                            self.recovered = true;
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    fn top_state(&self) -> u16 {
        *self.states.last().unwrap_or(&0)
    }

    fn drain_lex_problems(&mut self) {
        for problem in self.src.take_problems() {
            self.problems.report(problem);
        }
    }

    /// Perform one reduce: run the semantic action over the popped spans,
    /// then take the goto transition.
    fn reduce(&mut self, rule: u16) -> Result<()> {
        let len = self.tables.rule_len(rule);
        if self.states.len() <= len || self.spans.len() < len {
            return Err(Error::internal("state stack underflow on reduce"));
        }
        let spans_at = self.spans.len() - len;
        // Empty rhs spans (matched-nothing optionals) would otherwise drag
        // the cover back over preceding trivia, so they don't count.
        let rhs = &self.spans[spans_at..];
        let first = rhs.iter().find(|s| !s.is_empty());
        let last = rhs.iter().rev().find(|s| !s.is_empty());
        let cover = match (first, last) {
            (Some(first), Some(last)) => first.cover(*last),
            // Nothing real matched: the production sits just after the
            // previous symbol.
            _ => {
                let anchor = if spans_at == 0 { 0 } else { self.spans[spans_at - 1].end };
                Span::at(anchor)
            }
        };

        let action = self.grammar.rules[rule as usize].action;
        {
            let ctx = ActionCtx {
                stacks: &mut self.stacks,
                rhs_spans: &self.spans[spans_at..],
                span: cover,
                problems: &mut self.problems,
                pending_body_range: &mut self.pending_body_range,
                unit_out: &mut self.unit,
            };
            actions::execute(action, ctx)?;
        }

        let lhs = self.tables.rule_lhs(rule);
        let min_level = self.tables.rule_min_level(rule);
        if min_level != 0 && !self.level.supports(min_level) {
            let construct = tables::symbol_display_name(lhs);
            let kind = actions::version_problem(action, construct, min_level);
            self.problems.report(Problem::new(kind, cover));
        }

        if matches!(action, RuleAction::MethodHeader { .. }) || lhs == NonTerm::ThrowsOpt {
            self.diet_armed = true;
        }

        self.states.truncate(self.states.len() - len);
        self.spans.truncate(spans_at);
        let Some(target) = self.tables.goto(self.top_state(), lhs) else {
            return Err(Error::internal(format!("missing goto for {:?}", lhs)));
        };
        self.states.push(target);
        self.spans.push(cover);

        if recovery::is_boundary(lhs) {
            self.pending_checkpoint = true;
        }
        Ok(())
    }

    /// Stack side effects of shifting one terminal.
    fn consume(&mut self, scanned: Scanned) {
        match scanned.term {
            Term::Identifier => {
                let text = self.src.text(scanned.span).to_string();
                self.stacks.idents.push(text, scanned.span);
            }
            Term::IntLiteral
            | Term::LongLiteral
            | Term::FloatLiteral
            | Term::DoubleLiteral
            | Term::CharLiteral
            | Term::StringLiteral
            | Term::True
            | Term::False
            | Term::Null => {
                let text = self.src.text(scanned.span);
                let expr = actions::literal_expr(scanned.term, text, scanned.span);
                if let Some(kind) = actions::literal_problem(scanned.term, text, self.level) {
                    self.problems.report(Problem::new(kind, scanned.span));
                }
                self.stacks.exprs.push_one(expr);
            }
            _ => {}
        }
    }

    // ---- error recovery -------------------------------------------------

    /// Report the failure, rewind to the last committed boundary and skip
    /// forward to a plausible restart token. `None` abandons the parse.
    fn recover(&mut self, current: Scanned) -> Result<Option<Scanned>> {
        self.recovered = true;
        let expected = self.tables.expected_terms(self.top_state());
        let problem = recovery::diagnose(current, &expected, &self.src);
        self.problems.report(problem);

        // Cheapest repair first: when splicing in one mandatory terminal lets
        // the stream continue, the surrounding declarations stay intact. A
        // successful splice guarantees the failing token is consumed next (or
        // the parse accepts), so this cannot loop.
        if let Some(spliced) = self.try_splice(current) {
            self.src.unget(current);
            return Ok(Some(spliced));
        }

        if current.term == Term::Eof {
            self.recovery.eof_hit();
            if self.recovery.abandoned() {
                return Ok(None);
            }
        }

        let Some(checkpoint) = self.recovery.last_checkpoint().cloned() else {
            return Ok(None);
        };
        self.states.clear();
        self.states.extend_from_slice(&checkpoint.states);
        self.spans.clear();
        self.spans.extend_from_slice(&checkpoint.spans);
        self.stacks.unwind(&checkpoint.mark);

        // Skip tokens until one both opens a statement or member and is
        // actually shiftable from the restored stack. The erroring token is
        // always part of the skipped region, which guarantees progress.
        let skip_start = current.span.start;
        let mut first_skipped = current.term;
        let mut skipped_any = false;
        let mut candidate = current;
        for _ in 0..SCAN_LIMIT * 8 {
            if candidate.term == Term::Eof {
                self.recovery.eof_hit();
                if self.recovery.abandoned() {
                    self.recovery
                        .record_skip(first_skipped, Span::new(skip_start, candidate.span.start));
                    return Ok(None);
                }
                return Ok(Some(candidate));
            }
            let acceptable = candidate.term == Term::RBrace
                || crate::parser::tables::starts_statement_or_member(candidate.term);
            if skipped_any && acceptable && self.can_shift(candidate.term) {
                self.recovery
                    .record_skip(first_skipped, Span::new(skip_start, candidate.span.start));
                return Ok(Some(candidate));
            }
            if !skipped_any {
                first_skipped = candidate.term;
            }
            skipped_any = true;
            candidate = self.advance();
        }
        Ok(None)
    }

    /// Pick a terminal whose insertion at the failure point makes the failing
    /// token shiftable again. Closers and the statement terminator are always
    /// candidates; a placeholder identifier is spliced only in front of `{`,
    /// which is where a declaration is missing its name.
    fn try_splice(&self, current: Scanned) -> Option<Scanned> {
        let mut candidates = vec![Term::Semicolon, Term::RParen, Term::RBrace];
        if current.term == Term::LBrace {
            candidates.push(Term::Identifier);
        }
        for candidate in candidates {
            let Some(stack) = shift_virtually(self.tables, &self.states, candidate) else {
                continue;
            };
            if can_shift_from(self.tables, &stack, current.term) {
                // Empty span: the spliced terminal has no source text.
                return Some(Scanned::new(candidate, Span::at(current.span.start)));
            }
        }
        None
    }

    // ---- token normalization --------------------------------------------

    /// Next token, with stream rewriting applied.
    fn advance(&mut self) -> Scanned {
        let scanned = self.src.next();
        match scanned.term {
            Term::Lt => self.disambiguate_lt(scanned),
            Term::At => self.disambiguate_at(scanned),
            Term::LParen => self.disambiguate_lparen(scanned),
            Term::Default => self.disambiguate_default(scanned),
            Term::RShift | Term::URShift | Term::Ge | Term::RShiftAssign | Term::URShiftAssign => {
                self.maybe_split_gt(scanned)
            }
            _ => scanned,
        }
    }

    /// Whether `term` could eventually be shifted from the live stack.
    fn can_shift(&self, term: Term) -> bool {
        can_shift_from(self.tables, &self.states, term)
    }

    fn disambiguate_lt(&mut self, scanned: Scanned) -> Scanned {
        let as_type_arg = self.can_shift(Term::TypeArgLt);
        if !as_type_arg {
            return scanned;
        }
        if self.can_shift(Term::Lt) && !self.scan_type_shaped() {
            return scanned;
        }
        Scanned::new(Term::TypeArgLt, scanned.span)
    }

    /// Bounded forward scan deciding whether the `<` just read opens a
    /// type-shaped argument list. Runs on a clone of the token source, so
    /// the real stream is untouched.
    fn scan_type_shaped(&self) -> bool {
        let mut probe = self.src.clone();
        let mut depth: i32 = 1;
        for _ in 0..SCAN_LIMIT {
            let scanned = probe.next();
            match scanned.term {
                Term::Lt | Term::TypeArgLt => depth += 1,
                Term::Gt => depth -= 1,
                Term::RShift => depth -= 2,
                Term::URShift => depth -= 3,
                Term::Identifier
                | Term::Dot
                | Term::Comma
                | Term::Question
                | Term::Extends
                | Term::Super
                | Term::Amp
                | Term::At
                | Term::LBracket
                | Term::RBracket => {}
                t if t.is_primitive() => {}
                _ => return false,
            }
            if depth <= 0 {
                let follower = probe.next();
                return matches!(
                    follower.term,
                    Term::Identifier
                        | Term::LParen
                        | Term::RParen
                        | Term::Dot
                        | Term::ColonColon
                        | Term::LBracket
                );
            }
        }
        false
    }

    fn disambiguate_at(&mut self, scanned: Scanned) -> Scanned {
        let peeked = self.src.next();
        self.src.unget(peeked);
        if peeked.term == Term::Interface {
            return scanned;
        }
        if !self.can_shift(Term::At) && self.can_shift(Term::AtType) {
            return Scanned::new(Term::AtType, scanned.span);
        }
        scanned
    }

    /// `default` is a switch label only when `:` follows; everywhere else it
    /// is the interface-method modifier / annotation-element keyword. Keeping
    /// the two uses on separate terminals keeps the switch-group productions
    /// free of a shift/reduce collision with local-declaration modifiers.
    fn disambiguate_default(&mut self, scanned: Scanned) -> Scanned {
        let peeked = self.src.next();
        self.src.unget(peeked);
        if peeked.term == Term::Colon {
            return scanned;
        }
        Scanned::new(Term::DefaultModifier, scanned.span)
    }

    /// Decide whether this `(` opens a lambda parameter list. On success the
    /// marker terminal is delivered and the `(` is pushed back.
    fn disambiguate_lparen(&mut self, scanned: Scanned) -> Scanned {
        if !self.can_shift(Term::BeginLambda) {
            return scanned;
        }
        if self.probe_lambda_params() {
            self.src.unget(scanned);
            return Scanned::new(Term::BeginLambda, Span::at(scanned.span.start));
        }
        scanned
    }

    /// Collect the parenthesized region on a cloned stream, require `->`
    /// right after it, and run the states-only automaton over the region
    /// under the probe goal.
    fn probe_lambda_params(&mut self) -> bool {
        let mut probe_src = self.src.clone();
        let mut region = vec![Term::LParen];
        let mut depth = 1usize;
        for _ in 0..PROBE_LIMIT {
            let scanned = probe_src.next();
            match scanned.term {
                Term::LParen => depth += 1,
                Term::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        region.push(Term::RParen);
                        let follower = probe_src.next();
                        if follower.term != Term::Arrow {
                            return false;
                        }
                        return probe_accepts(self.tables, &region);
                    }
                }
                Term::Semicolon | Term::LBrace | Term::RBrace | Term::Eof => return false,
                _ => {}
            }
            if depth > 0 {
                region.push(scanned.term);
            }
        }
        false
    }

    /// Split a compound `>...` operator when only a lone `>` is shiftable,
    /// pushing the remainder back with a narrowed span.
    fn maybe_split_gt(&mut self, scanned: Scanned) -> Scanned {
        if self.can_shift(scanned.term) || !self.can_shift(Term::Gt) {
            return scanned;
        }
        let remainder = match scanned.term {
            Term::RShift => Term::Gt,
            Term::URShift => Term::RShift,
            Term::Ge => Term::Assign,
            Term::RShiftAssign => Term::Ge,
            Term::URShiftAssign => Term::RShiftAssign,
            _ => return scanned,
        };
        let split = scanned.span.start + 1;
        self.src
            .unget(Scanned::new(remainder, Span::new(split, scanned.span.end)));
        Scanned::new(Term::Gt, Span::new(scanned.span.start, split))
    }
}

/// Replay reduces on a states copy until `term` shifts, returning the stack
/// after that shift. `None` when the shift is unreachable.
pub(crate) fn shift_virtually(
    tables: &ParserTables,
    states: &[u16],
    term: Term,
) -> Option<Vec<u16>> {
    let mut stack: Vec<u16> = states.to_vec();
    loop {
        let &state = stack.last()?;
        match tables.action(state, term) {
            Action::Shift(target) => {
                stack.push(target);
                return Some(stack);
            }
            Action::Accept | Action::Error => return None,
            Action::Reduce(rule) => {
                let len = tables.rule_len(rule);
                if stack.len() <= len {
                    return None;
                }
                stack.truncate(stack.len() - len);
                let &state = stack.last()?;
                let target = tables.goto(state, tables.rule_lhs(rule))?;
                stack.push(target);
            }
        }
    }
}

/// Run reduces virtually on a copy of the stack top to decide whether `term`
/// could be shifted. States only; no values move.
pub(crate) fn can_shift_from(tables: &ParserTables, states: &[u16], term: Term) -> bool {
    let mut stack: Vec<u16> = states.to_vec();
    loop {
        let Some(&state) = stack.last() else { return false };
        match tables.action(state, term) {
            Action::Shift(_) | Action::Accept => return true,
            Action::Error => return false,
            Action::Reduce(rule) => {
                let len = tables.rule_len(rule);
                if stack.len() <= len {
                    return false;
                }
                stack.truncate(stack.len() - len);
                let Some(&state) = stack.last() else { return false };
                let Some(target) = tables.goto(state, tables.rule_lhs(rule)) else {
                    return false;
                };
                stack.push(target);
            }
        }
    }
}

/// Feed a terminal sequence to a fresh states-only automaton under the lambda
/// probe goal; true when the sequence (plus end-of-input) is accepted.
///
/// The region was scanned raw, so the same `<`/`>>` rewrites the main driver
/// performs are applied here against the probe's own stack.
fn probe_accepts(tables: &ParserTables, region: &[Term]) -> bool {
    let mut stack: Vec<u16> = vec![0];
    let mut input: Vec<Term> = Vec::with_capacity(region.len() + 2);
    input.push(Term::Arrow);
    input.extend_from_slice(region);
    input.push(Term::Eof);

    let mut i = 0;
    while i < input.len() {
        let mut term = input[i];
        match term {
            Term::Lt if can_shift_from(tables, &stack, Term::TypeArgLt) => {
                term = Term::TypeArgLt;
            }
            Term::RShift | Term::URShift
                if !can_shift_from(tables, &stack, term)
                    && can_shift_from(tables, &stack, Term::Gt) =>
            {
                let remainder = if term == Term::RShift { Term::Gt } else { Term::RShift };
                input[i] = remainder;
                term = Term::Gt;
                i = i.wrapping_sub(1); // revisit the remainder
            }
            _ => {}
        }
        loop {
            let Some(&state) = stack.last() else { return false };
            match tables.action(state, term) {
                Action::Shift(target) => {
                    stack.push(target);
                    break;
                }
                Action::Accept => return true,
                Action::Error => return false,
                Action::Reduce(rule) => {
                    let len = tables.rule_len(rule);
                    if stack.len() <= len {
                        return false;
                    }
                    stack.truncate(stack.len() - len);
                    let Some(&state) = stack.last() else { return false };
                    let Some(target) = tables.goto(state, tables.rule_lhs(rule)) else {
                        return false;
                    };
                    stack.push(target);
                }
            }
        }
        i = i.wrapping_add(1);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(source: &str, goal: Term) -> Automaton<'_> {
        Automaton::new(source, goal, SourceLevel::JAVA_8, false)
    }

    #[test]
    fn test_expression_goal_accepts_simple_expression() {
        let mut automaton = engine("1 + 2 * 3", Term::GoalExpression);
        automaton.run().unwrap();
        assert!(!automaton.recovered);
        assert!(automaton.problems.is_empty());
        assert_eq!(automaton.stacks.exprs.list_count(), 1);
    }

    #[test]
    fn test_type_argument_disambiguation() {
        let mut automaton = engine("new java.util.ArrayList<String>()", Term::GoalExpression);
        automaton.run().unwrap();
        assert!(automaton.problems.is_empty(), "{:?}", automaton.problems.problems());
    }

    #[test]
    fn test_nested_generics_split_shift_operator() {
        let mut automaton = engine(
            "java.util.Map<String, java.util.List<Integer>> m = null;",
            Term::GoalBlockStatements,
        );
        automaton.run().unwrap();
        assert!(automaton.problems.is_empty(), "{:?}", automaton.problems.problems());
    }

    #[test]
    fn test_relational_less_than_stays_relational() {
        let mut automaton = engine("a < b", Term::GoalExpression);
        automaton.run().unwrap();
        assert!(automaton.problems.is_empty(), "{:?}", automaton.problems.problems());
    }

    #[test]
    fn test_lambda_probe_positive() {
        let mut automaton = engine("(a, b) -> a", Term::GoalExpression);
        automaton.run().unwrap();
        assert!(automaton.problems.is_empty(), "{:?}", automaton.problems.problems());
    }

    #[test]
    fn test_parenthesized_expression_not_a_lambda() {
        let mut automaton = engine("(a + b) * c", Term::GoalExpression);
        automaton.run().unwrap();
        assert!(automaton.problems.is_empty(), "{:?}", automaton.problems.problems());
    }
}
