//! LALR(1) table construction.
//!
//! States are LR(1) item sets merged by LR(0) core: whenever a transition
//! reaches an existing core with new lookaheads, the lookaheads are unioned
//! and the state is requeued until the whole automaton reaches a fixpoint.
//! Terminal lookahead sets are `u128` bitsets indexed by terminal
//! discriminant, which covers the whole terminal alphabet.
//!
//! Conflicts are resolved the conventional way for this grammar family:
//! shift wins over reduce (which gives `else` its innermost `if`), and the
//! lower-numbered rule wins a reduce/reduce tie. Every resolved conflict is
//! logged at debug level so grammar changes that introduce new ones are
//! visible.

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::parser::grammar::{Grammar, NonTerm, Sym};
use crate::parser::lexer::Term;

/// One cell of the action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Error,
    Shift(u16),
    Reduce(u16),
    Accept,
}

/// Dense tables produced by the generator, before packing.
pub struct RawTables {
    pub state_count: usize,
    /// `state_count * Term::COUNT` cells, row-major.
    pub actions: Vec<Action>,
    /// `state_count * NonTerm::COUNT` cells; `NO_GOTO` marks absence.
    pub gotos: Vec<u16>,
}

pub const NO_GOTO: u16 = u16::MAX;

/// An LR item: rule index and dot position. The synthetic start production
/// uses rule index `grammar.rules.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Item {
    rule: u16,
    dot: u8,
}

type TermSet = u128;

fn term_bit(t: Term) -> TermSet {
    1u128 << t.index()
}

struct Generator<'g> {
    grammar: &'g Grammar,
    start_rule: u16,
    nullable: Vec<bool>,
    first: Vec<TermSet>,
    /// Kernel cores, interned.
    kernels: Vec<Vec<Item>>,
    /// Per-state lookahead bitsets, parallel to the kernel items.
    lookaheads: Vec<Vec<TermSet>>,
    state_of_kernel: HashMap<Vec<Item>, usize>,
}

impl<'g> Generator<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        let mut gen = Generator {
            grammar,
            start_rule: grammar.rules.len() as u16,
            nullable: vec![false; NonTerm::COUNT],
            first: vec![0; NonTerm::COUNT],
            kernels: Vec::new(),
            lookaheads: Vec::new(),
            state_of_kernel: HashMap::new(),
        };
        gen.compute_first();
        gen
    }

    fn rule_rhs(&self, rule: u16) -> &[Sym] {
        if rule == self.start_rule {
            const START_RHS: [Sym; 1] = [Sym::N(NonTerm::Goal)];
            &START_RHS
        } else {
            &self.grammar.rules[rule as usize].rhs
        }
    }

    fn compute_first(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for rule in &self.grammar.rules {
                let lhs = rule.lhs.index();
                let mut all_nullable = true;
                let mut add: TermSet = 0;
                for sym in &rule.rhs {
                    match *sym {
                        Sym::T(t) => {
                            add |= term_bit(t);
                            all_nullable = false;
                        }
                        Sym::N(n) => {
                            add |= self.first[n.index()];
                            if !self.nullable[n.index()] {
                                all_nullable = false;
                            }
                        }
                    }
                    if !all_nullable {
                        break;
                    }
                }
                let old = self.first[lhs];
                let new = old | add;
                if new != old {
                    self.first[lhs] = new;
                    changed = true;
                }
                if all_nullable && !self.nullable[lhs] {
                    self.nullable[lhs] = true;
                    changed = true;
                }
            }
        }
    }

    /// FIRST of a symbol suffix followed by a lookahead set.
    fn first_of(&self, syms: &[Sym], follow: TermSet) -> TermSet {
        let mut out: TermSet = 0;
        for sym in syms {
            match *sym {
                Sym::T(t) => return out | term_bit(t),
                Sym::N(n) => {
                    out |= self.first[n.index()];
                    if !self.nullable[n.index()] {
                        return out;
                    }
                }
            }
        }
        out | follow
    }

    /// LR(1) closure of a kernel. Returns every item with its lookahead set;
    /// derived items all carry dot zero.
    fn closure(&self, kernel: &[Item], kernel_las: &[TermSet]) -> Vec<(Item, TermSet)> {
        let mut derived: HashMap<u16, TermSet> = HashMap::new();
        let mut queue: VecDeque<(Item, TermSet)> = kernel
            .iter()
            .copied()
            .zip(kernel_las.iter().copied())
            .collect();

        while let Some((item, la)) = queue.pop_front() {
            let rhs = self.rule_rhs(item.rule);
            let dot = item.dot as usize;
            if dot >= rhs.len() {
                continue;
            }
            let next = rhs[dot];
            if let Sym::N(nt) = next {
                let follow = self.first_of(&rhs[dot + 1..], la);
                for &sub in self.grammar.rules_for(nt) {
                    let entry = derived.entry(sub).or_insert(0);
                    let added = follow & !*entry;
                    if added != 0 {
                        *entry |= added;
                        queue.push_back((Item { rule: sub, dot: 0 }, added));
                    }
                }
            }
        }

        let mut out: Vec<(Item, TermSet)> = kernel
            .iter()
            .copied()
            .zip(kernel_las.iter().copied())
            .collect();
        let mut rules: Vec<u16> = derived.keys().copied().collect();
        rules.sort_unstable();
        for rule in rules {
            out.push((Item { rule, dot: 0 }, derived[&rule]));
        }
        out
    }

    /// Intern a kernel, unioning lookaheads into an existing core.
    /// Returns `(state, lookaheads_changed)`.
    fn intern(&mut self, kernel: Vec<Item>, las: Vec<TermSet>) -> (usize, bool) {
        if let Some(&state) = self.state_of_kernel.get(&kernel) {
            let mut changed = false;
            for (slot, la) in self.lookaheads[state].iter_mut().zip(las) {
                let new = *slot | la;
                if new != *slot {
                    *slot = new;
                    changed = true;
                }
            }
            (state, changed)
        } else {
            let state = self.kernels.len();
            self.state_of_kernel.insert(kernel.clone(), state);
            self.kernels.push(kernel);
            self.lookaheads.push(las);
            (state, true)
        }
    }

    /// Transitions out of one state's closure, grouped by symbol with
    /// deterministic ordering.
    fn transitions(&self, closed: &[(Item, TermSet)]) -> Vec<(Sym, Vec<Item>, Vec<TermSet>)> {
        let mut by_sym: HashMap<Sym, Vec<(Item, TermSet)>> = HashMap::new();
        for &(item, la) in closed {
            let rhs = self.rule_rhs(item.rule);
            let dot = item.dot as usize;
            if dot < rhs.len() {
                by_sym
                    .entry(rhs[dot])
                    .or_default()
                    .push((Item { rule: item.rule, dot: item.dot + 1 }, la));
            }
        }
        let mut out: Vec<(Sym, Vec<Item>, Vec<TermSet>)> = Vec::with_capacity(by_sym.len());
        for (sym, mut items) in by_sym {
            items.sort_unstable_by_key(|(item, _)| *item);
            let (kernel, las): (Vec<Item>, Vec<TermSet>) = items.into_iter().unzip();
            out.push((sym, kernel, las));
        }
        out.sort_unstable_by_key(|(sym, _, _)| match *sym {
            Sym::T(t) => (0u8, t.index()),
            Sym::N(n) => (1u8, n.index()),
        });
        out
    }

    fn run(mut self) -> RawTables {
        let start_kernel = vec![Item { rule: self.start_rule, dot: 0 }];
        let start_las = vec![term_bit(Term::Eof)];
        self.intern(start_kernel, start_las);

        // Fixpoint over states whose lookaheads grew.
        let mut queue: VecDeque<usize> = VecDeque::from([0]);
        let mut queued = vec![true];
        while let Some(state) = queue.pop_front() {
            queued[state] = false;
            let closed = self.closure(&self.kernels[state], &self.lookaheads[state]);
            for (_, kernel, las) in self.transitions(&closed) {
                let (target, changed) = self.intern(kernel, las);
                if queued.len() <= target {
                    queued.resize(target + 1, false);
                }
                if changed && !queued[target] {
                    queued[target] = true;
                    queue.push_back(target);
                }
            }
        }

        self.emit()
    }

    fn emit(&self) -> RawTables {
        let state_count = self.kernels.len();
        let mut actions = vec![Action::Error; state_count * Term::COUNT];
        let mut gotos = vec![NO_GOTO; state_count * NonTerm::COUNT];

        for state in 0..state_count {
            let closed = self.closure(&self.kernels[state], &self.lookaheads[state]);
            let row = state * Term::COUNT;

            for (sym, kernel, las) in self.transitions(&closed) {
                let target = self.state_of_kernel[&kernel];
                debug_assert!(las.len() == kernel.len());
                match sym {
                    Sym::T(t) => {
                        set_action(&mut actions, row + t.index(), Action::Shift(target as u16), state, t);
                    }
                    Sym::N(n) => {
                        gotos[state * NonTerm::COUNT + n.index()] = target as u16;
                    }
                }
            }

            for &(item, la) in &closed {
                let rhs = self.rule_rhs(item.rule);
                if (item.dot as usize) < rhs.len() {
                    continue;
                }
                for idx in 0..Term::COUNT {
                    if la & (1u128 << idx) == 0 {
                        continue;
                    }
                    let term = Term::from_index(idx);
                    let incoming = if item.rule == self.start_rule {
                        Action::Accept
                    } else {
                        Action::Reduce(item.rule)
                    };
                    set_action(&mut actions, row + idx, incoming, state, term);
                }
            }
        }

        RawTables { state_count, actions, gotos }
    }
}

/// Write a cell, resolving conflicts: shift beats reduce, lower rule beats
/// higher rule, accept is never displaced.
fn set_action(actions: &mut [Action], cell: usize, incoming: Action, state: usize, term: Term) {
    let current = actions[cell];
    let resolved = match (current, incoming) {
        (Action::Error, new) => new,
        (Action::Accept, _) | (_, Action::Accept) => Action::Accept,
        (Action::Shift(s), Action::Reduce(r)) => {
            log::debug!(
                "shift/reduce on {:?} in state {}: shifting over rule {}",
                term,
                state,
                r
            );
            Action::Shift(s)
        }
        (Action::Reduce(r), Action::Shift(s)) => {
            log::debug!(
                "shift/reduce on {:?} in state {}: shifting over rule {}",
                term,
                state,
                r
            );
            Action::Shift(s)
        }
        (Action::Reduce(a), Action::Reduce(b)) => {
            if a != b {
                log::debug!(
                    "reduce/reduce on {:?} in state {}: rule {} over rule {}",
                    term,
                    state,
                    a.min(b),
                    a.max(b)
                );
            }
            Action::Reduce(a.min(b))
        }
        (Action::Shift(a), Action::Shift(b)) => {
            debug_assert_eq!(a, b);
            Action::Shift(a)
        }
        // An incoming non-action never displaces a real one.
        (current @ (Action::Shift(_) | Action::Reduce(_)), Action::Error) => current,
    };
    actions[cell] = resolved;
}

/// Generate the LALR(1) tables for a grammar.
pub fn generate(grammar: &Grammar) -> RawTables {
    Generator::new(grammar).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar::build_grammar;

    #[test]
    fn test_generator_converges() {
        let grammar = build_grammar();
        let tables = generate(&grammar);
        assert!(tables.state_count > 100);
        assert_eq!(tables.actions.len(), tables.state_count * Term::COUNT);
        assert_eq!(tables.gotos.len(), tables.state_count * NonTerm::COUNT);
    }

    #[test]
    fn test_goal_selectors_shift_from_start() {
        let grammar = build_grammar();
        let tables = generate(&grammar);
        for selector in [
            Term::GoalCompilationUnit,
            Term::GoalClassBodyDeclarations,
            Term::GoalBlockStatements,
            Term::GoalExpression,
            Term::GoalHeaders,
            Term::Arrow,
        ] {
            match tables.actions[selector.index()] {
                Action::Shift(_) => {}
                other => panic!("selector {:?} does not shift from state 0: {:?}", selector, other),
            }
        }
    }

    #[test]
    fn test_no_action_on_trivia_sentinel() {
        let grammar = build_grammar();
        let tables = generate(&grammar);
        for state in 0..tables.state_count {
            let cell = tables.actions[state * Term::COUNT + Term::ErrorSentinel.index()];
            assert_eq!(cell, Action::Error);
        }
    }
}
