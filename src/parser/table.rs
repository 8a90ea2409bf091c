// This module defines the LR table oracle consumed by the parsing engine and an SLR(1)
// builder that produces one from a Grammar. The engine only sees the LrTable trait: a start
// state, action(state, token) -> Shift/Reduce/Accept/Error, goto(state, nonterminal) and
// production lookup by index. ParseTable is the concrete implementation. It is built the
// classical way: canonical LR(0) item sets reached from the closure of the augmented start
// item, FIRST/FOLLOW sets computed to a fixpoint, shifts on terminal transitions, reductions
// on FOLLOW of the production head and accept on end-of-input for the augmented item. Any
// cell that would receive two different actions is reported as a TableConflict instead of
// being resolved silently.

//! LR table oracle and SLR(1) table construction.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::grammar::{Grammar, NonTerminal, Production, Term};
use crate::core::{CompileError, CompileResult};
use crate::lexer::{Token, TokenKind};

/// LR automaton state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Status(pub usize);

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Table entry for a (state, lookahead) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(Status),
    /// Reduce by the production with this index.
    Reduce(usize),
    Accept,
    Error,
}

/// Grammar specific LR automaton, treated as an opaque oracle by the parser.
pub trait LrTable {
    /// Initial state of the automaton.
    fn start(&self) -> Status;

    /// Action for `status` with `token` as lookahead.
    fn action(&self, status: Status, token: &Token) -> Action;

    /// Successor state after reducing to `head` on top of `status`.
    fn goto(&self, status: Status, head: NonTerminal) -> Option<Status>;

    /// Production referenced by [`Action::Reduce`].
    fn production(&self, index: usize) -> Option<&Production>;
}

/// LR(0) item: production index and dot position.
type Item = (usize, usize);
type ItemSet = BTreeSet<Item>;
type ActionRows = Vec<HashMap<TokenKind, Action>>;
type GotoRows = Vec<HashMap<NonTerminal, Status>>;

/// Table built from a [`Grammar`].
#[derive(Debug, Clone)]
pub struct ParseTable {
    grammar: Grammar,
    actions: ActionRows,
    gotos: GotoRows,
}

impl ParseTable {
    /// Build an SLR(1) table, failing on the first conflicting cell.
    pub fn build(grammar: Grammar) -> CompileResult<Self> {
        let builder = SlrBuilder::new(&grammar);
        let (actions, gotos) = builder.build()?;
        log::debug!("Built SLR table with {} states", actions.len());
        Ok(Self {
            grammar,
            actions,
            gotos,
        })
    }

    /// Table for the toy language grammar.
    pub fn toy() -> CompileResult<Self> {
        Self::build(Grammar::toy())
    }

    pub fn state_count(&self) -> usize {
        self.actions.len()
    }
}

impl LrTable for ParseTable {
    fn start(&self) -> Status {
        Status(0)
    }

    fn action(&self, status: Status, token: &Token) -> Action {
        self.actions
            .get(status.0)
            .and_then(|row| row.get(&token.kind()))
            .copied()
            .unwrap_or(Action::Error)
    }

    fn goto(&self, status: Status, head: NonTerminal) -> Option<Status> {
        self.gotos.get(status.0).and_then(|row| row.get(&head)).copied()
    }

    fn production(&self, index: usize) -> Option<&Production> {
        self.grammar.production(index)
    }
}

struct SlrBuilder<'g> {
    grammar: &'g Grammar,
    nullable: BTreeSet<NonTerminal>,
    first: HashMap<NonTerminal, BTreeSet<TokenKind>>,
    follow: HashMap<NonTerminal, BTreeSet<TokenKind>>,
}

impl<'g> SlrBuilder<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        let mut builder = Self {
            grammar,
            nullable: BTreeSet::new(),
            first: HashMap::new(),
            follow: HashMap::new(),
        };
        builder.compute_first();
        builder.compute_follow();
        builder
    }

    fn compute_first(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for production in self.grammar.productions() {
                let head = production.head();
                let (first, nullable) = self.first_of(production.body());
                let entry = self.first.entry(head).or_default();
                let before = entry.len();
                entry.extend(first);
                changed |= entry.len() != before;
                if nullable && self.nullable.insert(head) {
                    changed = true;
                }
            }
        }
    }

    /// FIRST of a symbol sequence, and whether the whole sequence is nullable.
    fn first_of(&self, terms: &[Term]) -> (BTreeSet<TokenKind>, bool) {
        let mut result = BTreeSet::new();
        for term in terms {
            match *term {
                Term::Terminal(kind) => {
                    result.insert(kind);
                    return (result, false);
                }
                Term::NonTerminal(nt) => {
                    if let Some(first) = self.first.get(&nt) {
                        result.extend(first.iter().copied());
                    }
                    if !self.nullable.contains(&nt) {
                        return (result, false);
                    }
                }
            }
        }
        (result, true)
    }

    fn compute_follow(&mut self) {
        self.follow
            .entry(NonTerminal::Start)
            .or_default()
            .insert(TokenKind::Eof);

        let mut changed = true;
        while changed {
            changed = false;
            for production in self.grammar.productions() {
                let body = production.body();
                for (pos, term) in body.iter().enumerate() {
                    let Term::NonTerminal(nt) = *term else {
                        continue;
                    };
                    let (mut additions, nullable) = self.first_of(&body[pos + 1..]);
                    if nullable {
                        if let Some(head_follow) = self.follow.get(&production.head()) {
                            additions.extend(head_follow.iter().copied());
                        }
                    }
                    let entry = self.follow.entry(nt).or_default();
                    let before = entry.len();
                    entry.extend(additions);
                    changed |= entry.len() != before;
                }
            }
        }
    }

    fn next_term(&self, (prod, dot): Item) -> Option<Term> {
        self.grammar
            .production(prod)
            .and_then(|p| p.body().get(dot))
            .copied()
    }

    fn closure(&self, mut set: ItemSet) -> ItemSet {
        let mut work: Vec<Item> = set.iter().copied().collect();
        while let Some(item) = work.pop() {
            let Some(Term::NonTerminal(nt)) = self.next_term(item) else {
                continue;
            };
            for production in self.grammar.productions() {
                if production.head() == nt && set.insert((production.index(), 0)) {
                    work.push((production.index(), 0));
                }
            }
        }
        set
    }

    fn transition(&self, set: &ItemSet, term: Term) -> ItemSet {
        let kernel = set
            .iter()
            .filter(|item| self.next_term(**item) == Some(term))
            .map(|&(prod, dot)| (prod, dot + 1))
            .collect();
        self.closure(kernel)
    }

    fn build(&self) -> CompileResult<(ActionRows, GotoRows)> {
        let symbols: Vec<Term> = self
            .grammar
            .terminals()
            .iter()
            .map(|&kind| Term::Terminal(kind))
            .chain(self.grammar.nonterminals().iter().map(|&nt| Term::NonTerminal(nt)))
            .collect();

        let mut states = vec![self.closure(ItemSet::from([(0, 0)]))];
        let mut index: HashMap<ItemSet, usize> = HashMap::from([(states[0].clone(), 0)]);
        let mut transitions: Vec<HashMap<Term, usize>> = Vec::new();

        let mut current = 0;
        while current < states.len() {
            let mut row = HashMap::new();
            for &term in &symbols {
                let target = self.transition(&states[current], term);
                if target.is_empty() {
                    continue;
                }
                let next = match index.get(&target) {
                    Some(&existing) => existing,
                    None => {
                        states.push(target.clone());
                        index.insert(target, states.len() - 1);
                        states.len() - 1
                    }
                };
                row.insert(term, next);
            }
            transitions.push(row);
            current += 1;
        }

        let mut actions = Vec::with_capacity(states.len());
        let mut gotos = Vec::with_capacity(states.len());
        for (status, set) in states.iter().enumerate() {
            let mut row: HashMap<TokenKind, Action> = HashMap::new();
            let mut goto_row = HashMap::new();

            for (&term, &next) in &transitions[status] {
                match term {
                    Term::Terminal(kind) => {
                        insert_action(&mut row, status, kind, Action::Shift(Status(next)))?
                    }
                    Term::NonTerminal(nt) => {
                        goto_row.insert(nt, Status(next));
                    }
                }
            }

            for &(prod, dot) in set {
                let Some(production) = self.grammar.production(prod) else {
                    continue;
                };
                if dot != production.body().len() {
                    continue;
                }
                if prod == 0 {
                    insert_action(&mut row, status, TokenKind::Eof, Action::Accept)?;
                    continue;
                }
                if let Some(follow) = self.follow.get(&production.head()) {
                    for &kind in follow {
                        insert_action(&mut row, status, kind, Action::Reduce(prod))?;
                    }
                }
            }

            actions.push(row);
            gotos.push(goto_row);
        }

        Ok((actions, gotos))
    }
}

fn insert_action(
    row: &mut HashMap<TokenKind, Action>,
    status: usize,
    kind: TokenKind,
    action: Action,
) -> CompileResult<()> {
    match row.get(&kind) {
        Some(existing) if *existing != action => Err(CompileError::TableConflict {
            status,
            terminal: kind.to_string(),
        }),
        _ => {
            row.insert(kind, action);
            Ok(())
        }
    }
}
