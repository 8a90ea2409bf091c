//! Grammar model: terms, productions and the toy language grammar.
//!
//! Productions are immutable once the grammar is built. Index 0 is always the
//! augmented start production `P' -> P`; the parser never reduces it, it
//! accepts instead.

use std::fmt;

use crate::lexer::TokenKind;

/// Nonterminal symbols of the toy grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NonTerminal {
    /// Augmented start symbol.
    Start,
    Program,
    StmtList,
    Stmt,
    Decl,
    Expr,
    Term,
    Factor,
}

impl NonTerminal {
    pub fn name(self) -> &'static str {
        match self {
            NonTerminal::Start => "P'",
            NonTerminal::Program => "P",
            NonTerminal::StmtList => "S_list",
            NonTerminal::Stmt => "S",
            NonTerminal::Decl => "D",
            NonTerminal::Expr => "E",
            NonTerminal::Term => "A",
            NonTerminal::Factor => "B",
        }
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grammar symbol: a terminal token kind or a nonterminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Terminal(TokenKind),
    NonTerminal(NonTerminal),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Terminal(kind) => kind.fmt(f),
            Term::NonTerminal(nt) => nt.fmt(f),
        }
    }
}

impl From<TokenKind> for Term {
    fn from(kind: TokenKind) -> Self {
        Term::Terminal(kind)
    }
}

impl From<NonTerminal> for Term {
    fn from(nt: NonTerminal) -> Self {
        Term::NonTerminal(nt)
    }
}

/// `head -> body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    index: usize,
    head: NonTerminal,
    body: Vec<Term>,
}

impl Production {
    pub fn new(index: usize, head: NonTerminal, body: Vec<Term>) -> Self {
        Self { index, head, body }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn head(&self) -> NonTerminal {
        self.head
    }

    pub fn body(&self) -> &[Term] {
        &self.body
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.head)?;
        for term in &self.body {
            write!(f, " {term}")?;
        }
        Ok(())
    }
}

/// Named productions of the toy grammar, numbered by production index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// `P -> S_list`
    Program = 1,
    /// `S_list -> S ; S_list`
    StmtListMore = 2,
    /// `S_list -> S ;`
    StmtListLast = 3,
    /// `S -> D id`
    Declare = 4,
    /// `D -> int`
    TypeInt = 5,
    /// `S -> id = E`
    Assign = 6,
    /// `S -> return E`
    Return = 7,
    /// `E -> E + A`
    Add = 8,
    /// `E -> E - A`
    Sub = 9,
    /// `E -> A`
    ExprTerm = 10,
    /// `A -> A * B`
    Mul = 11,
    /// `A -> B`
    TermFactor = 12,
    /// `B -> ( E )`
    Paren = 13,
    /// `B -> id`
    FactorId = 14,
    /// `B -> IntConst`
    FactorConst = 15,
}

impl Rule {
    pub const ALL: [Rule; 15] = [
        Rule::Program,
        Rule::StmtListMore,
        Rule::StmtListLast,
        Rule::Declare,
        Rule::TypeInt,
        Rule::Assign,
        Rule::Return,
        Rule::Add,
        Rule::Sub,
        Rule::ExprTerm,
        Rule::Mul,
        Rule::TermFactor,
        Rule::Paren,
        Rule::FactorId,
        Rule::FactorConst,
    ];

    /// Rule reduced by `production`, if it belongs to the toy grammar.
    pub fn of(production: &Production) -> Option<Rule> {
        Rule::ALL.into_iter().find(|rule| *rule as usize == production.index())
    }

    fn shape(self) -> (NonTerminal, Vec<Term>) {
        use NonTerminal as N;
        use TokenKind as T;

        let t = Term::Terminal;
        let n = Term::NonTerminal;

        match self {
            Rule::Program => (N::Program, vec![n(N::StmtList)]),
            Rule::StmtListMore => (N::StmtList, vec![n(N::Stmt), t(T::Semicolon), n(N::StmtList)]),
            Rule::StmtListLast => (N::StmtList, vec![n(N::Stmt), t(T::Semicolon)]),
            Rule::Declare => (N::Stmt, vec![n(N::Decl), t(T::Id)]),
            Rule::TypeInt => (N::Decl, vec![t(T::Int)]),
            Rule::Assign => (N::Stmt, vec![t(T::Id), t(T::Assign), n(N::Expr)]),
            Rule::Return => (N::Stmt, vec![t(T::Return), n(N::Expr)]),
            Rule::Add => (N::Expr, vec![n(N::Expr), t(T::Plus), n(N::Term)]),
            Rule::Sub => (N::Expr, vec![n(N::Expr), t(T::Minus), n(N::Term)]),
            Rule::ExprTerm => (N::Expr, vec![n(N::Term)]),
            Rule::Mul => (N::Term, vec![n(N::Term), t(T::Star), n(N::Factor)]),
            Rule::TermFactor => (N::Term, vec![n(N::Factor)]),
            Rule::Paren => (N::Factor, vec![t(T::LParen), n(N::Expr), t(T::RParen)]),
            Rule::FactorId => (N::Factor, vec![t(T::Id)]),
            Rule::FactorConst => (N::Factor, vec![t(T::IntConst)]),
        }
    }
}

/// Context-free grammar with an augmented start production at index 0.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    terminals: Vec<TokenKind>,
    nonterminals: Vec<NonTerminal>,
}

impl Grammar {
    /// Build a grammar whose start symbol is `start`.
    ///
    /// `rules` are `(head, body)` pairs and receive indices from 1 upwards in
    /// the given order.
    pub fn new(start: NonTerminal, rules: Vec<(NonTerminal, Vec<Term>)>) -> Self {
        let mut productions = vec![Production::new(
            0,
            NonTerminal::Start,
            vec![Term::NonTerminal(start)],
        )];
        for (head, body) in rules {
            productions.push(Production::new(productions.len(), head, body));
        }

        let mut terminals = vec![TokenKind::Eof];
        let mut nonterminals = Vec::new();
        for production in &productions {
            if !nonterminals.contains(&production.head) {
                nonterminals.push(production.head);
            }
            for term in &production.body {
                match *term {
                    Term::Terminal(kind) if !terminals.contains(&kind) => terminals.push(kind),
                    Term::NonTerminal(nt) if !nonterminals.contains(&nt) => nonterminals.push(nt),
                    _ => {}
                }
            }
        }

        Self {
            productions,
            terminals,
            nonterminals,
        }
    }

    /// The grammar of the toy language.
    pub fn toy() -> Self {
        Self::new(
            NonTerminal::Program,
            Rule::ALL.into_iter().map(Rule::shape).collect(),
        )
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, index: usize) -> Option<&Production> {
        self.productions.get(index)
    }

    /// Terminals appearing in the grammar, end-of-input first.
    pub fn terminals(&self) -> &[TokenKind] {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &[NonTerminal] {
        &self.nonterminals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toy_grammar_indices() {
        let grammar = Grammar::toy();
        assert_eq!(grammar.productions().len(), 16);

        for rule in Rule::ALL {
            let production = grammar.production(rule as usize).unwrap();
            assert_eq!(Rule::of(production), Some(rule));
        }
        assert_eq!(Rule::of(&grammar.productions()[0]), None);
    }

    #[test]
    fn test_production_display() {
        let grammar = Grammar::toy();
        let display = |rule: Rule| grammar.production(rule as usize).unwrap().to_string();
        assert_eq!(display(Rule::Assign), "S -> id = E");
        assert_eq!(display(Rule::StmtListLast), "S_list -> S Semicolon");
        assert_eq!(grammar.productions()[0].to_string(), "P' -> P");
    }

    #[test]
    fn test_symbols() {
        let grammar = Grammar::toy();
        assert_eq!(grammar.terminals()[0], TokenKind::Eof);
        assert!(!grammar.terminals().contains(&TokenKind::Slash));
        assert!(!grammar.terminals().contains(&TokenKind::Comma));
        assert_eq!(grammar.nonterminals().len(), 8);
    }
}
