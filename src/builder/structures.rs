use std::cmp::Reverse;

use crate::{
    context::{ContextState, GenericContext},
    db::{
        clause::{ClauseSource, ClauseSource::Original},
        ClauseKey,
    },
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        clause::{CClause, Clause, ClauseOk},
        literal::CLiteral,
        valuation::{Valuation, ValuationStatus},
    },
    types::err::{self, ErrorKind},
};

impl<R: rand::Rng> GenericContext<R> {
    /// A fresh atom with the given (external) name.
    pub fn fresh_atom(&mut self, name: String) -> Result<Atom, err::AtomDBError> {
        let atom = self.atom_db.fresh_atom(name)?;
        self.watches.fresh_atom(atom);
        self.implication_graph.fresh_atom(atom);
        Ok(atom)
    }

    /// The atom with the given name, creating a fresh atom if no atom has the name.
    pub fn atom_from_name(&mut self, name: &str) -> Result<Atom, err::AtomDBError> {
        match self.atom_db.atom_of(name) {
            Some(atom) => Ok(atom),
            None => self.fresh_atom(name.to_owned()),
        }
    }

    /// A fresh literal, named by its DIMACS representation.
    ///
    /// # Panics
    /// If the atoms of the context are exhausted.
    pub fn fresh_or_max_literal(&mut self) -> CLiteral {
        let name = (self.atom_db.count() + 1).to_string();
        match self.fresh_atom(name) {
            Ok(atom) => CLiteral::new(atom, true),
            Err(_) => panic!("! Atoms exhausted"),
        }
    }

    /// A vector of `count` fresh literals.
    pub fn fresh_or_max_literals(&mut self, count: usize) -> Vec<CLiteral> {
        (0..count).map(|_| self.fresh_or_max_literal()).collect()
    }

    /// A literal from a string, where a leading '-' gives a negative literal and the rest of the string is the name of the atom.
    pub fn literal_from_string(&mut self, string: &str) -> Result<CLiteral, ErrorKind> {
        let (name, polarity) = match string.strip_prefix('-') {
            Some(name) => (name, false),
            None => (string, true),
        };
        if name.is_empty() || name.starts_with('-') {
            return Err(err::ParseError::Literal(0).into());
        }
        let atom = self.atom_from_name(name)?;
        Ok(CLiteral::new(atom, polarity))
    }

    /// A clause from a string of whitespace separated literals.
    ///
    /// ```rust
    /// # use otter_smt::context::Context;
    /// # use otter_smt::config::Config;
    /// # use otter_smt::reports::Report;
    /// let mut the_context = Context::from_config(Config::default());
    /// let p_or_not_q = the_context.clause_from_string("p -q").unwrap();
    /// let not_p = the_context.clause_from_string("-p").unwrap();
    /// assert!(the_context.add_clause(p_or_not_q).is_ok());
    /// assert!(the_context.add_clause(not_p).is_ok());
    ///
    /// assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
    /// assert_eq!(the_context.model().get("q"), Some(&false));
    /// ```
    pub fn clause_from_string(&mut self, string: &str) -> Result<CClause, ErrorKind> {
        string
            .split_whitespace()
            .map(|literal| self.literal_from_string(literal))
            .collect()
    }

    /// Adds a clause to the context, as part of the formula.
    ///
    /// - Duplicate literals are removed, and a tautology is not stored.
    /// - An empty clause, or a unit clause conflicting with a unit clause already added, makes the context unsatisfiable.
    /// - A unit clause is not stored, and its literal is valued immediately.
    ///
    /// Clauses may only be added before a decision is made.
    pub fn add_clause(&mut self, clause: impl Clause) -> Result<ClauseOk, ErrorKind> {
        if self.trail.decision_is_made() {
            log::error!(target: targets::CLAUSE_DB, "Clause added after a decision");
            return Err(ErrorKind::InvalidState);
        }

        let clause = match clause.canonical() {
            ClauseOk::Tautology => return Ok(ClauseOk::Tautology),
            ClauseOk::Clause(clause) => clause,
        };

        match clause.as_slice() {
            [] => {
                log::info!(target: targets::CLAUSE_DB, "Empty clause added");
                self.state = ContextState::Unsatisfiable;
            }

            [literal] => {
                let key = self.clause_db.note_unit(*literal, Original);
                match self.atom_db.valuation().check_literal(*literal) {
                    ValuationStatus::None => self.record_assignment(*literal, Some(key))?,
                    ValuationStatus::Set => {}
                    ValuationStatus::Conflict => {
                        log::info!(target: targets::CLAUSE_DB, "Conflicting unit clause {literal}");
                        self.state = ContextState::Unsatisfiable;
                    }
                }
            }

            _ => {
                self.store_clause(clause.clone(), Original)?;
            }
        }

        Ok(ClauseOk::Clause(clause))
    }

    /// Stores a clause of at least two literals with watches chosen relative to the current valuation, and bumps the activity of its atoms.
    ///
    /// Literals are ordered so that unvalued and true literals come first, followed by false literals from the highest level to the lowest.
    /// Following this, the first two literals are watched.
    /// So, if the clause is asserting (or conflicting), the asserting literal (or a literal from the highest level) is the first watch.
    pub fn store_clause(
        &mut self,
        mut clause: CClause,
        source: ClauseSource,
    ) -> Result<ClauseKey, ErrorKind> {
        if clause.len() < 2 {
            return Err(err::ClauseDBError::UnitClause.into());
        }

        clause.sort_by_key(|literal| {
            match self.atom_db.valuation().check_literal(*literal) {
                ValuationStatus::None | ValuationStatus::Set => (0, Reverse(0)),
                ValuationStatus::Conflict => {
                    (1, Reverse(self.atom_db.level_of(literal.atom()).unwrap_or(0)))
                }
            }
        });

        let bump = self.config.activity_bump.value;
        for atom in clause.atoms() {
            self.atom_db.bump_activity(atom, bump);
        }

        let (first, second) = (clause[0], clause[1]);
        let key = self.clause_db.store(clause, source)?;
        self.watches.watch(key, first);
        self.watches.watch(key, second);
        Ok(key)
    }
}
