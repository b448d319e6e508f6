//! Determines the satisfiability of the formula in a context.
//!
//! # Overview
//!
//! [solve](GenericContext::solve) is the conflict-driven clause-learning algorithm:
//!
//! - [start_sat](GenericContext::start_sat) propagates every literal valued without a decision (i.e. unit clauses).
//!   A conflict here means the formula is unsatisfiable.
//! - Then, so long as some atom has no value, a decision is made on a fresh level and propagated through [propagate_with_learning](GenericContext::propagate_with_learning).
//! - A conflict found by propagation is analysed, the learnt clause added and its asserted literal propagated, until either no conflict is found or a conflict is found without any decision.
//!
//! Roughly, the loop is as diagrammed:
//!
//! ```none
//!           +---------------+
//!   +------>| make_decision |-----> satisfiable, if every atom is valued
//!   |       +---------------+
//!   |               |
//!   |               ⌄
//!   |       +-----------------+                       +----------+
//!   +-------|       bcp       |---- on a conflict --->| analysis |-----> unsatisfiable, at level zero
//!   |       +-----------------+                       +----------+
//!   |               ⌃                                      |
//!   |               |                                      ⌄
//!   |               |                               +-----------+
//!   |               +-------------------------------| backtrack |
//!   |                                               +-----------+
//! ```
//!
//! The time limit of the [config](crate::config::Config) is checked once per decision, and if exceeded the solve ends with an unknown report.
//!
//! # Theories
//!
//! [propagate_with_learning](GenericContext::propagate_with_learning) takes a callback which is called with the level of the context after every backjump, so that some other solver may mirror the backjump.
//! And, [resolve_conflict_clause](GenericContext::resolve_conflict_clause) learns from a clause given by some other solver which is unsatisfiable on the current valuation, such as a theory lemma.
//! See the [DPLL(T) coordinator](crate::smt) for use.
//!
//! # Example
//!
//! ```rust
//! # use otter_smt::config::Config;
//! # use otter_smt::context::Context;
//! # use otter_smt::reports::Report;
//! let mut the_context = Context::from_config(Config::default());
//!
//! let not_p_or_q = the_context.clause_from_string("-p q").unwrap();
//! let p_or_not_q = the_context.clause_from_string("p -q").unwrap();
//! let _ = the_context.add_clause(not_p_or_q);
//! let _ = the_context.add_clause(p_or_not_q);
//!
//! assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
//!
//! let model = the_context.model();
//! assert_eq!(model.get("p"), model.get("q"));
//! ```
//!
//! # Literature
//!
//! The solve procedure was developed by reading [Decision Procedures](https://doi.org/10.1007/978-3-662-50497-0)
//! and the [Handbook of satisfiability](https://www.iospress.com/catalog/books/handbook-of-satisfiability-2).

use crate::{
    context::{ContextState, GenericContext},
    db::{clause::ClauseSource, ClauseKey, LevelIndex},
    misc::log::targets::{self},
    procedures::{analysis::AnalysisResult, decision::DecisionOk},
    reports::Report,
    structures::{
        clause::{CClause, Clause, ClauseOk},
        literal::CLiteral,
        valuation::{Valuation, ValuationStatus},
    },
    types::err::{self, ErrorKind},
};

impl<R: rand::Rng> GenericContext<R> {
    /// Determines the satisfiability of the formula of the context.
    ///
    /// For documentation, see [procedures::solve](crate::procedures::solve).
    pub fn solve(&mut self) -> Result<Report, ErrorKind> {
        let total_time = std::time::Instant::now();

        match self.state {
            ContextState::Satisfiable | ContextState::Unsatisfiable => return Ok(self.report()),
            ContextState::Input | ContextState::Solving => {}
        }

        if !self.start_sat()? {
            return Ok(self.report());
        }

        'solve_loop: loop {
            self.counters.total_iterations += 1;
            log::trace!("Iteration {}", self.counters.total_iterations);

            self.counters.time = total_time.elapsed();
            if self.time_is_up() {
                log::info!("Time limit reached after {:?}", self.counters.time);
                return Ok(Report::Unknown);
            }

            match self.make_decision() {
                DecisionOk::Exhausted => {
                    self.state = ContextState::Satisfiable;
                    break 'solve_loop;
                }

                DecisionOk::Literal(decision) => {
                    self.trail.open_level();
                    self.record_assignment(decision, None)?;
                    if !self.propagate_with_learning(decision, |_| {})? {
                        break 'solve_loop;
                    }
                }
            }
        }

        Ok(self.report())
    }

    /// True if the time limit of the context has been reached.
    pub fn time_is_up(&self) -> bool {
        self.config
            .time_limit
            .is_some_and(|limit| self.counters.time >= limit)
    }

    /// Propagates every literal valued without a decision.
    ///
    /// Returns false (and marks the context unsatisfiable) if a conflict is found.
    pub fn start_sat(&mut self) -> Result<bool, ErrorKind> {
        if self.state == ContextState::Unsatisfiable {
            return Ok(false);
        }
        self.state = ContextState::Solving;

        let fixed = match self.trail.at_level(0) {
            Some(level) => level.history.to_vec(),
            None => Vec::default(),
        };

        for literal in fixed {
            match self.bcp(literal) {
                Ok(()) => {}
                Err(err::BCPError::Conflict(key)) => {
                    log::info!(target: targets::PROPAGATION, "Conflict on {key} without a decision");
                    self.state = ContextState::Unsatisfiable;
                    return Ok(false);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(true)
    }

    /// Propagates `literal`, and on a conflict learns a clause, backjumps, and propagates the asserted literal, repeatedly.
    ///
    /// `on_backjump` is called with the level of the context after each backjump.
    ///
    /// Returns false (and marks the context unsatisfiable) if a conflict is found without any decision.
    pub fn propagate_with_learning(
        &mut self,
        literal: CLiteral,
        mut on_backjump: impl FnMut(LevelIndex),
    ) -> Result<bool, ErrorKind> {
        let mut literal = literal;

        loop {
            match self.bcp(literal) {
                Ok(()) => return Ok(true),

                Err(err::BCPError::Conflict(key)) => {
                    match self.learn_from_conflict(key, &mut on_backjump)? {
                        Some(asserted) => literal = asserted,
                        None => return Ok(false),
                    }
                }

                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Learns from a clause unsatisfiable on the current valuation, which need not be in the context.
    ///
    /// - If every literal of the clause was valued without a decision, the formula is unsatisfiable.
    /// - If a single literal of the clause is from the highest level of the clause, the clause is asserting and added directly.
    /// - Otherwise, a backjump is made to the highest level of the clause, and the clause is added and analysed as any other conflict.
    ///
    /// In each case, asserted literals are propagated through [propagate_with_learning](GenericContext::propagate_with_learning).
    pub fn resolve_conflict_clause(
        &mut self,
        clause: CClause,
        mut on_backjump: impl FnMut(LevelIndex),
    ) -> Result<bool, ErrorKind> {
        let clause = match clause.canonical() {
            ClauseOk::Clause(clause) => clause,
            ClauseOk::Tautology => {
                log::error!(target: targets::ANALYSIS, "Tautology given as a conflict");
                return Err(ErrorKind::InvalidState);
            }
        };

        let mut levels = Vec::with_capacity(clause.len());
        for literal in &clause {
            match self.atom_db.valuation().check_literal(*literal) {
                ValuationStatus::Conflict => {
                    levels.push(self.atom_db.level_of(literal.atom()).unwrap_or(0))
                }
                ValuationStatus::None | ValuationStatus::Set => {
                    log::error!(target: targets::ANALYSIS, "{literal} of a conflict clause is not false");
                    return Err(ErrorKind::InvalidState);
                }
            }
        }

        let top = levels.iter().max().copied().unwrap_or(0);
        if top == 0 {
            log::info!(target: targets::ANALYSIS, "Conflict clause {} without a decision", clause.as_dimacs());
            self.state = ContextState::Unsatisfiable;
            return Ok(false);
        }

        let at_top: Vec<CLiteral> = clause
            .iter()
            .zip(&levels)
            .filter(|(_, level)| **level == top)
            .map(|(literal, _)| *literal)
            .collect();

        match at_top.as_slice() {
            [asserted] => {
                self.counters.total_conflicts += 1;
                let asserted = *asserted;
                let level = self.non_chronological_backjump_level(&clause)?;
                self.backtrack(clause, asserted, level)?;
                on_backjump(self.trail.level());
                self.propagate_with_learning(asserted, on_backjump)
            }

            _ => {
                if top < self.trail.level() {
                    self.backjump(top);
                    on_backjump(top);
                }
                let key = self.store_clause(clause, ClauseSource::Addition)?;
                match self.learn_from_conflict(key, &mut on_backjump)? {
                    Some(asserted) => self.propagate_with_learning(asserted, on_backjump),
                    None => Ok(false),
                }
            }
        }
    }

    /// Analyses the conflict of `key` and backtracks, returning the asserted literal.
    ///
    /// None is returned (and the context marked unsatisfiable) on a fundamental conflict.
    fn learn_from_conflict(
        &mut self,
        key: ClauseKey,
        on_backjump: &mut impl FnMut(LevelIndex),
    ) -> Result<Option<CLiteral>, ErrorKind> {
        self.counters.total_conflicts += 1;

        match self.conflict_analysis(key)? {
            AnalysisResult::FundamentalConflict => {
                log::info!(target: targets::ANALYSIS, "Fundamental conflict on {key}");
                self.state = ContextState::Unsatisfiable;
                Ok(None)
            }

            AnalysisResult::AssertingClause {
                clause,
                asserted,
                level,
            } => {
                self.backtrack(clause, asserted, level)?;
                on_backjump(self.trail.level());
                Ok(Some(asserted))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::Config, context::Context, reports::Report};

    #[test]
    fn learnt_unit_is_fixed() {
        let mut the_context = Context::from_config(Config::default());
        for clause in ["p q", "p -q", "-p r", "-p -r s", "-s t"] {
            let clause = the_context.clause_from_string(clause).unwrap();
            assert!(the_context.add_clause(clause).is_ok());
        }

        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        let model = the_context.model();
        for atom in ["p", "r", "s", "t"] {
            assert_eq!(model.get(atom), Some(&true));
        }
    }

    #[test]
    fn conflict_clause_from_outside() {
        let mut the_context = Context::from_config(Config::default());
        let p = the_context.fresh_or_max_literal();
        let q = the_context.fresh_or_max_literal();
        assert!(the_context.add_clause(vec![p, q]).is_ok());

        assert!(the_context.start_sat().unwrap());
        the_context.trail.open_level();
        the_context.record_assignment(-p, None).unwrap();
        assert!(the_context.propagate_with_learning(-p, |_| {}).unwrap());
        assert_eq!(the_context.atom_db.value_of(q.atom()), Some(true));

        let mut jumps = Vec::default();
        let clause = vec![p, -q];
        assert!(the_context
            .resolve_conflict_clause(clause, |level| jumps.push(level))
            .unwrap());

        assert_eq!(jumps, vec![0]);
        assert_eq!(the_context.atom_db.value_of(p.atom()), Some(true));
    }
}
