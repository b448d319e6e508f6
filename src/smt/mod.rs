/*!
A DPLL(T) coordinator, combining a [context](crate::context) with a [theory](crate::theory).

# Overview

The coordinator owns both a context and a theory, and drives each in turn:

1. Literals valued without a decision are propagated in the context.
   A conflict here means the formula is unsatisfiable.
2. Every literal on the trail of the context which has not been given to the theory, and whose atom is interpreted by the theory, is asserted to the theory, in order of assignment.
3. The theory propagates:
   - On a conflict the explanation lemma of the theory is given to the context, which backjumps and learns from the lemma as from any other conflict.
     A lemma whose literals were all valued without a decision means the formula is unsatisfiable.
   - On entailed atoms, the first atom not valued in the context is valued, with the explanation lemma as the reason for the value, and propagated.
     If the context values the atom the other way, the lemma is a conflict, as above.
   - Otherwise, the theory is quiescent.
4. If the theory is quiescent, a decision is made.
   If every atom is valued, the formula is satisfiable.
   Otherwise the decision is propagated, and the loop returns to (2).

# Levels

The theory is given a fresh level only when some decision level of the context first contributes an atom of the theory.
So, levels of the context map to levels of the theory, with the map kept by the coordinator.

Each backjump of the context is mirrored by a backtrack of the theory to the level mapped from the level backjumped to, and literals given to the theory from levels above are forgotten, to be given again if valued again.
As a backjump always precedes any further theory propagation, the theory never holds an assertion from a level the context has discarded, and no atom is asserted to the theory with both values without a backtrack between the assertions.

# Example

```rust
# use otter_smt::config::Config;
# use otter_smt::context::Context;
# use otter_smt::language::predicate::Formula;
# use otter_smt::reports::Report;
# use otter_smt::smt::Coordinator;
# use otter_smt::theory::euf::EqualitySolver;
let x_eq_y = Formula::parse("x=y").unwrap();
let fx_eq_fy = Formula::parse("f(x)=f(y)").unwrap();

let mut context = Context::from_config(Config::default());
let a = context.fresh_or_max_literal();
let b = context.fresh_or_max_literal();
context.add_clause(vec![a]).unwrap();
context.add_clause(vec![-b]).unwrap();

let theory = EqualitySolver::new([(a.atom(), &x_eq_y), (b.atom(), &fx_eq_fy)]);
let mut coordinator = Coordinator::new(context, theory);
assert_eq!(coordinator.solve(), Ok(Report::Unsatisfiable));
```
*/

use crate::{
    context::{ContextState, GenericContext},
    db::{clause::ClauseSource, LevelIndex},
    misc::log::targets::{self},
    procedures::decision::DecisionOk,
    reports::Report,
    structures::{clause::CClause, literal::CLiteral},
    theory::{Theory, TheoryAssertion, TheoryPropagation},
    types::err::{self, ErrorKind},
};

/// A DPLL(T) coordinator.
pub struct Coordinator<R: rand::Rng, T: Theory> {
    /// The context.
    pub context: GenericContext<R>,

    /// The theory.
    pub theory: T,

    /// For each level of the context, the level of the theory holding the assertions of the level.
    level_map: Vec<LevelIndex>,

    /// A count of literals on the trail given to the theory.
    synced: usize,

    /// For each level of the context, a count of the literals on the trail given to the theory from the level or some lower level.
    synced_by_level: Vec<usize>,
}

impl<R: rand::Rng, T: Theory> Coordinator<R, T> {
    /// A coordinator for the given context and theory.
    ///
    /// The theory should interpret (some) atoms of the context, and should have no assertions.
    pub fn new(context: GenericContext<R>, theory: T) -> Self {
        Coordinator {
            context,
            theory,
            level_map: Vec::default(),
            synced: 0,
            synced_by_level: Vec::default(),
        }
    }

    /// The level of the theory mapped from a level of the context, if the level of the context has contributed to the theory.
    pub fn theory_level_of(&self, level: LevelIndex) -> Option<LevelIndex> {
        self.level_map.get(level as usize).copied()
    }

    /// Determines the satisfiability of the formula of the context, relative to the theory.
    ///
    /// For documentation, see [smt](crate::smt).
    pub fn solve(&mut self) -> Result<Report, ErrorKind> {
        let total_time = std::time::Instant::now();

        match self.context.state {
            ContextState::Satisfiable | ContextState::Unsatisfiable => {
                return Ok(self.context.report())
            }
            ContextState::Input | ContextState::Solving => {}
        }

        if !self.context.start_sat()? {
            return Ok(self.context.report());
        }

        'smt_loop: loop {
            self.context.counters.total_iterations += 1;
            self.context.counters.time = total_time.elapsed();
            if self.context.time_is_up() {
                log::info!(target: targets::COORDINATOR, "Time limit reached after {:?}", self.context.counters.time);
                return Ok(Report::Unknown);
            }

            self.sync()?;

            match self.theory.t_propagate() {
                TheoryPropagation::Conflict(literal) => {
                    log::trace!(target: targets::COORDINATOR, "Theory conflict on {literal}");
                    let lemma = self.theory.t_explain(literal)?;
                    self.context.counters.theory_lemmas += 1;
                    if !self.resolve_lemma(lemma)? {
                        break 'smt_loop;
                    }
                    continue 'smt_loop;
                }

                TheoryPropagation::Propagate(entailed) => {
                    for literal in entailed {
                        match self.t_update(literal)? {
                            TheoryAssertion::AlreadySet => {}

                            TheoryAssertion::Contradicts => {
                                let lemma = self.theory.t_explain(literal)?;
                                self.context.counters.theory_lemmas += 1;
                                if !self.resolve_lemma(lemma)? {
                                    break 'smt_loop;
                                }
                                continue 'smt_loop;
                            }

                            TheoryAssertion::Set => {
                                if !self.propagate(literal)? {
                                    break 'smt_loop;
                                }
                                continue 'smt_loop;
                            }
                        }
                    }
                }

                TheoryPropagation::Consistent => {}
            }

            match self.context.make_decision() {
                DecisionOk::Exhausted => {
                    self.context.state = ContextState::Satisfiable;
                    break 'smt_loop;
                }

                DecisionOk::Literal(decision) => {
                    self.context.trail.open_level();
                    self.context.record_assignment(decision, None)?;
                    if !self.propagate(decision)? {
                        break 'smt_loop;
                    }
                }
            }
        }

        Ok(self.context.report())
    }

    /// Values an atom entailed by the theory in the context, with the explanation of the theory as the reason for the value.
    ///
    /// The value is made on the current level, and is not propagated.
    pub fn t_update(&mut self, literal: CLiteral) -> Result<TheoryAssertion, ErrorKind> {
        match self.context.atom_db.value_of(literal.atom()) {
            Some(value) if value == literal.polarity() => Ok(TheoryAssertion::AlreadySet),

            Some(_) => Ok(TheoryAssertion::Contradicts),

            None => {
                let lemma = self.theory.t_explain(literal)?;
                self.context.counters.theory_lemmas += 1;
                let key = match lemma.len() {
                    1 => self
                        .context
                        .clause_db
                        .note_unit(literal, ClauseSource::Addition),
                    _ => self.context.store_clause(lemma, ClauseSource::Addition)?,
                };
                log::trace!(target: targets::COORDINATOR, "Theory asserts {literal} by {key}");
                self.context.record_assignment(literal, Some(key))?;
                Ok(TheoryAssertion::Set)
            }
        }
    }

    /// Asserts every unsynced literal of the trail to the theory.
    fn sync(&mut self) -> Result<(), ErrorKind> {
        while let Some(literal) = self.context.trail.literals().get(self.synced).copied() {
            let level = self.context.atom_db.level_of(literal.atom()).unwrap_or(0) as usize;

            if self.theory.is_theory_atom(literal.atom()) {
                while self.level_map.len() < level {
                    self.level_map.push(self.theory.t_level());
                }
                if self.level_map.len() == level {
                    let theory_level = match level {
                        0 => self.theory.t_level(),
                        _ => self.theory.t_push(),
                    };
                    self.level_map.push(theory_level);
                }
                self.theory.t_assert(literal)?;
            }

            while self.synced_by_level.len() <= level {
                self.synced_by_level.push(self.synced);
            }
            self.synced += 1;
            self.synced_by_level[level] = self.synced;
        }
        Ok(())
    }

    /// Propagates `literal` in the context, mirroring any backjump in the theory.
    fn propagate(&mut self, literal: CLiteral) -> Result<bool, ErrorKind> {
        let mut lowest: Option<LevelIndex> = None;
        let consistent = self.context.propagate_with_learning(literal, |level| {
            lowest = Some(lowest.map_or(level, |lowest| lowest.min(level)))
        })?;
        if let Some(level) = lowest {
            self.mirror_backjump(level)?;
        }
        Ok(consistent)
    }

    /// Learns from a lemma unsatisfiable on the current valuation, mirroring any backjump in the theory.
    fn resolve_lemma(&mut self, lemma: CClause) -> Result<bool, ErrorKind> {
        let mut lowest: Option<LevelIndex> = None;
        let consistent = self.context.resolve_conflict_clause(lemma, |level| {
            lowest = Some(lowest.map_or(level, |lowest| lowest.min(level)))
        })?;
        if let Some(level) = lowest {
            self.mirror_backjump(level)?;
        }
        Ok(consistent)
    }

    /// Backtracks the theory to match a backjump of the context to `level`.
    fn mirror_backjump(&mut self, level: LevelIndex) -> Result<(), err::TheoryError> {
        let index = level as usize;
        let target = match self.level_map.get(index) {
            Some(theory_level) => *theory_level,
            None => self.theory.t_level(),
        };
        log::trace!(target: targets::COORDINATOR, "Mirror backjump to {level} with theory level {target}");

        self.theory.t_backtrack(target)?;
        self.level_map.truncate(index + 1);
        if let Some(count) = self.synced_by_level.get(index) {
            self.synced = *count;
        }
        self.synced_by_level.truncate(index + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config, context::Context, language::predicate::Formula,
        theory::euf::EqualitySolver,
    };

    #[test]
    fn theory_propagation_through_levels() {
        let formulas: Vec<Formula> = ["a=b", "b=c", "f(a)=f(c)", "c=d"]
            .iter()
            .map(|f| Formula::parse(f).unwrap())
            .collect();

        let mut context = Context::from_config(Config::default());
        let atoms = context.fresh_or_max_literals(formulas.len());
        // a=b, b=c, and either ~f(a)=f(c) or c=d.
        context.add_clause(vec![atoms[0]]).unwrap();
        context.add_clause(vec![atoms[1]]).unwrap();
        context.add_clause(vec![-atoms[2], atoms[3]]).unwrap();

        let theory = EqualitySolver::new(atoms.iter().map(|l| l.atom()).zip(formulas.iter()));
        let mut coordinator = Coordinator::new(context, theory);
        assert_eq!(coordinator.solve(), Ok(Report::Satisfiable));

        let context = &coordinator.context;
        for literal in &atoms[0..4] {
            assert_eq!(context.atom_db.value_of(literal.atom()), Some(true));
        }
        // Every assertion was made without a decision.
        assert_eq!(coordinator.theory_level_of(0), Some(0));
        assert_eq!(coordinator.theory_level_of(1), None);
    }

    #[test]
    fn theory_conflict_after_decision() {
        let formulas: Vec<Formula> = ["x=y", "y=z", "x=z"]
            .iter()
            .map(|f| Formula::parse(f).unwrap())
            .collect();

        let mut context = Context::from_config(Config::default());
        let atoms = context.fresh_or_max_literals(formulas.len());
        // x=y, and x=z -> y=z, and ~(y=z & x=z).
        // So, y=z would entail x=z through the theory, and x=z is false.
        context.add_clause(vec![atoms[0]]).unwrap();
        context.add_clause(vec![atoms[1], -atoms[2]]).unwrap();
        context.add_clause(vec![-atoms[1], -atoms[2]]).unwrap();

        let theory = EqualitySolver::new(atoms.iter().map(|l| l.atom()).zip(formulas.iter()));
        let mut coordinator = Coordinator::new(context, theory);
        assert_eq!(coordinator.solve(), Ok(Report::Satisfiable));

        let context = &coordinator.context;
        assert_eq!(context.atom_db.value_of(atoms[0].atom()), Some(true));
        assert_eq!(context.atom_db.value_of(atoms[2].atom()), Some(false));
        assert_eq!(context.atom_db.value_of(atoms[1].atom()), Some(false));
    }
}
