//! Recovery from a conflict.
//!
//! # Overview
//!
//! A backjump is a 'jump' from some (higher) decision level to some previous (lower) decision level.
//!
//! Typically, a backjump is made from level *l* to level *l - i* because a conflict was found at level *l* and analysis produced a clause which asserts some literal at level *l - i*.
//! In this case, all decisions and all consequences of those decisions from level *l* down to level *l - i* are undone: values are cleared, and the nodes of the implication graph are reset.
//!
//! # Methods
//!
//! # [backjump](GenericContext::backjump) --- Backjump to a target level
//!
//! Performs a backjump to some level.
//!
//! Passing a target level greater than the current level is safe --- nothing will happen.
//!
//! # [non_chronological_backjump_level](GenericContext::non_chronological_backjump_level) --- The backjump level of a(n unsatisfiable) clause
//!
//! The backjump level of a clause is the second highest level of the literals of the clause, or zero if all literals share a level.
//! This is only sound to use when applied to a clause unsatisfiable on the current valuation.
//!
//! # [backtrack](GenericContext::backtrack) --- Learn from a clause
//!
//! Backjumps, stores the clause (as an addition), decays activity, and records the literal asserted by the clause.
//! A unit clause is not stored, and is instead noted as a unit addition at level zero.
//!
//! # Example
//!
//! ```rust,ignore
//! if let AnalysisResult::AssertingClause { clause, asserted, level } = result {
//!     let key = self.backtrack(clause, asserted, level)?;
//!     self.bcp(asserted)?;
//! }
//! ```
//!
//! # Literature
//!
//! See [Chronological Backtracking](https://doi.org/10.1007/978-3-319-94144-8_7) for a discussion of chronological and non-chronological backjumping.

use crate::{
    context::GenericContext,
    db::{clause::ClauseSource, ClauseKey, LevelIndex},
    misc::log::targets::{self},
    structures::{
        clause::{CClause, Clause},
        literal::CLiteral,
    },
    types::err::{self},
};

impl<R: rand::Rng> GenericContext<R> {
    /// Backjumps to the given target level.
    ///
    /// For documentation, see [procedures::backjump](crate::procedures::backjump).
    pub fn backjump(&mut self, target: LevelIndex) {
        log::trace!(target: targets::BACKJUMP, "Backjump from {} to {target}", self.trail.level());

        while self.trail.level() > target {
            for literal in self.trail.forget_top_level() {
                self.clear_assignment(literal);
            }
        }
    }

    /// The non-chronological backjump level of a unsatisfiable clause.
    ///
    /// For documentation, see [procedures::backjump](crate::procedures::backjump).
    pub fn non_chronological_backjump_level(
        &self,
        clause: &impl Clause,
    ) -> Result<LevelIndex, err::ErrorKind> {
        match clause.size() {
            0 => Err(err::ClauseDBError::EmptyClause.into()),
            1 => Ok(0),
            _ => {
                // (second_to_top, top)
                let mut top_two: (Option<LevelIndex>, Option<LevelIndex>) = (None, None);
                for literal in clause.literals() {
                    let Some(level) = self.atom_db.level_of(literal.atom()) else {
                        log::error!(target: targets::BACKJUMP, "{literal} was not valued");
                        return Err(err::ErrorKind::Backjump);
                    };

                    match top_two {
                        (_, None) => top_two.1 = Some(level),
                        (_, Some(the_top)) if level > the_top => {
                            top_two.0 = top_two.1;
                            top_two.1 = Some(level);
                        }
                        (_, Some(the_top)) if level == the_top => {}
                        (None, _) => top_two.0 = Some(level),
                        (Some(second_to_top), _) if level > second_to_top => {
                            top_two.0 = Some(level)
                        }
                        _ => {}
                    }
                }

                Ok(top_two.0.unwrap_or(0))
            }
        }
    }

    /// Backjumps to `level`, adds `clause` to the context, and records `asserted` as a consequence of the clause.
    ///
    /// Returns the key of the clause.
    ///
    /// # Soundness
    /// After the backjump every literal of `clause` other than `asserted` should be false, and `asserted` should be unvalued.
    pub fn backtrack(
        &mut self,
        clause: CClause,
        asserted: CLiteral,
        level: LevelIndex,
    ) -> Result<ClauseKey, err::ErrorKind> {
        let key = match clause.size() {
            0 => return Err(err::ClauseDBError::EmptyClause.into()),

            1 => {
                self.backjump(0);
                let bump = self.config.activity_bump.value;
                self.atom_db.bump_activity(asserted.atom(), bump);
                self.clause_db.note_unit(asserted, ClauseSource::Addition)
            }

            _ => {
                self.backjump(level);
                self.store_clause(clause, ClauseSource::Addition)?
            }
        };

        self.atom_db
            .decay_activity(self.config.activity_decay.value);

        log::trace!(target: targets::BACKJUMP, "{key} asserts {asserted} at {}", self.trail.level());
        self.record_assignment(asserted, Some(key))?;
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::Config, context::Context};

    #[test]
    fn backjump_level_is_second_highest() {
        let mut the_context = Context::from_config(Config::default());
        let literals = the_context.fresh_or_max_literals(4);

        for literal in &literals {
            the_context.trail.open_level();
            the_context.record_assignment(*literal, None).unwrap();
        }

        let clause = vec![-literals[0], -literals[2], -literals[3]];
        assert_eq!(the_context.non_chronological_backjump_level(&clause), Ok(3));

        let clause = vec![-literals[1], -literals[3]];
        assert_eq!(the_context.non_chronological_backjump_level(&clause), Ok(2));

        let clause = vec![-literals[3]];
        assert_eq!(the_context.non_chronological_backjump_level(&clause), Ok(0));
    }

    #[test]
    fn backjump_clears_higher_levels() {
        let mut the_context = Context::from_config(Config::default());
        let literals = the_context.fresh_or_max_literals(3);

        for literal in &literals {
            the_context.trail.open_level();
            the_context.record_assignment(*literal, None).unwrap();
        }

        the_context.backjump(1);
        assert_eq!(the_context.trail.level(), 1);
        assert_eq!(the_context.atom_db.value_of(literals[0].atom()), Some(true));
        assert_eq!(the_context.atom_db.value_of(literals[1].atom()), None);
        assert_eq!(the_context.atom_db.value_of(literals[2].atom()), None);
        assert!(!the_context
            .implication_graph
            .has_dangling_edge(|atom| the_context.atom_db.value_of(atom).is_some()));
    }
}
