/*!
Analysis of an unsatisfiable clause.

Takes a key to a clause which is unsatisfiable on the current valuation and returns a clause which asserts some literal at some lower level.

# Overview

Analysis is resolution, guided by the trail:

- The clause is resolved against the forcing clause of the literal of the current level which was valued *last*, by position on the [trail](crate::db::trail).
- This continues until a single literal of the current level remains.

The atom of the remaining literal is the first unique implication point (UIP), the atom closest to the conflict through which every path in the [implication graph](crate::db::implication) from the decision of the current level to the conflict passes.
The remaining literal is false on the current valuation, and is asserted by the learnt clause once every other literal of the clause is false and the literal is unvalued.

With debug assertions the UIP is also found directly as the immediate dominator of the conflict, and the two are checked to agree.

Literals valued at level zero are dropped from the resolvent, as their values are fixed.

The result of analysis is one of:
- [FundamentalConflict](AnalysisResult::FundamentalConflict), if the conflict is at level zero, and so the formula is unsatisfiable.
- [AssertingClause](AnalysisResult::AssertingClause), with the clause, the asserted literal, and the (non-chronological) backjump level: the second highest level of the clause, or zero if the clause is unit.

```rust,ignore
match self.conflict_analysis(key)? {
    AnalysisResult::FundamentalConflict => ...,
    AnalysisResult::AssertingClause { clause, asserted, level } => {
        self.backtrack(clause, asserted, level)?;
    }
}
```

# Literature

For a discussion of unique implication points see [Decision Procedures](https://doi.org/10.1007/978-3-662-50497-0) and the [Handbook of satisfiability](https://www.iospress.com/catalog/books/handbook-of-satisfiability-2).
*/

use crate::{
    context::GenericContext,
    db::{ClauseKey, LevelIndex},
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        clause::{CClause, Clause},
        literal::CLiteral,
    },
    types::err::{self, ErrorKind},
};

/// Possible results of analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalysisResult {
    /// The conflict was found without any decision, and so the formula is unsatisfiable.
    FundamentalConflict,

    /// A clause which asserts `asserted` after a backjump to `level`.
    AssertingClause {
        clause: CClause,
        asserted: CLiteral,
        level: LevelIndex,
    },
}

impl<R: rand::Rng> GenericContext<R> {
    /// For documentation see [procedures::analysis](crate::procedures::analysis).
    ///
    /// # Soundness
    /// The clause of `key` should be unsatisfiable on the current valuation, with some literal valued at the current level.
    pub fn conflict_analysis(&mut self, key: ClauseKey) -> Result<AnalysisResult, ErrorKind> {
        let level = self.trail.level();
        if level == 0 {
            return Ok(AnalysisResult::FundamentalConflict);
        }

        let mut clause: CClause = Vec::default();
        self.merge_without_fixed(&mut clause, &self.clause_db.literals_of(&key)?, None);

        let top = self.trail.top_level();
        let Some(decision) = top.decision else {
            return Err(err::AnalysisError::NoDecision.into());
        };
        let uip = match cfg!(debug_assertions) {
            true => {
                let level_atoms: Vec<Atom> = top.history.iter().map(|l| l.atom()).collect();
                let conflict_atoms: Vec<Atom> = self.at_level(&clause, level).map(|l| l.atom()).collect();
                self.implication_graph
                    .first_uip(decision.atom(), &level_atoms, &conflict_atoms)
            }
            false => None,
        };

        'resolution_loop: loop {
            let current: Vec<CLiteral> = self.at_level(&clause, level).collect();

            if current.len() == 1 {
                break 'resolution_loop;
            }

            let Some(last) = current
                .iter()
                .max_by_key(|literal| self.atom_db.position_of(literal.atom()))
                .copied()
            else {
                return Err(err::AnalysisError::EmptyResolution.into());
            };

            let Some(reason) = self.implication_graph.reason(last.atom()) else {
                log::error!(target: targets::ANALYSIS, "{last} of the current level has no reason");
                return Err(err::AnalysisError::MissingReason.into());
            };

            log::trace!(target: targets::ANALYSIS, "Resolving on {} with {reason}", last.atom());
            let reason_literals = self.clause_db.literals_of(&reason)?;
            self.merge_without_fixed(&mut clause, &reason_literals, Some(last.atom()));
        }

        let Some(asserted) = self.at_level(&clause, level).next() else {
            return Err(err::AnalysisError::NoAssertion.into());
        };
        if uip.is_some_and(|uip| uip != asserted.atom()) {
            log::error!(target: targets::ANALYSIS, "Resolution stopped at {} rather than the dominator {uip:?}", asserted.atom());
        }

        let backjump_level = clause
            .iter()
            .filter(|literal| literal.atom() != asserted.atom())
            .filter_map(|literal| self.atom_db.level_of(literal.atom()))
            .max()
            .unwrap_or(0);

        log::trace!(target: targets::ANALYSIS, "Learnt {} asserting {asserted} at {backjump_level}", clause.as_dimacs());
        Ok(AnalysisResult::AssertingClause {
            clause,
            asserted,
            level: backjump_level,
        })
    }

    /// The literals of `clause` valued at `level`.
    fn at_level<'c>(
        &'c self,
        clause: &'c [CLiteral],
        level: LevelIndex,
    ) -> impl Iterator<Item = CLiteral> + 'c {
        clause
            .iter()
            .filter(move |literal| self.atom_db.level_of(literal.atom()) == Some(level))
            .copied()
    }

    /// Resolves `clause` with `other` on `pivot` (if some), dropping literals fixed at level zero and any duplicates.
    fn merge_without_fixed(&self, clause: &mut CClause, other: &[CLiteral], pivot: Option<Atom>) {
        if let Some(pivot) = pivot {
            clause.retain(|literal| literal.atom() != pivot);
        }
        for literal in other {
            if Some(literal.atom()) == pivot
                || self.atom_db.level_of(literal.atom()) == Some(0)
                || clause.contains(literal)
            {
                continue;
            }
            clause.push(*literal);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::Config, context::Context, types::err::BCPError};

    use super::AnalysisResult;

    #[test]
    fn learnt_clause_is_false_with_one_literal_at_the_conflict_level() {
        let mut the_context = Context::from_config(Config::default());
        for clause in ["-p q", "-a -p r", "-q -r"] {
            let clause = the_context.clause_from_string(clause).unwrap();
            assert!(the_context.add_clause(clause).is_ok());
        }
        let a = the_context.literal_from_string("a").unwrap();
        let p = the_context.literal_from_string("p").unwrap();

        assert!(the_context.start_sat().unwrap());
        the_context.trail.open_level();
        the_context.record_assignment(a, None).unwrap();
        assert!(the_context.bcp(a).is_ok());

        the_context.trail.open_level();
        the_context.record_assignment(p, None).unwrap();
        let Err(BCPError::Conflict(key)) = the_context.bcp(p) else {
            panic!("expected a conflict");
        };

        let AnalysisResult::AssertingClause {
            clause,
            asserted,
            level,
        } = the_context.conflict_analysis(key).unwrap()
        else {
            panic!("expected an asserting clause");
        };

        assert_eq!(asserted, -p);
        assert_eq!(level, 1);
        let mut sorted = clause.clone();
        sorted.sort();
        let mut expected = vec![-a, -p];
        expected.sort();
        assert_eq!(sorted, expected);
        for literal in &clause {
            assert_eq!(the_context.atom_db.value_of(literal.atom()), Some(!literal.polarity()));
        }

        the_context.backtrack(clause, asserted, level).unwrap();
        assert_eq!(the_context.trail.level(), 1);
        assert_eq!(the_context.atom_db.value_of(p.atom()), Some(false));
    }
}
