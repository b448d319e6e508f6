//! Databases for holding information relevant to a solve.
//!
//! - [The clause database](crate::db::clause)
//!   + A collection of clauses, each indexed by a clause key. \
//!     From an external perspective there are two important kinds of clause:
//!     * Original clauses, added to the context from some external source (e.g. directly, through some DIMACS file, or through a Tseitin transformation).
//!     * Additions, added to the context during a solve, by conflict analysis or as a theory lemma.
//! - [The atom database](crate::db::atom)
//!   + Properties of atoms: names, the valuation, levels, and activity.
//! - [Watches](crate::db::watches)
//!   + For each literal, the clauses watching the literal.
//! - [The trail](crate::db::trail)
//!   + Assignments, partitioned into decision levels.
//! - [The implication graph](crate::db::implication)
//!   + For each valued atom, the clause which forced the value and edges to related atoms.

pub mod atom;
pub mod clause;
pub mod implication;
mod keys;
pub use keys::*;
pub mod trail;
pub mod watches;

/// The index of a [decision level](crate::db::trail).
pub type LevelIndex = u32;

use crate::{
    context::GenericContext,
    structures::{atom::Atom, clause::Clause, literal::CLiteral},
    types::err::{self},
};

/// Canonical methods to record and clear assignments.
impl<R: rand::Rng> GenericContext<R> {
    /// Records an assignment at the current level, forced by `reason` (if any).
    ///
    /// The assignment is stored on the trail, in the valuation, and in the implication graph.
    ///
    /// ```rust,ignore
    /// self.record_assignment(literal, Some(key))?;
    /// ```
    pub fn record_assignment(
        &mut self,
        literal: CLiteral,
        reason: Option<ClauseKey>,
    ) -> Result<(), err::ErrorKind> {
        let level = self.trail.level();
        let parents: Vec<Atom> = match reason {
            Some(key) if !key.is_unit() => self.clause_db.get(&key)?.atoms().collect(),
            _ => Vec::default(),
        };

        let position = self.trail.store_assignment(literal);
        self.atom_db.set_value(literal, level, position);
        self.implication_graph
            .note(literal.atom(), reason, parents.into_iter());
        Ok(())
    }

    /// Clears the assignment of the atom of `literal` from the valuation and implication graph.
    ///
    /// # Soundness
    /// Does not remove the literal from the trail.
    pub fn clear_assignment(&mut self, literal: CLiteral) {
        self.atom_db.drop_value(literal.atom());
        self.implication_graph.reset(literal.atom());
    }
}
