/*!
A context method for boolean constraint propagation.

See [GenericContext::bcp] for the relevant context method.

# Overview
Propagates an atom being assigned some value, given as a literal.

This is done by examining clauses watching the atom with the opposite polarity (the literal made false) and updating the watches of the clause, if possible, recording the consequence of a clause which has become unit, or identifying a clause which conflicts with the current valuation.

Consequences are recorded immediately, at the current level, and are queued for propagation in turn.
So, a single call to [bcp](GenericContext::bcp) continues until no further consequence is found, or a conflict is found.

# Watch lists

The list of clauses watching the broken literal is taken from the [watch index](crate::db::watches) for the duration of the examination.
Every clause taken is either returned to the list, or moved to the list of its replacement watch.
In particular, a conflict returns the remaining (unexamined) clauses to the list before returning.

A replacement watch is never the broken literal, as the broken literal is false, and so the taken list is never extended during the examination.

# Example

bcp is a mutating method, and a typical application will match against the result of the mutation.

```rust,ignore
match self.bcp(literal) {
    Err(err::BCPError::Conflict(key)) => {
        let analysis_result = self.conflict_analysis(key)?;
        ...
    }
    ...
    Ok(()) => {
        match self.make_decision() {
            ...
        }
    }
}
```
*/

use std::collections::VecDeque;

use crate::{
    context::GenericContext,
    db::{clause::db_clause::WatchUpdate, ClauseKey},
    misc::log::targets::{self},
    structures::literal::CLiteral,
    types::err::{self},
};

impl<R: rand::Rng> GenericContext<R> {
    /// For documentation see [procedures::bcp](crate::procedures::bcp).
    ///
    /// # Soundness
    /// `literal` should be true on the current valuation.
    pub fn bcp(&mut self, literal: CLiteral) -> Result<(), err::BCPError> {
        let mut queue = VecDeque::from([literal]);

        while let Some(literal) = queue.pop_front() {
            let broken = -literal;
            let mut taken = self.watches.take_broken(broken).into_iter();
            let mut kept: Vec<ClauseKey> = Vec::default();

            while let Some(key) = taken.next() {
                let update = match self.clause_db.get_mut(&key) {
                    Ok(clause) => clause.find_legal_watch(broken, self.atom_db.valuation()),
                    Err(_) => {
                        log::error!(target: targets::PROPAGATION, "Missing clause {key} in watch list of {broken}");
                        kept.extend(taken);
                        self.watches.restore(broken, kept);
                        return Err(err::BCPError::CorruptWatch);
                    }
                };

                match update {
                    WatchUpdate::AlreadyTrue => kept.push(key),

                    WatchUpdate::Found(watch) => self.watches.watch(key, watch),

                    WatchUpdate::Unit(consequence) => {
                        kept.push(key);
                        log::trace!(target: targets::PROPAGATION, "{key} asserts {consequence}");
                        if self.record_assignment(consequence, Some(key)).is_err() {
                            kept.extend(taken);
                            self.watches.restore(broken, kept);
                            return Err(err::BCPError::CorruptWatch);
                        }
                        queue.push_back(consequence);
                    }

                    WatchUpdate::Conflict => {
                        log::trace!(target: targets::PROPAGATION, "Consequence of {key} and {literal} is contradiction");
                        kept.push(key);
                        kept.extend(taken);
                        self.watches.restore(broken, kept);
                        return Err(err::BCPError::Conflict(key));
                    }
                }
            }

            self.watches.restore(broken, kept);
        }

        Ok(())
    }
}
