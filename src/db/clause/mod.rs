/*!
A database of clauses.

Clauses are distinguished by their source:
- *Original* clauses are part of the formula whose satisfiability is to be determined.
- *Additions* are clauses added during a solve, either learnt through conflict analysis or given as a lemma by a theory.
  Every addition is a consequence of the original clauses, together with the theory, if any.

Clauses of two or more literals are stored and accessed through a [ClauseKey].
Unit clauses are not stored as clauses, and instead their (single) literal is recorded so the formula may be recovered.
No clause is ever removed.

```rust,ignore
let key = self.clause_db.store(clause, ClauseSource::Addition)?;
let stored = self.clause_db.get(&key)?;
```
*/

pub mod db_clause;

use crate::{
    db::keys::{ClauseKey, FormulaIndex},
    misc::log::targets::{self},
    structures::{
        clause::{CClause, Clause},
        literal::CLiteral,
    },
    types::err::{self},
};

use db_clause::dbClause;

/// The source of a clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseSource {
    /// Part of the formula.
    Original,

    /// Added during a solve.
    Addition,
}

/// The clause database.
#[derive(Default)]
pub struct ClauseDB {
    original: Vec<dbClause>,
    addition: Vec<dbClause>,

    original_units: Vec<CLiteral>,
    addition_units: Vec<CLiteral>,
}

impl ClauseDB {
    /// Stores a clause of at least two literals, returning the key to the clause.
    pub fn store(
        &mut self,
        clause: CClause,
        source: ClauseSource,
    ) -> Result<ClauseKey, err::ClauseDBError> {
        match clause.len() {
            0 => return Err(err::ClauseDBError::EmptyClause),
            1 => return Err(err::ClauseDBError::UnitClause),
            _ => {}
        }

        let (store, make_key): (&mut Vec<dbClause>, fn(FormulaIndex) -> ClauseKey) = match source {
            ClauseSource::Original => (&mut self.original, ClauseKey::Original),
            ClauseSource::Addition => (&mut self.addition, ClauseKey::Addition),
        };

        let Ok(index) = FormulaIndex::try_from(store.len()) else {
            return Err(err::ClauseDBError::StorageExhausted);
        };
        let key = make_key(index);
        log::trace!(target: targets::CLAUSE_DB, "Stored {key}: {}", clause.as_dimacs());
        store.push(dbClause::new(key, clause));
        Ok(key)
    }

    /// Notes a unit clause, returning the key to the clause.
    pub fn note_unit(&mut self, literal: CLiteral, source: ClauseSource) -> ClauseKey {
        match source {
            ClauseSource::Original => {
                self.original_units.push(literal);
                ClauseKey::OriginalUnit(literal)
            }
            ClauseSource::Addition => {
                self.addition_units.push(literal);
                ClauseKey::AdditionUnit(literal)
            }
        }
    }

    /// The stored clause with the given key.
    ///
    /// Unit clauses are not stored, and so requesting a unit key is an error.
    pub fn get(&self, key: &ClauseKey) -> Result<&dbClause, err::ClauseDBError> {
        let stored = match key {
            ClauseKey::Original(index) => self.original.get(*index as usize),
            ClauseKey::Addition(index) => self.addition.get(*index as usize),
            ClauseKey::OriginalUnit(_) | ClauseKey::AdditionUnit(_) => None,
        };
        stored.ok_or(err::ClauseDBError::Missing)
    }

    /// The stored clause with the given key, mutably.
    pub fn get_mut(&mut self, key: &ClauseKey) -> Result<&mut dbClause, err::ClauseDBError> {
        let stored = match key {
            ClauseKey::Original(index) => self.original.get_mut(*index as usize),
            ClauseKey::Addition(index) => self.addition.get_mut(*index as usize),
            ClauseKey::OriginalUnit(_) | ClauseKey::AdditionUnit(_) => None,
        };
        stored.ok_or(err::ClauseDBError::Missing)
    }

    /// The literals of the clause with the given key, including unit clauses.
    pub fn literals_of(&self, key: &ClauseKey) -> Result<CClause, err::ClauseDBError> {
        match key {
            ClauseKey::OriginalUnit(literal) | ClauseKey::AdditionUnit(literal) => Ok(vec![*literal]),
            _ => Ok(self.get(key)?.as_slice().to_vec()),
        }
    }

    /// An iterator over the original clauses, including unit clauses.
    pub fn original_clauses(&self) -> impl Iterator<Item = CClause> + '_ {
        self.original_units
            .iter()
            .map(|literal| vec![*literal])
            .chain(self.original.iter().map(|clause| clause.as_slice().to_vec()))
    }

    /// An iterator over the additions, including unit clauses.
    pub fn addition_clauses(&self) -> impl Iterator<Item = CClause> + '_ {
        self.addition_units
            .iter()
            .map(|literal| vec![*literal])
            .chain(self.addition.iter().map(|clause| clause.as_slice().to_vec()))
    }

    /// A count of original clauses, including unit clauses.
    pub fn original_count(&self) -> usize {
        self.original.len() + self.original_units.len()
    }

    /// A count of additions, including unit clauses.
    pub fn addition_count(&self) -> usize {
        self.addition.len() + self.addition_units.len()
    }
}
