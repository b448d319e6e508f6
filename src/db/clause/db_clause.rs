/*!
A clause together with watched literals, as stored in the [clause database](crate::db::clause).

The watched literals of a clause are those at index 0 and index 1.
Updating a watch is done by swapping some other literal into one of these positions, so the content of a clause never changes, only the order of its literals.

# Watch invariant

So long as the clause is not satisfied, the two watched literals are either unvalued, or the clause is unit on the first watch, or the clause conflicts with the current valuation.
So, on any change to a valuation it suffices to examine clauses watching the literal which was made false.

[find_legal_watch](dbClause::find_legal_watch) is the method to call when a watched literal has been made false.
*/

use crate::{
    db::keys::ClauseKey,
    structures::{
        clause::{CClause, Clause},
        literal::CLiteral,
        valuation::{Valuation, ValuationStatus},
    },
};

/// The result of examining a clause after one of its watched literals has been made false.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchUpdate {
    /// The other watch satisfies the clause, and so the broken watch was kept.
    AlreadyTrue,

    /// The broken watch was replaced by the given literal, which is unvalued or true.
    Found(CLiteral),

    /// No replacement exists and the other watch is unvalued, so the clause asserts the given literal.
    Unit(CLiteral),

    /// No replacement exists and the other watch is false, so the clause conflicts with the valuation.
    Conflict,
}

/// A clause stored in the clause database.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct dbClause {
    key: ClauseKey,
    clause: CClause,
}

impl dbClause {
    /// Bundles a key and a clause of at least two literals.
    ///
    /// The literals at index 0 and 1 are taken as the initial watches, so the clause should be ordered with this in mind.
    pub fn new(key: ClauseKey, clause: CClause) -> Self {
        dbClause { key, clause }
    }

    pub fn key(&self) -> ClauseKey {
        self.key
    }

    /// The watched literals of the clause.
    pub fn watches(&self) -> (CLiteral, CLiteral) {
        (self.clause[0], self.clause[1])
    }

    /// The literals of the clause, in their current order.
    pub fn as_slice(&self) -> &[CLiteral] {
        &self.clause
    }

    /// Revises the watches of the clause given `broken` is a watched literal which is now false on `valuation`.
    ///
    /// After the call, `broken` (if kept) or its replacement is at index 1, and the other watch at index 0.
    pub fn find_legal_watch(&mut self, broken: CLiteral, valuation: &[Option<bool>]) -> WatchUpdate {
        if self.clause[0] == broken {
            self.clause.swap(0, 1);
        }
        debug_assert_eq!(self.clause[1], broken);

        let other = self.clause[0];
        if valuation.check_literal(other) == ValuationStatus::Set {
            return WatchUpdate::AlreadyTrue;
        }

        for index in 2..self.clause.len() {
            if valuation.check_literal(self.clause[index]) != ValuationStatus::Conflict {
                self.clause.swap(1, index);
                return WatchUpdate::Found(self.clause[1]);
            }
        }

        match valuation.check_literal(other) {
            ValuationStatus::None => WatchUpdate::Unit(other),
            _ => WatchUpdate::Conflict,
        }
    }
}

impl Clause for dbClause {
    fn literals(&self) -> impl Iterator<Item = &CLiteral> {
        self.clause.iter()
    }

    fn size(&self) -> usize {
        self.clause.len()
    }
}

impl std::fmt::Display for dbClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.clause.as_dimacs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause() -> dbClause {
        let literals = (0..3).map(|atom| CLiteral::new(atom, true)).collect();
        dbClause::new(ClauseKey::Original(0), literals)
    }

    #[test]
    fn replacement_found() {
        let mut clause = clause();
        let valuation = vec![Some(false), None, None];
        let broken = CLiteral::new(0, true);

        assert_eq!(
            clause.find_legal_watch(broken, &valuation),
            WatchUpdate::Found(CLiteral::new(2, true))
        );
        assert_eq!(clause.watches(), (CLiteral::new(1, true), CLiteral::new(2, true)));
    }

    #[test]
    fn unit_and_conflict() {
        let mut clause = clause();
        let valuation = vec![Some(false), None, Some(false)];
        let broken = CLiteral::new(0, true);
        assert_eq!(
            clause.find_legal_watch(broken, &valuation),
            WatchUpdate::Unit(CLiteral::new(1, true))
        );

        let mut clause = self::clause();
        let valuation = vec![Some(false), Some(false), Some(false)];
        assert_eq!(clause.find_legal_watch(broken, &valuation), WatchUpdate::Conflict);
    }

    #[test]
    fn satisfied_by_other_watch() {
        let mut clause = clause();
        let valuation = vec![Some(false), Some(true), None];
        let broken = CLiteral::new(0, true);
        assert_eq!(clause.find_legal_watch(broken, &valuation), WatchUpdate::AlreadyTrue);
    }
}
