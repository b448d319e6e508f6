/*!
The watch index, from literals to the clauses watching them.

For every atom there is a [WatchDB] with two lists:
- Clauses watching the atom with a positive literal, i.e. a literal satisfied when the atom is valued true.
- Clauses watching the atom with a negative literal, i.e. a literal satisfied when the atom is valued false.

A clause appears in exactly the two lists corresponding to its two watched literals.
Unit clauses are not stored, and so do not appear in any list.

When an atom is valued, the clauses watching the literal made false are taken through [take_broken](Watches::take_broken).
Each is then examined, and either returned to the list or moved to the list of its new watch.

The lengths of the lists are also used as a (static) polarity heuristic when making a decision.
*/

use crate::{
    db::keys::ClauseKey,
    structures::{atom::Atom, literal::CLiteral},
};

/// The watch lists for a single atom.
#[derive(Default)]
pub struct WatchDB {
    positive: Vec<ClauseKey>,
    negative: Vec<ClauseKey>,
}

impl WatchDB {
    fn list_mut(&mut self, polarity: bool) -> &mut Vec<ClauseKey> {
        match polarity {
            true => &mut self.positive,
            false => &mut self.negative,
        }
    }

    /// The number of clauses watching the atom with the given polarity.
    pub fn count(&self, polarity: bool) -> usize {
        match polarity {
            true => self.positive.len(),
            false => self.negative.len(),
        }
    }
}

/// Watch lists, indexed by atom.
#[derive(Default)]
pub struct Watches {
    dbs: Vec<WatchDB>,
}

impl Watches {
    /// Extends the index to include `atom`.
    pub fn fresh_atom(&mut self, atom: Atom) {
        while self.dbs.len() <= atom as usize {
            self.dbs.push(WatchDB::default());
        }
    }

    /// Notes `key` as watching `literal`.
    pub fn watch(&mut self, key: ClauseKey, literal: CLiteral) {
        self.fresh_atom(literal.atom());
        self.dbs[literal.atom() as usize]
            .list_mut(literal.polarity())
            .push(key);
    }

    /// Takes (and clears) the list of clauses watching `literal`, given `literal` has been made false.
    ///
    /// Every clause taken must be returned to some list, through [watch](Watches::watch) or [restore](Watches::restore).
    pub fn take_broken(&mut self, literal: CLiteral) -> Vec<ClauseKey> {
        match self.dbs.get_mut(literal.atom() as usize) {
            Some(db) => std::mem::take(db.list_mut(literal.polarity())),
            None => Vec::default(),
        }
    }

    /// Returns clauses which still watch `literal` to the list of `literal`.
    pub fn restore(&mut self, literal: CLiteral, mut keys: Vec<ClauseKey>) {
        self.fresh_atom(literal.atom());
        let list = self.dbs[literal.atom() as usize].list_mut(literal.polarity());
        keys.append(list);
        *list = keys;
    }

    /// The watch lists of `atom`.
    pub fn db(&self, atom: Atom) -> Option<&WatchDB> {
        self.dbs.get(atom as usize)
    }

    /// True if `key` is in the list of `literal`.
    pub fn is_watching(&self, key: ClauseKey, literal: CLiteral) -> bool {
        self.dbs.get(literal.atom() as usize).is_some_and(|db| match literal.polarity() {
            true => db.positive.contains(&key),
            false => db.negative.contains(&key),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_watches_are_taken() {
        let mut watches = Watches::default();
        let p = CLiteral::new(0, true);
        let q = CLiteral::new(1, false);
        watches.watch(ClauseKey::Original(0), p);
        watches.watch(ClauseKey::Original(0), q);
        watches.watch(ClauseKey::Original(1), p);

        assert_eq!(watches.db(0).map(|db| db.count(true)), Some(2));
        assert!(watches.is_watching(ClauseKey::Original(0), q));
        assert!(!watches.is_watching(ClauseKey::Original(1), -p));

        let broken = watches.take_broken(p);
        assert_eq!(broken.len(), 2);
        assert!(!watches.is_watching(ClauseKey::Original(0), p));

        watches.restore(p, vec![ClauseKey::Original(1)]);
        assert!(watches.is_watching(ClauseKey::Original(1), p));
        assert_eq!(watches.db(0).map(|db| db.count(true)), Some(1));
    }
}
