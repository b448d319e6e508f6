/*!
A database of atom related things.

Things include:
- The external name of each atom, and a map from names to atoms.
- A valuation, and the decision level and trail position at which each atom was valued.
- The activity of each atom, on a max [heap](crate::generic::index_heap).

# Activity

Activity follows VSIDS:
- Each time a clause is processed (added as an original clause, learnt, or given as a lemma) the activity of each atom in the clause is bumped.
- Each time a clause is learnt, the activity of every atom is decayed (by default, halved).

Ties in activity are broken in favour of the atom which first appeared earlier, as the heap orders (activity, reversed atom) pairs.

Atoms without a value are always on the heap, while atoms with a value may be on the heap.
So, the most active atom without a value is found by popping atoms until an atom without a value is found, and an atom is returned to the heap whenever its value is cleared.
*/

use std::{cmp::Reverse, collections::HashMap};

use crate::{
    config::Activity,
    db::LevelIndex,
    generic::index_heap::IndexHeap,
    misc::log::targets::{self},
    structures::{
        atom::{Atom, ATOM_MAX},
        literal::CLiteral,
        valuation::{CValuation, Valuation},
    },
    types::err::{self},
};

/// The value stored on the activity heap.
type ActivityKey = (Activity, Reverse<Atom>);

/// The atom database.
#[derive(Default)]
pub struct AtomDB {
    names: Vec<String>,
    atoms: HashMap<String, Atom>,

    valuation: CValuation,
    levels: Vec<Option<LevelIndex>>,
    positions: Vec<Option<usize>>,

    activity_heap: IndexHeap<ActivityKey>,
}

impl AtomDB {
    /// A fresh atom with the given name, or the existing atom with the name.
    pub fn fresh_or_get(&mut self, name: &str) -> Result<Atom, err::AtomDBError> {
        match self.atoms.get(name) {
            Some(atom) => Ok(*atom),
            None => self.fresh_atom(name.to_owned()),
        }
    }

    /// A fresh atom with the given name.
    ///
    /// If the name is already in use the name is shadowed, and refers to the fresh atom.
    pub fn fresh_atom(&mut self, name: String) -> Result<Atom, err::AtomDBError> {
        let atom = match Atom::try_from(self.names.len()) {
            Ok(atom) if atom <= ATOM_MAX => atom,
            _ => return Err(err::AtomDBError::AtomsExhausted),
        };

        self.atoms.insert(name.clone(), atom);
        self.names.push(name);
        self.valuation.push(None);
        self.levels.push(None);
        self.positions.push(None);

        self.activity_heap
            .add(atom as usize, (Activity::default(), Reverse(atom)));
        self.activity_heap.activate(atom as usize);

        Ok(atom)
    }

    /// A count of atoms in the database.
    pub fn count(&self) -> usize {
        self.names.len()
    }

    /// The atom with the given name, if any.
    pub fn atom_of(&self, name: &str) -> Option<Atom> {
        self.atoms.get(name).copied()
    }

    /// The name of an atom.
    pub fn name_of(&self, atom: Atom) -> Option<&str> {
        self.names.get(atom as usize).map(|name| name.as_str())
    }

    /// The value of an atom, if any.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        self.valuation.value_of(atom)
    }

    /// The level at which an atom was valued, if any.
    pub fn level_of(&self, atom: Atom) -> Option<LevelIndex> {
        self.levels.get(atom as usize).copied().flatten()
    }

    /// The position on the trail at which an atom was valued, if any.
    pub fn position_of(&self, atom: Atom) -> Option<usize> {
        self.positions.get(atom as usize).copied().flatten()
    }

    /// The valuation.
    pub fn valuation(&self) -> &[Option<bool>] {
        &self.valuation
    }

    /// Values the atom of `literal` with the polarity of `literal`.
    pub fn set_value(&mut self, literal: CLiteral, level: LevelIndex, position: usize) {
        let index = literal.atom() as usize;
        log::trace!(target: targets::VALUATION, "Set {literal} at level {level}");
        self.valuation[index] = Some(literal.polarity());
        self.levels[index] = Some(level);
        self.positions[index] = Some(position);
    }

    /// Clears the value of an atom, and returns the atom to the activity heap.
    pub fn drop_value(&mut self, atom: Atom) {
        let index = atom as usize;
        log::trace!(target: targets::VALUATION, "Cleared {atom}");
        self.valuation[index] = None;
        self.levels[index] = None;
        self.positions[index] = None;
        self.activity_heap.activate(index);
    }

    /// Adds `bump` to the activity of an atom.
    pub fn bump_activity(&mut self, atom: Atom, bump: Activity) {
        self.activity_heap
            .apply_to_value(atom as usize, |(activity, atom)| (activity + bump, *atom));
    }

    /// Multiplies the activity of every atom by `factor`.
    ///
    /// As the factor is uniform, the order of the heap is unchanged.
    pub fn decay_activity(&mut self, factor: Activity) {
        self.activity_heap
            .apply_to_all(|(activity, atom)| (activity * factor, *atom));
    }

    /// The activity of an atom.
    pub fn activity_of(&self, atom: Atom) -> Activity {
        self.activity_heap.value_at(atom as usize).0
    }

    /// The most active atom without a value, if any.
    ///
    /// Atoms with a value found on the heap are removed from the heap.
    pub fn most_active_unvalued(&mut self) -> Option<Atom> {
        while let Some(index) = self.activity_heap.peek_max() {
            let atom = index as Atom;
            match self.valuation.value_of(atom) {
                None => return Some(atom),
                Some(_) => {
                    self.activity_heap.remove(index);
                }
            }
        }
        None
    }

    /// A string of the valuation, using external names and a leading '-' for false.
    pub fn valuation_string(&self) -> String {
        self.valuation
            .iter()
            .enumerate()
            .filter_map(|(atom, value)| {
                let name = &self.names[atom];
                value.map(|v| match v {
                    true => name.to_string(),
                    false => format!("-{name}"),
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
