/*!
Valuations, aka. (partial) functions from atoms to truth values.

The canonical representation is a vector of optional booleans, indexed by atoms.
*/

use crate::structures::{atom::Atom, literal::CLiteral};

/// The canonical representation of a valuation.
pub type CValuation = Vec<Option<bool>>;

/// The status of a literal relative to a valuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValuationStatus {
    /// The atom of the literal has no value.
    None,

    /// The atom of the literal has the value of the literal's polarity.
    Set,

    /// The atom of the literal has the value opposite to the literal's polarity.
    Conflict,
}

/// Methods for valuations.
pub trait Valuation {
    /// The value of an atom, if any.
    fn value_of(&self, atom: Atom) -> Option<bool>;

    /// An iterator over atoms without a value, in order.
    fn unvalued_atoms(&self) -> impl Iterator<Item = Atom>;

    /// The status of a literal on the valuation.
    fn check_literal(&self, literal: CLiteral) -> ValuationStatus {
        match self.value_of(literal.atom()) {
            None => ValuationStatus::None,
            Some(value) if value == literal.polarity() => ValuationStatus::Set,
            Some(_) => ValuationStatus::Conflict,
        }
    }
}

impl Valuation for [Option<bool>] {
    fn value_of(&self, atom: Atom) -> Option<bool> {
        self.get(atom as usize).copied().flatten()
    }

    fn unvalued_atoms(&self) -> impl Iterator<Item = Atom> {
        self.iter()
            .enumerate()
            .filter(|(_, value)| value.is_none())
            .map(|(atom, _)| atom as Atom)
    }
}
