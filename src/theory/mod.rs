/*!
Theories, as used by the [DPLL(T) coordinator](crate::smt).

A theory interprets some atoms of a context, and is told of the values of those atoms by the coordinator through [t_assert](Theory::t_assert).
Following this, [t_propagate](Theory::t_propagate) reports whether the asserted literals are consistent with the theory, and, if so, which further atoms are entailed.

Theories are incremental, with levels mirroring the decision levels of a context:
- [t_push](Theory::t_push) opens a fresh level, on which subsequent assertions are made.
- [t_backtrack](Theory::t_backtrack) discards every level above the given level, and every assertion made on those levels.

A conflict, or an entailed atom, is explained by [t_explain](Theory::t_explain) as a lemma: a clause of the form `¬e₁ ∨ … ∨ ¬eₖ ∨ a`, where each `eᵢ` is an asserted literal and `a` the entailed atom.
Lemmas are valid in the theory, and so may be added to a context as any other clause.

The only theory implemented is [equality with uninterpreted functions](crate::theory::euf).
*/

pub mod euf;

use crate::{
    db::LevelIndex,
    structures::{atom::Atom, clause::CClause, literal::CLiteral},
    types::err::{self},
};

/// The result of theory propagation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TheoryPropagation {
    /// The asserted literals are consistent, and no further atom is entailed.
    Consistent,

    /// The asserted literals are consistent, and entail the given atoms (each of which has not been asserted).
    Propagate(Vec<CLiteral>),

    /// The given literal was asserted, though its negation is entailed by the other asserted literals.
    Conflict(CLiteral),
}

/// The result of asserting an entailed atom in a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TheoryAssertion {
    /// The context already values the atom with the entailed value.
    AlreadySet,

    /// The context values the atom with the opposite value.
    Contradicts,

    /// The atom has been valued in the context.
    Set,
}

/// A theory, for use with the [DPLL(T) coordinator](crate::smt).
pub trait Theory {
    /// True if the theory interprets `atom`.
    fn is_theory_atom(&self, atom: Atom) -> bool;

    /// Asserts `literal` on the current level.
    fn t_assert(&mut self, literal: CLiteral) -> Result<(), err::TheoryError>;

    /// The consequences of the asserted literals.
    fn t_propagate(&mut self) -> TheoryPropagation;

    /// A lemma `¬e₁ ∨ … ∨ ¬eₖ ∨ a` where `a` is the atom of `literal` with positive polarity, and each `eᵢ` an asserted literal.
    ///
    /// The atom should be entailed by the asserted literals.
    fn t_explain(&self, literal: CLiteral) -> Result<CClause, err::TheoryError>;

    /// Opens a fresh level, returning the level.
    fn t_push(&mut self) -> LevelIndex;

    /// Discards every level above `level`.
    fn t_backtrack(&mut self, level: LevelIndex) -> Result<(), err::TheoryError>;

    /// The current level.
    fn t_level(&self) -> LevelIndex;
}
