use crate::structures::literal::CLiteral;

/// The index to a clause.
pub type FormulaIndex = u32;

/// A key to access a clause stored in the clause database.
///
/// Clauses of two or more literals are stored in vectors, and keys contain the index to the clause.
/// As clauses are never removed, an index is never reused.
///
/// The exception to this is unit clauses, which are not stored.
/// Instead, the key contains the (unit) clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClauseKey {
    /// The key to a unit clause contains the (unit) clause.
    OriginalUnit(CLiteral),

    /// The key to a unit clause contains the (unit) clause.
    AdditionUnit(CLiteral),

    /// The key to an original clause.
    Original(FormulaIndex),

    /// The key to an addition, either a learnt clause or a theory lemma.
    Addition(FormulaIndex),
}

impl ClauseKey {
    /// Extracts the index from a key.
    pub fn index(&self) -> usize {
        match self {
            Self::OriginalUnit(literal) | Self::AdditionUnit(literal) => literal.atom() as usize,
            Self::Original(index) | Self::Addition(index) => *index as usize,
        }
    }

    /// True if the key is to a unit clause.
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::OriginalUnit(_) | Self::AdditionUnit(_))
    }
}

impl std::fmt::Display for ClauseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OriginalUnit(literal) => write!(f, "OriginalUnit({literal})"),
            Self::AdditionUnit(literal) => write!(f, "AdditionUnit({literal})"),
            Self::Original(index) => write!(f, "Original({index})"),
            Self::Addition(index) => write!(f, "Addition({index})"),
        }
    }
}
