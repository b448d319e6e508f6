/*!
Reports for a context, and for the string entry points of [solvers](crate::solvers).
*/

use std::collections::BTreeMap;

use crate::context::ContextState;

/// High-level reports regarding a solve.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The formula of the context is satisfiable.
    Satisfiable,

    /// The formula of the context is unsatisfiable.
    Unsatisfiable,

    /// Satisfiability of the formula of the context is unknown, for some reason.
    Unknown,
}

impl From<ContextState> for Report {
    fn from(value: ContextState) -> Self {
        match value {
            ContextState::Input | ContextState::Solving => Self::Unknown,
            ContextState::Satisfiable => Self::Satisfiable,
            ContextState::Unsatisfiable => Self::Unsatisfiable,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A model, from external names to truth values.
pub type Model = BTreeMap<String, bool>;

/// The outcome of a solve through a string entry point.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The formula is satisfiable, on the model.
    Sat(Model),

    /// The formula is unsatisfiable.
    Unsat,

    /// Satisfiability is unknown, e.g. as a time limit was reached.
    Unknown,
}

impl Outcome {
    /// The report corresponding to the outcome.
    pub fn report(&self) -> Report {
        match self {
            Self::Sat(_) => Report::Satisfiable,
            Self::Unsat => Report::Unsatisfiable,
            Self::Unknown => Report::Unknown,
        }
    }

    /// The model, if the outcome is satisfiable.
    pub fn model(&self) -> Option<&Model> {
        match self {
            Self::Sat(model) => Some(model),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sat(_) => write!(f, "SAT"),
            Self::Unsat => write!(f, "UNSAT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
