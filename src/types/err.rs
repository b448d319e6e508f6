//! Error types used in the library.
//!
//! - Most of these are very unlikely to occur during use.
//! - Some of these are internally expected --- e.g. BCP errors are used to control the flow of a solve.
//! - Some are external --- e.g. a parse error when reading a formula.
//!
//! Outcomes of a solve (satisfiable, unsatisfiable, unbounded, …) are never errors, and are instead reported through [reports](crate::reports) and [LpOutcome](crate::lp::LpOutcome).
//!
//! Names of the error enums --- for the most part --- overlap with corresponding structs.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

use crate::db::ClauseKey;

#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    Analysis(AnalysisError),
    AtomDB(AtomDBError),
    BCP(BCPError),
    ClauseDB(ClauseDBError),
    Parse(ParseError),
    Theory(TheoryError),
    Simplex(SimplexError),

    Backjump,
    InvalidState,
}

/// Noted errors during conflict analysis.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnalysisError {
    /// Somehow resolution resolved to an empty clause.
    EmptyResolution,

    /// Resolution failed to terminate with an asserting clause.
    NoAssertion,

    /// A propagated literal was found without a reason.
    MissingReason,

    /// Analysis was requested without any decision having been made.
    NoDecision,
}

impl From<AnalysisError> for ErrorKind {
    fn from(e: AnalysisError) -> Self {
        ErrorKind::Analysis(e)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AtomDBError {
    /// There are no more fresh atoms.
    AtomsExhausted,

    /// An atom was referenced which is not in the database.
    UnknownAtom,
}

impl From<AtomDBError> for ErrorKind {
    fn from(e: AtomDBError) -> Self {
        ErrorKind::AtomDB(e)
    }
}

/// Noted errors during boolean constraint propagation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BCPError {
    /// A conflict was found.
    /// This is expected from time to time, and a learning opportunity.
    Conflict(ClauseKey),

    /// Some corruption in the watched literals of a clause.
    /// This is unexpected.
    CorruptWatch,
}

impl From<BCPError> for ErrorKind {
    fn from(e: BCPError) -> Self {
        ErrorKind::BCP(e)
    }
}

/// Errors in the clause database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClauseDBError {
    /// A clause is missing.
    Missing,

    /// Some attempt was made to store an empty clause.
    EmptyClause,

    /// Some attempt was made to store a unit clause as a long clause.
    UnitClause,

    /// All possible keys have been used.
    StorageExhausted,
}

impl From<ClauseDBError> for ErrorKind {
    fn from(e: ClauseDBError) -> Self {
        ErrorKind::ClauseDB(e)
    }
}

/// Errors when reading a formula, clause, or DIMACS file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The input ended while more was expected.
    UnexpectedEnd,

    /// Some unexpected symbol at the given (character) position.
    UnexpectedSymbol(usize),

    /// A complete formula was read, though input remains from the given position.
    TrailingInput(usize),

    /// The formula is not in conjunctive normal form.
    NotCnf,

    /// A malformed problem line in a DIMACS file.
    ProblemSpecification,

    /// A malformed literal, on the given line of a DIMACS file or in a clause string.
    Literal(usize),

    /// A term which cannot be read as a linear arithmetic expression.
    NotLinear(String),

    /// A formula which cannot be read as a linear arithmetic constraint.
    NotArithmetic(String),
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

/// Errors raised by a theory solver.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TheoryError {
    /// The theory does not know of some atom.
    UnknownAtom(usize),

    /// A backtrack was requested to a level the theory has not reached.
    InvalidLevel,

    /// Some atom was asserted with both values, without a backtrack between the assertions.
    Reasserted(usize),
}

impl From<TheoryError> for ErrorKind {
    fn from(e: TheoryError) -> Self {
        ErrorKind::Theory(e)
    }
}

/// Errors raised by the simplex engine.
///
/// Unboundedness and infeasibility are outcomes, not errors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimplexError {
    /// Refactoring the basis found a (numerically) singular matrix.
    SingularBasis,

    /// The configured iteration limit was reached.
    IterationLimit,

    /// The auxiliary problem was found to be unbounded, which is not possible for sound input.
    AuxiliaryUnbounded,

    /// A constraint or objective referenced a column outside the problem.
    Dimension,
}

impl From<SimplexError> for ErrorKind {
    fn from(e: SimplexError) -> Self {
        ErrorKind::Simplex(e)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analysis(e) => write!(f, "analysis error: {e:?}"),
            Self::AtomDB(e) => write!(f, "atom database error: {e:?}"),
            Self::BCP(e) => write!(f, "propagation error: {e:?}"),
            Self::ClauseDB(e) => write!(f, "clause database error: {e:?}"),
            Self::Parse(e) => write!(f, "parse error: {e:?}"),
            Self::Theory(e) => write!(f, "theory error: {e:?}"),
            Self::Simplex(e) => write!(f, "simplex error: {e:?}"),
            Self::Backjump => write!(f, "backjump error"),
            Self::InvalidState => write!(f, "invalid state"),
        }
    }
}

impl std::error::Error for ErrorKind {}
