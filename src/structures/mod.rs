//! Structures, independent of a context.
//!
//! - [atoms](atom), identified with natural numbers.
//! - [literals](literal), as an atom paired with a polarity.
//! - [clauses](clause), as vectors of literals.
//! - [valuations](valuation), as vectors of optional truth values.

pub mod atom;
pub mod clause;
pub mod literal;
pub mod valuation;
