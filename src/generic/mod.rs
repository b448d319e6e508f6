//! Generic structures, independent of satisfiability.

pub mod index_heap;
