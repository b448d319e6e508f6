/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library, to help trace a solve.

No log implementation is provided by the library.
The cli installs [env_logger](https://docs.rs/env_logger) when built with the `log` feature, and so output may be filtered by target, e.g. `RUST_LOG=analysis=trace`.
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [BCP](crate::procedures::bcp)
    pub const PROPAGATION: &str = "propagation";

    /// Logs related to [analysis](crate::procedures::analysis)
    pub const ANALYSIS: &str = "analysis";

    /// Logs related to [backjumping](crate::procedures::backjump)
    pub const BACKJUMP: &str = "backjump";

    /// Logs related to [decisions](crate::procedures::decision)
    pub const DECISION: &str = "decision";

    /// Logs related to the [clause database](crate::db::clause)
    pub const CLAUSE_DB: &str = "clause_db";

    /// Logs related to a valuation
    pub const VALUATION: &str = "valuation";

    /// Logs related to formula transformations, e.g. [tseitin](crate::language::tseitin)
    pub const PREPROCESSING: &str = "preprocessing";

    /// Logs related to a [theory](crate::theory)
    pub const THEORY: &str = "theory";

    /// Logs related to the [DPLL(T) coordinator](crate::smt)
    pub const COORDINATOR: &str = "coordinator";

    /// Logs related to the [simplex engine](crate::lp)
    pub const SIMPLEX: &str = "simplex";
}
