//! Configuration of the [simplex engine](crate::lp).

use super::ConfigOption;

/// Configuration of the revised simplex engine.
#[derive(Clone, Debug)]
pub struct SimplexConfig {
    /// The number of eta matrices permitted before the basis is refactored.
    pub eta_limit: ConfigOption<usize>,

    /// Pivot elements with magnitude below this are avoided, if some alternative exists.
    pub pivot_tolerance: ConfigOption<f64>,

    /// Reduced costs, ratios, and residuals within this of zero are treated as zero.
    pub feasibility_tolerance: ConfigOption<f64>,

    /// Use Bland's rule from the first iteration, rather than after the anti-cycling bound.
    pub bland_from_start: ConfigOption<bool>,

    /// An optional bound on the number of pivots made in a single solve.
    pub iteration_limit: Option<usize>,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        SimplexConfig {
            eta_limit: ConfigOption {
                name: "eta_limit",
                min: 0,
                max: usize::MAX,
                value: 10,
            },

            pivot_tolerance: ConfigOption {
                name: "pivot_tolerance",
                min: 0.0,
                max: 1.0,
                value: 1e-11,
            },

            feasibility_tolerance: ConfigOption {
                name: "feasibility_tolerance",
                min: 0.0,
                max: 1.0,
                value: 1e-9,
            },

            bland_from_start: ConfigOption {
                name: "bland",
                min: false,
                max: true,
                value: false,
            },

            iteration_limit: None,
        }
    }
}
