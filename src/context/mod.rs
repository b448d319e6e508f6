/*!
The context --- to which formulas are added and within which solves take place, etc.

Strictly, a [GenericContext] and a [Context].

The generic context is generic over the source of randomness used when making (random) decisions.
[from_config](Context::from_config) is implemented for a context rather than a generic context, to avoid requiring a source of randomness to be supplied alongside a config.

# Example
```rust
# use otter_smt::context::Context;
# use otter_smt::config::Config;
# use otter_smt::reports::Report;
# use otter_smt::structures::literal::CLiteral;
let mut the_context = Context::from_config(Config::default());

let p = the_context.fresh_or_max_literal();
let q = the_context.fresh_or_max_literal();

assert!(the_context.add_clause(vec![p, q]).is_ok());
assert!(the_context.add_clause(vec![-p]).is_ok());

assert!(the_context.solve().is_ok());
assert_eq!(the_context.report(), Report::Satisfiable);

assert_eq!(the_context.atom_db.value_of(p.atom()), Some(false));
assert_eq!(the_context.atom_db.value_of(q.atom()), Some(true));
```
*/

mod counters;
pub use counters::Counters;
mod generic;
pub use generic::GenericContext;

use rand::SeedableRng;

use crate::config::Config;

/// The state of a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextState {
    /// The context allows input.
    Input,

    /// The consistency of the database is unknown.
    Solving,

    /// The database is known to be consistent, e.g. with a complete valuation.
    Satisfiable,

    /// The database is known to be inconsistent, e.g. with a conflict found without any decision.
    Unsatisfiable,
}

impl std::fmt::Display for ContextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "Input"),
            Self::Solving => write!(f, "Solving"),
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
        }
    }
}

/// A context which uses [StdRng](rand::rngs::StdRng) as a source of randomness.
pub type Context = GenericContext<rand::rngs::StdRng>;

impl Context {
    /// A context with the given configuration, and a source of randomness with a fixed seed.
    pub fn from_config(config: Config) -> Self {
        Self::from_config_and_rng(config, rand::rngs::StdRng::seed_from_u64(0))
    }
}
