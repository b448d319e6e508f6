/*!
Configuration of a context, and of the simplex engine.

All configuration for a context is contained within the context, and the [SMT coordinator](crate::smt) reads the configuration of the context it wraps.

```rust
# use otter_smt::config::Config;
let mut config = Config::default();
assert!(config.random_decision_bias.set(0.25));
assert!(!config.activity_decay.set(2.0));
config.time_limit = Some(std::time::Duration::from_secs(10));
```
*/

mod config_option;
pub use config_option::ConfigOption;

mod simplex;
pub use simplex::SimplexConfig;

/// Activity values, as used by VSIDS.
pub type Activity = f64;

/// The primary configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// The amount added to the activity of an atom each time it appears in a processed clause.
    pub activity_bump: ConfigOption<Activity>,

    /// The factor applied to the activity of every atom each time a clause is learnt.
    ///
    /// The default of one half gives the halving of VSIDS.
    pub activity_decay: ConfigOption<Activity>,

    /// The probability of choosing a random atom without a value, rather than the most active atom, when making a decision.
    pub random_decision_bias: ConfigOption<f64>,

    /// The time limit for a solve, if any.
    pub time_limit: Option<std::time::Duration>,

    /// Configuration of the simplex engine.
    pub simplex: SimplexConfig,
}

impl Default for Config {
    /// The default context is configured to provide deterministic results.
    fn default() -> Self {
        Config {
            activity_bump: ConfigOption {
                name: "activity_bump",
                min: 0.0,
                max: Activity::MAX,
                value: 1.0,
            },

            activity_decay: ConfigOption {
                name: "activity_decay",
                min: 0.0,
                max: 1.0,
                value: 0.5,
            },

            random_decision_bias: ConfigOption {
                name: "random_decision_bias",
                min: 0.0,
                max: 1.0,
                value: 0.0,
            },

            time_limit: None,

            simplex: SimplexConfig::default(),
        }
    }
}
