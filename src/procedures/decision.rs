/*!
Methods for choosing the value of an atom.

# Overview

A decision is to value some atom *a* with value *v*, represented as the literal with atom *a* and polarity *v*.

# Heuristics

## Activity

The atom chosen is the atom without a value with the highest activity, with ties broken in favour of the atom which first appeared earlier.
See [db::atom](crate::db::atom) for details on activity.

```rust,ignore
let atom = self.atom_db.most_active_unvalued()?;
```

## Polarity

The polarity chosen is true if more clauses watch the atom positively than negatively, and false otherwise.
This is static, in that the polarity of an atom depends only on the watch index at the time of the decision.

## Randomness

With probability [random_decision_bias](crate::config::Config::random_decision_bias) some atom without a value is chosen at random in place of the most active atom.
The default bias is zero, and so decisions are deterministic by default.
*/

use rand::seq::IteratorRandom;

use crate::{
    context::GenericContext,
    misc::log::targets::{self},
    structures::{literal::CLiteral, valuation::Valuation},
};

/// Possible results from choosing a truth value to assign an atom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionOk {
    /// Some truth value was chosen for some atom.
    Literal(CLiteral),

    /// All atoms had already been assigned truth values, so no decision could be made.
    Exhausted,
}

/// Methods related to making decisions.
impl<R: rand::Rng> GenericContext<R> {
    /// Chooses an atom without a value and a polarity for the atom.
    ///
    /// The decision is not recorded, and a level should be opened before the decision is recorded.
    ///
    /// ```rust,ignore
    /// match self.make_decision() {
    ///     DecisionOk::Literal(decision) => {
    ///         self.trail.open_level();
    ///         self.record_assignment(decision, None)?;
    ///     }
    ///     DecisionOk::Exhausted => break,
    /// }
    /// ```
    pub fn make_decision(&mut self) -> DecisionOk {
        let bias = self.config.random_decision_bias.value;
        let chosen_atom = match bias > 0.0 && self.rng.gen_bool(bias) {
            true => self
                .atom_db
                .valuation()
                .unvalued_atoms()
                .choose(&mut self.rng),
            false => self.atom_db.most_active_unvalued(),
        };

        match chosen_atom {
            None => DecisionOk::Exhausted,

            Some(atom) => {
                self.counters.total_decisions += 1;

                let polarity = self
                    .watches
                    .db(atom)
                    .is_some_and(|db| db.count(true) > db.count(false));
                let decision = CLiteral::new(atom, polarity);

                log::trace!(target: targets::DECISION, "Decision {decision}");
                DecisionOk::Literal(decision)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::config::Config;

    #[test]
    fn random_decisions_take_unvalued_atoms() {
        let mut config = Config::default();
        config.random_decision_bias.value = 1.0;
        let mut the_context = GenericContext::from_config_and_rng(config, StdRng::seed_from_u64(0));
        let literals = the_context.fresh_or_max_literals(4);

        for _ in 0..literals.len() {
            let DecisionOk::Literal(decision) = the_context.make_decision() else {
                panic!("unvalued atoms remain");
            };
            assert_eq!(the_context.atom_db.value_of(decision.atom()), None);
            the_context.trail.open_level();
            the_context.record_assignment(decision, None).unwrap();
        }

        assert_eq!(the_context.make_decision(), DecisionOk::Exhausted);
        assert_eq!(the_context.counters.total_decisions, 4);
    }
}
