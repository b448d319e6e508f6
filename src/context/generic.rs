use std::collections::BTreeMap;

use crate::{
    config::Config,
    db::{
        atom::AtomDB, clause::ClauseDB, implication::ImplicationGraph, trail::Trail,
        watches::Watches,
    },
    reports::Report,
    structures::{clause::CClause, valuation::Valuation},
};

use super::{ContextState, Counters};

/// A generic context, parameratised to a source of randomness.
///
/// # Example
///
/// ```rust
/// # use otter_smt::context::GenericContext;
/// # use otter_smt::config::Config;
/// # use rand::SeedableRng;
/// let rng = rand::rngs::StdRng::seed_from_u64(7);
/// let context = GenericContext::from_config_and_rng(Config::default(), rng);
/// ```
pub struct GenericContext<R: rand::Rng> {
    /// The configuration of a context.
    pub config: Config,

    /// Counters related to a context/solve.
    pub counters: Counters,

    /// The atom database.
    /// See [db::atom](crate::db::atom) for details.
    pub atom_db: AtomDB,

    /// The clause database.
    /// See [db::clause](crate::db::clause) for details.
    pub clause_db: ClauseDB,

    /// Watch lists for each atom.
    /// See [db::watches](crate::db::watches) for details.
    pub watches: Watches,

    /// The trail of assignments.
    /// See [db::trail](crate::db::trail) for details.
    pub trail: Trail,

    /// The implication graph.
    /// See [db::implication](crate::db::implication) for details.
    pub implication_graph: ImplicationGraph,

    /// The status of the context.
    pub state: ContextState,

    /// The source of rng.
    pub rng: R,
}

impl<R: rand::Rng> GenericContext<R> {
    /// A context with the given configuration and source of randomness.
    pub fn from_config_and_rng(config: Config, rng: R) -> Self {
        GenericContext {
            config,
            counters: Counters::default(),
            atom_db: AtomDB::default(),
            clause_db: ClauseDB::default(),
            watches: Watches::default(),
            trail: Trail::default(),
            implication_graph: ImplicationGraph::default(),
            state: ContextState::Input,
            rng,
        }
    }

    /// A report on the state of the context.
    pub fn report(&self) -> Report {
        Report::from(self.state)
    }

    /// The valuation, keyed by the external name of each atom.
    ///
    /// Only valued atoms are included.
    pub fn model(&self) -> BTreeMap<String, bool> {
        (0..self.atom_db.count())
            .filter_map(|index| {
                let atom = index as crate::structures::atom::Atom;
                let value = self.atom_db.valuation().value_of(atom)?;
                let name = self.atom_db.name_of(atom)?;
                Some((name.to_owned(), value))
            })
            .collect()
    }

    /// True if every clause in `clauses` has some literal true on the current valuation.
    pub fn satisfies(&self, clauses: impl IntoIterator<Item = CClause>) -> bool {
        clauses.into_iter().all(|clause| {
            clause
                .iter()
                .any(|literal| self.atom_db.value_of(literal.atom()) == Some(literal.polarity()))
        })
    }
}
