/*!
A library for determining the satisfiability of formulas.

The library centers on a [context](crate::context), to which clauses are added and within which a CDCL solve takes place.
Around the context:
- [language] reads propositional and first-order formulas, and transforms propositional formulas to conjunctive normal form.
- [theory] gives theories of atoms, with [theory::euf] a congruence closure solver for equality with uninterpreted functions.
- [smt] combines a context with a theory, through a DPLL(T) coordinator.
- [lp] gives a revised simplex engine for linear programs, and uses the engine to decide linear arithmetic formulas.
- [solvers] gives string entry points to each of the above.

# Orientation

The library is designed around the core structure of a [context](crate::context).

Contexts are built with a [configuration](crate::config) and clauses may be added by reading a DIMACS file or through the [builder] methods.

Internally, and at a high level, a solve is viewed in terms of the manipulation of, and relationships between, a handful of databases:
- [The atom database](crate::db::atom), holding the valuation, the activity of each atom, and the external name of each atom.
- [The clause database](crate::db::clause), holding every clause of at least two literals, and a note of each unit clause.
- [Watch lists](crate::db::watches), holding for each literal the clauses which watch the literal.
- [The trail](crate::db::trail), holding the order of assignments and the decision levels.
- [The implication graph](crate::db::implication), holding the reason for each propagated literal.

And, the [procedures](crate::procedures) of a solve are implemented as methods on a context, which read from and write to these databases.

# Example

```rust
# use otter_smt::config::Config;
# use otter_smt::context::Context;
# use otter_smt::reports::Report;
let mut the_context = Context::from_config(Config::default());

let p = the_context.literal_from_string("p").unwrap();
let q = the_context.literal_from_string("q").unwrap();

assert!(the_context.add_clause(vec![p, -q]).is_ok());
assert!(the_context.add_clause(vec![-p, q]).is_ok());
assert!(the_context.add_clause(vec![-p, -q]).is_ok());

assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
assert_eq!(the_context.atom_db.value_of(p.atom()), Some(false));
assert_eq!(the_context.atom_db.value_of(q.atom()), Some(false));
```
*/

#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]

pub mod builder;
pub mod config;
pub mod context;
pub mod db;
pub mod generic;
pub mod language;
pub mod lp;
pub mod misc;
pub mod procedures;
pub mod reports;
pub mod smt;
pub mod solvers;
pub mod structures;
pub mod theory;
pub mod types;
