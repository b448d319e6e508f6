/*!
Tools for building a context.

# Atoms and literals

Atoms are created through [fresh_atom](crate::context::GenericContext::fresh_atom), with a name, or [fresh_or_max_literal](crate::context::GenericContext::fresh_or_max_literal), named by the DIMACS representation of the atom.

Literals and clauses may also be read from strings, with a leading '-' for a negative literal.

# Clauses

Clauses are added through [add_clause](crate::context::GenericContext::add_clause), or read from a DIMACS file through [read_dimacs](crate::context::GenericContext::read_dimacs).
Formulas in the syntax of [propositional formulas](crate::language::propositional) are added through the Tseitin transformation, see [solvers](crate::solvers).

```rust
# use otter_smt::context::Context;
# use otter_smt::config::Config;
# use otter_smt::reports::Report;
# use otter_smt::structures::clause::ClauseOk;
let mut the_context = Context::from_config(Config::default());
let p = the_context.fresh_or_max_literal();

assert_eq!(the_context.add_clause(vec![p, -p]), Ok(ClauseOk::Tautology));
assert_eq!(the_context.add_clause(vec![p, p]), Ok(ClauseOk::Clause(vec![p])));
assert!(the_context.add_clause(vec![-p]).is_ok());

assert_eq!(the_context.report(), Report::Unsatisfiable);
```
*/

mod dimacs;
pub use dimacs::DimacsCounts;
mod structures;
