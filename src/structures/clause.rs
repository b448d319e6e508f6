/*!
Clauses, aka. disjunctions of literals.

The canonical representation of a clause is a vector of literals, [CClause].
A single literal is also treated as a (unit) clause.

# Well formed clauses

A clause is well formed when:
- No atom appears in two literals of the clause.

In particular, a clause containing a literal and its negation is a tautology and is never stored.
See [ClauseOk] and [canonical](Clause::canonical) for the check made when a clause is added to a context.

```rust
# use otter_smt::structures::clause::{Clause, ClauseOk};
# use otter_smt::structures::literal::CLiteral;
let p = CLiteral::new(0, true);
let q = CLiteral::new(1, false);

assert_eq!(vec![p, q, p].canonical(), ClauseOk::Clause(vec![p, q]));
assert_eq!(vec![p, -p].canonical(), ClauseOk::Tautology);
```
*/

use crate::structures::{atom::Atom, literal::CLiteral};

/// The canonical representation of a clause.
pub type CClause = Vec<CLiteral>;

/// The result of putting a clause into canonical form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClauseOk {
    /// The clause, without duplicate literals.
    Clause(CClause),

    /// The clause contains some literal and its negation.
    Tautology,
}

/// Methods common to any representation of a clause.
pub trait Clause {
    /// An iterator over the literals of the clause, in order.
    fn literals(&self) -> impl Iterator<Item = &CLiteral>;

    /// The number of literals in the clause.
    fn size(&self) -> usize;

    /// An iterator over the atoms of the clause.
    fn atoms(&self) -> impl Iterator<Item = Atom> {
        self.literals().map(|literal| literal.atom())
    }

    /// The clause in canonical form.
    fn canonical(&self) -> ClauseOk {
        let mut clause: CClause = Vec::with_capacity(self.size());
        for literal in self.literals() {
            match clause.iter().find(|present| present.atom() == literal.atom()) {
                Some(present) if present.polarity() == literal.polarity() => {}
                Some(_) => return ClauseOk::Tautology,
                None => clause.push(*literal),
            }
        }
        ClauseOk::Clause(clause)
    }

    /// The clause as a string of DIMACS integers, terminated by zero.
    fn as_dimacs(&self) -> String {
        let mut the_string = String::default();
        for literal in self.literals() {
            the_string.push_str(&format!("{} ", literal.as_dimacs_int()));
        }
        the_string.push('0');
        the_string
    }
}

impl Clause for CClause {
    fn literals(&self) -> impl Iterator<Item = &CLiteral> {
        self.iter()
    }

    fn size(&self) -> usize {
        self.len()
    }
}

impl Clause for CLiteral {
    fn literals(&self) -> impl Iterator<Item = &CLiteral> {
        std::iter::once(self)
    }

    fn size(&self) -> usize {
        1
    }
}
