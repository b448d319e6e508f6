/*!
(The internal representation of) an atom (aka. a 'variable').

Atoms are things with a name to which assigning a (boolean) value (true or false) is of interest.
- 'Internal' atoms are used within a context, and are the indices [0..*m*) for some *m*.
- 'External' atoms are the names used when interacting with a context, e.g. `p`, `q12`, or the name a propositional skeleton gives to some equality.

The association between internal and external atoms is kept in the [atom database](crate::db::atom).

This representation allows atoms to be used as the indicies of a structure, e.g. `valuation[a]`, and gives a fixed order on atoms.
The order is the order of first appearance, and is used to break ties between atoms of equal activity when making a decision.

```rust
# use otter_smt::structures::atom::Atom;
let atoms = (0..4).collect::<Vec<Atom>>();
assert_eq!(atoms.last(), Some(&3));
```

# Notes
In the SAT literature these are often called 'variables' while in the logic literature these are often called 'atoms'.
*/

/// An atom, aka. a 'variable'.
pub type Atom = u32;

/// The maximum instance of an atom.
pub const ATOM_MAX: Atom = Atom::MAX - 1;
