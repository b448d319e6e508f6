/*!
Literals, as an atom paired with a polarity.

A literal with polarity true is satisfied by valuing its atom true, and a literal with polarity false is satisfied by valuing its atom false.

```rust
# use otter_smt::structures::literal::CLiteral;
let p = CLiteral::new(3, true);
assert_eq!(-p, CLiteral::new(3, false));
assert_eq!(format!("{}", -p), "-3");
```
*/

use crate::structures::atom::Atom;

/// The canonical representation of a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CLiteral {
    /// The atom of a literal.
    atom: Atom,

    /// The polarity of a literal.
    polarity: bool,
}

impl CLiteral {
    pub fn new(atom: Atom, polarity: bool) -> Self {
        Self { atom, polarity }
    }

    /// The atom of a literal.
    pub fn atom(&self) -> Atom {
        self.atom
    }

    /// The polarity of a literal.
    pub fn polarity(&self) -> bool {
        self.polarity
    }

    /// The literal with the same atom and opposite polarity.
    pub fn negate(&self) -> Self {
        Self {
            atom: self.atom,
            polarity: !self.polarity,
        }
    }

    /// The literal as a signed integer, following the DIMACS convention with atoms offset by one.
    pub fn as_dimacs_int(&self) -> isize {
        let atom = self.atom as isize + 1;
        match self.polarity {
            true => atom,
            false => -atom,
        }
    }
}

impl std::ops::Neg for CLiteral {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl std::fmt::Display for CLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.polarity {
            true => write!(f, "{}", self.atom),
            false => write!(f, "-{}", self.atom),
        }
    }
}
