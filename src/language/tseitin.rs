/*!
Translation of propositional formulas to clauses.

# Tseitin

[tseitin] translates an arbitrary formula to an equisatisfiable set of clauses:

1. Constants are folded away, so the formula is either a constant or contains no constant.
2. Each binary subformula receives a fresh representative variable, with equal subformulas sharing a representative, and a negation is represented by the negated literal of its operand.
3. The definition `r <-> (a ∘ b)` of each representative is expanded to (at most four) clauses.
4. The literal representing the whole formula is asserted as a unit clause.

Fresh names are drawn from a [FreshNames](crate::language::names::FreshNames) which avoids every variable of the formula.

# Direct CNF

[cnf_of] reads a formula which is already a conjunction of disjunctions of literals (with constants permitted) without introducing any fresh variable.

# Preprocessing

In either case the resulting clauses are preprocessed: duplicate literals are removed, tautologous clauses are dropped, and constant truth values are detected.
So, the result is a [Cnf], either a constant or a non-empty collection of non-empty clauses.

```rust
# use otter_smt::language::{names::FreshNames, propositional::Formula, tseitin::{self, Cnf}};
let mut names = FreshNames::default();

let formula = Formula::parse("((p|~p)|q)").unwrap();
assert_eq!(tseitin::cnf_of(&formula), Ok(Cnf::True));

let formula = Formula::parse("(p&F)").unwrap();
assert_eq!(tseitin::tseitin(&formula, &mut names), Cnf::False);

let formula = Formula::parse("(p->q)").unwrap();
let Cnf::Clauses(clauses) = tseitin::tseitin(&formula, &mut names) else { panic!() };
assert_eq!(clauses.len(), 4);
```
*/

use std::collections::{BTreeSet, HashMap};

use crate::{
    language::{
        names::FreshNames,
        propositional::{Connective, Formula},
    },
    types::err::{self},
};

/// A literal of some named variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedLiteral {
    pub name: String,
    pub polarity: bool,
}

impl NamedLiteral {
    pub fn new(name: &str, polarity: bool) -> Self {
        NamedLiteral {
            name: name.to_owned(),
            polarity,
        }
    }
}

impl std::ops::Neg for NamedLiteral {
    type Output = NamedLiteral;

    fn neg(self) -> Self::Output {
        NamedLiteral {
            name: self.name,
            polarity: !self.polarity,
        }
    }
}

impl std::fmt::Display for NamedLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.polarity {
            true => write!(f, "{}", self.name),
            false => write!(f, "-{}", self.name),
        }
    }
}

/// A clause of named literals.
pub type NamedClause = Vec<NamedLiteral>;

/// A formula in conjunctive normal form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cnf {
    /// The formula is true on every valuation.
    True,

    /// The formula is false on every valuation.
    False,

    /// A non-empty conjunction of non-empty, non-tautologous clauses.
    Clauses(Vec<NamedClause>),
}

impl Cnf {
    /// From some clauses, removing duplicate literals and tautologies.
    pub fn preprocess(clauses: impl IntoIterator<Item = NamedClause>) -> Cnf {
        let mut kept = Vec::default();

        'clause_loop: for clause in clauses {
            let mut literals: BTreeSet<NamedLiteral> = BTreeSet::default();
            for literal in clause {
                if literals.contains(&-literal.clone()) {
                    continue 'clause_loop;
                }
                literals.insert(literal);
            }

            if literals.is_empty() {
                return Cnf::False;
            }
            kept.push(literals.into_iter().collect());
        }

        match kept.is_empty() {
            true => Cnf::True,
            false => Cnf::Clauses(kept),
        }
    }
}

/// The formula with all constants folded away, unless the formula is equivalent to a constant.
pub fn fold_constants(formula: &Formula) -> Formula {
    use Connective::*;

    match formula {
        Formula::Constant(_) | Formula::Variable(_) => formula.clone(),

        Formula::Not(inner) => match fold_constants(inner) {
            Formula::Constant(value) => Formula::Constant(!value),
            folded => folded.negate(),
        },

        Formula::Binary(connective, first, second) => {
            match (fold_constants(first), fold_constants(second)) {
                (Formula::Constant(a), Formula::Constant(b)) => {
                    Formula::Constant(connective.apply(a, b))
                }

                (Formula::Constant(a), other) => match (connective, a) {
                    (Implies, true) => other,
                    (Implies, false) => Formula::Constant(true),
                    _ => with_constant(*connective, a, other),
                },

                (other, Formula::Constant(b)) => match (connective, b) {
                    (Implies, true) => Formula::Constant(true),
                    (Implies, false) => other.negate(),
                    _ => with_constant(*connective, b, other),
                },

                (a, b) => Formula::binary(*connective, a, b),
            }
        }
    }
}

/// Folds `value ∘ other` for a symmetric connective.
fn with_constant(connective: Connective, value: bool, other: Formula) -> Formula {
    use Connective::*;

    match (connective, value) {
        (And, true) | (Or, false) | (Xor, false) | (Iff, true) => other,
        (And, false) | (Nor, true) => Formula::Constant(false),
        (Or, true) | (Nand, false) => Formula::Constant(true),
        (Xor, true) | (Iff, false) | (Nand, true) | (Nor, false) => other.negate(),
        (Implies, _) => Formula::binary(Implies, Formula::Constant(value), other),
    }
}

/// The Tseitin transformation of a formula, preprocessed.
///
/// For documentation see [language::tseitin](crate::language::tseitin).
pub fn tseitin(formula: &Formula, names: &mut FreshNames) -> Cnf {
    let formula = match fold_constants(formula) {
        Formula::Constant(true) => return Cnf::True,
        Formula::Constant(false) => return Cnf::False,
        formula => formula,
    };

    names.avoid(formula.variables());
    let mut encoder = Encoder {
        names,
        representatives: HashMap::default(),
        clauses: Vec::default(),
    };

    let root = encoder.literal_of(&formula);
    encoder.clauses.push(vec![root]);
    Cnf::preprocess(encoder.clauses)
}

struct Encoder<'n> {
    names: &'n mut FreshNames,
    representatives: HashMap<Formula, NamedLiteral>,
    clauses: Vec<NamedClause>,
}

impl Encoder<'_> {
    fn literal_of(&mut self, formula: &Formula) -> NamedLiteral {
        match formula {
            Formula::Variable(name) => NamedLiteral::new(name, true),

            Formula::Not(inner) => -self.literal_of(inner),

            // Only reachable for formulas which have not been folded.
            Formula::Constant(value) => {
                let r = self.fresh_representative(formula);
                self.clauses.push(vec![match *value {
                    true => r.clone(),
                    false => -r.clone(),
                }]);
                r
            }

            Formula::Binary(connective, first, second) => {
                if let Some(r) = self.representatives.get(formula) {
                    return r.clone();
                }
                let a = self.literal_of(first);
                let b = self.literal_of(second);
                let r = self.fresh_representative(formula);
                self.define(r.clone(), *connective, a, b);
                r
            }
        }
    }

    fn fresh_representative(&mut self, formula: &Formula) -> NamedLiteral {
        let r = NamedLiteral::new(&self.names.fresh(), true);
        self.representatives.insert(formula.clone(), r.clone());
        r
    }

    /// Adds clauses for `r <-> (a ∘ b)`.
    fn define(&mut self, r: NamedLiteral, connective: Connective, a: NamedLiteral, b: NamedLiteral) {
        use Connective::*;

        let (nr, na, nb) = (-r.clone(), -a.clone(), -b.clone());
        let definition = match connective {
            And => vec![
                vec![nr.clone(), a.clone()],
                vec![nr, b.clone()],
                vec![r, na, nb],
            ],
            Or => vec![
                vec![nr, a.clone(), b.clone()],
                vec![r.clone(), na],
                vec![r, nb],
            ],
            Implies => vec![
                vec![nr, na, b.clone()],
                vec![r.clone(), a.clone()],
                vec![r, nb],
            ],
            Iff => vec![
                vec![nr.clone(), na.clone(), b.clone()],
                vec![nr, a.clone(), nb.clone()],
                vec![r.clone(), a.clone(), b.clone()],
                vec![r, na, nb],
            ],
            Xor => vec![
                vec![nr.clone(), a.clone(), b.clone()],
                vec![nr, na.clone(), nb.clone()],
                vec![r.clone(), na, b.clone()],
                vec![r, a.clone(), nb],
            ],
            Nand => vec![
                vec![r.clone(), a.clone()],
                vec![r, b.clone()],
                vec![nr, na, nb],
            ],
            Nor => vec![
                vec![nr.clone(), na],
                vec![nr, nb],
                vec![r, a.clone(), b.clone()],
            ],
        };
        self.clauses.extend(definition);
    }
}

/// The clauses of a formula in conjunctive normal form, preprocessed.
///
/// Returns an error if the formula is not a conjunction of disjunctions of literals.
pub fn cnf_of(formula: &Formula) -> Result<Cnf, err::ParseError> {
    let mut conjuncts = Vec::default();
    collect_conjuncts(formula, &mut conjuncts);

    let mut clauses = Vec::with_capacity(conjuncts.len());
    for conjunct in conjuncts {
        let mut clause = Vec::default();
        let mut satisfied = false;
        collect_disjuncts(conjunct, &mut clause, &mut satisfied)?;
        if !satisfied {
            clauses.push(clause);
        }
    }

    Ok(Cnf::preprocess(clauses))
}

fn collect_conjuncts<'f>(formula: &'f Formula, conjuncts: &mut Vec<&'f Formula>) {
    match formula {
        Formula::Binary(Connective::And, first, second) => {
            collect_conjuncts(first, conjuncts);
            collect_conjuncts(second, conjuncts);
        }
        _ => conjuncts.push(formula),
    }
}

fn collect_disjuncts(
    formula: &Formula,
    clause: &mut NamedClause,
    satisfied: &mut bool,
) -> Result<(), err::ParseError> {
    match formula {
        Formula::Binary(Connective::Or, first, second) => {
            collect_disjuncts(first, clause, satisfied)?;
            collect_disjuncts(second, clause, satisfied)
        }

        Formula::Variable(name) => {
            clause.push(NamedLiteral::new(name, true));
            Ok(())
        }

        Formula::Constant(value) => {
            *satisfied |= value;
            Ok(())
        }

        Formula::Not(inner) => match inner.as_ref() {
            Formula::Variable(name) => {
                clause.push(NamedLiteral::new(name, false));
                Ok(())
            }
            Formula::Constant(value) => {
                *satisfied |= !value;
                Ok(())
            }
            _ => Err(err::ParseError::NotCnf),
        },

        Formula::Binary(..) => Err(err::ParseError::NotCnf),
    }
}
