/*!
Equality with uninterpreted functions, through congruence closure.

# Atoms

Each atom of the theory is an equality `t=s`, or a relation `R(t₁,…,tₖ)`.
A relation is interpreted as the equality `R(t₁,…,tₖ)=⊤`, against a reserved truth term `⊤`, and so congruence also applies to relations.

# Propagation

Each positive assertion of an atom merges the classes of its two sides, see [term_class].
Then, [t_propagate](Theory::t_propagate) examines every atom whose two sides are in the same class:
- If the atom was asserted false, the assertions are inconsistent.
- If the atom was not asserted, the atom is entailed.

# Explanation

The explanation of an entailed atom is a minimal subset of the positive assertions which entails the atom.
The subset is found by deletion: working through the positive assertions in the order they were made, an assertion is dropped if the remaining assertions still entail the atom on a fresh copy of the term DAG.

# Backtracking

Each level of the theory is a checkpoint of the undo log of the congruence classes, and a mark on the list of assertions.
So, a backtrack restores exactly the classes of the level backtracked to.

```rust
# use otter_smt::language::predicate::Formula;
# use otter_smt::structures::literal::CLiteral;
# use otter_smt::theory::{euf::EqualitySolver, Theory, TheoryPropagation};
let x_eq_y = Formula::parse("x=y").unwrap();
let fx_eq_fy = Formula::parse("f(x)=f(y)").unwrap();
let mut solver = EqualitySolver::new([(0, &x_eq_y), (1, &fx_eq_fy)]);

solver.t_push();
solver.t_assert(CLiteral::new(0, true)).unwrap();
assert_eq!(solver.t_propagate(), TheoryPropagation::Propagate(vec![CLiteral::new(1, true)]));
assert_eq!(
    solver.t_explain(CLiteral::new(1, true)),
    Ok(vec![CLiteral::new(0, false), CLiteral::new(1, true)])
);

solver.t_backtrack(0).unwrap();
assert_eq!(solver.t_propagate(), TheoryPropagation::Consistent);
```
*/

pub mod term_class;

use std::collections::{BTreeMap, HashMap};

use crate::{
    db::LevelIndex,
    language::predicate::{Formula, Term},
    misc::log::targets::{self},
    structures::{atom::Atom, clause::CClause, literal::CLiteral},
    theory::{Theory, TheoryPropagation},
    types::err::{self},
};

use term_class::{TermClasses, TermId};

/// The symbol of the reserved truth term.
pub const TRUTH: &str = "⊤";

/// A congruence closure solver for equality with uninterpreted functions.
pub struct EqualitySolver {
    /// The term DAG without any merge, used for explanations.
    pristine: TermClasses,

    /// The term DAG, with the merges of the positive assertions.
    classes: TermClasses,

    /// The two sides of each atom.
    atoms: BTreeMap<Atom, (TermId, TermId)>,

    /// Assertions, in the order made.
    assertions: Vec<CLiteral>,

    values: HashMap<Atom, bool>,

    /// For each level above zero, the count of assertions made before the level.
    level_marks: Vec<usize>,
}

impl EqualitySolver {
    /// A solver for the given atoms.
    ///
    /// Only equalities and relations are atoms of the theory, and any other formula is ignored.
    pub fn new<'f>(atoms: impl IntoIterator<Item = (Atom, &'f Formula)>) -> Self {
        let mut classes = TermClasses::default();
        let mut sides = BTreeMap::default();

        for (atom, formula) in atoms {
            match formula {
                Formula::Equality(left, right) => {
                    let left = classes.intern(left);
                    let right = classes.intern(right);
                    sides.insert(atom, (left, right));
                }

                Formula::Relation(name, arguments) => {
                    let arguments = arguments.iter().map(|term| classes.intern(term)).collect();
                    let relation = classes.intern_node(name, arguments);
                    let truth = classes.intern_node(TRUTH, Vec::default());
                    sides.insert(atom, (relation, truth));
                }

                _ => {
                    log::trace!(target: targets::THEORY, "{formula} is not an atom of the theory");
                }
            }
        }

        log::info!(target: targets::THEORY, "{} atoms over {} terms", sides.len(), classes.len());
        EqualitySolver {
            pristine: classes.clone(),
            classes,
            atoms: sides,
            assertions: Vec::default(),
            values: HashMap::default(),
            level_marks: Vec::default(),
        }
    }

    /// The congruence classes, on the current assertions.
    pub fn classes(&self) -> &TermClasses {
        &self.classes
    }

    /// The representative of the class of `term`, if the term is known to the solver.
    pub fn representative_of(&self, term: &Term) -> Option<TermId> {
        self.classes
            .id_of(term)
            .map(|id| self.classes.representative(id))
    }

    /// True if the given (positive) equality atoms entail the two sides of `sides` are equal.
    fn entails(&self, equalities: &[Atom], sides: (TermId, TermId)) -> bool {
        let mut scratch = self.pristine.clone();
        for atom in equalities {
            if let Some((left, right)) = self.atoms.get(atom) {
                scratch.process_equality(*left, *right);
            }
        }
        scratch.same_class(sides.0, sides.1)
    }
}

impl Theory for EqualitySolver {
    fn is_theory_atom(&self, atom: Atom) -> bool {
        self.atoms.contains_key(&atom)
    }

    fn t_assert(&mut self, literal: CLiteral) -> Result<(), err::TheoryError> {
        let Some((left, right)) = self.atoms.get(&literal.atom()).copied() else {
            return Err(err::TheoryError::UnknownAtom(literal.atom() as usize));
        };

        match self.values.get(&literal.atom()) {
            Some(value) if *value == literal.polarity() => return Ok(()),
            Some(_) => return Err(err::TheoryError::Reasserted(literal.atom() as usize)),
            None => {}
        }

        log::trace!(target: targets::THEORY, "Assert {literal} at {}", self.t_level());
        self.values.insert(literal.atom(), literal.polarity());
        self.assertions.push(literal);
        if literal.polarity() {
            self.classes.process_equality(left, right);
        }
        Ok(())
    }

    fn t_propagate(&mut self) -> TheoryPropagation {
        let mut entailed = Vec::default();

        for (atom, (left, right)) in &self.atoms {
            if !self.classes.same_class(*left, *right) {
                continue;
            }
            match self.values.get(atom) {
                Some(false) => {
                    log::trace!(target: targets::THEORY, "Conflict on {atom}");
                    return TheoryPropagation::Conflict(CLiteral::new(*atom, false));
                }
                Some(true) => {}
                None => entailed.push(CLiteral::new(*atom, true)),
            }
        }

        match entailed.is_empty() {
            true => TheoryPropagation::Consistent,
            false => TheoryPropagation::Propagate(entailed),
        }
    }

    fn t_explain(&self, literal: CLiteral) -> Result<CClause, err::TheoryError> {
        let atom = literal.atom();
        let Some(sides) = self.atoms.get(&atom).copied() else {
            return Err(err::TheoryError::UnknownAtom(atom as usize));
        };

        let mut explanation: Vec<Atom> = self
            .assertions
            .iter()
            .filter(|assertion| assertion.polarity() && assertion.atom() != atom)
            .map(|assertion| assertion.atom())
            .collect();

        if !self.entails(&explanation, sides) {
            log::error!(target: targets::THEORY, "Explanation requested for {atom}, which is not entailed");
        } else {
            let mut index = 0;
            while index < explanation.len() {
                let mut candidate = explanation.clone();
                candidate.remove(index);
                match self.entails(&candidate, sides) {
                    true => explanation = candidate,
                    false => index += 1,
                }
            }
        }

        let mut lemma: CClause = explanation
            .into_iter()
            .map(|equality| CLiteral::new(equality, false))
            .collect();
        lemma.push(CLiteral::new(atom, true));
        Ok(lemma)
    }

    fn t_push(&mut self) -> LevelIndex {
        self.level_marks.push(self.assertions.len());
        self.classes.checkpoint();
        self.t_level()
    }

    fn t_backtrack(&mut self, level: LevelIndex) -> Result<(), err::TheoryError> {
        if level > self.t_level() {
            return Err(err::TheoryError::InvalidLevel);
        }

        while self.t_level() > level {
            let Some(mark) = self.level_marks.pop() else {
                return Err(err::TheoryError::InvalidLevel);
            };
            self.classes.restore();
            for assertion in self.assertions.drain(mark..) {
                self.values.remove(&assertion.atom());
            }
        }

        log::trace!(target: targets::THEORY, "Backtracked to {level}");
        Ok(())
    }

    fn t_level(&self) -> LevelIndex {
        self.level_marks.len() as LevelIndex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver_for(atoms: &[&str]) -> EqualitySolver {
        let formulas: Vec<Formula> = atoms.iter().map(|a| Formula::parse(a).unwrap()).collect();
        EqualitySolver::new(
            formulas
                .iter()
                .enumerate()
                .map(|(index, formula)| (index as Atom, formula)),
        )
    }

    #[test]
    fn reflexive_atoms_are_entailed() {
        let mut solver = solver_for(&["x=x", "x=y"]);
        assert_eq!(
            solver.t_propagate(),
            TheoryPropagation::Propagate(vec![CLiteral::new(0, true)])
        );
        assert_eq!(solver.t_explain(CLiteral::new(0, true)), Ok(vec![CLiteral::new(0, true)]));
    }

    #[test]
    fn conflict_from_congruence() {
        let mut solver = solver_for(&["f(x)=f(y)", "y=x"]);
        solver.t_assert(CLiteral::new(0, false)).unwrap();
        assert_eq!(solver.t_propagate(), TheoryPropagation::Consistent);

        solver.t_push();
        solver.t_assert(CLiteral::new(1, true)).unwrap();
        assert_eq!(
            solver.t_propagate(),
            TheoryPropagation::Conflict(CLiteral::new(0, false))
        );

        let fx = solver.representative_of(&Term::parse("f(x)").unwrap());
        assert!(fx.is_some());
        assert_eq!(fx, solver.representative_of(&Term::parse("f(y)").unwrap()));
        assert_eq!(solver.representative_of(&Term::parse("f(z)").unwrap()), None);
        assert_eq!(
            solver.t_explain(CLiteral::new(0, false)),
            Ok(vec![CLiteral::new(1, false), CLiteral::new(0, true)])
        );

        solver.t_backtrack(0).unwrap();
        assert_eq!(solver.t_propagate(), TheoryPropagation::Consistent);
        assert_eq!(solver.t_backtrack(2), Err(err::TheoryError::InvalidLevel));
    }

    #[test]
    fn explanations_are_minimal() {
        let mut solver = solver_for(&["a=b", "c=d", "b=c", "g(a)=g(d)", "a=w"]);
        for atom in [0, 1, 4, 2] {
            solver.t_assert(CLiteral::new(atom, true)).unwrap();
        }
        assert_eq!(
            solver.t_propagate(),
            TheoryPropagation::Propagate(vec![CLiteral::new(3, true)])
        );
        assert_eq!(
            solver.t_explain(CLiteral::new(3, true)),
            Ok(vec![
                CLiteral::new(0, false),
                CLiteral::new(1, false),
                CLiteral::new(2, false),
                CLiteral::new(3, true)
            ])
        );
    }

    #[test]
    fn relations_as_equalities() {
        let mut solver = solver_for(&["R(a)", "R(b)", "a=b"]);
        solver.t_assert(CLiteral::new(0, true)).unwrap();
        solver.t_assert(CLiteral::new(1, false)).unwrap();
        assert_eq!(solver.t_propagate(), TheoryPropagation::Consistent);

        solver.t_assert(CLiteral::new(2, true)).unwrap();
        assert_eq!(
            solver.t_propagate(),
            TheoryPropagation::Conflict(CLiteral::new(1, false))
        );
        assert_eq!(
            solver.t_explain(CLiteral::new(1, false)),
            Ok(vec![
                CLiteral::new(0, false),
                CLiteral::new(2, false),
                CLiteral::new(1, true)
            ])
        );
    }

    #[test]
    fn reassertion() {
        let mut solver = solver_for(&["x=y"]);
        solver.t_assert(CLiteral::new(0, true)).unwrap();
        assert!(solver.t_assert(CLiteral::new(0, true)).is_ok());
        assert_eq!(
            solver.t_assert(CLiteral::new(0, false)),
            Err(err::TheoryError::Reasserted(0))
        );
        assert_eq!(
            solver.t_assert(CLiteral::new(7, true)),
            Err(err::TheoryError::UnknownAtom(7))
        );
    }
}
