use otter_smt::{
    config::Config,
    reports::{Outcome, Report},
    solvers::run_smt_solver,
};

use rand::{rngs::StdRng, Rng, SeedableRng};

mod equality {
    use super::*;

    #[test]
    fn symmetric_equalities() {
        let outcome = run_smt_solver("(f(x)=g(y)&g(y)=f(x))", Config::default()).unwrap();
        let model = outcome.model().unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.get("f(x)=g(y)"), Some(&true));
        assert_eq!(model.get("g(y)=f(x)"), Some(&true));
    }

    #[test]
    fn congruence() {
        assert_eq!(
            run_smt_solver("(~f(x)=f(y)&(y=x|~x=x))", Config::default()),
            Ok(Outcome::Unsat)
        );
        assert_eq!(run_smt_solver("(x=y&~f(x)=f(y))", Config::default()), Ok(Outcome::Unsat));

        let outcome = run_smt_solver("(f(x)=f(y)&~x=y)", Config::default()).unwrap();
        assert_eq!(outcome.report(), Report::Satisfiable);
    }

    #[test]
    fn transitivity() {
        assert_eq!(
            run_smt_solver("((x=y&y=z)&~x=z)", Config::default()),
            Ok(Outcome::Unsat)
        );

        let outcome = run_smt_solver("((x=y|y=z)&~x=z)", Config::default()).unwrap();
        assert_eq!(outcome.report(), Report::Satisfiable);
    }

    #[test]
    fn disjunction_after_equality() {
        let outcome = run_smt_solver("(x=y&(y=z|x=z))", Config::default()).unwrap();
        let model = outcome.model().unwrap();
        assert_eq!(model.get("x=y"), Some(&true));
        assert_eq!(model.get("y=z"), Some(&true));
        assert_eq!(model.get("x=z"), Some(&true));
    }

    #[test]
    fn case_split() {
        assert_eq!(
            run_smt_solver("((x=y|x=z)&(~f(x)=f(y)&~f(x)=f(z)))", Config::default()),
            Ok(Outcome::Unsat)
        );
    }

    #[test]
    fn nested_functions() {
        assert_eq!(
            run_smt_solver("((f(f(f(x)))=x&f(f(f(f(f(x)))))=x)&~f(x)=x)", Config::default()),
            Ok(Outcome::Unsat)
        );
    }
}

mod relations {
    use super::*;

    #[test]
    fn distinct_arguments() {
        let outcome = run_smt_solver("(R(x)&~R(y))", Config::default()).unwrap();
        let model = outcome.model().unwrap();
        assert_eq!(model.get("R(x)"), Some(&true));
        assert_eq!(model.get("R(y)"), Some(&false));
    }

    #[test]
    fn equal_arguments() {
        assert_eq!(
            run_smt_solver("((R(x)&~R(y))&x=y)", Config::default()),
            Ok(Outcome::Unsat)
        );
        assert_eq!(
            run_smt_solver("((S(x,c)&x=f(y))&~S(f(y),c))", Config::default()),
            Ok(Outcome::Unsat)
        );
    }

    #[test]
    fn quantified_subformulas_are_opaque() {
        assert_eq!(
            run_smt_solver("(Ax[R(x)]&~Ax[R(x)])", Config::default()),
            Ok(Outcome::Unsat)
        );

        let outcome = run_smt_solver("(Ax[R(x)]&~R(y))", Config::default()).unwrap();
        assert_eq!(outcome.report(), Report::Satisfiable);
    }
}

mod random {
    use std::collections::BTreeSet;

    use rand::seq::SliceRandom;

    use super::*;

    fn find(parents: &[usize], mut node: usize) -> usize {
        while parents[node] != node {
            node = parents[node];
        }
        node
    }

    /// Conjunctions of equalities between constants with a single disequality are unsatisfiable exactly when the sides of the disequality are connected.
    #[test]
    fn equality_chains() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut rng = StdRng::seed_from_u64(17);
        let constants = 6;

        for _ in 0..60 {
            let mut parents: Vec<usize> = (0..constants).collect();
            let mut conjuncts = Vec::default();

            for _ in 0..rng.gen_range(0..=6) {
                let a = rng.gen_range(0..constants);
                let b = rng.gen_range(0..constants);
                conjuncts.push(format!("c{a}=c{b}"));
                let (a, b) = (find(&parents, a), find(&parents, b));
                parents[a] = b;
            }

            let a = rng.gen_range(0..constants);
            let b = rng.gen_range(0..constants);
            conjuncts.push(format!("~c{a}=c{b}"));
            let connected = find(&parents, a) == find(&parents, b);

            let formula = conjuncts
                .into_iter()
                .rev()
                .reduce(|rest, conjunct| format!("({conjunct}&{rest})"))
                .unwrap();

            let outcome = run_smt_solver(&formula, Config::default()).unwrap();
            match connected {
                true => assert_eq!(outcome, Outcome::Unsat, "{formula}"),
                false => assert_eq!(outcome.report(), Report::Satisfiable, "{formula}"),
            }
        }
    }

    const CONSTANTS: usize = 3;

    /// An equality between two constants, or between `f` applied to two constants.
    type Equality = (usize, usize, bool);

    enum Shape {
        Atom(usize),
        Not(Box<Shape>),
        And(Box<Shape>, Box<Shape>),
        Or(Box<Shape>, Box<Shape>),
        Implies(Box<Shape>, Box<Shape>),
    }

    fn random_shape(rng: &mut StdRng, atoms: usize, depth: usize) -> Shape {
        if depth == 0 || rng.gen_bool(0.2) {
            return Shape::Atom(rng.gen_range(0..atoms));
        }
        let choice = rng.gen_range(0..6);
        let mut sub = || Box::new(random_shape(rng, atoms, depth - 1));
        match choice {
            0 => Shape::Not(sub()),
            1 | 2 => Shape::And(sub(), sub()),
            3 | 4 => Shape::Or(sub(), sub()),
            _ => Shape::Implies(sub(), sub()),
        }
    }

    fn render(shape: &Shape, names: &[String]) -> String {
        match shape {
            Shape::Atom(atom) => names[*atom].clone(),
            Shape::Not(sub) => format!("~{}", render(sub, names)),
            Shape::And(a, b) => format!("({}&{})", render(a, names), render(b, names)),
            Shape::Or(a, b) => format!("({}|{})", render(a, names), render(b, names)),
            Shape::Implies(a, b) => format!("({}->{})", render(a, names), render(b, names)),
        }
    }

    fn evaluate(shape: &Shape, values: &[bool]) -> bool {
        match shape {
            Shape::Atom(atom) => values[*atom],
            Shape::Not(sub) => !evaluate(sub, values),
            Shape::And(a, b) => evaluate(a, values) && evaluate(b, values),
            Shape::Or(a, b) => evaluate(a, values) || evaluate(b, values),
            Shape::Implies(a, b) => !evaluate(a, values) || evaluate(b, values),
        }
    }

    fn used_atoms(shape: &Shape, used: &mut BTreeSet<usize>) {
        match shape {
            Shape::Atom(atom) => {
                used.insert(*atom);
            }
            Shape::Not(sub) => used_atoms(sub, used),
            Shape::And(a, b) | Shape::Or(a, b) | Shape::Implies(a, b) => {
                used_atoms(a, used);
                used_atoms(b, used);
            }
        }
    }

    fn node(constant: usize, applied: bool) -> usize {
        match applied {
            true => CONSTANTS + constant,
            false => constant,
        }
    }

    fn union(parents: &mut [usize], a: usize, b: usize) -> bool {
        let (a, b) = (find(parents, a), find(parents, b));
        parents[a] = b;
        a != b
    }

    /// Whether the literals are jointly consistent, by congruence closure over `c_i` and `f(c_i)`.
    fn consistent(literals: &[(Equality, bool)]) -> bool {
        let mut parents: Vec<usize> = (0..2 * CONSTANTS).collect();
        for ((a, b, applied), value) in literals {
            if *value {
                union(&mut parents, node(*a, *applied), node(*b, *applied));
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for a in 0..CONSTANTS {
                for b in 0..CONSTANTS {
                    if find(&parents, a) == find(&parents, b) {
                        changed |= union(&mut parents, node(a, true), node(b, true));
                    }
                }
            }
        }

        literals.iter().all(|((a, b, applied), value)| {
            *value || find(&parents, node(*a, *applied)) != find(&parents, node(*b, *applied))
        })
    }

    /// Formulas with disjunctions require decisions and theory backjumps, so are checked against every assignment to their atoms.
    #[test]
    fn formulas_with_disjunctions() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut rng = StdRng::seed_from_u64(29);

        let mut pool: Vec<Equality> = Vec::default();
        for a in 0..CONSTANTS {
            for b in a + 1..CONSTANTS {
                pool.push((a, b, false));
                pool.push((a, b, true));
            }
        }

        for _ in 0..300 {
            pool.shuffle(&mut rng);
            let atoms: Vec<Equality> = pool[..rng.gen_range(2..=5)].to_vec();
            let names: Vec<String> = atoms
                .iter()
                .map(|(a, b, applied)| match applied {
                    true => format!("f(c{a})=f(c{b})"),
                    false => format!("c{a}=c{b}"),
                })
                .collect();

            let shape = random_shape(&mut rng, atoms.len(), 4);
            let formula = render(&shape, &names);
            let mut used = BTreeSet::default();
            used_atoms(&shape, &mut used);

            let satisfiable = (0..1_u32 << atoms.len()).any(|bits| {
                let values: Vec<bool> = (0..atoms.len()).map(|i| (bits >> i) & 1 == 1).collect();
                let literals: Vec<(Equality, bool)> = atoms.iter().copied().zip(values.iter().copied()).collect();
                evaluate(&shape, &values) && consistent(&literals)
            });

            match run_smt_solver(&formula, Config::default()).unwrap() {
                Outcome::Sat(model) => {
                    assert!(satisfiable, "{formula}");
                    let values: Vec<bool> = names
                        .iter()
                        .enumerate()
                        .map(|(atom, name)| match used.contains(&atom) {
                            true => *model.get(name).unwrap(),
                            false => false,
                        })
                        .collect();
                    assert!(evaluate(&shape, &values), "{formula}");
                    let literals: Vec<(Equality, bool)> = used
                        .iter()
                        .map(|atom| (atoms[*atom], values[*atom]))
                        .collect();
                    assert!(consistent(&literals), "{formula}");
                }
                Outcome::Unsat => assert!(!satisfiable, "{formula}"),
                Outcome::Unknown => panic!("no time limit was given"),
            }
        }
    }
}
