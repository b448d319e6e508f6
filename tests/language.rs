use std::collections::{BTreeMap, BTreeSet};

use otter_smt::{
    config::Config,
    language::propositional::{Connective, Formula},
    reports::Outcome,
    solvers::run_sat_solver,
};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

const CONNECTIVES: [Connective; 7] = [
    Connective::And,
    Connective::Or,
    Connective::Implies,
    Connective::Xor,
    Connective::Iff,
    Connective::Nand,
    Connective::Nor,
];

const VARIABLES: [&str; 5] = ["p", "q", "r", "s", "x12"];

fn random_formula(rng: &mut StdRng, depth: usize) -> Formula {
    if depth == 0 || rng.gen_bool(0.2) {
        return match rng.gen_range(0..12) {
            0 => Formula::Constant(rng.gen_bool(0.5)),
            _ => Formula::Variable(VARIABLES.choose(rng).unwrap().to_string()),
        };
    }

    match rng.gen_range(0..4) {
        0 => Formula::Not(Box::new(random_formula(rng, depth - 1))),
        _ => Formula::binary(
            *CONNECTIVES.choose(rng).unwrap(),
            random_formula(rng, depth - 1),
            random_formula(rng, depth - 1),
        ),
    }
}

fn models(variables: &BTreeSet<String>) -> impl Iterator<Item = BTreeMap<String, bool>> + '_ {
    (0..1_u32 << variables.len()).map(move |bits| {
        variables
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), (bits >> index) & 1 == 1))
            .collect()
    })
}

#[test]
fn display_parses() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..200 {
        let formula = random_formula(&mut rng, 4);
        assert_eq!(Formula::parse(&formula.to_string()), Ok(formula));
    }
}

#[test]
fn tseitin_agrees_with_truth_tables() {
    let mut rng = StdRng::seed_from_u64(23);

    for _ in 0..300 {
        let formula = random_formula(&mut rng, 5);
        let variables = formula.variables();
        let satisfiable = models(&variables).any(|model| formula.evaluate(&model) == Some(true));

        match run_sat_solver(&formula.to_string(), Config::default()).unwrap() {
            Outcome::Sat(model) => {
                assert!(satisfiable, "{formula}");
                assert_eq!(model.keys().cloned().collect::<BTreeSet<_>>(), variables);
                assert_eq!(formula.evaluate(&model), Some(true), "{formula}");
            }
            Outcome::Unsat => assert!(!satisfiable, "{formula}"),
            Outcome::Unknown => panic!("no time limit was given"),
        }
    }
}
