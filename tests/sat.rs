use otter_smt::{
    config::Config,
    context::Context,
    reports::{Outcome, Report},
    solvers::{run_sat_cnf, run_sat_dimacs, run_sat_solver},
    structures::literal::CLiteral,
    types::err::{ErrorKind, ParseError},
};

use rand::{rngs::StdRng, Rng, SeedableRng};

mod basic {
    use super::*;

    #[test]
    fn one_literal() {
        let outcome = run_sat_cnf("x", Config::default()).unwrap();
        assert_eq!(outcome.report(), Report::Satisfiable);
        assert_eq!(outcome.model().unwrap().get("x"), Some(&true));
    }

    #[test]
    fn conflicting_units() {
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.literal_from_string("x").unwrap();
        assert!(the_context.add_clause(vec![x]).is_ok());
        assert!(the_context.add_clause(vec![-x]).is_ok());
        assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
        assert!(!the_context.trail.decision_is_made());

        assert_eq!(run_sat_cnf("(x&~x)", Config::default()), Ok(Outcome::Unsat));
    }

    #[test]
    fn conflict() {
        let mut the_context = Context::from_config(Config::default());
        for clause in ["p q", "-p -q", "p -q", "-p q"] {
            let clause = the_context.clause_from_string(clause).unwrap();
            assert!(the_context.add_clause(clause).is_ok());
        }
        assert!(the_context.solve().is_ok());
        assert!(matches!(the_context.report(), Report::Unsatisfiable))
    }

    #[test]
    fn repeated_disjuncts() {
        let outcome = run_sat_solver("((p|p)|p)", Config::default()).unwrap();
        assert_eq!(outcome.report(), Report::Satisfiable);
        assert_eq!(outcome.model().unwrap().get("p"), Some(&true));
    }

    /// Deciding against `p` leads to a conflict, and the learnt clause must fix `p`.
    #[test]
    fn learning_from_one_conflict() {
        let mut the_context = Context::from_config(Config::default());
        let mut clauses = Vec::default();
        for clause in ["p -z1", "-p z1", "p z1 -z2", "-z1 z2", "-p z2", "z2"] {
            let clause = the_context.clause_from_string(clause).unwrap();
            clauses.push(clause.clone());
            assert!(the_context.add_clause(clause).is_ok());
        }

        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        let model = the_context.model();
        for atom in ["p", "z1", "z2"] {
            assert_eq!(model.get(atom), Some(&true));
        }
        assert!(the_context.satisfies(clauses));
        assert!(the_context.satisfies(the_context.clause_db.addition_clauses()));
    }

    #[test]
    fn duplicates_and_tautologies() {
        let mut the_context = Context::from_config(Config::default());
        let clause = the_context.clause_from_string("p q q").unwrap();
        assert!(the_context.add_clause(clause).is_ok());
        let tautology = the_context.clause_from_string("p q -p").unwrap();
        assert!(the_context.add_clause(tautology).is_ok());

        assert_eq!(the_context.clause_db.original_count(), 1);
        assert_eq!(
            the_context.clause_db.original_clauses().next().map(|c| c.len()),
            Some(2)
        );
    }

    #[test]
    fn cnf_input() {
        let outcome = run_sat_cnf("((p|~q)&(q|T))", Config::default()).unwrap();
        assert_eq!(outcome.report(), Report::Satisfiable);

        let outcome = run_sat_cnf("((p|q)&((~p|q)&((p|~q)&(~p|~q))))", Config::default());
        assert_eq!(outcome, Ok(Outcome::Unsat));

        assert_eq!(
            run_sat_cnf("(p->q)", Config::default()),
            Err(ErrorKind::Parse(ParseError::NotCnf))
        );
    }

    #[test]
    fn dimacs() {
        let formula = "c An example
p cnf 3 4
1 2 0
-1 2 0
-2 3 0
-3 -1 0
";
        let outcome = run_sat_dimacs(formula.as_bytes(), Config::default()).unwrap();
        let model = outcome.model().unwrap();
        assert_eq!(model.get("1"), Some(&false));
        assert_eq!(model.get("2"), Some(&true));
        assert_eq!(model.get("3"), Some(&true));

        let formula = "p cnf 1 2
1 0
-1 0
";
        let outcome = run_sat_dimacs(formula.as_bytes(), Config::default());
        assert_eq!(outcome, Ok(Outcome::Unsat));
    }

    #[test]
    fn time_limit() {
        let mut config = Config::default();
        config.time_limit = Some(std::time::Duration::from_secs(0));

        let mut the_context = Context::from_config(config);
        let clause = the_context.clause_from_string("p q").unwrap();
        assert!(the_context.add_clause(clause).is_ok());
        assert_eq!(the_context.solve(), Ok(Report::Unknown));
    }
}

mod brute_force {
    use super::*;

    type Clauses = Vec<Vec<(usize, bool)>>;

    fn random_clauses(rng: &mut StdRng, variables: usize) -> Clauses {
        let count = rng.gen_range(1..=4 * variables + 2);
        (0..count)
            .map(|_| {
                let length = rng.gen_range(1..=3);
                (0..length)
                    .map(|_| (rng.gen_range(0..variables), rng.gen_bool(0.5)))
                    .collect()
            })
            .collect()
    }

    fn satisfiable(clauses: &Clauses, variables: usize) -> bool {
        (0..1_u32 << variables).any(|bits| {
            clauses.iter().all(|clause| {
                clause
                    .iter()
                    .any(|(variable, polarity)| ((bits >> variable) & 1 == 1) == *polarity)
            })
        })
    }

    /// Three distinct variables, with the clause count near the ratio at which random instances are hardest.
    fn random_three_clauses(rng: &mut StdRng, variables: usize) -> Clauses {
        let count = (4.26 * variables as f64).round() as usize;
        (0..count)
            .map(|_| {
                let mut clause: Vec<(usize, bool)> = Vec::with_capacity(3);
                while clause.len() < 3 {
                    let variable = rng.gen_range(0..variables);
                    if clause.iter().all(|(other, _)| *other != variable) {
                        clause.push((variable, rng.gen_bool(0.5)));
                    }
                }
                clause
            })
            .collect()
    }

    fn check_agreement(raw_clauses: &Clauses, variables: usize) {
        let mut the_context = Context::from_config(Config::default());
        let literals = the_context.fresh_or_max_literals(variables);
        let clauses: Vec<Vec<CLiteral>> = raw_clauses
            .iter()
            .map(|clause| {
                clause
                    .iter()
                    .map(|(variable, polarity)| CLiteral::new(literals[*variable].atom(), *polarity))
                    .collect()
            })
            .collect();
        for clause in &clauses {
            assert!(the_context.add_clause(clause.clone()).is_ok());
        }

        let report = the_context.solve().unwrap();
        let expected = satisfiable(raw_clauses, variables);

        match report {
            Report::Satisfiable => {
                assert!(expected);
                assert!(the_context.satisfies(clauses.clone()));
                assert!(the_context.satisfies(the_context.clause_db.addition_clauses()));
                assert!(!the_context
                    .implication_graph
                    .has_dangling_edge(|atom| the_context.atom_db.value_of(atom).is_some()));
            }
            Report::Unsatisfiable => assert!(!expected, "{raw_clauses:?}"),
            Report::Unknown => panic!("no time limit was given"),
        }
    }

    #[test]
    fn agreement_on_small_formulas() {
        for seed in [91, 5, 1729] {
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..400 {
                let variables = rng.gen_range(1..=6);
                check_agreement(&random_clauses(&mut rng, variables), variables);
            }
        }
    }

    #[test]
    fn agreement_on_three_literal_clauses() {
        for seed in [2, 13, 44, 101] {
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..500 {
                let variables = rng.gen_range(3..=6);
                check_agreement(&random_three_clauses(&mut rng, variables), variables);
            }
        }
    }

    #[test]
    fn random_decisions() {
        let mut rng = StdRng::seed_from_u64(3);

        for seed in 0..100 {
            let variables = rng.gen_range(2..=6);
            let clauses = random_clauses(&mut rng, variables);

            let mut config = Config::default();
            config.random_decision_bias.value = 0.5;
            let mut the_context =
                otter_smt::context::GenericContext::from_config_and_rng(config, StdRng::seed_from_u64(seed));
            let literals = the_context.fresh_or_max_literals(variables);
            for clause in &clauses {
                let clause: Vec<CLiteral> = clause
                    .iter()
                    .map(|(variable, polarity)| CLiteral::new(literals[*variable].atom(), *polarity))
                    .collect();
                assert!(the_context.add_clause(clause).is_ok());
            }

            let expected = match satisfiable(&clauses, variables) {
                true => Report::Satisfiable,
                false => Report::Unsatisfiable,
            };
            assert_eq!(the_context.solve(), Ok(expected));
        }
    }
}
