use otter_smt::{
    config::SimplexConfig,
    lp::{formula::LpFormula, LinearProgram, LpOutcome},
    solvers::run_simplex,
};

use rand::{rngs::StdRng, Rng, SeedableRng};

const TOLERANCE: f64 = 1e-7;

fn bland() -> SimplexConfig {
    let mut config = SimplexConfig::default();
    config.bland_from_start.value = true;
    config
}

fn optimum(program: &LinearProgram, config: &SimplexConfig) -> (Vec<f64>, f64) {
    match program.solve(config).unwrap() {
        LpOutcome::Optimal {
            assignment,
            objective,
        } => (assignment, objective),
        outcome => panic!("expected an optimal solution, found {outcome:?}"),
    }
}

mod programs {
    use super::*;

    #[test]
    fn four_columns() {
        let mut program = LinearProgram::new(4);
        program
            .set_objective([(0, 19.0), (1, 13.0), (2, 12.0), (3, 17.0)])
            .unwrap();
        program
            .add_constraint([(0, 3.0), (1, 2.0), (2, 1.0), (3, 2.0)], 225.0)
            .unwrap();
        program
            .add_constraint([(0, 1.0), (1, 1.0), (2, 1.0), (3, 1.0)], 117.0)
            .unwrap();
        program
            .add_constraint([(0, 4.0), (1, 3.0), (2, 3.0), (3, 4.0)], 420.0)
            .unwrap();

        for config in [SimplexConfig::default(), bland()] {
            let (assignment, objective) = optimum(&program, &config);
            assert!((objective - 1827.0).abs() < TOLERANCE);
            assert!((program.objective_value(&assignment) - objective).abs() < TOLERANCE);
            assert!(program.satisfies(&assignment, TOLERANCE));
        }
    }

    /// A degenerate program on which the largest coefficient rule cycles.
    #[test]
    fn degenerate_cycling() {
        let mut program = LinearProgram::new(4);
        program
            .set_objective([(0, 10.0), (1, -57.0), (2, -9.0), (3, -24.0)])
            .unwrap();
        program
            .add_constraint([(0, 0.5), (1, -5.5), (2, -2.5), (3, 9.0)], 0.0)
            .unwrap();
        program
            .add_constraint([(0, 0.5), (1, -1.5), (2, -0.5), (3, 1.0)], 0.0)
            .unwrap();
        program.add_constraint([(0, 1.0)], 1.0).unwrap();

        for config in [SimplexConfig::default(), bland()] {
            let (assignment, objective) = optimum(&program, &config);
            assert!((objective - 1.0).abs() < TOLERANCE);
            assert!(program.satisfies(&assignment, TOLERANCE));
        }
    }

    #[test]
    fn unbounded() {
        let mut program = LinearProgram::new(2);
        program.set_objective([(0, 1.0), (1, 1.0)]).unwrap();
        program.add_constraint([(0, 1.0), (1, -1.0)], 1.0).unwrap();
        assert_eq!(
            program.solve(&SimplexConfig::default()),
            Ok(LpOutcome::Unbounded)
        );
    }

    #[test]
    fn infeasible() {
        let mut program = LinearProgram::new(2);
        program.set_objective([(0, 1.0)]).unwrap();
        program.add_constraint([(0, 1.0), (1, 1.0)], 1.0).unwrap();
        program.add_constraint([(0, -1.0)], -2.0).unwrap();
        assert_eq!(
            program.solve(&SimplexConfig::default()),
            Ok(LpOutcome::Infeasible)
        );
    }

    #[test]
    fn negative_bounds() {
        // x + y ≥ 2, x ≤ 3, y ≤ 3, minimise x + 2y.
        let mut program = LinearProgram::new(2);
        program.set_objective([(0, -1.0), (1, -2.0)]).unwrap();
        program.add_constraint([(0, -1.0), (1, -1.0)], -2.0).unwrap();
        program.add_constraint([(0, 1.0)], 3.0).unwrap();
        program.add_constraint([(1, 1.0)], 3.0).unwrap();

        let (assignment, objective) = optimum(&program, &SimplexConfig::default());
        assert!((objective + 2.0).abs() < TOLERANCE);
        assert!((assignment[0] - 2.0).abs() < TOLERANCE);
        assert!(assignment[1].abs() < TOLERANCE);
    }

    /// Programs with non-negative coefficients and a positive bound on each column are feasible and bounded.
    #[test]
    fn random_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let columns = rng.gen_range(1..=6);
            let rows = rng.gen_range(1..=6);
            let mut program = LinearProgram::new(columns);

            program
                .set_objective((0..columns).map(|column| (column, rng.gen_range(-5..=10) as f64)))
                .unwrap();
            for _ in 0..rows {
                let coefficients: Vec<(usize, f64)> = (0..columns)
                    .map(|column| (column, rng.gen_range(0..=9) as f64))
                    .collect();
                program
                    .add_constraint(coefficients, rng.gen_range(1..=50) as f64)
                    .unwrap();
            }
            for column in 0..columns {
                program.add_constraint([(column, 1.0)], 20.0).unwrap();
            }

            let (assignment, objective) = optimum(&program, &SimplexConfig::default());
            assert!(program.satisfies(&assignment, TOLERANCE));
            assert!((program.objective_value(&assignment) - objective).abs() < TOLERANCE);

            let (_, bland_objective) = optimum(&program, &bland());
            assert!((objective - bland_objective).abs() < TOLERANCE);
        }
    }
}

mod formulas {
    use super::*;

    const BOUNDS: &str = "(~GS(plus(x,z),5)|S(plus(x,z),5))";

    fn decide(formula: &str) -> bool {
        let witness = run_simplex(formula, &SimplexConfig::default()).unwrap();
        if let Some(witness) = &witness {
            let clauses = LpFormula::parse(formula).unwrap();
            assert!(clauses
                .clauses()
                .iter()
                .any(|rows| rows.iter().all(|row| row.satisfied_by(witness, TOLERANCE))));
        }
        witness.is_some()
    }

    #[test]
    fn satisfiable() {
        assert!(decide("GS(plus(mult(2,x),z),1)"));
        assert!(decide("(GS(plus(mult(2,x),z),1)&GS(z,1))"));
        assert!(decide("((GS(plus(mult(2,x),z),1)&~GS(z,1))&~GS(x,2))"));
        assert!(decide(&format!(
            "({BOUNDS}&(~GS(minus(minus(0,x),z),minus(0,5))|S(minus(minus(0,x),z),minus(0,5))))"
        )));
    }

    #[test]
    fn unsatisfiable() {
        assert!(!decide(&format!(
            "({BOUNDS}&(~GS(minus(minus(0,x),z),minus(0,6))|S(minus(minus(0,x),z),minus(0,6))))"
        )));
        assert!(!decide(&format!(
            "(({BOUNDS}&(~GS(minus(minus(0,x),z),minus(0,5))|S(minus(minus(0,x),z),minus(0,5))))&~S(plus(x,z),5))"
        )));
    }

    #[test]
    fn inequalities() {
        assert!(decide("(KS(x,3)&GS(x,3))"));
        assert!(!decide("(K(x,3)&GS(x,3))"));
        assert!(decide("(LS(x,3)&(GS(x,3)&KS(x,4)))"));
        assert!(!decide("((LS(x,y)|K(y,y))&x=y)"));
        assert!(decide("(K(minus(x),minus(5))&KS(x,6))"));
    }
}
