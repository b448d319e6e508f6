/*!
String entry points to the solvers.

Each entry point reads a formula, builds a context (and, for [run_smt_solver], a theory), and solves.

- [run_sat_solver] reads a [propositional formula](crate::language::propositional) and solves its [Tseitin transformation](crate::language::tseitin).
- [run_sat_cnf] reads a propositional formula in conjunctive normal form, and solves its clauses directly.
- [run_sat_dimacs] reads a formula in the DIMACS format.
- [run_smt_solver] reads a [first-order formula](crate::language::predicate), and solves its propositional skeleton relative to [equality with uninterpreted functions](crate::theory::euf).
- [run_simplex] reads a [linear arithmetic formula](crate::lp::formula).

Models of propositional formulas are keyed by the variables of the formula, without any variable introduced by the Tseitin transformation.
Models of first-order formulas are keyed by the atoms of the formula, as written.

```rust
# use otter_smt::config::Config;
# use otter_smt::reports::Outcome;
# use otter_smt::solvers::{run_sat_solver, run_smt_solver};
let outcome = run_sat_solver("((p->q)&(p&~r))", Config::default()).unwrap();
let model = outcome.model().unwrap();
assert_eq!(model.get("p"), Some(&true));
assert_eq!(model.get("q"), Some(&true));
assert_eq!(model.get("r"), Some(&false));
assert_eq!(model.len(), 3);

let outcome = run_smt_solver("(~f(x)=f(y)&(y=x|~x=x))", Config::default()).unwrap();
assert_eq!(outcome, Outcome::Unsat);
```
*/

use std::io::BufRead;

use crate::{
    config::{Config, SimplexConfig},
    context::Context,
    language::{
        names::FreshNames,
        predicate, propositional,
        tseitin::{self, Cnf},
    },
    lp::formula::{Assignment, LpFormula},
    misc::log::targets::{self},
    reports::{Model, Outcome, Report},
    smt::Coordinator,
    structures::{clause::CClause, literal::CLiteral},
    theory::euf::EqualitySolver,
    types::err::ErrorKind,
};

/// A context for `cnf`, with an atom for each of `variables`, in order.
fn context_of(
    cnf: &Cnf,
    variables: impl IntoIterator<Item = String>,
    config: Config,
) -> Result<Context, ErrorKind> {
    let mut context = Context::from_config(config);
    for variable in variables {
        context.atom_from_name(&variable)?;
    }

    match cnf {
        Cnf::True => {}

        Cnf::False => {
            context.add_clause(CClause::default())?;
        }

        Cnf::Clauses(clauses) => {
            for clause in clauses {
                let clause = clause
                    .iter()
                    .map(|literal| {
                        let atom = context.atom_from_name(&literal.name)?;
                        Ok(CLiteral::new(atom, literal.polarity))
                    })
                    .collect::<Result<CClause, ErrorKind>>()?;
                context.add_clause(clause)?;
            }
        }
    }

    Ok(context)
}

/// The outcome of a report, with a model of the given names.
fn outcome_of(report: Report, context: &Context, names: impl IntoIterator<Item = String>) -> Outcome {
    match report {
        Report::Satisfiable => {
            let model = context.model();
            Outcome::Sat(
                names
                    .into_iter()
                    .filter_map(|name| model.get(&name).map(|value| (name, *value)))
                    .collect(),
            )
        }
        Report::Unsatisfiable => Outcome::Unsat,
        Report::Unknown => Outcome::Unknown,
    }
}

/// Determines the satisfiability of a propositional formula, through its Tseitin transformation.
pub fn run_sat_solver(formula: &str, config: Config) -> Result<Outcome, ErrorKind> {
    let formula = propositional::Formula::parse(formula)?;
    let variables = formula.variables();

    let mut names = FreshNames::default();
    let cnf = tseitin::tseitin(&formula, &mut names);
    log::info!(target: targets::PREPROCESSING, "Tseitin transformation: {cnf:?}");

    let mut context = context_of(&cnf, variables.iter().cloned(), config)?;
    let report = context.solve()?;
    Ok(outcome_of(report, &context, variables))
}

/// Determines the satisfiability of a propositional formula in conjunctive normal form.
pub fn run_sat_cnf(formula: &str, config: Config) -> Result<Outcome, ErrorKind> {
    let formula = propositional::Formula::parse(formula)?;
    let variables = formula.variables();
    let cnf = tseitin::cnf_of(&formula)?;

    let mut context = context_of(&cnf, variables.iter().cloned(), config)?;
    let report = context.solve()?;
    Ok(outcome_of(report, &context, variables))
}

/// Determines the satisfiability of a formula in the DIMACS format.
pub fn run_sat_dimacs(reader: impl BufRead, config: Config) -> Result<Outcome, ErrorKind> {
    let mut context = Context::from_config(config);
    context.read_dimacs(reader)?;
    let report = context.solve()?;
    let names: Vec<String> = context.model().into_keys().collect();
    Ok(outcome_of(report, &context, names))
}

/// Determines the satisfiability of a first-order formula, relative to equality with uninterpreted functions.
pub fn run_smt_solver(formula: &str, config: Config) -> Result<Outcome, ErrorKind> {
    let formula = predicate::Formula::parse(formula)?;

    let mut names = FreshNames::default();
    let (skeleton, skeleton_map) = formula.propositional_skeleton(&mut names);
    let cnf = tseitin::tseitin(&skeleton, &mut names);
    log::info!(target: targets::PREPROCESSING, "Skeleton {skeleton}, with {} atoms", skeleton_map.len());

    let mut context = context_of(&cnf, skeleton_map.keys().cloned(), config)?;
    let mut atoms = Vec::with_capacity(skeleton_map.len());
    for (name, atom_formula) in &skeleton_map {
        atoms.push((context.atom_from_name(name)?, atom_formula));
    }

    let theory = EqualitySolver::new(atoms);
    let mut coordinator = Coordinator::new(context, theory);
    let report = coordinator.solve()?;

    match report {
        Report::Satisfiable => {
            let valuation = coordinator.context.model();
            let model: Model = skeleton_map
                .iter()
                .filter_map(|(name, atom_formula)| {
                    valuation
                        .get(name)
                        .map(|value| (atom_formula.to_string(), *value))
                })
                .collect();
            Ok(Outcome::Sat(model))
        }
        Report::Unsatisfiable => Ok(Outcome::Unsat),
        Report::Unknown => Ok(Outcome::Unknown),
    }
}

/// Determines the satisfiability of a linear arithmetic formula, returning a witness if satisfiable.
pub fn run_simplex(formula: &str, config: &SimplexConfig) -> Result<Option<Assignment>, ErrorKind> {
    let formula = LpFormula::parse(formula)?;
    formula.solve(config)
}
