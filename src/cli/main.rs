#![allow(clippy::collapsible_if)]

use otter_smt::{
    config::Config,
    reports::Outcome,
    solvers,
    types::err::{self},
};

mod misc;
mod parse;

use parse::Input;

fn main() {
    #[cfg(feature = "log")]
    env_logger::init();

    let matches = parse::cli().get_matches();
    let config = parse::config_from_args(&matches);
    let show_model = matches!(matches.try_get_one::<bool>("model"), Ok(Some(true)));

    let Some(mode) = matches.get_one::<String>("mode") else {
        println!("c No mode given");
        std::process::exit(1);
    };
    let Some(input) = parse::input_from_args(&matches) else {
        println!("c No input given");
        std::process::exit(1);
    };

    let result = match mode.as_str() {
        "dimacs" => solve_dimacs(input, config),
        "lp" => solve_lp(input, config, show_model),
        _ => match formula_of(input) {
            Ok(formula) => match mode.as_str() {
                "cnf" => solvers::run_sat_cnf(&formula, config),
                "sat" => solvers::run_sat_solver(&formula, config),
                _ => solvers::run_smt_solver(&formula, config),
            },
            Err(e) => {
                println!("c Error reading input: {e}");
                std::process::exit(1);
            }
        },
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err::ErrorKind::Parse(e)) => {
            println!("c Error parsing the formula: {e:?}");
            std::process::exit(1);
        }
        Err(e) => {
            println!("c Context error: {e}");
            std::process::exit(1);
        }
    };

    match outcome {
        Outcome::Sat(model) => {
            if show_model {
                for (name, value) in model {
                    println!("v {name} {value}");
                }
            }
            println!("s SATISFIABLE");
            std::process::exit(10)
        }
        Outcome::Unsat => {
            println!("s UNSATISFIABLE");
            std::process::exit(20)
        }
        Outcome::Unknown => {
            println!("s UNKNOWN");
            std::process::exit(30)
        }
    }
}

fn formula_of(input: Input) -> std::io::Result<String> {
    match input {
        Input::Formula(formula) => Ok(formula),
        Input::Path(path) => misc::read_formula(&path),
    }
}

fn solve_dimacs(input: Input, config: Config) -> Result<Outcome, err::ErrorKind> {
    let Input::Path(path) = input else {
        return Err(err::ErrorKind::InvalidState);
    };
    match misc::open_reader(&path) {
        Ok(reader) => solvers::run_sat_dimacs(reader, config),
        Err(e) => {
            println!("c Could not load {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

/// Linear arithmetic witnesses are real valued, and so are displayed here rather than as an [Outcome].
fn solve_lp(input: Input, config: Config, show_model: bool) -> Result<Outcome, err::ErrorKind> {
    let formula = match formula_of(input) {
        Ok(formula) => formula,
        Err(e) => {
            println!("c Error reading input: {e}");
            std::process::exit(1);
        }
    };

    match solvers::run_simplex(&formula, &config.simplex)? {
        Some(witness) => {
            if show_model {
                for (name, value) in witness {
                    println!("v {name} {value}");
                }
            }
            Ok(Outcome::Sat(Default::default()))
        }
        None => Ok(Outcome::Unsat),
    }
}
