use std::path::PathBuf;

use clap::{value_parser, Arg, ArgMatches, Command};

use otter_smt::config::{Activity, Config};

pub fn cli() -> Command {
    Command::new("otter_smt")
        .about("Determines whether a formula is satisfiable or unsatisfiable")
        .version("pup (it's still growing)")

        .arg(Arg::new("mode")
            .required(true)
            .value_parser(["cnf", "dimacs", "sat", "smt", "lp"])
            .help("The kind of formula to solve.")
            .long_help("The kind of formula to solve.

cnf:    A propositional formula in conjunctive normal form, e.g. ((p|~q)&q).
dimacs: A DIMACS file, optionally xz compressed if built with the xz feature.
sat:    Any propositional formula, e.g. ((p->q)&~(q<->r)).
smt:    A first-order formula over equality and uninterpreted functions, e.g. (f(x)=g(y)&~x=y).
lp:     A linear arithmetic formula, e.g. (GS(plus(x,y),1)&K(x,0))."))

        .arg(Arg::new("input")
            .required(true)
            .help("The formula, or with --file (or in dimacs mode) a path to a file containing the formula."))

        .arg(Arg::new("file")
            .short('f')
            .long("file")
            .value_parser(value_parser!(bool))
            .required(false)
            .num_args(0)
            .help("Read the formula from the file at the input path."))

        .arg(Arg::new("model")
            .short('m')
            .long("model")
            .value_parser(value_parser!(bool))
            .required(false)
            .num_args(0)
            .help("Display a model on finding a formula is satisfiable."))

        .arg(Arg::new("time_limit")
            .short('t')
            .long("time-limit")
            .value_parser(value_parser!(u64))
            .required(false)
            .num_args(1)
            .help("Time limit for the solve in seconds.
Default: No limit"))

        .arg(Arg::new("bland")
            .long("bland")
            .value_parser(value_parser!(bool))
            .required(false)
            .num_args(0)
            .help("Use Bland's rule from the first pivot of the simplex engine."))

        .arg(Arg::new("activity_decay")
            .long("activity-decay")
            .value_parser(value_parser!(Activity))
            .required(false)
            .num_args(1)
            .help("The factor applied to the activity of every atom each time a clause is learnt.
Default: 0.5"))

        .arg(Arg::new("random_decision_bias")
            .long("random-decision-bias")
            .value_parser(value_parser!(f64))
            .required(false)
            .num_args(1)
            .help("The probability of deciding on a random atom, rather than the most active atom.
Default: 0.0"))
}

pub fn config_from_args(args: &ArgMatches) -> Config {
    let mut the_config = Config::default();

    if let Ok(Some(secs)) = args.try_get_one::<u64>("time_limit") {
        the_config.time_limit = Some(std::time::Duration::from_secs(*secs))
    };

    if let Ok(Some(true)) = args.try_get_one::<bool>("bland") {
        the_config.simplex.bland_from_start.value = true
    };

    if let Ok(Some(decay)) = args.try_get_one::<Activity>("activity_decay") {
        if !the_config.activity_decay.set(*decay) {
            println!("c Activity decay {decay} is outside {:?}", the_config.activity_decay.min_max());
        }
    };

    if let Ok(Some(bias)) = args.try_get_one::<f64>("random_decision_bias") {
        if !the_config.random_decision_bias.set(*bias) {
            println!("c Random decision bias {bias} is outside {:?}", the_config.random_decision_bias.min_max());
        }
    };

    the_config
}

/// The input of the cli, as a formula or a path.
pub enum Input {
    Formula(String),
    Path(PathBuf),
}

pub fn input_from_args(args: &ArgMatches) -> Option<Input> {
    let input = args.get_one::<String>("input")?.clone();
    let from_file = matches!(args.try_get_one::<bool>("file"), Ok(Some(true)));
    let is_dimacs = args.get_one::<String>("mode").is_some_and(|mode| mode == "dimacs");

    match from_file || is_dimacs {
        true => Some(Input::Path(PathBuf::from(input))),
        false => Some(Input::Formula(input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn options_reach_the_config() {
        let args = cli()
            .try_get_matches_from(["otter_smt", "smt", "(x=y)", "-t", "3", "--bland"])
            .unwrap();
        let config = config_from_args(&args);
        assert_eq!(config.time_limit, Some(std::time::Duration::from_secs(3)));
        assert!(config.simplex.bland_from_start.value);
        assert!(matches!(input_from_args(&args), Some(Input::Formula(f)) if f == "(x=y)"));

        let args = cli()
            .try_get_matches_from(["otter_smt", "dimacs", "formula.cnf"])
            .unwrap();
        assert!(!config_from_args(&args).simplex.bland_from_start.value);
        assert!(matches!(input_from_args(&args), Some(Input::Path(_))));

        assert!(cli().try_get_matches_from(["otter_smt", "qbf", "p"]).is_err());
    }
}
