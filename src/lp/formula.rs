/*!
Linear arithmetic formulas, decided through the [simplex engine](crate::lp::simplex).

# Syntax

Formulas are [first-order formulas](crate::language::predicate) whose atoms compare two arithmetic terms:

| Relation   | Reading  |
|------------|----------|
| `GS(t,s)`  | t ≥ s    |
| `KS(t,s)`  | t ≤ s    |
| `K(t,s)`   | t < s    |
| `S(t,s)`   | t = s    |
| `t=s`      | t = s    |
| `LS(t,s)`  | t ≠ s    |

And whose terms are numerals, variables, and the functions `plus`, `minus`, and `mult` (or `multi`), where at least one argument of each multiplication is constant.

# Decision

A formula is decided by:
1. Pushing each negation onto an atom, where the negated relation is read as a relation without negation:
   - ¬(t ≥ s) is t < s, and ¬(t < s) is t ≥ s.
   - ¬(t ≤ s) is s < t.
   - ¬(t = s) is t ≠ s, and ¬(t ≠ s) is t = s.
2. Writing each atom as a conjunction of rows `Σ aᵢxᵢ ≤ c` (or `Σ aᵢxᵢ < c`), with an equality giving two rows and a disequality a disjunction of two strict rows.
3. Expanding the formula to disjunctive normal form, with each clause of the normal form a conjunction of rows.
4. Deciding each clause by a linear program.

Variables range over the reals, and so each variable is written as the difference of two non-negative columns.
Strict rows share a column ε, with `Σ aᵢxᵢ + ε ≤ c` for each strict row, ε ≤ 1, and the objective to maximise ε.
A clause is satisfiable if its program is feasible, and ε is positive at the optimum, if there is some strict row.

```rust
# use otter_smt::config::SimplexConfig;
# use otter_smt::lp::formula::LpFormula;
let config = SimplexConfig::default();

let formula = LpFormula::parse("(GS(plus(mult(2,x),z),1)&~GS(z,1))").unwrap();
let witness = formula.solve(&config).unwrap().unwrap();
assert!(2.0 * witness["x"] + witness["z"] >= 1.0 - 1e-9);
assert!(witness["z"] < 1.0);

let formula = LpFormula::parse("(K(x,y)&K(y,x))").unwrap();
assert_eq!(formula.solve(&config).unwrap(), None);
```
*/

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    config::SimplexConfig,
    language::predicate::{Formula, Term},
    lp::{LinearProgram, LpOutcome},
    misc::log::targets::{self},
    types::err::{self, ErrorKind},
};

/// An assignment of values to variables.
pub type Assignment = BTreeMap<String, f64>;

/// A linear expression `Σ aᵢxᵢ + k`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    pub coefficients: BTreeMap<String, f64>,
    pub constant: f64,
}

impl LinearExpr {
    fn of_constant(constant: f64) -> Self {
        LinearExpr {
            coefficients: BTreeMap::default(),
            constant,
        }
    }

    fn of_variable(name: &str) -> Self {
        LinearExpr {
            coefficients: BTreeMap::from([(name.to_owned(), 1.0)]),
            constant: 0.0,
        }
    }

    /// The expression `self + factor · other`.
    fn add_scaled(mut self, other: &LinearExpr, factor: f64) -> Self {
        for (name, coefficient) in &other.coefficients {
            *self.coefficients.entry(name.clone()).or_insert(0.0) += factor * coefficient;
        }
        self.constant += factor * other.constant;
        self.coefficients.retain(|_, coefficient| *coefficient != 0.0);
        self
    }

    fn scale(self, factor: f64) -> Self {
        LinearExpr::default().add_scaled(&self, factor)
    }

    /// True if no variable has a non-zero coefficient.
    pub fn is_constant(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// The expression of an arithmetic term.
    pub fn of_term(term: &Term) -> Result<LinearExpr, err::ParseError> {
        let not_linear = || err::ParseError::NotLinear(term.to_string());

        match term {
            Term::Variable(name) => Ok(LinearExpr::of_variable(name)),

            Term::Constant(name) => match name.parse::<f64>() {
                Ok(value) => Ok(LinearExpr::of_constant(value)),
                Err(_) => Err(not_linear()),
            },

            Term::Function(name, arguments) => {
                let mut expressions = arguments
                    .iter()
                    .map(LinearExpr::of_term)
                    .collect::<Result<Vec<_>, _>>()?
                    .into_iter();

                match name.as_str() {
                    "plus" => Ok(expressions.fold(LinearExpr::default(), |sum, expression| {
                        sum.add_scaled(&expression, 1.0)
                    })),

                    "minus" => {
                        let Some(first) = expressions.next() else {
                            return Err(not_linear());
                        };
                        match arguments.len() {
                            1 => Ok(first.scale(-1.0)),
                            _ => Ok(expressions.fold(first, |difference, expression| {
                                difference.add_scaled(&expression, -1.0)
                            })),
                        }
                    }

                    "mult" | "multi" => {
                        let mut product = LinearExpr::of_constant(1.0);
                        for expression in expressions {
                            product = match (product.is_constant(), expression.is_constant()) {
                                (true, _) => expression.scale(product.constant),
                                (false, true) => product.scale(expression.constant),
                                (false, false) => return Err(not_linear()),
                            };
                        }
                        Ok(product)
                    }

                    _ => Err(not_linear()),
                }
            }
        }
    }
}

/// A comparison of two arithmetic terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    /// `GS`
    AtLeast,

    /// `KS`
    AtMost,

    /// `K`
    Less,

    /// `S`, or the infix equality.
    Equal,

    /// `LS`
    NotEqual,
}

impl Comparison {
    /// The comparison named by a relation symbol, if any.
    pub fn from_relation(name: &str) -> Option<Self> {
        match name {
            "GS" => Some(Self::AtLeast),
            "KS" => Some(Self::AtMost),
            "K" => Some(Self::Less),
            "S" => Some(Self::Equal),
            "LS" => Some(Self::NotEqual),
            _ => None,
        }
    }
}

/// A row `Σ aᵢxᵢ ≤ bound`, or `Σ aᵢxᵢ < bound` if strict.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub coefficients: BTreeMap<String, f64>,
    pub bound: f64,
    pub strict: bool,
}

impl Row {
    /// The row `expression ≤ 0` (or `< 0`).
    fn non_positive(expression: LinearExpr, strict: bool) -> Self {
        Row {
            coefficients: expression.coefficients,
            bound: -expression.constant,
            strict,
        }
    }

    /// True if `assignment` satisfies the row, up to `tolerance`.
    pub fn satisfied_by(&self, assignment: &Assignment, tolerance: f64) -> bool {
        let value: f64 = self
            .coefficients
            .iter()
            .map(|(name, coefficient)| coefficient * assignment.get(name).copied().unwrap_or(0.0))
            .sum();
        match self.strict {
            true => value < self.bound,
            false => value <= self.bound + tolerance,
        }
    }
}

/// A disjunction of conjunctions of rows.
type Dnf = Vec<Vec<Row>>;

/// The rows of a comparison of `left` with `right`, or its negation.
fn comparison_rows(comparison: Comparison, left: &LinearExpr, right: &LinearExpr, positive: bool) -> Dnf {
    let (comparison, left, right) = match (positive, comparison) {
        (true, _) => (comparison, left, right),
        (false, Comparison::AtLeast) => (Comparison::Less, left, right),
        (false, Comparison::AtMost) => (Comparison::Less, right, left),
        (false, Comparison::Less) => (Comparison::AtLeast, left, right),
        (false, Comparison::Equal) => (Comparison::NotEqual, left, right),
        (false, Comparison::NotEqual) => (Comparison::Equal, left, right),
    };

    let difference = left.clone().add_scaled(right, -1.0);
    let reversed = difference.clone().scale(-1.0);

    match comparison {
        Comparison::AtMost => vec![vec![Row::non_positive(difference, false)]],
        Comparison::AtLeast => vec![vec![Row::non_positive(reversed, false)]],
        Comparison::Less => vec![vec![Row::non_positive(difference, true)]],
        Comparison::Equal => vec![vec![
            Row::non_positive(difference, false),
            Row::non_positive(reversed, false),
        ]],
        Comparison::NotEqual => vec![
            vec![Row::non_positive(difference, true)],
            vec![Row::non_positive(reversed, true)],
        ],
    }
}

/// Every conjunction of a clause of `a` with a clause of `b`.
fn distribute(a: Dnf, b: Dnf) -> Dnf {
    let mut product = Vec::with_capacity(a.len() * b.len());
    for first in &a {
        for second in &b {
            product.push(first.iter().chain(second).cloned().collect());
        }
    }
    product
}

/// The normal form of `formula`, or its negation.
fn normal_form(formula: &Formula, positive: bool) -> Result<Dnf, err::ParseError> {
    match formula {
        Formula::Equality(left, right) => Ok(comparison_rows(
            Comparison::Equal,
            &LinearExpr::of_term(left)?,
            &LinearExpr::of_term(right)?,
            positive,
        )),

        Formula::Relation(name, arguments) => {
            let (Some(comparison), [left, right]) = (Comparison::from_relation(name), arguments.as_slice()) else {
                return Err(err::ParseError::NotArithmetic(formula.to_string()));
            };
            Ok(comparison_rows(
                comparison,
                &LinearExpr::of_term(left)?,
                &LinearExpr::of_term(right)?,
                positive,
            ))
        }

        Formula::Not(inner) => normal_form(inner, !positive),

        Formula::And(a, b) => match positive {
            true => Ok(distribute(normal_form(a, true)?, normal_form(b, true)?)),
            false => Ok([normal_form(a, false)?, normal_form(b, false)?].concat()),
        },

        Formula::Or(a, b) => match positive {
            true => Ok([normal_form(a, true)?, normal_form(b, true)?].concat()),
            false => Ok(distribute(normal_form(a, false)?, normal_form(b, false)?)),
        },

        Formula::Implies(a, b) => match positive {
            true => Ok([normal_form(a, false)?, normal_form(b, true)?].concat()),
            false => Ok(distribute(normal_form(a, true)?, normal_form(b, false)?)),
        },

        Formula::ForAll(_, _) | Formula::Exists(_, _) => {
            Err(err::ParseError::NotArithmetic(formula.to_string()))
        }
    }
}

/// A linear arithmetic formula, as a disjunction of conjunctions of rows.
#[derive(Clone, Debug)]
pub struct LpFormula {
    clauses: Dnf,
}

impl LpFormula {
    /// The arithmetic reading of `formula`.
    pub fn new(formula: &Formula) -> Result<Self, err::ParseError> {
        let clauses = normal_form(formula, true)?;
        log::info!(target: targets::PREPROCESSING, "{} clauses in normal form", clauses.len());
        Ok(LpFormula { clauses })
    }

    /// The arithmetic formula written in `string`.
    pub fn parse(string: &str) -> Result<Self, err::ParseError> {
        LpFormula::new(&Formula::parse(string)?)
    }

    /// The clauses of the disjunctive normal form of the formula.
    pub fn clauses(&self) -> &[Vec<Row>] {
        &self.clauses
    }

    /// A witness to the formula, if the formula is satisfiable.
    ///
    /// Clauses are decided in order, and the witness is an assignment satisfying the first satisfiable clause.
    pub fn solve(&self, config: &SimplexConfig) -> Result<Option<Assignment>, ErrorKind> {
        for (index, clause) in self.clauses.iter().enumerate() {
            if let Some(witness) = solve_clause(clause, config)? {
                log::info!(target: targets::SIMPLEX, "Clause {index} is satisfiable");
                return Ok(Some(witness));
            }
            log::trace!(target: targets::SIMPLEX, "Clause {index} is unsatisfiable");
        }
        Ok(None)
    }
}

/// A witness to the conjunction of `rows`, if the conjunction is satisfiable.
pub fn solve_clause(rows: &[Row], config: &SimplexConfig) -> Result<Option<Assignment>, ErrorKind> {
    let names: Vec<&String> = rows
        .iter()
        .flat_map(|row| row.coefficients.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let strict = rows.iter().any(|row| row.strict);

    // Variable i is column 2i less column 2i + 1, and ε is the final column.
    let epsilon = 2 * names.len();
    let mut program = LinearProgram::new(epsilon + usize::from(strict));

    for row in rows {
        let mut coefficients = Vec::default();
        for (index, name) in names.iter().enumerate() {
            if let Some(coefficient) = row.coefficients.get(*name) {
                coefficients.push((2 * index, *coefficient));
                coefficients.push((2 * index + 1, -coefficient));
            }
        }
        if row.strict {
            coefficients.push((epsilon, 1.0));
        }
        program.add_constraint(coefficients, row.bound)?;
    }

    if strict {
        program.add_constraint([(epsilon, 1.0)], 1.0)?;
        program.set_objective([(epsilon, 1.0)])?;
    }

    match program.solve(config)? {
        LpOutcome::Infeasible => Ok(None),

        LpOutcome::Unbounded => {
            log::error!(target: targets::SIMPLEX, "Unbounded program for a bounded objective");
            Err(ErrorKind::InvalidState)
        }

        LpOutcome::Optimal {
            assignment,
            objective,
        } => {
            if strict && objective <= config.feasibility_tolerance.value {
                return Ok(None);
            }
            let witness = names
                .iter()
                .enumerate()
                .map(|(index, name)| {
                    ((*name).clone(), assignment[2 * index] - assignment[2 * index + 1])
                })
                .collect();
            Ok(Some(witness))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expression(string: &str) -> Result<LinearExpr, err::ParseError> {
        LinearExpr::of_term(&Term::parse(string).unwrap())
    }

    #[test]
    fn linear_terms() {
        let e = expression("minus(plus(mult(2,x),mult(y,3)),minus(0,5))").unwrap();
        assert_eq!(e.coefficients, BTreeMap::from([("x".to_string(), 2.0), ("y".to_string(), 3.0)]));
        assert_eq!(e.constant, 5.0);

        let e = expression("minus(plus(x,y),x)").unwrap();
        assert_eq!(e.coefficients, BTreeMap::from([("y".to_string(), 1.0)]));

        assert!(matches!(expression("mult(x,y)"), Err(err::ParseError::NotLinear(_))));
        assert!(matches!(expression("f(x)"), Err(err::ParseError::NotLinear(_))));
        assert!(matches!(expression("c"), Err(err::ParseError::NotLinear(_))));
    }

    #[test]
    fn negated_relations() {
        // ~KS(x,1) is 1 < x, so -x < -1.
        let formula = LpFormula::parse("~KS(x,1)").unwrap();
        assert_eq!(
            formula.clauses(),
            &[vec![Row {
                coefficients: BTreeMap::from([("x".to_string(), -1.0)]),
                bound: -1.0,
                strict: true
            }]]
        );

        // ~S(x,y) is a disjunction of two strict rows.
        let formula = LpFormula::parse("~S(x,y)").unwrap();
        assert_eq!(formula.clauses().len(), 2);
        assert!(formula.clauses().iter().all(|c| c.len() == 1 && c[0].strict));

        assert!(matches!(
            LpFormula::parse("R(x,y)"),
            Err(err::ParseError::NotArithmetic(_))
        ));
    }

    #[test]
    fn normal_form_expansion() {
        // (a | b) & (c | d) has four clauses.
        let formula = LpFormula::parse("((GS(x,1)|GS(y,1))&(KS(x,0)|KS(y,0)))").unwrap();
        assert_eq!(formula.clauses().len(), 4);

        let config = SimplexConfig::default();
        let witness = formula.solve(&config).unwrap().unwrap();
        assert!(formula
            .clauses()
            .iter()
            .any(|clause| clause.iter().all(|row| row.satisfied_by(&witness, 1e-9))));
    }

    #[test]
    fn strict_and_free() {
        let config = SimplexConfig::default();

        // Variables may be negative.
        let witness = LpFormula::parse("KS(x,minus(0,3))")
            .unwrap()
            .solve(&config)
            .unwrap()
            .unwrap();
        assert!(witness["x"] <= -3.0 + 1e-9);

        // x < y and y < x + 1 is satisfiable over the reals.
        let formula = LpFormula::parse("(K(x,y)&K(y,plus(x,1)))").unwrap();
        let witness = formula.solve(&config).unwrap().unwrap();
        assert!(witness["x"] < witness["y"]);

        // x ≤ y and y ≤ x and x ≠ y is not.
        let formula = LpFormula::parse("((KS(x,y)&KS(y,x))&LS(x,y))").unwrap();
        assert_eq!(formula.solve(&config).unwrap(), None);
    }
}
