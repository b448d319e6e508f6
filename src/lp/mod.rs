/*!
Linear programs, and a revised simplex engine to solve them.

# Programs

A [LinearProgram] is a problem of the form:

> maximise cᵀx subject to Ax ≤ b, x ≥ 0

Programs are built column by column, with each constraint given as a sparse list of (column, coefficient) pairs and a bound.

```rust
# use otter_smt::config::SimplexConfig;
# use otter_smt::lp::{LinearProgram, LpOutcome};
let mut program = LinearProgram::new(2);
program.set_objective([(0, 3.0), (1, 2.0)]).unwrap();
program.add_constraint([(0, 1.0), (1, 1.0)], 4.0).unwrap();
program.add_constraint([(0, 1.0), (1, 3.0)], 6.0).unwrap();
program.add_constraint([(0, 1.0)], 3.0).unwrap();

match program.solve(&SimplexConfig::default()).unwrap() {
    LpOutcome::Optimal { assignment, objective } => {
        assert!((objective - 11.0).abs() < 1e-9);
        assert!((assignment[0] - 3.0).abs() < 1e-9);
        assert!((assignment[1] - 1.0).abs() < 1e-9);
    }
    _ => panic!("expected an optimal solution"),
}
```

# The engine

See [simplex] for the engine, [basis] for the representation of the basis, and [formula] for the use of the engine to decide linear arithmetic formulas.
*/

pub mod basis;
pub mod formula;
pub mod simplex;

use crate::{
    config::SimplexConfig,
    types::err::{self, ErrorKind},
};

/// The outcome of solving a linear program.
#[derive(Clone, Debug, PartialEq)]
pub enum LpOutcome {
    /// An optimal assignment to the columns of the program, and the value of the objective at the assignment.
    Optimal { assignment: Vec<f64>, objective: f64 },

    /// The objective is unbounded on the feasible region.
    Unbounded,

    /// The feasible region is empty.
    Infeasible,
}

/// A constraint `Σ aᵢxᵢ ≤ b`.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    /// Pairs of a column and its (non-zero) coefficient.
    pub coefficients: Vec<(usize, f64)>,

    /// The bound.
    pub bound: f64,
}

/// A linear program in standard form.
#[derive(Clone, Debug, Default)]
pub struct LinearProgram {
    columns: usize,
    objective: Vec<f64>,
    constraints: Vec<Constraint>,
}

impl LinearProgram {
    /// A program over the given number of columns, with a zero objective and no constraints.
    pub fn new(columns: usize) -> Self {
        LinearProgram {
            columns,
            objective: vec![0.0; columns],
            constraints: Vec::default(),
        }
    }

    /// A count of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// A count of constraints.
    pub fn rows(&self) -> usize {
        self.constraints.len()
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Sets the coefficient of each given column in the objective, leaving the coefficients of other columns unchanged.
    pub fn set_objective(
        &mut self,
        coefficients: impl IntoIterator<Item = (usize, f64)>,
    ) -> Result<(), err::SimplexError> {
        for (column, coefficient) in coefficients {
            match self.objective.get_mut(column) {
                Some(entry) => *entry = coefficient,
                None => return Err(err::SimplexError::Dimension),
            }
        }
        Ok(())
    }

    /// Adds the constraint `Σ aᵢxᵢ ≤ bound`, where each aᵢ is given as a pair (i, aᵢ).
    ///
    /// Coefficients given to the same column are summed, and zero coefficients are dropped.
    pub fn add_constraint(
        &mut self,
        coefficients: impl IntoIterator<Item = (usize, f64)>,
        bound: f64,
    ) -> Result<(), err::SimplexError> {
        let mut dense = vec![0.0; self.columns];
        for (column, coefficient) in coefficients {
            match dense.get_mut(column) {
                Some(entry) => *entry += coefficient,
                None => return Err(err::SimplexError::Dimension),
            }
        }

        let coefficients = dense
            .into_iter()
            .enumerate()
            .filter(|(_, coefficient)| *coefficient != 0.0)
            .collect();
        self.constraints.push(Constraint {
            coefficients,
            bound,
        });
        Ok(())
    }

    /// The value of the objective at `assignment`.
    pub fn objective_value(&self, assignment: &[f64]) -> f64 {
        self.objective
            .iter()
            .zip(assignment)
            .map(|(c, x)| c * x)
            .sum()
    }

    /// True if `assignment` is non-negative and satisfies every constraint, up to `tolerance`.
    pub fn satisfies(&self, assignment: &[f64], tolerance: f64) -> bool {
        if assignment.len() != self.columns || assignment.iter().any(|x| *x < -tolerance) {
            return false;
        }
        self.constraints.iter().all(|constraint| {
            let value: f64 = constraint
                .coefficients
                .iter()
                .map(|(column, coefficient)| coefficient * assignment[*column])
                .sum();
            value <= constraint.bound + tolerance
        })
    }

    /// Solves the program with the revised simplex engine.
    pub fn solve(&self, config: &SimplexConfig) -> Result<LpOutcome, ErrorKind> {
        let mut engine = simplex::Simplex::new(self, config);
        Ok(engine.run()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_dimensions() {
        let mut program = LinearProgram::new(2);
        assert_eq!(
            program.add_constraint([(2, 1.0)], 1.0),
            Err(err::SimplexError::Dimension)
        );
        assert_eq!(
            program.set_objective([(5, 1.0)]),
            Err(err::SimplexError::Dimension)
        );

        program.add_constraint([(0, 1.0), (1, 2.0), (0, -1.0)], 3.0).unwrap();
        assert_eq!(program.constraints()[0].coefficients, vec![(1, 2.0)]);
        assert!(program.satisfies(&[7.0, 1.5], 1e-9));
        assert!(!program.satisfies(&[0.0, 1.6], 1e-9));
        assert!(!program.satisfies(&[-1.0, 0.0], 1e-9));
    }
}
