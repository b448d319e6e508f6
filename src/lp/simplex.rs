/*!
A revised simplex engine.

# Columns

The engine works over the columns of a [LinearProgram], together with a slack column for each row, and an auxiliary column with a coefficient of −1 in each row.
The slack columns form the initial basis, and the auxiliary column is used only if the initial basic solution is infeasible.

# Iteration

Each iteration:
- Computes the pricing vector y through [btran](Basis::btran), and the reduced cost cⱼ − yᵀaⱼ of each non-basic column.
  If no reduced cost is improving (greater than the feasibility tolerance) the basis is optimal.
- Orders the improving columns by the active rule:
  - *Dantzig's rule*: the largest reduced cost first.
  - *Bland's rule*: the smallest column first.
- For each improving column, in order, computes the direction d = B⁻¹aⱼ through [ftran](Basis::ftran), and the leaving row by the ratio test: the row i minimising xᵢ/dᵢ over the rows with dᵢ > 0, with ties broken by the smallest basic column.
  - If no row has dᵢ > 0, the objective is unbounded.
  - If the pivot element is below the pivot tolerance, the next improving column is tried.
    If every improving column has a small pivot element, the first is used regardless.
- Pivots, exchanging the entering column with the basic column of the leaving row and adding an eta matrix to the basis.
  If the eta file exceeds its limit, the basis is refactored.

Bland's rule is used from the first iteration if configured, and otherwise from the first iteration past C(n, m), where n is the count of structural and slack columns and m the count of rows, as any cycle must be broken by then.

# Phase one

If some bound is negative, the slack basis is infeasible.
Then, the auxiliary column enters the basis on the row of the most negative bound, giving a feasible basic solution to the auxiliary problem:

> maximise −x₀ subject to Ax − x₀ ≤ b, x, x₀ ≥ 0

If the optimum of the auxiliary problem is negative, the program is infeasible.
Otherwise, the auxiliary column is pivoted out of the basis (if it remains), and the engine continues with the objective of the program, never again considering the auxiliary column.
*/

use crate::{
    config::SimplexConfig,
    lp::{basis::Basis, LinearProgram, LpOutcome},
    misc::log::targets::{self},
    types::err::{self},
};

/// Ratio tests consider only rows whose direction entry exceeds this.
const RATIO_EPSILON: f64 = 1e-14;

/// The result of optimising over the current objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Optimal,
    Unbounded,
}

/// The state of the engine on a single program.
pub struct Simplex<'c> {
    config: &'c SimplexConfig,

    /// Every column, each with an entry for each row.
    columns: Vec<Vec<f64>>,

    /// A count of structural columns.
    structural: usize,

    /// The objective of the program.
    objective: Vec<f64>,

    /// The active objective, over every column.
    costs: Vec<f64>,

    /// The basic column of each row.
    basic: Vec<usize>,

    non_basic: Vec<usize>,

    /// The value of the basic column of each row.
    values: Vec<f64>,

    basis: Basis,

    /// A count of pivots made.
    iterations: usize,

    /// The count of pivots after which Bland's rule is used.
    bland_after: usize,
}

impl<'c> Simplex<'c> {
    /// An engine for `program`, with the slack basis.
    pub fn new(program: &LinearProgram, config: &'c SimplexConfig) -> Self {
        let rows = program.rows();
        let structural = program.columns();

        let mut columns = vec![vec![0.0; rows]; structural + rows + 1];
        for (row, constraint) in program.constraints().iter().enumerate() {
            for (column, coefficient) in &constraint.coefficients {
                columns[*column][row] = *coefficient;
            }
            columns[structural + row][row] = 1.0;
            columns[structural + rows][row] = -1.0;
        }

        let mut objective = vec![0.0; columns.len()];
        objective[..structural].copy_from_slice(program.objective());

        Simplex {
            config,
            columns,
            structural,
            costs: objective.clone(),
            objective,
            basic: (structural..structural + rows).collect(),
            non_basic: (0..structural).chain([structural + rows]).collect(),
            values: program
                .constraints()
                .iter()
                .map(|constraint| constraint.bound)
                .collect(),
            basis: Basis::identity(rows),
            iterations: 0,
            bland_after: binomial(structural + rows, rows),
        }
    }

    /// A count of pivots made.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Solves the program.
    pub fn run(&mut self) -> Result<LpOutcome, err::SimplexError> {
        let tolerance = self.config.feasibility_tolerance.value;

        if self.values.iter().any(|value| *value < -tolerance) {
            log::info!(target: targets::SIMPLEX, "Infeasible slack basis, solving the auxiliary problem");
            if !self.phase_one()? {
                log::info!(target: targets::SIMPLEX, "Infeasible after {} pivots", self.iterations);
                return Ok(LpOutcome::Infeasible);
            }
        }

        self.costs = self.objective.clone();
        match self.optimise(false)? {
            Step::Unbounded => {
                log::info!(target: targets::SIMPLEX, "Unbounded after {} pivots", self.iterations);
                Ok(LpOutcome::Unbounded)
            }

            Step::Optimal => {
                let mut assignment = vec![0.0; self.structural];
                for (row, column) in self.basic.iter().enumerate() {
                    if *column < self.structural {
                        assignment[*column] = self.values[row];
                    }
                }
                let objective = assignment
                    .iter()
                    .zip(&self.objective)
                    .map(|(x, c)| x * c)
                    .sum();
                log::info!(target: targets::SIMPLEX, "Optimal value {objective} after {} pivots", self.iterations);
                Ok(LpOutcome::Optimal {
                    assignment,
                    objective,
                })
            }
        }
    }

    /// The auxiliary column.
    fn auxiliary(&self) -> usize {
        self.columns.len() - 1
    }

    /// Solves the auxiliary problem, returning true if the program is feasible.
    ///
    /// On a return of true the basis is a feasible basis of the program, without the auxiliary column.
    fn phase_one(&mut self) -> Result<bool, err::SimplexError> {
        let auxiliary = self.auxiliary();
        let tolerance = self.config.feasibility_tolerance.value;

        let mut row = 0;
        for (index, value) in self.values.iter().enumerate() {
            if *value < self.values[row] {
                row = index;
            }
        }
        let Some(position) = self.non_basic.iter().position(|c| *c == auxiliary) else {
            return Err(err::SimplexError::Dimension);
        };
        let direction = self.basis.ftran(&self.columns[auxiliary]);
        self.pivot(position, row, direction)?;

        self.costs = vec![0.0; self.columns.len()];
        self.costs[auxiliary] = -1.0;
        if self.optimise(true)? == Step::Unbounded {
            return Err(err::SimplexError::AuxiliaryUnbounded);
        }

        let Some(row) = self.basic.iter().position(|c| *c == auxiliary) else {
            return Ok(true);
        };
        if self.values[row] > tolerance {
            return Ok(false);
        }

        // The auxiliary column is basic at zero, and is exchanged for any column with a usable entry on its row.
        let mut unit = vec![0.0; self.basic.len()];
        unit[row] = 1.0;
        let row_of_inverse = self.basis.btran(&unit);
        let mut best: Option<(usize, f64)> = None;
        for (position, column) in self.non_basic.iter().enumerate() {
            if *column == auxiliary {
                continue;
            }
            let entry = dot(&row_of_inverse, &self.columns[*column]).abs();
            if best.map_or(true, |(_, best_entry)| entry > best_entry) {
                best = Some((position, entry));
            }
        }

        match best {
            Some((position, entry)) if entry > self.config.pivot_tolerance.value => {
                let direction = self.basis.ftran(&self.columns[self.non_basic[position]]);
                self.pivot(position, row, direction)?;
            }
            _ => {
                log::trace!(target: targets::SIMPLEX, "Auxiliary column remains basic on redundant row {row}");
            }
        }
        Ok(true)
    }

    /// Pivots until the active objective is optimal or shown to be unbounded.
    fn optimise(&mut self, with_auxiliary: bool) -> Result<Step, err::SimplexError> {
        let auxiliary = self.auxiliary();
        let tolerance = self.config.feasibility_tolerance.value;

        loop {
            if let Some(limit) = self.config.iteration_limit {
                if self.iterations >= limit {
                    return Err(err::SimplexError::IterationLimit);
                }
            }

            let basic_costs: Vec<f64> = self.basic.iter().map(|c| self.costs[*c]).collect();
            let prices = self.basis.btran(&basic_costs);

            let mut candidates: Vec<(usize, f64)> = self
                .non_basic
                .iter()
                .enumerate()
                .filter(|(_, column)| with_auxiliary || **column != auxiliary)
                .map(|(position, column)| {
                    let reduced = self.costs[*column] - dot(&prices, &self.columns[*column]);
                    (position, reduced)
                })
                .filter(|(_, reduced)| *reduced > tolerance)
                .collect();

            if candidates.is_empty() {
                return Ok(Step::Optimal);
            }

            let bland =
                self.config.bland_from_start.value || self.iterations > self.bland_after;
            match bland {
                true => candidates.sort_by_key(|(position, _)| self.non_basic[*position]),
                false => candidates.sort_by(|(a, a_cost), (b, b_cost)| {
                    b_cost
                        .total_cmp(a_cost)
                        .then(self.non_basic[*a].cmp(&self.non_basic[*b]))
                }),
            }

            let mut chosen = None;
            let mut fallback = None;
            for (position, _) in candidates {
                let direction = self.basis.ftran(&self.columns[self.non_basic[position]]);
                let Some(row) = self.ratio_test(&direction) else {
                    return Ok(Step::Unbounded);
                };

                if direction[row].abs() >= self.config.pivot_tolerance.value {
                    chosen = Some((position, row, direction));
                    break;
                }
                log::trace!(target: targets::SIMPLEX, "Small pivot {} on column {}", direction[row], self.non_basic[position]);
                if fallback.is_none() {
                    fallback = Some((position, row, direction));
                }
            }

            match chosen.or(fallback) {
                Some((position, row, direction)) => self.pivot(position, row, direction)?,
                None => return Err(err::SimplexError::SingularBasis),
            }
        }
    }

    /// The leaving row for `direction`, if any.
    fn ratio_test(&self, direction: &[f64]) -> Option<usize> {
        let mut leaving: Option<(usize, f64)> = None;
        for (row, entry) in direction.iter().enumerate() {
            if *entry <= RATIO_EPSILON {
                continue;
            }
            let ratio = self.values[row].max(0.0) / entry;
            leaving = match leaving {
                None => Some((row, ratio)),
                Some((best_row, best)) => {
                    if ratio < best || (ratio == best && self.basic[row] < self.basic[best_row]) {
                        Some((row, ratio))
                    } else {
                        Some((best_row, best))
                    }
                }
            };
        }
        leaving.map(|(row, _)| row)
    }

    /// Exchanges the non-basic column at `position` with the basic column of `row`.
    fn pivot(
        &mut self,
        position: usize,
        row: usize,
        direction: Vec<f64>,
    ) -> Result<(), err::SimplexError> {
        let entering = self.non_basic[position];
        let leaving = self.basic[row];
        let step = self.values[row] / direction[row];

        for (index, value) in self.values.iter_mut().enumerate() {
            if index != row {
                *value -= step * direction[index];
            }
        }
        self.values[row] = step;

        self.basic[row] = entering;
        self.non_basic[position] = leaving;
        self.basis.push_eta(row, direction);
        self.iterations += 1;
        log::trace!(target: targets::SIMPLEX, "Pivot {entering} in for {leaving} on row {row}, step {step}");

        if self.basis.eta_count() > self.config.eta_limit.value {
            let columns: Vec<&[f64]> = self
                .basic
                .iter()
                .map(|column| self.columns[*column].as_slice())
                .collect();
            self.basis.refactor(&columns)?;
            log::trace!(target: targets::SIMPLEX, "Refactored basis");
        }
        Ok(())
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// The binomial coefficient C(n, k), saturating at the maximum usize.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
        if result > usize::MAX as u128 {
            return usize::MAX;
        }
    }
    result as usize
}
