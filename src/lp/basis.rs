/*!
The basis of the simplex engine.

The basis matrix B is kept as a product B₀E₁…Eₖ, where B₀ is held as an LU factorisation (with partial pivoting), and each Eᵢ is an *eta* matrix: the identity, with a single column replaced.

After each pivot an eta matrix is added to the file, and so the basis is updated without any factorisation.
Though, as the file grows, so does the cost of each use of the basis, and the numerical error in the results.
So, the file is periodically cleared, by [refactoring](Basis::refactor) the current basis matrix.

Two operations use the basis:
- [ftran](Basis::ftran) solves Bx = a, through the factors of B₀ and then each eta matrix, oldest first.
- [btran](Basis::btran) solves yᵀB = cᵀ, through each eta matrix, newest first, and then the factors of B₀.
*/

use crate::types::err::{self};

/// Pivot elements of a factorisation with magnitude below this are taken to show the matrix is singular.
const SINGULAR: f64 = 1e-13;

/// An eta matrix, given by the row of the replaced column and the replacement column.
#[derive(Clone, Debug)]
struct Eta {
    row: usize,
    column: Vec<f64>,
}

/// A basis, as an LU factorisation and a file of eta matrices.
#[derive(Clone, Debug)]
pub struct Basis {
    size: usize,

    /// The unit lower triangular factor, row major.
    lower: Vec<Vec<f64>>,

    /// The upper triangular factor, row major.
    upper: Vec<Vec<f64>>,

    /// The row of the factorised matrix moved to each row by partial pivoting.
    permutation: Vec<usize>,

    etas: Vec<Eta>,
}

impl Basis {
    /// The identity basis, with an empty eta file.
    pub fn identity(size: usize) -> Self {
        let identity: Vec<Vec<f64>> = (0..size)
            .map(|i| (0..size).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        Basis {
            size,
            lower: identity.clone(),
            upper: identity,
            permutation: (0..size).collect(),
            etas: Vec::default(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// A count of eta matrices in the file.
    pub fn eta_count(&self) -> usize {
        self.etas.len()
    }

    /// Factorises the matrix with the given columns, and clears the eta file.
    ///
    /// The basis is unchanged if the matrix is singular.
    pub fn refactor(&mut self, columns: &[&[f64]]) -> Result<(), err::SimplexError> {
        let n = self.size;
        if columns.len() != n || columns.iter().any(|column| column.len() != n) {
            return Err(err::SimplexError::Dimension);
        }

        let mut upper: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| columns[j][i]).collect())
            .collect();
        let mut lower = vec![vec![0.0; n]; n];
        let mut permutation: Vec<usize> = (0..n).collect();

        for k in 0..n {
            let pivot_row = (k..n)
                .max_by(|a, b| upper[*a][k].abs().total_cmp(&upper[*b][k].abs()))
                .unwrap_or(k);
            if upper[pivot_row][k].abs() < SINGULAR {
                log::error!(target: crate::misc::log::targets::SIMPLEX, "Singular basis at column {k}");
                return Err(err::SimplexError::SingularBasis);
            }
            upper.swap(k, pivot_row);
            lower.swap(k, pivot_row);
            permutation.swap(k, pivot_row);

            let pivot = upper[k].clone();
            for i in (k + 1)..n {
                let factor = upper[i][k] / pivot[k];
                lower[i][k] = factor;
                for j in k..n {
                    upper[i][j] -= factor * pivot[j];
                }
            }
        }

        for (i, row) in lower.iter_mut().enumerate() {
            row[i] = 1.0;
        }

        self.lower = lower;
        self.upper = upper;
        self.permutation = permutation;
        self.etas.clear();
        Ok(())
    }

    /// Adds the eta matrix which replaces column `row` of the identity with `column`.
    pub fn push_eta(&mut self, row: usize, column: Vec<f64>) {
        self.etas.push(Eta { row, column });
    }

    /// The solution x to Bx = a.
    pub fn ftran(&self, a: &[f64]) -> Vec<f64> {
        let mut x = self.solve_factors(a);
        for eta in &self.etas {
            let pivot = x[eta.row] / eta.column[eta.row];
            for (i, entry) in x.iter_mut().enumerate() {
                if i != eta.row {
                    *entry -= eta.column[i] * pivot;
                }
            }
            x[eta.row] = pivot;
        }
        x
    }

    /// The solution y to yᵀB = cᵀ.
    pub fn btran(&self, c: &[f64]) -> Vec<f64> {
        let mut w = c.to_vec();
        for eta in self.etas.iter().rev() {
            let off_pivot: f64 = w
                .iter()
                .zip(&eta.column)
                .enumerate()
                .filter(|(i, _)| *i != eta.row)
                .map(|(_, (w, d))| w * d)
                .sum();
            w[eta.row] = (w[eta.row] - off_pivot) / eta.column[eta.row];
        }
        self.solve_factors_transposed(&w)
    }

    /// The solution x to B₀x = a.
    fn solve_factors(&self, a: &[f64]) -> Vec<f64> {
        let n = self.size;
        let mut z = vec![0.0; n];
        for i in 0..n {
            let below: f64 = (0..i).map(|j| self.lower[i][j] * z[j]).sum();
            z[i] = a[self.permutation[i]] - below;
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let above: f64 = ((i + 1)..n).map(|j| self.upper[i][j] * x[j]).sum();
            x[i] = (z[i] - above) / self.upper[i][i];
        }
        x
    }

    /// The solution y to B₀ᵀy = w.
    fn solve_factors_transposed(&self, w: &[f64]) -> Vec<f64> {
        let n = self.size;
        let mut s = vec![0.0; n];
        for i in 0..n {
            let below: f64 = (0..i).map(|j| self.upper[j][i] * s[j]).sum();
            s[i] = (w[i] - below) / self.upper[i][i];
        }

        let mut v = vec![0.0; n];
        for i in (0..n).rev() {
            let above: f64 = ((i + 1)..n).map(|j| self.lower[j][i] * v[j]).sum();
            v[i] = s[i] - above;
        }

        let mut y = vec![0.0; n];
        for (i, value) in v.into_iter().enumerate() {
            y[self.permutation[i]] = value;
        }
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multiply(columns: &[Vec<f64>], x: &[f64]) -> Vec<f64> {
        let n = x.len();
        (0..n)
            .map(|i| (0..n).map(|j| columns[j][i] * x[j]).sum())
            .collect()
    }

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn factorisation_solves() {
        let columns = vec![
            vec![0.0, 2.0, 1.0],
            vec![3.0, 1.0, 0.0],
            vec![1.0, 1.0, 4.0],
        ];
        let mut basis = Basis::identity(3);
        let borrowed: Vec<&[f64]> = columns.iter().map(|c| c.as_slice()).collect();
        basis.refactor(&borrowed).unwrap();

        let a = [5.0, -1.0, 2.0];
        let x = basis.ftran(&a);
        assert!(close(&multiply(&columns, &x), &a));

        // yᵀB has entry j equal to y · column j.
        let y = basis.btran(&a);
        let yb: Vec<f64> = columns
            .iter()
            .map(|column| column.iter().zip(&y).map(|(b, y)| b * y).sum())
            .collect();
        assert!(close(&yb, &a));
    }

    #[test]
    fn eta_updates() {
        let mut columns = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let mut basis = Basis::identity(2);

        // Replace the second column of the basis with (2, 4).
        let entering = vec![2.0, 4.0];
        let d = basis.ftran(&entering);
        basis.push_eta(1, d);
        columns[1] = entering;

        let a = [3.0, 8.0];
        let x = basis.ftran(&a);
        assert!(close(&multiply(&columns, &x), &a));

        let y = basis.btran(&a);
        let yb: Vec<f64> = columns
            .iter()
            .map(|column| column.iter().zip(&y).map(|(b, y)| b * y).sum())
            .collect();
        assert!(close(&yb, &a));
    }

    #[test]
    fn singular_refactor() {
        let columns = [vec![1.0, 2.0], vec![2.0, 4.0]];
        let borrowed: Vec<&[f64]> = columns.iter().map(|c| c.as_slice()).collect();
        let mut basis = Basis::identity(2);
        assert_eq!(
            basis.refactor(&borrowed),
            Err(err::SimplexError::SingularBasis)
        );
    }
}
