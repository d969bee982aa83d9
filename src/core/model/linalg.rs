//! Dense least-squares helpers for the small systems the additive model produces.

use crate::errors::ModelError;

/// Added to every diagonal entry so unpenalised columns stay positive definite.
const DIAGONAL_JITTER: f64 = 1e-10;

/// Relative pivot size below which the system is treated as singular.
const PIVOT_TOLERANCE: f64 = 1e-13;

/// Minimises `||y - X b||^2 + sum(penalty_j * b_j^2)` through the normal equations.
pub(crate) fn solve_ridge(
    design: &[Vec<f64>],
    target: &[f64],
    penalties: &[f64],
) -> Result<Vec<f64>, ModelError> {
    let width = penalties.len();
    let mut gram = vec![vec![0.0; width]; width];
    let mut rhs = vec![0.0; width];

    for (row, &y) in design.iter().zip(target) {
        debug_assert_eq!(row.len(), width);
        for i in 0..width {
            rhs[i] += row[i] * y;
            for j in 0..=i {
                gram[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..width {
        gram[i][i] += penalties[i] + DIAGONAL_JITTER;
        for j in 0..i {
            gram[j][i] = gram[i][j];
        }
    }

    cholesky_solve(gram, &rhs)
}

/// Solves `A x = b` for symmetric positive definite `A`.
pub(crate) fn cholesky_solve(mut a: Vec<Vec<f64>>, b: &[f64]) -> Result<Vec<f64>, ModelError> {
    let n = b.len();
    for j in 0..n {
        let entry = a[j][j];
        let diag = entry - (0..j).map(|k| a[j][k] * a[j][k]).sum::<f64>();
        if !diag.is_finite() || diag <= PIVOT_TOLERANCE * entry.abs() || diag <= 0.0 {
            return Err(ModelError::Singular);
        }
        let pivot = diag.sqrt();
        a[j][j] = pivot;
        for i in (j + 1)..n {
            let dot = (0..j).map(|k| a[i][k] * a[j][k]).sum::<f64>();
            a[i][j] = (a[i][j] - dot) / pivot;
        }
    }

    let mut z = vec![0.0; n];
    for i in 0..n {
        let dot = (0..i).map(|k| a[i][k] * z[k]).sum::<f64>();
        z[i] = (b[i] - dot) / a[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let dot = ((i + 1)..n).map(|k| a[k][i] * x[k]).sum::<f64>();
        x[i] = (z[i] - dot) / a[i][i];
    }

    if x.iter().all(|value| value.is_finite()) {
        Ok(x)
    } else {
        Err(ModelError::NonFinite)
    }
}
