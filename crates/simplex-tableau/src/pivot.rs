use crate::error::{SolveError, SolveResult};
use crate::tableau::Tableau;

/// Outcome of pivot selection on one tableau.
///
/// `entering_column == None` means no column can improve the objective
/// (optimal). An entering column without a leaving row means the ratio test
/// found no bound (unbounded).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotChoice {
    pub entering_column: Option<usize>,
    pub leaving_row: Option<usize>,
    pub pivot_value: Option<f64>,
}

impl PivotChoice {
    pub fn optimal() -> Self {
        Self {
            entering_column: None,
            leaving_row: None,
            pivot_value: None,
        }
    }

    /// Both indices, when a pivot can actually be performed
    pub fn position(&self) -> Option<(usize, usize)> {
        Some((self.leaving_row?, self.entering_column?))
    }
}

/// Dantzig-rule pivot selection with a minimum-ratio test
#[derive(Debug, Clone, Copy)]
pub struct PivotSelector {
    tolerance: f64,
}

impl PivotSelector {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn select(&self, tableau: &Tableau) -> PivotChoice {
        let Some(col) = self.entering_column(tableau) else {
            return PivotChoice::optimal();
        };
        let row = self.leaving_row(tableau, col);
        PivotChoice {
            entering_column: Some(col),
            leaving_row: row,
            pivot_value: row.map(|r| tableau.value(r, col)),
        }
    }

    /// Column with the most negative Z-row coefficient, lowest index on ties.
    ///
    /// The Z-row holds `-c` when maximizing and `+c` when minimizing, so in
    /// both directions a negative entry is a column whose increase improves
    /// the objective.
    pub fn entering_column(&self, tableau: &Tableau) -> Option<usize> {
        let z = tableau.row(tableau.objective_row());
        let mut best = -self.tolerance;
        let mut best_col = None;

        for (j, cell) in z.cells[..tableau.rhs_column()].iter().enumerate() {
            // strict comparison keeps the first column on ties
            if cell.value < best {
                best = cell.value;
                best_col = Some(j);
            }
        }

        best_col
    }

    /// Row minimizing `rhs / a[i][col]` over strictly positive entries,
    /// lowest index on ties.
    pub fn leaving_row(&self, tableau: &Tableau, col: usize) -> Option<usize> {
        let rhs_col = tableau.rhs_column();
        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;

        for i in 0..tableau.num_constraints() {
            let a = tableau.value(i, col);
            if a > self.tolerance {
                let ratio = tableau.value(i, rhs_col) / a;
                if ratio < min_ratio - self.tolerance {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        min_row
    }
}

/// Gauss-Jordan elimination on a chosen pivot
#[derive(Debug, Clone, Copy)]
pub struct PivotOperator {
    epsilon: f64,
}

impl PivotOperator {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Produce the tableau after pivoting on (`row`, `col`).
    ///
    /// The input tableau is not modified. The result carries no pivot marks
    /// and `col` replaces the basic variable of `row`.
    pub fn apply(&self, tableau: &Tableau, row: usize, col: usize) -> SolveResult<Tableau> {
        let pivot_val = tableau.value(row, col);
        if !pivot_val.is_finite() || pivot_val.abs() < self.epsilon {
            return Err(SolveError::NumericInstability(format!(
                "pivot element {} at ({}, {}) is too close to zero",
                pivot_val, row, col
            )));
        }

        let n_rows = tableau.num_rows();
        let n_cols = tableau.num_columns();
        let mut next = tableau.clone();
        next.clear_pivot_marks();

        // Scale pivot row
        for j in 0..n_cols {
            *next.value_mut(row, j) /= pivot_val;
        }
        *next.value_mut(row, col) = 1.0;

        // Eliminate column in other rows
        for i in 0..n_rows {
            if i == row {
                continue;
            }
            let factor = next.value(i, col);
            if factor == 0.0 {
                continue;
            }
            for j in 0..n_cols {
                let delta = factor * next.value(row, j);
                *next.value_mut(i, j) -= delta;
            }
            *next.value_mut(i, col) = 0.0;
        }

        if !next.all_finite() {
            return Err(SolveError::NumericInstability(format!(
                "pivot on ({}, {}) produced a non-finite value",
                row, col
            )));
        }

        next.set_basic(row, col);
        Ok(next)
    }
}
