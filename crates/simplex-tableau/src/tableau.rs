use std::fmt;

use crate::problem::Direction;

/// Label of the right-hand side column.
pub const RHS_LABEL: &str = "RHS";
/// Label of the objective row.
pub const OBJECTIVE_LABEL: &str = "Z";

/// One entry of a tableau
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub value: f64,
    /// Display hint: this cell was the pivot element of the step taken from
    /// this snapshot
    pub is_pivot: bool,
}

impl Cell {
    pub fn new(value: f64) -> Self {
        Self { value, is_pivot: false }
    }
}

/// Borrowed view of a single tableau row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    /// Basic variable occupying the row, or `Z` for the objective row
    pub label: &'a str,
    pub cells: &'a [Cell],
}

impl Row<'_> {
    pub fn rhs(&self) -> f64 {
        self.cells[self.cells.len() - 1].value
    }
}

/// Dense simplex tableau.
///
/// Rows are the constraint rows followed by the objective (Z) row. Columns
/// are the decision variables, the slack variables and finally the RHS.
/// Cells live in one row-major buffer, so a cloned tableau never shares
/// storage with the original. The basis is kept as column indices; row
/// labels are derived from it for display only.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    direction: Direction,
    num_decision_vars: usize,
    num_columns: usize,
    column_labels: Vec<String>,
    /// Column basic in each constraint row
    basis: Vec<usize>,
    cells: Vec<Cell>,
}

impl Tableau {
    /// Build a tableau from explicit rows: one per entry of `basis`, then
    /// the objective row. Every row must have `column_labels.len()` values.
    pub(crate) fn from_rows(
        direction: Direction,
        num_decision_vars: usize,
        column_labels: Vec<String>,
        basis: Vec<usize>,
        rows: Vec<Vec<f64>>,
    ) -> Self {
        let num_columns = column_labels.len();
        debug_assert_eq!(rows.len(), basis.len() + 1, "expected one row per basic variable plus Z");
        let mut cells = Vec::with_capacity(rows.len() * num_columns);
        for (i, values) in rows.into_iter().enumerate() {
            debug_assert_eq!(values.len(), num_columns, "row {} has wrong width", i);
            cells.extend(values.into_iter().map(Cell::new));
        }
        Self {
            direction,
            num_decision_vars,
            num_columns,
            column_labels,
            basis,
            cells,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn num_rows(&self) -> usize {
        self.basis.len() + 1
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// Number of constraint rows (all rows except Z)
    pub fn num_constraints(&self) -> usize {
        self.num_rows() - 1
    }

    pub fn num_decision_vars(&self) -> usize {
        self.num_decision_vars
    }

    pub fn num_slack_vars(&self) -> usize {
        self.num_columns - self.num_decision_vars - 1
    }

    pub fn objective_row(&self) -> usize {
        self.num_rows() - 1
    }

    pub fn rhs_column(&self) -> usize {
        self.num_columns - 1
    }

    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    /// Column index of the basic variable in each constraint row
    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    /// Basic variable name of row `i`, or `Z` for the objective row
    pub fn row_label(&self, i: usize) -> &str {
        match self.basis.get(i) {
            Some(&col) => &self.column_labels[col],
            None => OBJECTIVE_LABEL,
        }
    }

    pub fn row_labels(&self) -> Vec<&str> {
        (0..self.num_rows()).map(|i| self.row_label(i)).collect()
    }

    pub fn row(&self, i: usize) -> Row<'_> {
        let start = i * self.num_columns;
        Row {
            label: self.row_label(i),
            cells: &self.cells[start..start + self.num_columns],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.num_rows()).map(move |i| self.row(i))
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[row * self.num_columns + col]
    }

    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.cell(row, col).value
    }

    pub(crate) fn value_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        &mut self.cells[row * self.num_columns + col].value
    }

    pub(crate) fn set_basic(&mut self, row: usize, column: usize) {
        self.basis[row] = column;
    }

    pub(crate) fn clear_pivot_marks(&mut self) {
        for cell in &mut self.cells {
            cell.is_pivot = false;
        }
    }

    pub(crate) fn mark_pivot(&mut self, row: usize, col: usize) {
        self.cells[row * self.num_columns + col].is_pivot = true;
    }

    /// Position of the marked pivot cell, if any
    pub fn pivot_position(&self) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|c| c.is_pivot)
            .map(|idx| (idx / self.num_columns, idx % self.num_columns))
    }

    /// Right-hand side of the objective row
    pub fn objective_rhs(&self) -> f64 {
        self.value(self.objective_row(), self.rhs_column())
    }

    /// Objective value of the basic solution this tableau represents, in the
    /// caller's sign convention
    pub fn objective_value(&self) -> f64 {
        match self.direction {
            Direction::Maximize => self.objective_rhs(),
            Direction::Minimize => -self.objective_rhs(),
        }
    }

    /// Index of the row in which `column` is basic, if any
    pub fn basic_row_of(&self, column: usize) -> Option<usize> {
        self.basis.iter().position(|&b| b == column)
    }

    pub(crate) fn all_finite(&self) -> bool {
        self.cells.iter().all(|c| c.value.is_finite())
    }
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WIDTH: usize = 10;
        write!(f, "{:>6}", "Base")?;
        for label in &self.column_labels {
            write!(f, " {:>WIDTH$}", label)?;
        }
        writeln!(f)?;
        for row in self.rows() {
            write!(f, "{:>6}", row.label)?;
            for cell in row.cells {
                // negative zero prints as "-0.000"
                let v = if cell.value == 0.0 { 0.0 } else { cell.value };
                if cell.is_pivot {
                    write!(f, " {:>WIDTH$}", format!("[{:.3}]", v))?;
                } else {
                    write!(f, " {:>WIDTH$.3}", v)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tableau {
        Tableau::from_rows(
            Direction::Maximize,
            2,
            vec!["x1".into(), "x2".into(), "s1".into(), RHS_LABEL.into()],
            vec![2],
            vec![vec![1.0, 1.0, 1.0, 4.0], vec![-3.0, -2.0, 0.0, 0.0]],
        )
    }

    #[test]
    fn test_dimensions() {
        let t = sample();
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.num_columns(), 4);
        assert_eq!(t.num_constraints(), 1);
        assert_eq!(t.num_slack_vars(), 1);
        assert_eq!(t.rhs_column(), 3);
        assert_eq!(t.row(0).rhs(), 4.0);
        assert_eq!(t.row(1).label, "Z");
    }

    #[test]
    fn test_clone_does_not_alias() {
        let t = sample();
        let mut copy = t.clone();
        *copy.value_mut(0, 0) = 42.0;
        copy.mark_pivot(0, 1);
        assert_eq!(t.value(0, 0), 1.0);
        assert_eq!(t.pivot_position(), None);
        assert_eq!(copy.pivot_position(), Some((0, 1)));
    }

    #[test]
    fn test_basic_row_of() {
        let t = sample();
        assert_eq!(t.basic_row_of(2), Some(0));
        assert_eq!(t.basic_row_of(0), None);
    }

    #[test]
    fn test_basis_does_not_depend_on_names() {
        // two columns share a name; lookups still go by index
        let mut t = Tableau::from_rows(
            Direction::Maximize,
            2,
            vec!["x".into(), "x".into(), "s1".into(), RHS_LABEL.into()],
            vec![2],
            vec![vec![1.0, 1.0, 1.0, 4.0], vec![-1.0, -1.0, 0.0, 0.0]],
        );
        t.set_basic(0, 1);
        assert_eq!(t.basic_row_of(1), Some(0));
        assert_eq!(t.basic_row_of(0), None);
        assert_eq!(t.row_labels(), vec!["x", "Z"]);
    }

    #[test]
    fn test_display_marks_pivot() {
        let mut t = sample();
        t.mark_pivot(0, 0);
        let text = t.to_string();
        assert!(text.contains("[1.000]"));
        assert!(text.contains("Base"));
    }
}
