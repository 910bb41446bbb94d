use crate::error::{SolveError, SolveResult};
use crate::problem::{ConstraintOp, Direction, LpProblem};
use crate::tableau::{RHS_LABEL, Tableau};

/// Name of the slack variable added for constraint `i` (zero-based)
pub fn slack_name(i: usize) -> String {
    format!("s{}", i + 1)
}

/// Convert a problem into its initial simplex tableau.
///
/// Every constraint must already be `<=` with a non-negative right-hand
/// side, so that the slacks form the starting basis (all decision variables
/// at zero). See [`LpProblem::normalized`] for turning suitable `>=`
/// constraints into that form.
pub fn build_tableau(problem: &LpProblem) -> SolveResult<Tableau> {
    problem.validate()?;

    let n_vars = problem.num_variables();
    let n_constraints = problem.num_constraints();
    // one slack per constraint, plus RHS
    let total_cols = n_vars + n_constraints + 1;

    for (i, c) in problem.constraints.iter().enumerate() {
        if c.op != ConstraintOp::Le {
            return Err(SolveError::InvalidProblem(format!(
                "constraint {} uses '{}'; only '<=' constraints can be put in standard form",
                i + 1,
                c.op
            )));
        }
        if c.rhs < 0.0 {
            return Err(SolveError::InvalidProblem(format!(
                "constraint {} has negative right-hand side {}; a phase-one method is required",
                i + 1,
                c.rhs
            )));
        }
    }

    let mut column_labels = problem.variables.clone();
    column_labels.extend((0..n_constraints).map(slack_name));
    column_labels.push(RHS_LABEL.to_string());

    let mut rows = Vec::with_capacity(n_constraints + 1);
    let basis = (n_vars..n_vars + n_constraints).collect();
    for (i, c) in problem.constraints.iter().enumerate() {
        let mut values = vec![0.0; total_cols];
        values[..n_vars].copy_from_slice(&c.coefficients);
        values[n_vars + i] = 1.0;
        // normalize -0.0
        values[total_cols - 1] = c.rhs + 0.0;
        rows.push(values);
    }

    // Z-row encodes z - c.x = 0; minimizing is maximizing -z, hence +c
    let mut z = vec![0.0; total_cols];
    for (j, &coef) in problem.objective.iter().enumerate() {
        z[j] = match problem.direction {
            Direction::Maximize => -coef,
            Direction::Minimize => coef,
        };
    }
    rows.push(z);

    log::debug!(
        "built {}x{} tableau ({} decision vars, {} slacks)",
        n_constraints + 1,
        total_cols,
        n_vars,
        n_constraints
    );

    Ok(Tableau::from_rows(problem.direction, n_vars, column_labels, basis, rows))
}
