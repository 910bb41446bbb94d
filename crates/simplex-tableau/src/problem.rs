use crate::error::SolveError;
use crate::standard_form::slack_name;
use crate::tableau::{OBJECTIVE_LABEL, RHS_LABEL};
use std::collections::HashSet;

/// Represents a linear programming problem over non-negative decision variables
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    /// Whether to maximize or minimize the objective
    pub direction: Direction,
    /// Decision variable names, one per objective coefficient
    #[cfg_attr(feature = "serde", serde(default))]
    pub variables: Vec<String>,
    /// Objective function coefficients
    pub objective: Vec<f64>,
    /// Constraints
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<Constraint>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
    /// Equal (=)
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Eq,
}

impl std::fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintOp::Le => write!(f, "<="),
            ConstraintOp::Ge => write!(f, ">="),
            ConstraintOp::Eq => write!(f, "="),
        }
    }
}

impl LpProblem {
    /// Create a problem with `x1..xn` as variable names
    pub fn new(direction: Direction, objective: Vec<f64>) -> Self {
        Self {
            direction,
            variables: Vec::new(),
            objective,
            constraints: Vec::new(),
        }
        .with_default_names()
    }

    pub fn maximize(objective: Vec<f64>) -> Self {
        Self::new(Direction::Maximize, objective)
    }

    pub fn minimize(objective: Vec<f64>) -> Self {
        Self::new(Direction::Minimize, objective)
    }

    pub fn with_variables(mut self, variables: Vec<String>) -> Self {
        self.variables = variables;
        self
    }

    /// Fill in `x1..xn` when no variable names were given
    pub fn with_default_names(mut self) -> Self {
        if self.variables.is_empty() {
            self.variables = (1..=self.objective.len()).map(|i| format!("x{}", i)).collect();
        }
        self
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        });
    }

    /// Chainable form of [`LpProblem::add_constraint`] with an automatic name
    pub fn subject_to(mut self, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) -> Self {
        let name = format!("c{}", self.constraints.len() + 1);
        self.add_constraint(name, coefficients, op, rhs);
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective evaluated at `values`
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, x)| c * x).sum()
    }

    /// Check the shape of the problem: at least one variable, consistent
    /// coefficient lengths and finite numbers everywhere.
    pub fn validate(&self) -> Result<(), SolveError> {
        let n = self.num_variables();
        if n == 0 {
            return Err(SolveError::InvalidProblem(
                "problem must have at least one decision variable".to_string(),
            ));
        }
        if self.variables.len() != n {
            return Err(SolveError::InvalidProblem(format!(
                "{} variable names given for {} objective coefficients",
                self.variables.len(),
                n
            )));
        }
        // tableau columns and rows are labelled by these names
        let mut seen = HashSet::new();
        for name in &self.variables {
            if !seen.insert(name.as_str()) {
                return Err(SolveError::InvalidProblem(format!("variable name '{}' is used twice", name)));
            }
            let reserved = name == RHS_LABEL
                || name == OBJECTIVE_LABEL
                || (0..self.num_constraints()).any(|i| *name == slack_name(i));
            if reserved {
                return Err(SolveError::InvalidProblem(format!(
                    "variable name '{}' is reserved for the tableau",
                    name
                )));
            }
        }
        if self.objective.iter().any(|c| !c.is_finite()) {
            return Err(SolveError::InvalidProblem(
                "objective coefficients must be finite".to_string(),
            ));
        }
        for (i, c) in self.constraints.iter().enumerate() {
            if c.coefficients.len() != n {
                return Err(SolveError::InvalidProblem(format!(
                    "constraint {} has {} coefficients, expected {}",
                    constraint_label(c, i),
                    c.coefficients.len(),
                    n
                )));
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|a| !a.is_finite()) {
                return Err(SolveError::InvalidProblem(format!(
                    "constraint {} contains a non-finite value",
                    constraint_label(c, i)
                )));
            }
        }
        Ok(())
    }

    /// Rewrite `>=` constraints into `<=` form where that keeps the RHS
    /// non-negative. Without a phase-one method, a `>=` with positive RHS
    /// and any `=` constraint have no slack basis and are rejected.
    pub fn normalized(&self) -> Result<LpProblem, SolveError> {
        let mut out = self.clone();
        for (i, c) in out.constraints.iter_mut().enumerate() {
            match c.op {
                ConstraintOp::Le => {}
                ConstraintOp::Ge if c.rhs <= 0.0 => {
                    for a in c.coefficients.iter_mut() {
                        *a = -*a;
                    }
                    // avoid carrying -0.0 into the tableau
                    c.rhs = if c.rhs == 0.0 { 0.0 } else { -c.rhs };
                    c.op = ConstraintOp::Le;
                }
                ConstraintOp::Ge => {
                    return Err(SolveError::InvalidProblem(format!(
                        "constraint {} is >= with positive right-hand side {}; a phase-one method is required",
                        constraint_label(c, i),
                        c.rhs
                    )));
                }
                ConstraintOp::Eq => {
                    return Err(SolveError::InvalidProblem(format!(
                        "constraint {} is an equality; equality constraints are not supported",
                        constraint_label(c, i)
                    )));
                }
            }
        }
        Ok(out)
    }

    /// Whether `values` satisfies every constraint and non-negativity
    /// within `tolerance`. Returns the names of violated constraints.
    pub fn violations(&self, values: &[f64], tolerance: f64) -> Vec<String> {
        let mut violated = Vec::new();
        for (i, c) in self.constraints.iter().enumerate() {
            let lhs: f64 = c.coefficients.iter().zip(values).map(|(a, x)| a * x).sum();
            let ok = match c.op {
                ConstraintOp::Le => lhs <= c.rhs + tolerance,
                ConstraintOp::Ge => lhs >= c.rhs - tolerance,
                ConstraintOp::Eq => (lhs - c.rhs).abs() <= tolerance,
            };
            if !ok {
                violated.push(constraint_label(c, i));
            }
        }
        for (name, &x) in self.variables.iter().zip(values) {
            if x < -tolerance {
                violated.push(format!("{} >= 0", name));
            }
        }
        violated
    }
}

fn constraint_label(c: &Constraint, index: usize) -> String {
    if c.name.is_empty() {
        format!("#{}", index + 1)
    } else {
        c.name.clone()
    }
}
