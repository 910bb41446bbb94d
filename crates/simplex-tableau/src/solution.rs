use crate::error::SolveError;
use crate::history::IterationHistory;

/// The result of solving an LP problem
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Optimal values for each decision variable (empty unless optimal)
    pub decision_values: Vec<f64>,
    /// Optimal values for each slack variable (empty unless optimal)
    pub slack_values: Vec<f64>,
    /// Optimal objective value
    pub objective_value: f64,
    /// Every tableau visited, in order
    pub history: IterationHistory,
    /// Number of pivots performed
    pub iterations: usize,
    /// Detailed analysis (empty unless optimal)
    pub analysis: Analysis,
    /// Why the solve stopped, for non-optimal statuses
    pub message: Option<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The objective can improve without bound
    Unbounded,
    /// The problem cannot be put in standard form
    InvalidProblem,
    /// The iteration cap was hit before termination
    IterationLimitExceeded,
    /// A pivot was numerically unsafe
    NumericInstability,
    /// The caller cancelled the solve
    Cancelled,
}

impl SolutionStatus {
    /// Whether the solver failed, as opposed to reaching a legitimate
    /// outcome of the LP
    pub fn is_error(self) -> bool {
        !matches!(self, SolutionStatus::Optimal | SolutionStatus::Unbounded)
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolutionStatus::Optimal => "optimal",
            SolutionStatus::Unbounded => "unbounded",
            SolutionStatus::InvalidProblem => "invalid problem",
            SolutionStatus::IterationLimitExceeded => "iteration limit exceeded",
            SolutionStatus::NumericInstability => "numeric instability",
            SolutionStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl From<&SolveError> for SolutionStatus {
    fn from(err: &SolveError) -> Self {
        match err {
            SolveError::InvalidProblem(_) => SolutionStatus::InvalidProblem,
            SolveError::IterationLimitExceeded { .. } => SolutionStatus::IterationLimitExceeded,
            SolveError::NumericInstability(_) => SolutionStatus::NumericInstability,
            SolveError::Cancelled => SolutionStatus::Cancelled,
        }
    }
}

/// Detailed analysis of the optimal solution
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    /// Shadow prices (dual values) for each constraint
    /// Indicates how much the objective would change per unit of extra RHS
    pub shadow_prices: Vec<ShadowPrice>,

    /// Reduced costs for each decision variable
    pub reduced_costs: Vec<ReducedCost>,

    /// Which constraints are binding (tight) at optimum
    pub binding_constraints: Vec<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowPrice {
    /// Constraint name
    pub constraint: String,
    /// Shadow price value
    pub value: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedCost {
    /// Variable name
    pub variable: String,
    /// Current value in solution
    pub value: f64,
    /// Objective change per unit of the variable forced into the solution
    pub reduced_cost: f64,
    /// Is this variable in the basis?
    pub is_basic: bool,
}

impl Solution {
    /// Terminal solution for a solve that stopped on `err`. The partial
    /// history is kept for diagnostics, except when cancelled.
    /// Result for a solve stopped by `err` after `iterations` pivots
    pub fn failed(err: &SolveError, history: IterationHistory, iterations: usize) -> Self {
        let status = SolutionStatus::from(err);
        let history = if status == SolutionStatus::Cancelled {
            IterationHistory::new()
        } else {
            history
        };
        Self {
            status,
            decision_values: Vec::new(),
            slack_values: Vec::new(),
            objective_value: 0.0,
            iterations,
            history,
            analysis: Analysis::default(),
            message: Some(err.to_string()),
        }
    }

    /// The objective has no finite bound; `objective_value` stays 0 and only
    /// `status` carries the outcome, so the result serializes losslessly.
    pub fn unbounded(history: IterationHistory, iterations: usize) -> Self {
        Self {
            status: SolutionStatus::Unbounded,
            decision_values: Vec::new(),
            slack_values: Vec::new(),
            objective_value: 0.0,
            iterations,
            history,
            analysis: Analysis::default(),
            message: Some("The objective can be improved without bound".to_string()),
        }
    }
}
