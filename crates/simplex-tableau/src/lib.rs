//! Dense-tableau primal simplex for small linear programs, recording every
//! intermediate tableau so a solve can be replayed step by step.

mod cancel;
mod error;
mod extract;
mod history;
mod pivot;
mod problem;
mod simplex;
mod solution;
mod standard_form;
mod tableau;

pub use cancel::CancelToken;
pub use error::{SolveError, SolveResult};
pub use extract::{Extracted, SolutionExtractor};
pub use history::{IterationHistory, IterationRecord};
pub use pivot::{PivotChoice, PivotOperator, PivotSelector};
pub use problem::{Constraint, ConstraintOp, Direction, LpProblem};
pub use simplex::Solver;
pub use solution::{Analysis, ReducedCost, ShadowPrice, Solution, SolutionStatus};
pub use standard_form::{build_tableau, slack_name};
pub use tableau::{Cell, OBJECTIVE_LABEL, RHS_LABEL, Row, Tableau};
