use crate::cancel::CancelToken;
use crate::error::{SolveError, SolveResult};
use crate::extract::SolutionExtractor;
use crate::history::{IterationHistory, IterationRecord};
use crate::pivot::{PivotOperator, PivotSelector};
use crate::problem::LpProblem;
use crate::solution::{Solution, SolutionStatus};
use crate::standard_form::build_tableau;
use crate::tableau::Tableau;

/// Default iteration cap per decision variable and constraint
const ITERATIONS_PER_DIMENSION: usize = 20;

/// Tableau simplex solver for small linear programs.
///
/// Holds only configuration, so one solver can be shared across threads.
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots before giving up; derived from problem size when unset
    max_iterations: Option<usize>,
    /// Tolerance for floating point comparisons
    tolerance: f64,
    /// Smallest pivot magnitude accepted
    pivot_epsilon: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: None,
            tolerance: 1e-9,
            pivot_epsilon: 1e-12,
        }
    }
}

/// Where a solve ended
enum Terminal {
    Optimal,
    Unbounded,
}

/// Mutable state of one solve
struct SolveState {
    tableau: Tableau,
    history: IterationHistory,
    iteration: usize,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_pivot_epsilon(mut self, eps: f64) -> Self {
        self.pivot_epsilon = eps;
        self
    }

    /// Iteration cap that applies to `problem`
    pub fn iteration_limit(&self, problem: &LpProblem) -> usize {
        self.max_iterations.unwrap_or_else(|| {
            ITERATIONS_PER_DIMENSION * (problem.num_variables() + problem.num_constraints())
        })
    }

    /// Solve the LP problem with the primal simplex method
    pub fn solve(&self, problem: &LpProblem) -> Solution {
        self.solve_with(problem, &CancelToken::new(), |_| {})
    }

    /// Solve, checking `cancel` once per iteration and handing every
    /// recorded iteration to `observer` as soon as it is appended.
    pub fn solve_with<F>(&self, problem: &LpProblem, cancel: &CancelToken, mut observer: F) -> Solution
    where
        F: FnMut(&IterationRecord),
    {
        // Building
        let tableau = match build_tableau(problem) {
            Ok(t) => t,
            Err(err) => {
                log::info!("rejected problem: {}", err);
                return Solution::failed(&err, IterationHistory::new(), 0);
            }
        };

        let mut state = SolveState {
            tableau,
            history: IterationHistory::new(),
            iteration: 0,
        };

        // Iterating
        let limit = self.iteration_limit(problem);
        match self.iterate(&mut state, limit, cancel, &mut observer) {
            Ok(Terminal::Optimal) => {
                log::info!(
                    "optimal after {} iterations, objective {}",
                    state.iteration,
                    state.tableau.objective_value()
                );
                self.finish(problem, state)
            }
            Ok(Terminal::Unbounded) => {
                log::info!("unbounded after {} iterations", state.iteration);
                Solution::unbounded(state.history, state.iteration)
            }
            Err(err) => {
                match err {
                    SolveError::Cancelled => log::info!("cancelled at iteration {}", state.iteration),
                    _ => log::warn!("stopped at iteration {}: {}", state.iteration, err),
                }
                Solution::failed(&err, state.history, state.iteration)
            }
        }
    }

    fn iterate<F>(
        &self,
        state: &mut SolveState,
        limit: usize,
        cancel: &CancelToken,
        observer: &mut F,
    ) -> SolveResult<Terminal>
    where
        F: FnMut(&IterationRecord),
    {
        let selector = PivotSelector::new(self.tolerance);
        let operator = PivotOperator::new(self.pivot_epsilon);

        loop {
            if cancel.is_cancelled() {
                return Err(SolveError::Cancelled);
            }

            let choice = selector.select(&state.tableau);
            let Some((row, col)) = choice.position() else {
                // final snapshot, optimal or unbounded
                let record = IterationRecord::new(state.iteration, &state.tableau, None);
                observer(&record);
                state.history.push(record);
                return Ok(if choice.entering_column.is_none() {
                    Terminal::Optimal
                } else {
                    Terminal::Unbounded
                });
            };

            // the tableau the solve stopped on is recorded along with its pivot
            let record = IterationRecord::new(state.iteration, &state.tableau, Some(choice));
            let next = if state.iteration >= limit {
                Err(SolveError::IterationLimitExceeded { limit })
            } else {
                operator.apply(&state.tableau, row, col)
            };
            observer(&record);
            state.history.push(record);
            let next = next?;

            log::debug!(
                "iteration {}: {} enters, {} leaves, pivot {}",
                state.iteration,
                state.tableau.column_labels()[col],
                state.tableau.row_label(row),
                state.tableau.value(row, col)
            );
            state.tableau = next;
            state.iteration += 1;
        }
    }

    fn finish(&self, problem: &LpProblem, state: SolveState) -> Solution {
        let extractor = SolutionExtractor::new(self.tolerance);
        let extracted = extractor.extract(&state.tableau);
        let analysis = extractor.analyze(&state.tableau, problem);

        Solution {
            status: SolutionStatus::Optimal,
            decision_values: extracted.decision_values,
            slack_values: extracted.slack_values,
            objective_value: extracted.objective_value,
            iterations: state.iteration,
            history: state.history,
            analysis,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{ConstraintOp, LpProblem};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_maximization() {
        // Maximize: 3x + 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 3
        //   y <= 3
        //   x, y >= 0
        // Optimal: x=3, y=1, obj=11
        let problem = LpProblem::maximize(vec![3.0, 2.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Le, 4.0)
            .subject_to(vec![1.0, 0.0], ConstraintOp::Le, 3.0)
            .subject_to(vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_abs_diff_eq!(solution.decision_values[0], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.decision_values[1], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.objective_value, 11.0, epsilon = 1e-6);
        assert_eq!(solution.slack_values.len(), 3);
        assert_abs_diff_eq!(solution.slack_values[2], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_history_ends_with_final_record() {
        let problem = LpProblem::maximize(vec![3.0, 2.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Le, 4.0)
            .subject_to(vec![1.0, 0.0], ConstraintOp::Le, 2.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.iterations, 2);
        assert_eq!(solution.history.len(), 3);
        let records = solution.history.records();
        assert!(records[..2].iter().all(|r| r.tableau.pivot_position().is_some()));
        assert!(records[2].is_final());
        assert_eq!(records[0].entering.as_deref(), Some("x1"));
        assert_eq!(records[0].leaving.as_deref(), Some("s2"));
        assert_eq!(records[1].entering.as_deref(), Some("x2"));
        assert_eq!(records[1].leaving.as_deref(), Some("s1"));
    }

    #[test]
    fn test_iteration_limit() {
        let problem = LpProblem::maximize(vec![3.0, 2.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Le, 4.0)
            .subject_to(vec![1.0, 0.0], ConstraintOp::Le, 2.0);

        let solution = Solver::new().with_max_iterations(1).solve(&problem);

        assert_eq!(solution.status, SolutionStatus::IterationLimitExceeded);
        assert!(solution.status.is_error());
        assert_eq!(solution.iterations, 1);
        // the refused pivot is recorded on the tableau it was chosen from
        assert_eq!(solution.history.len(), 2);
        let last = solution.history.last().unwrap();
        assert_eq!(last.iteration, 1);
        assert_eq!(last.tableau.pivot_position(), Some((0, 1)));
        assert_eq!(last.entering.as_deref(), Some("x2"));
        assert!(solution.decision_values.is_empty());
    }

    #[test]
    fn test_default_iteration_limit() {
        let problem = LpProblem::maximize(vec![1.0, 1.0, 1.0])
            .subject_to(vec![1.0, 1.0, 1.0], ConstraintOp::Le, 1.0)
            .subject_to(vec![1.0, 0.0, 0.0], ConstraintOp::Le, 1.0);
        assert_eq!(Solver::new().iteration_limit(&problem), 20 * 5);
        assert_eq!(Solver::new().with_max_iterations(7).iteration_limit(&problem), 7);
    }

    #[test]
    fn test_cancelled_before_start() {
        let problem = LpProblem::maximize(vec![1.0]).subject_to(vec![1.0], ConstraintOp::Le, 1.0);
        let cancel = CancelToken::new();
        cancel.cancel();

        let solution = Solver::new().solve_with(&problem, &cancel, |_| {});

        assert_eq!(solution.status, SolutionStatus::Cancelled);
        assert!(solution.history.is_empty());
    }

    #[test]
    fn test_cancel_from_observer_discards_history() {
        let problem = LpProblem::maximize(vec![3.0, 2.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Le, 4.0)
            .subject_to(vec![1.0, 0.0], ConstraintOp::Le, 2.0);
        let cancel = CancelToken::new();
        let mut seen = 0;

        let solution = Solver::new().solve_with(&problem, &cancel, |_| {
            seen += 1;
            cancel.cancel();
        });

        assert_eq!(seen, 1);
        assert_eq!(solution.status, SolutionStatus::Cancelled);
        assert!(solution.history.is_empty());
    }

    #[test]
    fn test_observer_sees_every_record() {
        let problem = LpProblem::maximize(vec![3.0, 2.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Le, 4.0)
            .subject_to(vec![1.0, 0.0], ConstraintOp::Le, 2.0);
        let mut streamed = Vec::new();

        let solution = Solver::new().solve_with(&problem, &CancelToken::new(), |r| streamed.push(r.clone()));

        assert_eq!(streamed.as_slice(), solution.history.records());
    }

    #[test]
    fn test_tiny_pivot_is_numeric_instability() {
        let problem = LpProblem::maximize(vec![1.0]).subject_to(vec![1e-6], ConstraintOp::Le, 1.0);

        let solution = Solver::new().with_pivot_epsilon(1e-3).solve(&problem);

        assert_eq!(solution.status, SolutionStatus::NumericInstability);
        assert!(solution.message.unwrap().contains("too close to zero"));
        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.history.len(), 1);
        assert_eq!(solution.history.records()[0].tableau.pivot_position(), Some((0, 0)));
    }

    #[test]
    fn test_overflowing_pivot_is_numeric_instability() {
        let problem = LpProblem::maximize(vec![1.0]).subject_to(vec![0.5], ConstraintOp::Le, f64::MAX);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::NumericInstability);
        assert!(solution.message.unwrap().contains("non-finite"));
        assert_eq!(solution.history.len(), 1);
    }

    #[test]
    fn test_unbounded_objective_is_finite() {
        let problem = LpProblem::maximize(vec![1.0, 0.0]).subject_to(vec![-1.0, 1.0], ConstraintOp::Le, 1.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Unbounded);
        assert_eq!(solution.objective_value, 0.0);
        assert!(solution.history.last().unwrap().is_final());
    }

    #[test]
    fn test_invalid_problem_has_message() {
        let problem = LpProblem::maximize(vec![1.0]).subject_to(vec![1.0], ConstraintOp::Ge, 2.0);
        let solution = Solver::new().solve(&problem);
        assert_eq!(solution.status, SolutionStatus::InvalidProblem);
        assert!(solution.message.is_some());
        assert!(solution.history.is_empty());
    }
}
