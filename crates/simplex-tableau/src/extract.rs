use crate::problem::{Direction, LpProblem};
use crate::solution::{Analysis, ReducedCost, ShadowPrice};
use crate::tableau::Tableau;

/// Variable values and objective read off a tableau
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub decision_values: Vec<f64>,
    pub slack_values: Vec<f64>,
    pub objective_value: f64,
}

/// Reads the basic solution out of a tableau
#[derive(Debug, Clone, Copy)]
pub struct SolutionExtractor {
    tolerance: f64,
}

impl SolutionExtractor {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Basic variables take their row's RHS, non-basic ones stay at zero.
    /// Pure function of the tableau.
    pub fn extract(&self, tableau: &Tableau) -> Extracted {
        let n_vars = tableau.num_decision_vars();
        let n_slack = tableau.num_slack_vars();
        let rhs_col = tableau.rhs_column();

        let mut decision_values = vec![0.0; n_vars];
        let mut slack_values = vec![0.0; n_slack];

        for (i, &col) in tableau.basis().iter().enumerate() {
            let rhs = tableau.value(i, rhs_col);
            // clamp round-off such as -1e-17 to zero
            let value = if rhs.abs() < self.tolerance { 0.0 } else { rhs };
            if col < n_vars {
                decision_values[col] = value;
            } else if col < n_vars + n_slack {
                slack_values[col - n_vars] = value;
            }
        }

        Extracted {
            decision_values,
            slack_values,
            objective_value: tableau.objective_value() + 0.0,
        }
    }

    /// Shadow prices, reduced costs and binding constraints of an optimal
    /// tableau, all expressed in the problem's own objective sense.
    pub fn analyze(&self, tableau: &Tableau, problem: &LpProblem) -> Analysis {
        let n_vars = tableau.num_decision_vars();
        let z = tableau.objective_row();
        // Z-row entries are reduced costs of the internal maximization
        let sign = match tableau.direction() {
            Direction::Maximize => 1.0,
            Direction::Minimize => -1.0,
        };
        let extracted = self.extract(tableau);

        let mut shadow_prices = Vec::new();
        let mut binding_constraints = Vec::new();
        for (i, constraint) in problem.constraints.iter().enumerate() {
            let name = if constraint.name.is_empty() {
                tableau.column_labels()[n_vars + i].clone()
            } else {
                constraint.name.clone()
            };
            let value = sign * tableau.value(z, n_vars + i);
            shadow_prices.push(ShadowPrice {
                constraint: name.clone(),
                value: value + 0.0,
            });
            if extracted.slack_values[i].abs() < self.tolerance {
                binding_constraints.push(name);
            }
        }

        let reduced_costs = problem
            .variables
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let is_basic = tableau.basic_row_of(j).is_some();
                let rc = if is_basic { 0.0 } else { -sign * tableau.value(z, j) + 0.0 };
                ReducedCost {
                    variable: name.clone(),
                    value: extracted.decision_values[j],
                    reduced_cost: rc,
                    is_basic,
                }
            })
            .collect();

        Analysis {
            shadow_prices,
            reduced_costs,
            binding_constraints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pivot::PivotOperator;
    use crate::problem::ConstraintOp;
    use crate::standard_form::build_tableau;
    use approx::assert_abs_diff_eq;

    fn scenario_a() -> (LpProblem, Tableau) {
        let problem = LpProblem::maximize(vec![3.0, 2.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Le, 4.0)
            .subject_to(vec![1.0, 0.0], ConstraintOp::Le, 2.0);
        let op = PivotOperator::new(1e-12);
        let t0 = build_tableau(&problem).unwrap();
        let t1 = op.apply(&t0, 1, 0).unwrap();
        let t2 = op.apply(&t1, 0, 1).unwrap();
        (problem, t2)
    }

    #[test]
    fn test_initial_tableau_is_origin() {
        let (problem, _) = scenario_a();
        let t = build_tableau(&problem).unwrap();
        let out = SolutionExtractor::new(1e-9).extract(&t);
        assert_eq!(out.decision_values, vec![0.0, 0.0]);
        assert_eq!(out.slack_values, vec![4.0, 2.0]);
        assert_eq!(out.objective_value, 0.0);
    }

    #[test]
    fn test_extract_optimal() {
        let (_, t) = scenario_a();
        let out = SolutionExtractor::new(1e-9).extract(&t);
        assert_abs_diff_eq!(out.decision_values[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.decision_values[1], 2.0, epsilon = 1e-9);
        assert_eq!(out.slack_values, vec![0.0, 0.0]);
        assert_abs_diff_eq!(out.objective_value, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extract_reads_basis_not_names() {
        // both decision columns carry the same name; x[1] is basic in row 0
        let labels = ["x", "x", "s1", "RHS"].map(String::from).to_vec();
        let t = Tableau::from_rows(
            Direction::Maximize,
            2,
            labels,
            vec![1],
            vec![vec![1.0, 1.0, 1.0, 3.0], vec![1.0, 0.0, 2.0, 6.0]],
        );
        let out = SolutionExtractor::new(1e-9).extract(&t);
        assert_eq!(out.decision_values, vec![0.0, 3.0]);
        assert_eq!(out.slack_values, vec![0.0]);
        assert_eq!(out.objective_value, 6.0);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let (_, t) = scenario_a();
        let extractor = SolutionExtractor::new(1e-9);
        assert_eq!(extractor.extract(&t), extractor.extract(&t));
    }

    #[test]
    fn test_analysis() {
        let (problem, t) = scenario_a();
        let analysis = SolutionExtractor::new(1e-9).analyze(&t, &problem);

        // y1 = 2 (x2's cost), y2 = 1 (3 - 2)
        assert_abs_diff_eq!(analysis.shadow_prices[0].value, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(analysis.shadow_prices[1].value, 1.0, epsilon = 1e-9);
        assert_eq!(analysis.binding_constraints, vec!["c1", "c2"]);
        assert!(analysis.reduced_costs.iter().all(|rc| rc.is_basic));
    }

    #[test]
    fn test_analysis_minimize_signs() {
        // minimize x1 - x2 s.t. x2 <= 3, x1 <= 5: optimum x = (0, 3), z = -3
        let problem = LpProblem::minimize(vec![1.0, -1.0])
            .subject_to(vec![0.0, 1.0], ConstraintOp::Le, 3.0)
            .subject_to(vec![1.0, 0.0], ConstraintOp::Le, 5.0);
        let t0 = build_tableau(&problem).unwrap();
        let t1 = PivotOperator::new(1e-12).apply(&t0, 0, 1).unwrap();
        let extractor = SolutionExtractor::new(1e-9);

        let out = extractor.extract(&t1);
        assert_abs_diff_eq!(out.objective_value, -3.0, epsilon = 1e-9);

        let analysis = extractor.analyze(&t1, &problem);
        // one more unit of RHS on c1 lowers the cost by one
        assert_abs_diff_eq!(analysis.shadow_prices[0].value, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(analysis.shadow_prices[1].value, 0.0, epsilon = 1e-9);
        // forcing x1 in raises the cost by one
        assert_abs_diff_eq!(analysis.reduced_costs[0].reduced_cost, 1.0, epsilon = 1e-9);
        assert!(!analysis.reduced_costs[0].is_basic);
        assert!(analysis.reduced_costs[1].is_basic);
        assert_eq!(analysis.binding_constraints, vec!["c1"]);
    }
}
