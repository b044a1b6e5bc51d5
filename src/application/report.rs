// Human-readable result report

use super::extractor::PlanResult;
use crate::domain::SolutionStatus;
use std::fmt;

/// The text report of one run, headed by `timestamp`.
pub struct Report<'a> {
    result: &'a PlanResult,
    timestamp: &'a str,
}

impl<'a> Report<'a> {
    pub fn new(result: &'a PlanResult, timestamp: &'a str) -> Self {
        Self { result, timestamp }
    }

    fn status_narrative(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(f, "\n{}", result.status.narrative())?;
        if result.status != SolutionStatus::Optimal {
            return Ok(());
        }
        let stats = &result.statistics;
        writeln!(f)?;
        writeln!(f, "Solved by {}", result.solver_name)?;
        writeln!(f, "Problem solved in {:.0} milliseconds", stats.solve_time_ms)?;
        if let Some(iterations) = stats.simplex_iterations {
            writeln!(f, "Problem solved in {} iterations", iterations)?;
        }
        if let Some(nodes) = stats.nodes_explored {
            writeln!(f, "Problem solved in {} branch-and-bound nodes", nodes)?;
        }
        Ok(())
    }

    fn full_listing(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Decision Variables:")?;
        writeln!(f, "-------------------")?;
        for var in &self.result.variables {
            writeln!(f, "{:20} {:10.3}", var.name, var.value)?;
        }
        Ok(())
    }

    fn filtered_listing(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(f, "Decision Variables: ({:^5}):", result.variables.len())?;
        writeln!(f, "---------------------------")?;
        for var in result.reportable_variables() {
            if var.integer {
                writeln!(f, "{}", var.name)?;
            } else {
                let padded = format!("{:-<60}", var.name);
                writeln!(f, "{}:{:10.3}", padded, var.value)?;
            }
        }

        writeln!(f, "\n\nModel Constraints ({:^5}):", result.constraints.len())?;
        writeln!(
            f,
            "{:50} {:>10} {:>10} {:>10}",
            "--------------------------", "LB", "Value", "UB"
        )?;
        for c in &result.constraints {
            writeln!(
                f,
                "{:50} {:10.3} {:10.3} {:10.3}",
                c.name, c.lower, c.value, c.upper
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model Run On {}", self.timestamp)?;
        self.status_narrative(f)?;
        writeln!(f, "\nProfit = {:.3}\n", self.result.objective_value)?;
        if self.result.two_stage {
            self.filtered_listing(f)
        } else {
            self.full_listing(f)
        }
    }
}

/// Render the report to a string.
pub fn render(result: &PlanResult, timestamp: &str) -> String {
    Report::new(result, timestamp).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::extractor::{
        CoefficientMatrix, ConstraintActivity, VariableValue,
    };
    use crate::domain::SolverStatistics;

    fn result(two_stage: bool, status: SolutionStatus) -> PlanResult {
        PlanResult {
            solver_name: "HiGHS".into(),
            status,
            objective_value: 1220.0,
            statistics: SolverStatistics {
                solve_time_ms: 12.4,
                nodes_explored: Some(3),
                ..SolverStatistics::default()
            },
            two_stage,
            variables: vec![
                VariableValue { name: "produce A at R1 using Std on P1".into(), value: 1.0, integer: true },
                VariableValue { name: "produce B at R1 using Std on P1".into(), value: 0.0, integer: true },
                VariableValue { name: "inventory of A on P1 if Low".into(), value: 2.5, integer: false },
            ],
            constraints: vec![ConstraintActivity {
                name: "capacity of R1 on P1".into(),
                lower: 1.0,
                value: 1.0,
                upper: 1.0,
            }],
            schedule: Vec::new(),
            matrix: CoefficientMatrix { columns: Vec::new(), rows: Vec::new() },
        }
    }

    #[test]
    fn optimal_report_carries_timing_and_profit() {
        let text = render(&result(false, SolutionStatus::Optimal), "2026-01-01T00:00:00");
        assert!(text.starts_with("Model Run On 2026-01-01T00:00:00"));
        assert!(text.contains("Optimal Solution Found"));
        assert!(text.contains("Problem solved in 12 milliseconds"));
        assert!(text.contains("Problem solved in 3 branch-and-bound nodes"));
        assert!(!text.contains("iterations"));
        assert!(text.contains("Profit = 1220.000"));
        // single-period listing shows every variable
        assert!(text.contains("produce B at R1 using Std on P1"));
    }

    #[test]
    fn feasible_report_is_marked_suboptimal() {
        let text = render(&result(false, SolutionStatus::Feasible), "t");
        assert!(text.contains("Stopped At Suboptimal Feasible Solution"));
        assert!(!text.contains("milliseconds"));
    }

    #[test]
    fn two_stage_report_filters_variables_and_lists_constraints() {
        let text = render(&result(true, SolutionStatus::Optimal), "t");
        assert!(text.contains("Decision Variables: (  3  ):"));
        assert!(text.contains("produce A at R1 using Std on P1\n"));
        assert!(!text.contains("produce B at R1"));
        assert!(text.contains("inventory of A on P1 if Low----"));
        assert!(text.contains("Model Constraints (  1  ):"));
        assert!(text.contains("capacity of R1 on P1"));
    }
}
