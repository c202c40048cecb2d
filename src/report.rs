use std::fmt;

use crate::core::{Frequency, Plan, Projection, ProjectionMetrics, TargetEvaluation};

/// Whole currency units with `,` thousands separators.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Plain-text summary of a projection, one fact per line.
pub struct Report<'a> {
    pub plan: &'a Plan,
    pub projection: &'a Projection,
    pub metrics: &'a ProjectionMetrics,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Report {
            plan,
            projection,
            metrics,
        } = self;

        writeln!(
            f,
            "Final value (after tax): {}",
            format_amount(projection.after_tax_final_value)
        )?;
        writeln!(
            f,
            "Final value (before tax): {}",
            format_amount(projection.final_value)
        )?;
        writeln!(
            f,
            "Total contributed: {}",
            format_amount(projection.total_contributed)
        )?;
        writeln!(f, "Gain: {}", format_amount(projection.total_return))?;
        writeln!(
            f,
            "Tax ({}%): {}",
            plan.tax_rate,
            format_amount(projection.tax_amount)
        )?;
        writeln!(
            f,
            "In today's money ({}% inflation): {}",
            plan.inflation_rate,
            format_amount(metrics.inflation_adjusted_value)
        )?;

        match projection.target {
            TargetEvaluation::NoTarget => Ok(()),
            TargetEvaluation::Met {
                target_amount,
                surplus,
            } => writeln!(
                f,
                "Target {} reached, {} above target",
                format_amount(target_amount),
                format_amount(surplus)
            ),
            TargetEvaluation::Unmet {
                target_amount,
                shortfall,
                adjustments,
            } => {
                writeln!(
                    f,
                    "Target {} missed by {} ({:.1}% reached)",
                    format_amount(target_amount),
                    format_amount(shortfall),
                    metrics.target_progress_pct
                )?;
                if let Some(required) = adjustments.required_periodic_investment {
                    let period = match plan.frequency {
                        Frequency::Monthly => "monthly",
                        Frequency::Yearly => "yearly",
                    };
                    write!(
                        f,
                        "- Raise the {period} contribution to {}",
                        format_amount(required)
                    )?;
                    if let Some(increase) = metrics.required_increase_pct.filter(|pct| *pct > 0.0)
                    {
                        write!(f, " (+{increase:.1}%)")?;
                    }
                    writeln!(f)?;
                }
                let years = adjustments.required_time_horizon;
                write!(f, "- Extend the horizon to {years:.1} years")?;
                if years > plan.time_horizon {
                    write!(f, " (+{:.1} years)", years - plan.time_horizon)?;
                }
                writeln!(f)
            }
        }
    }
}

pub fn render_report(plan: &Plan, projection: &Projection, metrics: &ProjectionMetrics) -> String {
    Report {
        plan,
        projection,
        metrics,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InvestmentTiming, derive_metrics, project};

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.4), "999");
        assert_eq!(format_amount(1_000.0), "1,000");
        assert_eq!(format_amount(12_000_000.0), "12,000,000");
        assert_eq!(format_amount(-1_234_567.6), "-1,234,568");
    }

    #[test]
    fn report_lists_both_suggestions_when_target_is_missed() {
        let plan = Plan {
            target_amount: 10_000.0,
            time_horizon: 10.0,
            initial_investment: 0.0,
            frequency: Frequency::Yearly,
            periodic_investment: 500.0,
            investment_timing: InvestmentTiming::End,
            annual_return: 0.0,
            tax_rate: 0.0,
            inflation_rate: 0.0,
        };
        let projection = project(&plan);
        let metrics = derive_metrics(&plan, &projection);
        let report = render_report(&plan, &projection, &metrics);

        assert!(report.contains("Target 10,000 missed by 5,000 (50.0% reached)"));
        assert!(report.contains("- Raise the yearly contribution to 1,000 (+100.0%)"));
        assert!(report.contains("- Extend the horizon to 20.0 years (+10.0 years)"));
    }

    #[test]
    fn report_omits_suggestions_without_target() {
        let plan = Plan {
            target_amount: 0.0,
            time_horizon: 1.0,
            initial_investment: 1_000.0,
            frequency: Frequency::Monthly,
            periodic_investment: 0.0,
            investment_timing: InvestmentTiming::Start,
            annual_return: 0.0,
            tax_rate: 0.0,
            inflation_rate: 0.0,
        };
        let projection = project(&plan);
        let metrics = derive_metrics(&plan, &projection);
        let report = render_report(&plan, &projection, &metrics);

        assert!(report.contains("Final value (after tax): 1,000"));
        assert!(!report.contains("Target"));
        assert!(!report.contains("Extend"));
    }

    #[test]
    fn fractional_horizon_suggestion_is_never_shorter() {
        let plan = Plan {
            target_amount: 63_500.0,
            time_horizon: 5.33,
            initial_investment: 0.0,
            frequency: Frequency::Monthly,
            periodic_investment: 1_000.0,
            investment_timing: InvestmentTiming::End,
            annual_return: 0.0,
            tax_rate: 0.0,
            inflation_rate: 0.0,
        };
        let projection = project(&plan);
        let metrics = derive_metrics(&plan, &projection);
        let report = Report {
            plan: &plan,
            projection: &projection,
            metrics: &metrics,
        }
        .to_string();

        assert_eq!(report, render_report(&plan, &projection, &metrics));
        assert!(report.contains("- Extend the horizon to 5.4 years (+0.1 years)"));
    }
}
