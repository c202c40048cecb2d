use serde::Serialize;

use super::types::{Plan, Projection};

/// Ratios shown alongside a projection. Percentages are in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionMetrics {
    pub target_progress_pct: f64,
    pub before_tax_roi_pct: Option<f64>,
    pub after_tax_roi_pct: Option<f64>,
    pub after_tax_annualized_return_pct: Option<f64>,
    /// After-tax final value in today's money.
    pub inflation_adjusted_value: f64,
    /// How much the periodic contribution must rise to meet the target.
    pub required_increase_pct: Option<f64>,
}

pub fn derive_metrics(plan: &Plan, projection: &Projection) -> ProjectionMetrics {
    let contributed = projection.total_contributed;
    let after_tax = projection.after_tax_final_value;
    let horizon = plan.time_horizon;

    let target_progress_pct = match plan.target() {
        Some(target) => (after_tax / target * 100.0).min(100.0),
        None => 100.0,
    };

    let roi = |gain: f64| (contributed > 0.0).then(|| gain / contributed * 100.0);

    let after_tax_annualized_return_pct = (contributed > 0.0 && horizon > 0.0)
        .then(|| ((after_tax / contributed).powf(1.0 / horizon) - 1.0) * 100.0);

    let inflation_adjusted_value = if horizon > 0.0 {
        after_tax / (1.0 + plan.inflation_rate / 100.0).powf(horizon)
    } else {
        after_tax
    };

    let required_increase_pct = projection
        .required_periodic_investment()
        .filter(|_| plan.periodic_investment > 0.0)
        .map(|required| {
            (required - plan.periodic_investment) / plan.periodic_investment * 100.0
        });

    ProjectionMetrics {
        target_progress_pct,
        before_tax_roi_pct: roi(projection.total_return),
        after_tax_roi_pct: roi(projection.after_tax_return),
        after_tax_annualized_return_pct,
        inflation_adjusted_value,
        required_increase_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Frequency, InvestmentTiming, project};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn yearly_plan() -> Plan {
        Plan {
            target_amount: 0.0,
            time_horizon: 2.0,
            initial_investment: 1_000.0,
            frequency: Frequency::Yearly,
            periodic_investment: 0.0,
            investment_timing: InvestmentTiming::End,
            annual_return: 10.0,
            tax_rate: 0.0,
            inflation_rate: 10.0,
        }
    }

    #[test]
    fn metrics_for_single_lump_sum() {
        let plan = yearly_plan();
        let metrics = derive_metrics(&plan, &project(&plan));

        assert_approx(metrics.target_progress_pct, 100.0);
        assert_approx(metrics.before_tax_roi_pct.expect("roi expected"), 21.0);
        assert_approx(metrics.after_tax_roi_pct.expect("roi expected"), 21.0);
        assert_approx(
            metrics
                .after_tax_annualized_return_pct
                .expect("annualized return expected"),
            10.0,
        );
        assert_approx(metrics.inflation_adjusted_value, 1_000.0);
        assert!(metrics.required_increase_pct.is_none());
    }

    #[test]
    fn progress_is_capped_and_partial() {
        let met = Plan {
            target_amount: 500.0,
            ..yearly_plan()
        };
        assert_approx(derive_metrics(&met, &project(&met)).target_progress_pct, 100.0);

        let unmet = Plan {
            target_amount: 2_420.0,
            ..yearly_plan()
        };
        assert_approx(
            derive_metrics(&unmet, &project(&unmet)).target_progress_pct,
            50.0,
        );
    }

    #[test]
    fn nothing_contributed_has_no_ratios() {
        let plan = Plan {
            initial_investment: 0.0,
            ..yearly_plan()
        };
        let metrics = derive_metrics(&plan, &project(&plan));
        assert!(metrics.before_tax_roi_pct.is_none());
        assert!(metrics.after_tax_roi_pct.is_none());
        assert!(metrics.after_tax_annualized_return_pct.is_none());
    }

    #[test]
    fn required_increase_relative_to_current_contribution() {
        let plan = Plan {
            target_amount: 10_000.0,
            periodic_investment: 100.0,
            annual_return: 0.0,
            time_horizon: 10.0,
            initial_investment: 0.0,
            ..yearly_plan()
        };
        let projection = project(&plan);
        assert_approx(
            projection
                .required_periodic_investment()
                .expect("required contribution expected"),
            1_000.0,
        );
        let metrics = derive_metrics(&plan, &projection);
        assert_approx(metrics.required_increase_pct.expect("increase expected"), 900.0);
    }
}
