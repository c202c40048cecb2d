use tracing::debug;

use super::engine::{advance_period, tax_on_gain};
use super::types::{Adjustments, InvestmentTiming, Plan};

/// Upper bound for the horizon search: 100 years of monthly periods.
pub const MAX_SEARCH_PERIODS: u32 = 1200;

/// End state of the simulated trajectory the solver extends from.
#[derive(Debug, Clone, Copy)]
pub struct ShortfallContext {
    pub periods: u32,
    pub periodic_rate: f64,
    pub final_value: f64,
    pub total_contributed: f64,
}

/// Alternatives that close the gap to the plan's target. Only meaningful
/// when the plan has a target that the projection missed.
pub fn solve_adjustments(plan: &Plan, context: ShortfallContext) -> Adjustments {
    Adjustments {
        required_periodic_investment: required_periodic_investment(plan, context),
        required_time_horizon: required_time_horizon(plan, context),
    }
}

/// Contribution per period that reaches the target at the original horizon,
/// rounded up so it is never short.
pub fn required_periodic_investment(plan: &Plan, context: ShortfallContext) -> Option<f64> {
    let target = plan.target_amount;
    let initial = plan.initial_investment;
    let r = context.periodic_rate;
    let periods = context.periods;
    if periods == 0 {
        return None;
    }
    let n = periods as f64;

    let tax_share = plan.tax_rate / 100.0;
    let required = if tax_share >= 1.0 {
        // Gains are taxed away entirely, only contributions count.
        (target - initial) / n
    } else {
        let adjusted_target = target / (1.0 - tax_share);
        if r == 0.0 {
            (adjusted_target - initial) / n
        } else {
            let growth = (1.0 + r).powi(periods as i32);
            match plan.investment_timing {
                InvestmentTiming::End => {
                    (adjusted_target - initial * growth) / ((growth - 1.0) / r)
                }
                // Annuity due: every contribution earns one extra period.
                InvestmentTiming::Start => {
                    (adjusted_target - initial * growth) / ((growth - 1.0) / r * (1.0 + r))
                }
            }
        }
    };

    required.is_finite().then(|| required.ceil())
}

/// Years needed at the current contribution, found by extending the
/// trajectory one period at a time up to [`MAX_SEARCH_PERIODS`].
///
/// The search counts from the unfloored horizon, so a fractional horizon is
/// extended by whole periods past its own length.
pub fn required_time_horizon(plan: &Plan, context: ShortfallContext) -> f64 {
    let target = plan.target_amount;
    let periods_per_year = plan.frequency.periods_per_year() as f64;
    let cap = MAX_SEARCH_PERIODS as f64;
    let mut estimated_periods = (plan.time_horizon * periods_per_year).max(0.0);
    let mut estimated_amount = context.final_value;
    let mut extra_periods = 0u32;
    let mut reached = false;

    while estimated_periods + 1.0 <= cap {
        estimated_periods += 1.0;
        extra_periods += 1;
        estimated_amount = advance_period(
            estimated_amount,
            plan.periodic_investment,
            context.periodic_rate,
            plan.investment_timing,
        );
        let estimated_contributed =
            context.total_contributed + extra_periods as f64 * plan.periodic_investment;
        let estimated_return = estimated_amount - estimated_contributed;
        let after_tax_amount = estimated_amount - tax_on_gain(estimated_return, plan.tax_rate);

        if after_tax_amount >= target {
            reached = true;
            break;
        }
    }

    if !reached {
        debug!(
            periods = estimated_periods,
            target_amount = target,
            "horizon search stopped at the period cap"
        );
    }

    if extra_periods == 0 {
        // Already at or past the cap.
        return plan.time_horizon;
    }
    round_to_tenth(estimated_periods / periods_per_year)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
