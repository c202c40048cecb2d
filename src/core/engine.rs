use super::solver::{ShortfallContext, solve_adjustments};
use super::types::{InvestmentTiming, PeriodSample, Plan, Projection, TargetEvaluation};

/// Runs the plan period by period and evaluates it against its target.
pub fn project(plan: &Plan) -> Projection {
    let periods = plan.period_count();
    let periodic_rate = plan.periodic_rate();

    let mut value = plan.initial_investment;
    let mut contributed = plan.initial_investment;
    let mut trajectory = Vec::with_capacity(periods as usize);

    for period in 1..=periods {
        value = advance_period(
            value,
            plan.periodic_investment,
            periodic_rate,
            plan.investment_timing,
        );
        contributed += plan.periodic_investment;
        trajectory.push(PeriodSample {
            period,
            value: value.round(),
            contributed: contributed.round(),
            gain: (value - contributed).round(),
        });
    }

    let final_value = value;
    let total_contributed = contributed;
    let total_return = final_value - total_contributed;
    let tax_amount = tax_on_gain(total_return, plan.tax_rate);
    let after_tax_return = total_return - tax_amount;
    let after_tax_final_value = total_contributed + after_tax_return;

    let target = evaluate_target(
        plan,
        ShortfallContext {
            periods,
            periodic_rate,
            final_value,
            total_contributed,
        },
        after_tax_final_value,
    );

    Projection {
        periods,
        periodic_rate,
        final_value,
        total_contributed,
        total_return,
        tax_amount,
        after_tax_return,
        after_tax_final_value,
        trajectory,
        target,
    }
}

/// Posts one period: start timing contributes before growth, end timing after it.
pub(crate) fn advance_period(
    value: f64,
    contribution: f64,
    periodic_rate: f64,
    timing: InvestmentTiming,
) -> f64 {
    match timing {
        InvestmentTiming::Start => (value + contribution) * (1.0 + periodic_rate),
        InvestmentTiming::End => value * (1.0 + periodic_rate) + contribution,
    }
}

/// Flat tax on gain; a negative gain yields a negative amount.
pub(crate) fn tax_on_gain(gain: f64, tax_rate: f64) -> f64 {
    gain * (tax_rate / 100.0)
}

fn evaluate_target(
    plan: &Plan,
    context: ShortfallContext,
    after_tax_final_value: f64,
) -> TargetEvaluation {
    let Some(target_amount) = plan.target() else {
        return TargetEvaluation::NoTarget;
    };

    if after_tax_final_value >= target_amount {
        return TargetEvaluation::Met {
            target_amount,
            surplus: after_tax_final_value - target_amount,
        };
    }

    TargetEvaluation::Unmet {
        target_amount,
        shortfall: target_amount - after_tax_final_value,
        adjustments: solve_adjustments(plan, context),
    }
}
