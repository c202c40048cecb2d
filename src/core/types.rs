use serde::{Deserialize, Serialize};

/// Longest trajectory a single projection will simulate: 1000 years of monthly periods.
pub const MAX_PROJECTION_PERIODS: u32 = 12_000;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Monthly => 12,
            Frequency::Yearly => 1,
        }
    }
}

/// Whether a period's contribution is posted before or after that period's growth.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentTiming {
    Start,
    #[default]
    End,
}

/// One savings scenario. Percentages are expressed as percent, e.g. `12.0` for 12%.
///
/// The engine trusts this value: positivity of the horizon and target is checked
/// by the entry surface before a plan reaches [`crate::core::project`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Zero means no target.
    pub target_amount: f64,
    pub time_horizon: f64,
    pub initial_investment: f64,
    pub frequency: Frequency,
    pub periodic_investment: f64,
    pub investment_timing: InvestmentTiming,
    pub annual_return: f64,
    pub tax_rate: f64,
    /// Only used for derived metrics.
    pub inflation_rate: f64,
}

impl Plan {
    pub fn target(&self) -> Option<f64> {
        if self.target_amount == 0.0 || self.target_amount.is_nan() {
            None
        } else {
            Some(self.target_amount)
        }
    }

    /// Whole number of compounding periods covered by the horizon, capped at
    /// [`MAX_PROJECTION_PERIODS`].
    pub fn period_count(&self) -> u32 {
        let periods = self.time_horizon * self.frequency.periods_per_year() as f64;
        if periods.is_nan() || periods <= 0.0 {
            0
        } else {
            periods.floor().min(MAX_PROJECTION_PERIODS as f64) as u32
        }
    }

    /// Nominal annual rate divided evenly across periods.
    pub fn periodic_rate(&self) -> f64 {
        self.annual_return / 100.0 / self.frequency.periods_per_year() as f64
    }
}

/// A single row of the trajectory, rounded to whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSample {
    pub period: u32,
    pub value: f64,
    pub contributed: f64,
    pub gain: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustments {
    /// `None` when no finite contribution reaches the target (the plan has no periods).
    pub required_periodic_investment: Option<f64>,
    /// Years, one decimal place.
    pub required_time_horizon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(
    tag = "status",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum TargetEvaluation {
    NoTarget,
    Met {
        target_amount: f64,
        surplus: f64,
    },
    Unmet {
        target_amount: f64,
        shortfall: f64,
        adjustments: Adjustments,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub periods: u32,
    pub periodic_rate: f64,
    pub final_value: f64,
    pub total_contributed: f64,
    pub total_return: f64,
    pub tax_amount: f64,
    pub after_tax_return: f64,
    pub after_tax_final_value: f64,
    pub trajectory: Vec<PeriodSample>,
    pub target: TargetEvaluation,
}

impl Projection {
    pub fn target_met(&self) -> bool {
        !matches!(self.target, TargetEvaluation::Unmet { .. })
    }

    pub fn shortfall(&self) -> f64 {
        match self.target {
            TargetEvaluation::Unmet { shortfall, .. } => shortfall,
            _ => 0.0,
        }
    }

    pub fn surplus(&self) -> f64 {
        match self.target {
            TargetEvaluation::Met { surplus, .. } => surplus,
            _ => 0.0,
        }
    }

    pub fn adjustments(&self) -> Option<Adjustments> {
        match self.target {
            TargetEvaluation::Unmet { adjustments, .. } => Some(adjustments),
            _ => None,
        }
    }

    pub fn required_periodic_investment(&self) -> Option<f64> {
        self.adjustments()
            .and_then(|adjustments| adjustments.required_periodic_investment)
    }

    pub fn required_time_horizon(&self) -> Option<f64> {
        self.adjustments()
            .map(|adjustments| adjustments.required_time_horizon)
    }
}
