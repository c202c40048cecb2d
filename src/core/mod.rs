mod coerce;
mod engine;
mod metrics;
mod solver;
mod types;

pub use coerce::{LenientNumber, RawPlan, coerce_number};
pub use engine::project;
pub use metrics::{ProjectionMetrics, derive_metrics};
pub use solver::{
    MAX_SEARCH_PERIODS, ShortfallContext, required_periodic_investment, required_time_horizon,
    solve_adjustments,
};
pub use types::{
    Adjustments, Frequency, InvestmentTiming, MAX_PROJECTION_PERIODS, PeriodSample, Plan,
    Projection, TargetEvaluation,
};
