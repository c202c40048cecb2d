use serde::Deserialize;

use super::types::{Frequency, InvestmentTiming, Plan};

/// A numeric field as it arrives from a form: either a number or free text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LenientNumber {
    Number(f64),
    Text(String),
}

impl From<f64> for LenientNumber {
    fn from(value: f64) -> Self {
        LenientNumber::Number(value)
    }
}

impl From<&str> for LenientNumber {
    fn from(value: &str) -> Self {
        LenientNumber::Text(value.to_string())
    }
}

/// Blank, unparseable and non-finite input becomes zero.
pub fn coerce_number(value: &LenientNumber) -> f64 {
    let parsed = match value {
        LenientNumber::Number(number) => *number,
        LenientNumber::Text(text) => text.trim().parse::<f64>().unwrap_or(0.0),
    };
    if parsed.is_finite() { parsed } else { 0.0 }
}

fn coerce_field(value: &Option<LenientNumber>) -> f64 {
    value.as_ref().map(coerce_number).unwrap_or(0.0)
}

/// Plan as submitted by an entry surface, before any coercion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPlan {
    pub target_amount: Option<LenientNumber>,
    pub time_horizon: Option<LenientNumber>,
    pub initial_investment: Option<LenientNumber>,
    pub frequency: Option<Frequency>,
    pub periodic_investment: Option<LenientNumber>,
    pub investment_timing: Option<InvestmentTiming>,
    pub annual_return: Option<LenientNumber>,
    pub tax_rate: Option<LenientNumber>,
    pub inflation_rate: Option<LenientNumber>,
}

impl RawPlan {
    /// Never fails; missing or malformed numbers become zero.
    pub fn to_plan(&self) -> Plan {
        Plan {
            target_amount: coerce_field(&self.target_amount),
            time_horizon: coerce_field(&self.time_horizon),
            initial_investment: coerce_field(&self.initial_investment),
            frequency: self.frequency.unwrap_or_default(),
            periodic_investment: coerce_field(&self.periodic_investment),
            investment_timing: self.investment_timing.unwrap_or_default(),
            annual_return: coerce_field(&self.annual_return),
            tax_rate: coerce_field(&self.tax_rate),
            inflation_rate: coerce_field(&self.inflation_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_number_parses_trimmed_text() {
        assert_eq!(coerce_number(&" 1500.5 ".into()), 1500.5);
        assert_eq!(coerce_number(&"12".into()), 12.0);
        assert_eq!(coerce_number(&2.5.into()), 2.5);
    }

    #[test]
    fn coerce_number_defaults_bad_text_to_zero() {
        assert_eq!(coerce_number(&"".into()), 0.0);
        assert_eq!(coerce_number(&"   ".into()), 0.0);
        assert_eq!(coerce_number(&"1.000.000".into()), 0.0);
        assert_eq!(coerce_number(&"abc".into()), 0.0);
        assert_eq!(coerce_number(&"NaN".into()), 0.0);
        assert_eq!(coerce_number(&"inf".into()), 0.0);
    }

    #[test]
    fn raw_plan_accepts_numbers_and_strings() {
        let json = r#"{
          "targetAmount": "100000000",
          "timeHorizon": 10,
          "initialInvestment": "",
          "frequency": "yearly",
          "periodicInvestment": "5000000",
          "investmentTiming": "start",
          "annualReturn": 8.5,
          "taxRate": "oops"
        }"#;
        let raw: RawPlan = serde_json::from_str(json).expect("payload should parse");
        let plan = raw.to_plan();

        assert_eq!(plan.target_amount, 100_000_000.0);
        assert_eq!(plan.time_horizon, 10.0);
        assert_eq!(plan.initial_investment, 0.0);
        assert_eq!(plan.frequency, Frequency::Yearly);
        assert_eq!(plan.periodic_investment, 5_000_000.0);
        assert_eq!(plan.investment_timing, InvestmentTiming::Start);
        assert_eq!(plan.annual_return, 8.5);
        assert_eq!(plan.tax_rate, 0.0);
        assert_eq!(plan.inflation_rate, 0.0);
    }

    #[test]
    fn raw_plan_defaults_missing_fields() {
        let plan = RawPlan::default().to_plan();
        assert_eq!(plan.frequency, Frequency::Monthly);
        assert_eq!(plan.investment_timing, InvestmentTiming::End);
        assert_eq!(plan.time_horizon, 0.0);
        assert!(plan.target().is_none());
    }
}
