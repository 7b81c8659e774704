use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Currency code used to key the reference rate tables
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    INR,
    CAD,
    AUD,
    JPY,
    CHF,
}

impl Currency {
    pub const ALL: [Currency; 8] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::INR,
        Currency::CAD,
        Currency::AUD,
        Currency::JPY,
        Currency::CHF,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Currency::ALL
            .iter()
            .find(|c| c.code() == upper)
            .copied()
            .ok_or_else(|| format!("Unknown currency '{s}'"))
    }
}

/// Period over which a projection compounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundingUnit {
    #[default]
    Year,
    Month,
}

impl CompoundingUnit {
    /// Number of compounding periods in one year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingUnit::Year => 1,
            CompoundingUnit::Month => 12,
        }
    }

    /// Convert an annual rate into the per-period rate for this unit.
    pub fn periodic_rate(&self, annual_rate: Rate) -> Rate {
        annual_rate / Decimal::from(self.periods_per_year())
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_parse_is_case_insensitive() {
        assert_eq!("inr".parse::<Currency>().unwrap(), Currency::INR);
        assert_eq!(" Usd ".parse::<Currency>().unwrap(), Currency::USD);
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn test_monthly_periodic_rate() {
        assert_eq!(CompoundingUnit::Month.periodic_rate(dec!(0.06)), dec!(0.005));
        assert_eq!(CompoundingUnit::Year.periodic_rate(dec!(0.06)), dec!(0.06));
    }

    #[test]
    fn test_compounding_unit_serde_lowercase() {
        let json = serde_json::to_string(&CompoundingUnit::Month).unwrap();
        assert_eq!(json, "\"month\"");
    }
}
