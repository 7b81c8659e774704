//! Reference rate tables.
//!
//! Read-only market data the calculators consume as plain parameters. The
//! built-in tables ship with the crate; a JSON file can replace them, and a
//! failed load degrades to the built-ins.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::FinCalcError;
use crate::types::{Currency, Rate};
use crate::FinCalcResult;

/// Investment strategy used to pick an expected portfolio return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strategy::Conservative => "conservative",
            Strategy::Balanced => "balanced",
            Strategy::Aggressive => "aggressive",
        };
        f.write_str(s)
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(Strategy::Conservative),
            "balanced" => Ok(Strategy::Balanced),
            "aggressive" => Ok(Strategy::Aggressive),
            _ => Err(format!(
                "Unknown strategy '{s}'. Use: conservative, balanced, aggressive"
            )),
        }
    }
}

/// Borrower credit tier used to pick an auto-loan APR.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CreditTier {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl fmt::Display for CreditTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CreditTier::Excellent => "excellent",
            CreditTier::Good => "good",
            CreditTier::Fair => "fair",
            CreditTier::Poor => "poor",
        };
        f.write_str(s)
    }
}

impl FromStr for CreditTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excellent" => Ok(CreditTier::Excellent),
            "good" => Ok(CreditTier::Good),
            "fair" => Ok(CreditTier::Fair),
            "poor" => Ok(CreditTier::Poor),
            _ => Err(format!("Unknown credit tier '{s}'. Use: excellent, good, fair, poor")),
        }
    }
}

/// Expected annual portfolio return per strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyReturns {
    pub conservative: Rate,
    pub balanced: Rate,
    pub aggressive: Rate,
}

impl StrategyReturns {
    pub fn for_strategy(&self, strategy: Strategy) -> Rate {
        match strategy {
            Strategy::Conservative => self.conservative,
            Strategy::Balanced => self.balanced,
            Strategy::Aggressive => self.aggressive,
        }
    }
}

/// Container for every reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTables {
    pub as_of: NaiveDate,
    pub general_inflation: BTreeMap<Currency, Rate>,
    pub medical_inflation: BTreeMap<Currency, Rate>,
    pub portfolio_returns: BTreeMap<Currency, StrategyReturns>,
    /// Local currency units per international dollar.
    pub ppp_factors: BTreeMap<Currency, Decimal>,
    pub auto_loan_rates: BTreeMap<CreditTier, Rate>,
}

impl Default for RateTables {
    fn default() -> Self {
        let general_inflation = BTreeMap::from([
            (Currency::USD, dec!(0.032)),
            (Currency::EUR, dec!(0.024)),
            (Currency::GBP, dec!(0.030)),
            (Currency::INR, dec!(0.050)),
            (Currency::CAD, dec!(0.027)),
            (Currency::AUD, dec!(0.032)),
            (Currency::JPY, dec!(0.022)),
            (Currency::CHF, dec!(0.012)),
        ]);

        let medical_inflation = BTreeMap::from([
            (Currency::USD, dec!(0.058)),
            (Currency::EUR, dec!(0.045)),
            (Currency::GBP, dec!(0.050)),
            (Currency::INR, dec!(0.120)),
            (Currency::CAD, dec!(0.045)),
            (Currency::AUD, dec!(0.052)),
            (Currency::JPY, dec!(0.030)),
            (Currency::CHF, dec!(0.035)),
        ]);

        let returns = |conservative, balanced, aggressive| StrategyReturns {
            conservative,
            balanced,
            aggressive,
        };
        let portfolio_returns = BTreeMap::from([
            (Currency::USD, returns(dec!(0.050), dec!(0.075), dec!(0.095))),
            (Currency::EUR, returns(dec!(0.040), dec!(0.060), dec!(0.080))),
            (Currency::GBP, returns(dec!(0.045), dec!(0.065), dec!(0.085))),
            (Currency::INR, returns(dec!(0.070), dec!(0.100), dec!(0.130))),
            (Currency::CAD, returns(dec!(0.045), dec!(0.070), dec!(0.090))),
            (Currency::AUD, returns(dec!(0.050), dec!(0.070), dec!(0.090))),
            (Currency::JPY, returns(dec!(0.020), dec!(0.040), dec!(0.060))),
            (Currency::CHF, returns(dec!(0.025), dec!(0.045), dec!(0.065))),
        ]);

        let ppp_factors = BTreeMap::from([
            (Currency::USD, dec!(1.00)),
            (Currency::EUR, dec!(0.69)),
            (Currency::GBP, dec!(0.67)),
            (Currency::INR, dec!(22.40)),
            (Currency::CAD, dec!(1.18)),
            (Currency::AUD, dec!(1.43)),
            (Currency::JPY, dec!(94.00)),
            (Currency::CHF, dec!(1.02)),
        ]);

        let auto_loan_rates = BTreeMap::from([
            (CreditTier::Excellent, dec!(0.055)),
            (CreditTier::Good, dec!(0.069)),
            (CreditTier::Fair, dec!(0.095)),
            (CreditTier::Poor, dec!(0.135)),
        ]);

        Self {
            as_of: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            general_inflation,
            medical_inflation,
            portfolio_returns,
            ppp_factors,
            auto_loan_rates,
        }
    }
}

impl RateTables {
    pub fn from_json_str(json: &str) -> FinCalcResult<Self> {
        let tables: Self = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_json_path(path: &Path) -> FinCalcResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Load tables from `path`, degrading to the built-in tables on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        crate::content::or_default("rate tables", Self::from_json_path(path), Self::default)
    }

    pub fn general_inflation(&self, currency: &Currency) -> FinCalcResult<Rate> {
        lookup(&self.general_inflation, currency, "general inflation")
    }

    pub fn medical_inflation(&self, currency: &Currency) -> FinCalcResult<Rate> {
        lookup(&self.medical_inflation, currency, "medical inflation")
    }

    /// Medical inflation expressed as a multiple of general inflation.
    pub fn healthcare_multiplier(&self, currency: &Currency) -> FinCalcResult<Decimal> {
        let general = self.general_inflation(currency)?;
        let medical = self.medical_inflation(currency)?;
        if general <= Decimal::ZERO {
            return Err(FinCalcError::ReferenceData(format!(
                "general inflation for {currency} must be positive to derive a healthcare multiplier"
            )));
        }
        Ok(medical / general)
    }

    pub fn portfolio_return(&self, currency: &Currency, strategy: Strategy) -> FinCalcResult<Rate> {
        lookup(&self.portfolio_returns, currency, "portfolio returns")
            .map(|r| r.for_strategy(strategy))
    }

    pub fn ppp_factor(&self, currency: &Currency) -> FinCalcResult<Decimal> {
        lookup(&self.ppp_factors, currency, "PPP factor")
    }

    pub fn auto_loan_rate(&self, tier: CreditTier) -> FinCalcResult<Rate> {
        self.auto_loan_rates.get(&tier).copied().ok_or_else(|| {
            FinCalcError::ReferenceData(format!("no auto loan rate for credit tier {tier:?}"))
        })
    }

    fn validate(&self) -> FinCalcResult<()> {
        if let Some((currency, _)) = self.ppp_factors.iter().find(|(_, f)| **f <= Decimal::ZERO) {
            return Err(FinCalcError::ReferenceData(format!(
                "PPP factor for {currency} must be positive"
            )));
        }
        if let Some((tier, _)) = self.auto_loan_rates.iter().find(|(_, r)| **r < Decimal::ZERO) {
            return Err(FinCalcError::ReferenceData(format!(
                "auto loan rate for {tier:?} cannot be negative"
            )));
        }
        Ok(())
    }
}

fn lookup<T: Copy>(table: &BTreeMap<Currency, T>, currency: &Currency, name: &str) -> FinCalcResult<T> {
    table
        .get(currency)
        .copied()
        .ok_or_else(|| FinCalcError::ReferenceData(format!("no {name} entry for {currency}")))
}
