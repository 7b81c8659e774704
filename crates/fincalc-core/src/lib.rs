pub mod assumptions;
pub mod content;
pub mod error;
pub mod math;
pub mod projection;
pub mod scenarios;
pub mod series;
pub mod tables;
pub mod types;

#[cfg(feature = "loans")]
pub mod loan;

#[cfg(feature = "legacy")]
pub mod legacy;

#[cfg(feature = "ppp")]
pub mod ppp;

#[cfg(feature = "insurance")]
pub mod insurance;

#[cfg(feature = "vehicle")]
pub mod vehicle;

pub use error::FinCalcError;
pub use types::*;

/// Standard result type for all fincalc operations
pub type FinCalcResult<T> = Result<T, FinCalcError>;
