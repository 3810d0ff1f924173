pub mod error;
pub mod rounding;
pub mod time_value;
pub mod types;

#[cfg(feature = "loan")]
pub mod loan;

pub use error::AmortizationError;
pub use rounding::round2;
pub use types::*;

/// Standard result type for all loan-amortization operations
pub type LoanResult<T> = Result<T, AmortizationError>;
