//! Fixed-installment (Price table) loan amortization.
//!
//! Computes the level periodic payment for a principal, an installment count
//! and a periodic rate, then walks the balance period by period splitting
//! each payment into interest and principal. Every split is rounded to the
//! cent; the last installment absorbs whatever residual balance the
//! per-period rounding left behind, so the schedule always closes at exactly
//! zero.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace};

use crate::error::AmortizationError;
use crate::rounding::round2;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::LoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Product policy bound on the number of installments.
pub const DEFAULT_MAX_INSTALLMENTS: u32 = 36;

/// Periodic rates above this trigger a reasonableness warning.
const HIGH_PERIODIC_RATE: Rate = 0.10;

const METHODOLOGY: &str =
    "Fixed-installment annuity (Price table), cent rounding per period, final installment settles residual balance";

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A loan to amortize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Amount borrowed
    pub principal: Money,
    /// Number of level installments
    pub installment_count: u32,
    /// Interest per installment period as a fraction (0.02 = 2%)
    pub periodic_rate: Rate,
}

impl LoanRequest {
    pub fn new(principal: Money, installment_count: u32, periodic_rate: Rate) -> Self {
        Self {
            principal,
            installment_count,
            periodic_rate,
        }
    }

    /// Build a request from a rate quoted as a percentage (2.5 = 2.5%).
    pub fn from_percent(principal: Money, installment_count: u32, rate_percent: f64) -> Self {
        Self::new(principal, installment_count, rate_percent / 100.0)
    }
}

/// Limits applied when validating a [`LoanRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationPolicy {
    /// Largest accepted installment count
    pub max_installments: u32,
}

impl Default for AmortizationPolicy {
    fn default() -> Self {
        Self {
            max_installments: DEFAULT_MAX_INSTALLMENTS,
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A single row of the amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Installment number (1-indexed)
    pub index: u32,
    /// Amount paid this period
    pub payment: Money,
    /// Interest charged on the opening balance
    pub interest_portion: Money,
    /// Principal repaid this period
    pub principal_portion: Money,
    /// Balance outstanding after the payment
    pub remaining_balance: Money,
}

/// Payment figures and full schedule for a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Level payment, rounded to the cent
    pub monthly_payment: Money,
    /// Rounded payment times the installment count
    pub total_to_pay: Money,
    /// Sum of the interest portions
    pub total_interest: Money,
    /// Sum of the scheduled payments (may differ from `total_to_pay` by the
    /// final-installment adjustment)
    pub schedule_total: Money,
    /// One entry per installment
    pub schedule: Vec<ScheduleEntry>,
}

/// Payment figures without the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    /// Level payment, rounded to the cent
    pub monthly_payment: Money,
    /// Rounded payment times the installment count
    pub total_to_pay: Money,
    /// Level payment before cent rounding
    pub unrounded_payment: Money,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Stateless amortization calculator parameterised by an [`AmortizationPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AmortizationEngine {
    policy: AmortizationPolicy,
}

impl AmortizationEngine {
    pub fn new(policy: AmortizationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AmortizationPolicy {
        &self.policy
    }

    /// Unrounded level payment for the loan.
    pub fn compute_monthly_payment(
        &self,
        principal: Money,
        installment_count: u32,
        periodic_rate: Rate,
    ) -> LoanResult<Money> {
        let request = LoanRequest::new(principal, installment_count, periodic_rate);
        self.validate(&request)?;
        time_value::pmt(periodic_rate, installment_count, principal)
    }

    /// Per-period breakdown of `monthly_payment` (already rounded by the caller).
    pub fn build_schedule(
        &self,
        principal: Money,
        installment_count: u32,
        periodic_rate: Rate,
        monthly_payment: Money,
    ) -> LoanResult<Vec<ScheduleEntry>> {
        let request = LoanRequest::new(principal, installment_count, periodic_rate);
        self.validate(&request)?;
        if !monthly_payment.is_finite() || monthly_payment < 0.0 {
            return Err(AmortizationError::InvalidInput {
                field: "monthly_payment".into(),
                reason: "Monthly payment must be a finite, non-negative amount".into(),
            });
        }
        Ok(schedule_rows(&request, monthly_payment))
    }

    /// Payment, totals and schedule for `request`.
    pub fn amortize(&self, request: &LoanRequest) -> LoanResult<AmortizationResult> {
        self.validate(request)?;

        let raw_payment = time_value::pmt(
            request.periodic_rate,
            request.installment_count,
            request.principal,
        )?;
        let monthly_payment = round2(raw_payment);
        let total_to_pay = round2(monthly_payment * f64::from(request.installment_count));

        debug!(
            principal = request.principal,
            installment_count = request.installment_count,
            periodic_rate = request.periodic_rate,
            raw_payment,
            monthly_payment,
            "computed level payment"
        );

        let schedule = schedule_rows(request, monthly_payment);
        let total_interest = round2(schedule.iter().map(|e| e.interest_portion).sum());
        let schedule_total = round2(schedule.iter().map(|e| e.payment).sum());

        Ok(AmortizationResult {
            monthly_payment,
            total_to_pay,
            total_interest,
            schedule_total,
            schedule,
        })
    }

    /// [`amortize`](Self::amortize) wrapped in the standard output envelope.
    pub fn amortize_with_metadata(
        &self,
        request: &LoanRequest,
    ) -> LoanResult<ComputationOutput<AmortizationResult>> {
        let start = Instant::now();
        let result = self.amortize(request)?;

        let mut warnings = rate_warnings(request);
        if result.schedule_total != result.total_to_pay {
            warnings.push(format!(
                "Final installment adjusted for rounding: schedule pays {:.2}, total to pay is {:.2}",
                result.schedule_total, result.total_to_pay
            ));
        }

        let elapsed = start.elapsed().as_micros() as u64;
        Ok(with_metadata(METHODOLOGY, request, warnings, elapsed, result))
    }

    /// Rounded payment and total to pay, wrapped in the standard output envelope.
    pub fn payment_with_metadata(
        &self,
        request: &LoanRequest,
    ) -> LoanResult<ComputationOutput<PaymentSummary>> {
        let start = Instant::now();
        let unrounded_payment = self.compute_monthly_payment(
            request.principal,
            request.installment_count,
            request.periodic_rate,
        )?;
        let monthly_payment = round2(unrounded_payment);
        let summary = PaymentSummary {
            monthly_payment,
            total_to_pay: round2(monthly_payment * f64::from(request.installment_count)),
            unrounded_payment,
        };

        let warnings = rate_warnings(request);
        let elapsed = start.elapsed().as_micros() as u64;
        Ok(with_metadata(METHODOLOGY, request, warnings, elapsed, summary))
    }

    fn validate(&self, request: &LoanRequest) -> LoanResult<()> {
        if !request.principal.is_finite() || request.principal <= 0.0 {
            return Err(AmortizationError::InvalidInput {
                field: "principal".into(),
                reason: "Loan amount must be greater than zero".into(),
            });
        }
        if request.installment_count == 0
            || request.installment_count > self.policy.max_installments
        {
            return Err(AmortizationError::InvalidInput {
                field: "installment_count".into(),
                reason: format!(
                    "Installment count must be an integer between 1 and {}",
                    self.policy.max_installments
                ),
            });
        }
        if !request.periodic_rate.is_finite() || request.periodic_rate < 0.0 {
            return Err(AmortizationError::InvalidInput {
                field: "periodic_rate".into(),
                reason: "Interest rate must be greater than or equal to zero".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Unrounded level payment under the default policy.
pub fn compute_monthly_payment(
    principal: Money,
    installment_count: u32,
    periodic_rate: Rate,
) -> LoanResult<Money> {
    AmortizationEngine::default().compute_monthly_payment(principal, installment_count, periodic_rate)
}

/// Amortization schedule under the default policy.
pub fn build_schedule(
    principal: Money,
    installment_count: u32,
    periodic_rate: Rate,
    monthly_payment: Money,
) -> LoanResult<Vec<ScheduleEntry>> {
    AmortizationEngine::default().build_schedule(
        principal,
        installment_count,
        periodic_rate,
        monthly_payment,
    )
}

/// Payment, totals and schedule under the default policy.
pub fn amortize(request: &LoanRequest) -> LoanResult<AmortizationResult> {
    AmortizationEngine::default().amortize(request)
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

fn rate_warnings(request: &LoanRequest) -> Vec<String> {
    let mut warnings = Vec::new();
    if request.periodic_rate > HIGH_PERIODIC_RATE {
        warnings.push(format!(
            "Periodic rate {:.2}% is unusually high; check that the rate is per period and expressed as a fraction",
            request.periodic_rate * 100.0
        ));
    }
    warnings
}

fn schedule_rows(request: &LoanRequest, monthly_payment: Money) -> Vec<ScheduleEntry> {
    let count = request.installment_count;
    let rate = request.periodic_rate;
    let mut schedule = Vec::with_capacity(count as usize);
    let mut balance = request.principal;

    for index in 1..=count {
        let interest_portion = if rate > 0.0 {
            round2(balance * rate)
        } else {
            0.0
        };

        let entry = if index == count {
            // Last installment settles whatever the per-period rounding left.
            let principal_portion = round2(balance);
            balance = 0.0;
            ScheduleEntry {
                index,
                payment: round2(interest_portion + principal_portion),
                interest_portion,
                principal_portion,
                remaining_balance: balance,
            }
        } else {
            let principal_portion = round2(monthly_payment - interest_portion);
            balance = round2((balance - principal_portion).max(0.0));
            ScheduleEntry {
                index,
                payment: monthly_payment,
                interest_portion,
                principal_portion,
                remaining_balance: balance,
            }
        };

        trace!(
            index,
            payment = entry.payment,
            interest = entry.interest_portion,
            principal = entry.principal_portion,
            balance = entry.remaining_balance,
            "schedule row"
        );
        schedule.push(entry);
    }

    schedule
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
