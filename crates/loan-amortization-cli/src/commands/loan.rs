use clap::Args;
use serde_json::Value;

use loan_amortization_core::loan::amortization::{
    AmortizationEngine, AmortizationPolicy, LoanRequest, DEFAULT_MAX_INSTALLMENTS,
};

use crate::input;

/// Arguments shared by the loan commands
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Amount borrowed (e.g. 1000 or 1500.50)
    #[arg(long)]
    pub principal: Option<f64>,

    /// Number of monthly installments
    #[arg(long)]
    pub installments: Option<u32>,

    /// Interest rate per installment period, in percent (e.g. 2.5 for 2.5%)
    #[arg(long, default_value = "0")]
    pub interest_rate: f64,

    /// Largest installment count accepted
    #[arg(long, default_value_t = DEFAULT_MAX_INSTALLMENTS)]
    pub max_installments: u32,

    /// Path to JSON input file with a loan request (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Full schedule with totals, wrapped in the computation envelope.
pub fn run_amortize(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engine = engine_for(&args);
    let request = resolve_request(&args)?;
    let output = engine.amortize_with_metadata(&request)?;
    Ok(serde_json::to_value(output)?)
}

/// Payment figures only, without the schedule.
pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engine = engine_for(&args);
    let request = resolve_request(&args)?;
    let output = engine.payment_with_metadata(&request)?;
    Ok(serde_json::to_value(output)?)
}

fn engine_for(args: &LoanArgs) -> AmortizationEngine {
    AmortizationEngine::new(AmortizationPolicy {
        max_installments: args.max_installments,
    })
}

/// Input file first, then explicit flags, then JSON piped on stdin.
fn resolve_request(args: &LoanArgs) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }

    if let Some(principal) = args.principal {
        let installments = args
            .installments
            .ok_or("--installments is required (or provide --input)")?;
        return Ok(LoanRequest::from_percent(
            principal,
            installments,
            args.interest_rate,
        ));
    }

    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    Err("--principal and --installments, --input <file.json> or stdin required".into())
}
