use rust_decimal::Decimal;

use super::allocator::ensure_non_negative;
use crate::domain::{DecisionBranch, Evaluation, OfferContext};
use crate::errors::ConfigurationError;

/// Multiplier on the counter value below which an offer is no longer
/// "close enough" to accept.
pub const ACCEPT_TOLERANCE: Decimal = Decimal::from_parts(95, 0, 0, false, 2);

pub trait OfferEvaluator: Send + Sync {
    fn evaluate(&self, context: &OfferContext) -> Result<Evaluation, ConfigurationError>;
}

/// Accepts an offer that meets the BATNA or lands within the tolerance band
/// under the counter value; rejects everything else.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThresholdEvaluator;

impl OfferEvaluator for ThresholdEvaluator {
    fn evaluate(&self, context: &OfferContext) -> Result<Evaluation, ConfigurationError> {
        ensure_non_negative("offer_value", context.offer_value)?;
        ensure_non_negative("batna_value", context.batna_value)?;
        ensure_non_negative("counter_value", context.counter_value)?;

        let branch = decide(context);
        Ok(Evaluation::new(branch, evaluation_reason(context, branch)))
    }
}

pub fn evaluate(
    offer_value: Decimal,
    batna_value: Decimal,
    counter_value: Decimal,
) -> Result<Evaluation, ConfigurationError> {
    ThresholdEvaluator.evaluate(&OfferContext { offer_value, batna_value, counter_value })
}

fn decide(context: &OfferContext) -> DecisionBranch {
    if context.offer_value >= context.batna_value {
        DecisionBranch::MeetsBatna
    } else if context.offer_value >= context.counter_value * ACCEPT_TOLERANCE {
        DecisionBranch::WithinCounterTolerance
    } else {
        DecisionBranch::BelowThresholds
    }
}

fn evaluation_reason(context: &OfferContext, branch: DecisionBranch) -> String {
    let OfferContext { offer_value, batna_value, counter_value } = *context;
    let floor = (counter_value * ACCEPT_TOLERANCE).normalize();

    let summary = match branch {
        DecisionBranch::MeetsBatna => {
            format!("offer meets or exceeds BATNA {batna_value}")
        }
        DecisionBranch::WithinCounterTolerance => {
            format!("offer is below BATNA but within tolerance of counter (>= {floor})")
        }
        DecisionBranch::BelowThresholds => {
            format!("offer is below BATNA and below counter tolerance {floor}")
        }
    };

    format!(
        "Offer value {offer_value} vs BATNA {batna_value} and counter {counter_value}: {summary} [{}]",
        branch.as_str()
    )
}
