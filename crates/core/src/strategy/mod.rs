pub mod allocator;
pub mod evaluator;

use rust_decimal::Decimal;

use crate::domain::{Allocation, Evaluation, ItemSet, OfferContext};
use crate::errors::ConfigurationError;

use self::{
    allocator::{validate_target_fraction, Allocator, GreedyAllocator, DEFAULT_TARGET_FRACTION},
    evaluator::{OfferEvaluator, ThresholdEvaluator},
};

/// Proposes splits and judges offers for one party.
///
/// Holds no per-call state; the configured target fraction is only the
/// fallback for requests that do not carry their own.
#[derive(Clone, Debug)]
pub struct AspirationNegotiator<A, E> {
    allocator: A,
    evaluator: E,
    target_fraction: Decimal,
}

impl<A, E> AspirationNegotiator<A, E> {
    pub fn new(allocator: A, evaluator: E, target_fraction: Decimal) -> Self {
        Self { allocator, evaluator, target_fraction }
    }

    pub fn target_fraction(&self) -> Decimal {
        self.target_fraction
    }
}

impl AspirationNegotiator<GreedyAllocator, ThresholdEvaluator> {
    pub fn with_target_fraction(target_fraction: Decimal) -> Result<Self, ConfigurationError> {
        validate_target_fraction(target_fraction)?;
        Ok(Self::new(GreedyAllocator, ThresholdEvaluator, target_fraction))
    }
}

impl Default for AspirationNegotiator<GreedyAllocator, ThresholdEvaluator> {
    fn default() -> Self {
        Self::new(GreedyAllocator, ThresholdEvaluator, DEFAULT_TARGET_FRACTION)
    }
}

impl<A, E> AspirationNegotiator<A, E>
where
    A: Allocator,
    E: OfferEvaluator,
{
    pub fn propose(
        &self,
        items: &ItemSet,
        target_fraction: Option<Decimal>,
    ) -> Result<Allocation, ConfigurationError> {
        self.allocator.allocate(items, target_fraction.unwrap_or(self.target_fraction))
    }

    pub fn judge(&self, context: &OfferContext) -> Result<Evaluation, ConfigurationError> {
        self.evaluator.evaluate(context)
    }
}
