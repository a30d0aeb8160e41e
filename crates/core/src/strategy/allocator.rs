use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::{Allocation, ItemSet};
use crate::errors::ConfigurationError;

/// Share of the self-valued pool a proposal aims to keep.
pub const DEFAULT_TARGET_FRACTION: Decimal = Decimal::from_parts(85, 0, 0, false, 2);

pub trait Allocator: Send + Sync {
    fn allocate(
        &self,
        items: &ItemSet,
        target_fraction: Decimal,
    ) -> Result<Allocation, ConfigurationError>;
}

/// Greedy highest-value-first allocation.
///
/// Walks items by descending valuation and keeps whole units while the kept
/// value stays at or below `total_value * target_fraction`. The first unit
/// that does not fit ends the walk; that item's remainder and every later
/// item go to the other party. Zero-valued items are always conceded.
///
/// This is deliberately not a knapsack solve: a smaller, later item that
/// would still fit under the target is not picked up.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyAllocator;

impl Allocator for GreedyAllocator {
    fn allocate(
        &self,
        items: &ItemSet,
        target_fraction: Decimal,
    ) -> Result<Allocation, ConfigurationError> {
        validate_target_fraction(target_fraction)?;

        let total_value = items.total_value()?;
        let target_value = Decimal::from(total_value)
            .checked_mul(target_fraction)
            .ok_or(ConfigurationError::ValueOverflow { field: "target_fraction" })?;

        let mut claimed = vec![0_u64; items.len()];
        let mut running: u64 = 0;

        for index in items.ranked_indices() {
            let quantity = items.quantities()[index];
            let valuation = items.valuations()[index];
            if quantity == 0 || valuation == 0 {
                continue;
            }

            let units = units_within(running, valuation, quantity, target_value);
            claimed[index] = units;
            // units * valuation <= quantity * valuation <= total_value
            running += units * valuation;

            if units < quantity {
                break;
            }
        }

        Ok(Allocation::from_claims(
            items.quantities(),
            claimed,
            running,
            total_value,
            target_value,
            proposal_reason(target_fraction),
        ))
    }
}

/// Validates inputs and runs the greedy allocator.
///
/// `batna_self` is checked but does not influence the split.
pub fn allocate(
    quantities: &[i64],
    valuations_self: &[i64],
    batna_self: Decimal,
    target_fraction: Decimal,
) -> Result<Allocation, ConfigurationError> {
    let items = ItemSet::new(quantities, valuations_self)?;
    ensure_non_negative("batna_self", batna_self)?;
    GreedyAllocator.allocate(&items, target_fraction)
}

pub fn validate_target_fraction(target_fraction: Decimal) -> Result<(), ConfigurationError> {
    if target_fraction <= Decimal::ZERO || target_fraction > Decimal::ONE {
        return Err(ConfigurationError::TargetFractionOutOfRange(target_fraction.to_string()));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), ConfigurationError> {
    if value < Decimal::ZERO {
        return Err(ConfigurationError::NegativeValue { field, value: value.to_string() });
    }
    Ok(())
}

pub fn proposal_reason(target_fraction: Decimal) -> String {
    let percent = (target_fraction * Decimal::ONE_HUNDRED).round().normalize();
    format!("Aspiration-based proposal targeting {percent}% of total value")
}

/// Largest `k <= quantity` with `running + k * valuation <= target_value`.
fn units_within(running: u64, valuation: u64, quantity: u64, target_value: Decimal) -> u64 {
    let room = target_value - Decimal::from(running);
    if room < Decimal::from(valuation) {
        return 0;
    }

    let mut units = (room / Decimal::from(valuation))
        .floor()
        .to_u64()
        .map_or(quantity, |fit| fit.min(quantity));

    // decimal division rounds at 28 digits; step back if it rounded up
    while units > 0 && Decimal::from(running + units * valuation) > target_value {
        units -= 1;
    }
    units
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::ItemSet;
    use crate::errors::ConfigurationError;

    use super::{allocate, Allocator, GreedyAllocator, DEFAULT_TARGET_FRACTION};

    #[test]
    fn worked_example_keeps_top_item_and_five_units_of_the_next() {
        let allocation = allocate(&[7, 4, 1], &[45, 72, 33], Decimal::ZERO, DEFAULT_TARGET_FRACTION)
            .expect("valid proposal");

        assert_eq!(allocation.allocation_self, vec![5, 4, 0]);
        assert_eq!(allocation.allocation_other, vec![2, 0, 1]);
        assert_eq!(allocation.total_value, 636);
        assert_eq!(allocation.target_value, Decimal::new(5406, 1));
        assert_eq!(allocation.self_value, 513);
        assert_eq!(allocation.reason, "Aspiration-based proposal targeting 85% of total value");
    }

    #[test]
    fn batna_self_does_not_change_the_split() {
        let low = allocate(&[7, 4, 1], &[45, 72, 33], Decimal::ZERO, DEFAULT_TARGET_FRACTION)
            .expect("valid proposal");
        let high = allocate(&[7, 4, 1], &[45, 72, 33], Decimal::new(600, 0), DEFAULT_TARGET_FRACTION)
            .expect("valid proposal");

        assert_eq!(low, high);
    }

    #[test]
    fn all_zero_valuations_concede_everything() {
        let allocation = allocate(&[3, 2], &[0, 0], Decimal::ZERO, DEFAULT_TARGET_FRACTION)
            .expect("valid proposal");

        assert_eq!(allocation.allocation_self, vec![0, 0]);
        assert_eq!(allocation.allocation_other, vec![3, 2]);
        assert_eq!(allocation.self_value, 0);
    }

    #[test]
    fn full_target_claims_every_valued_unit() {
        let allocation = allocate(&[7, 4, 1, 2], &[45, 72, 33, 0], Decimal::ZERO, Decimal::ONE)
            .expect("valid proposal");

        assert_eq!(allocation.allocation_self, vec![7, 4, 1, 0]);
        assert_eq!(allocation.allocation_other, vec![0, 0, 0, 2]);
        assert_eq!(allocation.self_value, allocation.total_value);
    }

    #[test]
    fn walk_stops_at_first_unit_that_does_not_fit() {
        // target 0.5 * 110 = 55: item0 (50) fits, item1 (50) does not, item2 (10) would fit
        // but the walk has already stopped.
        let allocation = allocate(&[1, 1, 1], &[50, 50, 10], Decimal::ZERO, Decimal::new(5, 1))
            .expect("valid proposal");

        assert_eq!(allocation.allocation_self, vec![1, 0, 0]);
        assert_eq!(allocation.allocation_other, vec![0, 1, 1]);
    }

    #[test]
    fn exact_target_boundary_is_claimed() {
        // total 100, target 50: two units of 25 land exactly on the target
        let allocation = allocate(&[4], &[25], Decimal::ZERO, Decimal::new(5, 1))
            .expect("valid proposal");

        assert_eq!(allocation.allocation_self, vec![2]);
        assert_eq!(allocation.self_value, 50);
    }

    #[test]
    fn zero_quantity_items_do_not_end_the_walk() {
        let allocation = allocate(&[0, 3], &[90, 10], Decimal::ZERO, Decimal::ONE)
            .expect("valid proposal");

        assert_eq!(allocation.allocation_self, vec![0, 3]);
        assert_eq!(allocation.allocation_other, vec![0, 0]);
    }

    #[test]
    fn empty_item_set_yields_empty_allocation() {
        let allocation =
            allocate(&[], &[], Decimal::ZERO, DEFAULT_TARGET_FRACTION).expect("valid proposal");

        assert!(allocation.allocation_self.is_empty());
        assert!(allocation.allocation_other.is_empty());
    }

    #[test]
    fn target_fraction_outside_unit_interval_is_rejected() {
        let items = ItemSet::new(&[1], &[1]).expect("valid items");

        for fraction in [Decimal::ZERO, Decimal::new(-1, 1), Decimal::new(101, 2)] {
            let error = GreedyAllocator.allocate(&items, fraction).expect_err("out of range");
            assert!(matches!(error, ConfigurationError::TargetFractionOutOfRange(_)));
        }
    }

    #[test]
    fn negative_inputs_are_rejected_without_allocation() {
        assert!(matches!(
            allocate(&[7, 4], &[45, -72], Decimal::ZERO, DEFAULT_TARGET_FRACTION),
            Err(ConfigurationError::NegativeEntry { field: "valuations_self", index: 1, .. })
        ));
        assert!(matches!(
            allocate(&[7, 4], &[45, 72], Decimal::new(-5, 0), DEFAULT_TARGET_FRACTION),
            Err(ConfigurationError::NegativeValue { field: "batna_self", .. })
        ));
    }

    #[test]
    fn reason_rounds_target_percentage() {
        let allocation = allocate(&[1], &[1], Decimal::ZERO, Decimal::new(2, 3))
            .expect("valid proposal");
        assert_eq!(allocation.reason, "Aspiration-based proposal targeting 0% of total value");

        let allocation = allocate(&[1], &[1], Decimal::ZERO, Decimal::ONE).expect("valid proposal");
        assert_eq!(allocation.reason, "Aspiration-based proposal targeting 100% of total value");
    }
}
