use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A complete split of an item set between self and other.
///
/// For every index `allocation_self[i] + allocation_other[i]` equals the
/// quantity the split was built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub allocation_self: Vec<u64>,
    pub allocation_other: Vec<u64>,
    /// Value of `allocation_self` under the proposer's valuations.
    pub self_value: u64,
    pub total_value: u64,
    pub target_value: Decimal,
    pub reason: String,
}

impl Allocation {
    /// Builds the split from the units self keeps; everything else goes to other.
    pub fn from_claims(
        quantities: &[u64],
        allocation_self: Vec<u64>,
        self_value: u64,
        total_value: u64,
        target_value: Decimal,
        reason: String,
    ) -> Self {
        let allocation_other = quantities
            .iter()
            .zip(&allocation_self)
            .map(|(quantity, kept)| quantity.saturating_sub(*kept))
            .collect();

        Self { allocation_self, allocation_other, self_value, total_value, target_value, reason }
    }

    pub fn is_partition_of(&self, quantities: &[u64]) -> bool {
        self.allocation_self.len() == quantities.len()
            && self.allocation_other.len() == quantities.len()
            && quantities
                .iter()
                .zip(self.allocation_self.iter().zip(&self.allocation_other))
                .all(|(quantity, (kept, conceded))| kept + conceded == *quantity)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::Allocation;

    #[test]
    fn from_claims_assigns_remainder_to_other() {
        let allocation = Allocation::from_claims(
            &[7, 4, 1],
            vec![5, 4, 0],
            513,
            636,
            Decimal::new(5406, 1),
            "test".to_owned(),
        );

        assert_eq!(allocation.allocation_other, vec![2, 0, 1]);
        assert!(allocation.is_partition_of(&[7, 4, 1]));
        assert!(!allocation.is_partition_of(&[7, 4, 2]));
    }
}
