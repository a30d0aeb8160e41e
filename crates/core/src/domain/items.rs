use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;

/// Item quantities paired with the proposer's per-unit valuations.
///
/// Only constructible through [`ItemSet::new`], so every held `ItemSet` has
/// matching lengths and non-negative entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSet {
    quantities: Vec<u64>,
    valuations: Vec<u64>,
}

impl ItemSet {
    pub fn new(quantities: &[i64], valuations: &[i64]) -> Result<Self, ConfigurationError> {
        if quantities.len() != valuations.len() {
            return Err(ConfigurationError::LengthMismatch {
                quantities: quantities.len(),
                valuations: valuations.len(),
            });
        }

        Ok(Self {
            quantities: non_negative("quantities", quantities)?,
            valuations: non_negative("valuations_self", valuations)?,
        })
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    pub fn quantities(&self) -> &[u64] {
        &self.quantities
    }

    pub fn valuations(&self) -> &[u64] {
        &self.valuations
    }

    /// Sum of `quantity * valuation` over all items.
    pub fn total_value(&self) -> Result<u64, ConfigurationError> {
        self.value_of(&self.quantities)
    }

    /// Value of a bundle of units, priced with this set's valuations.
    pub fn value_of(&self, units: &[u64]) -> Result<u64, ConfigurationError> {
        units.iter().zip(&self.valuations).try_fold(0_u64, |acc, (count, valuation)| {
            count
                .checked_mul(*valuation)
                .and_then(|value| acc.checked_add(value))
                .ok_or(ConfigurationError::ValueOverflow { field: "valuations_self" })
        })
    }

    /// Item indices by descending valuation, ties by ascending index.
    pub fn ranked_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        // sort_by is stable, so equal valuations keep index order
        indices.sort_by(|left, right| self.valuations[*right].cmp(&self.valuations[*left]));
        indices
    }
}

fn non_negative(field: &'static str, values: &[i64]) -> Result<Vec<u64>, ConfigurationError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            u64::try_from(*value).map_err(|_| ConfigurationError::NegativeEntry {
                field,
                index,
                value: *value,
            })
        })
        .collect()
}
