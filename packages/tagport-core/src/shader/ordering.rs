use std::fmt;

use crate::error::{PortError, Result};

use super::options::OptionVector;

/// Radix of the score encoding. One more than the ranked options a single
/// dimension may hold, so no digit carries into its neighbour.
pub const SCORE_BASE: u128 = 17;

/// Ranked options allowed per dimension.
pub const MAX_RANKED_OPTIONS: usize = (SCORE_BASE - 1) as usize;

/// Comparable position of a variant; higher means closer to the most
/// capable variant of the family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariantScore(pub u128);

impl fmt::Display for VariantScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Curated ranking of a variant family's dimensions and options.
pub trait VariantOrdering {
    /// Dimensions an option vector must carry.
    fn dimension_count(&self) -> usize;

    /// Significance of a dimension; 0 is least significant.
    fn dimension_rank(&self, dimension: usize) -> usize;

    /// Options declared for a dimension, ranked or not.
    fn option_count(&self, dimension: usize) -> usize;

    /// Priority of an option within its dimension, or `None` when the
    /// option is unranked and cannot be compared.
    fn option_rank(&self, dimension: usize, option: u16) -> Option<usize>;

    /// Human-readable rendering of an option vector.
    fn describe(&self, options: &OptionVector) -> String;
}

impl<O: VariantOrdering + ?Sized> VariantOrdering for &O {
    fn dimension_count(&self) -> usize {
        (**self).dimension_count()
    }

    fn dimension_rank(&self, dimension: usize) -> usize {
        (**self).dimension_rank(dimension)
    }

    fn option_count(&self, dimension: usize) -> usize {
        (**self).option_count(dimension)
    }

    fn option_rank(&self, dimension: usize, option: u16) -> Option<usize> {
        (**self).option_rank(dimension, option)
    }

    fn describe(&self, options: &OptionVector) -> String {
        (**self).describe(options)
    }
}

/// Encodes an option vector as a mixed-radix score:
/// `sum(SCORE_BASE ^ dimension_rank * (option_rank + 1))`.
///
/// Entries beyond the ordering's dimension count are ignored.
///
/// # Returns
/// `Err(PortError::OptionCountMismatch)` for a short vector,
/// `Err(PortError::UnrankedOption)` when any option has no rank.
pub fn encode<O: VariantOrdering + ?Sized>(options: &OptionVector, ordering: &O) -> Result<VariantScore> {
    let expected = ordering.dimension_count();
    if options.len() < expected {
        return Err(PortError::OptionCountMismatch {
            expected,
            got: options.len(),
        });
    }

    let mut score: u128 = 0;
    for (dimension, &option) in options.as_slice()[..expected].iter().enumerate() {
        let rank = ordering
            .option_rank(dimension, option)
            .filter(|rank| *rank < MAX_RANKED_OPTIONS)
            .ok_or(PortError::UnrankedOption { dimension, option })?;

        let digit = u32::try_from(ordering.dimension_rank(dimension))
            .ok()
            .and_then(|exponent| SCORE_BASE.checked_pow(exponent))
            .and_then(|scale| scale.checked_mul(rank as u128 + 1))
            .and_then(|value| score.checked_add(value))
            .ok_or_else(|| PortError::InvalidPriorityTable {
                dimension: dimension.to_string(),
                message: "score does not fit 128 bits".to_string(),
            })?;
        score = digit;
    }
    Ok(VariantScore(score))
}
