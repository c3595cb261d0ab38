pub mod allocator;
pub mod edge;
pub mod kelly;

pub use allocator::{allocate, AllocationParams, Bet};
pub use edge::calc_edge;

use thiserror::Error;

/// Failures raised by the pure betting core.
///
/// `index` is the position of the offending bet in a batch, or `None` when a
/// single bet was priced on its own.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BettingError {
    /// Decimal odds that cannot carry a stake (`price <= 1` or not finite).
    #[error("invalid odds {price}{}: decimal price must be finite and greater than 1", bet_label(.index))]
    InvalidOdds { index: Option<usize>, price: f64 },
    /// Edge and price are finite but the resulting stake overflows.
    #[error("stake overflows at price {price}{}: edge too large for the odds", bet_label(.index))]
    NonFiniteStake { index: Option<usize>, price: f64 },
}

fn bet_label(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" for bet #{}", i),
        None => String::new(),
    }
}

impl BettingError {
    /// Re-attribute the error to bet `index` of a batch.
    pub fn at(self, index: usize) -> Self {
        let index = Some(index);
        match self {
            BettingError::InvalidOdds { price, .. } => BettingError::InvalidOdds { index, price },
            BettingError::NonFiniteStake { price, .. } => {
                BettingError::NonFiniteStake { index, price }
            }
        }
    }
}

/// Returns `Ok(())` when `price` is usable decimal odds.
pub(crate) fn check_price(price: f64) -> Result<(), BettingError> {
    if price.is_finite() && price > 1.0 {
        Ok(())
    } else {
        Err(BettingError::InvalidOdds { index: None, price })
    }
}
