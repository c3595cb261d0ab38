//! Kelly Criterion stake sizing for decimal odds.
//!
//! For a bet at decimal price `k` with edge `e = p·k − 1`, the stake that
//! maximises the expected logarithm of wealth is
//!
//!   f* = e / (k − 1) = (b·p − q) / b
//!
//! where `b = k − 1` is the net odds, `p` the win probability and `q = 1 − p`.
//! Callers apply a fractional multiplier on top of this to trade growth for
//! lower variance.

use super::{check_price, BettingError};

/// Full Kelly fraction of bankroll for a bet.
///
/// Returns `0.0` when the edge is not positive; the price is only checked for
/// bets that would actually receive a stake.
pub fn kelly_fraction(edge: f64, price: f64) -> Result<f64, BettingError> {
    if edge.is_nan() || edge <= 0.0 {
        return Ok(0.0);
    }
    check_price(price)?;
    Ok(edge / (price - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kelly_positive_edge() {
        // 20% edge at 3.0 → 0.2 / 2
        let f = kelly_fraction(0.2, 3.0).unwrap();
        assert!(f > 0.0);
        assert_relative_eq!(f, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_kelly_negative_edge() {
        assert_eq!(kelly_fraction(-0.1, 2.0).unwrap(), 0.0);
    }

    #[test]
    fn test_kelly_zero_edge() {
        assert_eq!(kelly_fraction(0.0, 1.5).unwrap(), 0.0);
    }

    #[test]
    fn test_kelly_matches_textbook_formula() {
        // p = 0.6 at evens: b = 1, f* = (0.6 − 0.4) / 1
        let p: f64 = 0.6;
        let price = 2.0;
        let edge = p * price - 1.0;
        assert_relative_eq!(kelly_fraction(edge, price).unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_kelly_ignores_price_without_edge() {
        assert_eq!(kelly_fraction(-0.3, 1.0).unwrap(), 0.0);
        assert_eq!(kelly_fraction(f64::NAN, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_kelly_rejects_degenerate_price() {
        assert_eq!(
            kelly_fraction(0.1, 1.0),
            Err(BettingError::InvalidOdds { index: None, price: 1.0 })
        );
        assert!(kelly_fraction(0.1, 0.8).is_err());
        assert!(kelly_fraction(0.1, f64::INFINITY).is_err());
    }
}
