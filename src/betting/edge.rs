//! Edge calculation against bookmaker decimal odds.
//!
//! A decimal price `k` implies a market probability of `1 / k`. The edge is
//! the expected profit per unit staked when the model probability is right:
//!
//!   edge = p_model · k − 1 = p_model / (1 / k) − 1
//!
//! It is positive exactly when the model rates the outcome more likely than the
//! market does, and `edge / (k − 1)` is then the full Kelly stake.

use super::{check_price, BettingError};

/// Market-implied probability of a decimal price.
pub fn implied_probability(price: f64) -> Result<f64, BettingError> {
    check_price(price)?;
    Ok(1.0 / price)
}

/// Calculate the edge of a bet.
///
/// # Arguments
/// * `price`             – Bookmaker decimal odds (must be > 1).
/// * `model_probability` – Model win probability (0.0–1.0), validated by the caller.
pub fn calc_edge(price: f64, model_probability: f64) -> Result<f64, BettingError> {
    let implied = implied_probability(price)?;
    Ok(model_probability / implied - 1.0)
}
