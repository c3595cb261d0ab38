use tracing::debug;

use super::kelly::kelly_fraction;
use super::BettingError;

/// Default fractional-Kelly multiplier (half Kelly).
pub const DEFAULT_FRACTION_MULTIPLIER: f64 = 0.5;
/// Default ceiling on aggregate capital at risk, as a fraction of bank.
pub const DEFAULT_MAX_TOTAL_RISK: f64 = 0.1;

/// A bet to be sized: signed edge and decimal price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bet {
    pub edge: f64,
    pub price: f64,
}

impl Bet {
    pub fn new(edge: f64, price: f64) -> Self {
        Bet { edge, price }
    }
}

/// Tuning knobs for [`allocate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationParams {
    /// Scales the full Kelly fraction down (0 < m ≤ 1).
    pub fraction_multiplier: f64,
    /// Cap on the summed risk of the batch (0 < cap ≤ 1).
    pub max_total_risk: f64,
}

impl Default for AllocationParams {
    fn default() -> Self {
        AllocationParams {
            fraction_multiplier: DEFAULT_FRACTION_MULTIPLIER,
            max_total_risk: DEFAULT_MAX_TOTAL_RISK,
        }
    }
}

/// Sizing result for the bet at `index` in the input batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub index: usize,
    /// Unconstrained Kelly fraction
    pub kelly: f64,
    /// Fraction of bank after multiplier and risk cap
    pub fraction: f64,
    /// `fraction / (price − 1)`
    pub risk: f64,
    /// Stake in currency units
    pub amount: f64,
}

impl Allocation {
    fn zero(index: usize) -> Self {
        Allocation {
            index,
            kelly: 0.0,
            fraction: 0.0,
            risk: 0.0,
            amount: 0.0,
        }
    }
}

/// Allocations for a whole batch plus its aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationReport {
    pub allocations: Vec<Allocation>,
    pub total_risk: f64,
    pub total_amount: f64,
    /// Factor applied by the risk cap; `1.0` when the cap did not bind.
    pub scale: f64,
    pub capped: bool,
}

/// Split `bank` across `bets` with fractional Kelly under a total-risk cap.
///
/// Each bet gets `kelly · multiplier` of the bank. If the summed risk of the
/// batch then exceeds `max_total_risk`, every fraction and risk is multiplied by
/// the same factor so that the sum lands exactly on the cap. Bets with a
/// non-positive edge get all-zero allocations.
///
/// Inputs other than the prices are assumed validated by the caller. A bet with
/// a positive edge and a price that is not finite or `<= 1` fails the whole batch
/// with [`BettingError::InvalidOdds`]. An edge so large for its odds that the
/// stake, risk or amount overflows fails with [`BettingError::NonFiniteStake`].
pub fn allocate(
    bets: &[Bet],
    bank: f64,
    params: AllocationParams,
) -> Result<AllocationReport, BettingError> {
    // Pass 1: per-bet Kelly sizing
    let mut allocations = Vec::with_capacity(bets.len());
    for (index, bet) in bets.iter().enumerate() {
        let kelly = kelly_fraction(bet.edge, bet.price).map_err(|e| e.at(index))?;
        if kelly <= 0.0 {
            allocations.push(Allocation::zero(index));
            continue;
        }
        let fraction = kelly * params.fraction_multiplier;
        let risk = fraction / (bet.price - 1.0);
        if !(kelly.is_finite() && risk.is_finite()) {
            return Err(BettingError::NonFiniteStake {
                index: Some(index),
                price: bet.price,
            });
        }
        allocations.push(Allocation {
            index,
            kelly,
            fraction,
            risk,
            amount: 0.0,
        });
    }

    let unscaled_risk: f64 = allocations.iter().map(|a| a.risk).sum();
    let capped = unscaled_risk > params.max_total_risk && unscaled_risk > 0.0;
    let scale = if capped {
        params.max_total_risk / unscaled_risk
    } else {
        1.0
    };
    if capped {
        debug!(
            "Total risk {:.4} exceeds cap {:.4}, scaling {} bets by {:.4}",
            unscaled_risk,
            params.max_total_risk,
            bets.len(),
            scale
        );
    }

    // Pass 2: uniform de-risking and conversion to stake amounts
    for (a, bet) in allocations.iter_mut().zip(bets) {
        if capped {
            a.fraction *= scale;
            a.risk *= scale;
        }
        a.amount = a.fraction * bank;
        if !a.amount.is_finite() {
            return Err(BettingError::NonFiniteStake {
                index: Some(a.index),
                price: bet.price,
            });
        }
    }

    let total_risk = allocations.iter().map(|a| a.risk).sum();
    let total_amount = allocations.iter().map(|a| a.amount).sum();

    Ok(AllocationReport {
        allocations,
        total_risk,
        total_amount,
        scale,
        capped,
    })
}
