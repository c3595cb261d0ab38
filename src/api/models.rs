use serde::{Deserialize, Serialize};

use crate::betting::allocator::{DEFAULT_FRACTION_MULTIPLIER, DEFAULT_MAX_TOTAL_RISK};

/// A bet to price against the model: one element of the `/edges` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRequest {
    pub fixture_id: i64,
    pub team_id: i64,
    /// Market label, e.g. "Match Winner"
    pub market: String,
    /// Bookmaker decimal odds
    pub k_dec: f64,
    /// Model win probability (0.0–1.0)
    pub p_model: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeResponse {
    pub fixture_id: i64,
    pub team_id: i64,
    pub market: String,
    pub k_dec: f64,
    pub p_model: f64,
    pub edge: f64,
    pub description: Option<String>,
}

impl EdgeResponse {
    pub fn new(req: EdgeRequest, edge: f64) -> Self {
        EdgeResponse {
            fixture_id: req.fixture_id,
            team_id: req.team_id,
            market: req.market,
            k_dec: req.k_dec,
            p_model: req.p_model,
            edge,
            description: req.description,
        }
    }
}

/// A bet that already carries its edge. Identification fields are optional
/// and echoed back untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateBet {
    pub edge: f64,
    pub k_dec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_model: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_fraction_multiplier() -> f64 {
    DEFAULT_FRACTION_MULTIPLIER
}

fn default_max_total_risk() -> f64 {
    DEFAULT_MAX_TOTAL_RISK
}

/// Body of `POST /allocate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateRequest {
    pub bets: Vec<AllocateBet>,
    /// Bankroll in currency units
    pub bank: f64,
    #[serde(default = "default_fraction_multiplier")]
    pub fraction_multiplier: f64,
    #[serde(default = "default_max_total_risk")]
    pub max_total_risk: f64,
}

/// Input bet plus its sizing.
#[derive(Debug, Clone, Serialize)]
pub struct AllocatedBet {
    #[serde(flatten)]
    pub bet: AllocateBet,
    pub kelly: f64,
    pub fraction: f64,
    pub risk: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllocateResponse {
    pub bets: Vec<AllocatedBet>,
    pub total_risk: f64,
    pub total_amount: f64,
    pub scale: f64,
    pub capped: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
