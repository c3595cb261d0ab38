pub mod error;
pub mod models;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::betting::{allocate, calc_edge, AllocationParams, Bet};
use error::{validate_bank, validate_finite, validate_probability, validate_unit_interval, ApiError};
use models::{
    AllocateRequest, AllocateResponse, AllocatedBet, EdgeRequest, EdgeResponse, HealthResponse,
};

/// Build the Axum router for the betting API.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/edges", post(edges_handler))
        .route("/allocate", post(allocate_handler))
        .layer(CorsLayer::permissive())
}

/// GET /health
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /edges
///
/// Prices every bet in the body against its model probability. Order is kept.
async fn edges_handler(
    Json(bets): Json<Vec<EdgeRequest>>,
) -> Result<Json<Vec<EdgeResponse>>, ApiError> {
    for bet in &bets {
        validate_probability(bet.p_model)?;
        validate_finite("k_dec", bet.k_dec)?;
    }

    let mut results = Vec::with_capacity(bets.len());
    for (index, bet) in bets.into_iter().enumerate() {
        let edge = calc_edge(bet.k_dec, bet.p_model).map_err(|e| e.at(index))?;
        debug!(
            "Edge for fixture {} team {} ({}): {:.4}",
            bet.fixture_id, bet.team_id, bet.market, edge
        );
        results.push(EdgeResponse::new(bet, edge));
    }

    info!("Calculated edges for {} bet(s)", results.len());
    Ok(Json(results))
}

/// POST /allocate
///
/// Sizes bets that already carry an edge with risk-capped fractional Kelly.
async fn allocate_handler(
    Json(req): Json<AllocateRequest>,
) -> Result<Json<AllocateResponse>, ApiError> {
    validate_bank(req.bank)?;
    validate_unit_interval("fraction_multiplier", req.fraction_multiplier)?;
    validate_unit_interval("max_total_risk", req.max_total_risk)?;
    for bet in &req.bets {
        validate_finite("edge", bet.edge)?;
    }

    let bets: Vec<Bet> = req.bets.iter().map(|b| Bet::new(b.edge, b.k_dec)).collect();
    let params = AllocationParams {
        fraction_multiplier: req.fraction_multiplier,
        max_total_risk: req.max_total_risk,
    };
    let report = allocate(&bets, req.bank, params)?;

    info!(
        "Allocated {} bet(s): total ${:.2} of ${:.2} bank, risk {:.4}{}",
        bets.len(),
        report.total_amount,
        req.bank,
        report.total_risk,
        if report.capped { " (capped)" } else { "" }
    );

    let allocated = req
        .bets
        .into_iter()
        .zip(report.allocations)
        .map(|(bet, a)| AllocatedBet {
            bet,
            kelly: a.kelly,
            fraction: a.fraction,
            risk: a.risk,
            amount: a.amount,
        })
        .collect();

    Ok(Json(AllocateResponse {
        bets: allocated,
        total_risk: report.total_risk,
        total_amount: report.total_amount,
        scale: report.scale,
        capped: report.capped,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betting::BettingError;
    use approx::assert_relative_eq;
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::json;

    fn edge_request(k_dec: f64, p_model: f64) -> EdgeRequest {
        EdgeRequest {
            fixture_id: 1,
            team_id: 101,
            market: "Match Winner".into(),
            k_dec,
            p_model,
            description: Some("Team A vs Team B".into()),
        }
    }

    fn allocate_request(value: serde_json::Value) -> AllocateRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let Json(h) = health_handler().await;
        assert_eq!(h.status, "ok");
    }

    #[tokio::test]
    async fn test_edges_returns_edge_per_bet() {
        let Json(out) = edges_handler(Json(vec![edge_request(2.0, 0.6), edge_request(2.0, 0.4)]))
            .await
            .unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].fixture_id, 1);
        assert_eq!(out[0].team_id, 101);
        assert_eq!(out[0].description.as_deref(), Some("Team A vs Team B"));
        assert!(out[0].edge > 0.0);
        assert_relative_eq!(out[0].edge, 0.2, epsilon = 1e-12);
        assert!(out[1].edge < 0.0);
    }

    #[tokio::test]
    async fn test_edges_rejects_probability_out_of_range() {
        let err = edges_handler(Json(vec![edge_request(2.0, 1.2)]))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_edges_rejects_degenerate_odds() {
        let err = edges_handler(Json(vec![edge_request(2.0, 0.5), edge_request(1.0, 0.5)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Betting(BettingError::InvalidOdds { index: Some(1), .. })
        ));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_edges_empty_body() {
        let Json(out) = edges_handler(Json(vec![])).await.unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_allocate_request_defaults() {
        let req = allocate_request(json!({ "bets": [], "bank": 100.0 }));
        assert_eq!(req.fraction_multiplier, 0.5);
        assert_eq!(req.max_total_risk, 0.1);
    }

    #[tokio::test]
    async fn test_allocate_single_bet() {
        let req = allocate_request(json!({
            "bets": [{
                "fixture_id": 1,
                "team_id": 101,
                "market": "Match Winner",
                "k_dec": 2.0,
                "p_model": 0.6,
                "edge": 0.2
            }],
            "bank": 1000,
            "fraction_multiplier": 0.5,
            "max_total_risk": 0.1
        }));
        let Json(resp) = allocate_handler(Json(req)).await.unwrap();

        assert_eq!(resp.bets.len(), 1);
        let bet = &resp.bets[0];
        assert!(bet.amount > 0.0);
        assert_relative_eq!(bet.kelly, 0.2, epsilon = 1e-12);
        assert_relative_eq!(bet.fraction, 0.1, epsilon = 1e-12);
        assert_relative_eq!(bet.amount, 100.0, epsilon = 1e-9);
        assert!(!resp.capped);

        let body = serde_json::to_value(&resp).unwrap();
        assert_eq!(body["bets"][0]["fixture_id"], 1);
        assert_eq!(body["bets"][0]["k_dec"], 2.0);
        assert!(body["bets"][0]["amount"].is_number());
        assert!(body["bets"][0].get("description").is_none());
    }

    #[tokio::test]
    async fn test_allocate_caps_total_risk() {
        let req = allocate_request(json!({
            "bets": [
                { "edge": 0.3, "k_dec": 2.0 },
                { "edge": 0.3, "k_dec": 2.0 },
                { "edge": 0.3, "k_dec": 2.0 }
            ],
            "bank": 1000
        }));
        let Json(resp) = allocate_handler(Json(req)).await.unwrap();

        let total: f64 = resp.bets.iter().map(|b| b.risk).sum();
        assert!(resp.capped);
        assert!(total <= 0.1 + 1e-10);
    }

    #[tokio::test]
    async fn test_allocate_rejects_bad_parameters() {
        for body in [
            json!({ "bets": [], "bank": 0 }),
            json!({ "bets": [], "bank": 100, "fraction_multiplier": 0 }),
            json!({ "bets": [], "bank": 100, "max_total_risk": 1.5 }),
        ] {
            let err = allocate_handler(Json(allocate_request(body)))
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[tokio::test]
    async fn test_allocate_rejects_degenerate_odds() {
        let req = allocate_request(json!({
            "bets": [{ "edge": 0.1, "k_dec": 1.0 }],
            "bank": 1000
        }));
        let err = allocate_handler(Json(req)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_allocate_rejects_overflowing_stake() {
        let req = allocate_request(json!({
            "bets": [
                { "edge": 1e300, "k_dec": 1.0000000001 },
                { "edge": 0.1, "k_dec": 2.0 }
            ],
            "bank": 1000
        }));
        let err = allocate_handler(Json(req)).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Betting(BettingError::NonFiniteStake { index: Some(0), .. })
        ));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_allocate_empty_batch() {
        let req = allocate_request(json!({ "bets": [], "bank": 1000 }));
        let Json(resp) = allocate_handler(Json(req)).await.unwrap();
        assert!(resp.bets.is_empty());
        assert_eq!(resp.total_risk, 0.0);
    }
}
