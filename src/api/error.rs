use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::betting::BettingError;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request data outside the accepted domain
    #[error("Validation error: {0}")]
    Validation(String),
    /// The betting core refused the input
    #[error(transparent)]
    Betting(#[from] BettingError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Betting(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Betting(BettingError::InvalidOdds { .. }) => "invalid_odds",
            ApiError::Betting(BettingError::NonFiniteStake { .. }) => "non_finite_stake",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub fn validate_finite(field: &str, value: f64) -> Result<(), ApiError> {
    if !value.is_finite() {
        return Err(ApiError::Validation(format!(
            "{} must be a finite number, got {}",
            field, value
        )));
    }
    Ok(())
}

pub fn validate_probability(prob: f64) -> Result<(), ApiError> {
    if !(0.0..=1.0).contains(&prob) {
        return Err(ApiError::Validation(format!(
            "p_model must be between 0 and 1, got {}",
            prob
        )));
    }
    Ok(())
}

pub fn validate_bank(bank: f64) -> Result<(), ApiError> {
    validate_finite("bank", bank)?;
    if bank <= 0.0 {
        return Err(ApiError::Validation(format!(
            "bank must be positive, got {}",
            bank
        )));
    }
    Ok(())
}

/// Checks a parameter lies in the half-open interval (0, 1].
pub fn validate_unit_interval(field: &str, value: f64) -> Result<(), ApiError> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(ApiError::Validation(format!(
            "{} must be in (0, 1], got {}",
            field, value
        )));
    }
    Ok(())
}
