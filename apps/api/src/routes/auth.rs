//! Mock login + OTP flow. Fixed credentials and a fixed code; no sessions.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;

const ACCEPTED_LOGINS: &[(&str, &str)] = &[
    ("brijesh.dubey@raymond.in", "pass123"),
    ("demo@example.com", "password"),
    ("admin@raymond.in", "@Pass123"),
];

const MOCK_OTP: &str = "123456";
const MOCK_ACCESS_TOKEN: &str = "mock-jwt-token-xyz-123";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

pub fn credentials_accepted(email: &str, password: &str) -> bool {
    ACCEPTED_LOGINS
        .iter()
        .any(|(e, p)| *e == email && *p == password)
}

/// POST /api/login
pub async fn handle_login(Json(req): Json<LoginRequest>) -> Result<Json<Value>, AppError> {
    if !credentials_accepted(&req.email, &req.password) {
        warn!(email = %req.email, "Login rejected");
        return Err(AppError::Unauthorized);
    }
    info!(email = %req.email, "Login accepted, OTP issued");
    Ok(Json(json!({ "message": format!("OTP sent to {}", req.email) })))
}

/// POST /api/verify-otp
pub async fn handle_verify_otp(
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    if req.otp != MOCK_OTP {
        warn!(email = %req.email, "OTP rejected");
        return Err(AppError::Validation("Invalid OTP".to_string()));
    }
    Ok(Json(TokenResponse {
        access_token: MOCK_ACCESS_TOKEN.to_string(),
        token_type: "bearer".to_string(),
    }))
}
