use std::sync::Arc;

use axum::{
    Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::{
    auth::AuthService,
    types::{LoginRequest, StatusPayload, VerifyRequest},
};

pub async fn status(Extension(auth): Extension<Arc<AuthService>>) -> Json<StatusPayload> {
    Json(auth.get_status())
}

pub async fn login(
    Extension(auth): Extension<Arc<AuthService>>,
    Json(request): Json<LoginRequest>,
) -> Json<StatusPayload> {
    auth.start_auth(&request.login, &request.password);
    Json(auth.get_status())
}

/// Submits a challenge answer. The supplied field must match the challenge
/// that is currently pending; anything else is a 400.
pub async fn verify(
    Extension(auth): Extension<Arc<AuthService>>,
    Json(request): Json<VerifyRequest>,
) -> Response {
    match auth.get_status() {
        StatusPayload::CaptchaRequired { .. } => match &request.captcha {
            Some(answer) => auth.submit_captcha(answer),
            None => return bad_request("a captcha solution is pending"),
        },
        StatusPayload::TwoFactorRequired => match &request.code {
            Some(code) => auth.submit_two_factor(code),
            None => return bad_request("a two-factor code is pending"),
        },
        _ => return bad_request("no challenge is pending"),
    }

    Json(auth.get_status()).into_response()
}

pub async fn cancel(Extension(auth): Extension<Arc<AuthService>>) -> Json<StatusPayload> {
    auth.cancel_auth();
    Json(auth.get_status())
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
