use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use axum::{Extension, Json, http::StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;

use vkmcli::api;
use vkmcli::auth::AuthService;
use vkmcli::management::CredentialsManager;
use vkmcli::types::{LoginRequest, StatusPayload, VerifyRequest};
use vkmcli::vk::{AuthError, ChallengeHandler, MusicClient, TokenClient};

struct CaptchaTokenClient;

impl TokenClient for CaptchaTokenClient {
    fn fetch_token(&self, challenges: &dyn ChallengeHandler) -> Result<Value, AuthError> {
        let answer = challenges.solve_captcha(&vkmcli::types::CaptchaChallenge {
            sid: "42".to_string(),
            img: "http://img".to_string(),
        })?;
        if answer != "abcd" {
            return Err(AuthError::Api("captcha answer rejected".to_string()));
        }
        Ok(json!({"access_token": "T", "user_id": "U"}))
    }
}

struct StubMusicClient;

impl MusicClient for StubMusicClient {
    fn get_profile(&self) -> Result<Option<serde_json::Map<String, Value>>, AuthError> {
        Ok(None)
    }
}

fn create_test_service(dir: &TempDir) -> Arc<AuthService> {
    AuthService::with_clients(
        CredentialsManager::new(dir.path().join("credentials.json")),
        None,
        Box::new(|_, _, _| Box::new(CaptchaTokenClient)),
        Box::new(|_, _, _| Box::new(StubMusicClient)),
    )
}

fn wait_for<F>(service: &AuthService, predicate: F) -> StatusPayload
where
    F: Fn(&StatusPayload) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let status = service.get_status();
        if predicate(&status) {
            return status;
        }
        if Instant::now() > deadline {
            panic!("timed out waiting for status, last: {:?}", status);
        }
        thread::sleep(Duration::from_millis(20));
    }
}

#[tokio::test]
async fn test_health_reports_ok() {
    let Json(body) = api::health().await;
    assert_eq!(body["status"], "ok");
    assert!(!body["version"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_status_endpoint_reports_not_authenticated() {
    let dir = TempDir::new().unwrap();
    let service = create_test_service(&dir);

    let Json(payload) = api::status(Extension(service)).await;
    assert_eq!(payload, StatusPayload::NotAuthenticated);
}

#[tokio::test]
async fn test_login_starts_background_attempt() {
    let dir = TempDir::new().unwrap();
    let service = create_test_service(&dir);

    let Json(payload) = api::login(
        Extension(Arc::clone(&service)),
        Json(LoginRequest {
            login: "u".to_string(),
            password: "p".to_string(),
        }),
    )
    .await;

    // Immediately after login the attempt is processing or already parked
    assert!(matches!(
        payload,
        StatusPayload::Processing | StatusPayload::CaptchaRequired { .. }
    ));

    wait_for(&service, |s| {
        matches!(s, StatusPayload::CaptchaRequired { .. })
    });
    service.cancel_auth();
    wait_for(&service, |s| matches!(s, StatusPayload::Error { .. }));
}

#[tokio::test]
async fn test_verify_rejects_mismatched_field() {
    let dir = TempDir::new().unwrap();
    let service = create_test_service(&dir);

    service.start_auth("u", "p");
    wait_for(&service, |s| {
        matches!(s, StatusPayload::CaptchaRequired { .. })
    });

    // A captcha is pending; a two-factor code is the wrong field
    let response = api::verify(
        Extension(Arc::clone(&service)),
        Json(VerifyRequest {
            captcha: None,
            code: Some("123456".to_string()),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The challenge is still pending and answerable
    let response = api::verify(
        Extension(Arc::clone(&service)),
        Json(VerifyRequest {
            captcha: Some("abcd".to_string()),
            code: None,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    wait_for(&service, |s| matches!(s, StatusPayload::Success { .. }));
}

#[tokio::test]
async fn test_verify_without_pending_challenge_is_rejected() {
    let dir = TempDir::new().unwrap();
    let service = create_test_service(&dir);

    let response = api::verify(
        Extension(service),
        Json(VerifyRequest {
            captcha: Some("abcd".to_string()),
            code: None,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_endpoint_reports_error_payload() {
    let dir = TempDir::new().unwrap();
    let service = create_test_service(&dir);

    service.start_auth("u", "p");
    wait_for(&service, |s| {
        matches!(s, StatusPayload::CaptchaRequired { .. })
    });

    let Json(payload) = api::cancel(Extension(Arc::clone(&service))).await;
    match payload {
        StatusPayload::Error { error } => {
            assert!(!error.expect("error message must be set").is_empty());
        }
        other => panic!("expected error payload, got {:?}", other),
    }
}
