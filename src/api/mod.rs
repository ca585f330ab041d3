//! # API Module
//!
//! This module provides the HTTP endpoints for the local authentication
//! server. It is a thin boundary over the [`AuthService`]: every handler
//! either delegates one operation or reads the current status, and every
//! response body is the status payload for the resulting state.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - `POST /auth/login` starts a background login attempt
//! - [`verify`] - `POST /auth/verify` submits a captcha answer or a
//!   two-factor code; rejected with 400 when the supplied field does not
//!   match the challenge currently pending
//! - [`cancel`] - `POST /auth/cancel` cancels the in-flight attempt
//! - [`status`] - `GET /auth/status` returns the point-in-time status
//!
//! ### Monitoring
//!
//! - [`health`] - `GET /health` returns application status and version
//!
//! ## Architecture
//!
//! The module is built using the [Axum](https://docs.rs/axum) web framework.
//! The shared [`AuthService`] is injected through an `Extension` layer; the
//! handlers never block beyond a mutex, the blocking login work happens on
//! the service's worker thread.
//!
//! [`AuthService`]: crate::auth::AuthService

mod auth;
mod health;

pub use auth::cancel;
pub use auth::login;
pub use auth::status;
pub use auth::verify;
pub use health::health;
