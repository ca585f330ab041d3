//! # VK Integration Module
//!
//! This module provides the clients for the two external VK services the
//! login flow talks to: the OAuth token endpoint (password grant with
//! interactive challenges) and the VK API (profile fetch after login).
//!
//! ## Overview
//!
//! Both clients are deliberately hidden behind small traits. The token
//! exchange is a blocking, multi-step protocol that may call back into the
//! application mid-flight when VK demands a CAPTCHA solution or a two-factor
//! code, so the seam between "drives the login" and "performs the login" has
//! to be explicit:
//!
//! - [`TokenClient`] - blocking username/password to token exchange
//! - [`MusicClient`] - authenticated VK API access (profile fetch)
//! - [`ChallengeHandler`] - callbacks the token client invokes when the
//!   exchange requires interactive input
//!
//! The challenge handler interface is fixed and well-typed. The token client
//! receives a [`CaptchaChallenge`](crate::types::CaptchaChallenge) with a
//! sid and an image URL and gets back the solution, or an
//! [`AuthError::Cancelled`] when the user aborted the attempt.
//!
//! ## Blocking model
//!
//! `TokenClient::fetch_token` blocks the calling thread, potentially for a
//! long time while a challenge waits for user input. It must therefore only
//! be called from a dedicated worker thread, never from an async task. The
//! concrete implementations use reqwest's blocking client for the same
//! reason.

pub mod service;
pub mod token;

pub use service::VkApiClient;
pub use token::VkTokenClient;

use serde_json::{Map, Value};

use crate::types::CaptchaChallenge;

/// Errors produced by the VK clients and the login attempt built on them.
#[derive(Debug)]
pub enum AuthError {
    /// The attempt was cancelled while a challenge was pending.
    Cancelled,
    /// The token endpoint returned data no access token could be extracted
    /// from.
    InvalidTokenData,
    Http(reqwest::Error),
    Api(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Http(err)
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Cancelled => write!(f, "authentication cancelled"),
            AuthError::InvalidTokenData => write!(f, "failed to get token data"),
            AuthError::Http(e) => write!(f, "http error: {}", e),
            AuthError::Api(msg) => write!(f, "api error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Interactive input required mid-login. Implemented by the challenge
/// coordinator; both calls block until an answer or a cancellation arrives
/// from another thread.
pub trait ChallengeHandler: Send + Sync {
    fn solve_captcha(&self, challenge: &CaptchaChallenge) -> Result<String, AuthError>;
    fn solve_two_factor(&self) -> Result<String, AuthError>;
}

/// Blocking exchange of login credentials for token data. May invoke the
/// challenge handler zero or more times before returning.
pub trait TokenClient: Send {
    fn fetch_token(&self, challenges: &dyn ChallengeHandler) -> Result<Value, AuthError>;
}

/// Authenticated access to the VK API once a token exists.
pub trait MusicClient: Send + Sync {
    fn get_profile(&self) -> Result<Option<Map<String, Value>>, AuthError>;
}
