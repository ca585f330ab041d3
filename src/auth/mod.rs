//! # Authentication Module
//!
//! This module owns the challenge-interrupted authentication state machine.
//! A background worker thread drives the blocking token exchange against VK
//! while status reads, challenge answers and cancellations arrive from
//! arbitrary other threads (HTTP handlers, the interactive CLI loop).
//!
//! ## Components
//!
//! - [`AuthStatus`] - the single discriminant for what is legal next
//! - [`ChallengeCoordinator`] - blocks the worker inside a pending challenge
//!   and lets any other thread submit the answer or cancel the attempt
//! - [`AuthService`] - spawns and supervises the worker, persists the
//!   resulting credentials, and projects a point-in-time status payload
//!
//! ## State machine
//!
//! ```text
//! not_authenticated ──start_auth──▶ processing ──challenge──▶ captcha_required
//!                                       ▲                      / 2fa_required
//!                                       └───────submit────────────┘
//!                                       │
//!                                  worker done
//!                                       ▼
//!                                success | error
//! ```
//!
//! `success` and `error` are terminal for an attempt; cancellation forces
//! `error` from any of the in-flight states. A new attempt starts only when
//! no worker thread is alive.

mod challenge;
mod service;
mod status;

pub use challenge::ChallengeCoordinator;
pub use challenge::ChallengeSnapshot;
pub use service::AuthService;
pub use service::MusicClientFactory;
pub use service::TokenClientFactory;
pub use status::AuthStatus;
