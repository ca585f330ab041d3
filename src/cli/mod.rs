//! # CLI Module
//!
//! This module provides the command-line interface layer for vkmcli. It
//! implements the user-facing commands and coordinates between the
//! authentication service, the credential store, and terminal interaction.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`auth`] - runs the login flow interactively on the terminal: starts a
//!   background attempt, polls its status, and prompts for a captcha answer
//!   or two-factor code whenever one is required
//! - [`serve`] - runs the local HTTP server so a browser-based client can
//!   drive the same flow over `POST /auth/login`, `POST /auth/verify`,
//!   `POST /auth/cancel` and `GET /auth/status`
//!
//! ### Credential Management
//!
//! - [`status`] - displays the persisted credential state
//! - [`logout`] - clears the persisted credentials
//!
//! ## Data Flow
//!
//! Both `auth` and `serve` construct one [`AuthService`] and talk to it
//! exclusively through its public operations; the CLI never touches the
//! challenge coordinator or the worker thread directly. `status` and
//! `logout` operate straight on the credential store and never start a
//! login attempt.
//!
//! ## Error Handling
//!
//! Commands report recoverable conditions with `warning!` and keep going;
//! only unrecoverable boundary failures (for example an unparsable server
//! address) terminate the process through `error!`.
//!
//! [`AuthService`]: crate::auth::AuthService

mod auth;
mod logout;
mod serve;
mod status;

pub use auth::auth;
pub use logout::logout;
pub use serve::serve;
pub use status::status;
