//! VK Music Credential Bootstrap Library
//!
//! This library implements a browser- and terminal-driven login flow for the
//! VK music API. VK does not speak standard OAuth: a username and password
//! are exchanged for an access token, and the exchange may be interrupted by
//! interactive challenges (a CAPTCHA image to solve, or a two-factor code).
//! The core of the library is the authentication state machine that drives a
//! blocking login attempt on a background worker thread while status reads,
//! challenge answers, and cancellations arrive from other threads.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints for the local authentication server
//! - `auth` - Authentication state machine and challenge coordination
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Durable credential storage
//! - `server` - Local HTTP server exposing the authentication API
//! - `types` - Data structures and type definitions
//! - `vk` - VK token and profile clients
//!
//! # Example
//!
//! ```
//! use vkmcli::{config, management::CredentialsManager};
//!
//! #[tokio::main]
//! async fn main() -> vkmcli::Res<()> {
//!     config::load_env().await?;
//!     let credentials = CredentialsManager::open_default();
//!     println!("authenticated: {}", credentials.has_credentials());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod management;
pub mod server;
pub mod types;
pub mod vk;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use vkmcli::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Starting authentication...");
/// info!("Restored session for user {}", user_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations.
///
/// # Example
///
/// ```
/// success!("Authentication successful");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors at
/// the CLI boundary; library code reports failures through `Result` values
/// and the `warning!` macro instead.
///
/// # Example
///
/// ```
/// error!("Failed to parse server address: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues that don't require program termination. Used for
/// recoverable issues, for example a failed profile fetch after an otherwise
/// successful login.
///
/// # Example
///
/// ```
/// warning!("Captcha answer submitted but no captcha is pending");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
