//! Configuration management for the VK credential bootstrap tool.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including the local server address, the
//! VK endpoints, and an optional fixed user agent string.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use dotenv;
use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `vkmcli/.env`. A missing `.env` file is not an
/// error; every setting has a default or is optional.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/vkmcli/.env`
/// - macOS: `~/Library/Application Support/vkmcli/.env`
/// - Windows: `%LOCALAPPDATA%/vkmcli/.env`
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("vkmcli/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    // The .env file is optional.
    let _ = dotenv::from_path(path);
    Ok(())
}

/// Returns the bind address for the local authentication server.
///
/// Retrieves the `SERVER_ADDRESS` environment variable which specifies the
/// address and port where the local HTTP server should listen for login,
/// verify, cancel and status requests.
///
/// # Example
///
/// ```
/// let addr = server_addr(); // e.g., "127.0.0.1:8817"
/// ```
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8817".to_string())
}

/// Returns the configured user agent string, if any.
///
/// Retrieves the `VKM_USER_AGENT` environment variable. When unset, the
/// credential store falls back to a cached or randomly selected preset user
/// agent (see `CredentialsManager::get_user_agent`).
pub fn user_agent() -> Option<String> {
    env::var("VKM_USER_AGENT").ok()
}

/// Returns the VK OAuth token endpoint URL.
///
/// Retrieves the `VK_OAUTH_TOKEN_URL` environment variable which contains
/// the URL used for the password grant token exchange. Defaults to the
/// public VK endpoint.
pub fn vk_oauth_token_url() -> String {
    env::var("VK_OAUTH_TOKEN_URL").unwrap_or_else(|_| "https://oauth.vk.com/token".to_string())
}

/// Returns the VK API base URL.
///
/// Retrieves the `VK_API_URL` environment variable which contains the base
/// URL for VK API method calls such as the user profile fetch. Defaults to
/// the public VK endpoint.
pub fn vk_api_url() -> String {
    env::var("VK_API_URL").unwrap_or_else(|_| "https://api.vk.com".to_string())
}
