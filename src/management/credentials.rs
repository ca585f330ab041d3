use std::{fs, io, path::PathBuf};

use rand::seq::IndexedRandom;
use serde_json::{Map, Value};

use crate::{info, types::Credentials, warning};

/// A small rotation of current desktop browser user agents. VK profiles the
/// user agent across the token exchange and later API calls, so whichever
/// one a login attempt picks is cached and reused verbatim afterwards.
const USER_AGENT_PRESETS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug)]
pub enum CredentialsError {
    IoError(io::Error),
    SerdeError(serde_json::Error),
}

impl From<io::Error> for CredentialsError {
    fn from(err: io::Error) -> Self {
        CredentialsError::IoError(err)
    }
}

impl From<serde_json::Error> for CredentialsError {
    fn from(err: serde_json::Error) -> Self {
        CredentialsError::SerdeError(err)
    }
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::IoError(e) => write!(f, "io error: {}", e),
            CredentialsError::SerdeError(e) => write!(f, "serde error: {}", e),
        }
    }
}

/// Partial update of the stored credentials. `None` fields are untouched.
#[derive(Debug, Default)]
pub struct CredentialsUpdate {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub client_user_id: Option<String>,
    pub user_agent: Option<String>,
    pub user_profile: Option<Map<String, Value>>,
}

/// Durable storage for the VK credentials as a JSON file.
///
/// The manager keeps an in-memory copy and rewrites the file on every
/// update. A load or save failure is logged and otherwise swallowed; the
/// detectable symptom for a caller is simply the absence of expected state.
pub struct CredentialsManager {
    path: PathBuf,
    credentials: Credentials,
}

impl CredentialsManager {
    pub fn new(path: PathBuf) -> Self {
        let credentials = match Self::load(&path) {
            Ok(Some(credentials)) => credentials,
            Ok(None) => {
                info!("No credentials file at {}", path.display());
                Credentials::default()
            }
            Err(e) => {
                warning!("Failed to load credentials from {}: {}", path.display(), e);
                Credentials::default()
            }
        };
        Self { path, credentials }
    }

    /// Opens the store at the default location in the local data directory.
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("vkmcli/cache/credentials.json");
        path
    }

    fn load(path: &PathBuf) -> Result<Option<Credentials>, CredentialsError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self) -> Result<(), CredentialsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to a temporary file and rename so readers never observe a
        // half-written credentials file.
        let json = serde_json::to_string_pretty(&self.credentials)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warning!("Failed to save credentials to {}: {}", self.path.display(), e);
        }
    }

    pub fn get_access_token(&self) -> Option<String> {
        self.credentials.access_token.clone()
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.credentials.refresh_token.clone()
    }

    pub fn get_client_user_id(&self) -> Option<String> {
        self.credentials.client_user_id.clone()
    }

    pub fn get_user_profile(&self) -> Option<Map<String, Value>> {
        self.credentials.user_profile.clone()
    }

    /// Resolves the user agent to use for a login attempt, in priority
    /// order: cached value, configured value, random preset, hard-coded
    /// default.
    pub fn get_user_agent(&self, configured: Option<&str>) -> String {
        if let Some(cached) = &self.credentials.user_agent {
            return cached.clone();
        }
        if let Some(configured) = configured {
            return configured.to_string();
        }
        USER_AGENT_PRESETS
            .choose(&mut rand::rng())
            .map(|agent| agent.to_string())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
    }

    /// Applies a partial update and rewrites the file.
    pub fn update(&mut self, update: CredentialsUpdate) {
        if let Some(access_token) = update.access_token {
            self.credentials.access_token = Some(access_token);
        }
        if let Some(refresh_token) = update.refresh_token {
            self.credentials.refresh_token = Some(refresh_token);
        }
        if let Some(client_user_id) = update.client_user_id {
            self.credentials.client_user_id = Some(client_user_id);
        }
        if let Some(user_agent) = update.user_agent {
            self.credentials.user_agent = Some(user_agent);
        }
        if let Some(user_profile) = update.user_profile {
            self.credentials.user_profile = Some(user_profile);
        }
        self.persist();
    }

    pub fn clear(&mut self) {
        self.credentials = Credentials::default();
        self.persist();
    }

    /// True when a non-empty access token is stored.
    pub fn has_credentials(&self) -> bool {
        self.credentials
            .access_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }
}
