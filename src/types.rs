use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

/// Credentials persisted between runs. Unset fields are omitted from the
/// JSON file entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<Map<String, Value>>,
}

/// A pending CAPTCHA challenge issued by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptchaChallenge {
    pub sid: String,
    pub img: String,
}

/// External status payload, one variant per authentication status. The
/// `status` tag carries the wire string for the current state and each
/// variant carries exactly the fields relevant to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusPayload {
    NotAuthenticated,
    Initializing,
    Processing,
    /// Captcha identifiers are always present, as empty strings when unset,
    /// so the payload shape stays stable for simple consumers.
    CaptchaRequired {
        captcha_sid: String,
        captcha_img: String,
    },
    #[serde(rename = "2fa_required")]
    TwoFactorRequired,
    Success {
        #[serde(skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
        #[serde(flatten)]
        profile: BTreeMap<String, String>,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl StatusPayload {
    /// Builds the success payload, flattening every stored profile field
    /// into a `profile_<key>` entry with a stringified value. A JSON null
    /// becomes the literal string "null".
    pub fn success(user_id: Option<String>, profile: Option<Map<String, Value>>) -> Self {
        let mut flattened = BTreeMap::new();
        if let Some(profile) = profile {
            for (key, value) in profile {
                let rendered = match value {
                    Value::Null => "null".to_string(),
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                flattened.insert(format!("profile_{}", key), rendered);
            }
        }
        StatusPayload::Success {
            user_id,
            profile: flattened,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Body of `POST /auth/verify`. Exactly one of the fields must be set and
/// must match the challenge currently pending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub captcha: Option<String>,
    pub code: Option<String>,
}

#[derive(Tabled)]
pub struct CredentialTableRow {
    pub field: String,
    pub value: String,
}
