use reqwest::blocking::Client;
use serde_json::{Map, Value};

use crate::{
    config,
    vk::{AuthError, MusicClient},
};

const VK_API_VERSION: &str = "5.131";

/// Authenticated VK API client, constructed once a token exists.
pub struct VkApiClient {
    token: String,
    user_id: String,
    user_agent: String,
    api_url: String,
}

impl VkApiClient {
    pub fn new(token: &str, user_id: &str, user_agent: &str) -> Self {
        VkApiClient {
            token: token.to_string(),
            user_id: user_id.to_string(),
            user_agent: user_agent.to_string(),
            api_url: config::vk_api_url(),
        }
    }
}

impl MusicClient for VkApiClient {
    /// Fetches the profile of the authenticated user via `users.get`.
    ///
    /// Returns `Ok(None)` when VK responds without profile data; callers
    /// treat a missing profile as non-fatal.
    fn get_profile(&self) -> Result<Option<Map<String, Value>>, AuthError> {
        let url = format!("{}/method/users.get", self.api_url);
        let client = Client::new();
        let response = client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[
                ("user_ids", self.user_id.as_str()),
                ("fields", "screen_name,photo_200"),
                ("access_token", self.token.as_str()),
                ("v", VK_API_VERSION),
            ])
            .send()?;

        let body: Value = response.json()?;

        if let Some(error) = body.get("error") {
            let message = error
                .get("error_msg")
                .and_then(Value::as_str)
                .unwrap_or("users.get failed");
            return Err(AuthError::Api(message.to_string()));
        }

        let profile = body
            .get("response")
            .and_then(Value::as_array)
            .and_then(|users| users.first())
            .and_then(Value::as_object)
            .cloned();

        Ok(profile)
    }
}
