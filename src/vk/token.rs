use reqwest::blocking::Client;
use serde_json::Value;

use crate::{
    config, info,
    types::CaptchaChallenge,
    vk::{AuthError, ChallengeHandler, TokenClient},
};

// Client credentials of the official VK Android app, which is allowed to use
// the password grant. These are public knowledge, not a secret of this tool.
const VK_CLIENT_ID: &str = "2274003";
const VK_CLIENT_SECRET: &str = "hHbZxrka2uZ6jB1inYsH";
const VK_API_VERSION: &str = "5.131";

/// Token client performing the VK password grant against the OAuth endpoint.
///
/// The exchange is a loop: VK either returns token data, or an error payload
/// naming the interactive step it requires next. A `need_captcha` response
/// carries a captcha sid and image URL; the challenge handler blocks until
/// the user solves it, and the request is retried with the solution. A
/// `need_validation` response asks for a two-factor code the same way. Any
/// other error ends the attempt.
pub struct VkTokenClient {
    login: String,
    password: String,
    user_agent: String,
    oauth_url: String,
}

impl VkTokenClient {
    pub fn new(login: &str, password: &str, user_agent: &str) -> Self {
        VkTokenClient {
            login: login.to_string(),
            password: password.to_string(),
            user_agent: user_agent.to_string(),
            oauth_url: config::vk_oauth_token_url(),
        }
    }

    fn request_token(&self, extra: &[(String, String)]) -> Result<Value, AuthError> {
        let mut params: Vec<(String, String)> = vec![
            ("grant_type".to_string(), "password".to_string()),
            ("client_id".to_string(), VK_CLIENT_ID.to_string()),
            ("client_secret".to_string(), VK_CLIENT_SECRET.to_string()),
            ("username".to_string(), self.login.clone()),
            ("password".to_string(), self.password.clone()),
            ("scope".to_string(), "audio,offline".to_string()),
            ("2fa_supported".to_string(), "1".to_string()),
            ("v".to_string(), VK_API_VERSION.to_string()),
        ];
        params.extend_from_slice(extra);

        let client = Client::new();
        let response = client
            .post(&self.oauth_url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .form(&params)
            .send()?;

        Ok(response.json()?)
    }
}

impl TokenClient for VkTokenClient {
    fn fetch_token(&self, challenges: &dyn ChallengeHandler) -> Result<Value, AuthError> {
        // Parameters earned from resolved challenges, carried into the retry.
        let mut extra: Vec<(String, String)> = Vec::new();

        loop {
            let body = self.request_token(&extra)?;
            extra.clear();

            if body.get("access_token").is_some() {
                return Ok(body);
            }

            match body.get("error").and_then(Value::as_str) {
                Some("need_captcha") => {
                    let challenge = CaptchaChallenge {
                        sid: stringify(body.get("captcha_sid")),
                        img: stringify(body.get("captcha_img")),
                    };
                    info!("Token endpoint requires a captcha: {}", challenge.img);
                    let answer = challenges.solve_captcha(&challenge)?;
                    extra.push(("captcha_sid".to_string(), challenge.sid));
                    extra.push(("captcha_key".to_string(), answer));
                }
                Some("need_validation") => {
                    info!("Token endpoint requires two-factor validation");
                    let code = challenges.solve_two_factor()?;
                    extra.push(("code".to_string(), code));
                }
                Some(err) => {
                    let description = body
                        .get("error_description")
                        .and_then(Value::as_str)
                        .unwrap_or(err);
                    return Err(AuthError::Api(description.to_string()));
                }
                None => return Err(AuthError::InvalidTokenData),
            }
        }
    }
}

// Captcha sids arrive as strings or numbers depending on the endpoint.
fn stringify(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
