use std::{
    sync::{Arc, Mutex},
    thread,
};

use serde_json::{Map, Value, json};

use crate::{
    auth::{AuthStatus, ChallengeCoordinator},
    info,
    management::{CredentialsManager, CredentialsUpdate},
    types::StatusPayload,
    vk::{AuthError, MusicClient, TokenClient, VkApiClient, VkTokenClient},
    warning,
};

const GENERIC_AUTH_FAILURE: &str = "Authentication failed";

/// Builds a token client for one login attempt from (login, password,
/// user agent). Swappable so tests can stand in for the VK endpoint.
pub type TokenClientFactory = dyn Fn(&str, &str, &str) -> Box<dyn TokenClient> + Send + Sync;

/// Builds an authenticated API client from (token, user id, user agent).
pub type MusicClientFactory = dyn Fn(&str, &str, &str) -> Box<dyn MusicClient> + Send + Sync;

/// State of the current (or most recent) login attempt. One per service;
/// only one attempt may be in flight at a time.
struct Session {
    status: AuthStatus,
    error_message: Option<String>,
    captcha_sid: Option<String>,
    captcha_img: Option<String>,
    music: Option<Arc<dyn MusicClient>>,
    worker: Option<thread::JoinHandle<()>>,
}

/// Orchestrates the authentication lifecycle: spawns the background login
/// attempt, routes challenge answers to the blocked worker through the
/// challenge coordinator, persists the resulting credentials, and projects
/// a point-in-time status payload.
pub struct AuthService {
    session: Mutex<Session>,
    challenges: Arc<ChallengeCoordinator>,
    credentials: Arc<Mutex<CredentialsManager>>,
    configured_user_agent: Option<String>,
    token_factory: Box<TokenClientFactory>,
    music_factory: Box<MusicClientFactory>,
}

impl AuthService {
    /// Creates the service with the real VK clients and immediately tries a
    /// silent restore from persisted credentials. Never spawns a worker.
    pub fn new(credentials: CredentialsManager, configured_user_agent: Option<String>) -> Arc<Self> {
        Self::with_clients(
            credentials,
            configured_user_agent,
            Box::new(|login, password, user_agent| {
                Box::new(VkTokenClient::new(login, password, user_agent))
            }),
            Box::new(|token, user_id, user_agent| {
                Box::new(VkApiClient::new(token, user_id, user_agent))
            }),
        )
    }

    /// Creates the service with custom client factories. This is the seam
    /// tests use to substitute the external VK endpoints.
    pub fn with_clients(
        credentials: CredentialsManager,
        configured_user_agent: Option<String>,
        token_factory: Box<TokenClientFactory>,
        music_factory: Box<MusicClientFactory>,
    ) -> Arc<Self> {
        let service = Arc::new(AuthService {
            session: Mutex::new(Session {
                status: AuthStatus::Initializing,
                error_message: None,
                captcha_sid: None,
                captcha_img: None,
                music: None,
                worker: None,
            }),
            challenges: Arc::new(ChallengeCoordinator::new()),
            credentials: Arc::new(Mutex::new(credentials)),
            configured_user_agent,
            token_factory,
            music_factory,
        });
        service.try_restore();
        service
    }

    /// Initializes the API client from stored credentials if a token and a
    /// client user id are both present. A token without a user id is left
    /// alone with a warning; the caller has to log in again.
    fn try_restore(&self) {
        let (token, user_id, user_agent) = {
            let store = self.credentials.lock().unwrap();
            (
                store.get_access_token(),
                store.get_client_user_id(),
                store.get_user_agent(self.configured_user_agent.as_deref()),
            )
        };

        let mut session = self.session.lock().unwrap();

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            info!("No stored access token, authentication required");
            session.status = AuthStatus::NotAuthenticated;
            return;
        };
        let Some(user_id) = user_id else {
            warning!("Stored access token has no client user id, skipping restore");
            session.status = AuthStatus::NotAuthenticated;
            return;
        };

        session.music = Some(Arc::from((self.music_factory)(
            &token,
            &user_id,
            &user_agent,
        )));
        session.status = AuthStatus::Success;
        info!("Restored session from stored credentials");
    }

    /// Starts a login attempt on a background worker thread and returns
    /// immediately. A no-op with a warning while a worker is still alive.
    pub fn start_auth(self: &Arc<Self>, login: &str, password: &str) {
        let mut session = self.session.lock().unwrap();

        if let Some(worker) = &session.worker {
            if !worker.is_finished() {
                warning!("Authentication already in progress");
                return;
            }
        }

        session.status = AuthStatus::Processing;
        session.error_message = None;
        session.captcha_sid = None;
        session.captcha_img = None;
        self.challenges.begin_attempt();

        let user_agent = self
            .credentials
            .lock()
            .unwrap()
            .get_user_agent(self.configured_user_agent.as_deref());

        let service = Arc::clone(self);
        let login = login.to_string();
        let password = password.to_string();
        session.worker = Some(thread::spawn(move || {
            service.run_attempt(&login, &password, &user_agent);
        }));
    }

    /// Worker body. Catches every failure of the attempt and converts it
    /// into a terminal error status; nothing escapes this thread. The
    /// specific failure is logged but never exposed in the status payload.
    fn run_attempt(&self, login: &str, password: &str, user_agent: &str) {
        match self.attempt(login, password, user_agent) {
            Ok(()) => {
                // Credentials are persisted by now; terminal status last.
                self.challenges.finish_attempt(AuthStatus::Success, None);
                let mut session = self.session.lock().unwrap();
                session.status = AuthStatus::Success;
                session.error_message = None;
                info!("Authentication successful");
            }
            Err(e) => {
                warning!("Authentication attempt failed: {}", e);
                self.challenges
                    .finish_attempt(AuthStatus::Error, Some(GENERIC_AUTH_FAILURE));
                let mut session = self.session.lock().unwrap();
                session.status = AuthStatus::Error;
                session.error_message = Some(GENERIC_AUTH_FAILURE.to_string());
            }
        }
    }

    fn attempt(&self, login: &str, password: &str, user_agent: &str) -> Result<(), AuthError> {
        let client = (self.token_factory)(login, password, user_agent);

        // May block inside a challenge handler until the user answers.
        let token_data = client.fetch_token(self.challenges.as_ref())?;
        let (access_token, user_id) = extract_token_data(&token_data)?;

        // Persist the token before the profile fetch so a crash past this
        // point cannot lose it.
        self.credentials.lock().unwrap().update(CredentialsUpdate {
            access_token: Some(access_token.clone()),
            client_user_id: Some(user_id.clone()),
            user_agent: Some(user_agent.to_string()),
            ..CredentialsUpdate::default()
        });

        let music: Arc<dyn MusicClient> =
            Arc::from((self.music_factory)(&access_token, &user_id, user_agent));

        let mut profile = Map::new();
        profile.insert("id".to_string(), json!(user_id));
        match music.get_profile() {
            Ok(Some(fetched)) => profile.extend(fetched),
            Ok(None) => {}
            Err(e) => warning!("Failed to fetch user profile: {}", e),
        }
        self.credentials.lock().unwrap().update(CredentialsUpdate {
            user_profile: Some(profile),
            ..CredentialsUpdate::default()
        });

        self.session.lock().unwrap().music = Some(music);
        Ok(())
    }

    /// Routes a captcha answer to the blocked worker.
    pub fn submit_captcha(&self, answer: &str) {
        self.challenges.submit_captcha(answer);
        let mut session = self.session.lock().unwrap();
        self.sync_from_challenges(&mut session);
    }

    /// Routes a two-factor code to the blocked worker.
    pub fn submit_two_factor(&self, code: &str) {
        self.challenges.submit_two_factor(code);
        let mut session = self.session.lock().unwrap();
        self.sync_from_challenges(&mut session);
    }

    /// Cancels the in-flight attempt. A no-op when the status is terminal
    /// or nothing is running.
    pub fn cancel_auth(&self) {
        self.challenges.cancel();
        let mut session = self.session.lock().unwrap();
        self.sync_from_challenges(&mut session);
    }

    /// Point-in-time status payload for external consumers.
    pub fn get_status(&self) -> StatusPayload {
        let mut session = self.session.lock().unwrap();
        self.sync_from_challenges(&mut session);

        match session.status {
            AuthStatus::NotAuthenticated => StatusPayload::NotAuthenticated,
            AuthStatus::Initializing => StatusPayload::Initializing,
            AuthStatus::Processing => StatusPayload::Processing,
            AuthStatus::TwoFactorRequired => StatusPayload::TwoFactorRequired,
            AuthStatus::CaptchaRequired => StatusPayload::CaptchaRequired {
                captcha_sid: session.captcha_sid.clone().unwrap_or_default(),
                captcha_img: session.captcha_img.clone().unwrap_or_default(),
            },
            AuthStatus::Error => StatusPayload::Error {
                error: session.error_message.clone(),
            },
            AuthStatus::Success => {
                if session.music.is_some() {
                    let store = self.credentials.lock().unwrap();
                    StatusPayload::success(store.get_client_user_id(), store.get_user_profile())
                } else {
                    StatusPayload::success(None, None)
                }
            }
        }
    }

    /// Mirrors the coordinator state into the session while an attempt is
    /// in flight. The two status fields are eventually consistent, not
    /// identical by reference; outside an attempt the session is
    /// authoritative and the mirror is skipped.
    fn sync_from_challenges(&self, session: &mut Session) {
        if !session.status.is_in_flight() {
            return;
        }

        let snapshot = self.challenges.snapshot();
        let Some(status) = snapshot.status else {
            return;
        };

        session.status = status;
        session.captcha_sid = snapshot.captcha_sid;
        session.captcha_img = snapshot.captcha_img;
        if status == AuthStatus::Error {
            session.error_message = Some(
                snapshot
                    .error_message
                    .unwrap_or_else(|| "Authentication cancelled by user".to_string()),
            );
        }
    }
}

/// Normalizes token endpoint data into `(access_token, user_id)`.
///
/// Accepts a bare token string or an object carrying `access_token`/`token`
/// and `user_id`/`id` keys. A missing access token fails the attempt; a
/// missing user id is substituted with a sentinel and logged.
fn extract_token_data(token_data: &Value) -> Result<(String, String), AuthError> {
    let (access_token, user_id) = match token_data {
        Value::String(token) => (Some(token.clone()), None),
        Value::Object(fields) => {
            let token = fields
                .get("access_token")
                .or_else(|| fields.get("token"))
                .and_then(Value::as_str)
                .map(str::to_string);
            let user_id = fields
                .get("user_id")
                .or_else(|| fields.get("id"))
                .and_then(value_to_id);
            (token, user_id)
        }
        _ => (None, None),
    };

    let access_token = match access_token.filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => return Err(AuthError::InvalidTokenData),
    };

    let user_id = user_id.unwrap_or_else(|| {
        warning!("Could not determine user id, using placeholder");
        "unknown".to_string()
    });

    Ok((access_token, user_id))
}

// User ids arrive as strings or numbers depending on the endpoint.
fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
