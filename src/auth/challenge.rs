use std::{
    sync::{Condvar, Mutex},
    time::Duration,
};

use crate::{
    auth::AuthStatus,
    info,
    types::CaptchaChallenge,
    vk::{AuthError, ChallengeHandler},
    warning,
};

/// How long a blocked worker sleeps between checks of the challenge state.
/// Bounds the latency of observing a cancellation.
const CHALLENGE_POLL: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
struct ChallengeState {
    status: Option<AuthStatus>,
    captcha_sid: Option<String>,
    captcha_img: Option<String>,
    error_message: Option<String>,
    captcha_answer: String,
    two_factor_code: String,
}

/// Point-in-time copy of the coordinator state, for mirroring into the
/// session.
#[derive(Debug, Clone)]
pub struct ChallengeSnapshot {
    pub status: Option<AuthStatus>,
    pub captcha_sid: Option<String>,
    pub captcha_img: Option<String>,
    pub error_message: Option<String>,
}

/// Coordinates interactive challenges between the blocked worker thread and
/// whichever thread carries the user's answer.
///
/// The worker parks on a condition variable guarded by the state lock,
/// re-checking the status on a bounded interval. The same mutex/condvar pair
/// serves every challenge of an attempt, so a login that needs a captcha and
/// later a two-factor code reuses it, and a cancellation submitted
/// concurrently with the next wait is still observed within one poll
/// interval.
pub struct ChallengeCoordinator {
    state: Mutex<ChallengeState>,
    wake: Condvar,
}

impl ChallengeCoordinator {
    pub fn new() -> Self {
        ChallengeCoordinator {
            state: Mutex::new(ChallengeState::default()),
            wake: Condvar::new(),
        }
    }

    /// Resets challenge state for a fresh login attempt and marks it as
    /// processing. Called by the orchestrator before spawning the worker.
    pub fn begin_attempt(&self) {
        let mut state = self.state.lock().unwrap();
        *state = ChallengeState {
            status: Some(AuthStatus::Processing),
            ..ChallengeState::default()
        };
    }

    /// Terminal write from the worker once the attempt finished. Credentials
    /// are already persisted by the time this runs, so any thread observing
    /// a terminal status can rely on the store.
    pub fn finish_attempt(&self, status: AuthStatus, error_message: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        state.status = Some(status);
        state.error_message = error_message.map(str::to_string);
        self.wake.notify_all();
    }

    /// Submits a captcha answer from any thread. A no-op with a warning
    /// unless a captcha is currently pending.
    pub fn submit_captcha(&self, answer: &str) {
        let mut state = self.state.lock().unwrap();
        if state.status != Some(AuthStatus::CaptchaRequired) {
            warning!("Captcha answer submitted but no captcha is pending");
            return;
        }

        state.captcha_answer = answer.to_string();
        state.status = Some(AuthStatus::Processing);
        self.wake.notify_all();
        info!("Captcha answer submitted");
    }

    /// Submits a two-factor code from any thread. A no-op with a warning
    /// unless a two-factor code is currently pending.
    pub fn submit_two_factor(&self, code: &str) {
        let mut state = self.state.lock().unwrap();
        if state.status != Some(AuthStatus::TwoFactorRequired) {
            warning!("Two-factor code submitted but none is pending");
            return;
        }

        state.two_factor_code = code.to_string();
        state.status = Some(AuthStatus::Processing);
        self.wake.notify_all();
        info!("Two-factor code submitted");
    }

    /// Cancels the attempt from any thread. Effective only while a challenge
    /// is pending or the worker is between phases; a worker blocked in a
    /// challenge observes the error on its next poll and fails with
    /// [`AuthError::Cancelled`].
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        if matches!(
            state.status,
            Some(AuthStatus::CaptchaRequired)
                | Some(AuthStatus::TwoFactorRequired)
                | Some(AuthStatus::Processing)
        ) {
            state.status = Some(AuthStatus::Error);
            state.error_message = Some("Authentication cancelled by user".to_string());
            self.wake.notify_all();
            info!("Authentication cancelled by user");
        }
    }

    pub fn snapshot(&self) -> ChallengeSnapshot {
        let state = self.state.lock().unwrap();
        ChallengeSnapshot {
            status: state.status,
            captcha_sid: state.captcha_sid.clone(),
            captcha_img: state.captcha_img.clone(),
            error_message: state.error_message.clone(),
        }
    }

    /// Parks the calling thread until the status leaves `pending`, polling
    /// at a bounded interval. Returns the guard-free final state needed by
    /// the challenge handlers.
    fn wait_while_pending(&self, pending: AuthStatus) -> Result<ChallengeState, AuthError> {
        let mut state = self.state.lock().unwrap();
        while state.status == Some(pending) {
            let (guard, _) = self.wake.wait_timeout(state, CHALLENGE_POLL).unwrap();
            state = guard;
        }

        if state.status == Some(AuthStatus::Error) {
            return Err(AuthError::Cancelled);
        }

        Ok(ChallengeState {
            status: state.status,
            captcha_sid: state.captcha_sid.clone(),
            captcha_img: state.captcha_img.clone(),
            error_message: state.error_message.clone(),
            captcha_answer: state.captcha_answer.clone(),
            two_factor_code: state.two_factor_code.clone(),
        })
    }
}

impl Default for ChallengeCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChallengeHandler for ChallengeCoordinator {
    /// Called by the token client from the worker thread when the exchange
    /// requires a captcha. Blocks until an answer or a cancellation arrives.
    fn solve_captcha(&self, challenge: &CaptchaChallenge) -> Result<String, AuthError> {
        {
            let mut state = self.state.lock().unwrap();
            state.status = Some(AuthStatus::CaptchaRequired);
            state.captcha_sid = Some(challenge.sid.clone());
            state.captcha_img = Some(challenge.img.clone());
            info!("Captcha required: {}", challenge.img);
        }

        let state = self.wait_while_pending(AuthStatus::CaptchaRequired)?;
        Ok(state.captcha_answer)
    }

    /// Called by the token client from the worker thread when the exchange
    /// requires a two-factor code. Blocks until a code or a cancellation
    /// arrives.
    fn solve_two_factor(&self) -> Result<String, AuthError> {
        {
            let mut state = self.state.lock().unwrap();
            state.status = Some(AuthStatus::TwoFactorRequired);
            info!("Two-factor authentication required");
        }

        let state = self.wait_while_pending(AuthStatus::TwoFactorRequired)?;
        Ok(state.two_factor_code)
    }
}
