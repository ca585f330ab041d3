use std::{
    io::{self, Write},
    sync::Arc,
    time::Duration,
};

use crate::{auth::AuthService, error, info, success, types::StatusPayload, warning};

/// Runs the login flow interactively on the terminal.
///
/// Starts a background login attempt and then polls its status: when the
/// attempt parks on a challenge, prompts the user for the captcha answer or
/// the two-factor code and submits it, which wakes the worker. Exits the
/// process through `error!` if the attempt ends in an error.
pub async fn auth(service: Arc<AuthService>, login: Option<String>) {
    let login = match login {
        Some(login) => login,
        None => prompt("Login: "),
    };
    let password = prompt("Password: ");

    service.start_auth(&login, &password);
    info!("Authenticating...");

    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;

        match service.get_status() {
            StatusPayload::Initializing | StatusPayload::Processing => {}
            StatusPayload::NotAuthenticated => {
                warning!("No authentication attempt is running");
                return;
            }
            StatusPayload::CaptchaRequired {
                captcha_sid,
                captcha_img,
            } => {
                info!("Captcha required (sid {}): {}", captcha_sid, captcha_img);
                let answer = prompt("Captcha answer: ");
                service.submit_captcha(&answer);
            }
            StatusPayload::TwoFactorRequired => {
                let code = prompt("Two-factor code: ");
                service.submit_two_factor(&code);
            }
            StatusPayload::Success { user_id, .. } => {
                match user_id {
                    Some(user_id) => success!("Authentication successful for user {}", user_id),
                    None => success!("Authentication successful"),
                }
                return;
            }
            StatusPayload::Error { error } => {
                error!(
                    "{}",
                    error.unwrap_or_else(|| "Authentication failed".to_string())
                );
            }
        }
    }
}

fn prompt(label: &str) -> String {
    print!("{}", label);
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().read_line(&mut line).ok();
    line.trim().to_string()
}
