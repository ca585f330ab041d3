/// Authentication status. Exactly one value is current at any instant and it
/// alone determines which operations are legal next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    NotAuthenticated,
    Initializing,
    Processing,
    CaptchaRequired,
    TwoFactorRequired,
    Success,
    Error,
}

impl AuthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthStatus::NotAuthenticated => "not_authenticated",
            AuthStatus::Initializing => "initializing",
            AuthStatus::Processing => "processing",
            AuthStatus::CaptchaRequired => "captcha_required",
            AuthStatus::TwoFactorRequired => "2fa_required",
            AuthStatus::Success => "success",
            AuthStatus::Error => "error",
        }
    }

    /// True while a login attempt is in flight and not yet terminal.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            AuthStatus::Processing | AuthStatus::CaptchaRequired | AuthStatus::TwoFactorRequired
        )
    }
}

impl std::fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
