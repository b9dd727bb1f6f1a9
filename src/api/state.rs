//! Session configuration shared by handlers and cookie helpers.

const DEFAULT_SESSION_TTL_SECONDS: i64 = 60 * 60;

/// How sessions behave: token lifetime and cookie hardening.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    session_ttl_seconds: i64,
    secure_cookies: bool,
}

impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            secure_cookies: false,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    /// Only mark cookies `Secure` when the dashboard is served over HTTPS,
    /// otherwise local deployments lose their session on every request.
    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.secure_cookies
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
