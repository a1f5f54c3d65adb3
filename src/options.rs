/// Default API host.
pub const DEFAULT_HOST: &str = "lsapi.seomoz.com";
/// Default path prefix in front of every endpoint.
pub const DEFAULT_BASE_PATH: &str = "linkscape";
/// `User-Agent` sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("mozscape-http/", env!("CARGO_PKG_VERSION"));

/// Configures the API location, user agent and transport timeout.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Host (optionally with `:port`) requests are sent to over plain HTTP.
    pub host: String,
    /// Path prefix placed between the host and the endpoint path.
    pub base_path: String,
    pub user_agent: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            base_path: DEFAULT_BASE_PATH.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout_ms: 10_000,
        }
    }
}

impl ClientOptions {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
