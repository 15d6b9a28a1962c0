use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How Copart lots are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopartStrategy {
    /// Structured JSON lot-detail endpoint.
    Api,
    /// Headless-browser walk of the public lot page.
    Rendered,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub copart_base_url: String,
    pub iaai_base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub resolve_deadline_secs: u64,
    pub navigation_timeout_secs: u64,
    pub render_wait_secs: u64,
    pub copart_strategy: CopartStrategy,
    pub browser_executable: Option<PathBuf>,
    pub browser_headless: bool,
    pub max_concurrent_resolves: usize,
}
