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

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub log_level: String,
    pub cache_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_image_bytes: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .field("log_level", &self.log_level)
            .field("cache_dir", &self.cache_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_image_bytes", &self.max_image_bytes)
            .finish()
    }
}
