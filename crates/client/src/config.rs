use serde::Deserialize;

/// Client-side connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Per-attempt timeout when dialing the remote backend.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Total window across connect retries. 0 means a single attempt.
    #[serde(default = "default_connect_retry_window_secs")]
    pub connect_retry_window_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_connect_retry_window_secs() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            connect_retry_window_secs: default_connect_retry_window_secs(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let config_file_path = std::env::var("FLOE_CLIENT_CONFIG_PATH")
            .unwrap_or_else(|_| "config/client.toml".to_string());

        let s = config::Config::builder()
            .add_source(config::File::with_name(&config_file_path).required(false))
            .add_source(config::Environment::with_prefix("FLOE_CLIENT").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}
