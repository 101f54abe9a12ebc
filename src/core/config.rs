use std::env;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
// A reply waits on translation, classification and an LLM call
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60 * 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_url: String,
    pub storage_path: String,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Builds the config from a variable lookup so it can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("NAFAS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let storage_path = lookup("NAFAS_STORAGE_PATH").unwrap_or("./".to_string());
        let request_timeout_secs = match lookup("NAFAS_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "Ignoring invalid NAFAS_REQUEST_TIMEOUT_SECS {:?}, using {}",
                    raw,
                    DEFAULT_REQUEST_TIMEOUT_SECS
                );
                DEFAULT_REQUEST_TIMEOUT_SECS
            }),
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Self {
            api_url,
            storage_path,
            request_timeout_secs,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }
}
