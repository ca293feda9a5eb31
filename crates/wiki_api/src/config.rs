use std::env;
use std::time::Duration;

/// Placeholder in [`ClientConfig::api_root`] replaced by the wiki name.
pub const WIKI_PLACEHOLDER: &str = "{wiki}";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API; `{wiki}` is substituted per client.
    pub api_root: String,
    /// Minimum spacing between two outbound requests.
    pub min_interval: Duration,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_root: "https://{wiki}.fandom.com/api/v1/".to_string(),
            min_interval: Duration::from_millis(200),
            timeout: Duration::from_secs(10),
            user_agent: concat!("wiki_api/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `WIKI_API_ROOT`, `WIKI_API_MIN_INTERVAL_MS`
    /// and `WIKI_API_TIMEOUT_MS`. Unparsable numbers keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(root) = lookup("WIKI_API_ROOT") {
            config.api_root = root;
        }
        if let Some(ms) = lookup_millis(&lookup, "WIKI_API_MIN_INTERVAL_MS") {
            config.min_interval = ms;
        }
        if let Some(ms) = lookup_millis(&lookup, "WIKI_API_TIMEOUT_MS") {
            config.timeout = ms;
        }
        config
    }

    /// The API root for one wiki.
    pub fn root_for(&self, wiki: &str) -> String {
        self.api_root.replace(WIKI_PLACEHOLDER, wiki)
    }
}

fn lookup_millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            log::debug!(target: "wiki_api.config", "ignoring {key}={raw:?}: not a millisecond count");
            None
        }
    }
}
