//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc, time::Duration};

use serde::Deserialize;

use super::types::Res;

/// Default pause between two event pulls, in milliseconds.
fn default_poll_interval_ms() -> u64 {
    1000
}

/// Configuration for the bot.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Display name of the bot account (`EMMM_BOT_NAME`).
    #[serde(default)]
    pub bot_name: String,
    /// User ID of the bot account, used to build the mention token (`EMMM_BOT_ID`).
    #[serde(default)]
    pub bot_id: String,
    /// Slack bot token (`EMMM_BOT_TOKEN`).
    #[serde(default)]
    pub bot_token: String,
    /// Slack app-level token for the socket mode connection (`EMMM_APP_TOKEN`).
    #[serde(default)]
    pub app_token: String,
    /// Display names of other bots that must never be picked (`EMMM_KNOWN_BOT_NAMES`, comma-separated).
    #[serde(default)]
    pub known_bot_names: Vec<String>,
    /// Pause between event pulls in milliseconds (`EMMM_POLL_INTERVAL_MS`).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let env = config::Environment::default()
            .prefix("EMMM")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("known_bot_names");

        let mut cfg = config::Config::builder().add_source(env);

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        Self::from_inner(cfg.build()?.try_deserialize()?)
    }

    /// Validate an already-populated configuration.
    pub fn from_inner(inner: ConfigInner) -> Res<Self> {
        let required = [
            ("EMMM_BOT_NAME", &inner.bot_name),
            ("EMMM_BOT_ID", &inner.bot_id),
            ("EMMM_BOT_TOKEN", &inner.bot_token),
            ("EMMM_APP_TOKEN", &inner.app_token),
        ];

        let missing: Vec<&str> = required.iter().filter(|(_, value)| value.trim().is_empty()).map(|(key, _)| *key).collect();

        if !missing.is_empty() {
            return Err(anyhow::anyhow!("Missing required configuration: {}.", missing.join(", ")));
        }

        if inner.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!("Poll interval must be greater than zero."));
        }

        Ok(Config { inner: Arc::new(inner) })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Every display name to exclude from selection, including the bot's own.
    pub fn all_known_bot_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.known_bot_names.iter().map(|n| n.trim().to_string()).filter(|n| !n.is_empty()).collect();

        if !names.contains(&self.bot_name) {
            names.push(self.bot_name.clone());
        }

        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner() -> ConfigInner {
        ConfigInner {
            bot_name: "emmm".to_string(),
            bot_id: "U3M4U1QUD".to_string(),
            bot_token: "xoxb-test".to_string(),
            app_token: "xapp-test".to_string(),
            known_bot_names: vec!["pangolin".to_string(), "choboi".to_string()],
            poll_interval_ms: default_poll_interval_ms(),
        }
    }

    #[test]
    fn accepts_complete_config() {
        let config = Config::from_inner(inner()).unwrap();

        assert_eq!(config.bot_id, "U3M4U1QUD");
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn rejects_missing_required_values() {
        let err = Config::from_inner(ConfigInner {
            bot_id: String::new(),
            bot_token: "  ".to_string(),
            ..inner()
        })
        .unwrap_err()
        .to_string();

        assert!(err.contains("EMMM_BOT_ID"));
        assert!(err.contains("EMMM_BOT_TOKEN"));
        assert!(!err.contains("EMMM_BOT_NAME"));
    }

    #[test]
    fn rejects_zero_poll_interval() {
        assert!(Config::from_inner(ConfigInner { poll_interval_ms: 0, ..inner() }).is_err());
    }

    #[test]
    fn known_bot_names_include_the_bot_itself() {
        let config = Config::from_inner(inner()).unwrap();

        assert_eq!(config.all_known_bot_names(), vec!["pangolin", "choboi", "emmm"]);
    }

    #[test]
    fn known_bot_names_are_not_duplicated() {
        let config = Config::from_inner(ConfigInner {
            known_bot_names: vec!["emmm".to_string(), " ".to_string()],
            ..inner()
        })
        .unwrap();

        assert_eq!(config.all_known_bot_names(), vec!["emmm"]);
    }
}
