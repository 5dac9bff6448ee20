use std::{collections::HashMap, fs, path::Path, time::Duration};

use serde::Deserialize;

pub const CLIENT_CONFIG_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub server_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8480".into(),
            request_timeout_secs: 10,
        }
    }
}

impl ClientSettings {
    /// Defaults, then `client.toml` in the working directory, then environment.
    pub fn load() -> Self {
        let mut settings = Self::default();
        settings.apply_file(Path::new(CLIENT_CONFIG_FILE));
        settings.apply_env(|name| std::env::var(name).ok());
        settings
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn apply_file(&mut self, path: &Path) {
        if let Ok(raw) = fs::read_to_string(path) {
            self.apply_toml(&raw);
        }
    }

    pub(crate) fn apply_toml(&mut self, raw: &str) {
        let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
            tracing::warn!("ignoring malformed client config");
            return;
        };
        if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
            self.set_server_url(v);
        }
        if let Some(v) = file_cfg
            .get("request_timeout_secs")
            .and_then(toml::Value::as_integer)
        {
            if v > 0 {
                self.request_timeout_secs = v as u64;
            }
        }
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("TX_BROWSER_SERVER_URL") {
            self.set_server_url(&v);
        }
        if let Some(v) = lookup("APP__SERVER_URL") {
            self.set_server_url(&v);
        }
        if let Some(v) = lookup("TX_BROWSER_REQUEST_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(parsed) if parsed > 0 => self.request_timeout_secs = parsed,
                _ => tracing::warn!(value = %v, "ignoring invalid TX_BROWSER_REQUEST_TIMEOUT_SECS"),
            }
        }
    }

    pub fn set_server_url(&mut self, value: &str) {
        let value = value.trim().trim_end_matches('/');
        if !value.is_empty() {
            self.server_url = value.to_string();
        }
    }
}
