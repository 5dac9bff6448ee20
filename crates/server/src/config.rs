use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use serde::Deserialize;
use server_api::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub page_size: usize,
    pub latency_ms: u64,
    pub dataset_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8480".into(),
            page_size: DEFAULT_PAGE_SIZE,
            latency_ms: 0,
            dataset_path: None,
        }
    }
}

impl Settings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        tracing::warn!("ignoring malformed server.toml");
        return;
    };

    if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
        settings.server_bind_override(v);
    }
    if let Some(v) = file_cfg.get("page_size").and_then(toml::Value::as_integer) {
        if v > 0 {
            settings.page_size = v as usize;
        }
    }
    if let Some(v) = file_cfg.get("latency_ms").and_then(toml::Value::as_integer) {
        if v >= 0 {
            settings.latency_ms = v as u64;
        }
    }
    if let Some(v) = file_cfg.get("dataset_path").and_then(toml::Value::as_str) {
        settings.dataset_path = Some(PathBuf::from(v));
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind_override(&v);
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind_override(&v);
    }

    if let Some(v) = lookup("APP__PAGE_SIZE") {
        match v.parse::<usize>() {
            Ok(parsed) if parsed > 0 => settings.page_size = parsed,
            _ => tracing::warn!(value = %v, "ignoring invalid APP__PAGE_SIZE"),
        }
    }

    if let Some(v) = lookup("APP__LATENCY_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.latency_ms = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring invalid APP__LATENCY_MS"),
        }
    }

    if let Some(v) = lookup("APP__DATASET_PATH") {
        settings.dataset_path = Some(PathBuf::from(v));
    }
}

impl Settings {
    fn server_bind_override(&mut self, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.bind_addr = value.to_string();
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
