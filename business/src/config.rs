use std::any::Any;

use log::info;
use serde::Deserialize;
use thiserror::Error;
use truthy_states::{SnapshotClone, State, state_assign_impl};
use ustr::Ustr;

/// Prefix of the environment variables read by [`BusinessConfig::from_env`].
pub const ENV_PREFIX: &str = "TRUTHY_";

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment configuration: {0}")]
    Env(String),
    #[error("{ENV_PREFIX}PAGE_SIZE must be greater than zero")]
    ZeroPageSize,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    page_size: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct BusinessConfig {
    pub api_base_url: String,
    /// Rows per page the permission table starts with.
    pub page_size: u32,
}

impl BusinessConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            api_base_url: base_url,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Defaults overlaid with `TRUTHY_API_BASE_URL` and `TRUTHY_PAGE_SIZE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|key| (key.to_owned(), value))
            })
            .collect();
        let raw: RawConfig =
            serde_env::from_iter(scoped).map_err(|e| ConfigError::Env(e.to_string()))?;

        let mut config = Self::default();
        if let Some(url) = raw.api_base_url {
            info!("Using {ENV_PREFIX}API_BASE_URL: {url}");
            config.api_base_url = url.trim_end_matches('/').to_owned();
        }
        match raw.page_size {
            Some(0) => return Err(ConfigError::ZeroPageSize),
            Some(size) => config.page_size = size,
            None => {}
        }
        Ok(config)
    }

    pub fn api_url(&self) -> Ustr {
        if self.api_base_url.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(&format!("{}/api", self.api_base_url))
        }
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: if cfg!(target_arch = "wasm32") {
                String::new()
            } else if cfg!(feature = "env_test") {
                "https://truthy-test.example.com".to_owned()
            } else if cfg!(feature = "env_internal") {
                "https://truthy-internal.example.com".to_owned()
            } else {
                "http://localhost:7777".to_owned()
            },
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SnapshotClone for BusinessConfig {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for BusinessConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn api_url_appends_api_segment() {
        let config = BusinessConfig::new("http://127.0.0.1:9000".to_owned());
        assert_eq!(config.api_url(), Ustr::from("http://127.0.0.1:9000/api"));
        assert_eq!(BusinessConfig::new(String::new()).api_url(), Ustr::from("/api"));
    }

    #[test]
    fn env_overrides_defaults_and_ignores_other_vars() {
        let config = BusinessConfig::from_vars(vars(&[
            ("TRUTHY_API_BASE_URL", "https://admin.example.com/"),
            ("TRUTHY_PAGE_SIZE", "25"),
            ("PAGE_SIZE", "99"),
        ]))
        .expect("config should load");

        assert_eq!(config.api_base_url, "https://admin.example.com");
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = BusinessConfig::from_vars(vars(&[("TRUTHY_PAGE_SIZE", "0")]))
            .expect_err("zero page size");
        assert!(matches!(err, ConfigError::ZeroPageSize));
    }

    #[test]
    fn missing_env_keeps_defaults() {
        let config = BusinessConfig::from_vars(Vec::new()).expect("empty env is fine");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.api_base_url, BusinessConfig::default().api_base_url);
    }
}
