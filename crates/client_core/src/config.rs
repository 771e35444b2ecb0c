use std::{collections::HashMap, fmt, fs, path::Path};

use anyhow::{bail, Context};
use tracing::warn;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "handicap.toml";

/// Process-wide client configuration, resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    /// Shared PIN gating round submission. When unset every code is refused.
    pub access_code: Option<String>,
}

impl ClientSettings {
    pub fn new(api_base_url: impl Into<String>, access_code: Option<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            access_code,
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".into(),
            access_code: None,
        }
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_base_url", &self.api_base_url)
            .field("access_code", &self.access_code.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Defaults, then `config_path` if it exists, then the environment.
pub fn load_settings(config_path: &Path) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file_overrides(&mut settings, &raw, config_path);
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file_overrides(settings: &mut ClientSettings, raw: &str, config_path: &Path) {
    let file_cfg = match toml::from_str::<HashMap<String, String>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(path = %config_path.display(), error = %err, "ignoring unreadable config file");
            return;
        }
    };

    if let Some(v) = file_cfg.get("api_base_url") {
        settings.api_base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("access_code") {
        settings.access_code = Some(v.clone());
    }
}

fn apply_env_overrides(settings: &mut ClientSettings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("HANDICAP_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = var("HANDICAP_APP_PIN") {
        settings.access_code = Some(v);
    }
    if let Some(v) = var("APP__ACCESS_CODE") {
        settings.access_code = Some(v);
    }
}

/// Validates the backend address and drops any trailing slash so endpoint
/// paths can be appended directly.
pub fn prepare_base_url(raw_base_url: &str) -> anyhow::Result<String> {
    let raw_base_url = raw_base_url.trim();
    let parsed = Url::parse(raw_base_url)
        .with_context(|| format!("invalid api base url '{raw_base_url}'"))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "api base url '{raw_base_url}' must use http or https, not '{}'",
            parsed.scheme()
        );
    }
    if parsed.host_str().is_none() {
        bail!("api base url '{raw_base_url}' has no host");
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
