use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub image_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SessionConfig {
    pub token_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: "target/session/token".to_string(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://localhost:5000/api"
image_base_url = "http://localhost:5000"
timeout_secs = 30

[session]
token_path = "target/session/token"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
///
/// `API_BASE_URL` / `API_BASE_URL_IMG` from the environment win over both.
pub fn load_config() -> anyhow::Result<Config> {
    let config = match find_config_file() {
        Some(config_path) => {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str(&contents)?
        }
        None => {
            tracing::info!("Using default embedded configuration");
            toml::from_str(DEFAULT_CONFIG)?
        }
    };

    Ok(apply_overrides(config, |key| std::env::var(key).ok()))
}

fn find_config_file() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let config_path = exe_path.parent()?.join("config.toml");
    if config_path.exists() {
        Some(config_path)
    } else {
        tracing::warn!("config.toml not found at: {}", config_path.display());
        None
    }
}

/// Переопределения из окружения; пустые значения игнорируются
pub fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(base_url) = non_empty("API_BASE_URL") {
        config.api.base_url = base_url;
    }
    if let Some(image_base_url) = non_empty("API_BASE_URL_IMG") {
        config.api.image_base_url = image_base_url;
    }
    config
}

/// Get the token file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_token_path(config: &Config) -> PathBuf {
    let token_path = Path::new(&config.session.token_path);

    if token_path.is_absolute() {
        return token_path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(token_path);
        }
    }

    PathBuf::from(&config.session.token_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> Config {
        toml::from_str(DEFAULT_CONFIG).unwrap()
    }

    #[test]
    fn test_default_config_loads() {
        let config = default_config();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.session.token_path, "target/session/token");
    }

    #[test]
    fn test_env_overrides_base_urls() {
        let config = apply_overrides(default_config(), |key| match key {
            "API_BASE_URL" => Some("https://admin.example.com/api".to_string()),
            "API_BASE_URL_IMG" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "https://admin.example.com/api");
        assert_eq!(config.api.image_base_url, "http://localhost:5000");
    }

    #[test]
    fn test_missing_optional_sections_use_defaults() {
        let config: Config = toml::from_str(
            r#"
[api]
base_url = "http://10.0.0.2/api"
image_base_url = "http://10.0.0.2"
"#,
        )
        .unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_absolute_token_path_kept() {
        let mut config = default_config();
        let absolute = std::env::temp_dir().join("token");
        config.session.token_path = absolute.to_string_lossy().into_owned();
        assert_eq!(get_token_path(&config), absolute);
    }
}
