use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use torahdl_engine::{ApiSettings, DownloadSettings, EngineSettings, DEFAULT_API_BASE_URL};
use torahdl_logging::{torahdl_info, torahdl_warn};

use super::cli::Cli;

pub const CONFIG_FILENAME: &str = "torahdl.ron";

/// Settings read from `torahdl.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub download_timeout_secs: u64,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            download_timeout_secs: 30,
            output_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Reads the config file, falling back to defaults when it is missing or
    /// cannot be parsed.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Self::default();
            }
            Err(err) => {
                torahdl_warn!("Failed to read config from {:?}: {}", path, err);
                return Self::default();
            }
        };

        match ron::from_str(&content) {
            Ok(config) => {
                torahdl_info!("Loaded config from {:?}", path);
                config
            }
            Err(err) => {
                torahdl_warn!("Failed to parse config from {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    /// Command-line values win over the file.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(base_url) = &cli.api_base_url {
            self.api_base_url = base_url.clone();
        }
        if let Some(output_dir) = &cli.output_dir {
            self.output_dir = output_dir.clone();
        }
        self
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            api: ApiSettings {
                base_url: self.api_base_url.clone(),
                connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
                request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            },
            download: DownloadSettings {
                request_timeout: Duration::from_secs(self.download_timeout_secs),
                output_dir: self.output_dir.clone(),
            },
        }
    }
}

pub fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(&temp.path().join(CONFIG_FILENAME));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(api_base_url: "http://localhost:8000", request_timeout_secs: Some(15))"#,
        )
        .unwrap();

        let config = AppConfig::load(&path);

        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, Some(15));
        assert_eq!(config.download_timeout_secs, 30);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "this is not ron").unwrap();

        assert_eq!(AppConfig::load(&path), AppConfig::default());
    }

    #[test]
    fn cli_overrides_file_values() {
        let cli = Cli::try_parse_from([
            "torahdl",
            "--api-base-url",
            "http://127.0.0.1:9000",
            "--output-dir",
            "media",
        ])
        .unwrap();
        let config = AppConfig {
            api_base_url: "http://from-file".to_string(),
            ..AppConfig::default()
        }
        .with_overrides(&cli);

        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.output_dir, PathBuf::from("media"));
    }

    #[test]
    fn engine_settings_carry_timeouts() {
        let config = AppConfig {
            connect_timeout_secs: Some(5),
            ..AppConfig::default()
        };
        let settings = config.engine_settings();
        assert_eq!(settings.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.api.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(settings.api.request_timeout, None);
        assert_eq!(settings.download.request_timeout, Duration::from_secs(30));
    }
}
