use crate::endpoints::DEFAULT_API_URL;
use crate::github::Tagger;
use crate::version::SidecarFilter;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Project configuration file looked up when `--config` is not given.
pub const PROJECT_CONFIG_PATH: &str = ".config/ghpublish.toml";

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tagger: Tagger,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ArtifactsConfig {
    /// Suffixes of files that never carry the release version.
    #[serde(default = "default_excluded_suffixes")]
    pub excluded_suffixes: Vec<String>,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            excluded_suffixes: default_excluded_suffixes(),
        }
    }
}

impl ArtifactsConfig {
    pub fn sidecar_filter(&self) -> SidecarFilter {
        SidecarFilter::new(self.excluded_suffixes.iter().cloned())
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ReleaseConfig {
    #[serde(default)]
    pub draft: bool,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_excluded_suffixes() -> Vec<String> {
    vec![".lvlibp".to_string()]
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the project file if present, otherwise the user-wide file.
    pub fn discover(project_path: &Path) -> Result<Self> {
        if project_path.exists() {
            tracing::debug!("Loading configuration from {}", project_path.display());
            return Self::load(project_path);
        }
        let user_path = Self::default_path();
        if let Some(warning) = missing_project_warning(project_path, &user_path) {
            tracing::warn!("{}", warning);
        }
        tracing::debug!("Loading configuration from {}", user_path.display());
        Self::load(&user_path)
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("ghpublish.toml"))
            .unwrap_or_else(|| PathBuf::from("~/.config/ghpublish.toml"))
    }

    /// Merge configuration with command line arguments
    pub fn merge_with_args(&self, args: &mut crate::cli::Args) {
        if !args.draft && self.release.draft {
            args.draft = true;
        }
    }
}

/// A missing project file is only worth reporting when it was asked for.
fn missing_project_warning(project_path: &Path, user_path: &Path) -> Option<String> {
    (project_path != Path::new(PROJECT_CONFIG_PATH)).then(|| {
        format!(
            "Configuration file {} not found, falling back to {}",
            project_path.display(),
            user_path.display()
        )
    })
}
