use crate::error::{DevtaskError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ToolPin
// ---------------------------------------------------------------------------

/// A pinned tool version and the substring its `--version` output must
/// contain. When `marker` is unset the version itself is the marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolPin {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

impl ToolPin {
    pub fn marker(&self) -> &str {
        self.marker.as_deref().unwrap_or(&self.version)
    }
}

// ---------------------------------------------------------------------------
// ToolsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    #[serde(default = "default_linter")]
    pub linter: ToolPin,
    #[serde(default = "default_tester")]
    pub tester: ToolPin,
    #[serde(default = "default_migrator")]
    pub migrator: ToolPin,
}

fn default_linter() -> ToolPin {
    ToolPin {
        version: "1.38.0".to_string(),
        marker: None,
    }
}

// gotestsum and migrate built with `go install` report "dev" as their version.
fn default_tester() -> ToolPin {
    ToolPin {
        version: "1.6.2".to_string(),
        marker: Some("dev".to_string()),
    }
}

fn default_migrator() -> ToolPin {
    ToolPin {
        version: "4.14.1".to_string(),
        marker: Some("dev".to_string()),
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            linter: default_linter(),
            tester: default_tester(),
            migrator: default_migrator(),
        }
    }
}

// ---------------------------------------------------------------------------
// EnvFiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvFiles {
    #[serde(default = "default_development_env")]
    pub development: String,
    #[serde(default = "default_testing_env")]
    pub testing: String,
}

fn default_development_env() -> String {
    "development.env".to_string()
}

fn default_testing_env() -> String {
    "testing.env".to_string()
}

impl Default for EnvFiles {
    fn default() -> Self {
        Self {
            development: default_development_env(),
            testing: default_testing_env(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Compose service name of the Go service itself.
    #[serde(default = "default_service")]
    pub service: String,
    /// Infrastructure containers every task starts.
    #[serde(default = "default_services")]
    pub services: Vec<String>,
    #[serde(default = "default_loadtest_services")]
    pub loadtest_services: Vec<String>,
    #[serde(default = "default_main_package")]
    pub main_package: String,
    #[serde(default = "default_lint_config")]
    pub lint_config: String,
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
    #[serde(default = "default_coverage_profile")]
    pub coverage_profile: String,
    #[serde(default)]
    pub env: EnvFiles,
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Where `go install` puts binaries. Comes from the command line or
    /// `GOPATH`, never from the config file.
    #[serde(skip)]
    pub gopath: PathBuf,
}

fn default_service() -> String {
    "zeus".to_string()
}

fn default_services() -> Vec<String> {
    vec!["postgres".to_string()]
}

fn default_loadtest_services() -> Vec<String> {
    vec!["locust-master".to_string(), "locust-worker".to_string()]
}

fn default_main_package() -> String {
    "./cmd/zeus/main.go".to_string()
}

fn default_lint_config() -> String {
    ".golangci.yaml".to_string()
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_coverage_profile() -> String {
    "coverage.out".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: default_service(),
            services: default_services(),
            loadtest_services: default_loadtest_services(),
            main_package: default_main_package(),
            lint_config: default_lint_config(),
            migrations_dir: default_migrations_dir(),
            coverage_profile: default_coverage_profile(),
            env: EnvFiles::default(),
            tools: ToolsConfig::default(),
            gopath: PathBuf::new(),
        }
    }
}

impl Config {
    /// Load `devtask.yaml` from `root`, or the defaults when there is none.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    /// Attach the Go workspace. `None` falls back to `$HOME/go`.
    pub fn with_gopath(mut self, gopath: Option<PathBuf>) -> Result<Self> {
        self.gopath = match gopath {
            Some(p) => p,
            None => paths::default_gopath().ok_or(DevtaskError::HomeNotFound)?,
        };
        Ok(self)
    }

    pub fn gopath_bin(&self) -> PathBuf {
        paths::gopath_bin(&self.gopath)
    }

    pub fn linter_bin(&self) -> PathBuf {
        self.gopath_bin().join("golangci-lint")
    }

    pub fn tester_bin(&self) -> PathBuf {
        self.gopath_bin().join("gotestsum")
    }

    pub fn migrator_bin(&self) -> PathBuf {
        self.gopath_bin().join("migrate")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
