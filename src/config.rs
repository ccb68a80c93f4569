//! Runtime configuration.
//!
//! Layered lowest to highest: built-in defaults, then the TOML config file,
//! then command-line flags. The default file lives at
//! `~/.config/rds-snapshot-info/config.toml` (or the platform equivalent) and
//! may be absent; a file named with `--config` must exist.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_AWS_BINARY: &str = "aws";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub aws_binary: PathBuf,
    pub timeout: Duration,
    pub output: OutputFormat,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            region: None,
            profile: None,
            endpoint_url: None,
            aws_binary: PathBuf::from(DEFAULT_AWS_BINARY),
            timeout: DEFAULT_TIMEOUT,
            output: OutputFormat::Table,
            verbose: false,
        }
    }
}

/// On-disk shape of config.toml. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    region: Option<String>,
    profile: Option<String>,
    endpoint_url: Option<String>,
    aws_binary: Option<PathBuf>,
    timeout: Option<String>,
    output: Option<OutputFormat>,
}

impl Config {
    /// Resolve the full configuration for one invocation.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => Some(read_file(path)?),
            None => match default_path() {
                Some(path) if path.exists() => Some(read_file(&path)?),
                _ => None,
            },
        };

        let mut config = Config::default();
        if let Some(file) = file {
            config.apply_file(file)?;
        }
        config.apply_cli(cli)?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<()> {
        if file.region.is_some() {
            self.region = file.region;
        }
        if file.profile.is_some() {
            self.profile = file.profile;
        }
        if file.endpoint_url.is_some() {
            self.endpoint_url = file.endpoint_url;
        }
        if let Some(binary) = file.aws_binary {
            self.aws_binary = binary;
        }
        if let Some(timeout) = file.timeout {
            self.timeout = parse_timeout(&timeout)?;
        }
        if let Some(output) = file.output {
            self.output = output;
        }
        Ok(())
    }

    fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if let Some(region) = &cli.region {
            self.region = Some(region.clone());
        }
        if let Some(profile) = &cli.profile {
            self.profile = Some(profile.clone());
        }
        if let Some(endpoint) = &cli.endpoint_url {
            self.endpoint_url = Some(endpoint.clone());
        }
        if let Some(timeout) = &cli.timeout {
            self.timeout = parse_timeout(timeout)?;
        }
        if cli.json {
            self.output = OutputFormat::Json;
        }
        self.verbose = cli.verbose;
        Ok(())
    }
}

/// Platform config file location, if a home directory can be determined.
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "rds-snapshot-info")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn read_file(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    toml::from_str(&text).map_err(|e| Error::Config(format!("invalid {}: {e}", path.display())))
}

fn parse_timeout(value: &str) -> Result<Duration> {
    let timeout = humantime::parse_duration(value)
        .map_err(|e| Error::Config(format!("invalid timeout '{value}': {e}")))?;
    if timeout.is_zero() {
        return Err(Error::Config("timeout must be greater than zero".to_string()));
    }
    Ok(timeout)
}
