use crate::errors::{PortError, Result};
use crate::reserve::PortName;
use crate::sink::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".portlot.yml";

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Names to reserve a port for, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<String>>,
    /// Properties file to write; ports are printed when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Keep existing entries of `output` instead of replacing the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<IpAddr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load config from .portlot.yml in the given directory
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);

        if !config_path.exists() {
            // No config file, return defaults
            return Ok(Config::default());
        }

        Self::load_file(&config_path)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_yml::from_str::<Option<Config>>(&content)
            .map(Option::unwrap_or_default)
            .map_err(|e| {
                PortError::ConfigError(format!(
                    "Failed to parse config {}: {}",
                    path.display(),
                    e
                ))
            })
    }

    /// User-level config: `portlot/config.yml` under the platform config dir
    /// (`$XDG_CONFIG_HOME` or `~/.config` on Linux, `~/Library/Application Support` on macOS)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("portlot").join("config.yml"))
    }

    /// Find the nearest directory at or above `start_path` holding .portlot.yml
    pub fn find_project_root(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            if current.join(CONFIG_FILE).exists() {
                return Some(current.to_path_buf());
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Load user config with the project config layered on top
    ///
    /// A relative `output` in either file is resolved against the directory
    /// holding that file.
    pub fn load_hierarchy(start_path: &Path) -> Result<Self> {
        let mut config = match Self::user_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading user config");
                let mut user = Self::load_file(&path)?;
                if let Some(dir) = path.parent() {
                    user.resolve_output(dir);
                }
                user
            }
            _ => Config::default(),
        };

        if let Some(root) = Self::find_project_root(start_path) {
            tracing::debug!(root = %root.display(), "Loading project config");
            let mut project = Self::load(&root)?;
            project.resolve_output(&root);
            config.overlay(project);
        }

        Ok(config)
    }

    /// Make a relative `output` relative to `base` instead of the working directory
    fn resolve_output(&mut self, base: &Path) {
        if let Some(output) = self.output.take() {
            self.output = Some(if output.is_relative() {
                base.join(output)
            } else {
                output
            });
        }
    }

    /// Take every value `other` sets. Port lists replace, they do not append.
    pub fn overlay(&mut self, other: Config) {
        if other.ports.is_some() {
            self.ports = other.ports;
        }
        if other.output.is_some() {
            self.output = other.output;
        }
        if other.merge.is_some() {
            self.merge = other.merge;
        }
        if other.bind_address.is_some() {
            self.bind_address = other.bind_address;
        }
        if other.format.is_some() {
            self.format = other.format;
        }
    }

    /// Configured names, validated
    pub fn port_names(&self) -> Result<Vec<PortName>> {
        PortName::parse_all(self.ports.iter().flatten().cloned())
    }
}
