//! Device inventory file.
//!
//! ```json
//! {"devices": [{"host": "edge1", "port": 2222, "dialect": "IOSXR"}]}
//! ```
//!
//! Fields left out fall back to the command-line defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dialect::Dialect;
use crate::session::SshConfig;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ConfigError::Parse(e) => write!(f, "invalid inventory: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Inventory {
    pub devices: Vec<DeviceConfig>,
}

/// One device; unset fields inherit the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub dialect: Option<Dialect>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub key_file: Option<PathBuf>,
}

impl DeviceConfig {
    /// Device settings layered over `defaults`.
    pub fn ssh_config(&self, defaults: &SshConfig) -> SshConfig {
        SshConfig {
            user: self.username.clone().or_else(|| defaults.user.clone()),
            port: self.port.unwrap_or(defaults.port),
            key_file: self.key_file.clone().or_else(|| defaults.key_file.clone()),
            dialect: self.dialect.or(defaults.dialect),
            ..defaults.clone()
        }
    }
}

impl Inventory {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Inventory built from bare host names.
    pub fn from_hosts<S: AsRef<str>>(hosts: &[S]) -> Self {
        Self {
            devices: hosts
                .iter()
                .map(|h| h.as_ref().trim())
                .filter(|h| !h.is_empty())
                .map(|host| DeviceConfig {
                    host: host.to_string(),
                    port: None,
                    dialect: None,
                    username: None,
                    key_file: None,
                })
                .collect(),
        }
    }

    pub fn get(&self, host: &str) -> Option<&DeviceConfig> {
        self.devices.iter().find(|d| d.host == host)
    }

    pub fn hosts(&self) -> Vec<String> {
        self.devices.iter().map(|d| d.host.clone()).collect()
    }

    /// Appends devices whose host is not already listed.
    pub fn merge(&mut self, other: Inventory) {
        for device in other.devices {
            if self.get(&device.host).is_none() {
                self.devices.push(device);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_parse_inventory() {
        let inv = Inventory::from_json_str(
            r#"{"devices": [
                {"host": "edge1", "port": 2222, "dialect": "IOSXR", "username": "netops"},
                {"host": "sw1"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(inv.hosts(), vec!["edge1", "sw1"]);
        let edge = inv.get("edge1").unwrap();
        assert_eq!(edge.port, Some(2222));
        assert_eq!(edge.dialect, Some(Dialect::IosXr));
        assert_eq!(inv.get("sw1").unwrap().dialect, None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Inventory::from_json_str(r#"{"devices": [{"host": "a", "password": "x"}]}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_dialect_rejected() {
        let text = r#"{"devices": [{"host": "a", "dialect": "JUNOS"}]}"#;
        assert!(Inventory::from_json_str(text).is_err());
    }

    #[test]
    fn test_device_overrides_defaults() {
        let defaults = SshConfig {
            user: Some("monitor".to_string()),
            key_file: Some(PathBuf::from("/keys/default")),
            timeout: Duration::from_secs(9),
            debug: true,
            ..SshConfig::default()
        };
        let device = DeviceConfig {
            host: "edge1".to_string(),
            port: Some(2222),
            dialect: Some(Dialect::IosXr),
            username: None,
            key_file: Some(PathBuf::from("/keys/edge1")),
        };
        let config = device.ssh_config(&defaults);
        assert_eq!(config.user.as_deref(), Some("monitor"));
        assert_eq!(config.port, 2222);
        assert_eq!(config.key_file, Some(PathBuf::from("/keys/edge1")));
        assert_eq!(config.dialect, Some(Dialect::IosXr));
        assert_eq!(config.timeout, Duration::from_secs(9));
        assert!(config.debug);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"devices": [{{"host": "r1"}}]}}"#).unwrap();
        let inv = Inventory::load(file.path()).unwrap();
        assert_eq!(inv.hosts(), vec!["r1"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Inventory::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_from_hosts_and_merge() {
        let mut inv = Inventory::from_hosts(&["edge1", " ", "sw1 "]);
        assert_eq!(inv.hosts(), vec!["edge1", "sw1"]);

        let extra = r#"{"devices": [{"host": "sw1", "port": 22}, {"host": "nx1"}]}"#;
        inv.merge(Inventory::from_json_str(extra).unwrap());
        assert_eq!(inv.hosts(), vec!["edge1", "sw1", "nx1"]);
        assert_eq!(inv.get("sw1").unwrap().port, None);
    }
}
