use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("erreur de lecture: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("erreur de parsing TOML: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SyncConfig {
    pub role: PeerRole,
    pub socket_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

/// Which side of the two-device pair this process plays. Selected at
/// construction time; there is no runtime switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeerRole {
    #[default]
    Primary,
    Companion,
}

impl PeerRole {
    pub fn socket_name(&self) -> &'static str {
        match self {
            PeerRole::Primary => "jeun-primary.sock",
            PeerRole::Companion => "jeun-companion.sock",
        }
    }

    pub fn peer(&self) -> PeerRole {
        match self {
            PeerRole::Primary => PeerRole::Companion,
            PeerRole::Companion => PeerRole::Primary,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jeun")
            .join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("jeun")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_primary_with_no_overrides() {
        let config = Config::default();

        assert_eq!(config.sync.role, PeerRole::Primary);
        assert!(config.sync.socket_dir.is_none());
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn parse_companion_role() {
        let toml = r#"
            [sync]
            role = "companion"
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.sync.role, PeerRole::Companion);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [sync]
            role = "companion"
            socket_dir = "/tmp/jeun-sockets"

            [storage]
            data_dir = "/tmp/jeun-data"
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.sync.role, PeerRole::Companion);
        assert_eq!(
            config.sync.socket_dir,
            Some(PathBuf::from("/tmp/jeun-sockets"))
        );
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/jeun-data"));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let toml = r#"
            [storage]
            data_dir = "/var/lib/jeun"
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.sync.role, PeerRole::Primary);
    }

    #[test]
    fn roles_are_each_others_peer() {
        assert_eq!(PeerRole::Primary.peer(), PeerRole::Companion);
        assert_eq!(PeerRole::Companion.peer(), PeerRole::Primary);
        assert_ne!(
            PeerRole::Primary.socket_name(),
            PeerRole::Companion.socket_name()
        );
    }
}
