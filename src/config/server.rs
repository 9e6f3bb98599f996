use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Base URL of the topological inventory API (e.g.
    /// "http://topology:8080/api/topological-inventory/v1.0"). Without it,
    /// every topology lookup fails.
    pub topology_url: Option<String>,
}

impl ServerConfig {
    /// Reads a TOML config file. Keys that are absent keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("catalog.db")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            topology_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.toml");
        std::fs::write(
            &path,
            "port = 9090\ntopology_url = \"http://topology:8080/api/v1.0\"\n",
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.topology_url.as_deref(), Some("http://topology:8080/api/v1.0"));
        assert_eq!(config.db_path(), PathBuf::from("./data/catalog.db"));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(matches!(ServerConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }
}
