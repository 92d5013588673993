use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file() }
    }
}

fn default_data_file() -> PathBuf { PathBuf::from("data/data.json") }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// Read and parse a TOML config file; a missing file yields `None`.
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content).map(Some).map_err(|e| anyhow!("{path}: {e}")),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow!("cannot read {path}: {e}")),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

/// Build a config purely from environment variables, with the defaults above.
pub fn from_env() -> Result<AppConfig> {
    from_vars(|key| std::env::var(key).ok())
}

/// Build a config from a variable lookup. Unset variables take defaults;
/// set but unparseable numbers are errors.
pub fn from_vars<F>(var: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = ServerConfig::default();
    let host = var("SERVER_HOST").unwrap_or(defaults.host);
    let port = match var("SERVER_PORT") {
        Some(p) => p.trim().parse::<u16>().map_err(|e| anyhow!("SERVER_PORT={p:?}: {e}"))?,
        None => defaults.port,
    };
    let worker_threads = match var("TOKIO_WORKER_THREADS") {
        Some(v) => Some(v.trim().parse::<usize>().map_err(|e| anyhow!("TOKIO_WORKER_THREADS={v:?}: {e}"))?),
        None => defaults.worker_threads,
    };
    let data_file = var("DATA_FILE").map(PathBuf::from).unwrap_or_else(default_data_file);
    Ok(AppConfig {
        server: ServerConfig { host, port, worker_threads },
        storage: StorageConfig { data_file },
    })
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to the environment
    /// only when that file does not exist, then validate.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path())
    }

    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = match load_optional(path)? {
            Some(cfg) => cfg,
            None => from_env()?,
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.data_file is empty; set it in config.toml or DATA_FILE"));
        }
        if self.data_file.is_dir() {
            return Err(anyhow!("storage.data_file {} is a directory", self.data_file.display()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            worker_threads = 2

            [storage]
            data_file = "/var/lib/planet/data.json"
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert_eq!(cfg.storage.data_file, PathBuf::from("/var/lib/planet/data.json"));
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn missing_sections_use_defaults() {
        let mut cfg = parse("").expect("parse");
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.data_file, PathBuf::from("data/data.json"));
    }

    #[test]
    fn blank_host_and_zero_threads_are_normalized() {
        let mut cfg = parse(
            r#"
            [server]
            host = "  "
            port = 8081
            worker_threads = 0
            "#,
        )
        .expect("parse");
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut cfg = parse("[server]\nhost = \"127.0.0.1\"\nport = 0\n").expect("parse");
        assert!(cfg.normalize_and_validate().is_err());
    }

    fn tmp_config(body: &str) -> String {
        let path = std::env::temp_dir().join(format!("configs_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, body).expect("write config");
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn malformed_file_fails_instead_of_falling_back() {
        let path = tmp_config("[storage]\ndata_file = \"/srv/real/data.json\"\n[server\nport = 9000\n");
        assert!(AppConfig::load_and_validate_from(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn existing_file_is_used() {
        let path = tmp_config("[storage]\ndata_file = \"/srv/real/data.json\"\n");
        let cfg = AppConfig::load_and_validate_from(&path).expect("valid");
        assert_eq!(cfg.storage.data_file, PathBuf::from("/srv/real/data.json"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_not_found_not_error() {
        let path = std::env::temp_dir().join(format!("configs_missing_{}.toml", uuid::Uuid::new_v4()));
        assert!(load_optional(&path.to_string_lossy()).expect("no error").is_none());
    }

    #[test]
    fn env_values_are_parsed() {
        let cfg = from_vars(|k| match k {
            "SERVER_PORT" => Some("9001".into()),
            "DATA_FILE" => Some("/tmp/planet.json".into()),
            _ => None,
        })
        .expect("valid env");
        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.storage.data_file, PathBuf::from("/tmp/planet.json"));
    }

    #[test]
    fn unparseable_env_numbers_are_errors() {
        assert!(from_vars(|k| (k == "SERVER_PORT").then(|| "eighty".to_string())).is_err());
        assert!(from_vars(|k| (k == "TOKIO_WORKER_THREADS").then(|| "-1".to_string())).is_err());
    }

    #[test]
    fn empty_data_file_is_rejected() {
        let mut cfg = parse("[storage]\ndata_file = \"\"\n").expect("parse");
        assert!(cfg.normalize_and_validate().is_err());
    }
}
