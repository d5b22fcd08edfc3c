use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Backing JSON file for the todo records.
    #[serde(default = "default_db_file")]
    pub db_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { db_file: default_db_file() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; a single `*` allows any origin.
    #[serde(default = "default_allow_origins")]
    pub allow_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allow_origins: default_allow_origins() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self { public_dir: default_public_dir() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3000 }
fn default_db_file() -> PathBuf { PathBuf::from("data/db.json") }
fn default_allow_origins() -> Vec<String> { vec!["*".into()] }
fn default_public_dir() -> PathBuf { PathBuf::from("public") }

/// Load from `CONFIG_PATH` (default `config.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if std::fs::metadata(&path).is_err() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

/// Split a comma separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    /// File config, then environment overrides, then normalization.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT")
            .or_else(|| lookup("SERVER_PORT"))
            .and_then(|p| p.trim().parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.trim().parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(file) = lookup("DB_FILE").filter(|v| !v.trim().is_empty()) {
            self.storage.db_file = PathBuf::from(file);
        }
        // blank means unset, so the file value (or "*") stays
        if let Some(origins) = lookup("ALLOW_ORIGINS").filter(|v| !v.trim().is_empty()) {
            self.cors.allow_origins = parse_origins(&origins);
        }
        if let Some(dir) = lookup("PUBLIC_DIR").filter(|v| !v.trim().is_empty()) {
            self.web.public_dir = PathBuf::from(dir);
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        if self.storage.db_file.as_os_str().is_empty() {
            self.storage.db_file = default_db_file();
        }
        self.cors.normalize()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}

impl CorsConfig {
    fn normalize(&mut self) -> Result<()> {
        self.allow_origins = self
            .allow_origins
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if self.allow_origins.is_empty() {
            return Err(anyhow!("cors.allow_origins is empty; use \"*\" to allow any origin"));
        }
        Ok(())
    }

    pub fn allows_any(&self) -> bool {
        self.allow_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.storage.db_file, PathBuf::from("data/db.json"));
        assert!(cfg.cors.allows_any());
    }

    #[test]
    fn toml_sections_are_optional() {
        let cfg: AppConfig = toml::from_str("[server]\nport = 8088\n").unwrap();
        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.web.public_dir, PathBuf::from("public"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(lookup(&[
            ("PORT", "4000"),
            ("DB_FILE", "/tmp/todos.json"),
            ("ALLOW_ORIGINS", "http://a.test, ,http://b.test"),
            ("PUBLIC_DIR", "site"),
        ]));
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.storage.db_file, PathBuf::from("/tmp/todos.json"));
        assert_eq!(cfg.cors.allow_origins, vec!["http://a.test", "http://b.test"]);
        assert!(!cfg.cors.allows_any());
        assert_eq!(cfg.web.public_dir, PathBuf::from("site"));
    }

    #[test]
    fn unparsable_port_is_ignored() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(lookup(&[("PORT", "http")]));
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn empty_origin_list_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(lookup(&[("ALLOW_ORIGINS", " , ")]));
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn blank_allow_origins_keeps_default() {
        for blank in ["", "   "] {
            let mut cfg = AppConfig::default();
            cfg.apply_env(lookup(&[("ALLOW_ORIGINS", blank)]));
            cfg.normalize_and_validate().unwrap();
            assert_eq!(cfg.cors.allow_origins, vec!["*".to_string()]);
            assert!(cfg.cors.allows_any());
        }
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }
}
