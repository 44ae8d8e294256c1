use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::core::constants::{DEFAULT_LISTEN_ADDR, DEFAULT_WORKER_URL};

/// Environment override for the worker URL, checked before the config file.
pub const WORKER_URL_ENV: &str = "PARLEY_WORKER_URL";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Base URL of the remote AI worker the gateway relays to.
    pub worker_url: Option<String>,
    /// Address the proxy gateway listens on.
    pub listen_addr: Option<String>,
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path();
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(config_path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path();
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    fn get_config_path() -> PathBuf {
        let proj_dirs = ProjectDirs::from("org", "permacommons", "parley")
            .expect("Failed to determine config directory");
        proj_dirs.config_dir().join("config.toml")
    }

    /// Effective worker URL: environment override, then the config file, then
    /// the built-in default. An unset value is not an error.
    pub fn worker_url(&self) -> String {
        if let Ok(url) = std::env::var(WORKER_URL_ENV) {
            if !url.trim().is_empty() {
                return url;
            }
        }
        self.worker_url
            .clone()
            .unwrap_or_else(|| DEFAULT_WORKER_URL.to_string())
    }

    pub fn listen_addr(&self) -> String {
        self.listen_addr
            .clone()
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
    }

    /// Base URL clients use to reach the local gateway.
    pub fn gateway_url(&self) -> String {
        format!("http://{}", self.listen_addr())
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.worker_url {
            Some(url) => println!("  worker-url: {url}"),
            None => println!("  worker-url: (unset, default {DEFAULT_WORKER_URL})"),
        }
        match &self.listen_addr {
            Some(addr) => println!("  listen-addr: {addr}"),
            None => println!("  listen-addr: (unset, default {DEFAULT_LISTEN_ADDR})"),
        }
    }
}
