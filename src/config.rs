use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub broker: BrokerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Accept backlog depth; clients queue here while the connection table
    /// is at capacity.
    pub backlog: u32,
    /// Maximum simultaneous open HTTP connections.
    pub max_connections: usize,
    /// Bytes of request line buffered per connection before the request is
    /// declared too long.
    pub request_buffer_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:9393".to_string(),
            backlog: 500,
            max_connections: 100,
            request_buffer_bytes: 1024,
        }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9292".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the YAML file named by `TRIPGATE_CONFIG`,
    /// falling back to built-in defaults when the variable is unset. The
    /// `LISTEN` env var overrides the listen address either way.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var("TRIPGATE_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("could not read config file {path}"))?;
                serde_yaml::from_str(&raw)
                    .with_context(|| format!("could not parse config file {path}"))?
            }
            Err(_) => Config::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = addr;
        }

        Ok(cfg)
    }
}
