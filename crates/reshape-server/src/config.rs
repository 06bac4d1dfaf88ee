//! Server configuration
//!
//! Defaults overridden by environment variables, in the order the process
//! would naturally receive them: built-in defaults, then `RESHAPE_*`
//! variables, with the conventional `PORT` honored as a fallback alias.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Runtime configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: IpAddr,
    /// Listen port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment on top of defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(host) = read_var("RESHAPE_HOST") {
            match host.parse() {
                Ok(parsed) => config.host = parsed,
                Err(_) => tracing::warn!(host = %host, "invalid RESHAPE_HOST, using default"),
            }
        }

        let port_var = read_var("RESHAPE_PORT").or_else(|| read_var("PORT"));
        if let Some(port) = port_var {
            match port.parse() {
                Ok(parsed) => config.port = parsed,
                Err(_) => tracing::warn!(port = %port, "invalid port value, using default"),
            }
        }

        config
    }

    /// Socket address to bind
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
