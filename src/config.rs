use std::{net::IpAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Context, Result};

/// How the catalog is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogMode {
    /// Load the catalog file once at startup
    Memory,
    /// Re-read the catalog file for every query
    File,
}

impl FromStr for CatalogMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(anyhow!("expected `memory` or `file`, got `{other}`")),
        }
    }
}

/// Process configuration, read from the environment.
///
/// | Env Var                  | Default              |
/// |--------------------------|----------------------|
/// | `HOST`                   | `::`                 |
/// | `PORT`                   | `3000`               |
/// | `CORS_ORIGINS`           | `*`                  |
/// | `TRUST_PROXY`            | `false`              |
/// | `CATALOG_MODE`           | `memory`             |
/// | `CATALOG_FILE`           | `data/products.json` |
/// | `RATE_LIMIT_MAX`         | `100`                |
/// | `RATE_LIMIT_WINDOW_SECS` | `900`                |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: IpAddr,
    /// Bind port
    pub port: u16,
    /// Allowed CORS origins, empty means any origin
    pub cors_origins: Vec<String>,
    /// Honour `X-Forwarded-Proto` / `X-Forwarded-Host`
    pub trust_proxy: bool,
    /// Catalog loading strategy
    pub catalog_mode: CatalogMode,
    /// JSON array of products
    pub catalog_file: PathBuf,
    /// Requests allowed per client and window, 0 disables limiting
    pub rate_limit_max: u32,
    /// Rate limiting window
    pub rate_limit_window: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0_u16; 8]),
            port: 3000,
            cors_origins: Vec::new(),
            trust_proxy: false,
            catalog_mode: CatalogMode::Memory,
            catalog_file: PathBuf::from("data/products.json"),
            rate_limit_max: 100,
            rate_limit_window: Duration::from_secs(15 * 60),
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e| anyhow!("invalid {name} `{raw}`: {e}")),
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    /// # Errors
    /// A variable is set to a value that does not parse
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, unset variables take their default.
    /// # Errors
    /// A variable is set to a value that does not parse
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let default = Self::default();

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty() && *o != "*")
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let window_secs: u64 =
            parse_var(&lookup, "RATE_LIMIT_WINDOW_SECS", default.rate_limit_window.as_secs())?;
        if window_secs == 0 {
            return Err(anyhow!("RATE_LIMIT_WINDOW_SECS must be greater than zero"));
        }

        Ok(Self {
            host: parse_var(&lookup, "HOST", default.host)?,
            port: parse_var(&lookup, "PORT", default.port)?,
            cors_origins,
            trust_proxy: parse_var(&lookup, "TRUST_PROXY", default.trust_proxy)
                .context("TRUST_PROXY must be `true` or `false`")?,
            catalog_mode: parse_var(&lookup, "CATALOG_MODE", default.catalog_mode)?,
            catalog_file: lookup("CATALOG_FILE").map_or(default.catalog_file, PathBuf::from),
            rate_limit_max: parse_var(&lookup, "RATE_LIMIT_MAX", default.rate_limit_max)?,
            rate_limit_window: Duration::from_secs(window_secs),
        })
    }
}
