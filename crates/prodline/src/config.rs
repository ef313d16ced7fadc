use std::env;
use std::net::SocketAddr;

use anyhow::{bail, Context, Result};

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 20;

const BIND_VAR: &str = "PRODLINE_BIND";
const MAX_UPLOAD_VAR: &str = "PRODLINE_MAX_UPLOAD_MB";
const LOG_FORMAT_VAR: &str = "PRODLINE_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub max_upload_mb: u64,
}

impl ServeConfig {
    /// Reads `PRODLINE_BIND` and `PRODLINE_MAX_UPLOAD_MB` from the process
    /// environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .with_context(|| format!("{BIND_VAR} must be a socket address, got '{bind_raw}'"))?;

        let max_upload_mb = match lookup(MAX_UPLOAD_VAR) {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("{MAX_UPLOAD_VAR} must be a whole number of megabytes, got '{raw}'")
            })?,
            None => DEFAULT_MAX_UPLOAD_MB,
        };

        Self {
            bind,
            max_upload_mb,
        }
        .validated()
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(self, bind: Option<SocketAddr>, max_upload_mb: Option<u64>) -> Result<Self> {
        Self {
            bind: bind.unwrap_or(self.bind),
            max_upload_mb: max_upload_mb.unwrap_or(self.max_upload_mb),
        }
        .validated()
    }

    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }

    fn validated(self) -> Result<Self> {
        if self.max_upload_mb == 0 {
            bail!("maximum upload size must be at least 1 MB");
        }
        Ok(self)
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Result<Self> {
        Self::parse(env::var(LOG_FORMAT_VAR).ok().as_deref())
    }

    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("json") => Ok(LogFormat::Json),
            Some("pretty") | Some("text") => Ok(LogFormat::Pretty),
            Some(other) => bail!("{LOG_FORMAT_VAR} must be 'json' or 'pretty', got '{other}'"),
        }
    }
}
