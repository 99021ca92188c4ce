//! Environment-driven configuration.
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `DASHSCOPE_API_KEY` | API key (falls back to the OS keyring entry `dashscope`/`api_key`) |
//! | `DASHSCOPE_BASE_URL` | service base URL |
//! | `DASHSCOPE_WORKSPACE_ID` | workspace header |
//! | `DASHSCOPE_HTTP_TIMEOUT_SECS` | request timeout |
//! | `DASHSCOPE_HTTP_CONNECT_TIMEOUT_SECS` | connect timeout |
//! | `DASHSCOPE_HTTP_POOL_MAX_IDLE_PER_HOST` | idle connections kept per host |
//! | `DASHSCOPE_HTTP_POOL_IDLE_TIMEOUT_SECS` | idle connection lifetime |
//! | `DASHSCOPE_PROXY_URL` | proxy for all requests |
//!
//! Unparseable numbers are ignored and the defaults apply.

use crate::image::ImageApiBuilder;
use crate::Result;
use keyring::Entry;
use std::time::Duration;

pub const ENV_API_KEY: &str = "DASHSCOPE_API_KEY";
pub const ENV_BASE_URL: &str = "DASHSCOPE_BASE_URL";
pub const ENV_WORKSPACE_ID: &str = "DASHSCOPE_WORKSPACE_ID";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "DASHSCOPE_HTTP_TIMEOUT_SECS";
pub const ENV_HTTP_CONNECT_TIMEOUT_SECS: &str = "DASHSCOPE_HTTP_CONNECT_TIMEOUT_SECS";
pub const ENV_HTTP_POOL_MAX_IDLE_PER_HOST: &str = "DASHSCOPE_HTTP_POOL_MAX_IDLE_PER_HOST";
pub const ENV_HTTP_POOL_IDLE_TIMEOUT_SECS: &str = "DASHSCOPE_HTTP_POOL_IDLE_TIMEOUT_SECS";
pub const ENV_PROXY_URL: &str = "DASHSCOPE_PROXY_URL";

const KEYRING_SERVICE: &str = "dashscope";
const KEYRING_USER: &str = "api_key";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub workspace_id: Option<String>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub pool_max_idle_per_host: Option<usize>,
    pub pool_idle_timeout_secs: Option<u64>,
    pub proxy_url: Option<String>,
}

impl EnvSettings {
    /// Read the process environment, then the keyring if no key was found.
    pub fn from_env() -> Self {
        let mut settings = Self::from_lookup(|name| std::env::var(name).ok());
        if settings.api_key.is_none() {
            settings.api_key = keyring_api_key();
        }
        settings
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let number = |name: &str| text(name).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            api_key: text(ENV_API_KEY),
            base_url: text(ENV_BASE_URL),
            workspace_id: text(ENV_WORKSPACE_ID),
            timeout_secs: number(ENV_HTTP_TIMEOUT_SECS),
            connect_timeout_secs: number(ENV_HTTP_CONNECT_TIMEOUT_SECS),
            pool_max_idle_per_host: text(ENV_HTTP_POOL_MAX_IDLE_PER_HOST)
                .and_then(|v| v.trim().parse::<usize>().ok()),
            pool_idle_timeout_secs: number(ENV_HTTP_POOL_IDLE_TIMEOUT_SECS),
            proxy_url: text(ENV_PROXY_URL),
        }
    }

    /// Layer these settings over `builder`. Unset values leave it unchanged.
    pub fn apply(self, mut builder: ImageApiBuilder) -> Result<ImageApiBuilder> {
        if let Some(key) = self.api_key {
            builder = builder.api_key(key)?;
        }
        if let Some(url) = self.base_url {
            builder = builder.base_url(url)?;
        }
        if let Some(ws) = self.workspace_id {
            builder = builder.workspace_id(ws);
        }

        let mut transport = builder.get_transport_builder().clone();
        if let Some(secs) = self.timeout_secs {
            transport = transport.timeout(Duration::from_secs(secs.max(1)));
        }
        if let Some(secs) = self.connect_timeout_secs {
            transport = transport.connect_timeout(Duration::from_secs(secs.max(1)));
        }
        if let Some(n) = self.pool_max_idle_per_host {
            transport = transport.pool_max_idle_per_host(n);
        }
        if let Some(secs) = self.pool_idle_timeout_secs {
            transport = transport.pool_idle_timeout(Some(Duration::from_secs(secs)));
        }
        if let Some(proxy) = self.proxy_url {
            transport = transport.proxy(proxy);
        }
        Ok(builder.transport_builder(transport))
    }
}

fn keyring_api_key() -> Option<String> {
    let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER).ok()?;
    entry.get_password().ok().filter(|k| !k.trim().is_empty())
}

impl ImageApiBuilder {
    /// A builder seeded from the environment (see module docs).
    pub fn from_env() -> Result<Self> {
        EnvSettings::from_env().apply(ImageApiBuilder::new())
    }
}
