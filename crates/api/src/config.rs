//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use anyhow::{Context, bail};

use storefront_i18n::Locale;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

/// Where products are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Locale used when a request does not ask for one.
    pub default_locale: Locale,
    pub persistence: Persistence,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            default_locale: Locale::default(),
            persistence: Persistence::InMemory,
        }
    }
}

impl ApiConfig {
    /// Read `BIND_ADDR`, `JWT_SECRET`, `DEFAULT_LOCALE`, `USE_PERSISTENT_STORES`
    /// and `DATABASE_URL`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:8080")?;

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let default_locale = match lookup("DEFAULT_LOCALE") {
            Some(raw) => raw
                .parse::<Locale>()
                .with_context(|| format!("DEFAULT_LOCALE={raw}"))?,
            None => Locale::default(),
        };

        let use_persistent = lookup("USE_PERSISTENT_STORES")
            .unwrap_or_else(|| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let persistence = if use_persistent {
            match lookup("DATABASE_URL") {
                Some(database_url) => Persistence::Postgres { database_url },
                None => bail!("DATABASE_URL must be set when USE_PERSISTENT_STORES=true"),
            }
        } else {
            Persistence::InMemory
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            default_locale,
            persistence,
        })
    }
}
