use anyhow::Context;

/// Which `StudentStore` implementation the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => anyhow::bail!("unknown STORE_BACKEND `{other}`"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Look for an existing phone/email before inserting. The unique
    /// constraints still decide.
    pub submit_precheck: bool,
    pub store_backend: StoreBackend,
    pub cors_allow_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch the
    /// process environment.
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match get("STORE_BACKEND") {
            Some(v) => v.parse()?,
            None => StoreBackend::Postgres,
        };

        let database_url = match (get("DATABASE_URL"), store_backend) {
            (Some(url), _) => url,
            (None, StoreBackend::Memory) => String::new(),
            (None, StoreBackend::Postgres) => anyhow::bail!("DATABASE_URL must be set"),
        };

        let port = get("APP_PORT")
            .or_else(|| get("PORT"))
            .map(|v| v.parse::<u16>().context("parse APP_PORT"))
            .transpose()?
            .unwrap_or(5000);

        let max_connections = get("DB_MAX_CONNECTIONS")
            .map(|v| v.parse::<u32>().context("parse DB_MAX_CONNECTIONS"))
            .transpose()?
            .unwrap_or(10);
        if max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        let submit_precheck = get("SUBMIT_PRECHECK")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Ok(Self {
            database_url,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            max_connections,
            submit_precheck,
            store_backend,
            cors_allow_origin: get("CORS_ALLOW_ORIGIN").filter(|v| !v.trim().is_empty()),
        })
    }
}
