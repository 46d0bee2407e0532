use std::str::FromStr;

use error_stack::{Report, ResultExt};
use kernel::KernelError;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Unknown STORE_BACKEND: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub backend: StoreBackend,
}

impl AppConfig {
    /// Reads `SERVER_PORT` and `STORE_BACKEND`, loading `.env` first when present.
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> error_stack::Result<Self, KernelError> {
        let port = match lookup("SERVER_PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .change_context_lazy(|| KernelError::Internal)
                .attach_printable_lazy(|| format!("Invalid SERVER_PORT: {port}"))?,
            None => DEFAULT_PORT,
        };
        let backend = match lookup("STORE_BACKEND") {
            Some(backend) => backend.parse()?,
            None => StoreBackend::default(),
        };
        Ok(Self { port, backend })
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::{AppConfig, StoreBackend};

    fn config(vars: &[(&str, &str)]) -> error_stack::Result<AppConfig, kernel::KernelError> {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend, StoreBackend::Postgres);
    }

    #[test]
    fn overrides() {
        let config = config(&[("SERVER_PORT", "3000"), ("STORE_BACKEND", "Memory")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.backend, StoreBackend::Memory);
    }

    #[test]
    fn rejects_garbage() {
        assert!(config(&[("SERVER_PORT", "eighty")]).is_err());
        assert!(config(&[("STORE_BACKEND", "redis")]).is_err());
    }
}
