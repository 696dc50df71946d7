//! Server configuration from the environment.

use stockroom_access::AccessConfig;
use stockroom_db::DbConfig;

/// Everything the server needs at startup. Unset variables keep the
/// defaults of [`DbConfig`] and [`AccessConfig`].
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub access: AccessConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let fields = [
            ("STOCKROOM_DB_URL", &mut config.db.url),
            ("STOCKROOM_DB_NAMESPACE", &mut config.db.namespace),
            ("STOCKROOM_DB_DATABASE", &mut config.db.database),
            ("STOCKROOM_DB_USER", &mut config.db.username),
            ("STOCKROOM_DB_PASSWORD", &mut config.db.password),
            ("STOCKROOM_UNIT", &mut config.access.unit),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
        config
    }
}
