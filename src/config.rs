use crate::*;
use confique::Config as _;
use std::{collections::HashSet, sync::OnceLock};

/// Environment-sourced settings, loaded once per process.
#[derive(confique::Config)]
pub struct Config {
    #[config(env = "QGATE_DEFAULT_SCHEMA", default = "insightly")]
    pub default_schema: String,
    /// Comma-separated `schema.table` entries.
    #[config(
        env = "QGATE_ALLOWED_TABLES",
        default = "insightly.pull_request,insightly.commit,insightly.pr_diff,information_schema.tables,information_schema.columns"
    )]
    pub allowed_tables: String,
    #[config(env = "QGATE_MAX_PAGE_SIZE", default = 50)]
    pub max_page_size: u64,
    #[cfg(test)]
    #[config(env = "QGATE_CONTAINER_RAMDISKED", default = true)]
    pub container_ramdisked: bool,
    #[cfg(test)]
    #[config(env = "QGATE_CONTAINER_LOGS", default = false)]
    pub container_logs: bool,
}

pub fn config() -> &'static Config {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(|| {
        Config::builder()
            .env()
            .load()
            .expect("Failed to load one or more value configuration from the current environment")
    })
}

/// Relations a query may read when no explicit allow-list is configured.
pub const DEFAULT_ALLOWED_TABLES: &[(&str, &str)] = &[
    ("insightly", "pull_request"),
    ("insightly", "commit"),
    ("insightly", "pr_diff"),
    ("information_schema", "tables"),
    ("information_schema", "columns"),
];

/// Catalog views readable without schema qualification.
pub const DEFAULT_METADATA_RELATIONS: &[&str] = &[
    "pg_tables",
    "pg_views",
    "pg_indexes",
    "pg_class",
    "pg_namespace",
    "pg_attribute",
];

/// Statement verbs the keyword guard rejects by default. Matched against
/// keyword tokens only, so identifiers and literals containing these words
/// never trigger the guard.
pub const DEFAULT_FORBIDDEN_KEYWORDS: &[&str] = &[
    "insert",
    "update",
    "delete",
    "merge",
    "drop",
    "alter",
    "create",
    "truncate",
    "grant",
    "revoke",
    "copy",
    "vacuum",
    "analyze",
    "call",
    "do",
    "set",
    "reset",
    "lock",
    "reindex",
    "cluster",
    "comment",
    "listen",
    "notify",
    "prepare",
    "execute",
    "deallocate",
    "discard",
    "begin",
    "commit",
    "rollback",
    "savepoint",
    "release",
    "into",
];

/// Immutable gateway configuration, fixed at construction time.
///
/// Built in code for embedding callers or via [`GatewayConfig::from_env`];
/// shared read-only for the lifetime of the gateway, never mutated after
/// load.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub allow_list: AllowList,
    pub default_schema: String,
    /// Lowercase keyword words; see [`DEFAULT_FORBIDDEN_KEYWORDS`].
    pub forbidden_keywords: HashSet<String>,
    pub max_page_size: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            allow_list: AllowList::new(
                DEFAULT_ALLOWED_TABLES.iter().copied(),
                DEFAULT_METADATA_RELATIONS.iter().copied(),
            ),
            default_schema: "insightly".into(),
            forbidden_keywords: DEFAULT_FORBIDDEN_KEYWORDS
                .iter()
                .map(|w| w.to_string())
                .collect(),
            max_page_size: 50,
        }
    }
}

impl GatewayConfig {
    /// Build the gateway configuration from `QGATE_*` environment settings.
    pub fn from_env() -> Result<Self> {
        let settings = config();
        if settings.max_page_size == 0 {
            return Err(Error::Config("QGATE_MAX_PAGE_SIZE must be positive".into()));
        }
        Ok(Self {
            allow_list: AllowList::parse(settings.allowed_tables.split(','))?,
            default_schema: settings.default_schema.clone(),
            max_page_size: settings.max_page_size,
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_allows_reference_tables() {
        let config = GatewayConfig::default();
        assert!(
            config
                .allow_list
                .permits_table("insightly", false, "pull_request", false)
        );
        assert_eq!(config.default_schema, "insightly");
        assert_eq!(config.max_page_size, 50);
    }

    #[test]
    fn forbidden_defaults_cover_destructive_verbs() {
        let config = GatewayConfig::default();
        for word in ["insert", "update", "delete", "drop", "truncate", "grant"] {
            assert!(config.forbidden_keywords.contains(word), "{word} missing");
        }
        assert!(!config.forbidden_keywords.contains("select"));
    }
}
