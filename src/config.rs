//! Configuration loading.
//!
//! Settings come from the process environment, optionally seeded by a TOML
//! file passed with `--config`. Environment variables always win over the
//! file, so a deployment can ship a base file and override per host.
//!
//! # Settings
//!
//! | Env var | TOML key | Required | Default |
//! |---------|----------|----------|---------|
//! | `DB_URI` | `db.uri` | yes | |
//! | `DB_NAME` | `db.name` | yes | |
//! | `COLLECTION_NAME` | `db.collection` | yes | |
//! | `BIND_ADDR` | `server.bind` | no | `127.0.0.1:8000` |
//! | `STRICT_STATUS` | `server.strict_status` | no | `false` |
//!
//! # Example file
//!
//! ```toml
//! [db]
//! uri = "./data"
//! name = "contacts"
//! collection = "contacts"
//!
//! [server]
//! bind = "0.0.0.0:8000"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where contacts are stored.
///
/// `uri` is the data directory, `name` the database file stem, and
/// `collection` the table holding contacts.
#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub uri: PathBuf,
    pub name: String,
    pub collection: String,
}

impl DbConfig {
    /// Path of the SQLite database file: `<uri>/<name>.sqlite`.
    pub fn path(&self) -> PathBuf {
        self.uri.join(format!("{}.sqlite", self.name))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Answer 404 for missing contacts and 200 for no-op updates instead of
    /// the default 200-with-`"error"` responses.
    #[serde(default)]
    pub strict_status: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            strict_status: false,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

/// Environment variable → (TOML table, key).
const ENV_OVERRIDES: &[(&str, &str, &str)] = &[
    ("DB_URI", "db", "uri"),
    ("DB_NAME", "db", "name"),
    ("COLLECTION_NAME", "db", "collection"),
    ("BIND_ADDR", "server", "bind"),
    ("STRICT_STATUS", "server", "strict_status"),
];

/// Load configuration from an optional TOML file and the process environment.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Like [`load_config`], reading variables through `lookup` instead of the
/// process environment.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut table = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str::<toml::Table>(&content)
                .with_context(|| "Failed to parse config file")?
        }
        None => toml::Table::new(),
    };

    for (var, section, key) in ENV_OVERRIDES {
        let Some(raw) = lookup(var) else {
            continue;
        };
        let value = if *key == "strict_status" {
            toml::Value::Boolean(parse_bool(var, &raw)?)
        } else {
            toml::Value::String(raw)
        };
        let entry = table
            .entry(section.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        match entry {
            toml::Value::Table(t) => {
                t.insert(key.to_string(), value);
            }
            _ => bail!("config key '{}' must be a table", section),
        }
    }

    let config: Config = toml::Value::Table(table).try_into().with_context(|| {
        "Incomplete configuration: set DB_URI, DB_NAME and COLLECTION_NAME \
         (or [db] uri, name, collection in the config file)"
    })?;

    validate(&config)?;
    Ok(config)
}

fn parse_bool(var: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("{} must be a boolean, got '{}'", var, other),
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.db.uri.as_os_str().is_empty() {
        bail!("db.uri must not be empty");
    }
    if config.db.name.trim().is_empty() {
        bail!("db.name must not be empty");
    }
    if config.db.name.contains(['/', '\\']) {
        bail!("db.name must be a file stem, not a path: '{}'", config.db.name);
    }
    // Interpolated into SQL as a table name.
    if !is_identifier(&config.db.collection) {
        bail!(
            "db.collection must match [A-Za-z_][A-Za-z0-9_]*, got '{}'",
            config.db.collection
        );
    }
    if config.server.bind.trim().is_empty() {
        bail!("server.bind must not be empty");
    }
    Ok(())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
