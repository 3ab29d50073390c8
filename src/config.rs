//! Configuration loading for bom-etl
//!
//! Two inputs come from disk: the `db.json` connection document with the
//! `sap_db` (source) and `tableau_db` (destination) profiles, and the
//! externally authored BOM query text files. The query files are maintained
//! by the ERP team and are executed verbatim; this module only resolves and
//! reads them.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Connection document with one profile per endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    /// SAP source database
    pub sap_db: ConnectionProfile,
    /// Tableau reporting database
    pub tableau_db: ConnectionProfile,
}

/// One named SQL Server connection profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionProfile {
    pub server: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub options: TransportOptions,
}

/// Transport security negotiation flags, camelCase keyed as in the
/// original document format.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOptions {
    #[serde(default)]
    pub encrypt: bool,
    #[serde(default)]
    pub trust_server_certificate: bool,
}

fn default_port() -> u16 {
    1433
}

/// Load the connection document. Missing or malformed configuration is
/// fatal before any connection is attempted.
pub fn load_db_config(path: &Path) -> anyhow::Result<DbConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: DbConfig = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Resolve a query file by name: first as given, then under the `sql/`
/// subdirectory next to the working directory.
pub fn load_query(name: &str) -> anyhow::Result<String> {
    let direct = PathBuf::from(name);
    let path = if direct.exists() {
        direct
    } else {
        Path::new("sql").join(name)
    };

    std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read query file {}", path.display()))
}
