//! BOM ETL Library
//!
//! A library for snapshotting expanded SAP bill-of-materials data into a
//! Tableau reporting database on SQL Server.
//!
//! # Pipeline
//!
//! - Schema provisioning: destination table and indexes created on demand
//! - Extraction: the externally authored BOM query is run verbatim against
//!   the SAP source and materialized in memory
//! - Normalization: NULL numeric fields become 0, NULL text fields become
//!   empty strings, and every row is stamped with the run start time
//! - Loading: append-only writes in fixed-size batches, one transaction per
//!   batch
//! - Summary recording and retention cleanup: best-effort, never fail the run
//!
//! # CLI Usage
//!
//! ```bash
//! # Daily incremental snapshot (yesterday's changes)
//! bom-etl --daily
//!
//! # Monthly full rebuild, keeping 180 days of snapshots
//! bom-etl --monthly --cleanup 180
//! ```

pub mod cleanup;
pub mod config;
pub mod connect;
pub mod extract;
pub mod load;
pub mod normalize;
pub mod rowset;
pub mod schema;
pub mod summary;

pub use config::{load_db_config, load_query, ConnectionProfile, DbConfig};
pub use connect::{connect_mssql, mssql_config, MssqlClient};
pub use rowset::{CellValue, ColumnKind, ColumnMeta, RowSet};

/// Which of the two externally authored BOM queries a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtlMode {
    /// Incremental pass over records changed since the previous day
    Daily,
    /// Full rebuild over the complete BOM dataset
    Monthly,
}

impl EtlMode {
    /// Logical query name recorded in ETL_SUMMARY.
    pub fn query_name(&self) -> &'static str {
        match self {
            EtlMode::Daily => "BOM_DAILY",
            EtlMode::Monthly => "BOM_MONTHLY",
        }
    }

    /// File name of the query text, resolved by [`config::load_query`].
    pub fn sql_file(&self) -> &'static str {
        match self {
            EtlMode::Daily => "bom_daily.sql",
            EtlMode::Monthly => "bom_monthly.sql",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EtlMode::Daily => "DAILY",
            EtlMode::Monthly => "MONTHLY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_query_names_distinguish_runs() {
        assert_eq!(EtlMode::Daily.query_name(), "BOM_DAILY");
        assert_eq!(EtlMode::Monthly.query_name(), "BOM_MONTHLY");
        assert_eq!(EtlMode::Daily.sql_file(), "bom_daily.sql");
        assert_eq!(EtlMode::Monthly.sql_file(), "bom_monthly.sql");
    }
}
