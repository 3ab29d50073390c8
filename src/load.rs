//! Batched destination loading
//!
//! Appends the normalized result set to the destination table in
//! consecutive fixed-size batches. Each batch runs inside its own
//! transaction, so a batch lands wholly or not at all, but there is no
//! cross-batch transaction: a failure partway through the run leaves the
//! completed batches persisted as a partial snapshot. A retried run stamps
//! a fresh RunTime rather than deduplicating against the failed one; stale
//! partial snapshots age out via retention cleanup.

use crate::connect::MssqlClient;
use crate::rowset::{ColumnMeta, RowSet};
use anyhow::Context;
use tiberius::ToSql;
use tracing::{info, warn};

/// Batch size used by the pipeline.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Progress is reported every this many rows, and on completion.
const PROGRESS_INTERVAL: usize = 500;

/// Append `rowset` to `table` in order, `batch_size` rows at a time.
/// Returns the number of rows appended. Empty input returns 0 without
/// issuing any write.
pub async fn load(
    client: &mut MssqlClient,
    table: &str,
    rowset: &RowSet,
    batch_size: usize,
) -> anyhow::Result<usize> {
    if rowset.is_empty() {
        return Ok(0);
    }

    let insert_sql = build_insert(table, &rowset.columns);
    let total = rowset.len();
    let mut processed = 0;

    info!("writing {total} rows to {table}");

    for chunk in rowset.rows.chunks(batch_size) {
        client
            .simple_query("BEGIN TRANSACTION")
            .await?
            .into_results()
            .await?;

        if let Err(e) = write_batch(client, &insert_sql, chunk).await {
            if let Err(rollback_err) = rollback(client).await {
                warn!("rollback after failed batch also failed: {rollback_err:#}");
            }
            return Err(e).with_context(|| {
                format!("batch write to {table} failed after {processed} rows")
            });
        }

        client
            .simple_query("COMMIT TRANSACTION")
            .await?
            .into_results()
            .await?;

        processed += chunk.len();
        if processed % PROGRESS_INTERVAL == 0 || processed == total {
            info!(
                "write progress: {processed}/{total} rows ({}%)",
                processed * 100 / total
            );
        }
    }

    Ok(processed)
}

async fn write_batch(
    client: &mut MssqlClient,
    insert_sql: &str,
    chunk: &[Vec<crate::rowset::CellValue>],
) -> anyhow::Result<()> {
    for row in chunk {
        let params: Vec<&dyn ToSql> = row.iter().map(|cell| cell as &dyn ToSql).collect();
        client.execute(insert_sql, &params).await?;
    }
    Ok(())
}

async fn rollback(client: &mut MssqlClient) -> anyhow::Result<()> {
    client
        .simple_query("IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION")
        .await?
        .into_results()
        .await?;
    Ok(())
}

/// Parameterized single-row INSERT for the result's column list. One row
/// per statement keeps parameter counts well under the server's 2100-param
/// limit regardless of batch size.
fn build_insert(table: &str, columns: &[ColumnMeta]) -> String {
    let names = columns
        .iter()
        .map(|c| format!("[{}]", c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let params = (1..=columns.len())
        .map(|i| format!("@P{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO [{table}] ({names}) VALUES ({params})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rowset::ColumnKind;

    fn meta(name: &str) -> ColumnMeta {
        ColumnMeta {
            name: name.to_string(),
            kind: ColumnKind::Text,
        }
    }

    #[test]
    fn insert_statement_quotes_and_numbers_params() {
        let sql = build_insert(
            "BOM_Expanded",
            &[meta("FinishedItemCode"), meta("Path"), meta("RunTime")],
        );
        assert_eq!(
            sql,
            "INSERT INTO [BOM_Expanded] ([FinishedItemCode], [Path], [RunTime]) VALUES (@P1, @P2, @P3)"
        );
    }

    #[test]
    fn batches_cover_all_rows_exactly_once() {
        // 250 rows at batch size 100 must slice as 100/100/50
        let rows: Vec<Vec<crate::rowset::CellValue>> = (0..250)
            .map(|i| vec![crate::rowset::CellValue::Int(i)])
            .collect();
        let sizes: Vec<usize> = rows.chunks(DEFAULT_BATCH_SIZE).map(<[_]>::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        assert_eq!(sizes.iter().sum::<usize>(), 250);
    }
}
