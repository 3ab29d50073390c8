//! Source extraction
//!
//! Runs the externally authored BOM query verbatim against the SAP source
//! and materializes the full result set in memory. The query is the sole
//! producer of hierarchy semantics (level, path, leaf flag); everything it
//! returns is carried through as opaque payload. Daily and monthly result
//! sets are assumed to fit in memory, so no server-side cursoring is
//! attempted.

use crate::connect::MssqlClient;
use crate::rowset::{CellValue, ColumnKind, ColumnMeta, RowSet};
use anyhow::Context;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tiberius::Row;
use tracing::info;

/// Execute `sql` and materialize the result. An empty result set is not an
/// error; it comes back as an empty [`RowSet`].
pub async fn extract(client: &mut MssqlClient, sql: &str) -> anyhow::Result<RowSet> {
    let rows = client
        .simple_query(sql)
        .await
        .context("BOM query failed")?
        .into_first_result()
        .await
        .context("BOM query failed")?;

    if rows.is_empty() {
        return Ok(RowSet::default());
    }

    let columns: Vec<ColumnMeta> = rows[0]
        .columns()
        .iter()
        .map(|c| ColumnMeta {
            name: c.name().to_string(),
            kind: ColumnKind::from_column_type(c.column_type()),
        })
        .collect();

    let mut out = RowSet {
        columns,
        rows: Vec::with_capacity(rows.len()),
    };
    for row in &rows {
        let mut cells = Vec::with_capacity(out.columns.len());
        for (idx, meta) in out.columns.iter().enumerate() {
            cells.push(read_cell(row, idx, meta)?);
        }
        out.rows.push(cells);
    }

    info!("query returned {} rows", out.len());
    Ok(out)
}

/// Read one cell according to its declared column kind. NULLs come back as
/// [`CellValue::Null`] regardless of kind; normalization decides what to do
/// with them.
fn read_cell(row: &Row, idx: usize, meta: &ColumnMeta) -> anyhow::Result<CellValue> {
    let cell = match meta.kind {
        ColumnKind::Boolean => row.try_get::<bool, _>(idx)?.map(CellValue::Bool),
        ColumnKind::Integer => {
            // INT columns arrive sized by value width
            if let Ok(v) = row.try_get::<i32, _>(idx) {
                v.map(|i| CellValue::Int(i64::from(i)))
            } else if let Ok(v) = row.try_get::<i64, _>(idx) {
                v.map(CellValue::Int)
            } else if let Ok(v) = row.try_get::<i16, _>(idx) {
                v.map(|i| CellValue::Int(i64::from(i)))
            } else {
                row.try_get::<u8, _>(idx)?.map(|i| CellValue::Int(i64::from(i)))
            }
        }
        ColumnKind::Float => {
            if let Ok(v) = row.try_get::<f64, _>(idx) {
                v.map(CellValue::Float)
            } else {
                row.try_get::<f32, _>(idx)?.map(|f| CellValue::Float(f64::from(f)))
            }
        }
        ColumnKind::Decimal => {
            if let Ok(v) = row.try_get::<Decimal, _>(idx) {
                v.map(CellValue::Decimal)
            } else {
                // MONEY surfaces as a float
                row.try_get::<f64, _>(idx)?.map(CellValue::Float)
            }
        }
        ColumnKind::DateTime => row
            .try_get::<NaiveDateTime, _>(idx)?
            .map(CellValue::DateTime),
        ColumnKind::Text => row
            .try_get::<&str, _>(idx)
            .with_context(|| format!("column '{}' is not readable as text", meta.name))?
            .map(|s| CellValue::String(s.to_string())),
    };

    Ok(cell.unwrap_or(CellValue::Null))
}
