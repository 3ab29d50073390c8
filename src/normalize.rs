//! Result-set normalization
//!
//! Runs after extraction and before load. Missing values get
//! type-appropriate defaults (numeric columns 0, textual columns empty
//! string, everything else passes through), and every row is stamped with
//! the run's start time so one invocation forms one distinguishable
//! snapshot. No business transformation happens here.

use crate::rowset::{CellValue, ColumnKind, ColumnMeta, RowSet};
use chrono::NaiveDateTime;

/// Snapshot column appended to every row.
pub const RUN_TIME_COLUMN: &str = "RunTime";

/// Fill missing values by declared column kind and append the uniform
/// `RunTime` column.
pub fn normalize(mut rowset: RowSet, run_start: NaiveDateTime) -> RowSet {
    for (idx, column) in rowset.columns.iter().enumerate() {
        let Some(fill) = column.kind.null_fill() else {
            continue;
        };
        for row in &mut rowset.rows {
            if row[idx].is_null() {
                row[idx] = fill.clone();
            }
        }
    }

    rowset.columns.push(ColumnMeta {
        name: RUN_TIME_COLUMN.to_string(),
        kind: ColumnKind::DateTime,
    });
    for row in &mut rowset.rows {
        row.push(CellValue::DateTime(run_start));
    }

    rowset
}
