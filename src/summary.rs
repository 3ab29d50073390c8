//! Run summary recording
//!
//! One best-effort audit row per pipeline invocation into `ETL_SUMMARY`.
//! Failure here never fails the run; it is logged as a warning and the
//! snapshot stands on its own.

use crate::connect::MssqlClient;
use crate::schema::{BOM_TABLE, SUMMARY_TABLE};
use tracing::warn;

const SOURCE_TAG: &str = "SAP";
const SUMMARY_TAG: &str = "BOM_ETL";

/// Record one summary row for this run. Best-effort.
pub async fn record_summary(client: &mut MssqlClient, query_name: &str, row_count: usize) {
    let sql = format!(
        "INSERT INTO {SUMMARY_TABLE} \
         ([TIMESTAMP], [SOURCE_TYPE], [QUERY_NAME], [TARGET_TABLE], [ROW_COUNT], [ETL_DATE], [SUMMARY_TYPE]) \
         VALUES (GETDATE(), @P1, @P2, @P3, @P4, GETDATE(), @P5)"
    );

    let row_count = row_count as i64;
    let result = client
        .execute(
            sql,
            &[
                &SOURCE_TAG,
                &query_name,
                &BOM_TABLE,
                &row_count,
                &SUMMARY_TAG,
            ],
        )
        .await;

    if let Err(e) = result {
        warn!("failed to record run summary: {e:#}");
    }
}
