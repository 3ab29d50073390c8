//! Retention cleanup
//!
//! Deletes snapshot rows whose RunTime is older than the retention window.
//! Best-effort: a cleanup failure is logged as a warning and never fails
//! the run. The caller skips the call entirely when the window is zero or
//! negative.

use crate::connect::MssqlClient;
use crate::schema::BOM_TABLE;
use tracing::{info, warn};

/// Delete rows older than `days_to_keep` days. Returns the number of rows
/// removed (0 when the delete fails).
pub async fn cleanup_old_rows(client: &mut MssqlClient, days_to_keep: i32) -> u64 {
    match delete_older_than(client, days_to_keep).await {
        Ok(0) => {
            info!("no snapshot rows past the {days_to_keep}-day retention window");
            0
        }
        Ok(deleted) => {
            info!("removed {deleted} snapshot rows older than {days_to_keep} days");
            deleted
        }
        Err(e) => {
            warn!("retention cleanup failed: {e:#}");
            0
        }
    }
}

async fn delete_older_than(client: &mut MssqlClient, days_to_keep: i32) -> anyhow::Result<u64> {
    let sql = format!("DELETE FROM {BOM_TABLE} WHERE [RunTime] < DATEADD(DAY, @P1, GETDATE())");
    let result = client.execute(sql, &[&(-days_to_keep)]).await?;
    Ok(result.total())
}
