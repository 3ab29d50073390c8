//! Destination schema provisioning
//!
//! Idempotent, additive-only DDL for the `BOM_Expanded` snapshot table and
//! the `ETL_SUMMARY` audit table. Safe to run on every invocation; a legacy
//! table without the `RunTime` snapshot column gets the column and its
//! indexes added without touching existing columns or data. DDL failures
//! are fatal and abort the run before any data is touched.

use crate::connect::MssqlClient;
use anyhow::Context;
use tracing::info;

/// Destination snapshot table.
pub const BOM_TABLE: &str = "BOM_Expanded";

/// Per-run audit table.
pub const SUMMARY_TABLE: &str = "ETL_SUMMARY";

const ENSURE_BOM_TABLE_SQL: &str = "
IF NOT EXISTS (SELECT * FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = 'BOM_Expanded')
BEGIN
    CREATE TABLE BOM_Expanded (
        [FinishedItemCode] NVARCHAR(50),
        [FinishedItemName] NVARCHAR(255),
        [CategoryLarge] NVARCHAR(100),
        [CategoryMedium] NVARCHAR(100),
        [CategorySmall] NVARCHAR(100),
        [ParentItemCode] NVARCHAR(50),
        [ParentItemName] NVARCHAR(255),
        [InputItemCode] NVARCHAR(50),
        [InputItemName] NVARCHAR(255),
        [InputUnit] NVARCHAR(20),
        [ItemGroup] NVARCHAR(50),
        [BomType] NVARCHAR(20),
        [FinishedQty] DECIMAL(19,6),
        [SourceUpdatedAt] DATETIME,
        [Stage] INT,
        [StageName] NVARCHAR(100),
        [SeqNo] INT,
        [InputType] NVARCHAR(20),
        [Level] INT,
        [LevelName] NVARCHAR(50),
        [Path] NVARCHAR(MAX),
        [PerLevelQty] DECIMAL(19,6),
        [CumulativeQty] DECIMAL(19,6),
        [UnitPrice] DECIMAL(19,4),
        [Amount] DECIMAL(19,4),
        [IsLeaf] BIT,
        [RunTime] DATETIME DEFAULT GETDATE()
    )

    CREATE INDEX IX_BOM_Expanded_FinishedItemCode ON BOM_Expanded([FinishedItemCode])
    CREATE INDEX IX_BOM_Expanded_RunTime ON BOM_Expanded([RunTime])
    CREATE INDEX IX_BOM_Expanded_FinishedItemCode_RunTime ON BOM_Expanded([FinishedItemCode], [RunTime])
END
ELSE
BEGIN
    IF NOT EXISTS (SELECT * FROM INFORMATION_SCHEMA.COLUMNS
                   WHERE TABLE_NAME = 'BOM_Expanded' AND COLUMN_NAME = 'RunTime')
    BEGIN
        ALTER TABLE BOM_Expanded ADD [RunTime] DATETIME DEFAULT GETDATE()
        CREATE INDEX IX_BOM_Expanded_RunTime ON BOM_Expanded([RunTime])
        CREATE INDEX IX_BOM_Expanded_FinishedItemCode_RunTime ON BOM_Expanded([FinishedItemCode], [RunTime])
    END
END
";

const ENSURE_SUMMARY_TABLE_SQL: &str = "
IF NOT EXISTS (SELECT * FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = 'ETL_SUMMARY')
BEGIN
    CREATE TABLE ETL_SUMMARY (
        [TIMESTAMP] DATETIME,
        [SOURCE_TYPE] NVARCHAR(20),
        [QUERY_NAME] NVARCHAR(100),
        [TARGET_TABLE] NVARCHAR(100),
        [ROW_COUNT] INT,
        [ETL_DATE] DATETIME,
        [SUMMARY_TYPE] NVARCHAR(50)
    )
END
";

/// Ensure both destination tables exist with the expected shape.
pub async fn ensure_tables(client: &mut MssqlClient) -> anyhow::Result<()> {
    client
        .simple_query(ENSURE_BOM_TABLE_SQL)
        .await
        .context("failed to create or migrate BOM_Expanded")?
        .into_results()
        .await
        .context("failed to create or migrate BOM_Expanded")?;

    client
        .simple_query(ENSURE_SUMMARY_TABLE_SQL)
        .await
        .context("failed to create ETL_SUMMARY")?
        .into_results()
        .await
        .context("failed to create ETL_SUMMARY")?;

    info!("ensured {BOM_TABLE} and {SUMMARY_TABLE} exist");
    Ok(())
}
