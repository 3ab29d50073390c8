//! In-memory tabular result model
//!
//! The extractor materializes the source query into a [`RowSet`]: declared
//! per-column metadata plus row-major cell values. Classification for null
//! normalization comes from the driver's declared column types, never from
//! sampling values, so an all-NULL numeric column still classifies as
//! numeric.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::borrow::Cow;
use tiberius::{ColumnData, ColumnType, ToSql};

/// Broad classification of a destination-relevant column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Boolean,
    Integer,
    Float,
    Decimal,
    DateTime,
    Text,
}

impl ColumnKind {
    /// Map a declared SQL Server column type to its classification.
    pub fn from_column_type(ty: ColumnType) -> ColumnKind {
        match ty {
            ColumnType::Bit | ColumnType::Bitn => ColumnKind::Boolean,
            ColumnType::Int1
            | ColumnType::Int2
            | ColumnType::Int4
            | ColumnType::Int8
            | ColumnType::Intn => ColumnKind::Integer,
            ColumnType::Float4 | ColumnType::Float8 | ColumnType::Floatn => ColumnKind::Float,
            ColumnType::Decimaln
            | ColumnType::Numericn
            | ColumnType::Money
            | ColumnType::Money4 => ColumnKind::Decimal,
            ColumnType::Datetime
            | ColumnType::Datetime4
            | ColumnType::Datetimen
            | ColumnType::Datetime2
            | ColumnType::Daten
            | ColumnType::Timen
            | ColumnType::DatetimeOffsetn => ColumnKind::DateTime,
            // NVARCHAR, CHAR, TEXT, XML and anything else read as text
            _ => ColumnKind::Text,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnKind::Integer | ColumnKind::Float | ColumnKind::Decimal
        )
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, ColumnKind::Text)
    }

    /// Type-appropriate replacement for a missing value, if this kind is
    /// normalized at all.
    pub fn null_fill(&self) -> Option<CellValue> {
        match self {
            ColumnKind::Integer => Some(CellValue::Int(0)),
            ColumnKind::Float => Some(CellValue::Float(0.0)),
            ColumnKind::Decimal => Some(CellValue::Decimal(Decimal::ZERO)),
            ColumnKind::Text => Some(CellValue::String(String::new())),
            ColumnKind::Boolean | ColumnKind::DateTime => None,
        }
    }
}

/// Declared metadata for one result column.
#[derive(Debug, Clone)]
pub struct ColumnMeta {
    pub name: String,
    pub kind: ColumnKind,
}

/// A single cell value as read from the source, bindable as an insert
/// parameter against the destination.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl ToSql for CellValue {
    fn to_sql(&self) -> ColumnData<'_> {
        match self {
            // Typed NULL; the server coerces it to the target column type
            CellValue::Null => ColumnData::String(None),
            CellValue::Bool(b) => b.to_sql(),
            CellValue::Int(i) => i.to_sql(),
            CellValue::Float(f) => f.to_sql(),
            CellValue::Decimal(d) => d.to_sql(),
            CellValue::String(s) => ColumnData::String(Some(Cow::from(s.as_str()))),
            CellValue::DateTime(dt) => dt.to_sql(),
        }
    }
}

/// A fully materialized query result.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
