// src/merge/transform.rs

use anyhow::{Context, Result};
use tracing::trace;

use crate::{
    source::{DirectoryType, FacilityRecord, MentalHealthDump},
    sql::{escape_literal, render_insert, FacilitySchema},
};

pub const YES: &str = "'Yes'";
pub const NO: &str = "'No'";

/// Collapse the many ways the export marks a service into `'Yes'`/`'No'`.
///
/// Absent, empty, `no` and `null` (any case) mean no; anything else yes.
pub fn normalize_flag(value: Option<&str>) -> &'static str {
    match value {
        None => NO,
        Some(v) => match v.to_lowercase().as_str() {
            "" | "no" | "null" => NO,
            _ => YES,
        },
    }
}

/// Values for one substance-abuse record, in [`FacilitySchema::columns`] order.
pub fn substance_values(schema: &FacilitySchema, record: &FacilityRecord) -> Vec<String> {
    let mut values = Vec::with_capacity(schema.width());
    values.push(DirectoryType::SubstanceAbuse.literal());
    for col in schema.base_columns() {
        values.push(escape_literal(record.get(col)));
    }
    for code in schema.catalog().codes() {
        values.push(normalize_flag(record.get(code)).to_string());
    }
    values
}

/// Values for row `row` of the mental-health dump. Cells are copied as they
/// are, re-escaped as text. Base columns the dump lacks are `NULL`; service
/// codes it lacks are `'No'`, as for a blank CSV cell.
pub fn mental_health_values(
    schema: &FacilitySchema,
    dump: &MentalHealthDump,
    row: usize,
) -> Vec<String> {
    let cell = |col: &str| dump.get(row, col).map(|v| escape_literal(v.as_text()));
    let mut values = Vec::with_capacity(schema.width());
    values.push(DirectoryType::MentalHealth.literal());
    for col in schema.base_columns() {
        values.push(cell(col).unwrap_or_else(|| "NULL".to_string()));
    }
    for code in schema.catalog().codes() {
        values.push(cell(code).unwrap_or_else(|| NO.to_string()));
    }
    values
}

pub fn substance_inserts(schema: &FacilitySchema, records: &[FacilityRecord]) -> Result<Vec<String>> {
    let columns = schema.columns();
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            trace!(row = i + 1, "substance abuse row");
            render_insert(schema.table(), &columns, &substance_values(schema, record))
                .with_context(|| format!("substance abuse row {}", i + 1))
        })
        .collect()
}

pub fn mental_health_inserts(schema: &FacilitySchema, dump: &MentalHealthDump) -> Result<Vec<String>> {
    let columns = schema.columns();
    (0..dump.rows.len())
        .map(|i| {
            render_insert(schema.table(), &columns, &mental_health_values(schema, dump, i))
                .with_context(|| format!("mental health row {}", i + 1))
        })
        .collect()
}
