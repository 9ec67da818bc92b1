// src/merge/drift.rs

use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

use crate::sql::FacilitySchema;

/// Columns that one side has and the other lacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    /// Service codes in the catalog that the CSV header does not provide.
    pub codes_missing_from_csv: Vec<String>,
    /// CSV header columns the unified table has no slot for.
    pub csv_columns_dropped: Vec<String>,
    /// Dump columns the unified table has no slot for.
    pub dump_columns_dropped: Vec<String>,
}

impl DriftReport {
    pub fn is_empty(&self) -> bool {
        self.codes_missing_from_csv.is_empty()
            && self.csv_columns_dropped.is_empty()
            && self.dump_columns_dropped.is_empty()
    }

    /// Emit one warning per non-empty list.
    pub fn log(&self) {
        if !self.codes_missing_from_csv.is_empty() {
            warn!(
                count = self.codes_missing_from_csv.len(),
                codes = ?self.codes_missing_from_csv,
                "service codes absent from csv header; rows get 'No'"
            );
        }
        if !self.csv_columns_dropped.is_empty() {
            warn!(
                count = self.csv_columns_dropped.len(),
                columns = ?self.csv_columns_dropped,
                "csv columns not in unified schema; dropped"
            );
        }
        if !self.dump_columns_dropped.is_empty() {
            warn!(
                count = self.dump_columns_dropped.len(),
                columns = ?self.dump_columns_dropped,
                "mental health columns not in unified schema; dropped"
            );
        }
    }
}

fn dropped<S: AsRef<str>>(schema: &FacilitySchema, names: &[S]) -> Vec<String> {
    let known: HashSet<&str> = schema.columns().into_iter().collect();
    names
        .iter()
        .map(|n| n.as_ref())
        .filter(|n| !n.is_empty() && !known.contains(n))
        .map(str::to_string)
        .collect()
}

/// Compare the schema against the CSV header and, when available, the
/// dump's declared columns.
pub fn detect<S: AsRef<str>>(
    schema: &FacilitySchema,
    csv_headers: &[S],
    dump_columns: Option<&[String]>,
) -> DriftReport {
    DriftReport {
        codes_missing_from_csv: schema.catalog().missing_from(csv_headers),
        csv_columns_dropped: dropped(schema, csv_headers),
        dump_columns_dropped: dump_columns
            .map(|cols| dropped(schema, cols))
            .unwrap_or_default(),
    }
}
