// src/merge/note.rs

use crate::{sql::FacilitySchema, source::DirectoryType};

/// Commented migration query for the operator: the mental-health rows live
/// in a separate table, so they are copied with `INSERT ... SELECT` by hand.
pub fn render_note<S: AsRef<str>>(
    schema: &FacilitySchema,
    source_table: &str,
    mental_health_codes: &[S],
) -> Vec<String> {
    let mut columns: Vec<&str> = schema.base_columns().iter().map(String::as_str).collect();
    let codes = schema.catalog().restricted_to(mental_health_codes);
    columns.extend(codes.iter().map(String::as_str));
    let list = columns.join(", ");

    vec![
        "-- Mental Health Facilities".to_string(),
        format!(
            "-- NOTE: The mental health data needs to be migrated from the existing {} table",
            source_table
        ),
        "-- Run the following to copy mental health data:".to_string(),
        format!("-- INSERT INTO {} (directory_type, {})", schema.table(), list),
        format!(
            "-- SELECT {}, {}",
            DirectoryType::MentalHealth.literal(),
            list
        ),
        format!("-- FROM {};", source_table),
    ]
}
