pub mod csv_reader;
pub mod decode;
pub mod dump;

pub use csv_reader::{FacilityRecord, SubstanceCsv};
pub use decode::{decode_lossy, read_lossy};
pub use dump::{parse_create_table, DumpError, MentalHealthDump, SqlValue, TableLayout};

use serde::Serialize;

/// Which source directory a unified row came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryType {
    MentalHealth,
    SubstanceAbuse,
}

impl DirectoryType {
    /// Value stored in the `directory_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectoryType::MentalHealth => "mental_health",
            DirectoryType::SubstanceAbuse => "substance_abuse",
        }
    }

    /// `'substance_abuse'`, ready to drop into a `VALUES` list.
    pub fn literal(&self) -> String {
        format!("'{}'", self.as_str())
    }
}
