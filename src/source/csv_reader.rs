// src/source/csv_reader.rs

use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::{collections::HashMap, path::Path};
use tracing::{debug, info, instrument, warn};

use super::decode::{clean_header, read_lossy};

/// One CSV data row, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacilityRecord {
    fields: HashMap<String, String>,
}

impl FacilityRecord {
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw cell for `column`; `None` when the header lacks the column or the
    /// row is short.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// The substance-abuse export: its header and every data row.
#[derive(Debug, Clone, Default)]
pub struct SubstanceCsv {
    pub headers: Vec<String>,
    pub records: Vec<FacilityRecord>,
}

impl SubstanceCsv {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = read_lossy(path)?;
        let parsed = Self::parse(&text).with_context(|| format!("parsing {}", path.display()))?;
        info!(
            path = %path.display(),
            rows = parsed.records.len(),
            columns = parsed.headers.len(),
            "read substance abuse csv"
        );
        Ok(parsed)
    }

    /// Parse CSV text with a header row. Short rows leave trailing columns
    /// absent; surplus cells are ignored.
    #[instrument(level = "debug", skip(text), fields(text_len = text.len()))]
    pub fn parse(text: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = rdr
            .headers()
            .context("reading CSV header")?
            .iter()
            .map(clean_header)
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(anyhow!("CSV has no header row"));
        }

        let mut records = Vec::new();
        let mut ragged = 0usize;
        for (i, result) in rdr.records().enumerate() {
            let record = result.with_context(|| format!("reading CSV record {}", i + 1))?;
            if record.len() != headers.len() {
                ragged += 1;
                debug!(
                    row = i + 1,
                    cells = record.len(),
                    headers = headers.len(),
                    "ragged row"
                );
            }
            // later duplicate headers win, like a dict built left to right
            let fields: HashMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();
            records.push(FacilityRecord { fields });
        }
        if ragged > 0 {
            warn!(ragged, "rows whose cell count differs from the header");
        }

        Ok(Self { headers, records })
    }
}
