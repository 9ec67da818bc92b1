// src/config/mod.rs

pub mod codes;

use anyhow::{anyhow, bail, Context, Result};
use glob::glob;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::sql::{DIRECTORY_TYPE_COLUMN, IDENTITY_COLUMN};
use codes::{owned, BASE_COLUMNS, MENTAL_HEALTH_CODES, SUBSTANCE_ABUSE_CODES};

/// What to do with the mental-health directory, which already lives in a
/// `datamentalhealth` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentalHealthMode {
    /// Emit a commented migration query for the operator to run by hand.
    #[default]
    Note,
    /// Parse the dump and emit real `INSERT` statements.
    Inline,
}

impl MentalHealthMode {
    pub fn as_str(&self) -> &str {
        match self {
            MentalHealthMode::Note => "note",
            MentalHealthMode::Inline => "inline",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentalHealthSection {
    pub mode: MentalHealthMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceCodeLists {
    pub mental_health: Vec<String>,
    pub substance_abuse: Vec<String>,
}

impl Default for ServiceCodeLists {
    fn default() -> Self {
        Self {
            mental_health: owned(MENTAL_HEALTH_CODES),
            substance_abuse: owned(SUBSTANCE_ABUSE_CODES),
        }
    }
}

/// Everything one merge run needs. Every field has a default, so an empty
/// YAML document (or no file at all) reproduces the stock conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Path or glob pattern of the mental-health SQL dump.
    pub mental_health_sql: String,
    /// Path or glob pattern of the substance-abuse CSV export.
    pub substance_csv: String,
    pub output: PathBuf,
    pub report_path: Option<PathBuf>,
    /// Name of the unified table.
    pub table: String,
    /// Table holding the mental-health rows, both in the dump and live.
    pub mental_health_table: String,
    pub mental_health: MentalHealthSection,
    pub base_columns: Vec<String>,
    pub service_codes: ServiceCodeLists,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            mental_health_sql: "attached_assets/mentalhealth_*.sql".into(),
            substance_csv: "attached_assets/Final_2024_substancetreatmentagency*.csv".into(),
            output: PathBuf::from("combined_facilities.sql"),
            report_path: None,
            table: "facilities".into(),
            mental_health_table: "datamentalhealth".into(),
            mental_health: MentalHealthSection::default(),
            base_columns: owned(BASE_COLUMNS),
            service_codes: ServiceCodeLists::default(),
        }
    }
}

impl MergeConfig {
    /// Load a YAML config file; missing keys fall back to the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let cfg = Self::from_yaml(&text).with_context(|| format!("parsing config {:?}", path))?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: MergeConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.table.trim().is_empty() {
            bail!("`table` must not be empty");
        }
        if self.mental_health_table.trim().is_empty() {
            bail!("`mental_health_table` must not be empty");
        }
        if self.base_columns.is_empty() {
            bail!("`base_columns` must list at least one column");
        }
        if let Some(i) = self.base_columns.iter().position(|c| c.trim().is_empty()) {
            bail!("`base_columns[{}]` is empty", i);
        }
        for (list, codes) in [
            ("mental_health", &self.service_codes.mental_health),
            ("substance_abuse", &self.service_codes.substance_abuse),
        ] {
            if let Some(i) = codes.iter().position(|c| c.trim().is_empty()) {
                bail!("`service_codes.{}[{}]` is empty", list, i);
            }
        }
        self.check_column_names()
    }

    /// Every `CREATE TABLE` column must be unique. MySQL compares column
    /// names case-insensitively, so `DT` and `dt` collide. A code listed in
    /// both service lists is fine; the catalog keeps one copy.
    fn check_column_names(&self) -> Result<()> {
        let mut taken: HashMap<String, &str> = [IDENTITY_COLUMN, DIRECTORY_TYPE_COLUMN]
            .into_iter()
            .map(|c| (c.to_lowercase(), c))
            .collect();

        for col in &self.base_columns {
            if let Some(prev) = taken.insert(col.to_lowercase(), col.as_str()) {
                bail!("base column `{}` duplicates column `{}`", col, prev);
            }
        }

        let mut codes: HashMap<String, &str> = HashMap::new();
        for code in self
            .service_codes
            .mental_health
            .iter()
            .chain(&self.service_codes.substance_abuse)
        {
            let key = code.to_lowercase();
            if let Some(prev) = taken.get(&key) {
                bail!("service code `{}` duplicates column `{}`", code, prev);
            }
            if let Some(prev) = codes.insert(key, code.as_str()) {
                if prev != code.as_str() {
                    bail!("service codes `{}` and `{}` differ only in case", prev, code);
                }
            }
        }
        Ok(())
    }

    pub fn mental_health_mode(&self) -> MentalHealthMode {
        self.mental_health.mode
    }
}

fn is_pattern(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Resolve a configured input to a concrete file.
///
/// Plain paths are returned as-is (existence is checked when reading).
/// Glob patterns pick the lexicographically last match, which for the
/// timestamp-suffixed export names is the newest export.
pub fn resolve_input(input: &str) -> Result<PathBuf> {
    if !is_pattern(input) {
        return Ok(PathBuf::from(input));
    }

    let mut matches: Vec<PathBuf> = glob(input)
        .with_context(|| format!("invalid glob pattern '{}'", input))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    matches.sort();
    debug!(pattern = input, matches = matches.len(), "resolved input pattern");

    matches
        .pop()
        .ok_or_else(|| anyhow!("no file matches '{}'", input))
}
