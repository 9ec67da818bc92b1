// src/merge/mod.rs

pub mod drift;
pub mod note;
pub mod transform;

pub use drift::DriftReport;
pub use transform::normalize_flag;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

use crate::{
    catalog::ServiceCatalog,
    config::{resolve_input, MentalHealthMode, MergeConfig},
    output::{write_json, SqlDocument},
    source::{parse_create_table, read_lossy, MentalHealthDump, SubstanceCsv},
    sql::FacilitySchema,
};

/// Summary of one merge run.
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub output: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub table: String,
    pub mental_health_table: String,
    pub total_columns: usize,
    pub service_codes: usize,
    pub substance_abuse_rows: usize,
    pub mental_health_rows: usize,
    pub mental_health_mode: MentalHealthMode,
    pub drift: DriftReport,
}

impl MergeReport {
    /// Operator-facing follow-up steps.
    pub fn instructions(&self) -> Vec<String> {
        let mut steps = vec![
            "1. Upload this SQL file to your Heroku MySQL database".to_string(),
            format!(
                "2. The file creates a new '{}' table with directory_type column",
                self.table
            ),
        ];
        match self.mental_health_mode {
            MentalHealthMode::Note => steps.push(format!(
                "3. For mental health data, run the migration query from your existing {} table",
                self.mental_health_table
            )),
            MentalHealthMode::Inline => steps.push(format!(
                "3. Mental health data is included ({} rows); no separate migration is needed",
                self.mental_health_rows
            )),
        }
        steps.push(
            "4. The directory_type column will be 'mental_health' or 'substance_abuse'".to_string(),
        );
        steps
    }
}

/// Run the merge with the current time as the generation stamp.
pub fn run(cfg: &MergeConfig) -> Result<MergeReport> {
    run_at(cfg, Utc::now())
}

/// Read both sources, assemble the combined SQL file and write it in one go.
#[instrument(level = "info", skip_all, fields(output = %cfg.output.display()))]
pub fn run_at(cfg: &MergeConfig, generated_at: DateTime<Utc>) -> Result<MergeReport> {
    cfg.validate()?;

    let catalog = ServiceCatalog::build(
        &cfg.service_codes.mental_health,
        &cfg.service_codes.substance_abuse,
    );
    info!(codes = catalog.len(), "service code columns");
    let schema = FacilitySchema::new(cfg.table.clone(), cfg.base_columns.clone(), catalog);

    let csv_path = resolve_input(&cfg.substance_csv).context("locating substance abuse csv")?;
    let csv = SubstanceCsv::load(&csv_path)?;

    let mode = cfg.mental_health_mode();
    let (dump, dump_columns) = match mode {
        MentalHealthMode::Inline => {
            let dump = load_dump(cfg)?;
            let columns = dump.columns.clone();
            (Some(dump), Some(columns))
        }
        MentalHealthMode::Note => (None, declared_dump_columns(cfg)?),
    };

    let drift = drift::detect(&schema, &csv.headers, dump_columns.as_deref());
    drift.log();

    let mut doc = SqlDocument::with_header(generated_at);
    doc.lines(schema.render_ddl());
    doc.blank();

    doc.comment("Substance Abuse Facilities");
    doc.blank();
    doc.lines(transform::substance_inserts(&schema, &csv.records)?);
    doc.blank();

    let mental_health_rows = match &dump {
        Some(dump) => {
            doc.comment("Mental Health Facilities");
            doc.comment(&format!("Total: {} facilities", dump.rows.len()));
            doc.blank();
            doc.lines(transform::mental_health_inserts(&schema, dump)?);
            dump.rows.len()
        }
        None => {
            doc.lines(note::render_note(
                &schema,
                &cfg.mental_health_table,
                &cfg.service_codes.mental_health,
            ));
            0
        }
    };
    doc.blank();

    doc.write_to(&cfg.output)?;
    info!(
        path = %cfg.output.display(),
        substance_abuse = csv.records.len(),
        mental_health = mental_health_rows,
        "wrote combined sql"
    );

    let report = MergeReport {
        output: cfg.output.clone(),
        generated_at,
        table: cfg.table.clone(),
        mental_health_table: cfg.mental_health_table.clone(),
        total_columns: schema.width(),
        service_codes: schema.catalog().len(),
        substance_abuse_rows: csv.records.len(),
        mental_health_rows,
        mental_health_mode: mode,
        drift,
    };

    if let Some(path) = &cfg.report_path {
        write_json(path, &report).with_context(|| format!("writing report {:?}", path))?;
        info!(path = %path.display(), "wrote run report");
    }

    Ok(report)
}

/// Inline mode: the whole dump, rows included.
fn load_dump(cfg: &MergeConfig) -> Result<MentalHealthDump> {
    let path = resolve_input(&cfg.mental_health_sql).context("locating mental health dump")?;
    MentalHealthDump::load(path, &cfg.mental_health_table)
}

/// Note mode: only the dump's declared columns, for the drift check. A dump
/// that cannot be found or read is skipped; one that was read must parse.
fn declared_dump_columns(cfg: &MergeConfig) -> Result<Option<Vec<String>>> {
    let located = resolve_input(&cfg.mental_health_sql)
        .and_then(|path| read_lossy(&path).map(|contents| (path, contents)));
    let (path, contents) = match located {
        Ok(found) => found,
        Err(e) => {
            warn!("mental health dump unavailable, skipping column check: {:#}", e);
            return Ok(None);
        }
    };
    let layout = parse_create_table(&contents, &cfg.mental_health_table)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(layout.data_columns()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::codes::{BASE_COLUMNS, MENTAL_HEALTH_CODES, SUBSTANCE_ABUSE_CODES};
    use chrono::TimeZone;
    use regex::Regex;
    use std::{fs, path::Path};
    use tempfile::tempdir;

    const DUMP: &str = "\
CREATE TABLE `datamentalhealth` (
  `id` int(11) NOT NULL AUTO_INCREMENT,
  `name1` text DEFAULT NULL,
  `city` text DEFAULT NULL,
  `SA` text DEFAULT NULL,
  `MH` text DEFAULT NULL,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;
INSERT INTO `datamentalhealth` VALUES (1,'Mind Care','Boise','Yes',NULL),(2,'Calm; Co',NULL,'No','Yes');
";

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    fn config(dir: &Path, csv: &str) -> MergeConfig {
        let csv_path = dir.join("Final_2024_substancetreatmentagency(in)_1.csv");
        fs::write(&csv_path, csv).unwrap();
        MergeConfig {
            substance_csv: csv_path.display().to_string(),
            mental_health_sql: dir.join("mentalhealth_1.sql").display().to_string(),
            output: dir.join("combined_facilities.sql"),
            ..MergeConfig::default()
        }
    }

    fn inserts(sql: &str) -> Vec<&str> {
        sql.lines()
            .filter(|l| l.starts_with("INSERT INTO `facilities`"))
            .collect()
    }

    fn split_values(insert: &str) -> Vec<&str> {
        let start = insert.find("VALUES (").unwrap() + "VALUES (".len();
        insert[start..insert.len() - 2].split(", ").collect()
    }

    #[test]
    fn clinic_a_scenario() -> Result<()> {
        let tmp = tempdir()?;
        let cfg = config(tmp.path(), "name1,DT,HH\nClinic A,Yes,\n");
        let report = run_at(&cfg, stamp())?;

        let sql = fs::read_to_string(&cfg.output)?;
        let rows = inserts(&sql);
        assert_eq!(rows.len(), 1);
        assert_eq!(report.substance_abuse_rows, 1);

        let schema = FacilitySchema::new(
            "facilities",
            cfg.base_columns.clone(),
            ServiceCatalog::build(MENTAL_HEALTH_CODES, SUBSTANCE_ABUSE_CODES),
        );
        let columns = schema.columns();
        let values = split_values(rows[0]);
        assert_eq!(values.len(), 1 + BASE_COLUMNS.len() + schema.catalog().len());
        assert_eq!(values.len(), report.total_columns);

        let value_of = |col: &str| values[columns.iter().position(|c| *c == col).unwrap()];
        assert_eq!(value_of("directory_type"), "'substance_abuse'");
        assert_eq!(value_of("name1"), "'Clinic A'");
        assert_eq!(value_of("DT"), "'Yes'");
        assert_eq!(value_of("HH"), "'No'");
        for col in BASE_COLUMNS.iter().skip(1) {
            assert_eq!(value_of(*col), "NULL", "{}", col);
        }
        Ok(())
    }

    #[test]
    fn insert_columns_match_create_table() -> Result<()> {
        let tmp = tempdir()?;
        let cfg = config(
            tmp.path(),
            "name1,city,SA,DT\nA,X,Yes,No\n\"O'Brien\",\"C:\\dir\",,yes\nC,,null,NULL\n",
        );
        run_at(&cfg, stamp())?;
        let sql = fs::read_to_string(&cfg.output)?;

        let decl = Regex::new(r"(?m)^  `(\w+)` (?:text|varchar\(50\)) DEFAULT NULL,$").unwrap();
        let declared: Vec<String> = decl
            .captures_iter(&sql)
            .map(|c| format!("`{}`", &c[1]))
            .collect();
        let expected_list = declared.join(", ");

        let rows = inserts(&sql);
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert!(row.contains(&format!("({}) VALUES", expected_list)));
            assert_eq!(split_values(row).len(), declared.len());
        }
        assert!(rows[1].contains("'O''Brien'"));
        assert!(rows[1].contains(r"'C:\\dir'"));
        Ok(())
    }

    #[test]
    fn note_mode_without_dump_still_writes() -> Result<()> {
        let tmp = tempdir()?;
        let cfg = config(tmp.path(), "name1\nA\n");
        let report = run_at(&cfg, stamp())?;
        assert_eq!(report.mental_health_rows, 0);

        let sql = fs::read_to_string(&cfg.output)?;
        assert!(sql.contains("-- Generated: 2026-01-02T03:04:05Z"));
        assert!(sql.contains("-- FROM datamentalhealth;"));
        assert!(sql.contains("-- SELECT 'mental_health', name1, name2,"));
        assert!(!sql.contains("'mental_health', 'Mind Care'"));
        Ok(())
    }

    #[test]
    fn note_mode_reports_dump_drift() -> Result<()> {
        let tmp = tempdir()?;
        let cfg = config(tmp.path(), "name1,EXTRA\nA,1\n");
        fs::write(tmp.path().join("mentalhealth_1.sql"), DUMP.replace("`MH`", "`LEGACY`"))?;
        let report = run_at(&cfg, stamp())?;
        assert_eq!(report.drift.csv_columns_dropped, vec!["EXTRA"]);
        assert_eq!(report.drift.dump_columns_dropped, vec!["LEGACY"]);
        Ok(())
    }

    #[test]
    fn note_mode_rejects_unparseable_dump() {
        let tmp = tempdir().unwrap();
        let cfg = config(tmp.path(), "name1\nA\n");
        fs::write(
            tmp.path().join("mentalhealth_1.sql"),
            "INSERT INTO `datamentalhealth` VALUES (1,'never closed);\n",
        )
        .unwrap();

        let err = run_at(&cfg, stamp()).unwrap_err();
        assert!(format!("{:#}", err).contains("CREATE TABLE"), "{:#}", err);
        assert!(!cfg.output.exists());
    }

    #[test]
    fn inline_mode_emits_mental_health_rows() -> Result<()> {
        let tmp = tempdir()?;
        let mut cfg = config(tmp.path(), "name1,DT\nA,Yes\n");
        fs::write(tmp.path().join("mentalhealth_1.sql"), DUMP)?;
        cfg.mental_health.mode = MentalHealthMode::Inline;
        cfg.report_path = Some(tmp.path().join("report.json"));

        let report = run_at(&cfg, stamp())?;
        assert_eq!(report.mental_health_rows, 2);

        let sql = fs::read_to_string(&cfg.output)?;
        let rows = inserts(&sql);
        assert_eq!(rows.len(), 3);
        assert!(rows[1].contains("VALUES ('mental_health', 'Mind Care', NULL, NULL, NULL, 'Boise',"));
        assert!(rows[2].contains("'Calm; Co'"));
        // service codes absent from the dump read as No
        assert!(rows[1].ends_with("'No');"));
        assert!(!sql.contains("-- FROM datamentalhealth;"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("report.json"))?)?;
        assert_eq!(json["mental_health_rows"], 2);
        assert_eq!(json["mental_health_mode"], "inline");
        Ok(())
    }

    #[test]
    fn inline_mode_requires_dump() {
        let tmp = tempdir().unwrap();
        let mut cfg = config(tmp.path(), "name1\nA\n");
        cfg.mental_health.mode = MentalHealthMode::Inline;
        assert!(run_at(&cfg, stamp()).is_err());
        assert!(!cfg.output.exists());
    }

    #[test]
    fn missing_csv_aborts_before_output() {
        let tmp = tempdir().unwrap();
        let cfg = MergeConfig {
            substance_csv: tmp.path().join("absent.csv").display().to_string(),
            output: tmp.path().join("out.sql"),
            ..MergeConfig::default()
        };
        assert!(run(&cfg).is_err());
        assert!(!cfg.output.exists());
    }

    #[test]
    fn instructions_follow_mode() {
        let report = MergeReport {
            output: PathBuf::from("combined_facilities.sql"),
            generated_at: stamp(),
            table: "facilities".into(),
            mental_health_table: "mh_directory".into(),
            total_columns: 10,
            service_codes: 6,
            substance_abuse_rows: 1,
            mental_health_rows: 4,
            mental_health_mode: MentalHealthMode::Inline,
            drift: DriftReport::default(),
        };
        let steps = report.instructions();
        assert_eq!(steps.len(), 4);
        assert!(steps[2].contains("4 rows"));

        let note = MergeReport {
            mental_health_mode: MentalHealthMode::Note,
            ..report
        };
        assert!(note.instructions()[2].contains("existing mh_directory table"));
    }
}
