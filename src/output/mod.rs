// src/output/mod.rs

pub mod write;

pub use write::{write_atomic, write_json};

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;

/// Line-oriented builder for the combined SQL file.
#[derive(Debug, Clone, Default)]
pub struct SqlDocument {
    lines: Vec<String>,
}

impl SqlDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Title block: what the file is, when it was generated, and what the
    /// discriminator values mean.
    pub fn with_header(generated_at: DateTime<Utc>) -> Self {
        let mut doc = Self::new();
        doc.comment("Combined Mental Health and Substance Abuse Facilities Database");
        doc.comment("Generated for upload to Heroku MySQL");
        doc.comment(&format!(
            "Generated: {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        doc.comment("Contains directory_type column to distinguish between facility types");
        doc.comment("'mental_health' = Mental Health Services");
        doc.comment("'substance_abuse' = Substance Abuse Treatment");
        doc.blank();
        doc
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    pub fn comment(&mut self, text: &str) {
        self.lines.push(format!("-- {}", text));
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_atomic(path, self.render().as_bytes())
    }
}
