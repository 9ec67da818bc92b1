// src/source/dump.rs
//! Reader for the mysqldump export of the mental-health directory.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{collections::HashMap, path::Path};
use thiserror::Error;
use tracing::{debug, info, instrument, trace};

use super::decode::read_lossy;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DumpError {
    #[error("could not find CREATE TABLE statement for `{table}`")]
    MissingCreateTable { table: String },

    #[error("`{table}`: unterminated string literal starting at byte {offset}")]
    UnterminatedLiteral { table: String, offset: usize },

    #[error("`{table}`: malformed VALUES list at byte {offset}: {reason}")]
    MalformedValues {
        table: String,
        offset: usize,
        reason: String,
    },

    #[error("`{table}`: row {row} has {found} values, expected {expected}")]
    ArityMismatch {
        table: String,
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// One literal from a `VALUES` tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Text(String),
    /// Unquoted token, kept as written (numbers, mostly).
    Number(String),
}

impl SqlValue {
    /// Text form for re-emitting into a text column; `None` for `NULL`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Null => None,
            SqlValue::Text(s) | SqlValue::Number(s) => Some(s),
        }
    }
}

/// Column layout of a `CREATE TABLE` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Every declared column, in order.
    pub columns: Vec<String>,
    /// Index into `columns` of the `AUTO_INCREMENT` key, if any.
    pub identity: Option<usize>,
}

impl TableLayout {
    /// Declared columns without the auto-increment key.
    pub fn data_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self.identity)
            .map(|(_, c)| c.clone())
            .collect()
    }
}

/// One `INSERT INTO ... VALUES (...), (...);` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    /// Explicit column list, when the dump was taken with complete inserts.
    pub columns: Option<Vec<String>>,
    pub rows: Vec<Vec<SqlValue>>,
}

static COLUMN_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^`([^`]+)`").expect("static regex"));

fn create_table_re(table: &str) -> Result<Regex, regex::Error> {
    // body runs until the line that closes the definition: `) ENGINE=...;` or `);`
    Regex::new(&format!(
        r"(?s)CREATE TABLE\s+`{}`\s*\((.*?)\n\)[^;]*;",
        regex::escape(table)
    ))
}

fn insert_re(table: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?i)INSERT INTO\s+`{}`\s*(?:\(([^)]*)\)\s*)?VALUES\s*",
        regex::escape(table)
    ))
}

/// Parse the column names declared by ``CREATE TABLE `table` (...)``.
#[instrument(level = "debug", skip(contents), fields(content_len = contents.len()))]
pub fn parse_create_table(contents: &str, table: &str) -> Result<TableLayout, DumpError> {
    let missing = || DumpError::MissingCreateTable {
        table: table.to_string(),
    };
    let re = create_table_re(table).map_err(|_| missing())?;
    let body = re
        .captures(contents)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(missing)?;

    let mut columns = Vec::new();
    let mut identity = None;
    for line in body.lines() {
        let line = line.trim();
        let Some(name) = COLUMN_LINE.captures(line).and_then(|c| c.get(1)) else {
            // keys, constraints and blank lines
            continue;
        };
        let name = name.as_str().trim_start_matches('\u{feff}').to_string();
        if line.contains("AUTO_INCREMENT") {
            trace!(name = %name, "identity column");
            identity = Some(columns.len());
        }
        columns.push(name);
    }

    if columns.is_empty() {
        return Err(missing());
    }
    debug!(columns = columns.len(), identity = ?identity, "parsed CREATE TABLE");
    Ok(TableLayout { columns, identity })
}

/// Parse every ``INSERT INTO `table` `` statement in the dump.
#[instrument(level = "debug", skip(contents), fields(content_len = contents.len()))]
pub fn parse_inserts(contents: &str, table: &str) -> Result<Vec<InsertStatement>, DumpError> {
    let re = insert_re(table).map_err(|e| DumpError::MalformedValues {
        table: table.to_string(),
        offset: 0,
        reason: e.to_string(),
    })?;

    let mut statements = Vec::new();
    let mut from = 0;
    while let Some(caps) = re.captures_at(contents, from) {
        let whole = caps.get(0).map(|m| m.end()).unwrap_or(contents.len());
        let columns = caps.get(1).map(|m| {
            m.as_str()
                .split(',')
                .map(|c| c.trim().trim_matches('`').to_string())
                .collect::<Vec<_>>()
        });

        let mut scanner = ValuesScanner::new(contents, whole, table);
        let rows = scanner.rows()?;
        trace!(rows = rows.len(), "parsed INSERT");
        statements.push(InsertStatement { columns, rows });
        from = scanner.pos;
    }

    debug!(statements = statements.len(), "parsed INSERT statements");
    Ok(statements)
}

/// Hand-rolled scanner for `(v, v, ...), (...);` lists. Regexes cannot cope
/// with parentheses and semicolons inside quoted text.
struct ValuesScanner<'a> {
    src: &'a str,
    pos: usize,
    table: &'a str,
}

impl<'a> ValuesScanner<'a> {
    fn new(src: &'a str, pos: usize, table: &'a str) -> Self {
        Self { src, pos, table }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> DumpError {
        DumpError::MalformedValues {
            table: self.table.to_string(),
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn expect(&mut self, want: char) -> Result<(), DumpError> {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(self.malformed(format!("expected '{}', found '{}'", want, c))),
            None => Err(self.malformed(format!("expected '{}', found end of input", want))),
        }
    }

    fn rows(&mut self) -> Result<Vec<Vec<SqlValue>>, DumpError> {
        let mut rows = Vec::new();
        loop {
            rows.push(self.tuple()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(';') | None => return Ok(rows),
                Some(c) => {
                    return Err(self.malformed(format!("expected ',' or ';', found '{}'", c)))
                }
            }
        }
    }

    fn tuple(&mut self) -> Result<Vec<SqlValue>, DumpError> {
        self.expect('(')?;
        let mut values = Vec::new();
        loop {
            values.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(')') => return Ok(values),
                Some(c) => {
                    return Err(self.malformed(format!("expected ',' or ')', found '{}'", c)))
                }
                None => return Err(self.malformed("unclosed tuple")),
            }
        }
    }

    fn value(&mut self) -> Result<SqlValue, DumpError> {
        self.skip_ws();
        match self.peek() {
            Some(q @ ('\'' | '"')) => self.quoted(q).map(SqlValue::Text),
            Some(_) => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c != ',' && c != ')') {
                    self.bump();
                }
                let token = self.src[start..self.pos].trim();
                if token.is_empty() {
                    Err(self.malformed("empty value"))
                } else if token.eq_ignore_ascii_case("NULL") {
                    Ok(SqlValue::Null)
                } else {
                    Ok(SqlValue::Number(token.to_string()))
                }
            }
            None => Err(self.malformed("expected a value, found end of input")),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, DumpError> {
        let start = self.pos;
        let table = self.table;
        let unterminated = || DumpError::UnterminatedLiteral {
            table: table.to_string(),
            offset: start,
        };
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(unterminated()),
                Some('\\') => match self.bump() {
                    None => return Err(unterminated()),
                    Some('0') => out.push('\0'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some('b') => out.push('\u{8}'),
                    Some('Z') => out.push('\u{1a}'),
                    Some(c) => out.push(c),
                },
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.bump();
                        out.push(quote);
                    } else {
                        return Ok(out);
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }
}

/// The mental-health export: declared columns plus every row, aligned to
/// [`TableLayout::data_columns`].
#[derive(Debug, Clone)]
pub struct MentalHealthDump {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
    index: HashMap<String, usize>,
}

impl MentalHealthDump {
    pub fn load<P: AsRef<Path>>(path: P, table: &str) -> Result<Self> {
        let path = path.as_ref();
        let contents = read_lossy(path)?;
        let dump =
            Self::parse(&contents, table).with_context(|| format!("parsing {}", path.display()))?;
        info!(
            path = %path.display(),
            columns = dump.columns.len(),
            rows = dump.rows.len(),
            "read mental health dump"
        );
        Ok(dump)
    }

    pub fn parse(contents: &str, table: &str) -> Result<Self, DumpError> {
        let layout = parse_create_table(contents, table)?;
        let columns = layout.data_columns();
        let index: HashMap<String, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        let mut rows = Vec::new();
        for stmt in parse_inserts(contents, table)? {
            for values in stmt.rows {
                let row_no = rows.len() + 1;
                let aligned = match &stmt.columns {
                    Some(names) => align_named(names, values, &index, columns.len(), table, row_no)?,
                    None => align_positional(&layout, values, table, row_no)?,
                };
                rows.push(aligned);
            }
        }

        Ok(Self {
            table: table.to_string(),
            columns,
            rows,
            index,
        })
    }

    /// Value of `column` in row `row`; `None` when the dump has no such column.
    pub fn get(&self, row: usize, column: &str) -> Option<&SqlValue> {
        let i = *self.index.get(column)?;
        self.rows.get(row).and_then(|r| r.get(i))
    }
}

fn align_positional(
    layout: &TableLayout,
    values: Vec<SqlValue>,
    table: &str,
    row: usize,
) -> Result<Vec<SqlValue>, DumpError> {
    let full = layout.columns.len();
    let data = full - usize::from(layout.identity.is_some());
    if values.len() == full {
        Ok(values
            .into_iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != layout.identity)
            .map(|(_, v)| v)
            .collect())
    } else if values.len() == data {
        Ok(values)
    } else {
        Err(DumpError::ArityMismatch {
            table: table.to_string(),
            row,
            expected: full,
            found: values.len(),
        })
    }
}

fn align_named(
    names: &[String],
    values: Vec<SqlValue>,
    index: &HashMap<String, usize>,
    width: usize,
    table: &str,
    row: usize,
) -> Result<Vec<SqlValue>, DumpError> {
    if names.len() != values.len() {
        return Err(DumpError::ArityMismatch {
            table: table.to_string(),
            row,
            expected: names.len(),
            found: values.len(),
        });
    }
    let mut out = vec![SqlValue::Null; width];
    for (name, value) in names.iter().zip(values) {
        // the identity column and unknown columns have no slot
        if let Some(&i) = index.get(name) {
            out[i] = value;
        }
    }
    Ok(out)
}
