// src/sql/insert.rs

use anyhow::{bail, Result};

use super::escape::quote_ident;

/// Render a single-row `INSERT` with an explicit column list.
///
/// `values` must already be SQL literals (see [`super::escape_literal`]).
pub fn render_insert<C, V>(table: &str, columns: &[C], values: &[V]) -> Result<String>
where
    C: AsRef<str>,
    V: AsRef<str>,
{
    if columns.len() != values.len() {
        bail!(
            "insert into `{}`: {} columns but {} values",
            table,
            columns.len(),
            values.len()
        );
    }

    let mut sql = String::with_capacity(32 + columns.len() * 12 + values.len() * 8);
    sql.push_str("INSERT INTO ");
    sql.push_str(&quote_ident(table));
    sql.push_str(" (");
    for (i, col) in columns.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&quote_ident(col.as_ref()));
    }
    sql.push_str(") VALUES (");
    for (i, val) in values.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(val.as_ref());
    }
    sql.push_str(");");
    Ok(sql)
}
