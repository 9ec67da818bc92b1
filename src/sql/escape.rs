// src/sql/escape.rs

/// Render a free-text value as a MySQL string literal.
///
/// Absent and empty values become `NULL`. Otherwise single quotes are
/// doubled, backslashes are doubled, and the result is wrapped in `'...'`.
pub fn escape_literal(value: Option<&str>) -> String {
    match value {
        None | Some("") => "NULL".to_string(),
        Some(v) => {
            let mut out = String::with_capacity(v.len() + 2);
            out.push('\'');
            for ch in v.chars() {
                match ch {
                    '\'' => out.push_str("''"),
                    '\\' => out.push_str("\\\\"),
                    c => out.push(c),
                }
            }
            out.push('\'');
            out
        }
    }
}

/// Quote a table or column name with backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
