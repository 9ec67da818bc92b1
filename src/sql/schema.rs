// src/sql/schema.rs

use crate::catalog::ServiceCatalog;

use super::escape::quote_ident;

pub const DIRECTORY_TYPE_COLUMN: &str = "directory_type";
/// Auto-increment key; never part of an `INSERT` column list.
pub const IDENTITY_COLUMN: &str = "id";

/// Column layout of the unified facilities table: `directory_type`, the
/// base descriptive columns, then every service code.
#[derive(Debug, Clone)]
pub struct FacilitySchema {
    table: String,
    base_columns: Vec<String>,
    catalog: ServiceCatalog,
}

impl FacilitySchema {
    pub fn new(table: impl Into<String>, base_columns: Vec<String>, catalog: ServiceCatalog) -> Self {
        Self {
            table: table.into(),
            base_columns,
            catalog,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn base_columns(&self) -> &[String] {
        &self.base_columns
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Data columns in insert order (the identity key is not included).
    pub fn columns(&self) -> Vec<&str> {
        std::iter::once(DIRECTORY_TYPE_COLUMN)
            .chain(self.base_columns.iter().map(String::as_str))
            .chain(self.catalog.codes().iter().map(String::as_str))
            .collect()
    }

    /// `1 + |base| + |codes|`
    pub fn width(&self) -> usize {
        1 + self.base_columns.len() + self.catalog.len()
    }

    /// `DROP TABLE` + `CREATE TABLE` lines for a MySQL target.
    pub fn render_ddl(&self) -> Vec<String> {
        let table = quote_ident(&self.table);
        let mut lines = Vec::with_capacity(self.width() + 8);

        lines.push(format!("DROP TABLE IF EXISTS {};", table));
        lines.push(String::new());
        lines.push(format!("CREATE TABLE {} (", table));
        lines.push(format!(
            "  {} int(11) NOT NULL AUTO_INCREMENT,",
            quote_ident(IDENTITY_COLUMN)
        ));
        lines.push(format!(
            "  {} varchar(50) DEFAULT NULL,",
            quote_ident(DIRECTORY_TYPE_COLUMN)
        ));
        for col in self.base_columns.iter().chain(self.catalog.codes()) {
            lines.push(format!("  {} text DEFAULT NULL,", quote_ident(col)));
        }
        lines.push(format!("  PRIMARY KEY ({})", quote_ident(IDENTITY_COLUMN)));
        lines.push(") ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn schema() -> FacilitySchema {
        let catalog = ServiceCatalog::build(&["SA", "MH"], &["DT", "MH"]);
        FacilitySchema::new(
            "facilities",
            vec!["name1".to_string(), "city".to_string()],
            catalog,
        )
    }

    #[test]
    fn columns_are_discriminator_base_then_codes() {
        let s = schema();
        assert_eq!(
            s.columns(),
            vec!["directory_type", "name1", "city", "SA", "MH", "DT"]
        );
        assert_eq!(s.width(), 6);
    }

    #[test]
    fn ddl_declares_every_column_once_in_order() {
        let s = schema();
        let ddl = s.render_ddl().join("\n");
        assert!(ddl.starts_with("DROP TABLE IF EXISTS `facilities`;"));
        assert!(ddl.contains("`id` int(11) NOT NULL AUTO_INCREMENT,"));
        assert!(ddl.ends_with(") ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;"));

        let decl = Regex::new(r"(?m)^  `(\w+)` (?:text|varchar\(50\)) DEFAULT NULL,$").unwrap();
        let declared: Vec<&str> = decl
            .captures_iter(&ddl)
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(declared, s.columns());
    }

    #[test]
    fn last_column_is_followed_by_primary_key() {
        let lines = schema().render_ddl();
        let n = lines.len();
        assert_eq!(lines[n - 3], "  `DT` text DEFAULT NULL,");
        assert_eq!(lines[n - 2], "  PRIMARY KEY (`id`)");
    }
}
