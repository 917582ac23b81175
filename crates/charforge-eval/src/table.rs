//! Typed lookup tables.
//!
//! A `DataTable` is built once by a loader and immutable afterwards. Column 0
//! holds the lookup keys and fixes the key format for the whole table; every
//! other column shares the table's declared result format. Duplicate keys are
//! permitted; `has_row` and `lookup_exact` resolve to the first-inserted
//! matching row.

use charforge_common::{Format, FormulaError, FormulaErrorKind, Value};

/// One column: a name plus the format of its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    name: String,
    format: Format,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, format: Format) -> Self {
        Self {
            name: name.into(),
            format,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

/// The format of a table reference: what its keys are and what its result
/// columns hold. This is what the semantics pass resolves a table argument
/// to, before any row data is touched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TableFormat {
    pub key: Format,
    pub result: Format,
}

#[derive(Debug, Clone)]
pub struct DataTable {
    name: String,
    columns: Vec<TableColumn>,
    rows: Vec<Vec<Value>>,
}

impl DataTable {
    /// Build a table, validating its shape up front so lookups never have to.
    ///
    /// Rejected: fewer than two columns, duplicate column names, non-key
    /// columns with differing formats, ragged rows, and cells outside their
    /// column's format.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<TableColumn>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, FormulaError> {
        let name = name.into();
        if columns.len() < 2 {
            return Err(FormulaError::new(FormulaErrorKind::Table).with_message(format!(
                "table '{name}' needs a key column and at least one result column"
            )));
        }
        for (i, col) in columns.iter().enumerate() {
            if columns[..i]
                .iter()
                .any(|c| c.name().eq_ignore_ascii_case(col.name()))
            {
                return Err(FormulaError::new(FormulaErrorKind::Table).with_message(format!(
                    "table '{name}' declares column '{}' more than once",
                    col.name()
                )));
            }
        }
        let result = columns[1].format();
        if let Some(col) = columns[1..].iter().find(|c| c.format() != result) {
            return Err(FormulaError::new(FormulaErrorKind::Table).with_message(format!(
                "table '{name}' result columns must share one format, column '{}' is {} not {}",
                col.name(),
                col.format(),
                result
            )));
        }
        for (r, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(FormulaError::new(FormulaErrorKind::Table).with_message(format!(
                    "table '{name}' row {r} has {} cells, expected {}",
                    row.len(),
                    columns.len()
                )));
            }
            for (cell, col) in row.iter().zip(&columns) {
                if !col.format().accepts(cell) {
                    return Err(FormulaError::new(FormulaErrorKind::Table).with_message(format!(
                        "table '{name}' row {r}, column '{}': '{cell}' is not {}",
                        col.name(),
                        col.format()
                    )));
                }
            }
        }
        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_format(&self) -> Format {
        self.columns[0].format()
    }

    pub fn result_format(&self) -> Format {
        self.columns[1].format()
    }

    pub fn table_format(&self) -> TableFormat {
        TableFormat {
            key: self.key_format(),
            result: self.result_format(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.name().eq_ignore_ascii_case(name))
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name().eq_ignore_ascii_case(name))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether any row's key cell equals `key`.
    pub fn has_row(&self, key: &Value) -> bool {
        self.rows.iter().any(|row| &row[0] == key)
    }

    /// The value at (first row whose key equals `key`, named column).
    pub fn lookup_exact(&self, key: &Value, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.iter().find(|row| &row[0] == key).map(|row| &row[col])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equipment() -> DataTable {
        DataTable::new(
            "Equipment",
            vec![
                TableColumn::new("Name", Format::Text),
                TableColumn::new("Cost", Format::Number),
                TableColumn::new("Weight", Format::Number),
            ],
            vec![
                vec!["Sword".into(), 15.0.into(), 4.0.into()],
                vec!["Axe".into(), 10.0.into(), 6.0.into()],
                vec!["Sword".into(), 99.0.into(), 1.0.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn lookup_exact_hits() {
        let t = equipment();
        assert_eq!(t.lookup_exact(&"Axe".into(), "Cost"), Some(&Value::Number(10.0)));
        assert_eq!(t.lookup_exact(&"Axe".into(), "Weight"), Some(&Value::Number(6.0)));
    }

    #[test]
    fn duplicate_keys_resolve_to_first_inserted_row() {
        let t = equipment();
        assert!(t.has_row(&"Sword".into()));
        assert_eq!(t.lookup_exact(&"Sword".into(), "Cost"), Some(&Value::Number(15.0)));
    }

    #[test]
    fn missing_key_and_column_return_none() {
        let t = equipment();
        assert!(!t.has_row(&"Halberd".into()));
        assert_eq!(t.lookup_exact(&"Halberd".into(), "Cost"), None);
        assert_eq!(t.lookup_exact(&"Sword".into(), "Price"), None);
    }

    #[test]
    fn column_lookup_is_case_insensitive() {
        let t = equipment();
        assert_eq!(t.column("cost").unwrap().format(), Format::Number);
    }

    #[test]
    fn formats_come_from_columns() {
        let t = equipment();
        assert_eq!(t.key_format(), Format::Text);
        assert_eq!(t.result_format(), Format::Number);
        assert_eq!(
            t.table_format(),
            TableFormat {
                key: Format::Text,
                result: Format::Number
            }
        );
    }

    #[test]
    fn construction_rejects_duplicate_columns() {
        let err = DataTable::new(
            "T",
            vec![
                TableColumn::new("Name", Format::Text),
                TableColumn::new("Cost", Format::Number),
                TableColumn::new("cost", Format::Number),
            ],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err.kind, FormulaErrorKind::Table);
    }

    #[test]
    fn construction_rejects_mixed_result_formats() {
        let err = DataTable::new(
            "T",
            vec![
                TableColumn::new("Name", Format::Text),
                TableColumn::new("Cost", Format::Number),
                TableColumn::new("Stocked", Format::Boolean),
            ],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err.kind, FormulaErrorKind::Table);
    }

    #[test]
    fn construction_rejects_ragged_and_mistyped_rows() {
        let cols = || {
            vec![
                TableColumn::new("Name", Format::Text),
                TableColumn::new("Cost", Format::Number),
            ]
        };
        let ragged = DataTable::new("T", cols(), vec![vec!["Sword".into()]]);
        assert!(ragged.is_err());
        let mistyped = DataTable::new("T", cols(), vec![vec!["Sword".into(), "free".into()]]);
        assert!(mistyped.is_err());
    }

    #[test]
    fn construction_rejects_key_only_table() {
        let err = DataTable::new("T", vec![TableColumn::new("Name", Format::Text)], vec![]);
        assert!(err.is_err());
    }
}
