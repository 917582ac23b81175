//! Shared read-mostly resources a traversal resolves against.
//!
//! Loaders populate this before any formula referencing the contents is
//! checked or evaluated; the three passes only ever read it. Names are
//! case-insensitive, matching loader conventions.

use std::sync::Arc;

use charforge_common::{Format, FormulaError, FormulaErrorKind};
use rustc_hash::FxHashMap;

use crate::table::{DataTable, TableColumn, TableFormat};

#[derive(Debug, Default)]
pub struct Resources {
    tables: FxHashMap<String, Arc<DataTable>>,
    columns: FxHashMap<String, TableColumn>,
    variables: FxHashMap<String, Format>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_table(&mut self, table: Arc<DataTable>) -> Result<(), FormulaError> {
        let key = table.name().to_ascii_lowercase();
        if self.tables.contains_key(&key) {
            return Err(FormulaError::new(FormulaErrorKind::Registry)
                .with_message(format!("table '{}' is already registered", table.name())));
        }
        self.tables.insert(key, table);
        Ok(())
    }

    pub fn register_column(&mut self, column: TableColumn) -> Result<(), FormulaError> {
        let key = column.name().to_ascii_lowercase();
        if self.columns.contains_key(&key) {
            return Err(FormulaError::new(FormulaErrorKind::Registry)
                .with_message(format!("column '{}' is already declared", column.name())));
        }
        self.columns.insert(key, column);
        Ok(())
    }

    pub fn define_variable(
        &mut self,
        name: impl Into<String>,
        format: Format,
    ) -> Result<(), FormulaError> {
        let name = name.into();
        let key = name.to_ascii_lowercase();
        if self.variables.contains_key(&key) {
            return Err(FormulaError::new(FormulaErrorKind::Registry)
                .with_message(format!("variable '{name}' is already defined")));
        }
        self.variables.insert(key, format);
        Ok(())
    }

    pub fn resolve_table(&self, name: &str) -> Option<Arc<DataTable>> {
        self.tables.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Semantics-time resolution: the table's declared format without its data.
    pub fn resolve_table_format(&self, name: &str) -> Option<TableFormat> {
        self.tables
            .get(&name.to_ascii_lowercase())
            .map(|t| t.table_format())
    }

    pub fn resolve_column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.get(&name.to_ascii_lowercase())
    }

    pub fn variable_format(&self, name: &str) -> Option<Format> {
        self.variables.get(&name.to_ascii_lowercase()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charforge_common::Value;

    fn small_table(name: &str) -> Arc<DataTable> {
        Arc::new(
            DataTable::new(
                name,
                vec![
                    TableColumn::new("Name", Format::Text),
                    TableColumn::new("Cost", Format::Number),
                ],
                vec![vec![Value::Text("Sword".into()), Value::Number(15.0)]],
            )
            .unwrap(),
        )
    }

    #[test]
    fn table_names_are_case_insensitive() {
        let mut res = Resources::new();
        res.register_table(small_table("Equipment")).unwrap();
        assert!(res.resolve_table("EQUIPMENT").is_some());
        assert!(res.resolve_table_format("equipment").is_some());
        assert!(res.resolve_table("armory").is_none());
    }

    #[test]
    fn duplicate_registrations_are_refused() {
        let mut res = Resources::new();
        res.register_table(small_table("Equipment")).unwrap();
        let err = res.register_table(small_table("equipment")).unwrap_err();
        assert_eq!(err.kind, FormulaErrorKind::Registry);

        res.register_column(TableColumn::new("Cost", Format::Number))
            .unwrap();
        assert!(
            res.register_column(TableColumn::new("COST", Format::Number))
                .is_err()
        );

        res.define_variable("STR", Format::Number).unwrap();
        assert!(res.define_variable("str", Format::Number).is_err());
    }

    #[test]
    fn variable_formats_resolve() {
        let mut res = Resources::new();
        res.define_variable("CharLevel", Format::Number).unwrap();
        assert_eq!(res.variable_format("charlevel"), Some(Format::Number));
        assert_eq!(res.variable_format("missing"), None);
    }
}
