//! Database introspection
//!
//! This module extracts base tables and their columns from a database
//! catalog. Each supported database has its own feature-gated submodule.

use tracing::{debug, info, trace};

use crate::prelude::{Column, GormgenError, Schema, Table};

/// Filters to apply during introspection
#[derive(Debug, Default, Clone)]
pub struct TableFilter {
    /// Only include these tables (if Some)
    pub include: Option<Vec<String>>,
    /// Exclude these tables
    pub exclude: Option<Vec<String>>,
}

impl TableFilter {
    /// Check if a table should be included
    pub fn should_include(&self, table_name: &str) -> bool {
        // Check include list
        if let Some(include) = &self.include {
            if !include.iter().any(|t| t == table_name) {
                return false;
            }
        }

        // Check exclude list
        if let Some(exclude) = &self.exclude {
            if exclude.iter().any(|t| t == table_name) {
                return false;
            }
        }

        true
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_none() && self.exclude.is_none()
    }
}

/// Read access to a database catalog
///
/// Implementations run one query at a time and fail on the first error.
pub trait Catalog {
    /// Names of the base tables in `schema_name`, views excluded
    fn list_base_tables(&mut self, schema_name: &str) -> Result<Vec<String>, GormgenError>;

    /// Columns of one table in catalog order
    fn list_columns(
        &mut self,
        schema_name: &str,
        table_name: &str,
    ) -> Result<Vec<Column>, GormgenError>;

    /// Read every base table of a schema together with its columns
    fn introspect(
        &mut self,
        schema_name: &str,
        filter: &TableFilter,
    ) -> Result<Schema, GormgenError> {
        info!(schema = ?schema_name, "Starting schema introspection");

        let all_table_names = self.list_base_tables(schema_name)?;
        debug!(count = ?all_table_names.len(), "Found base tables");

        let table_names: Vec<String> = all_table_names
            .into_iter()
            .filter(|name| filter.should_include(name))
            .collect();
        if !filter.is_empty() {
            debug!(count = ?table_names.len(), "Tables after filtering");
        }

        let mut tables = Vec::with_capacity(table_names.len());
        for table_name in table_names {
            debug!(table = ?table_name, "Introspecting table");

            let columns = self.list_columns(schema_name, &table_name)?;
            info!(table = ?table_name, columns = ?columns.len(), "Table");
            for column in &columns {
                trace!(
                    table = ?table_name,
                    column = ?column.name,
                    data_type = ?column.data_type,
                    is_nullable = ?column.is_nullable,
                    default = ?column.default,
                    "Column"
                );
            }

            tables.push(Table::new(table_name, columns));
        }

        info!(
            schema = ?schema_name,
            tables = ?tables.len(),
            "Schema introspection complete"
        );

        Ok(Schema {
            name: schema_name.to_string(),
            tables,
        })
    }
}

// Feature-gated database implementations
#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::PostgresCatalog;

#[cfg(test)]
mod tests {
    use super::*;

    /// Catalog backed by fixed table definitions
    struct StaticCatalog {
        tables: Vec<Table>,
        fail_on: Option<String>,
        column_queries: Vec<String>,
    }

    impl StaticCatalog {
        fn new(tables: Vec<Table>) -> Self {
            Self {
                tables,
                fail_on: None,
                column_queries: Vec::new(),
            }
        }
    }

    impl Catalog for StaticCatalog {
        fn list_base_tables(&mut self, _schema_name: &str) -> Result<Vec<String>, GormgenError> {
            Ok(self.tables.iter().map(|t| t.name.clone()).collect())
        }

        fn list_columns(
            &mut self,
            schema_name: &str,
            table_name: &str,
        ) -> Result<Vec<Column>, GormgenError> {
            self.column_queries.push(table_name.to_string());
            if self.fail_on.as_deref() == Some(table_name) {
                return Err(GormgenError::Query {
                    schema: schema_name.to_string(),
                    message: "connection reset".to_string(),
                });
            }
            Ok(self
                .tables
                .iter()
                .find(|t| t.name == table_name)
                .map(|t| t.columns.clone())
                .unwrap_or_default())
        }
    }

    fn sample_tables() -> Vec<Table> {
        vec![
            Table::new(
                "users",
                vec![
                    Column::new("id", "integer", false),
                    Column::new("email", "text", false),
                ],
            ),
            Table::new("audit_log", vec![]),
            Table::new("orders", vec![Column::new("id", "bigint", false)]),
        ]
    }

    #[test]
    fn test_filter_default_includes_all() {
        let filter = TableFilter::default();
        assert!(filter.is_empty());
        assert!(filter.should_include("users"));
    }

    #[test]
    fn test_filter_include_and_exclude() {
        let filter = TableFilter {
            include: Some(vec!["users".to_string(), "orders".to_string()]),
            exclude: Some(vec!["orders".to_string()]),
        };
        assert!(filter.should_include("users"));
        assert!(!filter.should_include("orders"));
        assert!(!filter.should_include("audit_log"));
    }

    #[test]
    fn test_introspect_keeps_catalog_order() {
        let mut catalog = StaticCatalog::new(sample_tables());
        let schema = catalog.introspect("public", &TableFilter::default()).unwrap();

        assert_eq!(schema.name, "public");
        let names: Vec<_> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["users", "audit_log", "orders"]);
        assert_eq!(schema.tables[0].columns[1].name, "email");
    }

    #[test]
    fn test_introspect_zero_column_table() {
        let mut catalog = StaticCatalog::new(sample_tables());
        let schema = catalog.introspect("public", &TableFilter::default()).unwrap();
        assert!(schema.tables[1].columns.is_empty());
    }

    #[test]
    fn test_introspect_skips_filtered_tables() {
        let mut catalog = StaticCatalog::new(sample_tables());
        let filter = TableFilter {
            include: None,
            exclude: Some(vec!["audit_log".to_string()]),
        };
        let schema = catalog.introspect("public", &filter).unwrap();

        assert_eq!(schema.tables.len(), 2);
        assert_eq!(catalog.column_queries, ["users", "orders"]);
    }

    #[test]
    fn test_introspect_aborts_on_query_error() {
        let mut catalog = StaticCatalog::new(sample_tables());
        catalog.fail_on = Some("audit_log".to_string());

        let err = catalog
            .introspect("public", &TableFilter::default())
            .unwrap_err();

        assert!(matches!(err, GormgenError::Query { .. }));
        assert_eq!(catalog.column_queries, ["users", "audit_log"]);
    }
}
