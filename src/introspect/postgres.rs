use postgres::Client;
use tracing::{error, info, trace};

use super::Catalog;
use crate::config::DbConfig;
use crate::prelude::GormgenError;
use crate::schema::Column;

/// Base tables of one schema, views excluded
const TABLES_SQL: &str = r#"
    SELECT table_name::text AS table_name
    FROM information_schema.tables
    WHERE table_schema = $1
        AND table_type = 'BASE TABLE'
    ORDER BY table_name
"#;

/// Columns of one table in declaration order
const COLUMNS_SQL: &str = r#"
    SELECT
        column_name::text AS column_name,
        data_type::text AS data_type,
        is_nullable::text AS is_nullable,
        column_default::text AS column_default
    FROM information_schema.columns
    WHERE table_schema = $1
        AND table_name = $2
    ORDER BY ordinal_position
"#;

/// PostgreSQL catalog reader over `information_schema`
pub struct PostgresCatalog<'a> {
    client: &'a mut Client,
}

impl<'a> PostgresCatalog<'a> {
    pub fn new(client: &'a mut Client) -> Self {
        Self { client }
    }

    /// Open a plain-text connection described by `config`
    pub fn connect(config: &DbConfig) -> Result<Client, GormgenError> {
        info!(connection = ?config.redacted_connection_string(), "Connecting to PostgreSQL");

        Client::connect(&config.postgres_connection_string(), postgres::NoTls).map_err(|e| {
            error!(error = ?e, "Failed to connect");
            GormgenError::Connection(format!("{}: {}", config.redacted_connection_string(), e))
        })
    }
}

impl Catalog for PostgresCatalog<'_> {
    fn list_base_tables(&mut self, schema_name: &str) -> Result<Vec<String>, GormgenError> {
        trace!(schema = ?schema_name, "Querying base tables");

        let rows = self
            .client
            .query(TABLES_SQL, &[&schema_name])
            .map_err(|e| {
                error!(schema = ?schema_name, error = ?e, "Failed to query tables");
                query_error(schema_name, "Failed to query tables", e)
            })?;

        let tables: Vec<String> = rows.iter().map(|row| row.get("table_name")).collect();
        trace!(tables = ?tables, "Tables found");
        Ok(tables)
    }

    fn list_columns(
        &mut self,
        schema_name: &str,
        table_name: &str,
    ) -> Result<Vec<Column>, GormgenError> {
        trace!(schema = ?schema_name, table = ?table_name, "Querying columns");

        let rows = self
            .client
            .query(COLUMNS_SQL, &[&schema_name, &table_name])
            .map_err(|e| {
                error!(
                    schema = ?schema_name,
                    table = ?table_name,
                    error = ?e,
                    "Failed to query columns"
                );
                query_error(
                    schema_name,
                    &format!("Failed to query columns for table '{}'", table_name),
                    e,
                )
            })?;

        let columns = rows
            .iter()
            .map(|row| {
                let is_nullable: String = row.get("is_nullable");
                Column {
                    name: row.get("column_name"),
                    data_type: row.get("data_type"),
                    is_nullable: parse_is_nullable(&is_nullable),
                    default: row.get("column_default"),
                }
            })
            .collect();

        Ok(columns)
    }
}

/// A dropped connection is a connection error, anything else a query error
fn query_error(schema_name: &str, context: &str, e: postgres::Error) -> GormgenError {
    if e.is_closed() {
        GormgenError::Connection(format!("{}: {}", context, e))
    } else {
        GormgenError::Query {
            schema: schema_name.to_string(),
            message: format!("{}: {}", context, e),
        }
    }
}

/// `information_schema` reports nullability as `YES` / `NO`
fn parse_is_nullable(value: &str) -> bool {
    value != "NO"
}
