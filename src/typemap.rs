//! Database type to Go type mapping
//!
//! The map is built once per run and handed to the generator. Lookups are
//! exact and case-sensitive against the type names reported by
//! `information_schema.columns.data_type`.

use std::collections::BTreeMap;

use crate::error::GormgenError;

/// Go type a database type maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetType {
    /// Type as written in Go source, e.g. `time.Time`
    pub name: String,
    /// Package the type needs imported, e.g. `time`
    pub import: Option<String>,
}

impl TargetType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            import: None,
        }
    }

    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.import = Some(import.into());
        self
    }
}

/// Immutable lookup from catalog type names to Go types
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    entries: BTreeMap<String, TargetType>,
}

impl TypeMap {
    /// The built-in PostgreSQL to Go table
    pub fn postgres_to_go() -> Self {
        let time = || TargetType::new("time.Time").with_import("time");

        let entries = [
            ("bigint", TargetType::new("int64")),
            ("integer", TargetType::new("int")),
            ("smallint", TargetType::new("int")),
            ("double precision", TargetType::new("float64")),
            ("real", TargetType::new("float32")),
            ("numeric", TargetType::new("float64")),
            ("decimal", TargetType::new("float64")),
            ("character varying", TargetType::new("string")),
            ("character", TargetType::new("string")),
            ("text", TargetType::new("string")),
            ("bytea", TargetType::new("[]byte")),
            ("date", time()),
            ("datetime", time()),
            ("timestamp", time()),
            ("timestamp without time zone", time()),
            ("timestamp with time zone", time()),
            ("bit", TargetType::new("uint64")),
            ("boolean", TargetType::new("bool")),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|(db_type, target)| (db_type.to_string(), target))
                .collect(),
        }
    }

    /// Map `db_type` to `target`, replacing any existing entry
    pub fn with_override(mut self, db_type: impl Into<String>, target: TargetType) -> Self {
        self.entries.insert(db_type.into(), target);
        self
    }

    /// Look up the Go type for a catalog type name
    pub fn lookup(&self, db_type: &str) -> Option<&TargetType> {
        self.entries.get(db_type)
    }

    /// Go type name for a catalog type, or an empty string when unmapped
    pub fn map(&self, db_type: &str) -> &str {
        self.lookup(db_type).map(|t| t.name.as_str()).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalog type names in sorted order
    pub fn db_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Parse an override of the form `db_type=go_type` or `db_type=go_type@import`
///
/// ```
/// use gormgen::typemap::parse_override;
///
/// let (db_type, target) = parse_override("uuid=uuid.UUID@github.com/google/uuid").unwrap();
/// assert_eq!(db_type, "uuid");
/// assert_eq!(target.name, "uuid.UUID");
/// assert_eq!(target.import.as_deref(), Some("github.com/google/uuid"));
/// ```
pub fn parse_override(mapping: &str) -> Result<(String, TargetType), GormgenError> {
    let invalid = || {
        GormgenError::Config(format!(
            "Invalid type mapping '{}', expected db_type=go_type[@import]",
            mapping
        ))
    };

    let (db_type, rhs) = mapping.split_once('=').ok_or_else(invalid)?;
    let db_type = db_type.trim();

    let (go_type, import) = match rhs.split_once('@') {
        Some((go_type, import)) => (go_type.trim(), Some(import.trim())),
        None => (rhs.trim(), None),
    };

    if db_type.is_empty() || go_type.is_empty() || import.is_some_and(str::is_empty) {
        return Err(invalid());
    }

    let mut target = TargetType::new(go_type);
    if let Some(import) = import {
        target = target.with_import(import);
    }

    Ok((db_type.to_string(), target))
}
