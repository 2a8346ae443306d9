//! Schema data structures
//!
//! These types represent the catalog view of a database and form the contract
//! between introspection (produces) and code generation (consumes).

/// A complete database schema
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub name: String,
    pub tables: Vec<Table>,
}

/// Database base table
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    /// Columns in catalog order
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Returns the PascalCase struct name for this table
    pub fn type_name(&self) -> String {
        to_pascal_case(&self.name)
    }
}

/// A table column as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Catalog type name, e.g. `character varying`
    pub data_type: String,
    pub is_nullable: bool,
    /// Default expression, if the column has one
    pub default: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_nullable,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Returns the PascalCase Go field name for this column
    pub fn field_name(&self) -> String {
        to_pascal_case(&self.name)
    }
}

/// Convert a snake_case identifier to PascalCase
///
/// Underscores and spaces split words and are dropped. The first letter of
/// every word is upper-cased and the rest is left as is, so the transform is
/// idempotent.
pub fn to_pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c == '_' || c == ' ' {
            at_word_start = true;
            continue;
        }
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }

    out
}
