//! # gormgen
//!
//! Generate Go model structs with GORM tags from a PostgreSQL schema
//!
//! This crate provides a CLI tool and library that reads the database catalog
//! and writes one Go struct per base table.

pub mod codegen;
pub mod config;
pub mod error;
pub mod introspect;
pub mod schema;
pub mod typemap;

pub mod prelude {
    pub use crate::codegen::{CodeGenConfig, CodeGenerator, GoGenerator, Strictness};
    pub use crate::config::DbConfig;
    pub use crate::error::GormgenError;
    pub use crate::introspect::{Catalog, TableFilter};
    pub use crate::schema::{to_pascal_case, Column, Schema, Table};
    pub use crate::typemap::{TargetType, TypeMap};
}

#[cfg(feature = "postgres")]
pub use introspect::PostgresCatalog;
