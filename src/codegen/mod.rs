//! Code generation
//!
//! This module turns an introspected schema into Go model source files.

use std::path::PathBuf;

use crate::prelude::{GormgenError, Schema};

pub mod go;

pub use go::GoGenerator;

/// How the generator reacts to unmapped types and field name collisions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Log a warning and keep going
    #[default]
    Lenient,
    /// Fail the run
    Strict,
}

/// Configuration for code generation
#[derive(Debug, Clone)]
pub struct CodeGenConfig {
    /// Output directory, one file per table
    pub output_path: PathBuf,
    /// Go package declared at the top of every file
    pub package_name: String,
    pub strictness: Strictness,
}

impl CodeGenConfig {
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            output_path,
            package_name: "models".to_string(),
            strictness: Strictness::default(),
        }
    }

    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }
}

/// Trait for language-specific code generators
pub trait CodeGenerator {
    /// Generate code for the given schema, returning the files written
    fn generate(&self, schema: &Schema, config: &CodeGenConfig)
        -> Result<Vec<PathBuf>, GormgenError>;
}
