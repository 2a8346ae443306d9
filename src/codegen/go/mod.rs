//! Go code generator
//!
//! Renders one Go struct per table with GORM, JSON and form tags.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use minijinja::Environment;
use tracing::{debug, info, warn};

use crate::codegen::{CodeGenConfig, CodeGenerator, Strictness};
use crate::error::GormgenError;
use crate::schema::{Column, Schema, Table};
use crate::typemap::TypeMap;

/// Emitted for columns whose type has no mapping
const PLACEHOLDER_TYPE: &str = "interface{}";

/// Padding applied to field names and types
const COLUMN_WIDTH: usize = 10;

/// Go code generator
pub struct GoGenerator {
    env: Environment<'static>,
    types: TypeMap,
}

/// One rendered struct field
#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    name: String,
    go_type: String,
    tag: String,
    import: Option<String>,
}

impl GoGenerator {
    pub fn new(types: TypeMap) -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);

        env.add_template("model", include_str!("templates/model.go.jinja"))
            .expect("Failed to load go model template");

        Self { env, types }
    }
}

impl Default for GoGenerator {
    fn default() -> Self {
        Self::new(TypeMap::postgres_to_go())
    }
}

impl CodeGenerator for GoGenerator {
    fn generate(
        &self,
        schema: &Schema,
        config: &CodeGenConfig,
    ) -> Result<Vec<PathBuf>, GormgenError> {
        info!(
            output = ?config.output_path,
            package = ?config.package_name,
            strictness = ?config.strictness,
            "Generating Go models"
        );

        let output_dir = &config.output_path;

        // Reject every unusable name before touching the filesystem
        for table in &schema.tables {
            check_file_stem(&table.name)?;
        }

        fs::create_dir_all(output_dir).map_err(|source| GormgenError::File {
            path: output_dir.clone(),
            source,
        })?;
        debug!(path = ?output_dir, "Created output directory");

        let mut written = Vec::with_capacity(schema.tables.len());
        for table in &schema.tables {
            let code = self.render_table(table, config)?;
            let file_path = write_model(output_dir, table, &code)?;
            debug!(table = ?table.name, path = ?file_path, "Generated model file");
            written.push(file_path);
        }

        info!(tables = written.len(), "Go code generation complete");

        Ok(written)
    }
}

impl GoGenerator {
    /// Render the Go source for a single table
    pub fn render_table(
        &self,
        table: &Table,
        config: &CodeGenConfig,
    ) -> Result<String, GormgenError> {
        let template = self
            .env
            .get_template("model")
            .map_err(|e| GormgenError::CodeGen {
                table: table.name.clone(),
                message: format!("Template error: {}", e),
            })?;

        let fields = self.build_fields(table, config.strictness)?;

        let imports: BTreeSet<&str> = fields.iter().filter_map(|f| f.import.as_deref()).collect();

        let ctx = minijinja::context! {
            package => &config.package_name,
            type_name => table.type_name(),
            imports => imports,
            fields => fields.iter().map(|f| {
                minijinja::context! {
                    name => format!("{:<width$}", f.name, width = COLUMN_WIDTH),
                    go_type => format!("{:<width$}", f.go_type, width = COLUMN_WIDTH),
                    tag => &f.tag,
                }
            }).collect::<Vec<_>>(),
        };

        template.render(ctx).map_err(|e| GormgenError::CodeGen {
            table: table.name.clone(),
            message: format!("Render error: {}", e),
        })
    }

    /// Resolve names, types and tags for every column of a table
    fn build_fields(
        &self,
        table: &Table,
        strictness: Strictness,
    ) -> Result<Vec<Field>, GormgenError> {
        let mut seen: HashMap<String, &str> = HashMap::with_capacity(table.columns.len());
        let mut fields = Vec::with_capacity(table.columns.len());

        for column in &table.columns {
            let field = self.build_field(table, column, strictness)?;

            if let Some(first) = seen.get(&field.name) {
                if strictness == Strictness::Strict {
                    return Err(GormgenError::FieldCollision {
                        table: table.name.clone(),
                        field: field.name,
                        first: first.to_string(),
                        second: column.name.clone(),
                    });
                }
                warn!(
                    table = ?table.name,
                    field = ?field.name,
                    first = ?first,
                    second = ?column.name,
                    "Columns map to the same field name"
                );
            } else {
                seen.insert(field.name.clone(), &column.name);
            }

            fields.push(field);
        }

        Ok(fields)
    }

    fn build_field(
        &self,
        table: &Table,
        column: &Column,
        strictness: Strictness,
    ) -> Result<Field, GormgenError> {
        let (go_type, import) = match self.types.lookup(&column.data_type) {
            Some(target) => (target.name.clone(), target.import.clone()),
            None if strictness == Strictness::Strict => {
                return Err(GormgenError::UnmappedType {
                    table: table.name.clone(),
                    column: column.name.clone(),
                    db_type: column.data_type.clone(),
                });
            }
            None => {
                warn!(
                    table = ?table.name,
                    column = ?column.name,
                    data_type = ?column.data_type,
                    placeholder = PLACEHOLDER_TYPE,
                    "Unmapped column type"
                );
                (PLACEHOLDER_TYPE.to_string(), None)
            }
        };

        for name in [&table.name, &column.name] {
            if name.contains(['"', '`']) {
                if strictness == Strictness::Strict {
                    return Err(GormgenError::CodeGen {
                        table: table.name.clone(),
                        message: format!("'{}' cannot be written into a struct tag", name),
                    });
                }
                warn!(
                    table = ?table.name,
                    column = ?column.name,
                    "Identifier contains a quote or backtick, struct tag will be malformed"
                );
            }
        }

        Ok(Field {
            name: column.field_name(),
            go_type,
            tag: struct_tag(&table.name, column),
            import,
        })
    }
}

/// Build the raw-string struct tag for a column
fn struct_tag(table_name: &str, column: &Column) -> String {
    let not_null = if column.is_nullable { "" } else { "not null;" };
    format!(
        "`gorm:\"column:{col};{not_null}\" json:\"{col}\" form:\"{table}_{col}\"`",
        col = column.name,
        table = table_name,
    )
}

/// Table names become file names, so they must stay inside the output directory
fn check_file_stem(table_name: &str) -> Result<(), GormgenError> {
    let unsafe_name = table_name.is_empty()
        || table_name == "."
        || table_name == ".."
        || table_name.contains(['/', '\\', '\0']);

    if unsafe_name {
        return Err(GormgenError::CodeGen {
            table: table_name.to_string(),
            message: "table name cannot be used as a file name".to_string(),
        });
    }
    Ok(())
}

/// Write (or overwrite) `<output_dir>/<table>.go`
fn write_model(output_dir: &Path, table: &Table, code: &str) -> Result<PathBuf, GormgenError> {
    let file_path = output_dir.join(format!("{}.go", table.name));
    fs::write(&file_path, code).map_err(|source| GormgenError::File {
        path: file_path.clone(),
        source,
    })?;
    Ok(file_path)
}
