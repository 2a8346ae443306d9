use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use gormgen::codegen::{CodeGenConfig, CodeGenerator, GoGenerator, Strictness};
use gormgen::config::DbConfig;
use gormgen::introspect::TableFilter;
use gormgen::schema::Schema;
use gormgen::typemap::{parse_override, TypeMap};

#[derive(Parser, Debug)]
#[command(name = "gormgen")]
#[command(version, about = "Generate Go GORM models from a PostgreSQL schema", long_about = None)]
struct Cli {
    /// Output directory, one file per table
    #[arg(short, long, default_value = "out/models")]
    output: PathBuf,

    /// Database schema to introspect
    #[arg(long, default_value = "public")]
    schema: String,

    /// Go package name for the generated files
    #[arg(long, default_value = "models")]
    package: String,

    /// Path to .env file for connection config
    #[arg(long, default_value = "./.env")]
    env_file: PathBuf,

    /// Comma-separated list of tables to include (default: all)
    #[arg(long, value_delimiter = ',')]
    tables: Option<Vec<String>>,

    /// Comma-separated list of tables to exclude
    #[arg(long, value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Extra type mapping, e.g. `uuid=uuid.UUID@github.com/google/uuid` (repeatable)
    #[arg(long = "map", value_name = "DB_TYPE=GO_TYPE[@IMPORT]")]
    mappings: Vec<String>,

    /// Fail on unmapped column types and colliding field names
    #[arg(long)]
    strict: bool,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(e) = run() {
        error!(error = ?e, "Fatal error");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("gormgen v{}", env!("CARGO_PKG_VERSION"));
    info!(
        output = ?cli.output,
        schema = ?cli.schema,
        package = ?cli.package,
        strict = ?cli.strict,
        "Starting model generation"
    );

    // Load configuration
    let config = DbConfig::load(&cli.env_file).context("Failed to load database configuration")?;
    debug!(connection = ?config.redacted_connection_string(), "Loaded configuration");

    let mut types = TypeMap::postgres_to_go();
    for mapping in &cli.mappings {
        let (db_type, target) = parse_override(mapping)?;
        debug!(db_type = ?db_type, go_type = ?target.name, import = ?target.import, "Type override");
        types = types.with_override(db_type, target);
    }

    // Build table filter
    let filter = TableFilter {
        include: cli.tables,
        exclude: cli.exclude,
    };

    if !filter.is_empty() {
        debug!(filter = ?filter, "Table filter configured");
    }

    let schema = introspect_postgres(&config, &cli.schema, &filter)?;

    if schema.tables.is_empty() {
        warn!("No tables found after filtering");
        return Ok(());
    }

    info!(tables = ?schema.tables.len(), "Schema ready for code generation");

    let strictness = if cli.strict {
        Strictness::Strict
    } else {
        Strictness::Lenient
    };
    let codegen_config = CodeGenConfig::new(cli.output)
        .with_package_name(cli.package)
        .with_strictness(strictness);
    debug!(codegen_config = ?codegen_config, "Code generation config");

    let written = GoGenerator::new(types)
        .generate(&schema, &codegen_config)
        .context("Failed to generate models")?;

    info!(files = ?written.len(), output = ?codegen_config.output_path, "Done");

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[cfg(feature = "postgres")]
fn introspect_postgres(config: &DbConfig, schema_name: &str, filter: &TableFilter) -> Result<Schema> {
    use gormgen::introspect::Catalog;
    use gormgen::PostgresCatalog;

    let mut client = PostgresCatalog::connect(config).with_context(|| {
        format!(
            "Failed to connect to PostgreSQL at {}",
            config.redacted_connection_string()
        )
    })?;

    info!("Connected to database");

    let schema = PostgresCatalog::new(&mut client)
        .introspect(schema_name, filter)
        .context("Failed to introspect schema")?;

    Ok(schema)
}

#[cfg(not(feature = "postgres"))]
fn introspect_postgres(
    _config: &DbConfig,
    _schema_name: &str,
    _filter: &TableFilter,
) -> Result<Schema> {
    anyhow::bail!("PostgreSQL support not enabled. Rebuild with --features postgres")
}
