//! fbdump CLI - dump a Firebird database as portable SQL.

use clap::Parser;
use fbdump::{source, Config, DumpError, Exporter, NullPolicy};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "fbdump")]
#[command(about = "Dump a Firebird database as CREATE TABLE and INSERT statements")]
#[command(version)]
struct Cli {
    /// Path to an optional YAML configuration file
    #[arg(short, long, env = "FBDUMP_CONFIG")]
    config: Option<PathBuf>,

    /// Database path or alias (overrides DATABASE)
    #[arg(long)]
    database: Option<String>,

    /// Username (overrides USER)
    #[arg(long)]
    user: Option<String>,

    /// Password (overrides PASSWORD)
    #[arg(long)]
    password: Option<String>,

    /// Server host (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Connection character set (overrides CHARSET)
    #[arg(long)]
    charset: Option<String>,

    /// Only export these tables (repeatable)
    #[arg(long = "table", value_name = "TABLE")]
    tables: Vec<String>,

    /// Skip these tables (repeatable)
    #[arg(long = "exclude", value_name = "TABLE")]
    exclude: Vec<String>,

    /// Emit CREATE TABLE for tables that have no rows
    #[arg(long)]
    include_empty_tables: bool,

    /// Keep zero, empty strings and FALSE as values instead of NULL
    #[arg(long)]
    strict_nulls: bool,

    /// Print the export summary as JSON to stdout after the statements
    #[arg(long)]
    output_json: bool,

    /// Print progress updates as JSON lines to stderr
    #[arg(long)]
    progress: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), DumpError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => Config::default(),
    };
    let config = apply_overrides(config.with_env()?, &cli);
    config.validate()?;

    let conn = source::connect(&config.source).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = Exporter::new(conn, config.export)
        .with_progress(cli.progress)
        .run(&mut out)
        .await?;

    if cli.output_json {
        writeln!(out, "{}", summary.to_json()?)?;
    } else {
        eprintln!("\nExport {}!", summary.status.replace('_', " "));
        eprintln!("  Run ID: {}", summary.run_id);
        eprintln!("  Duration: {:.2}s", summary.duration_seconds);
        eprintln!(
            "  Tables: {}/{} ({} empty)",
            summary.tables_exported, summary.tables_total, summary.tables_empty
        );
        eprintln!("  Rows: {}", summary.rows_exported);
        eprintln!("  Statements: {}", summary.statements_written);
        if !summary.failed_tables.is_empty() {
            eprintln!("  Failed tables: {:?}", summary.failed_tables);
        }
    }

    Ok(())
}

/// Command-line values win over everything loaded so far.
fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(ref database) = cli.database {
        config.source.database = database.clone();
    }
    if let Some(ref user) = cli.user {
        config.source.user = user.clone();
    }
    if let Some(ref password) = cli.password {
        config.source.password = password.clone();
    }
    if let Some(ref host) = cli.host {
        config.source.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.source.port = port;
    }
    if let Some(ref charset) = cli.charset {
        config.source.charset = charset.clone();
    }
    if !cli.tables.is_empty() {
        config.export.include_tables = cli.tables.clone();
    }
    config.export.exclude_tables.extend(cli.exclude.iter().cloned());
    if cli.include_empty_tables {
        config.export.include_empty_tables = true;
    }
    if cli.strict_nulls {
        config.export.null_policy = NullPolicy::Strict;
    }
    config
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the SQL; everything else goes to stderr
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
