use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use smiley_core::{DEFAULT_GENERATED_AT, DecodeResult, SchemaRegistry, SerialReport, decode_report};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("SMILEY_BUILD_COMMIT"),
    ", ",
    env!("SMILEY_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  smiley decode 2205M1A2055001\n  smiley lookup 1801A05001 --json --pretty\n  smiley decode --schema schemas.json < serials.txt\n  smiley families";

#[derive(Parser, Debug)]
#[command(name = "smiley")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode Smiley device serial numbers into model and production details.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Log schema loading and dispatch decisions (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Schema document (JSON); the bundled schema is used when omitted
    #[arg(long, env = "SMILEY_SCHEMA", value_name = "PATH")]
    schema: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode serial numbers; reads one serial per line from stdin when none are given.
    #[command(alias = "lookup")]
    #[command(after_help = EXAMPLES)]
    Decode {
        /// Serial numbers to decode (case-insensitive)
        serials: Vec<String>,

        #[command(flatten)]
        schema: SchemaArgs,

        /// Emit one JSON report per serial
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long, requires = "json", conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long, requires = "json")]
        compact: bool,

        /// Do not list decode errors
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if any serial has decode errors
        #[arg(long)]
        strict: bool,
    },
    /// List device families and their serial formats.
    Families {
        #[command(flatten)]
        schema: SchemaArgs,
    },
}

#[derive(Debug, Clone, Copy)]
struct DecodeOptions {
    json: bool,
    pretty: bool,
    quiet: bool,
    strict: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            serials,
            schema,
            json,
            pretty,
            compact: _,
            quiet,
            strict,
        } => cmd_decode(
            serials,
            schema.schema.as_deref(),
            DecodeOptions {
                json,
                pretty,
                quiet,
                strict,
            },
        ),
        Commands::Families { schema } => cmd_families(schema.schema.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_decode(
    serials: Vec<String>,
    schema: Option<&Path>,
    options: DecodeOptions,
) -> Result<(), CliError> {
    let registry = load_registry(schema)?;
    let generated_at = now_rfc3339();
    let mut failed = 0usize;

    if serials.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() && !options.json {
            eprintln!("Enter serial numbers, one per line (Ctrl-D to finish).");
        }
        for line in stdin.lock().lines() {
            let line = line.context("Failed to read serial from stdin")?;
            let serial = line.trim();
            if serial.is_empty() {
                continue;
            }
            if lookup(serial, &registry, &generated_at, options)? {
                failed += 1;
            }
        }
    } else {
        for serial in &serials {
            if lookup(serial.trim(), &registry, &generated_at, options)? {
                failed += 1;
            }
        }
    }

    if options.strict && failed > 0 {
        return Err(CliError::new(
            format!("{failed} serial(s) decoded with errors"),
            Some("run without --strict to accept partial results".to_string()),
        ));
    }
    Ok(())
}

/// Decodes and prints one serial; returns whether it produced decode errors.
fn lookup(
    serial: &str,
    registry: &SchemaRegistry,
    generated_at: &str,
    options: DecodeOptions,
) -> Result<bool, CliError> {
    let mut report = decode_report(serial, registry);
    report.generated_at = generated_at.to_string();
    info!(
        "{} -> {} ({} error(s))",
        report.normalized,
        report.result.schema_name.as_deref().unwrap_or("no match"),
        report.errors.len()
    );

    if options.json {
        println!("{}", serialize_report(&report, options.pretty)?);
    } else {
        print_report(&report);
    }
    if !options.quiet && !report.errors.is_empty() {
        print_decode_errors(&report.errors);
    }
    Ok(!report.errors.is_empty())
}

fn serialize_report(report: &SerialReport, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn device_rows(result: &DecodeResult) -> [(&'static str, Option<&str>); 5] {
    [
        ("Type", result.device.as_deref()),
        ("Network", result.network.as_deref()),
        ("Model/Generation", result.generation.as_deref()),
        ("Hardware", result.hardware.as_deref()),
        ("Radio Chipset", result.radio.as_deref()),
    ]
}

fn production_rows(result: &DecodeResult) -> [(&'static str, Option<&str>); 4] {
    [
        ("Year", result.year.as_deref()),
        ("Week", result.week.as_deref()),
        ("Device Number", result.sequence.as_deref()),
        ("Changelog", result.changelog.as_deref()),
    ]
}

fn print_report(report: &SerialReport) {
    let result = &report.result;
    match result.schema_name.as_deref() {
        Some(family) => println!("Serial {} ({})", report.normalized, family),
        None => println!("Serial {}", report.normalized),
    }
    if result.is_empty() {
        return;
    }
    print_section("Device Information", &device_rows(result));
    print_section("Production Information", &production_rows(result));
}

fn print_section(title: &str, rows: &[(&str, Option<&str>)]) {
    println!("{title}");
    for (label, value) in rows {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
}

fn print_decode_errors(errors: &[String]) {
    eprintln!("Decode errors:");
    for error in errors {
        eprintln!("  {error}");
    }
}

fn cmd_families(schema: Option<&Path>) -> Result<(), CliError> {
    let registry = load_registry(schema)?;
    for (family, layout) in registry.families() {
        println!("{family}");
        for line in layout.format_descriptor().lines() {
            println!("  {line}");
        }
        let types = layout
            .type_codes()
            .iter()
            .map(|(code, name)| format!("{code} = {name}"))
            .collect::<Vec<_>>();
        println!("  types: {}", types.join(", "));
    }
    Ok(())
}

fn load_registry(schema: Option<&Path>) -> Result<SchemaRegistry, CliError> {
    let Some(path) = schema else {
        debug!("using bundled schema");
        return SchemaRegistry::bundled()
            .context("bundled schema is invalid")
            .map_err(Into::into);
    };
    if !path.is_file() {
        return Err(CliError::new(
            format!("schema file not found: {}", path.display()),
            Some("pass --schema <PATH> or set SMILEY_SCHEMA to a JSON schema file".to_string()),
        ));
    }
    SchemaRegistry::load_file(path).map_err(|err| {
        CliError::new(
            format!("invalid schema {}: {err}", path.display()),
            Some("every device family needs an entry with its code tables".to_string()),
        )
    })
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| DEFAULT_GENERATED_AT.to_string())
}
