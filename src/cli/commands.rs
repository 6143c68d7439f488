//! CLI command implementations
//!
//! Every command boots the same way: load configuration (or defaults), set
//! the log level, build the registry from the built-in schemas plus any
//! schema files in `schema_dir`. Commands then read stdin and write one JSON
//! line per result to stdout.

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::json;

use crate::observability::{log_event_with_fields, Event, Logger, MetricsSnapshot};
use crate::schema::{SchemaError, SchemaRegistry, SchemaValidator};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, read_requests, write_error, write_record, write_rejection, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate { kind, config, batch } => validate(&kind, config.as_deref(), batch),
        Command::Schemas { config, export } => schemas(config.as_deref(), export.as_deref()),
        Command::Collection { kind, config } => collection(&kind, config.as_deref()),
    }
}

/// Load configuration and build the schema registry
pub fn boot(config_path: Option<&Path>) -> CliResult<(Config, SchemaRegistry)> {
    let config = Config::load_or_default(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let source = config_path.map_or_else(|| "<defaults>".to_string(), |p| p.display().to_string());
    log_event_with_fields(Event::ConfigLoaded, &[("source", source.as_str())]);

    let mut registry = SchemaRegistry::with_builtins();
    if let Some(dir) = config.schema_path() {
        let loaded = registry.load_dir(dir)?.to_string();
        let total = registry.len().to_string();
        let dir = dir.display().to_string();
        log_event_with_fields(
            Event::SchemasLoaded,
            &[("dir", dir.as_str()), ("loaded", loaded.as_str()), ("total", total.as_str())],
        );
    }

    Ok((config, registry))
}

/// Validate records from stdin.
///
/// Fails when the kind is unknown, the input cannot be read, or any record
/// was rejected. Rejections are still written to stdout first.
pub fn validate(kind: &str, config_path: Option<&Path>, batch: bool) -> CliResult<()> {
    let (config, registry) = boot(config_path)?;
    let validator = SchemaValidator::new(&registry).with_policy(config.extra_fields);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let snapshot = validate_stream(&validator, kind, batch, stdin.lock(), &mut stdout.lock())?;

    if snapshot.records_rejected > 0 {
        return Err(CliError::rejected(snapshot.records_rejected, snapshot.records_seen()));
    }
    Ok(())
}

/// Validate one document, or one per line in batch mode, writing a result
/// line for each.
pub fn validate_stream<R: BufRead, W: Write>(
    validator: &SchemaValidator<'_>,
    kind: &str,
    batch: bool,
    mut reader: R,
    writer: &mut W,
) -> CliResult<MetricsSnapshot> {
    if !validator.registry().contains(kind) {
        return Err(SchemaError::unknown_kind(kind).into());
    }

    if batch {
        for request in read_requests(reader) {
            match request {
                Ok(document) => validate_one(validator, kind, &document, writer)?,
                Err(e) => {
                    validator.metrics().increment_rejected(0);
                    write_error(writer, e.code_str(), e.message())?;
                }
            }
        }

        let snapshot = validator.metrics().snapshot();
        let validated = snapshot.records_validated.to_string();
        let rejected = snapshot.records_rejected.to_string();
        let violations = snapshot.violations_reported.to_string();
        log_event_with_fields(
            Event::BatchComplete,
            &[
                ("kind", kind),
                ("validated", validated.as_str()),
                ("rejected", rejected.as_str()),
                ("violations", violations.as_str()),
            ],
        );
    } else {
        let document = read_request(&mut reader)?;
        validate_one(validator, kind, &document, writer)?;
    }

    Ok(validator.metrics().snapshot())
}

fn validate_one<W: Write>(
    validator: &SchemaValidator<'_>,
    kind: &str,
    document: &serde_json::Value,
    writer: &mut W,
) -> CliResult<()> {
    match validator.validate_document(kind, document) {
        Ok(record) => write_record(writer, &record),
        Err(e) => write_rejection(writer, &e),
    }
}

/// Print the registered schemas, or export them as files
pub fn schemas(config_path: Option<&Path>, export: Option<&Path>) -> CliResult<()> {
    let (_config, registry) = boot(config_path)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match export {
        Some(dir) => {
            let mut written = Vec::new();
            for schema in registry.schemas() {
                let path = SchemaRegistry::export_schema(dir, schema)?;
                let path = path.display().to_string();
                log_event_with_fields(
                    Event::SchemaExported,
                    &[("kind", schema.kind.as_str()), ("path", path.as_str())],
                );
                written.push(path);
            }
            write_response(&mut out, json!({ "exported": written }))
        }
        None => {
            let all: Vec<_> = registry.schemas().collect();
            write_response(&mut out, serde_json::to_value(all)?)
        }
    }
}

/// Print the storage collection for a kind
pub fn collection(kind: &str, config_path: Option<&Path>) -> CliResult<()> {
    let (_config, registry) = boot(config_path)?;
    let schema = registry
        .get(kind)
        .ok_or_else(|| SchemaError::unknown_kind(kind))?;

    let stdout = io::stdout();
    write_response(
        &mut stdout.lock(),
        json!({ "kind": schema.kind, "collection": schema.collection_name() }),
    )
}
