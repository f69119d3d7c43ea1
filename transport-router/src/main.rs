use std::io::{self, Read, Write};
use std::process::ExitCode;

use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use transport_router::catalog::{CatalogError, TransportBase};
use transport_router::descriptions::read_descriptions;
use transport_router::requests::{MakeBaseRequest, ProcessRequestsRequest, process_all};
use transport_router::snapshot::{SnapshotError, SnapshotStore};

/// Exit status for a missing or unknown mode.
const USAGE_EXIT_CODE: u8 = 5;

const USAGE: &str = "Usage: transport-router [make_base|process_requests]";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid input JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

fn main() -> ExitCode {
    init_logger();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.as_slice() {
        [mode] if mode == "make_base" => make_base(),
        [mode] if mode == "process_requests" => process_requests(),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(USAGE_EXIT_CODE);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Failed");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries the JSON responses.
fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter = EnvFilter::try_new(rust_log).unwrap_or_else(|err| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            err,
        );
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn read_stdin() -> Result<String, CliError> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn make_base() -> Result<(), CliError> {
    let request: MakeBaseRequest = serde_json::from_str(&read_stdin()?)?;
    let (stops, buses) = read_descriptions(request.base_requests);
    let base = TransportBase::new(&stops, &buses, request.routing_settings)?;

    let store = SnapshotStore::from(request.serialization_settings);
    store.save(&base)?;

    info!(
        stops = stops.len(),
        buses = buses.len(),
        path = %store.path().display(),
        "Base built"
    );
    Ok(())
}

fn process_requests() -> Result<(), CliError> {
    let request: ProcessRequestsRequest = serde_json::from_str(&read_stdin()?)?;
    let base = SnapshotStore::from(request.serialization_settings).load()?;

    let responses = process_all(&base, &request.stat_requests);
    info!(requests = responses.len(), "Requests processed");

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &responses)?;
    writeln!(stdout)?;
    Ok(())
}
