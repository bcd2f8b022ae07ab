use std::{
    fs::OpenOptions,
    net::SocketAddr,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use pocket_ledger::{
    AppState, JsonFileStore, MemoryStore, TransactionRepository, build_router, graceful_shutdown,
};

/// The web server for Pocket Ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory where the ledger is saved as JSON.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Keep the ledger in memory only, nothing is saved between runs.
    #[arg(long, conflicts_with = "data_dir")]
    in_memory: bool,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, used to decide what "today" is.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// Also write debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(args.log_file.as_deref()) {
        eprintln!("Could not set up logging: {error}");
        return ExitCode::FAILURE;
    }

    let repository = if args.in_memory {
        tracing::info!("Keeping the ledger in memory only");
        TransactionRepository::load(MemoryStore::new())
    } else {
        match JsonFileStore::open(&args.data_dir) {
            Ok(store) => {
                tracing::info!("Saving the ledger to {}", args.data_dir.display());
                TransactionRepository::load(store)
            }
            Err(error) => {
                tracing::error!("Could not open the data directory: {error}");
                return ExitCode::FAILURE;
            }
        }
    };

    let state = match AppState::new(repository, &args.timezone) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not create the app state: {error}");
            return ExitCode::FAILURE;
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty().with_filter(
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy(),
    );

    let debug_log = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
