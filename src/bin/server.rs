use std::{
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    process::exit,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use credit_manager::{
    AppState, PaginationConfig, build_router, graceful_shutdown, logging_middleware,
};

/// The web server for credit_manager.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The IP address to listen on.
    #[arg(short, long, default_value = "127.0.0.1")]
    address: IpAddr,

    /// The canonical name of the local timezone, e.g. "Asia/Kolkata".
    #[arg(long, env = "TZ", default_value = "Etc/UTC")]
    timezone: String,

    /// The number of transactions to show per page.
    #[arg(long, default_value_t = 50)]
    page_size: u64,

    /// Log request and response bodies.
    #[arg(long)]
    log_bodies: bool,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let connection = match Connection::open(&args.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not open database at {}: {error}", args.db_path);
            exit(1);
        }
    };

    let pagination_config = PaginationConfig {
        default_page_size: args.page_size,
        ..Default::default()
    };

    let state = match AppState::new(connection, &args.timezone, pagination_config) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize database: {error}");
            exit(1);
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let mut router = add_tracing_layer(build_router(state));

    if args.log_bodies {
        router = router.layer(middleware::from_fn(logging_middleware));
    }

    let addr = SocketAddr::from((args.address, args.port));
    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        exit(1);
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::from(filter::LevelFilter::INFO.to_string())),
        );

    let debug_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .map(|log_file| {
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_ansi(false)
                .with_writer(Arc::new(log_file))
                .with_filter(filter::LevelFilter::DEBUG)
        })
        .inspect_err(|error| eprintln!("Could not create log file: {error}"))
        .ok();

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
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
