use std::{fs::OpenOptions, net::SocketAddr, process::ExitCode, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use wallet_rs::{AppState, CurrentUser, build_router, graceful_shutdown};

/// The web server for wallet_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the timezone dates are entered and shown in, e.g. "Africa/Luanda".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// The ID of the user whose transactions are shown.
    #[arg(long)]
    user_id: String,

    /// The name to greet the user with.
    #[arg(long)]
    user_name: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging() {
        eprintln!("Could not set up logging: {error}");
        return ExitCode::FAILURE;
    }

    let connection = match Connection::open(&args.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not open database {}: {error}", args.db_path);
            return ExitCode::FAILURE;
        }
    };

    let current_user = CurrentUser::new(&args.user_id, args.user_name.as_deref());
    let state = match AppState::new(connection, &args.timezone, current_user) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not create app state: {error}");
            return ExitCode::FAILURE;
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));
    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    tracing::info!("HTTP server listening on {}", addr);
    match axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("Server stopped with an error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() -> std::io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
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
        // By default, `TraceLayer` will log 5xx responses but handlers log their own errors.
        .on_failure(());

    router.layer(tracing_layer)
}
