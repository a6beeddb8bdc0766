use bookmarks::config::{Cli, Config};
use bookmarks::handler::AppState;
use bookmarks::logging::init_logging;
use clap::Parser;
use tokio::signal;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may already be populated.
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    let cfg = Config::resolve(args.config_path.as_deref()).unwrap_or_else(|e| {
        eprintln!("failed to load config: {:#}", e);
        std::process::exit(1);
    });

    init_logging(cfg.app.mode());
    tracing::info!(mode = %cfg.app.mode(), "bookmarks.svc starting");

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let app = bookmarks::app(AppState::new(cfg.app));

    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("bookmarks.svc running on {}", &address);
    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(err) = result {
                tracing::error!(error = %err, "server exited with an error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("ctrl+c signal received, shutting down");
        }
    }

    tracing::info!("bookmarks.svc going off");
}
