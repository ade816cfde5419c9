mod config;
mod error;
mod models;
mod notify;
mod scrape;
mod state;
mod tasks;
mod tracker;
mod web;

use std::sync::Arc;

use log::{error, info};

use config::Config;
use notify::DiscordNotifier;
use scrape::topg::TopgExtractor;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    info!("Watching {}", config.page_url);

    let notifier =
        match DiscordNotifier::connect(config.discord_webhook_url.as_deref(), &config.vote_link)
            .await
        {
            Ok(notifier) => notifier,
            Err(e) => {
                error!("Failed to resolve Discord webhook: {}", e);
                return;
            }
        };

    let port = config.port;
    let state = AppState::new(config, Box::new(notifier));

    // Background jobs: the poll/reconcile cycle, periodic status updates,
    // and the daily report at UTC midnight.
    tokio::spawn(tasks::poller::run(Arc::clone(&state), Box::new(TopgExtractor)));
    tokio::spawn(tasks::reporter::status_updates(Arc::clone(&state)));
    tokio::spawn(tasks::reporter::daily_reports(Arc::clone(&state)));

    let app = web::router(state);
    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind port {}: {}", port, e);
            return;
        }
    };
    info!("HTTP server listening on port {}", port);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
