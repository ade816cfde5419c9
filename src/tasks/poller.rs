use std::sync::Arc;

use log::{error, info, warn};
use reqwest::Client;
use tokio::time::interval;

use crate::error::WatchError;
use crate::scrape::{PageStats, StatsExtractor};
use crate::state::AppState;

// Without a browser-like User-Agent the listing site serves a bot-check
// page instead of the server profile.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Poll-and-reconcile loop. One task owns the whole cycle, so ticks can
/// never overlap: a slow fetch delays the next tick, it does not race it.
pub async fn run(state: Arc<AppState>, extractor: Box<dyn StatsExtractor>) {
    let client = match build_client(&state) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    // Establish the baseline and announce startup before the first
    // scheduled tick.
    match fetch_stats(&state, &client, extractor.as_ref()).await {
        Ok(stats) => {
            state.tracker.write().await.reconcile(stats);
        }
        Err(e) => warn!("Initial stats fetch failed: {}", e),
    }
    let snapshot = state.tracker.read().await.snapshot();
    if let Err(e) = state.notifier.online(&snapshot).await {
        error!("Failed to send startup message: {}", e);
    }

    info!("Starting poll task, interval {:?}", state.config.poll_interval);
    let mut ticker = interval(state.config.poll_interval);
    ticker.tick().await; // completes immediately; the baseline fetch above covered it
    loop {
        ticker.tick().await;
        if let Err(e) = tick(&state, &client, extractor.as_ref()).await {
            warn!("Poll tick skipped: {}", e);
        }
    }
}

async fn tick(
    state: &AppState,
    client: &Client,
    extractor: &dyn StatsExtractor,
) -> Result<(), WatchError> {
    let stats = fetch_stats(state, client, extractor).await?;
    let events = state.tracker.write().await.reconcile(stats);

    // One message per vote, in order. A failed send drops that message
    // only; the tracker has already advanced.
    for event in &events {
        if let Err(e) = state.notifier.vote_detected(event).await {
            error!("Failed to send vote notification: {}", e);
        }
    }
    Ok(())
}

async fn fetch_stats(
    state: &AppState,
    client: &Client,
    extractor: &dyn StatsExtractor,
) -> Result<PageStats, WatchError> {
    let html = client
        .get(&state.config.page_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let stats = extractor.extract(&html);
    if stats.is_empty() {
        warn!("Listing page yielded neither score nor rank; the markup may have changed");
    }
    Ok(stats)
}

fn build_client(state: &AppState) -> Result<Client, WatchError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(state.config.fetch_timeout)
        .build()?)
}
