use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Utc};
use log::{error, info};
use tokio::time::{interval, sleep};

use crate::state::AppState;

/// Periodic "current score and rank" message, independent of the poll
/// cadence so a fast poll interval does not flood the channel.
pub async fn status_updates(state: Arc<AppState>) {
    info!(
        "Starting status update task, interval {:?}",
        state.config.status_interval
    );
    let mut ticker = interval(state.config.status_interval);
    ticker.tick().await; // skip the immediate tick; startup already announced the stats
    loop {
        ticker.tick().await;
        let snapshot = state.tracker.read().await.snapshot();
        if let Err(e) = state.notifier.status_update(&snapshot).await {
            error!("Failed to send status update: {}", e);
        }
    }
}

/// Daily vote report at UTC midnight, after which the counter starts over.
pub async fn daily_reports(state: Arc<AppState>) {
    info!("Starting daily report task, fires at UTC midnight");
    loop {
        sleep(until_next_midnight(Utc::now())).await;
        let votes = state.tracker.write().await.take_daily_votes();
        info!("Daily report: {} vote(s); counter reset", votes);
        if let Err(e) = state.notifier.daily_report(votes).await {
            error!("Failed to send daily report: {}", e);
        }
    }
}

fn until_next_midnight(now: DateTime<Utc>) -> Duration {
    let next = (now.date_naive() + Days::new(1))
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc();
    (next - now).to_std().unwrap_or_default()
}
