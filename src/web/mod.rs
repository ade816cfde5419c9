use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Form, Router};
use log::{error, info};
use serde::Deserialize;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/vote", get(vote_callback_get).post(vote_callback_post))
        .with_state(state)
}

/// Fields TopG includes in its vote callback. Different panel setups send
/// different names; `p_resp` carries the voter's IP on the oldest ones.
#[derive(Debug, Default, Deserialize)]
pub struct VoteCallback {
    pub username: Option<String>,
    pub voter_name: Option<String>,
    pub p_resp: Option<String>,
}

impl VoteCallback {
    fn voter(&self) -> &str {
        self.username
            .as_deref()
            .or(self.voter_name.as_deref())
            .or(self.p_resp.as_deref())
            .unwrap_or("Unknown Voter")
    }
}

async fn health(State(state): State<Arc<AppState>>) -> String {
    let snapshot = state.tracker.read().await.snapshot();
    format!(
        "Bot Status: Online. Votes today: {}. Score: {}. Rank: {}.",
        snapshot.votes_today,
        snapshot
            .score
            .map_or_else(|| "N/A".to_string(), |s| s.to_string()),
        snapshot.rank.as_deref().unwrap_or("N/A"),
    )
}

async fn vote_callback_get(
    State(state): State<Arc<AppState>>,
    Query(callback): Query<VoteCallback>,
) -> &'static str {
    receive_vote(state, callback).await
}

async fn vote_callback_post(
    State(state): State<Arc<AppState>>,
    Form(callback): Form<VoteCallback>,
) -> &'static str {
    receive_vote(state, callback).await
}

async fn receive_vote(state: Arc<AppState>, callback: VoteCallback) -> &'static str {
    let voter = callback.voter().to_string();
    let snapshot = {
        let mut tracker = state.tracker.write().await;
        tracker.count_webhook_vote();
        tracker.snapshot()
    };
    info!(
        "Vote callback from {} (today: {})",
        voter, snapshot.votes_today
    );

    // The callback gets its 200 even if Discord is down.
    if let Err(e) = state.notifier.vote_received(&voter, &snapshot).await {
        error!("Failed to send vote notification: {}", e);
    }
    "Vote Received"
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::config::Config;
    use crate::error::WatchError;
    use crate::models::{StatsSnapshot, VoteEvent};
    use crate::notify::Notifier;

    struct RecordingNotifier {
        sent: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn online(&self, _snapshot: &StatsSnapshot) -> Result<(), WatchError> {
            self.sent.lock().unwrap().push("online".to_string());
            Ok(())
        }

        async fn vote_detected(&self, event: &VoteEvent) -> Result<(), WatchError> {
            self.sent
                .lock()
                .unwrap()
                .push(format!("detected:{}", event.new_total));
            Ok(())
        }

        async fn vote_received(
            &self,
            voter: &str,
            snapshot: &StatsSnapshot,
        ) -> Result<(), WatchError> {
            self.sent
                .lock()
                .unwrap()
                .push(format!("received:{}:{}", voter, snapshot.votes_today));
            Ok(())
        }

        async fn status_update(&self, _snapshot: &StatsSnapshot) -> Result<(), WatchError> {
            self.sent.lock().unwrap().push("status".to_string());
            Ok(())
        }

        async fn daily_report(&self, votes: u64) -> Result<(), WatchError> {
            self.sent.lock().unwrap().push(format!("daily:{}", votes));
            Ok(())
        }
    }

    fn test_state() -> (Arc<AppState>, Arc<Mutex<Vec<String>>>) {
        let config = Config {
            discord_webhook_url: None,
            page_url: "https://example.org/server".to_string(),
            vote_link: "https://example.org/server".to_string(),
            port: 0,
            poll_interval: Duration::from_secs(300),
            status_interval: Duration::from_secs(900),
            fetch_timeout: Duration::from_secs(5),
        };
        let sent = Arc::new(Mutex::new(Vec::new()));
        let notifier = RecordingNotifier {
            sent: Arc::clone(&sent),
        };
        (AppState::new(config, Box::new(notifier)), sent)
    }

    #[tokio::test]
    async fn vote_callback_counts_and_notifies() {
        let (state, sent) = test_state();
        let callback = VoteCallback {
            username: Some("PlayerOne".to_string()),
            ..Default::default()
        };
        let body = receive_vote(Arc::clone(&state), callback).await;
        assert_eq!(body, "Vote Received");
        assert_eq!(state.tracker.read().await.snapshot().votes_today, 1);
        assert_eq!(
            *sent.lock().unwrap(),
            vec!["received:PlayerOne:1".to_string()]
        );
    }

    #[tokio::test]
    async fn repeated_callbacks_accumulate() {
        let (state, sent) = test_state();
        for _ in 0..3 {
            receive_vote(Arc::clone(&state), VoteCallback::default()).await;
        }
        assert_eq!(state.tracker.read().await.snapshot().votes_today, 3);
        assert_eq!(sent.lock().unwrap().len(), 3);
    }

    #[test]
    fn voter_field_fallback_order() {
        let callback = VoteCallback {
            username: None,
            voter_name: Some("named".to_string()),
            p_resp: Some("203.0.113.9".to_string()),
        };
        assert_eq!(callback.voter(), "named");

        let ip_only = VoteCallback {
            p_resp: Some("203.0.113.9".to_string()),
            ..Default::default()
        };
        assert_eq!(ip_only.voter(), "203.0.113.9");

        assert_eq!(VoteCallback::default().voter(), "Unknown Voter");
    }
}
