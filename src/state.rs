use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::notify::Notifier;
use crate::tracker::VoteTracker;

/// State shared between the background tasks and the HTTP surface.
pub struct AppState {
    pub config: Config,
    pub tracker: RwLock<VoteTracker>,
    pub notifier: Box<dyn Notifier>,
}

impl AppState {
    pub fn new(config: Config, notifier: Box<dyn Notifier>) -> Arc<Self> {
        Arc::new(Self {
            config,
            tracker: RwLock::new(VoteTracker::new()),
            notifier,
        })
    }
}
