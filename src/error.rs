use thiserror::Error;

/// Failures at the service's external boundaries. None of these are fatal:
/// callers log them and carry the previous state into the next tick.
/// An extraction miss is not an error at all, it is the absent case of
/// `scrape::PageStats`.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("listing page fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Discord notification failed: {0}")]
    Notify(#[from] serenity::Error),
}
