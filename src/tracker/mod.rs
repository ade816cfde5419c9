use log::{info, warn};

use crate::models::{StatsSnapshot, VoteEvent};
use crate::scrape::PageStats;

/// Last-confirmed counter readings plus the running daily total.
///
/// Single writer: the poll ticks are serialized by construction and webhook
/// receipts take the write lock, so every mutation sees a settled state.
/// Readers (health route, status reports) get a consistent snapshot.
#[derive(Debug, Default)]
pub struct VoteTracker {
    last_score: Option<u64>,
    last_rank: Option<String>,
    votes_today: u64,
}

impl VoteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a fresh page reading into the tracker, returning one event per
    /// vote detected since the previous reading.
    ///
    /// The first successful reading establishes the baseline silently: the
    /// pre-existing historical total is never announced as new votes. A
    /// decrease is an external counter reset and re-baselines without
    /// events. Rank updates regardless of which branch the score takes.
    pub fn reconcile(&mut self, stats: PageStats) -> Vec<VoteEvent> {
        if let Some(rank) = stats.rank {
            self.last_rank = Some(rank);
        }

        let Some(score) = stats.score else {
            warn!("No score extracted; tracker state unchanged");
            return Vec::new();
        };

        let events: Vec<VoteEvent> = match self.last_score {
            None => {
                info!("Baseline established at score {}", score);
                Vec::new()
            }
            Some(last) if score > last => {
                let delta = score - last;
                info!("Score {} -> {}: {} new vote(s)", last, score, delta);
                (0..delta)
                    .map(|_| VoteEvent {
                        new_total: score,
                        rank: self.last_rank.clone(),
                    })
                    .collect()
            }
            Some(last) if score < last => {
                warn!("Score dropped {} -> {}; treating as a counter reset", last, score);
                Vec::new()
            }
            Some(_) => Vec::new(),
        };

        self.last_score = Some(score);
        self.votes_today += events.len() as u64;
        events
    }

    /// Webhook-mode receipt: the listing site told us directly, no diffing
    /// involved. Returns the updated daily total.
    pub fn count_webhook_vote(&mut self) -> u64 {
        self.votes_today += 1;
        self.votes_today
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            score: self.last_score,
            rank: self.last_rank.clone(),
            votes_today: self.votes_today,
        }
    }

    /// Hand over the day's count and reset it. Called at UTC midnight.
    pub fn take_daily_votes(&mut self) -> u64 {
        std::mem::take(&mut self.votes_today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(score: Option<u64>, rank: Option<&str>) -> PageStats {
        PageStats {
            score,
            rank: rank.map(str::to_string),
        }
    }

    #[test]
    fn first_observation_is_a_silent_baseline() {
        let mut tracker = VoteTracker::new();
        let events = tracker.reconcile(stats(Some(500), Some("10")));
        assert!(events.is_empty());
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.score, Some(500));
        assert_eq!(snapshot.rank.as_deref(), Some("10"));
    }

    #[test]
    fn increase_emits_one_event_per_vote() {
        let mut tracker = VoteTracker::new();
        tracker.reconcile(stats(Some(500), None));
        let events = tracker.reconcile(stats(Some(503), None));
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.new_total == 503));
    }

    #[test]
    fn decrease_rebaselines_without_events() {
        let mut tracker = VoteTracker::new();
        let counts: Vec<usize> = [503, 500, 500, 505]
            .into_iter()
            .map(|s| tracker.reconcile(stats(Some(s), None)).len())
            .collect();
        assert_eq!(counts, vec![0, 0, 0, 5]);
        assert_eq!(tracker.snapshot().score, Some(505));
    }

    #[test]
    fn equal_score_is_a_noop() {
        let mut tracker = VoteTracker::new();
        tracker.reconcile(stats(Some(42), None));
        assert!(tracker.reconcile(stats(Some(42), None)).is_empty());
        assert_eq!(tracker.snapshot().score, Some(42));
    }

    #[test]
    fn absent_score_leaves_score_untouched_but_updates_rank() {
        let mut tracker = VoteTracker::new();
        tracker.reconcile(stats(Some(500), Some("20")));
        let events = tracker.reconcile(stats(None, Some("19")));
        assert!(events.is_empty());
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.score, Some(500));
        assert_eq!(snapshot.rank.as_deref(), Some("19"));
    }

    #[test]
    fn zero_is_a_valid_baseline() {
        let mut tracker = VoteTracker::new();
        assert!(tracker.reconcile(stats(Some(0), None)).is_empty());
        let events = tracker.reconcile(stats(Some(3), None));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn events_carry_the_freshest_rank() {
        let mut tracker = VoteTracker::new();
        tracker.reconcile(stats(Some(500), Some("8")));
        let events = tracker.reconcile(stats(Some(501), Some("7")));
        assert_eq!(events[0].rank.as_deref(), Some("7"));
    }

    #[test]
    fn total_events_equal_the_sum_of_positive_deltas() {
        let scores = [10_u64, 12, 7, 7, 9, 30, 28, 28, 31];
        let mut tracker = VoteTracker::new();
        let mut emitted = 0;
        for s in scores {
            emitted += tracker.reconcile(stats(Some(s), None)).len() as u64;
        }
        let expected: u64 = scores
            .windows(2)
            .map(|w| w[1].saturating_sub(w[0]))
            .sum();
        assert_eq!(emitted, expected);
    }

    #[test]
    fn daily_count_mixes_webhook_and_polled_votes_and_resets() {
        let mut tracker = VoteTracker::new();
        tracker.count_webhook_vote();
        tracker.count_webhook_vote();
        tracker.reconcile(stats(Some(100), None));
        tracker.reconcile(stats(Some(103), None));
        assert_eq!(tracker.snapshot().votes_today, 5);
        assert_eq!(tracker.take_daily_votes(), 5);
        assert_eq!(tracker.snapshot().votes_today, 0);
    }
}
