use serde::Serialize;

/// One detected vote. A score jump of k produces k of these, all carrying
/// the same new total: polling cannot attribute increments to voters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteEvent {
    pub new_total: u64,
    pub rank: Option<String>,
}

/// Point-in-time view of the tracker, as served by the health route and
/// the periodic status updates. `None` means never observed, not zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub score: Option<u64>,
    pub rank: Option<String>,
    pub votes_today: u64,
}
