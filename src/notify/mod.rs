use async_trait::async_trait;
use serde_json::Value;
use serenity::http::Http;
use serenity::model::Timestamp;
use serenity::model::channel::Embed;
use serenity::model::webhook::Webhook;
use serenity::utils::Colour;

use crate::error::WatchError;
use crate::models::{StatsSnapshot, VoteEvent};

const GREEN: Colour = Colour(5_763_719);
const BLUE: Colour = Colour(3_447_003);
const YELLOW: Colour = Colour(16_776_960);
const ORANGE: Colour = Colour(15_105_570);

const FOOTER: &str = "TopG vote watcher";

/// Outbound notification channel. One message per call; implementations
/// must not batch or reorder.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Startup announcement with the freshly established baseline.
    async fn online(&self, snapshot: &StatsSnapshot) -> Result<(), WatchError>;

    /// A vote inferred from a score increase on the listing page.
    async fn vote_detected(&self, event: &VoteEvent) -> Result<(), WatchError>;

    /// A vote delivered by the listing site's webhook callback.
    async fn vote_received(&self, voter: &str, snapshot: &StatsSnapshot) -> Result<(), WatchError>;

    async fn status_update(&self, snapshot: &StatsSnapshot) -> Result<(), WatchError>;

    async fn daily_report(&self, votes: u64) -> Result<(), WatchError>;
}

/// Sends embeds through a Discord webhook. Without a webhook URL every
/// send is a no-op, so the tracker keeps running in dry mode.
pub struct DiscordNotifier {
    http: Http,
    webhook: Option<Webhook>,
    vote_link: String,
}

impl DiscordNotifier {
    /// Resolves the webhook once up front; a bad URL or deleted webhook
    /// fails here instead of on the first vote.
    pub async fn connect(webhook_url: Option<&str>, vote_link: &str) -> Result<Self, WatchError> {
        let http = Http::new("");
        let webhook = match webhook_url {
            Some(url) => Some(Webhook::from_url(&http, url).await?),
            None => None,
        };
        Ok(Self {
            http,
            webhook,
            vote_link: vote_link.to_string(),
        })
    }

    async fn send(&self, embed: Value) -> Result<(), WatchError> {
        let Some(webhook) = &self.webhook else {
            return Ok(());
        };
        webhook
            .execute(&self.http, false, |message| message.embeds(vec![embed]))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn online(&self, snapshot: &StatsSnapshot) -> Result<(), WatchError> {
        self.send(online_embed(snapshot, &self.vote_link)).await
    }

    async fn vote_detected(&self, event: &VoteEvent) -> Result<(), WatchError> {
        self.send(vote_detected_embed(event, &self.vote_link)).await
    }

    async fn vote_received(&self, voter: &str, snapshot: &StatsSnapshot) -> Result<(), WatchError> {
        self.send(vote_received_embed(voter, snapshot, &self.vote_link))
            .await
    }

    async fn status_update(&self, snapshot: &StatsSnapshot) -> Result<(), WatchError> {
        self.send(status_embed(snapshot, &self.vote_link)).await
    }

    async fn daily_report(&self, votes: u64) -> Result<(), WatchError> {
        self.send(daily_report_embed(votes, &self.vote_link)).await
    }
}

fn online_embed(snapshot: &StatsSnapshot, vote_link: &str) -> Value {
    Embed::fake(|e| {
        e.title("🟢 Bot is Online!")
            .description("Watching the listing page for votes. Auto-updates scheduled.")
            .colour(GREEN)
            .field("Starting Score", fmt_score(snapshot.score), true)
            .field("Starting Rank", fmt_rank(snapshot.rank.as_deref()), true)
            .field("🔗 Vote Link", vote_button(vote_link), false)
            .footer(|f| f.text(FOOTER))
            .timestamp(Timestamp::now())
    })
}

fn vote_detected_embed(event: &VoteEvent, vote_link: &str) -> Value {
    Embed::fake(|e| {
        e.title("🌟 New Vote Received!")
            .description("Thank you for supporting the server!")
            .colour(BLUE)
            .field("📈 New Total Votes", format!("**{}**", event.new_total), true)
            .field("🏅 Current Rank", fmt_rank(event.rank.as_deref()), true)
            .field("🗳️ Vote Again", vote_button(vote_link), true)
            .timestamp(Timestamp::now())
    })
}

fn vote_received_embed(voter: &str, snapshot: &StatsSnapshot, vote_link: &str) -> Value {
    Embed::fake(|e| {
        e.title("✅ New Vote Received!")
            .description("Thank you for supporting the server!")
            .colour(BLUE)
            // Spoiler-wrapped: the callback often carries the voter's IP.
            .field("Voter", format!("||{}||", voter), true)
            .field("Total Today", format!("**{}**", snapshot.votes_today), true)
            .field("🗳️ Vote Again", vote_button(vote_link), true)
            .timestamp(Timestamp::now())
    })
}

fn status_embed(snapshot: &StatsSnapshot, vote_link: &str) -> Value {
    Embed::fake(|e| {
        e.title("🔄 Server Status Update")
            .description("Automatic update of the server's rank and total votes.")
            .colour(YELLOW)
            .field("🏆 Current Rank", fmt_rank(snapshot.rank.as_deref()), true)
            .field("🗳️ Total Votes", fmt_score(snapshot.score), true)
            .field("🔗 Vote Link", vote_button(vote_link), false)
            .footer(|f| f.text(FOOTER))
            .timestamp(Timestamp::now())
    })
}

fn daily_report_embed(votes: u64, vote_link: &str) -> Value {
    Embed::fake(|e| {
        e.title("📊 Daily Vote Report")
            .description(format!("We received **{}** vote(s) today!", votes))
            .colour(ORANGE)
            .field("Vote Again", vote_button(vote_link), false)
            .timestamp(Timestamp::now())
    })
}

fn fmt_score(score: Option<u64>) -> String {
    match score {
        Some(score) => format!("**{}**", score),
        None => "N/A".to_string(),
    }
}

fn fmt_rank(rank: Option<&str>) -> String {
    match rank {
        Some(rank) => format!("**#{}**", rank),
        None => "N/A".to_string(),
    }
}

fn vote_button(link: &str) -> String {
    format!("[Click Here to Vote]({})", link)
}
