use lazy_static::lazy_static;
use regex::Regex;

use super::{PageStats, StatsExtractor};

// How far past a label we look for its number. TopG puts the value within a
// few table cells of the label; anything further away is unrelated.
const SCAN_WINDOW: usize = 240;

lazy_static! {
    static ref SCORE_LABEL_RE: Regex =
        Regex::new(r"(?i)(?:score|votes|points)").expect("score label pattern");
    // Strict form: "Rank" as element text (">Rank<"), so the word inside
    // prose descriptions does not match.
    static ref RANK_STRICT_RE: Regex =
        Regex::new(r"(?i)>\s*rank\s*<\s*/?[^>]+>[^0-9]*([0-9][0-9,]*)").expect("rank pattern");
    static ref RANK_LABEL_RE: Regex = Regex::new(r"(?i)rank").expect("rank label pattern");
    static ref DIGITS_RE: Regex = Regex::new(r"[0-9][0-9,]*").expect("digit run pattern");
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").expect("markup tag pattern");
}

/// Scrapes score and rank off a TopG server page. The page is plain
/// server-rendered HTML with no stable ids, so this matches loosely:
/// a known label, then the first digit run within a short window.
pub struct TopgExtractor;

impl StatsExtractor for TopgExtractor {
    fn extract(&self, html: &str) -> PageStats {
        PageStats {
            score: extract_score(html),
            rank: extract_rank(html),
        }
    }
}

fn extract_score(html: &str) -> Option<u64> {
    let label = SCORE_LABEL_RE.find(html)?;
    // Tags are dropped before the digit scan so a number inside an
    // attribute ("/banner2.png") cannot pass for the score.
    let window = TAG_RE.replace_all(window_after(html, label.end()), " ");
    let digits = DIGITS_RE.find(&window)?;
    parse_grouped(digits.as_str())
}

fn extract_rank(html: &str) -> Option<String> {
    if let Some(captures) = RANK_STRICT_RE.captures(html) {
        return Some(captures[1].replace(',', ""));
    }
    // Loose fallback: the label anywhere, then the nearest digit run. A "#"
    // prefix on the number is skipped by the digit scan itself.
    let label = RANK_LABEL_RE.find(html)?;
    let window = TAG_RE.replace_all(window_after(html, label.end()), " ");
    DIGITS_RE
        .find(&window)
        .map(|digits| digits.as_str().replace(',', ""))
}

fn parse_grouped(digits: &str) -> Option<u64> {
    digits.replace(',', "").parse().ok()
}

// Slice a window after `start`, nudging the cut forward off any multi-byte
// character. `start` comes from a regex match end and is always a boundary.
fn window_after(html: &str, start: usize) -> &str {
    let mut end = (start + SCAN_WINDOW).min(html.len());
    while end < html.len() && !html.is_char_boundary(end) {
        end += 1;
    }
    &html[start..end]
}
