use std::cmp::Reverse;

use chrono::{DateTime, FixedOffset};
use models::{ContributionStats, HelpRequest, LandingContribution};

use crate::format::{js_number, truncate_story, Formatter};
use crate::html::{attr, http_href, text};

pub const EMPTY_LANDING_LEDGER: &str =
    r#"<div class="ledger-loading">No contributions yet. Be the first!</div>"#;
pub const LANDING_LEDGER_LOADING: &str = r#"<div class="ledger-loading">Loading live data...</div>"#;
pub const EMPTY_REQUESTS: &str =
    r#"<div class="loading">No active requests yet. Be the first to share your story!</div>"#;
pub const REQUESTS_LOADING: &str = r#"<div class="loading">Loading requests...</div>"#;

/// How much of each landing list is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingLimits {
    pub ledger_rows: usize,
    pub request_cards: usize,
    pub story_chars: usize,
}

impl Default for LandingLimits {
    fn default() -> Self {
        Self {
            ledger_rows: 20,
            request_cards: 9,
            story_chars: 120,
        }
    }
}

/// Text of the four `data-stat` tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatTiles {
    pub balance: String,
    pub distributed: String,
    pub stories: String,
    pub contributors: String,
}

pub fn stat_tiles(stats: &ContributionStats, fmt: &Formatter) -> StatTiles {
    StatTiles {
        balance: format!("${}", fmt.number(stats.total_balance)),
        distributed: format!("{}%", js_number(stats.distributed_percent)),
        stories: stats.stories_funded.to_string(),
        contributors: fmt.number(stats.total_contributors as f64),
    }
}

/// Newest first; entries whose timestamp does not parse sink to the end in
/// their original order.
fn newest_first<T>(items: &mut [T], fmt: &Formatter, stamp: impl Fn(&T) -> &str) {
    items.sort_by_key(|item| {
        let parsed: Option<DateTime<FixedOffset>> = fmt.parse(stamp(item));
        (parsed.is_none(), Reverse(parsed))
    });
}

pub fn render_landing_ledger(
    contributions: &[LandingContribution],
    limits: &LandingLimits,
    fmt: &Formatter,
) -> String {
    if contributions.is_empty() {
        return EMPTY_LANDING_LEDGER.to_string();
    }

    let mut rows = contributions.to_vec();
    newest_first(&mut rows, fmt, |c| c.posted_at());

    rows.iter()
        .take(limits.ledger_rows)
        .map(|contrib| {
            let message = match contrib.message.as_deref().filter(|m| !m.is_empty()) {
                Some(message) => format!(r#" · "{}""#, text(message)),
                None => String::new(),
            };
            format!(
                concat!(
                    r#"<div class="ledger-row">"#,
                    "<span>{} · Contributor: @{}</span>",
                    "<span>${} added to vault{}</span>",
                    "</div>"
                ),
                text(&fmt.short_date(contrib.posted_at())),
                text(contrib.handle()),
                fmt.number(contrib.amount),
                message
            )
        })
        .collect()
}

pub fn render_help_requests(
    requests: &[HelpRequest],
    limits: &LandingLimits,
    fmt: &Formatter,
) -> String {
    if requests.is_empty() {
        return EMPTY_REQUESTS.to_string();
    }

    let mut cards = requests.to_vec();
    newest_first(&mut cards, fmt, |r| r.posted_at());

    cards
        .iter()
        .take(limits.request_cards)
        .map(|req| render_request_card(req, limits, fmt))
        .collect()
}

fn render_request_card(req: &HelpRequest, limits: &LandingLimits, fmt: &Formatter) -> String {
    let video = match req.video_url.as_deref().and_then(http_href) {
        Some(href) => format!(
            r#"<a href="{href}" target="_blank" rel="noopener">Watch story →</a>"#
        ),
        None => String::new(),
    };

    // Vote tallies are not shown yet; the counter always starts at zero.
    format!(
        concat!(
            r#"<div class="request-card">"#,
            "<h4>{name}</h4>",
            r#"<p class="story">{story}</p>"#,
            r#"<p class="amount">${amount} needed</p>"#,
            r#"<div class="meta"><span>Posted {date}</span><span id="votes-{id}">👍 0</span></div>"#,
            "{video}",
            r#"<button class="vote-btn" data-request-id="{id}">Vote to support</button>"#,
            "</div>"
        ),
        name = text(&req.name),
        story = text(&truncate_story(&req.story, limits.story_chars)),
        amount = fmt.number(req.amount),
        date = text(&fmt.short_date(req.posted_at())),
        id = attr(&req.id),
        video = video,
    )
}
