//! Notification message formatting.

use crate::model::{participants, PullRequest, Review, Roster};
use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Chat message announcing a fresh assignment.
pub fn assignment(pr: &PullRequest, mention: &str) -> String {
    format!(
        "PR {} by {} assigned to {} {}",
        pr.number, pr.author, mention, pr.html_url
    )
}

/// Chat message reporting an in-progress PR that was not assigned this run.
///
/// Participants are deduplicated with the author excluded; identities
/// without a roster mention handle appear as their bare login.
pub fn status(pr: &PullRequest, reviews: &[Review], roster: &Roster, now: DateTime<Utc>) -> String {
    let handles: Vec<String> = participants(pr, reviews)
        .into_iter()
        .map(|login| roster.mention_for(login).to_string())
        .collect();

    let assigned = if handles.is_empty() {
        "nobody".to_string()
    } else {
        handles.join(", ")
    };

    format!(
        "{} assigned to {}, open {}",
        pr.html_url,
        assigned,
        relative_age(pr.created_at, now)
    )
}

/// Human-readable distance from `created_at` to `now`, with an "ago" suffix:
/// "less than a minute ago", "12 minutes ago", "about 3 hours ago",
/// "3 days ago", "about 2 months ago", "about 1 year ago".
pub fn relative_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(created_at).num_seconds().max(0);

    let round = |unit: i64| (seconds + unit / 2) / unit;

    let phrase = if seconds < 45 {
        "less than a minute".to_string()
    } else if seconds < 90 {
        "1 minute".to_string()
    } else if seconds < 45 * MINUTE {
        format!("{} minutes", round(MINUTE))
    } else if seconds < 90 * MINUTE {
        "about 1 hour".to_string()
    } else if seconds < DAY {
        format!("about {} hours", round(HOUR))
    } else if seconds < 2 * DAY {
        "1 day".to_string()
    } else if seconds < MONTH {
        format!("{} days", round(DAY))
    } else if seconds < 2 * MONTH {
        "about 1 month".to_string()
    } else if seconds < YEAR {
        format!("{} months", round(MONTH))
    } else if seconds < 2 * YEAR {
        "about 1 year".to_string()
    } else {
        format!("about {} years", round(YEAR))
    };

    format!("{} ago", phrase)
}
