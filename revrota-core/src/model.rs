use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A roster member eligible for review rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reviewer {
    /// Platform username (identity used by the PR source of truth)
    pub login: String,
    /// Chat handle used when mentioning this reviewer in notifications
    pub mention: String,
    /// Disabled members stay in the roster (their activity still counts for
    /// recency) but are never selected
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Ordered set of reviewers, unique by login.
///
/// Declaration order is load-bearing: it is the deterministic tiebreak order
/// for rotation selection and the fallback recency order for members with no
/// recorded activity.
#[derive(Debug, Clone)]
pub struct Roster {
    members: Vec<Reviewer>,
}

impl Roster {
    /// Build a roster from configured entries, keeping the first entry for
    /// any duplicated login.
    pub fn new(entries: Vec<Reviewer>) -> Self {
        let mut members: Vec<Reviewer> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !members.iter().any(|m| m.login == entry.login) {
                members.push(entry);
            }
        }
        Self { members }
    }

    pub fn members(&self) -> &[Reviewer] {
        &self.members
    }

    pub fn contains(&self, login: &str) -> bool {
        self.members.iter().any(|m| m.login == login)
    }

    /// Mention handle for a login, falling back to the bare login for
    /// participants that are not roster members.
    pub fn mention_for<'a>(&'a self, login: &'a str) -> &'a str {
        self.members
            .iter()
            .find(|m| m.login == login)
            .map(|m| m.mention.as_str())
            .unwrap_or(login)
    }
}

/// Pull request state as far as this tool cares: only open PRs are actionable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrState {
    Open,
    Closed,
}

impl PrState {
    /// Parse the wire state. Anything that is not "open" (merged, closed,
    /// unknown future states) is non-actionable and treated as closed.
    pub fn from_wire(state: &str) -> Self {
        if state.eq_ignore_ascii_case("open") {
            PrState::Open
        } else {
            PrState::Closed
        }
    }
}

/// A pull request as fetched for one run
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub number: u64,
    /// Login of the PR author
    pub author: String,
    pub state: PrState,
    pub draft: bool,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// At most one assignee is tracked
    pub assignee: Option<String>,
    pub requested_reviewers: Vec<String>,
    pub html_url: String,
}

/// Outcome of a single review record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    Other(String),
}

impl ReviewState {
    /// Parse the wire outcome (upper-snake strings like "APPROVED").
    pub fn from_wire(state: &str) -> Self {
        match state {
            "APPROVED" => ReviewState::Approved,
            "CHANGES_REQUESTED" => ReviewState::ChangesRequested,
            "COMMENTED" => ReviewState::Commented,
            "DISMISSED" => ReviewState::Dismissed,
            "PENDING" => ReviewState::Pending,
            other => ReviewState::Other(other.to_string()),
        }
    }
}

/// One review record on a pull request
#[derive(Debug, Clone)]
pub struct Review {
    pub reviewer: String,
    pub state: ReviewState,
}

impl Review {
    pub fn is_approval(&self) -> bool {
        self.state == ReviewState::Approved
    }
}

/// Reviews fetched this run, keyed by PR number.
///
/// Threaded explicitly through classification and selection; a PR with no
/// entry is treated the same as a PR with an empty list.
pub type ReviewTable = HashMap<u64, Vec<Review>>;

/// Distinct identities engaged on a PR, in first-seen order: the assignee,
/// then requested reviewers, then authors of review records. The PR's own
/// author is never a participant.
pub fn participants<'a>(pr: &'a PullRequest, reviews: &'a [Review]) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();

    let mut push = |login: &'a str| {
        if login != pr.author && !seen.contains(&login) {
            seen.push(login);
        }
    };

    if let Some(assignee) = &pr.assignee {
        push(assignee);
    }
    for requested in &pr.requested_reviewers {
        push(requested);
    }
    for review in reviews {
        push(&review.reviewer);
    }

    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reviewer(login: &str) -> Reviewer {
        Reviewer {
            login: login.to_string(),
            mention: format!("@{}", login),
            enabled: true,
        }
    }

    fn pr(author: &str, assignee: Option<&str>, requested: &[&str]) -> PullRequest {
        PullRequest {
            number: 1,
            author: author.to_string(),
            state: PrState::Open,
            draft: false,
            title: "Add widget".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            assignee: assignee.map(|s| s.to_string()),
            requested_reviewers: requested.iter().map(|s| s.to_string()).collect(),
            html_url: "https://example.com/pr/1".to_string(),
        }
    }

    fn review(login: &str, state: ReviewState) -> Review {
        Review {
            reviewer: login.to_string(),
            state,
        }
    }

    #[test]
    fn test_roster_drops_duplicate_logins() {
        let roster = Roster::new(vec![
            reviewer("alice"),
            Reviewer {
                login: "alice".to_string(),
                mention: "@alice-two".to_string(),
                enabled: false,
            },
            reviewer("bob"),
        ]);

        assert_eq!(roster.members().len(), 2);
        assert_eq!(roster.mention_for("alice"), "@alice");
    }

    #[test]
    fn test_mention_falls_back_to_login() {
        let roster = Roster::new(vec![reviewer("alice")]);
        assert_eq!(roster.mention_for("outsider"), "outsider");
    }

    #[test]
    fn test_pr_state_parsing() {
        assert_eq!(PrState::from_wire("open"), PrState::Open);
        assert_eq!(PrState::from_wire("OPEN"), PrState::Open);
        assert_eq!(PrState::from_wire("closed"), PrState::Closed);
        assert_eq!(PrState::from_wire("merged"), PrState::Closed);
    }

    #[test]
    fn test_review_state_parsing() {
        assert_eq!(ReviewState::from_wire("APPROVED"), ReviewState::Approved);
        assert_eq!(
            ReviewState::from_wire("CHANGES_REQUESTED"),
            ReviewState::ChangesRequested
        );
        assert_eq!(
            ReviewState::from_wire("SOMETHING_NEW"),
            ReviewState::Other("SOMETHING_NEW".to_string())
        );
    }

    #[test]
    fn test_participants_deduplicates_and_excludes_author() {
        let pr = pr("alice", Some("bob"), &["bob", "carol"]);
        let reviews = vec![
            review("carol", ReviewState::Commented),
            review("alice", ReviewState::Commented),
            review("dave", ReviewState::Approved),
        ];

        let participants = participants(&pr, &reviews);
        assert_eq!(participants, vec!["bob", "carol", "dave"]);
    }

    #[test]
    fn test_participants_empty_pr() {
        let pr = pr("alice", None, &[]);
        assert!(participants(&pr, &[]).is_empty());
    }
}
