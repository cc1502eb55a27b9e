//! Fair-rotation reviewer selection.
//!
//! There is no persisted rotation state: recency is re-derived every run
//! from the current PR batch. The activity log is an ordered sequence of
//! roster logins, most recent first, and a member's "recency position" is
//! the index of its first occurrence in the log followed by the roster in
//! declaration order. The roster suffix guarantees every member a finite
//! position, so selection always terminates with a total order over
//! candidates. The member with the maximum position is the one least
//! recently engaged.

use crate::model::{participants, PullRequest, ReviewTable, Reviewer, Roster};

/// Recency queue of reviewer logins, most recent first.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<String>,
}

impl ActivityLog {
    /// Derive the log from the current PR batch.
    ///
    /// PRs are walked in the order given (the source of truth returns them
    /// newest first, so earlier entries are more recent activity). Each PR
    /// contributes its distinct participants once each, regardless of how
    /// many roles an identity holds on that PR; non-roster identities are
    /// dropped.
    pub fn build(valid: &[&PullRequest], reviews: &ReviewTable, roster: &Roster) -> Self {
        let mut entries = Vec::new();
        for pr in valid {
            let pr_reviews = reviews.get(&pr.number).map(Vec::as_slice).unwrap_or(&[]);
            for login in participants(pr, pr_reviews) {
                if roster.contains(login) {
                    entries.push(login.to_string());
                }
            }
        }
        Self { entries }
    }

    /// Record a fresh assignment at the front of the log, making the
    /// reviewer the most recently engaged before the next selection.
    pub fn record_assignment(&mut self, login: &str) {
        self.entries.insert(0, login.to_string());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// Pick the most overdue eligible reviewer for a PR, or `None` if nobody is
/// eligible (the PR is skipped for this run, not an error).
///
/// Eligibility: enabled roster members, minus the PR's author, minus any
/// globally excluded logins. The scan keeps only strictly greater positions,
/// so among never-active members the one declared first in the roster wins.
pub fn select_reviewer<'a>(
    log: &ActivityLog,
    roster: &'a Roster,
    author: &str,
    excluded: &[String],
) -> Option<&'a Reviewer> {
    let mut best: Option<(usize, &Reviewer)> = None;

    for (roster_idx, member) in roster.members().iter().enumerate() {
        if !member.enabled
            || member.login == author
            || excluded.iter().any(|login| *login == member.login)
        {
            continue;
        }

        // First occurrence in (log ++ roster); logins are unique in the
        // roster, so an absent member's position is its declaration slot
        // shifted past the log.
        let position = log
            .entries
            .iter()
            .position(|entry| *entry == member.login)
            .unwrap_or(log.entries.len() + roster_idx);

        if best.map_or(true, |(best_position, _)| position > best_position) {
            best = Some((position, member));
        }
    }

    best.map(|(_, member)| member)
}
