use crate::model::{PrState, PullRequest, ReviewTable, Roster};

/// Reserved title substring that marks a PR as work-in-progress
pub const WIP_MARKER: &str = "WIP";

pub fn is_wip(title: &str) -> bool {
    title.contains(WIP_MARKER)
}

fn reviews_for<'a>(reviews: &'a ReviewTable, number: u64) -> &'a [crate::model::Review] {
    reviews.get(&number).map(Vec::as_slice).unwrap_or(&[])
}

fn is_approved(pr: &PullRequest, reviews: &ReviewTable) -> bool {
    reviews_for(reviews, pr.number)
        .iter()
        .any(|review| review.is_approval())
}

/// PRs this tool considers at all: authored by a roster member and not a
/// draft. Order of the input is preserved.
pub fn valid_prs<'a>(all: &'a [PullRequest], roster: &Roster) -> Vec<&'a PullRequest> {
    all.iter()
        .filter(|pr| roster.contains(&pr.author) && !pr.draft)
        .collect()
}

/// Valid PRs that still need a reviewer: open, unassigned, no requested
/// reviewers, no review records, and not WIP-marked.
pub fn pending_prs<'a>(
    valid: &[&'a PullRequest],
    reviews: &ReviewTable,
) -> Vec<&'a PullRequest> {
    valid
        .iter()
        .filter(|pr| {
            pr.state == PrState::Open
                && pr.assignee.is_none()
                && pr.requested_reviewers.is_empty()
                && reviews_for(reviews, pr.number).is_empty()
                && !is_wip(&pr.title)
        })
        .copied()
        .collect()
}

/// Valid PRs with review activity still outstanding: open, not WIP-marked,
/// and not yet approved by anyone.
pub fn in_progress_prs<'a>(
    valid: &[&'a PullRequest],
    reviews: &ReviewTable,
) -> Vec<&'a PullRequest> {
    valid
        .iter()
        .filter(|pr| {
            pr.state == PrState::Open && !is_wip(&pr.title) && !is_approved(pr, reviews)
        })
        .copied()
        .collect()
}
