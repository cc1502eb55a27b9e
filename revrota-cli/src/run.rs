use crate::config::Config;
use crate::github::GitHubClient;
use crate::notify::Notifier;
use anyhow::{Context, Result};
use chrono::Utc;
use revrota_core::{classify, message, rotation::ActivityLog, select_reviewer, ReviewTable};
use std::collections::HashSet;
use tracing::{info, warn};

/// One polling run: fetch, classify, assign, notify.
///
/// The activity log and the set of freshly assigned PR numbers are explicit
/// local values threaded through the run; nothing survives it.
pub async fn run(
    config: &Config,
    github: &GitHubClient,
    notifier: &Notifier,
    dry_run: bool,
) -> Result<()> {
    let roster = config.roster();
    let owner = &config.repository.owner;
    let repo = &config.repository.name;

    // A partial batch would skew the rotation, so a listing failure aborts
    // the whole run.
    let all = github
        .list_pull_requests(owner, repo)
        .await
        .context("Failed to list pull requests")?;

    let valid = classify::valid_prs(&all, &roster);

    let mut reviews = ReviewTable::new();
    for pr in &valid {
        match github.list_reviews(owner, repo, pr.number).await {
            Ok(records) => {
                reviews.insert(pr.number, records);
            }
            Err(e) => {
                // Zero reviews is the conservative reading: the PR stays
                // eligible for assignment and the batch stays consistent.
                warn!(
                    "Failed to list reviews for PR #{}, treating as unreviewed: {:#}",
                    pr.number, e
                );
                reviews.insert(pr.number, Vec::new());
            }
        }
    }

    let pending = classify::pending_prs(&valid, &reviews);
    let in_progress = classify::in_progress_prs(&valid, &reviews);

    info!(
        "Classified {} valid PRs: {} pending, {} in progress",
        valid.len(),
        pending.len(),
        in_progress.len()
    );

    let mut log = ActivityLog::build(&valid, &reviews, &roster);
    let mut assigned: HashSet<u64> = HashSet::new();

    for pr in &pending {
        let Some(reviewer) = select_reviewer(&log, &roster, &pr.author, &config.excluded) else {
            info!("No eligible reviewer for PR #{}, leaving unassigned", pr.number);
            continue;
        };

        log.record_assignment(&reviewer.login);
        assigned.insert(pr.number);

        let msg = message::assignment(pr, &reviewer.mention);
        info!("{}", msg);

        if dry_run {
            continue;
        }

        if let Err(e) = github
            .request_reviewers(owner, repo, pr.number, &reviewer.login)
            .await
        {
            warn!(
                "Failed to request reviewer {} on PR #{}: {:#}",
                reviewer.login, pr.number, e
            );
        }

        notifier.send(&msg).await;
    }

    let now = Utc::now();
    for pr in &in_progress {
        if assigned.contains(&pr.number) {
            continue;
        }

        let records = reviews.get(&pr.number).map(Vec::as_slice).unwrap_or(&[]);
        let msg = message::status(pr, records, &roster, now);
        info!("{}", msg);

        if !dry_run {
            notifier.send(&msg).await;
        }
    }

    Ok(())
}
