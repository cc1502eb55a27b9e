use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use reqwest::Client;
use revrota_core::{PrState, PullRequest, Review, ReviewState};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

const API_ROOT: &str = "https://api.github.com";
// GitHub rejects requests without a User-Agent header
const USER_AGENT: &str = "revrota";
const PAGE_SIZE: usize = 50;
const MAX_PAGES: usize = 10;

pub struct GitHubClient {
    client: Client,
    token: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    number: u64,
    user: UserResponse,
    state: String,
    #[serde(default)]
    draft: bool,
    title: String,
    created_at: String,
    assignee: Option<UserResponse>,
    #[serde(default)]
    requested_reviewers: Vec<UserResponse>,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ReviewResponse {
    // Reviews by since-deleted accounts come back with a null user
    user: Option<UserResponse>,
    state: String,
}

#[derive(Debug, Serialize)]
struct RequestReviewersRequest {
    reviewers: Vec<String>,
}

impl PullRequestResponse {
    fn into_model(self) -> Result<PullRequest> {
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .with_context(|| format!("Failed to parse created_at for PR #{}", self.number))?
            .with_timezone(&Utc);

        Ok(PullRequest {
            number: self.number,
            author: self.user.login,
            state: PrState::from_wire(&self.state),
            draft: self.draft,
            title: self.title,
            created_at,
            assignee: self.assignee.map(|user| user.login),
            requested_reviewers: self
                .requested_reviewers
                .into_iter()
                .map(|user| user.login)
                .collect(),
            html_url: self.html_url,
        })
    }
}

fn convert_reviews(reviews: Vec<ReviewResponse>) -> Vec<Review> {
    reviews
        .into_iter()
        .filter_map(|review| {
            review.user.map(|user| Review {
                reviewer: user.login,
                state: ReviewState::from_wire(&review.state),
            })
        })
        .collect()
}

impl GitHubClient {
    pub fn new(client: Client, token: String) -> Self {
        Self { client, token }
    }

    /// List pull requests for the repository, newest first, following
    /// pagination until a short page (bounded by a page cap).
    pub async fn list_pull_requests(&self, owner: &str, repo: &str) -> Result<Vec<PullRequest>> {
        let url = format!("{}/repos/{}/{}/pulls", API_ROOT, owner, repo);
        let mut prs = Vec::new();

        for page in 1..=MAX_PAGES {
            let per_page = PAGE_SIZE.to_string();
            let page_number = page.to_string();
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("state", "all"),
                    ("sort", "created"),
                    ("direction", "desc"),
                    ("per_page", per_page.as_str()),
                    ("page", page_number.as_str()),
                ])
                .header("Authorization", format!("Bearer {}", self.token))
                .header("Accept", "application/vnd.github.v3+json")
                .header("User-Agent", USER_AGENT)
                .send()
                .await
                .context("Failed to send pull request list request")?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response
                    .text()
                    .await
                    .context("Failed to read error response body")?;
                error!(
                    "GitHub API error listing pull requests: {} - {}",
                    status, error_text
                );
                return Err(anyhow!(
                    "GitHub API error listing pull requests: {} - {}",
                    status,
                    error_text
                ));
            }

            let batch: Vec<PullRequestResponse> = response
                .json()
                .await
                .context("Failed to parse pull request list response")?;

            let short_page = batch.len() < PAGE_SIZE;
            for pr in batch {
                prs.push(pr.into_model()?);
            }

            if short_page {
                break;
            }
        }

        info!("Fetched {} pull requests from {}/{}", prs.len(), owner, repo);
        Ok(prs)
    }

    /// List review records for one pull request, in the order GitHub
    /// returns them (oldest first).
    pub async fn list_reviews(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<Review>> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/reviews",
            API_ROOT, owner, repo, number
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .with_context(|| format!("Failed to send review list request for PR #{}", number))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .context("Failed to read error response body")?;
            return Err(anyhow!(
                "GitHub API error listing reviews for PR #{}: {} - {}",
                number,
                status,
                error_text
            ));
        }

        let reviews: Vec<ReviewResponse> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse review list response for PR #{}", number))?;

        Ok(convert_reviews(reviews))
    }

    /// Ask GitHub to request a review from `reviewer` on the PR.
    pub async fn request_reviewers(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        reviewer: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/requested_reviewers",
            API_ROOT, owner, repo, number
        );

        info!("Requesting review from {} on PR #{}", reviewer, number);

        let request_body = RequestReviewersRequest {
            reviewers: vec![reviewer.to_string()],
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .json(&request_body)
            .send()
            .await
            .with_context(|| format!("Failed to send reviewer request for PR #{}", number))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .context("Failed to read error response body")?;
            return Err(anyhow!(
                "GitHub API error requesting reviewer on PR #{}: {} - {}",
                number,
                status,
                error_text
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PR_JSON: &str = r#"{
        "number": 42,
        "user": { "login": "alice" },
        "state": "open",
        "draft": false,
        "title": "Add pagination",
        "created_at": "2024-03-01T12:00:00Z",
        "assignee": { "login": "bob" },
        "requested_reviewers": [ { "login": "carol" } ],
        "html_url": "https://github.com/o/r/pull/42"
    }"#;

    #[test]
    fn test_pull_request_conversion() {
        let wire: PullRequestResponse = serde_json::from_str(PR_JSON).unwrap();
        let pr = wire.into_model().unwrap();

        assert_eq!(pr.number, 42);
        assert_eq!(pr.author, "alice");
        assert_eq!(pr.state, PrState::Open);
        assert!(!pr.draft);
        assert_eq!(pr.assignee.as_deref(), Some("bob"));
        assert_eq!(pr.requested_reviewers, vec!["carol"]);
        assert_eq!(pr.created_at.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_pull_request_conversion_minimal_fields() {
        let wire: PullRequestResponse = serde_json::from_str(
            r#"{
                "number": 7,
                "user": { "login": "alice" },
                "state": "closed",
                "title": "Old work",
                "created_at": "2023-11-20T08:30:00Z",
                "assignee": null,
                "html_url": "https://github.com/o/r/pull/7"
            }"#,
        )
        .unwrap();
        let pr = wire.into_model().unwrap();

        assert_eq!(pr.state, PrState::Closed);
        assert!(!pr.draft);
        assert!(pr.assignee.is_none());
        assert!(pr.requested_reviewers.is_empty());
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let wire: PullRequestResponse = serde_json::from_str(
            r#"{
                "number": 7,
                "user": { "login": "alice" },
                "state": "open",
                "title": "t",
                "created_at": "not-a-date",
                "assignee": null,
                "html_url": "u"
            }"#,
        )
        .unwrap();

        assert!(wire.into_model().is_err());
    }

    #[test]
    fn test_review_with_deleted_user_is_skipped() {
        let reviews: Vec<ReviewResponse> = serde_json::from_str(
            r#"[
                { "user": { "login": "bob" }, "state": "APPROVED" },
                { "user": null, "state": "COMMENTED" }
            ]"#,
        )
        .unwrap();

        let converted = convert_reviews(reviews);

        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].reviewer, "bob");
        assert!(converted[0].is_approval());
    }
}
