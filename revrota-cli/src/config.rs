use anyhow::{bail, Context, Result};
use revrota_core::{Reviewer, Roster};
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub repository: Repository,
    /// The roster, in rotation tiebreak order
    pub reviewers: Vec<Reviewer>,
    /// Logins permanently excluded from review duty
    #[serde(default)]
    pub excluded: Vec<String>,
    /// Chat webhook for notifications; absent means notifications are a no-op
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// GitHub token; the GITHUB_TOKEN environment variable takes precedence
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.reviewers.is_empty() {
            bail!("Config must declare at least one reviewer");
        }

        let mut seen = HashSet::new();
        for reviewer in &self.reviewers {
            if !seen.insert(reviewer.login.as_str()) {
                bail!("Duplicate reviewer login in config: {}", reviewer.login);
            }
        }

        Ok(())
    }

    pub fn roster(&self) -> Roster {
        Roster::new(self.reviewers.clone())
    }

    pub fn token(&self) -> Result<String> {
        resolve_token(env::var("GITHUB_TOKEN").ok(), self.auth_token.clone()).context(
            "GitHub token must be provided via the GITHUB_TOKEN environment variable or the auth_token config field",
        )
    }
}

/// Pick the effective token: a non-blank GITHUB_TOKEN wins over the config
/// file value.
fn resolve_token(env_value: Option<String>, file_value: Option<String>) -> Option<String> {
    env_value
        .filter(|s| !s.trim().is_empty())
        .or_else(|| file_value.filter(|s| !s.trim().is_empty()))
}
