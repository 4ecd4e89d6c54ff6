pub mod filter;

use crate::github::{ApiResponse, GithubApi};
use crate::model::{CacheKey, DataKind, Milestone, PortfolioError, Result};
use crate::utils::MultiProgressExt;
use indicatif::{MultiProgress, ProgressBar};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{error, info, warn};

pub const DEFAULT_DATA_DIR: &str = "public/data";
pub const DEFAULT_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub data_dir: PathBuf,
    /// Commits are kept only when their git author email equals this.
    pub author_email: Option<String>,
    /// Contributor stats are kept only for this GitHub login.
    pub author_login: Option<String>,
    /// Pause after every request.
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl FetchSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Written(_) => self.written += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Written(usize),
    Skipped,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Written(count) => write!(f, "{count} saved"),
            Outcome::Skipped => f.write_str("still computing"),
            Outcome::Failed => f.write_str("failed"),
        }
    }
}

pub struct Fetcher<'a, A: GithubApi> {
    api: &'a A,
    settings: &'a FetchSettings,
    progress: MultiProgress,
}

impl<'a, A: GithubApi> Fetcher<'a, A> {
    pub fn new(api: &'a A, settings: &'a FetchSettings) -> Self {
        Self {
            api,
            settings,
            progress: MultiProgress::new(),
        }
    }

    /// Draws the spinners on `progress`, the one the log writer suspends.
    pub fn with_progress(mut self, progress: MultiProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Processes the milestones one after another. Failures are logged and
    /// never stop the loop.
    pub async fn fetch_all(&self, milestones: &[Milestone]) -> FetchSummary {
        if self.settings.author_email.is_none() {
            warn!("No author email configured, commit lists are saved unfiltered");
        }
        if self.settings.author_login.is_none() {
            warn!("No author login configured, contributor stats are saved unfiltered");
        }

        let total_pb = self.progress.add_milestones_bar(milestones.len());
        let mut summary = FetchSummary::default();

        for milestone in milestones {
            let pb = self.progress.add_spinner(format!("{} ...", milestone.slug()));

            let commits = self.fetch_commits(milestone, &pb).await;
            summary.record(&commits);
            tokio::time::sleep(self.settings.delay).await;

            let contribution = self.fetch_contribution(milestone, &pb).await;
            summary.record(&contribution);
            tokio::time::sleep(self.settings.delay).await;

            let mark = match (commits, contribution) {
                (Outcome::Written(_), Outcome::Written(_)) => "✅",
                (Outcome::Failed, Outcome::Failed) => "❌",
                _ => "⚠️",
            };
            pb.finish_with_message(format!(
                "{mark} {}: commits {commits}, contribution {contribution}",
                milestone.slug()
            ));
            total_pb.inc(1);
        }
        total_pb.finish();

        info!(
            written = summary.written,
            skipped = summary.skipped,
            failed = summary.failed,
            "All commits fetched and saved."
        );
        summary
    }

    async fn fetch_commits(&self, milestone: &Milestone, pb: &ProgressBar) -> Outcome {
        pb.set_message(format!("{}: fetching commits ...", milestone.slug()));
        let response = self.api.commits(milestone).await;
        self.store(milestone, DataKind::Commits, response, |commits| {
            match &self.settings.author_email {
                Some(email) => filter::commits_by_email(commits, email),
                None => commits,
            }
        })
        .await
    }

    async fn fetch_contribution(&self, milestone: &Milestone, pb: &ProgressBar) -> Outcome {
        pb.set_message(format!("{}: fetching contribution ...", milestone.slug()));
        let response = self.api.contributor_stats(milestone).await;
        self.store(milestone, DataKind::Contribution, response, |stats| {
            match &self.settings.author_login {
                Some(login) => filter::contributors_by_login(stats, login),
                None => stats,
            }
        })
        .await
    }

    async fn store<T, F>(
        &self,
        milestone: &Milestone,
        kind: DataKind,
        response: Result<ApiResponse<T>>,
        keep: F,
    ) -> Outcome
    where
        T: Serialize,
        F: FnOnce(Vec<T>) -> Vec<T>,
    {
        let slug = milestone.slug();
        let items = match response {
            Ok(ApiResponse::Ready(items)) => keep(items),
            Ok(ApiResponse::Computing) => {
                warn!(milestone = %slug, %kind, "GitHub is still computing the statistics, nothing written");
                return Outcome::Skipped;
            }
            Err(PortfolioError::Status(status, message)) => {
                error!(milestone = %slug, %kind, %status, "Error fetching {kind}: {message}");
                return Outcome::Failed;
            }
            Err(e) => {
                error!(milestone = %slug, %kind, error = %e, "Error processing {slug}");
                return Outcome::Failed;
            }
        };

        let key = milestone.key(kind);
        match write_json(&self.settings.data_dir, &key, &items).await {
            Ok(path) => {
                info!(milestone = %slug, %kind, path = %path.display(), "Saved {} {kind} entries", items.len());
                Outcome::Written(items.len())
            }
            Err(e) => {
                error!(milestone = %slug, %kind, error = %e, "Error writing {}", key.file_name());
                Outcome::Failed
            }
        }
    }
}

/// Writes `items` as pretty-printed JSON next to the final path, then renames
/// it into place.
async fn write_json<T: Serialize>(data_dir: &Path, key: &CacheKey, items: &[T]) -> Result<PathBuf> {
    let path = data_dir.join(key.file_name());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(items)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json).await?;
    fs::rename(&tmp_path, &path).await?;
    Ok(path)
}
