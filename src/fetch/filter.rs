use crate::github::{CommitRecord, ContributorStats};

/// Keeps the commits whose git author email is `email`.
pub fn commits_by_email(commits: Vec<CommitRecord>, email: &str) -> Vec<CommitRecord> {
    commits
        .into_iter()
        .filter(|commit| commit.commit.author.email == email)
        .collect()
}

/// Keeps the contributor entries whose GitHub account is `login`.
pub fn contributors_by_login(stats: Vec<ContributorStats>, login: &str) -> Vec<ContributorStats> {
    stats
        .into_iter()
        .filter(|entry| entry.author.as_ref().is_some_and(|a| a.login == login))
        .collect()
}
