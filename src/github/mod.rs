pub mod client;
pub mod types;

pub use client::{ApiResponse, GithubApi, GithubClient, DEFAULT_API_URL};
pub use types::{CommitRecord, ContributorStats};
