//! Subsets of the GitHub REST payloads this crate reads. Every type keeps the
//! fields it does not name in `extra`, so a cached file mirrors the upstream
//! response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub commit: CommitDetails,
    pub html_url: String,
    /// `null` when the commit email is not linked to a GitHub account.
    pub author: Option<Account>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetails {
    pub author: Signature,
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub login: String,
    pub avatar_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributorStats {
    pub author: Option<Account>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub weeks: Vec<WeekStats>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekStats {
    /// Start of the week, unix seconds.
    #[serde(rename = "w")]
    pub week: i64,
    #[serde(rename = "a")]
    pub additions: u64,
    #[serde(rename = "d")]
    pub deletions: u64,
    #[serde(rename = "c", default)]
    pub commits: u64,
}

/// Body GitHub sends alongside error statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn commit_keeps_unknown_fields() {
        let raw = json!({
            "sha": "abc",
            "node_id": "C_1",
            "commit": {
                "author": { "name": "Octo", "email": "octo@example.com", "date": "2024-03-01T10:00:00Z" },
                "message": "Initial commit",
                "comment_count": 0
            },
            "html_url": "https://github.com/octocat/demo/commit/abc",
            "author": null,
            "parents": []
        });

        let record: CommitRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.commit.author.email, "octo@example.com");
        assert!(record.author.is_none());
        assert_eq!(record.extra["node_id"], json!("C_1"));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn week_uses_short_upstream_names() {
        let week: WeekStats = serde_json::from_value(json!({ "w": 1000, "a": 5, "d": 2 })).unwrap();
        assert_eq!(week.week, 1000);
        assert_eq!(week.additions, 5);
        assert_eq!(week.deletions, 2);
        assert_eq!(week.commits, 0);
    }
}
