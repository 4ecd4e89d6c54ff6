use std::fmt;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum DataKind {
    Commits,
    Contribution,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Commits => "commits",
            DataKind::Contribution => "contribution",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one static data file. Both the fetcher and the page resolve
/// file locations through this type only.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct CacheKey {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub kind: DataKind,
}

impl CacheKey {
    pub fn new(owner: &str, repo: &str, branch: &str, kind: DataKind) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            kind,
        }
    }

    /// `<owner>-<repo>-<branch>-<kind>.json`, with no escaping.
    pub fn file_name(&self) -> String {
        format!("{}-{}-{}-{}.json", self.owner, self.repo, self.branch, self.kind)
    }

    /// Location of the file relative to the public root.
    pub fn data_path(&self) -> String {
        format!("data/{}", self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_name_concatenates_the_tuple() {
        let key = CacheKey::new("octocat", "demo", "main", DataKind::Commits);
        assert_eq!(key.file_name(), "octocat-demo-main-commits.json");

        let key = CacheKey::new("octocat", "demo", "main", DataKind::Contribution);
        assert_eq!(key.file_name(), "octocat-demo-main-contribution.json");
    }

    #[test]
    fn data_path_ends_with_file_name() {
        for (owner, repo, branch) in [
            ("octocat", "demo", "main"),
            ("some-org", "my.repo", "release-1.2"),
            ("a", "b", "feature/x"),
        ] {
            for kind in [DataKind::Commits, DataKind::Contribution] {
                let key = CacheKey::new(owner, repo, branch, kind);
                assert_eq!(key.data_path(), format!("data/{}", key.file_name()));
            }
        }
    }
}
