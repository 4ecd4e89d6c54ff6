use crate::model::{CacheKey, DataKind, PortfolioError, Result};
use serde::Deserialize;
use std::fs;

/// One portfolio entry: a GitHub branch plus the text and images shown for it.
#[derive(Debug, Clone, Eq, Hash, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_links: Vec<String>,
    #[serde(default)]
    pub image_descriptions: Vec<String>,
}

// New
impl Milestone {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)
            .map_err(|e| PortfolioError::Config(path.to_string(), e.to_string()))?;
        Self::parse(&json_str).map_err(|e| PortfolioError::Config(path.to_string(), e.to_string()))
    }

    #[cfg(test)]
    pub fn new(owner: impl ToString, repo: impl ToString, branch: impl ToString) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            title: String::new(),
            subtitle: String::new(),
            description: String::new(),
            image_links: vec![],
            image_descriptions: vec![],
        }
    }

    pub fn key(&self, kind: DataKind) -> CacheKey {
        CacheKey::new(&self.owner, &self.repo, &self.branch, kind)
    }

    pub fn slug(&self) -> String {
        format!("{}/{}/{}", self.owner, self.repo, self.branch)
    }
}

// Parser
impl Milestone {
    fn parse(json_str: &str) -> Result<Vec<Self>> {
        let milestones: Vec<Self> = serde_json::from_str(json_str)?;
        for (index, milestone) in milestones.iter().enumerate() {
            for (field, value) in [
                ("owner", &milestone.owner),
                ("repo", &milestone.repo),
                ("branch", &milestone.branch),
            ] {
                if value.trim().is_empty() {
                    return Err(PortfolioError::Config(
                        format!("#{index}"),
                        format!("Empty '{field}' field"),
                    ));
                }
            }
        }
        Ok(milestones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_camel_case_descriptors() {
        let json = r#"[
            {
                "owner": "octocat",
                "repo": "demo",
                "branch": "main",
                "title": "Demo",
                "subtitle": "A small thing",
                "description": "Built over a weekend.",
                "imageLinks": ["images/a.png", "images/b.png"],
                "imageDescriptions": ["first"]
            },
            { "owner": "octocat", "repo": "other", "branch": "dev" }
        ]"#;

        let milestones = Milestone::parse(json).unwrap();

        assert_eq!(milestones.len(), 2);
        assert_eq!(milestones[0].title, "Demo");
        assert_eq!(milestones[0].image_links, vec!["images/a.png", "images/b.png"]);
        assert_eq!(milestones[0].image_descriptions, vec!["first"]);
        assert_eq!(milestones[1].slug(), "octocat/other/dev");
        assert!(milestones[1].image_links.is_empty());
    }

    #[test]
    fn rejects_missing_branch() {
        let json = r#"[{ "owner": "octocat", "repo": "demo" }]"#;
        assert!(Milestone::parse(json).is_err());
    }

    #[test]
    fn rejects_blank_owner() {
        let json = r#"[{ "owner": " ", "repo": "demo", "branch": "main" }]"#;
        let err = Milestone::parse(json).unwrap_err();
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn from_config_reports_the_path() {
        let err = Milestone::from_config("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
