use crate::github::CommitRecord;
use chrono::DateTime;
use itertools::Itertools;

pub const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/150";
pub const MESSAGE_WORD_LIMIT: usize = 12;

/// One line of the commit feed, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub avatar_url: String,
    pub author_name: String,
    pub message: String,
    pub link: String,
    pub date: String,
}

impl From<&CommitRecord> for FeedEntry {
    fn from(record: &CommitRecord) -> Self {
        let avatar_url = record
            .author
            .as_ref()
            .map(|account| account.avatar_url.clone())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_AVATAR.to_string());
        Self {
            avatar_url,
            author_name: record.commit.author.name.clone(),
            message: limit_words(&record.commit.message, MESSAGE_WORD_LIMIT),
            link: record.html_url.clone(),
            date: short_date(&record.commit.author.date),
        }
    }
}

/// Keeps the first `limit` words and marks the cut with `...`.
pub fn limit_words(text: &str, limit: usize) -> String {
    let words = text.split_whitespace().collect::<Vec<_>>();
    if words.len() <= limit {
        return text.to_string();
    }
    format!("{}...", words.iter().take(limit).join(" "))
}

pub fn short_date(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(datetime) => datetime.format("%-m/%-d/%Y").to_string(),
        Err(_) => iso.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn long_messages_are_cut_at_the_limit() {
        let message = "one two three four five six seven eight nine ten eleven twelve thirteen";
        assert_eq!(
            limit_words(message, 12),
            "one two three four five six seven eight nine ten eleven twelve..."
        );
        assert_eq!(limit_words("Fix typo\n\nin readme", 12), "Fix typo\n\nin readme");
    }

    #[test]
    fn entry_falls_back_to_placeholder_avatar() {
        let record: CommitRecord = serde_json::from_value(json!({
            "sha": "abc",
            "html_url": "https://github.com/octocat/demo/commit/abc",
            "author": null,
            "commit": {
                "message": "Initial commit",
                "author": { "name": "Octo", "email": "octo@example.com", "date": "2024-03-01T10:00:00Z" }
            }
        }))
        .unwrap();

        let entry = FeedEntry::from(&record);
        assert_eq!(entry.avatar_url, PLACEHOLDER_AVATAR);
        assert_eq!(entry.author_name, "Octo");
        assert_eq!(entry.date, "3/1/2024");
        assert_eq!(entry.link, "https://github.com/octocat/demo/commit/abc");
    }

    #[test]
    fn unparsable_dates_are_shown_verbatim() {
        assert_eq!(short_date("yesterday"), "yesterday");
    }
}
