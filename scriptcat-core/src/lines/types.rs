//! Discourse category listing shapes (only the fields we read)

use anyhow::{Context, Result};
use serde::Deserialize;

/// One page of `/c/<category>.json`
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPage {
    #[serde(default)]
    pub users: Vec<User>,

    pub topic_list: TopicList,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicList {
    #[serde(default)]
    pub topics: Vec<Topic>,

    /// Present while further pages exist
    #[serde(default)]
    pub more_topics_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Topic {
    pub id: i64,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub posters: Vec<Poster>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Poster {
    pub user_id: i64,

    /// e.g. "Original Poster, Most Recent Poster"
    #[serde(default)]
    pub description: String,
}

impl CategoryPage {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid category listing JSON")
    }

    pub fn username(&self, user_id: i64) -> Option<&str> {
        self.users
            .iter()
            .find(|user| user.id == user_id)
            .map(|user| user.username.as_str())
    }

    /// Username of the topic's original poster, falling back to its first poster
    pub fn original_poster(&self, topic: &Topic) -> Option<&str> {
        let poster = topic
            .posters
            .iter()
            .find(|poster| poster.description.contains("Original Poster"))
            .or_else(|| topic.posters.first())?;

        self.username(poster.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_topic_list_is_error() {
        assert!(CategoryPage::from_json(r#"{"users": []}"#).is_err());
    }

    #[test]
    fn test_original_poster_falls_back_to_first() {
        let page = CategoryPage::from_json(
            r#"{
  "users": [{ "id": 7, "username": "first" }],
  "topic_list": {
    "topics": [{ "id": 1, "slug": "x", "posters": [{ "user_id": 7 }] }]
  }
}"#,
        )
        .unwrap();

        let topic = &page.topic_list.topics[0];
        assert_eq!(page.original_poster(topic), Some("first"));
        assert!(page.topic_list.more_topics_url.is_none());
    }

    #[test]
    fn test_unknown_user_has_no_name() {
        let page = CategoryPage::from_json(
            r#"{"topic_list": {"topics": [{ "id": 1, "slug": "x", "posters": [{ "user_id": 9, "description": "Original Poster" }] }]}}"#,
        )
        .unwrap();

        let topic = &page.topic_list.topics[0];
        assert_eq!(page.original_poster(topic), None);
    }
}
