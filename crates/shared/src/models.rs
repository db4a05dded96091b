use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One entry of a subreddit listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub score: i64,
    pub id: String,
}

impl Post {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        score: i64,
        id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            score,
            id: id.into(),
        }
    }
}

/// Listing order used when asking the feed for posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    #[default]
    Hot,
    New,
    Top,
    Rising,
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Hot => "hot",
            Sort::New => "new",
            Sort::Top => "top",
            Sort::Rising => "rising",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Ok(Sort::Hot),
            "new" => Ok(Sort::New),
            "top" => Ok(Sort::Top),
            "rising" => Ok(Sort::Rising),
            other => Err(format!(
                "Invalid sort: {}. Use 'hot', 'new', 'top', or 'rising'",
                other
            )),
        }
    }
}

/// Counters reported once at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub found: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub errors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_round_trips_through_str() {
        for sort in [Sort::Hot, Sort::New, Sort::Top, Sort::Rising] {
            assert_eq!(sort.as_str().parse::<Sort>(), Ok(sort));
        }
    }

    #[test]
    fn test_sort_parse_is_case_insensitive() {
        assert_eq!("HOT".parse::<Sort>(), Ok(Sort::Hot));
        assert_eq!(" Top ".parse::<Sort>(), Ok(Sort::Top));
    }

    #[test]
    fn test_sort_parse_rejects_unknown() {
        let err = "controversial".parse::<Sort>().unwrap_err();
        assert!(err.contains("controversial"));
    }

    #[test]
    fn test_post_deserializes_from_listing_child() {
        let json = r#"{"title": "Neon city", "url": "https://i.redd.it/x.png", "score": 42, "id": "abc", "ups": 42}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post, Post::new("Neon city", "https://i.redd.it/x.png", 42, "abc"));
    }

    #[test]
    fn test_post_missing_url_defaults_to_empty() {
        let json = r#"{"title": "Text only", "id": "t1"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert!(post.url.is_empty());
        assert_eq!(post.score, 0);
    }
}
