use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::Credentials;
use crate::models::{Post, Sort};

const AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// Reddit caps a single listing request at 100 children
const PAGE_SIZE: usize = 100;

/// Source of posts for a named feed.
#[async_trait]
pub trait FeedSource {
    /// Establishes a session; must succeed before posts can be fetched.
    async fn connect(&mut self) -> Result<()>;

    fn is_read_only(&self) -> bool;

    /// One batch of at most `limit` posts, continuing after the `after` cursor.
    async fn fetch_page(
        &self,
        feed: &str,
        sort: Sort,
        limit: usize,
        after: Option<&str>,
    ) -> Result<Page>;
}

/// A slice of a listing plus the cursor for the next one
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub posts: Vec<Post>,
    /// `None` once the listing is exhausted
    pub after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    after: Option<String>,
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: Post,
}

/// Application-only OAuth client for public subreddit listings
pub struct RedditClient {
    client: Client,
    credentials: Credentials,
    auth_url: Url,
    api_base: Url,
    access_token: Option<String>,
}

impl RedditClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_endpoints(credentials, AUTH_URL, API_BASE)
    }

    pub fn with_endpoints(credentials: Credentials, auth_url: &str, api_base: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(credentials.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        let auth_url = Url::parse(auth_url)
            .with_context(|| format!("Invalid Reddit auth URL: {}", auth_url))?;
        let api_base = Url::parse(api_base)
            .with_context(|| format!("Invalid Reddit API URL: {}", api_base))?;

        Ok(Self {
            client,
            credentials,
            auth_url,
            api_base,
            access_token: None,
        })
    }

    fn listing_url(&self, feed: &str, sort: Sort, limit: usize, after: Option<&str>) -> Result<Url> {
        let path = format!("r/{}/{}", urlencoding::encode(feed), sort.as_str());
        let mut url = self
            .api_base
            .join(&path)
            .with_context(|| format!("Failed to build listing URL for r/{}", feed))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            query.append_pair("raw_json", "1");
            if let Some(after) = after {
                query.append_pair("after", after);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl FeedSource for RedditClient {
    async fn connect(&mut self) -> Result<()> {
        let response = self
            .client
            .post(self.auth_url.clone())
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .context("Failed to reach Reddit authentication endpoint")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("unknown error"));

        if !status.is_success() {
            anyhow::bail!("Reddit authentication failed: {} - {}", status, body);
        }

        let token: TokenResponse =
            serde_json::from_str(&body).context("Failed to parse Reddit token response")?;

        if let Some(error) = token.error {
            anyhow::bail!("Reddit authentication failed: {}", error);
        }

        let access_token = token
            .access_token
            .context("Reddit token response did not contain an access token")?;

        self.access_token = Some(access_token);
        Ok(())
    }

    fn is_read_only(&self) -> bool {
        // client_credentials grants carry no user context
        true
    }

    async fn fetch_page(
        &self,
        feed: &str,
        sort: Sort,
        limit: usize,
        after: Option<&str>,
    ) -> Result<Page> {
        let access_token = self
            .access_token
            .as_deref()
            .context("Not connected to Reddit")?;

        let batch = PAGE_SIZE.min(limit);
        let url = self.listing_url(feed, sort, batch, after)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .with_context(|| format!("Failed to fetch posts from r/{}", feed))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            anyhow::bail!("Reddit API returned error: {} - {}", status, error_text);
        }

        let listing = response
            .json::<Listing>()
            .await
            .context("Failed to parse Reddit listing response")?;

        let mut posts: Vec<Post> = listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .collect();
        posts.truncate(batch);

        Ok(Page {
            posts,
            after: listing.data.after,
        })
    }
}
