use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::logger::Logger;
use crate::models::Post;
use crate::sanitize::sanitize_filename;

pub const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

/// Hosts that serve raw image bytes even without an extension in the URL
pub const IMAGE_HOSTS: [&str; 2] = ["i.redd.it", "i.imgur.com"];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {0}")]
    Status(StatusCode),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// What happened to a single image post
#[derive(Debug)]
pub enum PostOutcome {
    Downloaded(PathBuf),
    Skipped(PathBuf),
    Failed(FetchError),
}

/// Direct image link check: known extension or known image host
pub fn is_direct_image(url: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| url.ends_with(ext))
        || IMAGE_HOSTS.iter().any(|host| url.contains(host))
}

/// Extension of the last path component, dot included; empty when there is none.
/// Query strings are not stripped, so `a.png?x=1` yields `.png?x=1`.
pub fn url_extension(url: &str) -> &str {
    let name = url.rsplit('/').next().unwrap_or(url);
    let stem_len = name.len() - name.trim_start_matches('.').len();

    match name.rfind('.') {
        Some(dot) if dot >= stem_len => &name[dot..],
        _ => "",
    }
}

/// Streams images into one directory, one file per post
pub struct ImageFetcher {
    client: Client,
    download_dir: PathBuf,
}

impl ImageFetcher {
    /// Creates the download directory if needed.
    pub fn new(user_agent: &str, download_dir: impl Into<PathBuf>) -> Result<Self> {
        let download_dir = download_dir.into();

        fs::create_dir_all(&download_dir).with_context(|| {
            format!("Failed to create download directory: {}", download_dir.display())
        })?;

        // Only the connect phase is bounded; large images may stream for a while
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            download_dir,
        })
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// `<download dir>/<sanitized title or id><url extension>`
    pub fn destination(&self, post: &Post) -> PathBuf {
        let mut stem = sanitize_filename(&post.title);
        if stem.is_empty() {
            stem = post.id.clone();
        }

        self.download_dir
            .join(format!("{}{}", stem, url_extension(&post.url)))
    }

    /// Downloads the post's image unless a file with the same name is already there.
    pub async fn fetch(&self, post: &Post, logger: &mut dyn Logger) -> PostOutcome {
        let filepath = self.destination(post);

        if filepath.exists() {
            return PostOutcome::Skipped(filepath);
        }

        logger.log(&format!("  Downloading to {}...", filepath.display()));

        match self.download(&post.url, &filepath).await {
            Ok(()) => PostOutcome::Downloaded(filepath),
            Err(e) => PostOutcome::Failed(e),
        }
    }

    async fn download(&self, url: &str, filepath: &Path) -> Result<(), FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::Other(format!("invalid URL {}: {}", url, e)))?;

        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let mut file = File::create(filepath).await?;

        if let Err(e) = copy_body(&mut response, &mut file).await {
            drop(file);
            let _ = tokio::fs::remove_file(filepath).await;
            return Err(e);
        }

        Ok(())
    }
}

async fn copy_body(response: &mut Response, file: &mut File) -> Result<(), FetchError> {
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}
