use crate::config::Config;
use crate::fetcher::{is_direct_image, FetchError, ImageFetcher, PostOutcome};
use crate::logger::Logger;
use crate::models::{Post, RunSummary};
use crate::reddit::FeedSource;

/// Runs one pass over a feed: find image posts, download what is missing, report.
pub struct Collector<F, L> {
    config: Config,
    feed: F,
    fetcher: ImageFetcher,
    logger: L,
    summary: RunSummary,
}

impl<F, L> Collector<F, L>
where
    F: FeedSource,
    L: Logger,
{
    pub fn new(config: Config, feed: F, fetcher: ImageFetcher, logger: L) -> Self {
        Self {
            config,
            feed,
            fetcher,
            logger,
            summary: RunSummary::default(),
        }
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn into_logger(self) -> L {
        self.logger
    }

    /// Returns the image posts that were found. A failed connection ends the run
    /// early with an empty list; a failed listing request stops paging but keeps
    /// whatever was already processed. Both are logged, never returned.
    pub async fn run(&mut self) -> Vec<Post> {
        self.summary = RunSummary::default();
        self.logger.log("--- Script execution started ---");
        self.logger.log("Connecting to Reddit API...");

        let mut found = Vec::new();

        match self.feed.connect().await {
            Ok(()) => {
                self.collect(&mut found).await;
                self.log_summary();
            }
            Err(e) => {
                self.logger
                    .log(&format!("An error occurred with the Reddit API: {:#}", e));
                self.logger.log(
                    "Please ensure your Reddit API credentials (REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET, REDDIT_USER_AGENT) are correct.",
                );
            }
        }

        self.logger.log("--- Script execution finished ---");
        found
    }

    /// Pages through the listing, finishing every post of a page before the next request.
    async fn collect(&mut self, found: &mut Vec<Post>) {
        self.logger
            .log(&format!("Read-only status: {}", self.feed.is_read_only()));
        self.logger.log(&format!(
            "Fetching posts and downloading images from r/{}...",
            self.config.subreddit
        ));

        let limit = self.config.post_limit;
        let mut seen = 0;
        let mut after: Option<String> = None;

        while seen < limit {
            let page = match self
                .feed
                .fetch_page(&self.config.subreddit, self.config.sort, limit - seen, after.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    self.logger.log(&format!(
                        "An error occurred while listing r/{}: {:#}",
                        self.config.subreddit, e
                    ));
                    break;
                }
            };

            if page.posts.is_empty() {
                break;
            }

            for post in page.posts.into_iter().take(limit - seen) {
                seen += 1;
                if let Some(post) = self.process(post).await {
                    found.push(post);
                }
            }

            match page.after {
                Some(next) => after = Some(next),
                None => break,
            }
        }
    }

    async fn process(&mut self, post: Post) -> Option<Post> {
        if !is_direct_image(&post.url) {
            return None;
        }

        let short_title: String = post.title.chars().take(50).collect();
        self.logger
            .log(&format!("Found: {}... ({})", short_title, post.url));

        let outcome = self.fetcher.fetch(&post, &mut self.logger).await;
        self.record(&outcome);
        Some(post)
    }

    fn record(&mut self, outcome: &PostOutcome) {
        self.summary.found += 1;

        match outcome {
            PostOutcome::Downloaded(path) => {
                self.logger.log(&format!("  Saved: {}", path.display()));
                self.summary.downloaded += 1;
            }
            PostOutcome::Skipped(path) => {
                self.logger.log(&format!(
                    "  Skipping download, file already exists: {}",
                    path.display()
                ));
                self.summary.skipped += 1;
            }
            PostOutcome::Failed(error) => {
                let message = match error {
                    FetchError::Http(_) | FetchError::Status(_) => {
                        format!("An error occurred with the request: {}", error)
                    }
                    FetchError::Io(_) => format!("An I/O error occurred: {}", error),
                    FetchError::Other(_) => format!("An unexpected error occurred: {}", error),
                };
                self.logger.log(&message);
                self.summary.errors += 1;
            }
        }
    }

    fn log_summary(&mut self) {
        let summary = self.summary;
        self.logger.log("--- Fetch Summary ---");
        self.logger
            .log(&format!("Found {} potential image posts.", summary.found));
        self.logger
            .log(&format!("Successfully downloaded: {}", summary.downloaded));
        self.logger
            .log(&format!("Skipped (already exist): {}", summary.skipped));
        self.logger
            .log(&format!("Errors during download: {}", summary.errors));
    }
}
