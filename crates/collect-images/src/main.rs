use anyhow::Result;
use clap::Parser;
use shared::{
    timestamped, Collector, Config, FeedSource, FileLogger, ImageFetcher, Logger, RedditClient,
    Sort,
};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "collect-images")]
#[command(about = "Download direct image posts from a subreddit")]
struct Args {
    /// Subreddit to read (default: AIArtwork)
    #[arg(short, long)]
    subreddit: Option<String>,

    /// Maximum number of posts to request
    #[arg(short, long)]
    limit: Option<usize>,

    /// Listing order (hot, new, top, rising)
    #[arg(long)]
    sort: Option<Sort>,

    /// Directory to save images into (default: the subreddit name)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Log file to append to (default: parse.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn apply(self, mut config: Config) -> Config {
        if let Some(subreddit) = self.subreddit {
            config = config.with_subreddit(subreddit);
        }
        if let Some(limit) = self.limit {
            config.post_limit = limit;
        }
        if let Some(sort) = self.sort {
            config.sort = sort;
        }
        if let Some(dir) = self.dir {
            config.download_dir = dir;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = log_file;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.apply(Config::from_env());

    let mut logger = FileLogger::open(&config.log_file)?;
    drive(&config, &mut logger, &mut io::stderr()).await;
    drop(logger);

    println!("{}", confirmation(&config));

    Ok(())
}

/// Runs against Reddit; anything `run` returns is reported, never propagated.
async fn drive<L: Logger, W: Write>(config: &Config, logger: &mut L, stderr: &mut W) {
    let result = match RedditClient::new(config.credentials.clone()) {
        Ok(feed) => run(config, feed, logger).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        let message = format!("UNHANDLED EXCEPTION in main block: {:#}", e);
        let _ = writeln!(stderr, "{}", timestamped(&message));
        logger.log(&message);
    }
}

async fn run<F: FeedSource, L: Logger>(config: &Config, feed: F, logger: &mut L) -> Result<()> {
    let fetcher = ImageFetcher::new(&config.credentials.user_agent, &config.download_dir)?;

    let posts = {
        let mut collector = Collector::new(config.clone(), feed, fetcher, &mut *logger);
        collector.run().await
    };

    logger.log("--- Collected Post Info (Details in Log) ---");
    if posts.is_empty() {
        logger.log("No image posts were fetched or processed.");
    }

    Ok(())
}

fn confirmation(config: &Config) -> String {
    format!("Script finished. Output saved to {}", config.log_file.display())
}
