// Public modules
pub mod collector;
pub mod config;
pub mod fetcher;
pub mod logger;
pub mod models;
pub mod reddit;
pub mod sanitize;

// Re-export commonly used types
pub use collector::Collector;
pub use config::{Config, Credentials};
pub use fetcher::{is_direct_image, FetchError, ImageFetcher, PostOutcome};
pub use logger::{timestamped, FileLogger, Logger, MemoryLogger};
pub use models::{Post, RunSummary, Sort};
pub use reddit::{FeedSource, Page, RedditClient};
pub use sanitize::sanitize_filename;
