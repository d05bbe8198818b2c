//! Crawl configuration shared across the runtime.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Browser identity presented on every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Tunable knobs that bound crawl behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrawlControls {
    target_host: String,
    entry_prefix: String,
    politeness_min: Duration,
    politeness_max: Duration,
    fetch_timeout: Duration,
    seeds_file: PathBuf,
    history_file: PathBuf,
    data_dir: PathBuf,
}

impl CrawlControls {
    /// Constructs a new set of crawl controls.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        target_host: String,
        entry_prefix: String,
        politeness_min: Duration,
        politeness_max: Duration,
        fetch_timeout: Duration,
        seeds_file: PathBuf,
        history_file: PathBuf,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            target_host,
            entry_prefix,
            politeness_min,
            politeness_max: politeness_max.max(politeness_min + Duration::from_millis(1)),
            fetch_timeout,
            seeds_file,
            history_file,
            data_dir,
        }
    }

    /// Host substring that marks a URL as primary class.
    pub fn target_host(&self) -> &str {
        &self.target_host
    }

    /// URL prefix that seed topics are appended to.
    pub fn entry_prefix(&self) -> &str {
        &self.entry_prefix
    }

    /// Inclusive lower bound of the politeness delay.
    pub fn politeness_min(&self) -> Duration {
        self.politeness_min
    }

    /// Exclusive upper bound of the politeness delay.
    pub fn politeness_max(&self) -> Duration {
        self.politeness_max
    }

    /// Hard bound on connection plus read time for one fetch.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Newline-delimited topic list used when no snapshot exists.
    pub fn seeds_file(&self) -> &PathBuf {
        &self.seeds_file
    }

    /// Location of the persisted frontier snapshot.
    pub fn history_file(&self) -> &PathBuf {
        &self.history_file
    }

    /// Directory receiving one file per fetched page.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }
}

impl Default for CrawlControls {
    fn default() -> Self {
        Self {
            target_host: "wikivoyage.org".to_string(),
            entry_prefix: "https://en.wikivoyage.org/wiki/".to_string(),
            politeness_min: Duration::from_millis(1000),
            politeness_max: Duration::from_millis(2000),
            fetch_timeout: Duration::from_secs(5),
            seeds_file: PathBuf::from("countries.txt"),
            history_file: PathBuf::from("history/link_queue.json"),
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Command-line interface for the crawler binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "voycrawl", about = "Resumable Wikivoyage crawler")]
pub struct Cli {
    /// Host substring that classifies a URL as primary
    #[arg(long, env = "VOYCRAWL_TARGET_HOST", default_value = "wikivoyage.org")]
    pub target_host: String,

    /// URL prefix seed topics are appended to
    #[arg(
        long,
        env = "VOYCRAWL_ENTRY_PREFIX",
        default_value = "https://en.wikivoyage.org/wiki/"
    )]
    pub entry_prefix: String,

    /// Minimum politeness delay between fetches, in milliseconds
    #[arg(long, env = "VOYCRAWL_POLITENESS_MIN_MS", default_value_t = 1000)]
    pub politeness_min_ms: u64,

    /// Maximum politeness delay between fetches, in milliseconds
    #[arg(long, env = "VOYCRAWL_POLITENESS_MAX_MS", default_value_t = 2000)]
    pub politeness_max_ms: u64,

    /// Per-fetch timeout in seconds
    #[arg(long, env = "VOYCRAWL_FETCH_TIMEOUT_SECS", default_value_t = 5)]
    pub fetch_timeout_secs: u64,

    /// Topic list used to seed the frontier on a fresh run
    #[arg(long, env = "VOYCRAWL_SEEDS", default_value = "countries.txt")]
    pub seeds_file: PathBuf,

    /// Frontier snapshot location
    #[arg(long, env = "VOYCRAWL_HISTORY", default_value = "history/link_queue.json")]
    pub history_file: PathBuf,

    /// Directory fetched pages are written into
    #[arg(long, env = "VOYCRAWL_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,
}

impl Cli {
    /// Converts the parsed CLI into `CrawlControls`.
    pub fn build_controls(&self) -> CrawlControls {
        CrawlControls {
            target_host: self.target_host.clone(),
            entry_prefix: self.entry_prefix.clone(),
            politeness_min: Duration::from_millis(self.politeness_min_ms),
            politeness_max: Duration::from_millis(self.politeness_max_ms.max(self.politeness_min_ms + 1)),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            seeds_file: self.seeds_file.clone(),
            history_file: self.history_file.clone(),
            data_dir: self.data_dir.clone(),
        }
    }
}
