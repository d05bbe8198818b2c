//! Crawl loop state machine and run entrypoint.

use crate::controls::{Cli, CrawlControls};
use crate::error::{CrawlError, Result};
use crate::extract::extract_links;
use crate::fetch::Fetcher;
use crate::frontier::{Enqueue, Frontier};
use crate::operator;
use crate::store::{PageRecord, PageStore};
use rand::Rng;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Builder;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

/// Why the crawl loop reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The operator requested a stop; the frontier was persisted.
    Cancelled,
    /// Both queues drained; the frontier was persisted.
    Exhausted,
}

/// Per-run counters reported when the loop stops.
#[derive(Debug, Default)]
struct Metrics {
    pages_fetched: usize,
    urls_discovered: usize,
    urls_enqueued: usize,
    duplicates_filtered: usize,
    urls_rejected: usize,
    fetch_failures: usize,
}

impl Metrics {
    fn record_enqueue(&mut self, outcome: Enqueue) {
        self.urls_discovered += 1;
        match outcome {
            Enqueue::Queued(_) => self.urls_enqueued += 1,
            Enqueue::Duplicate => self.duplicates_filtered += 1,
            Enqueue::Rejected => self.urls_rejected += 1,
        }
    }

    fn report(&self) {
        info!(
            pages_fetched = self.pages_fetched,
            urls_discovered = self.urls_discovered,
            urls_enqueued = self.urls_enqueued,
            duplicates_filtered = self.duplicates_filtered,
            urls_rejected = self.urls_rejected,
            fetch_failures = self.fetch_failures,
            "crawl finished"
        );
    }
}

/// Sequential fetch loop over the frontier.
///
/// Owns every piece of mutable crawl state; the only cross-thread channel is
/// the cancellation flag, observed once per iteration before dequeuing. An
/// in-flight fetch always completes (or times out) before cancellation is
/// honored.
pub struct CrawlLoop {
    frontier: Frontier,
    fetcher: Fetcher,
    store: PageStore,
    controls: CrawlControls,
    stop_requested: Arc<AtomicBool>,
    metrics: Metrics,
}

impl CrawlLoop {
    /// Assembles the loop around a fresh or restored frontier.
    pub fn new(
        frontier: Frontier,
        controls: CrawlControls,
        stop_requested: Arc<AtomicBool>,
    ) -> Result<Self> {
        let fetcher = Fetcher::new(&controls).map_err(CrawlError::Client)?;
        let store = PageStore::open(controls.data_dir()).map_err(CrawlError::Io)?;
        Ok(Self {
            frontier,
            fetcher,
            store,
            controls,
            stop_requested,
            metrics: Metrics::default(),
        })
    }

    /// Drives the crawl to its terminal state.
    ///
    /// Stops on operator cancellation or frontier exhaustion; both paths
    /// persist the full frontier snapshot before returning. Per-URL fetch
    /// failures are abandoned; only storage failures propagate.
    pub async fn run(mut self) -> Result<CrawlOutcome> {
        let outcome = loop {
            if self.stop_requested.load(Ordering::Acquire) {
                break CrawlOutcome::Cancelled;
            }
            let Some(url) = self.frontier.dequeue() else {
                break CrawlOutcome::Exhausted;
            };
            self.crawl_one(&url).await?;
        };

        self.frontier.save_to(self.controls.history_file())?;
        self.metrics.report();
        Ok(outcome)
    }

    /// One loop iteration: politeness delay, fetch, persist, enqueue links.
    ///
    /// The URL is already marked visited by `dequeue`, so a failed fetch is
    /// abandoned for the lifetime of the crawl.
    async fn crawl_one(&mut self, url: &str) -> Result<()> {
        // Queue entries were normalized through `Url` on the way in; anything
        // unparseable in a hand-edited snapshot is skipped, not fatal.
        let Ok(url) = Url::parse(url) else {
            warn!(url, "skipping unparseable frontier entry");
            return Ok(());
        };

        sleep(self.politeness_delay()).await;

        let body = match self.fetcher.fetch_text(&url).await {
            Ok(body) => body,
            Err(err) => {
                self.metrics.fetch_failures += 1;
                warn!(url = %url, error = %err, "fetch failed, abandoning url");
                return Ok(());
            }
        };

        let record = PageRecord::new(&url, body);
        self.store.save(&record).map_err(CrawlError::Io)?;
        self.metrics.pages_fetched += 1;
        debug!(url = %url, pending = self.frontier.pending(), "page stored");

        for link in extract_links(&record.body, &url) {
            let outcome = self.frontier.enqueue(&link);
            self.metrics.record_enqueue(outcome);
        }

        Ok(())
    }

    fn politeness_delay(&self) -> Duration {
        let min = self.controls.politeness_min().as_millis() as u64;
        let max = self.controls.politeness_max().as_millis() as u64;
        let millis = rand::thread_rng().gen_range(min..max);
        Duration::from_millis(millis)
    }
}

/// Loads the persisted frontier, or seeds a fresh one from the topic file.
pub fn load_or_seed_frontier(controls: &CrawlControls) -> Result<Frontier> {
    if let Some(frontier) =
        Frontier::load_from(controls.history_file(), controls.target_host())?
    {
        info!(
            pending = frontier.pending(),
            history = %controls.history_file().display(),
            "resuming crawl from snapshot"
        );
        return Ok(frontier);
    }

    let topics = fs::read_to_string(controls.seeds_file()).map_err(CrawlError::Io)?;
    let mut frontier = Frontier::new(controls.target_host());
    frontier.seed(topics.lines(), controls.entry_prefix());
    info!(seeds = frontier.pending(), "seeded frontier from topic list");
    Ok(frontier)
}

/// Entry point used by the binary: spawns the operator listener and drives
/// the crawl loop on a current-thread runtime.
pub fn run(cli: Cli) -> Result<()> {
    let controls = cli.build_controls();
    let stop_requested = Arc::new(AtomicBool::new(false));
    operator::spawn_stop_listener(Arc::clone(&stop_requested));

    let frontier = load_or_seed_frontier(&controls)?;
    let crawl = CrawlLoop::new(frontier, controls, stop_requested)?;

    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CrawlError::Io)?;
    let outcome = rt.block_on(crawl.run())?;
    info!(?outcome, "crawl stopped");
    Ok(())
}
