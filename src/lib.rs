#![warn(missing_docs)]
//! Core library entry points for the voycrawl frontier crawler.
//!
//! The crawl is a single sequential fetch loop over a resumable,
//! priority-classed URL frontier: target-site URLs drain before anything
//! else, every URL is attempted at most once per crawl lifetime, and the
//! full frontier state is snapshotted on shutdown or exhaustion.

pub mod classify;
pub mod controls;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod operator;
pub mod runtime;
pub mod store;

pub use classify::{classify, Priority};
pub use controls::{Cli, CrawlControls};
pub use error::{CrawlError, Result};
pub use extract::extract_links;
pub use fetch::{FetchError, Fetcher};
pub use frontier::{Enqueue, Frontier, FrontierSnapshot};
pub use runtime::{run as run_crawler, CrawlLoop, CrawlOutcome};
pub use store::{PageRecord, PageStore};
