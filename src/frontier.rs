//! Priority-classed URL frontier with dedup bookkeeping and snapshot I/O.

use crate::classify::{classify, Priority};
use crate::error::{CrawlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;
use url::Url;

/// Outcome of offering a candidate URL to the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueue {
    /// Accepted and appended to the queue for the given class.
    Queued(Priority),
    /// Already visited or already queued; dropped.
    Duplicate,
    /// Rejected by the classifier (disallowed file type or unparseable).
    Rejected,
}

/// The crawl's entire mutable state: two FIFO queues plus dedup sets.
///
/// A URL lives in at most one of the primary queue, the secondary queue, or
/// the visited set. Dequeue order is insertion order within a class, and the
/// primary queue is fully drained before any secondary URL is returned.
pub struct Frontier {
    target_host: String,
    primary: VecDeque<String>,
    secondary: VecDeque<String>,
    queued_primary: HashSet<String>,
    queued_secondary: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier classifying against `target_host`.
    pub fn new(target_host: impl Into<String>) -> Self {
        Self {
            target_host: target_host.into(),
            primary: VecDeque::new(),
            secondary: VecDeque::new(),
            queued_primary: HashSet::new(),
            queued_secondary: HashSet::new(),
            visited: HashSet::new(),
        }
    }

    /// Seeds the primary queue from topic names joined to an entry URL prefix.
    ///
    /// Blank topics are skipped. Seeds bypass classification: by construction
    /// they live on the target site.
    pub fn seed<'a>(&mut self, topics: impl IntoIterator<Item = &'a str>, entry_prefix: &str) {
        for topic in topics {
            let topic = topic.trim();
            if topic.is_empty() {
                continue;
            }
            let Ok(url) = Url::parse(&format!("{entry_prefix}{topic}")) else {
                continue;
            };
            let url = url.to_string();
            if self.contains(&url) {
                continue;
            }
            self.queued_primary.insert(url.clone());
            self.primary.push_back(url);
        }
    }

    /// Offers a candidate URL to the frontier.
    ///
    /// No-op when the URL is already visited or queued in either class;
    /// otherwise classifies it and appends it to the tail of the matching
    /// queue. Never fails: unacceptable candidates report [`Enqueue::Rejected`].
    pub fn enqueue(&mut self, candidate: &str) -> Enqueue {
        let Ok(url) = Url::parse(candidate) else {
            return Enqueue::Rejected;
        };
        let normalized = url.to_string();

        if self.contains(&normalized) {
            return Enqueue::Duplicate;
        }

        match classify(&url, &self.target_host) {
            Some(Priority::Primary) => {
                self.queued_primary.insert(normalized.clone());
                self.primary.push_back(normalized);
                Enqueue::Queued(Priority::Primary)
            }
            Some(Priority::Secondary) => {
                self.queued_secondary.insert(normalized.clone());
                self.secondary.push_back(normalized);
                Enqueue::Queued(Priority::Secondary)
            }
            None => Enqueue::Rejected,
        }
    }

    /// Pops the next URL to fetch, marking it visited.
    ///
    /// Primary URLs are exhausted before any secondary URL is returned.
    /// `None` signals frontier exhaustion.
    pub fn dequeue(&mut self) -> Option<String> {
        if let Some(url) = self.primary.pop_front() {
            self.queued_primary.remove(&url);
            self.visited.insert(url.clone());
            return Some(url);
        }
        if let Some(url) = self.secondary.pop_front() {
            self.queued_secondary.remove(&url);
            self.visited.insert(url.clone());
            return Some(url);
        }
        None
    }

    /// Number of URLs waiting across both queues.
    pub fn pending(&self) -> usize {
        self.primary.len() + self.secondary.len()
    }

    /// Whether the URL has been visited (dequeued at least once).
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    fn contains(&self, url: &str) -> bool {
        self.visited.contains(url)
            || self.queued_primary.contains(url)
            || self.queued_secondary.contains(url)
    }

    /// Captures the total frontier state for persistence.
    pub fn snapshot(&self) -> FrontierSnapshot {
        FrontierSnapshot {
            primary: self.primary.iter().cloned().collect(),
            secondary: self.secondary.iter().cloned().collect(),
            queued_primary: membership(&self.queued_primary),
            queued_secondary: membership(&self.queued_secondary),
            visited: membership(&self.visited),
        }
    }

    /// Reconstructs a frontier from a persisted snapshot.
    ///
    /// Queue order is restored exactly as stored.
    pub fn from_snapshot(snapshot: FrontierSnapshot, target_host: impl Into<String>) -> Self {
        Self {
            target_host: target_host.into(),
            queued_primary: snapshot.queued_primary.into_keys().collect(),
            queued_secondary: snapshot.queued_secondary.into_keys().collect(),
            visited: snapshot.visited.into_keys().collect(),
            primary: snapshot.primary.into(),
            secondary: snapshot.secondary.into(),
        }
    }

    /// Writes the snapshot as JSON, creating parent directories as needed.
    ///
    /// Failure here is fatal to the crawl: losing frontier state would break
    /// the resumability guarantee.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(CrawlError::Io)?;
            }
        }
        let json = serde_json::to_string(&self.snapshot()).map_err(CrawlError::Snapshot)?;
        fs::write(path, json).map_err(CrawlError::Io)?;
        Ok(())
    }

    /// Loads a previously persisted frontier, or `None` when no snapshot exists.
    pub fn load_from(path: &Path, target_host: &str) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let json = fs::read_to_string(path).map_err(CrawlError::Io)?;
        let snapshot: FrontierSnapshot =
            serde_json::from_str(&json).map_err(CrawlError::Snapshot)?;
        Ok(Some(Self::from_snapshot(snapshot, target_host)))
    }
}

fn membership(set: &HashSet<String>) -> BTreeMap<String, bool> {
    set.iter().map(|url| (url.clone(), true)).collect()
}

/// External snapshot format: ordered pending lists plus membership maps of
/// URL to `true`, one per dedup set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontierSnapshot {
    /// Pending primary-class URLs in FIFO order.
    pub primary: Vec<String>,
    /// Pending secondary-class URLs in FIFO order.
    pub secondary: Vec<String>,
    /// Membership map mirroring the primary queue.
    pub queued_primary: BTreeMap<String, bool>,
    /// Membership map mirroring the secondary queue.
    pub queued_secondary: BTreeMap<String, bool>,
    /// Membership map of every URL already dequeued.
    pub visited: BTreeMap<String, bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &str = "wikivoyage.org";

    fn frontier() -> Frontier {
        Frontier::new(TARGET)
    }

    #[test]
    fn seed_topic_builds_entry_url() {
        let mut f = frontier();
        f.seed(["france"], "https://en.wikivoyage.org/wiki/");
        assert_eq!(
            f.dequeue().as_deref(),
            Some("https://en.wikivoyage.org/wiki/france")
        );
        assert!(f.is_visited("https://en.wikivoyage.org/wiki/france"));
        assert_eq!(f.dequeue(), None);
    }

    #[test]
    fn enqueue_is_deduplicated() {
        let mut f = frontier();
        assert_eq!(
            f.enqueue("https://en.wikivoyage.org/wiki/Paris"),
            Enqueue::Queued(Priority::Primary)
        );
        assert_eq!(
            f.enqueue("https://en.wikivoyage.org/wiki/Paris"),
            Enqueue::Duplicate
        );
        assert_eq!(f.pending(), 1);
    }

    #[test]
    fn visited_urls_are_never_reenqueued() {
        let mut f = frontier();
        f.enqueue("https://en.wikivoyage.org/wiki/Paris");
        let url = f.dequeue().expect("one pending url");
        assert_eq!(f.enqueue(&url), Enqueue::Duplicate);
        assert_eq!(f.pending(), 0);
    }

    #[test]
    fn primary_drains_before_secondary() {
        let mut f = frontier();
        f.enqueue("https://example.com/a");
        f.enqueue("https://en.wikivoyage.org/wiki/One");
        f.enqueue("https://example.com/b");
        f.enqueue("https://en.wikivoyage.org/wiki/Two");

        let order: Vec<String> = std::iter::from_fn(|| f.dequeue()).collect();
        assert_eq!(
            order,
            vec![
                "https://en.wikivoyage.org/wiki/One",
                "https://en.wikivoyage.org/wiki/Two",
                "https://example.com/a",
                "https://example.com/b",
            ]
        );
    }

    #[test]
    fn fifo_within_a_class() {
        let mut f = frontier();
        for name in ["A", "B", "C"] {
            f.enqueue(&format!("https://en.wikivoyage.org/wiki/{name}"));
        }
        assert_eq!(
            f.dequeue().as_deref(),
            Some("https://en.wikivoyage.org/wiki/A")
        );
        assert_eq!(
            f.dequeue().as_deref(),
            Some("https://en.wikivoyage.org/wiki/B")
        );
        assert_eq!(
            f.dequeue().as_deref(),
            Some("https://en.wikivoyage.org/wiki/C")
        );
    }

    #[test]
    fn classifier_rejections_never_queue() {
        let mut f = frontier();
        assert_eq!(
            f.enqueue("https://en.wikivoyage.org/images/map.png"),
            Enqueue::Rejected
        );
        assert_eq!(f.enqueue("not a url at all"), Enqueue::Rejected);
        assert_eq!(f.pending(), 0);
    }

    #[test]
    fn snapshot_round_trip_preserves_dequeue_order() {
        let mut f = frontier();
        f.enqueue("https://example.com/x");
        f.enqueue("https://en.wikivoyage.org/wiki/One");
        f.enqueue("https://en.wikivoyage.org/wiki/Two");
        f.dequeue(); // One becomes visited

        let json = serde_json::to_string(&f.snapshot()).expect("snapshot serializes");
        let snapshot: FrontierSnapshot = serde_json::from_str(&json).expect("snapshot parses");
        let mut restored = Frontier::from_snapshot(snapshot, TARGET);

        assert!(restored.is_visited("https://en.wikivoyage.org/wiki/One"));
        assert_eq!(
            restored.dequeue().as_deref(),
            Some("https://en.wikivoyage.org/wiki/Two")
        );
        assert_eq!(restored.dequeue().as_deref(), Some("https://example.com/x"));
        assert_eq!(restored.dequeue(), None);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history/link_queue.json");

        let mut f = frontier();
        f.enqueue("https://en.wikivoyage.org/wiki/France");
        f.save_to(&path).expect("snapshot saved");

        let mut restored = Frontier::load_from(&path, TARGET)
            .expect("load succeeds")
            .expect("snapshot present");
        assert_eq!(
            restored.dequeue().as_deref(),
            Some("https://en.wikivoyage.org/wiki/France")
        );
    }

    #[test]
    fn missing_snapshot_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded =
            Frontier::load_from(&dir.path().join("absent.json"), TARGET).expect("load succeeds");
        assert!(loaded.is_none());
    }
}
