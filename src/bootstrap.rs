// SPDX-License-Identifier: MPL-2.0
//! Page bootstrap: turns a parsed page into tracked asset loads.
//!
//! The scan registers every asset the page references with a
//! [`ProgressTracker`] and closes registration once done. The application
//! then fetches each [`AssetRequest`] and reports back through
//! [`PageBootstrap::settle`], which marks the matching registration complete
//! whether the load succeeded or failed.

use crate::markup::PageDocument;
use crate::progress::{CompletionHandle, Progress, ProgressTracker};
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Identifies one asset request of a bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(usize);

impl AssetId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Stylesheet,
    Script,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Image => "image",
            AssetKind::Stylesheet => "stylesheet",
            AssetKind::Script => "script",
        };
        f.write_str(name)
    }
}

/// One asset load requested by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub id: AssetId,
    pub url: String,
    pub kind: AssetKind,
}

/// How an asset load ended. Both variants count as settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    Loaded,
    Failed(String),
}

/// Tracks the preload of one page.
#[derive(Debug)]
pub struct PageBootstrap {
    requests: Vec<AssetRequest>,
    pending: HashMap<AssetId, CompletionHandle>,
    completed: Rc<Cell<bool>>,
    completion_taken: bool,
}

impl PageBootstrap {
    /// Registers every asset of `page` with `tracker`, in document order,
    /// then closes registration.
    ///
    /// The tracker should be fresh (or [`reset`](ProgressTracker::reset)):
    /// a tracker whose registration is already closed yields a bootstrap
    /// with no requests.
    pub fn scan(page: &PageDocument, tracker: &mut ProgressTracker) -> Self {
        let sources = page
            .images
            .iter()
            .chain(&page.preload_images)
            .map(|url| (url, AssetKind::Image))
            .chain(page.stylesheets.iter().map(|url| (url, AssetKind::Stylesheet)))
            .chain(page.scripts.iter().map(|url| (url, AssetKind::Script)));

        let mut requests = Vec::new();
        let mut pending = HashMap::new();
        for (url, kind) in sources {
            let handle = match tracker.register(url.clone()) {
                Ok(handle) => handle,
                Err(err) => {
                    tracing::warn!(%url, error = %err, "asset not registered");
                    continue;
                }
            };
            let id = AssetId(requests.len());
            pending.insert(id, handle);
            requests.push(AssetRequest {
                id,
                url: url.clone(),
                kind,
            });
        }

        let completed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&completed);
        tracker.on_all_complete(move || flag.set(true));
        tracker.close_registration();

        tracing::info!(assets = requests.len(), "page scan finished");
        Self {
            requests,
            pending,
            completed,
            completion_taken: false,
        }
    }

    /// Requests to fetch, in registration order.
    #[must_use]
    pub fn requests(&self) -> &[AssetRequest] {
        &self.requests
    }

    #[must_use]
    pub fn request(&self, id: AssetId) -> Option<&AssetRequest> {
        self.requests.get(id.0)
    }

    /// Number of requests that have not settled yet.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Marks the asset `id` settled. Returns `None` for an unknown or
    /// already settled id.
    pub fn settle(
        &mut self,
        id: AssetId,
        outcome: &SettleOutcome,
        tracker: &mut ProgressTracker,
    ) -> Option<Progress> {
        let handle = self.pending.remove(&id)?;
        if let SettleOutcome::Failed(reason) = outcome {
            tracing::warn!(url = handle.url(), %reason, "asset failed to load");
        }
        Some(tracker.mark_complete(handle))
    }

    /// Returns `true` exactly once, after every asset has settled.
    pub fn take_completed(&mut self) -> bool {
        if self.completion_taken || !self.completed.get() {
            return false;
        }
        self.completion_taken = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageDocument {
        PageDocument {
            images: vec!["a.jpg".into(), "b.jpg".into(), "a.jpg".into()],
            preload_images: vec!["hero.jpg".into()],
            stylesheets: vec!["style.css".into()],
            scripts: vec!["app.js".into()],
            ..PageDocument::default()
        }
    }

    #[test]
    fn scan_registers_every_asset_and_closes_registration() {
        let mut tracker = ProgressTracker::new();
        let bootstrap = PageBootstrap::scan(&page(), &mut tracker);

        let kinds: Vec<_> = bootstrap.requests().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AssetKind::Image,
                AssetKind::Image,
                AssetKind::Image,
                AssetKind::Image,
                AssetKind::Stylesheet,
                AssetKind::Script
            ]
        );
        assert_eq!(tracker.progress().total, 6);
        assert!(tracker.is_registration_closed());
    }

    #[test]
    fn duplicate_urls_are_counted_per_occurrence() {
        let mut tracker = ProgressTracker::new();
        let bootstrap = PageBootstrap::scan(&page(), &mut tracker);
        let count = bootstrap
            .requests()
            .iter()
            .filter(|r| r.url == "a.jpg")
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn failures_settle_like_successes() {
        let mut tracker = ProgressTracker::new();
        let mut bootstrap = PageBootstrap::scan(&page(), &mut tracker);
        let ids: Vec<_> = bootstrap.requests().iter().map(|r| r.id).collect();

        for (n, id) in ids.iter().enumerate() {
            assert!(!bootstrap.take_completed());
            let outcome = if n % 2 == 0 {
                SettleOutcome::Loaded
            } else {
                SettleOutcome::Failed("404".into())
            };
            let progress = bootstrap.settle(*id, &outcome, &mut tracker).unwrap();
            assert_eq!(progress.completed, n as u64 + 1);
        }

        assert!(bootstrap.take_completed());
        assert!(!bootstrap.take_completed());
        assert_eq!(bootstrap.pending_count(), 0);
    }

    #[test]
    fn settling_twice_is_ignored() {
        let mut tracker = ProgressTracker::new();
        let mut bootstrap = PageBootstrap::scan(&page(), &mut tracker);
        let id = bootstrap.requests()[0].id;

        assert!(bootstrap.settle(id, &SettleOutcome::Loaded, &mut tracker).is_some());
        assert!(bootstrap.settle(id, &SettleOutcome::Loaded, &mut tracker).is_none());
        assert_eq!(tracker.progress().completed, 1);
    }

    #[test]
    fn empty_page_is_complete_right_after_scan() {
        let mut tracker = ProgressTracker::new();
        let mut bootstrap = PageBootstrap::scan(&PageDocument::default(), &mut tracker);

        assert!(bootstrap.requests().is_empty());
        assert!(tracker.is_complete());
        assert!(bootstrap.take_completed());
    }

    #[test]
    fn scan_on_closed_tracker_registers_nothing() {
        let mut tracker = ProgressTracker::new();
        tracker.close_registration();
        let bootstrap = PageBootstrap::scan(&page(), &mut tracker);
        assert!(bootstrap.requests().is_empty());
    }
}
