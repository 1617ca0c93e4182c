// SPDX-License-Identifier: MPL-2.0
//! Asset preload progress tracking.
//!
//! A [`ProgressTracker`] counts how many assets were requested and how many
//! have settled (loaded or failed), reports fractional progress to its
//! listeners after every settle, and fires its completion callbacks exactly
//! once: the first time registration has been closed and every requested
//! asset has settled.
//!
//! Registration hands out a [`CompletionHandle`] per asset. The handle is
//! consumed by [`ProgressTracker::mark_complete`], so each registration can
//! contribute at most one completion.

use crate::events::{EventEmitter, ListenerId};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TRACKER_ID: AtomicU64 = AtomicU64::new(1);

/// Snapshot of the preload progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Number of assets that have settled.
    pub completed: u64,
    /// Number of assets registered so far.
    pub total: u64,
}

impl Progress {
    /// Fraction of settled assets in `[0, 1]`.
    ///
    /// With nothing registered the fraction is `1.0` only if something has
    /// completed, `0.0` otherwise, so an empty scan never looks finished
    /// before it has even started.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return if self.completed > 0 { 1.0 } else { 0.0 };
        }
        (self.completed as f32 / self.total as f32).clamp(0.0, 1.0)
    }
}

/// Proof of one registration. Not `Clone`: marking it complete consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct CompletionHandle {
    tracker: u64,
    epoch: u32,
    sequence: u64,
    url: String,
}

impl CompletionHandle {
    /// URL of the asset this handle was issued for.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Registration order within the tracker, starting at 0.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Errors reported by [`ProgressTracker::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// Registration phase already closed; the asset would never be counted.
    RegistrationClosed,
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::RegistrationClosed => write!(f, "registration phase is closed"),
        }
    }
}

impl std::error::Error for TrackerError {}

type CompletionCallback = Box<dyn FnOnce()>;

/// Counts requested versus settled asset loads.
pub struct ProgressTracker {
    id: u64,
    epoch: u32,
    total: u64,
    completed: u64,
    registration_closed: bool,
    completion_fired: bool,
    progress_listeners: EventEmitter<Progress>,
    completion_callbacks: Vec<CompletionCallback>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_TRACKER_ID.fetch_add(1, Ordering::Relaxed),
            epoch: 0,
            total: 0,
            completed: 0,
            registration_closed: false,
            completion_fired: false,
            progress_listeners: EventEmitter::new(),
            completion_callbacks: Vec::new(),
        }
    }

    /// Returns the tracker to its freshly constructed state.
    ///
    /// Counts are zeroed, registration reopens and completion is re-armed.
    /// Progress listeners stay subscribed; pending completion callbacks are
    /// dropped. Handles issued before the reset are no longer accepted.
    pub fn reset(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.total = 0;
        self.completed = 0;
        self.registration_closed = false;
        self.completion_fired = false;
        self.completion_callbacks.clear();
        tracing::debug!(tracker = self.id, epoch = self.epoch, "progress tracker reset");
    }

    /// Registers one asset load and returns its completion handle.
    pub fn register(&mut self, url: impl Into<String>) -> Result<CompletionHandle, TrackerError> {
        if self.registration_closed {
            return Err(TrackerError::RegistrationClosed);
        }
        let handle = CompletionHandle {
            tracker: self.id,
            epoch: self.epoch,
            sequence: self.total,
            url: url.into(),
        };
        self.total += 1;
        tracing::trace!(url = %handle.url, total = self.total, "asset registered");
        Ok(handle)
    }

    /// Marks the asset behind `handle` as settled.
    ///
    /// Handles from another tracker, or from before the last [`reset`], are
    /// ignored. Returns the progress after the update.
    ///
    /// [`reset`]: Self::reset
    pub fn mark_complete(&mut self, handle: CompletionHandle) -> Progress {
        if handle.tracker != self.id || handle.epoch != self.epoch {
            tracing::warn!(url = %handle.url, "ignoring completion handle from another tracker");
            return self.progress();
        }
        if self.completed < self.total {
            self.completed += 1;
        }
        let progress = self.progress();
        tracing::debug!(
            url = %handle.url,
            completed = progress.completed,
            total = progress.total,
            "asset settled"
        );
        self.progress_listeners.emit(&progress);
        self.check_completion();
        progress
    }

    /// Declares that no more assets will be registered.
    ///
    /// If everything registered so far has already settled (including the
    /// case of nothing registered at all), completion fires now.
    pub fn close_registration(&mut self) {
        if self.registration_closed {
            return;
        }
        self.registration_closed = true;
        tracing::debug!(total = self.total, "asset registration closed");
        self.check_completion();
    }

    /// Subscribes to progress updates, delivered after every settle.
    pub fn on_progress<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Progress) + 'static,
    {
        self.progress_listeners.subscribe(listener)
    }

    /// Removes a progress listener.
    pub fn off_progress(&mut self, id: ListenerId) -> bool {
        self.progress_listeners.unsubscribe(id)
    }

    /// Runs `callback` once all assets have settled.
    ///
    /// If completion already happened the callback runs immediately.
    pub fn on_all_complete<F>(&mut self, callback: F)
    where
        F: FnOnce() + 'static,
    {
        if self.completion_fired {
            callback();
        } else {
            self.completion_callbacks.push(Box::new(callback));
        }
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.completed,
            total: self.total,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completion_fired
    }

    #[must_use]
    pub fn is_registration_closed(&self) -> bool {
        self.registration_closed
    }

    fn check_completion(&mut self) {
        if self.completion_fired || !self.registration_closed || self.completed != self.total {
            return;
        }
        self.completion_fired = true;
        tracing::info!(total = self.total, "all assets settled");
        for callback in self.completion_callbacks.drain(..) {
            callback();
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("completed", &self.completed)
            .field("total", &self.total)
            .field("registration_closed", &self.registration_closed)
            .field("completion_fired", &self.completion_fired)
            .finish()
    }
}
