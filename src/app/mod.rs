// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration.
//!
//! The `App` struct owns the page being shown and wires the components
//! together: the progress tracker and bootstrap drive the loading overlay,
//! the thumbnail grid opens the lightbox, and the lightbox asks for preview
//! loads and downloads. Everything asynchronous (fetching, decoding, the save
//! dialog) runs as Iced tasks whose results come back as messages.

mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::assets::{DecodedImage, Location};
use crate::bootstrap::PageBootstrap;
use crate::config::Config;
use crate::lightbox;
use crate::progress::ProgressTracker;
use crate::ui::{gallery, loader};
use iced::{window, Subscription, Task, Theme};
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;

pub const APP_TITLE: &str = "Iced Gallery";
pub const WINDOW_DEFAULT_WIDTH: u32 = 1024;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 768;
pub const MIN_WINDOW_WIDTH: u32 = 480;
pub const MIN_WINDOW_HEIGHT: u32 = 360;

/// Where the page currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Opening,
    Ready,
    Failed(String),
}

/// Root Iced application state.
pub struct App {
    config: Config,
    rich_override: bool,
    location: Option<Location>,
    status: PageStatus,
    page_title: String,
    tracker: ProgressTracker,
    bootstrap: Option<PageBootstrap>,
    loader: Option<loader::State>,
    gallery: Option<gallery::State>,
    lightbox: lightbox::Controller,
    preview_cache: LruCache<String, DecodedImage>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("location", &self.location)
            .field("status", &self.status)
            .field("progress", &self.tracker.progress())
            .field("lightbox_open", &self.lightbox.is_open())
            .finish()
    }
}

fn preview_cache(entries: usize) -> LruCache<String, DecodedImage> {
    LruCache::new(NonZeroUsize::new(entries).unwrap_or(NonZeroUsize::MIN))
}

impl Default for App {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced requires `Fn` for boot; flags are only consumed on the first call.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    fn with_config(config: Config) -> Self {
        let cache_entries = config.gallery.preview_cache_entries();
        let mut tracker = ProgressTracker::new();
        tracker.on_progress(|progress| {
            tracing::trace!(
                completed = progress.completed,
                total = progress.total,
                fraction = progress.fraction(),
                "preload progress"
            );
        });

        Self {
            config,
            rich_override: false,
            location: None,
            status: PageStatus::Opening,
            page_title: String::new(),
            tracker,
            bootstrap: None,
            loader: None,
            gallery: None,
            lightbox: lightbox::Controller::default(),
            preview_cache: preview_cache(cache_entries),
        }
    }

    /// Starts fetching the page named in `flags`.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let mut app = Self::with_config(flags.config);
        app.rich_override = flags.rich;

        let Some(page) = flags.page else {
            app.status = PageStatus::Failed(
                "No gallery page given. Usage: iced_gallery [--rich] <PAGE>".to_string(),
            );
            return (app, Task::none());
        };

        match Location::from_argument(&page) {
            Ok(location) => {
                let task = app.open(location);
                (app, task)
            }
            Err(err) => {
                app.status = PageStatus::Failed(err.to_string());
                (app, Task::none())
            }
        }
    }

    /// Starts fetching the page at `location`.
    fn open(&mut self, location: Location) -> Task<Message> {
        tracing::info!(page = %location, "opening gallery page");
        self.location = Some(location.clone());
        self.status = PageStatus::Opening;
        Task::perform(crate::assets::fetch_text(location), Message::PageFetched)
    }

    fn title(&self) -> String {
        if self.page_title.is_empty() {
            APP_TITLE.to_string()
        } else {
            format!("{} - {}", self.page_title, APP_TITLE)
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        subscription::subscription(subscription::Needs {
            animating: self.loader.as_ref().is_some_and(loader::State::is_animating)
                || self.gallery.as_ref().is_some_and(gallery::State::is_animating),
            frame_interval: self.config.loader.frame_interval(),
            keyboard: self.lightbox.keyboard_captured(),
        })
    }

    #[must_use]
    pub fn status(&self) -> &PageStatus {
        &self.status
    }
}
