// SPDX-License-Identifier: MPL-2.0
//! Loading overlay shown while the page's assets are preloaded.
//!
//! The overlay shows the page title, a progress bar and a "Now Loading" label
//! whose three dots appear one by one. Once every asset has settled it fades
//! out and reports [`Effect::Finished`] so the caller can drop it.

use crate::config::{LoaderConfig, LOADING_DOT_COUNT};
use crate::progress::Progress;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{image, progress_bar, Column, Container, Image, Stack, Text};
use iced::{
    alignment::{Horizontal, Vertical},
    ContentFit, Element, Length,
};
use std::time::{Duration, Instant};

const LOADING_LABEL: &str = "Now Loading";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Loading,
    FadingOut { started: Instant },
    Finished,
}

#[derive(Debug, Clone)]
pub struct State {
    title: String,
    debug: bool,
    background: Option<image::Handle>,
    progress: Progress,
    visible_dots: usize,
    last_dot: Option<Instant>,
    phase: Phase,
    opacity: f32,
    fade_out: Duration,
    dots_interval: Duration,
}

#[derive(Debug, Clone)]
pub enum Message {
    Progressed(Progress),
    /// Every asset settled at the given instant.
    Completed(Instant),
    Tick(Instant),
    BackgroundLoaded(Result<image::Handle, String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Fade-out done; the overlay can be removed.
    Finished,
}

impl State {
    #[must_use]
    pub fn new(title: impl Into<String>, debug: bool, config: &LoaderConfig) -> Self {
        Self {
            title: title.into(),
            debug,
            background: None,
            progress: Progress::default(),
            visible_dots: 0,
            last_dot: None,
            phase: Phase::Loading,
            opacity: 1.0,
            fade_out: config.fade_out(),
            dots_interval: config.dots_interval(),
        }
    }

    pub fn handle(&mut self, message: Message) -> Effect {
        match message {
            Message::Progressed(progress) => {
                self.progress = progress;
                Effect::None
            }
            Message::Completed(now) => {
                if self.phase == Phase::Loading {
                    tracing::debug!(fade_ms = self.fade_out.as_millis() as u64, "loader fading out");
                    self.phase = Phase::FadingOut { started: now };
                    return self.advance_fade(now);
                }
                Effect::None
            }
            Message::Tick(now) => {
                self.advance_dots(now);
                self.advance_fade(now)
            }
            Message::BackgroundLoaded(result) => {
                match result {
                    Ok(handle) => self.background = Some(handle),
                    Err(reason) => tracing::warn!(%reason, "loader background unavailable"),
                }
                Effect::None
            }
        }
    }

    fn advance_dots(&mut self, now: Instant) {
        if self.phase != Phase::Loading {
            return;
        }
        let Some(last) = self.last_dot else {
            self.last_dot = Some(now);
            return;
        };
        if now.saturating_duration_since(last) >= self.dots_interval {
            // One more dot per interval; the full row is cleared on the next.
            self.visible_dots = (self.visible_dots + 1) % (LOADING_DOT_COUNT + 1);
            self.last_dot = Some(now);
        }
    }

    fn advance_fade(&mut self, now: Instant) -> Effect {
        let Phase::FadingOut { started } = self.phase else {
            return Effect::None;
        };
        let elapsed = now.saturating_duration_since(started);
        if self.fade_out.is_zero() || elapsed >= self.fade_out {
            self.opacity = 0.0;
            self.phase = Phase::Finished;
            return Effect::Finished;
        }
        self.opacity = 1.0 - elapsed.as_secs_f32() / self.fade_out.as_secs_f32();
        Effect::None
    }

    /// Whether the overlay needs periodic ticks.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.phase != Phase::Finished
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// "Now Loading" followed by the currently visible dots.
    #[must_use]
    pub fn status_text(&self) -> String {
        format!("{}{}", LOADING_LABEL, ".".repeat(self.visible_dots))
    }

    /// Settled-asset counter shown on debug pages.
    #[must_use]
    pub fn debug_text(&self) -> Option<String> {
        self.debug
            .then(|| format!("{} objects have been copied.", self.progress.completed))
    }

    pub fn view(&self) -> Element<'_, Message> {
        let alpha = self.opacity;

        let title = Text::new(self.title.as_str()).size(typography::DISPLAY);

        let bar = progress_bar(0.0..=1.0, self.progress.fraction())
            .girth(sizing::PROGRESS_HEIGHT)
            .style(styles::loader_progress(alpha));

        let mut status = Column::new()
            .spacing(spacing::XS)
            .width(Length::FillPortion(9))
            .align_x(Horizontal::Right)
            .push(bar)
            .push(Text::new(self.status_text()).size(typography::TITLE_MD));
        if let Some(debug) = self.debug_text() {
            status = status.push(Text::new(debug).size(typography::CAPTION));
        }

        let status_row = iced::widget::Row::new()
            .push(iced::widget::Space::new().width(Length::FillPortion(11)))
            .push(status);

        let content = Column::new()
            .padding(spacing::XL)
            .push(title)
            .push(
                Container::new(status_row)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_y(Vertical::Bottom),
            );

        let surface = Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(styles::loader_surface(alpha, self.background.is_some()));

        match &self.background {
            Some(handle) => Stack::new()
                .push(
                    Image::new(handle.clone())
                        .content_fit(ContentFit::Cover)
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .opacity(alpha),
                )
                .push(surface)
                .into(),
            None => surface.into(),
        }
    }
}
