// SPDX-License-Identifier: MPL-2.0
//! Lightbox controller: full-size browsing of gallery entries.
//!
//! The lightbox is either closed or open on exactly one entry. Every transition
//! into an open state hands out a [`LoadTicket`]; the preview image fetched for
//! that ticket is only applied while the lightbox still shows the same entry
//! from the same transition, so slow responses for entries the user already
//! navigated away from are dropped.

pub mod hover;

use crate::assets::DecodedImage;
use crate::markup::GalleryEntry;
use iced::keyboard::{self, key::Named};
use std::fmt;

/// Identifies one preview load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub index: usize,
    pub generation: u64,
}

/// Preview image of the open entry.
#[derive(Debug, Clone)]
pub enum Preview {
    Loading,
    Ready(DecodedImage),
    Failed,
}

#[derive(Debug, Clone, Default)]
pub enum State {
    #[default]
    Closed,
    Open {
        index: usize,
        generation: u64,
        preview: Preview,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxError {
    /// Navigation requested while the lightbox is closed.
    Closed,
    /// Index past the last entry (always the case for an empty gallery).
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for LightboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightboxError::Closed => write!(f, "lightbox is closed"),
            LightboxError::OutOfRange { index, len } => {
                write!(f, "entry {} out of range ({} entries)", index, len)
            }
        }
    }
}

impl std::error::Error for LightboxError {}

#[derive(Debug, Clone)]
pub enum Message {
    /// A thumbnail was clicked.
    Activate(usize),
    Next,
    Previous,
    Close,
    /// Click on the dimmed area around the image.
    BackdropPressed,
    /// Click on the image itself: downloads the original.
    ImagePressed,
    /// Click on the menu bar outside its buttons; swallowed.
    MenuPressed,
    DownloadPressed,
    KeyPressed(keyboard::Key),
    PreviewLoaded {
        ticket: LoadTicket,
        result: Result<DecodedImage, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Fetch the preview for `ticket` and report it back with
    /// [`Message::PreviewLoaded`].
    LoadPreview { ticket: LoadTicket, url: String },
    /// Save the full-size image at `url`.
    Download(String),
}

/// Lightbox state machine over an immutable list of entries.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    entries: Vec<GalleryEntry>,
    state: State,
    next_generation: u64,
}

impl Controller {
    #[must_use]
    pub fn new(entries: Vec<GalleryEntry>) -> Self {
        Self {
            entries,
            state: State::Closed,
            next_generation: 0,
        }
    }

    pub fn handle(&mut self, message: Message) -> Effect {
        match message {
            Message::Activate(index) => {
                let result = self.activate(index);
                self.load_effect(result)
            }
            Message::Next => {
                let result = self.next();
                self.load_effect(result)
            }
            Message::Previous => {
                let result = self.previous();
                self.load_effect(result)
            }
            Message::Close | Message::BackdropPressed => {
                self.close();
                Effect::None
            }
            Message::ImagePressed | Message::DownloadPressed => self
                .download_target()
                .map_or(Effect::None, |url| Effect::Download(url.to_string())),
            Message::MenuPressed => Effect::None,
            Message::KeyPressed(key) => self.handle_key(&key),
            Message::PreviewLoaded { ticket, result } => {
                self.preview_loaded(ticket, result);
                Effect::None
            }
        }
    }

    fn handle_key(&mut self, key: &keyboard::Key) -> Effect {
        if !self.keyboard_captured() {
            return Effect::None;
        }
        match key {
            keyboard::Key::Named(Named::Escape) => {
                self.close();
                Effect::None
            }
            keyboard::Key::Named(Named::ArrowLeft) => {
                let result = self.previous();
                self.load_effect(result)
            }
            keyboard::Key::Named(Named::ArrowRight) => {
                let result = self.next();
                self.load_effect(result)
            }
            _ => Effect::None,
        }
    }

    /// Opens the lightbox on `index`, from any state.
    pub fn activate(&mut self, index: usize) -> Result<LoadTicket, LightboxError> {
        if index >= self.entries.len() {
            return Err(LightboxError::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.open(index))
    }

    /// Moves to the following entry, wrapping to the first.
    pub fn next(&mut self) -> Result<LoadTicket, LightboxError> {
        let index = self.open_index().ok_or(LightboxError::Closed)?;
        Ok(self.open((index + 1) % self.entries.len()))
    }

    /// Moves to the preceding entry, wrapping to the last.
    pub fn previous(&mut self) -> Result<LoadTicket, LightboxError> {
        let index = self.open_index().ok_or(LightboxError::Closed)?;
        let len = self.entries.len();
        Ok(self.open((index + len - 1) % len))
    }

    /// Closes the lightbox. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        if matches!(self.state, State::Closed) {
            return false;
        }
        tracing::debug!("lightbox closed");
        self.state = State::Closed;
        true
    }

    /// Applies a finished preview load. Returns `false` (and changes nothing)
    /// when the ticket no longer matches the open entry.
    pub fn preview_loaded(
        &mut self,
        ticket: LoadTicket,
        result: Result<DecodedImage, String>,
    ) -> bool {
        let State::Open {
            index,
            generation,
            preview,
        } = &mut self.state
        else {
            tracing::debug!(?ticket, "preview arrived after lightbox closed");
            return false;
        };
        if *index != ticket.index || *generation != ticket.generation {
            tracing::debug!(?ticket, current = *index, "discarding stale preview");
            return false;
        }
        *preview = match result {
            Ok(decoded) => Preview::Ready(decoded),
            Err(reason) => {
                tracing::warn!(index = ticket.index, %reason, "preview failed to load");
                Preview::Failed
            }
        };
        true
    }

    /// Full-size URL of the open entry once its preview has loaded.
    #[must_use]
    pub fn download_target(&self) -> Option<&str> {
        match &self.state {
            State::Open {
                preview: Preview::Ready(_),
                ..
            } => self.current_entry().map(|entry| entry.full_url.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_download_enabled(&self) -> bool {
        self.download_target().is_some()
    }

    /// Navigation keys are only handled while the lightbox is open.
    #[must_use]
    pub fn keyboard_captured(&self) -> bool {
        self.is_open()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open { .. })
    }

    #[must_use]
    pub fn open_index(&self) -> Option<usize> {
        match self.state {
            State::Open { index, .. } => Some(index),
            State::Closed => None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    #[must_use]
    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn current_entry(&self) -> Option<&GalleryEntry> {
        self.open_index().and_then(|index| self.entries.get(index))
    }

    /// Preview URL to fetch for `ticket`.
    #[must_use]
    pub fn preview_url(&self, ticket: LoadTicket) -> Option<&str> {
        self.entries
            .get(ticket.index)
            .map(|entry| entry.preview_url.as_str())
    }

    fn open(&mut self, index: usize) -> LoadTicket {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.state = State::Open {
            index,
            generation,
            preview: Preview::Loading,
        };
        tracing::debug!(index, generation, "lightbox opened");
        LoadTicket { index, generation }
    }

    fn load_effect(&self, result: Result<LoadTicket, LightboxError>) -> Effect {
        match result {
            Ok(ticket) => match self.preview_url(ticket) {
                Some(url) => Effect::LoadPreview {
                    ticket,
                    url: url.to_string(),
                },
                None => Effect::None,
            },
            Err(err) => {
                tracing::debug!(error = %err, "lightbox navigation ignored");
                Effect::None
            }
        }
    }
}
