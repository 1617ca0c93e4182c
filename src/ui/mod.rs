// SPDX-License-Identifier: MPL-2.0
//! User interface components.
//!
//! Components follow the Elm-style "state down, messages up" pattern: each
//! keeps its own state, turns its messages into an `Effect` for the
//! application, and renders itself from that state.
//!
//! - [`loader`] - Loading overlay with progress bar and fade-out
//! - [`gallery`] - Thumbnail grid with hover effect
//! - [`lightbox`] - Full-size image overlay with menu
//! - [`styles`] - Widget styles
//! - [`design_tokens`] - Colors, spacing and font sizes

pub mod design_tokens;
pub mod gallery;
pub mod lightbox;
pub mod loader;
pub mod styles;
