// SPDX-License-Identifier: MPL-2.0
//! `iced_gallery` is a desktop viewer for static HTML photo galleries, built
//! with the Iced GUI framework.
//!
//! It preloads every asset a gallery page references behind a loading overlay
//! with a progress bar, then shows the thumbnail grid and a lightbox to browse
//! and download the full-size images.

#![doc(html_root_url = "https://docs.rs/iced_gallery/0.1.0")]

pub mod app;
pub mod assets;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod events;
pub mod lightbox;
pub mod markup;
pub mod progress;
pub mod ui;

#[cfg(test)]
mod test_utils;
