// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::assets::DecodedImage;
use crate::bootstrap::AssetId;
use crate::config::Config;
use crate::error::Error;
use crate::lightbox::{self, LoadTicket};
use crate::ui::{gallery, loader};
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    /// The gallery page was fetched (or failed to be).
    PageFetched(Result<String, Error>),
    /// One preloaded asset settled. Images carry their decoded pixels.
    AssetSettled {
        id: AssetId,
        result: Result<Option<DecodedImage>, Error>,
    },
    /// A lightbox preview finished loading; cached before being forwarded.
    PreviewFetched {
        ticket: LoadTicket,
        url: String,
        result: Result<DecodedImage, Error>,
    },
    /// Result of the save dialog plus copy. `Ok(None)` when cancelled.
    DownloadFinished(Result<Option<PathBuf>, Error>),
    Loader(loader::Message),
    Gallery(gallery::Message),
    Lightbox(lightbox::Message),
    /// Animation clock for the loader and the hover effect.
    Tick(Instant),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Gallery page to open: a file path or an `http(s)://` URL.
    pub page: Option<String>,
    /// Force the rich hover variant regardless of the page's body class.
    pub rich: bool,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ICED_GALLERY_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
    /// Settings loaded by the caller before the window opens.
    pub config: Config,
}
