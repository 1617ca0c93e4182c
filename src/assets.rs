// SPDX-License-Identifier: MPL-2.0
//! Asset location, fetching and image decoding.
//!
//! A gallery page is opened either from disk or over HTTP(S). Every URL found
//! in the page is resolved against the page's own location, then fetched as
//! raw bytes: `tokio::fs` for local files, a shared `reqwest` client for remote
//! ones. Images are decoded off the UI thread into Iced image handles.

use crate::error::{Error, FetchError, Result};
use iced::widget::image;
use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Where a page or asset lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Remote(Url),
}

impl Location {
    /// Interprets a command-line argument: `http(s)://` and `file://` URLs,
    /// anything else is a filesystem path.
    pub fn from_argument(argument: &str) -> Result<Self> {
        if has_scheme(argument, "http") || has_scheme(argument, "https") {
            let url = Url::parse(argument)
                .map_err(|_| FetchError::InvalidUrl(argument.to_string()))?;
            return Ok(Location::Remote(url));
        }
        if has_scheme(argument, "file") {
            return file_url_to_path(argument).map(Location::File);
        }
        Ok(Location::File(PathBuf::from(argument)))
    }

    /// Resolves `href` as found in the page located at `self`.
    pub fn resolve(&self, href: &str) -> Result<Location> {
        let href = href.trim();
        if href.is_empty() || has_scheme(href, "data") || has_scheme(href, "javascript") {
            return Err(FetchError::InvalidUrl(href.to_string()).into());
        }
        if has_scheme(href, "http") || has_scheme(href, "https") {
            return Self::from_argument(href);
        }
        if has_scheme(href, "file") {
            return file_url_to_path(href).map(Location::File);
        }

        match self {
            Location::Remote(base) => base
                .join(href)
                .map(Location::Remote)
                .map_err(|_| FetchError::InvalidUrl(href.to_string()).into()),
            Location::File(page) => {
                let relative = strip_query_and_fragment(href);
                let base = page.parent().unwrap_or_else(|| Path::new(""));
                Ok(Location::File(base.join(relative)))
            }
        }
    }

    /// Short name for logs and dialogs (last path segment).
    #[must_use]
    pub fn file_name(&self) -> String {
        match self {
            Location::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Location::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Remote(url) => write!(f, "{}", url),
        }
    }
}

fn has_scheme(value: &str, scheme: &str) -> bool {
    value.len() > scheme.len()
        && value.as_bytes()[scheme.len()] == b':'
        && value[..scheme.len()].eq_ignore_ascii_case(scheme)
}

fn file_url_to_path(value: &str) -> Result<PathBuf> {
    Url::parse(value)
        .ok()
        .and_then(|url| url.to_file_path().ok())
        .ok_or_else(|| FetchError::InvalidUrl(value.to_string()).into())
}

fn strip_query_and_fragment(href: &str) -> &str {
    let end = href.find(['?', '#']).unwrap_or(href.len());
    &href[..end]
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

/// Fetches the raw bytes behind `location`.
pub async fn fetch(location: Location) -> Result<Vec<u8>> {
    match location {
        Location::File(path) => Ok(tokio::fs::read(&path).await?),
        Location::Remote(url) => {
            let response = http_client().get(url).send().await?.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        }
    }
}

/// Fetches a page as text, replacing invalid UTF-8 sequences.
pub async fn fetch_text(location: Location) -> Result<String> {
    let bytes = fetch(location).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// A decoded image ready for display.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

/// Decodes encoded image bytes (PNG, JPEG, ...) into RGBA.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage> {
    let rgba = image_rs::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        handle: image::Handle::from_rgba(width, height, rgba.into_raw()),
        width,
        height,
    })
}

/// Fetches and decodes an image; decoding runs on the blocking pool.
pub async fn load_image(location: Location) -> Result<DecodedImage> {
    let bytes = fetch(location).await?;
    tokio::task::spawn_blocking(move || decode(&bytes))
        .await
        .map_err(|e| Error::Decode(format!("decode task failed: {}", e)))?
}

/// Copies the asset behind `location` to `destination`.
pub async fn save_to(location: Location, destination: PathBuf) -> Result<PathBuf> {
    let bytes = fetch(location).await?;
    tokio::fs::write(&destination, bytes).await?;
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image_rs::RgbaImage::from_pixel(width, height, image_rs::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image_rs::ImageFormat::Png)
            .expect("failed to encode png");
        out.into_inner()
    }

    #[test]
    fn from_argument_distinguishes_urls_and_paths() {
        assert!(matches!(
            Location::from_argument("https://example.org/gallery/index.html").unwrap(),
            Location::Remote(_)
        ));
        assert_eq!(
            Location::from_argument("photos/index.html").unwrap(),
            Location::File(PathBuf::from("photos/index.html"))
        );
    }

    #[test]
    fn resolve_relative_to_file_page() {
        let page = Location::File(PathBuf::from("/srv/album/index.html"));
        assert_eq!(
            page.resolve("cache/a_small.jpg?v=2#top").unwrap(),
            Location::File(PathBuf::from("/srv/album/cache/a_small.jpg"))
        );
    }

    #[test]
    fn resolve_relative_to_remote_page() {
        let page = Location::from_argument("https://example.org/album/index.html").unwrap();
        let resolved = page.resolve("../other/b.jpg").unwrap();
        assert_eq!(resolved.to_string(), "https://example.org/other/b.jpg");
        assert_eq!(resolved.file_name(), "b.jpg");
    }

    #[test]
    fn absolute_urls_ignore_page_location() {
        let page = Location::File(PathBuf::from("/srv/album/index.html"));
        let resolved = page.resolve("http://cdn.example.org/x.png").unwrap();
        assert!(matches!(resolved, Location::Remote(_)));
    }

    #[test]
    fn data_and_empty_urls_are_rejected() {
        let page = Location::File(PathBuf::from("index.html"));
        assert!(page.resolve("data:image/png;base64,AAAA").is_err());
        assert!(page.resolve("   ").is_err());
    }

    #[test]
    fn decode_reports_dimensions() {
        let decoded = decode(&png_bytes(3, 2)).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode(b"not an image"), Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn load_image_reads_local_file() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("pic.png");
        std::fs::write(&path, png_bytes(4, 4)).expect("failed to write png");

        let decoded = load_image(Location::File(path)).await.unwrap();
        assert_eq!(decoded.width, 4);
    }

    #[tokio::test]
    async fn fetch_missing_file_is_io_error() {
        let dir = tempdir().expect("failed to create temp dir");
        let result = fetch(Location::File(dir.path().join("missing.jpg"))).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn save_to_copies_bytes() {
        let dir = tempdir().expect("failed to create temp dir");
        let source = dir.path().join("full.jpg");
        std::fs::write(&source, b"jpeg bytes").expect("failed to write source");
        let destination = dir.path().join("copy.jpg");

        let saved = save_to(Location::File(source), destination.clone()).await.unwrap();

        assert_eq!(saved, destination);
        assert_eq!(std::fs::read(&destination).unwrap(), b"jpeg bytes");
    }
}
