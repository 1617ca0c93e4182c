// SPDX-License-Identifier: MPL-2.0
//! Thumbnail grid of the gallery page.
//!
//! Each entry is drawn at its rest size and animated towards its declared size
//! while hovered. On rich pages the hovered thumbnail shows its rich variant
//! once that image has been fetched. Pressing a thumbnail asks the caller to
//! open the lightbox on it.

use crate::config::GalleryConfig;
use crate::lightbox::hover::{self, HoverSize};
use crate::markup::GalleryEntry;
use crate::ui::design_tokens::{sizing, spacing, typography};
use iced::widget::{image, mouse_area, Column, Container, Image, Row, Scrollable, Text};
use iced::{mouse, Element, Length};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Item {
    index: usize,
    label: String,
    src: Option<String>,
    declared: Option<hover::Dimensions>,
    hover: Option<HoverSize>,
}

#[derive(Debug, Clone)]
pub struct State {
    items: Vec<Item>,
    images: HashMap<String, image::Handle>,
    requested: HashSet<String>,
    rich_suffix: Option<String>,
    hover_duration: Duration,
    columns: usize,
}

#[derive(Debug, Clone)]
pub enum Message {
    Entered(usize),
    Left(usize),
    Pressed(usize),
    Tick(Instant),
    ImageLoaded {
        src: String,
        result: Result<image::Handle, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Open the lightbox on this entry.
    Activate(usize),
    /// Fetch a thumbnail source not loaded during the preload.
    FetchImage(String),
}

impl State {
    /// Builds the grid. `rich` enables the rich-variant swap on hover.
    #[must_use]
    pub fn new(entries: &[GalleryEntry], rich: bool, config: &GalleryConfig) -> Self {
        let rest_scale = config.rest_scale();
        let items = entries
            .iter()
            .map(|entry| {
                let declared = entry.thumbnail.as_ref().and_then(|thumb| thumb.size);
                Item {
                    index: entry.origin_index,
                    label: label_for(&entry.full_url),
                    src: entry.thumbnail.as_ref().map(|thumb| thumb.src.clone()),
                    declared,
                    hover: declared.map(|size| HoverSize::new(size, rest_scale)),
                }
            })
            .collect();

        Self {
            items,
            images: HashMap::new(),
            requested: HashSet::new(),
            rich_suffix: rich.then(|| config.rich_suffix().to_string()),
            hover_duration: config.hover_duration(),
            columns: config.columns(),
        }
    }

    pub fn handle(&mut self, message: Message) -> Effect {
        self.handle_at(message, Instant::now())
    }

    /// [`handle`](Self::handle) with an explicit clock, for hover timing.
    pub fn handle_at(&mut self, message: Message, now: Instant) -> Effect {
        match message {
            Message::Entered(index) => {
                let Some(item) = self.items.get_mut(index) else {
                    return Effect::None;
                };
                if let Some(hover) = item.hover.as_mut() {
                    hover.enter(now);
                }
                self.rich_fetch(index)
            }
            Message::Left(index) => {
                if let Some(hover) = self.items.get_mut(index).and_then(|item| item.hover.as_mut())
                {
                    hover.leave(now);
                }
                Effect::None
            }
            Message::Pressed(index) => match self.items.get(index) {
                Some(item) => Effect::Activate(item.index),
                None => Effect::None,
            },
            Message::Tick(now) => {
                let duration = self.hover_duration;
                for hover in self.items.iter_mut().filter_map(|item| item.hover.as_mut()) {
                    hover.tick(now, duration);
                }
                Effect::None
            }
            Message::ImageLoaded { src, result } => {
                match result {
                    Ok(handle) => self.insert_image(src, handle),
                    Err(reason) => tracing::debug!(%src, %reason, "thumbnail unavailable"),
                }
                Effect::None
            }
        }
    }

    fn rich_fetch(&mut self, index: usize) -> Effect {
        let Some(rich) = self.rich_source(index) else {
            return Effect::None;
        };
        if self.images.contains_key(&rich) || !self.requested.insert(rich.clone()) {
            return Effect::None;
        }
        Effect::FetchImage(rich)
    }

    fn rich_source(&self, index: usize) -> Option<String> {
        let suffix = self.rich_suffix.as_deref()?;
        let src = self.items.get(index)?.src.as_deref()?;
        Some(hover::rich_variant(src, suffix))
    }

    /// Registers a decoded image under the URL it was referenced by.
    pub fn insert_image(&mut self, src: String, handle: image::Handle) {
        self.images.insert(src, handle);
    }

    /// Source currently displayed for entry `index`.
    #[must_use]
    pub fn displayed_source(&self, index: usize) -> Option<String> {
        let item = self.items.get(index)?;
        let src = item.src.clone()?;
        let hovered = item.hover.as_ref().is_some_and(HoverSize::is_hovered);
        if hovered {
            if let Some(rich) = self.rich_source(index) {
                if self.images.contains_key(&rich) {
                    return Some(rich);
                }
            }
        }
        Some(src)
    }

    /// Current display size of entry `index`, when the page declared one.
    #[must_use]
    pub fn displayed_size(&self, index: usize) -> Option<hover::Dimensions> {
        self.items
            .get(index)?
            .hover
            .as_ref()
            .map(HoverSize::size)
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.items
            .iter()
            .any(|item| item.hover.as_ref().is_some_and(HoverSize::is_animating))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn view(&self) -> Element<'_, Message> {
        if self.items.is_empty() {
            return Container::new(Text::new("This page has no gallery.").size(typography::BODY_LG))
                .center(Length::Fill)
                .into();
        }

        let rows = self.items.chunks(self.columns).map(|chunk| {
            Row::with_children(chunk.iter().map(|item| self.view_item(item)))
                .spacing(spacing::MD)
                .into()
        });

        Scrollable::new(
            Column::with_children(rows)
                .spacing(spacing::MD)
                .padding(spacing::LG)
                .width(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn view_item<'a>(&'a self, item: &'a Item) -> Element<'a, Message> {
        let (cell_width, cell_height) = item
            .declared
            .map_or((sizing::FALLBACK_THUMBNAIL, sizing::FALLBACK_THUMBNAIL), |(w, h)| {
                (w as f32, h as f32)
            });

        let handle = self
            .displayed_source(item.index)
            .and_then(|src| self.images.get(&src));

        let content: Element<'a, Message> = match handle {
            Some(handle) => {
                let mut picture = Image::new(handle.clone());
                if let Some((width, height)) = self.displayed_size(item.index) {
                    picture = picture
                        .width(Length::Fixed(width as f32))
                        .height(Length::Fixed(height as f32));
                }
                picture.into()
            }
            None => Text::new(item.label.as_str()).size(typography::CAPTION).into(),
        };

        let cell = Container::new(content)
            .width(Length::Fixed(cell_width))
            .height(Length::Fixed(cell_height))
            .center_x(Length::Fixed(cell_width))
            .center_y(Length::Fixed(cell_height));

        mouse_area(cell)
            .on_press(Message::Pressed(item.index))
            .on_enter(Message::Entered(item.index))
            .on_exit(Message::Left(item.index))
            .interaction(mouse::Interaction::Pointer)
            .into()
    }
}

fn label_for(url: &str) -> String {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    trimmed
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Thumbnail;

    fn entry(index: usize, size: Option<(u32, u32)>) -> GalleryEntry {
        GalleryEntry {
            full_url: format!("photos/{index}.jpg"),
            preview_url: format!("photos/{index}.jpg"),
            origin_index: index,
            thumbnail: Some(Thumbnail {
                src: format!("thumbs/{index}.jpg"),
                size,
            }),
        }
    }

    fn pixel() -> image::Handle {
        image::Handle::from_rgba(1, 1, vec![255, 255, 255, 255])
    }

    #[test]
    fn thumbnails_start_at_rest_size() {
        let grid = State::new(&[entry(0, Some((200, 150)))], false, &GalleryConfig::default());
        assert_eq!(grid.displayed_size(0), Some((180, 135)));
    }

    #[test]
    fn hover_animates_to_declared_size() {
        let start = Instant::now();
        let mut grid = State::new(&[entry(0, Some((200, 150)))], false, &GalleryConfig::default());

        grid.handle_at(Message::Entered(0), start);
        assert!(grid.is_animating());
        grid.handle_at(Message::Tick(start + Duration::from_millis(200)), start);
        assert_eq!(grid.displayed_size(0), Some((200, 150)));
        assert!(!grid.is_animating());

        grid.handle_at(Message::Left(0), start + Duration::from_millis(300));
        grid.handle_at(Message::Tick(start + Duration::from_millis(600)), start);
        assert_eq!(grid.displayed_size(0), Some((180, 135)));
    }

    #[test]
    fn press_requests_activation() {
        let mut grid = State::new(&[entry(0, None), entry(1, None)], false, &GalleryConfig::default());
        assert_eq!(grid.handle(Message::Pressed(1)), Effect::Activate(1));
        assert_eq!(grid.handle(Message::Pressed(7)), Effect::None);
    }

    #[test]
    fn rich_hover_fetches_variant_once_and_swaps_after_load() {
        let now = Instant::now();
        let mut grid = State::new(&[entry(0, Some((100, 100)))], true, &GalleryConfig::default());
        grid.insert_image("thumbs/0.jpg".into(), pixel());

        assert_eq!(
            grid.handle_at(Message::Entered(0), now),
            Effect::FetchImage("thumbs/0_rich.jpg".into())
        );
        assert_eq!(grid.displayed_source(0).as_deref(), Some("thumbs/0.jpg"));

        grid.handle_at(
            Message::ImageLoaded {
                src: "thumbs/0_rich.jpg".into(),
                result: Ok(pixel()),
            },
            now,
        );
        assert_eq!(grid.displayed_source(0).as_deref(), Some("thumbs/0_rich.jpg"));

        grid.handle_at(Message::Left(0), now);
        assert_eq!(grid.displayed_source(0).as_deref(), Some("thumbs/0.jpg"));
        assert_eq!(grid.handle_at(Message::Entered(0), now), Effect::None);
    }

    #[test]
    fn plain_pages_never_fetch_rich_variants() {
        let mut grid = State::new(&[entry(0, Some((100, 100)))], false, &GalleryConfig::default());
        assert_eq!(grid.handle(Message::Entered(0)), Effect::None);
    }

    #[test]
    fn label_is_last_path_segment() {
        assert_eq!(label_for("a/b/c.jpg?x=1"), "c.jpg");
        assert_eq!(label_for("c.jpg"), "c.jpg");
    }
}
