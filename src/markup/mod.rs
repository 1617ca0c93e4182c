// SPDX-License-Identifier: MPL-2.0
//! Gallery page model extracted from HTML markup.
//!
//! A gallery page is a static HTML document whose `ul.gallery` lists hold
//! `li > a > img` items. The link's `href` is the full-size image, its optional
//! `data-thumbnail` attribute the richer preview shown in the lightbox, and
//! the image's `width`/`height` its display size in the grid.
//!
//! Parsing never fails on malformed gallery items: an item without a link (or
//! with an empty `href`) is skipped before indices are assigned, so the
//! remaining entries stay densely numbered.

pub mod dom;

use crate::error::Result;
use dom::Element;

/// Thumbnail shown in the gallery grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub src: String,
    /// Declared `(width, height)`; `None` when either attribute is missing
    /// or not a number.
    pub size: Option<(u32, u32)>,
}

/// One browsable image of the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    /// Target of the download action.
    pub full_url: String,
    /// Image displayed in the lightbox; equals `full_url` unless the link
    /// carries a `data-thumbnail` attribute.
    pub preview_url: String,
    /// Position in the navigable sequence, 0-based.
    pub origin_index: usize,
    pub thumbnail: Option<Thumbnail>,
}

/// Page-level switches read from the `<body>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageFlags {
    /// `class="rich"`: hovering swaps thumbnails to their rich variant.
    pub rich: bool,
    /// `data-mode="debug"`: the loader shows a settled-asset counter.
    pub debug: bool,
    /// `data-loader-background`: image drawn behind the loading overlay.
    pub loader_background: Option<String>,
}

/// Everything the viewer needs from a gallery page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageDocument {
    pub title: String,
    pub flags: PageFlags,
    /// `src` of every `<img>`, in document order.
    pub images: Vec<String>,
    /// `href` of every `<link rel="preload" as="image">`.
    pub preload_images: Vec<String>,
    /// `href` of every `<link rel="stylesheet">`.
    pub stylesheets: Vec<String>,
    /// `src` of every `<script>` that has one.
    pub scripts: Vec<String>,
    pub entries: Vec<GalleryEntry>,
}

impl PageDocument {
    /// Parses a gallery page.
    pub fn parse(html: &str) -> Result<Self> {
        let root = dom::parse(html)?;
        Ok(Self::from_root(&root))
    }

    fn from_root(root: &Element) -> Self {
        let mut page = PageDocument::default();

        for element in root.descendants() {
            match element.name.as_str() {
                "title" if page.title.is_empty() => {
                    page.title = element.text().trim().to_string();
                }
                "body" => page.flags = read_flags(element),
                "img" => push_non_empty(&mut page.images, element.attr("src")),
                "link" if element.has_rel("preload") => {
                    if element
                        .attr("as")
                        .is_some_and(|kind| kind.eq_ignore_ascii_case("image"))
                    {
                        push_non_empty(&mut page.preload_images, element.attr("href"));
                    }
                }
                "link" if element.has_rel("stylesheet") => {
                    push_non_empty(&mut page.stylesheets, element.attr("href"));
                }
                "script" => push_non_empty(&mut page.scripts, element.attr("src")),
                _ => {}
            }
        }

        page.entries = collect_entries(root);
        tracing::debug!(
            title = %page.title,
            entries = page.entries.len(),
            images = page.images.len(),
            "parsed gallery page"
        );
        page
    }
}

fn push_non_empty(list: &mut Vec<String>, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        list.push(value.to_string());
    }
}

fn read_flags(body: &Element) -> PageFlags {
    PageFlags {
        rich: body.has_class("rich"),
        debug: body
            .attr("data-mode")
            .is_some_and(|mode| mode.eq_ignore_ascii_case("debug")),
        loader_background: body
            .attr("data-loader-background")
            .map(str::trim)
            .filter(|bg| !bg.is_empty())
            .map(str::to_string),
    }
}

/// Gallery items from every `ul.gallery`, in document order.
fn collect_entries(root: &Element) -> Vec<GalleryEntry> {
    let items = root
        .descendants()
        .filter(|element| element.name == "ul" && element.has_class("gallery"))
        .flat_map(|list| list.child_elements().filter(|child| child.name == "li"));

    let mut entries = Vec::new();
    for item in items {
        let Some(link) = item.find_child("a") else {
            tracing::debug!("skipping gallery item without a link");
            continue;
        };
        let Some(full_url) = link.attr("href").map(str::trim).filter(|href| !href.is_empty())
        else {
            tracing::debug!("skipping gallery item with an empty href");
            continue;
        };
        let preview_url = link
            .attr("data-thumbnail")
            .map(str::trim)
            .filter(|thumb| !thumb.is_empty())
            .unwrap_or(full_url);
        let thumbnail = link.find_child("img").and_then(read_thumbnail);

        entries.push(GalleryEntry {
            full_url: full_url.to_string(),
            preview_url: preview_url.to_string(),
            origin_index: entries.len(),
            thumbnail,
        });
    }
    entries
}

fn read_thumbnail(img: &Element) -> Option<Thumbnail> {
    let src = img.attr("src").map(str::trim).filter(|src| !src.is_empty())?;
    let dimension = |name: &str| img.attr(name).and_then(parse_dimension);
    let size = dimension("width").zip(dimension("height"));
    Some(Thumbnail {
        src: src.to_string(),
        size,
    })
}

/// Leading-digits integer parse, like the lenient attribute parsing browsers do
/// (`"200px"` reads as 200).
fn parse_dimension(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok().filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title> Summer Trip </title>
  <link rel="stylesheet" href="style.css">
  <link rel="preload" as="image" href="hero.jpg">
  <link rel="preload" as="font" href="font.woff2">
  <script src="gallery.js"></script>
</head>
<body class="page rich" data-mode="debug" data-loader-background="bg.jpg">
  <ul class="gallery">
    <li><a href="a.jpg" data-thumbnail="a_large.jpg"><img src="a_small.jpg" width="200" height="150"></a></li>
    <li><span>no link here</span></li>
    <li><a href="b.jpg"><img src="b_small.jpg" width="150px" height="200"></a></li>
    <li><a href="">empty</a></li>
    <li><a href="c.jpg">text only</a></li>
  </ul>
  <ul class="not-gallery"><li><a href="x.jpg"></a></li></ul>
</body>
</html>"#;

    #[test]
    fn parses_title_and_flags() {
        let page = PageDocument::parse(PAGE).unwrap();
        assert_eq!(page.title, "Summer Trip");
        assert!(page.flags.rich);
        assert!(page.flags.debug);
        assert_eq!(page.flags.loader_background.as_deref(), Some("bg.jpg"));
    }

    #[test]
    fn collects_loadable_assets() {
        let page = PageDocument::parse(PAGE).unwrap();
        assert_eq!(page.images, vec!["a_small.jpg", "b_small.jpg"]);
        assert_eq!(page.preload_images, vec!["hero.jpg"]);
        assert_eq!(page.stylesheets, vec!["style.css"]);
        assert_eq!(page.scripts, vec!["gallery.js"]);
    }

    #[test]
    fn malformed_items_are_skipped_before_indexing() {
        let page = PageDocument::parse(PAGE).unwrap();
        let urls: Vec<_> = page.entries.iter().map(|e| e.full_url.as_str()).collect();
        assert_eq!(urls, vec!["a.jpg", "b.jpg", "c.jpg"]);
        let indices: Vec<_> = page.entries.iter().map(|e| e.origin_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn preview_defaults_to_full_url() {
        let page = PageDocument::parse(PAGE).unwrap();
        assert_eq!(page.entries[0].preview_url, "a_large.jpg");
        assert_eq!(page.entries[1].preview_url, "b.jpg");
    }

    #[test]
    fn thumbnail_dimensions_are_parsed_leniently() {
        let page = PageDocument::parse(PAGE).unwrap();
        let first = page.entries[0].thumbnail.as_ref().unwrap();
        assert_eq!(first.size, Some((200, 150)));
        let second = page.entries[1].thumbnail.as_ref().unwrap();
        assert_eq!(second.size, Some((150, 200)));
        assert!(page.entries[2].thumbnail.is_none());
    }

    #[test]
    fn page_without_gallery_has_no_entries() {
        let page = PageDocument::parse("<html><body><p>Hello</p></body></html>").unwrap();
        assert!(page.entries.is_empty());
        assert!(!page.flags.rich);
        assert!(page.title.is_empty());
    }

    #[test]
    fn gallery_items_without_end_tags_are_all_collected() {
        let html = r#"<ul class="gallery">
            <li><a href="a.jpg"><img src="a.jpg"></a>
            <li><a href="b.jpg"><img src="b.jpg"></a>
            <li><a href="c.jpg"><img src="c.jpg"></a>
          </ul>"#;
        let page = PageDocument::parse(html).unwrap();
        let urls: Vec<_> = page.entries.iter().map(|e| e.full_url.as_str()).collect();
        assert_eq!(urls, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn truncated_page_still_yields_its_gallery() {
        let html = r#"<ul class="gallery"><li><a href="a.jpg"></a></li></ul><p"#;
        let page = PageDocument::parse(html).unwrap();
        assert_eq!(page.entries.len(), 1);
    }

    #[test]
    fn entries_from_several_galleries_share_one_sequence() {
        let html = r#"<ul class="gallery"><li><a href="1.jpg"></a></li></ul>
                      <ul class="gallery"><li><a href="2.jpg"></a></li></ul>"#;
        let page = PageDocument::parse(html).unwrap();
        let indices: Vec<_> = page
            .entries
            .iter()
            .map(|e| (e.full_url.as_str(), e.origin_index))
            .collect();
        assert_eq!(indices, vec![("1.jpg", 0), ("2.jpg", 1)]);
    }
}
