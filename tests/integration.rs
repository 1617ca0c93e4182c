// SPDX-License-Identifier: MPL-2.0
use iced::widget::image;
use iced_gallery::assets::{self, DecodedImage, Location};
use iced_gallery::bootstrap::{PageBootstrap, SettleOutcome};
use iced_gallery::config::{self, Config};
use iced_gallery::lightbox::{Controller, LightboxError};
use iced_gallery::markup::PageDocument;
use iced_gallery::progress::ProgressTracker;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tempfile::tempdir;

const GALLERY_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Autumn</title>
  <link rel="stylesheet" href="css/gallery.css">
  <script src="js/loader.js"></script>
  <script>for (var i = 0; i < 3; ++i) { document.write("<li>"); }</script>
</head>
<body class="rich">
  <ul class="gallery">
    <li><a href="full/a.jpg" data-thumbnail="mid/a.jpg"><img src="thumb/a.jpg" width="120" height="90"></a></li>
    <li><a href="full/b.jpg" data-thumbnail="mid/b.jpg"><img src="thumb/b.jpg" width="120" height="90"></a></li>
    <li><a href="full/c.jpg" data-thumbnail="mid/c.jpg"><img src="thumb/c.jpg" width="120" height="90"></a></li>
  </ul>
</body>
</html>"#;

fn pixel() -> DecodedImage {
    DecodedImage {
        handle: image::Handle::from_rgba(1, 1, vec![0, 0, 0, 255]),
        width: 1,
        height: 1,
    }
}

#[test]
fn preload_completes_once_whatever_the_settle_order() {
    let page = PageDocument::parse(GALLERY_PAGE).expect("page should parse");
    let mut tracker = ProgressTracker::new();

    let fired = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fired);
    tracker.on_all_complete(move || counter.set(counter.get() + 1));

    let fractions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fractions);
    tracker.on_progress(move |progress| {
        assert!(progress.completed <= progress.total);
        sink.borrow_mut().push(progress.fraction());
    });

    let mut bootstrap = PageBootstrap::scan(&page, &mut tracker);
    // 3 thumbnails, 1 stylesheet, 1 external script
    assert_eq!(bootstrap.requests().len(), 5);

    let ids: Vec<_> = bootstrap.requests().iter().map(|r| r.id).collect();
    let mut completed = Vec::new();
    for (step, position) in [2, 0, 4, 1, 3].into_iter().enumerate() {
        assert_eq!(fired.get(), 0);
        let outcome = if step == 1 {
            SettleOutcome::Failed("connection reset".into())
        } else {
            SettleOutcome::Loaded
        };
        let progress = bootstrap
            .settle(ids[position], &outcome, &mut tracker)
            .expect("first settle of an id counts");
        completed.push(progress.completed);
    }

    assert_eq!(completed, vec![1, 2, 3, 4, 5]);
    assert_eq!(fired.get(), 1);
    assert!(bootstrap.take_completed());

    // A repeated settle is a no-op and does not re-trigger completion.
    assert!(bootstrap
        .settle(ids[0], &SettleOutcome::Loaded, &mut tracker)
        .is_none());
    assert_eq!(fired.get(), 1);

    let fractions = fractions.borrow();
    assert!(fractions.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn lightbox_walks_the_parsed_gallery() {
    let page = PageDocument::parse(GALLERY_PAGE).expect("page should parse");
    assert!(page.flags.rich);
    let mut lightbox = Controller::new(page.entries);

    assert_eq!(lightbox.activate(0).map(|t| t.index), Ok(0));
    assert_eq!(lightbox.next().map(|t| t.index), Ok(1));
    assert_eq!(lightbox.next().map(|t| t.index), Ok(2));
    assert_eq!(lightbox.next().map(|t| t.index), Ok(0));
}

#[test]
fn next_cycles_and_previous_inverts() {
    let page = PageDocument::parse(GALLERY_PAGE).expect("page should parse");
    let len = page.entries.len();
    let mut lightbox = Controller::new(page.entries);

    for start in 0..len {
        lightbox.activate(start).expect("index in range");
        for _ in 0..len {
            lightbox.next().expect("lightbox is open");
        }
        assert_eq!(lightbox.open_index(), Some(start));

        lightbox.next().expect("lightbox is open");
        lightbox.previous().expect("lightbox is open");
        assert_eq!(lightbox.open_index(), Some(start));
    }
}

#[test]
fn navigation_after_close_changes_nothing() {
    let page = PageDocument::parse(GALLERY_PAGE).expect("page should parse");
    let mut lightbox = Controller::new(page.entries);
    lightbox.activate(1).expect("index in range");
    assert!(lightbox.close());

    assert_eq!(lightbox.next(), Err(LightboxError::Closed));
    assert_eq!(lightbox.previous(), Err(LightboxError::Closed));
    assert!(!lightbox.is_open());
    assert!(lightbox.download_target().is_none());
}

#[test]
fn late_preview_for_previous_entry_is_not_displayed() {
    let page = PageDocument::parse(GALLERY_PAGE).expect("page should parse");
    let mut lightbox = Controller::new(page.entries);

    let first = lightbox.activate(0).expect("index in range");
    let second = lightbox.activate(1).expect("index in range");

    // Index 0 resolves after index 1 was requested.
    assert!(!lightbox.preview_loaded(first, Ok(pixel())));
    assert!(!lightbox.is_download_enabled());

    assert!(lightbox.preview_loaded(second, Ok(pixel())));
    assert_eq!(lightbox.download_target(), Some("full/b.jpg"));
}

#[test]
fn config_round_trips_through_settings_file() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let mut settings = Config::default();
    settings.loader.fade_out_ms = Some(750);
    settings.gallery.rich = Some(true);
    settings.gallery.columns = Some(6);
    config::save_to_path(&settings, &path).expect("Failed to write config file");

    let loaded = config::load_from_path(&path).expect("Failed to load config file");
    assert_eq!(loaded, settings);
    assert_eq!(loaded.loader.fade_out().as_millis(), 750);
    assert_eq!(loaded.gallery.columns(), 6);
}

#[tokio::test]
async fn page_on_disk_is_fetched_and_assets_resolve_next_to_it() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let page_path = dir.path().join("index.html");
    std::fs::write(&page_path, GALLERY_PAGE).expect("Failed to write page");
    std::fs::create_dir(dir.path().join("css")).expect("Failed to create css dir");
    std::fs::write(dir.path().join("css/gallery.css"), "body {}").expect("Failed to write css");

    let location = Location::File(page_path);
    let html = assets::fetch_text(location.clone())
        .await
        .expect("page should be readable");
    let page = PageDocument::parse(&html).expect("page should parse");

    let stylesheet = location
        .resolve(&page.stylesheets[0])
        .expect("relative href resolves");
    let bytes = assets::fetch(stylesheet).await.expect("stylesheet exists");
    assert_eq!(bytes, b"body {}");

    let missing = location.resolve(&page.images[0]).expect("relative src resolves");
    assert!(assets::load_image(missing).await.is_err());
}
