// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.

use super::{App, Message, PageStatus};
use crate::assets::{self, DecodedImage, Location};
use crate::bootstrap::{AssetKind, AssetRequest, PageBootstrap, SettleOutcome};
use crate::error::{Error, Result};
use crate::lightbox::{self, LoadTicket};
use crate::markup::PageDocument;
use crate::ui::{gallery, loader};
use iced::Task;
use std::path::PathBuf;
use std::time::Instant;

impl App {
    pub(super) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PageFetched(result) => self.handle_page_fetched(result),
            Message::AssetSettled { id, result } => {
                let outcome = match &result {
                    Ok(_) => SettleOutcome::Loaded,
                    Err(err) => SettleOutcome::Failed(err.to_string()),
                };
                if let (Ok(Some(decoded)), Some(gallery), Some(request)) = (
                    result,
                    self.gallery.as_mut(),
                    self.bootstrap.as_ref().and_then(|b| b.request(id)),
                ) {
                    gallery.insert_image(request.url.clone(), decoded.handle);
                }

                let progress = self
                    .bootstrap
                    .as_mut()
                    .and_then(|bootstrap| bootstrap.settle(id, &outcome, &mut self.tracker));
                if let Some(progress) = progress {
                    self.forward_to_loader(loader::Message::Progressed(progress));
                }
                self.check_preload_complete();
                Task::none()
            }
            Message::PreviewFetched {
                ticket,
                url,
                result,
            } => {
                let result = result.map(|decoded| {
                    self.preview_cache.put(url, decoded.clone());
                    decoded
                });
                self.handle_lightbox(lightbox::Message::PreviewLoaded {
                    ticket,
                    result: result.map_err(|err| err.to_string()),
                })
            }
            Message::DownloadFinished(result) => {
                match result {
                    Ok(Some(path)) => tracing::info!(path = %path.display(), "image saved"),
                    Ok(None) => tracing::debug!("download cancelled"),
                    Err(err) => tracing::warn!(error = %err, "download failed"),
                }
                Task::none()
            }
            Message::Loader(message) => {
                self.forward_to_loader(message);
                Task::none()
            }
            Message::Gallery(message) => self.handle_gallery(message),
            Message::Lightbox(message) => self.handle_lightbox(message),
            Message::Tick(now) => {
                self.forward_to_loader(loader::Message::Tick(now));
                if let Some(gallery) = self.gallery.as_mut() {
                    gallery.handle(gallery::Message::Tick(now));
                }
                Task::none()
            }
        }
    }

    fn handle_page_fetched(&mut self, result: Result<String>) -> Task<Message> {
        let page = result.and_then(|html| PageDocument::parse(&html));
        match page {
            Ok(page) => self.show_page(&page),
            Err(err) => {
                tracing::error!(error = %err, "gallery page could not be opened");
                self.status = PageStatus::Failed(err.to_string());
                Task::none()
            }
        }
    }

    /// Sets up every component for `page` and starts the preload.
    fn show_page(&mut self, page: &PageDocument) -> Task<Message> {
        self.page_title = if page.title.is_empty() {
            self.location
                .as_ref()
                .map(Location::file_name)
                .unwrap_or_default()
        } else {
            page.title.clone()
        };
        let rich = self.rich_override || self.config.gallery.rich.unwrap_or(page.flags.rich);

        self.tracker.reset();
        self.preview_cache.clear();
        self.loader = Some(loader::State::new(
            self.page_title.clone(),
            page.flags.debug,
            &self.config.loader,
        ));
        self.gallery = Some(gallery::State::new(&page.entries, rich, &self.config.gallery));
        self.lightbox = lightbox::Controller::new(page.entries.clone());
        let bootstrap = PageBootstrap::scan(page, &mut self.tracker);
        self.status = PageStatus::Ready;

        let mut tasks: Vec<Task<Message>> = bootstrap
            .requests()
            .iter()
            .map(|request| self.fetch_asset(request))
            .collect();
        if let Some(background) = page.flags.loader_background.as_deref() {
            tasks.push(self.fetch_loader_background(background));
        }
        self.bootstrap = Some(bootstrap);
        self.check_preload_complete();

        Task::batch(tasks)
    }

    fn resolve(&self, url: &str) -> Result<Location> {
        let page = self
            .location
            .as_ref()
            .ok_or_else(|| Error::Markup("no page location".to_string()))?;
        page.resolve(url)
    }

    fn fetch_asset(&self, request: &AssetRequest) -> Task<Message> {
        let id = request.id;
        let location = match self.resolve(&request.url) {
            Ok(location) => location,
            Err(err) => {
                return Task::done(Message::AssetSettled {
                    id,
                    result: Err(err),
                })
            }
        };
        tracing::trace!(kind = %request.kind, url = %location, "fetching asset");
        match request.kind {
            AssetKind::Image => Task::perform(
                async move { assets::load_image(location).await.map(Some) },
                move |result| Message::AssetSettled { id, result },
            ),
            AssetKind::Stylesheet | AssetKind::Script => Task::perform(
                async move { assets::fetch(location).await.map(|_| None) },
                move |result| Message::AssetSettled { id, result },
            ),
        }
    }

    fn fetch_loader_background(&self, url: &str) -> Task<Message> {
        match self.resolve(url) {
            Ok(location) => Task::perform(assets::load_image(location), |result| {
                Message::Loader(loader::Message::BackgroundLoaded(
                    result
                        .map(|decoded| decoded.handle)
                        .map_err(|err| err.to_string()),
                ))
            }),
            Err(err) => {
                tracing::warn!(%url, error = %err, "loader background not resolvable");
                Task::none()
            }
        }
    }

    /// Starts the loader fade-out once the bootstrap reports completion.
    fn check_preload_complete(&mut self) {
        let completed = self
            .bootstrap
            .as_mut()
            .is_some_and(PageBootstrap::take_completed);
        if completed {
            self.forward_to_loader(loader::Message::Completed(Instant::now()));
        }
    }

    fn forward_to_loader(&mut self, message: loader::Message) {
        let Some(state) = self.loader.as_mut() else {
            return;
        };
        if state.handle(message) == loader::Effect::Finished {
            tracing::debug!("loading overlay removed");
            self.loader = None;
        }
    }

    fn handle_gallery(&mut self, message: gallery::Message) -> Task<Message> {
        let Some(state) = self.gallery.as_mut() else {
            return Task::none();
        };
        match state.handle(message) {
            gallery::Effect::None => Task::none(),
            gallery::Effect::Activate(index) => {
                self.handle_lightbox(lightbox::Message::Activate(index))
            }
            gallery::Effect::FetchImage(src) => match self.resolve(&src) {
                Ok(location) => Task::perform(assets::load_image(location), move |result| {
                    Message::Gallery(gallery::Message::ImageLoaded {
                        src: src.clone(),
                        result: result
                            .map(|decoded| decoded.handle)
                            .map_err(|err| err.to_string()),
                    })
                }),
                Err(err) => {
                    tracing::debug!(%src, error = %err, "thumbnail variant not resolvable");
                    Task::none()
                }
            },
        }
    }

    fn handle_lightbox(&mut self, message: lightbox::Message) -> Task<Message> {
        match self.lightbox.handle(message) {
            lightbox::Effect::None => Task::none(),
            lightbox::Effect::LoadPreview { ticket, url } => self.load_preview(ticket, url),
            lightbox::Effect::Download(url) => self.download(&url),
        }
    }

    fn load_preview(&mut self, ticket: LoadTicket, url: String) -> Task<Message> {
        if let Some(decoded) = self.preview_cache.get(&url) {
            tracing::trace!(%url, "preview cache hit");
            return Task::done(Message::Lightbox(lightbox::Message::PreviewLoaded {
                ticket,
                result: Ok(decoded.clone()),
            }));
        }
        match self.resolve(&url) {
            Ok(location) => Task::perform(assets::load_image(location), move |result| {
                Message::PreviewFetched {
                    ticket,
                    url: url.clone(),
                    result,
                }
            }),
            Err(err) => Task::done(Message::PreviewFetched {
                ticket,
                url,
                result: Err::<DecodedImage, _>(err),
            }),
        }
    }

    /// Asks where to save the full-size image, then copies it there.
    fn download(&self, url: &str) -> Task<Message> {
        let location = match self.resolve(url) {
            Ok(location) => location,
            Err(err) => return Task::done(Message::DownloadFinished(Err(err))),
        };
        let file_name = location.file_name();

        Task::perform(
            async move {
                let picked: Option<PathBuf> = rfd::AsyncFileDialog::new()
                    .set_title("Save Image As")
                    .set_file_name(&file_name)
                    .save_file()
                    .await
                    .map(|handle| handle.path().to_path_buf());
                match picked {
                    Some(destination) => assets::save_to(location, destination).await.map(Some),
                    None => Ok(None),
                }
            },
            Message::DownloadFinished,
        )
    }
}
