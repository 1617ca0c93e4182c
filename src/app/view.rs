// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! Layers, bottom to top: the gallery grid (or a status line), the lightbox
//! when open, and the loading overlay until its fade-out completes.

use super::{App, Message, PageStatus};
use crate::ui::design_tokens::typography;
use crate::ui::{lightbox as lightbox_view, styles};
use iced::widget::{opaque, Container, Stack, Text};
use iced::{Element, Length};

impl App {
    pub(super) fn view(&self) -> Element<'_, Message> {
        let base: Element<'_, Message> = match (&self.status, &self.gallery) {
            (PageStatus::Ready, Some(gallery)) => gallery.view().map(Message::Gallery),
            (PageStatus::Failed(reason), _) => centered(
                Text::new(format!("Unable to open the gallery page: {}", reason))
                    .size(typography::BODY_LG)
                    .style(styles::error_text),
            ),
            _ => centered(Text::new("Opening page…").size(typography::BODY_LG)),
        };

        let mut stack = Stack::new().push(base);

        if let Some(overlay) = lightbox_view::view(&self.lightbox) {
            stack = stack.push(overlay.map(Message::Lightbox));
        }

        if let Some(loader) = &self.loader {
            // The overlay blocks the grid underneath while it is shown.
            stack = stack.push(opaque(loader.view().map(Message::Loader)));
        }

        stack.width(Length::Fill).height(Length::Fill).into()
    }
}

fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    Container::new(content).center(Length::Fill).into()
}
