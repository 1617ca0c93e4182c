// SPDX-License-Identifier: MPL-2.0
//! Lightbox overlay view.
//!
//! Layering, outermost first: the backdrop (press closes), the menu bar
//! (press is swallowed) and the image (press downloads). Inner mouse areas
//! capture their press, so it never reaches the backdrop.
//!
//! The image is laid out at its displayed size, so the letterbox around it
//! belongs to the backdrop.

use crate::assets::DecodedImage;
use crate::lightbox::{Controller, Message, Preview, State};
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, mouse_area, responsive, Column, Container, Image, Row, Text};
use iced::{alignment::Vertical, mouse, ContentFit, Element, Length, Size};

/// Renders the lightbox, or `None` while it is closed.
pub fn view(controller: &Controller) -> Option<Element<'_, Message>> {
    let State::Open { index, preview, .. } = controller.state() else {
        return None;
    };

    let picture: Element<'_, Message> = match preview {
        Preview::Loading => Text::new("Loading…").size(typography::BODY_LG).into(),
        Preview::Failed => Text::new("This image could not be loaded.")
            .size(typography::BODY_LG)
            .into(),
        Preview::Ready(decoded) => {
            let decoded = decoded.clone();
            responsive(move |available| picture(&decoded, available)).into()
        }
    };

    let stage = Container::new(picture)
        .padding(spacing::XL)
        .center(Length::Fill);

    let counter = Text::new(format!("{} / {}", index + 1, controller.entries().len()))
        .size(typography::CAPTION);

    let download = menu_button("Download")
        .on_press_maybe(controller.is_download_enabled().then_some(Message::DownloadPressed));

    let menu = Row::new()
        .spacing(spacing::XS)
        .align_y(Vertical::Center)
        .push(menu_button("Previous").on_press(Message::Previous))
        .push(download)
        .push(menu_button("Next").on_press(Message::Next))
        .push(menu_button("Close").on_press(Message::Close))
        .push(iced::widget::Space::new().width(Length::Fill))
        .push(counter);

    let menu_bar = mouse_area(
        Container::new(menu)
            .padding([spacing::XXS, spacing::MD])
            .width(Length::Fill)
            .height(Length::Fixed(sizing::MENU_HEIGHT))
            .align_y(Vertical::Center)
            .style(styles::menu_bar),
    )
    .on_press(Message::MenuPressed);

    let body = Column::new().push(stage).push(menu_bar);

    Some(
        mouse_area(
            Container::new(body)
                .width(Length::Fill)
                .height(Length::Fill)
                .style(styles::backdrop),
        )
        .on_press(Message::BackdropPressed)
        .into(),
    )
}

fn picture<'a>(decoded: &DecodedImage, available: Size) -> Element<'a, Message> {
    let size = displayed_size(decoded.width, decoded.height, available);
    let image = mouse_area(
        Image::new(decoded.handle.clone())
            .content_fit(ContentFit::Fill)
            .width(Length::Fixed(size.width))
            .height(Length::Fixed(size.height)),
    )
    .on_press(Message::ImagePressed)
    .interaction(mouse::Interaction::Pointer);

    Container::new(image).center(Length::Fill).into()
}

/// Size of a `width` x `height` image fitted into `available`: aspect ratio
/// kept, never upscaled, at most [`sizing::PREVIEW_MAX_FRACTION`] per axis.
#[allow(clippy::cast_precision_loss)]
fn displayed_size(width: u32, height: u32, available: Size) -> Size {
    if width == 0 || height == 0 {
        return Size::ZERO;
    }
    let (width, height) = (width as f32, height as f32);
    let max_width = (available.width * sizing::PREVIEW_MAX_FRACTION).max(0.0);
    let max_height = (available.height * sizing::PREVIEW_MAX_FRACTION).max(0.0);
    let scale = (max_width / width).min(max_height / height).min(1.0);
    Size::new(width * scale, height * scale)
}

fn menu_button(label: &str) -> iced::widget::Button<'_, Message> {
    button(Text::new(label).size(typography::BODY))
        .padding([spacing::XXS, spacing::SM])
        .style(styles::menu_button)
}
