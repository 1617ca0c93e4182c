// SPDX-License-Identifier: MPL-2.0
//! Widget styles for the loader overlay and the lightbox.

use crate::ui::design_tokens::{
    opacity,
    palette::{self, BLACK, WHITE},
    radius,
};
use iced::widget::{button, container, progress_bar};
use iced::{Background, Border, Color, Theme};

fn with_alpha(color: Color, alpha: f32) -> Color {
    Color {
        a: color.a * alpha,
        ..color
    }
}

/// Loader surface; `alpha` drives the fade-out.
pub fn loader_surface(alpha: f32, has_background: bool) -> impl Fn(&Theme) -> container::Style {
    move |_theme: &Theme| {
        let base = if has_background {
            Color {
                a: opacity::LOADER_DIM,
                ..BLACK
            }
        } else {
            palette::LOADER_BACKGROUND
        };
        container::Style {
            background: Some(Background::Color(with_alpha(base, alpha))),
            text_color: Some(with_alpha(WHITE, alpha)),
            ..Default::default()
        }
    }
}

/// Progress bar: translucent track with a light bar and side borders.
pub fn loader_progress(alpha: f32) -> impl Fn(&Theme) -> progress_bar::Style {
    move |_theme: &Theme| progress_bar::Style {
        background: Background::Color(with_alpha(
            Color {
                a: opacity::OVERLAY_SUBTLE,
                ..BLACK
            },
            alpha,
        )),
        bar: Background::Color(with_alpha(
            Color {
                a: opacity::OVERLAY_HOVER,
                ..WHITE
            },
            alpha,
        )),
        border: Border {
            color: with_alpha(
                Color {
                    a: opacity::OVERLAY_HOVER,
                    ..WHITE
                },
                alpha,
            ),
            width: 1.0,
            radius: radius::NONE.into(),
        },
    }
}

/// Dimmed area behind the lightbox image.
pub fn backdrop(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color {
            a: opacity::BACKDROP,
            ..BLACK
        })),
        text_color: Some(WHITE),
        ..Default::default()
    }
}

/// Menu bar of the lightbox.
pub fn menu_bar(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color {
            a: opacity::OVERLAY_STRONG,
            ..BLACK
        })),
        text_color: Some(WHITE),
        ..Default::default()
    }
}

/// Text-only menu button; dimmed while disabled.
pub fn menu_button(_theme: &Theme, status: button::Status) -> button::Style {
    let (background, text_color) = match status {
        button::Status::Hovered => (
            Some(Background::Color(Color {
                a: opacity::OVERLAY_SUBTLE,
                ..WHITE
            })),
            WHITE,
        ),
        button::Status::Pressed => (
            Some(Background::Color(Color {
                a: opacity::OVERLAY_MEDIUM,
                ..WHITE
            })),
            WHITE,
        ),
        button::Status::Disabled => (None, palette::GRAY_400),
        button::Status::Active => (None, palette::GRAY_200),
    };
    button::Style {
        background,
        text_color,
        border: Border {
            radius: radius::SM.into(),
            ..Border::default()
        },
        snap: true,
        ..button::Style::default()
    }
}

/// Error message shown when the page cannot be opened.
pub fn error_text(_theme: &Theme) -> iced::widget::text::Style {
    iced::widget::text::Style {
        color: Some(palette::ERROR_500),
    }
}
