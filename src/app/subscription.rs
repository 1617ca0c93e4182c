// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! The animation clock only runs while something is animating, and keyboard
//! events are only listened to while the lightbox is open.

use super::Message;
use crate::lightbox;
use iced::{event, keyboard, time, Subscription};
use std::time::Duration;

/// What the current state needs to be woken up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Needs {
    pub animating: bool,
    pub frame_interval: Duration,
    pub keyboard: bool,
}

pub fn subscription(needs: Needs) -> Subscription<Message> {
    let mut subscriptions = Vec::with_capacity(2);

    if needs.animating {
        subscriptions.push(time::every(needs.frame_interval).map(Message::Tick));
    }

    if needs.keyboard {
        subscriptions.push(create_keyboard_subscription());
    }

    Subscription::batch(subscriptions)
}

/// Routes key presses no widget consumed to the lightbox.
fn create_keyboard_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, _window_id| match (event, status) {
        (
            event::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }),
            event::Status::Ignored,
        ) => Some(Message::Lightbox(lightbox::Message::KeyPressed(key))),
        _ => None,
    })
}
