// SPDX-License-Identifier: MPL-2.0
//! Thumbnail hover effect.
//!
//! Thumbnails rest slightly smaller than their declared size and grow back to
//! it while hovered, following a sine ease-out. On rich pages the hovered
//! thumbnail also switches to its `_rich` image variant.

use std::time::{Duration, Instant};

/// Width and height in logical pixels.
pub type Dimensions = (u32, u32);

/// Size a thumbnail rests at: `floor(declared * scale)` on both axes.
#[must_use]
pub fn rest_size(declared: Dimensions, scale: f32) -> Dimensions {
    let scale = f64::from(scale);
    // The small bias keeps exact products like 150 * 0.9 from flooring to 134.
    let shrink = |value: u32| ((f64::from(value) * scale) + 1e-4).floor() as u32;
    (shrink(declared.0), shrink(declared.1))
}

/// One eased step from `init` towards `target` at `progress` in `[0, 1]`.
///
/// `init + floor((target - init) * sin(progress * π/2))`.
#[must_use]
pub fn ease(init: u32, target: u32, progress: f32) -> u32 {
    let progress = f64::from(progress.clamp(0.0, 1.0));
    let delta = f64::from(target) - f64::from(init);
    let step = (delta * (progress * std::f64::consts::FRAC_PI_2).sin()).floor();
    (f64::from(init) + step).max(0.0) as u32
}

/// Image source shown while hovering a thumbnail on a rich page:
/// `suffix` is inserted before the extension (`a.jpg` -> `a_rich.jpg`).
#[must_use]
pub fn rich_variant(src: &str, suffix: &str) -> String {
    let name_start = src.rfind('/').map_or(0, |slash| slash + 1);
    match src[name_start..].rfind('.') {
        Some(period) => {
            let (prefix, extension) = src.split_at(name_start + period);
            format!("{prefix}{suffix}{extension}")
        }
        None => format!("{src}{suffix}"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Animation {
    from: Dimensions,
    to: Dimensions,
    started: Instant,
}

/// Hover state and animated size of one thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverSize {
    rest: Dimensions,
    full: Dimensions,
    current: Dimensions,
    hovered: bool,
    animation: Option<Animation>,
}

impl HoverSize {
    #[must_use]
    pub fn new(declared: Dimensions, rest_scale: f32) -> Self {
        let rest = rest_size(declared, rest_scale);
        Self {
            rest,
            full: declared,
            current: rest,
            hovered: false,
            animation: None,
        }
    }

    /// Pointer entered the thumbnail: grow towards the declared size.
    pub fn enter(&mut self, now: Instant) {
        self.hovered = true;
        self.animate_to(self.full, now);
    }

    /// Pointer left the thumbnail: shrink back to the rest size.
    pub fn leave(&mut self, now: Instant) {
        self.hovered = false;
        self.animate_to(self.rest, now);
    }

    fn animate_to(&mut self, to: Dimensions, now: Instant) {
        self.animation = Some(Animation {
            from: self.current,
            to,
            started: now,
        });
    }

    /// Advances the animation. Returns `true` while it is still running.
    pub fn tick(&mut self, now: Instant, duration: Duration) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        let elapsed = now.saturating_duration_since(animation.started);
        if duration.is_zero() || elapsed >= duration {
            self.current = animation.to;
            self.animation = None;
            return false;
        }
        let progress = elapsed.as_secs_f32() / duration.as_secs_f32();
        self.current = (
            ease(animation.from.0, animation.to.0, progress),
            ease(animation.from.1, animation.to.1, progress),
        );
        true
    }

    #[must_use]
    pub fn size(&self) -> Dimensions {
        self.current
    }

    #[must_use]
    pub fn rest(&self) -> Dimensions {
        self.rest
    }

    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: Duration = Duration::from_millis(200);

    #[test]
    fn rest_size_is_nine_tenths_floored() {
        assert_eq!(rest_size((200, 150), 0.9), (180, 135));
        assert_eq!(rest_size((101, 7), 0.9), (90, 6));
    }

    #[test]
    fn ease_follows_sine_curve() {
        assert_eq!(ease(180, 200, 0.0), 180);
        // sin(π/4) * 20 = 14.14
        assert_eq!(ease(180, 200, 0.5), 194);
        assert_eq!(ease(180, 200, 1.0), 200);
    }

    #[test]
    fn ease_floors_when_shrinking() {
        // -20 * sin(π/4) = -14.14, floored to -15
        assert_eq!(ease(200, 180, 0.5), 185);
    }

    #[test]
    fn rich_variant_inserts_suffix_before_extension() {
        assert_eq!(rich_variant("img/a_small.jpg", "_rich"), "img/a_small_rich.jpg");
        assert_eq!(rich_variant("v1.2/photo", "_rich"), "v1.2/photo_rich");
    }

    #[test]
    fn hover_grows_then_snaps_to_declared_size() {
        let start = Instant::now();
        let mut hover = HoverSize::new((200, 100), 0.9);
        assert_eq!(hover.size(), (180, 90));

        hover.enter(start);
        assert!(hover.tick(start + DURATION / 2, DURATION));
        let (w, h) = hover.size();
        assert!(w > 180 && w < 200);
        assert!(h > 90 && h < 100);

        assert!(!hover.tick(start + DURATION, DURATION));
        assert_eq!(hover.size(), (200, 100));
        assert!(!hover.is_animating());
    }

    #[test]
    fn leave_mid_animation_starts_from_current_size() {
        let start = Instant::now();
        let mut hover = HoverSize::new((200, 200), 0.9);
        hover.enter(start);
        hover.tick(start + DURATION / 2, DURATION);
        let midway = hover.size();

        let left = start + DURATION / 2;
        hover.leave(left);
        hover.tick(left, DURATION);
        assert_eq!(hover.size(), midway);
        assert!(!hover.is_hovered());

        hover.tick(left + DURATION, DURATION);
        assert_eq!(hover.size(), hover.rest());
    }

    #[test]
    fn zero_duration_jumps_immediately() {
        let now = Instant::now();
        let mut hover = HoverSize::new((50, 50), 0.9);
        hover.enter(now);
        assert!(!hover.tick(now, Duration::ZERO));
        assert_eq!(hover.size(), (50, 50));
    }
}
