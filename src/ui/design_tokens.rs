// SPDX-License-Identifier: MPL-2.0
//! Design tokens shared by the gallery views.
//!
//! Colors, opacity levels, spacing and font sizes live here so the loader,
//! gallery grid and lightbox stay visually consistent.

use iced::Color;

// ============================================================================
// Color Palette
// ============================================================================

pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color::BLACK;
    pub const WHITE: Color = Color::WHITE;
    /// Loader overlay background (`#202020`).
    pub const LOADER_BACKGROUND: Color = Color::from_rgb(0.125, 0.125, 0.125);
    pub const GRAY_400: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const GRAY_200: Color = Color::from_rgb(0.75, 0.75, 0.75);
    pub const ERROR_500: Color = Color::from_rgb(0.898, 0.224, 0.208);
}

// ============================================================================
// Opacity Scale
// ============================================================================

pub mod opacity {
    pub const OVERLAY_SUBTLE: f32 = 0.2;
    /// Dimming layer drawn over the loader background image.
    pub const LOADER_DIM: f32 = 0.45;
    pub const OVERLAY_MEDIUM: f32 = 0.5;
    /// Lightbox backdrop.
    pub const BACKDROP: f32 = 0.85;
    pub const OVERLAY_STRONG: f32 = 0.7;
    pub const OVERLAY_HOVER: f32 = 0.8;
    pub const OPAQUE: f32 = 1.0;
}

// ============================================================================
// Spacing Scale (8px baseline grid)
// ============================================================================

pub mod spacing {
    pub const XXS: f32 = 4.0;
    pub const XS: f32 = 8.0;
    pub const SM: f32 = 12.0;
    pub const MD: f32 = 16.0;
    pub const LG: f32 = 24.0;
    pub const XL: f32 = 32.0;
}

// ============================================================================
// Sizing
// ============================================================================

pub mod sizing {
    /// Progress bar thickness on the loader.
    pub const PROGRESS_HEIGHT: f32 = 12.0;
    /// Thumbnail cell edge when the page declares no size.
    pub const FALLBACK_THUMBNAIL: f32 = 160.0;
    pub const MENU_HEIGHT: f32 = 40.0;
    /// Largest share of the stage, per axis, the lightbox image may cover.
    pub const PREVIEW_MAX_FRACTION: f32 = 0.9;
}

// ============================================================================
// Typography Scale
// ============================================================================

pub mod typography {
    /// Loader title (28pt in the page stylesheet).
    pub const DISPLAY: f32 = 36.0;
    pub const TITLE_MD: f32 = 20.0;
    pub const BODY_LG: f32 = 16.0;
    pub const BODY: f32 = 14.0;
    pub const CAPTION: f32 = 12.0;
}

// ============================================================================
// Border Radius Scale
// ============================================================================

pub mod radius {
    pub const NONE: f32 = 0.0;
    pub const SM: f32 = 4.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_follows_grid() {
        assert!(spacing::XXS < spacing::XS);
        assert!(spacing::XS < spacing::SM);
        assert!(spacing::SM < spacing::MD);
        assert!(spacing::MD < spacing::LG);
        assert!(spacing::LG < spacing::XL);
    }

    #[test]
    fn opacities_are_fractions() {
        for value in [
            opacity::OVERLAY_SUBTLE,
            opacity::LOADER_DIM,
            opacity::OVERLAY_MEDIUM,
            opacity::BACKDROP,
            opacity::OVERLAY_STRONG,
            opacity::OVERLAY_HOVER,
            opacity::OPAQUE,
        ] {
            assert!((0.0..=1.0).contains(&value));
        }
    }
}
