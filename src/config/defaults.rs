// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Loader**: Loading overlay animation and fade-out timing
//! - **Hover**: Thumbnail hover animation
//! - **Gallery**: Grid layout and preview caching

// ==========================================================================
// Loader Defaults
// ==========================================================================

/// Duration of the fade-out played once every asset has settled (milliseconds).
pub const DEFAULT_FADE_OUT_MS: u64 = 500;

/// Minimum fade-out duration (milliseconds). Zero removes the overlay at once.
pub const MIN_FADE_OUT_MS: u64 = 0;

/// Maximum fade-out duration (milliseconds).
pub const MAX_FADE_OUT_MS: u64 = 5_000;

/// Interval between two "Now Loading" dot steps (milliseconds).
pub const DEFAULT_DOTS_INTERVAL_MS: u64 = 250;

/// Number of animated dots after "Now Loading".
pub const LOADING_DOT_COUNT: usize = 3;

/// Animation frame rate for fades and hover transitions.
pub const DEFAULT_FRAME_RATE: u32 = 50;

/// Minimum animation frame rate.
pub const MIN_FRAME_RATE: u32 = 10;

/// Maximum animation frame rate.
pub const MAX_FRAME_RATE: u32 = 120;

// ==========================================================================
// Hover Defaults
// ==========================================================================

/// Duration of the thumbnail grow/shrink animation (milliseconds).
pub const DEFAULT_HOVER_DURATION_MS: u64 = 200;

/// Maximum hover animation duration (milliseconds).
pub const MAX_HOVER_DURATION_MS: u64 = 2_000;

/// Resting thumbnail size as a fraction of its declared size.
pub const DEFAULT_REST_SCALE: f32 = 0.9;

/// Smallest accepted resting scale.
pub const MIN_REST_SCALE: f32 = 0.1;

/// Largest accepted resting scale (no shrink at all).
pub const MAX_REST_SCALE: f32 = 1.0;

/// Token inserted before the file extension to address the high-resolution
/// thumbnail variant in rich mode.
pub const DEFAULT_RICH_SUFFIX: &str = "_rich";

// ==========================================================================
// Gallery Defaults
// ==========================================================================

/// Number of thumbnails per grid row.
pub const DEFAULT_GRID_COLUMNS: usize = 4;

/// Minimum thumbnails per grid row.
pub const MIN_GRID_COLUMNS: usize = 1;

/// Maximum thumbnails per grid row.
pub const MAX_GRID_COLUMNS: usize = 12;

/// Number of decoded lightbox previews kept in memory.
pub const DEFAULT_PREVIEW_CACHE_ENTRIES: usize = 16;

/// Minimum preview cache size.
pub const MIN_PREVIEW_CACHE_ENTRIES: usize = 1;

/// Maximum preview cache size.
pub const MAX_PREVIEW_CACHE_ENTRIES: usize = 128;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MAX_FADE_OUT_MS >= DEFAULT_FADE_OUT_MS);
    assert!(DEFAULT_DOTS_INTERVAL_MS > 0);
    assert!(LOADING_DOT_COUNT > 0);

    assert!(MIN_FRAME_RATE > 0);
    assert!(DEFAULT_FRAME_RATE >= MIN_FRAME_RATE);
    assert!(DEFAULT_FRAME_RATE <= MAX_FRAME_RATE);

    assert!(DEFAULT_HOVER_DURATION_MS <= MAX_HOVER_DURATION_MS);
    assert!(MIN_REST_SCALE > 0.0);
    assert!(DEFAULT_REST_SCALE >= MIN_REST_SCALE);
    assert!(DEFAULT_REST_SCALE <= MAX_REST_SCALE);

    assert!(MIN_GRID_COLUMNS > 0);
    assert!(DEFAULT_GRID_COLUMNS >= MIN_GRID_COLUMNS);
    assert!(DEFAULT_GRID_COLUMNS <= MAX_GRID_COLUMNS);

    assert!(MIN_PREVIEW_CACHE_ENTRIES > 0);
    assert!(DEFAULT_PREVIEW_CACHE_ENTRIES >= MIN_PREVIEW_CACHE_ENTRIES);
    assert!(DEFAULT_PREVIEW_CACHE_ENTRIES <= MAX_PREVIEW_CACHE_ENTRIES);
};
