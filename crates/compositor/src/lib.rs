//! Raster compositing for generated ads.
//!
//! Backgrounds, product photos and SVG overlays are flattened in a fixed
//! order: background, then product, then overlay. All functions here are
//! synchronous and CPU-bound except [`fetch::fetch_image_bytes`]; callers on
//! an async runtime should run them on a blocking thread.

pub mod error;
pub mod fetch;
pub mod layout_ad;
pub mod overlay;
pub mod placement;
pub mod raster;

pub use error::CompositeError;
pub use layout_ad::{compose_layout_ad, ComposedAd, LayoutAdSpec};
