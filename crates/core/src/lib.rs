//! Domain logic for ad generation.
//!
//! Everything here is pure: static layout, style and background libraries,
//! zone geometry, template interpolation, creative brief assembly, copy
//! quality checks and quota window arithmetic. No I/O.

pub mod ad_styles;
pub mod backgrounds;
pub mod brief;
pub mod color_scheme;
pub mod copy;
pub mod error;
pub mod geometry;
pub mod layouts;
pub mod quota;
pub mod scene;
pub mod template;
pub mod types;
