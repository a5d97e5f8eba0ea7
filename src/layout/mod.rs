//! Overlay placement. Positions are computed from host-measured bounds and
//! written back as `data-fz-top` / `data-fz-left` attributes; the host is
//! responsible for applying them visually.

pub mod position;

pub use position::{clamp_to_viewport, place, Placement, VIEWPORT_MARGIN};
