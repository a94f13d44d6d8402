//! Frame driver support types.
//!
//! The per-frame step itself lives on the host (`Host::frame`); this module
//! holds the display geometry it recomputes every refresh.

mod geometry;

pub use geometry::DisplayGeometry;
