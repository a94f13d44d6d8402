//! Native event translation.

pub mod winit;
