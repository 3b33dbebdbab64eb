//! Layout algorithms for the thought tree.
//!
//! This module computes target positions for each new generation of thoughts.
//! Existing nodes are never moved; only the renderer (via user drags) does that.

pub mod placer;

pub use placer::LayoutPlacer;
