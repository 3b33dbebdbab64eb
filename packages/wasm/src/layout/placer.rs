//! Generation placement beneath a parent.
//!
//! Children of one expansion sit on a horizontal line `vertical_offset` below
//! the parent, centred under it. Sibling spacing shrinks geometrically with
//! depth so deep branches converge instead of sprawling sideways:
//!
//! ```text
//! spacing    = base_spacing / decay_factor^(parent_level + 1)
//! total_span = (child_count - 1) * spacing
//! x_i        = parent.x - total_span / 2 + i * spacing
//! ```

use crate::config::LayoutConfig;
use crate::graph::Position;

/// Computes child positions for one expansion step.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutPlacer {
    config: LayoutConfig,
}

impl LayoutPlacer {
    /// Create a placer with the given constants.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Horizontal distance between adjacent children at `child_level`.
    pub fn spacing(&self, child_level: u32) -> f64 {
        let exponent = i32::try_from(child_level).unwrap_or(i32::MAX);
        self.config.base_spacing / self.config.decay_factor.powi(exponent)
    }

    /// Positions for `child_count` children of a parent at `parent_level`.
    ///
    /// A single child lands directly below the parent.
    pub fn place(&self, parent: Position, parent_level: u32, child_count: usize) -> Vec<Position> {
        if child_count == 0 {
            return Vec::new();
        }
        let spacing = self.spacing(parent_level + 1);
        let total_span = (child_count - 1) as f64 * spacing;
        let left = parent.x - total_span / 2.0;
        let y = parent.y + self.config.vertical_offset;

        (0..child_count)
            .map(|i| Position::new(left + i as f64 * spacing, y))
            .collect()
    }
}
