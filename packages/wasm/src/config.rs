//! Explorer configuration.
//!
//! [`ExplorerConfig`] is the typed configuration the session runs with.
//! [`RawConfig`] is what arrives from the form inputs on the JS side: every
//! field optional and loosely typed. Converting a raw config never fails;
//! anything unusable is coerced to a safe value and logged.

use log::warn;
use serde::Deserialize;

/// Children generated per expansion when nothing is configured.
pub const DEFAULT_BREADTH: usize = 3;

/// Auto-solve depth limit when nothing is configured.
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Root label used when the prompt is blank.
pub const DEFAULT_ROOT_LABEL: &str = "Root";

/// Delay between automatic expansions.
pub const DEFAULT_AUTO_SOLVE_DELAY_MS: f64 = 1000.0;

/// Layout constants for placing a generation of children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal distance between siblings before depth decay.
    pub base_spacing: f64,
    /// Spacing is divided by `decay_factor^level`; values above 1 converge.
    pub decay_factor: f64,
    /// Vertical distance between a parent and its children.
    pub vertical_offset: f64,
}

impl LayoutConfig {
    /// Default sibling spacing.
    pub const DEFAULT_BASE_SPACING: f64 = 500.0;
    /// Default per-level spacing decay.
    pub const DEFAULT_DECAY_FACTOR: f64 = 1.5;
    /// Default parent-to-children distance.
    pub const DEFAULT_VERTICAL_OFFSET: f64 = 150.0;

    /// Replace non-positive or non-finite values by their defaults.
    pub fn sanitized(self) -> Self {
        Self {
            base_spacing: positive_or(
                self.base_spacing,
                Self::DEFAULT_BASE_SPACING,
                "baseSpacing",
            ),
            decay_factor: positive_or(
                self.decay_factor,
                Self::DEFAULT_DECAY_FACTOR,
                "decayFactor",
            ),
            vertical_offset: positive_or(
                self.vertical_offset,
                Self::DEFAULT_VERTICAL_OFFSET,
                "verticalOffset",
            ),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_spacing: Self::DEFAULT_BASE_SPACING,
            decay_factor: Self::DEFAULT_DECAY_FACTOR,
            vertical_offset: Self::DEFAULT_VERTICAL_OFFSET,
        }
    }
}

/// Configuration for one run of the explorer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    /// Children generated per expansion (at least 1).
    pub breadth: usize,
    /// Automatically expand the best child after every expansion.
    pub auto_solve: bool,
    /// Auto-solve stops once children reach this level (at least 1).
    pub max_depth: u32,
    /// Root label; blank means [`DEFAULT_ROOT_LABEL`].
    pub prompt_text: String,
    /// Delay before a scheduled automatic expansion fires.
    pub auto_solve_delay_ms: f64,
    /// Child placement constants.
    pub layout: LayoutConfig,
}

impl ExplorerConfig {
    /// Label for the root of a run started with this configuration.
    pub fn root_label(&self) -> &str {
        if self.prompt_text.trim().is_empty() {
            DEFAULT_ROOT_LABEL
        } else {
            &self.prompt_text
        }
    }

    /// Coerce out-of-range values to the nearest safe ones.
    pub fn sanitized(self) -> Self {
        let breadth = if self.breadth == 0 {
            warn!("breadth 0 is invalid, using 1");
            1
        } else {
            self.breadth
        };
        let max_depth = if self.max_depth == 0 {
            warn!("maxDepth 0 is invalid, using 1");
            1
        } else {
            self.max_depth
        };
        let delay = self.auto_solve_delay_ms;
        let auto_solve_delay_ms = if delay.is_finite() && delay >= 0.0 {
            delay
        } else {
            warn!("autoSolveDelayMs {delay} is invalid, using {DEFAULT_AUTO_SOLVE_DELAY_MS}");
            DEFAULT_AUTO_SOLVE_DELAY_MS
        };
        Self {
            breadth,
            max_depth,
            auto_solve_delay_ms,
            layout: self.layout.sanitized(),
            ..self
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            breadth: DEFAULT_BREADTH,
            auto_solve: false,
            max_depth: DEFAULT_MAX_DEPTH,
            prompt_text: String::new(),
            auto_solve_delay_ms: DEFAULT_AUTO_SOLVE_DELAY_MS,
            layout: LayoutConfig::default(),
        }
    }
}

/// A form value: whatever the input widget produced.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Checkbox.
    Flag(bool),
    /// Number input.
    Number(f64),
    /// Text input.
    Text(String),
}

impl ConfigValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            ConfigValue::Text(s) => s.trim().parse().ok(),
            ConfigValue::Flag(_) => None,
        }
    }

    fn as_flag(&self) -> Option<bool> {
        match self {
            ConfigValue::Flag(b) => Some(*b),
            ConfigValue::Number(n) => Some(*n != 0.0),
            ConfigValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Some(true),
                "false" | "off" | "no" | "0" | "" => Some(false),
                _ => None,
            },
        }
    }
}

/// Loosely typed layout section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLayoutConfig {
    /// See [`LayoutConfig::base_spacing`].
    pub base_spacing: Option<ConfigValue>,
    /// See [`LayoutConfig::decay_factor`].
    pub decay_factor: Option<ConfigValue>,
    /// See [`LayoutConfig::vertical_offset`].
    pub vertical_offset: Option<ConfigValue>,
}

/// Loosely typed configuration as submitted by the JS form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConfig {
    /// See [`ExplorerConfig::breadth`].
    pub breadth: Option<ConfigValue>,
    /// See [`ExplorerConfig::auto_solve`].
    pub auto_solve: Option<ConfigValue>,
    /// See [`ExplorerConfig::max_depth`].
    pub max_depth: Option<ConfigValue>,
    /// See [`ExplorerConfig::prompt_text`].
    pub prompt_text: Option<String>,
    /// See [`ExplorerConfig::auto_solve_delay_ms`].
    pub auto_solve_delay_ms: Option<ConfigValue>,
    /// See [`LayoutConfig`].
    pub layout: Option<RawLayoutConfig>,
}

impl From<RawConfig> for ExplorerConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = ExplorerConfig::default();
        let layout = raw.layout.unwrap_or_default();
        let layout_defaults = LayoutConfig::default();

        let config = ExplorerConfig {
            breadth: count_or(raw.breadth.as_ref(), defaults.breadth as u64, "breadth") as usize,
            auto_solve: raw
                .auto_solve
                .as_ref()
                .map(|value| {
                    value.as_flag().unwrap_or_else(|| {
                        warn!("autoSolve {value:?} is not a flag, disabling");
                        false
                    })
                })
                .unwrap_or(defaults.auto_solve),
            max_depth: count_or(raw.max_depth.as_ref(), defaults.max_depth as u64, "maxDepth")
                .min(u32::MAX as u64) as u32,
            prompt_text: raw.prompt_text.unwrap_or_default(),
            auto_solve_delay_ms: number_or(
                raw.auto_solve_delay_ms.as_ref(),
                defaults.auto_solve_delay_ms,
            ),
            layout: LayoutConfig {
                base_spacing: number_or(layout.base_spacing.as_ref(), layout_defaults.base_spacing),
                decay_factor: number_or(layout.decay_factor.as_ref(), layout_defaults.decay_factor),
                vertical_offset: number_or(
                    layout.vertical_offset.as_ref(),
                    layout_defaults.vertical_offset,
                ),
            },
        };
        config.sanitized()
    }
}

/// Positive integer input. Missing uses the default; unusable falls back to 1.
fn count_or(value: Option<&ConfigValue>, default: u64, name: &str) -> u64 {
    let Some(value) = value else {
        return default;
    };
    match value.as_number() {
        Some(n) if n.is_finite() && n >= 1.0 => n.floor() as u64,
        _ => {
            warn!("{name} {value:?} is not a positive number, using 1");
            1
        }
    }
}

/// Numeric input; unparsable values become NaN so `sanitized` replaces them.
fn number_or(value: Option<&ConfigValue>, default: f64) -> f64 {
    match value {
        None => default,
        Some(value) => value.as_number().unwrap_or(f64::NAN),
    }
}

fn positive_or(value: f64, default: f64, name: &str) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!("{name} {value} is not a positive number, using {default}");
        default
    }
}
