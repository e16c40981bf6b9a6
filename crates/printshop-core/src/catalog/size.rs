//! Print sizes.

use crate::ConfiguratorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance when comparing dimensions in inches.
const DIMENSION_EPSILON: f64 = 1e-6;

/// Orientation of a size or envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
    Square,
}

/// A concrete printable size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeOption {
    pub width: f64,
    pub height: f64,
}

impl SizeOption {
    /// Create a size, rejecting non-positive or non-finite dimensions.
    pub fn new(width: f64, height: f64) -> Result<Self, ConfiguratorError> {
        let valid = |d: f64| d.is_finite() && d > 0.0;
        if !valid(width) || !valid(height) {
            return Err(ConfiguratorError::InvalidSize { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn orientation(&self) -> Orientation {
        if (self.width - self.height).abs() < DIMENSION_EPSILON {
            Orientation::Square
        } else if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Swap width and height.
    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Same size in either orientation.
    pub fn matches(&self, width: f64, height: f64) -> bool {
        let same = |a: f64, b: f64| (a - b).abs() < DIMENSION_EPSILON;
        (same(self.width, width) && same(self.height, height))
            || (same(self.width, height) && same(self.height, width))
    }

    /// Label such as "16×20".
    pub fn label(&self) -> String {
        format!("{}\u{00d7}{}", format_inches(self.width), format_inches(self.height))
    }
}

impl fmt::Display for SizeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", format_inches(self.width), format_inches(self.height))
    }
}

fn format_inches(d: f64) -> String {
    if d.fract().abs() < DIMENSION_EPSILON {
        format!("{}", d.round() as i64)
    } else {
        format!("{}", d)
    }
}

/// Standard print sizes offered when the catalog has no per-product list.
pub fn standard_sizes() -> Vec<SizeOption> {
    const STANDARD: &[(f64, f64)] = &[
        (5.0, 7.0),
        (8.0, 8.0),
        (8.0, 10.0),
        (8.0, 12.0),
        (10.0, 10.0),
        (11.0, 14.0),
        (12.0, 12.0),
        (12.0, 16.0),
        (12.0, 18.0),
        (16.0, 16.0),
        (16.0, 20.0),
        (16.0, 24.0),
        (18.0, 24.0),
        (20.0, 20.0),
        (20.0, 24.0),
        (20.0, 30.0),
        (24.0, 24.0),
        (24.0, 30.0),
        (24.0, 36.0),
        (30.0, 30.0),
        (30.0, 40.0),
        (30.0, 45.0),
        (36.0, 48.0),
        (40.0, 60.0),
    ];
    STANDARD
        .iter()
        .map(|&(width, height)| SizeOption { width, height })
        .collect()
}
