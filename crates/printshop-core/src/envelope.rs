//! Printable-size envelope and size filtering.
//!
//! Portrait and landscape are interchangeable at the print shop, so a
//! candidate size is rotated to the envelope's predominant orientation
//! before its dimensions are compared against the bounds.

use crate::catalog::{Orientation, SizeOption};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BOUND_EPSILON: f64 = 1e-9;

/// Invalid envelope bounds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    #[error("envelope bounds must be positive and finite")]
    NonPositive,

    #[error("{axis} minimum {min} exceeds maximum {max}")]
    Inverted {
        axis: &'static str,
        min: f64,
        max: f64,
    },
}

/// Printable size range of a product type, in inches, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl Envelope {
    pub fn new(
        min_width: f64,
        max_width: f64,
        min_height: f64,
        max_height: f64,
    ) -> Result<Self, EnvelopeError> {
        let bounds = [min_width, max_width, min_height, max_height];
        if bounds.iter().any(|b| !b.is_finite() || *b <= 0.0) {
            return Err(EnvelopeError::NonPositive);
        }
        if min_width > max_width {
            return Err(EnvelopeError::Inverted {
                axis: "width",
                min: min_width,
                max: max_width,
            });
        }
        if min_height > max_height {
            return Err(EnvelopeError::Inverted {
                axis: "height",
                min: min_height,
                max: max_height,
            });
        }
        Ok(Self {
            min_width,
            max_width,
            min_height,
            max_height,
        })
    }

    /// Predominant orientation: decided by the maximum bounds, then by the
    /// minimum bounds when the maxima are equal.
    pub fn orientation(&self) -> Orientation {
        let by = |w: f64, h: f64| {
            if (w - h).abs() < BOUND_EPSILON {
                Orientation::Square
            } else if w > h {
                Orientation::Landscape
            } else {
                Orientation::Portrait
            }
        };
        match by(self.max_width, self.max_height) {
            Orientation::Square => by(self.min_width, self.min_height),
            orientation => orientation,
        }
    }

    /// Rotate `size` to this envelope's orientation.
    pub fn normalize(&self, size: &SizeOption) -> SizeOption {
        match (self.orientation(), size.orientation()) {
            (Orientation::Landscape, Orientation::Portrait)
            | (Orientation::Portrait, Orientation::Landscape) => size.rotated(),
            _ => *size,
        }
    }

    /// Whether the normalized size falls within the bounds on both axes.
    pub fn admits(&self, size: &SizeOption) -> bool {
        let n = self.normalize(size);
        within(n.width, self.min_width, self.max_width)
            && within(n.height, self.min_height, self.max_height)
    }
}

fn within(value: f64, min: f64, max: f64) -> bool {
    value >= min - BOUND_EPSILON && value <= max + BOUND_EPSILON
}

/// Keep the candidates that fit `envelope`, normalized to its orientation.
///
/// Candidates that normalize to the same size are listed once. An empty
/// result is valid and means no sizes are available.
pub fn filter_sizes(candidates: &[SizeOption], envelope: &Envelope) -> Vec<SizeOption> {
    let mut sizes: Vec<SizeOption> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !envelope.admits(candidate) {
            continue;
        }
        let normalized = envelope.normalize(candidate);
        if !sizes.contains(&normalized) {
            sizes.push(normalized);
        }
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: f64, h: f64) -> SizeOption {
        SizeOption::new(w, h).unwrap()
    }

    fn canvas_envelope() -> Envelope {
        Envelope::new(8.0, 30.0, 10.0, 30.0).unwrap()
    }

    #[test]
    fn test_envelope_validation() {
        assert_eq!(Envelope::new(0.0, 10.0, 1.0, 1.0), Err(EnvelopeError::NonPositive));
        assert!(matches!(
            Envelope::new(20.0, 10.0, 1.0, 5.0),
            Err(EnvelopeError::Inverted { axis: "width", .. })
        ));
        assert!(matches!(
            Envelope::new(1.0, 10.0, 6.0, 5.0),
            Err(EnvelopeError::Inverted { axis: "height", .. })
        ));
    }

    #[test]
    fn test_filter_standard_canvas_sizes() {
        let candidates = vec![size(8.0, 10.0), size(16.0, 20.0), size(40.0, 60.0)];
        let sizes = filter_sizes(&candidates, &canvas_envelope());
        assert_eq!(sizes, vec![size(8.0, 10.0), size(16.0, 20.0)]);
    }

    #[test]
    fn test_envelope_orientation() {
        assert_eq!(canvas_envelope().orientation(), Orientation::Portrait);
        let wide = Envelope::new(10.0, 60.0, 8.0, 40.0).unwrap();
        assert_eq!(wide.orientation(), Orientation::Landscape);
        let square = Envelope::new(8.0, 30.0, 8.0, 30.0).unwrap();
        assert_eq!(square.orientation(), Orientation::Square);
    }

    #[test]
    fn test_landscape_candidate_rotated_into_portrait_envelope() {
        let envelope = canvas_envelope();
        assert!(envelope.admits(&size(10.0, 8.0)));
        assert_eq!(envelope.normalize(&size(10.0, 8.0)), size(8.0, 10.0));

        let sizes = filter_sizes(&[size(10.0, 8.0), size(8.0, 10.0)], &envelope);
        assert_eq!(sizes, vec![size(8.0, 10.0)]);
    }

    #[test]
    fn test_square_envelope_keeps_orientation() {
        let envelope = Envelope::new(5.0, 20.0, 5.0, 20.0).unwrap();
        let sizes = filter_sizes(&[size(16.0, 20.0), size(20.0, 16.0)], &envelope);
        assert_eq!(sizes, vec![size(16.0, 20.0), size(20.0, 16.0)]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let envelope = canvas_envelope();
        assert!(envelope.admits(&size(30.0, 30.0)));
        assert!(envelope.admits(&size(8.0, 10.0)));
        assert!(!envelope.admits(&size(7.99, 10.0)));
        assert!(!envelope.admits(&size(30.0, 31.0)));
    }

    #[test]
    fn test_every_filtered_size_is_contained() {
        let envelope = Envelope::new(6.0, 24.0, 9.0, 36.0).unwrap();
        let sizes = filter_sizes(&crate::catalog::standard_sizes(), &envelope);
        assert!(!sizes.is_empty());
        for s in &sizes {
            let n = envelope.normalize(s);
            assert!(n.width >= envelope.min_width && n.width <= envelope.max_width);
            assert!(n.height >= envelope.min_height && n.height <= envelope.max_height);
        }
    }

    #[test]
    fn test_no_sizes_fit() {
        let envelope = Envelope::new(100.0, 120.0, 100.0, 120.0).unwrap();
        assert!(filter_sizes(&crate::catalog::standard_sizes(), &envelope).is_empty());
    }
}
