//! Pre-persistence checks for normalised trails.

use thiserror::Error;

use crate::Trail;

/// Reasons a trail is not fit for persistence.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The name is empty after trimming.
    #[error("trail name must not be empty")]
    MissingName,
    /// The distance is zero, negative or not finite.
    #[error("trail distance must be positive, got {distance_km} km")]
    NonPositiveDistance {
        /// Offending distance in kilometres.
        distance_km: f64,
    },
    /// The trail has no geometry.
    #[error("trail geometry must not be empty")]
    EmptyGeometry,
}

/// Check that a trail can be persisted.
///
/// Difficulty is not checked: every [`Trail`] carries one.
///
/// # Errors
///
/// Returns the first failing check as a [`ValidationError`].
///
/// # Examples
/// ```
/// use waymark_core::{Trail, ValidationError, validate_trail};
///
/// let trail = Trail { name: "  ".into(), ..Trail::default() };
/// assert_eq!(validate_trail(&trail), Err(ValidationError::MissingName));
/// ```
pub fn validate_trail(trail: &Trail) -> Result<(), ValidationError> {
    if trail.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if !(trail.distance_km.is_finite() && trail.distance_km > 0.0) {
        return Err(ValidationError::NonPositiveDistance {
            distance_km: trail.distance_km,
        });
    }
    if trail.geometry.is_empty() {
        return Err(ValidationError::EmptyGeometry);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_trail;
    use rstest::rstest;

    #[rstest]
    fn accepts_complete_trail() {
        assert_eq!(validate_trail(&sample_trail(1)), Ok(()));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_bad_distance(#[case] distance_km: f64) {
        let trail = Trail {
            distance_km,
            ..sample_trail(1)
        };
        let err = validate_trail(&trail).expect_err("distance should be rejected");
        assert!(matches!(err, ValidationError::NonPositiveDistance { .. }));
    }

    #[rstest]
    fn rejects_empty_geometry() {
        let trail = Trail {
            geometry: Vec::new(),
            ..sample_trail(1)
        };
        assert_eq!(validate_trail(&trail), Err(ValidationError::EmptyGeometry));
    }

    #[rstest]
    fn rejects_blank_name() {
        let trail = Trail {
            name: " \t".to_owned(),
            ..sample_trail(1)
        };
        assert_eq!(validate_trail(&trail), Err(ValidationError::MissingName));
    }
}
