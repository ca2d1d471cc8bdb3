//! Swipe gesture classification.
//!
//! A drag is reduced to its horizontal distance in points. Two thresholds
//! apply to the same distance: a low *preview* threshold that only drives
//! visual feedback while the finger is down, and a high *commit* threshold
//! that decides whether releasing the drag selects a choice.

use greentrack_types::SwipeDirection;

use crate::config::GestureConfig;

/// Classify a horizontal drag distance against a threshold.
///
/// Strictly greater than `threshold` is [`SwipeDirection::Right`], strictly
/// less than `-threshold` is [`SwipeDirection::Left`], anything else (including
/// NaN) is no swipe.
pub const fn classify(distance: f64, threshold: f64) -> Option<SwipeDirection> {
    if distance > threshold {
        Some(SwipeDirection::Right)
    } else if distance < -threshold {
        Some(SwipeDirection::Left)
    } else {
        None
    }
}

/// Visual hint shown while a drag is past the preview threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipePreview {
    /// Side the card is leaning towards.
    pub direction: SwipeDirection,
    /// Opacity of the choice label, in `0.0..=1.0`.
    pub opacity: f64,
}

/// Applies the configured preview and commit thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeGestureClassifier {
    preview_threshold: f64,
    commit_threshold: f64,
    fade_distance: f64,
}

impl SwipeGestureClassifier {
    /// Build a classifier from the gesture configuration.
    pub const fn new(config: &GestureConfig) -> Self {
        Self {
            preview_threshold: config.preview_threshold,
            commit_threshold: config.commit_threshold,
            fade_distance: config.preview_fade_distance,
        }
    }

    /// The distance a release must exceed to commit a choice.
    pub const fn commit_threshold(&self) -> f64 {
        self.commit_threshold
    }

    /// Preview for an in-progress drag, or `None` inside the preview threshold.
    ///
    /// The label fades in linearly over the fade distance past the threshold.
    pub fn preview(&self, distance: f64) -> Option<SwipePreview> {
        let direction = classify(distance, self.preview_threshold)?;
        let past = distance.abs() - self.preview_threshold;
        let opacity = if self.fade_distance > 0.0 {
            (past / self.fade_distance).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Some(SwipePreview { direction, opacity })
    }

    /// Direction committed by releasing the drag at `distance`, if any.
    pub const fn release(&self, distance: f64) -> Option<SwipeDirection> {
        classify(distance, self.commit_threshold)
    }
}

impl Default for SwipeGestureClassifier {
    fn default() -> Self {
        Self::new(&GestureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_strict_at_threshold() {
        assert_eq!(classify(100.0, 100.0), None);
        assert_eq!(classify(-100.0, 100.0), None);
        assert_eq!(classify(100.5, 100.0), Some(SwipeDirection::Right));
        assert_eq!(classify(-100.5, 100.0), Some(SwipeDirection::Left));
        assert_eq!(classify(0.0, 100.0), None);
    }

    #[test]
    fn classify_is_mirror_symmetric() {
        const fn mirror(direction: Option<SwipeDirection>) -> Option<SwipeDirection> {
            match direction {
                Some(SwipeDirection::Left) => Some(SwipeDirection::Right),
                Some(SwipeDirection::Right) => Some(SwipeDirection::Left),
                None => None,
            }
        }

        let distances = [
            0.0,
            -0.0,
            1.0,
            49.9,
            50.0,
            50.1,
            99.999,
            100.0,
            100.001,
            250.0,
            f64::MAX,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NAN,
        ];
        for threshold in [0.0, 50.0, 100.0] {
            for d in distances {
                assert_eq!(
                    classify(d, threshold),
                    mirror(classify(-d, threshold)),
                    "d = {d}, t = {threshold}"
                );
            }
        }
        assert_eq!(classify(f64::INFINITY, 100.0), Some(SwipeDirection::Right));
        assert_eq!(classify(f64::NEG_INFINITY, 100.0), Some(SwipeDirection::Left));
        assert_eq!(classify(-0.0, 0.0), None);
    }

    #[test]
    fn classify_nan_is_none() {
        assert_eq!(classify(f64::NAN, 100.0), None);
    }

    #[test]
    fn preview_fades_in_past_threshold() {
        let classifier = SwipeGestureClassifier::default();
        assert_eq!(classifier.preview(40.0), None);

        let half = classifier.preview(75.0);
        assert_eq!(half.map(|p| p.direction), Some(SwipeDirection::Right));
        let opacity = half.map_or(0.0, |p| p.opacity);
        assert!((opacity - 0.5).abs() < 1e-9);

        let full = classifier.preview(-250.0);
        assert_eq!(full.map(|p| p.direction), Some(SwipeDirection::Left));
        assert!((full.map_or(0.0, |p| p.opacity) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn preview_without_commit_does_not_release() {
        let classifier = SwipeGestureClassifier::default();
        assert!(classifier.preview(80.0).is_some());
        assert_eq!(classifier.release(80.0), None);
        assert_eq!(classifier.release(120.0), Some(SwipeDirection::Right));
    }
}
