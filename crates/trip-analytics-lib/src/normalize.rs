//! Intensity normalization
//!
//! Maps a point's raw metric to a heatmap weight in `[0, 1]`. Each mode divides its metric by
//! a fixed divisor and clamps the result.

use crate::{AnalyticsError, Result, TripAggregatePoint, VisualizationMode};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weight returned for a mode the normalizer does not recognise
pub const UNKNOWN_MODE_WEIGHT: f64 = 0.5;

/// Divisors that pin each mode's metric to full intensity
///
/// The defaults define the meaning of each mode: 100 trips, 30 minutes, 10 km.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ScaleConfig {
    /// Trip count mapped to weight 1.0 in `Intensity` mode
    pub intensity_divisor: f64,
    /// Average duration (seconds) mapped to weight 1.0 in `Duration` mode
    pub duration_divisor: f64,
    /// Average distance (km) mapped to weight 1.0 in `Distance` mode
    pub distance_divisor: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            intensity_divisor: 100.0,
            duration_divisor: 1800.0,
            distance_divisor: 10.0,
        }
    }
}

impl ScaleConfig {
    /// Every divisor must be finite and strictly positive
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("intensityDivisor", self.intensity_divisor),
            ("durationDivisor", self.duration_divisor),
            ("distanceDivisor", self.distance_divisor),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnalyticsError::InvalidArgument(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Divisor for the given mode, `None` for `Unknown`
    #[inline]
    pub fn divisor(&self, mode: VisualizationMode) -> Option<f64> {
        match mode {
            VisualizationMode::Intensity => Some(self.intensity_divisor),
            VisualizationMode::Duration => Some(self.duration_divisor),
            VisualizationMode::Distance => Some(self.distance_divisor),
            VisualizationMode::Unknown => None,
        }
    }
}

/// Heatmap weight of a point in `[0, 1]`
///
/// Negative or NaN metrics yield `0.0`. `Unknown` mode yields [`UNKNOWN_MODE_WEIGHT`].
#[inline]
pub fn normalize(
    point: &TripAggregatePoint,
    mode: VisualizationMode,
    scale: &ScaleConfig,
) -> f64 {
    match (mode.raw_metric(point), scale.divisor(mode)) {
        (Some(value), Some(divisor)) => {
            let weight = value / divisor;
            if weight.is_nan() {
                0.0
            } else {
                weight.clamp(0.0, 1.0)
            }
        }
        // Unrecognised modes are tolerated with a fixed mid-range weight
        _ => UNKNOWN_MODE_WEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoPoint;

    fn point(trips: u32, duration: f64, distance: f64) -> TripAggregatePoint {
        TripAggregatePoint::new(GeoPoint::new(40.75, -73.98), trips, duration, distance)
    }

    #[test]
    fn test_intensity_divides_by_100() {
        let scale = ScaleConfig::default();
        let intensity = |trips| {
            normalize(&point(trips, 0.0, 0.0), VisualizationMode::Intensity, &scale)
        };
        assert!((intensity(40) - 0.4).abs() < 1e-12);
        assert_eq!(intensity(0), 0.0);
        assert_eq!(intensity(100), 1.0);
    }

    #[test]
    fn test_duration_divides_by_1800() {
        let scale = ScaleConfig::default();
        let w = normalize(&point(1, 900.0, 0.0), VisualizationMode::Duration, &scale);
        assert!((w - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_distance_divides_by_10() {
        let scale = ScaleConfig::default();
        let w = normalize(&point(1, 0.0, 2.5), VisualizationMode::Distance, &scale);
        assert!((w - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_clamped_to_one() {
        let scale = ScaleConfig::default();
        let cases = [
            (point(5000, 0.0, 0.0), VisualizationMode::Intensity),
            (point(0, 86_400.0, 0.0), VisualizationMode::Duration),
            (point(0, 0.0, 120.0), VisualizationMode::Distance),
        ];
        for (p, mode) in &cases {
            assert_eq!(normalize(p, *mode, &scale), 1.0, "{mode}");
        }
    }

    #[test]
    fn test_always_within_unit_interval() {
        let scale = ScaleConfig::default();
        let samples = [0.0, 0.001, 1.0, 9.99, 10.0, 899.0, 1800.0, 1e9, f64::MAX];
        for &v in &samples {
            let p = point(v.min(u32::MAX as f64) as u32, v, v);
            for &mode in VisualizationMode::all() {
                let w = normalize(&p, mode, &scale);
                assert!((0.0..=1.0).contains(&w), "{mode} produced {w} for {v}");
            }
        }
    }

    #[test]
    fn test_unknown_mode_falls_back_to_half() {
        let scale = ScaleConfig::default();
        let w = normalize(&point(80, 100.0, 1.0), VisualizationMode::Unknown, &scale);
        assert_eq!(w, UNKNOWN_MODE_WEIGHT);
    }

    #[test]
    fn test_nan_and_negative_metrics_map_to_zero() {
        let scale = ScaleConfig::default();
        let nan = normalize(&point(0, f64::NAN, 0.0), VisualizationMode::Duration, &scale);
        let negative = normalize(&point(0, 0.0, -3.0), VisualizationMode::Distance, &scale);
        assert_eq!(nan, 0.0);
        assert_eq!(negative, 0.0);
    }

    #[test]
    fn test_scale_validation() {
        assert!(ScaleConfig::default().validate().is_ok());

        let zero = ScaleConfig {
            duration_divisor: 0.0,
            ..ScaleConfig::default()
        };
        assert!(matches!(zero.validate(), Err(AnalyticsError::InvalidArgument(_))));

        let inf = ScaleConfig {
            distance_divisor: f64::INFINITY,
            ..ScaleConfig::default()
        };
        assert!(inf.validate().is_err());
    }
}
