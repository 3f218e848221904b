//! Top-K hotspot selection
//!
//! Points are ordered by trip count, busiest first. The sort is stable, so points with equal
//! counts keep their input order. Input order is the backend's aggregation order and fixes
//! the rank-to-colour mapping between runs.

use crate::{AnalyticsError, ColorToken, Result, TripAggregatePoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of hotspots kept when the caller does not say otherwise
pub const DEFAULT_HOTSPOT_LIMIT: i64 = 10;

/// A point selected into the top-K ranking
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RankedHotspot {
    pub point: TripAggregatePoint,
    /// 1-based position in the ranking
    pub rank: usize,
    pub color: ColorToken,
}

/// Rank points by trip count and keep the first `limit`
///
/// Hotspots come back with [`ColorToken::NEUTRAL`]; the planner recolours them for the
/// active mode. `limit = 0` is valid and yields nothing.
///
/// # Errors
/// [`AnalyticsError::InvalidArgument`] if `limit` is negative.
pub fn rank_hotspots(points: &[TripAggregatePoint], limit: i64) -> Result<Vec<RankedHotspot>> {
    let limit = checked_limit(limit)?;

    let mut order: Vec<&TripAggregatePoint> = points.iter().collect();
    // `sort_by` is stable: equal counts stay in input order
    order.sort_by(|a, b| b.trip_count.cmp(&a.trip_count));

    Ok(order
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, point)| RankedHotspot {
            point: *point,
            rank: i + 1,
            color: ColorToken::NEUTRAL,
        })
        .collect())
}

pub(crate) fn checked_limit(limit: i64) -> Result<usize> {
    usize::try_from(limit).map_err(|_| {
        AnalyticsError::InvalidArgument(format!("hotspot limit must be >= 0, got {limit}"))
    })
}
