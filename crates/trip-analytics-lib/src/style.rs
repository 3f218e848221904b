//! Deterministic visual encodings for routes and hotspot markers

use crate::{AnalyticsError, TripAggregatePoint, VisualizationMode};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An opaque sRGB colour, rendered as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub struct ColorToken {
    r: u8,
    g: u8,
    b: u8,
}

impl ColorToken {
    /// High-value marker
    pub const ALERT: ColorToken = ColorToken::from_rgb(0xdc, 0x35, 0x45);
    /// Busy-but-not-extreme marker in `Intensity` mode
    pub const WARN: ColorToken = ColorToken::from_rgb(0xff, 0xc1, 0x07);
    /// Below-threshold marker in `Duration` mode
    pub const OK: ColorToken = ColorToken::from_rgb(0x28, 0xa7, 0x45);
    /// Below-threshold marker in `Distance` mode
    pub const INFO: ColorToken = ColorToken::from_rgb(0x17, 0xa2, 0xb8);
    /// Marker colour when the mode is not recognised
    pub const NEUTRAL: ColorToken = ColorToken::from_rgb(0x6c, 0x75, 0x7d);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Raw channels for renderers that do not take CSS colours
    #[inline]
    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for ColorToken {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| AnalyticsError::InvalidArgument(format!("not a #rrggbb colour: {s}")))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| AnalyticsError::InvalidArgument(format!("not a #rrggbb colour: {s}")))
        };
        Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for ColorToken {
    type Error = AnalyticsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ColorToken> for String {
    fn from(color: ColorToken) -> Self {
        color.to_hex()
    }
}

/// Categorical palette cycled by route index
pub const ROUTE_PALETTE: [ColorToken; 10] = [
    ColorToken::from_rgb(0x1f, 0x77, 0xb4),
    ColorToken::from_rgb(0xff, 0x7f, 0x0e),
    ColorToken::from_rgb(0x2c, 0xa0, 0x2c),
    ColorToken::from_rgb(0xd6, 0x27, 0x28),
    ColorToken::from_rgb(0x94, 0x67, 0xbd),
    ColorToken::from_rgb(0x8c, 0x56, 0x4b),
    ColorToken::from_rgb(0xe3, 0x77, 0xc2),
    ColorToken::from_rgb(0x7f, 0x7f, 0x7f),
    ColorToken::from_rgb(0xbc, 0xbd, 0x22),
    ColorToken::from_rgb(0x17, 0xbe, 0xcf),
];

/// Heatmap colour ramp as (stop position, colour), positions ascending in `[0, 1]`
pub const HEATMAP_GRADIENT: [(f64, ColorToken); 5] = [
    (0.4, ColorToken::from_rgb(0x00, 0x00, 0xff)),
    (0.6, ColorToken::from_rgb(0x00, 0xff, 0xff)),
    (0.7, ColorToken::from_rgb(0x00, 0xff, 0x00)),
    (0.8, ColorToken::from_rgb(0xff, 0xff, 0x00)),
    (1.0, ColorToken::from_rgb(0xff, 0x00, 0x00)),
];

/// Route colour for an ingestion index
#[inline]
pub fn color_for(index: usize) -> ColorToken {
    ROUTE_PALETTE[index % ROUTE_PALETTE.len()]
}

/// Stroke weight in pixels for a route carrying `trip_count` trips
#[inline]
pub fn weight_for(trip_count: u32) -> u32 {
    match trip_count {
        101.. => 6,
        51..=100 => 4,
        21..=50 => 3,
        _ => 2,
    }
}

/// Marker colour for a hotspot under the given mode
pub fn marker_color_for(mode: VisualizationMode, point: &TripAggregatePoint) -> ColorToken {
    match mode {
        VisualizationMode::Intensity if point.trip_count > 50 => ColorToken::ALERT,
        VisualizationMode::Intensity => ColorToken::WARN,
        VisualizationMode::Duration if point.avg_duration_seconds > 900.0 => ColorToken::ALERT,
        VisualizationMode::Duration => ColorToken::OK,
        VisualizationMode::Distance if point.avg_distance_km > 5.0 => ColorToken::ALERT,
        VisualizationMode::Distance => ColorToken::INFO,
        VisualizationMode::Unknown => ColorToken::NEUTRAL,
    }
}
