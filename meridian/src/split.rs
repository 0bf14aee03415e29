//! Splitting of double precision projected coordinates into pairs of single precision values.
//!
//! GPUs work with `f32` coordinates, which have only 24 bits of mantissa. At the scale of the whole Earth in
//! projected meters that gives precision of a few meters, which is not enough to draw detailed data. The
//! [`XSplitter`] represents each coordinate as a sum of two `f32` values (`high + low`), both of which are exactly
//! representable in single precision, and whose sum is within 1 mm (of real-world distance) of the original value.
//! Shaders subtract the camera position from the `high` and `low` parts separately, which keeps the result precise.

use ahash::AHashMap;
use meridian_types::cartesian::{CartesianPoint2d, Point2};
use meridian_types::geo::Datum;
use serde::{Deserialize, Serialize};

/// Number of explicitly stored mantissa bits of an `f32`.
const F32_MANTISSA_BITS: i32 = 23;

/// Projected point with both coordinates split into `[high, low]` pairs.
#[repr(C)]
#[derive(
    Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
pub struct SplitPoint {
    /// `[high, low]` parts of the X coordinate.
    pub x: [f32; 2],
    /// `[high, low]` parts of the Y coordinate.
    pub y: [f32; 2],
}

impl SplitPoint {
    /// Restores the double precision point from the split parts.
    pub fn to_point(&self) -> Point2 {
        Point2::new(
            self.x[0] as f64 + self.x[1] as f64,
            self.y[0] as f64 + self.y[1] as f64,
        )
    }
}

/// Splits projected coordinates into `(high, low)` pairs of single precision values.
///
/// The splitter is configured for a projection by its world-wrap span (the length of the equator in projected
/// units). The number of fractional bits is chosen so that the finest representable step is not larger than 1 mm
/// of real-world distance, and the remaining bits of the two `f32` mantissas are used for the whole part.
///
/// Values with magnitude of [`XSplitter::max_splittable`] or more (and non-finite values) cannot be represented
/// this way. For them the splitter returns `(x as f32, 0.0)`, so precision degrades but nothing fails.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct XSplitter {
    x_span: f64,
    frac_bits: i32,
    high_unit: f64,
    quantum: f64,
    max_abs: f64,
}

impl XSplitter {
    /// Creates a splitter for a projection with the given world-wrap span, assuming the Earth mean circumference.
    pub fn new(x_wrap_span: f64) -> Self {
        Self::with_circumference(x_wrap_span, Datum::WGS84.mean_circumference())
    }

    /// Creates a splitter for a projection with the given world-wrap span, with the real-world length of the
    /// span being `circumference_m` meters.
    pub fn with_circumference(x_wrap_span: f64, circumference_m: f64) -> Self {
        let units_per_mm = x_wrap_span / (circumference_m * 1000.0);
        let frac_bits = if units_per_mm.is_finite() && units_per_mm > 0.0 {
            (-units_per_mm.log2()).ceil() as i32
        } else {
            log::warn!(
                "Invalid splitter parameters: span {x_wrap_span}, circumference {circumference_m}"
            );
            0
        };

        Self {
            x_span: x_wrap_span,
            frac_bits,
            high_unit: 2f64.powi(F32_MANTISSA_BITS - frac_bits),
            quantum: 2f64.powi(-frac_bits),
            max_abs: 2f64.powi(2 * F32_MANTISSA_BITS - frac_bits),
        }
    }

    /// World-wrap span the splitter was created for.
    pub fn x_span(&self) -> f64 {
        self.x_span
    }

    /// Number of binary digits after the point that the `low` part preserves.
    pub fn frac_bits(&self) -> i32 {
        self.frac_bits
    }

    /// Smallest step representable by the split pair.
    pub fn quantum(&self) -> f64 {
        self.quantum
    }

    /// Values with this magnitude or larger are not split.
    pub fn max_splittable(&self) -> f64 {
        self.max_abs
    }

    /// Splits the value into `(high, low)`.
    pub fn split(&self, x: f64) -> (f32, f32) {
        match self.split_exact(x) {
            Some((high, low)) => (high as f32, low as f32),
            None => (x as f32, 0.0),
        }
    }

    /// Splits both coordinates of the point.
    pub fn split_point(&self, point: &impl CartesianPoint2d<Num = f64>) -> SplitPoint {
        let (x_high, x_low) = self.split(point.x());
        let (y_high, y_low) = self.split(point.y());
        SplitPoint {
            x: [x_high, x_low],
            y: [y_high, y_low],
        }
    }

    /// Split world offsets (`k * x_span`) for all copies of the world visible in the `[min_x, max_x]` range.
    ///
    /// The renderer draws every copy of the data with one of these offsets added, which gives seamless horizontal
    /// wrapping of the map.
    pub fn world_offsets(&self, min_x: f64, max_x: f64) -> Vec<[f32; 2]> {
        if !(min_x.is_finite() && max_x.is_finite() && self.x_span > 0.0) || min_x > max_x {
            return vec![];
        }

        let first = (min_x / self.x_span - 0.5).floor() as i64;
        let last = (max_x / self.x_span + 0.5).ceil() as i64;
        (first..=last)
            .map(|k| {
                let (high, low) = self.split(k as f64 * self.x_span);
                [high, low]
            })
            .collect()
    }

    fn split_exact(&self, x: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || x.abs() >= self.max_abs {
            return None;
        }

        let high = (x / self.high_unit).round() * self.high_unit;
        let low = ((x - high) / self.quantum).round() * self.quantum;
        Some((high, low))
    }
}

/// Memoized splitters keyed by world-wrap span.
#[derive(Debug, Default)]
pub struct SplitterCache {
    splitters: AHashMap<u64, XSplitter>,
}

impl SplitterCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the splitter for the span, creating it if needed.
    pub fn get(&mut self, x_wrap_span: f64) -> XSplitter {
        *self
            .splitters
            .entry(x_wrap_span.to_bits())
            .or_insert_with(|| XSplitter::new(x_wrap_span))
    }

    /// Number of cached splitters.
    pub fn len(&self) -> usize {
        self.splitters.len()
    }

    /// Returns true if no splitters were created yet.
    pub fn is_empty(&self) -> bool {
        self.splitters.is_empty()
    }
}

/// Returns the value congruent to `value` modulo `wrap_span` that is closest to `reference`.
///
/// The result is within `wrap_span / 2` of `reference`. If `wrap_span` is not a positive finite number, the value
/// is returned unchanged.
pub fn wrap_near(value: f64, reference: f64, wrap_span: f64) -> f64 {
    if !(wrap_span.is_finite() && wrap_span > 0.0) || !value.is_finite() || !reference.is_finite() {
        return value;
    }

    let turns = ((value - reference) / wrap_span).round();
    value - turns * wrap_span
}
