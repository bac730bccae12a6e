//! Geometry helpers shared by the layout engines.
//!
//! Everything here is a pure function of its arguments: grid and circular
//! slot placement, linear scaling from data space to canvas space, segment
//! clipping against a data window, and tick stepping.

use std::f32::consts::{FRAC_PI_2, TAU};

use lessonviz_core::{
    color::Color,
    geometry::{Point, Size},
};

/// A coordinate in data space (before scaling onto the canvas).
pub(crate) type Coord = (f64, f64);

/// Returns the center of cell `index` in a row-major grid.
///
/// Cell `i` sits at column `i mod columns` and row `i / columns`, `pitch`
/// apart, starting at `origin`.
pub(crate) fn grid_cell(origin: Point, index: usize, columns: usize, pitch: Size) -> Point {
    let columns = columns.max(1);
    let column = (index % columns) as f32;
    let row = (index / columns) as f32;
    Point::new(
        origin.x() + column * pitch.width(),
        origin.y() + row * pitch.height(),
    )
}

/// Returns the angle of slot `index` out of `count` evenly spaced slots.
///
/// Slot 0 is at 12 o'clock; slots proceed clockwise on screen. Returns `None`
/// when there are no slots.
pub(crate) fn slot_angle(index: usize, count: usize) -> Option<f32> {
    if count == 0 {
        return None;
    }
    Some(index as f32 / count as f32 * TAU - FRAC_PI_2)
}

/// Returns the position of slot `index` out of `count` on a circle.
pub(crate) fn circular_slot(center: Point, radius: f32, index: usize, count: usize) -> Option<Point> {
    slot_angle(index, count).map(|angle| Point::polar(center, radius, angle))
}

/// Maps a data interval linearly onto a canvas interval.
///
/// The canvas interval may run backwards (`range_start > range_end`), which
/// is how y axes flip upwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_start: f32,
    range_end: f32,
}

impl LinearScale {
    pub fn new(domain_min: f64, domain_max: f64, range_start: f32, range_end: f32) -> Self {
        Self {
            domain_min,
            domain_max,
            range_start,
            range_end,
        }
    }

    /// Maps a data value onto the canvas. An empty domain maps everything to
    /// the start of the range.
    pub fn map(&self, value: f64) -> f32 {
        let span = self.domain_max - self.domain_min;
        if span == 0.0 {
            return self.range_start;
        }
        let t = (value - self.domain_min) / span;
        self.range_start + (t as f32) * (self.range_end - self.range_start)
    }

    pub fn domain_min(&self) -> f64 {
        self.domain_min
    }

    pub fn domain_max(&self) -> f64 {
        self.domain_max
    }

    /// Returns whether a data value lies within the domain, inclusive.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.domain_min && value <= self.domain_max
    }
}

/// A rectangular data window used to clip lines and curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Window {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Window {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    pub fn contains(&self, (x, y): Coord) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Clips the segment `from`-`to` to this window (Liang-Barsky).
    ///
    /// Returns `None` when no part of the segment is visible.
    pub fn clip_segment(&self, from: Coord, to: Coord) -> Option<(Coord, Coord)> {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let mut t_enter = 0.0_f64;
        let mut t_exit = 1.0_f64;

        let edges = [
            (-dx, from.0 - self.x_min),
            (dx, self.x_max - from.0),
            (-dy, from.1 - self.y_min),
            (dy, self.y_max - from.1),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t_exit {
                    return None;
                }
                t_enter = t_enter.max(r);
            } else {
                if r < t_enter {
                    return None;
                }
                t_exit = t_exit.min(r);
            }
        }

        let start = if t_enter > 0.0 {
            (from.0 + t_enter * dx, from.1 + t_enter * dy)
        } else {
            from
        };
        let end = if t_exit < 1.0 {
            (from.0 + t_exit * dx, from.1 + t_exit * dy)
        } else {
            to
        };
        Some((start, end))
    }
}

/// Upper bound on the ticks [`tick_values`] produces.
pub(crate) const MAX_TICK_VALUES: usize = 10_000;

/// Returns the multiples of `step` in `[min, max]`, in increasing order.
///
/// Values are computed as `k * step` rather than by accumulation, so long
/// runs do not drift. A non-positive or non-finite step yields no ticks, and
/// so does a range that would hold more than [`MAX_TICK_VALUES`] of them.
pub(crate) fn tick_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !(step.is_finite() && step > 0.0 && min.is_finite() && max.is_finite()) || max < min {
        return Vec::new();
    }
    if tick_count(min, max, step) > MAX_TICK_VALUES {
        return Vec::new();
    }
    let tolerance = 1e-9;
    let first = (min / step - tolerance).ceil() as i64;
    let last = (max / step + tolerance).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Counts the ticks [`tick_values`] would produce, without allocating.
pub(crate) fn tick_count(min: f64, max: f64, step: f64) -> usize {
    if !(step.is_finite() && step > 0.0) || max < min {
        return 0;
    }
    let count = ((max - min) / step).floor() + 1.0;
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        usize::MAX
    }
}

/// Returns the smallest 1-2-5 step that splits `range` into at most
/// `max_ticks` intervals.
pub(crate) fn nice_step(range: f64, max_ticks: usize) -> f64 {
    if !(range.is_finite() && range > 0.0) || max_ticks == 0 {
        return 1.0;
    }
    let raw = range / max_ticks as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|multiplier| multiplier * magnitude)
        .find(|step| *step >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude)
}

/// Returns the three corners of a filled arrow head whose tip is at `tip`,
/// pointing along `angle` (radians, screen convention).
pub(crate) fn arrow_head(tip: Point, angle: f32, length: f32, half_width: f32) -> Vec<Point> {
    let base = Point::polar(tip, -length, angle);
    let normal = angle + FRAC_PI_2;
    vec![
        tip,
        Point::polar(base, half_width, normal),
        Point::polar(base, -half_width, normal),
    ]
}

/// The fixed colors lesson diagrams are drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Swatch {
    Green,
    Yellow,
    Blue,
    Red,
    Orange,
    Gray,
    Pink,
    Purple,
    Emerald,
    TextPrimary,
    TextSecondary,
    TextMuted,
    Border,
    GridLine,
}

impl Swatch {
    /// Segment colors in the order unnamed segments cycle through them.
    pub const SEGMENT_CYCLE: [Swatch; 6] = [
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Orange,
        Self::Pink,
        Self::Purple,
    ];

    /// Looks up a palette color by the name lesson content uses for it.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "green" => Some(Self::Green),
            "yellow" => Some(Self::Yellow),
            "blue" => Some(Self::Blue),
            "red" => Some(Self::Red),
            "orange" => Some(Self::Orange),
            "gray" | "grey" => Some(Self::Gray),
            "pink" => Some(Self::Pink),
            "purple" => Some(Self::Purple),
            _ => None,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Green => Color::rgb8(0x22, 0xc5, 0x5e),
            Self::Yellow => Color::rgb8(0xea, 0xb3, 0x08),
            Self::Blue => Color::rgb8(0x3b, 0x82, 0xf6),
            Self::Red => Color::rgb8(0xef, 0x44, 0x44),
            Self::Orange => Color::rgb8(0xf9, 0x73, 0x16),
            Self::Gray => Color::rgb8(0x9c, 0xa3, 0xaf),
            Self::Pink => Color::rgb8(0xec, 0x48, 0x99),
            Self::Purple => Color::rgb8(0x8b, 0x5c, 0xf6),
            Self::Emerald => Color::rgb8(0x10, 0xb9, 0x81),
            Self::TextPrimary => Color::rgb8(0x1f, 0x29, 0x37),
            Self::TextSecondary => Color::rgb8(0x4b, 0x55, 0x63),
            Self::TextMuted => Color::rgb8(0x6b, 0x72, 0x80),
            Self::Border => Color::rgb8(0xd1, 0xd5, 0xdb),
            Self::GridLine => Color::rgb8(0xe5, 0xe7, 0xeb),
        }
    }
}

/// Resolves an optional color parameter: a palette name, then any CSS
/// color, then `fallback`.
pub(crate) fn resolve_color(value: Option<&str>, fallback: Color) -> Color {
    match value.and_then(Swatch::from_name) {
        Some(swatch) => swatch.color(),
        None => Color::parse_or(value, fallback),
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn coord_strategy() -> impl Strategy<Value = Coord> {
        (-100.0..100.0_f64, -100.0..100.0_f64)
    }

    fn check_clipped_segment_stays_inside(from: Coord, to: Coord) -> Result<(), TestCaseError> {
        let window = Window::new(-10.0, 10.0, -10.0, 10.0);
        if let Some((a, b)) = window.clip_segment(from, to) {
            let eps = 1e-9;
            for (x, y) in [a, b] {
                prop_assert!((-10.0 - eps..=10.0 + eps).contains(&x));
                prop_assert!((-10.0 - eps..=10.0 + eps).contains(&y));
            }
        }
        Ok(())
    }

    fn check_inside_segment_is_unchanged(from: Coord, to: Coord) -> Result<(), TestCaseError> {
        let window = Window::new(-100.0, 100.0, -100.0, 100.0);
        prop_assert_eq!(window.clip_segment(from, to), Some((from, to)));
        Ok(())
    }

    fn check_ticks_are_sorted_multiples(min: f64, span: f64, step: f64) -> Result<(), TestCaseError> {
        let ticks = tick_values(min, min + span, step);
        for pair in ticks.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for tick in &ticks {
            let k = tick / step;
            prop_assert!((k - k.round()).abs() < 1e-6);
            prop_assert!(*tick >= min - 1e-6 && *tick <= min + span + 1e-6);
        }
        Ok(())
    }

    fn check_nice_step_bounds_ticks(range: f64, max_ticks: usize) -> Result<(), TestCaseError> {
        let step = nice_step(range, max_ticks);
        prop_assert!(step > 0.0);
        prop_assert!(range / step <= max_ticks as f64 * (1.0 + 1e-6));
        Ok(())
    }

    proptest! {
        #[test]
        fn clipped_segment_stays_inside(from in coord_strategy(), to in coord_strategy()) {
            check_clipped_segment_stays_inside(from, to)?;
        }

        #[test]
        fn inside_segment_is_unchanged(from in coord_strategy(), to in coord_strategy()) {
            check_inside_segment_is_unchanged(from, to)?;
        }

        #[test]
        fn ticks_are_sorted_multiples(min in -50.0..50.0_f64, span in 0.0..100.0_f64, step in 0.1..10.0_f64) {
            check_ticks_are_sorted_multiples(min, span, step)?;
        }

        #[test]
        fn nice_step_bounds_ticks(range in 0.001..1e6_f64, max_ticks in 1usize..100) {
            check_nice_step_bounds_ticks(range, max_ticks)?;
        }
    }
}
