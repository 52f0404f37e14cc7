//! Pointer and keyboard input to a bounded, quantized value.
//!
//! [`ValueMapper`] owns the current value of a slider-like control. Pointer
//! input arrives through a drag session (`begin_drag` / `update_drag` /
//! `end_drag`), keyboard input through [`step`](ValueMapper::step),
//! [`page`](ValueMapper::page) and [`jump`](ValueMapper::jump). Every value
//! the mapper hands out lies inside its [`Range`].

use crate::error::ConfigurationError;
use crate::Direction;

/// Scale used to pre-round intermediate results so binary floating point
/// drift (`0.1 * 3 == 0.30000000000000004`) cannot push a value across a
/// rounding boundary.
const PRECISION: f64 = 1e10;

fn round_fixed(x: f64) -> f64 {
    (x * PRECISION).round() / PRECISION
}

/// The legal value domain of a [`ValueMapper`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
    step: f64,
}

impl Range {
    /// Create a range, validating `min < max` and `step > 0`.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, ConfigurationError> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(ConfigurationError::NonFinite);
        }
        if min >= max {
            return Err(ConfigurationError::MinNotBelowMax { min, max });
        }
        if step <= 0.0 {
            return Err(ConfigurationError::NonPositiveStep(step));
        }
        Ok(Self { min, max, step })
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Quantization step.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Distance between the bounds.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp `value` into `[min, max]`. NaN clamps to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Snap `value` to the nearest step measured from `min`, rounding halves
    /// away from zero, and clamp the result into the range.
    ///
    /// Quantization is idempotent: `quantize(quantize(v)) == quantize(v)`.
    pub fn quantize(&self, value: f64) -> f64 {
        let clamped = self.clamp(value);
        let steps = round_fixed((clamped - self.min) / self.step).round();
        self.clamp(round_fixed(steps * self.step + self.min))
    }
}

/// Axis a track runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// The track origin represents `min`.
    #[default]
    Horizontal,
    /// The track origin represents `max`, matching a bottom-anchored fill
    /// on a track whose coordinates grow downwards.
    Vertical,
}

/// Which end of the range a [`ValueMapper::jump`] goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// `min` (Home).
    Start,
    /// `max` (End).
    End,
}

/// Identifies one pointer (mouse, pen, or a single touch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

/// Measured position and extent of a track along its axis, supplied by the
/// rendering layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub origin: f64,
    pub length: f64,
}

impl TrackGeometry {
    pub fn new(origin: f64, length: f64) -> Self {
        Self { origin, length }
    }
}

/// Ephemeral state held while a pointer is down on the track.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    pointer_id: PointerId,
    geometry: TrackGeometry,
}

/// Converts pointer positions and key presses into a value inside a
/// [`Range`].
///
/// # Example
///
/// ```
/// use trellis_core::value::{Range, ValueMapper, Orientation, PointerId, TrackGeometry};
///
/// let range = Range::new(0.0, 100.0, 10.0).unwrap();
/// let mut mapper = ValueMapper::new(range, Orientation::Horizontal);
///
/// mapper.begin_drag(PointerId(1), TrackGeometry::new(0.0, 100.0));
/// mapper.update_drag(PointerId(1), 47.0);
/// assert_eq!(mapper.value(), 50.0);
/// mapper.end_drag(PointerId(1));
/// assert!(!mapper.is_dragging());
/// ```
#[derive(Debug, Clone)]
pub struct ValueMapper {
    range: Range,
    orientation: Orientation,
    value: f64,
    page_steps: u32,
    session: Option<DragSession>,
}

impl ValueMapper {
    /// Create a mapper starting at `min`.
    pub fn new(range: Range, orientation: Orientation) -> Self {
        Self {
            range,
            orientation,
            value: range.min(),
            page_steps: 10,
            session: None,
        }
    }

    /// Validate the range and create a mapper in one go.
    pub fn try_new(
        min: f64,
        max: f64,
        step: f64,
        orientation: Orientation,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::new(Range::new(min, max, step)?, orientation))
    }

    /// Set the initial value. Out-of-range values are clamped and quantized.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = self.range.quantize(value);
        self
    }

    /// Change the track axis.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set how many steps PageUp / PageDown move. Zero is treated as one.
    pub fn with_page_steps(mut self, steps: u32) -> Self {
        self.page_steps = steps.max(1);
        self
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Fraction of the range covered by the current value, in `0.0..=1.0`.
    pub fn percent(&self) -> f64 {
        ((self.value - self.range.min()) / self.range.span()).clamp(0.0, 1.0)
    }

    /// Whether a drag session is active.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Overwrite the value from outside. Silently clamped and quantized.
    pub fn set_value(&mut self, value: f64) {
        self.value = self.range.quantize(value);
    }

    /// Snap `value` to the range grid. See [`Range::quantize`].
    pub fn quantize(&self, value: f64) -> f64 {
        self.range.quantize(value)
    }

    /// Map a pointer coordinate on a track to a quantized value.
    ///
    /// Coordinates outside the track clamp to its ends. A degenerate track
    /// (zero, negative or non-finite length) or a non-finite coordinate maps
    /// to `min`.
    pub fn map_position(&self, track_origin: f64, track_length: f64, coordinate: f64) -> f64 {
        if !(track_length.is_finite() && track_length > 0.0)
            || !track_origin.is_finite()
            || !coordinate.is_finite()
        {
            return self.range.min();
        }
        let mut percent = ((coordinate - track_origin) / track_length).clamp(0.0, 1.0);
        if self.orientation == Orientation::Vertical {
            percent = 1.0 - percent;
        }
        let raw = self.range.min() + percent * self.range.span();
        self.range.quantize(raw)
    }

    /// `current` moved one step in `direction`, clamped to the range.
    pub fn step_by(&self, current: f64, direction: Direction) -> f64 {
        self.offset_by(current, direction, self.range.step())
    }

    /// `current` moved one page in `direction`, clamped to the range.
    pub fn page_by(&self, current: f64, direction: Direction) -> f64 {
        self.offset_by(current, direction, self.range.step() * f64::from(self.page_steps))
    }

    fn offset_by(&self, current: f64, direction: Direction, amount: f64) -> f64 {
        let next = round_fixed(current + direction.sign() as f64 * amount);
        self.range.clamp(next)
    }

    /// Step the current value. Returns the new value if it changed.
    pub fn step(&mut self, direction: Direction) -> Option<f64> {
        let next = self.step_by(self.value, direction);
        self.replace(next)
    }

    /// Page the current value. Returns the new value if it changed.
    pub fn page(&mut self, direction: Direction) -> Option<f64> {
        let next = self.page_by(self.value, direction);
        self.replace(next)
    }

    /// Move to one end of the range. Returns the new value if it changed.
    pub fn jump(&mut self, edge: Edge) -> Option<f64> {
        let next = match edge {
            Edge::Start => self.range.min(),
            Edge::End => self.range.max(),
        };
        self.replace(next)
    }

    /// Start a drag session for `pointer_id`.
    ///
    /// Only one pointer drives the value: while a session is active, a
    /// second pointer is ignored and `false` is returned. Calling again with
    /// the active pointer refreshes the track geometry.
    pub fn begin_drag(&mut self, pointer_id: PointerId, geometry: TrackGeometry) -> bool {
        match self.session {
            Some(session) if session.pointer_id != pointer_id => {
                log::trace!(
                    "ignoring drag from {pointer_id:?}, {:?} is active",
                    session.pointer_id
                );
                false
            }
            _ => {
                log::debug!("drag session started for {pointer_id:?}");
                self.session = Some(DragSession {
                    pointer_id,
                    geometry,
                });
                true
            }
        }
    }

    /// Feed a pointer coordinate into the active session.
    ///
    /// No-op unless `pointer_id` owns the session. Returns the new value if
    /// it changed.
    pub fn update_drag(&mut self, pointer_id: PointerId, coordinate: f64) -> Option<f64> {
        let session = self.session.filter(|s| s.pointer_id == pointer_id)?;
        let next = self.map_position(session.geometry.origin, session.geometry.length, coordinate);
        self.replace(next)
    }

    /// End the session owned by `pointer_id`. No-op for any other pointer or
    /// when no session is active.
    pub fn end_drag(&mut self, pointer_id: PointerId) {
        if self.session.is_some_and(|s| s.pointer_id == pointer_id) {
            log::debug!("drag session ended for {pointer_id:?}");
            self.session = None;
        }
    }

    /// Pointer-cancel. Performs the same cleanup as [`end_drag`](Self::end_drag).
    pub fn cancel_drag(&mut self, pointer_id: PointerId) {
        self.end_drag(pointer_id);
    }

    fn replace(&mut self, next: f64) -> Option<f64> {
        if (next - self.value).abs() > f64::EPSILON {
            self.value = next;
            Some(next)
        } else {
            None
        }
    }
}
