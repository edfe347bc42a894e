// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiny scale utilities.
//!
//! Bars need two scales per pass: a band scale placing index values along the index axis, and
//! a continuous scale mapping values along the value axis. Specs carry options only; the
//! compute pass instantiates them once it knows the domain and the pixel range.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::datum::DatumValue;
use crate::error::ConfigurationError;

/// Which pixel axis a scale is laid out along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal, range grows left to right.
    X,
    /// Vertical, range grows bottom to top.
    Y,
}

/// Whether a bound was derived from data or fixed by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueBound {
    /// Derived from the data.
    #[default]
    Auto,
    /// Fixed value in data units.
    Fixed(f64),
}

/// A value scale specification (options only, no domain or range yet).
#[derive(Clone, Copy, Debug)]
pub enum ValueScaleSpec {
    /// Continuous linear scale.
    Linear(ScaleLinearSpec),
    /// Continuous log scale.
    Log(ScaleLogSpec),
}

impl Default for ValueScaleSpec {
    fn default() -> Self {
        Self::Linear(ScaleLinearSpec::new())
    }
}

impl From<ScaleLinearSpec> for ValueScaleSpec {
    fn from(value: ScaleLinearSpec) -> Self {
        Self::Linear(value)
    }
}

impl From<ScaleLogSpec> for ValueScaleSpec {
    fn from(value: ScaleLogSpec) -> Self {
        Self::Log(value)
    }
}

impl ValueScaleSpec {
    /// Resolves the `(min, max)` domain from bounds and contributing values.
    ///
    /// Linear scales always include `0` in an automatic bound so bars keep their baseline in
    /// view. Log scales only consider strictly positive values.
    pub fn resolve_domain(
        &self,
        min: ValueBound,
        max: ValueBound,
        values: impl IntoIterator<Item = f64>,
    ) -> Result<(f64, f64), ConfigurationError> {
        let is_log = matches!(self, Self::Log(_));
        let (mut lo, mut hi) = if is_log {
            (f64::INFINITY, f64::NEG_INFINITY)
        } else {
            (0.0_f64, 0.0_f64)
        };
        for v in values {
            if !v.is_finite() || (is_log && v <= 0.0) {
                continue;
            }
            lo = lo.min(v);
            hi = hi.max(v);
        }

        let lo = match min {
            ValueBound::Fixed(v) => v,
            ValueBound::Auto => lo,
        };
        let hi = match max {
            ValueBound::Fixed(v) => v,
            ValueBound::Auto => hi,
        };

        if is_log && !(lo.is_finite() && hi.is_finite() && lo > 0.0 && hi > 0.0) {
            return Err(ConfigurationError::NonPositiveLogDomain { min: lo, max: hi });
        }
        let any_fixed = matches!(min, ValueBound::Fixed(_)) || matches!(max, ValueBound::Fixed(_));
        if !lo.is_finite() || !hi.is_finite() || lo > hi || (lo == hi && any_fixed) {
            return Err(ConfigurationError::DegenerateValueDomain { min: lo, max: hi });
        }
        Ok((lo, hi))
    }

    /// Instantiates a concrete scale for a resolved domain.
    ///
    /// `size` is the pixel length of the value axis. The natural direction runs up along
    /// [`Axis::Y`] and right along [`Axis::X`]; `reverse` flips it.
    pub fn instantiate(
        &self,
        domain: (f64, f64),
        size: f64,
        axis: Axis,
        reverse: bool,
    ) -> ScaleContinuous {
        let mut range = match axis {
            Axis::X => (0.0, size),
            Axis::Y => (size, 0.0),
        };
        if reverse {
            range = (range.1, range.0);
        }
        match self {
            Self::Linear(spec) => ScaleContinuous::Linear(spec.instantiate(domain, range)),
            Self::Log(spec) => ScaleContinuous::Log(spec.instantiate(domain, range)),
        }
    }
}

/// A continuous scale instance.
#[derive(Clone, Copy, Debug)]
pub enum ScaleContinuous {
    /// Linear scale.
    Linear(ScaleLinear),
    /// Log scale.
    Log(ScaleLog),
}

impl ScaleContinuous {
    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        match self {
            Self::Linear(s) => s.map(x),
            Self::Log(s) => s.map(x),
        }
    }

    /// Pixel position bars grow from.
    ///
    /// This is `map(0)` for linear scales and the start of the range for log scales, which
    /// cannot represent zero.
    pub fn baseline(&self) -> f64 {
        match self {
            Self::Linear(s) => s.map(0.0),
            Self::Log(s) => s.range.0,
        }
    }

    /// Maps a value, sending values a log scale cannot represent to the baseline.
    pub fn position(&self, x: f64) -> f64 {
        match self {
            Self::Log(_) if x <= 0.0 => self.baseline(),
            _ => self.map(x),
        }
    }

    /// Returns the minimum of the instantiated domain.
    pub fn domain_min(&self) -> f64 {
        match self {
            Self::Linear(s) => s.domain.0,
            Self::Log(s) => s.domain.0,
        }
    }

    /// Returns the maximum of the instantiated domain.
    pub fn domain_max(&self) -> f64 {
        match self {
            Self::Linear(s) => s.domain.1,
            Self::Log(s) => s.domain.1,
        }
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
    round: bool,
    clamp: bool,
}

/// Specification for a linear scale.
#[derive(Clone, Copy, Debug)]
pub struct ScaleLinearSpec {
    /// Whether to extend the domain to "nice" round values.
    pub nice: bool,
    /// Whether mapped values are rounded to whole pixels.
    pub round: bool,
    /// Whether values outside the domain are clamped to the range.
    pub clamp: bool,
}

impl Default for ScaleLinearSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            round: false,
            clamp: false,
        }
    }

    /// Rounds mapped values to whole pixels.
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Clamps mapped values to the range.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Maps a value from domain space into range space.
    ///
    /// A collapsed domain maps everything to the middle of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        let mut t = if denom == 0.0 { 0.5 } else { (x - d0) / denom };
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        let v = r0 + t * (r1 - r0);
        if self.round { v.round() } else { v }
    }

    /// Returns the instantiated domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

impl ScaleLinearSpec {
    /// Creates a linear spec with `nice` and `round` enabled.
    pub fn new() -> Self {
        Self {
            nice: true,
            round: true,
            clamp: false,
        }
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Enables or disables pixel rounding.
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Enables or disables clamping.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Instantiates a concrete scale, applying `nice` to the domain.
    pub fn instantiate(&self, domain: (f64, f64), range: (f64, f64)) -> ScaleLinear {
        let domain = if self.nice {
            nice_domain(domain, 10)
        } else {
            domain
        };
        ScaleLinear::new(domain, range)
            .with_round(self.round)
            .with_clamp(self.clamp)
    }
}

/// Extends a domain so both ends fall on a tick step.
fn nice_domain(domain: (f64, f64), count: usize) -> (f64, f64) {
    let (mut start, mut stop) = domain;
    let reversed = stop < start;
    if reversed {
        core::mem::swap(&mut start, &mut stop);
    }
    let mut prestep = None;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if prestep == Some(step) {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        prestep = Some(step);
    }
    if reversed { (stop, start) } else { (start, stop) }
}

/// Tick step for `count` ticks over `[start, stop]`.
///
/// Negative results encode `1 / |step|` for sub-unit steps, which keeps the domain math exact.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    const E10: f64 = 7.071_067_811_865_476;
    const E5: f64 = 3.162_277_660_168_379_5;
    const E2: f64 = core::f64::consts::SQRT_2;

    let step = (stop - start) / count.max(1) as f64;
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power < 0.0 {
        -10_f64.powf(-power) / factor
    } else {
        factor * 10_f64.powf(power)
    }
}

/// A discrete band scale for index values.
///
/// Follows the usual band-scale layout: `n` bands with `padding_inner` (fraction of a step)
/// between bands, `padding_outer` (in steps) at both ends, and the leftover space split by
/// `align`.
#[derive(Clone, Debug)]
pub struct ScaleBand {
    domain: Vec<DatumValue>,
    lookup: HashMap<DatumValue, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
    start: f64,
    step: f64,
    bandwidth: f64,
}

/// Specification for a band scale.
#[derive(Clone, Copy, Debug)]
pub struct ScaleBandSpec {
    /// Whether band positions and widths snap to whole pixels.
    pub round: bool,
}

impl Default for ScaleBandSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaleBand {
    /// Creates a band scale with no padding over `range`.
    ///
    /// Duplicate domain values keep their first position.
    pub fn new(domain: Vec<DatumValue>, range: (f64, f64)) -> Self {
        let mut lookup = HashMap::with_capacity(domain.len());
        for (i, v) in domain.iter().enumerate() {
            lookup.entry(v.clone()).or_insert(i);
        }
        let mut scale = Self {
            domain,
            lookup,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            round: false,
            start: 0.0,
            step: 0.0,
            bandwidth: 0.0,
        };
        scale.rescale();
        scale
    }

    /// Sets inner and outer padding to the same value.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.padding_outer = padding.max(0.0);
        self.rescale();
        self
    }

    /// Snaps positions and band width to whole pixels.
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self.rescale();
        self
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let (start, stop) = if r1 < r0 { (r1, r0) } else { (r0, r1) };
        let mut step =
            (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        if self.round {
            step = step.floor();
        }
        let mut first = start + (stop - start - step * (n - self.padding_inner)) * self.align;
        let mut bandwidth = step * (1.0 - self.padding_inner);
        if self.round {
            first = first.round();
            bandwidth = bandwidth.round();
        }
        self.start = first;
        self.step = step;
        self.bandwidth = bandwidth;
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        self.bandwidth
    }

    /// Returns the distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.domain.len()
    }

    /// Returns the domain in band order.
    pub fn domain(&self) -> &[DatumValue] {
        &self.domain
    }

    /// Returns the band start for the band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        if r1 < r0 {
            let last = self.count().saturating_sub(1);
            self.start + self.step * last.saturating_sub(index) as f64
        } else {
            self.start + self.step * index as f64
        }
    }

    /// Returns the band start for a domain value.
    pub fn map(&self, value: &DatumValue) -> Option<f64> {
        self.lookup.get(value).map(|&i| self.x(i))
    }
}

impl ScaleBandSpec {
    /// Creates a band spec with rounding enabled.
    pub fn new() -> Self {
        Self { round: true }
    }

    /// Enables or disables rounding.
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Instantiates a concrete scale over `size` pixels along `axis`.
    ///
    /// On [`Axis::Y`] the first band sits at the bottom.
    pub fn instantiate(
        &self,
        domain: Vec<DatumValue>,
        size: f64,
        padding: f64,
        axis: Axis,
    ) -> ScaleBand {
        let range = match axis {
            Axis::X => (0.0, size),
            Axis::Y => (size, 0.0),
        };
        ScaleBand::new(domain, range)
            .with_padding(padding)
            .with_round(self.round)
    }
}

/// A log-scale mapping from a positive domain to a range.
#[derive(Clone, Copy, Debug)]
pub struct ScaleLog {
    domain: (f64, f64),
    range: (f64, f64),
    base: f64,
    round: bool,
}

/// Specification for a log scale.
#[derive(Clone, Copy, Debug)]
pub struct ScaleLogSpec {
    /// Log base (default 10).
    pub base: f64,
    /// Whether mapped values are rounded to whole pixels.
    pub round: bool,
}

impl Default for ScaleLogSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaleLog {
    /// Creates a new log scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            base: 10.0,
            round: false,
        }
    }

    /// Sets the log base.
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = if base.is_finite() && base > 0.0 && base != 1.0 {
            base
        } else {
            10.0
        };
        self
    }

    /// Rounds mapped values to whole pixels.
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    fn log_base(&self, x: f64) -> f64 {
        let denom = self.base.ln();
        if denom == 0.0 { x.ln() } else { x.ln() / denom }
    }

    /// Maps a value from domain space into range space.
    ///
    /// Non-positive values map to the start of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if x <= 0.0 || d0 <= 0.0 || d1 <= 0.0 {
            return r0;
        }
        let ld0 = self.log_base(d0);
        let ld1 = self.log_base(d1);
        let denom = ld1 - ld0;
        if denom == 0.0 {
            return r0;
        }
        let t = (self.log_base(x) - ld0) / denom;
        let v = r0 + t * (r1 - r0);
        if self.round { v.round() } else { v }
    }
}

impl ScaleLogSpec {
    /// Creates a new log scale spec.
    pub fn new() -> Self {
        Self {
            base: 10.0,
            round: true,
        }
    }

    /// Sets the log base.
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = base;
        self
    }

    /// Enables or disables pixel rounding.
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Instantiates a concrete scale for a given domain and output range.
    pub fn instantiate(&self, domain: (f64, f64), range: (f64, f64)) -> ScaleLog {
        ScaleLog::new(domain, range)
            .with_base(self.base)
            .with_round(self.round)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn ab() -> Vec<DatumValue> {
        vec![DatumValue::from("A"), DatumValue::from("B")]
    }

    #[test]
    fn band_scale_matches_rounded_layout() {
        let band = ScaleBandSpec::new().instantiate(ab(), 100.0, 0.1, Axis::X);
        assert_eq!(band.step(), 47.0);
        assert_eq!(band.band_width(), 42.0);
        assert_eq!(band.map(&"A".into()), Some(5.0));
        assert_eq!(band.map(&"B".into()), Some(52.0));
        assert_eq!(band.map(&"C".into()), None);
    }

    #[test]
    fn band_scale_without_padding_splits_range() {
        let band = ScaleBand::new(ab(), (10.0, 30.0));
        assert_eq!(band.band_width(), 10.0);
        assert_eq!(band.x(0), 10.0);
        assert_eq!(band.x(1), 20.0);
    }

    #[test]
    fn vertical_band_axis_starts_at_the_bottom() {
        let band = ScaleBandSpec::new().instantiate(ab(), 100.0, 0.1, Axis::Y);
        assert_eq!(band.map(&"A".into()), Some(52.0));
        assert_eq!(band.map(&"B".into()), Some(5.0));
        assert_eq!(band.band_width(), 42.0);
    }

    #[test]
    fn nice_extends_to_round_values() {
        assert_eq!(nice_domain((0.0, 5.0), 10), (0.0, 5.0));
        assert_eq!(nice_domain((0.0, 97.0), 10), (0.0, 100.0));
        assert_eq!(nice_domain((-3.2, 11.0), 10), (-4.0, 12.0));
    }

    #[test]
    fn linear_domain_includes_zero_when_auto() {
        let spec = ValueScaleSpec::default();
        let d = spec
            .resolve_domain(ValueBound::Auto, ValueBound::Auto, [3.0, 5.0])
            .unwrap();
        assert_eq!(d, (0.0, 5.0));
        let d = spec
            .resolve_domain(ValueBound::Auto, ValueBound::Auto, [-2.0, -1.0])
            .unwrap();
        assert_eq!(d, (-2.0, 0.0));
    }

    #[test]
    fn fixed_bounds_must_leave_a_domain() {
        let spec = ValueScaleSpec::default();
        assert_eq!(
            spec.resolve_domain(ValueBound::Fixed(10.0), ValueBound::Auto, [3.0]),
            Err(ConfigurationError::DegenerateValueDomain {
                min: 10.0,
                max: 3.0
            })
        );
        assert!(
            spec.resolve_domain(ValueBound::Auto, ValueBound::Auto, core::iter::empty())
                .is_ok()
        );
    }

    #[test]
    fn log_domain_rejects_non_positive_bounds() {
        let spec = ValueScaleSpec::Log(ScaleLogSpec::new());
        assert_eq!(
            spec.resolve_domain(ValueBound::Auto, ValueBound::Auto, [0.0, 10.0, 1000.0]),
            Ok((10.0, 1000.0))
        );
        assert!(matches!(
            spec.resolve_domain(ValueBound::Fixed(0.0), ValueBound::Auto, [10.0]),
            Err(ConfigurationError::NonPositiveLogDomain { .. })
        ));
    }

    #[test]
    fn reversed_value_range_flips_direction() {
        let spec = ValueScaleSpec::Linear(ScaleLinearSpec::new().with_nice(false));
        let up = spec.instantiate((0.0, 10.0), 100.0, Axis::Y, false);
        let down = spec.instantiate((0.0, 10.0), 100.0, Axis::Y, true);
        assert_eq!(up.map(10.0), 0.0);
        assert_eq!(down.map(10.0), 100.0);
        assert_eq!(up.baseline(), 100.0);
        assert_eq!(down.baseline(), 0.0);
    }

    #[test]
    fn log_scale_maps_endpoints_to_range() {
        let s = ScaleLog::new((1.0, 100.0), (0.0, 10.0));
        assert!((s.map(1.0) - 0.0).abs() < 1e-9);
        assert!((s.map(100.0) - 10.0).abs() < 1e-9);
    }
}
