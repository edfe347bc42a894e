// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar chart configuration with defaults resolved at construction.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use core::fmt;

use hashbrown::{HashMap, HashSet};

use crate::color::{ColorBy, Colors};
use crate::datum::{BarDatum, DatumValue};
use crate::error::{BarResult, ConfigurationError};
use crate::format::{LabelAccessor, ValueFormat};
use crate::matcher::FillRule;
use crate::scale::{ScaleBandSpec, ValueBound, ValueScaleSpec};

/// How bars of several keys share one index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupMode {
    /// Key values accumulate into contiguous segments.
    #[default]
    Stacked,
    /// One bar per key, side by side within the band.
    Grouped,
}

/// Chart orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    /// Index along x, values along y.
    #[default]
    Vertical,
    /// Index along y, values along x.
    Horizontal,
}

/// Produces the index-axis identity of a row.
#[derive(Clone)]
pub enum IndexBy {
    /// Reads a field.
    Field(String),
    /// Caller-provided accessor; `None` means the row has no index.
    Accessor(Arc<dyn Fn(&BarDatum) -> Option<DatumValue> + Send + Sync>),
}

impl Default for IndexBy {
    fn default() -> Self {
        Self::Field("id".to_string())
    }
}

impl fmt::Debug for IndexBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Accessor(_) => f.debug_tuple("Accessor").field(&"<fn>").finish(),
        }
    }
}

impl IndexBy {
    /// Wraps a closure.
    pub fn accessor(f: impl Fn(&BarDatum) -> Option<DatumValue> + Send + Sync + 'static) -> Self {
        Self::Accessor(Arc::new(f))
    }

    /// Resolves the index value of a row.
    pub fn resolve(&self, row: &BarDatum) -> Option<DatumValue> {
        match self {
            Self::Field(name) => row.get(name).cloned(),
            Self::Accessor(f) => f(row),
        }
    }
}

/// Space around the inner chart area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margin {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Margin {
    /// No margin.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Creates a margin.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same margin on every side.
    pub const fn uniform(m: f64) -> Self {
        Self::new(m, m, m, m)
    }
}

/// Outer chart size.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimensions {
    /// Outer width.
    pub width: f64,
    /// Outer height.
    pub height: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(600.0, 400.0)
    }
}

impl Dimensions {
    /// Creates dimensions.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the inner `(width, height)` once `margin` is removed.
    pub fn inner(&self, margin: &Margin) -> (f64, f64) {
        (
            self.width - margin.left - margin.right,
            self.height - margin.top - margin.bottom,
        )
    }
}

/// Everything a compute pass needs besides the rows.
#[derive(Clone, Debug)]
pub struct BarConfig {
    /// Fields to plot, in series order.
    ///
    /// Default: `["value"]`.
    pub keys: Vec<String>,
    /// Index accessor.
    ///
    /// Default: the `id` field.
    pub index_by: IndexBy,
    /// Default: [`GroupMode::Stacked`].
    pub group_mode: GroupMode,
    /// Default: [`Layout::Vertical`].
    pub layout: Layout,
    /// Flips the value axis and the output order.
    pub reverse: bool,
    /// Lower value bound.
    pub min_value: ValueBound,
    /// Upper value bound.
    pub max_value: ValueBound,
    /// Band padding as a fraction of the step, in `[0, 1]`.
    ///
    /// Default: `0.1`.
    pub padding: f64,
    /// Pixels between grouped bars or stacked segments.
    ///
    /// Default: `0`.
    pub inner_padding: f64,
    /// Default: linear, nice, rounded.
    pub value_scale: ValueScaleSpec,
    /// Default: rounded band scale.
    pub index_scale: ScaleBandSpec,
    /// Outer size.
    pub dimensions: Dimensions,
    /// Space around the inner area.
    pub margin: Margin,
    /// Hidden keys and index values.
    pub hidden_ids: HashSet<DatumValue>,
    /// Formats `formatted_value`.
    pub value_format: ValueFormat,
    /// Bar colors.
    pub colors: Colors,
    /// What ordinal colors are keyed on.
    pub color_by: ColorBy,
    /// Tooltip label.
    ///
    /// Default: `"{id} - {index_value}"`.
    pub tooltip_label: LabelAccessor,
    /// Pattern fill rules, first match wins.
    pub fills: Vec<FillRule>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            keys: vec!["value".to_string()],
            index_by: IndexBy::default(),
            group_mode: GroupMode::default(),
            layout: Layout::default(),
            reverse: false,
            min_value: ValueBound::Auto,
            max_value: ValueBound::Auto,
            padding: 0.1,
            inner_padding: 0.0,
            value_scale: ValueScaleSpec::default(),
            index_scale: ScaleBandSpec::new(),
            dimensions: Dimensions::default(),
            margin: Margin::ZERO,
            hidden_ids: HashSet::new(),
            value_format: ValueFormat::Default,
            colors: Colors::default(),
            color_by: ColorBy::Id,
            tooltip_label: LabelAccessor::IdAndIndexValue,
            fills: Vec::new(),
        }
    }
}

impl BarConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the plotted keys.
    pub fn with_keys<K: Into<String>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Reads the index from a field.
    pub fn with_index_field(mut self, field: impl Into<String>) -> Self {
        self.index_by = IndexBy::Field(field.into());
        self
    }

    /// Sets the index accessor.
    pub fn with_index_by(mut self, index_by: IndexBy) -> Self {
        self.index_by = index_by;
        self
    }

    /// Sets the group mode.
    pub fn with_group_mode(mut self, group_mode: GroupMode) -> Self {
        self.group_mode = group_mode;
        self
    }

    /// Sets the layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Flips the value axis.
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Sets the lower value bound.
    pub fn with_min_value(mut self, min: ValueBound) -> Self {
        self.min_value = min;
        self
    }

    /// Sets the upper value bound.
    pub fn with_max_value(mut self, max: ValueBound) -> Self {
        self.max_value = max;
        self
    }

    /// Sets the band padding.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the inner padding.
    pub fn with_inner_padding(mut self, inner_padding: f64) -> Self {
        self.inner_padding = inner_padding;
        self
    }

    /// Sets the value scale.
    pub fn with_value_scale(mut self, scale: impl Into<ValueScaleSpec>) -> Self {
        self.value_scale = scale.into();
        self
    }

    /// Sets the index scale.
    pub fn with_index_scale(mut self, scale: ScaleBandSpec) -> Self {
        self.index_scale = scale;
        self
    }

    /// Sets the outer size.
    pub fn with_dimensions(mut self, width: f64, height: f64) -> Self {
        self.dimensions = Dimensions::new(width, height);
        self
    }

    /// Sets the margin.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Hides the given keys or index values.
    pub fn with_hidden_ids<V: Into<DatumValue>>(
        mut self,
        ids: impl IntoIterator<Item = V>,
    ) -> Self {
        self.hidden_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Sets the value format.
    pub fn with_value_format(mut self, format: ValueFormat) -> Self {
        self.value_format = format;
        self
    }

    /// Sets the colors.
    pub fn with_colors(mut self, colors: Colors) -> Self {
        self.colors = colors;
        self
    }

    /// Sets what ordinal colors are keyed on.
    pub fn with_color_by(mut self, color_by: ColorBy) -> Self {
        self.color_by = color_by;
        self
    }

    /// Sets the tooltip label.
    pub fn with_tooltip_label(mut self, label: LabelAccessor) -> Self {
        self.tooltip_label = label;
        self
    }

    /// Appends a pattern fill rule.
    pub fn with_fill(mut self, rule: FillRule) -> Self {
        self.fills.push(rule);
        self
    }

    /// Flips the visibility of a key or index value; returns `true` if it is now hidden.
    pub fn toggle_hidden(&mut self, id: impl Into<DatumValue>) -> bool {
        let id = id.into();
        if self.hidden_ids.remove(&id) {
            false
        } else {
            self.hidden_ids.insert(id);
            true
        }
    }

    /// Returns `true` if a key or index value is hidden.
    pub fn is_hidden(&self, id: &DatumValue) -> bool {
        self.hidden_ids.contains(id)
    }

    pub(crate) fn is_key_hidden(&self, key: &str) -> bool {
        !self.hidden_ids.is_empty() && self.is_hidden(&DatumValue::from(key))
    }

    /// Returns the inner `(width, height)`.
    pub fn inner_size(&self) -> (f64, f64) {
        self.dimensions.inner(&self.margin)
    }

    /// Checks everything that does not depend on the rows.
    pub fn validate(&self) -> BarResult<()> {
        if self.keys.is_empty() {
            return Err(ConfigurationError::EmptyKeys);
        }
        let mut seen = HashSet::with_capacity(self.keys.len());
        for key in &self.keys {
            if !seen.insert(key.as_str()) {
                return Err(ConfigurationError::DuplicateKey(key.clone()));
            }
        }

        let (width, height) = self.inner_size();
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigurationError::InvalidDimensions { width, height });
        }
        if !(self.padding.is_finite() && (0.0..=1.0).contains(&self.padding)) {
            return Err(ConfigurationError::InvalidPadding {
                name: "padding",
                value: self.padding,
            });
        }
        if !(self.inner_padding.is_finite() && self.inner_padding >= 0.0) {
            return Err(ConfigurationError::InvalidPadding {
                name: "inner_padding",
                value: self.inner_padding,
            });
        }
        Ok(())
    }

    /// Resolves one index value per row, rejecting unresolved and duplicate values.
    pub fn resolve_index_values(&self, data: &[BarDatum]) -> BarResult<Vec<DatumValue>> {
        let mut first_seen: HashMap<DatumValue, usize> = HashMap::with_capacity(data.len());
        let mut values = Vec::with_capacity(data.len());
        for (row, datum) in data.iter().enumerate() {
            let value = self
                .index_by
                .resolve(datum)
                .ok_or(ConfigurationError::UnresolvedIndex { row })?;
            if let Some(&first) = first_seen.get(&value) {
                return Err(ConfigurationError::DuplicateIndex {
                    value,
                    first,
                    second: row,
                });
            }
            first_seen.insert(value.clone(), row);
            values.push(value);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = BarConfig::new();
        assert_eq!(config.keys, ["value"]);
        assert_eq!(config.group_mode, GroupMode::Stacked);
        assert_eq!(config.layout, Layout::Vertical);
        assert_eq!(config.padding, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_contradictions() {
        assert_eq!(
            BarConfig::new().with_keys(Vec::<String>::new()).validate(),
            Err(ConfigurationError::EmptyKeys)
        );
        assert_eq!(
            BarConfig::new().with_keys(["a", "b", "a"]).validate(),
            Err(ConfigurationError::DuplicateKey("a".to_string()))
        );
        assert_eq!(
            BarConfig::new()
                .with_dimensions(100.0, 50.0)
                .with_margin(Margin::new(30.0, 0.0, 30.0, 0.0))
                .validate(),
            Err(ConfigurationError::InvalidDimensions {
                width: 100.0,
                height: -10.0
            })
        );
        assert!(matches!(
            BarConfig::new().with_inner_padding(-1.0).validate(),
            Err(ConfigurationError::InvalidPadding {
                name: "inner_padding",
                ..
            })
        ));
        assert!(BarConfig::new().with_padding(f64::NAN).validate().is_err());
    }

    #[test]
    fn index_values_must_resolve_and_be_unique() {
        let config = BarConfig::new().with_index_field("x");
        let rows = [
            BarDatum::new().with("x", "A"),
            BarDatum::new().with("y", "B"),
        ];
        assert_eq!(
            config.resolve_index_values(&rows),
            Err(ConfigurationError::UnresolvedIndex { row: 1 })
        );
        let rows = [
            BarDatum::new().with("x", "A"),
            BarDatum::new().with("x", "B"),
            BarDatum::new().with("x", "A"),
        ];
        assert_eq!(
            config.resolve_index_values(&rows),
            Err(ConfigurationError::DuplicateIndex {
                value: "A".into(),
                first: 0,
                second: 2
            })
        );
    }

    #[test]
    fn accessor_index() {
        let config = BarConfig::new().with_index_by(IndexBy::accessor(|row| {
            row.value("year").map(|y| DatumValue::from(y + 1.0))
        }));
        let rows = [BarDatum::new().with("year", 2020)];
        assert_eq!(
            config.resolve_index_values(&rows),
            Ok(vec![DatumValue::from(2021)])
        );
    }

    #[test]
    fn toggling_flips_visibility() {
        let mut config = BarConfig::new();
        assert!(config.toggle_hidden("value"));
        assert!(config.is_key_hidden("value"));
        assert!(!config.toggle_hidden("value"));
        assert!(!config.is_key_hidden("value"));
    }
}
