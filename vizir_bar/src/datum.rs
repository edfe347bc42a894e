// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw rows and the records derived from them.
//!
//! A [`BarDatum`] is one unprocessed input row. A compute pass enriches each visible
//! `(row, key)` pair into a [`ComputedDatum`] and wraps it, together with pixel geometry, into a
//! [`ComputedBarDatum`]. Computed records borrow their source row; they never copy or mutate it.

extern crate alloc;

use alloc::string::{String, ToString};

use core::fmt;
use core::hash::{Hash, Hasher};

use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;
use kurbo::{Point, Rect};
use peniko::Color;

use crate::format::format_number;

/// A single field value of a raw row.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum DatumValue {
    /// A numeric field.
    Number(f64),
    /// A text field.
    Text(String),
}

impl DatumValue {
    /// Returns the numeric reading of this value.
    ///
    /// Text is parsed after trimming. Non-finite numbers and unparseable text read as `None`,
    /// which the computation treats as a null value.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Self::Number(v) => *v,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    /// Returns the text if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    // -0.0 and 0.0 compare equal, all NaNs compare equal.
    fn number_bits(v: f64) -> u64 {
        if v == 0.0 {
            0
        } else if v.is_nan() {
            f64::NAN.to_bits()
        } else {
            v.to_bits()
        }
    }
}

impl PartialEq for DatumValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => Self::number_bits(*a) == Self::number_bits(*b),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for DatumValue {}

impl Hash for DatumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Number(v) => {
                0_u8.hash(state);
                Self::number_bits(*v).hash(state);
            }
            Self::Text(s) => {
                1_u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for DatumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => f.write_str(&format_number(*v)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for DatumValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for DatumValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for DatumValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for DatumValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DatumValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

type Fields = IndexMap<String, DatumValue, DefaultHashBuilder>;

/// One raw input row: an insertion-ordered mapping from field name to value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BarDatum {
    fields: Fields,
}

impl BarDatum {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing an existing field with the same name.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<DatumValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts a field, returning the previous value if any.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<DatumValue>,
    ) -> Option<DatumValue> {
        self.fields.insert(field.into(), value.into())
    }

    /// Returns a field value.
    pub fn get(&self, field: &str) -> Option<&DatumValue> {
        self.fields.get(field)
    }

    /// Returns the numeric reading of a field, see [`DatumValue::as_f64`].
    pub fn value(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(DatumValue::as_f64)
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DatumValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<DatumValue>> FromIterator<(K, V)> for BarDatum {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for BarDatum {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

// `null` fields are dropped: an absent field and a null field both read as a null value.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BarDatum {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Option<DatumValue>, DefaultHashBuilder>::deserialize(
            deserializer,
        )?;
        Ok(raw
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect())
    }
}

/// A raw row paired with one key, enriched for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputedDatum<'a> {
    /// The key this datum was derived for.
    pub id: String,
    /// Numeric value of the key's field; `None` for null.
    pub value: Option<f64>,
    /// `value` passed through the configured value format.
    pub formatted_value: String,
    /// Whether the key or index is hidden.
    pub hidden: bool,
    /// Position of the source row in the input.
    pub index: usize,
    /// The row's index-axis value.
    pub index_value: DatumValue,
    /// The source row.
    pub data: &'a BarDatum,
    /// Fill override (`url(#id)`) set by a matching fill rule.
    pub fill: Option<String>,
}

/// One drawable bar.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputedBarDatum<'a> {
    /// Unique key within a pass: `"{id}.{index_value}"`.
    pub key: String,
    /// The enriched datum.
    pub data: ComputedDatum<'a>,
    /// Left edge in inner-area pixels.
    pub x: f64,
    /// Top edge in inner-area pixels.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Resolved fill color.
    pub color: Color,
    /// Tooltip label text.
    pub label: String,
}

impl ComputedBarDatum<'_> {
    /// Returns the bar rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Returns the bar center.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Tooltip payload for a bar with a non-null value.
#[derive(Clone, Debug, PartialEq)]
pub struct BarTooltip<'a> {
    /// The enriched datum.
    pub datum: ComputedDatum<'a>,
    /// The bar color.
    pub color: Color,
    /// Tooltip label text.
    pub label: String,
    /// The bar value.
    pub value: f64,
}

impl<'a> BarTooltip<'a> {
    /// Builds a tooltip payload, or `None` if the bar carries a null value.
    pub fn from_bar(bar: &ComputedBarDatum<'a>) -> Option<Self> {
        let value = bar.data.value?;
        Some(Self {
            datum: bar.data.clone(),
            color: bar.color,
            label: bar.label.clone(),
            value,
        })
    }
}
