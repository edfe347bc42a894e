// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value formatting and label accessors.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;

use core::fmt;

use crate::datum::ComputedDatum;
use crate::error::ConfigurationError;

/// Formats a number the way chart labels expect by default.
///
/// Integral values print without a fractional part, `-0` prints as `0` and infinities print
/// as `Infinity` / `-Infinity`.
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v.is_nan() {
        return "NaN".to_string();
    }
    format!("{v}")
}

/// How computed values are turned into `formatted_value`.
#[derive(Clone, Default)]
pub enum ValueFormat {
    /// [`format_number`].
    #[default]
    Default,
    /// Fixed number of decimals.
    Fixed(usize),
    /// Multiplied by 100, fixed decimals, `%` suffix.
    Percent(usize),
    /// Thousands separators with fixed decimals.
    Grouped(usize),
    /// Multiplied by 100, thousands separators, fixed decimals, `%` suffix.
    GroupedPercent(usize),
    /// Caller-provided formatter.
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl fmt::Debug for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Fixed(p) => f.debug_tuple("Fixed").field(p).finish(),
            Self::Percent(p) => f.debug_tuple("Percent").field(p).finish(),
            Self::Grouped(p) => f.debug_tuple("Grouped").field(p).finish(),
            Self::GroupedPercent(p) => f.debug_tuple("GroupedPercent").field(p).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").field(&"<fn>").finish(),
        }
    }
}

impl ValueFormat {
    /// Wraps a closure.
    pub fn custom(f: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Parses a small d3-format subset: `[,][.precision][f|d|%]`.
    ///
    /// `d` rounds to an integer and ignores precision; an empty specifier is
    /// [`ValueFormat::Default`].
    pub fn from_specifier(spec: &str) -> Result<Self, ConfigurationError> {
        let invalid = || ConfigurationError::InvalidValueFormat(spec.to_string());
        let (grouped, rest) = match spec.strip_prefix(',') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };
        let (body, kind) = match rest.char_indices().last() {
            Some((i, c @ ('f' | 'd' | '%'))) => (&rest[..i], Some(c)),
            _ => (rest, None),
        };
        let precision = match body.strip_prefix('.') {
            Some(p) => Some(p.parse::<usize>().map_err(|_| invalid())?),
            None if body.is_empty() => None,
            None => return Err(invalid()),
        };
        Ok(match (kind, grouped) {
            (Some('%'), false) => Self::Percent(precision.unwrap_or(0)),
            (Some('%'), true) => Self::GroupedPercent(precision.unwrap_or(0)),
            (Some('d'), true) => Self::Grouped(0),
            (Some('d'), false) => Self::Fixed(0),
            (_, true) => Self::Grouped(precision.unwrap_or(0)),
            (Some('f'), false) => Self::Fixed(precision.unwrap_or(6)),
            (None, false) => match precision {
                Some(p) => Self::Fixed(p),
                None => Self::Default,
            },
            (Some(_), _) => return Err(invalid()),
        })
    }

    /// Formats a value.
    pub fn format(&self, v: f64) -> String {
        match self {
            Self::Default => format_number(v),
            Self::Fixed(p) => format!("{v:.p$}", p = *p),
            Self::Percent(p) => format!("{:.p$}%", v * 100.0, p = *p),
            Self::Grouped(p) => group_thousands(&format!("{v:.p$}", p = *p)),
            Self::GroupedPercent(p) => {
                let mut out = group_thousands(&format!("{:.p$}", v * 100.0, p = *p));
                out.push('%');
                out
            }
            Self::Custom(f) => f(v),
        }
    }
}

fn group_thousands(fixed: &str) -> String {
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (int, frac) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let mut out = String::with_capacity(fixed.len() + int.len() / 3);
    out.push_str(sign);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Extracts a text label from a computed datum.
#[derive(Clone)]
pub enum LabelAccessor {
    /// `formatted_value`.
    FormattedValue,
    /// The raw value via [`format_number`].
    Value,
    /// The key.
    Id,
    /// The index value.
    IndexValue,
    /// `"{id} - {index_value}"`.
    IdAndIndexValue,
    /// A field of the source row.
    Field(String),
    /// Caller-provided accessor.
    Custom(Arc<dyn Fn(&ComputedDatum<'_>) -> String + Send + Sync>),
}

impl fmt::Debug for LabelAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FormattedValue => f.write_str("FormattedValue"),
            Self::Value => f.write_str("Value"),
            Self::Id => f.write_str("Id"),
            Self::IndexValue => f.write_str("IndexValue"),
            Self::IdAndIndexValue => f.write_str("IdAndIndexValue"),
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").field(&"<fn>").finish(),
        }
    }
}

impl LabelAccessor {
    /// Wraps a closure.
    pub fn custom(f: impl Fn(&ComputedDatum<'_>) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Resolves the label for a datum.
    pub fn resolve(&self, datum: &ComputedDatum<'_>) -> String {
        match self {
            Self::FormattedValue => datum.formatted_value.clone(),
            Self::Value => datum.value.map(format_number).unwrap_or_default(),
            Self::Id => datum.id.clone(),
            Self::IndexValue => datum.index_value.to_string(),
            Self::IdAndIndexValue => format!("{} - {}", datum.id, datum.index_value),
            Self::Field(name) => datum
                .data
                .get(name)
                .map(ToString::to_string)
                .unwrap_or_default(),
            Self::Custom(f) => f(datum),
        }
    }
}

/// Post-processing applied to a resolved bar label.
#[derive(Clone)]
pub struct LabelFormat(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl LabelFormat {
    /// Wraps a closure.
    pub fn new(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Applies the format.
    pub fn apply(&self, label: &str) -> String {
        (self.0)(label)
    }
}

impl fmt::Debug for LabelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LabelFormat").field(&"<fn>").finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn default_format_drops_integral_fraction() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn specifiers_cover_fixed_percent_and_grouping() {
        let f = ValueFormat::from_specifier(".2f").unwrap();
        assert_eq!(f.format(1.236), "1.24");
        assert_eq!(ValueFormat::from_specifier(".0%").unwrap().format(0.256), "26%");
        assert_eq!(
            ValueFormat::from_specifier(",.1f").unwrap().format(-1234567.26),
            "-1,234,567.3"
        );
        assert_eq!(ValueFormat::from_specifier(",d").unwrap().format(1000.0), "1,000");
        assert_eq!(
            ValueFormat::from_specifier(",.1%").unwrap().format(0.256),
            "25.6%"
        );
        assert_eq!(
            ValueFormat::from_specifier(",.0%").unwrap().format(12.5),
            "1,250%"
        );
        assert!(matches!(
            ValueFormat::from_specifier("").unwrap(),
            ValueFormat::Default
        ));
        assert!(ValueFormat::from_specifier(".x%").is_err());
        assert!(ValueFormat::from_specifier("2f").is_err());
    }
}
