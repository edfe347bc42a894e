// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors surfaced before any geometry is produced.

extern crate alloc;

use alloc::string::String;

use thiserror::Error;

use crate::datum::DatumValue;

/// Result alias used by fallible bar computations.
pub type BarResult<T> = Result<T, ConfigurationError>;

/// A contradiction in the chart configuration or the data it is applied to.
///
/// A computation that returns one of these produced no bars at all.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigurationError {
    /// No keys were configured.
    #[error("no keys configured")]
    EmptyKeys,

    /// The same key appears twice in `keys`.
    #[error("duplicate key `{0}`")]
    DuplicateKey(String),

    /// `index_by` could not produce an index value for a row.
    #[error("row {row} has no index value")]
    UnresolvedIndex {
        /// Position of the offending row in the input.
        row: usize,
    },

    /// Two rows resolved to the same index value.
    #[error("rows {first} and {second} share index value `{value}`")]
    DuplicateIndex {
        /// The shared index value.
        value: DatumValue,
        /// Position of the first row.
        first: usize,
        /// Position of the second row.
        second: usize,
    },

    /// Chart dimensions leave no drawable area.
    #[error("invalid inner dimensions: width={width}, height={height}")]
    InvalidDimensions {
        /// Inner width after margins.
        width: f64,
        /// Inner height after margins.
        height: f64,
    },

    /// A padding value is negative or not finite.
    #[error("invalid {name}: {value}")]
    InvalidPadding {
        /// Which padding was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The value domain is inverted or collapsed by fixed bounds.
    #[error("degenerate value domain [{min}, {max}]")]
    DegenerateValueDomain {
        /// Resolved minimum.
        min: f64,
        /// Resolved maximum.
        max: f64,
    },

    /// A log scale was requested over a domain that is not strictly positive.
    #[error("log scale needs a strictly positive domain, got [{min}, {max}]")]
    NonPositiveLogDomain {
        /// Resolved minimum.
        min: f64,
        /// Resolved maximum.
        max: f64,
    },

    /// Two generated bars ended up with the same key.
    #[error("bar key `{0}` is not unique")]
    AmbiguousBarKey(String),

    /// A value format specifier could not be parsed.
    #[error("invalid value format `{0}`")]
    InvalidValueFormat(String),

    /// A CSS color string could not be parsed.
    #[error("invalid color `{0}`")]
    InvalidColor(String),
}
