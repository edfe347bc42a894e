// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bar computation pass: raw rows plus configuration in, immutable per-bar records out.
//!
//! A pass runs in four steps:
//! - validate the configuration and resolve one unique index value per row,
//! - collect the non-null values of visible `(row, key)` pairs into segments (side by side
//!   for grouped charts, diverging stacks for stacked charts),
//! - resolve the value domain from those segments and instantiate both scales,
//! - place every segment and enrich it with value format, color, tooltip label and fill.

extern crate alloc;

use alloc::format;
use alloc::vec::Vec;

use hashbrown::HashSet;
use tracing::{debug, trace, warn};

use crate::color::ColorResolver;
use crate::config::{BarConfig, GroupMode, Layout};
use crate::datum::{BarDatum, ComputedBarDatum, ComputedDatum, DatumValue};
use crate::error::{BarResult, ConfigurationError};
use crate::matcher::resolve_fill;
use crate::scale::{Axis, ScaleBand, ScaleContinuous};

mod grouped;
mod stacked;


/// One value span destined to become a bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Segment {
    /// Row position in the input.
    pub(crate) row: usize,
    /// Key position in `keys`.
    pub(crate) key: usize,
    /// The raw value.
    pub(crate) value: f64,
    /// Value the bar starts from.
    pub(crate) start: f64,
    /// Value the bar ends at.
    pub(crate) end: f64,
}

/// A pixel rectangle in inner-area coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Placement {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

/// Scales and options shared by the placement functions.
#[derive(Debug)]
pub(crate) struct Frame<'s> {
    pub(crate) index_scale: &'s ScaleBand,
    pub(crate) value_scale: &'s ScaleContinuous,
    pub(crate) layout: Layout,
    pub(crate) inner_padding: f64,
}

impl Frame<'_> {
    /// Builds a placement from an index-axis span and a value-axis span.
    pub(crate) fn place(&self, index_start: f64, index_size: f64, v0: f64, v1: f64) -> Placement {
        let lo = v0.min(v1);
        let size = (v1 - v0).abs();
        match self.layout {
            Layout::Vertical => Placement {
                x: index_start,
                y: lo,
                width: index_size,
                height: size,
            },
            Layout::Horizontal => Placement {
                x: lo,
                y: index_start,
                width: size,
                height: index_size,
            },
        }
    }
}

/// Computes bars for one configuration.
#[derive(Clone, Copy, Debug)]
pub struct BarComputer<'c> {
    config: &'c BarConfig,
}

/// The result of one pass.
///
/// Everything here is immutable and borrows the input rows; a new pass produces a new batch.
#[derive(Debug)]
pub struct ComputedBars<'a> {
    /// Bars in data order (outer) by key order (inner), reversed when `reverse` is set.
    pub bars: Vec<ComputedBarDatum<'a>>,
    /// The instantiated index scale.
    pub index_scale: ScaleBand,
    /// The instantiated value scale.
    pub value_scale: ScaleContinuous,
    /// Inner area width.
    pub inner_width: f64,
    /// Inner area height.
    pub inner_height: f64,
    pub(crate) config: &'a BarConfig,
    pub(crate) data: &'a [BarDatum],
    pub(crate) index_values: Vec<DatumValue>,
    pub(crate) colors: ColorResolver<'a>,
}

impl<'a> ComputedBars<'a> {
    /// Returns the configuration the pass ran with.
    pub fn config(&self) -> &'a BarConfig {
        self.config
    }

    /// Returns the input rows.
    pub fn data(&self) -> &'a [BarDatum] {
        self.data
    }

    /// Returns the resolved index value of every row, in data order.
    pub fn index_values(&self) -> &[DatumValue] {
        &self.index_values
    }

    /// Returns the bar with the given key.
    pub fn bar(&self, key: &str) -> Option<&ComputedBarDatum<'a>> {
        self.bars.iter().find(|b| b.key == key)
    }

    /// Synthesizes the computed datum of a `(row, key)` pair, whether or not it has a bar.
    pub(crate) fn datum_for(&self, row: usize, key: usize) -> Option<ComputedDatum<'a>> {
        let datum = self.data.get(row)?;
        let id = self.config.keys.get(key)?;
        let index_value = self.index_values.get(row)?;
        let value = datum.value(id);
        Some(ComputedDatum {
            id: id.clone(),
            value,
            formatted_value: value
                .map(|v| self.config.value_format.format(v))
                .unwrap_or_default(),
            hidden: self.config.is_key_hidden(id) || self.config.is_hidden(index_value),
            index: row,
            index_value: index_value.clone(),
            data: datum,
            fill: None,
        })
    }
}

impl<'c> BarComputer<'c> {
    /// Creates a computer for `config`.
    pub fn new(config: &'c BarConfig) -> Self {
        Self { config }
    }

    /// Runs one pass over `data`.
    ///
    /// Configuration contradictions are reported before any geometry is produced.
    pub fn compute<'a>(&self, data: &'a [BarDatum]) -> BarResult<ComputedBars<'a>>
    where
        'c: 'a,
    {
        let config: &'a BarConfig = self.config;
        config.validate()?;
        let index_values = config.resolve_index_values(data)?;

        let (inner_width, inner_height) = config.inner_size();
        let (index_size, value_size, index_axis, value_axis) = match config.layout {
            Layout::Vertical => (inner_width, inner_height, Axis::X, Axis::Y),
            Layout::Horizontal => (inner_height, inner_width, Axis::Y, Axis::X),
        };

        let visible_keys: Vec<bool> = config
            .keys
            .iter()
            .map(|k| !config.is_key_hidden(k))
            .collect();
        let visible_rows: Vec<bool> = index_values
            .iter()
            .map(|v| !config.is_hidden(v))
            .collect();
        let values = visible_values(config, data, &visible_rows, &visible_keys);

        let segments = match config.group_mode {
            GroupMode::Grouped => grouped::segments(&values),
            GroupMode::Stacked => stacked::segments(&values),
        };

        let domain = config.value_scale.resolve_domain(
            config.min_value,
            config.max_value,
            segments.iter().flat_map(|s| [s.start, s.end]),
        )?;
        let value_scale = config
            .value_scale
            .instantiate(domain, value_size, value_axis, config.reverse);
        let index_scale = config.index_scale.instantiate(
            index_values.clone(),
            index_size,
            config.padding,
            index_axis,
        );

        let frame = Frame {
            index_scale: &index_scale,
            value_scale: &value_scale,
            layout: config.layout,
            inner_padding: config.inner_padding,
        };
        let placements = match config.group_mode {
            GroupMode::Grouped => grouped::place(&frame, &segments, &visible_keys),
            GroupMode::Stacked => stacked::place(&frame, &segments),
        };
        let placements = match placements {
            Some(p) => p,
            None => {
                warn!(
                    band_width = index_scale.band_width(),
                    inner_padding = config.inner_padding,
                    "bar width is not positive, no bars produced"
                );
                Vec::new()
            }
        };

        let colors = ColorResolver::new(
            &config.colors,
            config.color_by,
            &config.keys,
            &index_values,
        );
        let mut seen = HashSet::with_capacity(placements.len());
        let mut bars = Vec::with_capacity(placements.len());
        for (segment, placement) in segments.iter().zip(placements) {
            let id = &config.keys[segment.key];
            let index_value = &index_values[segment.row];
            let datum = ComputedDatum {
                id: id.clone(),
                value: Some(segment.value),
                formatted_value: config.value_format.format(segment.value),
                hidden: false,
                index: segment.row,
                index_value: index_value.clone(),
                data: &data[segment.row],
                fill: None,
            };
            let key = format!("{id}.{index_value}");
            if !seen.insert(key.clone()) {
                return Err(ConfigurationError::AmbiguousBarKey(key));
            }
            let mut bar = ComputedBarDatum {
                key,
                color: colors.resolve(&datum),
                label: config.tooltip_label.resolve(&datum),
                data: datum,
                x: placement.x,
                y: placement.y,
                width: placement.width,
                height: placement.height,
            };
            bar.data.fill = resolve_fill(&config.fills, &bar);
            bars.push(bar);
        }
        if config.reverse {
            bars.reverse();
        }

        debug!(
            rows = data.len(),
            keys = config.keys.len(),
            bars = bars.len(),
            group_mode = ?config.group_mode,
            layout = ?config.layout,
            domain_min = value_scale.domain_min(),
            domain_max = value_scale.domain_max(),
            "computed bars"
        );

        Ok(ComputedBars {
            bars,
            index_scale,
            value_scale,
            inner_width,
            inner_height,
            config,
            data,
            index_values,
            colors,
        })
    }
}

/// A visible, non-null `(row, key)` value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct KeyedValue {
    pub(crate) row: usize,
    pub(crate) key: usize,
    pub(crate) value: f64,
}

/// Collects the values that take part in a pass, data order outer, key order inner.
fn visible_values(
    config: &BarConfig,
    data: &[BarDatum],
    visible_rows: &[bool],
    visible_keys: &[bool],
) -> Vec<KeyedValue> {
    let mut out = Vec::with_capacity(data.len() * config.keys.len());
    for (row, datum) in data.iter().enumerate() {
        if !visible_rows[row] {
            continue;
        }
        for (key, field) in config.keys.iter().enumerate() {
            if !visible_keys[key] {
                continue;
            }
            match datum.value(field) {
                Some(value) => out.push(KeyedValue { row, key, value }),
                None => trace!(row, key = field.as_str(), "skipping null value"),
            }
        }
    }
    out
}
