// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar chart derivation for VizIR.
//!
//! This crate turns raw tabular rows into immutable, drawable bar records:
//! - a [`BarComputer`] pass maps rows and a [`BarConfig`] to [`ComputedBarDatum`]s
//!   (geometry, color, tooltip label and a back-reference to the source row),
//! - the same pass projects [`LegendData`] from keys or index values, hidden entries
//!   included,
//! - a [`BarChart`] layers bars, legends and annotations into a surface-agnostic
//!   [`BarScene`] that a [`SceneRenderer`] draws.
//!
//! Every pass is pure and recomputes wholesale. Contradictions in the configuration surface as a
//! single [`ConfigurationError`] before any geometry is produced.
//!
//! ```
//! use vizir_bar::{BarComputer, BarConfig, BarDatum, GroupMode};
//!
//! let data = [
//!     BarDatum::new().with("x", "A").with("v", 3),
//!     BarDatum::new().with("x", "B").with("v", 5),
//! ];
//! let config = BarConfig::new()
//!     .with_keys(["v"])
//!     .with_index_field("x")
//!     .with_group_mode(GroupMode::Grouped);
//! let bars = BarComputer::new(&config).compute(&data)?;
//! assert_eq!(bars.bars.len(), 2);
//! assert_eq!(bars.bars[1].data.value, Some(5.0));
//! # Ok::<(), vizir_bar::ConfigurationError>(())
//! ```
//!
//! Axes, grids and animation are out of scope.

#![no_std]

extern crate alloc;

mod annotation;
mod chart;
mod color;
mod compute;
mod config;
mod datum;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod interaction;
mod legend;
mod matcher;
mod scale;
mod scene;

pub use annotation::{
    AnnotationKind, AnnotationOutline, AnnotationSpec, BoundAnnotation, NoteCoordinate,
    bind_annotations,
};
pub use chart::BarChart;
pub use color::{ColorBy, ColorModifier, ColorScheme, Colors, InheritedColor, parse_css_color};
pub use compute::{BarComputer, ComputedBars};
pub use config::{BarConfig, Dimensions, GroupMode, IndexBy, Layout, Margin};
pub use datum::{BarDatum, BarTooltip, ComputedBarDatum, ComputedDatum, DatumValue};
pub use error::{BarResult, ConfigurationError};
pub use format::{LabelAccessor, LabelFormat, ValueFormat, format_number};
pub use interaction::{BarHandler, BarHandlers, HoverState, bar_at};
pub use legend::{
    BarLegendSpec, LegendAnchor, LegendData, LegendDataFrom, LegendDirection, LegendItemLayout,
    LegendLabel, LegendLabelDatum, LegendLayout, LegendSource, legend_data,
};
pub use matcher::{BarMatcher, FillRule, fill_def_id};
pub use scale::{
    Axis, ScaleBand, ScaleBandSpec, ScaleContinuous, ScaleLinear, ScaleLinearSpec, ScaleLog,
    ScaleLogSpec, ValueBound, ValueScaleSpec,
};
pub use scene::{
    BarLayer, BarLayerContext, BarScene, BarStyle, CustomLayer, Fill, PatternDef, SceneItem,
    SceneRenderer, Stroke, TextAnchor, TextBaseline,
};
