// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderers for [`vizir_bar`] scenes.
//!
//! - [`SvgRenderer`] writes a standalone SVG document, with pattern fills as `<defs>`.
//! - [`CanvasRenderer`] drives any [`Canvas2d`] surface with a pixel-ratio transform.
//!
//! ```
//! use vizir_bar::{BarChart, BarConfig, BarDatum};
//! use vizir_bar_render::SvgRenderer;
//!
//! let data = [BarDatum::new().with("id", "A").with("value", 3)];
//! let svg = BarChart::new(BarConfig::new()).render(&data, &mut SvgRenderer::new())?;
//! assert!(svg.contains("data-key=\"value.A\""));
//! # Ok::<(), vizir_bar::ConfigurationError>(())
//! ```

#![no_std]

extern crate alloc;

mod canvas;
mod svg;

pub use canvas::{Canvas2d, CanvasRenderer, DrawCommand, RecordingCanvas, TextRun};
pub use svg::SvgRenderer;
