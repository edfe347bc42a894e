// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface-agnostic scene items.
//!
//! A [`BarScene`] is a flat, ordered list of drawing primitives in inner-area coordinates plus
//! the pattern definitions they reference. Renderers translate by [`BarScene::origin`] and
//! draw items in order; they never see computed bars.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use core::fmt;

use kurbo::{Point, Rect};
use peniko::Color;
use peniko::color::palette::css;

use crate::color::InheritedColor;
use crate::compute::ComputedBars;
use crate::datum::ComputedBarDatum;
use crate::format::{LabelAccessor, LabelFormat};
use crate::legend::LegendLayout;
use crate::matcher::fill_def_id;

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the position.
    #[default]
    Start,
    /// Text is centered on the position.
    Middle,
    /// Text ends at the position.
    End,
}

/// Vertical text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    /// The position is the vertical center of the text.
    #[default]
    Middle,
    /// The position is the alphabetic baseline.
    Alphabetic,
    /// The position is the top of the text.
    Hanging,
}

/// A fill paint.
#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    /// Solid color.
    Solid(Color),
    /// A pattern definition, with the color to use where patterns are unsupported.
    Pattern {
        /// Pattern definition id.
        def_id: String,
        /// Fallback color.
        fallback: Color,
    },
}

/// A stroke paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f64,
}

/// A reusable pattern fill.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternDef {
    /// Dots on a background.
    Dots {
        /// Definition id referenced by fill rules.
        id: String,
        /// Background color.
        background: Color,
        /// Dot color.
        color: Color,
        /// Dot diameter.
        size: f64,
        /// Space between dots.
        padding: f64,
        /// Offsets every other row.
        stagger: bool,
    },
    /// Parallel lines on a background.
    Lines {
        /// Definition id referenced by fill rules.
        id: String,
        /// Background color.
        background: Color,
        /// Line color.
        color: Color,
        /// Distance between lines.
        spacing: f64,
        /// Rotation in degrees.
        rotation: f64,
        /// Line width.
        line_width: f64,
    },
}

impl PatternDef {
    /// Dots with default sizing.
    pub fn dots(id: impl Into<String>, background: Color, color: Color) -> Self {
        Self::Dots {
            id: id.into(),
            background,
            color,
            size: 4.0,
            padding: 4.0,
            stagger: false,
        }
    }

    /// Lines with default sizing.
    pub fn lines(id: impl Into<String>, background: Color, color: Color) -> Self {
        Self::Lines {
            id: id.into(),
            background,
            color,
            spacing: 5.0,
            rotation: 0.0,
            line_width: 2.0,
        }
    }

    /// Returns the definition id.
    pub fn id(&self) -> &str {
        match self {
            Self::Dots { id, .. } | Self::Lines { id, .. } => id,
        }
    }
}

/// One drawing primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneItem {
    /// A possibly rounded rectangle.
    Rect {
        /// Bar key when the rectangle is a bar.
        key: Option<String>,
        /// Geometry.
        rect: Rect,
        /// Corner radius.
        radius: f64,
        /// Fill paint.
        fill: Fill,
        /// Optional border.
        stroke: Option<Stroke>,
    },
    /// A circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
        /// Optional fill.
        fill: Option<Color>,
        /// Optional outline.
        stroke: Option<Stroke>,
    },
    /// An open polyline.
    Polyline {
        /// Vertices.
        points: Vec<Point>,
        /// Stroke paint.
        stroke: Stroke,
    },
    /// A single line of text.
    Text {
        /// Text content.
        text: String,
        /// Anchor position.
        pos: Point,
        /// Horizontal alignment.
        anchor: TextAnchor,
        /// Vertical alignment.
        baseline: TextBaseline,
        /// Font size in pixels.
        font_size: f64,
        /// Text color.
        color: Color,
    },
}

/// A complete drawable chart.
#[derive(Clone, Debug, PartialEq)]
pub struct BarScene {
    /// Outer width.
    pub width: f64,
    /// Outer height.
    pub height: f64,
    /// Offset of the inner area (the margin's top-left corner).
    pub origin: Point,
    /// Pattern definitions referenced by [`Fill::Pattern`].
    pub defs: Vec<PatternDef>,
    /// Items in paint order.
    pub items: Vec<SceneItem>,
}

impl BarScene {
    /// Returns the definition with the given id.
    pub fn def(&self, id: &str) -> Option<&PatternDef> {
        self.defs.iter().find(|d| d.id() == id)
    }
}

/// A drawing surface for [`BarScene`]s.
pub trait SceneRenderer {
    /// What a render pass yields.
    type Output;

    /// Draws a scene.
    fn render(&mut self, scene: &BarScene) -> Self::Output;
}

/// Chart layers in paint order.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BarLayer {
    /// Bars and their labels.
    Bars,
    /// Legend blocks.
    Legends,
    /// Bound annotations.
    Annotations,
    /// Caller-drawn items.
    #[cfg_attr(feature = "serde", serde(skip))]
    Custom(CustomLayer),
}

/// What a [`CustomLayer`] draws from.
#[derive(Clone, Copy, Debug)]
pub struct BarLayerContext<'s, 'a> {
    /// The computed pass: bars, both scales and the inner size.
    pub bars: &'s ComputedBars<'a>,
    /// Legend blocks laid out for this pass.
    pub legends: &'s [LegendLayout],
    /// The chart's bar style.
    pub style: &'s BarStyle,
}

/// A layer drawn by a caller closure.
///
/// The closure appends items in inner-area coordinates. Replacing [`BarLayer::Bars`] with a
/// custom layer is how bars get a custom look; [`BarStyle::bar_items`] stays available to it.
#[derive(Clone)]
pub struct CustomLayer(Arc<dyn Fn(&BarLayerContext<'_, '_>, &mut Vec<SceneItem>) + Send + Sync>);

impl CustomLayer {
    /// Wraps a closure.
    pub fn new(
        f: impl Fn(&BarLayerContext<'_, '_>, &mut Vec<SceneItem>) + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// Appends this layer's items to `out`.
    pub fn draw(&self, cx: &BarLayerContext<'_, '_>, out: &mut Vec<SceneItem>) {
        (self.0)(cx, out);
    }
}

impl fmt::Debug for CustomLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomLayer").field(&"<fn>").finish()
    }
}

impl BarLayer {
    /// Default paint order.
    pub const DEFAULT: [Self; 3] = [Self::Bars, Self::Legends, Self::Annotations];
}

/// Visual options for bars and bar labels.
#[derive(Clone, Debug)]
pub struct BarStyle {
    /// Corner radius.
    pub border_radius: f64,
    /// Border width; `0` draws no border.
    pub border_width: f64,
    /// Border color.
    ///
    /// Default: the bar color.
    pub border_color: InheritedColor,
    /// Whether labels are drawn at all.
    pub enable_label: bool,
    /// Label text.
    ///
    /// Default: the formatted value.
    pub label: LabelAccessor,
    /// Optional post-processing of the label text.
    pub label_format: Option<LabelFormat>,
    /// Bars not wider than this get no label; `0` disables the check.
    pub label_skip_width: f64,
    /// Bars not taller than this get no label; `0` disables the check.
    pub label_skip_height: f64,
    /// Label color.
    ///
    /// Default: the bar color darkened by 1.6.
    pub label_text_color: InheritedColor,
    /// Label font size.
    pub label_font_size: f64,
    /// Whether pointer interaction is enabled.
    pub is_interactive: bool,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            border_radius: 0.0,
            border_width: 0.0,
            border_color: InheritedColor::from_bar(),
            enable_label: true,
            label: LabelAccessor::FormattedValue,
            label_format: None,
            label_skip_width: 0.0,
            label_skip_height: 0.0,
            label_text_color: InheritedColor::darker(1.6),
            label_font_size: 11.0,
            is_interactive: true,
        }
    }
}

impl BarStyle {
    /// Sets the corner radius.
    pub fn with_border_radius(mut self, radius: f64) -> Self {
        self.border_radius = radius;
        self
    }

    /// Sets the border.
    pub fn with_border(mut self, width: f64, color: InheritedColor) -> Self {
        self.border_width = width;
        self.border_color = color;
        self
    }

    /// Enables or disables labels.
    pub fn with_enable_label(mut self, enable: bool) -> Self {
        self.enable_label = enable;
        self
    }

    /// Sets the label accessor.
    pub fn with_label(mut self, label: LabelAccessor) -> Self {
        self.label = label;
        self
    }

    /// Sets the label format.
    pub fn with_label_format(mut self, format: LabelFormat) -> Self {
        self.label_format = Some(format);
        self
    }

    /// Sets the label skip thresholds.
    pub fn with_label_skip(mut self, width: f64, height: f64) -> Self {
        self.label_skip_width = width;
        self.label_skip_height = height;
        self
    }

    /// Sets the label color.
    pub fn with_label_text_color(mut self, color: InheritedColor) -> Self {
        self.label_text_color = color;
        self
    }

    /// Enables or disables interaction.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.is_interactive = interactive;
        self
    }

    /// Whether a bar of this size gets a label.
    pub fn should_render_label(&self, width: f64, height: f64) -> bool {
        self.enable_label
            && (self.label_skip_width == 0.0 || width > self.label_skip_width)
            && (self.label_skip_height == 0.0 || height > self.label_skip_height)
    }

    /// Resolves the label text of a bar.
    pub fn label_text(&self, bar: &ComputedBarDatum<'_>) -> String {
        let label = self.label.resolve(&bar.data);
        match &self.label_format {
            Some(format) => format.apply(&label),
            None => label,
        }
    }

    /// Emits one rectangle per bar, each followed by its label when it has one.
    pub fn bar_items(&self, bars: &[ComputedBarDatum<'_>]) -> Vec<SceneItem> {
        let mut out = Vec::with_capacity(bars.len() * 2);
        for bar in bars {
            let fill = match bar.data.fill.as_deref().and_then(fill_def_id) {
                Some(def_id) => Fill::Pattern {
                    def_id: def_id.to_string(),
                    fallback: bar.color,
                },
                None => Fill::Solid(bar.color),
            };
            let stroke = (self.border_width > 0.0).then(|| Stroke {
                color: self.border_color.resolve(bar.color),
                width: self.border_width,
            });
            out.push(SceneItem::Rect {
                key: Some(bar.key.clone()),
                rect: bar.rect(),
                radius: self.border_radius,
                fill,
                stroke,
            });
            if self.should_render_label(bar.width, bar.height) {
                out.push(SceneItem::Text {
                    text: self.label_text(bar),
                    pos: bar.center(),
                    anchor: TextAnchor::Middle,
                    baseline: TextBaseline::Middle,
                    font_size: self.label_font_size,
                    color: self.label_text_color.resolve(bar.color),
                });
            }
        }
        out
    }
}

/// Default text color for legends and annotations.
pub(crate) const TEXT_COLOR: Color = css::BLACK;
