// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immediate-mode 2D canvas output for bar scenes.
//!
//! [`Canvas2d`] is the narrow surface a host implements over its drawing API (an HTML canvas
//! context, a vello scene, a raster buffer). [`CanvasRenderer`] walks a [`BarScene`] and issues
//! fills, strokes and text with a global transform that applies the pixel ratio and the scene
//! origin.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{Affine, BezPath, Circle, Point, Rect, RoundedRect, Shape};
use peniko::Color;
use tracing::warn;
use vizir_bar::{BarScene, Fill, SceneItem, SceneRenderer, Stroke, TextAnchor, TextBaseline};

/// Path flattening tolerance in user units.
const TOLERANCE: f64 = 0.1;

/// A 2D drawing surface.
pub trait Canvas2d {
    /// Clears `rect` (in device pixels) to transparent.
    fn clear(&mut self, rect: Rect);

    /// Fills `path` with a solid color.
    fn fill(&mut self, transform: Affine, path: &BezPath, color: Color);

    /// Strokes `path` with a solid color.
    fn stroke(&mut self, transform: Affine, path: &BezPath, color: Color, width: f64);

    /// Draws a single line of text anchored at `pos`.
    fn text(&mut self, transform: Affine, text: &TextRun<'_>);
}

/// A text draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextRun<'a> {
    /// Text content.
    pub text: &'a str,
    /// Anchor position.
    pub pos: Point,
    /// Horizontal alignment.
    pub anchor: TextAnchor,
    /// Vertical alignment.
    pub baseline: TextBaseline,
    /// Font size in user units.
    pub font_size: f64,
    /// Text color.
    pub color: Color,
}

/// Draws [`BarScene`]s onto a [`Canvas2d`].
///
/// Pattern fills cannot be expressed on a plain canvas; they are drawn with their fallback
/// color.
#[derive(Debug)]
pub struct CanvasRenderer<C> {
    canvas: C,
    /// Device pixels per user unit.
    ///
    /// Default: `1.0`.
    pub pixel_ratio: f64,
}

impl<C: Canvas2d> CanvasRenderer<C> {
    /// Wraps a canvas.
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            pixel_ratio: 1.0,
        }
    }

    /// Sets the pixel ratio.
    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Returns the canvas.
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Unwraps the canvas.
    pub fn into_canvas(self) -> C {
        self.canvas
    }

    fn stroke(&mut self, transform: Affine, path: &BezPath, stroke: Option<&Stroke>) {
        match stroke {
            Some(stroke) if stroke.width > 0.0 && !is_transparent(stroke.color) => {
                self.canvas
                    .stroke(transform, path, stroke.color, stroke.width);
            }
            _ => {}
        }
    }
}

impl<C: Canvas2d> SceneRenderer for CanvasRenderer<C> {
    type Output = ();

    fn render(&mut self, scene: &BarScene) {
        let ratio = self.pixel_ratio;
        self.canvas.clear(Rect::new(
            0.0,
            0.0,
            scene.width * ratio,
            scene.height * ratio,
        ));
        let transform =
            Affine::scale(ratio) * Affine::translate((scene.origin.x, scene.origin.y));

        let mut warned = false;
        for item in &scene.items {
            match item {
                SceneItem::Rect {
                    rect,
                    radius,
                    fill,
                    stroke,
                    ..
                } => {
                    let path = if *radius > 0.0 {
                        RoundedRect::from_rect(*rect, *radius).to_path(TOLERANCE)
                    } else {
                        rect.to_path(TOLERANCE)
                    };
                    let color = match fill {
                        Fill::Solid(color) => *color,
                        Fill::Pattern { def_id, fallback } => {
                            if !warned {
                                warn!(
                                    def_id = def_id.as_str(),
                                    "pattern fills are not supported on canvas; using bar color"
                                );
                                warned = true;
                            }
                            *fallback
                        }
                    };
                    if !is_transparent(color) {
                        self.canvas.fill(transform, &path, color);
                    }
                    self.stroke(transform, &path, stroke.as_ref());
                }
                SceneItem::Circle {
                    center,
                    radius,
                    fill,
                    stroke,
                } => {
                    let path = Circle::new(*center, *radius).to_path(TOLERANCE);
                    if let Some(color) = fill.filter(|c| !is_transparent(*c)) {
                        self.canvas.fill(transform, &path, color);
                    }
                    self.stroke(transform, &path, stroke.as_ref());
                }
                SceneItem::Polyline { points, stroke } => {
                    let mut path = BezPath::new();
                    for (i, p) in points.iter().enumerate() {
                        if i == 0 {
                            path.move_to(*p);
                        } else {
                            path.line_to(*p);
                        }
                    }
                    self.stroke(transform, &path, Some(stroke));
                }
                SceneItem::Text {
                    text,
                    pos,
                    anchor,
                    baseline,
                    font_size,
                    color,
                } => {
                    if text.is_empty() || is_transparent(*color) {
                        continue;
                    }
                    self.canvas.text(
                        transform,
                        &TextRun {
                            text,
                            pos: *pos,
                            anchor: *anchor,
                            baseline: *baseline,
                            font_size: *font_size,
                            color: *color,
                        },
                    );
                }
            }
        }
    }
}

fn is_transparent(color: Color) -> bool {
    color.components[3] <= 0.0
}

/// One recorded [`Canvas2d`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// A clear.
    Clear(Rect),
    /// A fill, with the path's device-space bounding box.
    Fill {
        /// Device-space bounds.
        bounds: Rect,
        /// Fill color.
        color: Color,
    },
    /// A stroke, with the path's device-space bounding box.
    Stroke {
        /// Device-space bounds.
        bounds: Rect,
        /// Stroke color.
        color: Color,
        /// Stroke width in user units.
        width: f64,
    },
    /// A text run at its device-space anchor.
    Text {
        /// Text content.
        text: String,
        /// Device-space anchor.
        pos: Point,
        /// Font size in device pixels.
        font_size: f64,
        /// Text color.
        color: Color,
    },
}

/// A [`Canvas2d`] that records every call, for hosts that replay draw lists and for tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    /// Calls in order.
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Creates an empty recording.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Canvas2d for RecordingCanvas {
    fn clear(&mut self, rect: Rect) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(rect));
    }

    fn fill(&mut self, transform: Affine, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::Fill {
            bounds: transform.transform_rect_bbox(path.bounding_box()),
            color,
        });
    }

    fn stroke(&mut self, transform: Affine, path: &BezPath, color: Color, width: f64) {
        self.commands.push(DrawCommand::Stroke {
            bounds: transform.transform_rect_bbox(path.bounding_box()),
            color,
            width,
        });
    }

    fn text(&mut self, transform: Affine, text: &TextRun<'_>) {
        let scale = transform.as_coeffs()[0];
        self.commands.push(DrawCommand::Text {
            text: text.text.to_string(),
            pos: transform * text.pos,
            font_size: text.font_size * scale,
            color: text.color,
        });
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use peniko::color::palette::css;

    use super::*;

    fn scene() -> BarScene {
        BarScene {
            width: 100.0,
            height: 50.0,
            origin: Point::new(10.0, 5.0),
            defs: vec![],
            items: vec![
                SceneItem::Rect {
                    key: Some("v.A".into()),
                    rect: Rect::new(0.0, 0.0, 20.0, 30.0),
                    radius: 0.0,
                    fill: Fill::Pattern {
                        def_id: "dots".into(),
                        fallback: css::RED,
                    },
                    stroke: Some(Stroke {
                        color: css::BLACK,
                        width: 0.0,
                    }),
                },
                SceneItem::Rect {
                    key: None,
                    rect: Rect::new(0.0, 0.0, 5.0, 5.0),
                    radius: 0.0,
                    fill: Fill::Solid(Color::TRANSPARENT),
                    stroke: Some(Stroke {
                        color: css::BLACK,
                        width: 1.0,
                    }),
                },
                SceneItem::Text {
                    text: "3".into(),
                    pos: Point::new(10.0, 15.0),
                    anchor: TextAnchor::Middle,
                    baseline: TextBaseline::Middle,
                    font_size: 11.0,
                    color: css::BLACK,
                },
            ],
        }
    }

    #[test]
    fn pixel_ratio_and_origin_apply_to_every_call() {
        let mut renderer = CanvasRenderer::new(RecordingCanvas::new()).with_pixel_ratio(2.0);
        renderer.render(&scene());
        let commands = renderer.into_canvas().commands;

        assert_eq!(commands.len(), 4);
        assert_eq!(commands[0], DrawCommand::Clear(Rect::new(0.0, 0.0, 200.0, 100.0)));
        assert_eq!(
            commands[1],
            DrawCommand::Fill {
                bounds: Rect::new(20.0, 10.0, 60.0, 70.0),
                color: css::RED,
            }
        );
        // The transparent rectangle only strokes.
        assert!(matches!(commands[2], DrawCommand::Stroke { width, .. } if width == 1.0));
        assert_eq!(
            commands[3],
            DrawCommand::Text {
                text: "3".into(),
                pos: Point::new(40.0, 40.0),
                font_size: 22.0,
                color: css::BLACK,
            }
        );
    }

    #[test]
    fn rerendering_replaces_the_recording() {
        let mut renderer = CanvasRenderer::new(RecordingCanvas::new());
        renderer.render(&scene());
        renderer.render(&scene());
        assert_eq!(renderer.canvas().commands.len(), 4);
    }
}
