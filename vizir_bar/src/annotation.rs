// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Note annotations bound to bars.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::datum::ComputedBarDatum;
use crate::matcher::BarMatcher;
use crate::scene::TextAnchor;

/// The outline drawn around an annotated bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnnotationKind {
    /// A circle around the bar center.
    #[default]
    Circle,
    /// A rectangle around the bar.
    Rect,
    /// A small filled dot at the bar center.
    Dot,
}

/// A note coordinate relative to the bar center or absolute in inner-area pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteCoordinate {
    /// Offset from the bar center.
    Relative(f64),
    /// Absolute position.
    Absolute(f64),
}

impl NoteCoordinate {
    fn resolve(self, center: f64) -> f64 {
        match self {
            Self::Relative(d) => center + d,
            Self::Absolute(v) => v,
        }
    }
}

/// An annotation applied to every bar its matcher selects.
#[derive(Clone, Debug)]
pub struct AnnotationSpec {
    /// Selected bars.
    pub matcher: BarMatcher,
    /// Outline kind.
    pub kind: AnnotationKind,
    /// Note text.
    pub note: String,
    /// Note x position.
    pub note_x: NoteCoordinate,
    /// Note y position.
    pub note_y: NoteCoordinate,
    /// Length of the underline drawn under the note (default 120).
    pub note_width: f64,
    /// Gap between the underline and the note text (default 8).
    pub note_text_offset: f64,
    /// Extra space between the bar and the outline.
    pub offset: f64,
    /// Outline size override; defaults to the bar's larger side (or 4 for dots).
    pub size: Option<f64>,
}

impl AnnotationSpec {
    /// Creates an annotation with a relative note position.
    pub fn new(matcher: BarMatcher, kind: AnnotationKind, note: impl Into<String>) -> Self {
        Self {
            matcher,
            kind,
            note: note.into(),
            note_x: NoteCoordinate::Relative(40.0),
            note_y: NoteCoordinate::Relative(-40.0),
            note_width: 120.0,
            note_text_offset: 8.0,
            offset: 0.0,
            size: None,
        }
    }

    /// Sets the note position.
    pub fn with_note_position(mut self, x: NoteCoordinate, y: NoteCoordinate) -> Self {
        self.note_x = x;
        self.note_y = y;
        self
    }

    /// Sets the underline length.
    pub fn with_note_width(mut self, width: f64) -> Self {
        self.note_width = width;
        self
    }

    /// Sets the outline offset.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Overrides the outline size.
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    fn bind(&self, bar: &ComputedBarDatum<'_>) -> BoundAnnotation {
        let center = bar.center();
        let note = Point::new(self.note_x.resolve(center.x), self.note_y.resolve(center.y));
        let angle = (note.y - center.y).atan2(note.x - center.x);
        let direction = Vec2::new(angle.cos(), angle.sin());

        let (outline, link_start) = match self.kind {
            AnnotationKind::Circle | AnnotationKind::Dot => {
                let default_size = if self.kind == AnnotationKind::Dot {
                    4.0
                } else {
                    bar.width.max(bar.height)
                };
                let radius = self.size.unwrap_or(default_size) * 0.5 + self.offset;
                (
                    AnnotationOutline::Circle { center, radius },
                    center + direction * radius,
                )
            }
            AnnotationKind::Rect => {
                let hw = self.size.unwrap_or(bar.width) * 0.5 + self.offset;
                let hh = self.size.unwrap_or(bar.height) * 0.5 + self.offset;
                let rect = Rect::new(center.x - hw, center.y - hh, center.x + hw, center.y + hh);
                // Distance along the ray to the nearest rectangle edge.
                let tx = if direction.x == 0.0 {
                    f64::INFINITY
                } else {
                    hw / direction.x.abs()
                };
                let ty = if direction.y == 0.0 {
                    f64::INFINITY
                } else {
                    hh / direction.y.abs()
                };
                (AnnotationOutline::Rect(rect), center + direction * tx.min(ty))
            }
        };

        let rightward = note.x >= center.x;
        let note_end = Point::new(
            if rightward {
                note.x + self.note_width
            } else {
                note.x - self.note_width
            },
            note.y,
        );
        BoundAnnotation {
            bar_key: bar.key.clone(),
            kind: self.kind,
            outline,
            link: [link_start, note, note_end],
            text: self.note.clone(),
            text_pos: Point::new(note.x, note.y - self.note_text_offset),
            text_anchor: if rightward {
                TextAnchor::Start
            } else {
                TextAnchor::End
            },
        }
    }
}

/// The resolved outline of an annotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnnotationOutline {
    /// A circle (also used for dots).
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// A rectangle.
    Rect(Rect),
}

/// An annotation resolved against one bar.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundAnnotation {
    /// Key of the annotated bar.
    pub bar_key: String,
    /// Outline kind.
    pub kind: AnnotationKind,
    /// Outline geometry.
    pub outline: AnnotationOutline,
    /// Link polyline: outline edge, note point, end of the underline.
    pub link: [Point; 3],
    /// Note text.
    pub text: String,
    /// Text position.
    pub text_pos: Point,
    /// Text anchor, toward the underline.
    pub text_anchor: TextAnchor,
}

/// Binds every spec to every bar it matches, in spec order then bar order.
pub fn bind_annotations(
    bars: &[ComputedBarDatum<'_>],
    specs: &[AnnotationSpec],
) -> Vec<BoundAnnotation> {
    specs
        .iter()
        .flat_map(|spec| {
            bars.iter()
                .filter(|bar| spec.matcher.matches(bar))
                .map(|bar| spec.bind(bar))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use peniko::Color;

    use super::*;
    use crate::datum::{BarDatum, ComputedDatum};

    fn bar(row: &BarDatum) -> ComputedBarDatum<'_> {
        ComputedBarDatum {
            key: "v.A".to_string(),
            data: ComputedDatum {
                id: "v".to_string(),
                value: Some(3.0),
                formatted_value: "3".to_string(),
                hidden: false,
                index: 0,
                index_value: "A".into(),
                data: row,
                fill: None,
            },
            x: 10.0,
            y: 20.0,
            width: 20.0,
            height: 40.0,
            color: Color::BLACK,
            label: String::new(),
        }
    }

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn circle_links_from_the_outline_edge() {
        let row = BarDatum::new();
        let spec = AnnotationSpec::new(BarMatcher::Any, AnnotationKind::Circle, "peak")
            .with_note_position(NoteCoordinate::Relative(30.0), NoteCoordinate::Relative(0.0))
            .with_offset(2.0);
        let bound = bind_annotations(&[bar(&row)], &[spec]);
        assert_eq!(bound.len(), 1);
        let a = &bound[0];
        assert_eq!(
            a.outline,
            AnnotationOutline::Circle {
                center: Point::new(20.0, 40.0),
                radius: 22.0
            }
        );
        assert!(close(a.link[0], Point::new(42.0, 40.0)));
        assert_eq!(a.link[1], Point::new(50.0, 40.0));
        assert_eq!(a.link[2], Point::new(170.0, 40.0));
        assert_eq!(a.text_pos, Point::new(50.0, 32.0));
        assert_eq!(a.text_anchor, TextAnchor::Start);
    }

    #[test]
    fn rect_links_leave_through_the_nearest_edge() {
        let row = BarDatum::new();
        let spec = AnnotationSpec::new(BarMatcher::Any, AnnotationKind::Rect, "low")
            .with_note_position(NoteCoordinate::Absolute(20.0), NoteCoordinate::Absolute(100.0))
            .with_note_width(10.0);
        let a = &bind_annotations(&[bar(&row)], &[spec])[0];
        assert_eq!(a.outline, AnnotationOutline::Rect(Rect::new(10.0, 20.0, 30.0, 60.0)));
        assert!(close(a.link[0], Point::new(20.0, 60.0)));
        assert_eq!(a.link[2], Point::new(30.0, 100.0));
    }

    #[test]
    fn unmatched_bars_are_skipped() {
        let row = BarDatum::new();
        let spec = AnnotationSpec::new(
            BarMatcher::Id("other".to_string()),
            AnnotationKind::Dot,
            "x",
        )
        .with_note_position(NoteCoordinate::Relative(-10.0), NoteCoordinate::Relative(0.0));
        assert!(bind_annotations(&[bar(&row)], &[spec.clone()]).is_empty());

        let spec = AnnotationSpec {
            matcher: BarMatcher::Any,
            ..spec
        };
        let a = &bind_annotations(&[bar(&row)], &[spec])[0];
        assert_eq!(a.text_anchor, TextAnchor::End);
        assert!(matches!(a.outline, AnnotationOutline::Circle { radius, .. } if radius == 2.0));
    }
}
