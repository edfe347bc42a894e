// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG output for bar scenes.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};

use peniko::Color;
use vizir_bar::{
    BarScene, Fill, PatternDef, SceneItem, SceneRenderer, Stroke, TextAnchor, TextBaseline,
};

/// Renders a [`BarScene`] to a standalone `<svg>` document.
///
/// Pattern definitions are emitted once in `<defs>`; items are drawn inside a group translated
/// by the scene origin.
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    /// Font family for all text.
    ///
    /// Default: `sans-serif`.
    pub font_family: String,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
        }
    }
}

impl SvgRenderer {
    /// Creates a renderer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }
}

impl SceneRenderer for SvgRenderer {
    type Output = String;

    fn render(&mut self, scene: &BarScene) -> String {
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="{}">"#,
            escape_xml(&self.font_family),
            w = scene.width,
            h = scene.height,
        ));
        out.push('\n');

        if !scene.defs.is_empty() {
            out.push_str("<defs>\n");
            for def in &scene.defs {
                write_pattern(&mut out, def);
            }
            out.push_str("</defs>\n");
        }

        out.push_str(&format!(
            r#"<g transform="translate({},{})">"#,
            scene.origin.x, scene.origin.y
        ));
        out.push('\n');
        for item in &scene.items {
            write_item(&mut out, item);
        }
        out.push_str("</g>\n</svg>\n");
        out
    }
}

fn write_item(out: &mut String, item: &SceneItem) {
    match item {
        SceneItem::Rect {
            key,
            rect,
            radius,
            fill,
            stroke,
        } => {
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                rect.x0,
                rect.y0,
                rect.width(),
                rect.height(),
            ));
            if *radius > 0.0 {
                out.push_str(&format!(r#" rx="{radius}" ry="{radius}""#));
            }
            if let Some(key) = key {
                out.push_str(&format!(r#" data-key="{}""#, escape_xml(key)));
            }
            match fill {
                Fill::Solid(color) => write_paint_attr(out, "fill", *color),
                Fill::Pattern { def_id, .. } => {
                    out.push_str(&format!(r#" fill="url(#{})""#, escape_xml(def_id)));
                }
            }
            write_stroke(out, stroke.as_ref());
            out.push_str("/>\n");
        }
        SceneItem::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            out.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}""#,
                center.x, center.y, radius
            ));
            match fill {
                Some(color) => write_paint_attr(out, "fill", *color),
                None => out.push_str(r#" fill="none""#),
            }
            write_stroke(out, stroke.as_ref());
            out.push_str("/>\n");
        }
        SceneItem::Polyline { points, stroke } => {
            let mut d = String::new();
            for (i, p) in points.iter().enumerate() {
                if i > 0 {
                    d.push(' ');
                }
                d.push_str(&format!("{},{}", p.x, p.y));
            }
            out.push_str(&format!(r#"<polyline points="{d}" fill="none""#));
            write_stroke(out, Some(stroke));
            out.push_str("/>\n");
        }
        SceneItem::Text {
            text,
            pos,
            anchor,
            baseline,
            font_size,
            color,
        } => {
            let baseline = match baseline {
                TextBaseline::Middle => "central",
                TextBaseline::Alphabetic => "alphabetic",
                TextBaseline::Hanging => "hanging",
            };
            out.push_str(&format!(
                r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
                pos.x, pos.y, font_size, baseline
            ));
            out.push_str(match anchor {
                TextAnchor::Start => r#" text-anchor="start""#,
                TextAnchor::Middle => r#" text-anchor="middle""#,
                TextAnchor::End => r#" text-anchor="end""#,
            });
            write_paint_attr(out, "fill", *color);
            out.push('>');
            out.push_str(&escape_xml(text));
            out.push_str("</text>\n");
        }
    }
}

fn write_pattern(out: &mut String, def: &PatternDef) {
    match def {
        PatternDef::Dots {
            id,
            background,
            color,
            size,
            padding,
            stagger,
        } => {
            let cell = size + padding;
            let tile = if *stagger { cell * 2.0 } else { cell };
            let r = size / 2.0;
            let c = padding / 2.0 + r;
            out.push_str(&format!(
                r#"<pattern id="{}" width="{tile}" height="{tile}" patternUnits="userSpaceOnUse">"#,
                escape_xml(id)
            ));
            out.push_str(&format!(r#"<rect width="{tile}" height="{tile}""#));
            write_paint_attr(out, "fill", *background);
            out.push_str("/>");
            out.push_str(&format!(r#"<circle cx="{c}" cy="{c}" r="{r}""#));
            write_paint_attr(out, "fill", *color);
            out.push_str("/>");
            if *stagger {
                out.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{r}""#,
                    c + cell,
                    c + cell
                ));
                write_paint_attr(out, "fill", *color);
                out.push_str("/>");
            }
            out.push_str("</pattern>\n");
        }
        PatternDef::Lines {
            id,
            background,
            color,
            spacing,
            rotation,
            line_width,
        } => {
            out.push_str(&format!(
                r#"<pattern id="{}" width="{spacing}" height="{spacing}" patternUnits="userSpaceOnUse""#,
                escape_xml(id)
            ));
            if *rotation != 0.0 {
                out.push_str(&format!(r#" patternTransform="rotate({rotation})""#));
            }
            out.push('>');
            out.push_str(&format!(r#"<rect width="{spacing}" height="{spacing}""#));
            write_paint_attr(out, "fill", *background);
            out.push_str("/>");
            let x = spacing / 2.0;
            out.push_str(&format!(
                r#"<line x1="{x}" y1="0" x2="{x}" y2="{spacing}" stroke-width="{line_width}""#
            ));
            write_paint_attr(out, "stroke", *color);
            out.push_str("/>");
            out.push_str("</pattern>\n");
        }
    }
}

fn write_stroke(out: &mut String, stroke: Option<&Stroke>) {
    match stroke {
        Some(stroke) if stroke.width > 0.0 => {
            write_paint_attr(out, "stroke", stroke.color);
            out.push_str(&format!(r#" stroke-width="{}""#, stroke.width));
        }
        _ => {}
    }
}

fn svg_paint(color: Color) -> (String, Option<f64>) {
    let rgba = color.to_rgba8();
    let value = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
    let opacity = if rgba.a == 255 {
        None
    } else {
        Some(f64::from(rgba.a) / 255.0)
    };
    (value, opacity)
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) {
    let (value, opacity) = svg_paint(color);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use kurbo::{Point, Rect};
    use peniko::color::palette::css;

    use super::*;

    fn scene(items: alloc::vec::Vec<SceneItem>) -> BarScene {
        BarScene {
            width: 200.0,
            height: 100.0,
            origin: Point::new(10.0, 20.0),
            defs: vec![],
            items,
        }
    }

    #[test]
    fn bars_are_translated_by_the_origin() {
        let svg = SvgRenderer::new().render(&scene(vec![SceneItem::Rect {
            key: Some("v.A".into()),
            rect: Rect::new(0.0, 5.0, 30.0, 45.0),
            radius: 3.0,
            fill: Fill::Solid(css::RED),
            stroke: None,
        }]));
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100""#));
        assert!(svg.contains(r#"<g transform="translate(10,20)">"#));
        assert!(svg.contains(
            r##"<rect x="0" y="5" width="30" height="40" rx="3" ry="3" data-key="v.A" fill="#ff0000"/>"##
        ));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn pattern_fills_reference_defs() {
        let mut scene = scene(vec![SceneItem::Rect {
            key: None,
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            radius: 0.0,
            fill: Fill::Pattern {
                def_id: "dots".into(),
                fallback: css::RED,
            },
            stroke: Some(Stroke {
                color: css::BLACK,
                width: 1.0,
            }),
        }]);
        scene.defs.push(PatternDef::dots("dots", css::WHITE, css::RED));
        scene.defs.push(PatternDef::lines("lines", css::WHITE, css::BLUE));
        let svg = SvgRenderer::new().render(&scene);
        assert!(svg.contains(r#"<pattern id="dots" width="8" height="8" patternUnits="userSpaceOnUse">"#));
        assert!(svg.contains(r#"<pattern id="lines" width="5" height="5""#));
        assert!(svg.contains(r##"fill="url(#dots)" stroke="#000000" stroke-width="1""##));
    }

    #[test]
    fn text_is_escaped_and_translucent_paint_has_opacity() {
        let svg = SvgRenderer::new().render(&scene(vec![SceneItem::Text {
            text: "a < b & c".into(),
            pos: Point::new(1.0, 2.0),
            anchor: TextAnchor::Middle,
            baseline: TextBaseline::Middle,
            font_size: 11.0,
            color: css::BLACK.multiply_alpha(0.5),
        }]));
        assert!(svg.contains("a &lt; b &amp; c</text>"));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"fill-opacity="#));
    }
}
