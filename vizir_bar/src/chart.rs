// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convenience builder composing a computation, legends, annotations and a scene.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{Point, Size};

use crate::annotation::{AnnotationKind, AnnotationOutline, AnnotationSpec, bind_annotations};
use crate::compute::{BarComputer, ComputedBars};
use crate::config::BarConfig;
use crate::datum::{BarDatum, BarTooltip, DatumValue};
use crate::error::BarResult;
use crate::interaction::{BarHandlers, HoverState};
use crate::legend::{BarLegendSpec, LegendLayout, legend_data};
use crate::scene::{
    BarLayer, BarLayerContext, BarScene, BarStyle, Fill, PatternDef, SceneItem, SceneRenderer,
    Stroke, TEXT_COLOR, TextAnchor, TextBaseline,
};

/// Opacity multiplier for hidden legend entries.
const HIDDEN_LEGEND_ALPHA: f32 = 0.3;

/// A complete bar chart description.
///
/// Holds everything needed to go from rows to a drawn surface. `compute` is the pure pass;
/// `scene` and `render` layer legends, annotations and pattern definitions on top.
#[derive(Clone, Debug)]
pub struct BarChart {
    /// Computation options.
    pub config: BarConfig,
    /// Bar and label styling.
    pub style: BarStyle,
    /// Legend blocks.
    pub legends: Vec<BarLegendSpec>,
    /// Annotations.
    pub annotations: Vec<AnnotationSpec>,
    /// Layers in paint order.
    ///
    /// Default: bars, legends, annotations.
    pub layers: Vec<BarLayer>,
    /// Pattern definitions.
    pub defs: Vec<PatternDef>,
    /// Pointer callbacks.
    pub handlers: BarHandlers,
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new(BarConfig::default())
    }
}

impl BarChart {
    /// Creates a chart with default style and layers.
    pub fn new(config: BarConfig) -> Self {
        Self {
            config,
            style: BarStyle::default(),
            legends: Vec::new(),
            annotations: Vec::new(),
            layers: BarLayer::DEFAULT.to_vec(),
            defs: Vec::new(),
            handlers: BarHandlers::default(),
        }
    }

    /// Sets the style.
    pub fn with_style(mut self, style: BarStyle) -> Self {
        self.style = style;
        self
    }

    /// Adds a legend block.
    pub fn with_legend(mut self, legend: BarLegendSpec) -> Self {
        self.legends.push(legend);
        self
    }

    /// Adds an annotation.
    pub fn with_annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Replaces the layer list.
    pub fn with_layers(mut self, layers: impl IntoIterator<Item = BarLayer>) -> Self {
        self.layers = layers.into_iter().collect();
        self
    }

    /// Adds a pattern definition.
    pub fn with_def(mut self, def: PatternDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Sets the pointer callbacks.
    pub fn with_handlers(mut self, handlers: BarHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// Runs the computation pass.
    pub fn compute<'a>(&'a self, data: &'a [BarDatum]) -> BarResult<ComputedBars<'a>> {
        BarComputer::new(&self.config).compute(data)
    }

    /// Lays out every legend block against the inner area.
    pub fn legend_layouts(&self, bars: &ComputedBars<'_>) -> Vec<LegendLayout> {
        let container = Size::new(bars.inner_width, bars.inner_height);
        self.legends
            .iter()
            .map(|spec| {
                let sources = bars.legend_sources(spec.data_from);
                let items = legend_data(&sources, spec, &self.config);
                spec.layout(&items, container)
            })
            .collect()
    }

    /// Builds the scene for a computed pass.
    pub fn scene(&self, bars: &ComputedBars<'_>) -> BarScene {
        let legends = self.legend_layouts(bars);
        let mut items = Vec::new();
        for layer in &self.layers {
            match layer {
                BarLayer::Bars => items.extend(self.style.bar_items(&bars.bars)),
                BarLayer::Legends => {
                    for (spec, layout) in self.legends.iter().zip(&legends) {
                        legend_items(spec, layout, &mut items);
                    }
                }
                BarLayer::Annotations => {
                    for bound in bind_annotations(&bars.bars, &self.annotations) {
                        let stroke = Stroke {
                            color: TEXT_COLOR,
                            width: 1.0,
                        };
                        items.push(match bound.outline {
                            AnnotationOutline::Circle { center, radius } => SceneItem::Circle {
                                center,
                                radius,
                                fill: (bound.kind == AnnotationKind::Dot).then_some(stroke.color),
                                stroke: Some(stroke),
                            },
                            AnnotationOutline::Rect(rect) => SceneItem::Rect {
                                key: None,
                                rect,
                                radius: 0.0,
                                fill: Fill::Solid(peniko::Color::TRANSPARENT),
                                stroke: Some(stroke),
                            },
                        });
                        items.push(SceneItem::Polyline {
                            points: bound.link.to_vec(),
                            stroke,
                        });
                        items.push(SceneItem::Text {
                            text: bound.text,
                            pos: bound.text_pos,
                            anchor: bound.text_anchor,
                            baseline: TextBaseline::Alphabetic,
                            font_size: 11.0,
                            color: TEXT_COLOR,
                        });
                    }
                }
                BarLayer::Custom(layer) => {
                    let cx = BarLayerContext {
                        bars,
                        legends: &legends,
                        style: &self.style,
                    };
                    layer.draw(&cx, &mut items);
                }
            }
        }

        let margin = self.config.margin;
        BarScene {
            width: self.config.dimensions.width,
            height: self.config.dimensions.height,
            origin: Point::new(margin.left, margin.top),
            defs: self.defs.clone(),
            items,
        }
    }

    /// Computes and renders `data` onto a surface.
    pub fn render<R: SceneRenderer>(
        &self,
        data: &[BarDatum],
        renderer: &mut R,
    ) -> BarResult<R::Output> {
        let bars = self.compute(data)?;
        Ok(renderer.render(&self.scene(&bars)))
    }

    /// Converts an outer-surface position to inner-area coordinates.
    pub fn to_inner(&self, point: Point) -> Point {
        Point::new(point.x - self.config.margin.left, point.y - self.config.margin.top)
    }

    /// Forwards a pointer move at an outer-surface position.
    pub fn pointer_move<'a>(
        &self,
        bars: &ComputedBars<'a>,
        hover: &mut HoverState,
        point: Point,
    ) -> Option<BarTooltip<'a>> {
        hover.pointer_move(
            &bars.bars,
            self.to_inner(point),
            &self.handlers,
            self.style.is_interactive,
        )
    }

    /// Forwards a click at an outer-surface position.
    pub fn click(&self, bars: &ComputedBars<'_>, hover: &HoverState, point: Point) -> bool {
        hover.click(
            &bars.bars,
            self.to_inner(point),
            &self.handlers,
            self.style.is_interactive,
        )
    }

    /// Toggles the legend entry under an outer-surface position, for legends that allow it.
    ///
    /// Returns the toggled id. The next pass reflects the change.
    pub fn toggle_legend_at(
        &mut self,
        data: &[BarDatum],
        point: Point,
    ) -> BarResult<Option<DatumValue>> {
        let inner = self.to_inner(point);
        let id = {
            let bars = self.compute(data)?;
            self.legends
                .iter()
                .zip(self.legend_layouts(&bars))
                .filter(|(spec, _)| spec.toggle_serie)
                .find_map(|(_, layout)| layout.item_at(inner).map(|item| item.id.clone()))
        };
        if let Some(id) = &id {
            self.config.toggle_hidden(id.clone());
        }
        Ok(id)
    }
}

fn legend_items(spec: &BarLegendSpec, layout: &LegendLayout, out: &mut Vec<SceneItem>) {
    for item in &layout.items {
        let (symbol, text) = if item.hidden {
            (
                item.color.multiply_alpha(HIDDEN_LEGEND_ALPHA),
                TEXT_COLOR.multiply_alpha(HIDDEN_LEGEND_ALPHA),
            )
        } else {
            (item.color, TEXT_COLOR)
        };
        out.push(SceneItem::Rect {
            key: None,
            rect: item.symbol,
            radius: 0.0,
            fill: Fill::Solid(symbol),
            stroke: None,
        });
        out.push(SceneItem::Text {
            text: item.label.clone(),
            pos: item.label_pos,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Middle,
            font_size: spec.font_size,
            color: text,
        });
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::config::{GroupMode, Margin};
    use crate::scene::CustomLayer;
    use crate::legend::{LegendAnchor, LegendDataFrom, LegendDirection};
    use crate::matcher::BarMatcher;

    fn rows() -> Vec<BarDatum> {
        vec![
            BarDatum::new().with("id", "A").with("a", 1).with("b", 2),
            BarDatum::new().with("id", "B").with("a", 3).with("b", 4),
        ]
    }

    fn chart() -> BarChart {
        BarChart::new(
            BarConfig::new()
                .with_keys(["a", "b"])
                .with_group_mode(GroupMode::Grouped)
                .with_dimensions(300.0, 200.0)
                .with_margin(Margin::new(10.0, 120.0, 10.0, 20.0)),
        )
        .with_legend(
            BarLegendSpec::new(LegendDataFrom::Keys)
                .with_anchor(LegendAnchor::TopRight)
                .with_direction(LegendDirection::Column)
                .with_translate(110.0, 0.0)
                .with_toggle_serie(true),
        )
    }

    fn count(scene: &BarScene, f: impl Fn(&SceneItem) -> bool) -> usize {
        scene.items.iter().filter(|i| f(i)).count()
    }

    #[test]
    fn layers_paint_in_order() {
        let data = rows();
        let chart = chart().with_annotation(AnnotationSpec::new(
            BarMatcher::Key("b.B".into()),
            AnnotationKind::Circle,
            "max",
        ));
        let bars = chart.compute(&data).unwrap();
        let scene = chart.scene(&bars);

        assert_eq!(scene.origin, Point::new(20.0, 10.0));
        // 4 bars + 4 labels, 2 legend items, 1 annotation (outline + link + note).
        assert_eq!(scene.items.len(), 8 + 4 + 3);
        assert!(matches!(scene.items[0], SceneItem::Rect { key: Some(_), .. }));
        assert!(matches!(scene.items[14], SceneItem::Text { .. }));
        assert_eq!(count(&scene, |i| matches!(i, SceneItem::Circle { .. })), 1);

        let only_bars = chart.clone().with_layers([BarLayer::Bars]);
        assert_eq!(only_bars.scene(&bars).items.len(), 8);
    }

    #[test]
    fn dot_annotations_are_filled() {
        let data = rows();
        let chart = chart()
            .with_layers([BarLayer::Annotations])
            .with_annotation(AnnotationSpec::new(
                BarMatcher::Key("a.A".into()),
                AnnotationKind::Dot,
                "dot",
            ))
            .with_annotation(AnnotationSpec::new(
                BarMatcher::Key("a.A".into()),
                AnnotationKind::Circle,
                "ring",
            ));
        let bars = chart.compute(&data).unwrap();
        let fills: Vec<_> = chart
            .scene(&bars)
            .items
            .iter()
            .filter_map(|i| match i {
                SceneItem::Circle { radius, fill, .. } => Some((*radius, *fill)),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0], (2.0, Some(TEXT_COLOR)));
        assert_eq!(fills[1].1, None);
    }

    #[test]
    fn custom_layers_draw_from_the_pass() {
        let data = rows();
        let baseline = CustomLayer::new(|cx, out| {
            let y = cx.bars.value_scale.baseline();
            out.push(SceneItem::Polyline {
                points: vec![Point::new(0.0, y), Point::new(cx.bars.inner_width, y)],
                stroke: Stroke {
                    color: TEXT_COLOR,
                    width: 1.0,
                },
            });
            // One marker per laid-out legend item.
            for item in cx.legends.iter().flat_map(|l| &l.items) {
                out.push(SceneItem::Circle {
                    center: item.symbol.center(),
                    radius: 2.0,
                    fill: Some(item.color),
                    stroke: None,
                });
            }
        });
        let chart = chart().with_layers([BarLayer::Bars, BarLayer::Custom(baseline)]);
        let bars = chart.compute(&data).unwrap();
        let scene = chart.scene(&bars);

        // 4 bars + 4 labels, then the custom items.
        assert_eq!(scene.items.len(), 8 + 1 + 2);
        assert_eq!(
            scene.items[8],
            SceneItem::Polyline {
                points: vec![Point::new(0.0, 180.0), Point::new(160.0, 180.0)],
                stroke: Stroke {
                    color: TEXT_COLOR,
                    width: 1.0,
                },
            }
        );
        assert_eq!(count(&scene, |i| matches!(i, SceneItem::Circle { .. })), 2);
    }

    #[test]
    fn legend_clicks_toggle_keys() {
        let data = rows();
        let mut chart = chart();
        // Inner width 160: the legend block starts at 60 + 110 = 170 inside, 190 outside.
        let toggled = chart.toggle_legend_at(&data, Point::new(200.0, 15.0)).unwrap();
        assert_eq!(toggled, Some(DatumValue::from("a")));
        {
            let bars = chart.compute(&data).unwrap();
            assert!(bars.bars.iter().all(|b| b.data.id == "b"));

            let scene = chart.scene(&bars);
            let hidden_symbol = scene.items.iter().find_map(|i| match i {
                SceneItem::Rect {
                    key: None,
                    fill: Fill::Solid(c),
                    ..
                } => Some(*c),
                _ => None,
            });
            assert!(hidden_symbol.unwrap().components[3] < 0.5);
        }

        assert_eq!(chart.toggle_legend_at(&data, Point::new(0.0, 0.0)).unwrap(), None);
    }

    #[test]
    fn pointer_events_use_outer_coordinates() {
        let data = rows();
        let chart = chart();
        let bars = chart.compute(&data).unwrap();
        let first = &bars.bars[0];
        let outer = Point::new(first.center().x + 20.0, first.center().y + 10.0);
        let mut hover = HoverState::new();
        let tip = chart.pointer_move(&bars, &mut hover, outer).unwrap();
        assert_eq!(tip.datum.id, "a");
        assert_eq!(tip.label, "a - A");
        assert!(chart.click(&bars, &hover, outer));
    }
}
