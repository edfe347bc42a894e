// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar chart demos for `vizir_bar`.
mod html;

use kurbo::Point;
use peniko::color::palette::css;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vizir_bar::{
    AnnotationKind, AnnotationSpec, BarChart, BarConfig, BarDatum, BarHandlers, BarLegendSpec,
    BarMatcher, BarStyle, ColorBy, ColorModifier, ColorScheme, Colors, ComputedBars, FillRule,
    GroupMode, HoverState, InheritedColor, LabelAccessor, Layout, LegendAnchor, LegendDataFrom,
    LegendDirection, Margin, PatternDef, ScaleLogSpec, SceneRenderer, ValueFormat,
};
use vizir_bar_render::{CanvasRenderer, DrawCommand, RecordingCanvas, SvgRenderer};

const FOOD: &str = include_str!("../data/food.json");
const FOOD_KEYS: [&str; 6] = ["hot dog", "burger", "sandwich", "kebab", "fries", "donut"];

fn main() {
    init_default_tracing();

    let food: Vec<BarDatum> = serde_json::from_str(FOOD).expect("parse data/food.json");
    info!(rows = food.len(), "loaded sample data");

    let sections = vec![
        grouped_demo(&food),
        stacked_demo(&food),
        horizontal_demo(),
        pattern_demo(&food),
        log_scale_demo(),
        canvas_demo(&food),
    ];

    let html = html::render_report("VizIR bar demo", &sections);
    std::fs::write("vizir_bar_demo.html", html).expect("write vizir_bar_demo.html");
    println!("wrote vizir_bar_demo.html");
}

fn init_default_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn food_config() -> BarConfig {
    BarConfig::new()
        .with_keys(FOOD_KEYS)
        .with_index_field("country")
        .with_dimensions(720.0, 420.0)
        .with_margin(Margin::new(30.0, 130.0, 40.0, 50.0))
        .with_padding(0.3)
}

fn keys_legend() -> BarLegendSpec {
    BarLegendSpec::new(LegendDataFrom::Keys)
        .with_anchor(LegendAnchor::BottomRight)
        .with_direction(LegendDirection::Column)
        .with_translate(120.0, 0.0)
        .with_item_size(100.0, 20.0)
        .with_items_spacing(2.0)
        .with_toggle_serie(true)
}

/// Renders a chart to SVG and collects legend and tooltip notes.
fn render(chart: &BarChart, data: &[BarDatum]) -> (String, Vec<String>) {
    let bars = chart.compute(data).expect("valid chart configuration");
    let svg = SvgRenderer::new().render(&chart.scene(&bars));
    (svg, notes(chart, &bars))
}

fn notes(chart: &BarChart, bars: &ComputedBars<'_>) -> Vec<String> {
    let mut notes = Vec::new();
    for layout in chart.legend_layouts(bars) {
        let items: Vec<_> = layout
            .items
            .iter()
            .map(|item| {
                if item.hidden {
                    format!("{} (hidden)", item.label)
                } else {
                    item.label.clone()
                }
            })
            .collect();
        notes.push(format!("legend: {}", items.join(", ")));
    }

    // Hover the middle of the last bar, in outer coordinates.
    if let Some(bar) = bars.bars.last() {
        let margin = chart.config.margin;
        let center = bar.center();
        let outer = Point::new(center.x + margin.left, center.y + margin.top);
        let mut hover = HoverState::new();
        if let Some(tip) = chart.pointer_move(bars, &mut hover, outer) {
            notes.push(format!(
                "tooltip at {}: {}: {}",
                bar.key, tip.label, tip.datum.formatted_value
            ));
        }
    }
    notes
}

fn grouped_demo(food: &[BarDatum]) -> html::HtmlSection {
    let chart = BarChart::new(
        food_config()
            .with_group_mode(GroupMode::Grouped)
            .with_inner_padding(2.0)
            .with_colors(Colors::Scheme(ColorScheme::Nivo)),
    )
    .with_style(
        BarStyle::default()
            .with_border_radius(2.0)
            .with_label_skip(12.0, 12.0),
    )
    .with_legend(keys_legend())
    .with_handlers(BarHandlers::default().with_on_click(|bar, _| {
        info!(key = bar.key.as_str(), "bar clicked");
    }));

    let (svg, notes) = render(&chart, food);
    html::HtmlSection {
        title: "Grouped",
        description: "One bar per key inside each country band, with inner padding between \
                      siblings. Null and unparseable values produce no bar.",
        svg,
        notes,
    }
}

fn stacked_demo(food: &[BarDatum]) -> html::HtmlSection {
    let mut chart = BarChart::new(food_config().with_value_format(ValueFormat::Grouped(0)))
        .with_style(
            BarStyle::default()
                .with_border(1.0, InheritedColor::darker(0.3))
                .with_label_text_color(
                    InheritedColor::from_bar().with_modifier(ColorModifier::Darker(2.0)),
                ),
        )
        .with_legend(keys_legend())
        .with_annotation(
            AnnotationSpec::new(
                BarMatcher::Key("donut.AE".into()),
                AnnotationKind::Rect,
                "most donuts",
            )
            .with_offset(4.0),
        );

    // Stacked key legends list keys top-down in stacking order, so "hot dog" is the last item.
    let legend = chart.legend_layouts(&chart.compute(food).expect("valid chart configuration"));
    if let Some(item) = legend.first().and_then(|l| l.items.last()) {
        let center = item.bounds.center();
        let margin = chart.config.margin;
        let outer = Point::new(center.x + margin.left, center.y + margin.top);
        let toggled = chart
            .toggle_legend_at(food, outer)
            .expect("valid chart configuration");
        info!(?toggled, "legend toggled");
    }

    let (svg, notes) = render(&chart, food);
    html::HtmlSection {
        title: "Stacked",
        description: "Keys stacked per country. \"hot dog\" was toggled off from the legend and \
                      stays listed at reduced opacity.",
        svg,
        notes,
    }
}

fn horizontal_demo() -> html::HtmlSection {
    let data: Vec<BarDatum> = [
        ("Q1", 12.0, -4.0),
        ("Q2", 18.0, -9.0),
        ("Q3", 7.0, -2.5),
        ("Q4", 21.0, -11.0),
    ]
    .iter()
    .map(|&(quarter, gains, losses)| {
        BarDatum::new()
            .with("quarter", quarter)
            .with("gains", gains)
            .with("losses", losses)
    })
    .collect();

    let chart = BarChart::new(
        BarConfig::new()
            .with_keys(["gains", "losses"])
            .with_index_field("quarter")
            .with_layout(Layout::Horizontal)
            .with_reverse(true)
            .with_dimensions(520.0, 260.0)
            .with_margin(Margin::new(20.0, 20.0, 60.0, 40.0))
            .with_colors(Colors::List(vec![css::SEA_GREEN, css::INDIAN_RED]))
            .with_value_format(ValueFormat::Fixed(1)),
    )
    .with_legend(
        BarLegendSpec::new(LegendDataFrom::Keys)
            .with_anchor(LegendAnchor::Bottom)
            .with_direction(LegendDirection::Row)
            .with_translate(0.0, 50.0),
    );

    let (svg, notes) = render(&chart, &data);
    html::HtmlSection {
        title: "Horizontal, diverging",
        description: "Negative values stack leftwards from zero; the value axis is reversed.",
        svg,
        notes,
    }
}

fn pattern_demo(food: &[BarDatum]) -> html::HtmlSection {
    let chart = BarChart::new(
        food_config()
            .with_color_by(ColorBy::IndexValue)
            .with_colors(Colors::Scheme(ColorScheme::Tableau10))
            .with_fill(FillRule::new(BarMatcher::Id("fries".into()), "dots"))
            .with_fill(FillRule::new(
                BarMatcher::predicate(|bar| bar.data.value.is_some_and(|v| v > 180.0)),
                "lines",
            )),
    )
    .with_def(PatternDef::dots("dots", css::WHITE, css::DARK_ORANGE))
    .with_def(PatternDef::Lines {
        id: "lines".into(),
        background: css::LIGHT_GRAY,
        color: css::SLATE_GRAY,
        spacing: 6.0,
        rotation: -45.0,
        line_width: 2.0,
    })
    .with_style(BarStyle::default().with_label(LabelAccessor::Id))
    .with_legend(
        BarLegendSpec::new(LegendDataFrom::Indexes)
            .with_anchor(LegendAnchor::TopRight)
            .with_translate(120.0, 0.0),
    );

    let (svg, notes) = render(&chart, food);
    html::HtmlSection {
        title: "Patterns",
        description: "Fill rules select bars by series or by predicate; the first match wins. \
                      Colors come from the index value.",
        svg,
        notes,
    }
}

fn log_scale_demo() -> html::HtmlSection {
    let data: Vec<BarDatum> = [("a", 3.0), ("b", 40.0), ("c", 900.0), ("d", 12_000.0)]
        .iter()
        .map(|&(id, value)| BarDatum::new().with("id", id).with("value", value))
        .collect();

    let chart = BarChart::new(
        BarConfig::new()
            .with_value_scale(ScaleLogSpec::new())
            .with_group_mode(GroupMode::Grouped)
            .with_dimensions(420.0, 260.0)
            .with_margin(Margin::uniform(20.0))
            .with_value_format(ValueFormat::Grouped(0)),
    );

    let (svg, notes) = render(&chart, &data);
    html::HtmlSection {
        title: "Log value scale",
        description: "A base-10 value scale over positive values.",
        svg,
        notes,
    }
}

fn canvas_demo(food: &[BarDatum]) -> html::HtmlSection {
    let chart = BarChart::new(food_config().with_hidden_ids(["AF"])).with_legend(keys_legend());
    let mut canvas = CanvasRenderer::new(RecordingCanvas::new()).with_pixel_ratio(2.0);
    chart
        .render(food, &mut canvas)
        .expect("valid chart configuration");

    let commands = &canvas.canvas().commands;
    let count = |f: fn(&DrawCommand) -> bool| commands.iter().filter(|c| f(c)).count();
    let notes = vec![
        format!("fills: {}", count(|c| matches!(c, DrawCommand::Fill { .. }))),
        format!("strokes: {}", count(|c| matches!(c, DrawCommand::Stroke { .. }))),
        format!("texts: {}", count(|c| matches!(c, DrawCommand::Text { .. }))),
    ];

    let (svg, _) = render(&chart, food);
    html::HtmlSection {
        title: "Canvas",
        description: "The same stacked chart drawn through the canvas renderer at 2x, with the \
                      AF band hidden. The band keeps its slot.",
        svg,
        notes,
    }
}
