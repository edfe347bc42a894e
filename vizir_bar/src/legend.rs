// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend projection and layout.
//!
//! Legends are projected from the same pass as the bars but do not depend on bar geometry:
//! every key (or index value) gets a [`LegendSource`], hidden ones included, so toggling an
//! entry only changes the `hidden` flag until the next pass.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use core::fmt;

use hashbrown::HashSet;
use kurbo::{Point, Rect, Size};
use peniko::Color;

use crate::compute::ComputedBars;
use crate::config::{BarConfig, GroupMode, Layout};
use crate::datum::{BarDatum, ComputedDatum, DatumValue};

/// What legend entries are projected from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegendDataFrom {
    /// One entry per key.
    #[default]
    Keys,
    /// One entry per index value.
    Indexes,
}

/// The fields a legend label can see.
///
/// `id` and `hidden` are always present; the rest is only known when the entry has a row to
/// draw from.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendLabelDatum<'a> {
    /// The key or index value.
    pub id: DatumValue,
    /// Whether the entry is hidden.
    pub hidden: bool,
    /// Row position.
    pub index: Option<usize>,
    /// Row index value.
    pub index_value: Option<DatumValue>,
    /// Numeric value.
    pub value: Option<f64>,
    /// Formatted value.
    pub formatted_value: Option<String>,
    /// Source row.
    pub data: Option<&'a BarDatum>,
}

impl<'a> LegendLabelDatum<'a> {
    /// An entry with nothing but an id.
    pub fn bare(id: DatumValue, hidden: bool) -> Self {
        Self {
            id,
            hidden,
            index: None,
            index_value: None,
            value: None,
            formatted_value: None,
            data: None,
        }
    }

    fn from_computed(id: DatumValue, hidden: bool, datum: &ComputedDatum<'a>) -> Self {
        Self {
            id,
            hidden,
            index: Some(datum.index),
            index_value: Some(datum.index_value.clone()),
            value: datum.value,
            formatted_value: Some(datum.formatted_value.clone()),
            data: Some(datum.data),
        }
    }
}

/// One legend candidate: a bar when one is visible, otherwise the synthesized entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendSource<'a> {
    /// Geometry of the first visible bar of this entry.
    pub geometry: Option<Rect>,
    /// Swatch color.
    pub color: Color,
    /// Label fields.
    pub datum: LegendLabelDatum<'a>,
}

impl<'a> ComputedBars<'a> {
    /// Projects one legend source per key (in `keys` order) or per index value (in data order).
    pub fn legend_sources(&self, from: LegendDataFrom) -> Vec<LegendSource<'a>> {
        match from {
            LegendDataFrom::Keys => self
                .config
                .keys
                .iter()
                .enumerate()
                .map(|(k, key)| {
                    let id = DatumValue::from(key.as_str());
                    if let Some(bar) = self.bars.iter().find(|b| b.data.id == *key) {
                        return LegendSource {
                            geometry: Some(bar.rect()),
                            color: bar.color,
                            datum: LegendLabelDatum::from_computed(id, false, &bar.data),
                        };
                    }
                    let hidden = self.config.is_key_hidden(key);
                    self.synthesized(id, hidden, 0, k)
                })
                .collect(),
            LegendDataFrom::Indexes => self
                .index_values
                .iter()
                .enumerate()
                .map(|(row, index_value)| {
                    if let Some(bar) = self.bars.iter().find(|b| b.data.index == row) {
                        return LegendSource {
                            geometry: Some(bar.rect()),
                            color: bar.color,
                            datum: LegendLabelDatum::from_computed(
                                index_value.clone(),
                                false,
                                &bar.data,
                            ),
                        };
                    }
                    let hidden = self.config.is_hidden(index_value);
                    self.synthesized(index_value.clone(), hidden, row, 0)
                })
                .collect(),
        }
    }

    fn synthesized(
        &self,
        id: DatumValue,
        hidden: bool,
        row: usize,
        key: usize,
    ) -> LegendSource<'a> {
        match self.datum_for(row, key) {
            Some(datum) => LegendSource {
                geometry: None,
                color: self.colors.resolve(&datum),
                datum: LegendLabelDatum::from_computed(id, hidden, &datum),
            },
            None => {
                let key_id = self.config.keys.get(key).map_or("", String::as_str);
                LegendSource {
                    geometry: None,
                    color: self.colors.resolve_ordinal(key_id, &id),
                    datum: LegendLabelDatum::bare(id, hidden),
                }
            }
        }
    }
}

/// A projected legend entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendData {
    /// The key or index value.
    pub id: DatumValue,
    /// Display label.
    pub label: String,
    /// Whether the entry is hidden.
    pub hidden: bool,
    /// Swatch color.
    pub color: Color,
}

/// Legend label accessor.
#[derive(Clone, Default)]
pub enum LegendLabel {
    /// The entry id: the key for key legends, the index value for index legends.
    #[default]
    Id,
    /// Caller-provided accessor.
    Custom(Arc<dyn Fn(&LegendLabelDatum<'_>) -> String + Send + Sync>),
}

impl fmt::Debug for LegendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("Id"),
            Self::Custom(_) => f.debug_tuple("Custom").field(&"<fn>").finish(),
        }
    }
}

impl LegendLabel {
    /// Wraps a closure.
    pub fn custom(f: impl Fn(&LegendLabelDatum<'_>) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Resolves a label.
    pub fn resolve(&self, datum: &LegendLabelDatum<'_>) -> String {
        match self {
            Self::Id => datum.id.to_string(),
            Self::Custom(f) => f(datum),
        }
    }
}

/// Where a legend block is anchored within the inner chart area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegendAnchor {
    /// Top-left corner.
    TopLeft,
    /// Top edge, centered.
    Top,
    /// Top-right corner.
    TopRight,
    /// Right edge, centered.
    Right,
    /// Bottom-right corner.
    #[default]
    BottomRight,
    /// Bottom edge, centered.
    Bottom,
    /// Bottom-left corner.
    BottomLeft,
    /// Left edge, centered.
    Left,
    /// Centered.
    Center,
}

/// Item flow direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegendDirection {
    /// Items side by side.
    Row,
    /// Items stacked top to bottom.
    #[default]
    Column,
}

/// A legend block.
#[derive(Clone, Debug)]
pub struct BarLegendSpec {
    /// Default: [`LegendDataFrom::Keys`].
    pub data_from: LegendDataFrom,
    /// Default: [`LegendAnchor::BottomRight`].
    pub anchor: LegendAnchor,
    /// Default: [`LegendDirection::Column`].
    pub direction: LegendDirection,
    /// Horizontal offset from the anchored position.
    pub translate_x: f64,
    /// Vertical offset from the anchored position.
    pub translate_y: f64,
    /// Item width (default 100).
    pub item_width: f64,
    /// Item height (default 20).
    pub item_height: f64,
    /// Gap between items.
    pub items_spacing: f64,
    /// Swatch size (default 16).
    pub symbol_size: f64,
    /// Gap between swatch and label (default 8).
    pub symbol_spacing: f64,
    /// Label font size (default 11).
    pub font_size: f64,
    /// Label accessor.
    pub label: LegendLabel,
    /// Whether clicking an item toggles the matching id.
    pub toggle_serie: bool,
}

impl Default for BarLegendSpec {
    fn default() -> Self {
        Self::new(LegendDataFrom::Keys)
    }
}

impl BarLegendSpec {
    /// Creates a legend with defaults.
    pub fn new(data_from: LegendDataFrom) -> Self {
        Self {
            data_from,
            anchor: LegendAnchor::default(),
            direction: LegendDirection::default(),
            translate_x: 0.0,
            translate_y: 0.0,
            item_width: 100.0,
            item_height: 20.0,
            items_spacing: 0.0,
            symbol_size: 16.0,
            symbol_spacing: 8.0,
            font_size: 11.0,
            label: LegendLabel::Id,
            toggle_serie: false,
        }
    }

    /// Sets the anchor.
    pub fn with_anchor(mut self, anchor: LegendAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the direction.
    pub fn with_direction(mut self, direction: LegendDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the offset from the anchored position.
    pub fn with_translate(mut self, x: f64, y: f64) -> Self {
        self.translate_x = x;
        self.translate_y = y;
        self
    }

    /// Sets the item size.
    pub fn with_item_size(mut self, width: f64, height: f64) -> Self {
        self.item_width = width;
        self.item_height = height;
        self
    }

    /// Sets the gap between items.
    pub fn with_items_spacing(mut self, spacing: f64) -> Self {
        self.items_spacing = spacing;
        self
    }

    /// Sets the swatch size.
    pub fn with_symbol_size(mut self, size: f64) -> Self {
        self.symbol_size = size;
        self
    }

    /// Sets the label accessor.
    pub fn with_label(mut self, label: LegendLabel) -> Self {
        self.label = label;
        self
    }

    /// Enables toggling ids by clicking items.
    pub fn with_toggle_serie(mut self, toggle: bool) -> Self {
        self.toggle_serie = toggle;
        self
    }

    /// Whether entries are listed in reverse source order.
    ///
    /// Key legends follow the visual stacking order; index legends follow the top-to-bottom
    /// band order of horizontal charts.
    pub fn reverses(&self, config: &BarConfig) -> bool {
        let stacked = config.group_mode == GroupMode::Stacked;
        match self.data_from {
            LegendDataFrom::Keys => {
                (config.layout == Layout::Vertical
                    && stacked
                    && self.direction == LegendDirection::Column
                    && !config.reverse)
                    || (config.layout == Layout::Horizontal && stacked && config.reverse)
            }
            LegendDataFrom::Indexes => config.layout == Layout::Horizontal,
        }
    }

    /// Returns the size of the whole block for `count` items.
    pub fn block_size(&self, count: usize) -> Size {
        let n = count as f64;
        let gaps = (n - 1.0).max(0.0) * self.items_spacing;
        match self.direction {
            LegendDirection::Row => Size::new(n * self.item_width + gaps, self.item_height),
            LegendDirection::Column => Size::new(self.item_width, n * self.item_height + gaps),
        }
    }

    /// Lays items out against a container (the inner chart area).
    pub fn layout(&self, items: &[LegendData], container: Size) -> LegendLayout {
        let block = self.block_size(items.len());
        let dx = container.width - block.width;
        let dy = container.height - block.height;
        let (x, y) = match self.anchor {
            LegendAnchor::TopLeft => (0.0, 0.0),
            LegendAnchor::Top => (dx * 0.5, 0.0),
            LegendAnchor::TopRight => (dx, 0.0),
            LegendAnchor::Right => (dx, dy * 0.5),
            LegendAnchor::BottomRight => (dx, dy),
            LegendAnchor::Bottom => (dx * 0.5, dy),
            LegendAnchor::BottomLeft => (0.0, dy),
            LegendAnchor::Left => (0.0, dy * 0.5),
            LegendAnchor::Center => (dx * 0.5, dy * 0.5),
        };
        let origin = Point::new(x + self.translate_x, y + self.translate_y);

        let items = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let offset = i as f64;
                let item_origin = match self.direction {
                    LegendDirection::Row => Point::new(
                        origin.x + offset * (self.item_width + self.items_spacing),
                        origin.y,
                    ),
                    LegendDirection::Column => Point::new(
                        origin.x,
                        origin.y + offset * (self.item_height + self.items_spacing),
                    ),
                };
                let symbol_y = item_origin.y + (self.item_height - self.symbol_size) * 0.5;
                LegendItemLayout {
                    id: item.id.clone(),
                    label: item.label.clone(),
                    color: item.color,
                    hidden: item.hidden,
                    bounds: Rect::from_origin_size(
                        item_origin,
                        (self.item_width, self.item_height),
                    ),
                    symbol: Rect::from_origin_size(
                        (item_origin.x, symbol_y),
                        (self.symbol_size, self.symbol_size),
                    ),
                    label_pos: Point::new(
                        item_origin.x + self.symbol_size + self.symbol_spacing,
                        item_origin.y + self.item_height * 0.5,
                    ),
                }
            })
            .collect();

        LegendLayout {
            bounds: Rect::from_origin_size(origin, block),
            items,
        }
    }
}

/// Projects legend entries from sources.
///
/// Entries are deduplicated by id (first wins) and ordered per [`BarLegendSpec::reverses`].
pub fn legend_data(
    sources: &[LegendSource<'_>],
    spec: &BarLegendSpec,
    config: &BarConfig,
) -> Vec<LegendData> {
    let mut seen = HashSet::with_capacity(sources.len());
    let mut out: Vec<LegendData> = sources
        .iter()
        .filter(|s| seen.insert(&s.datum.id))
        .map(|s| LegendData {
            id: s.datum.id.clone(),
            label: spec.label.resolve(&s.datum),
            hidden: s.datum.hidden,
            color: s.color,
        })
        .collect();
    if spec.reverses(config) {
        out.reverse();
    }
    out
}

/// A laid-out legend block.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendLayout {
    /// The block bounds in inner-area coordinates.
    pub bounds: Rect,
    /// Item layouts in display order.
    pub items: Vec<LegendItemLayout>,
}

impl LegendLayout {
    /// Returns the item under `point`.
    pub fn item_at(&self, point: Point) -> Option<&LegendItemLayout> {
        self.items.iter().find(|item| item.bounds.contains(point))
    }
}

/// One laid-out legend item.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItemLayout {
    /// The key or index value.
    pub id: DatumValue,
    /// Display label.
    pub label: String,
    /// Swatch color.
    pub color: Color,
    /// Whether the entry is hidden.
    pub hidden: bool,
    /// Item bounds.
    pub bounds: Rect,
    /// Swatch rectangle.
    pub symbol: Rect,
    /// Label anchor point (start-anchored, vertically centered).
    pub label_pos: Point,
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::compute::BarComputer;

    fn rows() -> Vec<BarDatum> {
        vec![
            BarDatum::new().with("id", "A").with("a", 1).with("b", 2),
            BarDatum::new().with("id", "B").with("a", 3).with("b", 4),
        ]
    }

    fn ids(data: &[LegendData]) -> Vec<String> {
        data.iter().map(|d| d.id.to_string()).collect()
    }

    #[test]
    fn hidden_keys_stay_in_the_legend() {
        let data = rows();
        let full_config = BarConfig::new().with_keys(["a", "b"]);
        let full = BarComputer::new(&full_config).compute(&data).unwrap();
        let config = BarConfig::new().with_keys(["a", "b"]).with_hidden_ids(["a"]);
        let out = BarComputer::new(&config).compute(&data).unwrap();

        let sources = out.legend_sources(LegendDataFrom::Keys);
        assert_eq!(sources.len(), 2);
        assert!(sources[0].datum.hidden);
        assert!(sources[0].geometry.is_none());
        assert!(!sources[1].datum.hidden);

        let spec = BarLegendSpec::new(LegendDataFrom::Keys).with_direction(LegendDirection::Row);
        let legend = legend_data(&sources, &spec, &config);
        assert_eq!(ids(&legend), ["a", "b"]);
        assert!(legend[0].hidden);
        // The hidden entry keeps the color it had while visible.
        assert_eq!(legend[0].color, full.bars[0].color);
    }

    #[test]
    fn stacked_column_legends_follow_stack_order() {
        let data = rows();
        let config = BarConfig::new().with_keys(["a", "b"]);
        let out = BarComputer::new(&config).compute(&data).unwrap();
        let sources = out.legend_sources(LegendDataFrom::Keys);

        let column = BarLegendSpec::new(LegendDataFrom::Keys);
        assert_eq!(ids(&legend_data(&sources, &column, &config)), ["b", "a"]);

        let grouped = config.clone().with_group_mode(GroupMode::Grouped);
        assert_eq!(ids(&legend_data(&sources, &column, &grouped)), ["a", "b"]);

        let horizontal = config.clone().with_layout(Layout::Horizontal);
        let indexes = BarLegendSpec::new(LegendDataFrom::Indexes);
        let out = BarComputer::new(&horizontal).compute(&data).unwrap();
        let sources = out.legend_sources(LegendDataFrom::Indexes);
        assert_eq!(ids(&legend_data(&sources, &indexes, &horizontal)), ["B", "A"]);
    }

    #[test]
    fn horizontal_index_legend_lists_bands_top_down() {
        let data: Vec<BarDatum> = ["A", "B", "C"]
            .iter()
            .map(|id| BarDatum::new().with("id", *id).with("a", 1))
            .collect();
        let config = BarConfig::new()
            .with_keys(["a"])
            .with_layout(Layout::Horizontal);
        let out = BarComputer::new(&config).compute(&data).unwrap();

        let mut bars: Vec<_> = out.bars.iter().collect();
        bars.sort_by(|a, b| a.y.total_cmp(&b.y));
        let top_down: Vec<String> = bars
            .iter()
            .map(|b| b.data.index_value.to_string())
            .collect();
        assert_eq!(top_down, ["C", "B", "A"]);

        let spec = BarLegendSpec::new(LegendDataFrom::Indexes);
        let sources = out.legend_sources(LegendDataFrom::Indexes);
        assert_eq!(ids(&legend_data(&sources, &spec, &config)), top_down);
    }

    #[test]
    fn hidden_index_has_a_synthesized_entry() {
        let data = rows();
        let config = BarConfig::new().with_keys(["a", "b"]).with_hidden_ids(["B"]);
        let out = BarComputer::new(&config).compute(&data).unwrap();
        let sources = out.legend_sources(LegendDataFrom::Indexes);
        assert_eq!(sources[1].datum.id, DatumValue::from("B"));
        assert!(sources[1].datum.hidden);
        assert_eq!(sources[1].datum.value, Some(3.0));
        assert_eq!(sources[1].color, sources[0].color);
    }

    #[test]
    fn custom_labels_and_dedup() {
        let config = BarConfig::new();
        let row = BarDatum::new();
        let source = |id: &str| LegendSource {
            geometry: None,
            color: Color::BLACK,
            datum: LegendLabelDatum {
                data: Some(&row),
                ..LegendLabelDatum::bare(id.into(), false)
            },
        };
        let sources = [source("x"), source("y"), source("x")];
        let spec = BarLegendSpec::new(LegendDataFrom::Indexes)
            .with_label(LegendLabel::custom(|d| alloc::format!("<{}>", d.id)));
        let legend = legend_data(&sources, &spec, &config);
        let labels: Vec<_> = legend.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["<x>", "<y>"]);
    }

    #[test]
    fn anchored_column_layout() {
        let items: Vec<LegendData> = ["a", "b"]
            .iter()
            .map(|id| LegendData {
                id: (*id).into(),
                label: (*id).to_string(),
                hidden: false,
                color: Color::BLACK,
            })
            .collect();
        let spec = BarLegendSpec::new(LegendDataFrom::Keys)
            .with_anchor(LegendAnchor::BottomRight)
            .with_translate(120.0, 0.0)
            .with_items_spacing(2.0);
        let layout = spec.layout(&items, Size::new(500.0, 300.0));

        assert_eq!(layout.bounds, Rect::new(520.0, 258.0, 620.0, 300.0));
        assert_eq!(layout.items[1].bounds, Rect::new(520.0, 280.0, 620.0, 300.0));
        assert_eq!(layout.items[0].symbol, Rect::new(520.0, 260.0, 536.0, 276.0));
        assert_eq!(layout.items[0].label_pos, Point::new(544.0, 268.0));
        assert_eq!(
            layout.item_at(Point::new(600.0, 290.0)).map(|i| i.label.as_str()),
            Some("b")
        );
    }
}
