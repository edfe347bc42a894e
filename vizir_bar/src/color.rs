// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar colors: ordinal palettes keyed by id or index value, and colors inherited from a bar.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use core::fmt;

use hashbrown::HashMap;
use peniko::Color;
use peniko::color::palette::css;
use peniko::color::{Srgb, parse_color};
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::datum::{ComputedDatum, DatumValue};
use crate::error::ConfigurationError;

/// Parses a CSS color string (`#rrggbb`, `rgb(..)`, named colors, ...).
pub fn parse_css_color(s: &str) -> Result<Color, ConfigurationError> {
    parse_color(s)
        .map(|c| c.to_alpha_color::<Srgb>())
        .map_err(|_| ConfigurationError::InvalidColor(s.to_string()))
}

/// Built-in categorical palettes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorScheme {
    /// Warm six-color palette, the default.
    #[default]
    Nivo,
    /// The classic ten-color categorical palette.
    Category10,
    /// Tableau's ten-color palette.
    Tableau10,
    /// Named CSS colors.
    Css,
}

const NIVO: [Color; 6] = [
    Color::from_rgb8(0xe8, 0xc1, 0xa0),
    Color::from_rgb8(0xf4, 0x75, 0x60),
    Color::from_rgb8(0xf1, 0xe1, 0x5b),
    Color::from_rgb8(0xe8, 0xa8, 0x38),
    Color::from_rgb8(0x61, 0xcd, 0xbb),
    Color::from_rgb8(0x97, 0xe3, 0xd5),
];

const CATEGORY10: [Color; 10] = [
    Color::from_rgb8(0x1f, 0x77, 0xb4),
    Color::from_rgb8(0xff, 0x7f, 0x0e),
    Color::from_rgb8(0x2c, 0xa0, 0x2c),
    Color::from_rgb8(0xd6, 0x27, 0x28),
    Color::from_rgb8(0x94, 0x67, 0xbd),
    Color::from_rgb8(0x8c, 0x56, 0x4b),
    Color::from_rgb8(0xe3, 0x77, 0xc2),
    Color::from_rgb8(0x7f, 0x7f, 0x7f),
    Color::from_rgb8(0xbc, 0xbd, 0x22),
    Color::from_rgb8(0x17, 0xbe, 0xcf),
];

const TABLEAU10: [Color; 10] = [
    Color::from_rgb8(0x4e, 0x79, 0xa7),
    Color::from_rgb8(0xf2, 0x8e, 0x2c),
    Color::from_rgb8(0xe1, 0x57, 0x59),
    Color::from_rgb8(0x76, 0xb7, 0xb2),
    Color::from_rgb8(0x59, 0xa1, 0x4f),
    Color::from_rgb8(0xed, 0xc9, 0x49),
    Color::from_rgb8(0xaf, 0x7a, 0xa1),
    Color::from_rgb8(0xff, 0x9d, 0xa7),
    Color::from_rgb8(0x9c, 0x75, 0x5f),
    Color::from_rgb8(0xba, 0xb0, 0xab),
];

const CSS: [Color; 8] = [
    css::CORNFLOWER_BLUE,
    css::ORANGE,
    css::MEDIUM_SEA_GREEN,
    css::CRIMSON,
    css::GOLDENROD,
    css::SLATE_BLUE,
    css::DARK_CYAN,
    css::HOT_PINK,
];

impl ColorScheme {
    /// Returns the palette colors.
    pub fn colors(self) -> &'static [Color] {
        match self {
            Self::Nivo => &NIVO,
            Self::Category10 => &CATEGORY10,
            Self::Tableau10 => &TABLEAU10,
            Self::Css => &CSS,
        }
    }

    /// Returns the color at an ordinal position, repeating the palette.
    pub fn ordinal(self, position: usize) -> Color {
        let colors = self.colors();
        colors[position % colors.len()]
    }
}

/// What an ordinal color is keyed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorBy {
    /// The key (one color per series).
    #[default]
    Id,
    /// The index value (one color per category).
    IndexValue,
}

/// Bar color configuration.
#[derive(Clone)]
pub enum Colors {
    /// An ordinal palette.
    Scheme(ColorScheme),
    /// An explicit ordinal palette; an empty list falls back to the default scheme.
    List(Vec<Color>),
    /// One color for every bar.
    Fixed(Color),
    /// Reads a CSS color from the row field `"{id}{suffix}"`, falling back to `fallback`.
    FromDatum {
        /// Suffix appended to the key to name the color field.
        suffix: String,
        /// Palette used when the field is missing or not a color.
        fallback: ColorScheme,
    },
    /// Caller-provided resolver.
    ///
    /// Legend entries that have no bar to call it with use the default scheme.
    Custom(Arc<dyn Fn(&ComputedDatum<'_>) -> Color + Send + Sync>),
}

impl Default for Colors {
    fn default() -> Self {
        Self::Scheme(ColorScheme::default())
    }
}

impl fmt::Debug for Colors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheme(s) => f.debug_tuple("Scheme").field(s).finish(),
            Self::List(l) => f.debug_tuple("List").field(&l.len()).finish(),
            Self::Fixed(c) => f.debug_tuple("Fixed").field(c).finish(),
            Self::FromDatum { suffix, fallback } => f
                .debug_struct("FromDatum")
                .field("suffix", suffix)
                .field("fallback", fallback)
                .finish(),
            Self::Custom(_) => f.debug_tuple("Custom").field(&"<fn>").finish(),
        }
    }
}

impl Colors {
    /// Wraps a closure.
    pub fn custom(f: impl Fn(&ComputedDatum<'_>) -> Color + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Builds an ordinal list from CSS color strings.
    pub fn from_css<'s>(
        colors: impl IntoIterator<Item = &'s str>,
    ) -> Result<Self, ConfigurationError> {
        colors
            .into_iter()
            .map(parse_css_color)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::List)
    }

    fn ordinal(&self, position: usize) -> Color {
        match self {
            Self::Scheme(s) => s.ordinal(position),
            Self::List(l) if !l.is_empty() => l[position % l.len()],
            Self::List(_) => ColorScheme::default().ordinal(position),
            Self::Fixed(c) => *c,
            Self::FromDatum { fallback, .. } => fallback.ordinal(position),
            Self::Custom(_) => ColorScheme::default().ordinal(position),
        }
    }
}

/// Resolves bar colors for one compute pass.
///
/// Ordinal positions come from the full `keys` list and the full row order, so hiding a key
/// or an index never shifts the colors of the others.
#[derive(Debug)]
pub(crate) struct ColorResolver<'c> {
    colors: &'c Colors,
    color_by: ColorBy,
    keys: HashMap<&'c str, usize>,
    indexes: HashMap<DatumValue, usize>,
}

impl<'c> ColorResolver<'c> {
    pub(crate) fn new(
        colors: &'c Colors,
        color_by: ColorBy,
        keys: &'c [String],
        index_values: &[DatumValue],
    ) -> Self {
        Self {
            colors,
            color_by,
            keys: keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.as_str(), i))
                .collect(),
            indexes: index_values
                .iter()
                .enumerate()
                .map(|(i, v)| (v.clone(), i))
                .collect(),
        }
    }

    fn position(&self, id: &str, index_value: &DatumValue) -> usize {
        match self.color_by {
            ColorBy::Id => self.keys.get(id).copied().unwrap_or(0),
            ColorBy::IndexValue => self.indexes.get(index_value).copied().unwrap_or(0),
        }
    }

    /// Resolves the color of a computed datum.
    pub(crate) fn resolve(&self, datum: &ComputedDatum<'_>) -> Color {
        match self.colors {
            Colors::Custom(f) => f(datum),
            Colors::FromDatum { suffix, .. } => datum
                .data
                .get(&format!("{}{suffix}", datum.id))
                .and_then(DatumValue::as_str)
                .and_then(|s| parse_css_color(s).ok())
                .unwrap_or_else(|| {
                    self.colors
                        .ordinal(self.position(&datum.id, &datum.index_value))
                }),
            _ => self
                .colors
                .ordinal(self.position(&datum.id, &datum.index_value)),
        }
    }

    /// Resolves a color without a datum, from the ordinal position alone.
    pub(crate) fn resolve_ordinal(&self, id: &str, index_value: &DatumValue) -> Color {
        self.colors.ordinal(self.position(id, index_value))
    }
}

/// A modifier applied to an inherited color.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorModifier {
    /// Multiplies channels by `0.7^k`.
    Darker(f32),
    /// Divides channels by `0.7^k`.
    Brighter(f32),
    /// Replaces the alpha channel.
    Opacity(f32),
}

impl ColorModifier {
    /// Applies the modifier.
    pub fn apply(self, color: Color) -> Color {
        let [r, g, b, a] = color.components;
        let scale = |k: f32| {
            #[allow(clippy::cast_possible_truncation, reason = "channel factors fit in f32")]
            {
                0.7_f64.powf(f64::from(k)) as f32
            }
        };
        match self {
            Self::Darker(k) => {
                let f = scale(k);
                Color::new([r * f, g * f, b * f, a])
            }
            Self::Brighter(k) => {
                let f = 1.0 / scale(k);
                Color::new([(r * f).min(1.0), (g * f).min(1.0), (b * f).min(1.0), a])
            }
            Self::Opacity(o) => Color::new([r, g, b, o.clamp(0.0, 1.0)]),
        }
    }
}

/// A color that is either fixed or derived from the bar it decorates.
#[derive(Clone, Debug, PartialEq)]
pub enum InheritedColor {
    /// A fixed color.
    Fixed(Color),
    /// The bar color with modifiers applied in order.
    FromBar(SmallVec<[ColorModifier; 2]>),
}

impl Default for InheritedColor {
    fn default() -> Self {
        Self::from_bar()
    }
}

impl InheritedColor {
    /// The bar color unchanged.
    pub fn from_bar() -> Self {
        Self::FromBar(SmallVec::new())
    }

    /// The bar color darkened by `k`.
    pub fn darker(k: f32) -> Self {
        Self::from_bar().with_modifier(ColorModifier::Darker(k))
    }

    /// Appends a modifier; a fixed color becomes a modified fixed color.
    pub fn with_modifier(self, modifier: ColorModifier) -> Self {
        match self {
            Self::Fixed(c) => Self::Fixed(modifier.apply(c)),
            Self::FromBar(mut mods) => {
                mods.push(modifier);
                Self::FromBar(mods)
            }
        }
    }

    /// Resolves against a bar color.
    pub fn resolve(&self, bar_color: Color) -> Color {
        match self {
            Self::Fixed(c) => *c,
            Self::FromBar(mods) => mods.iter().fold(bar_color, |c, m| m.apply(c)),
        }
    }
}
