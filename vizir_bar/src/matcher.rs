// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar selection for fills and annotations.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;

use core::fmt;

use crate::datum::{ComputedBarDatum, DatumValue};

/// Selects bars by key, id, index value or predicate.
#[derive(Clone)]
pub enum BarMatcher {
    /// Every bar.
    Any,
    /// The bar with this unique key (`"{id}.{index_value}"`).
    Key(String),
    /// Bars of one series.
    Id(String),
    /// Bars of one index value.
    IndexValue(DatumValue),
    /// Caller-provided predicate.
    Predicate(Arc<dyn Fn(&ComputedBarDatum<'_>) -> bool + Send + Sync>),
}

impl fmt::Debug for BarMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Key(k) => f.debug_tuple("Key").field(k).finish(),
            Self::Id(id) => f.debug_tuple("Id").field(id).finish(),
            Self::IndexValue(v) => f.debug_tuple("IndexValue").field(v).finish(),
            Self::Predicate(_) => f.debug_tuple("Predicate").field(&"<fn>").finish(),
        }
    }
}

impl BarMatcher {
    /// Wraps a closure.
    pub fn predicate(f: impl Fn(&ComputedBarDatum<'_>) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    /// Returns `true` if the bar is selected.
    pub fn matches(&self, bar: &ComputedBarDatum<'_>) -> bool {
        match self {
            Self::Any => true,
            Self::Key(k) => bar.key == *k,
            Self::Id(id) => bar.data.id == *id,
            Self::IndexValue(v) => bar.data.index_value == *v,
            Self::Predicate(f) => f(bar),
        }
    }
}

/// Assigns a pattern definition to matching bars.
#[derive(Clone, Debug)]
pub struct FillRule {
    /// Which bars use the pattern.
    pub matcher: BarMatcher,
    /// Id of a pattern definition.
    pub def_id: String,
}

impl FillRule {
    /// Creates a rule.
    pub fn new(matcher: BarMatcher, def_id: impl Into<String>) -> Self {
        Self {
            matcher,
            def_id: def_id.into(),
        }
    }
}

/// Returns the `url(#id)` fill of the first rule matching `bar`.
pub(crate) fn resolve_fill(rules: &[FillRule], bar: &ComputedBarDatum<'_>) -> Option<String> {
    rules
        .iter()
        .find(|rule| rule.matcher.matches(bar))
        .map(|rule| format!("url(#{})", rule.def_id))
}

/// Extracts the definition id from a `url(#id)` fill.
pub fn fill_def_id(fill: &str) -> Option<&str> {
    fill.strip_prefix("url(#")?.strip_suffix(')')
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use peniko::Color;

    use super::*;
    use crate::datum::{BarDatum, ComputedDatum};

    fn bar<'a>(row: &'a BarDatum, id: &str, index: &str) -> ComputedBarDatum<'a> {
        ComputedBarDatum {
            key: format!("{id}.{index}"),
            data: ComputedDatum {
                id: id.to_string(),
                value: Some(1.0),
                formatted_value: "1".to_string(),
                hidden: false,
                index: 0,
                index_value: index.into(),
                data: row,
                fill: None,
            },
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            color: Color::BLACK,
            label: String::new(),
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        let row = BarDatum::new();
        let rules = [
            FillRule::new(BarMatcher::IndexValue("B".into()), "dots"),
            FillRule::new(BarMatcher::Id("fries".to_string()), "lines"),
            FillRule::new(BarMatcher::Any, "fallback"),
        ];
        assert_eq!(
            resolve_fill(&rules, &bar(&row, "fries", "A")).as_deref(),
            Some("url(#lines)")
        );
        assert_eq!(
            resolve_fill(&rules, &bar(&row, "fries", "B")).as_deref(),
            Some("url(#dots)")
        );
        assert_eq!(
            resolve_fill(&rules, &bar(&row, "kebab", "C")).as_deref(),
            Some("url(#fallback)")
        );
    }

    #[test]
    fn predicates_see_geometry() {
        let row = BarDatum::new();
        let wide = BarMatcher::predicate(|b| b.width > 5.0);
        assert!(wide.matches(&bar(&row, "a", "x")));
        assert!(BarMatcher::Key("a.x".to_string()).matches(&bar(&row, "a", "x")));
        assert_eq!(fill_def_id("url(#dots)"), Some("dots"));
        assert_eq!(fill_def_id("#dots"), None);
    }
}
