// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the bar computation pass.

use proptest::prelude::*;
use vizir_bar::{
    BarComputer, BarConfig, BarDatum, GroupMode, Layout, LegendDataFrom, ScaleLinearSpec,
};

const KEYS: [&str; 4] = ["k0", "k1", "k2", "k3"];

fn rows(values: &[Vec<Option<f64>>], key_count: usize) -> Vec<BarDatum> {
    values
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut datum = BarDatum::new().with("id", format!("row{i}"));
            for (key, value) in KEYS.iter().take(key_count).zip(row) {
                if let Some(v) = value {
                    datum.insert(*key, *v);
                }
            }
            datum
        })
        .collect()
}

fn table(max_rows: usize) -> impl Strategy<Value = Vec<Vec<Option<f64>>>> {
    prop::collection::vec(
        prop::collection::vec(prop::option::weighted(0.8, -100.0f64..100.0), KEYS.len()),
        1..max_rows,
    )
}

proptest! {
    #[test]
    fn one_bar_per_visible_non_null_pair(
        values in table(12),
        key_count in 1usize..=4,
        hidden_mask in 0u8..16,
        stacked in any::<bool>(),
    ) {
        let data = rows(&values, key_count);
        let keys = &KEYS[..key_count];
        let hidden: Vec<&str> = keys
            .iter()
            .enumerate()
            .filter(|(i, _)| hidden_mask & (1 << i) != 0)
            .map(|(_, k)| *k)
            .collect();
        let mode = if stacked { GroupMode::Stacked } else { GroupMode::Grouped };
        let config = BarConfig::new()
            .with_keys(keys.iter().copied())
            .with_group_mode(mode)
            .with_hidden_ids(hidden.iter().copied());
        let out = BarComputer::new(&config).compute(&data).expect("valid configuration");

        let expected: Vec<String> = values
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                let hidden = &hidden;
                keys.iter().zip(row).filter_map(move |(key, value)| {
                    (value.is_some() && !hidden.contains(key)).then(|| format!("{key}.row{i}"))
                })
            })
            .collect();
        let got: Vec<&str> = out.bars.iter().map(|b| b.key.as_str()).collect();
        prop_assert_eq!(got, expected);

        let legend = out.legend_sources(LegendDataFrom::Keys);
        prop_assert_eq!(legend.len(), key_count);
        for source in &legend {
            let id = source.datum.id.to_string();
            prop_assert_eq!(source.datum.hidden, hidden.contains(&id.as_str()));
        }
    }

    #[test]
    fn stacked_heights_sum_to_mapped_totals(
        values in prop::collection::vec(prop::collection::vec(-100.0f64..100.0, 3), 1..8),
        height in 50.0f64..800.0,
    ) {
        let table: Vec<Vec<Option<f64>>> = values
            .iter()
            .map(|row| row.iter().copied().map(Some).collect())
            .collect();
        let data = rows(&table, 3);
        let config = BarConfig::new()
            .with_keys(KEYS.iter().copied().take(3))
            .with_dimensions(400.0, height);
        let out = BarComputer::new(&config).compute(&data).expect("valid configuration");

        // Positive and negative values stack away from zero on their own side.
        for (i, row) in values.iter().enumerate() {
            for positive in [true, false] {
                let total: f64 = row.iter().filter(|v| (**v >= 0.0) == positive).sum();
                let heights: f64 = out
                    .bars
                    .iter()
                    .filter(|b| b.data.index == i)
                    .filter(|b| b.data.value.is_some_and(|v| (v >= 0.0) == positive))
                    .map(|b| b.height)
                    .sum();
                let mapped = (out.value_scale.map(total) - out.value_scale.map(0.0)).abs();
                prop_assert!((heights - mapped).abs() <= 1e-6, "{} != {}", heights, mapped);
            }
        }
    }

    #[test]
    fn reverse_mirrors_geometry(
        values in table(8),
        stacked in any::<bool>(),
        horizontal in any::<bool>(),
    ) {
        let data = rows(&values, KEYS.len());
        let base = BarConfig::new()
            .with_keys(KEYS)
            .with_group_mode(if stacked { GroupMode::Stacked } else { GroupMode::Grouped })
            .with_layout(if horizontal { Layout::Horizontal } else { Layout::Vertical })
            .with_value_scale(ScaleLinearSpec::new().with_round(false))
            .with_dimensions(500.0, 300.0);
        let reversed_config = base.clone().with_reverse(true);
        let normal = BarComputer::new(&base).compute(&data).expect("valid configuration");
        let reversed = BarComputer::new(&reversed_config)
            .compute(&data)
            .expect("valid configuration");

        prop_assert_eq!(normal.bars.len(), reversed.bars.len());
        for (a, b) in normal.bars.iter().zip(reversed.bars.iter().rev()) {
            prop_assert_eq!(&a.key, &b.key);
            prop_assert_eq!(a.data.value, b.data.value);
            if horizontal {
                prop_assert_eq!(a.y, b.y);
                prop_assert!((b.x - (500.0 - a.x - a.width)).abs() <= 1e-6);
            } else {
                prop_assert_eq!(a.x, b.x);
                prop_assert!((b.y - (300.0 - a.y - a.height)).abs() <= 1e-6);
            }
        }
    }
}
