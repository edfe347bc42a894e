// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading rows from JSON.

use vizir_bar::{BarComputer, BarConfig, BarDatum, DatumValue, GroupMode, LegendDataFrom};

const ROWS: &str = r#"[
    {"country": "AD", "hot dog": 120, "burger": 48.5, "kebab": null},
    {"country": "AE", "hot dog": "75", "burger": 12, "kebab": "n/a"},
    {"country": "AF", "hot dog": 30, "burger": null}
]"#;

fn load() -> Vec<BarDatum> {
    serde_json::from_str(ROWS).expect("rows parse")
}

#[test]
fn null_fields_are_dropped_on_load() {
    let rows = load();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].get("kebab").is_none());
    assert_eq!(rows[0].get("burger"), Some(&DatumValue::Number(48.5)));
    assert_eq!(rows[1].get("hot dog"), Some(&DatumValue::from("75")));
    assert_eq!(rows[1].value("hot dog"), Some(75.0));
    assert_eq!(rows[1].value("kebab"), None);
    let fields: Vec<_> = rows[0].iter().map(|(k, _)| k).collect();
    assert_eq!(fields, ["country", "hot dog", "burger"]);
}

#[test]
fn loaded_rows_compute_and_skip_nulls() {
    let rows = load();
    let config = BarConfig::new()
        .with_keys(["hot dog", "burger", "kebab"])
        .with_index_field("country")
        .with_group_mode(GroupMode::Grouped);
    let out = BarComputer::new(&config).compute(&rows).expect("valid configuration");

    let keys: Vec<_> = out.bars.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, ["hot dog.AD", "burger.AD", "hot dog.AE", "burger.AE", "hot dog.AF"]);
    assert_eq!(out.bars[2].data.value, Some(75.0));
    assert_eq!(out.value_scale.domain_min(), 0.0);

    // Keys without a single value still get a legend entry.
    let legend = out.legend_sources(LegendDataFrom::Keys);
    assert_eq!(legend.len(), 3);
}

#[test]
fn rows_serialize_in_field_order() {
    let row = BarDatum::new().with("id", "A").with("v", 3.5).with("n", "x");
    let json = serde_json::to_string(&row).expect("row serializes");
    assert_eq!(json, r#"{"id":"A","v":3.5,"n":"x"}"#);
    let back: BarDatum = serde_json::from_str(&json).expect("row parses");
    assert_eq!(back.value("v"), Some(3.5));
}
