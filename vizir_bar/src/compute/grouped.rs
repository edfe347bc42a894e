// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped bars: one bar per visible key, side by side within the band.

extern crate alloc;

use alloc::vec::Vec;

use super::{Frame, KeyedValue, Placement, Segment};

/// Every grouped bar spans from 0 to its value.
pub(super) fn segments(values: &[KeyedValue]) -> Vec<Segment> {
    values
        .iter()
        .map(|v| Segment {
            row: v.row,
            key: v.key,
            value: v.value,
            start: 0.0,
            end: v.value,
        })
        .collect()
}

/// Places grouped segments, or returns `None` when the per-bar width is not positive.
///
/// Hidden keys give up their slot, so the remaining bars share the band.
pub(super) fn place(
    frame: &Frame<'_>,
    segments: &[Segment],
    visible_keys: &[bool],
) -> Option<Vec<Placement>> {
    if segments.is_empty() {
        return Some(Vec::new());
    }

    let mut slots = Vec::with_capacity(visible_keys.len());
    let mut count = 0_usize;
    for &visible in visible_keys {
        slots.push(count);
        if visible {
            count += 1;
        }
    }

    let k = count as f64;
    let ip = frame.inner_padding;
    let bar_width = (frame.index_scale.band_width() - ip * (k - 1.0)) / k;
    if bar_width.is_nan() || bar_width <= 0.0 {
        return None;
    }

    let scale = frame.value_scale;
    Some(
        segments
            .iter()
            .map(|s| {
                let slot = slots[s.key] as f64;
                let index_start = frame.index_scale.x(s.row) + slot * (bar_width + ip);
                frame.place(
                    index_start,
                    bar_width,
                    scale.position(s.start),
                    scale.position(s.end),
                )
            })
            .collect(),
    )
}
