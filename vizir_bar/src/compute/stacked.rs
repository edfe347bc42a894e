// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked bars: key values accumulate into contiguous segments per index.

extern crate alloc;

use alloc::vec::Vec;

use super::{Frame, KeyedValue, Placement, Segment};

/// Stacks values per row around 0.
///
/// Non-negative values stack upward from 0 and negative values downward from 0, each side in
/// key order. Values arrive grouped by row.
pub(super) fn segments(values: &[KeyedValue]) -> Vec<Segment> {
    let mut out = Vec::with_capacity(values.len());
    let mut current_row = None;
    let (mut positive, mut negative) = (0.0_f64, 0.0_f64);
    for v in values {
        if current_row != Some(v.row) {
            current_row = Some(v.row);
            positive = 0.0;
            negative = 0.0;
        }
        let side = if v.value >= 0.0 {
            &mut positive
        } else {
            &mut negative
        };
        let start = *side;
        *side += v.value;
        out.push(Segment {
            row: v.row,
            key: v.key,
            value: v.value,
            start,
            end: *side,
        });
    }
    out
}

/// Places stacked segments across the full band, or returns `None` for an empty band.
///
/// Inner padding is taken out of both ends of each segment.
pub(super) fn place(frame: &Frame<'_>, segments: &[Segment]) -> Option<Vec<Placement>> {
    if segments.is_empty() {
        return Some(Vec::new());
    }
    let band_width = frame.index_scale.band_width();
    if band_width.is_nan() || band_width <= 0.0 {
        return None;
    }

    let half = frame.inner_padding * 0.5;
    let scale = frame.value_scale;
    Some(
        segments
            .iter()
            .map(|s| {
                let p0 = scale.position(s.start);
                let p1 = scale.position(s.end);
                let (lo, hi) = if p0 <= p1 { (p0, p1) } else { (p1, p0) };
                let (lo, hi) = if hi - lo > frame.inner_padding {
                    (lo + half, hi - half)
                } else {
                    let mid = (lo + hi) * 0.5;
                    (mid, mid)
                };
                frame.place(frame.index_scale.x(s.row), band_width, lo, hi)
            })
            .collect(),
    )
}
