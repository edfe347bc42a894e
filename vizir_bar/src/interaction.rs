// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer interaction: hit-testing, hover tracking and tooltip payloads.
//!
//! Positions are in inner-area coordinates. Nothing here owns an event loop; a host feeds
//! pointer events in and receives callbacks and tooltips back.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;

use core::fmt;

use kurbo::Point;

use crate::datum::{BarTooltip, ComputedBarDatum};

/// Returns the topmost bar under `point`.
///
/// Bars painted later win, so the search runs back to front.
pub fn bar_at<'b, 'a>(
    bars: &'b [ComputedBarDatum<'a>],
    point: Point,
) -> Option<&'b ComputedBarDatum<'a>> {
    bars.iter().rev().find(|bar| {
        point.x >= bar.x
            && point.x <= bar.x + bar.width
            && point.y >= bar.y
            && point.y <= bar.y + bar.height
    })
}

/// A pointer callback.
pub type BarHandler = Arc<dyn Fn(&ComputedBarDatum<'_>, Point) + Send + Sync>;

/// Optional pointer callbacks.
#[derive(Clone, Default)]
pub struct BarHandlers {
    /// Called when a bar is clicked.
    pub on_click: Option<BarHandler>,
    /// Called when the pointer enters a bar.
    pub on_mouse_enter: Option<BarHandler>,
    /// Called when the pointer leaves a bar.
    pub on_mouse_leave: Option<BarHandler>,
}

impl fmt::Debug for BarHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = |h: &Option<BarHandler>| if h.is_some() { "<fn>" } else { "None" };
        f.debug_struct("BarHandlers")
            .field("on_click", &set(&self.on_click))
            .field("on_mouse_enter", &set(&self.on_mouse_enter))
            .field("on_mouse_leave", &set(&self.on_mouse_leave))
            .finish()
    }
}

impl BarHandlers {
    /// Sets the click callback.
    pub fn with_on_click(
        mut self,
        f: impl Fn(&ComputedBarDatum<'_>, Point) + Send + Sync + 'static,
    ) -> Self {
        self.on_click = Some(Arc::new(f));
        self
    }

    /// Sets the enter callback.
    pub fn with_on_mouse_enter(
        mut self,
        f: impl Fn(&ComputedBarDatum<'_>, Point) + Send + Sync + 'static,
    ) -> Self {
        self.on_mouse_enter = Some(Arc::new(f));
        self
    }

    /// Sets the leave callback.
    pub fn with_on_mouse_leave(
        mut self,
        f: impl Fn(&ComputedBarDatum<'_>, Point) + Send + Sync + 'static,
    ) -> Self {
        self.on_mouse_leave = Some(Arc::new(f));
        self
    }
}

/// Tracks which bar the pointer is over, by key, across passes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverState {
    hovered: Option<String>,
}

impl HoverState {
    /// Creates an idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the key of the hovered bar.
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Handles a pointer move and returns the tooltip to show, if any.
    ///
    /// Fires `on_mouse_leave` for the previously hovered bar and `on_mouse_enter` for the new one
    /// when the hovered bar changes. Does nothing when `interactive` is off.
    pub fn pointer_move<'a>(
        &mut self,
        bars: &[ComputedBarDatum<'a>],
        point: Point,
        handlers: &BarHandlers,
        interactive: bool,
    ) -> Option<BarTooltip<'a>> {
        if !interactive {
            return None;
        }
        let hit = bar_at(bars, point);
        let hit_key = hit.map(|b| b.key.as_str());
        if hit_key != self.hovered.as_deref() {
            self.leave(bars, point, handlers);
            if let Some(bar) = hit {
                if let Some(enter) = &handlers.on_mouse_enter {
                    enter(bar, point);
                }
                self.hovered = Some(bar.key.clone());
            }
        }
        hit.and_then(BarTooltip::from_bar)
    }

    /// Handles the pointer leaving the chart.
    pub fn pointer_leave(
        &mut self,
        bars: &[ComputedBarDatum<'_>],
        point: Point,
        handlers: &BarHandlers,
        interactive: bool,
    ) {
        if interactive {
            self.leave(bars, point, handlers);
        }
    }

    fn leave(&mut self, bars: &[ComputedBarDatum<'_>], point: Point, handlers: &BarHandlers) {
        let Some(key) = self.hovered.take() else {
            return;
        };
        if let (Some(leave), Some(bar)) = (
            &handlers.on_mouse_leave,
            bars.iter().find(|b| b.key == key),
        ) {
            leave(bar, point);
        }
    }

    /// Handles a click; returns `true` if a bar was clicked.
    pub fn click(
        &self,
        bars: &[ComputedBarDatum<'_>],
        point: Point,
        handlers: &BarHandlers,
        interactive: bool,
    ) -> bool {
        if !interactive {
            return false;
        }
        match bar_at(bars, point) {
            Some(bar) => {
                if let Some(click) = &handlers.on_click {
                    click(bar, point);
                }
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;
    use alloc::vec::Vec;
    use std::sync::Mutex;

    use peniko::Color;

    use super::*;
    use crate::datum::{BarDatum, ComputedDatum};

    fn bar<'a>(row: &'a BarDatum, key: &str, x: f64, value: Option<f64>) -> ComputedBarDatum<'a> {
        ComputedBarDatum {
            key: key.to_string(),
            data: ComputedDatum {
                id: "v".to_string(),
                value,
                formatted_value: String::new(),
                hidden: false,
                index: 0,
                index_value: key.into(),
                data: row,
                fill: None,
            },
            x,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            color: Color::BLACK,
            label: key.to_string(),
        }
    }

    #[test]
    fn later_bars_win_hit_tests() {
        let row = BarDatum::new();
        let bars = [bar(&row, "a", 0.0, Some(1.0)), bar(&row, "b", 5.0, Some(2.0))];
        assert_eq!(bar_at(&bars, Point::new(7.0, 5.0)).map(|b| b.key.as_str()), Some("b"));
        assert_eq!(bar_at(&bars, Point::new(2.0, 5.0)).map(|b| b.key.as_str()), Some("a"));
        assert!(bar_at(&bars, Point::new(20.0, 5.0)).is_none());
    }

    #[test]
    fn hover_fires_enter_and_leave_once() {
        let row = BarDatum::new();
        let bars = [bar(&row, "a", 0.0, Some(1.0)), bar(&row, "b", 20.0, None)];
        let log = Arc::new(Mutex::new(Vec::new()));
        let (enter_log, leave_log) = (log.clone(), log.clone());
        let handlers = BarHandlers::default()
            .with_on_mouse_enter(move |b, _| {
                enter_log.lock().unwrap().push(alloc::format!("enter {}", b.key));
            })
            .with_on_mouse_leave(move |b, _| {
                leave_log.lock().unwrap().push(alloc::format!("leave {}", b.key));
            });

        let mut hover = HoverState::new();
        let tip = hover.pointer_move(&bars, Point::new(5.0, 5.0), &handlers, true);
        assert_eq!(tip.map(|t| t.value), Some(1.0));
        assert!(hover.pointer_move(&bars, Point::new(6.0, 5.0), &handlers, true).is_some());
        // Null bars are hoverable but carry no tooltip.
        assert!(hover.pointer_move(&bars, Point::new(25.0, 5.0), &handlers, true).is_none());
        assert_eq!(hover.hovered(), Some("b"));
        hover.pointer_leave(&bars, Point::ZERO, &handlers, true);
        assert_eq!(hover.hovered(), None);

        assert_eq!(
            *log.lock().unwrap(),
            ["enter a", "leave a", "enter b", "leave b"]
        );
    }

    #[test]
    fn non_interactive_charts_ignore_pointers() {
        let row = BarDatum::new();
        let bars = [bar(&row, "a", 0.0, Some(1.0))];
        let clicked = Arc::new(Mutex::new(0));
        let counter = clicked.clone();
        let handlers =
            BarHandlers::default().with_on_click(move |_, _| *counter.lock().unwrap() += 1);
        let mut hover = HoverState::new();
        assert!(hover.pointer_move(&bars, Point::new(1.0, 1.0), &handlers, false).is_none());
        assert!(!hover.click(&bars, Point::new(1.0, 1.0), &handlers, false));
        assert!(hover.click(&bars, Point::new(1.0, 1.0), &handlers, true));
        assert_eq!(*clicked.lock().unwrap(), 1);
    }
}
