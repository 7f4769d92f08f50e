#![forbid(unsafe_code)]

//! Clock-synced driver around a [`SheetStack`].
//!
//! The browser binding owns one `SheetHost` over the DOM surface and a wall
//! clock. Every entry point first brings the stack's timers up to the
//! clock, so a host that only calls in on user input (or on a coarse
//! timeout) still sees slide-ins and removals land in order. Native tests
//! use the same type over `HeadlessSurface` and a `DeterministicClock`.

use std::time::Duration;

use sheetui_core::{MonotonicClock, SheetId, SheetSurface};
use sheetui_stack::{SheetStack, StackConfig, StackEvent};

use crate::markup::{is_close_action, parse_sheet_id};

/// A sheet stack paired with the clock that drives it.
#[derive(Debug)]
pub struct SheetHost<S: SheetSurface, C: MonotonicClock> {
    stack: SheetStack<S>,
    clock: C,
    epoch: Duration,
}

impl<S: SheetSurface, C: MonotonicClock> SheetHost<S, C> {
    /// Create a host; stack time zero is the clock's current reading.
    pub fn new(surface: S, config: StackConfig, clock: C) -> Self {
        let epoch = clock.now_mono();
        Self {
            stack: SheetStack::new(surface, config),
            clock,
            epoch,
        }
    }

    /// Fire every timer due by the clock and return the queued events.
    ///
    /// This is the only place events leave the host. Entry points advance
    /// time but leave events queued for the next `sync`.
    #[must_use = "dropping the events loses `closed` notifications"]
    pub fn sync(&mut self) -> Vec<StackEvent> {
        self.catch_up();
        self.stack.drain_events().collect()
    }

    fn catch_up(&mut self) {
        let now = self.clock.now_mono().saturating_sub(self.epoch);
        self.stack.advance_to(now);
    }

    /// Open a sheet showing `html`.
    pub fn add_sheet(&mut self, html: &str) -> SheetId {
        self.catch_up();
        self.stack.open_from_content(html)
    }

    /// Close sheet `id`. Returns `false` for unknown or already closing ids.
    pub fn close(&mut self, id: SheetId) -> bool {
        self.catch_up();
        self.stack.close(id)
    }

    /// Close the topmost sheet that is not already closing.
    pub fn close_top(&mut self) -> Option<SheetId> {
        self.catch_up();
        self.stack.close_top()
    }

    /// Route a declarative `data-action` from inside a sheet root.
    ///
    /// `sheet_attr` is the root's `data-sheet-id`. Returns `true` when a
    /// close started.
    pub fn dispatch_action(&mut self, action: &str, sheet_attr: &str) -> bool {
        if !is_close_action(action) {
            return false;
        }
        let Some(id) = parse_sheet_id(sheet_attr) else {
            tracing::warn!(message = "host.bad_sheet_id", value = sheet_attr);
            return false;
        };
        self.close(id)
    }

    /// Recompute every sheet's geometry from the current viewport.
    pub fn update_widths(&mut self) {
        self.catch_up();
        self.stack.update_widths();
    }

    /// Time until the next animation step, measured on the host clock.
    #[must_use]
    pub fn next_wake(&self) -> Option<Duration> {
        let now = self.clock.now_mono().saturating_sub(self.epoch);
        self.stack
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(now))
    }

    /// Drop every sheet without notifications.
    pub fn disconnect(&mut self) -> usize {
        self.stack.disconnect()
    }

    /// The driven stack.
    #[must_use]
    pub fn stack(&self) -> &SheetStack<S> {
        &self.stack
    }

    /// Mutable access to the driven stack.
    pub fn stack_mut(&mut self) -> &mut SheetStack<S> {
        &mut self.stack
    }

    /// Mutable access to the clock, for hosts that set time explicitly.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
