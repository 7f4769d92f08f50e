#![forbid(unsafe_code)]

//! One slide-in sheet and its open/close state machine.
//!
//! # State machine
//!
//! ```text
//! Entering ──slide-in timer──▶ Open ──close()──▶ Closing ──removal timer──▶ Closed
//! ```
//!
//! - **Entering**: geometry is computed, the panel is parked off-screen at
//!   the right edge (`translate(viewport, 0)`), the scrim is shown at low
//!   opacity, and a short timer is armed so the parked position paints
//!   before the panel slides to its rest offset.
//! - **Open**: the panel rests at `translate(inset - peek, 0)`.
//! - **Closing**: the scrim fades to transparent, the panel slides back
//!   off-screen, and a removal timer is armed.
//! - **Closed**: the root node is unmounted and the `closed` notification
//!   has been delivered. Terminal; the sheet is never reused.
//!
//! # Invariants
//!
//! - Phases only move forward, one step at a time.
//! - Geometry is computed before the sheet enters `Entering`.
//! - `close()` is idempotent: at most one removal timer, at most one
//!   `closed` notification.
//! - Closing an `Entering` sheet cancels its slide-in timer and walks the
//!   phase through `Open` before `Closing`.
//!
//! # Failure Modes
//!
//! A missing role target on the surface is a [`PreconditionFault`]; it is
//! raised (logged, then panics) and never recovered.
//!
//! [`PreconditionFault`]: sheetui_core::surface::PreconditionFault

use sheetui_core::geometry::{SheetGeometry, compute_geometry_with_max};
use sheetui_core::surface::{SheetId, SheetRole, SheetSurface, StyleChange};
use sheetui_core::timer::{TimerId, TimerQueue};

use crate::config::SheetConfig;

/// Current phase of a sheet's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SheetPhase {
    /// Parked off-screen, waiting for the slide-in timer.
    Entering,
    /// At rest and visible.
    Open,
    /// Sliding out, waiting for the removal timer.
    Closing,
    /// Removed. Terminal.
    Closed,
}

impl SheetPhase {
    /// Whether the root node is still mounted.
    #[inline]
    pub fn is_mounted(self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Whether a timer-driven transition is in progress.
    #[inline]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::Entering | Self::Closing)
    }

    /// Whether the sheet is on its way out (or gone).
    #[inline]
    pub fn is_leaving(self) -> bool {
        matches!(self, Self::Closing | Self::Closed)
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::Entering => Some(Self::Open),
            Self::Open => Some(Self::Closing),
            Self::Closing => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    /// Lowercase name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entering => "entering",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }
}

/// Cross-sheet treatment assigned by the stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackVisual {
    /// `pointer-events` enabled on the panel.
    pub interactive: bool,
    /// Brightness filter on the panel; `1.0` is undimmed.
    pub brightness: f32,
    /// Leftward shift from the rest offset, in pixels.
    pub peek_offset: u32,
}

impl StackVisual {
    /// Active sheet, or the only sheet: interactive, undimmed, unshifted.
    pub const FULL_VIEW: Self = Self {
        interactive: true,
        brightness: 1.0,
        peek_offset: 0,
    };

    /// A sheet on its way out: no pointer input, otherwise untouched.
    pub const LEAVING: Self = Self {
        interactive: false,
        brightness: 1.0,
        peek_offset: 0,
    };

    /// A sheet `depth` levels below the active one.
    #[must_use]
    pub fn covered(depth: u32, brightness: f32, peek_per_level: u32) -> Self {
        Self {
            interactive: false,
            brightness,
            peek_offset: peek_per_level.saturating_mul(depth),
        }
    }

    /// Whether a brightness reduction is applied.
    #[inline]
    #[must_use]
    pub fn is_dimmed(&self) -> bool {
        self.brightness < 1.0
    }
}

impl Default for StackVisual {
    fn default() -> Self {
        Self::FULL_VIEW
    }
}

/// Timer payloads a sheet schedules on the stack's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetTimer {
    /// Move the panel from off-screen to its rest offset.
    SlideIn(SheetId),
    /// Unmount the sheet and notify `closed`.
    Remove(SheetId),
}

impl SheetTimer {
    /// Sheet the timer belongs to.
    #[must_use]
    pub fn sheet(self) -> SheetId {
        match self {
            Self::SlideIn(id) | Self::Remove(id) => id,
        }
    }
}

/// Notification produced by a sheet when a timer advances it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetSignal {
    /// The sheet reached its rest offset.
    Opened,
    /// The sheet was unmounted and its `closed` notification delivered.
    Closed,
}

/// One open panel.
#[derive(Debug, Clone)]
pub struct Sheet {
    id: SheetId,
    phase: SheetPhase,
    geometry: SheetGeometry,
    visual: StackVisual,
    config: SheetConfig,
    enter_timer: Option<TimerId>,
    remove_timer: Option<TimerId>,
}

impl Sheet {
    /// Mount a sheet with `content_html` and start its entrance.
    ///
    /// The root is mounted, geometry is computed, the panel is parked
    /// off-screen, the scrim is shown, and the slide-in timer is armed.
    pub fn open<S: SheetSurface + ?Sized>(
        id: SheetId,
        content_html: &str,
        config: SheetConfig,
        surface: &mut S,
        timers: &mut TimerQueue<SheetTimer>,
    ) -> Self {
        surface.mount(id, content_html);
        let geometry = compute_geometry_with_max(surface.viewport_width(), config.max_width);
        let mut sheet = Self {
            id,
            phase: SheetPhase::Entering,
            geometry,
            visual: StackVisual::FULL_VIEW,
            config,
            enter_timer: None,
            remove_timer: None,
        };

        sheet.apply_max_width(surface);
        let parked = sheet.offscreen_x(&*surface);
        sheet.apply(surface, SheetRole::Panel, StyleChange::Translate { x: parked, y: 0 });
        sheet.apply(
            surface,
            SheetRole::Overlay,
            StyleChange::Opacity(sheet.config.scrim_opacity),
        );
        sheet.apply(surface, SheetRole::Overlay, StyleChange::Visibility(true));
        sheet.enter_timer = Some(timers.schedule(sheet.config.enter_delay, SheetTimer::SlideIn(id)));

        tracing::debug!(
            message = "sheet.open",
            sheet = id.get(),
            inset = geometry.inset,
            panel_width = geometry.panel_width
        );
        sheet
    }

    /// Identity of this sheet.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SheetId {
        self.id
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> SheetPhase {
        self.phase
    }

    /// Geometry computed at open or at the last width update.
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> SheetGeometry {
        self.geometry
    }

    /// Stacking treatment last assigned by the stack.
    #[inline]
    #[must_use]
    pub fn visual(&self) -> StackVisual {
        self.visual
    }

    /// Whether the panel currently accepts pointer input.
    #[inline]
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.visual.interactive
    }

    /// Whether the panel is dimmed.
    #[inline]
    #[must_use]
    pub fn is_dimmed(&self) -> bool {
        self.visual.is_dimmed()
    }

    /// Whether a close has started (or finished).
    #[inline]
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.phase.is_leaving()
    }

    /// Panel translation expected at rest, after the stacking shift.
    #[must_use]
    pub fn rest_x(&self) -> i32 {
        let inset = i64::from(self.geometry.rest_offset());
        let peek = i64::from(self.visual.peek_offset);
        clamp_px(inset - peek)
    }

    /// Recompute geometry and re-apply the max-width constraint.
    ///
    /// The panel's position is left alone.
    pub fn update_width<S: SheetSurface + ?Sized>(&mut self, surface: &mut S) {
        if !self.phase.is_mounted() {
            return;
        }
        self.geometry =
            compute_geometry_with_max(surface.viewport_width(), self.config.max_width);
        self.apply_max_width(surface);
        tracing::trace!(
            message = "sheet.update_width",
            sheet = self.id.get(),
            panel_width = self.geometry.panel_width
        );
    }

    /// Start closing. Returns `false` if a close already started.
    pub fn close<S: SheetSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        timers: &mut TimerQueue<SheetTimer>,
    ) -> bool {
        match self.phase {
            SheetPhase::Closing | SheetPhase::Closed => {
                tracing::trace!(message = "sheet.close_ignored", sheet = self.id.get());
                return false;
            }
            SheetPhase::Entering => {
                if let Some(timer) = self.enter_timer.take() {
                    timers.cancel(timer);
                }
                self.advance_phase(SheetPhase::Open);
            }
            SheetPhase::Open => {}
        }
        self.advance_phase(SheetPhase::Closing);

        self.apply(surface, SheetRole::Overlay, StyleChange::Opacity(0.0));
        let parked = self.offscreen_x(&*surface);
        self.apply(surface, SheetRole::Panel, StyleChange::Translate { x: parked, y: 0 });
        self.remove_timer = Some(timers.schedule(self.config.close_delay, SheetTimer::Remove(self.id)));

        tracing::debug!(message = "sheet.close", sheet = self.id.get());
        true
    }

    /// Apply a stacking treatment.
    ///
    /// Pointer gating and brightness take effect immediately. The peek shift
    /// only moves the panel while it is at rest; an off-screen panel picks it
    /// up when it slides in.
    pub fn set_visual<S: SheetSurface + ?Sized>(&mut self, visual: StackVisual, surface: &mut S) {
        if !self.phase.is_mounted() {
            return;
        }
        let moved = visual.peek_offset != self.visual.peek_offset;
        self.visual = visual;
        self.apply(surface, SheetRole::Panel, StyleChange::PointerEvents(visual.interactive));
        self.apply(surface, SheetRole::Panel, StyleChange::Brightness(visual.brightness));
        if moved && self.phase == SheetPhase::Open {
            let x = self.rest_x();
            self.apply(surface, SheetRole::Panel, StyleChange::Translate { x, y: 0 });
        }
    }

    /// React to one of this sheet's timers firing.
    ///
    /// Stale timers (for a phase already left) are ignored.
    pub fn on_timer<S: SheetSurface + ?Sized>(
        &mut self,
        timer: SheetTimer,
        surface: &mut S,
    ) -> Option<SheetSignal> {
        match (timer, self.phase) {
            (SheetTimer::SlideIn(_), SheetPhase::Entering) => {
                self.enter_timer = None;
                let x = self.rest_x();
                self.apply(surface, SheetRole::Panel, StyleChange::Translate { x, y: 0 });
                self.advance_phase(SheetPhase::Open);
                tracing::debug!(message = "sheet.slide_in", sheet = self.id.get(), x);
                Some(SheetSignal::Opened)
            }
            (SheetTimer::Remove(_), SheetPhase::Closing) => {
                self.remove_timer = None;
                surface.unmount(self.id);
                self.advance_phase(SheetPhase::Closed);
                surface.notify_closed(self.id);
                tracing::debug!(message = "sheet.closed", sheet = self.id.get());
                Some(SheetSignal::Closed)
            }
            (timer, phase) => {
                tracing::trace!(
                    message = "sheet.stale_timer",
                    sheet = self.id.get(),
                    timer = ?timer,
                    phase = phase.as_str()
                );
                None
            }
        }
    }

    /// Cancel pending timers and unmount without notifying `closed`.
    pub(crate) fn discard<S: SheetSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        timers: &mut TimerQueue<SheetTimer>,
    ) {
        for timer in [self.enter_timer.take(), self.remove_timer.take()]
            .into_iter()
            .flatten()
        {
            timers.cancel(timer);
        }
        if self.phase.is_mounted() {
            surface.unmount(self.id);
        }
    }

    fn advance_phase(&mut self, to: SheetPhase) {
        debug_assert_eq!(
            self.phase.next(),
            Some(to),
            "sheet {} cannot go from {} to {}",
            self.id,
            self.phase.as_str(),
            to.as_str()
        );
        tracing::trace!(
            message = "sheet.phase",
            sheet = self.id.get(),
            from = self.phase.as_str(),
            to = to.as_str()
        );
        self.phase = to;
    }

    fn apply_max_width<S: SheetSurface + ?Sized>(&self, surface: &mut S) {
        self.apply(
            surface,
            SheetRole::Panel,
            StyleChange::MaxWidth(self.geometry.panel_width),
        );
    }

    fn offscreen_x<S: SheetSurface + ?Sized>(&self, surface: &S) -> i32 {
        clamp_px(i64::from(surface.viewport_width()))
    }

    fn apply<S: SheetSurface + ?Sized>(&self, surface: &mut S, role: SheetRole, change: StyleChange) {
        if let Err(fault) = surface.apply(self.id, role, change) {
            fault.raise();
        }
    }
}

fn clamp_px(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
