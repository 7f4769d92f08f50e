#![forbid(unsafe_code)]

//! Ordered stack of sheets with z-order visuals.
//!
//! The `SheetStack` owns every open [`Sheet`] in insertion order (oldest at
//! the bottom). It mounts new sheets on top, routes timer expirations to the
//! sheet that armed them, and removes a sheet when it reports `closed`.
//!
//! # Stacking visuals
//!
//! After every mutation the stack re-derives each sheet's treatment:
//!
//! - a single sheet gets the full view (interactive, undimmed, unshifted);
//! - otherwise the topmost sheet that is not closing is *active* and gets
//!   the full view;
//! - sheets below the active one are pointer-disabled, dimmed, and shifted
//!   left by `peek_offset` per level so their edge peeks out;
//! - closing sheets are pointer-disabled and left undimmed.
//!
//! # Invariants
//!
//! - Order is strictly insertion order. Removal takes a sheet out of its
//!   actual position, wherever it is.
//! - "Topmost" is always the last remaining element, never the last one
//!   focused.
//! - At most one sheet is interactive when two or more are stacked.
//!
//! # Failure Modes
//!
//! - `close()` / `update_width()` for an unknown id return `false`.
//! - A failed URL load leaves the stack untouched.
//!
//! # Example
//!
//! ```ignore
//! let mut stack = SheetStack::new(HeadlessSurface::new(1200), StackConfig::default());
//! let first = stack.open_from_content("<p>Hi</p>");
//! let second = stack.open_from_content("<p>Nested</p>");
//! stack.advance(Duration::from_millis(100));
//! stack.close(second);
//! stack.advance(Duration::from_millis(500));
//! assert_eq!(stack.ids(), vec![first]);
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use sheetui_core::surface::{SheetId, SheetSurface};
use sheetui_core::timer::TimerQueue;

use crate::config::StackConfig;
use crate::content::{ContentLoadError, ContentLoader, load_content};
use crate::sheet::{Sheet, SheetPhase, SheetSignal, SheetTimer, StackVisual};

/// Notification a host can drain from the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackEvent {
    /// A sheet was mounted on top of the stack.
    Opened(SheetId),
    /// A sheet finished its close animation and was removed.
    Closed(SheetId),
}

/// Stack of open sheets over one surface.
#[derive(Debug)]
pub struct SheetStack<S: SheetSurface> {
    surface: S,
    config: StackConfig,
    /// Bottom to top.
    sheets: Vec<Sheet>,
    timers: TimerQueue<SheetTimer>,
    next_id: u64,
    events: VecDeque<StackEvent>,
}

impl<S: SheetSurface> SheetStack<S> {
    /// Create an empty stack drawing on `surface`.
    pub fn new(surface: S, config: StackConfig) -> Self {
        Self {
            surface,
            config,
            sheets: Vec::new(),
            timers: TimerQueue::new(),
            next_id: 1,
            events: VecDeque::new(),
        }
    }

    // --- Opening ---

    /// Open a sheet showing `html` on top of the stack.
    ///
    /// `html` is trusted and inserted verbatim.
    pub fn open_from_content(&mut self, html: &str) -> SheetId {
        let id = SheetId::new(self.next_id);
        self.next_id += 1;

        let sheet = Sheet::open(
            id,
            html,
            self.config.sheet.clone(),
            &mut self.surface,
            &mut self.timers,
        );
        self.sheets.push(sheet);
        self.events.push_back(StackEvent::Opened(id));
        tracing::debug!(message = "stack.push", sheet = id.get(), depth = self.sheets.len());

        self.apply_stacking_visuals();
        id
    }

    /// Load `url` through `loader`, then open a sheet with the result.
    ///
    /// The load is the only suspension point. On failure nothing is mounted
    /// and the stack is unchanged.
    pub async fn open_from_url<L: ContentLoader + ?Sized>(
        &mut self,
        loader: &L,
        url: &str,
    ) -> Result<SheetId, ContentLoadError> {
        let html = load_content(loader, url).await?;
        Ok(self.open_from_content(&html))
    }

    // --- Closing ---

    /// Start closing `id`. Returns `false` if the id is unknown or already
    /// closing.
    pub fn close(&mut self, id: SheetId) -> bool {
        let Some(idx) = self.position(id) else {
            tracing::trace!(message = "stack.close_unknown", sheet = id.get());
            return false;
        };
        let started = self.sheets[idx].close(&mut self.surface, &mut self.timers);
        if started {
            self.apply_stacking_visuals();
        }
        started
    }

    /// Start closing the topmost sheet that is not already closing.
    pub fn close_top(&mut self) -> Option<SheetId> {
        let id = self.active()?;
        self.close(id).then_some(id)
    }

    fn on_sheet_closed(&mut self, id: SheetId) {
        if let Some(idx) = self.position(id) {
            self.sheets.remove(idx);
            tracing::debug!(
                message = "stack.remove",
                sheet = id.get(),
                position = idx,
                depth = self.sheets.len()
            );
        }
        self.events.push_back(StackEvent::Closed(id));
        self.apply_stacking_visuals();
    }

    // --- Time ---

    /// Advance the stack's clock by `dt` and fire due timers.
    pub fn advance(&mut self, dt: Duration) {
        self.timers.advance(dt);
        self.fire_due();
    }

    /// Advance the stack's clock to `now` and fire due timers.
    pub fn advance_to(&mut self, now: Duration) {
        self.timers.advance_to(now);
        self.fire_due();
    }

    /// Current stack time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// When the next animation step is due, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    fn fire_due(&mut self) {
        while let Some((_, timer)) = self.timers.pop_due() {
            let id = timer.sheet();
            let Some(idx) = self.position(id) else {
                continue;
            };
            match self.sheets[idx].on_timer(timer, &mut self.surface) {
                Some(SheetSignal::Closed) => self.on_sheet_closed(id),
                Some(SheetSignal::Opened) | None => {}
            }
        }
    }

    // --- Geometry ---

    /// Recompute geometry for one sheet. Returns `false` for unknown ids.
    pub fn update_width(&mut self, id: SheetId) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.sheets[idx].update_width(&mut self.surface);
                true
            }
            None => false,
        }
    }

    /// Recompute geometry for every sheet.
    pub fn update_widths(&mut self) {
        for sheet in &mut self.sheets {
            sheet.update_width(&mut self.surface);
        }
    }

    // --- Visuals ---

    /// Re-derive and apply every sheet's stacking treatment.
    pub fn apply_stacking_visuals(&mut self) {
        let stacking = &self.config.stacking;
        let count = self.sheets.len();
        let active = self.active_index();

        for (idx, sheet) in self.sheets.iter_mut().enumerate() {
            let visual = if count == 1 {
                StackVisual::FULL_VIEW
            } else if sheet.is_closing() {
                StackVisual::LEAVING
            } else {
                match active {
                    Some(top) if idx == top => StackVisual::FULL_VIEW,
                    Some(top) => {
                        let depth = u32::try_from(top - idx).unwrap_or(u32::MAX);
                        StackVisual::covered(depth, stacking.dim_brightness, stacking.peek_offset)
                    }
                    None => StackVisual::LEAVING,
                }
            };
            sheet.set_visual(visual, &mut self.surface);
        }

        tracing::trace!(
            message = "stack.visuals",
            depth = count,
            active = active.map(|i| self.sheets[i].id().get())
        );
    }

    // --- Queries ---

    /// Number of sheets in the stack, including closing ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Sheet ids, bottom first.
    #[must_use]
    pub fn ids(&self) -> Vec<SheetId> {
        self.sheets.iter().map(Sheet::id).collect()
    }

    /// Sheets, bottom first.
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    /// Look up a sheet.
    #[must_use]
    pub fn get(&self, id: SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id() == id)
    }

    /// Position of `id`, `0` being the bottom.
    #[must_use]
    pub fn position(&self, id: SheetId) -> Option<usize> {
        self.sheets.iter().position(|s| s.id() == id)
    }

    /// Last element of the stack, closing or not.
    #[must_use]
    pub fn top(&self) -> Option<SheetId> {
        self.sheets.last().map(Sheet::id)
    }

    /// Topmost sheet that is not closing.
    #[must_use]
    pub fn active(&self) -> Option<SheetId> {
        self.active_index().map(|i| self.sheets[i].id())
    }

    /// Phase of `id`, if it is still in the stack.
    #[must_use]
    pub fn phase(&self, id: SheetId) -> Option<SheetPhase> {
        self.get(id).map(Sheet::phase)
    }

    fn active_index(&self) -> Option<usize> {
        self.sheets.iter().rposition(|s| !s.is_closing())
    }

    /// Drain queued stack events, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = StackEvent> + '_ {
        self.events.drain(..)
    }

    /// The stack configuration.
    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// The surface sheets are drawn on.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface (viewport changes, host wiring).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // --- Lifecycle ---

    /// Tear down: cancel every pending animation and unmount every sheet
    /// without `closed` notifications. Returns how many sheets were dropped.
    pub fn disconnect(&mut self) -> usize {
        let dropped = self.sheets.len();
        for mut sheet in self.sheets.drain(..) {
            sheet.discard(&mut self.surface, &mut self.timers);
        }
        self.timers.clear();
        self.events.clear();
        tracing::debug!(message = "stack.disconnect", dropped);
        dropped
    }

    /// Consume the stack, returning its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetConfig;
    use sheetui_core::headless::HeadlessSurface;
    use sheetui_core::surface::SheetRole;

    const ENTER: Duration = Duration::from_millis(100);
    const CLOSE: Duration = Duration::from_millis(500);

    fn stack() -> SheetStack<HeadlessSurface> {
        SheetStack::new(HeadlessSurface::new(1200), StackConfig::default())
    }

    fn interactive(stack: &SheetStack<HeadlessSurface>) -> Vec<bool> {
        stack.sheets().map(Sheet::is_interactive).collect()
    }

    fn dimmed(stack: &SheetStack<HeadlessSurface>) -> Vec<bool> {
        stack.sheets().map(Sheet::is_dimmed).collect()
    }

    #[test]
    fn open_assigns_increasing_ids_in_order() {
        let mut s = stack();
        let a = s.open_from_content("<p>a</p>");
        let b = s.open_from_content("<p>b</p>");
        assert!(a < b);
        assert_eq!(s.ids(), vec![a, b]);
        assert_eq!(s.surface().mounted_ids(), vec![a, b]);
        assert_eq!(s.top(), Some(b));
        assert_eq!(s.active(), Some(b));
    }

    #[test]
    fn single_sheet_gets_full_view() {
        let mut s = stack();
        let a = s.open_from_content("<p>Hi</p>");
        assert_eq!(s.get(a).map(Sheet::visual), Some(StackVisual::FULL_VIEW));
        let panel = s.surface().style(a, SheetRole::Panel).unwrap();
        assert_eq!(panel.pointer_events, Some(true));
        assert_eq!(panel.brightness, Some(1.0));
    }

    #[test]
    fn lower_sheets_are_dimmed_and_gated() {
        let mut s = stack();
        s.open_from_content("a");
        s.open_from_content("b");
        s.open_from_content("c");
        assert_eq!(interactive(&s), vec![false, false, true]);
        assert_eq!(dimmed(&s), vec![true, true, false]);
        let peeks: Vec<u32> = s.sheets().map(|sh| sh.visual().peek_offset).collect();
        assert_eq!(peeks, vec![32, 16, 0]);
    }

    #[test]
    fn lower_sheet_rests_shifted_by_peek() {
        let mut s = stack();
        let a = s.open_from_content("a");
        s.advance(ENTER);
        s.open_from_content("b");
        let panel = s.surface().style(a, SheetRole::Panel).unwrap();
        assert_eq!(panel.translate, Some((120 - 16, 0)));
    }

    #[test]
    fn closing_top_hands_interaction_down_immediately() {
        let mut s = stack();
        let a = s.open_from_content("a");
        let b = s.open_from_content("b");
        s.advance(ENTER);

        assert!(s.close(b));
        assert_eq!(s.active(), Some(a));
        assert!(s.get(a).unwrap().is_interactive());
        assert!(!s.get(b).unwrap().is_interactive());
        assert_eq!(s.len(), 2, "removal waits for the close delay");

        s.advance(CLOSE);
        assert_eq!(s.ids(), vec![a]);
        let panel = s.surface().style(a, SheetRole::Panel).unwrap();
        assert_eq!(panel.translate, Some((120, 0)));
        assert_eq!(panel.brightness, Some(1.0));
        assert_eq!(panel.pointer_events, Some(true));
    }

    #[test]
    fn close_top_skips_closing_sheets() {
        let mut s = stack();
        let a = s.open_from_content("a");
        let b = s.open_from_content("b");
        assert_eq!(s.close_top(), Some(b));
        assert_eq!(s.close_top(), Some(a));
        assert_eq!(s.close_top(), None);
        s.advance(CLOSE);
        assert!(s.is_empty());
    }

    #[test]
    fn events_are_queued_in_order() {
        let mut s = stack();
        let a = s.open_from_content("a");
        s.advance(ENTER);
        s.close(a);
        s.advance(CLOSE);
        let events: Vec<_> = s.drain_events().collect();
        assert_eq!(events, vec![StackEvent::Opened(a), StackEvent::Closed(a)]);
        assert_eq!(s.drain_events().count(), 0);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut s = stack();
        assert!(!s.close(SheetId::new(99)));
        assert!(!s.update_width(SheetId::new(99)));
        assert_eq!(s.phase(SheetId::new(99)), None);
    }

    #[test]
    fn update_widths_follows_viewport() {
        let mut s = stack();
        let a = s.open_from_content("a");
        s.surface_mut().set_viewport_width(700);
        s.update_widths();
        assert_eq!(s.get(a).unwrap().geometry().panel_width, 700);
        assert!(s.update_width(a));
    }

    #[test]
    fn disconnect_drops_everything_silently() {
        let mut s = stack();
        s.open_from_content("a");
        let b = s.open_from_content("b");
        s.close(b);
        assert_eq!(s.disconnect(), 2);
        assert!(s.is_empty());
        assert_eq!(s.next_deadline(), None);
        assert!(s.surface().sheets().is_empty());
        assert!(s.surface().closed_notifications().is_empty());
        assert_eq!(s.drain_events().count(), 0);
    }

    #[test]
    fn instant_config_still_needs_a_tick() {
        let mut s = SheetStack::new(
            HeadlessSurface::new(1200),
            StackConfig::default().with_sheet(SheetConfig::instant()),
        );
        let a = s.open_from_content("a");
        assert_eq!(s.phase(a), Some(SheetPhase::Entering));
        s.advance(Duration::ZERO);
        assert_eq!(s.phase(a), Some(SheetPhase::Open));
        s.close(a);
        s.advance(Duration::ZERO);
        assert!(s.is_empty());
    }

    #[test]
    fn advance_to_uses_absolute_time() {
        let mut s = stack();
        let a = s.open_from_content("a");
        s.advance_to(Duration::from_millis(99));
        assert_eq!(s.phase(a), Some(SheetPhase::Entering));
        s.advance_to(Duration::from_millis(100));
        assert_eq!(s.phase(a), Some(SheetPhase::Open));
        assert_eq!(s.now(), Duration::from_millis(100));
    }
}
