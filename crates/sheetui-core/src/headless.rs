#![forbid(unsafe_code)]

//! In-memory [`SheetSurface`] for tests and DOM-less hosts.
//!
//! Mounted sheets are kept in DOM order (bottom first). Each role element
//! records the last value written for every style property, so callers can
//! read back exactly what a browser would have as inline style.

use crate::surface::{PreconditionFault, SheetId, SheetRole, SheetSurface, StyleChange};

/// Inline style of one role element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementStyle {
    /// Last `opacity` written.
    pub opacity: Option<f32>,
    /// Last `visibility` written.
    pub visible: Option<bool>,
    /// Last `transform: translate(..)` written.
    pub translate: Option<(i32, i32)>,
    /// Last `max-width` written.
    pub max_width: Option<u32>,
    /// Last `filter: brightness(..)` written.
    pub brightness: Option<f32>,
    /// Last `pointer-events` written.
    pub pointer_events: Option<bool>,
}

impl ElementStyle {
    fn apply(&mut self, change: StyleChange) {
        match change {
            StyleChange::Opacity(v) => self.opacity = Some(v),
            StyleChange::Visibility(v) => self.visible = Some(v),
            StyleChange::Translate { x, y } => self.translate = Some((x, y)),
            StyleChange::MaxWidth(v) => self.max_width = Some(v),
            StyleChange::Brightness(v) => self.brightness = Some(v),
            StyleChange::PointerEvents(v) => self.pointer_events = Some(v),
        }
    }

    /// Whether the element accepts pointer input (`auto` unless disabled).
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.pointer_events.unwrap_or(true)
    }

    /// Whether a brightness filter below `1.0` is applied.
    #[must_use]
    pub fn is_dimmed(&self) -> bool {
        self.brightness.is_some_and(|b| b < 1.0)
    }
}

/// One mounted sheet root.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedSheet {
    /// Sheet identity.
    pub id: SheetId,
    /// Trusted HTML inside the content role.
    pub content_html: String,
    /// Overlay style, `None` once the target is detached.
    pub overlay: Option<ElementStyle>,
    /// Panel style, `None` once the target is detached.
    pub panel: Option<ElementStyle>,
    /// Content container style, `None` once the target is detached.
    pub content: Option<ElementStyle>,
}

impl MountedSheet {
    fn slot(&self, role: SheetRole) -> Option<&ElementStyle> {
        match role {
            SheetRole::Overlay => self.overlay.as_ref(),
            SheetRole::Panel => self.panel.as_ref(),
            SheetRole::Content => self.content.as_ref(),
        }
    }

    fn slot_mut(&mut self, role: SheetRole) -> &mut Option<ElementStyle> {
        match role {
            SheetRole::Overlay => &mut self.overlay,
            SheetRole::Panel => &mut self.panel,
            SheetRole::Content => &mut self.content,
        }
    }
}

/// Surface that keeps the sheet DOM in memory.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    viewport_width: u32,
    sheets: Vec<MountedSheet>,
    closed: Vec<SheetId>,
    style_writes: usize,
}

impl HeadlessSurface {
    /// Create an empty surface with the given viewport width.
    #[must_use]
    pub fn new(viewport_width: u32) -> Self {
        Self {
            viewport_width,
            sheets: Vec::new(),
            closed: Vec::new(),
            style_writes: 0,
        }
    }

    /// Resize the viewport. Sheets do not react until asked to update.
    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    /// Mounted sheets, bottom first.
    #[must_use]
    pub fn sheets(&self) -> &[MountedSheet] {
        &self.sheets
    }

    /// Ids of mounted sheets, bottom first.
    #[must_use]
    pub fn mounted_ids(&self) -> Vec<SheetId> {
        self.sheets.iter().map(|s| s.id).collect()
    }

    /// Look up a mounted sheet.
    #[must_use]
    pub fn sheet(&self, id: SheetId) -> Option<&MountedSheet> {
        self.sheets.iter().find(|s| s.id == id)
    }

    /// Style of a role element, if the sheet is mounted and the target exists.
    #[must_use]
    pub fn style(&self, id: SheetId, role: SheetRole) -> Option<&ElementStyle> {
        self.sheet(id).and_then(|s| s.slot(role))
    }

    /// `closed` notifications delivered so far, in order.
    #[must_use]
    pub fn closed_notifications(&self) -> &[SheetId] {
        &self.closed
    }

    /// Total number of style writes applied.
    #[must_use]
    pub fn style_writes(&self) -> usize {
        self.style_writes
    }

    /// Remove a role element from a mounted sheet, as a broken host
    /// template would. Returns `false` if the sheet is not mounted.
    pub fn detach_target(&mut self, id: SheetId, role: SheetRole) -> bool {
        match self.sheets.iter_mut().find(|s| s.id == id) {
            Some(sheet) => {
                *sheet.slot_mut(role) = None;
                true
            }
            None => false,
        }
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(1200)
    }
}

impl SheetSurface for HeadlessSurface {
    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    fn mount(&mut self, id: SheetId, content_html: &str) {
        self.sheets.push(MountedSheet {
            id,
            content_html: content_html.to_owned(),
            overlay: Some(ElementStyle::default()),
            panel: Some(ElementStyle::default()),
            content: Some(ElementStyle::default()),
        });
    }

    fn apply(
        &mut self,
        id: SheetId,
        role: SheetRole,
        change: StyleChange,
    ) -> Result<(), PreconditionFault> {
        let fault = PreconditionFault { sheet: id, role };
        let sheet = self
            .sheets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(fault)?;
        let style = sheet.slot_mut(role).as_mut().ok_or(fault)?;
        style.apply(change);
        self.style_writes += 1;
        Ok(())
    }

    fn unmount(&mut self, id: SheetId) {
        self.sheets.retain(|s| s.id != id);
    }

    fn notify_closed(&mut self, id: SheetId) {
        self.closed.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(n: u64) -> SheetId {
        SheetId::new(n)
    }

    #[test]
    fn mount_keeps_dom_order() {
        let mut s = HeadlessSurface::new(800);
        s.mount(id(1), "<p>a</p>");
        s.mount(id(2), "<p>b</p>");
        assert_eq!(s.mounted_ids(), vec![id(1), id(2)]);
        assert_eq!(s.sheet(id(2)).map(|m| m.content_html.as_str()), Some("<p>b</p>"));
    }

    #[test]
    fn apply_records_last_value() {
        let mut s = HeadlessSurface::default();
        s.mount(id(1), "");
        s.apply(id(1), SheetRole::Panel, StyleChange::Translate { x: 1200, y: 0 })
            .unwrap();
        s.apply(id(1), SheetRole::Panel, StyleChange::Translate { x: 120, y: 0 })
            .unwrap();
        s.apply(id(1), SheetRole::Panel, StyleChange::Brightness(0.9))
            .unwrap();
        let panel = s.style(id(1), SheetRole::Panel).unwrap();
        assert_eq!(panel.translate, Some((120, 0)));
        assert!(panel.is_dimmed());
        assert!(panel.is_interactive());
        assert_eq!(s.style_writes(), 3);
    }

    #[test]
    fn apply_to_unknown_sheet_faults() {
        let mut s = HeadlessSurface::default();
        let err = s
            .apply(id(9), SheetRole::Overlay, StyleChange::Opacity(0.0))
            .unwrap_err();
        assert_eq!(err.sheet, id(9));
        assert_eq!(err.role, SheetRole::Overlay);
    }

    #[test]
    fn detached_target_faults() {
        let mut s = HeadlessSurface::default();
        s.mount(id(1), "");
        assert!(s.detach_target(id(1), SheetRole::Overlay));
        assert!(s
            .apply(id(1), SheetRole::Overlay, StyleChange::Opacity(0.0))
            .is_err());
        assert!(s
            .apply(id(1), SheetRole::Panel, StyleChange::MaxWidth(10))
            .is_ok());
        assert!(!s.detach_target(id(2), SheetRole::Panel));
    }

    #[test]
    fn unmount_and_notify_are_independent() {
        let mut s = HeadlessSurface::default();
        s.mount(id(1), "");
        s.unmount(id(1));
        s.notify_closed(id(1));
        assert!(s.sheets().is_empty());
        assert_eq!(s.closed_notifications(), &[id(1)]);
        // Unknown id is ignored.
        s.unmount(id(42));
    }
}
