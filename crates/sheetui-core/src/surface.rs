#![forbid(unsafe_code)]

//! The DOM contract between sheets and the page that hosts them.
//!
//! Every sheet is rendered as a root node with three addressable roles:
//!
//! - `overlay`: the scrim behind the panel (a click on it conventionally
//!   closes the sheet; that wiring belongs to the host markup),
//! - `panel`: the sliding panel itself,
//! - `content`: the container the trusted HTML is inserted into.
//!
//! [`SheetSurface`] is the only way sheet code touches the page. The browser
//! binding implements it over `web-sys`; [`HeadlessSurface`] implements it
//! in memory.
//!
//! [`HeadlessSurface`]: crate::headless::HeadlessSurface

use thiserror::Error;

/// Identity of one sheet within its stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SheetId(u64);

impl SheetId {
    /// Wrap a raw id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SheetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed semantic role of an element inside a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetRole {
    /// Dimming scrim behind the panel.
    Overlay,
    /// The sliding panel.
    Panel,
    /// Container holding the sheet's content.
    Content,
}

impl SheetRole {
    /// All roles in render order.
    pub const ALL: [SheetRole; 3] = [Self::Overlay, Self::Panel, Self::Content];

    /// Name used in markup and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overlay => "overlay",
            Self::Panel => "panel",
            Self::Content => "content",
        }
    }
}

impl std::fmt::Display for SheetRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single inline-style mutation applied to a role element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleChange {
    /// `opacity`, in `[0.0, 1.0]`.
    Opacity(f32),
    /// `visibility: visible` (`true`) or `hidden` (`false`).
    Visibility(bool),
    /// `transform: translate(x px, y px)`.
    Translate {
        /// Horizontal offset in pixels.
        x: i32,
        /// Vertical offset in pixels.
        y: i32,
    },
    /// `max-width` in pixels.
    MaxWidth(u32),
    /// `filter: brightness(..)`; `1.0` is unfiltered.
    Brightness(f32),
    /// `pointer-events: auto` (`true`) or `none` (`false`).
    PointerEvents(bool),
}

/// A required role element is missing from a mounted sheet.
///
/// This is a wiring error in the host, not a runtime condition. Sheet code
/// never recovers from it; see [`PreconditionFault::raise`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("sheet {sheet} has no `{role}` target")]
pub struct PreconditionFault {
    /// Sheet whose target is missing.
    pub sheet: SheetId,
    /// The missing role.
    pub role: SheetRole,
}

impl PreconditionFault {
    /// Log the fault and abort the current operation.
    #[track_caller]
    pub fn raise(self) -> ! {
        tracing::error!(
            message = "sheet.precondition_fault",
            sheet = self.sheet.get(),
            role = self.role.as_str()
        );
        panic!("{self}");
    }
}

/// Page-side operations a sheet needs.
///
/// Implementations own the page nodes; sheets only refer to them by
/// `(SheetId, SheetRole)`.
pub trait SheetSurface {
    /// Current viewport (document client) width in pixels.
    fn viewport_width(&self) -> u32;

    /// Create the root node for `id` with its three roles, `content_html`
    /// inserted verbatim into the content role, above every mounted sheet.
    fn mount(&mut self, id: SheetId, content_html: &str);

    /// Apply one style change to a role element of a mounted sheet.
    fn apply(
        &mut self,
        id: SheetId,
        role: SheetRole,
        change: StyleChange,
    ) -> Result<(), PreconditionFault>;

    /// Remove the root node for `id`. Unknown ids are ignored.
    fn unmount(&mut self, id: SheetId);

    /// Deliver the `closed` notification to collaborators attached to the
    /// sheet's root node.
    fn notify_closed(&mut self, id: SheetId);
}

impl<S: SheetSurface + ?Sized> SheetSurface for &mut S {
    fn viewport_width(&self) -> u32 {
        (**self).viewport_width()
    }

    fn mount(&mut self, id: SheetId, content_html: &str) {
        (**self).mount(id, content_html);
    }

    fn apply(
        &mut self,
        id: SheetId,
        role: SheetRole,
        change: StyleChange,
    ) -> Result<(), PreconditionFault> {
        (**self).apply(id, role, change)
    }

    fn unmount(&mut self, id: SheetId) {
        (**self).unmount(id);
    }

    fn notify_closed(&mut self, id: SheetId) {
        (**self).notify_closed(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_match_markup() {
        let names: Vec<_> = SheetRole::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, ["overlay", "panel", "content"]);
    }

    #[test]
    fn fault_message_names_sheet_and_role() {
        let fault = PreconditionFault {
            sheet: SheetId::new(7),
            role: SheetRole::Overlay,
        };
        assert_eq!(fault.to_string(), "sheet #7 has no `overlay` target");
    }

    #[test]
    #[should_panic(expected = "has no `panel` target")]
    fn raise_panics_with_fault_message() {
        PreconditionFault {
            sheet: SheetId::new(1),
            role: SheetRole::Panel,
        }
        .raise();
    }
}
