#![forbid(unsafe_code)]

//! Markup and inline-style vocabulary shared by the DOM surface.
//!
//! Everything here is plain string building so it can be checked natively.
//! The container carries its sheet id in `data-sheet-id`; role elements are
//! found through their `data-sheet-target` attribute.

use sheetui_core::{SheetId, SheetRole, StyleChange};

/// Event dispatched on a sheet's root after it is removed.
pub const CLOSED_EVENT: &str = "sheet:closed";

/// Class of every sheet root.
pub const CONTAINER_CLASS: &str = "sheet-container";

/// Attribute holding the numeric sheet id on the root.
pub const SHEET_ID_ATTR: &str = "data-sheet-id";

/// Attribute naming the element's role.
pub const TARGET_ATTR: &str = "data-sheet-target";

/// Attribute carrying declarative actions.
pub const ACTION_ATTR: &str = "data-action";

/// Action bound to the overlay: a click closes the sheet.
pub const CLOSE_ACTION: &str = "click->sheet#close";

/// Value of `data-sheet-target` for `role`.
///
/// The panel keeps the historical `sheet` target name.
#[must_use]
pub const fn role_target(role: SheetRole) -> &'static str {
    match role {
        SheetRole::Overlay => "overlay",
        SheetRole::Panel => "sheet",
        SheetRole::Content => "content",
    }
}

/// Class name of the element playing `role`.
#[must_use]
pub const fn role_class(role: SheetRole) -> &'static str {
    match role {
        SheetRole::Overlay => "sheet-overlay",
        SheetRole::Panel => "sheet",
        SheetRole::Content => "sheet-content",
    }
}

/// Selector for `role` relative to a sheet root.
#[must_use]
pub fn role_selector(role: SheetRole) -> String {
    format!("[{TARGET_ATTR}=\"{}\"]", role_target(role))
}

/// Selector for the root of sheet `id`.
#[must_use]
pub fn container_selector(id: SheetId) -> String {
    format!(".{CONTAINER_CLASS}[{SHEET_ID_ATTR}=\"{}\"]", id.get())
}

/// Inner HTML of a sheet root, with `content_html` inserted verbatim.
#[must_use]
pub fn inner_markup(content_html: &str) -> String {
    let overlay = SheetRole::Overlay;
    let panel = SheetRole::Panel;
    let content = SheetRole::Content;
    format!(
        "<div class=\"{}\" {TARGET_ATTR}=\"{}\" {ACTION_ATTR}=\"{CLOSE_ACTION}\"></div>\
         <div class=\"{}\" {TARGET_ATTR}=\"{}\">\
         <div class=\"{}\" {TARGET_ATTR}=\"{}\">{content_html}</div>\
         </div>",
        role_class(overlay),
        role_target(overlay),
        role_class(panel),
        role_target(panel),
        role_class(content),
        role_target(content),
    )
}

/// Full markup of a sheet root, as mounted into the list container.
#[must_use]
pub fn sheet_markup(id: SheetId, content_html: &str) -> String {
    format!(
        "<div class=\"{CONTAINER_CLASS}\" data-controller=\"sheet\" {SHEET_ID_ATTR}=\"{}\">{}</div>",
        id.get(),
        inner_markup(content_html)
    )
}

/// Parse the value of a root's `data-sheet-id`.
#[must_use]
pub fn parse_sheet_id(value: &str) -> Option<SheetId> {
    value.trim().parse().ok().map(SheetId::new)
}

/// Whether a `data-action` value contains the close action.
#[must_use]
pub fn is_close_action(value: &str) -> bool {
    value.split_whitespace().any(|action| action == CLOSE_ACTION)
}

/// One inline CSS property assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssDeclaration {
    /// CSS property name.
    pub property: &'static str,
    /// Serialized value.
    pub value: String,
}

/// Inline CSS for a style change.
#[must_use]
pub fn css_declaration(change: StyleChange) -> CssDeclaration {
    let (property, value) = match change {
        StyleChange::Opacity(o) => ("opacity", o.to_string()),
        StyleChange::Visibility(true) => ("visibility", "visible".to_owned()),
        StyleChange::Visibility(false) => ("visibility", "hidden".to_owned()),
        StyleChange::Translate { x, y } => ("transform", format!("translate({x}px, {y}px)")),
        StyleChange::MaxWidth(w) => ("max-width", format!("{w}px")),
        StyleChange::Brightness(b) => ("filter", format!("brightness({b})")),
        StyleChange::PointerEvents(true) => ("pointer-events", "auto".to_owned()),
        StyleChange::PointerEvents(false) => ("pointer-events", "none".to_owned()),
    };
    CssDeclaration { property, value }
}
