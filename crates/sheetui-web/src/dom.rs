#![forbid(unsafe_code)]

//! `web-sys` implementation of [`SheetSurface`].
//!
//! Only compiled on `wasm32` targets.

use sheetui_core::{PreconditionFault, SheetId, SheetRole, SheetSurface, StyleChange};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Document, Element, HtmlElement};

use crate::markup::{
    CLOSED_EVENT, CONTAINER_CLASS, SHEET_ID_ATTR, css_declaration, inner_markup, role_selector,
};

/// Sheets rendered as children of one list container element.
#[derive(Debug)]
pub struct DomSurface {
    document: Document,
    container: Element,
    /// Mounted roots, bottom first.
    roots: Vec<(SheetId, Element)>,
    /// Roots removed from the page but not yet notified.
    detached: Vec<(SheetId, Element)>,
}

impl DomSurface {
    /// Render sheets into `container`.
    pub fn new(container: Element) -> Result<Self, JsValue> {
        let document = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("sheet container is not attached to a document"))?;
        Ok(Self {
            document,
            container,
            roots: Vec::new(),
            detached: Vec::new(),
        })
    }

    /// The list container.
    #[must_use]
    pub fn container(&self) -> &Element {
        &self.container
    }

    /// Root element of a mounted sheet.
    #[must_use]
    pub fn root(&self, id: SheetId) -> Option<&Element> {
        self.roots.iter().find(|(rid, _)| *rid == id).map(|(_, el)| el)
    }

    /// Forget roots that were removed without a notification (teardown).
    pub fn forget_detached(&mut self) -> usize {
        let n = self.detached.len();
        self.detached.clear();
        n
    }

    fn role_element(&self, id: SheetId, role: SheetRole) -> Option<HtmlElement> {
        self.root(id)?
            .query_selector(&role_selector(role))
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn create_root(&self, id: SheetId, content_html: &str) -> Result<Element, JsValue> {
        let root = self.document.create_element("div")?;
        root.set_class_name(CONTAINER_CLASS);
        root.set_attribute("data-controller", "sheet")?;
        root.set_attribute(SHEET_ID_ATTR, &id.get().to_string())?;
        root.set_inner_html(&inner_markup(content_html));
        self.container.append_child(&root)?;
        Ok(root)
    }
}

impl SheetSurface for DomSurface {
    fn viewport_width(&self) -> u32 {
        self.document
            .document_element()
            .map(|el| u32::try_from(el.client_width()).unwrap_or(0))
            .unwrap_or(0)
    }

    fn mount(&mut self, id: SheetId, content_html: &str) {
        match self.create_root(id, content_html) {
            Ok(root) => self.roots.push((id, root)),
            // The sheet's first style write will raise the missing target.
            Err(err) => tracing::error!(message = "dom.mount_failed", sheet = id.get(), error = ?err),
        }
    }

    fn apply(
        &mut self,
        id: SheetId,
        role: SheetRole,
        change: StyleChange,
    ) -> Result<(), PreconditionFault> {
        let element = self
            .role_element(id, role)
            .ok_or(PreconditionFault { sheet: id, role })?;
        let decl = css_declaration(change);
        if let Err(err) = element.style().set_property(decl.property, &decl.value) {
            tracing::warn!(
                message = "dom.style_rejected",
                sheet = id.get(),
                property = decl.property,
                error = ?err
            );
        }
        Ok(())
    }

    fn unmount(&mut self, id: SheetId) {
        if let Some(idx) = self.roots.iter().position(|(rid, _)| *rid == id) {
            let (id, root) = self.roots.remove(idx);
            root.remove();
            self.detached.push((id, root));
        }
    }

    fn notify_closed(&mut self, id: SheetId) {
        let Some(idx) = self.detached.iter().position(|(rid, _)| *rid == id) else {
            return;
        };
        let (_, root) = self.detached.swap_remove(idx);

        let init = CustomEventInit::new();
        init.set_detail(&JsValue::from_f64(id.get() as f64));
        match CustomEvent::new_with_event_init_dict(CLOSED_EVENT, &init) {
            Ok(event) => {
                let _ = root.dispatch_event(&event);
            }
            Err(err) => tracing::warn!(message = "dom.notify_failed", sheet = id.get(), error = ?err),
        }
    }
}
