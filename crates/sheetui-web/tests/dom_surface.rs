#![cfg(target_arch = "wasm32")]

//! DOM surface behavior in a real browser.
//!
//! Run:
//!   wasm-pack test --headless --firefox crates/sheetui-web

use sheetui_core::{SheetId, SheetRole, SheetSurface, StyleChange};
use sheetui_web::DomSurface;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn surface() -> DomSurface {
    let document = web_sys::window().unwrap().document().unwrap();
    let container = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&container).unwrap();
    DomSurface::new(container).unwrap()
}

fn panel(s: &DomSurface, id: SheetId) -> HtmlElement {
    s.root(id)
        .unwrap()
        .query_selector("[data-sheet-target=\"sheet\"]")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap()
}

#[wasm_bindgen_test]
fn mount_apply_unmount() {
    let mut s = surface();
    let id = SheetId::new(1);
    s.mount(id, "<p>Hi</p>");
    assert_eq!(s.container().child_element_count(), 1);

    s.apply(id, SheetRole::Panel, StyleChange::Translate { x: 120, y: 0 })
        .unwrap();
    s.apply(id, SheetRole::Panel, StyleChange::PointerEvents(false))
        .unwrap();
    let style = panel(&s, id).style();
    assert_eq!(
        style.get_property_value("transform").unwrap(),
        "translate(120px, 0px)"
    );
    assert_eq!(style.get_property_value("pointer-events").unwrap(), "none");

    s.unmount(id);
    assert_eq!(s.container().child_element_count(), 0);
    s.notify_closed(id);
}

#[wasm_bindgen_test]
fn missing_target_is_a_fault() {
    let mut s = surface();
    let id = SheetId::new(2);
    s.mount(id, "");
    s.root(id)
        .unwrap()
        .query_selector("[data-sheet-target=\"overlay\"]")
        .unwrap()
        .unwrap()
        .remove();
    let fault = s
        .apply(id, SheetRole::Overlay, StyleChange::Opacity(0.12))
        .unwrap_err();
    assert_eq!(fault.role, SheetRole::Overlay);
    assert!(s.apply(SheetId::new(9), SheetRole::Panel, StyleChange::MaxWidth(1)).is_err());
}

#[wasm_bindgen_test]
fn freed_list_leaves_no_dangling_click_listener() {
    use std::cell::Cell;
    use std::rc::Rc;
    use sheetui_web::SheetList;
    use wasm_bindgen::prelude::Closure;

    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    let container = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&container).unwrap();

    let list = SheetList::new(container.clone()).unwrap();
    list.add_sheet("<p>x</p>").unwrap();
    drop(list);

    let errors = Rc::new(Cell::new(0u32));
    let seen = errors.clone();
    let on_error = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| seen.set(seen.get() + 1));
    window
        .add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
        .unwrap();

    let overlay: HtmlElement = container
        .query_selector("[data-sheet-target=\"overlay\"]")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    overlay.click();

    window
        .remove_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
        .unwrap();
    assert_eq!(errors.get(), 0);
    assert_eq!(container.child_element_count(), 1, "nothing closed the sheet");
}
