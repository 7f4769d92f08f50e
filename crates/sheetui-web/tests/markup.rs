//! Markup produced for mounted sheets.

use pretty_assertions::assert_eq;
use sheetui_core::{SheetId, SheetRole};
use sheetui_web::markup::{
    CLOSE_ACTION, container_selector, inner_markup, role_class, role_selector, sheet_markup,
};

#[test]
fn sheet_markup_has_container_and_three_roles() {
    let html = sheet_markup(SheetId::new(3), "<p>Hi</p>");
    assert_eq!(
        html,
        "<div class=\"sheet-container\" data-controller=\"sheet\" data-sheet-id=\"3\">\
         <div class=\"sheet-overlay\" data-sheet-target=\"overlay\" data-action=\"click->sheet#close\"></div>\
         <div class=\"sheet\" data-sheet-target=\"sheet\">\
         <div class=\"sheet-content\" data-sheet-target=\"content\"><p>Hi</p></div>\
         </div></div>"
    );
}

#[test]
fn content_is_inserted_verbatim() {
    let body = "<script>trusted()</script><form action=\"/x\"></form>";
    let inner = inner_markup(body);
    assert!(inner.contains(body));
    assert_eq!(inner.matches(CLOSE_ACTION).count(), 1);
}

#[test]
fn every_role_is_addressable() {
    let inner = inner_markup("");
    for role in SheetRole::ALL {
        let selector = role_selector(role);
        let attr = selector.trim_start_matches('[').trim_end_matches(']');
        assert!(inner.contains(attr), "{role} missing: {attr}");
        assert!(inner.contains(&format!("class=\"{}\"", role_class(role))));
    }
    assert_eq!(
        container_selector(SheetId::new(10)),
        ".sheet-container[data-sheet-id=\"10\"]"
    );
}
