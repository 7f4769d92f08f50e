#![forbid(unsafe_code)]

//! Browser binding for SheetUI.
//!
//! # Role in SheetUI
//! `sheetui-web` renders a [`SheetStack`](sheetui_stack::SheetStack) into a
//! page. The markup vocabulary and the clock-synced [`SheetHost`] compile
//! everywhere and are tested natively; the `web-sys` surface, the `fetch`
//! loader and the exported `SheetList` class only exist on `wasm32`.
//!
//! # JavaScript usage
//!
//! ```js
//! const list = new SheetList(document.getElementById("sheets"));
//! list.onClosed((id) => console.log("closed", id));
//! const id = list.addSheet("<p>Hi</p>");
//! await list.addSheetFromUrl("/recipes/new");
//! list.closeTop();
//! ```

pub mod host;
pub mod markup;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use dom::DomSurface;
#[cfg(target_arch = "wasm32")]
pub use fetch::FetchLoader;
#[cfg(target_arch = "wasm32")]
pub use wasm::SheetList;

pub use host::SheetHost;
pub use markup::{CLOSED_EVENT, css_declaration, sheet_markup};
