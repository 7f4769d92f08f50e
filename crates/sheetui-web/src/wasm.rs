#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the sheet list.
//!
//! Only compiled on `wasm32` targets. The list schedules its own wake-ups
//! with `setTimeout`, so the page only has to construct it and call
//! `addSheet` / `addSheetFromUrl`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use js_sys::{Function, Promise, Reflect};
use sheetui_core::{SheetId, WallClock};
use sheetui_stack::{StackConfig, StackEvent, load_content};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Element, Event};

use crate::dom::DomSurface;
use crate::fetch::{FetchLoader, js_message};
use crate::host::SheetHost;
use crate::markup::{ACTION_ATTR, CONTAINER_CLASS, SHEET_ID_ATTR};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            console_error(&format!("sheet list panicked: {info}"));
        }));
    });
}

fn busy() -> JsValue {
    js_sys::Error::new("SheetList is busy").into()
}

struct ListState {
    host: SheetHost<DomSurface, WallClock>,
    on_closed: Option<Function>,
    /// Stack-relative deadline of the pending `setTimeout`, if any.
    wake_at: Option<Duration>,
    click: Option<Closure<dyn FnMut(Event)>>,
}

type Shared = Rc<RefCell<ListState>>;

/// Stack of slide-in sheets rendered into one container element.
#[wasm_bindgen]
pub struct SheetList {
    state: Shared,
    loader: Option<FetchLoader>,
}

#[wasm_bindgen]
impl SheetList {
    /// Render sheets into `container`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: Element) -> Result<SheetList, JsValue> {
        install_panic_hook();
        let surface = DomSurface::new(container.clone())?;
        let host = SheetHost::new(surface, StackConfig::default(), WallClock::start());
        let state = Rc::new(RefCell::new(ListState {
            host,
            on_closed: None,
            wake_at: None,
            click: None,
        }));

        let weak = Rc::downgrade(&state);
        let click = Closure::<dyn FnMut(Event)>::new(move |event: Event| on_click(&weak, &event));
        container.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        state.borrow_mut().click = Some(click);

        Ok(SheetList {
            state,
            loader: FetchLoader::new(),
        })
    }

    /// Open a sheet with trusted `html`. Returns the sheet id.
    #[wasm_bindgen(js_name = addSheet)]
    pub fn add_sheet(&self, html: &str) -> Result<f64, JsValue> {
        let id = with_state(&self.state, |s| s.host.add_sheet(html))?;
        pump(&self.state);
        Ok(id.get() as f64)
    }

    /// Fetch `url` and open a sheet with the response body.
    ///
    /// Resolves to the sheet id; rejects with the load error and leaves the
    /// list unchanged.
    #[wasm_bindgen(js_name = addSheetFromUrl)]
    pub fn add_sheet_from_url(&self, url: String) -> Promise {
        let state = self.state.clone();
        let loader = self.loader.clone();
        future_to_promise(async move {
            let loader =
                loader.ok_or_else(|| JsValue::from(js_sys::Error::new("no window to fetch from")))?;
            // Same flow as `SheetStack::open_from_url`, split so the state
            // borrow is not held across the fetch.
            let html = match load_content(&loader, &url).await {
                Ok(html) => html,
                Err(err) => {
                    console_error(&format!("Failed to load sheet content: {err}"));
                    return Err(js_sys::Error::new(&err.to_string()).into());
                }
            };
            let id = with_state(&state, |s| s.host.add_sheet(&html))?;
            pump(&state);
            Ok(JsValue::from_f64(id.get() as f64))
        })
    }

    /// Start closing sheet `id`. Returns `false` for unknown or closing ids.
    pub fn close(&self, id: f64) -> Result<bool, JsValue> {
        let Some(id) = id_from_js(id) else {
            return Ok(false);
        };
        let started = with_state(&self.state, |s| s.host.close(id))?;
        pump(&self.state);
        Ok(started)
    }

    /// Close the topmost open sheet. Returns its id.
    #[wasm_bindgen(js_name = closeTop)]
    pub fn close_top(&self) -> Result<Option<f64>, JsValue> {
        let id = with_state(&self.state, |s| s.host.close_top())?;
        pump(&self.state);
        Ok(id.map(|id| id.get() as f64))
    }

    /// Recompute sheet widths after a viewport resize.
    #[wasm_bindgen(js_name = updateWidths)]
    pub fn update_widths(&self) -> Result<(), JsValue> {
        with_state(&self.state, |s| s.host.update_widths())
    }

    /// Register a callback receiving the id of each removed sheet.
    #[wasm_bindgen(js_name = onClosed)]
    pub fn on_closed(&self, callback: Option<Function>) -> Result<(), JsValue> {
        with_state(&self.state, |s| s.on_closed = callback)
    }

    /// Fire due animation steps now.
    pub fn tick(&self) {
        pump(&self.state);
    }

    /// Number of sheets, including closing ones.
    pub fn len(&self) -> Result<usize, JsValue> {
        with_state(&self.state, |s| s.host.stack().len())
    }

    /// Sheet ids, bottom first.
    pub fn ids(&self) -> Result<Vec<f64>, JsValue> {
        with_state(&self.state, |s| {
            s.host
                .stack()
                .ids()
                .into_iter()
                .map(|id| id.get() as f64)
                .collect()
        })
    }

    /// Remove every sheet without notifications and detach from the page.
    pub fn disconnect(&self) -> Result<usize, JsValue> {
        with_state(&self.state, |s| {
            detach_click(s);
            let dropped = s.host.disconnect();
            s.host.stack_mut().surface_mut().forget_detached();
            s.wake_at = None;
            dropped
        })
    }
}

impl Drop for SheetList {
    fn drop(&mut self) {
        // The listener must not outlive its closure, which `ListState` owns.
        match self.state.try_borrow_mut() {
            Ok(mut s) => detach_click(&mut s),
            Err(_) => console_error("SheetList dropped while busy; click listener left attached"),
        }
    }
}

fn detach_click(s: &mut ListState) {
    if let Some(click) = s.click.take() {
        let container = s.host.stack().surface().container();
        let _ = container.remove_event_listener_with_callback("click", click.as_ref().unchecked_ref());
    }
}

fn with_state<T>(state: &Shared, f: impl FnOnce(&mut ListState) -> T) -> Result<T, JsValue> {
    let mut guard = state.try_borrow_mut().map_err(|_| busy())?;
    Ok(f(&mut guard))
}

fn id_from_js(value: f64) -> Option<SheetId> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0).then(|| SheetId::new(value as u64))
}

/// Sync the stack to the wall clock, deliver `closed` callbacks, and arm
/// the next wake-up.
fn pump(state: &Shared) {
    let Ok(mut guard) = state.try_borrow_mut() else {
        return;
    };
    let events = guard.host.sync();
    let callback = guard.on_closed.clone();
    schedule_wake(state, &mut guard);
    drop(guard);

    let Some(callback) = callback else {
        return;
    };
    for event in events {
        if let StackEvent::Closed(id) = event {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_f64(id.get() as f64)) {
                console_error(&format!("onClosed callback failed: {}", js_message(&err)));
            }
        }
    }
}

fn schedule_wake(state: &Shared, s: &mut ListState) {
    let (Some(delay), Some(deadline)) = (s.host.next_wake(), s.host.stack().next_deadline()) else {
        return;
    };
    if s.wake_at.is_some_and(|armed| armed <= deadline) {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };

    let weak: Weak<RefCell<ListState>> = Rc::downgrade(state);
    let callback = Closure::once_into_js(move || {
        let Some(state) = weak.upgrade() else {
            return;
        };
        if let Ok(mut s) = state.try_borrow_mut() {
            if s.wake_at == Some(deadline) {
                s.wake_at = None;
            }
        }
        pump(&state);
    });
    let timeout = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    match window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout)
    {
        Ok(_) => s.wake_at = Some(deadline),
        Err(err) => console_error(&format!("failed to arm sheet timer: {}", js_message(&err))),
    }
}

fn on_click(state: &Weak<RefCell<ListState>>, event: &Event) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return;
    };
    let Ok(Some(actor)) = target.closest(&format!("[{ACTION_ATTR}]")) else {
        return;
    };
    let Ok(Some(root)) = target.closest(&format!(".{CONTAINER_CLASS}")) else {
        return;
    };
    let action = actor.get_attribute(ACTION_ATTR).unwrap_or_default();
    let sheet = root.get_attribute(SHEET_ID_ATTR).unwrap_or_default();

    let started = with_state(&state, |s| s.host.dispatch_action(&action, &sheet)).unwrap_or(false);
    if started {
        pump(&state);
    }
}
