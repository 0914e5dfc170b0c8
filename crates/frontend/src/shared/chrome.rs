//! Thin `chrome.*` bindings for the devtools panel and the content script.
//!
//! Extension APIs are reached through `js_sys::Reflect` so the same wasm
//! module loads in any context; a missing API surfaces as an `Err`.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

/// Resolve a dotted property path starting at `globalThis.chrome`.
pub fn api(path: &[&str]) -> Result<JsValue, JsValue> {
    let mut value = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("chrome"))?;
    let mut walked = String::from("chrome");

    for segment in path {
        if value.is_undefined() || value.is_null() {
            return Err(JsValue::from_str(&format!("{walked} is not available")));
        }
        value = js_sys::Reflect::get(&value, &JsValue::from_str(segment))?;
        walked.push('.');
        walked.push_str(segment);
    }

    if value.is_undefined() || value.is_null() {
        return Err(JsValue::from_str(&format!("{walked} is not available")));
    }
    Ok(value)
}

/// Call `chrome.<path>.<method>(...args)` with `this` bound to the namespace.
pub fn call(path: &[&str], method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let target = api(path)?;
    let function = js_sys::Reflect::get(&target, &JsValue::from_str(method))?
        .dyn_into::<js_sys::Function>()?;
    let args: js_sys::Array = args.iter().collect();
    function.apply(&target, &args)
}

/// Await a value that may be a promise.
pub async fn settle(value: JsValue) -> Result<JsValue, JsValue> {
    match value.dyn_into::<js_sys::Promise>() {
        Ok(promise) => JsFuture::from(promise).await,
        Err(value) => Ok(value),
    }
}

/// Id of the tab the devtools window is attached to.
pub fn inspected_tab_id() -> Result<JsValue, JsValue> {
    api(&["devtools", "inspectedWindow", "tabId"])
}

/// Encode as plain JS objects rather than `Map`s.
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

/// `chrome.tabs.sendMessage` to the inspected tab. Fire-and-forget: a tab
/// without the content script rejects, which is logged and ignored.
pub fn send_to_inspected_tab(message: JsValue) {
    let sent = inspected_tab_id().and_then(|tab_id| call(&["tabs"], "sendMessage", &[tab_id, message]));

    match sent {
        Ok(result) => spawn_local(async move {
            if let Err(e) = settle(result).await {
                log::debug!("tabs.sendMessage rejected: {e:?}");
            }
        }),
        Err(e) => log::debug!("tabs.sendMessage failed: {e:?}"),
    }
}

/// A callback registered on a `chrome.events.Event`; removed on drop.
pub struct ChromeListener {
    event: JsValue,
    closure: Closure<dyn FnMut(JsValue)>,
}

impl ChromeListener {
    /// `chrome.<path>.addListener(callback)`. The callback receives the
    /// event's first argument.
    pub fn add(path: &[&str], callback: impl FnMut(JsValue) + 'static) -> Result<Self, JsValue> {
        let event = api(path)?;
        let closure: Closure<dyn FnMut(JsValue)> = Closure::new(callback);
        let add = js_sys::Reflect::get(&event, &JsValue::from_str("addListener"))?
            .dyn_into::<js_sys::Function>()?;
        add.call1(&event, closure.as_ref())?;
        Ok(Self { event, closure })
    }
}

impl Drop for ChromeListener {
    fn drop(&mut self) {
        let removed = js_sys::Reflect::get(&self.event, &JsValue::from_str("removeListener"))
            .and_then(|remove| remove.dyn_into::<js_sys::Function>().map_err(JsValue::from))
            .and_then(|remove| remove.call1(&self.event, self.closure.as_ref()));
        if let Err(e) = removed {
            log::debug!("removeListener failed: {e:?}");
        }
    }
}
