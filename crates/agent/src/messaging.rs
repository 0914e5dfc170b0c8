//! Agent → extension channel over `chrome.runtime.sendMessage`.

use contracts::messages::ExternalMessage;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};

/// Handle on the page's `chrome.runtime`, present only when the page can
/// reach an extension.
#[derive(Clone)]
pub struct Runtime {
    runtime: JsValue,
    send_message: js_sys::Function,
}

impl Runtime {
    pub fn detect() -> Option<Self> {
        let chrome = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("chrome")).ok()?;
        if chrome.is_undefined() || chrome.is_null() {
            return None;
        }
        let runtime = js_sys::Reflect::get(&chrome, &JsValue::from_str("runtime")).ok()?;
        if runtime.is_undefined() || runtime.is_null() {
            return None;
        }
        let send_message = js_sys::Reflect::get(&runtime, &JsValue::from_str("sendMessage"))
            .ok()?
            .dyn_into::<js_sys::Function>()
            .ok()?;

        Some(Self {
            runtime,
            send_message,
        })
    }

    /// Fire-and-forget send. Failures (extension missing, panel closed) are
    /// logged and otherwise ignored.
    pub fn send_external(&self, extension_id: &str, message: &ExternalMessage) {
        let value = match to_js(message) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Could not encode {}: {e}", message.editor_id());
                return;
            }
        };

        let sent = self
            .send_message
            .call2(&self.runtime, &JsValue::from_str(extension_id), &value);

        match sent {
            Ok(result) => {
                if let Ok(promise) = result.dyn_into::<js_sys::Promise>() {
                    spawn_local(async move {
                        if let Err(e) = JsFuture::from(promise).await {
                            log::debug!("sendMessage rejected: {e:?}");
                        }
                    });
                }
            }
            Err(e) => log::debug!("sendMessage threw: {e:?}"),
        }
    }
}

/// Encode as plain JS objects rather than `Map`s.
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}
