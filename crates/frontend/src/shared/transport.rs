//! Panel-side transport: full snapshot pulls and rect lookups run in the
//! inspected page, highlight commands go to the content script, lifecycle
//! messages arrive from the page agent.

use super::chrome::{self, ChromeListener};
use contracts::messages::{
    ContentMessage, ExternalMessage, Rect, EDITOR_KEY_ATTRIBUTE, EDITOR_ROOT_SELECTOR,
    ELEMENT_LOOKUP_CAPABILITY, SERIALIZE_CAPABILITY,
};
use contracts::snapshot::SerializedEditorState;
use contracts::state::RevalidateError;
use wasm_bindgen::prelude::*;

// Functions shipped into the page's main world. `executeScript` serializes
// them by source, so they may only use their own arguments.
#[wasm_bindgen(inline_js = r#"
export function snapshotQuery() {
  return function (selector, capability) {
    return Array.from(document.querySelectorAll(selector))
      .filter((node) => typeof node[capability] === "function")
      .map((node) => node[capability]())
      .filter(Boolean);
  };
}

export function rectQuery() {
  return function (attribute, capability, editor, key) {
    const root = document.querySelector(`div[${attribute}="${editor}"]`);
    if (root === null || typeof root[capability] !== "function") return null;

    const node = root[capability](key);
    if (node === null || node === undefined) return null;

    const rect = node.getBoundingClientRect();
    return {
      x: rect.x,
      y: rect.y,
      width: rect.width,
      height: rect.height,
      top: rect.top,
      right: rect.right,
    };
  };
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = snapshotQuery)]
    fn snapshot_query() -> js_sys::Function;

    #[wasm_bindgen(js_name = rectQuery)]
    fn rect_query() -> js_sys::Function;
}

/// `chrome.scripting.executeScript` in the inspected tab's main world,
/// returning each frame's `result`.
async fn execute_in_page(func: js_sys::Function, args: Vec<JsValue>) -> Result<Vec<JsValue>, JsValue> {
    let target = js_sys::Object::new();
    js_sys::Reflect::set(&target, &"tabId".into(), &chrome::inspected_tab_id()?)?;

    let injection = js_sys::Object::new();
    js_sys::Reflect::set(&injection, &"target".into(), &target)?;
    js_sys::Reflect::set(&injection, &"func".into(), &func)?;
    js_sys::Reflect::set(&injection, &"args".into(), &args.into_iter().collect::<js_sys::Array>())?;
    js_sys::Reflect::set(&injection, &"world".into(), &"MAIN".into())?;

    let results = chrome::settle(chrome::call(&["scripting"], "executeScript", &[injection.into()])?).await?;
    let results: js_sys::Array = results.dyn_into()?;

    results
        .iter()
        .map(|frame| js_sys::Reflect::get(&frame, &"result".into()))
        .collect()
}

/// Ask every editor root in the inspected page for a fresh snapshot.
pub async fn pull_all_editor_snapshots() -> Result<Vec<SerializedEditorState>, RevalidateError> {
    let frames = execute_in_page(
        snapshot_query(),
        vec![EDITOR_ROOT_SELECTOR.into(), SERIALIZE_CAPABILITY.into()],
    )
    .await
    .map_err(|e| RevalidateError::Injection(format!("{e:?}")))?;

    let mut snapshots = Vec::new();
    for frame in frames {
        if frame.is_undefined() || frame.is_null() {
            continue;
        }
        let states: Vec<SerializedEditorState> = serde_wasm_bindgen::from_value(frame)
            .map_err(|e| RevalidateError::Malformed(e.to_string()))?;
        snapshots.extend(states);
    }

    Ok(snapshots)
}

/// Viewport rect of the DOM element rendering `node_key` in editor
/// `editor_id`. `None` when the editor or node is not on the page.
pub async fn lookup_rect(editor_id: &str, node_key: &str) -> Option<Rect> {
    let frames = execute_in_page(
        rect_query(),
        vec![
            EDITOR_KEY_ATTRIBUTE.into(),
            ELEMENT_LOOKUP_CAPABILITY.into(),
            editor_id.into(),
            node_key.into(),
        ],
    )
    .await
    .map_err(|e| log::debug!("Rect lookup for {editor_id}/{node_key} failed: {e:?}"))
    .ok()?;

    frames
        .into_iter()
        .filter(|frame| !frame.is_undefined() && !frame.is_null())
        .find_map(|frame| serde_wasm_bindgen::from_value::<Rect>(frame).ok())
}

fn send_content_message(message: &ContentMessage) {
    match chrome::to_js(message) {
        Ok(value) => chrome::send_to_inspected_tab(value),
        Err(e) => log::warn!("Could not encode {message:?}: {e:?}"),
    }
}

pub fn create_highlight(rect: Rect) {
    send_content_message(&ContentMessage::create_highlight(rect));
}

pub fn remove_highlight() {
    send_content_message(&ContentMessage::RemoveHighlight);
}

pub fn notify_panel_unloaded() {
    send_content_message(&ContentMessage::DevtoolsPanelUnloaded);
}

/// Look up `node_key` and, if it is rendered, highlight it in the page.
pub async fn highlight_node(editor_id: String, node_key: String) {
    if let Some(rect) = lookup_rect(&editor_id, &node_key).await {
        create_highlight(rect);
    }
}

/// Agent lifecycle messages (`chrome.runtime.onMessageExternal`). Messages
/// that do not decode are dropped whole.
pub fn listen_external_messages(
    on_message: impl Fn(ExternalMessage) + 'static,
) -> Result<ChromeListener, JsValue> {
    ChromeListener::add(&["runtime", "onMessageExternal"], move |value: JsValue| {
        match serde_wasm_bindgen::from_value::<ExternalMessage>(value) {
            Ok(message) => on_message(message),
            Err(e) => log::warn!("Discarding malformed external message: {e}"),
        }
    })
}

/// Page navigations in any tab (`chrome.webNavigation.onCommitted`).
pub fn listen_navigation_committed(on_commit: impl Fn() + 'static) -> Result<ChromeListener, JsValue> {
    ChromeListener::add(&["webNavigation", "onCommitted"], move |_details: JsValue| on_commit())
}

/// Panel → content-script commands (`chrome.runtime.onMessage`).
pub fn listen_content_messages(
    on_message: impl Fn(ContentMessage) + 'static,
) -> Result<ChromeListener, JsValue> {
    ChromeListener::add(&["runtime", "onMessage"], move |value: JsValue| {
        match serde_wasm_bindgen::from_value::<ContentMessage>(value) {
            Ok(message) => on_message(message),
            Err(e) => log::warn!("Discarding malformed content message: {e}"),
        }
    })
}
