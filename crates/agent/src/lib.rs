pub mod lexical;
pub mod lifecycle;
pub mod messaging;

use contracts::config::config;
use contracts::messages::{
    ExternalMessage, EDITOR_KEY_ATTRIBUTE, ELEMENT_LOOKUP_CAPABILITY, SERIALIZE_CAPABILITY,
};
use contracts::serializer::{serialize_editor, SerializeError};
use contracts::snapshot::SerializedEditorState;
use lexical::Editor;
use lifecycle::{AgentPort, Lifecycle};
use messaging::{to_js, Runtime};
use serde::Deserialize;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

#[wasm_bindgen(start)]
pub fn start() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgentOptions {
    extension_id: Option<String>,
}

/// Capabilities installed on the editor's root element.
struct Capabilities {
    _serialize: Closure<dyn Fn() -> JsValue>,
    _lookup: Closure<dyn Fn(String) -> JsValue>,
}

struct Registration {
    unregister: Vec<js_sys::Function>,
    _on_root: Closure<dyn FnMut(Option<HtmlElement>, Option<HtmlElement>)>,
    _on_update: Closure<dyn FnMut(JsValue)>,
}

type AgentInner = Lifecycle<PagePort>;

/// The live page: a Lexical editor and the extension runtime.
struct PagePort {
    editor: Editor,
    extension_id: String,
    runtime: Runtime,
    agent: Weak<AgentInner>,
    capabilities: RefCell<Option<Capabilities>>,
}

impl AgentPort for PagePort {
    type Root = HtmlElement;

    fn install(&self, element: &HtmlElement) {
        let id = self.editor.get_key();
        if let Err(e) = element.set_attribute(EDITOR_KEY_ATTRIBUTE, &id) {
            log::warn!("Could not mark root of editor {id}: {e:?}");
        }

        let weak = self.agent.clone();
        let serialize: Closure<dyn Fn() -> JsValue> = Closure::new(move || {
            let Some(agent) = weak.upgrade() else {
                return JsValue::UNDEFINED;
            };
            match agent.snapshot().map(|state| to_js(&state)) {
                Ok(Ok(value)) => value,
                Ok(Err(e)) => {
                    log::warn!("Could not encode snapshot of editor {}: {e}", agent.id());
                    JsValue::UNDEFINED
                }
                Err(e) => {
                    log::debug!("Snapshot of editor {} unavailable: {e}", agent.id());
                    JsValue::UNDEFINED
                }
            }
        });

        let editor = self.editor.clone();
        let lookup: Closure<dyn Fn(String) -> JsValue> = Closure::new(move |key: String| {
            editor
                .get_element_by_key(&key)
                .map(JsValue::from)
                .unwrap_or(JsValue::NULL)
        });

        set_property(element, SERIALIZE_CAPABILITY, serialize.as_ref());
        set_property(element, ELEMENT_LOOKUP_CAPABILITY, lookup.as_ref());

        *self.capabilities.borrow_mut() = Some(Capabilities {
            _serialize: serialize,
            _lookup: lookup,
        });
    }

    fn uninstall(&self, element: &HtmlElement) {
        if let Err(e) = element.remove_attribute(EDITOR_KEY_ATTRIBUTE) {
            log::debug!("Could not unmark editor root: {e:?}");
        }
        set_property(element, SERIALIZE_CAPABILITY, &JsValue::UNDEFINED);
        set_property(element, ELEMENT_LOOKUP_CAPABILITY, &JsValue::UNDEFINED);
        self.capabilities.borrow_mut().take();
    }

    fn serialize(&self, revision: u64) -> Result<SerializedEditorState, SerializeError> {
        serialize_editor(&self.editor, Some(revision))
    }

    fn send(&self, message: ExternalMessage) {
        self.runtime.send_external(&self.extension_id, &message);
    }
}

fn set_property(target: &JsValue, name: &str, value: &JsValue) {
    if let Err(e) = js_sys::Reflect::set(target, &JsValue::from_str(name), value) {
        log::debug!("Could not set {name}: {e:?}");
    }
}

/// Connects one editor to the devtools extension.
#[wasm_bindgen]
pub struct DevtoolsAgent {
    inner: Option<Rc<AgentInner>>,
    registration: RefCell<Option<Registration>>,
}

#[wasm_bindgen]
impl DevtoolsAgent {
    /// Start reporting `editor` to the extension. `options` may carry an
    /// `extensionId`. Without `chrome.runtime` on the page the agent stays
    /// inert.
    pub fn attach(editor: Editor, options: JsValue) -> Result<DevtoolsAgent, JsValue> {
        let options: AgentOptions = if options.is_undefined() || options.is_null() {
            AgentOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };

        let Some(runtime) = Runtime::detect() else {
            log::debug!("chrome.runtime is not available; devtools agent disabled");
            return Ok(DevtoolsAgent::inert());
        };

        let extension_id = options
            .extension_id
            .unwrap_or_else(|| config().agent.extension_id.clone());
        let inner = Rc::new_cyclic(|agent: &Weak<AgentInner>| {
            Lifecycle::new(
                editor.get_key(),
                PagePort {
                    editor,
                    extension_id,
                    runtime,
                    agent: agent.clone(),
                    capabilities: RefCell::new(None),
                },
            )
        });
        log::info!("Devtools agent attached to editor {}", inner.id());

        let weak = Rc::downgrade(&inner);
        let on_root: Closure<dyn FnMut(Option<HtmlElement>, Option<HtmlElement>)> =
            Closure::new(move |root: Option<HtmlElement>, _previous: Option<HtmlElement>| {
                if let Some(agent) = weak.upgrade() {
                    match root {
                        Some(element) => agent.mount(element),
                        None => agent.unmount(),
                    }
                }
            });

        let weak = Rc::downgrade(&inner);
        let on_update: Closure<dyn FnMut(JsValue)> = Closure::new(move |_update: JsValue| {
            if let Some(agent) = weak.upgrade() {
                agent.on_update();
            }
        });

        let editor = &inner.port().editor;
        let unregister = vec![
            editor.register_root_listener(on_root.as_ref().unchecked_ref()),
            editor.register_update_listener(on_update.as_ref().unchecked_ref()),
        ];

        Ok(DevtoolsAgent {
            inner: Some(inner),
            registration: RefCell::new(Some(Registration {
                unregister,
                _on_root: on_root,
                _on_update: on_update,
            })),
        })
    }

    /// Whether the agent is reporting to an extension.
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.inner.is_some() && self.registration.borrow().is_some()
    }

    /// Stop reporting; tears down the root capabilities and announces the
    /// unmount. Safe to call more than once.
    pub fn detach(&self) {
        let Some(inner) = &self.inner else {
            return;
        };

        let registration = self.registration.borrow_mut().take();
        if let Some(registration) = registration {
            for unregister in &registration.unregister {
                if let Err(e) = unregister.call0(&JsValue::NULL) {
                    log::debug!("Listener teardown failed: {e:?}");
                }
            }
            log::info!("Devtools agent detached from editor {}", inner.id());
        }
        inner.unmount();
    }
}

impl DevtoolsAgent {
    /// An agent for a page without `chrome.runtime`.
    fn inert() -> Self {
        Self {
            inner: None,
            registration: RefCell::new(None),
        }
    }
}
