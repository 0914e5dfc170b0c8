//! Bindings to the Lexical editor and adapters onto the serializer traits.

use contracts::serializer::{
    EditorReadScope, LexicalEditor, LexicalNode, LexicalSelection, NodeCapability, SelectionKind,
    SerializeError,
};
use contracts::snapshot::SerializedPoint;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(typescript_type = "LexicalEditor")]
    #[derive(Clone)]
    pub type Editor;

    #[wasm_bindgen(method, js_name = getKey)]
    pub fn get_key(this: &Editor) -> String;

    #[wasm_bindgen(method, js_name = getEditorState)]
    pub fn get_editor_state(this: &Editor) -> EditorState;

    #[wasm_bindgen(method, js_name = getElementByKey)]
    pub fn get_element_by_key(this: &Editor, key: &str) -> Option<web_sys::HtmlElement>;

    #[wasm_bindgen(method, js_name = registerUpdateListener)]
    pub fn register_update_listener(this: &Editor, listener: &js_sys::Function) -> js_sys::Function;

    #[wasm_bindgen(method, js_name = registerRootListener)]
    pub fn register_root_listener(this: &Editor, listener: &js_sys::Function) -> js_sys::Function;

    #[wasm_bindgen(method, getter, js_name = _config)]
    fn config(this: &Editor) -> EditorConfig;

    type EditorConfig;

    #[wasm_bindgen(method, getter)]
    fn namespace(this: &EditorConfig) -> String;

    pub type EditorState;

    #[wasm_bindgen(method, catch)]
    fn read(this: &EditorState, callback: &js_sys::Function) -> Result<JsValue, JsValue>;

    pub type Node;

    #[wasm_bindgen(method, js_name = getKey)]
    fn get_key(this: &Node) -> String;

    #[wasm_bindgen(method, js_name = getType)]
    fn get_type(this: &Node) -> String;

    #[wasm_bindgen(method, js_name = getChildren)]
    fn get_children(this: &Node) -> js_sys::Array;

    #[wasm_bindgen(method, js_name = getTextContent)]
    fn get_text_content(this: &Node) -> String;

    #[wasm_bindgen(method, catch, js_name = exportJSON)]
    fn export_json(this: &Node) -> Result<JsValue, JsValue>;

    pub type Selection;

    #[wasm_bindgen(method, js_name = getNodes)]
    fn get_nodes(this: &Selection) -> js_sys::Array;

    #[wasm_bindgen(method, getter)]
    fn anchor(this: &Selection) -> JsValue;

    #[wasm_bindgen(method, getter)]
    fn focus(this: &Selection) -> JsValue;

    #[wasm_bindgen(method, getter)]
    fn format(this: &Selection) -> u32;
}

#[wasm_bindgen(module = "lexical")]
extern "C" {
    #[wasm_bindgen(js_name = "$getRoot")]
    fn get_root() -> Node;

    #[wasm_bindgen(js_name = "$getSelection")]
    fn get_selection() -> Option<Selection>;

    #[wasm_bindgen(js_name = "$isRootNode")]
    fn is_root_node(node: &Node) -> bool;

    #[wasm_bindgen(js_name = "$isElementNode")]
    fn is_element_node(node: &Node) -> bool;

    #[wasm_bindgen(js_name = "$isDecoratorNode")]
    fn is_decorator_node(node: &Node) -> bool;

    #[wasm_bindgen(js_name = "$isTextNode")]
    fn is_text_node(node: &Node) -> bool;

    #[wasm_bindgen(js_name = "$isLineBreakNode")]
    fn is_line_break_node(node: &Node) -> bool;

    #[wasm_bindgen(js_name = "$isRangeSelection")]
    fn is_range_selection(selection: &Selection) -> bool;

    #[wasm_bindgen(js_name = "$isNodeSelection")]
    fn is_node_selection(selection: &Selection) -> bool;
}

pub struct JsNode(Node);

impl LexicalNode for JsNode {
    fn key(&self) -> String {
        self.0.get_key()
    }

    fn node_type(&self) -> String {
        self.0.get_type()
    }

    fn capability(&self) -> NodeCapability {
        let node = &self.0;
        if is_root_node(node) {
            NodeCapability::Root
        } else if is_element_node(node) {
            NodeCapability::Element
        } else if is_decorator_node(node) {
            NodeCapability::Decorator
        } else if is_text_node(node) {
            NodeCapability::Text
        } else if is_line_break_node(node) {
            NodeCapability::LineBreak
        } else {
            NodeCapability::Unknown
        }
    }

    fn export_json(&self) -> Result<serde_json::Value, SerializeError> {
        let invalid = |reason: String| SerializeError::InvalidNode {
            key: self.0.get_key(),
            reason,
        };
        let exported = self.0.export_json().map_err(|e| invalid(format!("exportJSON threw {e:?}")))?;
        serde_wasm_bindgen::from_value(exported).map_err(|e| invalid(e.to_string()))
    }

    fn children(&self) -> Vec<Self> {
        self.0
            .get_children()
            .iter()
            .map(|child| JsNode(child.unchecked_into()))
            .collect()
    }

    fn text_content(&self) -> String {
        self.0.get_text_content()
    }
}

pub struct JsSelection(Selection);

impl LexicalSelection for JsSelection {
    fn node_keys(&self) -> Vec<String> {
        self.0
            .get_nodes()
            .iter()
            .map(|node| node.unchecked_into::<Node>().get_key())
            .collect()
    }

    fn kind(&self) -> SelectionKind {
        let selection = &self.0;
        if is_range_selection(selection) {
            let anchor = serde_wasm_bindgen::from_value::<SerializedPoint>(selection.anchor());
            let focus = serde_wasm_bindgen::from_value::<SerializedPoint>(selection.focus());
            match (anchor, focus) {
                (Ok(anchor), Ok(focus)) => SelectionKind::Range {
                    anchor,
                    focus,
                    format: selection.format(),
                },
                (Err(e), _) | (_, Err(e)) => {
                    log::warn!("Unreadable range selection point: {e}");
                    SelectionKind::Unknown
                }
            }
        } else if is_node_selection(selection) {
            SelectionKind::Node
        } else {
            SelectionKind::Unknown
        }
    }
}

/// Accessors that are only meaningful inside `editorState.read`.
pub struct ReadScope;

impl EditorReadScope for ReadScope {
    type Node = JsNode;
    type Selection = JsSelection;

    fn root(&self) -> JsNode {
        JsNode(get_root())
    }

    fn selection(&self) -> Option<JsSelection> {
        get_selection().map(JsSelection)
    }
}

impl LexicalEditor for Editor {
    type Scope = ReadScope;

    fn key(&self) -> String {
        self.get_key()
    }

    fn namespace(&self) -> String {
        self.config().namespace()
    }

    fn read<R: 'static>(
        &self,
        f: impl FnOnce(&ReadScope) -> R + 'static,
    ) -> Result<R, SerializeError> {
        let slot: Rc<RefCell<Option<R>>> = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&slot);
        let callback: Closure<dyn FnMut()> = Closure::once(move || {
            *sink.borrow_mut() = Some(f(&ReadScope));
        });

        self.get_editor_state()
            .read(callback.as_ref().unchecked_ref())
            .map_err(|e| SerializeError::ReadUnavailable(format!("{e:?}")))?;

        let result = slot.borrow_mut().take();
        result.ok_or_else(|| SerializeError::ReadUnavailable("read callback did not run".to_string()))
    }
}
