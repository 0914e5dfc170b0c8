//! Message envelopes exchanged between the page agent, the devtools panel and
//! the content-script overlay. Every envelope is `{ type, payload? }`.

use crate::snapshot::SerializedEditorState;
use serde::{Deserialize, Serialize};

/// Attribute marking an editor's root element in the inspected page.
pub const EDITOR_KEY_ATTRIBUTE: &str = "data-lexical-editor-key";

/// Selector matching every mounted editor root.
pub const EDITOR_ROOT_SELECTOR: &str = "div[data-lexical-editor-key]";

/// Root-element property returning a fresh snapshot.
pub const SERIALIZE_CAPABILITY: &str = "__serialize";

/// Root-element property resolving a node key to its DOM element.
pub const ELEMENT_LOOKUP_CAPABILITY: &str = "__getHTMLElement";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorStatePayload {
    pub id: String,
    pub state: SerializedEditorState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorIdPayload {
    pub id: String,
}

/// Agent → panel lifecycle stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ExternalMessage {
    #[serde(rename = "LEXICAL_EDITOR_MOUNTED")]
    EditorMounted(EditorStatePayload),
    #[serde(rename = "LEXICAL_EDITOR_UNMOUNTED")]
    EditorUnmounted(EditorIdPayload),
    #[serde(rename = "UPDATE_EDITOR_STATE")]
    EditorUpdated(EditorStatePayload),
}

impl ExternalMessage {
    pub fn mounted(state: SerializedEditorState) -> Self {
        ExternalMessage::EditorMounted(EditorStatePayload {
            id: state.id.clone(),
            state,
        })
    }

    pub fn updated(state: SerializedEditorState) -> Self {
        ExternalMessage::EditorUpdated(EditorStatePayload {
            id: state.id.clone(),
            state,
        })
    }

    pub fn unmounted(id: impl Into<String>) -> Self {
        ExternalMessage::EditorUnmounted(EditorIdPayload { id: id.into() })
    }

    /// Id of the editor the message is about.
    pub fn editor_id(&self) -> &str {
        match self {
            ExternalMessage::EditorMounted(payload) | ExternalMessage::EditorUpdated(payload) => {
                &payload.id
            }
            ExternalMessage::EditorUnmounted(payload) => &payload.id,
        }
    }
}

/// Bounding rectangle of a page element, viewport-relative CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightPayload {
    pub rect: Rect,
}

/// Panel → content-script overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ContentMessage {
    #[serde(rename = "CREATE_HIGHLIGHT")]
    CreateHighlight(HighlightPayload),
    #[serde(rename = "REMOVE_HIGHLIGHT")]
    RemoveHighlight,
    #[serde(rename = "DEVTOOLS_PANEL_UNLOADED")]
    DevtoolsPanelUnloaded,
}

impl ContentMessage {
    pub fn create_highlight(rect: Rect) -> Self {
        ContentMessage::CreateHighlight(HighlightPayload { rect })
    }
}
