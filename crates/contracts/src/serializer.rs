//! Snapshot serializer.
//!
//! Converts a live editor into a [`SerializedEditorState`] through the
//! framework's read-only surface, modelled here as traits so the algorithm
//! runs unchanged against the wasm bindings in the agent and against
//! in-memory fixtures in tests.

use crate::snapshot::{
    ContainerNode, LeafNode, NodeKeys, RangeSelection, SerializedEditorState, SerializedNode,
    SerializedPoint, SerializedSelection, TextNode, SNAPSHOT_VERSION,
};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializeError {
    /// The editor state could not be read, e.g. the editor was torn down.
    #[error("editor state is not readable: {0}")]
    ReadUnavailable(String),

    #[error("node {key} could not be serialized: {reason}")]
    InvalidNode { key: String, reason: String },
}

/// What a node can do, decided by the framework's `$is*Node` predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCapability {
    Root,
    Element,
    Text,
    Decorator,
    LineBreak,
    Unknown,
}

/// Read-only view of one framework node.
pub trait LexicalNode: Sized {
    fn key(&self) -> String;
    fn node_type(&self) -> String;
    fn capability(&self) -> NodeCapability;
    fn export_json(&self) -> Result<Value, SerializeError>;
    /// Only consulted for root and element nodes.
    fn children(&self) -> Vec<Self>;
    /// Only consulted for text nodes.
    fn text_content(&self) -> String;
}

pub enum SelectionKind {
    Range {
        anchor: SerializedPoint,
        focus: SerializedPoint,
        format: u32,
    },
    Node,
    Unknown,
}

pub trait LexicalSelection {
    fn node_keys(&self) -> Vec<String>;
    fn kind(&self) -> SelectionKind;
}

/// Accessors valid only inside [`LexicalEditor::read`].
pub trait EditorReadScope {
    type Node: LexicalNode;
    type Selection: LexicalSelection;

    fn root(&self) -> Self::Node;
    fn selection(&self) -> Option<Self::Selection>;
}

pub trait LexicalEditor {
    type Scope: EditorReadScope;

    fn key(&self) -> String;
    fn namespace(&self) -> String;

    /// Run `f` inside a single read transaction over the current editor state.
    fn read<R: 'static>(
        &self,
        f: impl FnOnce(&Self::Scope) -> R + 'static,
    ) -> Result<R, SerializeError>;
}

pub fn serialize_node<N: LexicalNode>(node: &N) -> Result<SerializedNode, SerializeError> {
    let key = node.key();
    let node_type = node.node_type();
    let meta = match node.export_json()? {
        Value::Object(meta) => meta,
        other => {
            return Err(SerializeError::InvalidNode {
                key,
                reason: format!("exportJSON returned {}", json_kind(&other)),
            })
        }
    };

    let serialized = match node.capability() {
        NodeCapability::Root => SerializedNode::Root(ContainerNode {
            children: serialize_children(node)?,
            key,
            node_type,
            meta,
        }),
        NodeCapability::Element => SerializedNode::Element(ContainerNode {
            children: serialize_children(node)?,
            key,
            node_type,
            meta,
        }),
        NodeCapability::Text => SerializedNode::Text(TextNode {
            text: node.text_content(),
            key,
            node_type,
            meta,
        }),
        NodeCapability::Decorator => SerializedNode::Decorator(LeafNode { key, node_type, meta }),
        NodeCapability::LineBreak => SerializedNode::LineBreak(LeafNode { key, node_type, meta }),
        NodeCapability::Unknown => SerializedNode::Unknown(LeafNode { key, node_type, meta }),
    };

    Ok(serialized)
}

fn serialize_children<N: LexicalNode>(node: &N) -> Result<Vec<SerializedNode>, SerializeError> {
    node.children().iter().map(serialize_node).collect()
}

pub fn serialize_selection<S: LexicalSelection>(selection: &S) -> SerializedSelection {
    let nodes = selection.node_keys();

    match selection.kind() {
        SelectionKind::Range {
            anchor,
            focus,
            format,
        } => SerializedSelection::Range(RangeSelection {
            anchor,
            focus,
            format,
            nodes,
        }),
        SelectionKind::Node => SerializedSelection::Node(NodeKeys { nodes }),
        SelectionKind::Unknown => SerializedSelection::Unknown(NodeKeys { nodes }),
    }
}

/// Snapshot the whole editor inside one read transaction. Either the full
/// snapshot is produced or an error; never a partial tree.
pub fn serialize_editor<E: LexicalEditor>(
    editor: &E,
    revision: Option<u64>,
) -> Result<SerializedEditorState, SerializeError> {
    let id = editor.key();
    let namespace = editor.namespace();

    let (root, selection) = editor.read(|scope| -> Result<_, SerializeError> {
        let root = scope.root();
        if root.capability() != NodeCapability::Root {
            return Err(SerializeError::InvalidNode {
                key: root.key(),
                reason: "editor root is not a root node".to_string(),
            });
        }
        let root = serialize_node(&root)?;
        let selection = scope.selection().map(|selection| serialize_selection(&selection));
        Ok((root, selection))
    })??;

    Ok(SerializedEditorState {
        id,
        namespace,
        root,
        selection,
        version: SNAPSHOT_VERSION,
        revision,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{NodeGroup, PointType};
    use serde_json::json;

    #[derive(Clone)]
    struct FakeNode {
        key: &'static str,
        node_type: &'static str,
        capability: NodeCapability,
        meta: Value,
        text: &'static str,
        children: Vec<FakeNode>,
    }

    fn node(key: &'static str, node_type: &'static str, capability: NodeCapability) -> FakeNode {
        FakeNode {
            key,
            node_type,
            capability,
            meta: json!({ "type": node_type, "version": 1 }),
            text: "",
            children: Vec::new(),
        }
    }

    impl FakeNode {
        fn with_children(mut self, children: Vec<FakeNode>) -> Self {
            self.children = children;
            self
        }

        fn with_text(mut self, text: &'static str) -> Self {
            self.text = text;
            self
        }
    }

    impl LexicalNode for FakeNode {
        fn key(&self) -> String {
            self.key.to_string()
        }

        fn node_type(&self) -> String {
            self.node_type.to_string()
        }

        fn capability(&self) -> NodeCapability {
            self.capability
        }

        fn export_json(&self) -> Result<Value, SerializeError> {
            Ok(self.meta.clone())
        }

        fn children(&self) -> Vec<Self> {
            self.children.clone()
        }

        fn text_content(&self) -> String {
            self.text.to_string()
        }
    }

    #[derive(Clone)]
    enum FakeSelection {
        Range,
        Node,
    }

    impl LexicalSelection for FakeSelection {
        fn node_keys(&self) -> Vec<String> {
            vec!["2".to_string(), "3".to_string()]
        }

        fn kind(&self) -> SelectionKind {
            match self {
                FakeSelection::Range => SelectionKind::Range {
                    anchor: SerializedPoint {
                        key: "2".into(),
                        offset: 1,
                        point_type: PointType::Text,
                    },
                    focus: SerializedPoint {
                        key: "3".into(),
                        offset: 0,
                        point_type: PointType::Element,
                    },
                    format: 3,
                },
                FakeSelection::Node => SelectionKind::Node,
            }
        }
    }

    #[derive(Clone)]
    struct FakeScope {
        root: FakeNode,
        selection: Option<FakeSelection>,
    }

    impl EditorReadScope for FakeScope {
        type Node = FakeNode;
        type Selection = FakeSelection;

        fn root(&self) -> FakeNode {
            self.root.clone()
        }

        fn selection(&self) -> Option<FakeSelection> {
            self.selection.clone()
        }
    }

    struct FakeEditor {
        scope: FakeScope,
        torn_down: bool,
    }

    impl LexicalEditor for FakeEditor {
        type Scope = FakeScope;

        fn key(&self) -> String {
            "e1".to_string()
        }

        fn namespace(&self) -> String {
            "playground".to_string()
        }

        fn read<R: 'static>(
            &self,
            f: impl FnOnce(&FakeScope) -> R + 'static,
        ) -> Result<R, SerializeError> {
            if self.torn_down {
                return Err(SerializeError::ReadUnavailable("editor destroyed".into()));
            }
            Ok(f(&self.scope))
        }
    }

    fn editor(selection: Option<FakeSelection>) -> FakeEditor {
        let root = node("root", "root", NodeCapability::Root).with_children(vec![
            node("1", "paragraph", NodeCapability::Element).with_children(vec![
                node("2", "text", NodeCapability::Text).with_text("Hello"),
                node("3", "linebreak", NodeCapability::LineBreak),
                node("4", "image", NodeCapability::Decorator),
            ]),
            node("5", "custom", NodeCapability::Unknown),
        ]);

        FakeEditor {
            scope: FakeScope { root, selection },
            torn_down: false,
        }
    }

    #[test]
    fn test_serialize_editor_classifies_groups() {
        let state = serialize_editor(&editor(None), Some(4)).unwrap();

        assert_eq!(state.id, "e1");
        assert_eq!(state.namespace, "playground");
        assert_eq!(state.version, SNAPSHOT_VERSION);
        assert_eq!(state.revision, Some(4));
        assert!(state.selection.is_none());

        assert_eq!(state.root.group(), NodeGroup::Root);
        let root_children = state.root.children().unwrap();
        assert_eq!(root_children[1].group(), NodeGroup::Unknown);

        let paragraph = &root_children[0];
        assert_eq!(paragraph.group(), NodeGroup::Element);
        let groups: Vec<NodeGroup> = paragraph
            .children()
            .unwrap()
            .iter()
            .map(SerializedNode::group)
            .collect();
        assert_eq!(
            groups,
            [NodeGroup::Text, NodeGroup::LineBreak, NodeGroup::Decorator]
        );
        assert_eq!(paragraph.children().unwrap()[0].text(), Some("Hello"));
        assert_eq!(paragraph.meta().get("type"), Some(&json!("paragraph")));
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let editor = editor(Some(FakeSelection::Range));
        let first = serialize_editor(&editor, None).unwrap();
        let second = serialize_editor(&editor, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_serialize_range_selection() {
        let state = serialize_editor(&editor(Some(FakeSelection::Range)), None).unwrap();
        let selection = state.selection.unwrap();
        let range = selection.as_range().unwrap();
        assert_eq!(range.anchor.key, "2");
        assert_eq!(range.anchor.offset, 1);
        assert_eq!(range.focus.point_type, PointType::Element);
        assert_eq!(range.format, 3);
        assert_eq!(range.nodes, ["2", "3"]);
    }

    #[test]
    fn test_serialize_node_selection() {
        let state = serialize_editor(&editor(Some(FakeSelection::Node)), None).unwrap();
        let selection = state.selection.unwrap();
        assert!(matches!(selection, SerializedSelection::Node(_)));
        assert_eq!(selection.nodes(), ["2", "3"]);
    }

    #[test]
    fn test_torn_down_editor_yields_no_snapshot() {
        let mut editor = editor(None);
        editor.torn_down = true;
        assert!(matches!(
            serialize_editor(&editor, None),
            Err(SerializeError::ReadUnavailable(_))
        ));
    }

    #[test]
    fn test_non_object_meta_fails_whole_snapshot() {
        let mut editor = editor(None);
        editor.scope.root.children[0].children[0].meta = json!("oops");
        let err = serialize_editor(&editor, None).unwrap_err();
        assert_eq!(
            err,
            SerializeError::InvalidNode {
                key: "2".into(),
                reason: "exportJSON returned a string".into(),
            }
        );
    }

    #[test]
    fn test_root_must_be_root_node() {
        let mut editor = editor(None);
        editor.scope.root.capability = NodeCapability::Element;
        assert!(matches!(
            serialize_editor(&editor, None),
            Err(SerializeError::InvalidNode { .. })
        ));
    }
}
