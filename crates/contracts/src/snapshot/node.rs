use crate::tree::TreeNode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque `exportJSON()` payload of a node.
pub type JsonObject = Map<String, Value>;

/// Semantic role of a serialized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeGroup {
    Root,
    Element,
    Text,
    Decorator,
    LineBreak,
    Unknown,
}

impl NodeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeGroup::Root => "root",
            NodeGroup::Element => "element",
            NodeGroup::Text => "text",
            NodeGroup::Decorator => "decorator",
            NodeGroup::LineBreak => "line-break",
            NodeGroup::Unknown => "unknown",
        }
    }

    /// Root and element nodes own a `children` list.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeGroup::Root | NodeGroup::Element)
    }
}

/// Root or element node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerNode {
    pub key: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub children: Vec<SerializedNode>,
    pub meta: JsonObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub key: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub text: String,
    pub meta: JsonObject,
}

/// Decorator, line-break and unrecognised nodes carry no extra fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode {
    pub key: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub meta: JsonObject,
}

/// A node of an editor snapshot, discriminated on the wire by `group`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "group", rename_all = "kebab-case")]
pub enum SerializedNode {
    Root(ContainerNode),
    Element(ContainerNode),
    Text(TextNode),
    Decorator(LeafNode),
    LineBreak(LeafNode),
    Unknown(LeafNode),
}

impl SerializedNode {
    pub fn group(&self) -> NodeGroup {
        match self {
            SerializedNode::Root(_) => NodeGroup::Root,
            SerializedNode::Element(_) => NodeGroup::Element,
            SerializedNode::Text(_) => NodeGroup::Text,
            SerializedNode::Decorator(_) => NodeGroup::Decorator,
            SerializedNode::LineBreak(_) => NodeGroup::LineBreak,
            SerializedNode::Unknown(_) => NodeGroup::Unknown,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            SerializedNode::Root(node) | SerializedNode::Element(node) => &node.key,
            SerializedNode::Text(node) => &node.key,
            SerializedNode::Decorator(node)
            | SerializedNode::LineBreak(node)
            | SerializedNode::Unknown(node) => &node.key,
        }
    }

    pub fn node_type(&self) -> &str {
        match self {
            SerializedNode::Root(node) | SerializedNode::Element(node) => &node.node_type,
            SerializedNode::Text(node) => &node.node_type,
            SerializedNode::Decorator(node)
            | SerializedNode::LineBreak(node)
            | SerializedNode::Unknown(node) => &node.node_type,
        }
    }

    pub fn meta(&self) -> &JsonObject {
        match self {
            SerializedNode::Root(node) | SerializedNode::Element(node) => &node.meta,
            SerializedNode::Text(node) => &node.meta,
            SerializedNode::Decorator(node)
            | SerializedNode::LineBreak(node)
            | SerializedNode::Unknown(node) => &node.meta,
        }
    }

    /// Children of a root/element node, `None` for leaf groups.
    pub fn children(&self) -> Option<&[SerializedNode]> {
        match self {
            SerializedNode::Root(node) | SerializedNode::Element(node) => Some(&node.children),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            SerializedNode::Text(node) => Some(&node.text),
            _ => None,
        }
    }
}

impl TreeNode for SerializedNode {
    fn key(&self) -> &str {
        SerializedNode::key(self)
    }

    fn children(&self) -> Option<&[Self]> {
        SerializedNode::children(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format_uses_group_discriminant() {
        let value = json!({
            "group": "root",
            "key": "root",
            "type": "root",
            "meta": { "type": "root", "version": 1 },
            "children": [
                {
                    "group": "element",
                    "key": "1",
                    "type": "paragraph",
                    "meta": { "type": "paragraph" },
                    "children": [
                        { "group": "text", "key": "2", "type": "text", "text": "Hello", "meta": {} },
                        { "group": "line-break", "key": "3", "type": "linebreak", "meta": {} }
                    ]
                }
            ]
        });

        let node: SerializedNode = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(node.group(), NodeGroup::Root);
        let paragraph = &node.children().unwrap()[0];
        assert_eq!(paragraph.node_type(), "paragraph");
        assert_eq!(paragraph.children().unwrap()[0].text(), Some("Hello"));
        assert_eq!(paragraph.children().unwrap()[1].group(), NodeGroup::LineBreak);

        assert_eq!(serde_json::to_value(&node).unwrap(), value);
    }

    #[test]
    fn test_leaf_groups_have_no_children() {
        let node: SerializedNode = serde_json::from_value(json!({
            "group": "decorator",
            "key": "7",
            "type": "image",
            "meta": { "src": "cat.png" }
        }))
        .unwrap();

        assert!(node.children().is_none());
        assert!(!node.group().is_container());
        assert_eq!(node.meta().get("src"), Some(&json!("cat.png")));
    }

    #[test]
    fn test_unknown_group_is_rejected() {
        let result: Result<SerializedNode, _> = serde_json::from_value(json!({
            "group": "paragraph",
            "key": "1",
            "type": "paragraph",
            "meta": {}
        }));
        assert!(result.is_err());
    }
}
