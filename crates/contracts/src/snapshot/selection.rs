use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointType {
    Text,
    Element,
}

/// One boundary of a range selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedPoint {
    pub key: String,
    pub offset: u32,
    #[serde(rename = "type")]
    pub point_type: PointType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSelection {
    pub anchor: SerializedPoint,
    pub focus: SerializedPoint,
    /// Text format bitmask of the range.
    pub format: u32,
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeKeys {
    pub nodes: Vec<String>,
}

/// Active selection of an editor, discriminated on the wire by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SerializedSelection {
    Range(RangeSelection),
    Node(NodeKeys),
    Unknown(NodeKeys),
}

impl SerializedSelection {
    /// Keys of every node touched by the selection.
    pub fn nodes(&self) -> &[String] {
        match self {
            SerializedSelection::Range(range) => &range.nodes,
            SerializedSelection::Node(selection) | SerializedSelection::Unknown(selection) => {
                &selection.nodes
            }
        }
    }

    pub fn as_range(&self) -> Option<&RangeSelection> {
        match self {
            SerializedSelection::Range(range) => Some(range),
            _ => None,
        }
    }
}
