//! Transferable snapshot of an editor: node tree, selection and identity.

pub mod editor;
pub mod node;
pub mod selection;

pub use editor::{SerializedEditorState, SNAPSHOT_VERSION};
pub use node::{ContainerNode, JsonObject, LeafNode, NodeGroup, SerializedNode, TextNode};
pub use selection::{NodeKeys, PointType, RangeSelection, SerializedPoint, SerializedSelection};
