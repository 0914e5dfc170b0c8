pub mod chrome;
pub mod collapsible;
pub mod icons;
pub mod json_tree;
pub mod node_tree;
pub mod root_store;
pub mod selection_panel;
pub mod transport;
pub mod tree_view;
