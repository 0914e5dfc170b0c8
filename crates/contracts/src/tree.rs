//! Key-based tree queries and the tree-view interaction state machine.
//!
//! Everything here works over opaque string keys through [`TreeNode`], so the
//! same rules drive the node tree, the JSON tree and the selection panel.
//! Collapse-aware traversal follows the ARIA treeview keyboard pattern: a
//! node below a collapsed ancestor is invisible to navigation.

use serde::{Deserialize, Serialize};

/// A node addressable by key whose children can be hidden by collapsing it.
pub trait TreeNode: Sized {
    fn key(&self) -> &str;

    /// `None` for leaves; `Some` (possibly empty) for containers.
    fn children(&self) -> Option<&[Self]>;
}

/// Find the node with the given key.
pub fn get_node_by_key<'a, N: TreeNode>(node: &'a N, key: &str) -> Option<&'a N> {
    if node.key() == key {
        return Some(node);
    }

    node.children()?
        .iter()
        .find_map(|child| get_node_by_key(child, key))
}

/// Keys of the ancestors of `key`, ordered from the tree root to the direct
/// parent. `None` when the key is not in the tree.
///
/// ```text
/// root
/// ├── element-1
/// │   ├── element-2
/// │   │   └── element-3
/// │   └── element-4
/// └── element-5
/// ```
///
/// The ancestors of `element-3` are `["root", "element-1", "element-2"]`.
pub fn get_ancestors<N: TreeNode>(node: &N, key: &str) -> Option<Vec<String>> {
    if node.key() == key {
        return Some(Vec::new());
    }

    for child in node.children()? {
        if let Some(mut ancestors) = get_ancestors(child, key) {
            ancestors.insert(0, node.key().to_string());
            return Some(ancestors);
        }
    }

    None
}

/// Direct parent of `key`, ignoring collapse state.
pub fn parent_of<'a, N: TreeNode>(tree: &'a N, key: &str) -> Option<&'a N> {
    let children = tree.children()?;
    if children.iter().any(|child| child.key() == key) {
        return Some(tree);
    }

    children.iter().find_map(|child| parent_of(child, key))
}

pub fn first_child<'a, N: TreeNode>(tree: &'a N, key: &str) -> Option<&'a N> {
    get_node_by_key(tree, key)?.children()?.first()
}

/// Whether `key` can be reached from the tree root without descending into a
/// collapsed node. A collapsed node itself stays visible.
pub fn is_node_visible<N: TreeNode>(tree: &N, key: &str, collapsed: &[String]) -> bool {
    if tree.key() == key {
        return true;
    }

    if is_collapsed(collapsed, tree.key()) {
        return false;
    }

    match tree.children() {
        Some(children) => children
            .iter()
            .any(|child| is_node_visible(child, key, collapsed)),
        None => false,
    }
}

/// Depth-first, pre-order list of the nodes not hidden by a collapsed ancestor.
pub fn visible_nodes<'a, N: TreeNode>(tree: &'a N, collapsed: &[String]) -> Vec<&'a N> {
    fn walk<'a, N: TreeNode>(node: &'a N, collapsed: &[String], out: &mut Vec<&'a N>) {
        out.push(node);
        if is_collapsed(collapsed, node.key()) {
            return;
        }
        if let Some(children) = node.children() {
            for child in children {
                walk(child, collapsed, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(tree, collapsed, &mut out);
    out
}

/// The visible node following `key` in depth-first order.
pub fn next_visible<'a, N: TreeNode>(tree: &'a N, key: &str, collapsed: &[String]) -> Option<&'a N> {
    let visible = visible_nodes(tree, collapsed);
    let index = visible.iter().position(|node| node.key() == key)?;
    visible.get(index + 1).copied()
}

/// The visible node preceding `key` in depth-first order.
pub fn previous_visible<'a, N: TreeNode>(
    tree: &'a N,
    key: &str,
    collapsed: &[String],
) -> Option<&'a N> {
    let visible = visible_nodes(tree, collapsed);
    let index = visible.iter().position(|node| node.key() == key)?;
    index.checked_sub(1).map(|previous| visible[previous])
}

fn is_collapsed(collapsed: &[String], key: &str) -> bool {
    collapsed.iter().any(|k| k == key)
}

/// Selection and collapse state of a tree view. Owned by the caller so several
/// views can share one instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeViewState {
    /// Most recent selection last.
    pub selected: Vec<String>,
    pub collapsed: Vec<String>,
}

impl TreeViewState {
    pub fn new(selected: Vec<String>, collapsed: Vec<String>) -> Self {
        Self { selected, collapsed }
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.iter().any(|k| k == key)
    }

    pub fn is_collapsed(&self, key: &str) -> bool {
        is_collapsed(&self.collapsed, key)
    }

    pub fn last_selected(&self) -> Option<&str> {
        self.selected.last().map(String::as_str)
    }

    /// Make `key` the single selection. Returns whether anything changed.
    pub fn select(&mut self, key: &str) -> bool {
        if self.selected.len() == 1 && self.selected[0] == key {
            return false;
        }
        self.selected = vec![key.to_string()];
        true
    }

    pub fn collapse(&mut self, key: &str) -> bool {
        if self.is_collapsed(key) {
            return false;
        }
        self.collapsed.push(key.to_string());
        true
    }

    /// Expand `key` together with every ancestor so the node ends up visible.
    pub fn expand(&mut self, key: &str, ancestors: &[String]) -> bool {
        let before = self.collapsed.len();
        self.collapsed
            .retain(|k| k != key && !ancestors.iter().any(|ancestor| ancestor == k));
        self.collapsed.len() != before
    }

    pub fn toggle(&mut self, key: &str, ancestors: &[String]) -> bool {
        if self.is_collapsed(key) {
            self.expand(key, ancestors)
        } else {
            self.collapse(key)
        }
    }

    /// Select `key` and expand all of its ancestors. Used when a node is
    /// picked from outside the tree (e.g. the selection panel).
    pub fn reveal<N: TreeNode>(&mut self, tree: &N, key: &str) -> bool {
        let ancestors = get_ancestors(tree, key).unwrap_or_default();
        let selected = self.select(key);
        let before = self.collapsed.len();
        self.collapsed
            .retain(|k| !ancestors.iter().any(|ancestor| ancestor == k));
        selected || self.collapsed.len() != before
    }

    /// Apply the outcome of [`navigate`]. Returns whether anything changed.
    pub fn apply(&mut self, navigation: &Navigation) -> bool {
        match navigation {
            Navigation::None => false,
            Navigation::Focus(key) => self.select(key),
            Navigation::SetCollapsed(collapsed) => {
                if &self.collapsed == collapsed {
                    return false;
                }
                self.collapsed = collapsed.clone();
                true
            }
        }
    }
}

/// Roving tabindex: the one key of the tree that is a tab stop.
///
/// That is the last selected item, or the tree root when nothing is selected
/// or the last selection is hidden by a collapsed ancestor (or no longer
/// exists).
pub fn tab_stop<N: TreeNode>(tree: &N, state: &TreeViewState) -> String {
    match state.last_selected() {
        Some(last) if is_node_visible(tree, last, &state.collapsed) => last.to_string(),
        _ => tree.key().to_string(),
    }
}

/// `0` for the [`tab_stop`], `-1` for every other item.
pub fn tab_index<N: TreeNode>(tree: &N, state: &TreeViewState, key: &str) -> i32 {
    if tab_stop(tree, state) == key {
        0
    } else {
        -1
    }
}

/// Keys handled by tree keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl TreeKey {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(TreeKey::ArrowUp),
            "ArrowDown" => Some(TreeKey::ArrowDown),
            "ArrowLeft" => Some(TreeKey::ArrowLeft),
            "ArrowRight" => Some(TreeKey::ArrowRight),
            _ => None,
        }
    }
}

/// What a key press asks the view to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    None,
    /// Move focus (and selection) to this key.
    Focus(String),
    /// Replace the collapsed set.
    SetCollapsed(Vec<String>),
}

/// Resolve a key press on the item `current`.
///
/// Left on an expanded container collapses it; on a collapsed container or a
/// leaf it moves to the parent. Right on a collapsed container expands it; on
/// an expanded container it moves to the first child; on a leaf it does
/// nothing.
pub fn navigate<N: TreeNode>(tree: &N, collapsed: &[String], current: &str, key: TreeKey) -> Navigation {
    let focus = |node: Option<&N>| match node {
        Some(node) => Navigation::Focus(node.key().to_string()),
        None => Navigation::None,
    };

    match key {
        TreeKey::ArrowUp => focus(previous_visible(tree, current, collapsed)),
        TreeKey::ArrowDown => focus(next_visible(tree, current, collapsed)),
        TreeKey::ArrowLeft => {
            let Some(node) = get_node_by_key(tree, current) else {
                return Navigation::None;
            };
            if node.children().is_some() && !is_collapsed(collapsed, current) {
                let mut next = collapsed.to_vec();
                next.push(current.to_string());
                return Navigation::SetCollapsed(next);
            }
            focus(parent_of(tree, current))
        }
        TreeKey::ArrowRight => {
            let Some(node) = get_node_by_key(tree, current) else {
                return Navigation::None;
            };
            if node.children().is_none() {
                return Navigation::None;
            }
            if is_collapsed(collapsed, current) {
                return Navigation::SetCollapsed(
                    collapsed.iter().filter(|k| *k != current).cloned().collect(),
                );
            }
            focus(first_child(tree, current))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Node {
        key: &'static str,
        children: Option<Vec<Node>>,
    }

    fn branch(key: &'static str, children: Vec<Node>) -> Node {
        Node { key, children: Some(children) }
    }

    fn leaf(key: &'static str) -> Node {
        Node { key, children: None }
    }

    impl TreeNode for Node {
        fn key(&self) -> &str {
            self.key
        }

        fn children(&self) -> Option<&[Self]> {
            self.children.as_deref()
        }
    }

    /// root → [a → [a1, a2], b]
    fn sample() -> Node {
        branch("root", vec![branch("a", vec![leaf("a1"), leaf("a2")]), leaf("b")])
    }

    fn keys(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_get_node_by_key() {
        let tree = sample();
        for key in ["root", "a", "a1", "a2", "b"] {
            assert_eq!(get_node_by_key(&tree, key).map(|n| n.key), Some(key));
        }
        assert!(get_node_by_key(&tree, "missing").is_none());
    }

    #[test]
    fn test_get_ancestors() {
        let tree = sample();
        assert_eq!(get_ancestors(&tree, "a2"), Some(keys(&["root", "a"])));
        assert_eq!(get_ancestors(&tree, "root"), Some(Vec::new()));
        assert_eq!(get_ancestors(&tree, "missing"), None);
    }

    #[test]
    fn test_expanding_ancestors_makes_node_visible() {
        let tree = sample();
        let mut state = TreeViewState::new(vec![], keys(&["root", "a"]));

        for key in ["a", "a1", "a2", "b"] {
            let ancestors = get_ancestors(&tree, key).unwrap();
            let mut candidate = state.clone();
            candidate
                .collapsed
                .retain(|k| !ancestors.contains(k));
            assert!(is_node_visible(&tree, key, &candidate.collapsed), "{key}");
        }

        assert!(!is_node_visible(&tree, "a1", &state.collapsed));
        assert!(state.expand("a1", &get_ancestors(&tree, "a1").unwrap()));
        assert!(is_node_visible(&tree, "a1", &state.collapsed));
        assert!(state.collapsed.is_empty());
    }

    #[test]
    fn test_collapsed_node_is_skipped_by_next_visible() {
        let tree = sample();
        assert_eq!(next_visible(&tree, "a", &[]).map(|n| n.key), Some("a1"));

        let collapsed = keys(&["a"]);
        assert_eq!(next_visible(&tree, "a", &collapsed).map(|n| n.key), Some("b"));
        assert_eq!(previous_visible(&tree, "b", &collapsed).map(|n| n.key), Some("a"));
        assert!(next_visible(&tree, "b", &collapsed).is_none());
        assert!(previous_visible(&tree, "root", &collapsed).is_none());
        assert!(next_visible(&tree, "a1", &collapsed).is_none());
    }

    #[test]
    fn test_arrow_down_and_up() {
        let tree = sample();
        assert_eq!(
            navigate(&tree, &[], "root", TreeKey::ArrowDown),
            Navigation::Focus("a".into())
        );
        assert_eq!(
            navigate(&tree, &[], "a", TreeKey::ArrowDown),
            Navigation::Focus("a1".into())
        );
        assert_eq!(
            navigate(&tree, &[], "b", TreeKey::ArrowUp),
            Navigation::Focus("a2".into())
        );
        assert_eq!(navigate(&tree, &[], "b", TreeKey::ArrowDown), Navigation::None);
    }

    #[test]
    fn test_arrow_right() {
        let tree = sample();
        assert_eq!(navigate(&tree, &[], "a1", TreeKey::ArrowRight), Navigation::None);
        assert_eq!(
            navigate(&tree, &[], "a", TreeKey::ArrowRight),
            Navigation::Focus("a1".into())
        );
        assert_eq!(
            navigate(&tree, &keys(&["a", "b"]), "a", TreeKey::ArrowRight),
            Navigation::SetCollapsed(keys(&["b"]))
        );
    }

    #[test]
    fn test_arrow_left_is_two_phase() {
        let tree = sample();
        let mut state = TreeViewState::new(keys(&["a1"]), vec![]);

        let nav = navigate(&tree, &state.collapsed, "a1", TreeKey::ArrowLeft);
        assert_eq!(nav, Navigation::Focus("a".into()));
        assert!(state.apply(&nav));
        assert_eq!(state.selected, keys(&["a"]));

        // First press on the expanded container collapses it in place.
        let nav = navigate(&tree, &state.collapsed, "a", TreeKey::ArrowLeft);
        assert_eq!(nav, Navigation::SetCollapsed(keys(&["a"])));
        assert!(state.apply(&nav));
        assert_eq!(state.selected, keys(&["a"]));

        // Second press moves to the parent.
        let nav = navigate(&tree, &state.collapsed, "a", TreeKey::ArrowLeft);
        assert_eq!(nav, Navigation::Focus("root".into()));
        assert!(state.apply(&nav));
        assert_eq!(state.selected, keys(&["root"]));

        let nav = navigate(&tree, &[], "root", TreeKey::ArrowLeft);
        assert_eq!(nav, Navigation::SetCollapsed(keys(&["root"])));
        assert_eq!(
            navigate(&tree, &keys(&["root"]), "root", TreeKey::ArrowLeft),
            Navigation::None
        );
    }

    #[test]
    fn test_navigation_from_unknown_key_does_nothing() {
        let tree = sample();
        for key in [TreeKey::ArrowUp, TreeKey::ArrowDown, TreeKey::ArrowLeft, TreeKey::ArrowRight] {
            assert_eq!(navigate(&tree, &[], "gone", key), Navigation::None);
        }
    }

    #[test]
    fn test_tab_index_has_single_tab_stop() {
        let tree = sample();
        let all = ["root", "a", "a1", "a2", "b"];
        let stops = |state: &TreeViewState| -> Vec<&str> {
            all.iter()
                .copied()
                .filter(|key| tab_index(&tree, state, key) == 0)
                .collect()
        };

        assert_eq!(stops(&TreeViewState::default()), ["root"]);
        assert_eq!(stops(&TreeViewState::new(keys(&["a2"]), vec![])), ["a2"]);
        assert_eq!(stops(&TreeViewState::new(keys(&["b", "a1"]), vec![])), ["a1"]);
        assert_eq!(stops(&TreeViewState::new(keys(&["a2"]), keys(&["a"]))), ["root"]);
        assert_eq!(stops(&TreeViewState::new(keys(&["removed"]), vec![])), ["root"]);
    }

    #[test]
    fn test_tab_stop_follows_visible_selection() {
        let tree = sample();
        assert_eq!(tab_stop(&tree, &TreeViewState::default()), "root");
        assert_eq!(tab_stop(&tree, &TreeViewState::new(keys(&["a1"]), vec![])), "a1");
        assert_eq!(tab_stop(&tree, &TreeViewState::new(keys(&["a1"]), keys(&["a"]))), "root");
    }

    #[test]
    fn test_reveal_selects_and_expands_ancestors() {
        let tree = branch(
            "root",
            vec![branch("p", vec![branch("q", vec![leaf("t")])]), leaf("z")],
        );
        let mut state = TreeViewState::new(keys(&["z"]), keys(&["p", "q", "z"]));

        assert!(state.reveal(&tree, "t"));
        assert_eq!(state.selected, keys(&["t"]));
        assert_eq!(state.collapsed, keys(&["z"]));
        assert!(is_node_visible(&tree, "t", &state.collapsed));
        assert!(!state.reveal(&tree, "t"));
    }

    #[test]
    fn test_select_collapse_toggle() {
        let mut state = TreeViewState::default();
        assert!(state.select("a"));
        assert!(!state.select("a"));
        assert!(state.collapse("a"));
        assert!(!state.collapse("a"));
        assert!(state.toggle("a", &[]));
        assert!(!state.is_collapsed("a"));
        assert!(state.toggle("a", &[]));
        assert!(state.is_collapsed("a"));
    }

    #[test]
    fn test_tree_key_from_dom_key() {
        assert_eq!(TreeKey::from_key("ArrowLeft"), Some(TreeKey::ArrowLeft));
        assert_eq!(TreeKey::from_key("Enter"), None);
    }
}
