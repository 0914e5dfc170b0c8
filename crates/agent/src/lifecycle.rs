//! Mount/update/unmount bookkeeping for one editor, independent of the page.

use contracts::messages::ExternalMessage;
use contracts::serializer::SerializeError;
use contracts::snapshot::SerializedEditorState;
use std::cell::{Cell, RefCell};

/// What the lifecycle needs from the page it runs in.
pub trait AgentPort {
    /// Identity of an editor root element.
    type Root: PartialEq;

    /// Mark `root` and install the page-world capabilities on it.
    fn install(&self, root: &Self::Root);

    /// Undo [`AgentPort::install`].
    fn uninstall(&self, root: &Self::Root);

    fn serialize(&self, revision: u64) -> Result<SerializedEditorState, SerializeError>;

    fn send(&self, message: ExternalMessage);
}

/// One editor's reporting state. Revisions start at 1 for every lifecycle
/// and grow with each snapshot, pulled or pushed.
pub struct Lifecycle<P: AgentPort> {
    id: String,
    port: P,
    revision: Cell<u64>,
    root: RefCell<Option<P::Root>>,
}

impl<P: AgentPort> Lifecycle<P> {
    pub fn new(id: impl Into<String>, port: P) -> Self {
        Self {
            id: id.into(),
            port,
            revision: Cell::new(0),
            root: RefCell::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn is_mounted(&self) -> bool {
        self.root.borrow().is_some()
    }

    /// Serialize under the next revision.
    pub fn snapshot(&self) -> Result<SerializedEditorState, SerializeError> {
        let revision = self.revision.get() + 1;
        self.revision.set(revision);
        self.port.serialize(revision)
    }

    /// Start reporting on `root`. Mounting the current root again does
    /// nothing; a different root replaces the current one.
    pub fn mount(&self, root: P::Root) {
        if self.root.borrow().as_ref() == Some(&root) {
            return;
        }
        self.unmount();

        self.port.install(&root);
        *self.root.borrow_mut() = Some(root);

        log::info!("Editor {} mounted", self.id);
        match self.snapshot() {
            Ok(state) => self.port.send(ExternalMessage::mounted(state)),
            Err(e) => log::warn!("Could not serialize editor {} on mount: {e}", self.id),
        }
    }

    pub fn unmount(&self) {
        let Some(root) = self.root.borrow_mut().take() else {
            return;
        };
        self.port.uninstall(&root);

        log::info!("Editor {} unmounted", self.id);
        self.port.send(ExternalMessage::unmounted(self.id.clone()));
    }

    pub fn on_update(&self) {
        if !self.is_mounted() {
            return;
        }
        match self.snapshot() {
            Ok(state) => self.port.send(ExternalMessage::updated(state)),
            Err(e) => log::debug!("Skipping update of editor {}: {e}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingPort {
        installed: RefCell<Vec<&'static str>>,
        uninstalled: RefCell<Vec<&'static str>>,
        sent: RefCell<Vec<ExternalMessage>>,
        unreadable: Cell<bool>,
    }

    impl AgentPort for RecordingPort {
        type Root = &'static str;

        fn install(&self, root: &&'static str) {
            self.installed.borrow_mut().push(*root);
        }

        fn uninstall(&self, root: &&'static str) {
            self.uninstalled.borrow_mut().push(*root);
        }

        fn serialize(&self, revision: u64) -> Result<SerializedEditorState, SerializeError> {
            if self.unreadable.get() {
                return Err(SerializeError::ReadUnavailable("torn down".to_string()));
            }
            Ok(serde_json::from_value(json!({
                "id": "e1",
                "namespace": "playground",
                "root": { "group": "root", "key": "root", "type": "root", "meta": {}, "children": [] },
                "selection": null,
                "version": 0.1,
                "revision": revision
            }))
            .unwrap())
        }

        fn send(&self, message: ExternalMessage) {
            self.sent.borrow_mut().push(message);
        }
    }

    fn kinds(agent: &Lifecycle<RecordingPort>) -> Vec<(&'static str, Option<u64>)> {
        agent
            .port()
            .sent
            .borrow()
            .iter()
            .map(|message| match message {
                ExternalMessage::EditorMounted(payload) => ("mounted", payload.state.revision),
                ExternalMessage::EditorUpdated(payload) => ("updated", payload.state.revision),
                ExternalMessage::EditorUnmounted(_) => ("unmounted", None),
            })
            .collect()
    }

    #[test]
    fn test_mount_installs_and_announces() {
        let agent = Lifecycle::new("e1", RecordingPort::default());
        agent.mount("root-a");

        assert!(agent.is_mounted());
        assert_eq!(*agent.port().installed.borrow(), vec!["root-a"]);
        assert_eq!(kinds(&agent), vec![("mounted", Some(1))]);
    }

    #[test]
    fn test_mount_same_root_is_idempotent() {
        let agent = Lifecycle::new("e1", RecordingPort::default());
        agent.mount("root-a");
        agent.mount("root-a");

        assert_eq!(agent.port().installed.borrow().len(), 1);
        assert_eq!(kinds(&agent), vec![("mounted", Some(1))]);
    }

    #[test]
    fn test_mount_new_root_replaces_previous() {
        let agent = Lifecycle::new("e1", RecordingPort::default());
        agent.mount("root-a");
        agent.mount("root-b");

        assert_eq!(*agent.port().uninstalled.borrow(), vec!["root-a"]);
        assert_eq!(
            kinds(&agent),
            vec![("mounted", Some(1)), ("unmounted", None), ("mounted", Some(2))]
        );
    }

    #[test]
    fn test_unmount_twice_announces_once() {
        let agent = Lifecycle::new("e1", RecordingPort::default());
        agent.mount("root-a");
        agent.unmount();
        agent.unmount();

        assert!(!agent.is_mounted());
        assert_eq!(kinds(&agent), vec![("mounted", Some(1)), ("unmounted", None)]);
    }

    #[test]
    fn test_updates_before_mount_are_ignored() {
        let agent = Lifecycle::new("e1", RecordingPort::default());
        agent.on_update();
        assert!(agent.port().sent.borrow().is_empty());
    }

    #[test]
    fn test_revisions_are_monotonic_across_pulls_and_pushes() {
        let agent = Lifecycle::new("e1", RecordingPort::default());
        agent.mount("root-a");
        agent.on_update();
        assert_eq!(agent.snapshot().unwrap().revision, Some(3));
        agent.on_update();

        assert_eq!(
            kinds(&agent),
            vec![("mounted", Some(1)), ("updated", Some(2)), ("updated", Some(4))]
        );
    }

    #[test]
    fn test_fresh_lifecycle_restarts_revisions() {
        let first = Lifecycle::new("e1", RecordingPort::default());
        first.mount("root-a");
        first.on_update();

        let second = Lifecycle::new("e1", RecordingPort::default());
        second.mount("root-a");
        assert_eq!(kinds(&second), vec![("mounted", Some(1))]);
    }

    #[test]
    fn test_unreadable_editor_sends_nothing() {
        let agent = Lifecycle::new("e1", RecordingPort::default());
        agent.port().unreadable.set(true);
        agent.mount("root-a");
        agent.on_update();

        assert!(agent.is_mounted());
        assert!(agent.port().sent.borrow().is_empty());
    }
}
