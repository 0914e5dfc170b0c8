use crate::layout::global_context::PanelContext;
use crate::layout::panel::Panel;
use crate::layout::screens::{ErrorScreen, LoadingScreen};
use crate::shared::chrome::ChromeListener;
use crate::shared::root_store::RootStoreContext;
use crate::shared::transport;
use contracts::state::EditorsState;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Loading,
    Error,
    Ready,
}

fn screen_for(state: Option<&EditorsState>) -> Screen {
    match state {
        None | Some(EditorsState::Loading) => Screen::Loading,
        Some(EditorsState::Resolved { error: Some(_), .. }) => Screen::Error,
        Some(EditorsState::Resolved { .. }) => Screen::Ready,
    }
}

/// Agent lifecycle messages feed the store; page navigations trigger a full
/// refresh. Listeners that cannot be registered are logged and skipped.
fn connect_store(store: &RootStoreContext) -> Vec<ChromeListener> {
    let mut listeners = Vec::new();

    let on_message = store.clone();
    match transport::listen_external_messages(move |message| on_message.apply_message(message)) {
        Ok(listener) => listeners.push(listener),
        Err(e) => log::error!("Could not listen for editor messages: {e:?}"),
    }

    let on_navigation = store.clone();
    match transport::listen_navigation_committed(move || on_navigation.revalidate()) {
        Ok(listener) => listeners.push(listener),
        Err(e) => log::error!("Could not listen for page navigations: {e:?}"),
    }

    listeners
}

#[component]
pub fn App() -> impl IntoView {
    let store = RootStoreContext::new();
    provide_context(store.clone());
    provide_context(PanelContext::new());

    let _listeners = StoredValue::new_local(connect_store(&store));
    store.revalidate();

    let _ = window_event_listener(leptos::ev::beforeunload, |_| transport::notify_panel_unloaded());

    let screen = Memo::new({
        let store = store.clone();
        move |_| screen_for(store.state().as_deref())
    });

    let editors = store.editors();

    move || match screen.get() {
        Screen::Loading => view! { <LoadingScreen /> }.into_any(),
        Screen::Error => view! { <ErrorScreen /> }.into_any(),
        Screen::Ready => view! { <Panel editors=editors /> }.into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::state::{EditorMap, RevalidateError};

    #[test]
    fn test_screen_for_loading_states() {
        assert_eq!(screen_for(None), Screen::Loading);
        assert_eq!(screen_for(Some(&EditorsState::Loading)), Screen::Loading);
    }

    #[test]
    fn test_screen_for_error_wins_over_editors() {
        let state = EditorsState::Resolved {
            is_revalidating: false,
            editors: EditorMap::new(),
            error: Some(RevalidateError::Injection("no tab".to_string())),
        };
        assert_eq!(screen_for(Some(&state)), Screen::Error);
    }

    #[test]
    fn test_screen_for_revalidating_keeps_panel() {
        let state = EditorsState::resolved(EditorMap::new()).revalidating();
        assert_eq!(screen_for(Some(&state)), Screen::Ready);
    }
}
