use crate::layout::global_context::use_panel_context;
use crate::shared::icons::icon;
use crate::shared::root_store::use_root_store;
use contracts::snapshot::SerializedEditorState;
use leptos::prelude::*;
use std::sync::Arc;
use thaw::*;

fn editor_label(editor: &SerializedEditorState) -> String {
    format!("{} ({})", editor.id, editor.namespace)
}

/// Editor picker, refresh and sidebar toggle.
#[component]
pub fn Header(#[prop(into)] editors: Signal<Vec<Arc<SerializedEditorState>>>) -> impl IntoView {
    let ctx = use_panel_context();
    let store = use_root_store();

    let is_revalidating = Signal::derive({
        let store = store.clone();
        move || store.state().map_or(true, |state| state.is_revalidating())
    });

    let sidebar_icons = move || {
        if ctx.sidebar_open.get() {
            view! {
                <span class="panel-header__icon--wide">{icon("panel-right-close")}</span>
                <span class="panel-header__icon--narrow">{icon("panel-bottom-close")}</span>
            }
            .into_any()
        } else {
            view! {
                <span class="panel-header__icon--wide">{icon("panel-right-open")}</span>
                <span class="panel-header__icon--narrow">{icon("panel-bottom-open")}</span>
            }
            .into_any()
        }
    };

    view! {
        <div class="panel-header">
            <Select value=ctx.selected_editor size=SelectSize::Small class="panel-header__editors">
                <For
                    each=move || editors.get()
                    key=|editor| (editor.id.clone(), editor.namespace.clone())
                    children=move |editor| {
                        view! { <option value=editor.id.clone()>{editor_label(&editor)}</option> }
                    }
                />
            </Select>

            <div class="panel-header__separator" role="separator" aria-orientation="vertical"></div>

            <Button
                size=ButtonSize::Small
                appearance=ButtonAppearance::Subtle
                disabled=is_revalidating
                on_click=move |_| store.revalidate()
                attr:title="Refresh editors"
            >
                {icon("reload")}
            </Button>

            <Button
                class="panel-header__sidebar-toggle"
                size=ButtonSize::Small
                appearance=ButtonAppearance::Subtle
                on_click=move |_| ctx.toggle_sidebar()
                attr:title="Toggle sidebar"
            >
                {sidebar_icons}
            </Button>
        </div>
    }
}
