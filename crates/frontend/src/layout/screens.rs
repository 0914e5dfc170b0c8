use crate::shared::icons::icon;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn LoadingScreen() -> impl IntoView {
    view! {
        <div class="panel-screen panel-screen--centered">
            <Flex justify=FlexJustify::Center align=FlexAlign::Center gap=FlexGap::Small>
                <Spinner />
                "Loading…"
            </Flex>
        </div>
    }
}

#[component]
pub fn ErrorScreen() -> impl IntoView {
    view! {
        <div class="panel-screen">
            <div class="panel-screen__body">
                {icon("alert-circled")}
                <h1 class="panel-screen__title">"Could not load editors"</h1>
            </div>
            <p class="panel-screen__hint">
                "Lexical DevTools can only access Lexical editors on applications that are running on a localhost environment."
            </p>
        </div>
    }
}

#[component]
pub fn EmptyScreen() -> impl IntoView {
    view! {
        <div class="panel-screen">
            <div class="panel-screen__body">
                {icon("info-circled")}
                <h1 class="panel-screen__title">"No editors found"</h1>
            </div>
            <p class="panel-screen__hint">
                "To use Lexical DevTools in your React application, install "
                <code>"@lexical-devtools/react"</code>
                " and import "
                <code>"<DevtoolsPlugin />"</code>
                " inside your "
                <code>"LexicalComposer"</code>
                " component."
            </p>
        </div>
    }
}
