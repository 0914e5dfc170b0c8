pub mod global_context;
pub mod header;
pub mod panel;
pub mod screens;
pub mod sidebar;

use leptos::prelude::*;

/// Panel shell:
/// ```text
/// +------------------------------+-----------+
/// |  Header                      |           |
/// +------------------------------+  Sidebar  |
/// |  Main                        |           |
/// +------------------------------+-----------+
/// ```
/// On narrow windows the sidebar moves below the main area (CSS).
#[component]
pub fn Shell<H, M, S>(header: H, main: M, sidebar: S) -> impl IntoView
where
    H: Fn() -> AnyView + 'static + Send,
    M: Fn() -> AnyView + 'static + Send,
    S: Fn() -> AnyView + 'static + Send,
{
    view! {
        <div class="panel-layout">
            <div class="panel-layout__content">
                {header()}
                <div class="panel-layout__main">{main()}</div>
            </div>
            {sidebar()}
        </div>
    }
}
