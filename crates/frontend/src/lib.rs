pub mod app;
pub mod layout;
pub mod overlay;
pub mod shared;

use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen(start)]
pub fn start() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
}

/// Entry point of the devtools panel page.
#[wasm_bindgen]
pub fn start_panel() {
    leptos::mount::mount_to_body(app::App);
}

/// Entry point of the content script: mounts the highlight overlay into its
/// own container so the host page's body is left alone.
#[wasm_bindgen]
pub fn start_overlay() {
    let document = leptos::prelude::document();
    let container = document
        .create_element("div")
        .expect("could not create overlay container");
    container.set_attribute("data-lexical-devtools-overlay", "").ok();
    document
        .body()
        .expect("content script runs after <body> exists")
        .append_child(&container)
        .expect("could not attach overlay container");

    let container: web_sys::HtmlElement = wasm_bindgen::JsCast::unchecked_into(container);
    leptos::mount::mount_to(container, overlay::Overlay).forget();
}
