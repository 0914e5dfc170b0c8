pub mod json_preview;
pub mod store;
