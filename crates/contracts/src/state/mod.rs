pub mod editors;
pub mod root_store;

pub use editors::{EditorMap, EditorsState, RevalidateError};
pub use root_store::{RevalidationToken, RootStore};
