pub mod config;
pub mod messages;
pub mod serializer;
pub mod shared;
pub mod snapshot;
pub mod state;
pub mod tree;
