//! Health tracking data: wire types, REST client, and the health store.

pub mod api;
pub mod cache;
pub mod store;
pub mod types;
