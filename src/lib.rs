//! Healithm: health tracking client, auth session store, and landing site.
//!
//! ARCHITECTURE
//! ============
//! - `auth`: session store over a pluggable auth backend (GoTrue in production)
//! - `health`: health-data store and the typed REST client behind it
//! - `pages`: page controllers that turn store state into render/redirect
//!   decisions
//! - `landing` + `routes`: static marketing content and the HTTP server
//! - `state`: the explicit context wiring all of the above

pub mod auth;
pub mod config;
pub mod health;
pub mod landing;
pub mod pages;
pub mod request;
pub mod routes;
pub mod state;
