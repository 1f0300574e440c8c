//! Authentication: backend seam, GoTrue client, and the session store.
//!
//! ARCHITECTURE
//! ============
//! `store` owns the only copy of session state. It drives an `AuthBackend`
//! (`supabase` in production), which persists tokens through `session_file`.
//! Pages observe the store; they never call the backend directly.

pub mod backend;
pub mod failure;
pub mod session_file;
pub mod store;
pub mod supabase;
pub mod types;
