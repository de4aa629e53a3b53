//! # scriptwright-store
//!
//! Persistence gateway for site scripts.
//!
//! The editor never talks to storage directly; it goes through the
//! [`ScriptStore`] trait. Two backends ship with the crate:
//!
//! | Backend | Config | Description |
//! |---------|--------|-------------|
//! | [`MemoryScriptStore`] | `backend: memory` | Process memory, lost on exit |
//! | [`FileScriptStore`] | `backend: file` (default) | One JSON file per script in `directory` |
//!
//! Saving a script without an id assigns a fresh UUID and returns the stored
//! copy, so callers learn the id from the result. Site designs go through
//! [`DesignStore`] with the same two backends and the same id rules.

pub mod design;
pub mod error;
pub mod file;
pub mod store;

pub use design::{create_design_store, DesignStore, FileDesignStore, MemoryDesignStore};
pub use error::PersistError;
pub use file::FileScriptStore;
pub use store::{create_store, is_valid_id, MemoryScriptStore, ScriptStore, StoredScript};
