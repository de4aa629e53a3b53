//! # scriptwright-editor
//!
//! Schema-driven editing of site-script action trees.
//!
//! - [`ActionTree`]: add, remove, move and update nodes at any depth. Each
//!   operation returns a new [`Script`](scriptwright_core::Script).
//! - [`EditHistory`]: bounded most-recent-first undo buffer.
//! - [`ExpansionState`]: expanded nodes keyed by [`ActionPath`](scriptwright_core::ActionPath).
//! - [`EditingSession`]: ties the above to a live script, a
//!   [`ScriptStore`](scriptwright_store::ScriptStore) and operator messages.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scriptwright_core::{ActionPath, EditorConfig};
//! use scriptwright_editor::EditingSession;
//! use scriptwright_schema::SchemaResolver;
//! use scriptwright_store::MemoryScriptStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = Arc::new(SchemaResolver::with_default_source()?);
//! resolver.configure(None, false).await?;
//!
//! let store = Arc::new(MemoryScriptStore::new());
//! let mut session = EditingSession::create(
//!     resolver,
//!     store,
//!     "Customer site",
//!     "",
//!     &EditorConfig::default(),
//! )?;
//!
//! let list = session.add_action(None, "createSPList")?;
//! session.add_action(Some(&list), "setDescription")?;
//! session.undo()?;
//! session.save().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod expansion;
pub mod history;
pub mod ops;
pub mod session;
pub mod tree;

pub use error::{HistoryError, SessionError, TreeError};
pub use expansion::ExpansionState;
pub use history::{EditHistory, DEFAULT_HISTORY_CAPACITY};
pub use ops::EditOp;
pub use session::{EditingSession, MessageKind, UserMessage};
pub use tree::{node_at, siblings, ActionTree};
