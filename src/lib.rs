//! boardkit: ordering and persistence engine for workspace kanban boards.
//!
//! Workspaces own boards, boards own ordered lists, lists own ordered
//! cards, cards own checklists and comments. The crate owns the parts with
//! real design content: position allocation (append = max sibling position
//! + 1), the splice-and-renumber drag-reorder algorithm for lists and
//! cards, child-first cascade deletion, and archive-aware listings. Every
//! mutation commits as one SQLite transaction; concurrent writers to the
//! same scope are serialized with a bounded busy-retry.
//!
//! Authentication and authorization live upstream: callers pass
//! pre-authorized ids, and the engine only fences cross-workspace moves.

pub mod db;
pub mod error;
pub mod types;

pub use db::Database;
pub use error::{Error, Result};
