//! Core entity records for the board engine.
//!
//! All timestamps are epoch milliseconds. `position` establishes sibling
//! order within the parent scope: unique non-negative integers, dense
//! 0..N-1 right after a reorder, gaps tolerated after deletions.

use serde::{Deserialize, Serialize};

/// Top-level ownership scope. Membership checks happen upstream; the
/// engine only uses the workspace id to fence cross-workspace moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub created_at: i64,
}

/// A board owning an ordered set of lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub description: Option<String>,
    pub background: Option<String>,
    pub is_starred: bool,
    pub is_archived: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A column within a board, owning an ordered set of cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub board_id: String,
    pub workspace_id: String,
    pub name: String,
    pub position: i64,
    pub is_archived: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A card within a list; the leaf unit users drag and reorder.
///
/// `board_id` is denormalized from the owning list and kept in sync on
/// every cross-list move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub list_id: String,
    pub board_id: String,
    pub workspace_id: String,
    pub title: String,
    pub description: Option<String>,
    pub position: i64,
    pub due_date: Option<i64>,
    pub labels: Vec<String>,
    pub is_completed: bool,
    pub is_archived: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A checklist on a card. Positions are append-only (creation order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    pub id: String,
    pub card_id: String,
    pub title: String,
    pub position: i64,
    pub created_at: i64,
}

/// An entry within a checklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub checklist_id: String,
    pub card_id: String,
    pub text: String,
    pub is_completed: bool,
    pub position: i64,
    pub created_at: i64,
}

/// A comment on a card. Listed newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub card_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: i64,
}

/// Partial update for a board. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BoardPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub background: Option<Option<String>>,
    pub is_starred: Option<bool>,
    pub is_archived: Option<bool>,
}

/// Partial update for a list.
#[derive(Debug, Clone, Default)]
pub struct ListPatch {
    pub name: Option<String>,
    pub is_archived: Option<bool>,
}

/// Partial update for a card.
///
/// Position and list membership are deliberately absent: all position
/// writes go through `move_card` / `move_card_to_list` so every reorder
/// renumbers its sibling scope atomically.
#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<i64>>,
    pub labels: Option<Vec<String>>,
    pub is_completed: Option<bool>,
    pub is_archived: Option<bool>,
}
