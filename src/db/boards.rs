//! Board CRUD and the board-level cascade delete.

use super::lists::delete_list_internal;
use super::{Database, now_ms};
use crate::error::{Error, Result};
use crate::types::{Board, BoardPatch};
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

/// Names for the lists every new board starts with.
const DEFAULT_LIST_NAMES: [&str; 3] = ["To Do", "Doing", "Done"];

pub(super) fn parse_board_row(row: &Row) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get("id")?,
        workspace_id: row.get("workspace_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        background: row.get("background")?,
        is_starred: row.get("is_starred")?,
        is_archived: row.get("is_archived")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Get a board using an existing connection.
pub(super) fn get_board_internal(conn: &Connection, board_id: &str) -> Result<Option<Board>> {
    let mut stmt = conn.prepare("SELECT * FROM boards WHERE id = ?1")?;
    match stmt.query_row(params![board_id], parse_board_row) {
        Ok(board) => Ok(Some(board)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Create a board in a workspace, seeded with the three default lists
    /// at positions 0, 1, 2.
    pub fn create_board(
        &self,
        workspace_id: &str,
        name: &str,
        description: Option<&str>,
        background: Option<&str>,
    ) -> Result<Board> {
        let board_id = Uuid::now_v7().to_string();
        let now = now_ms();

        self.write_txn("boards", |tx| {
            let workspace_exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM workspaces WHERE id = ?1)",
                params![workspace_id],
                |row| row.get(0),
            )?;
            if !workspace_exists {
                return Err(Error::WorkspaceNotFound(workspace_id.to_string()));
            }

            tx.execute(
                "INSERT INTO boards (
                    id, workspace_id, name, description, background,
                    is_starred, is_archived, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6, ?6)",
                params![board_id, workspace_id, name, description, background, now],
            )?;

            for (position, list_name) in DEFAULT_LIST_NAMES.iter().enumerate() {
                tx.execute(
                    "INSERT INTO lists (
                        id, board_id, workspace_id, name, position,
                        is_archived, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)",
                    params![
                        Uuid::now_v7().to_string(),
                        board_id,
                        workspace_id,
                        list_name,
                        position as i64,
                        now,
                    ],
                )?;
            }

            tracing::debug!(board_id, workspace_id, "created board with default lists");

            Ok(Board {
                id: board_id.clone(),
                workspace_id: workspace_id.to_string(),
                name: name.to_string(),
                description: description.map(str::to_string),
                background: background.map(str::to_string),
                is_starred: false,
                is_archived: false,
                created_at: now,
                updated_at: now,
            })
        })
    }

    /// Get a board by ID.
    pub fn get_board(&self, board_id: &str) -> Result<Option<Board>> {
        self.with_conn(|conn| get_board_internal(conn, board_id))
    }

    /// List the boards of a workspace, newest first. Archived boards are
    /// filtered out unless requested. An unknown workspace yields an empty
    /// list rather than an error.
    pub fn list_boards(&self, workspace_id: &str, include_archived: bool) -> Result<Vec<Board>> {
        self.with_conn(|conn| {
            let sql = if include_archived {
                "SELECT * FROM boards WHERE workspace_id = ?1 ORDER BY created_at DESC"
            } else {
                "SELECT * FROM boards WHERE workspace_id = ?1 AND is_archived = 0
                 ORDER BY created_at DESC"
            };
            let mut stmt = conn.prepare(sql)?;
            let mut boards = Vec::new();
            for row in stmt.query_map(params![workspace_id], parse_board_row)? {
                boards.push(row?);
            }
            Ok(boards)
        })
    }

    /// Apply a partial update to a board (rename, description, background,
    /// star, archive toggle).
    pub fn update_board(&self, board_id: &str, patch: BoardPatch) -> Result<Board> {
        let now = now_ms();

        self.write_txn("boards", |tx| {
            let board = get_board_internal(tx, board_id)?
                .ok_or_else(|| Error::BoardNotFound(board_id.to_string()))?;

            let name = patch.name.clone().unwrap_or(board.name.clone());
            let description = patch
                .description
                .clone()
                .unwrap_or(board.description.clone());
            let background = patch.background.clone().unwrap_or(board.background.clone());
            let is_starred = patch.is_starred.unwrap_or(board.is_starred);
            let is_archived = patch.is_archived.unwrap_or(board.is_archived);

            tx.execute(
                "UPDATE boards SET
                    name = ?1, description = ?2, background = ?3,
                    is_starred = ?4, is_archived = ?5, updated_at = ?6
                WHERE id = ?7",
                params![
                    name,
                    description,
                    background,
                    is_starred,
                    is_archived,
                    now,
                    board_id,
                ],
            )?;

            Ok(Board {
                name,
                description,
                background,
                is_starred,
                is_archived,
                updated_at: now,
                ..board
            })
        })
    }

    /// Delete a board and everything under it: lists, cards, checklists,
    /// checklist items, comments, children before parents.
    ///
    /// Idempotent: deleting an absent board is a no-op. If a cascade is
    /// interrupted it can be re-invoked from the top; already-deleted
    /// descendants are simply skipped.
    pub fn delete_board(&self, board_id: &str) -> Result<()> {
        self.write_txn("boards", |tx| {
            let list_ids: Vec<String> = {
                let mut stmt = tx.prepare("SELECT id FROM lists WHERE board_id = ?1")?;
                let mut ids = Vec::new();
                for row in stmt.query_map(params![board_id], |row| row.get::<_, String>(0))? {
                    ids.push(row?);
                }
                ids
            };

            let mut cards_deleted = 0;
            for list_id in &list_ids {
                cards_deleted += delete_list_internal(tx, list_id)?;
            }

            let deleted = tx.execute("DELETE FROM boards WHERE id = ?1", params![board_id])?;
            if deleted == 0 {
                tracing::debug!(board_id, "delete_board: board already absent");
            } else {
                tracing::info!(
                    board_id,
                    lists = list_ids.len(),
                    cards = cards_deleted,
                    "deleted board cascade"
                );
            }
            Ok(())
        })
    }
}
