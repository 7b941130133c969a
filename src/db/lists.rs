//! List CRUD, list reordering within a board, and the list-level cascade.

use super::cards::delete_card_internal;
use super::positions::{self, LIST_SCOPE};
use super::{Database, now_ms};
use crate::error::{Error, Result};
use crate::types::{List, ListPatch};
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

pub(super) fn parse_list_row(row: &Row) -> rusqlite::Result<List> {
    Ok(List {
        id: row.get("id")?,
        board_id: row.get("board_id")?,
        workspace_id: row.get("workspace_id")?,
        name: row.get("name")?,
        position: row.get("position")?,
        is_archived: row.get("is_archived")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Get a list using an existing connection.
pub(super) fn get_list_internal(conn: &Connection, list_id: &str) -> Result<Option<List>> {
    let mut stmt = conn.prepare("SELECT * FROM lists WHERE id = ?1")?;
    match stmt.query_row(params![list_id], parse_list_row) {
        Ok(list) => Ok(Some(list)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Delete one list and its cards (with their sub-records), children first.
/// Returns the number of cards removed. Surviving sibling lists keep their
/// positions; the gap closes on the next reorder of the board.
pub(super) fn delete_list_internal(conn: &Connection, list_id: &str) -> Result<usize> {
    let card_ids: Vec<String> = {
        let mut stmt = conn.prepare("SELECT id FROM cards WHERE list_id = ?1")?;
        let mut ids = Vec::new();
        for row in stmt.query_map(params![list_id], |row| row.get::<_, String>(0))? {
            ids.push(row?);
        }
        ids
    };

    for card_id in &card_ids {
        delete_card_internal(conn, card_id)?;
    }

    conn.execute("DELETE FROM lists WHERE id = ?1", params![list_id])?;
    Ok(card_ids.len())
}

impl Database {
    /// Create a list at the end of a board (max sibling position + 1).
    pub fn create_list(&self, board_id: &str, name: &str) -> Result<List> {
        let list_id = Uuid::now_v7().to_string();
        let now = now_ms();

        self.write_txn("lists", |tx| {
            let board = super::boards::get_board_internal(tx, board_id)?
                .ok_or_else(|| Error::BoardNotFound(board_id.to_string()))?;

            let position = positions::next_position(tx, "lists", "board_id", board_id)?;

            tx.execute(
                "INSERT INTO lists (
                    id, board_id, workspace_id, name, position,
                    is_archived, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)",
                params![list_id, board_id, board.workspace_id, name, position, now],
            )?;

            Ok(List {
                id: list_id.clone(),
                board_id: board_id.to_string(),
                workspace_id: board.workspace_id,
                name: name.to_string(),
                position,
                is_archived: false,
                created_at: now,
                updated_at: now,
            })
        })
    }

    /// Get a list by ID.
    pub fn get_list(&self, list_id: &str) -> Result<Option<List>> {
        self.with_conn(|conn| get_list_internal(conn, list_id))
    }

    /// List the lists of a board, position ascending. Archived lists are
    /// filtered out unless requested. An unknown board yields an empty
    /// list rather than an error.
    pub fn get_lists(&self, board_id: &str, include_archived: bool) -> Result<Vec<List>> {
        self.with_conn(|conn| {
            let sql = if include_archived {
                "SELECT * FROM lists WHERE board_id = ?1 ORDER BY position"
            } else {
                "SELECT * FROM lists WHERE board_id = ?1 AND is_archived = 0 ORDER BY position"
            };
            let mut stmt = conn.prepare(sql)?;
            let mut lists = Vec::new();
            for row in stmt.query_map(params![board_id], parse_list_row)? {
                lists.push(row?);
            }
            Ok(lists)
        })
    }

    /// Apply a partial update to a list (rename, archive toggle).
    /// Archiving keeps the list's position and parent; it only hides the
    /// list from default listings.
    pub fn update_list(&self, list_id: &str, patch: ListPatch) -> Result<List> {
        let now = now_ms();

        self.write_txn("lists", |tx| {
            let list = get_list_internal(tx, list_id)?
                .ok_or_else(|| Error::ListNotFound(list_id.to_string()))?;

            let name = patch.name.clone().unwrap_or(list.name.clone());
            let is_archived = patch.is_archived.unwrap_or(list.is_archived);

            tx.execute(
                "UPDATE lists SET name = ?1, is_archived = ?2, updated_at = ?3 WHERE id = ?4",
                params![name, is_archived, now, list_id],
            )?;

            Ok(List {
                name,
                is_archived,
                updated_at: now,
                ..list
            })
        })
    }

    /// Move a list to `target_index` among the active lists of its board,
    /// renumbering the board's list sequence densely. Out-of-range indices
    /// clamp to the end; moving to the current index writes nothing.
    pub fn move_list(&self, list_id: &str, target_index: usize) -> Result<()> {
        let now = now_ms();

        self.write_txn("lists", |tx| {
            let list = get_list_internal(tx, list_id)?
                .ok_or_else(|| Error::ListNotFound(list_id.to_string()))?;

            let written = positions::reorder_within(
                tx,
                LIST_SCOPE,
                &list.board_id,
                list_id,
                target_index,
                now,
            )?;
            tracing::debug!(
                list_id,
                board_id = list.board_id,
                target_index,
                written,
                "moved list"
            );
            Ok(())
        })
    }

    /// Delete a list and its cards (with their sub-records). Idempotent:
    /// deleting an absent list is a no-op.
    pub fn delete_list(&self, list_id: &str) -> Result<()> {
        self.write_txn("lists", |tx| {
            let cards = delete_list_internal(tx, list_id)?;
            tracing::info!(list_id, cards, "deleted list cascade");
            Ok(())
        })
    }
}
