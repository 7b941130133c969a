//! Card CRUD, card reordering within and across lists, and the card-level
//! cascade over checklists and comments.

use super::lists::get_list_internal;
use super::positions::{self, CARD_SCOPE};
use super::{Database, now_ms};
use crate::error::{Error, Result};
use crate::types::{Card, CardPatch};
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

pub(super) fn parse_card_row(row: &Row) -> rusqlite::Result<Card> {
    let labels_json: String = row.get("labels")?;
    Ok(Card {
        id: row.get("id")?,
        list_id: row.get("list_id")?,
        board_id: row.get("board_id")?,
        workspace_id: row.get("workspace_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        position: row.get("position")?,
        due_date: row.get("due_date")?,
        labels: serde_json::from_str(&labels_json).unwrap_or_default(),
        is_completed: row.get("is_completed")?,
        is_archived: row.get("is_archived")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Get a card using an existing connection.
pub(super) fn get_card_internal(conn: &Connection, card_id: &str) -> Result<Option<Card>> {
    let mut stmt = conn.prepare("SELECT * FROM cards WHERE id = ?1")?;
    match stmt.query_row(params![card_id], parse_card_row) {
        Ok(card) => Ok(Some(card)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Delete one card and its sub-records, children first: checklist items,
/// checklists, comments, then the card row. Re-running after a partial
/// failure is safe; absent rows delete as no-ops.
pub(super) fn delete_card_internal(conn: &Connection, card_id: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM checklist_items WHERE card_id = ?1",
        params![card_id],
    )?;
    conn.execute("DELETE FROM checklists WHERE card_id = ?1", params![card_id])?;
    conn.execute("DELETE FROM comments WHERE card_id = ?1", params![card_id])?;
    conn.execute("DELETE FROM cards WHERE id = ?1", params![card_id])?;
    Ok(())
}

impl Database {
    /// Create a card at the end of a list (max sibling position + 1).
    /// Board and workspace ids are denormalized from the owning list.
    pub fn create_card(&self, list_id: &str, title: &str) -> Result<Card> {
        let card_id = Uuid::now_v7().to_string();
        let now = now_ms();

        self.write_txn("cards", |tx| {
            let list = get_list_internal(tx, list_id)?
                .ok_or_else(|| Error::ListNotFound(list_id.to_string()))?;

            let position = positions::next_position(tx, "cards", "list_id", list_id)?;

            tx.execute(
                "INSERT INTO cards (
                    id, list_id, board_id, workspace_id, title, description,
                    position, due_date, labels, is_completed, is_archived,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, NULL, '[]', 0, 0, ?7, ?7)",
                params![
                    card_id,
                    list_id,
                    list.board_id,
                    list.workspace_id,
                    title,
                    position,
                    now,
                ],
            )?;

            Ok(Card {
                id: card_id.clone(),
                list_id: list_id.to_string(),
                board_id: list.board_id,
                workspace_id: list.workspace_id,
                title: title.to_string(),
                description: None,
                position,
                due_date: None,
                labels: Vec::new(),
                is_completed: false,
                is_archived: false,
                created_at: now,
                updated_at: now,
            })
        })
    }

    /// Get a card by ID.
    pub fn get_card(&self, card_id: &str) -> Result<Option<Card>> {
        self.with_conn(|conn| get_card_internal(conn, card_id))
    }

    /// List the cards of a list, position ascending. Archived cards are
    /// filtered out unless requested. An unknown list yields an empty
    /// list rather than an error.
    pub fn get_cards(&self, list_id: &str, include_archived: bool) -> Result<Vec<Card>> {
        self.with_conn(|conn| {
            let sql = if include_archived {
                "SELECT * FROM cards WHERE list_id = ?1 ORDER BY position"
            } else {
                "SELECT * FROM cards WHERE list_id = ?1 AND is_archived = 0 ORDER BY position"
            };
            let mut stmt = conn.prepare(sql)?;
            let mut cards = Vec::new();
            for row in stmt.query_map(params![list_id], parse_card_row)? {
                cards.push(row?);
            }
            Ok(cards)
        })
    }

    /// The most recently created non-archived cards across a workspace.
    pub fn recent_cards(&self, workspace_id: &str, limit: Option<i64>) -> Result<Vec<Card>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM cards WHERE workspace_id = ?1 AND is_archived = 0
                 ORDER BY created_at DESC LIMIT ?2",
            )?;
            let mut cards = Vec::new();
            for row in stmt.query_map(params![workspace_id, limit.unwrap_or(10)], parse_card_row)? {
                cards.push(row?);
            }
            Ok(cards)
        })
    }

    /// Apply a partial update to a card: title, description, due date,
    /// labels, completion, archive toggle. Position and list membership
    /// are not patchable here; moves go through [`Database::move_card`]
    /// and [`Database::move_card_to_list`].
    pub fn update_card(&self, card_id: &str, patch: CardPatch) -> Result<Card> {
        let now = now_ms();

        self.write_txn("cards", |tx| {
            let card = get_card_internal(tx, card_id)?
                .ok_or_else(|| Error::CardNotFound(card_id.to_string()))?;

            let title = patch.title.clone().unwrap_or(card.title.clone());
            let description = patch
                .description
                .clone()
                .unwrap_or(card.description.clone());
            let due_date = patch.due_date.unwrap_or(card.due_date);
            let labels = patch.labels.clone().unwrap_or(card.labels.clone());
            let is_completed = patch.is_completed.unwrap_or(card.is_completed);
            let is_archived = patch.is_archived.unwrap_or(card.is_archived);

            let labels_json =
                serde_json::to_string(&labels).unwrap_or_else(|_| String::from("[]"));

            tx.execute(
                "UPDATE cards SET
                    title = ?1, description = ?2, due_date = ?3, labels = ?4,
                    is_completed = ?5, is_archived = ?6, updated_at = ?7
                WHERE id = ?8",
                params![
                    title,
                    description,
                    due_date,
                    labels_json,
                    is_completed,
                    is_archived,
                    now,
                    card_id,
                ],
            )?;

            Ok(Card {
                title,
                description,
                due_date,
                labels,
                is_completed,
                is_archived,
                updated_at: now,
                ..card
            })
        })
    }

    /// Move a card to `target_index` among the active cards of its list,
    /// renumbering the list's card sequence densely. Out-of-range indices
    /// clamp to the end; moving to the current index writes nothing.
    pub fn move_card(&self, card_id: &str, target_index: usize) -> Result<()> {
        let now = now_ms();

        self.write_txn("cards", |tx| {
            let card = get_card_internal(tx, card_id)?
                .ok_or_else(|| Error::CardNotFound(card_id.to_string()))?;

            let written = positions::reorder_within(
                tx,
                CARD_SCOPE,
                &card.list_id,
                card_id,
                target_index,
                now,
            )?;
            tracing::debug!(
                card_id,
                list_id = card.list_id,
                target_index,
                written,
                "moved card within list"
            );
            Ok(())
        })
    }

    /// Move a card into another list at `dest_index`: splice it out of the
    /// source sequence, splice it into the destination sequence, and update
    /// its list and denormalized board references, all in one transaction.
    ///
    /// The destination must belong to the same workspace. A destination
    /// equal to the current list degrades to an in-list move.
    pub fn move_card_to_list(
        &self,
        card_id: &str,
        dest_list_id: &str,
        dest_index: usize,
    ) -> Result<()> {
        let now = now_ms();

        self.write_txn("cards", |tx| {
            let card = get_card_internal(tx, card_id)?
                .ok_or_else(|| Error::CardNotFound(card_id.to_string()))?;
            let dest = get_list_internal(tx, dest_list_id)?
                .ok_or_else(|| Error::ListNotFound(dest_list_id.to_string()))?;

            if dest.workspace_id != card.workspace_id {
                return Err(Error::CrossWorkspaceMove {
                    card_id: card_id.to_string(),
                    dest_list_id: dest_list_id.to_string(),
                });
            }

            if dest.id == card.list_id {
                positions::reorder_within(tx, CARD_SCOPE, &card.list_id, card_id, dest_index, now)?;
                return Ok(());
            }

            // Source side: survivors collapse to a dense sequence.
            let source_siblings =
                positions::active_siblings(tx, CARD_SCOPE, &card.list_id, Some(card_id))?;
            let source_writes = positions::remove_renumber(&source_siblings, card_id);
            positions::apply_writes(tx, CARD_SCOPE, &source_writes, now)?;

            // Destination side, loaded before the card is reparented so the
            // incoming card is not counted among its new siblings yet.
            let dest_siblings = positions::active_siblings(tx, CARD_SCOPE, dest_list_id, None)?;
            let dest_writes = positions::insert_renumber(&dest_siblings, card_id, dest_index);

            tx.execute(
                "UPDATE cards SET list_id = ?1, board_id = ?2, updated_at = ?3 WHERE id = ?4",
                params![dest_list_id, dest.board_id, now, card_id],
            )?;
            positions::apply_writes(tx, CARD_SCOPE, &dest_writes, now)?;

            positions::assert_dense(tx, CARD_SCOPE, &card.list_id, None)?;
            positions::assert_dense(tx, CARD_SCOPE, dest_list_id, Some(card_id))?;

            tracing::debug!(
                card_id,
                source_list = card.list_id,
                dest_list = dest_list_id,
                dest_index,
                written = source_writes.len() + dest_writes.len(),
                "moved card across lists"
            );
            Ok(())
        })
    }

    /// Delete a card and its checklists, checklist items, and comments.
    /// Idempotent: deleting an absent card is a no-op.
    pub fn delete_card(&self, card_id: &str) -> Result<()> {
        self.write_txn("cards", |tx| {
            delete_card_internal(tx, card_id)?;
            tracing::debug!(card_id, "deleted card cascade");
            Ok(())
        })
    }
}
