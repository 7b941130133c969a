//! Checklists and checklist items: card sub-records with append-only
//! positions. They are never drag-reordered; creation order is the order.

use super::cards::get_card_internal;
use super::positions::next_position;
use super::{Database, now_ms};
use crate::error::{Error, Result};
use crate::types::{Checklist, ChecklistItem};
use rusqlite::{Row, params};
use uuid::Uuid;

fn parse_checklist_row(row: &Row) -> rusqlite::Result<Checklist> {
    Ok(Checklist {
        id: row.get("id")?,
        card_id: row.get("card_id")?,
        title: row.get("title")?,
        position: row.get("position")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_checklist_item_row(row: &Row) -> rusqlite::Result<ChecklistItem> {
    Ok(ChecklistItem {
        id: row.get("id")?,
        checklist_id: row.get("checklist_id")?,
        card_id: row.get("card_id")?,
        text: row.get("text")?,
        is_completed: row.get("is_completed")?,
        position: row.get("position")?,
        created_at: row.get("created_at")?,
    })
}

impl Database {
    /// Create a checklist at the end of a card's checklist sequence.
    pub fn create_checklist(&self, card_id: &str, title: &str) -> Result<Checklist> {
        let checklist_id = Uuid::now_v7().to_string();
        let now = now_ms();

        self.write_txn("checklists", |tx| {
            let card_exists = get_card_internal(tx, card_id)?.is_some();
            if !card_exists {
                return Err(Error::CardNotFound(card_id.to_string()));
            }

            let position = next_position(tx, "checklists", "card_id", card_id)?;

            tx.execute(
                "INSERT INTO checklists (id, card_id, title, position, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![checklist_id, card_id, title, position, now],
            )?;

            Ok(Checklist {
                id: checklist_id.clone(),
                card_id: card_id.to_string(),
                title: title.to_string(),
                position,
                created_at: now,
            })
        })
    }

    /// List the checklists of a card, position ascending. An unknown card
    /// yields an empty list rather than an error.
    pub fn get_checklists(&self, card_id: &str) -> Result<Vec<Checklist>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM checklists WHERE card_id = ?1 ORDER BY position")?;
            let mut checklists = Vec::new();
            for row in stmt.query_map(params![card_id], parse_checklist_row)? {
                checklists.push(row?);
            }
            Ok(checklists)
        })
    }

    /// Create an entry at the end of a checklist.
    pub fn create_checklist_item(&self, checklist_id: &str, text: &str) -> Result<ChecklistItem> {
        let item_id = Uuid::now_v7().to_string();
        let now = now_ms();

        self.write_txn("checklist_items", |tx| {
            let card_id: Option<String> = {
                let result = tx.query_row(
                    "SELECT card_id FROM checklists WHERE id = ?1",
                    params![checklist_id],
                    |row| row.get(0),
                );
                match result {
                    Ok(card_id) => Some(card_id),
                    Err(rusqlite::Error::QueryReturnedNoRows) => None,
                    Err(e) => return Err(e.into()),
                }
            };
            let card_id =
                card_id.ok_or_else(|| Error::ChecklistNotFound(checklist_id.to_string()))?;

            let position = next_position(tx, "checklist_items", "checklist_id", checklist_id)?;

            tx.execute(
                "INSERT INTO checklist_items (
                    id, checklist_id, card_id, text, is_completed, position, created_at
                ) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
                params![item_id, checklist_id, card_id, text, position, now],
            )?;

            Ok(ChecklistItem {
                id: item_id.clone(),
                checklist_id: checklist_id.to_string(),
                card_id,
                text: text.to_string(),
                is_completed: false,
                position,
                created_at: now,
            })
        })
    }

    /// List the entries of a checklist, position ascending. An unknown
    /// checklist yields an empty list rather than an error.
    pub fn get_checklist_items(&self, checklist_id: &str) -> Result<Vec<ChecklistItem>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM checklist_items WHERE checklist_id = ?1 ORDER BY position",
            )?;
            let mut items = Vec::new();
            for row in stmt.query_map(params![checklist_id], parse_checklist_item_row)? {
                items.push(row?);
            }
            Ok(items)
        })
    }

    /// Update a checklist entry's text and/or completion flag.
    pub fn update_checklist_item(
        &self,
        item_id: &str,
        text: Option<&str>,
        is_completed: Option<bool>,
    ) -> Result<ChecklistItem> {
        self.write_txn("checklist_items", |tx| {
            let mut stmt = tx.prepare("SELECT * FROM checklist_items WHERE id = ?1")?;
            let item = match stmt.query_row(params![item_id], parse_checklist_item_row) {
                Ok(item) => item,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Err(Error::ChecklistItemNotFound(item_id.to_string()));
                }
                Err(e) => return Err(e.into()),
            };
            drop(stmt);

            let text = text.map(str::to_string).unwrap_or(item.text.clone());
            let is_completed = is_completed.unwrap_or(item.is_completed);

            tx.execute(
                "UPDATE checklist_items SET text = ?1, is_completed = ?2 WHERE id = ?3",
                params![text, is_completed, item_id],
            )?;

            Ok(ChecklistItem {
                text,
                is_completed,
                ..item
            })
        })
    }
}
