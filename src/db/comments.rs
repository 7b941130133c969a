//! Card comments. No ordering column; listings are newest-first.

use super::cards::get_card_internal;
use super::{Database, now_ms};
use crate::error::{Error, Result};
use crate::types::Comment;
use rusqlite::{Row, params};
use uuid::Uuid;

fn parse_comment_row(row: &Row) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        card_id: row.get("card_id")?,
        author_id: row.get("author_id")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
    })
}

impl Database {
    /// Add a comment to a card. `author_id` is the upstream-resolved
    /// member identity; the engine stores it opaquely.
    pub fn create_comment(&self, card_id: &str, author_id: &str, content: &str) -> Result<Comment> {
        let comment_id = Uuid::now_v7().to_string();
        let now = now_ms();

        self.write_txn("comments", |tx| {
            if get_card_internal(tx, card_id)?.is_none() {
                return Err(Error::CardNotFound(card_id.to_string()));
            }

            tx.execute(
                "INSERT INTO comments (id, card_id, author_id, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![comment_id, card_id, author_id, content, now],
            )?;

            Ok(Comment {
                id: comment_id.clone(),
                card_id: card_id.to_string(),
                author_id: author_id.to_string(),
                content: content.to_string(),
                created_at: now,
            })
        })
    }

    /// List the comments of a card, newest first. An unknown card yields
    /// an empty list rather than an error.
    pub fn get_comments(&self, card_id: &str) -> Result<Vec<Comment>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM comments WHERE card_id = ?1 ORDER BY created_at DESC")?;
            let mut comments = Vec::new();
            for row in stmt.query_map(params![card_id], parse_comment_row)? {
                comments.push(row?);
            }
            Ok(comments)
        })
    }
}
